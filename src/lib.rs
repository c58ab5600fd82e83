//! Polyxyz is a small symbolic algebra engine for polynomials in the
//! variables `x`, `y` and `z` with real coefficients.
//!
//! Polynomials are parsed from loosely written text, are always kept in a
//! canonical form (sorted, with similar terms merged and zero terms removed)
//! and support addition, subtraction, multiplication and division by a number.
//!
//! For example:
//!
//! ```
//! use polyxyz::Polynomial;
//!
//! fn main() {
//!     let a = Polynomial::parse("x + y").unwrap();
//!     let b = Polynomial::parse("x - y").unwrap();
//!     let c = a.try_mul(&b).unwrap();
//!     assert_eq!(c.to_string(), "x^2-y^2");
//!     println!("({}) * ({}) = {}", a, b, c);
//! }
//! ```

pub mod error;
pub mod parser;
pub mod poly;
pub mod printer;
pub mod store;

pub use error::{PolyError, StoreError};
pub use poly::{polynomial::Polynomial, term::Term, Variable};
pub use store::{Insertion, OverwritePolicy, PolynomialStore};
