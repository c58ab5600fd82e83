use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

use bytes::{Buf, BufMut};
use smallvec::SmallVec;
use tracing::{debug, instrument};

use crate::error::{PolyError, StoreError};
use crate::parser::PolynomialParser;
use crate::printer::PolynomialPrinter;

use super::term::Term;
use super::{Exponent, Variable, INLINED_TERMS, NVARS};

/// The size in bytes of a single encoded term.
const TERM_BYTES: usize = 8 + 4 * NVARS;

/// Order terms by descending exponents: `x` first, ties broken by `y`, then `z`.
#[inline]
pub fn cmp_exponents(a: &Term, b: &Term) -> Ordering {
    b.exponents().cmp(a.exponents())
}

/// A polynomial in `x`, `y` and `z` with real coefficients.
///
/// The terms are always kept in canonical form: no two terms have the same
/// exponents, no term has a zero coefficient and the terms are sorted by
/// [`cmp_exponents`]. The empty polynomial is zero.
#[derive(Clone, Default)]
pub struct Polynomial {
    terms: SmallVec<[Term; INLINED_TERMS]>,
}

impl Polynomial {
    /// Constructs the zero polynomial.
    #[inline]
    pub fn new() -> Polynomial {
        Polynomial {
            terms: SmallVec::new(),
        }
    }

    /// Constructs a polynomial from terms in any order.
    pub fn from_terms<I: IntoIterator<Item = Term>>(terms: I) -> Polynomial {
        let mut p = Polynomial {
            terms: terms.into_iter().collect(),
        };
        p.normalize();
        p
    }

    /// Parse a polynomial such as `2x^2y - 3z + 5`.
    pub fn parse(input: &str) -> Result<Polynomial, PolyError> {
        PolynomialParser::new(input).parse()
    }

    #[inline]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    #[inline]
    pub fn nterms(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// The highest power of `var` in any term.
    pub fn degree(&self, var: Variable) -> Exponent {
        self.terms.iter().map(|t| t.power(var)).max().unwrap_or(0)
    }

    /// Restore the canonical form: sort the terms, merge similar terms
    /// and drop terms whose coefficient is zero.
    pub fn normalize(&mut self) {
        self.terms.sort_by(cmp_exponents);

        let mut out: SmallVec<[Term; INLINED_TERMS]> = SmallVec::with_capacity(self.terms.len());
        for t in self.terms.drain(..) {
            if t.is_zero() {
                continue;
            }

            match out.last_mut() {
                Some(last) if last.is_similar(&t) => {
                    *last = Term::from_exponents(
                        last.coefficient() + t.coefficient(),
                        *last.exponents(),
                    );
                    if last.is_zero() {
                        out.pop();
                    }
                }
                _ => out.push(t),
            }
        }

        self.terms = out;
    }

    /// Add a term and restore the canonical form.
    pub fn add_term(&mut self, term: Term) {
        self.terms.push(term);
        self.normalize();
    }

    /// Multiply two polynomials. If the product of any pair of terms
    /// overflows the maximum degree, no result is produced.
    #[instrument(level = "trace", skip_all, fields(lhs = %self, rhs = %other))]
    pub fn try_mul(&self, other: &Polynomial) -> Result<Polynomial, PolyError> {
        let mut terms: SmallVec<[Term; INLINED_TERMS]> =
            SmallVec::with_capacity(self.nterms() * other.nterms());
        for t1 in &self.terms {
            for t2 in &other.terms {
                let t = t1.try_mul(t2).map_err(|e| {
                    debug!("Aborting multiplication at {} * {}: {}", t1, t2, e);
                    e
                })?;
                terms.push(t);
            }
        }

        let mut res = Polynomial { terms };
        res.normalize();
        Ok(res)
    }

    /// Multiply every coefficient by `k`.
    pub fn mul_coeff(&self, k: f64) -> Polynomial {
        let mut res = Polynomial {
            terms: self.terms.iter().map(|t| t.mul_coeff(k)).collect(),
        };
        res.terms.retain(|t| !t.is_zero());
        res
    }

    /// Divide every coefficient by `k`.
    pub fn div_coeff(&self, k: f64) -> Result<Polynomial, PolyError> {
        if k == 0. {
            return Err(PolyError::DivisionByZero);
        }

        let mut terms: SmallVec<[Term; INLINED_TERMS]> = SmallVec::with_capacity(self.nterms());
        for t in &self.terms {
            terms.push(t.div_coeff(k)?);
        }

        // an underflow may still produce a zero coefficient
        let mut res = Polynomial { terms };
        res.terms.retain(|t| !t.is_zero());
        Ok(res)
    }

    /// Evaluate the polynomial at the point `(x, y, z)`.
    pub fn evaluate(&self, x: f64, y: f64, z: f64) -> f64 {
        self.terms.iter().map(|t| t.evaluate(x, y, z)).sum()
    }

    /// Write the polynomial in binary form: the number of terms followed by,
    /// for every term, the coefficient and the exponents.
    pub fn write_bytes<B: BufMut>(&self, dest: &mut B) {
        dest.put_u32_le(self.terms.len() as u32);
        for t in &self.terms {
            dest.put_f64_le(t.coefficient());
            for e in t.exponents() {
                dest.put_u32_le(*e);
            }
        }
    }

    /// Read a polynomial written by [`Polynomial::write_bytes`].
    pub fn read_bytes<B: Buf>(source: &mut B) -> Result<Polynomial, StoreError> {
        if source.remaining() < 4 {
            return Err(StoreError::Corrupt("missing term count".into()));
        }

        let n = source.get_u32_le() as usize;
        if source.remaining() < n * TERM_BYTES {
            return Err(StoreError::Corrupt(format!(
                "expected {} terms, but only {} bytes remain",
                n,
                source.remaining()
            )));
        }

        let mut terms: SmallVec<[Term; INLINED_TERMS]> = SmallVec::with_capacity(n);
        for _ in 0..n {
            let coeff = source.get_f64_le();
            let mut exponents = [0; NVARS];
            for e in &mut exponents {
                *e = source.get_u32_le();
            }
            terms.push(Term::from_exponents(coeff, exponents));
        }

        Ok(Polynomial::from_terms(terms))
    }
}

impl fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "[]");
        }
        let mut first = true;
        write!(f, "[ ")?;
        for t in &self.terms {
            if first {
                first = false;
            } else {
                write!(f, ", ")?;
            }
            write!(f, "{{ {:?}, {:?} }}", t.coefficient(), t.exponents())?;
        }
        write!(f, " ]")
    }
}

impl Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        PolynomialPrinter::new(self).fmt(f)
    }
}

impl FromStr for Polynomial {
    type Err = PolyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Polynomial::parse(s)
    }
}

/// Two polynomials are equal iff their canonical text is equal.
impl PartialEq for Polynomial {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl From<Term> for Polynomial {
    fn from(t: Term) -> Self {
        Polynomial::from_terms([t])
    }
}

impl<'a> IntoIterator for &'a Polynomial {
    type Item = &'a Term;
    type IntoIter = std::slice::Iter<'a, Term>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

impl Add for Polynomial {
    type Output = Self;

    fn add(mut self, other: Self) -> Self::Output {
        self.terms.extend(other.terms);
        self.normalize();
        self
    }
}

impl<'a> Add<&'a Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn add(self, other: &'a Polynomial) -> Self::Output {
        self.clone() + other.clone()
    }
}

impl Sub for Polynomial {
    type Output = Self;

    fn sub(mut self, other: Self) -> Self::Output {
        self.terms.extend(other.terms.into_iter().map(|t| -t));
        self.normalize();
        self
    }
}

impl<'a> Sub<&'a Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn sub(self, other: &'a Polynomial) -> Self::Output {
        self.clone() - other.clone()
    }
}

impl Neg for Polynomial {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        for t in &mut self.terms {
            *t = -*t;
        }
        self
    }
}
