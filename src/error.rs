use smartstring::{LazyCompact, SmartString};
use thiserror::Error;

use crate::poly::{Exponent, Variable};

/// A failure of a term or polynomial operation. None of these are fatal:
/// the caller decides whether to report and continue.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolyError {
    #[error("cannot combine dissimilar terms {lhs} and {rhs}")]
    IncompatibleTerms { lhs: String, rhs: String },
    #[error("degree overflow: {variable}^{degree} exceeds the maximum degree {max}")]
    DegreeOverflow {
        variable: Variable,
        degree: Exponent,
        max: Exponent,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("coefficient overflow: the result {coefficient} is not a finite number")]
    CoefficientOverflow { coefficient: f64 },
    #[error("malformed numeric literal '{literal}': {reason}")]
    MalformedNumericLiteral {
        literal: SmartString<LazyCompact>,
        reason: String,
    },
}

/// A failure of the named-polynomial store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("polynomial '{0}' not found")]
    NotFound(String),
    #[error("polynomial '{0}' already exists")]
    AlreadyExists(String),
    #[error("corrupt store data: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
