use std::fmt::{self, Display};
use std::ops::Neg;
use std::str::FromStr;

use crate::error::PolyError;
use crate::parser::TermParser;
use crate::printer::TermPrinter;

use super::{Exponent, Variable, MAX_DEGREE, NVARS};

/// A coefficient times a product of powers of `x`, `y` and `z`.
///
/// Equality compares the coefficient exactly, so `Term`s that differ only
/// by floating point rounding are unequal. Use [`Term::is_similar`] to
/// compare exponents only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    coefficient: f64,
    exponents: [Exponent; NVARS],
}

impl Default for Term {
    fn default() -> Self {
        Term::constant(0.)
    }
}

impl Term {
    #[inline]
    pub fn new(coefficient: f64, px: Exponent, py: Exponent, pz: Exponent) -> Term {
        Term {
            coefficient,
            exponents: [px, py, pz],
        }
    }

    #[inline]
    pub fn from_exponents(coefficient: f64, exponents: [Exponent; NVARS]) -> Term {
        Term {
            coefficient,
            exponents,
        }
    }

    #[inline]
    pub fn constant(coefficient: f64) -> Term {
        Term::from_exponents(coefficient, [0; NVARS])
    }

    /// Parse a single term such as `-1.5xy^2z^3`.
    pub fn parse(input: &str) -> Result<Term, PolyError> {
        TermParser::new(input).parse()
    }

    #[inline]
    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    #[inline]
    pub fn exponents(&self) -> &[Exponent; NVARS] {
        &self.exponents
    }

    #[inline]
    pub fn power(&self, var: Variable) -> Exponent {
        self.exponents[var.index()]
    }

    #[inline]
    pub fn power_x(&self) -> Exponent {
        self.power(Variable::X)
    }

    #[inline]
    pub fn power_y(&self) -> Exponent {
        self.power(Variable::Y)
    }

    #[inline]
    pub fn power_z(&self) -> Exponent {
        self.power(Variable::Z)
    }

    /// The total degree of the term.
    pub fn degree(&self) -> Exponent {
        self.exponents.iter().sum()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.coefficient == 0.
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        self.exponents.iter().all(|e| *e == 0)
    }

    /// Returns `true` iff both terms have the same exponents. The
    /// coefficients are not compared.
    #[inline]
    pub fn is_similar(&self, other: &Term) -> bool {
        self.exponents == other.exponents
    }

    /// Add a similar term.
    pub fn try_add(&self, other: &Term) -> Result<Term, PolyError> {
        self.check_similar(other)?;
        Ok(Term::from_exponents(
            finite(self.coefficient + other.coefficient)?,
            self.exponents,
        ))
    }

    /// Subtract a similar term.
    pub fn try_sub(&self, other: &Term) -> Result<Term, PolyError> {
        self.check_similar(other)?;
        Ok(Term::from_exponents(
            finite(self.coefficient - other.coefficient)?,
            self.exponents,
        ))
    }

    fn check_similar(&self, other: &Term) -> Result<(), PolyError> {
        if self.is_similar(other) {
            Ok(())
        } else {
            Err(PolyError::IncompatibleTerms {
                lhs: self.to_string(),
                rhs: other.to_string(),
            })
        }
    }

    /// Multiply two terms. Fails if any exponent of the product
    /// exceeds [`MAX_DEGREE`]. A zero coefficient is a valid result.
    pub fn try_mul(&self, other: &Term) -> Result<Term, PolyError> {
        let mut exponents = self.exponents;
        for (var, (e, o)) in Variable::ALL
            .into_iter()
            .zip(exponents.iter_mut().zip(&other.exponents))
        {
            *e = match e.checked_add(*o) {
                Some(d) if d <= MAX_DEGREE => d,
                d => {
                    return Err(PolyError::DegreeOverflow {
                        variable: var,
                        degree: d.unwrap_or(Exponent::MAX),
                        max: MAX_DEGREE,
                    })
                }
            };
        }

        Ok(Term::from_exponents(
            finite(self.coefficient * other.coefficient)?,
            exponents,
        ))
    }

    #[inline]
    pub fn mul_coeff(&self, k: f64) -> Term {
        Term::from_exponents(self.coefficient * k, self.exponents)
    }

    pub fn div_coeff(&self, k: f64) -> Result<Term, PolyError> {
        if k == 0. {
            return Err(PolyError::DivisionByZero);
        }
        Ok(Term::from_exponents(finite(self.coefficient / k)?, self.exponents))
    }

    /// Evaluate the term at the point `(x, y, z)`.
    pub fn evaluate(&self, x: f64, y: f64, z: f64) -> f64 {
        self.exponents
            .iter()
            .zip([x, y, z])
            .fold(self.coefficient, |acc, (e, v)| acc * v.powi(*e as i32))
    }
}

/// Reject coefficients that have overflowed to an infinity or became NaN.
#[inline]
fn finite(coefficient: f64) -> Result<f64, PolyError> {
    if coefficient.is_finite() {
        Ok(coefficient)
    } else {
        Err(PolyError::CoefficientOverflow { coefficient })
    }
}

impl Neg for Term {
    type Output = Term;

    fn neg(self) -> Term {
        self.mul_coeff(-1.)
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        TermPrinter::new(self).fmt(f)
    }
}

impl FromStr for Term {
    type Err = PolyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Term::parse(s)
    }
}

#[cfg(test)]
mod test {
    use crate::error::PolyError;
    use crate::poly::Variable;

    use super::Term;

    #[test]
    fn add_similar() {
        let a = Term::new(2., 2, 1, 0);
        let b = Term::new(3., 2, 1, 0);
        assert_eq!(a.try_add(&b), Ok(Term::new(5., 2, 1, 0)));
        assert_eq!(a.try_sub(&b), Ok(Term::new(-1., 2, 1, 0)));
    }

    #[test]
    fn add_dissimilar() {
        let a = Term::new(2., 2, 1, 0);
        let b = Term::new(3., 1, 2, 0);
        assert!(matches!(
            a.try_add(&b),
            Err(PolyError::IncompatibleTerms { .. })
        ));
        assert!(matches!(
            a.try_sub(&b),
            Err(PolyError::IncompatibleTerms { .. })
        ));
    }

    #[test]
    fn mul() {
        let a = Term::new(2., 2, 1, 0);
        let b = Term::new(3., 1, 3, 0);
        assert_eq!(a.try_mul(&b), Ok(Term::new(6., 3, 4, 0)));

        let zero = Term::new(0., 1, 0, 0);
        assert_eq!(zero.try_mul(&b), Ok(Term::new(0., 2, 3, 0)));
    }

    #[test]
    fn mul_degree_overflow() {
        let a = Term::new(1., 5, 0, 0);
        let b = Term::new(1., 4, 0, 0);
        assert_eq!(a.try_mul(&b), Ok(Term::new(1., 9, 0, 0)));

        let c = Term::new(1., 0, 0, 5);
        let d = Term::new(1., 1, 0, 5);
        assert_eq!(
            c.try_mul(&d),
            Err(PolyError::DegreeOverflow {
                variable: Variable::Z,
                degree: 10,
                max: 9
            })
        );
    }

    #[test]
    fn scalar() {
        let a = Term::new(2., 2, 1, 0);
        assert_eq!(a.mul_coeff(3.), Term::new(6., 2, 1, 0));
        assert_eq!(a.div_coeff(4.), Ok(Term::new(0.5, 2, 1, 0)));
        assert_eq!(a.div_coeff(0.), Err(PolyError::DivisionByZero));
        assert_eq!(-a, Term::new(-2., 2, 1, 0));
    }

    #[test]
    fn coefficient_overflow() {
        let big = Term::new(1e300, 1, 0, 0);
        assert!(matches!(
            big.try_mul(&big),
            Err(PolyError::CoefficientOverflow { .. })
        ));
        assert!(matches!(
            big.div_coeff(1e-300),
            Err(PolyError::CoefficientOverflow { .. })
        ));
        assert!(matches!(
            Term::new(f64::MAX, 1, 0, 0).try_add(&Term::new(f64::MAX, 1, 0, 0)),
            Err(PolyError::CoefficientOverflow { .. })
        ));
        assert_eq!(big.div_coeff(1e300), Ok(Term::new(1., 1, 0, 0)));
    }

    #[test]
    fn equality_is_exact() {
        let a = Term::new(0.1 + 0.2, 1, 0, 0);
        let b = Term::new(0.3, 1, 0, 0);
        assert_ne!(a, b);
        assert!(a.is_similar(&b));
    }

    #[test]
    fn evaluate() {
        let a = Term::new(2., 2, 1, 0);
        assert_eq!(a.evaluate(3., 5., 7.), 90.);
        assert_eq!(Term::constant(-4.).evaluate(1., 2., 3.), -4.);
    }

    #[test]
    fn accessors() {
        let a: Term = "-1.5xy^2z^3".parse().unwrap();
        assert_eq!(a.coefficient(), -1.5);
        assert_eq!(a.exponents(), &[1, 2, 3]);
        assert_eq!(a.power_y(), 2);
        assert_eq!(a.degree(), 6);
        assert!(!a.is_constant());
        assert!(Term::constant(2.).is_constant());
    }
}
