use std::fmt::{self, Write};

use crate::poly::{polynomial::Polynomial, term::Term, Variable};

/// Prints a term in canonical form, e.g. `-x^2yz^3` or `1.5y`.
pub struct TermPrinter<'a> {
    pub term: &'a Term,
}

impl<'a> TermPrinter<'a> {
    pub fn new(term: &'a Term) -> TermPrinter<'a> {
        TermPrinter { term }
    }
}

impl fmt::Display for TermPrinter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let c = self.term.coefficient();
        if c == 0. {
            return f.write_char('0');
        }

        // a unit coefficient is implied by the variables
        if self.term.is_constant() || (c != 1. && c != -1.) {
            write!(f, "{}", c)?;
        } else if c == -1. {
            f.write_char('-')?;
        }

        for v in Variable::ALL {
            match self.term.power(v) {
                0 => {}
                1 => f.write_char(v.name())?,
                e => write!(f, "{}^{}", v.name(), e)?,
            }
        }

        Ok(())
    }
}

/// Prints a polynomial in canonical form: its terms in canonical order,
/// separated by `+` unless the next term starts with `-`. The zero
/// polynomial prints as `0`.
pub struct PolynomialPrinter<'a> {
    pub poly: &'a Polynomial,
}

impl<'a> PolynomialPrinter<'a> {
    pub fn new(poly: &'a Polynomial) -> PolynomialPrinter<'a> {
        PolynomialPrinter { poly }
    }
}

impl fmt::Display for PolynomialPrinter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.poly.is_zero() {
            return f.write_char('0');
        }

        let mut buf = String::new();
        for (i, t) in self.poly.terms().iter().enumerate() {
            buf.clear();
            write!(buf, "{}", t)?;

            if i > 0 && !buf.starts_with('-') {
                f.write_char('+')?;
            }
            f.write_str(&buf)?;
        }

        Ok(())
    }
}
