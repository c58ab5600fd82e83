//! Character-level parsers for terms and polynomials.
//!
//! Both parsers strip all whitespace and then run a single pass over the
//! remaining characters, driven by an explicit parse state. Characters that cannot
//! occur in the current state are dropped, so `2*x + y,` parses as `2x+y`.
//! Numeric literals that are recognized but cannot be converted produce a
//! [`PolyError::MalformedNumericLiteral`].

use smartstring::{LazyCompact, SmartString};
use tracing::{instrument, trace};

use crate::error::PolyError;
use crate::poly::{polynomial::Polynomial, term::Term, Exponent, Variable, NVARS};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ParseState {
    Start,
    ReadCoefficient,
    ReadVariable,
    ReadPower,
}

/// The class of an input character, which drives the state transitions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CharClass {
    Sign(bool),
    /// A digit or a decimal point.
    Numeric(char),
    Letter(char),
    Caret,
    Other,
}

impl CharClass {
    #[inline]
    fn of(c: char) -> CharClass {
        match c {
            '+' => CharClass::Sign(false),
            '-' => CharClass::Sign(true),
            '^' => CharClass::Caret,
            c if c.is_ascii_digit() || c == '.' => CharClass::Numeric(c),
            c if c.is_ascii_alphabetic() => CharClass::Letter(c),
            _ => CharClass::Other,
        }
    }
}

#[inline]
fn significant_chars(input: &str) -> impl Iterator<Item = char> + '_ {
    input.chars().filter(|c| !c.is_whitespace())
}

/// Parses a single term: `[sign][digits[.digits]](letter[^digits])*`.
///
/// A missing coefficient is one, a variable without a caret has exponent one.
/// If a variable occurs more than once, its last exponent is used. Letters
/// other than `x`, `y` and `z` are read and discarded together with their exponent.
pub struct TermParser<'a> {
    input: &'a str,
    state: ParseState,
    negative: bool,
    coefficient: Option<f64>,
    buffer: SmartString<LazyCompact>,
    var: Option<Variable>,
    exponents: [Exponent; NVARS],
}

impl<'a> TermParser<'a> {
    pub fn new(input: &'a str) -> TermParser<'a> {
        TermParser {
            input,
            state: ParseState::Start,
            negative: false,
            coefficient: None,
            buffer: SmartString::new(),
            var: None,
            exponents: [0; NVARS],
        }
    }

    pub fn parse(mut self) -> Result<Term, PolyError> {
        for c in significant_chars(self.input) {
            self.step(c)?;
        }

        match self.state {
            ParseState::Start | ParseState::ReadCoefficient => {
                self.finish_coefficient()?;
            }
            ParseState::ReadVariable => self.commit_variable(1),
            ParseState::ReadPower => self.commit_power()?,
        }

        Ok(Term::from_exponents(
            self.coefficient.unwrap_or(1.),
            self.exponents,
        ))
    }

    fn step(&mut self, c: char) -> Result<(), PolyError> {
        match (self.state, CharClass::of(c)) {
            (ParseState::Start, CharClass::Sign(negative)) => {
                self.negative = negative;
                self.state = ParseState::ReadCoefficient;
            }
            (ParseState::Start | ParseState::ReadCoefficient, CharClass::Numeric(c)) => {
                self.buffer.push(c);
                self.state = ParseState::ReadCoefficient;
            }
            (ParseState::Start | ParseState::ReadCoefficient, CharClass::Letter(c)) => {
                self.finish_coefficient()?;
                self.begin_variable(c);
            }
            (ParseState::ReadVariable, CharClass::Letter(c)) => {
                self.commit_variable(1);
                self.begin_variable(c);
            }
            (ParseState::ReadVariable, CharClass::Caret) => {
                self.state = ParseState::ReadPower;
            }
            (ParseState::ReadPower, CharClass::Numeric(c)) => {
                self.buffer.push(c);
            }
            (ParseState::ReadPower, CharClass::Letter(c)) => {
                self.commit_power()?;
                self.begin_variable(c);
            }
            (state, _) => {
                trace!("Ignoring '{}' in term '{}' in state {:?}", c, self.input, state);
            }
        }

        Ok(())
    }

    fn finish_coefficient(&mut self) -> Result<(), PolyError> {
        let magnitude = if self.buffer.is_empty() {
            1.
        } else {
            self.buffer
                .parse::<f64>()
                .map_err(|e| PolyError::MalformedNumericLiteral {
                    literal: self.buffer.clone(),
                    reason: e.to_string(),
                })?
        };

        if !magnitude.is_finite() {
            return Err(PolyError::MalformedNumericLiteral {
                literal: self.buffer.clone(),
                reason: "number too large".into(),
            });
        }

        self.coefficient = Some(if self.negative { -magnitude } else { magnitude });
        self.buffer.clear();
        Ok(())
    }

    fn begin_variable(&mut self, c: char) {
        self.var = Variable::from_char(c);
        if self.var.is_none() {
            trace!("Discarding unknown variable '{}' in term '{}'", c, self.input);
        }
        self.state = ParseState::ReadVariable;
    }

    fn commit_variable(&mut self, exponent: Exponent) {
        if let Some(v) = self.var.take() {
            self.exponents[v.index()] = exponent;
        }
    }

    fn commit_power(&mut self) -> Result<(), PolyError> {
        if self.buffer.is_empty() {
            return Err(PolyError::MalformedNumericLiteral {
                literal: SmartString::new(),
                reason: "missing exponent after '^'".into(),
            });
        }

        let exponent =
            self.buffer
                .parse::<Exponent>()
                .map_err(|e| PolyError::MalformedNumericLiteral {
                    literal: self.buffer.clone(),
                    reason: e.to_string(),
                })?;

        self.commit_variable(exponent);
        self.buffer.clear();
        Ok(())
    }
}

/// Parses a sum of terms, e.g. `2x^2y - 3z + 5`.
///
/// The input is split into term substrings at every sign that follows a
/// term, and at every coefficient that follows a variable. The sign is
/// tracked separately and applied after the substring is parsed with
/// [`TermParser`]. Consecutive signs combine, so `x+-y` is `x-y`. Terms
/// without a sign of their own inherit the current one, so `-x2` is
/// `-x-2`. The collected terms are normalized once at the end.
pub struct PolynomialParser<'a> {
    input: &'a str,
    state: ParseState,
    negative: bool,
    term: SmartString<LazyCompact>,
    terms: Vec<Term>,
}

impl<'a> PolynomialParser<'a> {
    pub fn new(input: &'a str) -> PolynomialParser<'a> {
        PolynomialParser {
            input,
            state: ParseState::Start,
            negative: false,
            term: SmartString::new(),
            terms: vec![],
        }
    }

    #[instrument(level = "trace", skip_all, fields(input = self.input))]
    pub fn parse(mut self) -> Result<Polynomial, PolyError> {
        for c in significant_chars(self.input) {
            self.step(c)?;
        }

        // flush the trailing term
        self.flush()?;

        Ok(Polynomial::from_terms(self.terms))
    }

    fn step(&mut self, c: char) -> Result<(), PolyError> {
        match (self.state, CharClass::of(c)) {
            (ParseState::Start, CharClass::Sign(negative)) => {
                self.negative ^= negative;
            }
            (_, CharClass::Sign(negative)) => {
                self.flush()?;
                self.negative = negative;
            }
            (ParseState::Start | ParseState::ReadCoefficient, CharClass::Numeric(c)) => {
                self.term.push(c);
                self.state = ParseState::ReadCoefficient;
            }
            // a coefficient after a variable starts the next term, which
            // inherits the current sign
            (ParseState::ReadVariable, CharClass::Numeric(c)) => {
                self.emit()?;
                self.term.push(c);
                self.state = ParseState::ReadCoefficient;
            }
            (_, CharClass::Letter(c)) => {
                self.term.push(c);
                self.state = ParseState::ReadVariable;
            }
            (ParseState::ReadVariable, CharClass::Caret) => {
                self.term.push('^');
                self.state = ParseState::ReadPower;
            }
            (ParseState::ReadPower, CharClass::Numeric(c)) => {
                self.term.push(c);
            }
            (state, _) => {
                trace!("Ignoring '{}' in '{}' in state {:?}", c, self.input, state);
            }
        }

        Ok(())
    }

    /// Parse the accumulated term substring and apply the current sign.
    fn emit(&mut self) -> Result<(), PolyError> {
        if !self.term.is_empty() {
            let t = TermParser::new(&self.term).parse()?;
            trace!("Parsed term {} from '{}'", t, self.term);
            self.terms.push(if self.negative { -t } else { t });
            self.term.clear();
        }
        Ok(())
    }

    /// Emit the accumulated term and start a new signed term.
    fn flush(&mut self) -> Result<(), PolyError> {
        self.emit()?;
        self.negative = false;
        self.state = ParseState::Start;
        Ok(())
    }
}
