pub mod polynomial;
pub mod term;

use std::fmt::{self, Display};

/// The number of variables every term carries an exponent for.
pub const NVARS: usize = 3;

/// The largest exponent a product of two terms may have in any variable.
pub const MAX_DEGREE: Exponent = 9;

/// The number of terms a polynomial stores inline before spilling to the heap.
pub const INLINED_TERMS: usize = 4;

pub type Exponent = u32;

/// One of the three fixed variables. The discriminant is the index into
/// a term's exponent array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variable {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Variable {
    /// All variables in rendering order.
    pub const ALL: [Variable; NVARS] = [Variable::X, Variable::Y, Variable::Z];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Get the variable for a letter, ignoring case.
    pub fn from_char(c: char) -> Option<Variable> {
        match c.to_ascii_lowercase() {
            'x' => Some(Variable::X),
            'y' => Some(Variable::Y),
            'z' => Some(Variable::Z),
            _ => None,
        }
    }

    #[inline]
    pub fn name(self) -> char {
        match self {
            Variable::X => 'x',
            Variable::Y => 'y',
            Variable::Z => 'z',
        }
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write;
        f.write_char(self.name())
    }
}

#[cfg(test)]
mod test {
    use super::Variable;

    #[test]
    fn variable_letters() {
        assert_eq!(Variable::from_char('X'), Some(Variable::X));
        assert_eq!(Variable::from_char('y'), Some(Variable::Y));
        assert_eq!(Variable::from_char('Z'), Some(Variable::Z));
        assert_eq!(Variable::from_char('w'), None);

        for v in Variable::ALL {
            assert_eq!(Variable::from_char(v.name()), Some(v));
            assert_eq!(Variable::ALL[v.index()], v);
        }
    }
}
