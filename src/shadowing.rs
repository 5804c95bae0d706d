//! Symbolica-backed scalars.
//!
//! With the `shadowing` feature, [`Atom`] expressions can be used as vector
//! components and coefficients, so derivatives with respect to a parameter are
//! carried out symbolically.

use symbolica::{
    atom::{Atom, AtomCore},
    function,
    printer::{PrintOptions, PrintState},
    symbol,
};

use crate::{scalar::Scalar, vector::Vector};

impl Scalar for Atom {
    fn zero() -> Self {
        Atom::num(0)
    }

    fn one() -> Self {
        Atom::num(1)
    }

    fn from_ratio(numerator: i64, denominator: i64) -> Self {
        Atom::num((numerator, denominator))
    }

    fn simplify(&self) -> Self {
        AtomCore::expand(self)
    }

    fn is_zero(&self) -> bool {
        AtomCore::expand(self) == Atom::num(0)
    }

    fn derivative(&self, parameter: &str) -> Self {
        AtomCore::derivative(self, symbol!(parameter))
    }

    fn typeset(&self) -> String {
        let mut out = String::new();
        match self
            .as_atom_view()
            .fmt_output(&mut out, &PrintOptions::latex(), PrintState::new())
        {
            Ok(_) => out,
            Err(_) => self.to_string(),
        }
    }
}

impl Vector<Atom> {
    /// A vector whose components are the unknown functions `f(parameter)`, one per name.
    pub fn of_parameter(name: impl Into<String>, functions: &[&str], parameter: &str) -> Self {
        let parameter = Atom::var(symbol!(parameter));
        Vector::function(
            name,
            functions
                .iter()
                .map(|&f| function!(symbol!(f), parameter.clone()))
                .collect(),
        )
    }
}
