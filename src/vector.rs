use std::fmt::{self, Display};

use crate::{
    contraction::{Contract, ContractionError, Differentiate},
    naming::{bump_derivative, Typeset},
    product::TensorProduct,
    scalar::{self, Scalar},
};

/// A named, fixed-dimension tuple of scalars.
///
/// The name doubles as the display form, in both plain and typeset output, so
/// it is usually written as math-mode markup (e.g. `\hat{n}`).
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<S> {
    name: String,
    components: Vec<S>,
    constant: bool,
}

impl<S: Scalar> Vector<S> {
    /// A vector depending on the differentiation parameter through its components.
    pub fn function(name: impl Into<String>, components: Vec<S>) -> Self {
        Vector {
            name: name.into(),
            components,
            constant: false,
        }
    }

    /// A vector whose derivative vanishes identically.
    pub fn constant(name: impl Into<String>, components: Vec<S>) -> Self {
        Vector {
            name: name.into(),
            components,
            constant: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn components(&self) -> &[S] {
        &self.components
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.components.iter()
    }

    pub fn dimension(&self) -> usize {
        self.components.len()
    }

    pub fn is_constant(&self) -> bool {
        self.constant
    }

    pub fn is_zero(&self) -> bool {
        self.components.iter().all(|c| c.is_zero())
    }

    /// Euclidean dot product.
    pub fn dot(&self, other: &Vector<S>) -> Result<S, ContractionError> {
        if self.dimension() != other.dimension() {
            return Err(ContractionError::DimensionMismatch {
                left: self.dimension(),
                right: other.dimension(),
            });
        }
        Ok(scalar::sum(
            self.iter().zip(other.iter()).map(|(a, b)| a.clone() * b.clone()),
        ))
    }

    /// The rank-2 product `self ⊗ other` with unit coefficient.
    pub fn tensor(&self, other: &Vector<S>) -> TensorProduct<S> {
        TensorProduct::new(vec![self.clone(), other.clone()])
    }
}

impl<S: Scalar> Contract for Vector<S> {
    type LCM = S;
    fn contract(&self, other: &Self) -> Result<S, ContractionError> {
        self.dot(other)
    }
}

impl<S: Scalar> Differentiate for Vector<S> {
    type Output = Vector<S>;

    fn differentiate(&self, parameter: &str) -> Vector<S> {
        if self.constant {
            return Vector {
                name: self.name.clone(),
                components: vec![S::zero(); self.dimension()],
                constant: true,
            };
        }
        Vector {
            name: bump_derivative(&self.name, parameter),
            components: self
                .iter()
                .map(|c| c.derivative(parameter).simplify())
                .collect(),
            constant: false,
        }
    }
}

impl<'a, S> IntoIterator for &'a Vector<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

impl<S> Display for Vector<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl<S> Typeset for Vector<S> {
    fn typeset(&self) -> String {
        self.name.clone()
    }
}
