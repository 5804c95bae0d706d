//! Tagged operands and results for mixed-kind arithmetic.
//!
//! Every binary operation of the crate accepts an [`Operand`], whatever the
//! kind of its right-hand side, and answers with a [`Value`]: results collapse
//! to the simplest kind that represents them (a cancelled tensor is the scalar
//! zero, a rank-0 product is its coefficient).

use std::fmt::{self, Display};

use enum_try_as_inner::EnumTryAsInner;

use crate::{
    contraction::{Contract, ContractionError, Differentiate, Trace},
    naming::Typeset,
    product::TensorProduct,
    scalar::Scalar,
    tensor::Tensor,
    vector::Vector,
};

/// Anything that can appear on either side of `add`, `multiply` or `contract`.
#[derive(Debug, Clone, PartialEq, EnumTryAsInner)]
#[derive_err(Debug)]
pub enum Operand<S> {
    Scalar(S),
    Vector(Vector<S>),
    Product(TensorProduct<S>),
    Tensor(Tensor<S>),
}

/// Result of an operation, in its simplest form.
#[derive(Debug, Clone, PartialEq, EnumTryAsInner)]
#[derive_err(Debug)]
pub enum Value<S> {
    Scalar(S),
    Product(TensorProduct<S>),
    Tensor(Tensor<S>),
}

impl<S: Scalar> Operand<S> {
    pub fn kind(&self) -> &'static str {
        match self {
            Operand::Scalar(_) => "scalar",
            Operand::Vector(_) => "vector",
            Operand::Product(_) => "tensor product",
            Operand::Tensor(_) => "tensor",
        }
    }

    /// Number of vector slots; a bare vector counts as rank 1.
    pub fn rank(&self) -> usize {
        match self {
            Operand::Scalar(_) => 0,
            Operand::Vector(_) => 1,
            Operand::Product(p) => p.rank(),
            Operand::Tensor(t) => t.rank(),
        }
    }

    fn is_zero_scalar(&self) -> bool {
        matches!(self, Operand::Scalar(s) if s.is_zero())
    }

    /// Sum of two operands. The scalar zero is the identity; vectors cannot be added.
    pub fn add(&self, other: &Operand<S>) -> Result<Value<S>, ContractionError> {
        match (self, other) {
            (Operand::Vector(_), _) | (_, Operand::Vector(_)) => {
                Err(ContractionError::UnsupportedOperand {
                    operation: "add",
                    left: self.kind(),
                    right: other.kind(),
                })
            }
            (Operand::Scalar(a), Operand::Scalar(b)) => {
                Ok(Value::Scalar((a.clone() + b.clone()).simplify()))
            }
            (Operand::Scalar(_), _) if self.is_zero_scalar() => other.add(self),
            (Operand::Scalar(_), _) => Err(ContractionError::RankMismatch {
                left: 0,
                right: other.rank(),
            }),
            (Operand::Product(p), _) => p.add(other),
            (Operand::Tensor(t), _) => t.add(other),
        }
    }

    /// `self · other`: tensor product of the vector parts, product of the scalar parts.
    pub fn multiply(&self, other: &Operand<S>) -> Value<S> {
        match (self, other) {
            (Operand::Scalar(a), Operand::Scalar(b)) => {
                Value::Scalar((a.clone() * b.clone()).simplify())
            }
            (Operand::Vector(v), _) => TensorProduct::from(v.clone()).multiply(other),
            (Operand::Product(p), _) => p.multiply(other),
            (Operand::Tensor(t), _) => t.multiply(other),
            (Operand::Scalar(_), Operand::Vector(v)) => {
                TensorProduct::from(v.clone()).premultiply(self)
            }
            (Operand::Scalar(_), Operand::Product(p)) => p.premultiply(self),
            (Operand::Scalar(_), Operand::Tensor(t)) => t.premultiply(self),
        }
    }

    /// Full contraction into a scalar. Two vectors contract by their dot product.
    pub fn contract(&self, other: &Operand<S>) -> Result<S, ContractionError> {
        match (self, other) {
            (Operand::Vector(v), Operand::Vector(w)) => v.dot(w),
            (Operand::Product(p), _) => p.contract(other),
            (Operand::Tensor(t), _) => t.contract(other),
            _ => Err(ContractionError::UnsupportedOperand {
                operation: "contract",
                left: self.kind(),
                right: other.kind(),
            }),
        }
    }
}

impl<S: Scalar> Value<S> {
    /// Wraps a single term, collapsing a cancelled or rank-0 product to a scalar.
    pub fn from_product(product: TensorProduct<S>) -> Self {
        if product.coefficient.is_zero() {
            return Value::Scalar(S::zero());
        }
        if product.rank() == 0 {
            return Value::Scalar(product.coefficient);
        }
        Value::Product(product)
    }

    pub fn rank(&self) -> usize {
        match self {
            Value::Scalar(_) => 0,
            Value::Product(p) => p.rank(),
            Value::Tensor(t) => t.rank(),
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Value::Scalar(s) if s.is_zero())
    }

    #[must_use]
    pub fn compress(&self) -> Self {
        match self {
            Value::Scalar(s) => Value::Scalar(s.simplify()),
            Value::Product(p) => Value::from_product(p.clone()),
            Value::Tensor(t) => t.compress(),
        }
    }

    pub fn add(&self, other: &Operand<S>) -> Result<Value<S>, ContractionError> {
        Operand::from(self.clone()).add(other)
    }

    pub fn multiply(&self, other: &Operand<S>) -> Value<S> {
        Operand::from(self.clone()).multiply(other)
    }

    pub fn contract(&self, other: &Operand<S>) -> Result<S, ContractionError> {
        Operand::from(self.clone()).contract(other)
    }
}

impl<S: Scalar> Trace<S> for Value<S> {
    fn trace(&self, first: usize, second: usize) -> Result<Value<S>, ContractionError> {
        match self {
            Value::Scalar(_) => Err(ContractionError::RankMismatch { left: 0, right: 2 }),
            Value::Product(p) => p.trace(first, second),
            Value::Tensor(t) => t.trace(first, second),
        }
    }
}

impl<S: Scalar> Differentiate for Value<S> {
    type Output = Value<S>;

    fn differentiate(&self, parameter: &str) -> Value<S> {
        match self {
            Value::Scalar(s) => Value::Scalar(s.derivative(parameter).simplify()),
            Value::Product(p) => p.differentiate(parameter),
            Value::Tensor(t) => t.differentiate(parameter),
        }
    }
}

impl<S> From<Value<S>> for Operand<S> {
    fn from(value: Value<S>) -> Self {
        match value {
            Value::Scalar(s) => Operand::Scalar(s),
            Value::Product(p) => Operand::Product(p),
            Value::Tensor(t) => Operand::Tensor(t),
        }
    }
}

impl<S> From<Vector<S>> for Operand<S> {
    fn from(value: Vector<S>) -> Self {
        Operand::Vector(value)
    }
}

impl<S> From<TensorProduct<S>> for Operand<S> {
    fn from(value: TensorProduct<S>) -> Self {
        Operand::Product(value)
    }
}

impl<S> From<Tensor<S>> for Operand<S> {
    fn from(value: Tensor<S>) -> Self {
        Operand::Tensor(value)
    }
}

impl<S> From<TensorProduct<S>> for Value<S> {
    fn from(value: TensorProduct<S>) -> Self {
        Value::Product(value)
    }
}

impl<S> From<Tensor<S>> for Value<S> {
    fn from(value: Tensor<S>) -> Self {
        Value::Tensor(value)
    }
}

impl<S: Scalar> Display for Operand<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Scalar(s) => write!(f, "{s}"),
            Operand::Vector(v) => write!(f, "{v}"),
            Operand::Product(p) => write!(f, "{p}"),
            Operand::Tensor(t) => write!(f, "{t}"),
        }
    }
}

impl<S: Scalar> Display for Value<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Scalar(s) => write!(f, "{s}"),
            Value::Product(p) => write!(f, "{p}"),
            Value::Tensor(t) => write!(f, "{t}"),
        }
    }
}

impl<S: Scalar> Typeset for Operand<S> {
    fn typeset(&self) -> String {
        match self {
            Operand::Scalar(s) => s.typeset(),
            Operand::Vector(v) => v.typeset(),
            Operand::Product(p) => p.typeset(),
            Operand::Tensor(t) => t.typeset(),
        }
    }

    fn typeset_display(&self) -> String {
        match self {
            Operand::Tensor(t) => t.typeset_display(),
            _ => format!("${}$", self.typeset()),
        }
    }
}

impl<S: Scalar> Typeset for Value<S> {
    fn typeset(&self) -> String {
        match self {
            Value::Scalar(s) => s.typeset(),
            Value::Product(p) => p.typeset(),
            Value::Tensor(t) => t.typeset(),
        }
    }

    fn typeset_display(&self) -> String {
        match self {
            Value::Tensor(t) => t.typeset_display(),
            _ => format!("${}$", self.typeset()),
        }
    }
}
