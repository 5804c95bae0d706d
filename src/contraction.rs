use thiserror::Error;

use crate::{operand::Value, scalar::Scalar};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractionError {
    #[error("Cannot combine rank-{left} tensor with rank-{right} tensor")]
    RankMismatch { left: usize, right: usize },
    #[error("Cannot contract {left}-dimensional vector with {right}-dimensional vector")]
    DimensionMismatch { left: usize, right: usize },
    #[error("Don't know how to {operation} {left} with {right}")]
    UnsupportedOperand {
        operation: &'static str,
        left: &'static str,
        right: &'static str,
    },
    #[error("Symmetric rank-{rank} product has too many orderings to enumerate")]
    TooManyOrderings { rank: usize },
    #[error("Slots ({first}, {second}) cannot be traced in a rank-{rank} tensor")]
    InvalidSlots {
        first: usize,
        second: usize,
        rank: usize,
    },
}

impl ContractionError {
    pub(crate) fn check_rank(left: usize, right: usize) -> Result<(), Self> {
        if left == right {
            Ok(())
        } else {
            log::debug!("rank mismatch: {left} against {right}");
            Err(ContractionError::RankMismatch { left, right })
        }
    }

    pub(crate) fn check_slots(first: usize, second: usize, rank: usize) -> Result<(), Self> {
        if rank < 2 {
            return Err(ContractionError::RankMismatch { left: rank, right: 2 });
        }
        if first == second || first >= rank || second >= rank {
            return Err(ContractionError::InvalidSlots {
                first,
                second,
                rank,
            });
        }
        Ok(())
    }
}

/// Full contraction of two objects of equal rank into a scalar.
pub trait Contract<T = Self> {
    type LCM;
    fn contract(&self, other: &T) -> Result<Self::LCM, ContractionError>;
}

/// Contraction of two slots of the same object.
pub trait Trace<S: Scalar> {
    fn trace(&self, first: usize, second: usize) -> Result<Value<S>, ContractionError>;
}

/// Differentiation with respect to a named parameter.
pub trait Differentiate {
    type Output;
    #[must_use]
    fn differentiate(&self, parameter: &str) -> Self::Output;
}
