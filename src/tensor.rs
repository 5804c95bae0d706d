use std::fmt::{self, Display};

use delegate::delegate;
use log::trace;

use crate::{
    contraction::{Contract, ContractionError, Differentiate, Trace},
    naming::{delimit, Typeset},
    operand::{Operand, Value},
    product::TensorProduct,
    scalar::{self, Scalar},
};

/// Separator between the typeset terms of a tensor, breaking the line inside an `align` environment.
const TYPESET_TERM_SEPARATOR: &str = r" \right. \nonumber \\&\quad \left. + ";

/// A sum of tensor products of one common rank.
///
/// Values returned by the operations of this type are always compressed: no
/// two terms share a basis element and no coefficient is zero. A tensor with
/// no terms left is returned as the scalar zero instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<S> {
    terms: Vec<TensorProduct<S>>,
}

impl<S: Scalar> Tensor<S> {
    /// Checks that every term has the same rank. The terms are kept as given.
    ///
    /// A tensor without terms stands for the scalar zero: it adds, contracts and
    /// traces as zero.
    pub fn new(terms: Vec<TensorProduct<S>>) -> Result<Self, ContractionError> {
        if let Some(first) = terms.first() {
            for t in &terms[1..] {
                ContractionError::check_rank(first.rank(), t.rank())?;
            }
        }
        Ok(Tensor { terms })
    }

    /// Sum the terms into a compressed tensor.
    pub fn sum(
        terms: impl IntoIterator<Item = TensorProduct<S>>,
    ) -> Result<Value<S>, ContractionError> {
        Ok(Self::new(terms.into_iter().collect())?.compress())
    }

    pub(crate) fn from_terms_unchecked(terms: Vec<TensorProduct<S>>) -> Self {
        Tensor { terms }
    }

    pub fn terms(&self) -> &[TensorProduct<S>] {
        &self.terms
    }

    delegate! {
        to self.terms {
            pub fn len(&self) -> usize;
            pub fn is_empty(&self) -> bool;
            pub fn iter(&self) -> std::slice::Iter<'_, TensorProduct<S>>;
        }
    }

    pub fn rank(&self) -> usize {
        self.terms.first().map_or(0, TensorProduct::rank)
    }

    /// Merge terms with the same basis element and drop those that cancel.
    ///
    /// Merged terms keep the position of their first occurrence. The result
    /// is built from fresh copies, so tensors sharing terms with `self` are
    /// unaffected.
    pub fn compress(&self) -> Value<S> {
        let mut merged: Vec<TensorProduct<S>> = Vec::with_capacity(self.terms.len());
        for term in &self.terms {
            match merged
                .iter_mut()
                .find(|m| m.has_same_basis_element(term))
            {
                Some(m) => {
                    trace!("merging {term} into {m}");
                    m.coefficient = (m.coefficient.clone() + term.coefficient.clone()).simplify();
                }
                None => merged.push(term.clone()),
            }
        }

        let kept: Vec<_> = merged
            .into_iter()
            .filter(|t| {
                let cancelled = t.coefficient.is_zero();
                if cancelled {
                    trace!("dropping cancelled term {t}");
                }
                !cancelled
            })
            .collect();

        if kept.is_empty() {
            return Value::Scalar(S::zero());
        }
        if kept[0].rank() == 0 {
            return Value::Scalar(scalar::sum(kept.into_iter().map(|t| t.coefficient)));
        }
        Value::Tensor(Tensor { terms: kept })
    }

    pub fn add(&self, other: &Operand<S>) -> Result<Value<S>, ContractionError> {
        let mut terms = self.terms.clone();
        match other {
            Operand::Scalar(s) if s.is_zero() => {}
            Operand::Scalar(s) if self.is_empty() => return Ok(Value::Scalar(s.simplify())),
            Operand::Scalar(_) => {
                return Err(ContractionError::RankMismatch {
                    left: self.rank(),
                    right: 0,
                })
            }
            Operand::Vector(_) => {
                return Err(ContractionError::UnsupportedOperand {
                    operation: "add",
                    left: "tensor",
                    right: other.kind(),
                })
            }
            Operand::Product(p) => {
                if !self.is_empty() {
                    ContractionError::check_rank(self.rank(), p.rank())?;
                }
                terms.push(p.clone());
            }
            Operand::Tensor(t) => {
                if !self.is_empty() && !t.is_empty() {
                    ContractionError::check_rank(self.rank(), t.rank())?;
                }
                terms.extend(t.terms.iter().cloned());
            }
        }
        Ok(Tensor { terms }.compress())
    }

    /// `self · other`, distributed over the terms of both sides.
    pub fn multiply(&self, other: &Operand<S>) -> Value<S> {
        self.distribute(other, false)
    }

    /// `other · self`, distributed over the terms of both sides.
    pub fn premultiply(&self, other: &Operand<S>) -> Value<S> {
        self.distribute(other, true)
    }

    fn distribute(&self, other: &Operand<S>, reflected: bool) -> Value<S> {
        let terms: Vec<TensorProduct<S>> = match other {
            Operand::Tensor(t) => self
                .terms
                .iter()
                .flat_map(|a| {
                    t.terms.iter().map(move |b| {
                        if reflected {
                            b.concat(a, false)
                        } else {
                            a.concat(b, false)
                        }
                    })
                })
                .collect(),
            // The left factor decides the symmetry, as for a product times a product.
            Operand::Product(p) => self
                .terms
                .iter()
                .map(|a| {
                    if reflected {
                        p.concat(a, false)
                    } else {
                        a.concat(p, false)
                    }
                })
                .collect(),
            Operand::Vector(v) => {
                let p = TensorProduct::from(v.clone());
                self.terms.iter().map(|a| a.concat(&p, reflected)).collect()
            }
            Operand::Scalar(s) => self
                .terms
                .iter()
                .map(|a| {
                    let coefficient = if reflected {
                        s.clone() * a.coefficient.clone()
                    } else {
                        a.coefficient.clone() * s.clone()
                    };
                    a.clone().with_coefficient(coefficient)
                })
                .collect(),
        };
        Tensor { terms }.compress()
    }
}

impl<S: Scalar> Contract for Tensor<S> {
    type LCM = S;

    fn contract(&self, other: &Self) -> Result<S, ContractionError> {
        if self.is_empty() || other.is_empty() {
            return Ok(S::zero());
        }
        ContractionError::check_rank(self.rank(), other.rank())?;
        let mut pairs = Vec::with_capacity(self.len() * other.len());
        for a in &self.terms {
            for b in &other.terms {
                pairs.push(a.contract(b)?);
            }
        }
        Ok(scalar::sum(pairs))
    }
}

impl<S: Scalar> Contract<TensorProduct<S>> for Tensor<S> {
    type LCM = S;

    fn contract(&self, other: &TensorProduct<S>) -> Result<S, ContractionError> {
        if self.is_empty() {
            return Ok(S::zero());
        }
        ContractionError::check_rank(self.rank(), other.rank())?;
        let terms = self
            .terms
            .iter()
            .map(|a| a.contract(other))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(scalar::sum(terms))
    }
}

impl<S: Scalar> Contract<Operand<S>> for Tensor<S> {
    type LCM = S;

    fn contract(&self, other: &Operand<S>) -> Result<S, ContractionError> {
        match other {
            Operand::Product(p) => self.contract(p),
            Operand::Tensor(t) => self.contract(t),
            _ => Err(ContractionError::UnsupportedOperand {
                operation: "contract",
                left: "tensor",
                right: other.kind(),
            }),
        }
    }
}

impl<S: Scalar> Trace<S> for Tensor<S> {
    fn trace(&self, first: usize, second: usize) -> Result<Value<S>, ContractionError> {
        if self.is_empty() {
            return Ok(Value::Scalar(S::zero()));
        }
        ContractionError::check_slots(first, second, self.rank())?;

        let mut scalars = Vec::new();
        let mut terms = Vec::new();
        for term in &self.terms {
            match term.trace(first, second)? {
                Value::Scalar(s) => scalars.push(s),
                Value::Product(p) => terms.push(p),
                Value::Tensor(t) => terms.extend(t.terms),
            }
        }

        if terms.is_empty() {
            return Ok(Value::Scalar(scalar::sum(scalars)));
        }
        // Only cancelled terms come back as scalars once the rank is above zero.
        let leftover = scalar::sum(scalars);
        if !leftover.is_zero() {
            return Err(ContractionError::RankMismatch {
                left: terms[0].rank(),
                right: 0,
            });
        }
        Ok(Tensor::new(terms)?.compress())
    }
}

impl<S: Scalar> Differentiate for Tensor<S> {
    type Output = Value<S>;

    /// Product rule over every term, see [`TensorProduct::differentiate`].
    fn differentiate(&self, parameter: &str) -> Value<S> {
        let terms = self
            .terms
            .iter()
            .flat_map(|t| t.product_rule_terms(parameter))
            .collect();
        Tensor { terms }.compress()
    }
}

impl<'a, S> IntoIterator for &'a Tensor<S> {
    type Item = &'a TensorProduct<S>;
    type IntoIter = std::slice::Iter<'a, TensorProduct<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

impl<S: Scalar> Display for Tensor<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let terms = self
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" + ");
        f.write_str(&delimit(&terms, false))
    }
}

impl<S: Scalar> Typeset for Tensor<S> {
    fn typeset(&self) -> String {
        let terms = self
            .iter()
            .map(Typeset::typeset)
            .collect::<Vec<_>>()
            .join(TYPESET_TERM_SEPARATOR);
        format!("&{}", delimit(&terms, true))
    }

    fn typeset_display(&self) -> String {
        format!(r"\begin{{align}}{}\end{{align}}", self.typeset())
    }
}
