use std::fmt::{self, Display};

use bitvec::vec::BitVec;
use log::trace;

use crate::{
    contraction::{Contract, ContractionError, Differentiate, Trace},
    naming::{delimit, Typeset, OTIMES, OTIMES_SYMMETRIC},
    operand::{Operand, Value},
    permutation::{ordered_pairs, Permutation},
    scalar::{self, inverse_factorial, Scalar},
    tensor::Tensor,
    vector::Vector,
};

/// A single term of a tensor: `coefficient · v_1 ⊗ … ⊗ v_n`.
///
/// Symmetric products compare, contract and trace as if averaged over every
/// ordering of their vectors. The vectors themselves stay in the order they
/// were given, which is also the order they render in.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorProduct<S> {
    pub(crate) vectors: Vec<Vector<S>>,
    pub(crate) coefficient: S,
    pub(crate) symmetric: bool,
}

impl<S: Scalar> TensorProduct<S> {
    pub fn new(vectors: Vec<Vector<S>>) -> Self {
        TensorProduct {
            vectors,
            coefficient: S::one(),
            symmetric: false,
        }
    }

    pub fn new_symmetric(vectors: Vec<Vector<S>>) -> Self {
        TensorProduct {
            vectors,
            coefficient: S::one(),
            symmetric: true,
        }
    }

    #[must_use]
    pub fn with_coefficient(self, coefficient: S) -> Self {
        TensorProduct {
            coefficient: coefficient.simplify(),
            ..self
        }
    }

    #[must_use]
    pub fn with_symmetry(self, symmetric: bool) -> Self {
        TensorProduct { symmetric, ..self }
    }

    pub fn rank(&self) -> usize {
        self.vectors.len()
    }

    pub fn vectors(&self) -> &[Vector<S>] {
        &self.vectors
    }

    pub fn coefficient(&self) -> &S {
        &self.coefficient
    }

    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vector<S>> {
        self.vectors.iter()
    }

    /// Whether `other` multiplies the same basis element, whatever its coefficient.
    ///
    /// For a symmetric product the vectors are compared as a multiset.
    pub fn has_same_basis_element(&self, other: &TensorProduct<S>) -> bool {
        if !self.symmetric {
            return self.vectors == other.vectors;
        }
        if self.rank() != other.rank() {
            return false;
        }
        let mut matched: BitVec = BitVec::repeat(false, other.rank());
        self.vectors.iter().all(|v| {
            let found = (0..other.rank()).find(|&i| !matched[i] && other.vectors[i] == *v);
            match found {
                Some(i) => {
                    matched.set(i, true);
                    true
                }
                None => false,
            }
        })
    }

    /// The vectors in the order given by `permutation`.
    pub fn ordered_as<'a>(
        &'a self,
        permutation: &'a Permutation,
    ) -> impl Iterator<Item = &'a Vector<S>> + 'a {
        permutation.map().iter().map(move |&i| &self.vectors[i])
    }

    /// `self ⊗ other`, keeping the symmetry of `self`.
    pub fn multiply(&self, other: &Operand<S>) -> Value<S> {
        self.product_with(other, false)
    }

    /// `other ⊗ self`, keeping the symmetry of `self`.
    pub fn premultiply(&self, other: &Operand<S>) -> Value<S> {
        self.product_with(other, true)
    }

    pub fn add(&self, other: &Operand<S>) -> Result<Value<S>, ContractionError> {
        Tensor::from_terms_unchecked(vec![self.clone()]).add(other)
    }

    fn product_with(&self, other: &Operand<S>, reflected: bool) -> Value<S> {
        match other {
            Operand::Scalar(s) => {
                let coefficient = if reflected {
                    s.clone() * self.coefficient.clone()
                } else {
                    self.coefficient.clone() * s.clone()
                };
                Value::from_product(self.clone().with_coefficient(coefficient))
            }
            Operand::Vector(v) => {
                let mut vectors = self.vectors.clone();
                if reflected {
                    vectors.insert(0, v.clone());
                } else {
                    vectors.push(v.clone());
                }
                Value::from_product(TensorProduct {
                    vectors,
                    coefficient: self.coefficient.clone(),
                    symmetric: self.symmetric,
                })
            }
            Operand::Product(p) => Value::from_product(self.concat(p, reflected)),
            Operand::Tensor(t) => {
                let this = Operand::Product(self.clone());
                if reflected {
                    t.multiply(&this)
                } else {
                    t.premultiply(&this)
                }
            }
        }
    }

    /// Tensor product with another term, no zero or rank-0 bookkeeping.
    pub(crate) fn concat(&self, other: &TensorProduct<S>, reflected: bool) -> TensorProduct<S> {
        let (first, second) = if reflected {
            (other, self)
        } else {
            (self, other)
        };
        let mut vectors = Vec::with_capacity(self.rank() + other.rank());
        vectors.extend(first.vectors.iter().cloned());
        vectors.extend(second.vectors.iter().cloned());
        TensorProduct {
            vectors,
            coefficient: (first.coefficient.clone() * second.coefficient.clone()).simplify(),
            symmetric: self.symmetric,
        }
    }

    fn without_slots(&self, first: usize, second: usize) -> Vec<Vector<S>> {
        self.vectors
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != first && *i != second)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// Terms of the derivative, expanded by the product rule over the
    /// coefficient and every slot. Vanishing terms are left out.
    pub(crate) fn product_rule_terms(&self, parameter: &str) -> Vec<TensorProduct<S>> {
        let mut terms = Vec::new();

        let coefficient = self.coefficient.derivative(parameter).simplify();
        if !coefficient.is_zero() {
            terms.push(TensorProduct {
                vectors: self.vectors.clone(),
                coefficient,
                symmetric: self.symmetric,
            });
        }

        for (slot, v) in self.vectors.iter().enumerate() {
            let derivative = v.differentiate(parameter);
            if derivative.is_zero() {
                continue;
            }
            let mut vectors = self.vectors.clone();
            vectors[slot] = derivative;
            terms.push(TensorProduct {
                vectors,
                coefficient: self.coefficient.clone(),
                symmetric: self.symmetric,
            });
        }
        terms
    }

    fn dots<'a>(
        left: impl Iterator<Item = &'a Vector<S>>,
        right: impl Iterator<Item = &'a Vector<S>>,
    ) -> Result<S, ContractionError>
    where
        S: 'a,
    {
        let dots = left
            .zip(right)
            .map(|(v, w)| v.dot(w))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(scalar::product(dots))
    }
}

impl<S: Scalar> From<Vector<S>> for TensorProduct<S> {
    fn from(value: Vector<S>) -> Self {
        TensorProduct::new(vec![value])
    }
}

impl<S: Scalar> Contract for TensorProduct<S> {
    type LCM = S;

    fn contract(&self, other: &Self) -> Result<S, ContractionError> {
        ContractionError::check_rank(self.rank(), other.rank())?;

        if !self.symmetric {
            let coefficient = self.coefficient.clone() * other.coefficient.clone();
            return Ok((coefficient * Self::dots(self.iter(), other.iter())?).simplify());
        }

        // Averaging over orderings of `self` alone is enough.
        let Some(orderings) = Permutation::all(self.rank()) else {
            return Err(ContractionError::TooManyOrderings { rank: self.rank() });
        };
        let coefficient = (self.coefficient.clone()
            * other.coefficient.clone()
            * inverse_factorial(self.rank()))
        .simplify();
        if coefficient.is_zero() {
            return Ok(S::zero());
        }
        trace!("symmetric contraction over {}! orderings", self.rank());
        let orderings = orderings
            .map(|p| Self::dots(self.ordered_as(&p), other.iter()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((coefficient * scalar::sum(orderings)).simplify())
    }
}

impl<S: Scalar> Contract<Tensor<S>> for TensorProduct<S> {
    type LCM = S;

    fn contract(&self, other: &Tensor<S>) -> Result<S, ContractionError> {
        if other.is_empty() {
            return Ok(S::zero());
        }
        ContractionError::check_rank(self.rank(), other.rank())?;
        let terms = other
            .iter()
            .map(|t| self.contract(t))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(scalar::sum(terms))
    }
}

impl<S: Scalar> Contract<Operand<S>> for TensorProduct<S> {
    type LCM = S;

    fn contract(&self, other: &Operand<S>) -> Result<S, ContractionError> {
        match other {
            Operand::Product(p) => self.contract(p),
            Operand::Tensor(t) => self.contract(t),
            _ => Err(ContractionError::UnsupportedOperand {
                operation: "contract",
                left: "tensor product",
                right: other.kind(),
            }),
        }
    }
}

impl<S: Scalar> Trace<S> for TensorProduct<S> {
    fn trace(&self, first: usize, second: usize) -> Result<Value<S>, ContractionError> {
        ContractionError::check_slots(first, second, self.rank())?;

        if self.rank() == 2 {
            let dot = self.vectors[first].dot(&self.vectors[second])?;
            return Ok(Value::Scalar((self.coefficient.clone() * dot).simplify()));
        }

        if !self.symmetric {
            let dot = self.vectors[first].dot(&self.vectors[second])?;
            return Ok(Value::from_product(TensorProduct {
                vectors: self.without_slots(first, second),
                coefficient: (self.coefficient.clone() * dot).simplify(),
                symmetric: false,
            }));
        }

        // Symmetric: the requested slots are irrelevant, every pair contributes.
        let normalization: S = inverse_factorial(self.rank());
        let mut terms = Vec::new();
        for (j, k) in ordered_pairs(self.rank()) {
            let dot = self.vectors[j].dot(&self.vectors[k])?;
            let coefficient =
                (self.coefficient.clone() * dot * normalization.clone()).simplify();
            if coefficient.is_zero() {
                trace!("slots ({j}, {k}) trace to zero");
                continue;
            }
            terms.push(TensorProduct {
                vectors: self.without_slots(j, k),
                coefficient,
                symmetric: true,
            });
        }
        Ok(Tensor::from_terms_unchecked(terms).compress())
    }
}

impl<S: Scalar> Differentiate for TensorProduct<S> {
    type Output = Value<S>;

    fn differentiate(&self, parameter: &str) -> Value<S> {
        Tensor::from_terms_unchecked(self.product_rule_terms(parameter)).compress()
    }
}

impl<'a, S> IntoIterator for &'a TensorProduct<S> {
    type Item = &'a Vector<S>;
    type IntoIter = std::slice::Iter<'a, Vector<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.vectors.iter()
    }
}

impl<S: Scalar> Display for TensorProduct<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.vectors.is_empty() {
            return write!(f, "{}", self.coefficient);
        }
        let vectors = self
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("*");
        if self.coefficient.is_one() {
            return f.write_str(&delimit(&vectors, false));
        }
        let coefficient = delimit(&self.coefficient.to_string(), false);
        f.write_str(&delimit(&format!("{coefficient}*{vectors}"), false))
    }
}

impl<S: Scalar> Typeset for TensorProduct<S> {
    fn typeset(&self) -> String {
        if self.vectors.is_empty() {
            return self.coefficient.typeset();
        }
        let glyph = if self.symmetric {
            OTIMES_SYMMETRIC
        } else {
            OTIMES
        };
        let vectors = self
            .iter()
            .map(Typeset::typeset)
            .collect::<Vec<_>>()
            .join(glyph);
        if self.coefficient.is_one() {
            return delimit(&vectors, true);
        }
        let coefficient = delimit(&self.coefficient.typeset(), true);
        delimit(&format!(r"{coefficient}\, {vectors}"), true)
    }
}
