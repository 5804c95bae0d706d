use std::{
    fmt::{Debug, Display},
    ops::{Add, Mul, Sub},
};

use num::{rational::Ratio, Integer, Signed};

/// The symbolic value every vector component and coefficient is built from.
///
/// Implementations are expected to be exact: [`Scalar::is_zero`] must be a
/// reliable test after [`Scalar::simplify`], since term cancellation in
/// [`crate::tensor::Tensor::compress`] depends on it.
pub trait Scalar:
    Clone + PartialEq + Debug + Display + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self>
{
    fn zero() -> Self;

    fn one() -> Self;

    /// The exact constant `numerator / denominator`. `denominator` is non-zero.
    fn from_ratio(numerator: i64, denominator: i64) -> Self;

    /// Bring the expression into a normal form.
    fn simplify(&self) -> Self;

    fn is_zero(&self) -> bool;

    fn is_one(&self) -> bool {
        self.simplify() == Self::one()
    }

    /// Derivative with respect to the parameter called `parameter`.
    fn derivative(&self, parameter: &str) -> Self;

    /// Math-mode typeset form, suitable for an equation environment.
    fn typeset(&self) -> String;
}

impl<T> Scalar for Ratio<T>
where
    T: Clone + Integer + Signed + Display + Debug + From<i64>,
{
    fn zero() -> Self {
        Ratio::from_integer(T::zero())
    }

    fn one() -> Self {
        Ratio::from_integer(T::one())
    }

    fn from_ratio(numerator: i64, denominator: i64) -> Self {
        Ratio::new(T::from(numerator), T::from(denominator))
    }

    fn simplify(&self) -> Self {
        self.clone()
    }

    fn is_zero(&self) -> bool {
        self.numer().is_zero()
    }

    // constants
    fn derivative(&self, _parameter: &str) -> Self {
        Self::zero()
    }

    fn typeset(&self) -> String {
        if self.is_integer() {
            return self.numer().to_string();
        }
        let sign = if self.numer().is_negative() { "-" } else { "" };
        format!(
            r"{sign}\frac{{{}}}{{{}}}",
            self.numer().abs(),
            self.denom()
        )
    }
}

/// Simplified sum, the zero scalar for an empty iterator.
pub fn sum<S: Scalar>(terms: impl IntoIterator<Item = S>) -> S {
    terms
        .into_iter()
        .fold(S::zero(), |acc, term| acc + term)
        .simplify()
}

/// Simplified product, the unit scalar for an empty iterator.
pub fn product<S: Scalar>(factors: impl IntoIterator<Item = S>) -> S {
    factors
        .into_iter()
        .fold(S::one(), |acc, factor| acc * factor)
        .simplify()
}

/// `1 / n!` as an exact scalar.
///
/// Built factor by factor, so `n!` itself never has to fit in an `i64`. Whether the
/// result does is up to the scalar: `Rational64` overflows past `n = 20`,
/// `BigRational` and symbolica atoms do not.
pub fn inverse_factorial<S: Scalar>(n: usize) -> S {
    product((1..=n as i64).map(|k| S::from_ratio(1, k)))
}
