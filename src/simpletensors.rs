/*!

Symbolic vectors, tensor products and tensors over an abstract scalar type.

A [`Vector`] is a named tuple of scalars. Vectors are combined into
[`TensorProduct`]s, single terms `c · v_1 ⊗ … ⊗ v_n` that may be flagged as
symmetrized, and those are summed into [`Tensor`]s of a common rank.

All of them can be
- fully contracted into a scalar with the [`Contract`] trait,
- traced over two slots with [`Trace`],
- differentiated with respect to a named parameter with [`Differentiate`],
- rendered as plain text through [`std::fmt::Display`] or as math markup through [`Typeset`].

Operations mixing kinds take an [`Operand`] and return a [`Value`], already
compressed: terms with the same basis element are merged, cancelled terms are
dropped, and results without any vector slot left collapse to a scalar.

The scalar type is anything implementing [`Scalar`]. Exact rationals from
[`num`] work out of the box; with the `shadowing` feature, symbolica atoms do
too, and carry the parameter dependence needed for non-trivial derivatives.

*/

/// Contraction, trace and differentiation traits, and their error type
pub mod contraction;
/// Delimiters and derivative names
pub mod naming;
/// Tagged operands and results
pub mod operand;
/// Permutations used by symmetric contraction
pub mod permutation;
/// Single-term tensor products
pub mod product;
/// The scalar capability
pub mod scalar;
/// Sums of tensor products
pub mod tensor;
/// Named vectors of scalars
pub mod vector;

/// Symbolica atoms as scalars
#[cfg(feature = "shadowing")]
pub mod shadowing;

pub use contraction::{Contract, ContractionError, Differentiate, Trace};
pub use naming::Typeset;
pub use operand::{Operand, Value};
pub use product::TensorProduct;
pub use scalar::Scalar;
pub use tensor::Tensor;
pub use vector::Vector;

#[cfg(test)]
mod tests;
