//! The numeric types an expression can be built over.

use num_traits::Float;
use std::fmt::{Debug, Display};

/// A scalar that expressions are built over.
///
/// Any floating point type convertible to `f64` qualifies, which covers `f32`
/// and `f64`. Other numeric types are rejected when the expression is built:
///
/// ```compile_fail
/// use micrograd_engine::autograd::Expr;
///
/// let x = Expr::leaf(3_i32);
/// ```
pub trait Operand: Float + Into<f64> + Debug + Display + 'static {
    /// Converts from `f64`, or `None` if the value has no representation in `Self`.
    #[must_use]
    fn from_real(value: f64) -> Option<Self> {
        num_traits::cast(value)
    }

    /// Widens to `f64`.
    #[must_use]
    fn to_real(self) -> f64 {
        self.into()
    }
}

impl<T> Operand for T where T: Float + Into<f64> + Debug + Display + 'static {}
