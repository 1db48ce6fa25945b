//! Elementary operations: forward formula paired with analytic partial derivatives.
//!
//! The catalog is closed. Composite operators (subtraction, division,
//! logistic) are built from these in [`crate::autograd::impls::algebra`].

use super::Operand;
use std::fmt;

/// Elementary unary operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `e^x`
    Exp,
    /// `max(x, 0)`
    Relu,
    /// `-x`
    Neg,
}

impl UnaryOp {
    /// Evaluates the operation at `x`.
    #[must_use]
    pub fn forward<T: Operand>(self, x: T) -> T {
        match self {
            UnaryOp::Exp => x.exp(),
            UnaryOp::Relu => {
                if x > T::zero() {
                    x
                } else {
                    T::zero()
                }
            }
            UnaryOp::Neg => -x,
        }
    }

    /// Derivative with respect to `x`, evaluated at `x`.
    #[must_use]
    pub fn dx<T: Operand>(self, x: T) -> T {
        match self {
            UnaryOp::Exp => x.exp(),
            UnaryOp::Relu => {
                if x > T::zero() {
                    T::one()
                } else {
                    T::zero()
                }
            }
            UnaryOp::Neg => -T::one(),
        }
    }

    /// Short lowercase name (e.g. `"exp"`).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Exp => "exp",
            UnaryOp::Relu => "relu",
            UnaryOp::Neg => "neg",
        }
    }
}

/// Elementary binary operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `x + y`
    Add,
    /// `x * y`
    Mul,
    /// `x^y`
    Pow,
}

impl BinaryOp {
    /// Evaluates the operation at `(x, y)`.
    #[must_use]
    pub fn forward<T: Operand>(self, x: T, y: T) -> T {
        match self {
            BinaryOp::Add => x + y,
            BinaryOp::Mul => x * y,
            BinaryOp::Pow => x.powf(y),
        }
    }

    /// Partial derivative with respect to `x`.
    #[must_use]
    pub fn dx<T: Operand>(self, x: T, y: T) -> T {
        match self {
            BinaryOp::Add => T::one(),
            BinaryOp::Mul => y,
            BinaryOp::Pow => y * x.powf(y - T::one()),
        }
    }

    /// Partial derivative with respect to `y`.
    ///
    /// For [`BinaryOp::Pow`] this is `ln(x) * x^y`; a non-positive base gives
    /// whatever `ln` gives (NaN or -inf).
    #[must_use]
    pub fn dy<T: Operand>(self, x: T, y: T) -> T {
        match self {
            BinaryOp::Add => T::one(),
            BinaryOp::Mul => x,
            BinaryOp::Pow => x.ln() * x.powf(y),
        }
    }

    /// Short lowercase name (e.g. `"mul"`).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Mul => "mul",
            BinaryOp::Pow => "pow",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exp_forward_and_derivative_agree() {
        for x in [-1.5_f64, 0.0, 0.25, 3.0] {
            assert_relative_eq!(UnaryOp::Exp.forward(x), x.exp());
            assert_relative_eq!(UnaryOp::Exp.dx(x), x.exp());
        }
    }

    #[test]
    fn relu_is_zero_at_and_below_origin() {
        assert_eq!(UnaryOp::Relu.forward(-2.0_f64), 0.0);
        assert_eq!(UnaryOp::Relu.forward(0.0_f64), 0.0);
        assert_eq!(UnaryOp::Relu.forward(0.5_f64), 0.5);
        assert_eq!(UnaryOp::Relu.dx(-2.0_f64), 0.0);
        assert_eq!(UnaryOp::Relu.dx(0.0_f64), 0.0);
        assert_eq!(UnaryOp::Relu.dx(0.5_f64), 1.0);
    }

    #[test]
    fn neg_has_constant_slope() {
        assert_eq!(UnaryOp::Neg.forward(3.0_f32), -3.0);
        assert_eq!(UnaryOp::Neg.forward(-0.5_f32), 0.5);
        assert_eq!(UnaryOp::Neg.dx(123.0_f32), -1.0);
    }

    #[test]
    fn add_and_mul_partials() {
        assert_eq!(BinaryOp::Add.forward(2.0_f64, -3.0), -1.0);
        assert_eq!(BinaryOp::Add.dx(2.0_f64, -3.0), 1.0);
        assert_eq!(BinaryOp::Add.dy(2.0_f64, -3.0), 1.0);
        assert_eq!(BinaryOp::Mul.forward(2.0_f64, -3.0), -6.0);
        assert_eq!(BinaryOp::Mul.dx(2.0_f64, -3.0), -3.0);
        assert_eq!(BinaryOp::Mul.dy(2.0_f64, -3.0), 2.0);
    }

    #[test]
    fn pow_partials() {
        assert_relative_eq!(BinaryOp::Pow.forward(2.0_f64, 4.0), 16.0);
        // d/dx x^4 = 4x^3
        assert_relative_eq!(BinaryOp::Pow.dx(2.0_f64, 4.0), 32.0);
        // d/dy 2^y = ln 2 * 2^y
        assert_relative_eq!(BinaryOp::Pow.dy(2.0_f64, 4.0), 2.0_f64.ln() * 16.0);
        assert_relative_eq!(BinaryOp::Pow.forward(4.0_f64, 0.5), 2.0);
    }

    #[test]
    fn pow_dy_with_negative_base_is_nan() {
        assert!(BinaryOp::Pow.dy(-2.0_f64, 2.0).is_nan());
    }

    #[test]
    fn names() {
        assert_eq!(UnaryOp::Relu.to_string(), "relu");
        assert_eq!(BinaryOp::Pow.to_string(), "pow");
    }
}
