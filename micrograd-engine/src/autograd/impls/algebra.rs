//! Operator surface: elementary ops and the composites built from them.
//!
//! Every operator comes in owned and borrowed forms; borrowed operands are
//! cloned into the new node. A raw number on either side is lifted to a
//! constant, so `x + 5.0` and `5.0 + x` build the same shape of tree.

use super::expr::Expr;
use crate::autograd::{BinaryOp, Exp, Operand, Pow, UnaryOp};
use std::ops::{Add, Div, Mul, Neg, Sub};

fn add<T: Operand>(x: Expr<T>, y: Expr<T>) -> Expr<T> {
    Expr::binary(BinaryOp::Add, x, y)
}

fn mul<T: Operand>(x: Expr<T>, y: Expr<T>) -> Expr<T> {
    Expr::binary(BinaryOp::Mul, x, y)
}

fn pow<T: Operand>(x: Expr<T>, y: Expr<T>) -> Expr<T> {
    Expr::binary(BinaryOp::Pow, x, y)
}

fn neg<T: Operand>(x: Expr<T>) -> Expr<T> {
    Expr::unary(UnaryOp::Neg, x)
}

/// `x + (-y)`
fn sub<T: Operand>(x: Expr<T>, y: Expr<T>) -> Expr<T> {
    add(x, neg(y))
}

/// `x * y^(-1)`
fn div<T: Operand>(x: Expr<T>, y: Expr<T>) -> Expr<T> {
    mul(x, pow(y, Expr::constant(-T::one())))
}

impl<T: Operand> Expr<T> {
    /// ReLU: `max(0, self)`. Local grad is 1 if `self > 0`, else 0.
    #[must_use]
    pub fn relu(&self) -> Expr<T> {
        Expr::unary(UnaryOp::Relu, self.clone())
    }

    /// Logistic sigmoid, built as `1 / (1 + exp(-self))`.
    #[must_use]
    pub fn logistic(&self) -> Expr<T> {
        let denominator = add(
            Expr::constant(T::one()),
            Expr::unary(UnaryOp::Exp, neg(self.clone())),
        );
        div(Expr::constant(T::one()), denominator)
    }
}

// -----------------------------------------------------------------------------
// std::ops: x + y, x - y, x * y, x / y, with nodes or raw numbers on the right
// -----------------------------------------------------------------------------

macro_rules! impl_binary_operator {
    ($trait:ident, $method:ident, $compose:ident) => {
        impl<T: Operand> $trait<Expr<T>> for Expr<T> {
            type Output = Expr<T>;

            fn $method(self, rhs: Expr<T>) -> Expr<T> {
                $compose(self, rhs)
            }
        }

        impl<T: Operand> $trait<&Expr<T>> for Expr<T> {
            type Output = Expr<T>;

            fn $method(self, rhs: &Expr<T>) -> Expr<T> {
                $compose(self, rhs.clone())
            }
        }

        impl<T: Operand> $trait<Expr<T>> for &Expr<T> {
            type Output = Expr<T>;

            fn $method(self, rhs: Expr<T>) -> Expr<T> {
                $compose(self.clone(), rhs)
            }
        }

        impl<T: Operand> $trait<&Expr<T>> for &Expr<T> {
            type Output = Expr<T>;

            fn $method(self, rhs: &Expr<T>) -> Expr<T> {
                $compose(self.clone(), rhs.clone())
            }
        }

        impl<T: Operand> $trait<T> for Expr<T> {
            type Output = Expr<T>;

            fn $method(self, rhs: T) -> Expr<T> {
                $compose(self, Expr::constant(rhs))
            }
        }

        impl<T: Operand> $trait<T> for &Expr<T> {
            type Output = Expr<T>;

            fn $method(self, rhs: T) -> Expr<T> {
                $compose(self.clone(), Expr::constant(rhs))
            }
        }
    };
}

impl_binary_operator!(Add, add, add);
impl_binary_operator!(Sub, sub, sub);
impl_binary_operator!(Mul, mul, mul);
impl_binary_operator!(Div, div, div);

// Raw number on the left. Coherence rules out a blanket impl over `T`, so the
// primitive float types are listed.
macro_rules! impl_scalar_lhs {
    ($trait:ident, $method:ident, $compose:ident; $($scalar:ty),+) => {
        $(
            impl $trait<Expr<$scalar>> for $scalar {
                type Output = Expr<$scalar>;

                fn $method(self, rhs: Expr<$scalar>) -> Expr<$scalar> {
                    $compose(Expr::constant(self), rhs)
                }
            }

            impl $trait<&Expr<$scalar>> for $scalar {
                type Output = Expr<$scalar>;

                fn $method(self, rhs: &Expr<$scalar>) -> Expr<$scalar> {
                    $compose(Expr::constant(self), rhs.clone())
                }
            }
        )+
    };
}

impl_scalar_lhs!(Add, add, add; f32, f64);
impl_scalar_lhs!(Sub, sub, sub; f32, f64);
impl_scalar_lhs!(Mul, mul, mul; f32, f64);
impl_scalar_lhs!(Div, div, div; f32, f64);

impl<T: Operand> Neg for Expr<T> {
    type Output = Expr<T>;

    fn neg(self) -> Expr<T> {
        neg(self)
    }
}

impl<T: Operand> Neg for &Expr<T> {
    type Output = Expr<T>;

    fn neg(self) -> Expr<T> {
        neg(self.clone())
    }
}

// -----------------------------------------------------------------------------
// Pow, Exp: x.pow(y), (&x).exp()
// -----------------------------------------------------------------------------

impl<T: Operand> Pow<Expr<T>> for Expr<T> {
    type Output = Expr<T>;

    fn pow(self, exp: Expr<T>) -> Expr<T> {
        pow(self, exp)
    }
}

impl<T: Operand> Pow<&Expr<T>> for Expr<T> {
    type Output = Expr<T>;

    fn pow(self, exp: &Expr<T>) -> Expr<T> {
        pow(self, exp.clone())
    }
}

impl<T: Operand> Pow<Expr<T>> for &Expr<T> {
    type Output = Expr<T>;

    fn pow(self, exp: Expr<T>) -> Expr<T> {
        pow(self.clone(), exp)
    }
}

impl<T: Operand> Pow<&Expr<T>> for &Expr<T> {
    type Output = Expr<T>;

    fn pow(self, exp: &Expr<T>) -> Expr<T> {
        pow(self.clone(), exp.clone())
    }
}

impl<T: Operand> Pow<T> for Expr<T> {
    type Output = Expr<T>;

    fn pow(self, exp: T) -> Expr<T> {
        pow(self, Expr::constant(exp))
    }
}

impl<T: Operand> Pow<T> for &Expr<T> {
    type Output = Expr<T>;

    fn pow(self, exp: T) -> Expr<T> {
        pow(self.clone(), Expr::constant(exp))
    }
}

// `Pow` is ours, so the raw-base form can be blanket over `T`.
impl<T: Operand> Pow<Expr<T>> for T {
    type Output = Expr<T>;

    fn pow(self, exp: Expr<T>) -> Expr<T> {
        pow(Expr::constant(self), exp)
    }
}

impl<T: Operand> Pow<&Expr<T>> for T {
    type Output = Expr<T>;

    fn pow(self, exp: &Expr<T>) -> Expr<T> {
        pow(Expr::constant(self), exp.clone())
    }
}

impl<T: Operand> Exp for Expr<T> {
    type Output = Expr<T>;

    fn exp(self) -> Expr<T> {
        Expr::unary(UnaryOp::Exp, self)
    }
}

impl<T: Operand> Exp for &Expr<T> {
    type Output = Expr<T>;

    fn exp(self) -> Expr<T> {
        Expr::unary(UnaryOp::Exp, self.clone())
    }
}
