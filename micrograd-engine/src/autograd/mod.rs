//! Autograd: scalar expression trees with reverse-mode differentiation.
//!
//! Every operator call builds a new [`Expr`] node and evaluates it on the spot.
//! Operands are owned by value, so an expression is always a tree: a leaf used
//! twice ends up as two copies that share a [`LeafId`] but accumulate their
//! gradients separately. [`Expr::backward`] seeds the root and pushes the
//! gradient down to every leaf; [`Expr::grad_of`] sums the copies of one leaf.
//!
//! ```
//! use micrograd_engine::autograd::{Exp, Expr, GradNode};
//!
//! let x1 = Expr::leaf(2.0_f64);
//! let x2 = Expr::leaf(4.0_f64);
//! let mut y = (&x1 * &x2).exp();
//! y.backward();
//! assert!((y.value() - 8.0_f64.exp()).abs() < 1e-9);
//! assert!((y.grad_of(&x1).unwrap() - 4.0 * 8.0_f64.exp()).abs() < 1e-9);
//! ```

pub mod impls;
pub mod ops;
pub mod operand;

pub use impls::expr::{Expr, LeafId, NodeKind};
pub use operand::Operand;
pub use ops::{BinaryOp, UnaryOp};

/// Trait for raising a node to a power (e.g. `x.pow(2.0)` or `2.0.pow(x)`).
pub trait Pow<Rhs> {
    /// Result of the power operation.
    type Output;

    /// Returns `self^exp` with gradient tracking on both sides.
    #[must_use]
    fn pow(self, exp: Rhs) -> Self::Output;
}

/// Trait for the exponential of a node (e.g. `(&a).exp()`).
pub trait Exp {
    /// Result of the exponential.
    type Output;

    /// Returns `exp(self)` with gradient tracking.
    #[must_use]
    fn exp(self) -> Self::Output;
}

/// Per-node gradient protocol.
///
/// A node exposes its forward value, an optional gradient accumulator, and a
/// single-level propagation step. Constants have no gradient: `grad` returns
/// `None` and the mutating methods do nothing.
pub trait GradNode<T: Operand> {
    /// Forward value, computed once when the node was built.
    fn value(&self) -> T;

    /// Accumulated gradient, or `None` for constants.
    fn grad(&self) -> Option<T>;

    /// Adds `delta` to the gradient.
    fn accumulate(&mut self, delta: T);

    /// Sets the gradient back to zero.
    fn reset(&mut self);

    /// Pushes the current gradient one level down into the operands.
    ///
    /// Does not recurse: operands must be propagated afterwards, each node
    /// after all of its consumers.
    fn propagate_local(&mut self);
}
