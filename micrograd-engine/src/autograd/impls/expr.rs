//! Expression nodes: owned trees of eagerly evaluated scalars.

use crate::autograd::{BinaryOp, GradNode, Operand, UnaryOp};
use log::trace;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LEAF_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a leaf variable, shared by every copy of it inside a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeafId(u64);

impl LeafId {
    fn next() -> Self {
        LeafId(NEXT_LEAF_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// What kind of node an [`Expr`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Non-differentiable value.
    Constant,
    /// Differentiable input.
    Leaf,
    /// Result of a unary operation.
    Unary(UnaryOp),
    /// Result of a binary operation.
    Binary(BinaryOp),
}

#[derive(Debug)]
enum Node<T: Operand> {
    Constant {
        value: T,
    },
    Leaf {
        id: LeafId,
        value: T,
        grad: T,
    },
    Unary {
        value: T,
        grad: T,
        op: UnaryOp,
        x: Box<Expr<T>>,
    },
    Binary {
        value: T,
        grad: T,
        op: BinaryOp,
        x: Box<Expr<T>>,
        y: Box<Expr<T>>,
    },
}

/// A node in a scalar expression tree.
///
/// The value is computed when the node is built and never changes. Composite
/// nodes own full copies of their operands, so building `&x * &x` copies `x`
/// twice; both copies keep `x`'s [`LeafId`].
///
/// Cloning, dropping and backprop walk the tree with an explicit work list,
/// so tree depth is bounded by memory, not by the call stack. `Debug` output
/// still recurses.
#[derive(Debug)]
pub struct Expr<T: Operand> {
    node: Node<T>,
}

impl<T: Operand> Expr<T> {
    /// Creates a differentiable leaf with zero gradient and a fresh [`LeafId`].
    #[must_use]
    pub fn leaf(value: T) -> Self {
        Expr {
            node: Node::Leaf {
                id: LeafId::next(),
                value,
                grad: T::zero(),
            },
        }
    }

    /// Creates a constant. Constants never hold a gradient.
    #[must_use]
    pub fn constant(value: T) -> Self {
        Expr {
            node: Node::Constant { value },
        }
    }

    /// Applies a unary operation, evaluating it immediately.
    #[must_use]
    pub fn unary(op: UnaryOp, x: Expr<T>) -> Self {
        Expr {
            node: Node::Unary {
                value: op.forward(x.value()),
                grad: T::zero(),
                op,
                x: Box::new(x),
            },
        }
    }

    /// Applies a binary operation, evaluating it immediately.
    #[must_use]
    pub fn binary(op: BinaryOp, x: Expr<T>, y: Expr<T>) -> Self {
        Expr {
            node: Node::Binary {
                value: op.forward(x.value(), y.value()),
                grad: T::zero(),
                op,
                x: Box::new(x),
                y: Box::new(y),
            },
        }
    }

    /// Which variant this node is.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match &self.node {
            Node::Constant { .. } => NodeKind::Constant,
            Node::Leaf { .. } => NodeKind::Leaf,
            Node::Unary { op, .. } => NodeKind::Unary(*op),
            Node::Binary { op, .. } => NodeKind::Binary(*op),
        }
    }

    /// The leaf identity, if this node is a leaf.
    #[must_use]
    pub fn leaf_id(&self) -> Option<LeafId> {
        match &self.node {
            Node::Leaf { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Direct operands, left to right.
    pub fn operands(&self) -> impl Iterator<Item = &Expr<T>> {
        let (x, y) = match &self.node {
            Node::Constant { .. } | Node::Leaf { .. } => (None, None),
            Node::Unary { x, .. } => (Some(x.as_ref()), None),
            Node::Binary { x, y, .. } => (Some(x.as_ref()), Some(y.as_ref())),
        };
        x.into_iter().chain(y)
    }

    /// Direct operands, mutably. Used to drive [`GradNode::propagate_local`] by hand.
    pub fn operands_mut(&mut self) -> impl Iterator<Item = &mut Expr<T>> {
        let (x, y) = match &mut self.node {
            Node::Constant { .. } | Node::Leaf { .. } => (None, None),
            Node::Unary { x, .. } => (Some(x.as_mut()), None),
            Node::Binary { x, y, .. } => (Some(x.as_mut()), Some(y.as_mut())),
        };
        x.into_iter().chain(y)
    }

    /// Copies this node alone; operands become constant placeholders.
    fn shallow_clone(&self) -> Self {
        let node = match &self.node {
            Node::Constant { value } => Node::Constant { value: *value },
            Node::Leaf { id, value, grad } => Node::Leaf {
                id: *id,
                value: *value,
                grad: *grad,
            },
            Node::Unary { value, grad, op, x } => Node::Unary {
                value: *value,
                grad: *grad,
                op: *op,
                x: Box::new(Expr::constant(x.value())),
            },
            Node::Binary {
                value,
                grad,
                op,
                x,
                y,
            } => Node::Binary {
                value: *value,
                grad: *grad,
                op: *op,
                x: Box::new(Expr::constant(x.value())),
                y: Box::new(Expr::constant(y.value())),
            },
        };
        Expr { node }
    }

    /// Moves the operand boxes out, leaving this node without children.
    fn detach_operands(&mut self, out: &mut Vec<Box<Expr<T>>>) {
        if matches!(self.node, Node::Constant { .. } | Node::Leaf { .. }) {
            return;
        }
        let value = self.value();
        match std::mem::replace(&mut self.node, Node::Constant { value }) {
            Node::Unary { x, .. } => out.push(x),
            Node::Binary { x, y, .. } => {
                out.push(x);
                out.push(y);
            }
            Node::Constant { .. } | Node::Leaf { .. } => {}
        }
    }

    fn grad_slot(&mut self) -> Option<&mut T> {
        match &mut self.node {
            Node::Constant { .. } => None,
            Node::Leaf { grad, .. } | Node::Unary { grad, .. } | Node::Binary { grad, .. } => {
                Some(grad)
            }
        }
    }

    /// All nodes in pre-order (each node before its operands, left operand first).
    fn walk(&self) -> Vec<&Expr<T>> {
        let mut order = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            order.push(node);
            let operands: Vec<_> = node.operands().collect();
            stack.extend(operands.into_iter().rev());
        }
        order
    }

    /// Runs backprop from this node with an upstream gradient of 1.
    pub fn backward(&mut self) {
        self.backward_with(T::one());
    }

    /// Runs backprop from this node with upstream gradient `seed`.
    ///
    /// The root's gradient is set to `seed`; every other node accumulates, so
    /// a second pass without [`Expr::zero_grad`] adds onto the first.
    pub fn backward_with(&mut self, seed: T) {
        if let Some(grad) = self.grad_slot() {
            *grad = seed;
        }
        let mut visited = 0_usize;
        let mut stack: Vec<&mut Expr<T>> = vec![self];
        // Tree: every node has one consumer, so its gradient is final once popped.
        while let Some(node) = stack.pop() {
            node.propagate_local();
            visited += 1;
            stack.extend(node.operands_mut());
        }
        trace!("backward: seed {seed}, propagated through {visited} nodes");
    }

    /// Resets the gradient of every node in the tree.
    pub fn zero_grad(&mut self) {
        let mut stack: Vec<&mut Expr<T>> = vec![self];
        while let Some(node) = stack.pop() {
            node.reset();
            stack.extend(node.operands_mut());
        }
    }

    /// Every leaf copy in the tree, left to right.
    #[must_use]
    pub fn leaves(&self) -> Vec<&Expr<T>> {
        self.walk()
            .into_iter()
            .filter(|node| node.leaf_id().is_some())
            .collect()
    }

    /// Total gradient with respect to `leaf`: the sum over all of its copies.
    ///
    /// Returns `None` if `leaf` is not a leaf or does not occur in this tree.
    #[must_use]
    pub fn grad_of(&self, leaf: &Expr<T>) -> Option<T> {
        let id = leaf.leaf_id()?;
        self.leaves()
            .into_iter()
            .filter(|node| node.leaf_id() == Some(id))
            .filter_map(|node| node.grad())
            .reduce(|acc, g| acc + g)
    }

    /// Number of nodes in the tree, this one included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.walk().len()
    }
}

impl<T: Operand> GradNode<T> for Expr<T> {
    fn value(&self) -> T {
        match &self.node {
            Node::Constant { value }
            | Node::Leaf { value, .. }
            | Node::Unary { value, .. }
            | Node::Binary { value, .. } => *value,
        }
    }

    fn grad(&self) -> Option<T> {
        match &self.node {
            Node::Constant { .. } => None,
            Node::Leaf { grad, .. } | Node::Unary { grad, .. } | Node::Binary { grad, .. } => {
                Some(*grad)
            }
        }
    }

    fn accumulate(&mut self, delta: T) {
        if let Some(grad) = self.grad_slot() {
            *grad = *grad + delta;
        }
    }

    fn reset(&mut self) {
        if let Some(grad) = self.grad_slot() {
            *grad = T::zero();
        }
    }

    fn propagate_local(&mut self) {
        match &mut self.node {
            Node::Constant { .. } | Node::Leaf { .. } => {}
            Node::Unary { grad, op, x, .. } => {
                let upstream = *grad;
                let local = op.dx(x.value());
                x.accumulate(local * upstream);
            }
            Node::Binary { grad, op, x, y, .. } => {
                let upstream = *grad;
                let (xv, yv) = (x.value(), y.value());
                x.accumulate(op.dx(xv, yv) * upstream);
                y.accumulate(op.dy(xv, yv) * upstream);
            }
        }
    }
}

impl<T: Operand> Clone for Expr<T> {
    fn clone(&self) -> Self {
        let mut root = self.shallow_clone();
        {
            let mut pending: Vec<(&mut Expr<T>, &Expr<T>)> = vec![(&mut root, self)];
            while let Some((copy, original)) = pending.pop() {
                for (copy_operand, operand) in copy.operands_mut().zip(original.operands()) {
                    *copy_operand = operand.shallow_clone();
                    pending.push((copy_operand, operand));
                }
            }
        }
        root
    }
}

impl<T: Operand> Drop for Expr<T> {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_operands(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_operands(&mut pending);
        }
    }
}

impl<T: Operand> fmt::Display for Expr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl<T: Operand> From<T> for Expr<T> {
    /// Lifts a raw number to a constant.
    fn from(value: T) -> Self {
        Expr::constant(value)
    }
}
