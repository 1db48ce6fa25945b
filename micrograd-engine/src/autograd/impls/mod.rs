//! Node representation and the operator surface built on top of it.

pub mod algebra;
pub mod expr;
