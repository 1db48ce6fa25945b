//! # micrograd-engine
//!
//! Scalar reverse-mode automatic differentiation over owned expression trees,
//! plus the environment-driven configuration used by the demo binary.

pub mod autograd;
pub mod config;
