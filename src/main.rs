//! # micrograd (Rust)
//!
//! Demo driver for the scalar autodiff engine: two leaves, a handful of
//! expressions over them, and one backward pass.
//!
//! Configure with `MICROGRAD_X1`, `MICROGRAD_X2`, `MICROGRAD_SEED_GRADIENT` and
//! `MICROGRAD_PRECISION` (`f32` or `f64`). Set `RUST_LOG=debug` to see logs.

use log::info;
use micrograd_engine::autograd::{Exp, Expr, Operand, Pow};
use micrograd_engine::config::{from_env, Config, Precision};

type BoxError = Box<dyn std::error::Error>;

fn main() -> Result<(), BoxError> {
    env_logger::init();

    let config = from_env()?;
    config.validate()?;
    info!(
        "evaluating in {} with x1 = {}, x2 = {}, seed = {}",
        config.precision, config.x1, config.x2, config.seed_gradient
    );

    match config.precision {
        Precision::F32 => run::<f32>(&config),
        Precision::F64 => run::<f64>(&config),
    }
}

/// Narrows a configured `f64` to the working precision.
fn lift<T: Operand>(name: &str, value: f64) -> Result<T, BoxError> {
    T::from_real(value).ok_or_else(|| format!("{name} ({value}) is not representable").into())
}

fn run<T: Operand>(config: &Config) -> Result<(), BoxError> {
    let x1 = Expr::leaf(lift::<T>("x1", config.x1)?);
    let x2 = Expr::leaf(lift::<T>("x2", config.x2)?);
    let seed = lift::<T>("seed_gradient", config.seed_gradient)?;

    // ----- Forward: every node is evaluated as it is built -----
    println!("x1 * x2           = {}", &x1 * &x2);
    println!("exp(x1 * x2)      = {}", (&x1 * &x2).exp());
    println!("x1 / x2           = {}", &x1 / &x2);
    println!("x1 ^ x2           = {}", (&x1).pow(&x2));
    println!("relu(-x1)         = {}", (-&x1).relu());
    println!("logistic(x1 - x2) = {}", (&x1 - &x2).logistic());

    // ----- Backward: seed the root, push gradients down to the leaves -----
    let mut out = (&x1 * &x2).exp();
    out.backward_with(seed);
    info!("backward pass covered {} nodes", out.node_count());

    let zero = T::zero();
    println!("d exp(x1 * x2) / d x1 = {}", out.grad_of(&x1).unwrap_or(zero));
    println!("d exp(x1 * x2) / d x2 = {}", out.grad_of(&x2).unwrap_or(zero));
    Ok(())
}
