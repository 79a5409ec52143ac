//! Evaluation, number theory and algebra for the Sigma engine.
//!
//! Everything an operation needs at run time hangs off a [`Context`]:
//! symbol bindings, the [`EngineConfig`] limits, a diagnostic sink and a
//! random source. The process-wide prime sieve and factorization memo live
//! in [`globals`] and are shared by every context.
//!
//! Modules by concern:
//! - [`integers`]: gcd family, Euclidean division, modular solvers
//! - [`primes`]: primality, prime enumeration, factorization
//! - [`combinatorics`]: factorials, binomials, random numbers
//! - [`linalg`]: determinants
//! - [`poly`]: `simplify`, `factor`, polynomial gcd
//! - [`eval`] and [`builtins`]: the evaluator and its function table

pub mod builtins;
pub mod combinatorics;
mod config;
mod context;
pub mod eval;
pub mod globals;
pub mod integers;
pub mod linalg;
pub mod poly;
pub mod primes;

pub use config::{EngineConfig, DEFAULT_EPSILON};
pub use context::Context;
pub use globals::release_globals;
pub use primes::Primality;
