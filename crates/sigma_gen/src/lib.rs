//! Sigma Gen - the value model of the Sigma engine.
//!
//! This crate provides:
//! - The engine's tagged value type [`Gen`] and its one-byte discriminant [`GenType`]
//! - The numeric tower (machine integers, big integers, fractions, floats)
//! - Arithmetic over numbers, vectors, matrices and symbolic trees ([`ops`])
//! - The single fault type every engine operation reports through ([`Fault`])
//! - Canonical text rendering (`Display for Gen`)
//!
//! # Numeric Tower
//!
//! Exact values are kept normalized: an integer that fits in `i64` is always
//! `Gen::Int`, a fraction with denominator one is always an integer. Any
//! operation mixing an exact and an inexact operand produces a `Gen::Double`.

mod display;
mod fault;
pub mod ops;
mod value;

pub use display::format_double;
pub use fault::{
    complex_result, dimension_mismatch, division_by_zero, domain_error, evaluation_error,
    exponent_too_large, internal_error, invalid_argument, invalid_operands, not_a_matrix,
    not_an_integer, not_square, out_of_range, parse_error, wrong_arg_count,
    Fault, FaultKind, GenResult,
};
pub use value::{Gen, GenType, Op, Symbolic};

/// Re-exported numeric types so downstream crates agree on one version.
pub use num_bigint::{BigInt, Sign};
pub use num_rational::BigRational;
