//! The engine's single failure channel.
//!
//! Every fallible engine operation returns `Result<_, Fault>`. Factory
//! functions (e.g. `division_by_zero()`) are the construction API: they pick
//! the `FaultKind` and produce the message text in one place.

use crate::value::Gen;

/// Result of an engine operation producing a value.
pub type GenResult = Result<Gen, Fault>;

/// Category of a fault.
///
/// The boundary flattens every fault to its message; the kind is kept for
/// Rust consumers and tests that want to match without string parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// Malformed input text.
    Parse,
    /// An operation cannot be applied to its operands.
    Evaluation,
    /// A narrowing or type conversion is not representable.
    Conversion,
    /// An operation-specific precondition was violated.
    Domain,
    /// A handle or argument passed across the boundary was unusable.
    InvalidArgument,
    /// The engine failed in an unexpected way.
    Internal,
}

/// A fault raised by the engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Fault {
    /// Structured category.
    pub kind: FaultKind,
    /// Human-readable message, surfaced verbatim to the host.
    pub message: String,
}

impl Fault {
    /// Create a fault of the given kind.
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Structured category of this fault.
    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    /// Prefix the message with the operation name, keeping the kind.
    #[must_use]
    pub fn in_op(self, op: &str) -> Self {
        Self {
            kind: self.kind,
            message: format!("{op}: {}", self.message),
        }
    }
}

// Parse

/// Malformed input text.
#[cold]
pub fn parse_error(message: impl Into<String>) -> Fault {
    Fault::new(FaultKind::Parse, message)
}

// Evaluation

/// Generic evaluation failure.
#[cold]
pub fn evaluation_error(message: impl Into<String>) -> Fault {
    Fault::new(FaultKind::Evaluation, message)
}

/// Operator applied to operands it does not support.
#[cold]
pub fn invalid_operands(op: &str, left: &Gen, right: &Gen) -> Fault {
    Fault::new(
        FaultKind::Evaluation,
        format!(
            "operator `{op}` cannot be applied to {} and {}",
            left.gen_type().name(),
            right.gen_type().name()
        ),
    )
}

/// Wrong number of arguments in a function call.
#[cold]
pub fn wrong_arg_count(name: &str, expected: usize, got: usize) -> Fault {
    let arg_word = if expected == 1 { "argument" } else { "arguments" };
    Fault::new(
        FaultKind::Evaluation,
        format!("{name} expects {expected} {arg_word}, got {got}"),
    )
}

/// Vectors or matrices whose shapes do not fit the operation.
#[cold]
pub fn dimension_mismatch(op: &str) -> Fault {
    Fault::new(FaultKind::Evaluation, format!("{op}: dimension mismatch"))
}

/// A matrix was required.
#[cold]
pub fn not_a_matrix(op: &str, got: &Gen) -> Fault {
    Fault::new(
        FaultKind::Evaluation,
        format!("{op}: expected a matrix, got {}", got.gen_type().name()),
    )
}

/// A square matrix was required.
#[cold]
pub fn not_square(op: &str) -> Fault {
    Fault::new(FaultKind::Evaluation, format!("{op}: expected a square matrix"))
}

// Conversion

/// Value is not an integer where one is required.
#[cold]
pub fn not_an_integer(op: &str, got: &Gen) -> Fault {
    Fault::new(
        FaultKind::Conversion,
        format!("{op}: expected an integer, got {got}"),
    )
}

/// Integer does not fit the requested machine type.
#[cold]
pub fn out_of_range(target: &str, got: &Gen) -> Fault {
    Fault::new(
        FaultKind::Conversion,
        format!("{got} does not fit in {target}"),
    )
}

// Domain

/// Division by an exact or inexact zero.
#[cold]
pub fn division_by_zero() -> Fault {
    Fault::new(FaultKind::Domain, "division by zero")
}

/// Operation-specific precondition failure.
#[cold]
pub fn domain_error(op: &str, detail: impl std::fmt::Display) -> Fault {
    Fault::new(FaultKind::Domain, format!("{op}: {detail}"))
}

/// Result would be too large to represent.
#[cold]
pub fn exponent_too_large(op: &str) -> Fault {
    Fault::new(FaultKind::Domain, format!("{op}: result too large"))
}

/// Real operation with a non-real result.
#[cold]
pub fn complex_result(op: &str) -> Fault {
    Fault::new(
        FaultKind::Domain,
        format!("{op}: result is not a real number"),
    )
}

// Boundary

/// Unusable argument passed across the boundary.
#[cold]
pub fn invalid_argument(message: impl Into<String>) -> Fault {
    Fault::new(FaultKind::InvalidArgument, message)
}

/// Unexpected engine failure.
#[cold]
pub fn internal_error(message: impl std::fmt::Display) -> Fault {
    Fault::new(FaultKind::Internal, format!("internal error: {message}"))
}

#[cfg(test)]
mod tests;
