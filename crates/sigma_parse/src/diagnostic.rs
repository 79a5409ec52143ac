//! Syntax error reporting.

use sigma_gen::{parse_error, Fault};

/// First syntax error in a piece of text. Positions are 1-based.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("syntax error at line {line}, column {column}: {message}")]
pub struct ParseDiagnostic {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseDiagnostic {
    /// Diagnostic located at byte `offset` of `source`.
    pub(crate) fn at(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(source.len());
        let before = source.get(..offset).unwrap_or(source);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        ParseDiagnostic {
            line,
            column,
            message: message.into(),
        }
    }
}

impl From<ParseDiagnostic> for Fault {
    fn from(diag: ParseDiagnostic) -> Self {
        parse_error(diag.to_string())
    }
}
