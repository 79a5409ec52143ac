//! Sigma Parse - text to unevaluated expression trees.
//!
//! The lexer is generated by `logos`; the parser is a hand-written
//! precedence-climbing descent over the token vector. Parsing never
//! evaluates: `2+3` parses to an `Add` node, not to `5`.
//!
//! # Grammar
//!
//! ```text
//! seq      := assign (';' assign)* ';'?
//! assign   := additive (':=' assign)?
//! additive := term (('+' | '-') term)*
//! term     := unary (('*' | '/') unary)*
//! unary    := ('-' | '+') unary | power
//! power    := postfix (('^' | '**') unary)?
//! postfix  := primary '!'*
//! primary  := INT | FLOAT | STRING | IDENT ('(' list? ')')?
//!           | '(' seq ')' | '[' list? ']'
//! list     := assign (',' assign)*
//! ```

mod diagnostic;
mod lexer;
mod parser;

pub use diagnostic::ParseDiagnostic;
pub use lexer::{tokenize, Spanned, Token};
pub use parser::MAX_NESTING;

use sigma_gen::Gen;

/// Parse `source` into an unevaluated expression.
///
/// Returns the first syntax error found.
pub fn parse(source: &str) -> Result<Gen, ParseDiagnostic> {
    let tokens = tokenize(source)?;
    parser::Parser::new(source, &tokens).parse_all()
}
