//! Tokenizer built on `logos`.

use std::ops::Range;

use logos::Logos;
use sigma_gen::BigInt;

use crate::diagnostic::ParseDiagnostic;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    // === Literals ===
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<BigInt>().ok())]
    Int(BigInt),

    // `1.5`, `1.`, `.5`, `1e-3`, `1.5E+2`
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    Str(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_owned())]
    Ident(String),

    // === Operators ===
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
    #[token("**")]
    StarStar,
    #[token("!")]
    Bang,
    #[token(":=")]
    ColonEq,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
}

impl Token {
    /// Short description used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Token::Int(n) => format!("integer `{n}`"),
            Token::Float(f) => format!("number `{f}`"),
            Token::Str(_) => "string".to_owned(),
            Token::Ident(name) => format!("identifier `{name}`"),
            Token::Plus => "`+`".to_owned(),
            Token::Minus => "`-`".to_owned(),
            Token::Star => "`*`".to_owned(),
            Token::Slash => "`/`".to_owned(),
            Token::Caret => "`^`".to_owned(),
            Token::StarStar => "`**`".to_owned(),
            Token::Bang => "`!`".to_owned(),
            Token::ColonEq => "`:=`".to_owned(),
            Token::LParen => "`(`".to_owned(),
            Token::RParen => "`)`".to_owned(),
            Token::LBracket => "`[`".to_owned(),
            Token::RBracket => "`]`".to_owned(),
            Token::Comma => "`,`".to_owned(),
            Token::Semicolon => "`;`".to_owned(),
        }
    }
}

/// A token with its byte range in the source.
#[derive(Clone, Debug, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub span: Range<usize>,
}

/// Split `source` into tokens, failing on the first unrecognised character.
pub fn tokenize(source: &str) -> Result<Vec<Spanned>, ParseDiagnostic> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push(Spanned { token, span }),
            Err(()) => {
                let bad = lexer.slice();
                let message = if bad.starts_with('"') {
                    "unterminated string literal".to_owned()
                } else {
                    format!("unexpected character `{bad}`")
                };
                return Err(ParseDiagnostic::at(source, span.start, message));
            }
        }
    }
    Ok(tokens)
}

/// Strip the quotes from a string literal and resolve escapes.
fn unescape(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            other => out.push(other),
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests;
