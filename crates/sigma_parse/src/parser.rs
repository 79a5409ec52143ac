//! Recursive-descent parser over the token vector.

use sigma_gen::{ops, Gen, Op};
use sigma_stack::ensure_sufficient_stack;

use crate::diagnostic::ParseDiagnostic;
use crate::lexer::{Spanned, Token};

type ParseResult = Result<Gen, ParseDiagnostic>;

/// Deepest grammar nesting accepted. Each parenthesis, bracket, call, unary
/// sign, exponent and postfix `!` costs at least one level.
pub const MAX_NESTING: usize = 2000;

pub(crate) struct Parser<'src, 't> {
    source: &'src str,
    tokens: &'t [Spanned],
    pos: usize,
    depth: usize,
}

impl<'src, 't> Parser<'src, 't> {
    pub(crate) fn new(source: &'src str, tokens: &'t [Spanned]) -> Self {
        Parser {
            source,
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Parse the whole input; trailing tokens are an error.
    pub(crate) fn parse_all(mut self) -> ParseResult {
        if self.tokens.is_empty() {
            return Err(self.error_here("empty input"));
        }
        let expr = self.parse_seq()?;
        match self.peek() {
            None => Ok(expr),
            Some(token) => {
                let message = format!("unexpected {}", token.describe());
                Err(self.error_here(message))
            }
        }
    }

    // === Cursor ===

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos).map(|s| &s.token);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ParseDiagnostic> {
        if self.eat(expected) {
            return Ok(());
        }
        let found = self
            .peek()
            .map_or_else(|| "end of input".to_owned(), Token::describe);
        Err(self.error_here(format!("expected {}, found {found}", expected.describe())))
    }

    fn error_here(&self, message: impl Into<String>) -> ParseDiagnostic {
        let offset = self
            .tokens
            .get(self.pos)
            .map_or(self.source.len(), |s| s.span.start);
        ParseDiagnostic::at(self.source, offset, message)
    }

    fn too_deep(&self) -> ParseDiagnostic {
        self.error_here(format!("expression nested more than {MAX_NESTING} levels deep"))
    }

    /// Run one level of nested grammar on a grown stack.
    fn nested(&mut self, f: impl FnOnce(&mut Self) -> ParseResult) -> ParseResult {
        if self.depth >= MAX_NESTING {
            return Err(self.too_deep());
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| f(self));
        self.depth -= 1;
        result
    }

    // === Grammar ===

    fn parse_seq(&mut self) -> ParseResult {
        let mut items = vec![self.parse_assign()?];
        while self.eat(&Token::Semicolon) {
            if matches!(self.peek(), None | Some(Token::RParen)) {
                break;
            }
            items.push(self.parse_assign()?);
        }
        Ok(collapse(Op::Seq, items))
    }

    fn parse_assign(&mut self) -> ParseResult {
        let target_pos = self.pos;
        let lhs = self.parse_additive()?;
        if !self.eat(&Token::ColonEq) {
            return Ok(lhs);
        }
        if !matches!(lhs, Gen::Ident(_)) {
            let offset = self.tokens.get(target_pos).map_or(0, |s| s.span.start);
            return Err(ParseDiagnostic::at(
                self.source,
                offset,
                "left side of `:=` must be an identifier",
            ));
        }
        let rhs = self.nested(Self::parse_assign)?;
        Ok(Gen::symbolic(Op::Assign, vec![lhs, rhs]))
    }

    fn parse_additive(&mut self) -> ParseResult {
        let mut terms = vec![self.parse_term()?];
        loop {
            if self.eat(&Token::Plus) {
                terms.push(self.parse_term()?);
            } else if self.eat(&Token::Minus) {
                terms.push(negate(self.parse_term()?));
            } else {
                break;
            }
        }
        Ok(collapse(Op::Add, terms))
    }

    fn parse_term(&mut self) -> ParseResult {
        let mut factors = vec![self.parse_unary()?];
        loop {
            if self.eat(&Token::Star) {
                factors.push(self.parse_unary()?);
            } else if self.eat(&Token::Slash) {
                let divisor = self.parse_unary()?;
                factors.push(Gen::symbolic(Op::Inv, vec![divisor]));
            } else {
                break;
            }
        }
        Ok(collapse(Op::Mul, factors))
    }

    fn parse_unary(&mut self) -> ParseResult {
        self.nested(|p| {
            if p.eat(&Token::Minus) {
                Ok(negate(p.parse_unary()?))
            } else if p.eat(&Token::Plus) {
                p.parse_unary()
            } else {
                p.parse_power()
            }
        })
    }

    fn parse_power(&mut self) -> ParseResult {
        let base = self.parse_postfix()?;
        if self.eat(&Token::Caret) || self.eat(&Token::StarStar) {
            // Right-associative, and `2^-1` is allowed.
            let exponent = self.parse_unary()?;
            return Ok(Gen::symbolic(Op::Pow, vec![base, exponent]));
        }
        Ok(base)
    }

    fn parse_postfix(&mut self) -> ParseResult {
        let mut expr = self.parse_primary()?;
        let mut bangs = 0;
        while self.eat(&Token::Bang) {
            bangs += 1;
            if self.depth + bangs > MAX_NESTING {
                return Err(self.too_deep());
            }
            expr = Gen::symbolic(Op::Factorial, vec![expr]);
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> ParseResult {
        let Some(token) = self.advance() else {
            return Err(self.error_here("unexpected end of input"));
        };
        match token {
            Token::Int(n) => Ok(Gen::from_bigint(n.clone())),
            Token::Float(f) => Ok(Gen::double(*f)),
            Token::Str(s) => Ok(Gen::string(s.clone())),
            Token::Ident(name) => self.parse_identifier(name),
            Token::LParen => {
                let inner = self.nested(Self::parse_seq)?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Token::LBracket => {
                self.nested(|p| Ok(Gen::vector(p.parse_list(&Token::RBracket)?)))
            }
            other => {
                self.pos -= 1;
                Err(self.error_here(format!("unexpected {}", other.describe())))
            }
        }
    }

    fn parse_identifier(&mut self, name: &str) -> ParseResult {
        if self.eat(&Token::LParen) {
            return self.nested(|p| Ok(Gen::call(name, p.parse_list(&Token::RParen)?)));
        }
        Ok(match name {
            "inf" => Gen::double(f64::INFINITY),
            "undef" => Gen::double(f64::NAN),
            _ => Gen::ident(name),
        })
    }

    /// Comma-separated items up to and including `close`.
    fn parse_list(&mut self, close: &Token) -> Result<Vec<Gen>, ParseDiagnostic> {
        let mut items = Vec::new();
        if self.eat(close) {
            return Ok(items);
        }
        loop {
            items.push(self.parse_assign()?);
            if self.eat(close) {
                return Ok(items);
            }
            self.expect(&Token::Comma)?;
        }
    }
}

/// Single item stays as-is; several become one n-ary node.
fn collapse(op: Op, mut items: Vec<Gen>) -> Gen {
    if items.len() == 1 {
        items.pop().unwrap_or_default()
    } else {
        Gen::symbolic(op, items)
    }
}

/// Literal numbers are negated in place so `-5` reads back as a number.
fn negate(expr: Gen) -> Gen {
    if expr.is_number() {
        if let Ok(negated) = ops::neg(&expr) {
            return negated;
        }
    }
    Gen::symbolic(Op::Neg, vec![expr])
}

#[cfg(test)]
mod tests;
