//! Canonical text rendering.
//!
//! Output re-parses to an equal value for every exact value, vector and
//! symbolic tree. Parentheses are inserted only where binding strength
//! requires them.

use std::fmt::{self, Write};

use num_traits::Signed;
use sigma_stack::ensure_sufficient_stack;

use crate::value::{Gen, Op};

/// Binding strength, weakest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    Seq,
    Assign,
    Add,
    Mul,
    Neg,
    Pow,
    Postfix,
    Atom,
}

/// Render an `f64` so that reading it back yields the same bits.
pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        "undef".to_owned()
    } else if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_owned()
    } else {
        format!("{value:?}")
    }
}

fn format_single(value: f32) -> String {
    if value.is_finite() {
        format!("{value:?}")
    } else {
        format_double(f64::from(value))
    }
}

fn is_negative_number(g: &Gen) -> bool {
    match g {
        Gen::Int(i) => *i < 0,
        Gen::Big(b) => b.is_negative(),
        Gen::Frac(r) => r.is_negative(),
        Gen::Double(d) => d.is_sign_negative() && !d.is_nan() && *d != 0.0,
        Gen::Float(f) => f.is_sign_negative() && !f.is_nan() && *f != 0.0,
        _ => false,
    }
}

fn prec_of(g: &Gen) -> Prec {
    match g {
        _ if is_negative_number(g) => Prec::Neg,
        Gen::Frac(_) => Prec::Mul,
        Gen::Symb(node) => match &node.op {
            Op::Add => Prec::Add,
            Op::Mul => match node.args.first() {
                Some(first) if is_negative_number(first) => Prec::Neg,
                _ => Prec::Mul,
            },
            Op::Inv => Prec::Mul,
            Op::Neg => Prec::Neg,
            Op::Pow => Prec::Pow,
            Op::Factorial => Prec::Postfix,
            Op::Call(_) => Prec::Atom,
            Op::Assign => Prec::Assign,
            Op::Seq => Prec::Seq,
        },
        _ => Prec::Atom,
    }
}

/// For a term printed after `-` in a sum: its magnitude, if it reads as negative.
fn negated_term(term: &Gen) -> Option<Gen> {
    if is_negative_number(term) {
        return crate::ops::neg(term).ok();
    }
    let node = term.as_symbolic()?;
    match node.op {
        Op::Neg => node.args.first().cloned(),
        Op::Mul => {
            let (first, rest) = node.args.split_first()?;
            if !is_negative_number(first) {
                return None;
            }
            let magnitude = crate::ops::neg(first).ok()?;
            let mut factors = Vec::with_capacity(node.args.len());
            factors.push(magnitude);
            factors.extend(rest.iter().cloned());
            Some(crate::ops::symbolic_product(factors))
        }
        _ => None,
    }
}

fn divisor_of(factor: &Gen) -> Option<&Gen> {
    let node = factor.as_symbolic()?;
    match (&node.op, node.args.as_slice()) {
        (Op::Inv, [d]) => Some(d),
        _ => None,
    }
}

struct Printer {
    out: String,
}

impl Printer {
    fn write(&mut self, g: &Gen, parent: Prec) {
        let wrap = prec_of(g) < parent;
        if wrap {
            self.out.push('(');
        }
        ensure_sufficient_stack(|| self.write_bare(g));
        if wrap {
            self.out.push(')');
        }
    }

    fn write_list(&mut self, items: &[Gen], sep: char) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push(sep);
            }
            self.write(item, Prec::Assign);
        }
    }

    fn write_bare(&mut self, g: &Gen) {
        match g {
            Gen::Int(i) => {
                let _ = write!(self.out, "{i}");
            }
            Gen::Big(b) => {
                let _ = write!(self.out, "{b}");
            }
            Gen::Frac(r) => {
                let _ = write!(self.out, "{}/{}", r.numer(), r.denom());
            }
            Gen::Double(d) => self.out.push_str(&format_double(*d)),
            Gen::Float(f) => self.out.push_str(&format_single(*f)),
            Gen::Ident(name) => self.out.push_str(name),
            Gen::Str(text) => self.write_quoted(text),
            Gen::Vect(items) => {
                self.out.push('[');
                self.write_list(items, ',');
                self.out.push(']');
            }
            Gen::Symb(node) => self.write_node(&node.op, &node.args),
        }
    }

    fn write_node(&mut self, op: &Op, args: &[Gen]) {
        match (op, args) {
            (Op::Add, _) => self.write_sum(args),
            (Op::Mul, _) => self.write_product(args),
            (Op::Neg, [a]) => {
                self.out.push('-');
                self.write(a, Prec::Neg);
            }
            (Op::Inv, [a]) => {
                self.out.push_str("1/");
                self.write(a, Prec::Pow);
            }
            (Op::Pow, [base, exp]) => {
                self.write(base, Prec::Postfix);
                self.out.push('^');
                self.write(exp, Prec::Atom);
            }
            (Op::Factorial, [a]) => {
                self.write(a, Prec::Atom);
                self.out.push('!');
            }
            (Op::Assign, [name, value]) => {
                self.write(name, Prec::Postfix);
                self.out.push_str(":=");
                self.write(value, Prec::Assign);
            }
            (Op::Seq, _) => self.write_list(args, ';'),
            (Op::Call(name), _) => self.write_call(name, args),
            // Malformed arity: fall back to call syntax so nothing is lost.
            (other, _) => self.write_call(op_name(other), args),
        }
    }

    fn write_call(&mut self, name: &str, args: &[Gen]) {
        self.out.push_str(name);
        self.out.push('(');
        self.write_list(args, ',');
        self.out.push(')');
    }

    fn write_sum(&mut self, terms: &[Gen]) {
        for (i, term) in terms.iter().enumerate() {
            if i == 0 {
                self.write(term, Prec::Add);
                continue;
            }
            match negated_term(term) {
                Some(magnitude) => {
                    self.out.push('-');
                    self.write(&magnitude, Prec::Mul);
                }
                None => {
                    self.out.push('+');
                    self.write(term, Prec::Add);
                }
            }
        }
    }

    fn write_product(&mut self, factors: &[Gen]) {
        let mut rest = factors;
        if let Some((Gen::Int(-1), tail)) = factors.split_first() {
            if !tail.is_empty() {
                self.out.push('-');
                rest = tail;
            }
        }
        for (i, factor) in rest.iter().enumerate() {
            if let Some(d) = divisor_of(factor) {
                if i == 0 {
                    self.out.push('1');
                }
                self.out.push('/');
                self.write(d, Prec::Pow);
            } else {
                if i > 0 {
                    self.out.push('*');
                }
                self.write(factor, if i == 0 { Prec::Mul } else { Prec::Pow });
            }
        }
    }

    fn write_quoted(&mut self, text: &str) {
        self.out.push('"');
        for ch in text.chars() {
            match ch {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\t' => self.out.push_str("\\t"),
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }
}

fn op_name(op: &Op) -> &str {
    match op {
        Op::Add => "plus",
        Op::Mul => "times",
        Op::Neg => "neg",
        Op::Inv => "inv",
        Op::Pow => "pow",
        Op::Factorial => "factorial",
        Op::Call(name) => name,
        Op::Assign => "assign",
        Op::Seq => "seq",
    }
}

impl fmt::Display for Gen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = Printer { out: String::new() };
        printer.write_bare(self);
        f.write_str(&printer.out)
    }
}

#[cfg(test)]
mod tests;
