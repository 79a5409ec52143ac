//! Tree-walking evaluator.
//!
//! Arguments are evaluated before their operator; identifiers without a
//! binding stay free, so evaluation of `x + 1` yields the tree `x+1`.

use sigma_gen::ops::{self, neg, reciprocal};
use sigma_gen::{evaluation_error, internal_error, Gen, GenResult, Op, Symbolic};
use sigma_stack::ensure_sufficient_stack;

use crate::builtins;
use crate::combinatorics::factorial_of;
use crate::context::Context;

/// Evaluate `expr` in `ctx`.
///
/// Identifiers resolve through the context bindings or stay free, `:=` binds
/// its value, `;` keeps the last value, and calls dispatch through the
/// builtin registry. Unknown functions are kept unevaluated with a warning
/// in the log sink.
pub fn eval(expr: &Gen, ctx: &mut Context) -> GenResult {
    ensure_sufficient_stack(|| match expr {
        Gen::Ident(name) => Ok(ctx.lookup(name).cloned().unwrap_or_else(|| expr.clone())),
        Gen::Vect(items) => eval_all(items, ctx).map(Gen::Vect),
        Gen::Symb(node) => eval_node(node, ctx),
        _ => Ok(expr.clone()),
    })
}

fn eval_all(items: &[Gen], ctx: &mut Context) -> Result<Vec<Gen>, sigma_gen::Fault> {
    items.iter().map(|item| eval(item, ctx)).collect()
}

fn eval_node(node: &Symbolic, ctx: &mut Context) -> GenResult {
    match (&node.op, node.args.as_slice()) {
        (Op::Assign, [target, value]) => {
            let Gen::Ident(name) = target else {
                return Err(evaluation_error(format!(
                    "cannot assign to {}",
                    target.gen_type().name()
                )));
            };
            let value = eval(value, ctx)?;
            tracing::trace!(%name, %value, "bind");
            ctx.bind(name.clone(), value.clone());
            Ok(value)
        }
        (Op::Seq, items) => {
            let mut last = Gen::int(0);
            for item in items {
                last = eval(item, ctx)?;
            }
            Ok(last)
        }
        (Op::Call(name), args) => {
            let args = eval_all(args, ctx)?;
            builtins::call(name, &args, ctx)
        }
        (op, args) => {
            let args = eval_all(args, ctx)?;
            apply(op, &args, ctx)
        }
    }
}

fn apply(op: &Op, args: &[Gen], ctx: &Context) -> GenResult {
    match (op, args) {
        (Op::Add, [first, rest @ ..]) => rest
            .iter()
            .try_fold(first.clone(), |acc, term| ops::add(&acc, term)),
        (Op::Mul, [first, rest @ ..]) => rest
            .iter()
            .try_fold(first.clone(), |acc, factor| ops::mul(&acc, factor)),
        (Op::Neg, [a]) => neg(a),
        (Op::Inv, [a]) => reciprocal(a),
        (Op::Pow, [base, exp]) => ops::pow_with_limit(base, exp, ctx.config().max_power_bits),
        (Op::Factorial, [a]) if a.has_symbols() => {
            Ok(Gen::symbolic(Op::Factorial, vec![a.clone()]))
        }
        (Op::Factorial, [a]) => factorial_of(a, ctx.config()),
        _ => Err(internal_error(format!(
            "malformed {op:?} node with {} arguments",
            args.len()
        ))),
    }
}

#[cfg(test)]
mod tests;
