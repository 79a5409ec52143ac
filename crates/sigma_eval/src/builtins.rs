//! Functions callable by name from expression text.
//!
//! Calls to names outside the registry are kept as unevaluated trees, with a
//! warning on the context's log sink.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use sigma_gen::{domain_error, ops, wrong_arg_count, Gen, GenResult};

use crate::combinatorics::{comb, factorial_of, perm, random_below};
use crate::context::Context;
use crate::integers;
use crate::linalg::det;
use crate::poly::{factor, simplify};
use crate::primes;

type BuiltinFn = fn(&[Gen], &mut Context) -> GenResult;

/// A named function with a fixed argument count.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub arity: usize,
    run: BuiltinFn,
}

static GLOBAL_REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Builtins keyed by name.
pub struct Registry {
    entries: FxHashMap<&'static str, Builtin>,
}

impl Registry {
    fn new() -> Self {
        Registry {
            entries: FxHashMap::default(),
        }
    }

    fn register(&mut self, names: &[&'static str], arity: usize, run: BuiltinFn) {
        for name in names {
            self.entries.insert(*name, Builtin { arity, run });
        }
    }

    /// The builtin registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.entries.get(name)
    }
}

/// The shared table of every builtin, built on first use.
pub fn global_registry() -> &'static Registry {
    GLOBAL_REGISTRY.get_or_init(|| {
        let mut registry = Registry::new();
        register_builtins(&mut registry);
        registry
    })
}

/// Apply `name` to already evaluated arguments.
pub fn call(name: &str, args: &[Gen], ctx: &mut Context) -> GenResult {
    match global_registry().get(name) {
        Some(builtin) if builtin.arity != args.len() => {
            Err(wrong_arg_count(name, builtin.arity, args.len()))
        }
        Some(builtin) => (builtin.run)(args, ctx),
        None => {
            ctx.log(format_args!("warning: unknown function {name}, kept unevaluated"));
            Ok(Gen::call(name, args.to_vec()))
        }
    }
}

fn truth(value: bool) -> Gen {
    Gen::int(i64::from(value))
}

fn abs(x: &Gen) -> GenResult {
    match (x.exact_signum(), x) {
        (Some(sign), _) if sign < 0 => ops::neg(x),
        (Some(_), _) => Ok(x.clone()),
        (None, Gen::Double(d)) => Ok(Gen::double(d.abs())),
        (None, Gen::Float(f)) => Ok(Gen::Float(f.abs())),
        (None, Gen::Ident(_) | Gen::Symb(_)) => Ok(Gen::call("abs", vec![x.clone()])),
        (None, _) => Err(domain_error(
            "abs",
            format!("expected a number, got {}", x.gen_type().name()),
        )),
    }
}

fn register_builtins(r: &mut Registry) {
    // integers
    r.register(&["gcd"], 2, |a, _| integers::gcd(&a[0], &a[1]));
    r.register(&["lcm"], 2, |a, _| integers::lcm(&a[0], &a[1]));
    r.register(&["iquo"], 2, |a, _| integers::iquo(&a[0], &a[1]));
    r.register(&["irem"], 2, |a, _| integers::irem(&a[0], &a[1]));
    r.register(&["iquorem"], 2, |a, _| {
        let (q, rem) = integers::iquorem(&a[0], &a[1])?;
        Ok(Gen::vector(vec![q, rem]))
    });
    r.register(&["iegcd", "igcdex"], 2, |a, _| {
        let (u, v, d) = integers::iegcd(&a[0], &a[1])?;
        Ok(Gen::vector(vec![u, v, d]))
    });
    r.register(&["iabcuv"], 3, |a, _| {
        let (u, v) = integers::iabcuv(&a[0], &a[1], &a[2])?;
        Ok(Gen::vector(vec![u, v]))
    });
    r.register(&["ichinrem"], 4, |a, _| {
        integers::ichinrem(&a[0], &a[1], &a[2], &a[3])
    });
    r.register(&["pa2b2"], 1, |a, _| {
        let (x, y) = integers::pa2b2(&a[0])?;
        Ok(Gen::vector(vec![x, y]))
    });
    r.register(&["euler", "phi"], 1, |a, ctx| integers::euler(&a[0], ctx.config()));
    r.register(&["legendre"], 2, |a, _| {
        integers::legendre(&a[0], &a[1]).map(|s| Gen::int(i64::from(s)))
    });
    r.register(&["jacobi"], 2, |a, _| {
        integers::jacobi(&a[0], &a[1]).map(|s| Gen::int(i64::from(s)))
    });
    r.register(&["even"], 1, |a, _| integers::even(&a[0]).map(truth));
    r.register(&["odd"], 1, |a, _| integers::odd(&a[0]).map(truth));
    r.register(&["float2rational", "exact"], 1, |a, ctx| {
        integers::float2rational(&a[0], ctx.epsilon())
    });
    r.register(&["abs"], 1, |a, _| abs(&a[0]));

    // primes
    r.register(&["is_pseudoprime"], 1, |a, _| {
        primes::is_pseudoprime(&a[0]).map(|p| Gen::int(p as i64))
    });
    r.register(&["nextprime"], 1, |a, _| primes::nextprime(&a[0]));
    r.register(&["prevprime"], 1, |a, _| primes::prevprime(&a[0]));
    r.register(&["nthprime", "ithprime"], 1, |a, ctx| {
        primes::nthprime(&a[0], ctx.config())
    });
    r.register(&["ifactor"], 1, |a, ctx| primes::ifactor(&a[0], ctx.config()));
    r.register(&["ifactors"], 1, |a, ctx| primes::ifactors(&a[0], ctx.config()));
    r.register(&["maple_ifactors"], 1, |a, ctx| {
        primes::maple_ifactors(&a[0], ctx.config())
    });
    r.register(&["divisors", "idivis"], 1, |a, ctx| {
        primes::divisors(&a[0], ctx.config())
    });

    // combinatorics
    r.register(&["factorial"], 1, |a, ctx| factorial_of(&a[0], ctx.config()));
    r.register(&["comb", "binomial"], 2, |a, ctx| comb(&a[0], &a[1], ctx.config()));
    r.register(&["perm"], 2, |a, ctx| perm(&a[0], &a[1], ctx.config()));
    r.register(&["rand"], 1, |a, ctx| random_below(&a[0], ctx.rng()));

    // algebra
    r.register(&["factor"], 1, |a, ctx| factor(&a[0], ctx.config()));
    r.register(&["simplify"], 1, |a, _| simplify(&a[0]));
    r.register(&["det"], 1, |a, _| det(&a[0]));
}

#[cfg(test)]
mod tests;
