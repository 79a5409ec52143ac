//! Primality, prime enumeration and integer factorization.
//!
//! Factorization is trial division up to `TRIAL_BOUND`, then Pollard-Brent
//! on what is left, with every Pollard-Brent step charged to
//! [`EngineConfig::factor_iterations`]. Complete factorizations are memoised
//! in [`globals`].

use std::collections::BTreeMap;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use sigma_gen::{domain_error, internal_error, Fault, FaultKind, Gen, GenResult, Op};

use crate::config::EngineConfig;
use crate::globals::{self, Factorization};
use crate::integers::integer_arg;

/// Miller-Rabin bases that are deterministic below `DETERMINISTIC_BOUND`.
const WITNESSES: [u64; 13] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41];

/// Extra bases tried above the deterministic range.
const EXTRA_WITNESSES: [u64; 7] = [43, 47, 53, 59, 61, 67, 71];

/// Below this, passing every base in `WITNESSES` proves primality.
const DETERMINISTIC_BOUND: u128 = 3_317_044_064_679_887_385_961_981;

/// Trial division covers primes up to here before Pollard-Brent takes over.
const TRIAL_BOUND: u64 = 10_000;

/// Result of a primality test, in the order reported across the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i8)]
pub enum Primality {
    Composite = 0,
    /// Passed every test, but not proven.
    Probable = 1,
    Proven = 2,
}

/// Trial division by the witness primes, then Miller-Rabin. Proven below
/// `DETERMINISTIC_BOUND`, probable above it.
pub fn primality(n: &BigInt) -> Primality {
    if *n < BigInt::from(2) {
        return Primality::Composite;
    }
    for &p in &WITNESSES {
        if *n == BigInt::from(p) {
            return Primality::Proven;
        }
        if (n % p).is_zero() {
            return Primality::Composite;
        }
    }
    if !WITNESSES.iter().all(|&base| miller_rabin(n, base)) {
        return Primality::Composite;
    }
    if *n < BigInt::from(DETERMINISTIC_BOUND) {
        return Primality::Proven;
    }
    if EXTRA_WITNESSES.iter().all(|&base| miller_rabin(n, base)) {
        Primality::Probable
    } else {
        Primality::Composite
    }
}

/// Prime or probable prime.
pub fn is_prime(n: &BigInt) -> bool {
    primality(n) != Primality::Composite
}

/// One strong-probable-prime round. `n` must be odd and greater than `base`.
fn miller_rabin(n: &BigInt, base: u64) -> bool {
    let n_minus_one = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;
    let mut x = BigInt::from(base).modpow(&d, n);
    if x.is_one() || x == n_minus_one {
        return true;
    }
    for _ in 1..s {
        x = (&x * &x) % n;
        if x == n_minus_one {
            return true;
        }
        if x.is_one() {
            return false;
        }
    }
    false
}

/// Smallest prime strictly greater than `n`.
pub fn next_prime(n: &BigInt) -> BigInt {
    let two = BigInt::from(2);
    if *n < two {
        return two;
    }
    let mut candidate = n + 1u32;
    if candidate.is_even() {
        candidate += 1u32;
    }
    while !is_prime(&candidate) {
        candidate += 2u32;
    }
    candidate
}

/// Largest prime strictly smaller than `n`, if any.
pub fn prev_prime(n: &BigInt) -> Option<BigInt> {
    if *n <= BigInt::from(2) {
        return None;
    }
    if *n == BigInt::from(3) {
        return Some(BigInt::from(2));
    }
    let mut candidate = n - 1u32;
    if candidate.is_even() {
        candidate -= 1u32;
    }
    while !is_prime(&candidate) {
        candidate -= 2u32;
    }
    Some(candidate)
}

/// Upper bound on the `n`-th prime (Rosser's theorem), `n >= 1`.
fn nth_prime_bound(n: u64) -> u64 {
    if n < 6 {
        return 13;
    }
    #[allow(clippy::cast_precision_loss, reason = "estimate only")]
    let x = n as f64;
    let estimate = x * (x.ln() + x.ln().ln());
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "positive estimate far below u64::MAX"
    )]
    let bound = estimate.ceil() as u64;
    bound + 3
}

/// The `n`-th prime, 1-based.
pub fn nth_prime(n: u64, limit: u64) -> Result<u64, Fault> {
    if n == 0 {
        return Err(domain_error("nthprime", "index must be at least 1"));
    }
    if n > limit {
        return Err(nth_prime_too_big());
    }
    let index = usize::try_from(n - 1).map_err(|_| nth_prime_too_big())?;
    globals::with_primes(nth_prime_bound(n), |primes| primes.get(index).copied())
        .ok_or_else(|| internal_error("prime sieve shorter than its bound"))
}

#[cold]
fn nth_prime_too_big() -> Fault {
    Fault::new(
        FaultKind::Domain,
        "Failed to compute nthprime, argument is too big",
    )
}

// Factorization

/// Prime factors of `|n|`, ascending. Empty for `0` and `+-1`.
///
/// Pollard-Brent may spend at most `config.factor_iterations` steps in
/// total; past that the factorization fails with a domain fault instead of
/// running unbounded. Only complete factorizations are memoised.
pub fn factorize(n: &BigInt, config: &EngineConfig) -> Result<Factorization, Fault> {
    let mut remaining = n.abs();
    if remaining <= BigInt::one() {
        return Ok(Vec::new());
    }
    if let Some(known) = globals::cached_factors(&remaining) {
        return Ok(known);
    }
    let key = remaining.clone();

    let mut found: BTreeMap<BigInt, u32> = BTreeMap::new();
    let small: Vec<u64> = globals::with_primes(TRIAL_BOUND, |primes| {
        primes.iter().copied().take_while(|&p| p <= TRIAL_BOUND).collect()
    });
    for p in small {
        if BigInt::from(p) * p > remaining {
            break;
        }
        while (&remaining % p).is_zero() {
            remaining /= p;
            *found.entry(BigInt::from(p)).or_insert(0) += 1;
        }
    }
    if remaining > BigInt::one() {
        let mut splitter = Splitter {
            budget: config.factor_iterations,
            found: &mut found,
        };
        splitter.split(remaining).map_err(|stuck| {
            tracing::warn!(
                n = %key,
                composite = %stuck,
                budget = config.factor_iterations,
                "factor budget exhausted"
            );
            factor_budget_exhausted(&key, config.factor_iterations)
        })?;
    }

    let factors: Factorization = found.into_iter().collect();
    globals::remember_factors(key, factors.clone(), config.factor_cache_capacity);
    Ok(factors)
}

#[cold]
fn factor_budget_exhausted(n: &BigInt, budget: u64) -> Fault {
    Fault::new(
        FaultKind::Domain,
        format!("Failed to factor {n}: no factor found within {budget} iterations"),
    )
}

/// Splits composites with no factor below `TRIAL_BOUND`, charging every
/// Pollard-Brent step against a shared budget.
struct Splitter<'a> {
    budget: u64,
    found: &'a mut BTreeMap<BigInt, u32>,
}

impl Splitter<'_> {
    /// Record the prime factors of `n`. On budget exhaustion returns the
    /// composite that could not be split.
    fn split(&mut self, n: BigInt) -> Result<(), BigInt> {
        if n.is_one() {
            return Ok(());
        }
        if is_prime(&n) {
            *self.found.entry(n).or_insert(0) += 1;
            return Ok(());
        }
        let root = n.sqrt();
        if &root * &root == n {
            self.split(root.clone())?;
            return self.split(root);
        }
        match pollard_brent(&n, &mut self.budget) {
            Some(d) => {
                let cofactor = &n / &d;
                self.split(d)?;
                self.split(cofactor)
            }
            None if self.budget == 0 => Err(n),
            None => {
                tracing::warn!(%n, "pollard-brent found no factor; keeping composite");
                *self.found.entry(n).or_insert(0) += 1;
                Ok(())
            }
        }
    }
}

/// A non-trivial factor of the odd composite `n`. Every step is charged to
/// `budget`; `None` with a zero budget means the search was cut short.
fn pollard_brent(n: &BigInt, budget: &mut u64) -> Option<BigInt> {
    const BATCH: u64 = 128;
    if n.is_even() {
        return Some(BigInt::from(2));
    }
    for c in 1u32..=64 {
        let step = |v: &BigInt| (v * v + c) % n;
        let mut y = BigInt::from(2);
        let mut x = y.clone();
        let mut ys = y.clone();
        let mut g = BigInt::one();
        let mut q = BigInt::one();
        let mut r: u64 = 1;

        while g.is_one() {
            // A round walks `r` steps ahead and at most `r` more while batching.
            let cost = r.saturating_mul(2);
            if cost > *budget {
                *budget = 0;
                return None;
            }
            *budget -= cost;
            x.clone_from(&y);
            for _ in 0..r {
                y = step(&y);
            }
            let mut k = 0;
            while k < r && g.is_one() {
                ys.clone_from(&y);
                for _ in 0..BATCH.min(r - k) {
                    y = step(&y);
                    q = (q * (&x - &y).abs()) % n;
                }
                g = q.gcd(n);
                k += BATCH;
            }
            r = r.saturating_mul(2);
        }
        if g == *n {
            loop {
                if *budget == 0 {
                    return None;
                }
                *budget -= 1;
                ys = step(&ys);
                g = (&x - &ys).abs().gcd(n);
                if !g.is_one() {
                    break;
                }
            }
        }
        if g != *n {
            return Some(g);
        }
    }
    None
}

// Gen-level operations

/// [`primality`] of an integer value.
pub fn is_pseudoprime(n: &Gen) -> Result<Primality, Fault> {
    Ok(primality(&integer_arg("is_pseudoprime", n)?))
}

/// Smallest prime greater than `n`.
pub fn nextprime(n: &Gen) -> GenResult {
    Ok(Gen::from_bigint(next_prime(&integer_arg("nextprime", n)?)))
}

pub fn prevprime(n: &Gen) -> GenResult {
    let value = integer_arg("prevprime", n)?;
    prev_prime(&value)
        .map(Gen::from_bigint)
        .ok_or_else(|| domain_error("prevprime", format!("no prime below {value}")))
}

/// The `n`-th prime, refusing indices above `nth_prime_limit`.
pub fn nthprime(n: &Gen, config: &EngineConfig) -> GenResult {
    let index = integer_arg("nthprime", n)?;
    if index.is_negative() {
        return Err(domain_error("nthprime", "index must be at least 1"));
    }
    let index = index.to_u64().ok_or_else(nth_prime_too_big)?;
    let prime = nth_prime(index, config.nth_prime_limit)?;
    Ok(Gen::from_bigint(BigInt::from(prime)))
}

fn prime_power(p: &BigInt, e: u32) -> Gen {
    let base = Gen::from_bigint(p.clone());
    if e == 1 {
        base
    } else {
        Gen::symbolic(Op::Pow, vec![base, Gen::int(i64::from(e))])
    }
}

/// `n` as an unevaluated product of prime powers, e.g. `2^2*3`.
pub fn ifactor(n: &Gen, config: &EngineConfig) -> GenResult {
    let value = integer_arg("ifactor", n)?;
    let factors = factorize(&value, config)?;
    if factors.is_empty() {
        return Ok(Gen::from_bigint(value));
    }
    let mut terms: Vec<Gen> = Vec::with_capacity(factors.len() + 1);
    if value.is_negative() {
        terms.push(Gen::int(-1));
    }
    terms.extend(factors.iter().map(|(p, e)| prime_power(p, *e)));
    Ok(if terms.len() == 1 {
        terms.pop().unwrap_or_default()
    } else {
        Gen::symbolic(Op::Mul, terms)
    })
}

fn nonzero_arg(op: &str, n: &Gen) -> Result<BigInt, Fault> {
    let value = integer_arg(op, n)?;
    if value.is_zero() {
        return Err(domain_error(op, "argument must be non-zero"));
    }
    Ok(value)
}

/// Flat `[p1, e1, p2, e2, ...]`; a negative `n` starts with `-1, 1`.
pub fn ifactors(n: &Gen, config: &EngineConfig) -> GenResult {
    let value = nonzero_arg("ifactors", n)?;
    let mut flat = Vec::new();
    if value.is_negative() {
        flat.extend([Gen::int(-1), Gen::int(1)]);
    }
    for (p, e) in factorize(&value, config)? {
        flat.push(Gen::from_bigint(p));
        flat.push(Gen::int(i64::from(e)));
    }
    Ok(Gen::vector(flat))
}

/// `[sign, [[p1, e1], [p2, e2], ...]]`.
pub fn maple_ifactors(n: &Gen, config: &EngineConfig) -> GenResult {
    let value = nonzero_arg("maple_ifactors", n)?;
    let sign = if value.is_negative() { -1 } else { 1 };
    let pairs = factorize(&value, config)?
        .into_iter()
        .map(|(p, e)| Gen::vector(vec![Gen::from_bigint(p), Gen::int(i64::from(e))]))
        .collect();
    Ok(Gen::vector(vec![Gen::int(sign), Gen::vector(pairs)]))
}

/// Sorted positive divisors of `|n|`.
pub fn divisors(n: &Gen, config: &EngineConfig) -> GenResult {
    let value = nonzero_arg("divisors", n)?;
    let mut all = vec![BigInt::one()];
    for (p, e) in factorize(&value, config)? {
        let mut next = Vec::with_capacity(all.len() * (e as usize + 1));
        for d in &all {
            let mut power = d.clone();
            next.push(power.clone());
            for _ in 0..e {
                power *= &p;
                next.push(power.clone());
            }
        }
        all = next;
    }
    all.sort();
    Ok(Gen::vector(all.into_iter().map(Gen::from_bigint).collect()))
}

#[cfg(test)]
mod tests;
