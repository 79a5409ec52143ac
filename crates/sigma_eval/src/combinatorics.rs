//! Factorials, binomials, arrangements and random numbers.

use num_bigint::{BigInt, RandBigInt};
use num_traits::{One, Signed, ToPrimitive, Zero};
use rand::Rng;
use sigma_gen::{domain_error, exponent_too_large, Fault, Gen, GenResult};

use crate::config::EngineConfig;
use crate::integers::integer_arg;

/// Product of `lo..=hi`, split in halves so the operands stay balanced.
fn range_product(lo: u64, hi: u64) -> BigInt {
    match hi.checked_sub(lo) {
        None => BigInt::one(),
        Some(0) => BigInt::from(lo),
        Some(1) => BigInt::from(lo) * hi,
        Some(span) => {
            let mid = lo + span / 2;
            range_product(lo, mid) * range_product(mid + 1, hi)
        }
    }
}

/// `n!` for `n <= config.factorial_limit`.
pub fn factorial(n: u64, config: &EngineConfig) -> GenResult {
    if n > config.factorial_limit {
        return Err(domain_error(
            "factorial",
            format!("argument {n} exceeds the limit of {}", config.factorial_limit),
        ));
    }
    Ok(Gen::from_bigint(range_product(1, n)))
}

/// `factorial` on an engine value, as reached from `n!` and `factorial(n)`.
pub fn factorial_of(n: &Gen, config: &EngineConfig) -> GenResult {
    let value = integer_arg("factorial", n)?;
    if value.is_negative() {
        return Err(domain_error("factorial", "argument must be non-negative"));
    }
    let n = value
        .to_u64()
        .ok_or_else(|| exponent_too_large("factorial"))?;
    factorial(n, config)
}

fn counting_args(op: &str, n: &Gen, k: &Gen) -> Result<(BigInt, BigInt), Fault> {
    let n = integer_arg(op, n)?;
    let k = integer_arg(op, k)?;
    if n.is_negative() || k.is_negative() {
        return Err(domain_error(op, "arguments must be non-negative"));
    }
    Ok((n, k))
}

/// Binomial coefficient `C(n, k)`; zero when `k > n`.
pub fn comb(n: &Gen, k: &Gen, config: &EngineConfig) -> GenResult {
    let (n, k) = counting_args("comb", n, k)?;
    if k > n {
        return Ok(Gen::int(0));
    }
    let k = k.clone().min(&n - &k);
    let steps = k
        .to_u64()
        .filter(|&s| s <= config.factorial_limit)
        .ok_or_else(|| exponent_too_large("comb"))?;

    let mut result = BigInt::one();
    let mut factor = &n - &k;
    for i in 1..=steps {
        factor += 1u32;
        result = result * &factor / i;
    }
    Ok(Gen::from_bigint(result))
}

/// Arrangements `P(n, k) = n! / (n-k)!`; zero when `k > n`.
pub fn perm(n: &Gen, k: &Gen, config: &EngineConfig) -> GenResult {
    let (n, k) = counting_args("perm", n, k)?;
    if k > n {
        return Ok(Gen::int(0));
    }
    let steps = k
        .to_u64()
        .filter(|&s| s <= config.factorial_limit)
        .ok_or_else(|| exponent_too_large("perm"))?;

    let mut result = BigInt::one();
    let mut factor = n;
    for _ in 0..steps {
        result *= &factor;
        factor -= 1u32;
    }
    Ok(Gen::from_bigint(result))
}

/// Uniform integer in `[0, n)` for integer `n > 0`, uniform real in `[0, n)`
/// for real `n > 0`.
pub fn random_below<R: Rng + ?Sized>(n: &Gen, rng: &mut R) -> GenResult {
    if let Some(bound) = n.to_bigint() {
        if !bound.is_positive() {
            return Err(domain_error("rand", "bound must be positive"));
        }
        return Ok(Gen::from_bigint(rng.gen_bigint_range(&BigInt::zero(), &bound)));
    }
    match n.to_f64() {
        Some(bound) if bound > 0.0 && bound.is_finite() => {
            Ok(Gen::double(rng.gen::<f64>() * bound))
        }
        Some(_) => Err(domain_error("rand", "bound must be positive")),
        None => Err(domain_error(
            "rand",
            format!("expected a number, got {}", n.gen_type().name()),
        )),
    }
}

#[cfg(test)]
mod tests;
