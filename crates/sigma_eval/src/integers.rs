//! Integer number theory: gcd family, Euclidean division, modular solvers,
//! totient and residue symbols.

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};
use sigma_gen::{
    division_by_zero, domain_error, not_an_integer, Fault, Gen, GenResult,
};

use crate::config::EngineConfig;
use crate::poly;
use crate::primes::{factorize, is_prime};

/// Exact integer argument of `op`.
pub(crate) fn integer_arg(op: &str, g: &Gen) -> Result<BigInt, Fault> {
    g.to_bigint().ok_or_else(|| not_an_integer(op, g))
}

fn nonzero_divisor(op: &str, b: &BigInt) -> Result<(), Fault> {
    if b.is_zero() {
        Err(division_by_zero().in_op(op))
    } else {
        Ok(())
    }
}

// gcd / lcm

/// Greatest common divisor of two integers (non-negative) or two polynomials.
pub fn gcd(a: &Gen, b: &Gen) -> GenResult {
    match (a.to_bigint(), b.to_bigint()) {
        (Some(x), Some(y)) => Ok(Gen::from_bigint(x.gcd(&y))),
        _ if is_polynomial_arg(a) && is_polynomial_arg(b) => poly::gcd(a, b),
        _ => Err(not_an_integer("gcd", if a.is_integer() { b } else { a })),
    }
}

/// Least common multiple of two integers (non-negative) or two polynomials.
pub fn lcm(a: &Gen, b: &Gen) -> GenResult {
    match (a.to_bigint(), b.to_bigint()) {
        (Some(x), Some(y)) => Ok(Gen::from_bigint(x.lcm(&y))),
        _ if is_polynomial_arg(a) && is_polynomial_arg(b) => poly::lcm(a, b),
        _ => Err(not_an_integer("lcm", if a.is_integer() { b } else { a })),
    }
}

fn is_polynomial_arg(g: &Gen) -> bool {
    g.is_exact() || matches!(g, Gen::Ident(_) | Gen::Symb(_))
}

// Euclidean division

/// Truncated quotient and remainder: `a = b*q + r`, `r` has the sign of `a`.
pub fn iquorem(a: &Gen, b: &Gen) -> Result<(Gen, Gen), Fault> {
    let x = integer_arg("iquorem", a)?;
    let y = integer_arg("iquorem", b)?;
    nonzero_divisor("iquorem", &y)?;
    let (q, r) = x.div_rem(&y);
    Ok((Gen::from_bigint(q), Gen::from_bigint(r)))
}

/// Quotient truncated toward zero: `iquo(7, -2) = -3`.
pub fn iquo(a: &Gen, b: &Gen) -> GenResult {
    let x = integer_arg("iquo", a)?;
    let y = integer_arg("iquo", b)?;
    nonzero_divisor("iquo", &y)?;
    Ok(Gen::from_bigint(x / y))
}

/// Remainder with the sign of `a`: `irem(7, -2) = 1`.
pub fn irem(a: &Gen, b: &Gen) -> GenResult {
    let x = integer_arg("irem", a)?;
    let y = integer_arg("irem", b)?;
    nonzero_divisor("irem", &y)?;
    Ok(Gen::from_bigint(x % y))
}

// Bezout

/// `(u, v, d)` with `a*u + b*v = d = gcd(a, b) >= 0`.
pub(crate) fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.abs(), b.abs());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());
    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
        let next_t = &old_t - &q * &t;
        old_t = std::mem::replace(&mut t, next_t);
    }
    let u = if a.is_negative() { -old_s } else { old_s };
    let v = if b.is_negative() { -old_t } else { old_t };
    (u, v, old_r)
}

/// `(u, v, d)` with `a*u + b*v = d = gcd(a, b)`.
pub fn iegcd(a: &Gen, b: &Gen) -> Result<(Gen, Gen, Gen), Fault> {
    let x = integer_arg("iegcd", a)?;
    let y = integer_arg("iegcd", b)?;
    let (u, v, d) = extended_gcd(&x, &y);
    Ok((Gen::from_bigint(u), Gen::from_bigint(v), Gen::from_bigint(d)))
}

/// Solve `a*u + b*v = c` with `0 <= u < |b/gcd(a,b)|`.
pub fn iabcuv(a: &Gen, b: &Gen, c: &Gen) -> Result<(Gen, Gen), Fault> {
    let x = integer_arg("iabcuv", a)?;
    let y = integer_arg("iabcuv", b)?;
    let z = integer_arg("iabcuv", c)?;
    let (u, v, d) = extended_gcd(&x, &y);

    if d.is_zero() {
        // a = b = 0
        return if z.is_zero() {
            Ok((Gen::int(0), Gen::int(0)))
        } else {
            Err(no_solution("iabcuv"))
        };
    }
    if !(&z % &d).is_zero() {
        return Err(no_solution("iabcuv"));
    }
    let scale = &z / &d;
    let u = u * &scale;
    let v = v * &scale;
    if y.is_zero() {
        return Ok((Gen::from_bigint(u), Gen::from_bigint(v)));
    }

    let period = (&y / &d).abs();
    let reduced_u = u.mod_floor(&period);
    let reduced_v = (&z - &x * &reduced_u) / &y;
    Ok((Gen::from_bigint(reduced_u), Gen::from_bigint(reduced_v)))
}

#[cold]
fn no_solution(op: &str) -> Fault {
    domain_error(op, "no solution")
}

/// `x` with `x = a (mod m)`, `x = b (mod n)` and `0 <= x < lcm(m, n)`.
pub fn ichinrem(a: &Gen, m: &Gen, b: &Gen, n: &Gen) -> GenResult {
    let a = integer_arg("ichinrem", a)?;
    let m = integer_arg("ichinrem", m)?.abs();
    let b = integer_arg("ichinrem", b)?;
    let n = integer_arg("ichinrem", n)?.abs();
    if m.is_zero() || n.is_zero() {
        return Err(domain_error("ichinrem", "moduli must be non-zero"));
    }

    let (u, _, g) = extended_gcd(&m, &n);
    let diff = &b - &a;
    if !(&diff % &g).is_zero() {
        return Err(no_solution("ichinrem"));
    }
    let n_reduced = &n / &g;
    let k = ((&diff / &g) * u).mod_floor(&n_reduced);
    let modulus = &m * &n_reduced;
    let x = (a + m * k).mod_floor(&modulus);
    Ok(Gen::from_bigint(x))
}

/// `(a, b)` with `a^2 + b^2 = p` and `a >= b >= 1`, for a prime `p` that is 2
/// or `1 (mod 4)`.
pub fn pa2b2(p: &Gen) -> Result<(Gen, Gen), Fault> {
    let prime = integer_arg("pa2b2", p)?;
    if !is_prime(&prime) {
        return Err(domain_error("pa2b2", "argument must be a prime"));
    }
    if prime == BigInt::from(2) {
        return Ok((Gen::int(1), Gen::int(1)));
    }
    if !(&prime % 4u32).is_one() {
        return Err(domain_error("pa2b2", "prime must be 1 mod 4"));
    }

    // x^2 = -1 (mod p) from any quadratic non-residue c: x = c^((p-1)/4)
    let exponent: BigInt = (&prime - 1u32) / 4u32;
    let mut c = BigInt::from(2);
    while jacobi_symbol(&c, &prime) != -1 {
        c += 1u32;
    }
    let x = c.modpow(&exponent, &prime);

    // Hermite-Serret: Euclid on (p, x) stops at the first remainder below sqrt(p)
    let limit = prime.sqrt();
    let (mut r0, mut r1) = (prime.clone(), x);
    while r1 > limit {
        let next = &r0 % &r1;
        r0 = std::mem::replace(&mut r1, next);
    }
    let a = r1;
    let b = (&prime - &a * &a).sqrt();
    if &a * &a + &b * &b != prime {
        return Err(sigma_gen::internal_error("pa2b2 decomposition failed"));
    }
    let (big, small) = if a >= b { (a, b) } else { (b, a) };
    Ok((Gen::from_bigint(big), Gen::from_bigint(small)))
}

// Totient and residue symbols

/// Euler's totient, `n >= 1`.
pub fn euler(n: &Gen, config: &EngineConfig) -> GenResult {
    let value = integer_arg("euler", n)?;
    if !value.is_positive() {
        return Err(domain_error("euler", "argument must be a positive integer"));
    }
    let mut phi = value.clone();
    for (p, _) in factorize(&value, config)? {
        phi = phi / &p * (&p - 1u32);
    }
    Ok(Gen::from_bigint(phi))
}

/// Jacobi symbol `(a/n)` for odd positive `n`.
pub(crate) fn jacobi_symbol(a: &BigInt, n: &BigInt) -> i8 {
    let mut a = a.mod_floor(n);
    let mut n = n.clone();
    let mut result = 1i8;
    while !a.is_zero() {
        while a.is_even() {
            a >>= 1u32;
            let r = (&n % 8u32).to_u8().unwrap_or(0);
            if r == 3 || r == 5 {
                result = -result;
            }
        }
        std::mem::swap(&mut a, &mut n);
        if (&a % 4u32).to_u8() == Some(3) && (&n % 4u32).to_u8() == Some(3) {
            result = -result;
        }
        a = a.mod_floor(&n);
    }
    if n.is_one() {
        result
    } else {
        0
    }
}

/// Jacobi symbol `(a/n)`; `n` must be odd and positive.
pub fn jacobi(a: &Gen, n: &Gen) -> Result<i8, Fault> {
    let a = integer_arg("jacobi", a)?;
    let n = integer_arg("jacobi", n)?;
    if !n.is_positive() || n.is_even() {
        return Err(domain_error("jacobi", "modulus must be an odd positive integer"));
    }
    Ok(jacobi_symbol(&a, &n))
}

/// Legendre symbol; `p` must be an odd prime.
pub fn legendre(a: &Gen, p: &Gen) -> Result<i8, Fault> {
    let a = integer_arg("legendre", a)?;
    let p = integer_arg("legendre", p)?;
    if p <= BigInt::from(2) || !is_prime(&p) {
        return Err(domain_error("legendre", "modulus must be an odd prime"));
    }
    Ok(jacobi_symbol(&a, &p))
}

// Parity

/// `true` for even integers; non-integers are a fault.
pub fn even(n: &Gen) -> Result<bool, Fault> {
    Ok(integer_arg("even", n)?.is_even())
}

/// `true` for odd integers; non-integers are a fault.
pub fn odd(n: &Gen) -> Result<bool, Fault> {
    Ok(integer_arg("odd", n)?.is_odd())
}

// Rational approximation

/// Most steps a continued fraction may take before giving up on `epsilon`.
const MAX_CONVERGENTS: usize = 64;

/// Best continued-fraction convergent within `epsilon` of each inexact number.
pub fn float2rational(g: &Gen, epsilon: f64) -> GenResult {
    match g {
        _ if g.is_exact() => Ok(g.clone()),
        Gen::Double(_) | Gen::Float(_) => {
            let value = g.to_f64().unwrap_or(f64::NAN);
            approximate(value, epsilon).map(Gen::from_ratio)
        }
        Gen::Vect(items) => items
            .iter()
            .map(|item| float2rational(item, epsilon))
            .collect::<Result<Vec<_>, _>>()
            .map(Gen::Vect),
        _ => Err(domain_error(
            "float2rational",
            format!("expected a number, got {}", g.gen_type().name()),
        )),
    }
}

fn approximate(value: f64, epsilon: f64) -> Result<BigRational, Fault> {
    if !value.is_finite() {
        return Err(domain_error("float2rational", "argument must be finite"));
    }
    let target = value.abs();
    let (mut h_prev, mut h) = (BigInt::zero(), BigInt::one());
    let (mut k_prev, mut k) = (BigInt::one(), BigInt::zero());
    let mut rest = target;

    for _ in 0..MAX_CONVERGENTS {
        let whole = rest.floor();
        let a = BigInt::from_f64(whole)
            .ok_or_else(|| domain_error("float2rational", "argument out of range"))?;
        let h_next = &a * &h + &h_prev;
        let k_next = &a * &k + &k_prev;
        h_prev = std::mem::replace(&mut h, h_next);
        k_prev = std::mem::replace(&mut k, k_next);

        let approx = h.to_f64().unwrap_or(f64::INFINITY) / k.to_f64().unwrap_or(1.0);
        let frac = rest - whole;
        if (approx - target).abs() <= epsilon || frac == 0.0 {
            break;
        }
        rest = 1.0 / frac;
    }

    let sign = if value < 0.0 { Sign::Minus } else { Sign::Plus };
    let numer = BigInt::from_biguint(sign, h.magnitude().clone());
    Ok(BigRational::new(numer, k))
}

#[cfg(test)]
mod tests;
