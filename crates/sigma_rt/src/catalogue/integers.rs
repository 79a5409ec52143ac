//! Integer number theory, primes and factorization.
//!
//! Factorization honours the context's `factor_iterations` budget and fails
//! with a domain error rather than searching indefinitely.

use sigma_eval::{integers, primes};
use sigma_gen::{Fault, Gen};

use super::{binary, binary_in, predicate, store_scalar, unary, unary_in};
use crate::adapter::{guard, SigmaResult};
use crate::context::{context, SigmaContext};
use crate::value::{check_output, input, store, SigmaGen};

// gcd family

/// Non-negative gcd of integers, or the polynomial gcd of expressions.
#[no_mangle]
pub extern "C" fn sigma_gen_gcd(
    a: *const SigmaGen,
    b: *const SigmaGen,
    res: *mut SigmaGen,
    ctx: *mut SigmaContext,
) -> SigmaResult {
    binary_in("gcd", a, b, res, ctx, |a, b, _| integers::gcd(a, b))
}

/// Non-negative lcm of integers, or the polynomial lcm of expressions.
#[no_mangle]
pub extern "C" fn sigma_gen_lcm(
    a: *const SigmaGen,
    b: *const SigmaGen,
    res: *mut SigmaGen,
) -> SigmaResult {
    binary("lcm", a, b, res, integers::lcm)
}

/// `a*u + b*v = d = gcd(a, b)`.
#[no_mangle]
pub extern "C" fn sigma_gen_iegcd(
    a: *const SigmaGen,
    b: *const SigmaGen,
    u: *mut SigmaGen,
    v: *mut SigmaGen,
    d: *mut SigmaGen,
) -> SigmaResult {
    guard("iegcd", || {
        check_output(u, "u")?;
        check_output(v, "v")?;
        check_output(d, "d")?;
        // SAFETY: the caller passes live handles; borrows end before the stores.
        let (x, y, g) = unsafe { integers::iegcd(input(a, "a")?, input(b, "b")?) }?;
        unsafe {
            store(u, x);
            store(v, y);
            store(d, g);
        }
        Ok(())
    })
}

/// Solve `a*u + b*v = c` with `0 <= u < |b / gcd(a, b)|`.
#[no_mangle]
pub extern "C" fn sigma_gen_iabcuv(
    a: *const SigmaGen,
    b: *const SigmaGen,
    c: *const SigmaGen,
    u: *mut SigmaGen,
    v: *mut SigmaGen,
    ctx: *mut SigmaContext,
) -> SigmaResult {
    guard("iabcuv", || {
        check_output(u, "u")?;
        check_output(v, "v")?;
        // SAFETY: as in `sigma_gen_iegcd`; the context is only validated.
        let (x, y) = unsafe {
            context(ctx)?;
            integers::iabcuv(input(a, "a")?, input(b, "b")?, input(c, "c")?)
        }?;
        unsafe {
            store(u, x);
            store(v, y);
        }
        Ok(())
    })
}

/// `res = a (mod amod)` and `res = b (mod bmod)`, `0 <= res < lcm(amod, bmod)`.
#[no_mangle]
pub extern "C" fn sigma_gen_ichinrem(
    a: *const SigmaGen,
    amod: *const SigmaGen,
    b: *const SigmaGen,
    bmod: *const SigmaGen,
    res: *mut SigmaGen,
) -> SigmaResult {
    guard("ichinrem", || {
        check_output(res, "res")?;
        // SAFETY: the caller passes live handles; borrows end before the store.
        let value = unsafe {
            integers::ichinrem(
                input(a, "a")?,
                input(amod, "amod")?,
                input(b, "b")?,
                input(bmod, "bmod")?,
            )
        }?;
        unsafe { store(res, value) };
        Ok(())
    })
}

/// `a^2 + b^2 = p` for a prime `p` equal to 2 or 1 mod 4, with `a >= b`.
#[no_mangle]
pub extern "C" fn sigma_gen_pa2b2(
    p: *const SigmaGen,
    a: *mut SigmaGen,
    b: *mut SigmaGen,
    ctx: *mut SigmaContext,
) -> SigmaResult {
    guard("pa2b2", || {
        check_output(a, "a")?;
        check_output(b, "b")?;
        // SAFETY: as in `sigma_gen_iegcd`.
        let (x, y) = unsafe {
            context(ctx)?;
            integers::pa2b2(input(p, "p")?)
        }?;
        unsafe {
            store(a, x);
            store(b, y);
        }
        Ok(())
    })
}

/// Euler's totient of a positive integer.
#[no_mangle]
pub extern "C" fn sigma_gen_euler(
    n: *const SigmaGen,
    res: *mut SigmaGen,
    ctx: *mut SigmaContext,
) -> SigmaResult {
    unary_in("euler", n, res, ctx, |n, ctx| integers::euler(n, ctx.config()))
}

// Euclidean division

/// Quotient truncated toward zero.
#[no_mangle]
pub extern "C" fn sigma_gen_iquo(
    a: *const SigmaGen,
    b: *const SigmaGen,
    res: *mut SigmaGen,
) -> SigmaResult {
    binary("iquo", a, b, res, integers::iquo)
}

/// Remainder with the sign of `a`.
#[no_mangle]
pub extern "C" fn sigma_gen_irem(
    a: *const SigmaGen,
    b: *const SigmaGen,
    res: *mut SigmaGen,
) -> SigmaResult {
    binary("irem", a, b, res, integers::irem)
}

/// Truncated quotient and remainder; `r` has the sign of `a`.
#[no_mangle]
pub extern "C" fn sigma_gen_iquorem(
    a: *const SigmaGen,
    b: *const SigmaGen,
    q: *mut SigmaGen,
    r: *mut SigmaGen,
) -> SigmaResult {
    guard("iquorem", || {
        check_output(q, "q")?;
        check_output(r, "r")?;
        // SAFETY: as in `sigma_gen_iegcd`.
        let (quo, rem) = unsafe { integers::iquorem(input(a, "a")?, input(b, "b")?) }?;
        unsafe {
            store(q, quo);
            store(r, rem);
        }
        Ok(())
    })
}

// Residue symbols and parity

/// Legendre symbol `(a/p)` for an odd prime `p`.
#[no_mangle]
pub extern "C" fn sigma_gen_legendre(
    a: *const SigmaGen,
    p: *const SigmaGen,
    res: *mut i8,
) -> SigmaResult {
    guard("legendre", || {
        check_output(res, "res")?;
        // SAFETY: the caller passes live handles and a writable slot.
        let symbol = unsafe { integers::legendre(input(a, "a")?, input(p, "p")?) }?;
        unsafe { store_scalar(res, symbol) };
        Ok(())
    })
}

/// Jacobi symbol `(a/n)` for odd positive `n`.
#[no_mangle]
pub extern "C" fn sigma_gen_jacobi(
    a: *const SigmaGen,
    n: *const SigmaGen,
    res: *mut i8,
) -> SigmaResult {
    guard("jacobi", || {
        check_output(res, "res")?;
        // SAFETY: as in `sigma_gen_legendre`.
        let symbol = unsafe { integers::jacobi(input(a, "a")?, input(n, "n")?) }?;
        unsafe { store_scalar(res, symbol) };
        Ok(())
    })
}

fn parity(
    op: &'static str,
    n: *const SigmaGen,
    res: *mut bool,
    ctx: *mut SigmaContext,
    f: fn(&Gen) -> Result<bool, Fault>,
) -> SigmaResult {
    guard(op, || {
        check_output(res, "res")?;
        // SAFETY: the caller passes live handles and a writable slot.
        let value = unsafe {
            context(ctx)?;
            f(input(n, "n")?)
        }?;
        unsafe { store_scalar(res, value) };
        Ok(())
    })
}

/// Parity of an integer.
#[no_mangle]
pub extern "C" fn sigma_gen_even(
    n: *const SigmaGen,
    res: *mut bool,
    ctx: *mut SigmaContext,
) -> SigmaResult {
    parity("even", n, res, ctx, integers::even)
}

#[no_mangle]
pub extern "C" fn sigma_gen_odd(
    n: *const SigmaGen,
    res: *mut bool,
    ctx: *mut SigmaContext,
) -> SigmaResult {
    parity("odd", n, res, ctx, integers::odd)
}

/// Continued-fraction convergent of `f` within the context's epsilon.
#[no_mangle]
pub extern "C" fn sigma_gen_float2rational(
    f: *const SigmaGen,
    res: *mut SigmaGen,
    ctx: *mut SigmaContext,
) -> SigmaResult {
    unary_in("float2rational", f, res, ctx, |f, ctx| {
        integers::float2rational(f, ctx.epsilon())
    })
}

// Primes

/// `0` composite, `1` probable prime, `2` proven prime.
#[no_mangle]
pub extern "C" fn sigma_gen_is_pseudoprime(n: *const SigmaGen, res: *mut i8) -> SigmaResult {
    predicate("is_pseudoprime", n, res, |n| {
        primes::is_pseudoprime(n).map(|p| p as i8)
    })
}

/// Smallest prime greater than `n`.
#[no_mangle]
pub extern "C" fn sigma_gen_nextprime(n: *const SigmaGen, res: *mut SigmaGen) -> SigmaResult {
    unary("nextprime", n, res, primes::nextprime)
}

/// Largest prime smaller than `n`; a fault for `n <= 2`.
#[no_mangle]
pub extern "C" fn sigma_gen_prevprime(n: *const SigmaGen, res: *mut SigmaGen) -> SigmaResult {
    unary("prevprime", n, res, primes::prevprime)
}

/// The `n`-th prime, 1-based.
#[no_mangle]
pub extern "C" fn sigma_gen_nthprime(
    n: *const SigmaGen,
    res: *mut SigmaGen,
    ctx: *mut SigmaContext,
) -> SigmaResult {
    unary_in("nthprime", n, res, ctx, |n, ctx| primes::nthprime(n, ctx.config()))
}

// Factorization

/// `n` as a product of prime powers, e.g. `2^2*3`.
#[no_mangle]
pub extern "C" fn sigma_gen_ifactor(
    n: *const SigmaGen,
    res: *mut SigmaGen,
    ctx: *mut SigmaContext,
) -> SigmaResult {
    unary_in("ifactor", n, res, ctx, |n, ctx| primes::ifactor(n, ctx.config()))
}

/// Flat `[p1, e1, p2, e2, ...]`, led by `-1, 1` when `n` is negative.
#[no_mangle]
pub extern "C" fn sigma_gen_ifactors(
    n: *const SigmaGen,
    res: *mut SigmaGen,
    ctx: *mut SigmaContext,
) -> SigmaResult {
    unary_in("ifactors", n, res, ctx, |n, ctx| primes::ifactors(n, ctx.config()))
}

/// `[sign, [[p1, e1], [p2, e2], ...]]`.
#[no_mangle]
pub extern "C" fn sigma_gen_maple_ifactors(
    n: *const SigmaGen,
    res: *mut SigmaGen,
    ctx: *mut SigmaContext,
) -> SigmaResult {
    unary_in("maple_ifactors", n, res, ctx, |n, ctx| {
        primes::maple_ifactors(n, ctx.config())
    })
}

/// Sorted positive divisors of `|n|`.
#[no_mangle]
pub extern "C" fn sigma_gen_divisors(
    n: *const SigmaGen,
    res: *mut SigmaGen,
    ctx: *mut SigmaContext,
) -> SigmaResult {
    unary_in("divisors", n, res, ctx, |n, ctx| primes::divisors(n, ctx.config()))
}
