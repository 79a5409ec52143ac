//! Counting and random numbers.

use std::ffi::c_ulong;

use sigma_eval::combinatorics;

use super::{binary_in, unary_in};
use crate::adapter::{guard, SigmaResult};
use crate::context::{boundary_config, SigmaContext};
use crate::value::{check_output, store, SigmaGen};

/// Binomial coefficient `n choose k`; zero when `k > n`.
#[no_mangle]
pub extern "C" fn sigma_gen_comb(
    n: *const SigmaGen,
    k: *const SigmaGen,
    res: *mut SigmaGen,
    ctx: *mut SigmaContext,
) -> SigmaResult {
    binary_in("comb", n, k, res, ctx, |n, k, ctx| {
        combinatorics::comb(n, k, ctx.config())
    })
}

/// Arrangements `n! / (n - k)!`.
#[no_mangle]
pub extern "C" fn sigma_gen_perm(
    n: *const SigmaGen,
    k: *const SigmaGen,
    res: *mut SigmaGen,
    ctx: *mut SigmaContext,
) -> SigmaResult {
    binary_in("perm", n, k, res, ctx, |n, k, ctx| {
        combinatorics::perm(n, k, ctx.config())
    })
}

/// `n!` as an exact integer, limited by `SIGMA_FACTORIAL_LIMIT`.
#[no_mangle]
pub extern "C" fn sigma_gen_factorial(n: c_ulong, res: *mut SigmaGen) -> SigmaResult {
    guard("factorial", || {
        check_output(res, "res")?;
        let value = combinatorics::factorial(u64::from(n), boundary_config())?;
        // SAFETY: `res` was checked above.
        unsafe { store(res, value) };
        Ok(())
    })
}

/// Uniform integer in `[0, n)` for integer `n`, uniform real for real `n`.
#[no_mangle]
pub extern "C" fn sigma_gen_rand(
    n: *const SigmaGen,
    res: *mut SigmaGen,
    ctx: *mut SigmaContext,
) -> SigmaResult {
    unary_in("rand", n, res, ctx, |n, ctx| {
        combinatorics::random_below(n, ctx.rng())
    })
}
