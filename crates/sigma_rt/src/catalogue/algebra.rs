//! Symbolic algebra and determinants.

use sigma_eval::{linalg, poly};

use super::unary_in;
use crate::adapter::SigmaResult;
use crate::context::SigmaContext;
use crate::value::SigmaGen;

/// Integer factorization, or a product of polynomial factors for expressions.
#[no_mangle]
pub extern "C" fn sigma_gen_factor(
    e: *const SigmaGen,
    res: *mut SigmaGen,
    ctx: *mut SigmaContext,
) -> SigmaResult {
    unary_in("factor", e, res, ctx, |e, ctx| poly::factor(e, ctx.config()))
}

/// Normal form: expanded numerator over expanded denominator, common factors cancelled.
#[no_mangle]
pub extern "C" fn sigma_gen_simplify(
    e: *const SigmaGen,
    res: *mut SigmaGen,
    ctx: *mut SigmaContext,
) -> SigmaResult {
    unary_in("simplify", e, res, ctx, |e, _| poly::simplify(e))
}

/// Determinant of a square matrix.
#[no_mangle]
pub extern "C" fn sigma_gen_det(
    m: *const SigmaGen,
    res: *mut SigmaGen,
    ctx: *mut SigmaContext,
) -> SigmaResult {
    unary_in("det", m, res, ctx, |m, _| linalg::det(m))
}
