//! The flat operation catalogue.
//!
//! Every entry point takes its inputs as handles, writes results into
//! caller-owned output handles or scalars, and returns a [`SigmaResult`].

pub mod algebra;
pub mod arith;
pub mod combinatory;
pub mod convert;
pub mod integers;

use sigma_eval::Context;
use sigma_gen::{Fault, Gen, GenResult};

use crate::adapter::{guard, SigmaResult};
use crate::context::{context, SigmaContext};
use crate::value::{check_output, input, store, SigmaGen};

/// Write a plain value through a checked output pointer.
///
/// # Safety
/// `slot` must be non-null, aligned and writable.
pub(crate) unsafe fn store_scalar<T>(slot: *mut T, value: T) {
    slot.write(value);
}

/// `res = f(e)`.
pub(crate) fn unary(
    op: &'static str,
    e: *const SigmaGen,
    res: *mut SigmaGen,
    f: impl FnOnce(&Gen) -> GenResult,
) -> SigmaResult {
    guard(op, || {
        check_output(res, "res")?;
        // SAFETY: the caller passes live handles; the borrow ends before the store.
        let value = f(unsafe { input(e, "e") }?)?;
        unsafe { store(res, value) };
        Ok(())
    })
}

/// `res = f(e, ctx)`.
pub(crate) fn unary_in(
    op: &'static str,
    e: *const SigmaGen,
    res: *mut SigmaGen,
    ctx: *mut SigmaContext,
    f: impl FnOnce(&Gen, &mut Context) -> GenResult,
) -> SigmaResult {
    guard(op, || {
        check_output(res, "res")?;
        // SAFETY: as in `unary`; the context is a separate allocation.
        let value = unsafe { f(input(e, "e")?, context(ctx)?) }?;
        unsafe { store(res, value) };
        Ok(())
    })
}

/// `res = f(a, b)`.
pub(crate) fn binary(
    op: &'static str,
    a: *const SigmaGen,
    b: *const SigmaGen,
    res: *mut SigmaGen,
    f: impl FnOnce(&Gen, &Gen) -> GenResult,
) -> SigmaResult {
    guard(op, || {
        check_output(res, "res")?;
        // SAFETY: as in `unary`.
        let value = unsafe { f(input(a, "a")?, input(b, "b")?) }?;
        unsafe { store(res, value) };
        Ok(())
    })
}

/// `res = f(a, b, ctx)`.
pub(crate) fn binary_in(
    op: &'static str,
    a: *const SigmaGen,
    b: *const SigmaGen,
    res: *mut SigmaGen,
    ctx: *mut SigmaContext,
    f: impl FnOnce(&Gen, &Gen, &mut Context) -> GenResult,
) -> SigmaResult {
    guard(op, || {
        check_output(res, "res")?;
        // SAFETY: as in `unary_in`.
        let value = unsafe { f(input(a, "a")?, input(b, "b")?, context(ctx)?) }?;
        unsafe { store(res, value) };
        Ok(())
    })
}

/// `*res = f(e)` for a scalar result.
pub(crate) fn predicate<T>(
    op: &'static str,
    e: *const SigmaGen,
    res: *mut T,
    f: impl FnOnce(&Gen) -> Result<T, Fault>,
) -> SigmaResult {
    guard(op, || {
        check_output(res, "res")?;
        // SAFETY: the caller passes a live handle and a writable slot.
        let value = f(unsafe { input(e, "e") }?)?;
        unsafe { store_scalar(res, value) };
        Ok(())
    })
}
