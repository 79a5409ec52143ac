//! Text parsing, display and narrowing conversions.

use std::ffi::{c_char, c_int, CStr};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use sigma_gen::invalid_argument;

use super::{predicate, store_scalar};
use crate::adapter::{guard, into_c_string, SigmaResult};
use crate::context::{context, SigmaContext};
use crate::value::{check_output, input, store, SigmaGen};

/// Parse and evaluate `text` in `ctx`.
///
/// A syntax error is reported as `syntax error at line L, column C: ...`
/// and leaves `res` unchanged.
#[no_mangle]
pub extern "C" fn sigma_gen_from_str(
    text: *const c_char,
    ctx: *mut SigmaContext,
    res: *mut SigmaGen,
) -> SigmaResult {
    guard("from_str", || {
        check_output(res, "res")?;
        if text.is_null() {
            return Err(invalid_argument("text: null string"));
        }
        // SAFETY: the caller passes a NUL-terminated string.
        let text = unsafe { CStr::from_ptr(text) }
            .to_str()
            .map_err(|_| invalid_argument("text: not valid UTF-8"))?;
        // SAFETY: the caller passes a live context.
        let ctx = unsafe { context(ctx) }?;
        let value = ctx.eval_str(text)?;
        // SAFETY: `res` was checked above and is not borrowed.
        unsafe { store(res, value) };
        Ok(())
    })
}

/// Canonical text of the value, owned by the caller. Null for a null handle.
#[no_mangle]
pub extern "C" fn sigma_gen_to_str(e: *const SigmaGen) -> *mut c_char {
    // SAFETY: the caller passes null or a live handle.
    let Some(gen) = (unsafe { e.as_ref() }) else {
        return ptr::null_mut();
    };
    panic::catch_unwind(AssertUnwindSafe(|| gen.value().to_string()))
        .map_or(ptr::null_mut(), |text| into_c_string(&text))
}

/// Narrow an integer value to `c_int`; out-of-range values are a fault.
#[no_mangle]
pub extern "C" fn sigma_gen_to_int(e: *const SigmaGen, res: *mut c_int) -> SigmaResult {
    predicate("to_int", e, res, |g| g.to_i32())
}

/// Narrow an integer value to `i64`.
#[no_mangle]
pub extern "C" fn sigma_gen_to_long(e: *const SigmaGen, res: *mut i64) -> SigmaResult {
    predicate("to_long", e, res, |g| g.to_i64())
}

/// Zero test honouring the context's epsilon for inexact values.
#[no_mangle]
pub extern "C" fn sigma_gen_is_zero(
    e: *const SigmaGen,
    res: *mut bool,
    ctx: *mut SigmaContext,
) -> SigmaResult {
    guard("is_zero", || {
        check_output(res, "res")?;
        // SAFETY: the caller passes live handles and a writable slot.
        let zero = unsafe { context(ctx)?.is_zero(input(e, "e")?) }?;
        unsafe { store_scalar(res, zero) };
        Ok(())
    })
}
