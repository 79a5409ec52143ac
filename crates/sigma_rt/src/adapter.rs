//! Turns engine faults and panics into C error strings.
//!
//! Every fallible entry point returns a [`SigmaResult`]: null on success,
//! otherwise an owned NUL-terminated message the host releases with
//! [`sigma_free_str`]. Output slots are written only on success.

use std::any::Any;
use std::ffi::{c_char, CString};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use sigma_gen::{internal_error, Fault};

/// Null on success, owned error message otherwise.
pub type SigmaResult = *mut c_char;

/// Run `body` for the entry point `op`, containing both fault channels.
///
/// `body` must validate every handle before computing and write outputs
/// only after all of them have been computed.
pub(crate) fn guard(op: &'static str, body: impl FnOnce() -> Result<(), Fault>) -> SigmaResult {
    let _span = tracing::trace_span!("sigma", op).entered();
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(())) => ptr::null_mut(),
        Ok(Err(fault)) => {
            tracing::debug!(op, kind = ?fault.kind(), %fault, "operation failed");
            into_c_string(&fault.message)
        }
        Err(payload) => {
            let fault = internal_error(panic_message(payload.as_ref()));
            tracing::error!(op, %fault, "engine panicked");
            into_c_string(&fault.message)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_owned()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_owned()
    }
}

/// Owned C copy of `text`; interior NULs become U+FFFD.
pub(crate) fn into_c_string(text: &str) -> *mut c_char {
    let cleaned = if text.contains('\0') {
        text.replace('\0', "\u{FFFD}")
    } else {
        text.to_owned()
    };
    CString::new(cleaned).map_or(ptr::null_mut(), CString::into_raw)
}

/// Release a string returned by this library. Null is ignored.
#[no_mangle]
pub extern "C" fn sigma_free_str(text: *mut c_char) {
    if text.is_null() {
        return;
    }
    // SAFETY: non-null strings come from `into_c_string` and are freed once.
    drop(unsafe { CString::from_raw(text) });
}

#[cfg(test)]
mod tests;
