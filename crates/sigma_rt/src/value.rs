//! Value handles: allocation, cloning, release and type inspection.
//!
//! A [`SigmaGen`] is a boxed engine value. Constructors hand ownership to the
//! host; [`sigma_free_gen`] takes it back. Catalogue operations write their
//! results into caller-owned handles and leave them untouched on failure.

use std::ffi::{c_double, c_float, c_int};
use std::ptr;

use sigma_gen::{invalid_argument, Fault, Gen};

/// Opaque engine value owned by the host.
///
/// Created by the `sigma_gen_*` constructors, released with
/// [`sigma_free_gen`]. Operations taking an output handle overwrite the
/// value it holds.
#[derive(Debug, Clone, Default)]
pub struct SigmaGen {
    pub(crate) value: Gen,
}

impl SigmaGen {
    /// Wrap an engine value.
    pub fn new(value: Gen) -> Self {
        SigmaGen { value }
    }

    /// The wrapped engine value.
    pub fn value(&self) -> &Gen {
        &self.value
    }
}

/// Move `value` to the heap and hand ownership to the caller.
pub(crate) fn into_handle(value: Gen) -> *mut SigmaGen {
    Box::into_raw(Box::new(SigmaGen::new(value)))
}

/// Borrow the value behind an input handle.
///
/// # Safety
/// `handle` must be null or point to a live `SigmaGen` that is not written
/// while the borrow is alive.
pub(crate) unsafe fn input<'a>(handle: *const SigmaGen, name: &str) -> Result<&'a Gen, Fault> {
    handle
        .as_ref()
        .map(SigmaGen::value)
        .ok_or_else(|| invalid_argument(format!("{name}: null value handle")))
}

/// Fail unless the output pointer can be written.
pub(crate) fn check_output<T>(slot: *mut T, name: &str) -> Result<(), Fault> {
    if slot.is_null() {
        Err(invalid_argument(format!("{name}: null output pointer")))
    } else {
        Ok(())
    }
}

/// Replace the value held by an output handle.
///
/// # Safety
/// `slot` must be non-null, point to a live `SigmaGen`, and have no
/// outstanding borrows.
pub(crate) unsafe fn store(slot: *mut SigmaGen, value: Gen) {
    (*slot).value = value;
}

/// Handle holding the integer `0`.
#[no_mangle]
pub extern "C" fn sigma_gen_allocate() -> *mut SigmaGen {
    into_handle(Gen::default())
}

/// New handle holding a machine integer.
#[no_mangle]
pub extern "C" fn sigma_gen_from_int(value: c_int) -> *mut SigmaGen {
    into_handle(Gen::from(value))
}

/// New handle holding a 64-bit integer.
#[no_mangle]
pub extern "C" fn sigma_gen_from_long(value: i64) -> *mut SigmaGen {
    into_handle(Gen::from(value))
}

/// New handle holding a single-precision float, kept distinct from doubles.
#[no_mangle]
pub extern "C" fn sigma_gen_from_float(value: c_float) -> *mut SigmaGen {
    into_handle(Gen::from(value))
}

/// New handle holding a double.
#[no_mangle]
pub extern "C" fn sigma_gen_from_double(value: c_double) -> *mut SigmaGen {
    into_handle(Gen::from(value))
}

/// Independent deep copy; null in, null out.
#[no_mangle]
pub extern "C" fn sigma_gen_clone(handle: *const SigmaGen) -> *mut SigmaGen {
    // SAFETY: the caller passes null or a live handle.
    match unsafe { handle.as_ref() } {
        Some(gen) => Box::into_raw(Box::new(gen.clone())),
        None => ptr::null_mut(),
    }
}

/// Release a handle. Null is ignored.
#[no_mangle]
pub extern "C" fn sigma_free_gen(handle: *mut SigmaGen) {
    if handle.is_null() {
        return;
    }
    // SAFETY: non-null handles come from `into_handle` and are freed once.
    drop(unsafe { Box::from_raw(handle) });
}

/// Type tag of the value; `u8::MAX` for a null handle.
#[no_mangle]
pub extern "C" fn sigma_gen_type(handle: *const SigmaGen) -> u8 {
    // SAFETY: the caller passes null or a live handle.
    unsafe { handle.as_ref() }.map_or(u8::MAX, |gen| gen.value.gen_type().as_u8())
}
