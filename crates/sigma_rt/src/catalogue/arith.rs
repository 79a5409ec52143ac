//! In-place arithmetic on an accumulator handle.
//!
//! The new value is computed before the accumulator is touched, so a failed
//! call leaves it as it was. `acc` and `operand` may be the same handle.

use sigma_gen::{ops, Gen, GenResult};

use crate::adapter::{guard, SigmaResult};
use crate::value::{input, store, SigmaGen};

fn accumulate(
    op: &'static str,
    acc: *mut SigmaGen,
    operand: *const SigmaGen,
    f: fn(&Gen, &Gen) -> GenResult,
) -> SigmaResult {
    guard(op, || {
        // SAFETY: the caller passes live handles; both borrows end before the store.
        let value = unsafe { f(input(acc.cast_const(), "acc")?, input(operand, "operand")?) }?;
        unsafe { store(acc, value) };
        Ok(())
    })
}

/// `acc += operand`.
#[no_mangle]
pub extern "C" fn sigma_gen_add(acc: *mut SigmaGen, operand: *const SigmaGen) -> SigmaResult {
    accumulate("add", acc, operand, ops::add)
}

/// `acc -= operand`.
#[no_mangle]
pub extern "C" fn sigma_gen_sub(acc: *mut SigmaGen, operand: *const SigmaGen) -> SigmaResult {
    accumulate("sub", acc, operand, ops::sub)
}

/// `acc *= operand`; vectors of vectors multiply as matrices.
#[no_mangle]
pub extern "C" fn sigma_gen_mul(acc: *mut SigmaGen, operand: *const SigmaGen) -> SigmaResult {
    accumulate("mul", acc, operand, ops::mul)
}

/// `acc /= operand`. Division by exact zero leaves `acc` unchanged.
#[no_mangle]
pub extern "C" fn sigma_gen_div(acc: *mut SigmaGen, operand: *const SigmaGen) -> SigmaResult {
    accumulate("div", acc, operand, ops::div)
}
