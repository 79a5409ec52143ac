use std::ffi::CStr;

use pretty_assertions::assert_eq;
use sigma_gen::{division_by_zero, FaultKind};

use super::*;

fn message(result: SigmaResult) -> Option<String> {
    if result.is_null() {
        return None;
    }
    // SAFETY: non-null results are owned C strings from `into_c_string`.
    let text = unsafe { CStr::from_ptr(result) }.to_string_lossy().into_owned();
    sigma_free_str(result);
    Some(text)
}

#[test]
fn success_is_null() {
    assert_eq!(message(guard("noop", || Ok(()))), None);
}

#[test]
fn faults_become_their_message() {
    let result = guard("div", || Err(division_by_zero()));
    assert_eq!(message(result), Some("division by zero".to_owned()));
}

#[test]
fn panics_are_contained() {
    let result = guard("explode", || panic!("sieve corrupted"));
    assert_eq!(message(result), Some("internal error: sieve corrupted".to_owned()));
}

#[test]
fn interior_nul_is_replaced() {
    let result = guard("nul", || Err(Fault::new(FaultKind::Domain, "a\0b")));
    assert_eq!(message(result), Some("a\u{FFFD}b".to_owned()));
}

#[test]
fn freeing_null_is_a_no_op() {
    sigma_free_str(ptr::null_mut());
}
