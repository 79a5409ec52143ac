//! C ABI for the Sigma computer algebra engine (`libsigma_rt`).
//!
//! Hosts hold engine values as opaque [`SigmaGen`] handles and evaluation
//! state as [`SigmaContext`] handles. Every fallible call returns a
//! [`SigmaResult`]: null on success, otherwise an owned error message to be
//! released with [`sigma_free_str`].
//!
//! # Build Modes
//!
//! - **rlib**: for Rust consumers and the tests in this crate
//! - **staticlib** / **cdylib**: for linking from C (`include/sigma.h`)
//!
//! # Function Categories
//!
//! - **Values**: `sigma_gen_allocate`, `sigma_gen_from_*`, `sigma_gen_clone`, `sigma_free_gen`
//! - **Contexts**: `sigma_global_context`, `sigma_new_context`, `sigma_free_context`
//! - **Catalogue**: `sigma_gen_*` operations, grouped in [`catalogue`]
//! - **Lifecycle**: `sigma_release_globals`, `sigma_init_tracing`
//!
//! # Safety
//!
//! Entry points take raw pointers from the host and are not marked
//! `unsafe`: handles must be null or come from this library and still be
//! live. Null handles are reported as errors, never dereferenced.

#![warn(clippy::allow_attributes_without_reason)]
#![allow(
    unsafe_code,
    reason = "C-ABI entry points dereference host-supplied handles"
)]
#![allow(
    clippy::not_unsafe_ptr_arg_deref,
    reason = "FFI entry points check handles for null before dereferencing"
)]

mod adapter;
pub mod catalogue;
mod context;
mod lifecycle;
mod sink;
mod value;

pub use adapter::{sigma_free_str, SigmaResult};
pub use context::{
    sigma_context_epsilon, sigma_context_set_epsilon, sigma_free_context, sigma_global_context,
    sigma_new_context, SigmaContext,
};
pub use lifecycle::{init_tracing, sigma_init_tracing, sigma_release_globals};
pub use sink::NullSink;
pub use value::{
    sigma_free_gen, sigma_gen_allocate, sigma_gen_clone, sigma_gen_from_double,
    sigma_gen_from_float, sigma_gen_from_int, sigma_gen_from_long, sigma_gen_type, SigmaGen,
};

/// Bumped on any incompatible change to the exported symbols.
pub const SIGMA_ABI_VERSION: u32 = 1;

/// The `SIGMA_ABI_VERSION` this library was built with.
#[no_mangle]
pub extern "C" fn sigma_abi_version() -> u32 {
    SIGMA_ABI_VERSION
}
