//! Process-wide state: tracing setup and release of shared tables.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber driven by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset or another subscriber is already
/// installed. Safe to call repeatedly.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}

/// C entry point for [`init_tracing`].
#[no_mangle]
pub extern "C" fn sigma_init_tracing() {
    init_tracing();
}

/// Drop the prime sieve and factorization memo.
///
/// Handles and contexts stay valid; the tables are rebuilt on next use.
#[no_mangle]
pub extern "C" fn sigma_release_globals() {
    if panic::catch_unwind(AssertUnwindSafe(sigma_eval::release_globals)).is_err() {
        tracing::error!("releasing shared tables panicked");
    } else {
        tracing::debug!("shared tables released");
    }
}
