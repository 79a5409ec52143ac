//! Context handles and the process-wide default context.
//!
//! The default context is created lazily, leaked, and ignored by
//! [`sigma_free_context`]. Contexts from [`sigma_new_context`] are isolated:
//! bindings and tolerance never leak between them. Operations that take no
//! context read their limits from `SIGMA_*` once per process.

use std::ffi::c_double;
use std::ptr::NonNull;
use std::sync::OnceLock;

use sigma_eval::{Context, EngineConfig, DEFAULT_EPSILON};
use sigma_gen::{invalid_argument, Fault};

use crate::sink::NullSink;

/// Opaque evaluation context owned by the host.
#[derive(Debug)]
pub struct SigmaContext {
    pub(crate) inner: Context,
}

impl SigmaContext {
    /// Context configured from the environment with diagnostics discarded.
    pub fn quiet() -> Self {
        let mut inner = Context::with_config(boundary_config().clone());
        inner.set_log_sink(Box::new(NullSink));
        SigmaContext { inner }
    }
}

/// The leaked default context. Contexts are single-writer, so sharing the
/// pointer across threads is the host's responsibility.
struct DefaultContext(NonNull<SigmaContext>);

// SAFETY: only the address is shared; access discipline is the host's.
unsafe impl Send for DefaultContext {}
// SAFETY: as above.
unsafe impl Sync for DefaultContext {}

static DEFAULT_CONTEXT: OnceLock<DefaultContext> = OnceLock::new();
static BOUNDARY_CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Limits for operations that take no context, read once from `SIGMA_*`.
pub(crate) fn boundary_config() -> &'static EngineConfig {
    BOUNDARY_CONFIG.get_or_init(EngineConfig::from_env)
}

fn is_default(ctx: *const SigmaContext) -> bool {
    DEFAULT_CONTEXT
        .get()
        .is_some_and(|default| std::ptr::eq(default.0.as_ptr(), ctx))
}

/// Borrow the context behind a handle.
///
/// # Safety
/// `ctx` must be null or point to a live `SigmaContext` with no other
/// active borrow.
pub(crate) unsafe fn context<'a>(ctx: *mut SigmaContext) -> Result<&'a mut Context, Fault> {
    ctx.as_mut()
        .map(|c| &mut c.inner)
        .ok_or_else(|| invalid_argument("ctx: null context handle"))
}

/// The process-wide context, created on first use. Never freed.
#[no_mangle]
pub extern "C" fn sigma_global_context() -> *mut SigmaContext {
    DEFAULT_CONTEXT
        .get_or_init(|| {
            tracing::debug!("creating default context");
            DefaultContext(NonNull::from(Box::leak(Box::new(SigmaContext::quiet()))))
        })
        .0
        .as_ptr()
}

/// A fresh, isolated context with diagnostics discarded.
#[no_mangle]
pub extern "C" fn sigma_new_context() -> *mut SigmaContext {
    Box::into_raw(Box::new(SigmaContext::quiet()))
}

/// Release a context. Null and the default context are ignored.
#[no_mangle]
pub extern "C" fn sigma_free_context(ctx: *mut SigmaContext) {
    if ctx.is_null() || is_default(ctx) {
        return;
    }
    // SAFETY: non-default handles come from `sigma_new_context`.
    drop(unsafe { Box::from_raw(ctx) });
}

/// Set the tolerance; non-finite or non-positive values restore the default.
#[no_mangle]
pub extern "C" fn sigma_context_set_epsilon(epsilon: c_double, ctx: *mut SigmaContext) {
    // SAFETY: the caller passes null or a live context.
    if let Ok(inner) = unsafe { context(ctx) } {
        inner.set_epsilon(epsilon);
    }
}

/// Current tolerance, or the default for a null handle.
#[no_mangle]
pub extern "C" fn sigma_context_epsilon(ctx: *mut SigmaContext) -> c_double {
    // SAFETY: the caller passes null or a live context.
    unsafe { context(ctx) }.map_or(DEFAULT_EPSILON, |inner| inner.epsilon())
}
