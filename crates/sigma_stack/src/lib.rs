//! Stack growth for the recursive passes over expression trees.
//!
//! Parsing, evaluation and polynomial conversion all recurse once per
//! nesting level, and expression text arriving over the C boundary can nest
//! arbitrarily deep. Each recursive entry point goes through
//! [`ensure_sufficient_stack`], which switches to a fresh segment when the
//! current one runs low. On wasm the closure is called directly.

/// Grow once less than this remains.
const RED_ZONE: usize = 100 * 1024;

/// Size of every new segment.
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, first moving to a new stack segment if the current one is low.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::ensure_sufficient_stack;

    fn depth_of(nesting: &[u8]) -> usize {
        ensure_sufficient_stack(|| match nesting.split_first() {
            Some((b'(', rest)) => 1 + depth_of(rest),
            _ => 0,
        })
    }

    #[test]
    fn passes_result_through() {
        let value: Result<u8, String> = ensure_sufficient_stack(|| Ok(7));
        assert_eq!(value, Ok(7));
    }

    #[test]
    fn survives_deep_nesting() {
        let text = vec![b'('; 200_000];
        assert_eq!(depth_of(&text), 200_000);
    }
}
