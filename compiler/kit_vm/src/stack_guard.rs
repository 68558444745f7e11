//! Native stack growth for deeply nested execution.
//!
//! Compiled entries call each other by native recursion, so a long chain of
//! nested definitions could exhaust the thread's stack before the return
//! stack's depth cap trips. [`ensure_sufficient_stack`] grows the stack on
//! demand. On wasm it is a passthrough.
//!
//! This is the `ori_stack` guard from the Ori compiler, with the same red
//! zone and segment size, applied here to [`Machine::execute`].
//!
//! [`Machine::execute`]: crate::Machine::execute

/// Grow when less than this remains (100KB).
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment (1MB).
#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the native stack if less than the red zone is
/// left.
///
/// Wrap each level of a recursion that user input can make arbitrarily
/// deep; the engine wraps every compiled-entry call.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// Passthrough: wasm manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_recursion() {
        fn depth(n: u64) -> u64 {
            ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
        }
        assert_eq!(depth(100_000), 100_000);
    }

    #[test]
    fn test_passes_results_through() {
        let result: Result<i32, &str> = ensure_sufficient_stack(|| Ok(7));
        assert_eq!(result, Ok(7));
    }
}
