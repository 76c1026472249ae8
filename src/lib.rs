//! Runtime-adaptive SIMD kernel library.
//!
//! `simdkern` executes elementwise and reduction operations (max, sum, fused
//! multiply-subtract, saturating type conversion, border synthesis) over flat
//! numeric buffers, selecting among hand-specialized vector-instruction
//! implementations based on the capabilities of the executing CPU.
//!
//! The crate is organized around three pieces:
//!
//! - [`cpu`]: process-wide detection of instruction-set extensions, memoized
//!   once and read-only thereafter,
//! - [`dispatch`]: priority-ordered selection of the most capable kernel
//!   variant for a given operation and element type, with a portable scalar
//!   fallback that is always eligible,
//! - the blocked execution kernels themselves, exposed through [`ops`]:
//!   fixed-width lane loops, multiple independent accumulators, a horizontal
//!   shuffle-and-combine reduction tree, and scalar tail loops for buffer
//!   lengths that are not a multiple of the lane width.
//!
//! Every selected variant produces results numerically identical to the
//! scalar reference kernel: bit-exact for max and all integer operations,
//! and equal up to reduction order (sum) or fusion rounding (fused
//! multiply-subtract) for floating point.
//!
//! Buffers are caller-owned slices; the kernels never allocate, never retain
//! a pointer past the call, and never spawn threads. An orthogonal global
//! thread-count setting ([`set_num_threads`]) controls only the `par_*`
//! elementwise entry points.

use std::sync::atomic::{AtomicUsize, Ordering};

pub mod cpu;
pub mod dispatch;
pub mod error;
pub mod ops;
pub mod simd;

mod block;

pub use error::{Result, SimdkernError};

/// Global thread-count setting for the `par_*` entry points.
///
/// Zero means "let rayon decide". This setting is unrelated to kernel
/// variant selection; a single kernel invocation is always single-threaded.
static NUM_THREADS: AtomicUsize = AtomicUsize::new(0);

/// Sets the preferred number of worker threads for the `par_*` entry points.
///
/// A value of 0 restores the default (rayon's global pool size). A value of
/// 1 makes the `par_*` entry points run serially.
pub fn set_num_threads(n: usize) {
    NUM_THREADS.store(n, Ordering::Relaxed);
}

/// Returns the current thread-count setting (0 = rayon default).
pub fn num_threads() -> usize {
    NUM_THREADS.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_threads_roundtrip() {
        set_num_threads(3);
        assert_eq!(num_threads(), 3);
        set_num_threads(0);
        assert_eq!(num_threads(), 0);
    }
}
