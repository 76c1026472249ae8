//! Elementwise fused multiply-subtract `c[i] = a * b[i] - c[i]`.
//!
//! Selection priority for f32 is FMA → AVX → SSE → scalar. The FMA variant
//! contracts the multiply and subtract into one rounding (its tail uses
//! `mul_add` so body and tail round identically); every other variant
//! computes the unfused `a * b[i] - c[i]` and is bit-exact with the scalar
//! kernel. Results therefore differ between FMA and non-FMA machines by at
//! most one rounding of the intermediate product.

use rayon::prelude::*;

use crate::cpu;
use crate::dispatch::{Candidate, DispatchTable};
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::dispatch::Level;
use crate::ops::scalar;

type FmsFn<T> = fn(T, &[T], &mut [T]);

/// Below this many elements the parallel entry point stays serial; the
/// fork-join overhead outweighs the work.
const PAR_THRESHOLD: usize = 32 * 1024;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod imp {
    use crate::block::fms_blocked;
    use crate::simd::avx::{F32x8, F64x4, FmaF32x8};
    use crate::simd::sse::{F32x4, F64x2};

    #[target_feature(enable = "avx", enable = "fma")]
    pub(super) unsafe fn f32_fma(a: f32, b: &[f32], c: &mut [f32]) {
        fms_blocked::<f32, FmaF32x8>(a, b, c)
    }

    #[target_feature(enable = "avx")]
    pub(super) unsafe fn f32_avx(a: f32, b: &[f32], c: &mut [f32]) {
        fms_blocked::<f32, F32x8>(a, b, c)
    }

    #[target_feature(enable = "sse")]
    pub(super) unsafe fn f32_sse(a: f32, b: &[f32], c: &mut [f32]) {
        fms_blocked::<f32, F32x4>(a, b, c)
    }

    #[target_feature(enable = "avx")]
    pub(super) unsafe fn f64_avx(a: f64, b: &[f64], c: &mut [f64]) {
        fms_blocked::<f64, F64x4>(a, b, c)
    }

    #[target_feature(enable = "sse2")]
    pub(super) unsafe fn f64_sse2(a: f64, b: &[f64], c: &mut [f64]) {
        fms_blocked::<f64, F64x2>(a, b, c)
    }
}

// Safe table entries; reached only through a dispatch table whose candidate
// level requires the targeted instruction set.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod entry {
    use super::imp;

    pub(super) fn f32_fma(a: f32, b: &[f32], c: &mut [f32]) {
        unsafe { imp::f32_fma(a, b, c) }
    }

    pub(super) fn f32_avx(a: f32, b: &[f32], c: &mut [f32]) {
        unsafe { imp::f32_avx(a, b, c) }
    }

    pub(super) fn f32_sse(a: f32, b: &[f32], c: &mut [f32]) {
        unsafe { imp::f32_sse(a, b, c) }
    }

    pub(super) fn f64_avx(a: f64, b: &[f64], c: &mut [f64]) {
        unsafe { imp::f64_avx(a, b, c) }
    }

    pub(super) fn f64_sse2(a: f64, b: &[f64], c: &mut [f64]) {
        unsafe { imp::f64_sse2(a, b, c) }
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
static FMS_F32_CANDIDATES: &[Candidate<FmsFn<f32>>] = &[
    Candidate::new(Level::Fma, entry::f32_fma),
    Candidate::new(Level::Avx, entry::f32_avx),
    Candidate::new(Level::Sse, entry::f32_sse),
];
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
static FMS_F32_CANDIDATES: &[Candidate<FmsFn<f32>>] = &[];

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
static FMS_F64_CANDIDATES: &[Candidate<FmsFn<f64>>] = &[
    Candidate::new(Level::Avx, entry::f64_avx),
    Candidate::new(Level::Sse2, entry::f64_sse2),
];
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
static FMS_F64_CANDIDATES: &[Candidate<FmsFn<f64>>] = &[];

static FMS_F32: DispatchTable<FmsFn<f32>> =
    DispatchTable::new("fms_f32", scalar::fms::<f32>, FMS_F32_CANDIDATES);

static FMS_F64: DispatchTable<FmsFn<f64>> =
    DispatchTable::new("fms_f64", scalar::fms::<f64>, FMS_F64_CANDIDATES);

/// In-place `c[i] = a * b[i] - c[i]` with the scalar operand `a` broadcast.
///
/// Requires `b.len() == c.len()`. No allocation.
pub fn fms_f32(a: f32, b: &[f32], c: &mut [f32]) {
    debug_assert_eq!(b.len(), c.len());
    (FMS_F32.resolve(cpu::capabilities()).func)(a, b, c)
}

/// In-place `c[i] = a * b[i] - c[i]`; see [`fms_f32`].
pub fn fms_f64(a: f64, b: &[f64], c: &mut [f64]) {
    debug_assert_eq!(b.len(), c.len());
    (FMS_F64.resolve(cpu::capabilities()).func)(a, b, c)
}

/// Parallel [`fms_f32`]: splits `b` and `c` into per-thread chunks and runs
/// the selected variant on each. Elementwise independence makes the result
/// identical to the serial call.
///
/// Thread count comes from [`crate::set_num_threads`]; small inputs and a
/// thread count of one stay serial.
pub fn par_fms_f32(a: f32, b: &[f32], c: &mut [f32]) {
    debug_assert_eq!(b.len(), c.len());
    let selected = FMS_F32.resolve(cpu::capabilities());

    let threads = match crate::num_threads() {
        0 => rayon::current_num_threads(),
        n => n,
    };
    if threads <= 1 || c.len() < PAR_THRESHOLD {
        (selected.func)(a, b, c);
        return;
    }

    let chunk = c.len().div_ceil(threads);
    let func = selected.func;
    c.par_chunks_mut(chunk)
        .zip(b.par_chunks(chunk))
        .for_each(|(cc, bc)| func(a, bc, cc));
}
