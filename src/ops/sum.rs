//! Sum reductions: whole-array and column-wise.
//!
//! Float addition is not associative, so the blocked variants re-order the
//! accumulation and their results differ from the scalar fold in the last
//! bits. Callers that compare results across machines should use a relative
//! tolerance; the tests here use 1e-5 for f32 and 1e-12 for f64.

use crate::cpu;
use crate::dispatch::{Candidate, DispatchTable};
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::dispatch::Level;
use crate::ops::scalar;

type ReduceFn<T> = fn(&[T]) -> T;
type ColSumFn<T> = fn(&[T], usize, usize, &mut [T]);

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod imp {
    use crate::block::{col_sum_blocked, reduce_sum_blocked};
    use crate::simd::avx::{F32x8, F64x4};
    use crate::simd::sse::{F32x4, F64x2};

    #[target_feature(enable = "avx")]
    pub(super) unsafe fn reduce_f32_avx(data: &[f32]) -> f32 {
        reduce_sum_blocked::<f32, F32x8>(data)
    }

    #[target_feature(enable = "sse")]
    pub(super) unsafe fn reduce_f32_sse(data: &[f32]) -> f32 {
        reduce_sum_blocked::<f32, F32x4>(data)
    }

    #[target_feature(enable = "avx")]
    pub(super) unsafe fn reduce_f64_avx(data: &[f64]) -> f64 {
        reduce_sum_blocked::<f64, F64x4>(data)
    }

    #[target_feature(enable = "sse2")]
    pub(super) unsafe fn reduce_f64_sse2(data: &[f64]) -> f64 {
        reduce_sum_blocked::<f64, F64x2>(data)
    }

    #[target_feature(enable = "avx")]
    pub(super) unsafe fn cols_f32_avx(src: &[f32], rows: usize, row_size: usize, dst: &mut [f32]) {
        col_sum_blocked::<f32, F32x8>(src, rows, row_size, dst)
    }

    #[target_feature(enable = "sse")]
    pub(super) unsafe fn cols_f32_sse(src: &[f32], rows: usize, row_size: usize, dst: &mut [f32]) {
        col_sum_blocked::<f32, F32x4>(src, rows, row_size, dst)
    }

    #[target_feature(enable = "avx")]
    pub(super) unsafe fn cols_f64_avx(src: &[f64], rows: usize, row_size: usize, dst: &mut [f64]) {
        col_sum_blocked::<f64, F64x4>(src, rows, row_size, dst)
    }

    #[target_feature(enable = "sse2")]
    pub(super) unsafe fn cols_f64_sse2(src: &[f64], rows: usize, row_size: usize, dst: &mut [f64]) {
        col_sum_blocked::<f64, F64x2>(src, rows, row_size, dst)
    }
}

// Safe table entries; each one is reached only through a dispatch table
// whose candidate level requires the targeted instruction set.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod entry {
    use super::imp;

    pub(super) fn reduce_f32_avx(data: &[f32]) -> f32 {
        unsafe { imp::reduce_f32_avx(data) }
    }

    pub(super) fn reduce_f32_sse(data: &[f32]) -> f32 {
        unsafe { imp::reduce_f32_sse(data) }
    }

    pub(super) fn reduce_f64_avx(data: &[f64]) -> f64 {
        unsafe { imp::reduce_f64_avx(data) }
    }

    pub(super) fn reduce_f64_sse2(data: &[f64]) -> f64 {
        unsafe { imp::reduce_f64_sse2(data) }
    }

    pub(super) fn cols_f32_avx(src: &[f32], rows: usize, row_size: usize, dst: &mut [f32]) {
        unsafe { imp::cols_f32_avx(src, rows, row_size, dst) }
    }

    pub(super) fn cols_f32_sse(src: &[f32], rows: usize, row_size: usize, dst: &mut [f32]) {
        unsafe { imp::cols_f32_sse(src, rows, row_size, dst) }
    }

    pub(super) fn cols_f64_avx(src: &[f64], rows: usize, row_size: usize, dst: &mut [f64]) {
        unsafe { imp::cols_f64_avx(src, rows, row_size, dst) }
    }

    pub(super) fn cols_f64_sse2(src: &[f64], rows: usize, row_size: usize, dst: &mut [f64]) {
        unsafe { imp::cols_f64_sse2(src, rows, row_size, dst) }
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
static SUM_F32_CANDIDATES: &[Candidate<ReduceFn<f32>>] = &[
    Candidate::new(Level::Avx, entry::reduce_f32_avx),
    Candidate::new(Level::Sse, entry::reduce_f32_sse),
];
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
static SUM_F32_CANDIDATES: &[Candidate<ReduceFn<f32>>] = &[];

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
static SUM_F64_CANDIDATES: &[Candidate<ReduceFn<f64>>] = &[
    Candidate::new(Level::Avx, entry::reduce_f64_avx),
    Candidate::new(Level::Sse2, entry::reduce_f64_sse2),
];
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
static SUM_F64_CANDIDATES: &[Candidate<ReduceFn<f64>>] = &[];

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
static COL_SUM_F32_CANDIDATES: &[Candidate<ColSumFn<f32>>] = &[
    Candidate::new(Level::Avx, entry::cols_f32_avx),
    Candidate::new(Level::Sse, entry::cols_f32_sse),
];
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
static COL_SUM_F32_CANDIDATES: &[Candidate<ColSumFn<f32>>] = &[];

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
static COL_SUM_F64_CANDIDATES: &[Candidate<ColSumFn<f64>>] = &[
    Candidate::new(Level::Avx, entry::cols_f64_avx),
    Candidate::new(Level::Sse2, entry::cols_f64_sse2),
];
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
static COL_SUM_F64_CANDIDATES: &[Candidate<ColSumFn<f64>>] = &[];

static SUM_F32: DispatchTable<ReduceFn<f32>> =
    DispatchTable::new("reduce_sum_f32", scalar::reduce_sum::<f32>, SUM_F32_CANDIDATES);

static SUM_F64: DispatchTable<ReduceFn<f64>> =
    DispatchTable::new("reduce_sum_f64", scalar::reduce_sum::<f64>, SUM_F64_CANDIDATES);

static COL_SUM_F32: DispatchTable<ColSumFn<f32>> = DispatchTable::new(
    "col_sum_f32",
    scalar::col_sum::<f32>,
    COL_SUM_F32_CANDIDATES,
);

static COL_SUM_F64: DispatchTable<ColSumFn<f64>> = DispatchTable::new(
    "col_sum_f64",
    scalar::col_sum::<f64>,
    COL_SUM_F64_CANDIDATES,
);

/// Sum over a non-empty buffer.
pub fn reduce_sum_f32(data: &[f32]) -> f32 {
    debug_assert!(!data.is_empty(), "reduction input must not be empty");
    (SUM_F32.resolve(cpu::capabilities()).func)(data)
}

/// Sum over a non-empty buffer.
pub fn reduce_sum_f64(data: &[f64]) -> f64 {
    debug_assert!(!data.is_empty(), "reduction input must not be empty");
    (SUM_F64.resolve(cpu::capabilities()).func)(data)
}

/// Column-wise sum over a row-major `rows x row_size` buffer, accumulated
/// into `dst` (`dst[j] += sum over rows of src[r][j]`).
///
/// `dst` is the accumulator: zero it for a fresh reduction, or keep partial
/// results in place to continue across slices. Requires
/// `src.len() == rows * row_size` and `dst.len() == row_size`.
pub fn col_sum_f32(src: &[f32], rows: usize, row_size: usize, dst: &mut [f32]) {
    (COL_SUM_F32.resolve(cpu::capabilities()).func)(src, rows, row_size, dst)
}

/// Column-wise sum; see [`col_sum_f32`].
pub fn col_sum_f64(src: &[f64], rows: usize, row_size: usize, dst: &mut [f64]) {
    (COL_SUM_F64.resolve(cpu::capabilities()).func)(src, rows, row_size, dst)
}
