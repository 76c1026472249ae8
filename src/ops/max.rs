//! Maximum reductions: whole-array, row-wise, and column-wise.
//!
//! Selection priority is AVX → SSE → scalar for f32 and AVX → SSE2 → scalar
//! for f64 (the f64 lane set needs the SSE2 double-precision instructions).
//!
//! Tie-break contract, identical across all variants: a candidate replaces
//! the running maximum only under strict ordered greater-than, so exact ties
//! keep the earlier value and a NaN candidate is never selected. A NaN
//! *first* element seeds the accumulator and propagates.

use crate::cpu;
use crate::dispatch::{Candidate, DispatchTable};
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::dispatch::Level;
use crate::ops::scalar;

type ReduceFn<T> = fn(&[T]) -> T;
type RowReduceFn<T> = fn(&[T], usize, usize, &mut [T]);

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod imp {
    use crate::block::{col_max_blocked, reduce_max_blocked, row_max_blocked};
    use crate::simd::avx::{F32x8, F64x4};
    use crate::simd::sse::{F32x4, F64x2};

    #[target_feature(enable = "avx")]
    pub(super) unsafe fn reduce_f32_avx(data: &[f32]) -> f32 {
        reduce_max_blocked::<f32, F32x8>(data)
    }

    #[target_feature(enable = "sse")]
    pub(super) unsafe fn reduce_f32_sse(data: &[f32]) -> f32 {
        reduce_max_blocked::<f32, F32x4>(data)
    }

    #[target_feature(enable = "avx")]
    pub(super) unsafe fn reduce_f64_avx(data: &[f64]) -> f64 {
        reduce_max_blocked::<f64, F64x4>(data)
    }

    #[target_feature(enable = "sse2")]
    pub(super) unsafe fn reduce_f64_sse2(data: &[f64]) -> f64 {
        reduce_max_blocked::<f64, F64x2>(data)
    }

    #[target_feature(enable = "avx")]
    pub(super) unsafe fn rows_f32_avx(src: &[f32], rows: usize, row_size: usize, dst: &mut [f32]) {
        row_max_blocked::<f32, F32x8>(src, rows, row_size, dst)
    }

    #[target_feature(enable = "sse")]
    pub(super) unsafe fn rows_f32_sse(src: &[f32], rows: usize, row_size: usize, dst: &mut [f32]) {
        row_max_blocked::<f32, F32x4>(src, rows, row_size, dst)
    }

    #[target_feature(enable = "avx")]
    pub(super) unsafe fn rows_f64_avx(src: &[f64], rows: usize, row_size: usize, dst: &mut [f64]) {
        row_max_blocked::<f64, F64x4>(src, rows, row_size, dst)
    }

    #[target_feature(enable = "sse2")]
    pub(super) unsafe fn rows_f64_sse2(src: &[f64], rows: usize, row_size: usize, dst: &mut [f64]) {
        row_max_blocked::<f64, F64x2>(src, rows, row_size, dst)
    }

    #[target_feature(enable = "avx")]
    pub(super) unsafe fn cols_f32_avx(src: &[f32], rows: usize, row_size: usize, dst: &mut [f32]) {
        col_max_blocked::<f32, F32x8>(src, rows, row_size, dst)
    }

    #[target_feature(enable = "sse")]
    pub(super) unsafe fn cols_f32_sse(src: &[f32], rows: usize, row_size: usize, dst: &mut [f32]) {
        col_max_blocked::<f32, F32x4>(src, rows, row_size, dst)
    }

    #[target_feature(enable = "avx")]
    pub(super) unsafe fn cols_f64_avx(src: &[f64], rows: usize, row_size: usize, dst: &mut [f64]) {
        col_max_blocked::<f64, F64x4>(src, rows, row_size, dst)
    }

    #[target_feature(enable = "sse2")]
    pub(super) unsafe fn cols_f64_sse2(src: &[f64], rows: usize, row_size: usize, dst: &mut [f64]) {
        col_max_blocked::<f64, F64x2>(src, rows, row_size, dst)
    }
}

// Safe table entries. Each is reached only through a dispatch table whose
// candidate level requires the instruction set the inner kernel targets.
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

    pub(super) fn rows_f32_avx(src: &[f32], rows: usize, row_size: usize, dst: &mut [f32]) {
        unsafe { imp::rows_f32_avx(src, rows, row_size, dst) }
    }

    pub(super) fn rows_f32_sse(src: &[f32], rows: usize, row_size: usize, dst: &mut [f32]) {
        unsafe { imp::rows_f32_sse(src, rows, row_size, dst) }
    }

    pub(super) fn rows_f64_avx(src: &[f64], rows: usize, row_size: usize, dst: &mut [f64]) {
        unsafe { imp::rows_f64_avx(src, rows, row_size, dst) }
    }

    pub(super) fn rows_f64_sse2(src: &[f64], rows: usize, row_size: usize, dst: &mut [f64]) {
        unsafe { imp::rows_f64_sse2(src, rows, row_size, dst) }
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
static MAX_F32_CANDIDATES: &[Candidate<ReduceFn<f32>>] = &[
    Candidate::new(Level::Avx, entry::reduce_f32_avx),
    Candidate::new(Level::Sse, entry::reduce_f32_sse),
];
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
static MAX_F32_CANDIDATES: &[Candidate<ReduceFn<f32>>] = &[];

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
static MAX_F64_CANDIDATES: &[Candidate<ReduceFn<f64>>] = &[
    Candidate::new(Level::Avx, entry::reduce_f64_avx),
    Candidate::new(Level::Sse2, entry::reduce_f64_sse2),
];
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
static MAX_F64_CANDIDATES: &[Candidate<ReduceFn<f64>>] = &[];

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
static ROW_MAX_F32_CANDIDATES: &[Candidate<RowReduceFn<f32>>] = &[
    Candidate::new(Level::Avx, entry::rows_f32_avx),
    Candidate::new(Level::Sse, entry::rows_f32_sse),
];
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
static ROW_MAX_F32_CANDIDATES: &[Candidate<RowReduceFn<f32>>] = &[];

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
static ROW_MAX_F64_CANDIDATES: &[Candidate<RowReduceFn<f64>>] = &[
    Candidate::new(Level::Avx, entry::rows_f64_avx),
    Candidate::new(Level::Sse2, entry::rows_f64_sse2),
];
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
static ROW_MAX_F64_CANDIDATES: &[Candidate<RowReduceFn<f64>>] = &[];

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
static COL_MAX_F32_CANDIDATES: &[Candidate<RowReduceFn<f32>>] = &[
    Candidate::new(Level::Avx, entry::cols_f32_avx),
    Candidate::new(Level::Sse, entry::cols_f32_sse),
];
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
static COL_MAX_F32_CANDIDATES: &[Candidate<RowReduceFn<f32>>] = &[];

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
static COL_MAX_F64_CANDIDATES: &[Candidate<RowReduceFn<f64>>] = &[
    Candidate::new(Level::Avx, entry::cols_f64_avx),
    Candidate::new(Level::Sse2, entry::cols_f64_sse2),
];
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
static COL_MAX_F64_CANDIDATES: &[Candidate<RowReduceFn<f64>>] = &[];

static MAX_F32: DispatchTable<ReduceFn<f32>> =
    DispatchTable::new("reduce_max_f32", scalar::reduce_max::<f32>, MAX_F32_CANDIDATES);

static MAX_F64: DispatchTable<ReduceFn<f64>> =
    DispatchTable::new("reduce_max_f64", scalar::reduce_max::<f64>, MAX_F64_CANDIDATES);

static ROW_MAX_F32: DispatchTable<RowReduceFn<f32>> = DispatchTable::new(
    "row_max_f32",
    scalar::row_max::<f32>,
    ROW_MAX_F32_CANDIDATES,
);

static ROW_MAX_F64: DispatchTable<RowReduceFn<f64>> = DispatchTable::new(
    "row_max_f64",
    scalar::row_max::<f64>,
    ROW_MAX_F64_CANDIDATES,
);

static COL_MAX_F32: DispatchTable<RowReduceFn<f32>> = DispatchTable::new(
    "col_max_f32",
    scalar::col_max::<f32>,
    COL_MAX_F32_CANDIDATES,
);

static COL_MAX_F64: DispatchTable<RowReduceFn<f64>> = DispatchTable::new(
    "col_max_f64",
    scalar::col_max::<f64>,
    COL_MAX_F64_CANDIDATES,
);

/// Maximum over a non-empty buffer.
pub fn reduce_max_f32(data: &[f32]) -> f32 {
    debug_assert!(!data.is_empty(), "reduction input must not be empty");
    (MAX_F32.resolve(cpu::capabilities()).func)(data)
}

/// Maximum over a non-empty buffer.
pub fn reduce_max_f64(data: &[f64]) -> f64 {
    debug_assert!(!data.is_empty(), "reduction input must not be empty");
    (MAX_F64.resolve(cpu::capabilities()).func)(data)
}

/// Row-wise maximum over a row-major `rows x row_size` buffer, combined
/// into `dst` under strict greater-than.
///
/// `dst` doubles as the accumulator: seed it with `f32::NEG_INFINITY` for a
/// fresh reduction, or leave partial results from a previous slice in place
/// to continue accumulating. Requires `src.len() == rows * row_size`,
/// `dst.len() == rows`, `row_size > 0`.
pub fn row_max_f32(src: &[f32], rows: usize, row_size: usize, dst: &mut [f32]) {
    (ROW_MAX_F32.resolve(cpu::capabilities()).func)(src, rows, row_size, dst)
}

/// Row-wise maximum; see [`row_max_f32`].
pub fn row_max_f64(src: &[f64], rows: usize, row_size: usize, dst: &mut [f64]) {
    (ROW_MAX_F64.resolve(cpu::capabilities()).func)(src, rows, row_size, dst)
}

/// Column-wise maximum over a row-major `rows x row_size` buffer, combined
/// into `dst` under strict greater-than.
///
/// `dst` doubles as the accumulator, as in [`row_max_f32`]; seed it with
/// `f32::NEG_INFINITY` for a fresh reduction. Requires
/// `src.len() == rows * row_size` and `dst.len() == row_size`.
pub fn col_max_f32(src: &[f32], rows: usize, row_size: usize, dst: &mut [f32]) {
    (COL_MAX_F32.resolve(cpu::capabilities()).func)(src, rows, row_size, dst)
}

/// Column-wise maximum; see [`col_max_f32`].
pub fn col_max_f64(src: &[f64], rows: usize, row_size: usize, dst: &mut [f64]) {
    (COL_MAX_F64.resolve(cpu::capabilities()).func)(src, rows, row_size, dst)
}
