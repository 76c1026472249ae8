//! SSE 4-lane f32 lane operations.
//!
//! Wraps the 128-bit `__m128` register. The strict greater-than select is
//! built from `cmpgt`/`and`/`andnot`/`or` because `blendv` only exists from
//! SSE4.1 on, and this variant must run on plain-SSE hardware.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::traits::LaneOps;

/// Marker type for the SSE f32 lane set.
#[derive(Clone, Copy, Debug)]
pub struct F32x4;

impl F32x4 {
    /// Lanewise `cand > acc ? cand : acc` with ordered comparison: NaN
    /// candidates and exact ties keep the accumulator lane.
    #[inline(always)]
    unsafe fn select_gt_m128(acc: __m128, cand: __m128) -> __m128 {
        let gt = _mm_cmpgt_ps(cand, acc);
        _mm_or_ps(_mm_and_ps(gt, cand), _mm_andnot_ps(gt, acc))
    }
}

impl LaneOps<f32> for F32x4 {
    const LANES: usize = 4;

    type Reg = __m128;

    #[inline(always)]
    unsafe fn splat(value: f32) -> __m128 {
        _mm_set1_ps(value)
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> __m128 {
        _mm_loadu_ps(ptr)
    }

    #[inline(always)]
    unsafe fn store(ptr: *mut f32, reg: __m128) {
        _mm_storeu_ps(ptr, reg)
    }

    #[inline(always)]
    unsafe fn add(a: __m128, b: __m128) -> __m128 {
        _mm_add_ps(a, b)
    }

    #[inline(always)]
    unsafe fn mul(a: __m128, b: __m128) -> __m128 {
        _mm_mul_ps(a, b)
    }

    #[inline(always)]
    unsafe fn sub(a: __m128, b: __m128) -> __m128 {
        _mm_sub_ps(a, b)
    }

    #[inline(always)]
    unsafe fn select_gt(acc: __m128, cand: __m128) -> __m128 {
        Self::select_gt_m128(acc, cand)
    }

    #[inline(always)]
    unsafe fn hmax(reg: __m128) -> f32 {
        // Fold upper half onto lower half, then lane 1 onto lane 0.
        let hi = _mm_movehl_ps(reg, reg);
        let m = Self::select_gt_m128(reg, hi);
        let shifted = _mm_shuffle_ps(m, m, 0b0001);
        let m = Self::select_gt_m128(m, shifted);
        _mm_cvtss_f32(m)
    }

    #[inline(always)]
    unsafe fn hadd(reg: __m128) -> f32 {
        let hi = _mm_movehl_ps(reg, reg);
        let sum = _mm_add_ps(reg, hi);
        let shifted = _mm_shuffle_ps(sum, sum, 0b0001);
        let sum = _mm_add_ss(sum, shifted);
        _mm_cvtss_f32(sum)
    }
}
