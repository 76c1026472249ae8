//! AVX 8-lane f32 lane operations.
//!
//! Wraps the 256-bit `__m256` register. The horizontal reduction extracts
//! the upper 128-bit half, folds it onto the lower half, and finishes with
//! the two-step 128-bit shuffle tree, so the whole collapse takes
//! ⌈log2(8)⌉ = 3 combine steps.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::traits::LaneOps;

/// Marker type for the AVX f32 lane set.
#[derive(Clone, Copy, Debug)]
pub struct F32x8;

/// Marker type for the FMA f32 lane set: AVX widths with a fused
/// multiply-subtract.
#[derive(Clone, Copy, Debug)]
pub struct FmaF32x8;

impl F32x8 {
    /// Lanewise `cand > acc ? cand : acc`, ordered comparison. AVX implies
    /// SSE4.1, so the 128-bit half-steps may use `blendv`.
    #[inline(always)]
    unsafe fn select_gt_m256(acc: __m256, cand: __m256) -> __m256 {
        let gt = _mm256_cmp_ps::<_CMP_GT_OQ>(cand, acc);
        _mm256_blendv_ps(acc, cand, gt)
    }

    #[inline(always)]
    unsafe fn select_gt_m128(acc: __m128, cand: __m128) -> __m128 {
        let gt = _mm_cmpgt_ps(cand, acc);
        _mm_blendv_ps(acc, cand, gt)
    }
}

impl LaneOps<f32> for F32x8 {
    const LANES: usize = 8;

    type Reg = __m256;

    #[inline(always)]
    unsafe fn splat(value: f32) -> __m256 {
        _mm256_set1_ps(value)
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> __m256 {
        _mm256_loadu_ps(ptr)
    }

    #[inline(always)]
    unsafe fn store(ptr: *mut f32, reg: __m256) {
        _mm256_storeu_ps(ptr, reg)
    }

    #[inline(always)]
    unsafe fn add(a: __m256, b: __m256) -> __m256 {
        _mm256_add_ps(a, b)
    }

    #[inline(always)]
    unsafe fn mul(a: __m256, b: __m256) -> __m256 {
        _mm256_mul_ps(a, b)
    }

    #[inline(always)]
    unsafe fn sub(a: __m256, b: __m256) -> __m256 {
        _mm256_sub_ps(a, b)
    }

    #[inline(always)]
    unsafe fn select_gt(acc: __m256, cand: __m256) -> __m256 {
        Self::select_gt_m256(acc, cand)
    }

    #[inline(always)]
    unsafe fn hmax(reg: __m256) -> f32 {
        let lo = _mm256_castps256_ps128(reg);
        let hi = _mm256_extractf128_ps::<1>(reg);
        let m = Self::select_gt_m128(lo, hi);
        let shifted = _mm_movehl_ps(m, m);
        let m = Self::select_gt_m128(m, shifted);
        let shifted = _mm_shuffle_ps(m, m, 0b0001);
        let m = Self::select_gt_m128(m, shifted);
        _mm_cvtss_f32(m)
    }

    #[inline(always)]
    unsafe fn hadd(reg: __m256) -> f32 {
        let lo = _mm256_castps256_ps128(reg);
        let hi = _mm256_extractf128_ps::<1>(reg);
        let sum = _mm_add_ps(lo, hi);
        let shifted = _mm_movehl_ps(sum, sum);
        let sum = _mm_add_ps(sum, shifted);
        let shifted = _mm_shuffle_ps(sum, sum, 0b0001);
        let sum = _mm_add_ss(sum, shifted);
        _mm_cvtss_f32(sum)
    }
}

impl LaneOps<f32> for FmaF32x8 {
    const LANES: usize = 8;

    type Reg = __m256;

    #[inline(always)]
    unsafe fn splat(value: f32) -> __m256 {
        F32x8::splat(value)
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> __m256 {
        F32x8::load(ptr)
    }

    #[inline(always)]
    unsafe fn store(ptr: *mut f32, reg: __m256) {
        F32x8::store(ptr, reg)
    }

    #[inline(always)]
    unsafe fn add(a: __m256, b: __m256) -> __m256 {
        F32x8::add(a, b)
    }

    #[inline(always)]
    unsafe fn mul(a: __m256, b: __m256) -> __m256 {
        F32x8::mul(a, b)
    }

    #[inline(always)]
    unsafe fn sub(a: __m256, b: __m256) -> __m256 {
        F32x8::sub(a, b)
    }

    /// Single-rounding fused multiply-subtract.
    #[inline(always)]
    unsafe fn fmsub(a: __m256, b: __m256, c: __m256) -> __m256 {
        _mm256_fmsub_ps(a, b, c)
    }

    /// Fused scalar companion, so tail elements round the same way as the
    /// vector body of this variant.
    #[inline(always)]
    fn fmsub_scalar(a: f32, b: f32, c: f32) -> f32 {
        a.mul_add(b, -c)
    }

    #[inline(always)]
    unsafe fn select_gt(acc: __m256, cand: __m256) -> __m256 {
        F32x8::select_gt(acc, cand)
    }

    #[inline(always)]
    unsafe fn hmax(reg: __m256) -> f32 {
        F32x8::hmax(reg)
    }

    #[inline(always)]
    unsafe fn hadd(reg: __m256) -> f32 {
        F32x8::hadd(reg)
    }
}
