//! AVX 4-lane f64 lane operations.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::traits::LaneOps;

/// Marker type for the AVX f64 lane set.
#[derive(Clone, Copy, Debug)]
pub struct F64x4;

impl F64x4 {
    #[inline(always)]
    unsafe fn select_gt_m256d(acc: __m256d, cand: __m256d) -> __m256d {
        let gt = _mm256_cmp_pd::<_CMP_GT_OQ>(cand, acc);
        _mm256_blendv_pd(acc, cand, gt)
    }

    #[inline(always)]
    unsafe fn select_gt_m128d(acc: __m128d, cand: __m128d) -> __m128d {
        let gt = _mm_cmpgt_pd(cand, acc);
        _mm_blendv_pd(acc, cand, gt)
    }
}

impl LaneOps<f64> for F64x4 {
    const LANES: usize = 4;

    type Reg = __m256d;

    #[inline(always)]
    unsafe fn splat(value: f64) -> __m256d {
        _mm256_set1_pd(value)
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> __m256d {
        _mm256_loadu_pd(ptr)
    }

    #[inline(always)]
    unsafe fn store(ptr: *mut f64, reg: __m256d) {
        _mm256_storeu_pd(ptr, reg)
    }

    #[inline(always)]
    unsafe fn add(a: __m256d, b: __m256d) -> __m256d {
        _mm256_add_pd(a, b)
    }

    #[inline(always)]
    unsafe fn mul(a: __m256d, b: __m256d) -> __m256d {
        _mm256_mul_pd(a, b)
    }

    #[inline(always)]
    unsafe fn sub(a: __m256d, b: __m256d) -> __m256d {
        _mm256_sub_pd(a, b)
    }

    #[inline(always)]
    unsafe fn select_gt(acc: __m256d, cand: __m256d) -> __m256d {
        Self::select_gt_m256d(acc, cand)
    }

    #[inline(always)]
    unsafe fn hmax(reg: __m256d) -> f64 {
        let lo = _mm256_castpd256_pd128(reg);
        let hi = _mm256_extractf128_pd::<1>(reg);
        let m = Self::select_gt_m128d(lo, hi);
        let shifted = _mm_unpackhi_pd(m, m);
        let m = Self::select_gt_m128d(m, shifted);
        _mm_cvtsd_f64(m)
    }

    #[inline(always)]
    unsafe fn hadd(reg: __m256d) -> f64 {
        let lo = _mm256_castpd256_pd128(reg);
        let hi = _mm256_extractf128_pd::<1>(reg);
        let sum = _mm_add_pd(lo, hi);
        let shifted = _mm_unpackhi_pd(sum, sum);
        let sum = _mm_add_sd(sum, shifted);
        _mm_cvtsd_f64(sum)
    }
}
