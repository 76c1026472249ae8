//! SSE2 2-lane f64 lane operations.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::traits::LaneOps;

/// Marker type for the SSE2 f64 lane set.
#[derive(Clone, Copy, Debug)]
pub struct F64x2;

impl F64x2 {
    #[inline(always)]
    unsafe fn select_gt_m128d(acc: __m128d, cand: __m128d) -> __m128d {
        let gt = _mm_cmpgt_pd(cand, acc);
        _mm_or_pd(_mm_and_pd(gt, cand), _mm_andnot_pd(gt, acc))
    }
}

impl LaneOps<f64> for F64x2 {
    const LANES: usize = 2;

    type Reg = __m128d;

    #[inline(always)]
    unsafe fn splat(value: f64) -> __m128d {
        _mm_set1_pd(value)
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> __m128d {
        _mm_loadu_pd(ptr)
    }

    #[inline(always)]
    unsafe fn store(ptr: *mut f64, reg: __m128d) {
        _mm_storeu_pd(ptr, reg)
    }

    #[inline(always)]
    unsafe fn add(a: __m128d, b: __m128d) -> __m128d {
        _mm_add_pd(a, b)
    }

    #[inline(always)]
    unsafe fn mul(a: __m128d, b: __m128d) -> __m128d {
        _mm_mul_pd(a, b)
    }

    #[inline(always)]
    unsafe fn sub(a: __m128d, b: __m128d) -> __m128d {
        _mm_sub_pd(a, b)
    }

    #[inline(always)]
    unsafe fn select_gt(acc: __m128d, cand: __m128d) -> __m128d {
        Self::select_gt_m128d(acc, cand)
    }

    #[inline(always)]
    unsafe fn hmax(reg: __m128d) -> f64 {
        let hi = _mm_unpackhi_pd(reg, reg);
        let m = Self::select_gt_m128d(reg, hi);
        _mm_cvtsd_f64(m)
    }

    #[inline(always)]
    unsafe fn hadd(reg: __m128d) -> f64 {
        let hi = _mm_unpackhi_pd(reg, reg);
        let sum = _mm_add_sd(reg, hi);
        _mm_cvtsd_f64(sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_array(reg: __m128d) -> [f64; 2] {
        let mut out = [0.0f64; 2];
        unsafe { _mm_storeu_pd(out.as_mut_ptr(), reg) };
        out
    }

    #[test]
    fn test_roundtrip_and_arith() {
        let data = [1.5f64, -2.5];
        unsafe {
            let reg = F64x2::load(data.as_ptr());
            assert_eq!(to_array(reg), data);
            let doubled = F64x2::add(reg, reg);
            assert_eq!(to_array(doubled), [3.0, -5.0]);
        }
    }

    #[test]
    fn test_hmax_hadd() {
        unsafe {
            let reg = F64x2::load([3.0f64, 11.0].as_ptr());
            assert_eq!(F64x2::hmax(reg), 11.0);
            assert_eq!(F64x2::hadd(reg), 14.0);
        }
    }

    #[test]
    fn test_select_gt_nan_candidate_kept_out() {
        unsafe {
            let acc = F64x2::splat(2.0);
            let cand = F64x2::load([f64::NAN, 5.0].as_ptr());
            assert_eq!(to_array(F64x2::select_gt(acc, cand)), [2.0, 5.0]);
        }
    }
}
