//! Saturating numeric conversions between element types.
//!
//! All variants implement the same contract, bit-exact across the table:
//!
//! * float to int: truncate toward zero, saturate to the destination range,
//!   and map NaN to zero (the semantics of Rust's float `as` int cast);
//! * int to narrower int: saturate to the destination range;
//! * int to wider int: value-preserving.
//!
//! The vector kernels reach those semantics differently (an ordered-compare
//! mask zeroes NaN before clamping, and the pack instructions saturate), so
//! the tests pin the boundary and NaN cases on every eligible variant.

use crate::cpu;
use crate::dispatch::{Candidate, DispatchTable};
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::dispatch::Level;

type ConvertFn<S, D> = fn(&[S], &mut [D]);

fn scalar_f32_i8(src: &[f32], dst: &mut [i8]) {
    debug_assert_eq!(src.len(), dst.len());
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = s as i8;
    }
}

fn scalar_f32_u8(src: &[f32], dst: &mut [u8]) {
    debug_assert_eq!(src.len(), dst.len());
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = s as u8;
    }
}

fn scalar_i32_i16(src: &[i32], dst: &mut [i16]) {
    debug_assert_eq!(src.len(), dst.len());
    for (d, &s) in dst.iter_mut().zip(src) {
        // `as` between ints wraps, so the clamp is explicit.
        *d = s.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
    }
}

fn scalar_i16_i32(src: &[i16], dst: &mut [i32]) {
    debug_assert_eq!(src.len(), dst.len());
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = s as i32;
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod imp {
    #[cfg(target_arch = "x86")]
    use std::arch::x86::*;
    #[cfg(target_arch = "x86_64")]
    use std::arch::x86_64::*;

    /// NaN to zero, clamp to `[lo, hi]`, truncate. The ordered self-compare
    /// is all-zeros exactly for NaN lanes.
    #[inline(always)]
    unsafe fn sanitize_m128(v: __m128, lo: __m128, hi: __m128) -> __m128i {
        let ord = _mm_cmpord_ps(v, v);
        let v = _mm_and_ps(v, ord);
        let v = _mm_max_ps(v, lo);
        let v = _mm_min_ps(v, hi);
        _mm_cvttps_epi32(v)
    }

    #[inline(always)]
    unsafe fn sanitize_m256(v: __m256, lo: __m256, hi: __m256) -> __m256i {
        let ord = _mm256_cmp_ps::<_CMP_ORD_Q>(v, v);
        let v = _mm256_and_ps(v, ord);
        let v = _mm256_max_ps(v, lo);
        let v = _mm256_min_ps(v, hi);
        _mm256_cvttps_epi32(v)
    }

    #[target_feature(enable = "sse2")]
    pub(super) unsafe fn f32_i8_sse2(src: &[f32], dst: &mut [i8]) {
        debug_assert_eq!(src.len(), dst.len());
        let n = src.len();
        let aligned = n - n % 16;
        let lo = _mm_set1_ps(i8::MIN as f32);
        let hi = _mm_set1_ps(i8::MAX as f32);

        let mut i = 0;
        while i < aligned {
            let a = sanitize_m128(_mm_loadu_ps(src.as_ptr().add(i)), lo, hi);
            let b = sanitize_m128(_mm_loadu_ps(src.as_ptr().add(i + 4)), lo, hi);
            let c = sanitize_m128(_mm_loadu_ps(src.as_ptr().add(i + 8)), lo, hi);
            let d = sanitize_m128(_mm_loadu_ps(src.as_ptr().add(i + 12)), lo, hi);
            let words = _mm_packs_epi32(a, b);
            let words2 = _mm_packs_epi32(c, d);
            let bytes = _mm_packs_epi16(words, words2);
            _mm_storeu_si128(dst.as_mut_ptr().add(i).cast(), bytes);
            i += 16;
        }
        for i in aligned..n {
            *dst.get_unchecked_mut(i) = *src.get_unchecked(i) as i8;
        }
    }

    #[target_feature(enable = "avx2")]
    pub(super) unsafe fn f32_i8_avx2(src: &[f32], dst: &mut [i8]) {
        debug_assert_eq!(src.len(), dst.len());
        let n = src.len();
        let aligned = n - n % 16;
        let lo = _mm256_set1_ps(i8::MIN as f32);
        let hi = _mm256_set1_ps(i8::MAX as f32);

        let mut i = 0;
        while i < aligned {
            let a = sanitize_m256(_mm256_loadu_ps(src.as_ptr().add(i)), lo, hi);
            let b = sanitize_m256(_mm256_loadu_ps(src.as_ptr().add(i + 8)), lo, hi);
            // Pack through the 128-bit halves to keep element order.
            let words = _mm_packs_epi32(
                _mm256_castsi256_si128(a),
                _mm256_extracti128_si256::<1>(a),
            );
            let words2 = _mm_packs_epi32(
                _mm256_castsi256_si128(b),
                _mm256_extracti128_si256::<1>(b),
            );
            let bytes = _mm_packs_epi16(words, words2);
            _mm_storeu_si128(dst.as_mut_ptr().add(i).cast(), bytes);
            i += 16;
        }
        for i in aligned..n {
            *dst.get_unchecked_mut(i) = *src.get_unchecked(i) as i8;
        }
    }

    #[target_feature(enable = "sse2")]
    pub(super) unsafe fn f32_u8_sse2(src: &[f32], dst: &mut [u8]) {
        debug_assert_eq!(src.len(), dst.len());
        let n = src.len();
        let aligned = n - n % 16;
        let lo = _mm_setzero_ps();
        let hi = _mm_set1_ps(u8::MAX as f32);

        let mut i = 0;
        while i < aligned {
            let a = sanitize_m128(_mm_loadu_ps(src.as_ptr().add(i)), lo, hi);
            let b = sanitize_m128(_mm_loadu_ps(src.as_ptr().add(i + 4)), lo, hi);
            let c = sanitize_m128(_mm_loadu_ps(src.as_ptr().add(i + 8)), lo, hi);
            let d = sanitize_m128(_mm_loadu_ps(src.as_ptr().add(i + 12)), lo, hi);
            // Values are already in [0, 255], so the signed word pack is
            // lossless and the unsigned byte pack saturates nothing.
            let words = _mm_packs_epi32(a, b);
            let words2 = _mm_packs_epi32(c, d);
            let bytes = _mm_packus_epi16(words, words2);
            _mm_storeu_si128(dst.as_mut_ptr().add(i).cast(), bytes);
            i += 16;
        }
        for i in aligned..n {
            *dst.get_unchecked_mut(i) = *src.get_unchecked(i) as u8;
        }
    }

    #[target_feature(enable = "avx2")]
    pub(super) unsafe fn f32_u8_avx2(src: &[f32], dst: &mut [u8]) {
        debug_assert_eq!(src.len(), dst.len());
        let n = src.len();
        let aligned = n - n % 16;
        let lo = _mm256_setzero_ps();
        let hi = _mm256_set1_ps(u8::MAX as f32);

        let mut i = 0;
        while i < aligned {
            let a = sanitize_m256(_mm256_loadu_ps(src.as_ptr().add(i)), lo, hi);
            let b = sanitize_m256(_mm256_loadu_ps(src.as_ptr().add(i + 8)), lo, hi);
            let words = _mm_packs_epi32(
                _mm256_castsi256_si128(a),
                _mm256_extracti128_si256::<1>(a),
            );
            let words2 = _mm_packs_epi32(
                _mm256_castsi256_si128(b),
                _mm256_extracti128_si256::<1>(b),
            );
            let bytes = _mm_packus_epi16(words, words2);
            _mm_storeu_si128(dst.as_mut_ptr().add(i).cast(), bytes);
            i += 16;
        }
        for i in aligned..n {
            *dst.get_unchecked_mut(i) = *src.get_unchecked(i) as u8;
        }
    }

    #[target_feature(enable = "sse2")]
    pub(super) unsafe fn i32_i16_sse2(src: &[i32], dst: &mut [i16]) {
        debug_assert_eq!(src.len(), dst.len());
        let n = src.len();
        let aligned = n - n % 8;

        let mut i = 0;
        while i < aligned {
            let a = _mm_loadu_si128(src.as_ptr().add(i).cast());
            let b = _mm_loadu_si128(src.as_ptr().add(i + 4).cast());
            _mm_storeu_si128(dst.as_mut_ptr().add(i).cast(), _mm_packs_epi32(a, b));
            i += 8;
        }
        for i in aligned..n {
            let s = *src.get_unchecked(i);
            *dst.get_unchecked_mut(i) = s.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        }
    }

    #[target_feature(enable = "sse4.1")]
    pub(super) unsafe fn i16_i32_sse41(src: &[i16], dst: &mut [i32]) {
        debug_assert_eq!(src.len(), dst.len());
        let n = src.len();
        let aligned = n - n % 8;

        let mut i = 0;
        while i < aligned {
            let v = _mm_loadu_si128(src.as_ptr().add(i).cast());
            let lo = _mm_cvtepi16_epi32(v);
            let hi = _mm_cvtepi16_epi32(_mm_unpackhi_epi64(v, v));
            _mm_storeu_si128(dst.as_mut_ptr().add(i).cast(), lo);
            _mm_storeu_si128(dst.as_mut_ptr().add(i + 4).cast(), hi);
            i += 8;
        }
        for i in aligned..n {
            *dst.get_unchecked_mut(i) = *src.get_unchecked(i) as i32;
        }
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod entry {
    use super::imp;

    pub(super) fn f32_i8_sse2(src: &[f32], dst: &mut [i8]) {
        unsafe { imp::f32_i8_sse2(src, dst) }
    }

    pub(super) fn f32_i8_avx2(src: &[f32], dst: &mut [i8]) {
        unsafe { imp::f32_i8_avx2(src, dst) }
    }

    pub(super) fn f32_u8_sse2(src: &[f32], dst: &mut [u8]) {
        unsafe { imp::f32_u8_sse2(src, dst) }
    }

    pub(super) fn f32_u8_avx2(src: &[f32], dst: &mut [u8]) {
        unsafe { imp::f32_u8_avx2(src, dst) }
    }

    pub(super) fn i32_i16_sse2(src: &[i32], dst: &mut [i16]) {
        unsafe { imp::i32_i16_sse2(src, dst) }
    }

    pub(super) fn i16_i32_sse41(src: &[i16], dst: &mut [i32]) {
        unsafe { imp::i16_i32_sse41(src, dst) }
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
static F32_I8_CANDIDATES: &[Candidate<ConvertFn<f32, i8>>] = &[
    Candidate::new(Level::Avx2, entry::f32_i8_avx2),
    Candidate::new(Level::Sse2, entry::f32_i8_sse2),
];
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
static F32_I8_CANDIDATES: &[Candidate<ConvertFn<f32, i8>>] = &[];

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
static F32_U8_CANDIDATES: &[Candidate<ConvertFn<f32, u8>>] = &[
    Candidate::new(Level::Avx2, entry::f32_u8_avx2),
    Candidate::new(Level::Sse2, entry::f32_u8_sse2),
];
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
static F32_U8_CANDIDATES: &[Candidate<ConvertFn<f32, u8>>] = &[];

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
static I32_I16_CANDIDATES: &[Candidate<ConvertFn<i32, i16>>] =
    &[Candidate::new(Level::Sse2, entry::i32_i16_sse2)];
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
static I32_I16_CANDIDATES: &[Candidate<ConvertFn<i32, i16>>] = &[];

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
static I16_I32_CANDIDATES: &[Candidate<ConvertFn<i16, i32>>] =
    &[Candidate::new(Level::Sse41, entry::i16_i32_sse41)];
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
static I16_I32_CANDIDATES: &[Candidate<ConvertFn<i16, i32>>] = &[];

static F32_I8: DispatchTable<ConvertFn<f32, i8>> =
    DispatchTable::new("convert_f32_i8", scalar_f32_i8, F32_I8_CANDIDATES);

static F32_U8: DispatchTable<ConvertFn<f32, u8>> =
    DispatchTable::new("convert_f32_u8", scalar_f32_u8, F32_U8_CANDIDATES);

static I32_I16: DispatchTable<ConvertFn<i32, i16>> =
    DispatchTable::new("convert_i32_i16", scalar_i32_i16, I32_I16_CANDIDATES);

static I16_I32: DispatchTable<ConvertFn<i16, i32>> =
    DispatchTable::new("convert_i16_i32", scalar_i16_i32, I16_I32_CANDIDATES);

/// Saturating `f32` to `i8`: truncate toward zero, clamp to `[-128, 127]`,
/// NaN becomes 0. Requires `src.len() == dst.len()`.
pub fn convert_f32_i8(src: &[f32], dst: &mut [i8]) {
    debug_assert_eq!(src.len(), dst.len());
    (F32_I8.resolve(cpu::capabilities()).func)(src, dst)
}

/// Saturating `f32` to `u8`: truncate toward zero, clamp to `[0, 255]`, NaN
/// becomes 0. Requires `src.len() == dst.len()`.
pub fn convert_f32_u8(src: &[f32], dst: &mut [u8]) {
    debug_assert_eq!(src.len(), dst.len());
    (F32_U8.resolve(cpu::capabilities()).func)(src, dst)
}

/// Saturating `i32` to `i16`. Requires `src.len() == dst.len()`.
pub fn convert_i32_i16(src: &[i32], dst: &mut [i16]) {
    debug_assert_eq!(src.len(), dst.len());
    (I32_I16.resolve(cpu::capabilities()).func)(src, dst)
}

/// Widening `i16` to `i32`, value-preserving. Requires
/// `src.len() == dst.len()`.
pub fn convert_i16_i32(src: &[i16], dst: &mut [i32]) {
    debug_assert_eq!(src.len(), dst.len());
    (I16_I32.resolve(cpu::capabilities()).func)(src, dst)
}
