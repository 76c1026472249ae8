//! Portable scalar reference kernels.
//!
//! These are the always-eligible fallbacks every dispatch table ends in,
//! and the semantic reference the vector variants are required to match.
//! They are generic over [`Element`], so they also serve the integer types
//! that have no vector specialization here.

use crate::simd::traits::Element;

/// Whole-array maximum. Strict greater-than fold seeded with the first
/// element: exact ties keep the earlier value and a NaN candidate is never
/// selected (a NaN first element propagates).
pub fn reduce_max<T: Element>(data: &[T]) -> T {
    debug_assert!(!data.is_empty(), "reduction input must not be empty");
    let mut m = data[0];
    for &x in &data[1..] {
        if x > m {
            m = x;
        }
    }
    m
}

/// Whole-array sum, left-to-right accumulation.
pub fn reduce_sum<T: Element>(data: &[T]) -> T {
    let mut sum = T::zero();
    for &x in data {
        sum = sum + x;
    }
    sum
}

/// Row-wise maximum over a row-major `rows x row_size` buffer, combined
/// into `dst` with the same strict greater-than (multi-call accumulation).
pub fn row_max<T: Element>(src: &[T], rows: usize, row_size: usize, dst: &mut [T]) {
    debug_assert!(row_size > 0, "rows must not be empty");
    debug_assert_eq!(src.len(), rows * row_size);
    debug_assert_eq!(dst.len(), rows);

    for r in 0..rows {
        let row = &src[r * row_size..(r + 1) * row_size];
        let m = reduce_max(row);
        if m > dst[r] {
            dst[r] = m;
        }
    }
}

/// Column-wise maximum over a row-major `rows x row_size` buffer, combined
/// into `dst` with the strict greater-than.
pub fn col_max<T: Element>(src: &[T], rows: usize, row_size: usize, dst: &mut [T]) {
    debug_assert_eq!(src.len(), rows * row_size);
    debug_assert_eq!(dst.len(), row_size);

    for r in 0..rows {
        let row = &src[r * row_size..(r + 1) * row_size];
        for (d, &s) in dst.iter_mut().zip(row) {
            if s > *d {
                *d = s;
            }
        }
    }
}

/// Column-wise sum over a row-major `rows x row_size` buffer, accumulated
/// into `dst`.
pub fn col_sum<T: Element>(src: &[T], rows: usize, row_size: usize, dst: &mut [T]) {
    debug_assert_eq!(src.len(), rows * row_size);
    debug_assert_eq!(dst.len(), row_size);

    for r in 0..rows {
        let row = &src[r * row_size..(r + 1) * row_size];
        for (d, &s) in dst.iter_mut().zip(row) {
            *d = *d + s;
        }
    }
}

/// Elementwise `c[i] = a * b[i] - c[i]`, unfused.
pub fn fms<T: Element>(a: T, b: &[T], c: &mut [T]) {
    debug_assert_eq!(b.len(), c.len());
    for (ci, &bi) in c.iter_mut().zip(b) {
        *ci = a * bi - *ci;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_max_known_values() {
        assert_eq!(reduce_max(&[5.0f32, 1.0, 9.0, 3.0, 9.0, 2.0]), 9.0);
        assert_eq!(reduce_max(&[-3i32, -1, -7]), -1);
        assert_eq!(reduce_max(&[42.0f64]), 42.0);
    }

    #[test]
    fn test_reduce_max_ignores_nan_candidates() {
        assert_eq!(reduce_max(&[1.0f32, f32::NAN, 3.0]), 3.0);
        assert!(reduce_max(&[f32::NAN, 1.0]).is_nan());
    }

    #[test]
    fn test_reduce_sum() {
        assert_eq!(reduce_sum(&[1.0f64, 2.0, 3.5]), 6.5);
        assert_eq!(reduce_sum(&[1u32, 2, 3]), 6);
    }

    #[test]
    fn test_row_max_combines_with_existing() {
        let src = [1.0f32, 5.0, 2.0, 8.0, 0.0, 3.0];
        let mut dst = [6.0f32, 4.0];
        row_max(&src, 2, 3, &mut dst);
        assert_eq!(dst, [6.0, 8.0]);
    }

    #[test]
    fn test_col_max_combines_with_existing() {
        let src = [1.0f32, 9.0, 2.0, 8.0, 0.0, 3.0];
        let mut dst = [5.0f32, 5.0, 5.0];
        col_max(&src, 2, 3, &mut dst);
        assert_eq!(dst, [8.0, 9.0, 5.0]);
    }

    #[test]
    fn test_col_sum() {
        let src = [1.0f32, 2.0, 3.0, 4.0];
        let mut dst = [10.0f32, 20.0];
        col_sum(&src, 2, 2, &mut dst);
        assert_eq!(dst, [14.0, 26.0]);
    }

    #[test]
    fn test_fms() {
        let mut c = [1.0f32, 2.0];
        fms(3.0, &[4.0, 5.0], &mut c);
        assert_eq!(c, [11.0, 13.0]);
    }
}
