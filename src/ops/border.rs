//! Border extension for row-major 2D buffers.
//!
//! Both kernels write a `(rows + 2*border) x (cols + 2*border)` output from
//! a `rows x cols` input. They are pure data movement, generic over any
//! `Copy` element, and have no vector variants; the interior of each output
//! row is a single `copy_from_slice`, which the standard library already
//! lowers to wide copies.

/// Clamp a possibly-out-of-range coordinate onto `[0, len)`.
#[inline]
fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

/// Reflect a possibly-out-of-range coordinate onto `[0, len)` with
/// whole-sample symmetry: the edge element is not repeated, so for
/// `[a, b, c]` the left extension reads `... c, b | a, b, c`. Periodic in
/// `2 * (len - 1)`, so borders wider than the buffer still resolve.
#[inline]
fn mirror_index(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let mut i = i.rem_euclid(period);
    if i >= len as isize {
        i = period - i;
    }
    i as usize
}

#[inline]
fn extend_rows<T: Copy>(
    src: &[T],
    rows: usize,
    cols: usize,
    border: usize,
    dst: &mut [T],
    index: impl Fn(isize, usize) -> usize,
) {
    debug_assert!(rows > 0 && cols > 0, "input must not be empty");
    debug_assert_eq!(src.len(), rows * cols);
    let out_cols = cols + 2 * border;
    debug_assert_eq!(dst.len(), (rows + 2 * border) * out_cols);

    for out_r in 0..rows + 2 * border {
        let src_r = index(out_r as isize - border as isize, rows);
        let row = &src[src_r * cols..(src_r + 1) * cols];
        let out = &mut dst[out_r * out_cols..(out_r + 1) * out_cols];

        for j in 0..border {
            out[j] = row[index(j as isize - border as isize, cols)];
        }
        out[border..border + cols].copy_from_slice(row);
        for j in 0..border {
            out[border + cols + j] = row[index((cols + j) as isize, cols)];
        }
    }
}

/// Border extension by edge replication: out-of-range coordinates clamp to
/// the nearest edge element.
///
/// `src` is row-major `rows x cols`; `dst` must hold
/// `(rows + 2*border) x (cols + 2*border)` elements and is fully
/// overwritten. `border == 0` is a plain copy.
pub fn replicate_border<T: Copy>(src: &[T], rows: usize, cols: usize, border: usize, dst: &mut [T]) {
    extend_rows(src, rows, cols, border, dst, clamp_index)
}

/// Border extension by whole-sample reflection: out-of-range coordinates
/// mirror about the edge element without repeating it. Shapes as in
/// [`replicate_border`].
pub fn reflect_border<T: Copy>(src: &[T], rows: usize, cols: usize, border: usize, dst: &mut [T]) {
    extend_rows(src, rows, cols, border, dst, mirror_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_index_whole_sample() {
        // [a b c d e]: left border of 2 reads c, b; right border reads d, c.
        assert_eq!(mirror_index(-2, 5), 2);
        assert_eq!(mirror_index(-1, 5), 1);
        assert_eq!(mirror_index(0, 5), 0);
        assert_eq!(mirror_index(4, 5), 4);
        assert_eq!(mirror_index(5, 5), 3);
        assert_eq!(mirror_index(6, 5), 2);
        // Wider than the buffer wraps through the period.
        assert_eq!(mirror_index(8, 5), 0);
        assert_eq!(mirror_index(-4, 5), 4);
    }

    #[test]
    fn test_mirror_index_degenerate_length_one() {
        for i in -3..4 {
            assert_eq!(mirror_index(i, 1), 0);
        }
    }

    #[test]
    fn test_replicate_1d_row() {
        let src = [1, 2, 3];
        let mut dst = [0; 7 * 3];
        replicate_border(&src, 1, 3, 2, &mut dst);
        // Every output row equals the replicated row.
        for r in 0..3 {
            assert_eq!(&dst[r * 7..(r + 1) * 7], &[1, 1, 1, 2, 3, 3, 3], "row {r}");
        }
    }

    #[test]
    fn test_replicate_width_three() {
        let src = [10, 20, 30, 40, 50];
        let mut dst = [0; 11 * 7];
        replicate_border(&src, 1, 5, 3, &mut dst);
        let expected_row = [10, 10, 10, 10, 20, 30, 40, 50, 50, 50, 50];
        for r in 0..7 {
            assert_eq!(&dst[r * 11..(r + 1) * 11], &expected_row, "row {r}");
        }
    }

    #[test]
    fn test_reflect_1d_row() {
        let src = [1.0f32, 2.0, 3.0, 4.0, 5.0];
        let mut dst = [0.0f32; 9];
        reflect_border(&src, 1, 5, 2, &mut dst);
        assert_eq!(dst, [3.0, 2.0, 1.0, 2.0, 3.0, 4.0, 5.0, 4.0, 3.0]);
    }

    #[test]
    fn test_replicate_2d() {
        #[rustfmt::skip]
        let src = [
            1, 2,
            3, 4,
        ];
        let mut dst = [0; 4 * 4];
        replicate_border(&src, 2, 2, 1, &mut dst);
        #[rustfmt::skip]
        let expected = [
            1, 1, 2, 2,
            1, 1, 2, 2,
            3, 3, 4, 4,
            3, 3, 4, 4,
        ];
        assert_eq!(dst, expected);
    }

    #[test]
    fn test_reflect_2d() {
        #[rustfmt::skip]
        let src = [
            1, 2, 3,
            4, 5, 6,
            7, 8, 9,
        ];
        let mut dst = [0; 5 * 5];
        reflect_border(&src, 3, 3, 1, &mut dst);
        #[rustfmt::skip]
        let expected = [
            5, 4, 5, 6, 5,
            2, 1, 2, 3, 2,
            5, 4, 5, 6, 5,
            8, 7, 8, 9, 8,
            5, 4, 5, 6, 5,
        ];
        assert_eq!(dst, expected);
    }

    #[test]
    fn test_zero_border_is_copy() {
        let src = [9i16, 8, 7, 6];
        let mut dst = [0i16; 4];
        reflect_border(&src, 2, 2, 0, &mut dst);
        assert_eq!(dst, src);
        replicate_border(&src, 2, 2, 0, &mut dst);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_interior_preserved() {
        let rows = 4;
        let cols = 7;
        let border = 3;
        let src: Vec<u8> = (0..rows * cols).map(|i| i as u8).collect();
        let out_cols = cols + 2 * border;
        let mut dst = vec![0u8; (rows + 2 * border) * out_cols];
        replicate_border(&src, rows, cols, border, &mut dst);
        for r in 0..rows {
            let out_row = (r + border) * out_cols + border;
            assert_eq!(
                &dst[out_row..out_row + cols],
                &src[r * cols..(r + 1) * cols],
                "row {r}"
            );
        }
    }
}
