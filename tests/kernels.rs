//! End-to-end checks of the public entry points against naive references,
//! with `ndarray` as the independent 2D oracle. These run through the real
//! dispatch path, so they exercise whichever variant the host CPU selects.

use ndarray::Array2;
use rand::Rng;
use simdkern::ops::{
    col_max_f32, col_sum_f32, col_sum_f64, convert_f32_i8, convert_f32_u8, convert_i16_i32,
    convert_i32_i16, fms_f32, fms_f64, par_fms_f32, reduce_max_f32, reduce_max_f64,
    reduce_sum_f32, reduce_sum_f64, reflect_border, replicate_border, row_max_f32, row_max_f64,
};

/// Lengths around every lane-width boundary the kernels block on.
fn boundary_sizes() -> Vec<usize> {
    let mut sizes = vec![1];
    for lanes in [4usize, 8] {
        sizes.extend([lanes - 1, lanes, lanes + 1, 4 * lanes, 4 * lanes + 3]);
    }
    sizes.push(1000);
    sizes.sort_unstable();
    sizes.dedup();
    sizes
}

fn random_vec(n: usize) -> Vec<f32> {
    let mut rng = rand::rng();
    (0..n).map(|_| rng.random_range(-100.0..100.0)).collect()
}

#[test]
fn reduce_max_matches_iterator_fold() {
    for n in boundary_sizes() {
        let data = random_vec(n);
        let expected = data.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(reduce_max_f32(&data), expected, "n={n}");
    }
}

#[test]
fn reduce_max_f64_matches_iterator_fold() {
    let mut rng = rand::rng();
    for n in boundary_sizes() {
        let data: Vec<f64> = (0..n).map(|_| rng.random_range(-100.0..100.0)).collect();
        let expected = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(reduce_max_f64(&data), expected, "n={n}");
    }
}

#[test]
fn reduce_max_single_element() {
    assert_eq!(reduce_max_f32(&[-7.5]), -7.5);
    assert_eq!(reduce_max_f64(&[42.0]), 42.0);
}

#[test]
fn reduce_sum_within_relative_tolerance() {
    for n in boundary_sizes() {
        let data = random_vec(n);
        let expected: f64 = data.iter().map(|&x| x as f64).sum();
        let got = reduce_sum_f32(&data) as f64;
        let scale = expected.abs().max(n as f64);
        assert!((got - expected).abs() <= 1e-5 * scale, "n={n}: {got} vs {expected}");
    }
}

#[test]
fn reduce_sum_f64_exact_on_integers() {
    // Integer-valued doubles sum exactly in any order.
    let data: Vec<f64> = (0..1000).map(|i| i as f64).collect();
    assert_eq!(reduce_sum_f64(&data), 499_500.0);
}

#[test]
fn row_max_against_ndarray() {
    let mut rng = rand::rng();
    for (rows, cols) in [(1, 1), (3, 8), (4, 9), (7, 31), (16, 100)] {
        let src: Vec<f32> = (0..rows * cols)
            .map(|_| rng.random_range(-50.0f32..50.0))
            .collect();
        let matrix = Array2::from_shape_vec((rows, cols), src.clone()).unwrap();
        let expected: Vec<f32> = matrix
            .rows()
            .into_iter()
            .map(|row| row.iter().copied().fold(f32::NEG_INFINITY, f32::max))
            .collect();

        let mut dst = vec![f32::NEG_INFINITY; rows];
        row_max_f32(&src, rows, cols, &mut dst);
        assert_eq!(dst, expected, "{rows}x{cols}");
    }
}

#[test]
fn row_max_f64_against_ndarray() {
    let mut rng = rand::rng();
    let (rows, cols) = (5, 23);
    let src: Vec<f64> = (0..rows * cols)
        .map(|_| rng.random_range(-50.0f64..50.0))
        .collect();
    let matrix = Array2::from_shape_vec((rows, cols), src.clone()).unwrap();
    let expected: Vec<f64> = matrix
        .rows()
        .into_iter()
        .map(|row| row.iter().copied().fold(f64::NEG_INFINITY, f64::max))
        .collect();

    let mut dst = vec![f64::NEG_INFINITY; rows];
    row_max_f64(&src, rows, cols, &mut dst);
    assert_eq!(dst, expected);
}

#[test]
fn row_max_accumulates_across_slices() {
    // Two slices of the same logical matrix, reduced into one dst.
    let slice_a = [1.0f32, 2.0, 9.0, 4.0, 5.0, 6.0];
    let slice_b = [7.0f32, 0.0, 3.0, 8.0, 1.0, 2.0];
    let mut dst = vec![f32::NEG_INFINITY; 2];
    row_max_f32(&slice_a, 2, 3, &mut dst);
    row_max_f32(&slice_b, 2, 3, &mut dst);
    assert_eq!(dst, [9.0, 8.0]);
}

#[test]
fn col_max_against_ndarray() {
    let mut rng = rand::rng();
    for (rows, cols) in [(1, 1), (3, 8), (5, 21), (9, 100)] {
        let src: Vec<f32> = (0..rows * cols)
            .map(|_| rng.random_range(-50.0f32..50.0))
            .collect();
        let matrix = Array2::from_shape_vec((rows, cols), src.clone()).unwrap();
        let expected: Vec<f32> = matrix
            .columns()
            .into_iter()
            .map(|col| col.iter().copied().fold(f32::NEG_INFINITY, f32::max))
            .collect();

        let mut dst = vec![f32::NEG_INFINITY; cols];
        col_max_f32(&src, rows, cols, &mut dst);
        assert_eq!(dst, expected, "{rows}x{cols}");
    }
}

#[test]
fn col_sum_against_ndarray() {
    let mut rng = rand::rng();
    for (rows, cols) in [(1, 1), (2, 7), (8, 8), (5, 33)] {
        // Small integers keep f32 accumulation exact.
        let src: Vec<f32> = (0..rows * cols)
            .map(|_| rng.random_range(0..100) as f32)
            .collect();
        let matrix = Array2::from_shape_vec((rows, cols), src.clone()).unwrap();
        let expected: Vec<f32> = matrix.sum_axis(ndarray::Axis(0)).to_vec();

        let mut dst = vec![0.0f32; cols];
        col_sum_f32(&src, rows, cols, &mut dst);
        assert_eq!(dst, expected, "{rows}x{cols}");
    }
}

#[test]
fn col_sum_f64_against_ndarray() {
    let (rows, cols) = (6, 17);
    let src: Vec<f64> = (0..rows * cols).map(|i| i as f64).collect();
    let matrix = Array2::from_shape_vec((rows, cols), src.clone()).unwrap();
    let expected: Vec<f64> = matrix.sum_axis(ndarray::Axis(0)).to_vec();

    let mut dst = vec![0.0f64; cols];
    col_sum_f64(&src, rows, cols, &mut dst);
    assert_eq!(dst, expected);
}

#[test]
fn fms_matches_naive_loop() {
    for n in boundary_sizes() {
        let a = 1.25f32;
        let b = random_vec(n);
        let c0 = random_vec(n);

        let mut c = c0.clone();
        fms_f32(a, &b, &mut c);

        for i in 0..n {
            let exact = (a as f64) * (b[i] as f64) - (c0[i] as f64);
            let got = c[i] as f64;
            assert!(
                (got - exact).abs() <= 1e-4 * exact.abs().max(1.0),
                "n={n}, i={i}: {got} vs {exact}"
            );
        }
    }
}

#[test]
fn fms_f64_matches_naive_loop() {
    let a = -0.5f64;
    let b: Vec<f64> = (0..77).map(|i| i as f64).collect();
    let mut c: Vec<f64> = (0..77).map(|i| (i as f64) * 2.0).collect();
    fms_f64(a, &b, &mut c);
    for (i, &got) in c.iter().enumerate() {
        let exact = -0.5 * (i as f64) - 2.0 * (i as f64);
        assert!((got - exact).abs() <= 1e-12 * exact.abs().max(1.0), "i={i}");
    }
}

#[test]
fn par_fms_agrees_with_serial_under_thread_settings() {
    let n = 100_000;
    let a = 2.0f32;
    let b = random_vec(n);
    let c0 = random_vec(n);

    let mut serial = c0.clone();
    fms_f32(a, &b, &mut serial);

    for threads in [0, 1, 2, 4] {
        simdkern::set_num_threads(threads);
        let mut parallel = c0.clone();
        par_fms_f32(a, &b, &mut parallel);
        assert_eq!(parallel, serial, "threads={threads}");
    }
    simdkern::set_num_threads(0);
}

#[test]
fn conversions_match_cast_semantics() {
    let mut rng = rand::rng();
    let mut src: Vec<f32> = (0..500).map(|_| rng.random_range(-300.0f32..300.0)).collect();
    src.extend([f32::NAN, f32::INFINITY, f32::NEG_INFINITY, 127.6, -128.6, 255.9]);

    let mut i8_dst = vec![0i8; src.len()];
    convert_f32_i8(&src, &mut i8_dst);
    let i8_expected: Vec<i8> = src.iter().map(|&s| s as i8).collect();
    assert_eq!(i8_dst, i8_expected);

    let mut u8_dst = vec![0u8; src.len()];
    convert_f32_u8(&src, &mut u8_dst);
    let u8_expected: Vec<u8> = src.iter().map(|&s| s as u8).collect();
    assert_eq!(u8_dst, u8_expected);
}

#[test]
fn integer_conversions_roundtrip_in_range() {
    let src: Vec<i16> = (0..300).map(|i| (i * 219 - 30_000) as i16).collect();

    let mut widened = vec![0i32; src.len()];
    convert_i16_i32(&src, &mut widened);

    let mut narrowed = vec![0i16; src.len()];
    convert_i32_i16(&widened, &mut narrowed);
    assert_eq!(narrowed, src);

    // Out-of-range values saturate on the way down.
    let mut dst = vec![0i16; 2];
    convert_i32_i16(&[100_000, -100_000], &mut dst);
    assert_eq!(dst, [i16::MAX, i16::MIN]);
}

#[test]
fn border_synthesis_shapes_and_values() {
    let rows = 3;
    let cols = 4;
    let border = 2;
    let src: Vec<i32> = (0..rows * cols).map(|i| i as i32).collect();
    let out_cols = cols + 2 * border;
    let out_len = (rows + 2 * border) * out_cols;

    let mut replicated = vec![-1; out_len];
    replicate_border(&src, rows, cols, border, &mut replicated);
    // Corners replicate the corner element.
    assert_eq!(replicated[0], src[0]);
    assert_eq!(replicated[out_len - 1], src[rows * cols - 1]);

    let mut reflected = vec![-1; out_len];
    reflect_border(&src, rows, cols, border, &mut reflected);
    // Whole-sample reflection: offset 2 from the edge reads offset 2 inward.
    assert_eq!(reflected[0], src[2 * cols + 2]);

    // Interiors agree with the source for both modes.
    for r in 0..rows {
        let out_row = (r + border) * out_cols + border;
        assert_eq!(&replicated[out_row..out_row + cols], &src[r * cols..(r + 1) * cols]);
        assert_eq!(&reflected[out_row..out_row + cols], &src[r * cols..(r + 1) * cols]);
    }
}

#[test]
fn capability_mask_is_stable() {
    let a = simdkern::cpu::capabilities();
    let b = simdkern::cpu::capabilities();
    assert_eq!(a, b);
    // Baseline on any x86_64 build target.
    #[cfg(target_arch = "x86_64")]
    assert!(a.sse2);
}
