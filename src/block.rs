//! Generic blocked execution algorithms.
//!
//! Every vector kernel variant in the crate is one of these algorithms
//! instantiated with a concrete [`LaneOps`] implementation and wrapped in a
//! `#[target_feature]` function. The algorithms own the blocking discipline:
//! lane-width main loops, multiple independent accumulators to hide
//! instruction latency, horizontal-reduction trees on loop exit, and scalar
//! tail loops for the `n mod LANES` remainder.
//!
//! All functions trust their preconditions (`debug_assert!` only); shape
//! validation belongs to the callers' boundary layer. None of them allocate.

use crate::simd::traits::{Element, LaneOps};

/// Independent accumulators per whole-array reduction, chosen to cover the
/// latency of the fold instruction on current cores.
pub(crate) const UNROLL: usize = 4;

/// Rows reduced in parallel by the row-wise reductions, one accumulator
/// register each.
pub(crate) const BLOCK_M: usize = 4;

/// Whole-array maximum.
///
/// Seeds all accumulators with `splat(data[0])`, folds `UNROLL * LANES`
/// elements per main-loop iteration, drains leftover lane chunks into the
/// first accumulator, combines the accumulators pairwise, collapses with the
/// horizontal tree, and finishes the `n mod LANES` tail with the scalar
/// strict greater-than.
///
/// # Safety
///
/// The instruction set `L` targets must be enabled for the calling context.
#[inline(always)]
pub(crate) unsafe fn reduce_max_blocked<T, L>(data: &[T]) -> T
where
    T: Element,
    L: LaneOps<T>,
{
    debug_assert!(!data.is_empty(), "reduction input must not be empty");

    let n = data.len();
    let ptr = data.as_ptr();
    let lanes = L::LANES;
    let step = lanes * UNROLL;

    let mut acc0 = L::splat(data[0]);
    let mut acc1 = acc0;
    let mut acc2 = acc0;
    let mut acc3 = acc0;

    let unrolled = n - n % step;
    let mut i = 0;
    while i < unrolled {
        acc0 = L::select_gt(acc0, L::load(ptr.add(i)));
        acc1 = L::select_gt(acc1, L::load(ptr.add(i + lanes)));
        acc2 = L::select_gt(acc2, L::load(ptr.add(i + 2 * lanes)));
        acc3 = L::select_gt(acc3, L::load(ptr.add(i + 3 * lanes)));
        i += step;
    }

    let aligned = n - n % lanes;
    while i < aligned {
        acc0 = L::select_gt(acc0, L::load(ptr.add(i)));
        i += lanes;
    }

    acc0 = L::select_gt(acc0, acc1);
    acc2 = L::select_gt(acc2, acc3);
    acc0 = L::select_gt(acc0, acc2);

    let mut m = L::hmax(acc0);
    for &x in &data[aligned..] {
        if x > m {
            m = x;
        }
    }
    m
}

/// Whole-array sum. Same blocking as [`reduce_max_blocked`] with zero-seeded
/// accumulators and the add fold.
///
/// # Safety
///
/// The instruction set `L` targets must be enabled for the calling context.
#[inline(always)]
pub(crate) unsafe fn reduce_sum_blocked<T, L>(data: &[T]) -> T
where
    T: Element,
    L: LaneOps<T>,
{
    debug_assert!(!data.is_empty(), "reduction input must not be empty");

    let n = data.len();
    let ptr = data.as_ptr();
    let lanes = L::LANES;
    let step = lanes * UNROLL;

    let mut acc0 = L::splat(T::zero());
    let mut acc1 = acc0;
    let mut acc2 = acc0;
    let mut acc3 = acc0;

    let unrolled = n - n % step;
    let mut i = 0;
    while i < unrolled {
        acc0 = L::add(acc0, L::load(ptr.add(i)));
        acc1 = L::add(acc1, L::load(ptr.add(i + lanes)));
        acc2 = L::add(acc2, L::load(ptr.add(i + 2 * lanes)));
        acc3 = L::add(acc3, L::load(ptr.add(i + 3 * lanes)));
        i += step;
    }

    let aligned = n - n % lanes;
    while i < aligned {
        acc0 = L::add(acc0, L::load(ptr.add(i)));
        i += lanes;
    }

    acc0 = L::add(acc0, acc1);
    acc2 = L::add(acc2, acc3);
    acc0 = L::add(acc0, acc2);

    let mut sum = L::hadd(acc0);
    for &x in &data[aligned..] {
        sum = sum + x;
    }
    sum
}

/// Row-wise maximum over a row-major `rows x row_size` buffer.
///
/// Reduces [`BLOCK_M`] rows in parallel, one accumulator register per row
/// sharing a single column-chunk loop, then handles `rows mod BLOCK_M`
/// leftover rows with the straightforward per-element loop. Each row result
/// is combined into `dst` with the strict greater-than, so previously stored
/// partial results survive ties and the call supports multi-slice
/// accumulation.
///
/// # Safety
///
/// The instruction set `L` targets must be enabled for the calling context.
#[inline(always)]
pub(crate) unsafe fn row_max_blocked<T, L>(src: &[T], rows: usize, row_size: usize, dst: &mut [T])
where
    T: Element,
    L: LaneOps<T>,
{
    debug_assert!(row_size > 0, "rows must not be empty");
    debug_assert_eq!(src.len(), rows * row_size);
    debug_assert_eq!(dst.len(), rows);

    let lanes = L::LANES;
    let aligned = row_size - row_size % lanes;

    let mut r = 0;
    if row_size >= lanes {
        while r + BLOCK_M <= rows {
            let p0 = src.as_ptr().add(r * row_size);
            let p1 = p0.add(row_size);
            let p2 = p1.add(row_size);
            let p3 = p2.add(row_size);

            let mut acc0 = L::splat(*p0);
            let mut acc1 = L::splat(*p1);
            let mut acc2 = L::splat(*p2);
            let mut acc3 = L::splat(*p3);

            let mut j = 0;
            while j < aligned {
                acc0 = L::select_gt(acc0, L::load(p0.add(j)));
                acc1 = L::select_gt(acc1, L::load(p1.add(j)));
                acc2 = L::select_gt(acc2, L::load(p2.add(j)));
                acc3 = L::select_gt(acc3, L::load(p3.add(j)));
                j += lanes;
            }

            let mut partial = [L::hmax(acc0), L::hmax(acc1), L::hmax(acc2), L::hmax(acc3)];
            let ptrs = [p0, p1, p2, p3];
            for k in 0..BLOCK_M {
                for j in aligned..row_size {
                    let x = *ptrs[k].add(j);
                    if x > partial[k] {
                        partial[k] = x;
                    }
                }
                if partial[k] > dst[r + k] {
                    dst[r + k] = partial[k];
                }
            }
            r += BLOCK_M;
        }
    }

    // Remainder rows (and every row when row_size < LANES).
    while r < rows {
        let row = &src[r * row_size..(r + 1) * row_size];
        let mut m = row[0];
        for &x in &row[1..] {
            if x > m {
                m = x;
            }
        }
        if m > dst[r] {
            dst[r] = m;
        }
        r += 1;
    }
}

/// Column-wise maximum over a row-major `rows x row_size` buffer, combined
/// into `dst` with the strict greater-than so partial results from previous
/// slices survive ties.
///
/// # Safety
///
/// The instruction set `L` targets must be enabled for the calling context.
#[inline(always)]
pub(crate) unsafe fn col_max_blocked<T, L>(src: &[T], rows: usize, row_size: usize, dst: &mut [T])
where
    T: Element,
    L: LaneOps<T>,
{
    debug_assert_eq!(src.len(), rows * row_size);
    debug_assert_eq!(dst.len(), row_size);

    let lanes = L::LANES;
    let aligned = row_size - row_size % lanes;
    let dst_ptr = dst.as_mut_ptr();

    for r in 0..rows {
        let row_ptr = src.as_ptr().add(r * row_size);
        let mut j = 0;
        while j < aligned {
            let d = L::load(dst_ptr.add(j).cast_const());
            let s = L::load(row_ptr.add(j));
            L::store(dst_ptr.add(j), L::select_gt(d, s));
            j += lanes;
        }
        for j in aligned..row_size {
            let x = *row_ptr.add(j);
            if x > dst[j] {
                dst[j] = x;
            }
        }
    }
}

/// Column-wise sum over a row-major `rows x row_size` buffer, accumulated
/// into `dst` (`dst[j] += sum over rows of src[r][j]`).
///
/// Each row is added into `dst` with a lane-blocked elementwise loop and a
/// scalar tail, so `dst` doubles as the accumulator and the call composes
/// across slices.
///
/// # Safety
///
/// The instruction set `L` targets must be enabled for the calling context.
#[inline(always)]
pub(crate) unsafe fn col_sum_blocked<T, L>(src: &[T], rows: usize, row_size: usize, dst: &mut [T])
where
    T: Element,
    L: LaneOps<T>,
{
    debug_assert_eq!(src.len(), rows * row_size);
    debug_assert_eq!(dst.len(), row_size);

    let lanes = L::LANES;
    let aligned = row_size - row_size % lanes;
    let dst_ptr = dst.as_mut_ptr();

    for r in 0..rows {
        let row_ptr = src.as_ptr().add(r * row_size);
        let mut j = 0;
        while j < aligned {
            let d = L::load(dst_ptr.add(j).cast_const());
            let s = L::load(row_ptr.add(j));
            L::store(dst_ptr.add(j), L::add(d, s));
            j += lanes;
        }
        for j in aligned..row_size {
            dst[j] = dst[j] + *row_ptr.add(j);
        }
    }
}

/// Elementwise fused multiply-subtract `c[i] = a * b[i] - c[i]` with the
/// scalar operand `a` broadcast to all lanes. Overwrites `c` in place; `b`
/// is read-only; no temporary allocation.
///
/// # Safety
///
/// The instruction set `L` targets must be enabled for the calling context.
#[inline(always)]
pub(crate) unsafe fn fms_blocked<T, L>(a: T, b: &[T], c: &mut [T])
where
    T: Element,
    L: LaneOps<T>,
{
    debug_assert_eq!(b.len(), c.len());

    let n = c.len();
    let lanes = L::LANES;
    let aligned = n - n % lanes;

    let va = L::splat(a);
    let b_ptr = b.as_ptr();
    let c_ptr = c.as_mut_ptr();

    let mut i = 0;
    while i < aligned {
        let vb = L::load(b_ptr.add(i));
        let vc = L::load(c_ptr.add(i).cast_const());
        L::store(c_ptr.add(i), L::fmsub(va, vb, vc));
        i += lanes;
    }
    for i in aligned..n {
        c[i] = L::fmsub_scalar(a, b[i], c[i]);
    }
}
