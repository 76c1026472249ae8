//! Lane-operation traits the blocked kernels are generic over.

use std::ops::{Add, Mul, Sub};

use num::Zero;

/// Numeric element type the lane kernels operate on.
///
/// Blanket-implemented for every type with the required arithmetic; in
/// practice the vector implementations cover `f32` and `f64` and the scalar
/// reference kernels cover the integer types as well.
pub trait Element:
    Copy + PartialOrd + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> + Zero
{
}

impl<T> Element for T where
    T: Copy + PartialOrd + Add<Output = T> + Sub<Output = T> + Mul<Output = T> + Zero
{
}

/// One (instruction set, element type) pair's lane primitives.
///
/// Implementations are zero-sized marker types wrapping raw intrinsics. All
/// methods are `#[inline(always)]` so they fold into the enclosing
/// `#[target_feature]` wrapper, which is where the safety obligation lives.
///
/// # Safety
///
/// Every method may only be called when the instruction set the implementor
/// targets is actually enabled for the calling context. `load`/`store`
/// additionally require `LANES` valid elements at the pointer.
pub trait LaneOps<T: Element> {
    /// Elements processed per vector register.
    const LANES: usize;

    /// The underlying vector register type.
    type Reg: Copy;

    /// Broadcasts one value to all lanes.
    unsafe fn splat(value: T) -> Self::Reg;

    /// Loads `LANES` elements from unaligned memory.
    unsafe fn load(ptr: *const T) -> Self::Reg;

    /// Stores `LANES` elements to unaligned memory.
    unsafe fn store(ptr: *mut T, reg: Self::Reg);

    unsafe fn add(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    unsafe fn mul(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    unsafe fn sub(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// `a * b - c` per lane. The default is unfused; FMA implementations
    /// override it with the single-rounding instruction.
    #[inline(always)]
    unsafe fn fmsub(a: Self::Reg, b: Self::Reg, c: Self::Reg) -> Self::Reg {
        Self::sub(Self::mul(a, b), c)
    }

    /// Scalar companion of [`fmsub`](Self::fmsub), used for tail elements so
    /// a variant is internally consistent about fusion.
    #[inline(always)]
    fn fmsub_scalar(a: T, b: T, c: T) -> T {
        a * b - c
    }

    /// Per-lane maximum with the reduction's tie-break rule: a candidate
    /// lane replaces the accumulator lane only under strict ordered
    /// greater-than, so exact ties keep the accumulator and a NaN candidate
    /// is never selected.
    unsafe fn select_gt(acc: Self::Reg, cand: Self::Reg) -> Self::Reg;

    /// Collapses a register to its maximum via a shuffle-and-combine tree
    /// built from the same strict greater-than primitive.
    unsafe fn hmax(reg: Self::Reg) -> T;

    /// Collapses a register to the sum of its lanes.
    unsafe fn hadd(reg: Self::Reg) -> T;
}
