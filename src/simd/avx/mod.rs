//! 256-bit AVX lane implementations.
//!
//! `F32x8` and `F64x4` need AVX; `FmaF32x8` additionally needs FMA and is
//! identical except for a single-rounding fused multiply-subtract. The
//! horizontal trees extract the two 128-bit halves and finish with the same
//! shuffle steps the SSE variants use, applying the identical strict
//! greater-than primitive at every level.

pub mod f32x8;
pub mod f64x4;

pub use f32x8::{F32x8, FmaF32x8};
pub use f64x4::F64x4;
