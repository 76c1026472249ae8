//! 128-bit SSE lane implementations.
//!
//! `F32x4` needs nothing beyond baseline SSE; `F64x2` needs SSE2. Both are
//! the narrowest vector variants in the dispatch tables, sitting directly
//! above the scalar fallback.

pub mod f32x4;
pub mod f64x2;

pub use f32x4::F32x4;
pub use f64x2::F64x2;
