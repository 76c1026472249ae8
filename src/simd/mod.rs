//! Per-instruction-set lane primitives.
//!
//! Each submodule implements [`traits::LaneOps`] for one (instruction set,
//! element type) pair. The blocked execution algorithms in `crate::block`
//! are generic over these implementations; the monomorphic
//! `#[target_feature]` wrappers in `crate::ops` pick the pair.

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod avx;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod sse;

pub mod traits;
