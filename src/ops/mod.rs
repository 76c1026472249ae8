//! Operation kernels and their dispatch tables.
//!
//! Each submodule owns one operation family: the portable scalar kernel,
//! the `#[target_feature]` vector variants, the priority-ordered
//! [`DispatchTable`](crate::dispatch::DispatchTable) binding them together,
//! and the public entry points that resolve the table against the
//! process-wide capability mask.
//!
//! Entry points trust the shape contracts documented on them
//! (`debug_assert!` only); callers validate with the helpers in
//! [`crate::error`].

pub mod border;
pub mod convert;
pub mod fms;
pub mod max;
pub mod scalar;
pub mod sum;

pub use border::{reflect_border, replicate_border};
pub use convert::{convert_f32_i8, convert_f32_u8, convert_i16_i32, convert_i32_i16};
pub use fms::{fms_f32, fms_f64, par_fms_f32};
pub use max::{
    col_max_f32, col_max_f64, reduce_max_f32, reduce_max_f64, row_max_f32, row_max_f64,
};
pub use sum::{col_sum_f32, col_sum_f64, reduce_sum_f32, reduce_sum_f64};
