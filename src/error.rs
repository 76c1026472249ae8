//! Error types for simdkern operations.
//!
//! The performance core is error-free by construction: unsupported CPUs
//! degrade to the scalar kernels, out-of-range conversions saturate, and
//! capability-probe failures silently clear the probed flag. All fallible
//! checks live at the boundary, in the validation helpers below, which the
//! shape-aware callers run before handing buffers to the kernels.

use thiserror::Error;

/// Errors surfaced by the boundary validation helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimdkernError {
    /// Input buffers failed a shape or length check.
    #[error("validation error: {0}")]
    Validation(String),

    /// A 2D view does not cover the buffer it was described with.
    #[error("shape mismatch: expected {expected} elements, buffer holds {actual}")]
    ShapeMismatch {
        /// Element count implied by (rows, row_size).
        expected: usize,
        /// Element count actually present.
        actual: usize,
    },
}

/// Result type alias for simdkern operations.
pub type Result<T> = std::result::Result<T, SimdkernError>;

/// Checks that a buffer is non-empty.
pub fn ensure_non_empty<T>(name: &str, data: &[T]) -> Result<()> {
    if data.is_empty() {
        return Err(SimdkernError::Validation(format!(
            "{name} must not be empty"
        )));
    }
    Ok(())
}

/// Checks that two buffers have the same length.
pub fn ensure_same_len<A, B>(a: &[A], b: &[B]) -> Result<()> {
    if a.len() != b.len() {
        return Err(SimdkernError::Validation(format!(
            "buffers must have the same length (got {} and {})",
            a.len(),
            b.len()
        )));
    }
    Ok(())
}

/// Checks that a (rows, row_size) description covers the buffer exactly.
pub fn ensure_shape<T>(data: &[T], rows: usize, row_size: usize) -> Result<()> {
    let expected = rows * row_size;
    if data.len() != expected {
        return Err(SimdkernError::ShapeMismatch {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_passes() {
        assert!(ensure_non_empty("a", &[1.0f32]).is_ok());
    }

    #[test]
    fn test_non_empty_rejects() {
        let err = ensure_non_empty::<f32>("a", &[]).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_same_len() {
        assert!(ensure_same_len(&[1.0f32, 2.0], &[3.0f32, 4.0]).is_ok());
        let err = ensure_same_len(&[1.0f32], &[3.0f32, 4.0]).unwrap_err();
        assert!(err.to_string().contains("same length"));
    }

    #[test]
    fn test_shape() {
        assert!(ensure_shape(&[0u8; 12], 3, 4).is_ok());
        let err = ensure_shape(&[0u8; 11], 3, 4).unwrap_err();
        assert_eq!(
            err,
            SimdkernError::ShapeMismatch {
                expected: 12,
                actual: 11
            }
        );
    }
}
