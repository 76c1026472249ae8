//! Process-wide CPU capability detection.
//!
//! The host CPU is queried once per process for the instruction-set
//! extensions the kernel variants target. The resulting [`CapabilityMask`]
//! is memoized in a `OnceLock` and read-only for the remainder of the
//! process, so concurrent readers need no synchronization.
//!
//! For the floating-point-bearing extensions (SSE, AVX) a reported flag is
//! not trusted blindly: a trivial vector computation is executed and its
//! result checked against the scalar expectation, because some execution
//! environments report a capability the OS does not actually enable. A
//! failed probe clears the flag and everything that builds on it; it never
//! surfaces as an error. An undetectable CPU simply yields the all-false
//! mask, forcing the portable scalar path everywhere.

use std::fmt;
use std::sync::OnceLock;

use tracing::debug;

/// Immutable-after-init bitset of supported instruction-set extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityMask {
    pub mmx: bool,
    pub sse: bool,
    pub sse2: bool,
    pub sse3: bool,
    pub ssse3: bool,
    pub sse41: bool,
    pub sse42: bool,
    pub avx: bool,
    pub avx2: bool,
    pub fma: bool,
    pub fma4: bool,
}

impl CapabilityMask {
    /// The all-false mask: every operation resolves to its scalar kernel.
    pub const NONE: CapabilityMask = CapabilityMask {
        mmx: false,
        sse: false,
        sse2: false,
        sse3: false,
        ssse3: false,
        sse41: false,
        sse42: false,
        avx: false,
        avx2: false,
        fma: false,
        fma4: false,
    };

    /// Human-readable name of the widest usable extension.
    pub fn feature_level(&self) -> &'static str {
        if self.avx2 {
            "avx2"
        } else if self.avx {
            "avx"
        } else if self.sse42 {
            "sse4.2"
        } else if self.sse41 {
            "sse4.1"
        } else if self.sse2 {
            "sse2"
        } else if self.sse {
            "sse"
        } else {
            "scalar"
        }
    }
}

impl fmt::Display for CapabilityMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (fma={}, fma4={})", self.feature_level(), self.fma, self.fma4)
    }
}

static CAPABILITIES: OnceLock<CapabilityMask> = OnceLock::new();

/// Returns the process-wide capability mask, detecting it on first use.
///
/// Idempotent: every call in the same process observes the same mask.
pub fn capabilities() -> &'static CapabilityMask {
    CAPABILITIES.get_or_init(|| {
        let mask = detect();
        debug!("detected cpu capabilities: {mask}");
        mask
    })
}

/// Clears flags whose runtime probe failed, together with every extension
/// that builds on them.
///
/// A failed SSE probe means the OS does not save the XMM state, so the whole
/// SSE family and everything above it is unusable. A failed AVX probe means
/// the YMM state is not enabled, taking AVX2 and the FMA families with it.
pub(crate) fn apply_probe_results(
    mut mask: CapabilityMask,
    sse_ok: bool,
    avx_ok: bool,
) -> CapabilityMask {
    if mask.sse && !sse_ok {
        mask.sse = false;
        mask.sse2 = false;
        mask.sse3 = false;
        mask.ssse3 = false;
        mask.sse41 = false;
        mask.sse42 = false;
        mask.avx = false;
        mask.avx2 = false;
        mask.fma = false;
        mask.fma4 = false;
    }
    if mask.avx && !avx_ok {
        mask.avx = false;
        mask.avx2 = false;
        mask.fma = false;
        mask.fma4 = false;
    }
    mask
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn detect() -> CapabilityMask {
    let reported = CapabilityMask {
        mmx: std::arch::is_x86_feature_detected!("mmx"),
        sse: std::arch::is_x86_feature_detected!("sse"),
        sse2: std::arch::is_x86_feature_detected!("sse2"),
        sse3: std::arch::is_x86_feature_detected!("sse3"),
        ssse3: std::arch::is_x86_feature_detected!("ssse3"),
        sse41: std::arch::is_x86_feature_detected!("sse4.1"),
        sse42: std::arch::is_x86_feature_detected!("sse4.2"),
        avx: std::arch::is_x86_feature_detected!("avx"),
        avx2: std::arch::is_x86_feature_detected!("avx2"),
        fma: std::arch::is_x86_feature_detected!("fma"),
        // XOP-era AMD extension. No kernel here targets it and the standard
        // library offers no runtime check, so it is never reported.
        fma4: false,
    };

    let sse_ok = !reported.sse || unsafe { probe::sse() };
    let avx_ok = !reported.avx || unsafe { probe::avx() };
    apply_probe_results(reported, sse_ok, avx_ok)
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
fn detect() -> CapabilityMask {
    CapabilityMask::NONE
}

/// Runtime probes: execute one trivial vector instruction per extension and
/// check the observed result before trusting the reported flag.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod probe {
    #[cfg(target_arch = "x86")]
    use std::arch::x86::*;
    #[cfg(target_arch = "x86_64")]
    use std::arch::x86_64::*;

    /// # Safety
    ///
    /// Caller must have confirmed the CPU reports SSE support.
    #[target_feature(enable = "sse")]
    pub(super) unsafe fn sse() -> bool {
        let a = _mm_set_ps(4.0, 3.0, 2.0, 1.0);
        let b = _mm_set_ps(0.5, 0.5, 0.5, 0.5);
        let sum = _mm_add_ps(a, b);
        let mut out = [0.0f32; 4];
        _mm_storeu_ps(out.as_mut_ptr(), sum);
        out == [1.5, 2.5, 3.5, 4.5]
    }

    /// # Safety
    ///
    /// Caller must have confirmed the CPU reports AVX support.
    #[target_feature(enable = "avx")]
    pub(super) unsafe fn avx() -> bool {
        let a = _mm256_set_ps(8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0);
        let b = _mm256_set1_ps(1.0);
        let sum = _mm256_add_ps(a, b);
        let mut out = [0.0f32; 8];
        _mm256_storeu_ps(out.as_mut_ptr(), sum);
        out == [2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_mask() -> CapabilityMask {
        CapabilityMask {
            mmx: true,
            sse: true,
            sse2: true,
            sse3: true,
            ssse3: true,
            sse41: true,
            sse42: true,
            avx: true,
            avx2: true,
            fma: true,
            fma4: false,
        }
    }

    #[test]
    fn test_detection_is_idempotent() {
        let first = *capabilities();
        let second = *capabilities();
        assert_eq!(first, second);
    }

    #[test]
    fn test_probe_success_keeps_mask() {
        let mask = full_mask();
        assert_eq!(apply_probe_results(mask, true, true), mask);
    }

    #[test]
    fn test_failed_avx_probe_clears_avx_family() {
        let cleared = apply_probe_results(full_mask(), true, false);
        assert!(!cleared.avx);
        assert!(!cleared.avx2);
        assert!(!cleared.fma);
        // The SSE family survives an AVX-only failure.
        assert!(cleared.sse);
        assert!(cleared.sse42);
    }

    #[test]
    fn test_failed_sse_probe_clears_everything_vector() {
        let cleared = apply_probe_results(full_mask(), false, true);
        assert!(!cleared.sse);
        assert!(!cleared.sse2);
        assert!(!cleared.sse41);
        assert!(!cleared.avx);
        assert!(!cleared.avx2);
        assert!(!cleared.fma);
        // MMX is integer-only state and unaffected by an XMM probe.
        assert!(cleared.mmx);
        assert_eq!(cleared.feature_level(), "scalar");
    }

    #[test]
    fn test_probe_noop_on_unreported_flags() {
        let mask = CapabilityMask::NONE;
        assert_eq!(apply_probe_results(mask, false, false), mask);
    }

    #[test]
    fn test_feature_level_ordering() {
        let mut mask = CapabilityMask::NONE;
        assert_eq!(mask.feature_level(), "scalar");
        mask.sse = true;
        assert_eq!(mask.feature_level(), "sse");
        mask.sse2 = true;
        assert_eq!(mask.feature_level(), "sse2");
        mask.sse41 = true;
        assert_eq!(mask.feature_level(), "sse4.1");
        mask.avx = true;
        assert_eq!(mask.feature_level(), "avx");
        mask.avx2 = true;
        assert_eq!(mask.feature_level(), "avx2");
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    #[test]
    fn test_probes_pass_on_reporting_hosts() {
        let caps = capabilities();
        if caps.sse {
            assert!(unsafe { probe::sse() });
        }
        if caps.avx {
            assert!(unsafe { probe::avx() });
        }
    }
}
