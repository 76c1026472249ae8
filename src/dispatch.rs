//! Kernel variant selection.
//!
//! Each logical operation and element type owns a [`DispatchTable`]: a
//! priority-ordered list of [`Candidate`] kernels, widest/newest instruction
//! set first, plus a portable scalar fallback that is always eligible.
//! Resolution is a pure linear scan against the capability mask — the same
//! mask and table always yield the same variant, and selection never fails
//! (it may simply pick the slow scalar kernel).

use tracing::debug;

use crate::cpu::CapabilityMask;

/// Instruction-set level a kernel variant requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Scalar,
    Sse,
    Sse2,
    Sse41,
    Avx,
    Avx2,
    Fma,
}

impl Level {
    pub const fn label(self) -> &'static str {
        match self {
            Level::Scalar => "scalar",
            Level::Sse => "sse",
            Level::Sse2 => "sse2",
            Level::Sse41 => "sse4.1",
            Level::Avx => "avx",
            Level::Avx2 => "avx2",
            Level::Fma => "fma",
        }
    }

    /// Whether the mask confirms everything this level requires.
    ///
    /// Compound levels also require the base extension their kernels mix in:
    /// SSE4.1 kernels use SSE2 loads and stores, AVX2 kernels use AVX-class
    /// 256-bit instructions, FMA kernels use AVX widths.
    pub fn supported(self, caps: &CapabilityMask) -> bool {
        match self {
            Level::Scalar => true,
            Level::Sse => caps.sse,
            Level::Sse2 => caps.sse2,
            Level::Sse41 => caps.sse41 && caps.sse2,
            Level::Avx => caps.avx,
            Level::Avx2 => caps.avx2 && caps.avx,
            Level::Fma => caps.fma && caps.avx,
        }
    }
}

/// One specialized kernel and the level it requires.
#[derive(Clone, Copy)]
pub struct Candidate<F> {
    pub level: Level,
    pub func: F,
}

impl<F> Candidate<F> {
    pub const fn new(level: Level, func: F) -> Self {
        Self { level, func }
    }
}

/// The variant a table resolved to.
#[derive(Clone, Copy)]
pub struct Selected<F> {
    pub level: Level,
    pub func: F,
}

/// Priority-ordered kernel table for one (operation, element type) pair.
pub struct DispatchTable<F: Copy + 'static> {
    name: &'static str,
    scalar: F,
    candidates: &'static [Candidate<F>],
}

impl<F: Copy + 'static> DispatchTable<F> {
    pub const fn new(name: &'static str, scalar: F, candidates: &'static [Candidate<F>]) -> Self {
        Self {
            name,
            scalar,
            candidates,
        }
    }

    /// Returns the first candidate the mask supports, or the scalar fallback.
    pub fn resolve(&self, caps: &CapabilityMask) -> Selected<F> {
        for candidate in self.candidates {
            if candidate.level.supported(caps) {
                debug!(
                    "dispatch {}: selected {}",
                    self.name,
                    candidate.level.label()
                );
                return Selected {
                    level: candidate.level,
                    func: candidate.func,
                };
            }
        }
        debug!("dispatch {}: selected scalar fallback", self.name);
        Selected {
            level: Level::Scalar,
            func: self.scalar,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Candidate levels in priority order, scalar fallback excluded.
    pub fn levels(&self) -> impl Iterator<Item = Level> + '_ {
        self.candidates.iter().map(|c| c.level)
    }
}
