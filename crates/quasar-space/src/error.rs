//! Generation error types.

/// Errors raised when a generator is configured with invalid parameters.
///
/// Generation is pure and deterministic, so these are the only failure paths:
/// a config is either rejected up front or the generator succeeds.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// A generator was asked for zero particles.
    #[error("particle count must be at least 1, got {0}")]
    InvalidParticleCount(usize),

    /// The combined structure particle counts do not fit in the galaxy budget.
    #[error("structure particles ({requested}) exceed the galaxy particle budget ({budget})")]
    StructureBudgetExceeded { requested: usize, budget: usize },

    /// A spiral galaxy needs at least one branch.
    #[error("galaxy branch count must be at least 1")]
    InvalidBranchCount,

    /// A radius, scale, or rate that must be strictly positive was not.
    #[error("{name} must be positive, got {value}")]
    NonPositiveParameter { name: &'static str, value: f32 },

    /// An annulus or shell whose inner bound does not sit below its outer bound.
    #[error("{name} must satisfy 0 < inner < outer, got inner {inner} and outer {outer}")]
    InvalidRadialRange {
        name: &'static str,
        inner: f32,
        outer: f32,
    },

    /// A parameter that must be non-negative was negative.
    #[error("{name} must be non-negative, got {value}")]
    NegativeParameter { name: &'static str, value: f32 },

    /// A planet kind string did not match any known surface archetype.
    #[error("unknown planet kind '{0}'")]
    UnknownPlanetKind(String),
}
