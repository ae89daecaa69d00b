//! Engine error taxonomy
//!
//! Only [`GenerationError`] crosses the `generate()` boundary, and of its
//! variants only `InsufficientWardrobe` occurs in practice: every other
//! failure inside the pipeline degrades the result to a looser tier
//! instead of failing the request. Internal tier failures are modeled as
//! [`TierFailure`] and consumed by the degradation controller.

use ensemble_common::Category;
use thiserror::Error;

/// Hard failures returned to the caller of `generate()`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Wardrobe has zero usable items; no outfit can be composed
    #[error("wardrobe has no usable items")]
    InsufficientWardrobe,

    /// A required category could not be filled even with fallback
    /// placeholders. Fallback synthesis makes this unreachable; it is
    /// kept as a typed invariant violation rather than a panic.
    #[error("no item or placeholder available for required category '{category}'")]
    MissingRequiredCategory { category: Category },
}

/// Why one tier attempt failed, consumed by the degradation controller
///
/// Never surfaced to callers; the controller logs it and advances the
/// ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TierFailure {
    /// A required category had no candidates after filtering
    EmptyCategory(Category),

    /// Assembly produced outfits but none passed validation
    Validation(String),

    /// A scoring stage produced a non-finite value or otherwise failed;
    /// treated as if the stage yielded zero candidates
    Scoring(String),
}

impl std::fmt::Display for TierFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TierFailure::EmptyCategory(category) => {
                write!(f, "no candidates for required category '{category}'")
            }
            TierFailure::Validation(reason) => write!(f, "validation failed: {reason}"),
            TierFailure::Scoring(detail) => write!(f, "scoring failed: {detail}"),
        }
    }
}
