//! Shared output records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A mapping of primary language names to repository counts.
pub type LanguageHistogram = BTreeMap<String, usize>;

/// A non-fatal note that a fact was missing and a floor value was substituted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub struct Annotation {
    /// Fact the note is about (e.g. "commit_activity").
    pub field: String,
    /// Human-readable summary of the substitution.
    pub message: String,
}

impl Annotation {
    /// Create a data-gap annotation.
    pub fn data_gap(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A repository left out of every aggregate because its facts were unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SkippedRepository {
    /// Repository identifier.
    pub repository: String,
    /// Why the collaborator layer could not produce facts.
    pub reason: String,
}
