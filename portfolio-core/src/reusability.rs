//! Template-suitability classification.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::facts::RepositoryFacts;
use crate::viability::{HIGH_THRESHOLD, MEDIUM_THRESHOLD};

/// Whether a repository is a good template for new work.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Reusability {
    /// Ready to be used as a template.
    HighlyReusable,
    /// Components can be extracted.
    PartiallyReusable,
    /// Project-specific.
    OneOff,
}

impl Reusability {
    /// Stable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighlyReusable => "highly_reusable",
            Self::PartiallyReusable => "partially_reusable",
            Self::OneOff => "one_off",
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::HighlyReusable => "Suitable as a template for new projects",
            Self::PartiallyReusable => "Individual components can be extracted and reused",
            Self::OneOff => "Project-specific implementation",
        }
    }
}

/// Classify from a viability total and quality flags.
///
/// Highly reusable requires every condition; forks never qualify.
pub fn classify(
    viability_total: u8,
    has_tests: bool,
    has_docs: bool,
    is_fork: bool,
    is_active: bool,
) -> Reusability {
    if viability_total >= HIGH_THRESHOLD && has_tests && has_docs && !is_fork && is_active {
        Reusability::HighlyReusable
    } else if viability_total >= MEDIUM_THRESHOLD && (has_tests || has_docs) {
        Reusability::PartiallyReusable
    } else {
        Reusability::OneOff
    }
}

/// Classify a repository given its viability total.
pub fn classify_facts(viability_total: u8, facts: &RepositoryFacts) -> Reusability {
    classify(
        viability_total,
        facts.has_tests,
        facts.has_docs(),
        facts.is_fork,
        facts.is_active(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_conditions_make_highly_reusable() {
        assert_eq!(classify(75, true, true, false, true), Reusability::HighlyReusable);
    }

    #[test]
    fn forks_are_never_highly_reusable() {
        for total in [75, 90, 100] {
            for active in [true, false] {
                assert_ne!(
                    classify(total, true, true, true, active),
                    Reusability::HighlyReusable
                );
            }
        }
        assert_eq!(classify(100, true, true, true, true), Reusability::PartiallyReusable);
    }

    #[test]
    fn each_missing_condition_drops_to_partial() {
        assert_eq!(classify(74, true, true, false, true), Reusability::PartiallyReusable);
        assert_eq!(classify(80, false, true, false, true), Reusability::PartiallyReusable);
        assert_eq!(classify(80, true, false, false, true), Reusability::PartiallyReusable);
        assert_eq!(classify(80, true, true, false, false), Reusability::PartiallyReusable);
    }

    #[test]
    fn partial_needs_tests_or_docs() {
        assert_eq!(classify(50, false, true, false, false), Reusability::PartiallyReusable);
        assert_eq!(classify(50, false, false, false, true), Reusability::OneOff);
        assert_eq!(classify(49, true, true, false, true), Reusability::OneOff);
    }

    #[test]
    fn classify_facts_reads_flags() {
        let mut facts = RepositoryFacts::named("demo");
        facts.has_tests = true;
        facts.is_fork = true;
        assert_eq!(classify_facts(50, &facts), Reusability::PartiallyReusable);
    }
}
