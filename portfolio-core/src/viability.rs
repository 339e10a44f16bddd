//! Composite repository health scoring.
//!
//! The total is the plain sum of four bounded sub-scores:
//!
//! | component         | range |
//! |-------------------|-------|
//! | test coverage     | 0-30  |
//! | activity          | 0-20  |
//! | documentation     | 0-25  |
//! | dependency health | 0-25  |

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Annotation;
use crate::facts::{
    ACTIVE_WINDOW_DAYS, CommitActivity, OutdatedDependencies, RECENT_WINDOW_DAYS,
    RepositoryFacts, TestCoverage,
};

/// Lowest total rated [`ViabilityRating::High`].
pub const HIGH_THRESHOLD: u8 = 75;
/// Lowest total rated [`ViabilityRating::Medium`].
pub const MEDIUM_THRESHOLD: u8 = 50;

const COVERAGE_BASE: u8 = 10;
const COVERAGE_MAX: u8 = 30;
const COVERAGE_SATURATION_PCT: f64 = 70.0;

/// How the dependency-health sub-score is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyHealthRule {
    /// Score by dependency count alone.
    #[default]
    CountOnly,
    /// Score by dependency count and the number of outdated dependencies.
    OutdatedAware,
}

/// Categorical viability rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViabilityRating {
    /// Production-ready, well-maintained.
    High,
    /// Functional but needs work.
    Medium,
    /// Reference only or abandoned.
    Low,
}

impl ViabilityRating {
    /// Rating for a total. Lower bounds are inclusive.
    pub fn from_total(total: u8) -> Self {
        if total >= HIGH_THRESHOLD {
            Self::High
        } else if total >= MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Stable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Human-readable assessment.
    pub fn description(&self) -> &'static str {
        match self {
            Self::High => "Production-ready with strong maintenance indicators",
            Self::Medium => "Functional repository requiring quality improvements",
            Self::Low => "Reference implementation or inactive project",
        }
    }
}

/// Viability score with its four components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ViabilityScore {
    /// Sum of the four components, 0-100.
    pub total: u8,
    /// Test coverage component, 0-30.
    pub test_coverage: u8,
    /// Activity component, 0-20.
    pub activity: u8,
    /// Documentation component, 0-25.
    pub documentation: u8,
    /// Dependency health component, 0-25.
    pub dependency_health: u8,
    /// Rating derived from the total.
    pub rating: ViabilityRating,
}

impl ViabilityScore {
    /// Assemble a score from its components.
    pub fn from_components(
        test_coverage: u8,
        activity: u8,
        documentation: u8,
        dependency_health: u8,
    ) -> Self {
        let total = test_coverage + activity + documentation + dependency_health;
        Self {
            total,
            test_coverage,
            activity,
            documentation,
            dependency_health,
            rating: ViabilityRating::from_total(total),
        }
    }
}

/// Computes [`ViabilityScore`] values from repository facts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViabilityScorer {
    rule: DependencyHealthRule,
}

impl ViabilityScorer {
    /// Create a scorer using the given dependency-health rule.
    pub fn new(rule: DependencyHealthRule) -> Self {
        Self { rule }
    }

    /// Dependency-health rule in use.
    pub fn rule(&self) -> DependencyHealthRule {
        self.rule
    }

    /// Score a repository. Never fails; missing data maps to floor values.
    pub fn score(&self, facts: &RepositoryFacts) -> ViabilityScore {
        self.score_with_annotations(facts).0
    }

    /// Score a repository and report which facts were substituted.
    pub fn score_with_annotations(
        &self,
        facts: &RepositoryFacts,
    ) -> (ViabilityScore, Vec<Annotation>) {
        let mut notes = Vec::new();
        let score = ViabilityScore::from_components(
            test_coverage_points(facts, &mut notes),
            activity_points(facts, &mut notes),
            documentation_points(facts),
            self.dependency_points(facts, &mut notes),
        );
        (score, notes)
    }

    fn dependency_points(&self, facts: &RepositoryFacts, notes: &mut Vec<Annotation>) -> u8 {
        let count = facts.dependency_count();
        match self.rule {
            DependencyHealthRule::CountOnly => count_only_points(count),
            DependencyHealthRule::OutdatedAware => match facts.outdated_dependencies {
                OutdatedDependencies::Counted(outdated) => outdated_aware_points(count, outdated),
                OutdatedDependencies::Unknown => {
                    notes.push(Annotation::data_gap(
                        "outdated_dependencies",
                        "outdated count unknown; scored by dependency count only",
                    ));
                    count_only_points(count)
                }
            },
        }
    }
}

fn test_coverage_points(facts: &RepositoryFacts, notes: &mut Vec<Annotation>) -> u8 {
    if !facts.has_tests {
        return 0;
    }
    match facts.test_coverage {
        TestCoverage::Unknown => COVERAGE_BASE,
        TestCoverage::Measured(percent) if !percent.is_finite() || percent < 0.0 => {
            notes.push(Annotation::data_gap(
                "test_coverage",
                format!("unusable coverage value {percent}; treated as unknown"),
            ));
            COVERAGE_BASE
        }
        TestCoverage::Measured(percent) => {
            let span = f64::from(COVERAGE_MAX - COVERAGE_BASE);
            let scaled = span * percent.min(COVERAGE_SATURATION_PCT) / COVERAGE_SATURATION_PCT;
            COVERAGE_BASE + scaled.floor() as u8
        }
    }
}

fn activity_points(facts: &RepositoryFacts, notes: &mut Vec<Annotation>) -> u8 {
    match facts.commit_activity {
        CommitActivity::Observed(window) => {
            if window.commits_30d > 0 {
                20
            } else if window.commits_90d > 0 {
                10
            } else {
                0
            }
        }
        CommitActivity::Unknown => match facts.days_since_push() {
            Some(days) => {
                notes.push(Annotation::data_gap(
                    "commit_activity",
                    "commit history unavailable; activity derived from last push",
                ));
                if days <= RECENT_WINDOW_DAYS {
                    20
                } else if days <= ACTIVE_WINDOW_DAYS {
                    10
                } else {
                    0
                }
            }
            None => {
                notes.push(Annotation::data_gap(
                    "commit_activity",
                    "no commit history or push timestamp; activity scored 0",
                ));
                0
            }
        },
    }
}

fn documentation_points(facts: &RepositoryFacts) -> u8 {
    if !facts.has_readme {
        return 0;
    }
    if facts.is_active() { 25 } else { 15 }
}

fn count_only_points(count: usize) -> u8 {
    if count <= 10 {
        25
    } else if count <= 30 {
        15
    } else {
        5
    }
}

fn outdated_aware_points(count: usize, outdated: usize) -> u8 {
    if count == 0 || (count <= 10 && outdated == 0) {
        25
    } else if count <= 30 && outdated <= 3 {
        15
    } else {
        5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{CommitWindow, Dependency};
    use chrono::{Duration, TimeZone, Utc};

    fn with_dependencies(mut facts: RepositoryFacts, count: usize) -> RepositoryFacts {
        facts.dependencies = (0..count)
            .map(|index| Dependency::new(format!("dep-{index}"), "npm"))
            .collect();
        facts
    }

    fn active(commits_30d: u32, commits_90d: u32) -> CommitActivity {
        CommitActivity::Observed(CommitWindow {
            commits_30d,
            commits_90d,
            unique_authors: 1,
        })
    }

    #[test]
    fn no_tests_scores_zero_coverage() {
        let mut facts = RepositoryFacts::named("demo");
        facts.test_coverage = TestCoverage::Measured(95.0);
        let score = ViabilityScorer::default().score(&facts);
        assert_eq!(score.test_coverage, 0);
    }

    #[test]
    fn coverage_scales_linearly_and_saturates() {
        let mut facts = RepositoryFacts::named("demo");
        facts.has_tests = true;
        let scorer = ViabilityScorer::default();

        let cases = [(0.0, 10), (35.0, 20), (69.9, 29), (70.0, 30), (100.0, 30)];
        for (percent, expected) in cases {
            facts.test_coverage = TestCoverage::Measured(percent);
            assert_eq!(scorer.score(&facts).test_coverage, expected, "{percent}%");
        }

        facts.test_coverage = TestCoverage::Unknown;
        assert_eq!(scorer.score(&facts).test_coverage, 10);
    }

    #[test]
    fn unusable_coverage_is_annotated() {
        let mut facts = RepositoryFacts::named("demo");
        facts.has_tests = true;
        facts.test_coverage = TestCoverage::Measured(f64::NAN);
        let (score, notes) = ViabilityScorer::default().score_with_annotations(&facts);
        assert_eq!(score.test_coverage, 10);
        assert!(notes.iter().any(|note| note.field == "test_coverage"));
    }

    #[test]
    fn activity_tiers_follow_commit_windows() {
        let mut facts = RepositoryFacts::named("demo");
        let scorer = ViabilityScorer::default();

        facts.commit_activity = active(3, 9);
        assert_eq!(scorer.score(&facts).activity, 20);
        facts.commit_activity = active(0, 2);
        assert_eq!(scorer.score(&facts).activity, 10);
        facts.commit_activity = active(0, 0);
        assert_eq!(scorer.score(&facts).activity, 0);
    }

    #[test]
    fn missing_history_falls_back_to_push_then_floor() {
        let snapshot = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let mut facts = RepositoryFacts::named("demo");
        let scorer = ViabilityScorer::default();

        let (score, notes) = scorer.score_with_annotations(&facts);
        assert_eq!(score.activity, 0);
        assert_eq!(notes.len(), 1);

        facts.snapshot_at = Some(snapshot);
        facts.last_push = Some(snapshot - Duration::days(10));
        let (score, notes) = scorer.score_with_annotations(&facts);
        assert_eq!(score.activity, 20);
        assert_eq!(notes[0].field, "commit_activity");
    }

    #[test]
    fn documentation_caps_at_fifteen_when_inactive() {
        let mut facts = RepositoryFacts::named("demo");
        facts.has_readme = true;
        facts.has_extra_docs = true;
        facts.commit_activity = active(0, 0);
        let scorer = ViabilityScorer::default();
        assert_eq!(scorer.score(&facts).documentation, 15);

        facts.commit_activity = active(0, 1);
        assert_eq!(scorer.score(&facts).documentation, 25);

        facts.has_readme = false;
        assert_eq!(scorer.score(&facts).documentation, 0);
    }

    #[test]
    fn dependency_count_tiers() {
        let scorer = ViabilityScorer::default();
        let base = RepositoryFacts::named("demo");
        let cases = [(0, 25), (10, 25), (11, 15), (30, 15), (31, 5)];
        for (count, expected) in cases {
            let facts = with_dependencies(base.clone(), count);
            assert_eq!(scorer.score(&facts).dependency_health, expected, "{count}");
        }
    }

    #[test]
    fn outdated_aware_rule_penalizes_stale_dependencies() {
        let scorer = ViabilityScorer::new(DependencyHealthRule::OutdatedAware);
        let mut facts = with_dependencies(RepositoryFacts::named("demo"), 8);

        facts.outdated_dependencies = OutdatedDependencies::Counted(0);
        assert_eq!(scorer.score(&facts).dependency_health, 25);
        facts.outdated_dependencies = OutdatedDependencies::Counted(2);
        assert_eq!(scorer.score(&facts).dependency_health, 15);
        facts.outdated_dependencies = OutdatedDependencies::Counted(4);
        assert_eq!(scorer.score(&facts).dependency_health, 5);

        facts.outdated_dependencies = OutdatedDependencies::Unknown;
        let (score, notes) = scorer.score_with_annotations(&facts);
        assert_eq!(score.dependency_health, 25);
        assert!(notes.iter().any(|note| note.field == "outdated_dependencies"));
    }

    #[test]
    fn rating_boundaries_are_inclusive() {
        assert_eq!(ViabilityRating::from_total(75), ViabilityRating::High);
        assert_eq!(ViabilityRating::from_total(74), ViabilityRating::Medium);
        assert_eq!(ViabilityRating::from_total(50), ViabilityRating::Medium);
        assert_eq!(ViabilityRating::from_total(49), ViabilityRating::Low);
    }

    #[test]
    fn total_is_exact_sum_within_bounds() {
        let mut facts = with_dependencies(RepositoryFacts::named("demo"), 3);
        facts.has_tests = true;
        facts.has_readme = true;
        facts.test_coverage = TestCoverage::Measured(88.0);
        facts.commit_activity = active(5, 12);

        let score = ViabilityScorer::default().score(&facts);
        assert_eq!(score.total, 100);
        assert_eq!(
            score.total,
            score.test_coverage + score.activity + score.documentation + score.dependency_health
        );
        assert_eq!(score.rating, ViabilityRating::High);
    }

    #[test]
    fn inactive_documented_repository_scores_medium() {
        let mut facts = with_dependencies(RepositoryFacts::named("demo"), 5);
        facts.has_tests = true;
        facts.has_readme = true;
        facts.commit_activity = active(0, 0);

        let score = ViabilityScorer::default().score(&facts);
        assert_eq!(score.test_coverage, 10);
        assert_eq!(score.activity, 0);
        assert_eq!(score.documentation, 15);
        assert_eq!(score.dependency_health, 25);
        assert_eq!(score.total, 50);
        assert_eq!(score.rating, ViabilityRating::Medium);
    }
}
