//! Cross-repository pattern mining.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::detectors::{self, PatternKind, PatternObservation};
use crate::facts::RepositoryFacts;

/// Smallest usage threshold the miner accepts; singletons are never patterns.
pub const MIN_USAGE_FLOOR: usize = 2;

/// Pattern miner settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    /// Minimum number of distinct repositories for a pattern to be kept.
    pub min_usage: usize,
    /// Number of patterns surfaced as top patterns.
    pub top_n: usize,
    /// Whether every shared dependency is mined as an integration pattern.
    pub shared_dependencies: bool,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            min_usage: 3,
            top_n: 10,
            shared_dependencies: false,
        }
    }
}

/// A consolidated pattern observed in at least `min_usage` repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pattern {
    /// Canonical pattern name.
    pub name: String,
    /// Pattern classification.
    pub kind: PatternKind,
    /// What the pattern is.
    pub description: String,
    /// First-party ecosystem technology the pattern maps to.
    pub ecosystem: Option<String>,
    /// Sorted names of the distinct repositories exhibiting the pattern.
    pub repositories: Vec<String>,
    /// Number of distinct contributing repositories.
    pub usage_count: usize,
    /// Reusability score, 0-100.
    pub reusability_score: u8,
    /// Why adopting it helps.
    pub benefits: Vec<String>,
    /// What to watch out for.
    pub considerations: Vec<String>,
}

/// Pattern counts per classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct KindCounts {
    /// Architectural patterns.
    pub architectural: usize,
    /// Integration patterns.
    pub integration: usize,
    /// Design patterns.
    pub design: usize,
}

impl KindCounts {
    fn record(&mut self, kind: PatternKind) {
        match kind {
            PatternKind::Architectural => self.architectural += 1,
            PatternKind::Integration => self.integration += 1,
            PatternKind::Design => self.design += 1,
        }
    }
}

/// Result of one mining run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatternLibrary {
    /// Number of repositories mined.
    pub total_repositories: usize,
    /// Retained patterns, ranked.
    pub patterns: Vec<Pattern>,
    /// Retained pattern counts per classification.
    pub by_kind: KindCounts,
    /// Mean reusability score of retained patterns, one decimal.
    pub average_reusability: f64,
    /// Repositories per first-party ecosystem technology, before thresholding.
    pub ecosystem_usage: BTreeMap<String, usize>,
    /// Repositories using at least one first-party ecosystem technology.
    pub repositories_using_ecosystem: usize,
}

impl PatternLibrary {
    /// The `n` highest-ranked patterns.
    pub fn top(&self, n: usize) -> &[Pattern] {
        &self.patterns[..n.min(self.patterns.len())]
    }

    /// Pattern by name.
    pub fn get(&self, name: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|pattern| pattern.name == name)
    }
}

/// Pattern reusability score.
///
/// Adoption (max 40) plus kind weight plus ecosystem bonus (20 or 10) plus
/// consistency (max 10); the component caps bound the sum at 100.
pub fn reusability_score(
    usage_count: usize,
    total_repositories: usize,
    kind: PatternKind,
    ecosystem_aligned: bool,
) -> u8 {
    let adoption = if total_repositories == 0 {
        0.0
    } else {
        (usage_count as f64 / total_repositories as f64 * 100.0 * 0.4).min(40.0)
    };
    let ecosystem = if ecosystem_aligned { 20.0 } else { 10.0 };
    let consistency = (usage_count.saturating_mul(2)).min(10) as f64;
    let total = adoption + f64::from(kind.quality_weight()) + ecosystem + consistency;
    total.floor() as u8
}

struct Candidate {
    observation: PatternObservation,
    /// Repository identity to display name.
    repositories: BTreeMap<String, String>,
}

/// Repositories sharing a display name stay distinct when their URLs differ.
fn repository_identity(facts: &RepositoryFacts) -> String {
    let url = facts.url.trim();
    if url.is_empty() {
        facts.display_name()
    } else {
        url.to_string()
    }
}

/// Mines recurring patterns across a corpus.
#[derive(Debug, Clone, Default)]
pub struct PatternMiner {
    config: MinerConfig,
}

impl PatternMiner {
    /// Create a miner. Thresholds below two are raised to two.
    pub fn new(mut config: MinerConfig) -> Self {
        if config.min_usage < MIN_USAGE_FLOOR {
            warn!(
                "minimum pattern usage {} is below {MIN_USAGE_FLOOR}; using {MIN_USAGE_FLOOR}",
                config.min_usage
            );
            config.min_usage = MIN_USAGE_FLOOR;
        }
        Self { config }
    }

    /// Effective settings.
    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    /// Mine a corpus. Input order does not affect the result.
    pub fn mine(&self, corpus: &[RepositoryFacts]) -> PatternLibrary {
        let mut candidates: BTreeMap<String, Candidate> = BTreeMap::new();
        let mut ecosystem_repositories: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for facts in corpus {
            let repository = facts.display_name();
            let identity = repository_identity(facts);
            let mut observations = detectors::observe_all(facts);
            if self.config.shared_dependencies {
                observations.extend(detectors::shared_dependency_observations(facts));
            }

            for observation in observations {
                debug!("{repository}: detected {}", observation.name);
                if let Some(ecosystem) = &observation.ecosystem {
                    ecosystem_repositories
                        .entry(ecosystem.clone())
                        .or_default()
                        .insert(identity.clone());
                }
                candidates
                    .entry(observation.name.clone())
                    .or_insert_with(|| Candidate {
                        observation,
                        repositories: BTreeMap::new(),
                    })
                    .repositories
                    .insert(identity.clone(), repository.clone());
            }
        }

        let total_repositories = corpus.len();
        let mut patterns = candidates
            .into_values()
            .filter(|candidate| candidate.repositories.len() >= self.config.min_usage)
            .map(|candidate| {
                let usage_count = candidate.repositories.len();
                let observation = candidate.observation;
                let mut repositories = candidate.repositories.into_values().collect::<Vec<_>>();
                repositories.sort();
                Pattern {
                    reusability_score: reusability_score(
                        usage_count,
                        total_repositories,
                        observation.kind,
                        observation.ecosystem.is_some(),
                    ),
                    name: observation.name,
                    kind: observation.kind,
                    description: observation.description,
                    ecosystem: observation.ecosystem,
                    repositories,
                    usage_count,
                    benefits: observation.benefits,
                    considerations: observation.considerations,
                }
            })
            .collect::<Vec<_>>();

        patterns.sort_by(|a, b| {
            b.reusability_score
                .cmp(&a.reusability_score)
                .then_with(|| b.usage_count.cmp(&a.usage_count))
                .then_with(|| a.name.cmp(&b.name))
        });

        let mut by_kind = KindCounts::default();
        for pattern in &patterns {
            by_kind.record(pattern.kind);
        }
        let average_reusability = if patterns.is_empty() {
            0.0
        } else {
            let sum: f64 = patterns.iter().map(|p| f64::from(p.reusability_score)).sum();
            (sum / patterns.len() as f64 * 10.0).round() / 10.0
        };
        let repositories_using_ecosystem = ecosystem_repositories
            .values()
            .flatten()
            .collect::<BTreeSet<_>>()
            .len();

        info!(
            "mined {} patterns from {total_repositories} repositories (min usage {})",
            patterns.len(),
            self.config.min_usage
        );

        PatternLibrary {
            total_repositories,
            patterns,
            by_kind,
            average_reusability,
            ecosystem_usage: ecosystem_repositories
                .into_iter()
                .map(|(ecosystem, repositories)| (ecosystem, repositories.len()))
                .collect(),
            repositories_using_ecosystem,
        }
    }
}
