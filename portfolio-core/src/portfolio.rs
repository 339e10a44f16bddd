//! Portfolio engine: per-repository assessment and corpus aggregation.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::cost::{
    CostAggregator, CostBreakdown, CostTable, DEFAULT_TOP_N, OptimizationOpportunity,
    PortfolioCost, portfolio_costs,
};
use crate::domain::{Annotation, LanguageHistogram, SkippedRepository};
use crate::facts::{OutdatedDependencies, RepositoryFacts};
use crate::maturity::{CapStrategy, MaturityLevel, ToolingMaturity, ToolingMaturityScorer};
use crate::patterns::{MinerConfig, Pattern, PatternLibrary, PatternMiner};
use crate::reusability::{Reusability, classify_facts};
use crate::viability::{DependencyHealthRule, ViabilityRating, ViabilityScore, ViabilityScorer};

/// Pattern score at or above which a pattern is recommended for standardisation.
pub const HIGH_VALUE_PATTERN_SCORE: u8 = 80;
const OUTDATED_ATTENTION_RATIO: f64 = 0.2;

/// One element of a corpus as handed over by the collaborator layer.
#[derive(Debug, Clone, PartialEq)]
pub enum CorpusEntry {
    /// Facts were produced.
    Available(RepositoryFacts),
    /// Facts could not be produced; the repository is skipped.
    Unavailable {
        /// Repository identifier.
        repository: String,
        /// Failure reason.
        reason: String,
    },
}

impl From<RepositoryFacts> for CorpusEntry {
    fn from(facts: RepositoryFacts) -> Self {
        Self::Available(facts)
    }
}

/// Engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Dependency-health rule for viability scoring.
    pub dependency_health: DependencyHealthRule,
    /// Capping strategy for tooling maturity.
    pub cap_strategy: CapStrategy,
    /// Pattern miner settings.
    pub miner: MinerConfig,
    /// Length of the cost top lists.
    pub top_n: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dependency_health: DependencyHealthRule::default(),
            cap_strategy: CapStrategy::default(),
            miner: MinerConfig::default(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Everything derived for a single repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RepositoryAssessment {
    /// Repository name.
    pub name: String,
    /// Repository URL.
    pub url: String,
    /// Primary language.
    pub language: Option<String>,
    /// Whether the repository is a fork.
    pub is_fork: bool,
    /// Whether the repository is active.
    pub is_active: bool,
    /// Whether a test suite is present.
    pub has_tests: bool,
    /// Viability score.
    pub viability: ViabilityScore,
    /// Tooling maturity.
    pub maturity: ToolingMaturity,
    /// Template suitability.
    pub reusability: Reusability,
    /// Dependency costs.
    pub costs: CostBreakdown,
    /// Highly reusable, documented, tested, not a fork, and at least intermediate tooling.
    pub is_template_candidate: bool,
    /// Active but low viability, untested, or with many outdated dependencies.
    pub needs_attention: bool,
    /// Facts that were missing and substituted.
    pub annotations: Vec<Annotation>,
}

/// Viability rating counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ViabilityTiers {
    /// High-rated repositories.
    pub high: usize,
    /// Medium-rated repositories.
    pub medium: usize,
    /// Low-rated repositories.
    pub low: usize,
}

/// Reusability class counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReusabilityTiers {
    /// Highly reusable repositories.
    pub highly_reusable: usize,
    /// Partially reusable repositories.
    pub partially_reusable: usize,
    /// One-off repositories.
    pub one_off: usize,
}

/// Tooling maturity level counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MaturityTiers {
    /// No tooling.
    pub none: usize,
    /// Basic tooling.
    pub basic: usize,
    /// Intermediate tooling.
    pub intermediate: usize,
    /// Advanced tooling.
    pub advanced: usize,
    /// Expert tooling.
    pub expert: usize,
}

/// An actionable portfolio-level recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Recommendation {
    /// One-line summary.
    pub summary: String,
    /// Repositories or patterns the recommendation names.
    pub subjects: Vec<String>,
}

impl Recommendation {
    fn new(summary: impl Into<String>, subjects: Vec<String>) -> Self {
        Self {
            summary: summary.into(),
            subjects,
        }
    }
}

/// Aggregated result of one portfolio run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PortfolioReport {
    /// Repositories that were scored.
    pub repositories_analyzed: usize,
    /// Repositories left out because their facts were unavailable.
    pub skipped: Vec<SkippedRepository>,
    /// Mean viability total, one decimal.
    pub average_viability: f64,
    /// Viability rating counts.
    pub viability_tiers: ViabilityTiers,
    /// Reusability class counts.
    pub reusability_tiers: ReusabilityTiers,
    /// Tooling maturity level counts.
    pub maturity_tiers: MaturityTiers,
    /// Primary language histogram.
    #[schema(value_type = Object)]
    pub languages: LanguageHistogram,
    /// Cost aggregates.
    pub costs: PortfolioCost,
    /// Substitution opportunities, ranked by annual savings.
    pub opportunities: Vec<OptimizationOpportunity>,
    /// Highest-ranked patterns.
    pub top_patterns: Vec<Pattern>,
    /// Full pattern mining result.
    pub pattern_library: PatternLibrary,
    /// Template candidate repository names.
    pub template_candidates: Vec<String>,
    /// Repository names needing attention.
    pub needs_attention: Vec<String>,
    /// Actionable recommendations.
    pub recommendations: Vec<Recommendation>,
    /// Per-repository assessments in canonical order.
    pub assessments: Vec<RepositoryAssessment>,
}

/// Runs every scorer over a corpus and aggregates the results.
#[derive(Debug, Clone)]
pub struct PortfolioAnalyzer {
    viability: ViabilityScorer,
    maturity: ToolingMaturityScorer,
    costs: CostAggregator,
    miner: PatternMiner,
    config: EngineConfig,
}

impl PortfolioAnalyzer {
    /// Create an analyzer over an already validated cost table.
    pub fn new(cost_table: CostTable, config: EngineConfig) -> Self {
        let miner = PatternMiner::new(config.miner);
        Self {
            viability: ViabilityScorer::new(config.dependency_health),
            maturity: ToolingMaturityScorer::new(config.cap_strategy),
            costs: CostAggregator::new(cost_table),
            config: EngineConfig {
                miner: *miner.config(),
                ..config
            },
            miner,
        }
    }

    /// Effective settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Cost aggregator in use.
    pub fn cost_aggregator(&self) -> &CostAggregator {
        &self.costs
    }

    /// Pattern miner in use.
    pub fn miner(&self) -> &PatternMiner {
        &self.miner
    }

    /// Assess a single repository.
    pub fn assess(&self, facts: &RepositoryFacts) -> RepositoryAssessment {
        let (viability, annotations) = self.viability.score_with_annotations(facts);
        let maturity = self.maturity.score(&facts.tooling);
        let reusability = classify_facts(viability.total, facts);
        let is_active = facts.is_active();

        let is_template_candidate = reusability == Reusability::HighlyReusable
            && !facts.is_fork
            && facts.has_docs()
            && facts.has_tests
            && maturity.level >= MaturityLevel::Intermediate;
        let needs_attention = is_active
            && (viability.total < 50 || !facts.has_tests || outdated_ratio_exceeded(facts));

        RepositoryAssessment {
            name: facts.display_name(),
            url: facts.url.clone(),
            language: facts.language.clone(),
            is_fork: facts.is_fork,
            is_active,
            has_tests: facts.has_tests,
            viability,
            maturity,
            reusability,
            costs: self.costs.aggregate(&facts.dependencies),
            is_template_candidate,
            needs_attention,
            annotations,
        }
    }

    /// Analyze a corpus. Unavailable entries are skipped, never fatal.
    ///
    /// The report does not depend on the order of `entries`.
    pub fn analyze<I>(&self, entries: I) -> PortfolioReport
    where
        I: IntoIterator<Item = CorpusEntry>,
    {
        let mut corpus = Vec::new();
        let mut skipped = Vec::new();
        for entry in entries {
            match entry {
                CorpusEntry::Available(facts) => corpus.push(facts),
                CorpusEntry::Unavailable { repository, reason } => {
                    warn!("skipping {repository}: {reason}");
                    skipped.push(SkippedRepository { repository, reason });
                }
            }
        }
        skipped.sort_by(|a, b| {
            a.repository
                .cmp(&b.repository)
                .then_with(|| a.reason.cmp(&b.reason))
        });
        corpus.sort_by(|a, b| {
            a.display_name()
                .cmp(&b.display_name())
                .then_with(|| a.url.cmp(&b.url))
        });

        let assessments = corpus.iter().map(|facts| self.assess(facts)).collect::<Vec<_>>();
        let pattern_library = self.miner.mine(&corpus);
        let top_patterns = pattern_library.top(self.config.miner.top_n).to_vec();
        let opportunities = self.costs.find_optimizations(&corpus);
        let costs = portfolio_costs(
            assessments
                .iter()
                .map(|assessment| (assessment.name.as_str(), &assessment.costs)),
            self.config.top_n,
        );

        let mut viability_tiers = ViabilityTiers::default();
        let mut reusability_tiers = ReusabilityTiers::default();
        let mut maturity_tiers = MaturityTiers::default();
        let mut languages = LanguageHistogram::new();
        for assessment in &assessments {
            match assessment.viability.rating {
                ViabilityRating::High => viability_tiers.high += 1,
                ViabilityRating::Medium => viability_tiers.medium += 1,
                ViabilityRating::Low => viability_tiers.low += 1,
            }
            match assessment.reusability {
                Reusability::HighlyReusable => reusability_tiers.highly_reusable += 1,
                Reusability::PartiallyReusable => reusability_tiers.partially_reusable += 1,
                Reusability::OneOff => reusability_tiers.one_off += 1,
            }
            match assessment.maturity.level {
                MaturityLevel::None => maturity_tiers.none += 1,
                MaturityLevel::Basic => maturity_tiers.basic += 1,
                MaturityLevel::Intermediate => maturity_tiers.intermediate += 1,
                MaturityLevel::Advanced => maturity_tiers.advanced += 1,
                MaturityLevel::Expert => maturity_tiers.expert += 1,
            }
            let language = assessment
                .language
                .clone()
                .unwrap_or_else(|| "Unknown".to_string());
            *languages.entry(language).or_insert(0) += 1;
        }

        let average_viability = if assessments.is_empty() {
            0.0
        } else {
            let sum: f64 = assessments
                .iter()
                .map(|assessment| f64::from(assessment.viability.total))
                .sum();
            (sum / assessments.len() as f64 * 10.0).round() / 10.0
        };

        let recommendations = recommend(&assessments, &pattern_library);
        info!(
            "analyzed {} repositories ({} skipped), {} patterns, ${:.2}/month",
            assessments.len(),
            skipped.len(),
            pattern_library.patterns.len(),
            costs.total_monthly
        );

        PortfolioReport {
            repositories_analyzed: assessments.len(),
            skipped,
            average_viability,
            viability_tiers,
            reusability_tiers,
            maturity_tiers,
            languages,
            costs,
            opportunities,
            top_patterns,
            template_candidates: names_where(&assessments, |a| a.is_template_candidate),
            needs_attention: names_where(&assessments, |a| a.needs_attention),
            pattern_library,
            recommendations,
            assessments,
        }
    }
}

impl Default for PortfolioAnalyzer {
    fn default() -> Self {
        Self::new(CostTable::builtin(), EngineConfig::default())
    }
}

fn outdated_ratio_exceeded(facts: &RepositoryFacts) -> bool {
    let total = facts.dependency_count();
    match facts.outdated_dependencies {
        OutdatedDependencies::Counted(outdated) if outdated > 0 && total > 0 => {
            outdated as f64 / total as f64 > OUTDATED_ATTENTION_RATIO
        }
        _ => false,
    }
}

fn names_where<P>(assessments: &[RepositoryAssessment], predicate: P) -> Vec<String>
where
    P: Fn(&RepositoryAssessment) -> bool,
{
    assessments
        .iter()
        .filter(|assessment| predicate(assessment))
        .map(|assessment| assessment.name.clone())
        .collect()
}

fn recommend(assessments: &[RepositoryAssessment], library: &PatternLibrary) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    let low = names_where(assessments, |a| a.viability.rating == ViabilityRating::Low);
    if !low.is_empty() {
        recommendations.push(Recommendation::new(
            format!(
                "Address {} low-viability repositories: focus on testing and documentation",
                low.len()
            ),
            low,
        ));
    }

    let no_tooling = names_where(assessments, |a| a.maturity.level == MaturityLevel::None);
    if !no_tooling.is_empty() {
        recommendations.push(Recommendation::new(
            format!(
                "Establish automation tooling in {} repositories",
                no_tooling.len()
            ),
            no_tooling,
        ));
    }

    let no_tests = names_where(assessments, |a| !a.has_tests);
    if !no_tests.is_empty() {
        recommendations.push(Recommendation::new(
            format!("Implement testing frameworks in {} repositories", no_tests.len()),
            no_tests,
        ));
    }

    let inactive = names_where(assessments, |a| !a.is_active);
    if !inactive.is_empty() {
        recommendations.push(Recommendation::new(
            format!(
                "Review {} inactive repositories for archival consideration",
                inactive.len()
            ),
            inactive,
        ));
    }

    let high_value = library
        .patterns
        .iter()
        .filter(|pattern| pattern.reusability_score >= HIGH_VALUE_PATTERN_SCORE)
        .map(|pattern| pattern.name.clone())
        .collect::<Vec<_>>();
    if !high_value.is_empty() {
        recommendations.push(Recommendation::new(
            format!(
                "Standardize {} high-value patterns across the portfolio",
                high_value.len()
            ),
            high_value,
        ));
    }

    if recommendations.is_empty() {
        recommendations.push(Recommendation::new(
            "Portfolio demonstrates strong health across all metrics",
            Vec::new(),
        ));
    }
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{CommitActivity, CommitWindow, Dependency, TestCoverage, ToolingFacts};

    fn healthy(name: &str) -> RepositoryFacts {
        let mut facts = RepositoryFacts::named(name);
        facts.url = format!("https://example.com/org/{name}");
        facts.language = Some("Python".to_string());
        facts.has_tests = true;
        facts.has_readme = true;
        facts.test_coverage = TestCoverage::Measured(80.0);
        facts.commit_activity = CommitActivity::Observed(CommitWindow {
            commits_30d: 4,
            commits_90d: 10,
            unique_authors: 2,
        });
        facts.tooling = ToolingFacts {
            has_config_dir: true,
            agent_count: 2,
            command_count: 2,
            integration_server_count: 0,
            has_memory_file: true,
        };
        facts
    }

    #[test]
    fn healthy_repository_is_template_candidate() {
        let assessment = PortfolioAnalyzer::default().assess(&healthy("svc"));
        assert_eq!(assessment.viability.total, 100);
        assert_eq!(assessment.reusability, Reusability::HighlyReusable);
        assert_eq!(assessment.maturity.level, MaturityLevel::Intermediate);
        assert!(assessment.is_template_candidate);
        assert!(!assessment.needs_attention);
    }

    #[test]
    fn basic_tooling_blocks_template_candidacy() {
        let mut facts = healthy("svc");
        facts.tooling = ToolingFacts {
            has_memory_file: true,
            ..ToolingFacts::default()
        };
        let assessment = PortfolioAnalyzer::default().assess(&facts);
        assert_eq!(assessment.reusability, Reusability::HighlyReusable);
        assert!(!assessment.is_template_candidate);
    }

    #[test]
    fn outdated_dependencies_flag_active_repositories() {
        let mut facts = healthy("svc");
        facts.dependencies = (0..4).map(|i| Dependency::new(format!("d{i}"), "pip")).collect();
        facts.outdated_dependencies = OutdatedDependencies::Counted(1);
        assert!(PortfolioAnalyzer::default().assess(&facts).needs_attention);

        facts.outdated_dependencies = OutdatedDependencies::Counted(0);
        assert!(!PortfolioAnalyzer::default().assess(&facts).needs_attention);
    }

    #[test]
    fn inactive_repositories_never_need_attention() {
        let mut facts = healthy("svc");
        facts.has_tests = false;
        facts.commit_activity = CommitActivity::Observed(CommitWindow::default());
        let assessment = PortfolioAnalyzer::default().assess(&facts);
        assert!(!assessment.is_active);
        assert!(!assessment.needs_attention);
    }

    #[test]
    fn unavailable_entries_are_skipped_from_aggregates() {
        let mut paid = healthy("paid");
        paid.dependencies = vec![Dependency::new("sendgrid", "npm")];
        let report = PortfolioAnalyzer::default().analyze(vec![
            CorpusEntry::Unavailable {
                repository: "ghost".to_string(),
                reason: "rate limited".to_string(),
            },
            CorpusEntry::Available(paid),
        ]);
        assert_eq!(report.repositories_analyzed, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].repository, "ghost");
        assert_eq!(report.costs.total_monthly, 15.0);
        assert_eq!(report.languages.get("Python"), Some(&1));
        assert_eq!(report.opportunities.len(), 1);
    }

    #[test]
    fn report_is_independent_of_input_order() {
        let mut a = healthy("alpha");
        a.dependencies = vec![Dependency::new("sentry", "npm")];
        let mut b = RepositoryFacts::named("beta");
        b.dependencies = vec![Dependency::new("datadog", "npm")];
        let mut c = healthy("gamma");
        c.dependencies = vec![Dependency::new("sentry", "npm")];

        let analyzer = PortfolioAnalyzer::default();
        let forward = analyzer.analyze(
            [a.clone(), b.clone(), c.clone()]
                .into_iter()
                .map(CorpusEntry::from),
        );
        let backward = analyzer.analyze([c, b, a].into_iter().map(CorpusEntry::from));
        assert_eq!(forward, backward);
        assert_eq!(forward.assessments[0].name, "alpha");
    }

    #[test]
    fn recommendations_cover_gaps_and_fall_back_to_healthy() {
        let analyzer = PortfolioAnalyzer::default();
        let gaps = analyzer.analyze(vec![CorpusEntry::from(RepositoryFacts::named("bare"))]);
        let summaries = gaps
            .recommendations
            .iter()
            .map(|r| r.summary.as_str())
            .collect::<Vec<_>>();
        assert!(summaries[0].starts_with("Address 1 low-viability"));
        assert!(summaries.iter().any(|s| s.starts_with("Establish automation tooling")));
        assert!(summaries.iter().any(|s| s.starts_with("Implement testing")));
        assert!(summaries.iter().any(|s| s.starts_with("Review 1 inactive")));

        let healthy_report = analyzer.analyze(vec![CorpusEntry::from(healthy("svc"))]);
        assert_eq!(healthy_report.recommendations.len(), 1);
        assert_eq!(
            healthy_report.recommendations[0].summary,
            "Portfolio demonstrates strong health across all metrics"
        );
        assert_eq!(healthy_report.template_candidates, vec!["svc".to_string()]);
    }

    #[test]
    fn miner_threshold_is_reported_after_clamping() {
        let analyzer = PortfolioAnalyzer::new(
            CostTable::builtin(),
            EngineConfig {
                miner: MinerConfig {
                    min_usage: 0,
                    ..MinerConfig::default()
                },
                ..EngineConfig::default()
            },
        );
        assert_eq!(analyzer.config().miner.min_usage, 2);
    }
}
