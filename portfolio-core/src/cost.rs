//! Dependency cost estimation and optimization discovery.
//!
//! Costs come from an explicitly constructed [`CostTable`]: either the
//! built-in reference table or a JSON document of the form
//!
//! ```json
//! {
//!   "costs": [{"name": "sendgrid", "monthly_cost": 15.0}],
//!   "alternatives": [{
//!     "dependency": "sendgrid",
//!     "alternative": "Azure Communication Services",
//!     "monthly_cost": 0.0,
//!     "trade_offs": ["Migration effort required"]
//!   }]
//! }
//! ```

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{PortfolioError, Result};
use crate::facts::{Dependency, RepositoryFacts};
use crate::fs::FileSystem;

/// Number of entries kept in per-repository and portfolio top lists.
pub const DEFAULT_TOP_N: usize = 5;

const BUILTIN_COSTS: [(&str, f64); 10] = [
    ("azure-functions", 5.0),
    ("azure-storage", 2.0),
    ("azure-keyvault", 0.03),
    ("@azure/functions", 5.0),
    ("stripe", 0.0),
    ("sendgrid", 15.0),
    ("twilio", 20.0),
    ("datadog", 15.0),
    ("sentry", 26.0),
    ("auth0", 23.0),
];

const BUILTIN_ALTERNATIVES: [(&str, &str, f64); 4] = [
    ("auth0", "Azure Active Directory B2C", 0.0),
    ("sendgrid", "Azure Communication Services", 0.0),
    ("datadog", "Azure Monitor + Application Insights", 5.0),
    ("sentry", "Azure Application Insights", 2.33),
];

const DEFAULT_TRADE_OFFS: [&str; 3] = [
    "Migration effort required",
    "Team learning curve",
    "Feature parity assessment needed",
];

/// A known monthly cost for a dependency key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRate {
    /// Lower-cased lookup key.
    pub name: String,
    /// Estimated monthly cost in dollars.
    pub monthly_cost: f64,
}

/// A first-party alternative for a third-party dependency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    /// Lower-cased dependency name the alternative replaces.
    pub dependency: String,
    /// Name of the alternative service.
    pub alternative: String,
    /// Estimated monthly cost of the alternative.
    pub monthly_cost: f64,
    /// Known costs of switching.
    #[serde(default)]
    pub trade_offs: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CostTableDocument {
    #[serde(default)]
    costs: Vec<CostRate>,
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

/// Ordered cost and alternative reference tables.
///
/// Entry order is significant: the first substring match wins during lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct CostTable {
    costs: Vec<CostRate>,
    alternatives: Vec<Alternative>,
}

impl CostTable {
    /// Build a validated table from explicit entries.
    pub fn new(costs: Vec<CostRate>, alternatives: Vec<Alternative>) -> Result<Self> {
        let costs = costs
            .into_iter()
            .map(|rate| CostRate {
                name: rate.name.trim().to_lowercase(),
                monthly_cost: rate.monthly_cost,
            })
            .collect::<Vec<_>>();
        let alternatives = alternatives
            .into_iter()
            .map(|alternative| Alternative {
                dependency: alternative.dependency.trim().to_lowercase(),
                ..alternative
            })
            .collect::<Vec<_>>();

        let mut seen = BTreeSet::new();
        for rate in &costs {
            validate_entry("cost", &rate.name, rate.monthly_cost)?;
            if !seen.insert(rate.name.as_str()) {
                return Err(PortfolioError::configuration(format!(
                    "duplicate cost entry `{}`",
                    rate.name
                )));
            }
        }

        let mut seen = BTreeSet::new();
        for alternative in &alternatives {
            validate_entry("alternative", &alternative.dependency, alternative.monthly_cost)?;
            if alternative.alternative.trim().is_empty() {
                return Err(PortfolioError::configuration(format!(
                    "alternative for `{}` has no name",
                    alternative.dependency
                )));
            }
            if !seen.insert(alternative.dependency.as_str()) {
                return Err(PortfolioError::configuration(format!(
                    "duplicate alternative entry `{}`",
                    alternative.dependency
                )));
            }
        }

        Ok(Self {
            costs,
            alternatives,
        })
    }

    /// The built-in reference tables.
    pub fn builtin() -> Self {
        Self {
            costs: BUILTIN_COSTS
                .iter()
                .map(|(name, monthly_cost)| CostRate {
                    name: (*name).to_string(),
                    monthly_cost: *monthly_cost,
                })
                .collect(),
            alternatives: BUILTIN_ALTERNATIVES
                .iter()
                .map(|(dependency, alternative, monthly_cost)| Alternative {
                    dependency: (*dependency).to_string(),
                    alternative: (*alternative).to_string(),
                    monthly_cost: *monthly_cost,
                    trade_offs: DEFAULT_TRADE_OFFS.iter().map(|s| s.to_string()).collect(),
                })
                .collect(),
        }
    }

    /// Parse and validate a JSON table document.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let document: CostTableDocument = serde_json::from_str(input)
            .map_err(|err| PortfolioError::configuration(format!("invalid cost table: {err}")))?;
        Self::new(document.costs, document.alternatives)
    }

    /// Load a JSON table document from disk.
    pub fn load<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<Self> {
        if !fs.is_file(path) {
            return Err(PortfolioError::configuration(format!(
                "cost table {} not found",
                path.display()
            )));
        }
        let contents = fs.read_to_string(path).map_err(|err| {
            PortfolioError::configuration(format!("cost table {}: {err}", path.display()))
        })?;
        Self::from_json_str(&contents)
    }

    /// Known-cost entries in lookup order.
    pub fn costs(&self) -> &[CostRate] {
        &self.costs
    }

    /// Alternative entries.
    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }
}

impl Default for CostTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate_entry(kind: &str, name: &str, cost: f64) -> Result<()> {
    if name.is_empty() {
        return Err(PortfolioError::configuration(format!(
            "{kind} entry with empty name"
        )));
    }
    if !cost.is_finite() || cost < 0.0 {
        return Err(PortfolioError::configuration(format!(
            "{kind} entry `{name}` has invalid monthly cost {cost}"
        )));
    }
    Ok(())
}

/// A suggested first-party replacement attached to a costed dependency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Substitution {
    /// Alternative service name.
    pub alternative: String,
    /// Monthly cost of the alternative.
    pub alternative_cost: f64,
    /// Current cost minus alternative cost. Negative when the alternative costs more.
    pub monthly_savings: f64,
}

/// A dependency with a known cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CostEntry {
    /// Dependency name as declared.
    pub name: String,
    /// Declared version, if any.
    pub version: Option<String>,
    /// Declaring package manager.
    pub manager: String,
    /// Estimated monthly cost.
    pub monthly_cost: f64,
    /// First-party substitution, if one is known.
    pub substitution: Option<Substitution>,
}

/// Per-repository cost summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CostBreakdown {
    /// Sum of monthly costs.
    pub monthly_total: f64,
    /// Monthly total times twelve.
    pub annual_total: f64,
    /// Dependencies matched in the cost table, in declaration order.
    pub costed: Vec<CostEntry>,
    /// Dependency names with no table match.
    pub unknown: Vec<String>,
    /// Most expensive paid dependencies, descending.
    pub top_expensive: Vec<CostEntry>,
}

/// A suggested lower-cost substitute for a paid dependency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OptimizationOpportunity {
    /// Repository declaring the dependency.
    pub repository: String,
    /// Dependency currently in use.
    pub current_tool: String,
    /// Suggested alternative.
    pub alternative_tool: String,
    /// Current monthly cost.
    pub current_monthly_cost: f64,
    /// Alternative monthly cost.
    pub alternative_monthly_cost: f64,
    /// Signed monthly savings.
    pub monthly_savings: f64,
    /// Signed annual savings.
    pub annual_savings: f64,
    /// Free-text recommendation.
    pub recommendation: String,
    /// Known costs of switching.
    pub trade_offs: Vec<String>,
}

/// Monthly cost of one repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RepositoryCost {
    /// Repository name.
    pub repository: String,
    /// Monthly cost.
    pub monthly_cost: f64,
}

/// Monthly cost of one dependency across the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DependencyCost {
    /// Lower-cased dependency name.
    pub name: String,
    /// Summed monthly cost.
    pub monthly_cost: f64,
    /// Number of repositories paying for it.
    pub repositories: usize,
}

/// Portfolio-wide cost aggregates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PortfolioCost {
    /// Sum of per-repository monthly costs.
    pub total_monthly: f64,
    /// Monthly total times twelve.
    pub total_annual: f64,
    /// Repositories with a nonzero monthly cost.
    pub repositories_with_costs: usize,
    /// Total monthly cost divided by costed repositories, or zero.
    pub average_per_costed_repository: f64,
    /// Most expensive repositories, descending.
    pub top_repositories: Vec<RepositoryCost>,
    /// Most expensive dependencies, descending.
    pub top_dependencies: Vec<DependencyCost>,
}

/// Looks up dependency costs against an injected [`CostTable`].
#[derive(Debug, Clone, Default)]
pub struct CostAggregator {
    table: CostTable,
}

impl CostAggregator {
    /// Create an aggregator over a table.
    pub fn new(table: CostTable) -> Self {
        Self { table }
    }

    /// Reference table in use.
    pub fn table(&self) -> &CostTable {
        &self.table
    }

    /// Table entry for a dependency: exact case-insensitive match first,
    /// then the first entry where either name contains the other.
    pub fn lookup(&self, dependency: &str) -> Option<&CostRate> {
        let needle = dependency.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.table
            .costs
            .iter()
            .find(|rate| rate.name == needle)
            .or_else(|| {
                self.table
                    .costs
                    .iter()
                    .find(|rate| needle.contains(&rate.name) || rate.name.contains(&needle))
            })
    }

    /// Monthly cost for a dependency; zero when unknown.
    pub fn cost_for(&self, dependency: &str) -> f64 {
        match self.lookup(dependency) {
            Some(rate) => rate.monthly_cost,
            None => {
                debug!("no cost entry for dependency `{dependency}`");
                0.0
            }
        }
    }

    /// Alternative for a dependency, by exact lower-cased name.
    pub fn alternative_for(&self, dependency: &str) -> Option<&Alternative> {
        let needle = dependency.trim().to_lowercase();
        self.table
            .alternatives
            .iter()
            .find(|alternative| alternative.dependency == needle)
    }

    /// Cost summary for one repository's dependencies.
    pub fn aggregate(&self, dependencies: &[Dependency]) -> CostBreakdown {
        let mut breakdown = CostBreakdown::default();

        for dependency in dependencies {
            let Some(rate) = self.lookup(&dependency.name) else {
                debug!("no cost entry for dependency `{}`", dependency.name);
                breakdown.unknown.push(dependency.name.clone());
                continue;
            };
            let substitution = self.alternative_for(&dependency.name).map(|alternative| Substitution {
                alternative: alternative.alternative.clone(),
                alternative_cost: alternative.monthly_cost,
                monthly_savings: rate.monthly_cost - alternative.monthly_cost,
            });
            breakdown.monthly_total += rate.monthly_cost;
            breakdown.costed.push(CostEntry {
                name: dependency.name.clone(),
                version: dependency.version.clone(),
                manager: dependency.manager.clone(),
                monthly_cost: rate.monthly_cost,
                substitution,
            });
        }

        breakdown.annual_total = breakdown.monthly_total * 12.0;
        let mut paid = breakdown
            .costed
            .iter()
            .filter(|entry| entry.monthly_cost > 0.0)
            .cloned()
            .collect::<Vec<_>>();
        paid.sort_by(|a, b| b.monthly_cost.total_cmp(&a.monthly_cost));
        paid.truncate(DEFAULT_TOP_N);
        breakdown.top_expensive = paid;
        breakdown
    }

    /// Substitution opportunities across a corpus, ranked by annual savings.
    ///
    /// Negative savings are kept. Each dependency is reported once per repository.
    pub fn find_optimizations(&self, corpus: &[RepositoryFacts]) -> Vec<OptimizationOpportunity> {
        let mut opportunities = Vec::new();

        for facts in corpus {
            let repository = facts.display_name();
            let mut seen = BTreeSet::new();
            for dependency in &facts.dependencies {
                let Some(alternative) = self.alternative_for(&dependency.name) else {
                    continue;
                };
                if !seen.insert(alternative.dependency.clone()) {
                    continue;
                }
                let current = self.cost_for(&dependency.name);
                let monthly_savings = current - alternative.monthly_cost;
                opportunities.push(OptimizationOpportunity {
                    repository: repository.clone(),
                    current_tool: dependency.name.clone(),
                    alternative_tool: alternative.alternative.clone(),
                    current_monthly_cost: current,
                    alternative_monthly_cost: alternative.monthly_cost,
                    monthly_savings,
                    annual_savings: monthly_savings * 12.0,
                    recommendation: format!(
                        "Consider migrating from {} to {} for better Azure ecosystem integration",
                        dependency.name, alternative.alternative
                    ),
                    trade_offs: alternative.trade_offs.clone(),
                });
            }
        }

        opportunities.sort_by(|a, b| b.annual_savings.total_cmp(&a.annual_savings));
        opportunities
    }
}

/// Portfolio cost aggregates over `(repository, breakdown)` pairs.
///
/// Ties in the top lists keep input order.
pub fn portfolio_costs<'a, I>(repositories: I, top_n: usize) -> PortfolioCost
where
    I: IntoIterator<Item = (&'a str, &'a CostBreakdown)>,
{
    let mut summary = PortfolioCost::default();
    let mut by_repository = Vec::new();
    let mut by_dependency: Vec<DependencyCost> = Vec::new();
    let mut dependency_index: HashMap<String, usize> = HashMap::new();

    for (repository, breakdown) in repositories {
        summary.total_monthly += breakdown.monthly_total;
        if breakdown.monthly_total > 0.0 {
            summary.repositories_with_costs += 1;
            by_repository.push(RepositoryCost {
                repository: repository.to_string(),
                monthly_cost: breakdown.monthly_total,
            });
        }

        let mut counted = BTreeSet::new();
        for entry in breakdown.costed.iter().filter(|entry| entry.monthly_cost > 0.0) {
            let key = entry.name.trim().to_lowercase();
            let index = *dependency_index.entry(key.clone()).or_insert_with(|| {
                by_dependency.push(DependencyCost {
                    name: key.clone(),
                    monthly_cost: 0.0,
                    repositories: 0,
                });
                by_dependency.len() - 1
            });
            let slot = &mut by_dependency[index];
            slot.monthly_cost += entry.monthly_cost;
            if counted.insert(key) {
                slot.repositories += 1;
            }
        }
    }

    summary.total_annual = summary.total_monthly * 12.0;
    if summary.repositories_with_costs > 0 {
        summary.average_per_costed_repository =
            summary.total_monthly / summary.repositories_with_costs as f64;
    }

    by_repository.sort_by(|a, b| b.monthly_cost.total_cmp(&a.monthly_cost));
    by_repository.truncate(top_n);
    by_dependency.sort_by(|a, b| b.monthly_cost.total_cmp(&a.monthly_cost));
    by_dependency.truncate(top_n);
    summary.top_repositories = by_repository;
    summary.top_dependencies = by_dependency;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use std::path::PathBuf;

    fn deps(names: &[&str]) -> Vec<Dependency> {
        names.iter().map(|name| Dependency::new(*name, "npm")).collect()
    }

    fn approx(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn exact_lookup_is_case_insensitive() {
        let aggregator = CostAggregator::default();
        assert!(approx(aggregator.cost_for("SendGrid"), 15.0));
        assert!(approx(aggregator.cost_for("@azure/functions"), 5.0));
    }

    #[test]
    fn substring_lookup_matches_either_direction() {
        let aggregator = CostAggregator::default();
        assert!(approx(aggregator.cost_for("@sentry/node"), 26.0));
        assert!(approx(aggregator.cost_for("twil"), 20.0));
    }

    #[test]
    fn substring_lookup_prefers_table_order() {
        let table = CostTable::new(
            vec![
                CostRate {
                    name: "alpha".to_string(),
                    monthly_cost: 1.0,
                },
                CostRate {
                    name: "beta".to_string(),
                    monthly_cost: 2.0,
                },
            ],
            Vec::new(),
        )
        .expect("table");
        let aggregator = CostAggregator::new(table);
        assert!(approx(aggregator.cost_for("beta-alpha-client"), 1.0));
        assert!(approx(aggregator.cost_for("beta"), 2.0));
    }

    #[test]
    fn unknown_and_empty_names_are_free() {
        let aggregator = CostAggregator::default();
        assert_eq!(aggregator.cost_for("left-pad"), 0.0);
        assert_eq!(aggregator.cost_for(""), 0.0);
        assert_eq!(aggregator.cost_for("   "), 0.0);
    }

    #[test]
    fn cost_lookup_is_idempotent() {
        let aggregator = CostAggregator::default();
        let first = aggregator.cost_for("datadog-agent");
        let second = aggregator.cost_for("datadog-agent");
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn aggregate_sums_and_ranks() {
        let aggregator = CostAggregator::default();
        let breakdown = aggregator.aggregate(&deps(&["react", "sentry", "stripe", "twilio"]));

        assert!(approx(breakdown.monthly_total, 46.0));
        assert!(approx(breakdown.annual_total, 552.0));
        assert_eq!(breakdown.unknown, vec!["react".to_string()]);
        assert_eq!(breakdown.costed.len(), 3);
        let top = breakdown
            .top_expensive
            .iter()
            .map(|entry| entry.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(top, vec!["sentry", "twilio"]);

        let sentry = &breakdown.costed[0];
        let substitution = sentry.substitution.as_ref().expect("substitution");
        assert_eq!(substitution.alternative, "Azure Application Insights");
        assert!(approx(substitution.monthly_savings, 23.67));
    }

    #[test]
    fn optimizations_keep_negative_savings_and_rank() {
        let table = CostTable::new(
            vec![
                CostRate {
                    name: "cheap".to_string(),
                    monthly_cost: 1.0,
                },
                CostRate {
                    name: "pricey".to_string(),
                    monthly_cost: 50.0,
                },
            ],
            vec![
                Alternative {
                    dependency: "cheap".to_string(),
                    alternative: "Costly Native".to_string(),
                    monthly_cost: 4.0,
                    trade_offs: Vec::new(),
                },
                Alternative {
                    dependency: "Pricey".to_string(),
                    alternative: "Free Native".to_string(),
                    monthly_cost: 0.0,
                    trade_offs: vec!["Migration effort required".to_string()],
                },
            ],
        )
        .expect("table");
        let aggregator = CostAggregator::new(table);

        let mut first = RepositoryFacts::named("first");
        first.dependencies = deps(&["cheap", "pricey", "PRICEY"]);
        let mut second = RepositoryFacts::named("second");
        second.dependencies = deps(&["cheap"]);

        let opportunities = aggregator.find_optimizations(&[first, second]);
        assert_eq!(opportunities.len(), 3);
        assert_eq!(opportunities[0].current_tool, "pricey");
        assert!(approx(opportunities[0].annual_savings, 600.0));
        assert_eq!(opportunities[1].repository, "first");
        assert!(approx(opportunities[1].monthly_savings, -3.0));
        assert_eq!(opportunities[2].repository, "second");
        assert!(
            opportunities[0]
                .recommendation
                .contains("Consider migrating from pricey to Free Native")
        );
    }

    #[test]
    fn builtin_table_offers_four_alternatives() {
        let aggregator = CostAggregator::default();
        let mut facts = RepositoryFacts::named("svc");
        facts.dependencies = deps(&["auth0", "sendgrid", "datadog", "sentry", "stripe"]);
        let opportunities = aggregator.find_optimizations(&[facts]);
        let tools = opportunities
            .iter()
            .map(|o| o.current_tool.as_str())
            .collect::<Vec<_>>();
        assert_eq!(tools, vec!["sentry", "auth0", "sendgrid", "datadog"]);
        assert_eq!(opportunities[0].trade_offs.len(), 3);
    }

    #[test]
    fn json_table_is_validated() {
        let table = CostTable::from_json_str(
            r#"{"costs": [{"name": "Acme", "monthly_cost": 3.5}],
                "alternatives": [{"dependency": "acme", "alternative": "Native", "monthly_cost": 1.0}]}"#,
        )
        .expect("valid table");
        assert_eq!(table.costs()[0].name, "acme");
        assert!(table.alternatives()[0].trade_offs.is_empty());

        let cases = [
            "not json",
            r#"{"costs": [{"name": "", "monthly_cost": 1.0}]}"#,
            r#"{"costs": [{"name": "a", "monthly_cost": -1.0}]}"#,
            r#"{"costs": [{"name": "a", "monthly_cost": 1.0}, {"name": "A", "monthly_cost": 2.0}]}"#,
            r#"{"alternatives": [{"dependency": "a", "alternative": " ", "monthly_cost": 0.0}]}"#,
        ];
        for input in cases {
            let err = CostTable::from_json_str(input).expect_err(input);
            assert!(matches!(err, PortfolioError::Configuration(_)), "{input}");
        }
    }

    #[test]
    fn load_reports_missing_file_as_configuration_error() {
        let mut fs = MockFileSystem::new();
        fs.expect_is_file().returning(|_| false);
        let err = CostTable::load(&fs, &PathBuf::from("/nope/costs.json")).expect_err("missing");
        assert!(matches!(err, PortfolioError::Configuration(_)));
    }

    #[test]
    fn load_reads_table_through_filesystem() {
        let mut fs = MockFileSystem::new();
        fs.expect_is_file().returning(|_| true);
        fs.expect_read_to_string()
            .returning(|_| Ok(r#"{"costs": [{"name": "acme", "monthly_cost": 9.0}]}"#.to_string()));
        let table = CostTable::load(&fs, &PathBuf::from("costs.json")).expect("table");
        assert!(approx(CostAggregator::new(table).cost_for("acme-sdk"), 9.0));
    }

    #[test]
    fn portfolio_costs_sum_and_rank() {
        let aggregator = CostAggregator::default();
        let a = aggregator.aggregate(&deps(&["sendgrid"]));
        let b = aggregator.aggregate(&deps(&["sentry", "sendgrid"]));
        let c = aggregator.aggregate(&deps(&["react"]));
        let d = aggregator.aggregate(&deps(&["datadog"]));

        let summary = portfolio_costs([("a", &a), ("b", &b), ("c", &c), ("d", &d)], 2);
        assert!(approx(summary.total_monthly, 71.0));
        assert!(approx(summary.total_annual, 852.0));
        assert_eq!(summary.repositories_with_costs, 3);
        assert!(approx(summary.average_per_costed_repository, 71.0 / 3.0));

        let repos = summary
            .top_repositories
            .iter()
            .map(|r| r.repository.as_str())
            .collect::<Vec<_>>();
        assert_eq!(repos, vec!["b", "a"]);
        assert_eq!(summary.top_dependencies[0].name, "sendgrid");
        assert_eq!(summary.top_dependencies[0].repositories, 2);
        assert_eq!(summary.top_dependencies[1].name, "sentry");
    }

    #[test]
    fn empty_portfolio_costs_nothing() {
        let summary = portfolio_costs(std::iter::empty::<(&str, &CostBreakdown)>(), DEFAULT_TOP_N);
        assert_eq!(summary.total_monthly, 0.0);
        assert_eq!(summary.average_per_costed_repository, 0.0);
        assert!(summary.top_repositories.is_empty());
    }
}
