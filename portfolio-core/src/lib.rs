#![deny(missing_docs)]
//! Portfolio core library.
//!
//! Scores repositories for viability, tooling maturity and reusability,
//! mines shared patterns and aggregates dependency costs across a corpus.

pub mod cost;
pub mod detectors;
pub mod domain;
pub mod error;
pub mod facts;
pub mod fs;
pub mod inspector;
pub mod manifest;
pub mod maturity;
pub mod openapi;
pub mod patterns;
pub mod portfolio;
pub mod provider;
pub mod report;
pub mod reusability;
pub mod viability;

pub use cost::{
    CostAggregator, CostBreakdown, CostTable, OptimizationOpportunity, PortfolioCost,
    portfolio_costs,
};
pub use detectors::{PatternKind, PatternObservation};
pub use domain::{Annotation, LanguageHistogram, SkippedRepository};
pub use error::{PortfolioError, Result};
pub use facts::{
    CommitActivity, CommitWindow, Dependency, OutdatedDependencies, RepositoryFacts, TestCoverage,
    ToolingFacts,
};
pub use fs::{FileSystem, StdFileSystem};
pub use inspector::CheckoutInspector;
pub use maturity::{CapStrategy, MaturityLevel, ToolingMaturity, ToolingMaturityScorer};
pub use openapi::{ReportSchema, schema_json};
pub use patterns::{MinerConfig, Pattern, PatternLibrary, PatternMiner};
pub use portfolio::{CorpusEntry, EngineConfig, PortfolioAnalyzer, PortfolioReport, RepositoryAssessment};
pub use provider::{FactsProvider, JsonFactsProvider, collect_corpus, load_facts_file};
pub use report::{
    format_currency, format_language_stats, render_costs_markdown, render_json,
    render_patterns_markdown, render_portfolio_markdown,
};
pub use reusability::Reusability;
pub use viability::{DependencyHealthRule, ViabilityRating, ViabilityScore, ViabilityScorer};
