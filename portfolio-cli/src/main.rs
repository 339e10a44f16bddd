#![deny(missing_docs)]
//! Portfolio command-line interface.
//!
//! Collects repository facts from fact documents or local checkouts, scores
//! the portfolio and reports viability, patterns and dependency costs.

mod publish;

use chrono::{DateTime, Utc};
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use log::{debug, info, warn};
use portfolio_core::facts::{ACTIVE_WINDOW_DAYS, RECENT_WINDOW_DAYS};
use portfolio_core::{
    CapStrategy, CheckoutInspector, CommitActivity, CommitWindow, CorpusEntry, CostTable,
    DependencyHealthRule, EngineConfig, JsonFactsProvider, MinerConfig, PatternLibrary,
    PortfolioAnalyzer, PortfolioReport, StdFileSystem, collect_corpus, format_currency,
    format_language_stats, load_facts_file, render_costs_markdown, render_json,
    render_patterns_markdown, render_portfolio_markdown, schema_json,
};
use publish::{PublishTarget, build_client, publish_report};
use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "portfolio", version, about = "Repository portfolio analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(&["facts", "facts_dir", "dir", "path"])
))]
struct SourceArgs {
    /// JSON file holding one facts document or an array of them.
    #[arg(long)]
    facts: Option<PathBuf>,
    /// Directory of `<repository>.json` facts documents.
    #[arg(long = "facts-dir")]
    facts_dir: Option<PathBuf>,
    /// Directory whose subdirectories are local checkouts.
    #[arg(long)]
    dir: Option<PathBuf>,
    /// Single local checkout.
    #[arg(long)]
    path: Option<PathBuf>,
    /// Maximum number of concurrent checkout inspections.
    #[arg(short = 'j', long, default_value_t = 5)]
    concurrency: usize,
}

#[derive(Args, Clone)]
struct EngineArgs {
    /// JSON cost table replacing the built-in reference table.
    #[arg(long, env = "PORTFOLIO_COST_TABLE")]
    cost_table: Option<PathBuf>,
    /// Minimum number of repositories a pattern must appear in.
    #[arg(long, env = "PORTFOLIO_MIN_USAGE", default_value_t = 3)]
    min_usage: usize,
    /// Number of patterns surfaced as top patterns.
    #[arg(long, default_value_t = 10)]
    top_patterns: usize,
    /// Mine every shared dependency as an integration pattern.
    #[arg(long)]
    shared_dependencies: bool,
    /// Dependency-health rule for viability scoring.
    #[arg(long, value_enum, default_value_t = DependencyRule::CountOnly)]
    dependency_rule: DependencyRule,
    /// Capping strategy for tooling maturity.
    #[arg(long, value_enum, default_value_t = MaturityCap::PerComponent)]
    maturity_cap: MaturityCap,
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Output format for report data.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the report to a file instead of stdout.
    #[arg(long = "report-output")]
    report_output: Option<PathBuf>,
}

#[derive(Args, Clone, Default)]
struct PublishArgs {
    /// Endpoint receiving the JSON report.
    #[arg(long, env = "PORTFOLIO_PUBLISH_URL")]
    publish_url: Option<String>,
    /// Bearer token for the publish endpoint.
    #[arg(long, env = "PORTFOLIO_PUBLISH_TOKEN", hide_env_values = true)]
    publish_token: Option<String>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum DependencyRule {
    CountOnly,
    OutdatedAware,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum MaturityCap {
    PerComponent,
    TotalOnly,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every repository and aggregate the portfolio report.
    Analyze {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        engine: EngineArgs,
        #[command(flatten)]
        report: OutputArgs,
        #[command(flatten)]
        publish: PublishArgs,
    },
    /// Mine recurring patterns across repositories.
    Patterns {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        engine: EngineArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Estimate dependency costs and substitution savings.
    Costs {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        engine: EngineArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Print the OpenAPI schema of the report records.
    Schema {
        /// Write the schema to a file instead of stdout.
        #[arg(long = "report-output")]
        report_output: Option<PathBuf>,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            source,
            engine,
            report,
            publish,
        } => run_analyze(source, engine, report, publish).await?,
        Commands::Patterns {
            source,
            engine,
            report,
        } => run_patterns(source, engine, report).await?,
        Commands::Costs {
            source,
            engine,
            report,
        } => run_costs(source, engine, report).await?,
        Commands::Schema { report_output } => {
            let output = OutputArgs {
                format: OutputFormat::Json,
                report_output,
            };
            emit_output(&output, schema_json()?).await?
        }
    }

    Ok(())
}

#[cfg(test)]
fn main() {}

async fn run_analyze(
    source: SourceArgs,
    engine: EngineArgs,
    report: OutputArgs,
    publish: PublishArgs,
) -> CliResult<()> {
    let analyzer = build_analyzer(&engine)?;
    let portfolio = analyze_source(&analyzer, &source).await?;

    let contents = match report.format {
        OutputFormat::Text => render_portfolio_text(&portfolio),
        OutputFormat::Markdown => render_portfolio_markdown(&portfolio),
        OutputFormat::Json => render_json(&portfolio)?,
    };
    emit_output(&report, contents).await?;

    if let Some(url) = publish.publish_url.as_deref() {
        let target = PublishTarget::new(url, publish.publish_token.clone())?;
        publish_report(&build_client()?, &target, &portfolio).await?;
    }
    Ok(())
}

async fn run_patterns(source: SourceArgs, engine: EngineArgs, report: OutputArgs) -> CliResult<()> {
    let analyzer = build_analyzer(&engine)?;
    let portfolio = analyze_source(&analyzer, &source).await?;
    let library = &portfolio.pattern_library;

    let contents = match report.format {
        OutputFormat::Text => render_patterns_text(library),
        OutputFormat::Markdown => render_patterns_markdown(library),
        OutputFormat::Json => render_json(library)?,
    };
    emit_output(&report, contents).await
}

async fn run_costs(source: SourceArgs, engine: EngineArgs, report: OutputArgs) -> CliResult<()> {
    let analyzer = build_analyzer(&engine)?;
    let portfolio = analyze_source(&analyzer, &source).await?;

    let contents = match report.format {
        OutputFormat::Text => render_costs_text(&portfolio),
        OutputFormat::Markdown => render_costs_markdown(&portfolio),
        OutputFormat::Json => render_json(&serde_json::json!({
            "costs": portfolio.costs,
            "opportunities": portfolio.opportunities,
        }))?,
    };
    emit_output(&report, contents).await
}

fn build_analyzer(engine: &EngineArgs) -> CliResult<PortfolioAnalyzer> {
    let cost_table = match &engine.cost_table {
        Some(path) => CostTable::load(&StdFileSystem::new(), path)?,
        None => CostTable::builtin(),
    };
    let config = EngineConfig {
        dependency_health: match engine.dependency_rule {
            DependencyRule::CountOnly => DependencyHealthRule::CountOnly,
            DependencyRule::OutdatedAware => DependencyHealthRule::OutdatedAware,
        },
        cap_strategy: match engine.maturity_cap {
            MaturityCap::PerComponent => CapStrategy::PerComponent,
            MaturityCap::TotalOnly => CapStrategy::TotalOnly,
        },
        miner: MinerConfig {
            min_usage: engine.min_usage,
            top_n: engine.top_patterns,
            shared_dependencies: engine.shared_dependencies,
        },
        ..EngineConfig::default()
    };
    Ok(PortfolioAnalyzer::new(cost_table, config))
}

async fn analyze_source(
    analyzer: &PortfolioAnalyzer,
    source: &SourceArgs,
) -> CliResult<PortfolioReport> {
    let source = resolve_source_args(source)?;
    let entries = collect_entries(source).await?;
    if entries.is_empty() {
        warn!("no repositories found");
    }
    Ok(analyzer.analyze(entries))
}

enum FactsSource {
    Facts(PathBuf),
    FactsDir(PathBuf),
    Checkouts { paths: Vec<PathBuf>, concurrency: usize },
    Dir { dir: PathBuf, concurrency: usize },
}

fn resolve_source_args(source: &SourceArgs) -> CliResult<FactsSource> {
    let concurrency = source.concurrency.max(1);
    if let Some(file) = source.facts.clone() {
        return Ok(FactsSource::Facts(file));
    }
    if let Some(dir) = source.facts_dir.clone() {
        return Ok(FactsSource::FactsDir(dir));
    }
    if let Some(dir) = source.dir.clone() {
        return Ok(FactsSource::Dir { dir, concurrency });
    }
    if let Some(path) = source.path.clone() {
        return Ok(FactsSource::Checkouts {
            paths: vec![path],
            concurrency,
        });
    }
    Err("no repository source provided".into())
}

async fn collect_entries(source: FactsSource) -> CliResult<Vec<CorpusEntry>> {
    match source {
        FactsSource::Facts(file) => Ok(load_facts_file(&StdFileSystem::new(), &file)?),
        FactsSource::FactsDir(dir) => {
            let provider = JsonFactsProvider::new(StdFileSystem::new(), dir);
            let ids = provider.ids()?;
            Ok(collect_corpus(&provider, ids))
        }
        FactsSource::Dir { dir, concurrency } => {
            let paths = load_repo_paths_from_dir(&dir).await?;
            inspect_checkouts(paths, concurrency).await
        }
        FactsSource::Checkouts { paths, concurrency } => {
            inspect_checkouts(paths, concurrency).await
        }
    }
}

async fn load_repo_paths_from_dir(path: &Path) -> CliResult<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(path).await?;
    let mut repos = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let file_type = entry.file_type().await?;
        if !file_type.is_dir() {
            continue;
        }
        let entry_path = entry.path();
        if is_hidden_path(&entry_path) {
            continue;
        }
        repos.push(entry_path);
    }
    repos.sort();
    Ok(repos)
}

fn is_hidden_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

async fn inspect_checkouts(paths: Vec<PathBuf>, concurrency: usize) -> CliResult<Vec<CorpusEntry>> {
    inspect_checkouts_with(paths, concurrency, inspect_checkout).await
}

async fn inspect_checkouts_with<F, Fut>(
    paths: Vec<PathBuf>,
    concurrency: usize,
    inspect: F,
) -> CliResult<Vec<CorpusEntry>>
where
    F: Fn(PathBuf) -> Fut,
    Fut: Future<Output = CorpusEntry> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();
    let mut pending = HashMap::new();

    for path in paths {
        let permit = semaphore.clone().acquire_owned().await?;
        let repository = path.display().to_string();
        let inspection = inspect(path);
        let handle = tasks.spawn(async move {
            let _permit = permit;
            inspection.await
        });
        pending.insert(handle.id(), repository);
    }

    let mut entries = Vec::new();
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                let repository = pending
                    .remove(&err.id())
                    .unwrap_or_else(|| "unknown".to_string());
                warn!("inspection of {repository} failed: {err}");
                entries.push(CorpusEntry::Unavailable {
                    repository,
                    reason: err.to_string(),
                });
            }
        }
    }
    info!("inspected {} checkouts", entries.len());
    Ok(entries)
}

async fn inspect_checkout(path: PathBuf) -> CorpusEntry {
    let repository = path.display().to_string();
    if !path.is_dir() {
        return CorpusEntry::Unavailable {
            reason: format!("path not found: {repository}"),
            repository,
        };
    }

    let root = path.clone();
    let inspected = tokio::task::spawn_blocking(move || {
        CheckoutInspector::new(StdFileSystem::new()).inspect(&root)
    })
    .await;
    let mut facts = match inspected {
        Ok(Ok(facts)) => facts,
        Ok(Err(err)) => {
            return CorpusEntry::Unavailable {
                repository,
                reason: err.to_string(),
            };
        }
        Err(err) => {
            return CorpusEntry::Unavailable {
                repository,
                reason: err.to_string(),
            };
        }
    };

    let snapshot = Utc::now();
    facts.snapshot_at = Some(snapshot);
    match read_git_history(&path, snapshot).await {
        Ok(history) => {
            facts.created_at = history.first_commit;
            facts.last_push = history.last_commit;
            facts.commit_activity = CommitActivity::Observed(history.window);
        }
        Err(err) => debug!("no commit history for {repository}: {err}"),
    }
    if let Ok(url) = read_remote_url(&path).await {
        facts.url = url;
    }
    CorpusEntry::Available(facts)
}

#[derive(Debug, Default, PartialEq)]
struct GitHistory {
    first_commit: Option<DateTime<Utc>>,
    last_commit: Option<DateTime<Utc>>,
    window: CommitWindow,
}

async fn read_git_history(path: &Path, snapshot: DateTime<Utc>) -> CliResult<GitHistory> {
    let output = Command::new("git")
        .arg("-C")
        .arg(path)
        .args(["log", "--format=%ct%x09%ae"])
        .output()
        .await?;

    if output.status.success() {
        Ok(parse_git_log(&String::from_utf8_lossy(&output.stdout), snapshot))
    } else {
        Err(format!("git log failed with status {}", output.status).into())
    }
}

async fn read_remote_url(path: &Path) -> CliResult<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(path)
        .args(["config", "--get", "remote.origin.url"])
        .output()
        .await?;
    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if output.status.success() && !url.is_empty() {
        Ok(url)
    } else {
        Err("no origin remote".into())
    }
}

/// Parse `git log --format=%ct%x09%ae` output into commit windows.
fn parse_git_log(log: &str, snapshot: DateTime<Utc>) -> GitHistory {
    let mut history = GitHistory::default();
    let mut authors = BTreeSet::new();

    for line in log.lines() {
        let Some((timestamp, author)) = line.split_once('\t') else {
            continue;
        };
        let Some(at) = timestamp
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
        else {
            continue;
        };

        history.first_commit = Some(history.first_commit.map_or(at, |first| first.min(at)));
        history.last_commit = Some(history.last_commit.map_or(at, |last| last.max(at)));

        let age = (snapshot - at).num_days().max(0);
        if age <= ACTIVE_WINDOW_DAYS {
            history.window.commits_90d += 1;
            authors.insert(author.trim().to_lowercase());
        }
        if age <= RECENT_WINDOW_DAYS {
            history.window.commits_30d += 1;
        }
    }

    history.window.unique_authors = authors.len() as u32;
    history
}

async fn emit_output(output: &OutputArgs, contents: String) -> CliResult<()> {
    if let Some(path) = &output.report_output {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
    } else {
        print!("{contents}");
    }
    Ok(())
}

fn render_portfolio_text(report: &PortfolioReport) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Repositories: {}", report.repositories_analyzed);
    let _ = writeln!(output, "Average viability: {:.1}", report.average_viability);
    let tiers = &report.viability_tiers;
    let _ = writeln!(
        output,
        "Viability: high {}, medium {}, low {}",
        tiers.high, tiers.medium, tiers.low
    );
    let tiers = &report.reusability_tiers;
    let _ = writeln!(
        output,
        "Reusability: highly reusable {}, partially reusable {}, one-off {}",
        tiers.highly_reusable, tiers.partially_reusable, tiers.one_off
    );

    if report.languages.is_empty() {
        let _ = writeln!(output, "Languages: none detected");
    } else {
        let _ = writeln!(output, "Languages:");
        for (language, count) in format_language_stats(&report.languages) {
            let _ = writeln!(output, "- {language}: {count}");
        }
    }

    let _ = writeln!(
        output,
        "Monthly cost: {} ({} annually)",
        format_currency(report.costs.total_monthly),
        format_currency(report.costs.total_annual)
    );

    if !report.assessments.is_empty() {
        let _ = writeln!(output, "Repositories:");
        for assessment in &report.assessments {
            let _ = writeln!(
                output,
                "- {}: viability {} ({}), tooling {}, {}",
                assessment.name,
                assessment.viability.total,
                assessment.viability.rating.as_str(),
                assessment.maturity.level.as_str(),
                assessment.reusability.as_str()
            );
        }
    }

    if !report.skipped.is_empty() {
        let _ = writeln!(output, "Skipped:");
        for skipped in &report.skipped {
            let _ = writeln!(output, "- {}: {}", skipped.repository, skipped.reason);
        }
    }

    let _ = writeln!(output, "Recommendations:");
    for recommendation in &report.recommendations {
        let _ = writeln!(output, "- {}", recommendation.summary);
    }
    output
}

fn render_patterns_text(library: &PatternLibrary) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Patterns: {} across {} repositories",
        library.patterns.len(),
        library.total_repositories
    );
    if library.patterns.is_empty() {
        let _ = writeln!(output, "No patterns met the usage threshold.");
        return output;
    }
    for pattern in &library.patterns {
        let _ = writeln!(
            output,
            "- {} [{}]: score {}, used by {} ({})",
            pattern.name,
            pattern.kind.as_str(),
            pattern.reusability_score,
            pattern.usage_count,
            pattern.repositories.join(", ")
        );
    }
    output
}

fn render_costs_text(report: &PortfolioReport) -> String {
    let mut output = String::new();
    let costs = &report.costs;
    let _ = writeln!(
        output,
        "Monthly cost: {} ({} annually)",
        format_currency(costs.total_monthly),
        format_currency(costs.total_annual)
    );
    let _ = writeln!(
        output,
        "Repositories with costs: {}",
        costs.repositories_with_costs
    );
    for repository in &costs.top_repositories {
        let _ = writeln!(
            output,
            "- {}: {}",
            repository.repository,
            format_currency(repository.monthly_cost)
        );
    }

    if report.opportunities.is_empty() {
        let _ = writeln!(output, "Optimizations: none");
    } else {
        let _ = writeln!(output, "Optimizations:");
        for opportunity in &report.opportunities {
            let _ = writeln!(
                output,
                "- {}: {} -> {} saves {}/year",
                opportunity.repository,
                opportunity.current_tool,
                opportunity.alternative_tool,
                format_currency(opportunity.annual_savings)
            );
        }
    }
    output
}
