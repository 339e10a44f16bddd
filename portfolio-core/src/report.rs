//! Report formatting for portfolio outputs.

use std::fmt::Write;

use serde::Serialize;

use crate::cost::{OptimizationOpportunity, PortfolioCost};
use crate::domain::{LanguageHistogram, SkippedRepository};
use crate::patterns::{Pattern, PatternLibrary};
use crate::portfolio::{PortfolioReport, Recommendation, RepositoryAssessment};

/// Maximum repositories listed per pattern before eliding.
const PATTERN_REPOSITORY_PREVIEW: usize = 5;

/// Render a full portfolio report as Markdown.
pub fn render_portfolio_markdown(report: &PortfolioReport) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Portfolio Analysis Report\n");
    let _ = writeln!(output, "- Repositories analyzed: {}", report.repositories_analyzed);
    let _ = writeln!(output, "- Repositories skipped: {}", report.skipped.len());
    let _ = writeln!(output, "- Average viability: {:.1}/100", report.average_viability);
    let _ = writeln!(
        output,
        "- Monthly cost: {}",
        format_currency(report.costs.total_monthly)
    );
    let _ = writeln!(output);

    append_tiers(&mut output, report);
    append_languages(&mut output, &report.languages);
    append_cost_summary(&mut output, &report.costs);
    append_opportunities(&mut output, &report.opportunities);
    let _ = writeln!(output, "## Top Patterns\n");
    append_patterns(&mut output, &report.top_patterns, report.pattern_library.total_repositories);
    append_list(
        &mut output,
        "Template Candidates",
        &report.template_candidates,
        "No template candidates.",
    );
    append_list(
        &mut output,
        "Needs Attention",
        &report.needs_attention,
        "No repositories need attention.",
    );
    append_recommendations(&mut output, &report.recommendations);
    append_assessments(&mut output, &report.assessments);
    append_skipped(&mut output, &report.skipped);
    output
}

/// Render a pattern library as Markdown.
pub fn render_patterns_markdown(library: &PatternLibrary) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Pattern Analysis Report\n");
    let _ = writeln!(output, "- Repositories analyzed: {}", library.total_repositories);
    let _ = writeln!(output, "- Patterns identified: {}", library.patterns.len());
    let _ = writeln!(
        output,
        "- Average reusability: {:.1}/100",
        library.average_reusability
    );
    let _ = writeln!(
        output,
        "- By kind: architectural {}, integration {}, design {}",
        library.by_kind.architectural, library.by_kind.integration, library.by_kind.design
    );
    let _ = writeln!(output);

    let _ = writeln!(output, "## Patterns\n");
    append_patterns(&mut output, &library.patterns, library.total_repositories);

    if !library.ecosystem_usage.is_empty() {
        let _ = writeln!(
            output,
            "## Ecosystem Usage\n\n{} repositories use first-party ecosystem services.\n",
            library.repositories_using_ecosystem
        );
        for (ecosystem, count) in &library.ecosystem_usage {
            let _ = writeln!(output, "- {ecosystem}: {count}");
        }
        let _ = writeln!(output);
    }
    output
}

/// Render the cost section of a portfolio report as Markdown.
pub fn render_costs_markdown(report: &PortfolioReport) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Portfolio Cost Report\n");
    append_cost_summary(&mut output, &report.costs);
    append_opportunities(&mut output, &report.opportunities);
    output
}

/// Render any serializable report payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

/// Format a dollar amount with two decimals.
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        format!("${amount:.2}")
    }
}

/// Language histogram sorted by count descending, then name.
pub fn format_language_stats(languages: &LanguageHistogram) -> Vec<(String, usize)> {
    let mut items: Vec<(String, usize)> = languages.iter().map(|(k, v)| (k.clone(), *v)).collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    items
}

fn append_tiers(output: &mut String, report: &PortfolioReport) {
    let viability = &report.viability_tiers;
    let reusability = &report.reusability_tiers;
    let maturity = &report.maturity_tiers;
    let _ = writeln!(output, "## Tiers\n");
    let _ = writeln!(
        output,
        "- Viability: high {}, medium {}, low {}",
        viability.high, viability.medium, viability.low
    );
    let _ = writeln!(
        output,
        "- Reusability: highly reusable {}, partially reusable {}, one-off {}",
        reusability.highly_reusable, reusability.partially_reusable, reusability.one_off
    );
    let _ = writeln!(
        output,
        "- Tooling maturity: expert {}, advanced {}, intermediate {}, basic {}, none {}",
        maturity.expert, maturity.advanced, maturity.intermediate, maturity.basic, maturity.none
    );
    let _ = writeln!(output);
}

fn append_languages(output: &mut String, languages: &LanguageHistogram) {
    if languages.is_empty() {
        let _ = writeln!(output, "## Languages\nNo languages detected.\n");
        return;
    }
    let _ = writeln!(output, "## Languages");
    for (language, count) in format_language_stats(languages) {
        let _ = writeln!(output, "- {language}: {count}");
    }
    let _ = writeln!(output);
}

fn append_cost_summary(output: &mut String, costs: &PortfolioCost) {
    let _ = writeln!(output, "## Costs\n");
    let _ = writeln!(output, "- Monthly: {}", format_currency(costs.total_monthly));
    let _ = writeln!(output, "- Annual: {}", format_currency(costs.total_annual));
    let _ = writeln!(
        output,
        "- Average per paying repository: {} across {} repositories",
        format_currency(costs.average_per_costed_repository),
        costs.repositories_with_costs
    );
    let _ = writeln!(output);

    let repositories = costs
        .top_repositories
        .iter()
        .map(|entry| format!("{}: {}/month", entry.repository, format_currency(entry.monthly_cost)))
        .collect::<Vec<_>>();
    append_list(output, "Most Expensive Repositories", &repositories, "No paid dependencies.");

    let dependencies = costs
        .top_dependencies
        .iter()
        .map(|entry| {
            format!(
                "{}: {}/month in {} repositories",
                entry.name,
                format_currency(entry.monthly_cost),
                entry.repositories
            )
        })
        .collect::<Vec<_>>();
    append_list(output, "Most Expensive Dependencies", &dependencies, "No paid dependencies.");
}

fn append_opportunities(output: &mut String, opportunities: &[OptimizationOpportunity]) {
    if opportunities.is_empty() {
        let _ = writeln!(output, "### Optimization Opportunities\nNo opportunities found.\n");
        return;
    }
    let _ = writeln!(output, "### Optimization Opportunities");
    for opportunity in opportunities {
        let _ = writeln!(
            output,
            "- {}: {} -> {} ({}/year)",
            opportunity.repository,
            opportunity.current_tool,
            opportunity.alternative_tool,
            format_currency(opportunity.annual_savings)
        );
        let _ = writeln!(output, "  - {}", opportunity.recommendation);
        if !opportunity.trade_offs.is_empty() {
            let _ = writeln!(output, "  - Trade-offs: {}", opportunity.trade_offs.join("; "));
        }
    }
    let _ = writeln!(output);
}

fn append_patterns(output: &mut String, patterns: &[Pattern], total_repositories: usize) {
    if patterns.is_empty() {
        let _ = writeln!(output, "No patterns met the usage threshold.\n");
        return;
    }
    for (index, pattern) in patterns.iter().enumerate() {
        let share = if total_repositories == 0 {
            0.0
        } else {
            pattern.usage_count as f64 / total_repositories as f64 * 100.0
        };
        let _ = writeln!(output, "### {}. {}", index + 1, pattern.name);
        let _ = writeln!(output, "- Kind: {}", pattern.kind.as_str());
        let _ = writeln!(output, "- Reusability: {}/100", pattern.reusability_score);
        let _ = writeln!(
            output,
            "- Usage: {} repositories ({share:.1}%)",
            pattern.usage_count
        );
        let preview = pattern
            .repositories
            .iter()
            .take(PATTERN_REPOSITORY_PREVIEW)
            .cloned()
            .collect::<Vec<_>>();
        let hidden = pattern.repositories.len().saturating_sub(PATTERN_REPOSITORY_PREVIEW);
        if hidden > 0 {
            let _ = writeln!(
                output,
                "- Repositories: {} and {hidden} more",
                preview.join(", ")
            );
        } else {
            let _ = writeln!(output, "- Repositories: {}", preview.join(", "));
        }
        if let Some(ecosystem) = &pattern.ecosystem {
            let _ = writeln!(output, "- Ecosystem: {ecosystem}");
        }
        let _ = writeln!(output, "\n{}\n", pattern.description);
    }
}

fn append_recommendations(output: &mut String, recommendations: &[Recommendation]) {
    let _ = writeln!(output, "## Recommendations");
    for recommendation in recommendations {
        let _ = writeln!(output, "- {}", recommendation.summary);
        for subject in &recommendation.subjects {
            let _ = writeln!(output, "  - {subject}");
        }
    }
    let _ = writeln!(output);
}

fn append_assessments(output: &mut String, assessments: &[RepositoryAssessment]) {
    if assessments.is_empty() {
        return;
    }
    let _ = writeln!(output, "## Repositories\n");
    let _ = writeln!(
        output,
        "| Repository | Viability | Rating | Reusability | Tooling | Monthly cost |"
    );
    let _ = writeln!(output, "|---|---|---|---|---|---|");
    for assessment in assessments {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} | {} | {} |",
            assessment.name,
            assessment.viability.total,
            assessment.viability.rating.as_str(),
            assessment.reusability.as_str(),
            assessment.maturity.level.as_str(),
            format_currency(assessment.costs.monthly_total)
        );
    }
    let _ = writeln!(output);
}

fn append_skipped(output: &mut String, skipped: &[SkippedRepository]) {
    let items = skipped
        .iter()
        .map(|entry| format!("{}: {}", entry.repository, entry.reason))
        .collect::<Vec<_>>();
    append_list(output, "Skipped", &items, "No repositories skipped.");
}

fn append_list(output: &mut String, title: &str, items: &[String], empty_message: &str) {
    if items.is_empty() {
        let _ = writeln!(output, "### {title}\n{empty_message}\n");
        return;
    }
    let _ = writeln!(output, "### {title}");
    for item in items {
        let _ = writeln!(output, "- {item}");
    }
    let _ = writeln!(output);
}
