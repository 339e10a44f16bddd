//! OpenAPI component document for the report payloads.

use utoipa::OpenApi;

use crate::cost::{
    CostBreakdown, CostEntry, DependencyCost, OptimizationOpportunity, PortfolioCost,
    RepositoryCost, Substitution,
};
use crate::detectors::PatternKind;
use crate::domain::{Annotation, SkippedRepository};
use crate::maturity::{MaturityLevel, ToolingMaturity};
use crate::patterns::{KindCounts, Pattern, PatternLibrary};
use crate::portfolio::{
    MaturityTiers, PortfolioReport, Recommendation, RepositoryAssessment, ReusabilityTiers,
    ViabilityTiers,
};
use crate::reusability::Reusability;
use crate::viability::{ViabilityRating, ViabilityScore};

#[derive(OpenApi)]
#[openapi(
    info(title = "portfolio-report", description = "Portfolio analysis report payloads"),
    components(
        schemas(
            PortfolioReport,
            RepositoryAssessment,
            ViabilityScore,
            ViabilityRating,
            ToolingMaturity,
            MaturityLevel,
            Reusability,
            ViabilityTiers,
            ReusabilityTiers,
            MaturityTiers,
            Recommendation,
            Annotation,
            SkippedRepository,
            CostBreakdown,
            CostEntry,
            Substitution,
            OptimizationOpportunity,
            PortfolioCost,
            RepositoryCost,
            DependencyCost,
            Pattern,
            PatternKind,
            PatternLibrary,
            KindCounts
        )
    )
)]
/// OpenAPI document describing every report record.
pub struct ReportSchema;

/// Render the schema document as pretty JSON.
pub fn schema_json() -> Result<String, serde_json::Error> {
    ReportSchema::openapi().to_pretty_json()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_lists_report_components() {
        let doc = ReportSchema::openapi();
        let components = doc.components.expect("components");
        for name in ["PortfolioReport", "RepositoryAssessment", "Pattern", "OptimizationOpportunity"] {
            assert!(components.schemas.contains_key(name), "missing {name}");
        }
    }

    #[test]
    fn schema_json_is_valid_json() {
        let json = schema_json().expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["info"]["title"], "portfolio-report");
    }
}
