//! Automation-tooling maturity scoring.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::facts::ToolingFacts;

const AGENT_WEIGHT: u32 = 10;
const AGENT_CAP: u32 = 30;
const COMMAND_WEIGHT: u32 = 5;
const COMMAND_CAP: u32 = 20;
const SERVER_WEIGHT: u32 = 10;
const SERVER_CAP: u32 = 30;
const MEMORY_BONUS: u32 = 15;
const MAX_SCORE: u32 = 100;

/// Where weighted tooling counts are capped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapStrategy {
    /// Cap each component, then cap the total at 100.
    #[default]
    PerComponent,
    /// Sum uncapped components and cap only the total at 100.
    TotalOnly,
}

/// Five-level tooling maturity rating.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum MaturityLevel {
    /// No meaningful adoption.
    None,
    /// Minimal configuration.
    Basic,
    /// Some agents or commands.
    Intermediate,
    /// Broad adoption.
    Advanced,
    /// Comprehensive adoption.
    Expert,
}

impl MaturityLevel {
    /// Every level in ascending order.
    pub const ALL: [MaturityLevel; 5] = [
        Self::None,
        Self::Basic,
        Self::Intermediate,
        Self::Advanced,
        Self::Expert,
    ];

    /// Level for a score. Lower bounds are inclusive.
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::Expert,
            60..=79 => Self::Advanced,
            30..=59 => Self::Intermediate,
            10..=29 => Self::Basic,
            _ => Self::None,
        }
    }

    /// Stable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::None => "No automation tooling configured",
            Self::Basic => "Minimal tooling configuration",
            Self::Intermediate => "Some agents or custom commands configured",
            Self::Advanced => "Broad automation with agents, commands and integrations",
            Self::Expert => "Comprehensive automation tooling across the repository",
        }
    }
}

/// Tooling maturity score and level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ToolingMaturity {
    /// Score in 0-100.
    pub score: u8,
    /// Level derived from the score.
    pub level: MaturityLevel,
}

impl ToolingMaturity {
    /// Maturity for a repository with no tooling at all.
    pub fn none() -> Self {
        Self {
            score: 0,
            level: MaturityLevel::None,
        }
    }
}

/// Computes [`ToolingMaturity`] from tooling facts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolingMaturityScorer {
    strategy: CapStrategy,
}

impl ToolingMaturityScorer {
    /// Create a scorer with the given capping strategy.
    pub fn new(strategy: CapStrategy) -> Self {
        Self { strategy }
    }

    /// Score tooling facts.
    pub fn score(&self, tooling: &ToolingFacts) -> ToolingMaturity {
        if !tooling.has_markers() {
            return ToolingMaturity::none();
        }

        let agents = tooling.agent_count.saturating_mul(AGENT_WEIGHT);
        let commands = tooling.command_count.saturating_mul(COMMAND_WEIGHT);
        let servers = tooling.integration_server_count.saturating_mul(SERVER_WEIGHT);
        let memory = if tooling.has_memory_file { MEMORY_BONUS } else { 0 };

        let sum = match self.strategy {
            CapStrategy::PerComponent => {
                agents.min(AGENT_CAP) + commands.min(COMMAND_CAP) + servers.min(SERVER_CAP) + memory
            }
            CapStrategy::TotalOnly => agents
                .saturating_add(commands)
                .saturating_add(servers)
                .saturating_add(memory),
        };
        let score = sum.min(MAX_SCORE) as u8;
        ToolingMaturity {
            score,
            level: MaturityLevel::from_score(score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tooling(agents: u32, commands: u32, servers: u32, memory: bool) -> ToolingFacts {
        ToolingFacts {
            has_config_dir: true,
            agent_count: agents,
            command_count: commands,
            integration_server_count: servers,
            has_memory_file: memory,
        }
    }

    #[test]
    fn no_markers_short_circuits_to_none() {
        let facts = ToolingFacts {
            agent_count: 9,
            command_count: 9,
            ..ToolingFacts::default()
        };
        assert_eq!(
            ToolingMaturityScorer::default().score(&facts),
            ToolingMaturity::none()
        );
    }

    #[test]
    fn memory_file_alone_is_basic() {
        let facts = ToolingFacts {
            has_memory_file: true,
            ..ToolingFacts::default()
        };
        let maturity = ToolingMaturityScorer::default().score(&facts);
        assert_eq!(maturity.score, 15);
        assert_eq!(maturity.level, MaturityLevel::Basic);
    }

    #[test]
    fn per_component_caps_large_counts() {
        let scorer = ToolingMaturityScorer::new(CapStrategy::PerComponent);
        let maturity = scorer.score(&tooling(10, 2, 0, false));
        assert_eq!(maturity.score, 40);
        assert_eq!(maturity.level, MaturityLevel::Intermediate);
    }

    #[test]
    fn total_only_caps_at_the_end() {
        let scorer = ToolingMaturityScorer::new(CapStrategy::TotalOnly);
        assert_eq!(scorer.score(&tooling(10, 2, 0, false)).score, 100);
        assert_eq!(scorer.score(&tooling(3, 2, 1, true)).score, 65);
    }

    #[test]
    fn strategies_agree_below_component_caps() {
        let facts = tooling(2, 3, 1, true);
        let per = ToolingMaturityScorer::new(CapStrategy::PerComponent).score(&facts);
        let total = ToolingMaturityScorer::new(CapStrategy::TotalOnly).score(&facts);
        assert_eq!(per, total);
        assert_eq!(per.score, 60);
        assert_eq!(per.level, MaturityLevel::Advanced);
    }

    #[test]
    fn fully_loaded_repository_is_expert_and_capped() {
        let maturity = ToolingMaturityScorer::default().score(&tooling(50, 50, 50, true));
        assert_eq!(maturity.score, 95);
        assert_eq!(maturity.level, MaturityLevel::Expert);
    }

    #[test]
    fn level_boundaries_are_inclusive() {
        assert_eq!(MaturityLevel::from_score(80), MaturityLevel::Expert);
        assert_eq!(MaturityLevel::from_score(79), MaturityLevel::Advanced);
        assert_eq!(MaturityLevel::from_score(60), MaturityLevel::Advanced);
        assert_eq!(MaturityLevel::from_score(30), MaturityLevel::Intermediate);
        assert_eq!(MaturityLevel::from_score(29), MaturityLevel::Basic);
        assert_eq!(MaturityLevel::from_score(10), MaturityLevel::Basic);
        assert_eq!(MaturityLevel::from_score(9), MaturityLevel::None);
    }
}
