//! Per-repository fact records consumed by every scorer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Window, in days, inside which a repository counts as active.
pub const ACTIVE_WINDOW_DAYS: i64 = 90;
/// Window, in days, for the most recent activity tier.
pub const RECENT_WINDOW_DAYS: i64 = 30;

/// Immutable snapshot of a single repository, produced by the collaborator layer.
///
/// Every field defaults so a partially populated JSON document still loads;
/// the scorers translate absent data into floor values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryFacts {
    /// Repository name (without owner prefix).
    pub name: String,
    /// Canonical repository URL.
    pub url: String,
    /// Free-text description, if any.
    pub description: Option<String>,
    /// Primary language.
    pub language: Option<String>,
    /// Whether the repository is a fork.
    pub is_fork: bool,
    /// Whether the repository is archived.
    pub is_archived: bool,
    /// Whether the repository is private.
    pub is_private: bool,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Last push timestamp.
    pub last_push: Option<DateTime<Utc>>,
    /// Time at which these facts were collected.
    pub snapshot_at: Option<DateTime<Utc>>,
    /// Whether a test suite is present.
    pub has_tests: bool,
    /// Whether CI configuration is present.
    pub has_ci: bool,
    /// Whether a README is present.
    pub has_readme: bool,
    /// Whether documentation beyond the README is present.
    pub has_extra_docs: bool,
    /// Measured test coverage, if any.
    pub test_coverage: TestCoverage,
    /// Declared dependencies in manifest order. Duplicates are legitimate.
    pub dependencies: Vec<Dependency>,
    /// Number of outdated dependencies, if known.
    pub outdated_dependencies: OutdatedDependencies,
    /// Automation-tooling capability counts.
    pub tooling: ToolingFacts,
    /// Commit activity over trailing windows.
    pub commit_activity: CommitActivity,
    /// Repository-relative paths worth pattern matching against.
    pub notable_paths: Vec<String>,
}

/// A declared dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dependency {
    /// Package name as written in the manifest.
    pub name: String,
    /// Version requirement, if declared.
    pub version: Option<String>,
    /// Package manager that declared it (npm, pip, cargo, ...).
    pub manager: String,
    /// Whether this is a development-only dependency.
    pub is_dev: bool,
}

impl Dependency {
    /// Create a runtime dependency with no version.
    pub fn new(name: impl Into<String>, manager: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            manager: manager.into(),
            is_dev: false,
        }
    }

    /// Attach a version requirement.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Mark the dependency as development-only.
    pub fn dev(mut self) -> Self {
        self.is_dev = true;
        self
    }
}

/// Test coverage measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestCoverage {
    /// No coverage data was collected.
    #[default]
    Unknown,
    /// Line coverage percentage.
    Measured(f64),
}

/// Outdated-dependency count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutdatedDependencies {
    /// Outdated status was not checked.
    #[default]
    Unknown,
    /// Number of dependencies behind their latest release.
    Counted(usize),
}

/// Commit activity over the trailing 30/90 day windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitActivity {
    /// History could not be read.
    #[default]
    Unknown,
    /// Observed commit counts.
    Observed(CommitWindow),
}

/// Commit counts inside the trailing windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitWindow {
    /// Commits in the trailing 30 days.
    pub commits_30d: u32,
    /// Commits in the trailing 90 days.
    pub commits_90d: u32,
    /// Distinct commit authors in the trailing 90 days.
    pub unique_authors: u32,
}

/// Automation-tooling capability markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolingFacts {
    /// Whether a tooling configuration directory exists.
    pub has_config_dir: bool,
    /// Number of configured autonomous-agent definitions.
    pub agent_count: u32,
    /// Number of custom commands.
    pub command_count: u32,
    /// Number of external-integration server configurations.
    pub integration_server_count: u32,
    /// Whether a project-memory file exists.
    pub has_memory_file: bool,
}

impl ToolingFacts {
    /// Whether any capability marker is present at all.
    pub fn has_markers(&self) -> bool {
        self.has_config_dir || self.has_memory_file
    }
}

impl RepositoryFacts {
    /// Create an otherwise empty fact record for a named repository.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whole days between the last push and the snapshot time, if both are known.
    pub fn days_since_push(&self) -> Option<i64> {
        let (Some(pushed), Some(snapshot)) = (self.last_push, self.snapshot_at) else {
            return None;
        };
        Some((snapshot - pushed).num_days().max(0))
    }

    /// Whether the repository saw a commit within the active window.
    ///
    /// Falls back to push recency when commit history is unknown.
    pub fn is_active(&self) -> bool {
        match self.commit_activity {
            CommitActivity::Observed(window) => window.commits_90d > 0,
            CommitActivity::Unknown => self
                .days_since_push()
                .map(|days| days <= ACTIVE_WINDOW_DAYS)
                .unwrap_or(false),
        }
    }

    /// Whether any documentation is present.
    pub fn has_docs(&self) -> bool {
        self.has_readme || self.has_extra_docs
    }

    /// Number of declared dependencies, duplicates included.
    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }

    /// Display name, falling back to the URL tail when the name is blank.
    pub fn display_name(&self) -> String {
        let trimmed = self.name.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
        let tail = self
            .url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .trim_end_matches(".git");
        if tail.is_empty() {
            "unnamed".to_string()
        } else {
            tail.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn snapshot() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn partial_json_loads_with_defaults() {
        let facts: RepositoryFacts =
            serde_json::from_str(r#"{"name": "demo", "has_tests": true}"#).expect("facts");

        assert_eq!(facts.name, "demo");
        assert!(facts.has_tests);
        assert_eq!(facts.test_coverage, TestCoverage::Unknown);
        assert_eq!(facts.commit_activity, CommitActivity::Unknown);
        assert!(facts.dependencies.is_empty());
    }

    #[test]
    fn tagged_fields_round_trip_from_json() {
        let facts: RepositoryFacts = serde_json::from_str(
            r#"{
                "name": "demo",
                "test_coverage": {"measured": 42.5},
                "outdated_dependencies": {"counted": 2},
                "commit_activity": {"observed": {"commits_30d": 1, "commits_90d": 4, "unique_authors": 2}},
                "dependencies": [{"name": "jest", "manager": "npm", "is_dev": true}]
            }"#,
        )
        .expect("facts");

        assert_eq!(facts.test_coverage, TestCoverage::Measured(42.5));
        assert_eq!(facts.outdated_dependencies, OutdatedDependencies::Counted(2));
        assert!(facts.dependencies[0].is_dev);
        assert!(facts.is_active());
    }

    #[test]
    fn activity_falls_back_to_push_recency() {
        let mut facts = RepositoryFacts::named("demo");
        facts.snapshot_at = Some(snapshot());
        facts.last_push = Some(snapshot() - Duration::days(45));
        assert_eq!(facts.days_since_push(), Some(45));
        assert!(facts.is_active());

        facts.last_push = Some(snapshot() - Duration::days(91));
        assert!(!facts.is_active());
    }

    #[test]
    fn observed_history_overrides_push_recency() {
        let mut facts = RepositoryFacts::named("demo");
        facts.snapshot_at = Some(snapshot());
        facts.last_push = Some(snapshot());
        facts.commit_activity = CommitActivity::Observed(CommitWindow::default());
        assert!(!facts.is_active());
    }

    #[test]
    fn unknown_timestamps_are_inactive() {
        let facts = RepositoryFacts::named("demo");
        assert_eq!(facts.days_since_push(), None);
        assert!(!facts.is_active());
    }

    #[test]
    fn display_name_falls_back_to_url() {
        let mut facts = RepositoryFacts::default();
        facts.url = "https://github.com/org/widget.git".to_string();
        assert_eq!(facts.display_name(), "widget");

        facts.url.clear();
        assert_eq!(facts.display_name(), "unnamed");
    }
}
