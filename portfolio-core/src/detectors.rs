//! Ordered registry of pattern detectors.
//!
//! Each detector is a named predicate over [`RepositoryFacts`]. The miner
//! runs every detector once per repository and consolidates the hits.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::facts::RepositoryFacts;

/// Pattern classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// System-shape idioms such as serverless or event-driven designs.
    Architectural,
    /// Connections to external services.
    Integration,
    /// Code-level idioms, frameworks and libraries.
    Design,
}

impl PatternKind {
    /// Quality weight used by pattern reusability scoring.
    pub fn quality_weight(&self) -> u8 {
        match self {
            Self::Architectural => 30,
            Self::Integration => 25,
            Self::Design => 20,
        }
    }

    /// Stable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Architectural => "architectural",
            Self::Integration => "integration",
            Self::Design => "design",
        }
    }
}

/// A single detector hit for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternObservation {
    /// Canonical pattern name.
    pub name: String,
    /// Pattern classification.
    pub kind: PatternKind,
    /// First-party ecosystem technology the pattern maps to.
    pub ecosystem: Option<String>,
    /// What the pattern is.
    pub description: String,
    /// Why adopting it helps.
    pub benefits: Vec<String>,
    /// What to watch out for.
    pub considerations: Vec<String>,
}

/// A named, independently testable pattern detector.
#[derive(Debug, Clone, Copy)]
pub struct Detector {
    /// Canonical pattern name emitted on a hit.
    pub name: &'static str,
    /// Pattern classification.
    pub kind: PatternKind,
    /// First-party ecosystem technology, if any.
    pub ecosystem: Option<&'static str>,
    /// Pattern description.
    pub description: &'static str,
    /// Benefits of the pattern.
    pub benefits: &'static [&'static str],
    /// Considerations when adopting the pattern.
    pub considerations: &'static [&'static str],
    /// Predicate deciding whether a repository exhibits the pattern.
    pub detect: fn(&RepositoryFacts) -> bool,
}

impl Detector {
    /// Run the detector against one repository.
    pub fn observe(&self, facts: &RepositoryFacts) -> Option<PatternObservation> {
        if !(self.detect)(facts) {
            return None;
        }
        Some(PatternObservation {
            name: self.name.to_string(),
            kind: self.kind,
            ecosystem: self.ecosystem.map(str::to_string),
            description: self.description.to_string(),
            benefits: to_strings(self.benefits),
            considerations: to_strings(self.considerations),
        })
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn any_dependency(facts: &RepositoryFacts, keywords: &[&str]) -> bool {
    facts.dependencies.iter().any(|dependency| {
        let name = dependency.name.to_lowercase();
        keywords.iter().any(|keyword| name.contains(keyword))
    })
}

fn exact_dependency(facts: &RepositoryFacts, names: &[&str]) -> bool {
    facts.dependencies.iter().any(|dependency| {
        let name = dependency.name.to_lowercase();
        names.contains(&name.as_str())
    })
}

fn any_path(facts: &RepositoryFacts, fragments: &[&str]) -> bool {
    facts.notable_paths.iter().any(|path| {
        let path = path.to_lowercase().replace('\\', "/");
        fragments.iter().any(|fragment| path.contains(fragment))
    })
}

const FRAMEWORK_BENEFITS: &[&str] = &[
    "Proven framework with strong community",
    "Type safety and validation",
    "Fast development velocity",
];
const FRAMEWORK_CONSIDERATIONS: &[&str] = &[
    "Learning curve for new developers",
    "Framework-specific conventions",
];
const TESTING_BENEFITS: &[&str] = &[
    "Automated quality checks",
    "Regression prevention",
    "Confidence in deployments",
];
const TESTING_CONSIDERATIONS: &[&str] = &["Test maintenance overhead", "Coverage goals and standards"];
const VALIDATION_BENEFITS: &[&str] = &[
    "Type safety at runtime",
    "Data quality enforcement",
    "Self-documenting schemas",
];
const VALIDATION_CONSIDERATIONS: &[&str] = &[
    "Performance impact of validation",
    "Schema evolution management",
];
const INTEGRATION_BENEFITS: &[&str] = &[
    "Proven integration pattern",
    "Enterprise-grade capabilities",
    "Scalable service",
];
const AZURE_CONSIDERATIONS: &[&str] = &["Authentication management", "Rate limiting", "Cost optimization"];
const SERVICE_CONSIDERATIONS: &[&str] = &["Authentication management", "Rate limiting", "Vendor dependency"];
const RESILIENCE_CONSIDERATIONS: &[&str] = &["Tuning thresholds per dependency", "Observability of state changes"];

static REGISTRY: &[Detector] = &[
    Detector {
        name: "Serverless Architecture",
        kind: PatternKind::Architectural,
        ecosystem: Some("Azure Functions"),
        description: "Event-driven serverless compute for scalable, cost-effective execution",
        benefits: &[
            "No infrastructure management",
            "Pay-per-execution pricing model",
            "Auto-scaling based on demand",
        ],
        considerations: &["Cold start latency", "Execution time limits", "State management complexity"],
        detect: |facts| any_dependency(facts, &["azure-functions", "aws-lambda"]),
    },
    Detector {
        name: "Event-Driven Architecture",
        kind: PatternKind::Architectural,
        ecosystem: None,
        description: "Asynchronous event-based communication for decoupled, scalable systems",
        benefits: &["Loose coupling between components", "Asynchronous processing"],
        considerations: &["Event schema management", "Eventual consistency", "Debugging complexity"],
        detect: |facts| any_dependency(facts, &["event", "webhook"]),
    },
    Detector {
        name: "Batch Processing",
        kind: PatternKind::Architectural,
        ecosystem: None,
        description: "Scheduled or batched background processing",
        benefits: &["Predictable resource usage", "Simple operational model"],
        considerations: &["Latency between runs", "Failure recovery for partial batches"],
        detect: |facts| any_dependency(facts, &["schedule", "cron", "batch"]),
    },
    Detector {
        name: "RESTful API Pattern",
        kind: PatternKind::Architectural,
        ecosystem: None,
        description: "HTTP-based RESTful APIs for service integration and data exposure",
        benefits: &["Standard HTTP methods and status codes", "Stateless communication", "Wide client support"],
        considerations: &["Authentication and authorization", "Rate limiting requirements", "API versioning strategy"],
        detect: |facts| {
            matches!(facts.language.as_deref(), Some("TypeScript" | "Python" | "C#"))
                && any_dependency(facts, &["express", "fastapi"])
        },
    },
    Detector {
        name: "FastAPI Web Framework",
        kind: PatternKind::Design,
        ecosystem: None,
        description: "RESTful API development using FastAPI",
        benefits: FRAMEWORK_BENEFITS,
        considerations: FRAMEWORK_CONSIDERATIONS,
        detect: |facts| any_dependency(facts, &["fastapi"]),
    },
    Detector {
        name: "Flask Web Framework",
        kind: PatternKind::Design,
        ecosystem: None,
        description: "RESTful API development using Flask",
        benefits: FRAMEWORK_BENEFITS,
        considerations: FRAMEWORK_CONSIDERATIONS,
        detect: |facts| any_dependency(facts, &["flask"]),
    },
    Detector {
        name: "Express.js Web Framework",
        kind: PatternKind::Design,
        ecosystem: None,
        description: "RESTful API development using Express.js",
        benefits: FRAMEWORK_BENEFITS,
        considerations: FRAMEWORK_CONSIDERATIONS,
        detect: |facts| any_dependency(facts, &["express"]),
    },
    Detector {
        name: "Django Web Framework",
        kind: PatternKind::Design,
        ecosystem: None,
        description: "Web application development using Django",
        benefits: FRAMEWORK_BENEFITS,
        considerations: FRAMEWORK_CONSIDERATIONS,
        detect: |facts| any_dependency(facts, &["django"]),
    },
    Detector {
        name: "pytest Testing Framework",
        kind: PatternKind::Design,
        ecosystem: None,
        description: "Automated testing using pytest",
        benefits: TESTING_BENEFITS,
        considerations: TESTING_CONSIDERATIONS,
        detect: |facts| any_dependency(facts, &["pytest"]),
    },
    Detector {
        name: "Jest Testing Framework",
        kind: PatternKind::Design,
        ecosystem: None,
        description: "Automated testing using Jest",
        benefits: TESTING_BENEFITS,
        considerations: TESTING_CONSIDERATIONS,
        detect: |facts| any_dependency(facts, &["jest"]),
    },
    Detector {
        name: "unittest Testing Framework",
        kind: PatternKind::Design,
        ecosystem: None,
        description: "Automated testing using unittest",
        benefits: TESTING_BENEFITS,
        considerations: TESTING_CONSIDERATIONS,
        detect: |facts| any_dependency(facts, &["unittest"]),
    },
    Detector {
        name: "Pydantic Type Validation",
        kind: PatternKind::Design,
        ecosystem: None,
        description: "Runtime type validation and data modeling using Pydantic",
        benefits: VALIDATION_BENEFITS,
        considerations: VALIDATION_CONSIDERATIONS,
        detect: |facts| any_dependency(facts, &["pydantic"]),
    },
    Detector {
        name: "Joi Type Validation",
        kind: PatternKind::Design,
        ecosystem: None,
        description: "Runtime type validation and data modeling using Joi",
        benefits: VALIDATION_BENEFITS,
        considerations: VALIDATION_CONSIDERATIONS,
        detect: |facts| any_dependency(facts, &["joi"]),
    },
    Detector {
        name: "Azure Key Vault Integration Pattern",
        kind: PatternKind::Integration,
        ecosystem: Some("Azure Key Vault"),
        description: "Centralized secret management with Azure Key Vault",
        benefits: &["Proven integration pattern", "Enterprise-grade capabilities", "Centralized management"],
        considerations: AZURE_CONSIDERATIONS,
        detect: |facts| any_dependency(facts, &["azure-keyvault", "keyvault"]),
    },
    Detector {
        name: "Azure Storage Integration Pattern",
        kind: PatternKind::Integration,
        ecosystem: Some("Azure Storage"),
        description: "Blob and table storage through Azure Storage",
        benefits: INTEGRATION_BENEFITS,
        considerations: AZURE_CONSIDERATIONS,
        detect: |facts| any_dependency(facts, &["azure-storage", "blob"]),
    },
    Detector {
        name: "Azure OpenAI Integration Pattern",
        kind: PatternKind::Integration,
        ecosystem: Some("Azure OpenAI"),
        description: "Language-model capabilities through Azure OpenAI",
        benefits: INTEGRATION_BENEFITS,
        considerations: AZURE_CONSIDERATIONS,
        detect: |facts| any_dependency(facts, &["azure-openai", "openai"]),
    },
    Detector {
        name: "GitHub Integration Pattern",
        kind: PatternKind::Integration,
        ecosystem: None,
        description: "Automation against the GitHub API",
        benefits: INTEGRATION_BENEFITS,
        considerations: SERVICE_CONSIDERATIONS,
        detect: |facts| exact_dependency(facts, &["github", "octokit"]),
    },
    Detector {
        name: "Notion Integration Pattern",
        kind: PatternKind::Integration,
        ecosystem: None,
        description: "Knowledge-base synchronization with Notion",
        benefits: INTEGRATION_BENEFITS,
        considerations: SERVICE_CONSIDERATIONS,
        detect: |facts| {
            facts.name.to_lowercase().contains("notion")
                || facts
                    .description
                    .as_deref()
                    .map(|text| text.to_lowercase().contains("notion"))
                    .unwrap_or(false)
        },
    },
    Detector {
        name: "Agent Workflows",
        kind: PatternKind::Design,
        ecosystem: None,
        description: "Autonomous agent definitions checked into the repository",
        benefits: &["Repeatable automation", "Shared team workflows"],
        considerations: &["Agent prompt maintenance"],
        detect: |facts| facts.tooling.agent_count > 0,
    },
    Detector {
        name: "Integration Server Configuration",
        kind: PatternKind::Integration,
        ecosystem: None,
        description: "External-integration servers configured for automation tooling",
        benefits: &["Tooling reaches external systems directly"],
        considerations: &["Credential management for each server"],
        detect: |facts| facts.tooling.integration_server_count > 0,
    },
    Detector {
        name: "Containerized Deployment",
        kind: PatternKind::Architectural,
        ecosystem: None,
        description: "Container images as the deployment unit",
        benefits: &["Reproducible environments", "Portable deployments"],
        considerations: &["Image size and patching cadence"],
        detect: |facts| any_path(facts, &["dockerfile", "docker-compose", "compose.yaml", "compose.yml"]),
    },
    Detector {
        name: "Infrastructure as Code",
        kind: PatternKind::Architectural,
        ecosystem: None,
        description: "Declarative infrastructure definitions versioned with the code",
        benefits: &["Reviewable infrastructure changes", "Repeatable environments"],
        considerations: &["State management", "Drift detection"],
        detect: |facts| any_path(facts, &[".bicep", ".tf", "terraform/", "arm-templates/"]),
    },
    Detector {
        name: "Circuit Breaker",
        kind: PatternKind::Design,
        ecosystem: None,
        description: "Stops calling a failing dependency until it recovers",
        benefits: &["Prevents cascading failures", "Fast failure under outage"],
        considerations: RESILIENCE_CONSIDERATIONS,
        detect: |facts| any_path(facts, &["circuit-breaker", "circuit_breaker", "circuitbreaker"]),
    },
    Detector {
        name: "Retry with Backoff",
        kind: PatternKind::Design,
        ecosystem: None,
        description: "Retries transient failures with increasing delays",
        benefits: &["Resilience to transient faults"],
        considerations: RESILIENCE_CONSIDERATIONS,
        detect: |facts| any_path(facts, &["retry-with-backoff", "retry_with_backoff", "backoff"]),
    },
    Detector {
        name: "Saga",
        kind: PatternKind::Architectural,
        ecosystem: None,
        description: "Long-running transactions as compensating steps",
        benefits: &["Consistency without distributed locks"],
        considerations: &["Compensation logic complexity"],
        detect: |facts| any_path(facts, &["saga"]),
    },
    Detector {
        name: "Event Sourcing",
        kind: PatternKind::Architectural,
        ecosystem: None,
        description: "State derived from an append-only event log",
        benefits: &["Full audit history", "Temporal queries"],
        considerations: &["Event schema evolution", "Projection rebuild cost"],
        detect: |facts| any_path(facts, &["event-sourcing", "event_sourcing", "eventsourcing", "event-store"]),
    },
    Detector {
        name: "Bulkhead",
        kind: PatternKind::Design,
        ecosystem: None,
        description: "Isolated resource pools per dependency",
        benefits: &["Failure isolation between workloads"],
        considerations: RESILIENCE_CONSIDERATIONS,
        detect: |facts| any_path(facts, &["bulkhead"]),
    },
];

/// The built-in detectors in evaluation order.
pub fn registry() -> &'static [Detector] {
    REGISTRY
}

/// Look up a built-in detector by pattern name.
pub fn find(name: &str) -> Option<&'static Detector> {
    REGISTRY.iter().find(|detector| detector.name == name)
}

/// Every built-in observation for one repository, in registry order.
pub fn observe_all(facts: &RepositoryFacts) -> Vec<PatternObservation> {
    REGISTRY.iter().filter_map(|detector| detector.observe(facts)).collect()
}

/// Shared-dependency observations: one per distinct lower-cased dependency name.
pub fn shared_dependency_observations(facts: &RepositoryFacts) -> Vec<PatternObservation> {
    let mut names = facts
        .dependencies
        .iter()
        .map(|dependency| dependency.name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>();
    names.sort();
    names.dedup();

    names
        .into_iter()
        .map(|name| {
            let ecosystem = if name.contains("azure") {
                Some("Azure SDK".to_string())
            } else if name.contains("microsoft") {
                Some("Microsoft Library".to_string())
            } else {
                None
            };
            PatternObservation {
                name: format!("Shared Dependency: {name}"),
                kind: PatternKind::Integration,
                ecosystem,
                description: format!("Dependency `{name}` shared across repositories"),
                benefits: vec!["Proven across multiple repositories".to_string()],
                considerations: vec!["Version consistency across repos".to_string()],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{Dependency, ToolingFacts};

    fn with_deps(names: &[&str]) -> RepositoryFacts {
        let mut facts = RepositoryFacts::named("demo");
        facts.dependencies = names.iter().map(|name| Dependency::new(*name, "npm")).collect();
        facts
    }

    fn hits(facts: &RepositoryFacts) -> Vec<String> {
        observe_all(facts).into_iter().map(|o| o.name).collect()
    }

    #[test]
    fn registry_names_are_unique() {
        let mut names = registry().iter().map(|d| d.name).collect::<Vec<_>>();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn serverless_detector_matches_function_runtimes() {
        let detector = find("Serverless Architecture").expect("detector");
        assert!(detector.observe(&with_deps(&["azure-functions"])).is_some());
        assert!(detector.observe(&with_deps(&["@types/aws-lambda"])).is_some());
        assert!(detector.observe(&with_deps(&["express"])).is_none());

        let observation = detector.observe(&with_deps(&["Azure-Functions"])).expect("hit");
        assert_eq!(observation.kind, PatternKind::Architectural);
        assert_eq!(observation.ecosystem.as_deref(), Some("Azure Functions"));
    }

    #[test]
    fn azure_functions_only_repository_hits_serverless_alone() {
        assert_eq!(hits(&with_deps(&["azure-functions"])), vec!["Serverless Architecture"]);
    }

    #[test]
    fn rest_api_requires_supported_language() {
        let mut facts = with_deps(&["express"]);
        assert!(!hits(&facts).contains(&"RESTful API Pattern".to_string()));
        facts.language = Some("TypeScript".to_string());
        let names = hits(&facts);
        assert!(names.contains(&"RESTful API Pattern".to_string()));
        assert!(names.contains(&"Express.js Web Framework".to_string()));
    }

    #[test]
    fn testing_and_validation_detectors() {
        let names = hits(&with_deps(&["pytest-cov", "pydantic", "jest"]));
        assert!(names.contains(&"pytest Testing Framework".to_string()));
        assert!(names.contains(&"Jest Testing Framework".to_string()));
        assert!(names.contains(&"Pydantic Type Validation".to_string()));
    }

    #[test]
    fn github_integration_requires_exact_name() {
        assert!(hits(&with_deps(&["Octokit"])).contains(&"GitHub Integration Pattern".to_string()));
        assert!(!hits(&with_deps(&["github-slugger"])).contains(&"GitHub Integration Pattern".to_string()));
    }

    #[test]
    fn notion_detector_reads_name_and_description() {
        let mut facts = RepositoryFacts::named("sync-service");
        facts.description = Some("Pushes reports into Notion".to_string());
        assert!(hits(&facts).contains(&"Notion Integration Pattern".to_string()));
    }

    #[test]
    fn capability_and_path_detectors() {
        let mut facts = RepositoryFacts::named("ops");
        facts.tooling = ToolingFacts {
            has_config_dir: true,
            agent_count: 2,
            ..ToolingFacts::default()
        };
        facts.notable_paths = vec![
            "infra\\main.bicep".to_string(),
            "src/patterns/circuit-breaker.ts".to_string(),
            "Dockerfile".to_string(),
        ];
        let names = hits(&facts);
        assert_eq!(
            names,
            vec![
                "Agent Workflows",
                "Containerized Deployment",
                "Infrastructure as Code",
                "Circuit Breaker",
            ]
        );
    }

    #[test]
    fn shared_dependencies_are_deduplicated_and_tagged() {
        let facts = with_deps(&["Azure-Identity", "azure-identity", "lodash", ""]);
        let observations = shared_dependency_observations(&facts);
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].name, "Shared Dependency: azure-identity");
        assert_eq!(observations[0].ecosystem.as_deref(), Some("Azure SDK"));
        assert_eq!(observations[1].ecosystem, None);
    }
}
