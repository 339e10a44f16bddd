//! Local-checkout inspection: derives [`RepositoryFacts`] from a working tree.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tokei::{Config, LanguageType};

use crate::error::Result;
use crate::facts::{RepositoryFacts, ToolingFacts};
use crate::fs::FileSystem;
use crate::manifest::ManifestKind;

const TOOLING_DIR: &str = ".claude";
const MEMORY_FILE: &str = "claude.md";
const INTEGRATION_CONFIG_FILES: [&str; 2] = [".claude.json", ".mcp.json"];

/// Inspects a local checkout using `tokei` and path heuristics.
pub struct CheckoutInspector<F: FileSystem> {
    fs: F,
    config: Config,
}

impl<F: FileSystem> CheckoutInspector<F> {
    /// Create a new inspector with default `tokei` configuration.
    pub fn new(fs: F) -> Self {
        Self {
            fs,
            config: Config::default(),
        }
    }

    /// Create a new inspector with a custom `tokei` configuration.
    pub fn with_config(fs: F, config: Config) -> Self {
        Self { fs, config }
    }

    /// Derive facts from the checkout at `root`.
    ///
    /// Temporal facts and commit activity are left unknown; the caller owns
    /// history access.
    pub fn inspect(&self, root: &Path) -> Result<RepositoryFacts> {
        let files = self.fs.list_files(root)?;
        let relative = files
            .iter()
            .map(|path| path.strip_prefix(root).unwrap_or(path).to_path_buf())
            .collect::<Vec<_>>();

        let mut facts = RepositoryFacts::named(
            root.file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default(),
        );
        facts.language = self.primary_language(&files);
        facts.has_readme = relative.iter().any(|path| is_top_level_readme(path));
        facts.has_extra_docs = relative
            .iter()
            .any(|path| is_doc_file(path) && !is_top_level_readme(path));
        facts.has_tests = relative
            .iter()
            .any(|path| is_code_file(path) && is_test_file(path));
        facts.has_ci = relative.iter().any(|path| is_ci_file(path));
        facts.tooling = self.tooling(root, &relative);
        facts.notable_paths = relative
            .iter()
            .map(|path| path.to_string_lossy().replace('\\', "/"))
            .collect();

        for (path, kind) in files
            .iter()
            .filter_map(|path| ManifestKind::from_path(path).map(|kind| (path, kind)))
        {
            let parsed = self
                .fs
                .read_to_string(path)
                .and_then(|contents| kind.parse(&contents));
            match parsed {
                Ok(dependencies) => facts.dependencies.extend(dependencies),
                Err(err) => warn!("skipping manifest {}: {err}", path.display()),
            }
        }

        debug!(
            "inspected {}: {} files, {} dependencies",
            root.display(),
            files.len(),
            facts.dependencies.len()
        );
        Ok(facts)
    }

    /// Language with the most lines of code, by `tokei` classification.
    pub fn primary_language(&self, files: &[PathBuf]) -> Option<String> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for path in files {
            let Some(language) = LanguageType::from_path(path, &self.config) else {
                continue;
            };
            if !is_code_language(language) {
                continue;
            }
            let Ok(contents) = self.fs.read_to_string(path) else {
                debug!("unreadable source file {}", path.display());
                continue;
            };
            let lines = contents.lines().count();
            if lines > 0 {
                *counts.entry(language.to_string()).or_insert(0) += lines;
            }
        }
        counts
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
            .map(|(language, _)| language)
    }

    fn tooling(&self, root: &Path, relative: &[PathBuf]) -> ToolingFacts {
        let mut tooling = ToolingFacts {
            has_config_dir: relative.iter().any(|path| path.starts_with(TOOLING_DIR)),
            has_memory_file: relative.iter().any(|path| {
                path.components().count() == 1
                    && path
                        .to_str()
                        .map(|name| name.eq_ignore_ascii_case(MEMORY_FILE))
                        .unwrap_or(false)
            }),
            ..ToolingFacts::default()
        };
        tooling.agent_count = count_markdown_in(relative, &[TOOLING_DIR, "agents"]);
        tooling.command_count = count_markdown_in(relative, &[TOOLING_DIR, "commands"]);

        let mut servers = BTreeSet::new();
        for name in INTEGRATION_CONFIG_FILES {
            let path = root.join(name);
            if !self.fs.is_file(&path) {
                continue;
            }
            match self.fs.read_to_string(&path) {
                Ok(contents) => servers.extend(integration_servers(&contents)),
                Err(err) => warn!("unreadable {}: {err}", path.display()),
            }
        }
        tooling.integration_server_count = servers.len() as u32;
        tooling
    }
}

/// Server names declared under any `mcpServers`-like key of a JSON config.
pub fn integration_servers(contents: &str) -> BTreeSet<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(contents) else {
        warn!("integration config is not valid JSON");
        return BTreeSet::new();
    };
    let Some(object) = value.as_object() else {
        return BTreeSet::new();
    };
    object
        .iter()
        .filter(|(key, _)| key.to_lowercase().contains("mcpservers"))
        .filter_map(|(_, servers)| servers.as_object())
        .flat_map(|servers| servers.keys().cloned())
        .collect()
}

fn count_markdown_in(paths: &[PathBuf], prefix: &[&str]) -> u32 {
    let prefix = prefix.iter().collect::<PathBuf>();
    paths
        .iter()
        .filter(|path| path.parent() == Some(prefix.as_path()))
        .filter(|path| extension(path) == "md")
        .count() as u32
}

fn is_code_language(language: LanguageType) -> bool {
    !matches!(
        language,
        LanguageType::Markdown
            | LanguageType::Json
            | LanguageType::Yaml
            | LanguageType::Toml
            | LanguageType::Text
            | LanguageType::Xml
            | LanguageType::Ini
    )
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_lowercase())
        .unwrap_or_default()
}

fn is_top_level_readme(path: &Path) -> bool {
    let name = file_name(path);
    path.components().count() == 1 && (name == "readme" || name.starts_with("readme."))
}

fn is_code_file(path: &Path) -> bool {
    matches!(
        extension(path).as_str(),
        "rs" | "py"
            | "js"
            | "jsx"
            | "ts"
            | "tsx"
            | "go"
            | "java"
            | "kt"
            | "cs"
            | "rb"
            | "php"
            | "swift"
    )
}

fn is_doc_file(path: &Path) -> bool {
    let name = file_name(path);
    if name == "readme" || name.starts_with("readme.") {
        return true;
    }
    if path.starts_with(TOOLING_DIR) {
        return false;
    }
    if path_components_match(path, &["docs", "documentation"]) {
        return true;
    }
    matches!(extension(path).as_str(), "md" | "mdx" | "rst" | "adoc")
        && name != "changelog.md"
        && name != MEMORY_FILE
}

fn is_test_file(path: &Path) -> bool {
    if path_components_match(path, &["test", "tests", "__tests__", "spec", "specs"]) {
        return true;
    }
    let name = file_name(path);
    if name.contains(".test.") || name.contains(".spec.") {
        return true;
    }
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.to_lowercase())
        .unwrap_or_default();
    stem.starts_with("test_") || stem.ends_with("_test") || stem.ends_with("_spec")
}

fn is_ci_file(path: &Path) -> bool {
    let name = file_name(path);
    path.starts_with(".github/workflows")
        || path.starts_with(".circleci")
        || name == ".gitlab-ci.yml"
        || name == "azure-pipelines.yml"
        || name == "jenkinsfile"
}

fn path_components_match(path: &Path, segments: &[&str]) -> bool {
    path.components().any(|component| {
        let segment = component.as_os_str().to_string_lossy().to_lowercase();
        segments.iter().any(|target| *target == segment)
    })
}
