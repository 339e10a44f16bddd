//! Dependency manifest parsing for local checkouts.

use std::path::Path;

use crate::error::{PortfolioError, Result};
use crate::facts::Dependency;

/// Supported dependency manifest formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    /// npm `package.json`.
    PackageJson,
    /// pip `requirements*.txt`.
    Requirements,
    /// PEP 621 or Poetry `pyproject.toml`.
    Pyproject,
    /// Go `go.mod`.
    GoMod,
    /// Cargo `Cargo.toml`.
    CargoToml,
}

impl ManifestKind {
    /// Detect the manifest kind from a file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_lowercase();
        match name.as_str() {
            "package.json" => Some(Self::PackageJson),
            "pyproject.toml" => Some(Self::Pyproject),
            "go.mod" => Some(Self::GoMod),
            "cargo.toml" => Some(Self::CargoToml),
            _ if name.starts_with("requirements") && name.ends_with(".txt") => {
                Some(Self::Requirements)
            }
            _ => None,
        }
    }

    /// Package manager label recorded on each dependency.
    pub fn manager(&self) -> &'static str {
        match self {
            Self::PackageJson => "npm",
            Self::Requirements | Self::Pyproject => "pip",
            Self::GoMod => "go",
            Self::CargoToml => "cargo",
        }
    }

    /// Parse manifest contents into dependencies, in declaration order.
    pub fn parse(&self, contents: &str) -> Result<Vec<Dependency>> {
        match self {
            Self::PackageJson => parse_package_json(contents),
            Self::Requirements => Ok(parse_requirements(contents, false)),
            Self::Pyproject => parse_pyproject(contents),
            Self::GoMod => Ok(parse_go_mod(contents)),
            Self::CargoToml => parse_cargo_toml(contents),
        }
    }
}

fn parse_package_json(contents: &str) -> Result<Vec<Dependency>> {
    let value: serde_json::Value = serde_json::from_str(contents)?;
    let mut dependencies = Vec::new();
    for (section, is_dev) in [("dependencies", false), ("devDependencies", true)] {
        let Some(table) = value.get(section).and_then(|v| v.as_object()) else {
            continue;
        };
        for (name, version) in table {
            let mut dependency = Dependency::new(name.clone(), "npm");
            if let Some(version) = version.as_str() {
                dependency = dependency.with_version(version);
            }
            if is_dev {
                dependency = dependency.dev();
            }
            dependencies.push(dependency);
        }
    }
    Ok(dependencies)
}

fn parse_requirements(contents: &str, is_dev: bool) -> Vec<Dependency> {
    contents
        .lines()
        .filter_map(|line| {
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() || line.starts_with('-') {
                return None;
            }
            parse_requirement(line, is_dev)
        })
        .collect()
}

/// Parse one PEP 508 requirement such as `fastapi[all]>=0.110; python_version>"3.8"`.
fn parse_requirement(spec: &str, is_dev: bool) -> Option<Dependency> {
    let spec = spec.split(';').next().unwrap_or_default().trim();
    let end = spec
        .find(|c: char| matches!(c, '=' | '<' | '>' | '!' | '~' | '[' | ' ' | '@' | '('))
        .unwrap_or(spec.len());
    let name = spec[..end].trim();
    if name.is_empty() {
        return None;
    }
    let rest = spec[end..].trim();
    let version = match rest.find(']') {
        Some(close) if rest.starts_with('[') => rest[close + 1..].trim(),
        _ => rest,
    };

    let mut dependency = Dependency::new(name, "pip");
    if !version.is_empty() {
        dependency = dependency.with_version(version);
    }
    if is_dev {
        dependency = dependency.dev();
    }
    Some(dependency)
}

fn parse_pyproject(contents: &str) -> Result<Vec<Dependency>> {
    let value: toml::Value = toml::from_str(contents).map_err(|err| {
        PortfolioError::Other(format!("invalid pyproject.toml: {err}"))
    })?;
    let mut dependencies = Vec::new();

    if let Some(project) = value.get("project") {
        collect_pep508(project.get("dependencies"), false, &mut dependencies);
        if let Some(optional) = project.get("optional-dependencies").and_then(|v| v.as_table()) {
            for group in optional.values() {
                collect_pep508(Some(group), true, &mut dependencies);
            }
        }
    }

    if let Some(poetry) = value.get("tool").and_then(|tool| tool.get("poetry")) {
        collect_table(poetry.get("dependencies"), "pip", false, &mut dependencies);
        collect_table(poetry.get("dev-dependencies"), "pip", true, &mut dependencies);
        if let Some(groups) = poetry.get("group").and_then(|v| v.as_table()) {
            for group in groups.values() {
                collect_table(group.get("dependencies"), "pip", true, &mut dependencies);
            }
        }
    }

    dependencies.retain(|dependency| !dependency.name.eq_ignore_ascii_case("python"));
    Ok(dependencies)
}

fn collect_pep508(array: Option<&toml::Value>, is_dev: bool, out: &mut Vec<Dependency>) {
    let Some(items) = array.and_then(|v| v.as_array()) else {
        return;
    };
    out.extend(
        items
            .iter()
            .filter_map(|item| item.as_str())
            .filter_map(|spec| parse_requirement(spec, is_dev)),
    );
}

fn collect_table(table: Option<&toml::Value>, manager: &str, is_dev: bool, out: &mut Vec<Dependency>) {
    let Some(table) = table.and_then(|v| v.as_table()) else {
        return;
    };
    for (name, spec) in table {
        let version = match spec {
            toml::Value::String(version) => Some(version.clone()),
            toml::Value::Table(detail) => detail
                .get("version")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            _ => None,
        };
        let mut dependency = Dependency::new(name.clone(), manager);
        if let Some(version) = version {
            dependency = dependency.with_version(version);
        }
        if is_dev {
            dependency = dependency.dev();
        }
        out.push(dependency);
    }
}

fn parse_go_mod(contents: &str) -> Vec<Dependency> {
    let mut dependencies = Vec::new();
    let mut in_block = false;

    for line in contents.lines() {
        let line = line.split("//").next().unwrap_or_default().trim();
        if in_block {
            if line == ")" {
                in_block = false;
                continue;
            }
            push_go_requirement(line, &mut dependencies);
        } else if line == "require (" || line == "require(" {
            in_block = true;
        } else if let Some(requirement) = line.strip_prefix("require ") {
            push_go_requirement(requirement, &mut dependencies);
        }
    }
    dependencies
}

fn push_go_requirement(line: &str, out: &mut Vec<Dependency>) {
    let mut parts = line.split_whitespace();
    let Some(module) = parts.next() else {
        return;
    };
    let mut dependency = Dependency::new(module, "go");
    if let Some(version) = parts.next() {
        dependency = dependency.with_version(version);
    }
    out.push(dependency);
}

fn parse_cargo_toml(contents: &str) -> Result<Vec<Dependency>> {
    let value: toml::Value = toml::from_str(contents)
        .map_err(|err| PortfolioError::Other(format!("invalid Cargo.toml: {err}")))?;
    let mut dependencies = Vec::new();
    collect_table(value.get("dependencies"), "cargo", false, &mut dependencies);
    collect_table(value.get("build-dependencies"), "cargo", false, &mut dependencies);
    collect_table(value.get("dev-dependencies"), "cargo", true, &mut dependencies);
    Ok(dependencies)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(dependencies: &[Dependency]) -> Vec<&str> {
        dependencies.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn detects_manifest_kinds() {
        assert_eq!(
            ManifestKind::from_path(Path::new("web/package.json")),
            Some(ManifestKind::PackageJson)
        );
        assert_eq!(
            ManifestKind::from_path(Path::new("requirements-dev.txt")),
            Some(ManifestKind::Requirements)
        );
        assert_eq!(ManifestKind::from_path(Path::new("README.md")), None);
    }

    #[test]
    fn parses_package_json_sections() {
        let deps = ManifestKind::PackageJson
            .parse(r#"{"dependencies": {"express": "^4.18.0"}, "devDependencies": {"jest": "29"}}"#)
            .expect("parse");
        assert_eq!(names(&deps), vec!["express", "jest"]);
        assert_eq!(deps[0].version.as_deref(), Some("^4.18.0"));
        assert!(!deps[0].is_dev);
        assert!(deps[1].is_dev);
        assert_eq!(deps[1].manager, "npm");
    }

    #[test]
    fn malformed_package_json_is_an_error() {
        assert!(ManifestKind::PackageJson.parse("{").is_err());
    }

    #[test]
    fn parses_requirements_lines() {
        let deps = ManifestKind::Requirements
            .parse("# pinned\nfastapi[all]>=0.110\n-r base.txt\npydantic==2.6 ; python_version > \"3.8\"\nrequests\n")
            .expect("parse");
        assert_eq!(names(&deps), vec!["fastapi", "pydantic", "requests"]);
        assert_eq!(deps[0].version.as_deref(), Some(">=0.110"));
        assert_eq!(deps[1].version.as_deref(), Some("==2.6"));
        assert_eq!(deps[2].version, None);
    }

    #[test]
    fn parses_pyproject_pep621_and_poetry() {
        let deps = ManifestKind::Pyproject
            .parse(
                r#"
[project]
dependencies = ["azure-functions>=1.18", "httpx"]

[project.optional-dependencies]
test = ["pytest"]

[tool.poetry.dependencies]
python = "^3.11"
flask = { version = "3.0" }
"#,
            )
            .expect("parse");
        assert_eq!(names(&deps), vec!["azure-functions", "httpx", "pytest", "flask"]);
        assert!(deps[2].is_dev);
        assert_eq!(deps[3].version.as_deref(), Some("3.0"));
    }

    #[test]
    fn parses_go_mod_require_forms() {
        let deps = ManifestKind::GoMod
            .parse(
                "module example.com/app\n\nrequire github.com/pkg/errors v0.9.1\n\nrequire (\n\tgolang.org/x/sync v0.6.0 // indirect\n)\n",
            )
            .expect("parse");
        assert_eq!(names(&deps), vec!["github.com/pkg/errors", "golang.org/x/sync"]);
        assert_eq!(deps[1].version.as_deref(), Some("v0.6.0"));
    }

    #[test]
    fn parses_cargo_tables() {
        let deps = ManifestKind::CargoToml
            .parse(
                "[dependencies]\nserde = { version = \"1\", features = [\"derive\"] }\nlog = \"0.4\"\n\n[dev-dependencies]\nmockall = \"0.12\"\n",
            )
            .expect("parse");
        assert_eq!(names(&deps), vec!["log", "serde", "mockall"]);
        assert!(deps[2].is_dev);
        assert_eq!(deps[2].manager, "cargo");
    }
}
