//! Seams for materializing repository facts.

use std::path::{Path, PathBuf};

use log::warn;

use crate::error::{PortfolioError, Result};
use crate::facts::RepositoryFacts;
use crate::fs::FileSystem;
use crate::portfolio::CorpusEntry;

/// Produces facts for a repository identifier.
#[cfg_attr(test, mockall::automock)]
pub trait FactsProvider {
    /// Fetch facts for one repository.
    fn fetch(&self, id: &str) -> Result<RepositoryFacts>;
}

/// Fetch every identifier, turning failures into unavailable entries.
pub fn collect_corpus<P, I, S>(provider: &P, ids: I) -> Vec<CorpusEntry>
where
    P: FactsProvider + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ids.into_iter()
        .map(|id| {
            let id = id.as_ref();
            match provider.fetch(id) {
                Ok(facts) => CorpusEntry::Available(facts),
                Err(err) => {
                    warn!("facts unavailable for {id}: {err}");
                    CorpusEntry::Unavailable {
                        repository: id.to_string(),
                        reason: unavailable_reason(err),
                    }
                }
            }
        })
        .collect()
}

fn unavailable_reason(err: PortfolioError) -> String {
    match err {
        PortfolioError::Unavailable { reason, .. } => reason,
        other => other.to_string(),
    }
}

/// Reads `<dir>/<id>.json` fact documents.
pub struct JsonFactsProvider<F: FileSystem> {
    fs: F,
    dir: PathBuf,
}

impl<F: FileSystem> JsonFactsProvider<F> {
    /// Create a provider rooted at `dir`.
    pub fn new(fs: F, dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            dir: dir.into(),
        }
    }

    /// Identifiers of every fact document in the directory, sorted.
    pub fn ids(&self) -> Result<Vec<String>> {
        let mut ids = self
            .fs
            .list_files(&self.dir)?
            .into_iter()
            .filter(|path| path.parent() == Some(self.dir.as_path()))
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .collect::<Vec<_>>();
        ids.sort();
        Ok(ids)
    }
}

impl<F: FileSystem> FactsProvider for JsonFactsProvider<F> {
    fn fetch(&self, id: &str) -> Result<RepositoryFacts> {
        let path = self.dir.join(format!("{id}.json"));
        if !self.fs.is_file(&path) {
            return Err(PortfolioError::unavailable(id, "no facts document"));
        }
        let contents = self.fs.read_to_string(&path)?;
        let mut facts: RepositoryFacts = serde_json::from_str(&contents)
            .map_err(|err| PortfolioError::unavailable(id, format!("malformed facts: {err}")))?;
        if facts.name.trim().is_empty() {
            facts.name = id.to_string();
        }
        Ok(facts)
    }
}

/// Load a facts file holding either a JSON array or a single object.
///
/// Each record is decoded on its own; a malformed record becomes an
/// unavailable entry named after its `name` field or array index.
pub fn load_facts_file<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<Vec<CorpusEntry>> {
    let contents = fs.read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;
    let records = match value {
        serde_json::Value::Array(records) => records,
        record => vec![record],
    };

    Ok(records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let repository = record
                .get("name")
                .and_then(|name| name.as_str())
                .filter(|name| !name.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}[{index}]", path.display()));
            match serde_json::from_value::<RepositoryFacts>(record) {
                Ok(facts) => CorpusEntry::Available(facts),
                Err(err) => {
                    warn!("malformed facts record {repository}: {err}");
                    CorpusEntry::Unavailable {
                        repository,
                        reason: format!("malformed facts: {err}"),
                    }
                }
            }
        })
        .collect())
}
