//! Build context: the asset identity table and run statistics.
//!
//! One `BuildContext` is created per pipeline run and threaded explicitly
//! through the stages. Style/script transforms populate the identity table;
//! the reference rewriter and manifest builder only read it after those
//! transforms have completed (the orchestrator enforces the phase barrier).

use dashmap::DashMap;

use super::BuildStats;

/// Run-scoped mutable state, owned by the orchestrator.
#[derive(Debug, Default)]
pub struct BuildContext {
    /// Output-relative path → 8-char hex content digest.
    versions: DashMap<String, String>,
    /// Transform statistics for the final report.
    pub stats: BuildStats,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the content digest for an asset.
    ///
    /// A path is inserted at most once per run; a second insert for the
    /// same path is ignored.
    pub fn record_version(&self, rel: &str, hash: String) {
        self.versions.entry(rel.to_string()).or_insert(hash);
    }

    /// Look up the recorded digest for an output-relative path.
    pub fn version_for(&self, rel: &str) -> Option<String> {
        self.versions.get(rel).map(|v| v.clone())
    }

    /// Digest for a path, falling back to the build version token.
    ///
    /// Requesting a path before its transform ran is not an error; the
    /// global version token stands in.
    pub fn version_or<'a>(&self, rel: &str, fallback: &'a str) -> String {
        self.version_for(rel)
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Number of hashed assets recorded this run.
    pub fn hashed_count(&self) -> usize {
        self.versions.len()
    }

    /// Identity table entries, sorted by path for deterministic output.
    pub fn sorted_versions(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self
            .versions
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        entries.sort();
        entries
    }
}
