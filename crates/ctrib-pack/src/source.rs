//! Source manifest: named upstream sources mapped to local payload files.
//!
//! The fetch job that talks to the government API is a separate
//! collaborator; what it leaves behind is a set of dump files. A manifest
//! names the two the engine consumes (`classTrib` rules, `anexos` rows)
//! so operators can point the CLI at one file instead of repeating paths.
//!
//! ```yaml
//! label: cff-2026-07
//! rules: dumps/classtrib.json
//! annexes: dumps/anexos.json
//! as_of: 2026-07-01
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PackResult;
use crate::parser;

/// A YAML manifest describing one ingestion's input files.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceManifest {
    /// Operator-facing label for this data set.
    #[serde(default)]
    pub label: Option<String>,

    /// Path to the classification rules payload (classTrib dump).
    pub rules: PathBuf,

    /// Path to the annex table payload (anexos dump).
    pub annexes: PathBuf,

    /// Reference date the data set was captured for.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl SourceManifest {
    /// Load a manifest from a YAML file, resolving relative payload paths
    /// against the manifest's own directory.
    pub fn load(path: &Path) -> PackResult<Self> {
        let manifest: Self = parser::load_yaml_typed(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(manifest.resolved_against(base))
    }

    /// Return a copy with relative paths joined onto `base`.
    pub fn resolved_against(mut self, base: &Path) -> Self {
        if self.rules.is_relative() {
            self.rules = base.join(&self.rules);
        }
        if self.annexes.is_relative() {
            self.annexes = base.join(&self.annexes);
        }
        self
    }
}
