//! Declarative link manifest: named sources and the targets linked to them.
//!
//! ```json
//! {
//!   "sources": { "agents": "agents", "skills": ".ai_agents/skills" },
//!   "targets": [
//!     { "source": "agents", "path": "~/.claude/agents" },
//!     { "source": "skills", "path": "~/.codex/skills", "optional": true }
//!   ]
//! }
//! ```
//!
//! A `.toml` file with the same shape (`[sources]` and `[[targets]]`) is also
//! accepted.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;

/// One link to create: `path` becomes a link to the source named `source`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TargetSpec {
    /// Key into [`LinkManifest::sources`].
    pub source: String,
    /// Link location; may start with `~`.
    pub path: String,
    /// Optional targets never displace a foreign occupant and never abort
    /// the run.
    #[serde(default, deserialize_with = "null_as_false")]
    pub optional: bool,
}

/// Parsed manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkManifest {
    /// Source key to path relative to the dotfiles root. Keys mapped to
    /// `null` are dropped, so targets naming them report an unknown source.
    #[serde(deserialize_with = "drop_null_sources")]
    pub sources: BTreeMap<String, String>,
    /// Targets in declaration order.
    pub targets: Vec<TargetSpec>,
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

fn drop_null_sources<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error> {
    let raw = BTreeMap::<String, Option<String>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, rel)| rel.map(|rel| (key, rel)))
        .collect())
}

impl LinkManifest {
    /// Resolve the source for `spec` against `root`.
    ///
    /// Returns `None` when the key is unknown or maps to an empty path.
    #[must_use]
    pub fn source_path(&self, spec: &TargetSpec, root: &Path) -> Option<PathBuf> {
        self.sources
            .get(&spec.source)
            .filter(|rel| !rel.is_empty())
            .map(|rel| root.join(rel))
    }
}

/// Manifest file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn for_path(path: &Path) -> Self {
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
        {
            Self::Toml
        } else {
            Self::Json
        }
    }
}

/// Load and validate the manifest at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read,
/// [`ConfigError::Parse`] if it is not valid JSON/TOML, and
/// [`ConfigError::InvalidManifest`] if `sources` or `targets` is missing or
/// `targets` is not a list.
pub fn load(path: &Path) -> Result<LinkManifest, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content, Format::for_path(path), path)
}

fn parse(content: &str, format: Format, path: &Path) -> Result<LinkManifest, ConfigError> {
    let parse_error = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };
    let value: serde_json::Value = match format {
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?,
        Format::Toml => {
            let table: toml::Value =
                toml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
            serde_json::to_value(table).map_err(|e| parse_error(e.to_string()))?
        }
    };

    let invalid = |reason: &str| ConfigError::InvalidManifest {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };
    match value.get("sources") {
        Some(serde_json::Value::Object(_)) => {}
        Some(_) => return Err(invalid("'sources' must be a table of name to path")),
        None => return Err(invalid("missing 'sources'")),
    }
    match value.get("targets") {
        Some(serde_json::Value::Array(_)) => {}
        Some(_) => return Err(invalid("'targets' must be a list")),
        None => return Err(invalid("missing 'targets'")),
    }

    serde_json::from_value(value).map_err(|e| invalid(&e.to_string()))
}
