//! Agent catalog.
//!
//! Known agents are addressed by a short friendly name that resolves to the
//! server-side agent id. Unknown names pass through unchanged so callers can
//! always supply a raw id directly.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Server-side identifier of an editing agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AgentId(pub String);

impl AgentId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AgentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One catalog entry: friendly name, agent id, and a short description.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AgentEntry {
    /// Short name callers use to pick the agent
    pub name: String,
    /// Server-side agent id
    pub id: AgentId,
    /// What the agent does
    pub description: String,
}

/// Catalog of known agents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentCatalog {
    entries: Vec<AgentEntry>,
}

impl AgentCatalog {
    /// Catalog of the stock editing agents.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                AgentEntry {
                    name: "audio_enhance_remove_all_except_speech".to_string(),
                    id: AgentId::from("cbc580d3-8409-4bf8-b3b3-e9fe4a01ee5b"),
                    description: "Enhance speech and strip all other audio from the video"
                        .to_string(),
                },
                AgentEntry {
                    name: "remove_bad_takes".to_string(),
                    id: AgentId::from("b94b296d-7bd8-4d60-851d-ff821c0c9a9d"),
                    description: "Cut repeated or flubbed takes, keeping the best one".to_string(),
                },
                AgentEntry {
                    name: "add_captions".to_string(),
                    id: AgentId::from("b4e07fca-c963-4f0d-9d53-e979d1f026ee"),
                    description: "Burn styled captions into the video".to_string(),
                },
            ],
        }
    }

    /// Parse a catalog from a JSON array of entries.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<AgentEntry> = serde_json::from_str(s)?;
        Ok(Self { entries })
    }

    /// Load the catalog named by `MOSAIC_AGENTS_FILE`, or the built-in one
    /// when the variable is unset. A set-but-unreadable file is an error,
    /// not a silent fallback.
    pub fn from_env() -> std::io::Result<Self> {
        match std::env::var("MOSAIC_AGENTS_FILE") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)?;
                Self::from_json_str(&raw).map_err(|e| {
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("bad agents file {}: {}", path, e),
                    )
                })
            }
            Err(_) => Ok(Self::builtin()),
        }
    }

    /// Resolve a friendly name to an agent id.
    ///
    /// Names not in the catalog are treated as raw ids and returned as-is.
    pub fn resolve(&self, name_or_id: &str) -> AgentId {
        self.entries
            .iter()
            .find(|e| e.name == name_or_id)
            .map(|e| e.id.clone())
            .unwrap_or_else(|| AgentId::from(name_or_id))
    }

    /// Look up an entry by friendly name.
    pub fn get(&self, name: &str) -> Option<&AgentEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// All entries in catalog order.
    pub fn entries(&self) -> &[AgentEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = AgentCatalog::builtin();
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.resolve("remove_bad_takes").as_str(),
            "b94b296d-7bd8-4d60-851d-ff821c0c9a9d"
        );
    }

    #[test]
    fn test_resolve_passes_unknown_through() {
        let catalog = AgentCatalog::builtin();
        let id = catalog.resolve("0e63ae21-0000-4444-8888-123456789abc");
        assert_eq!(id.as_str(), "0e63ae21-0000-4444-8888-123456789abc");
    }

    #[test]
    fn test_catalog_from_json() {
        let catalog = AgentCatalog::from_json_str(
            r#"[{"name":"my_agent","id":"abc-123","description":"test agent"}]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.resolve("my_agent").as_str(), "abc-123");
        assert!(catalog.get("missing").is_none());
    }
}
