//! Agent run models.
//!
//! A run is one invocation of a server-side agent against an uploaded asset.
//! It is created by the run-agent call, changes state only through polling,
//! and is terminal on success or failure.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::agent::AgentId;
use crate::asset::FileId;

/// Server-assigned identifier of an agent run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RunId(pub String);

impl RunId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RunId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RunId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Run processing status as reported by the API.
///
/// `queued` and `running` are accepted as wire aliases of their canonical
/// names; anything outside this set is a deserialization error rather than
/// a state the poller would spin on forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Run is queued waiting to start
    #[default]
    #[serde(alias = "queued")]
    Pending,
    /// Run is actively being processed
    #[serde(alias = "running")]
    Processing,
    /// Run completed successfully
    Success,
    /// Run failed with an error
    Failed,
}

impl RunStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Pending => "pending",
            RunStatus::Processing => "processing",
            RunStatus::Success => "success",
            RunStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more polling expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Success | RunStatus::Failed)
    }

    /// Check if the run finished successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Success)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One poll's view of a run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RunSnapshot {
    /// Current run status
    pub status: RunStatus,
    /// Progress percentage (0-100), when the server reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f32>,
    /// Human-readable step description, when the server reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
}

impl RunSnapshot {
    /// Check if the run is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// One-line status summary for logs.
    pub fn summary(&self) -> String {
        match &self.status_message {
            Some(msg) if !msg.is_empty() => format!("{} - {}", self.status, msg),
            _ => self.status.to_string(),
        }
    }
}

/// What drives a run: an existing agent, or a prompt Mosaic builds an
/// agent from on the fly. The two are mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunTarget {
    /// Run a pre-existing agent by id
    Agent(AgentId),
    /// Let Mosaic generate an agent from a free-text prompt
    Prompt(String),
}

/// A run request: which asset to process and what should process it.
#[derive(Debug, Clone)]
pub struct RunSpec {
    /// Asset to run against
    pub file_id: FileId,
    /// Agent or prompt
    pub target: RunTarget,
    /// Let the server pick parameters automatically
    pub auto: bool,
    /// Extra agent parameters, passed through verbatim
    pub parameters: Option<serde_json::Value>,
}

impl RunSpec {
    /// Run an existing agent against an asset.
    pub fn agent(file_id: FileId, agent_id: AgentId) -> Self {
        Self {
            file_id,
            target: RunTarget::Agent(agent_id),
            auto: true,
            parameters: None,
        }
    }

    /// Run a prompt-generated agent against an asset.
    pub fn prompt(file_id: FileId, prompt: impl Into<String>) -> Self {
        Self {
            file_id,
            target: RunTarget::Prompt(prompt.into()),
            auto: true,
            parameters: None,
        }
    }

    /// Set the auto flag.
    pub fn with_auto(mut self, auto: bool) -> Self {
        self.auto = auto;
        self
    }

    /// Attach extra agent parameters.
    pub fn with_parameters(mut self, parameters: serde_json::Value) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_terminal_states() {
        assert!(!RunStatus::Pending.is_terminal());
        assert!(!RunStatus::Processing.is_terminal());
        assert!(RunStatus::Success.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert!(RunStatus::Success.is_success());
        assert!(!RunStatus::Failed.is_success());
    }

    #[test]
    fn test_status_wire_aliases() {
        let s: RunStatus = serde_json::from_str("\"queued\"").unwrap();
        assert_eq!(s, RunStatus::Pending);

        let s: RunStatus = serde_json::from_str("\"running\"").unwrap();
        assert_eq!(s, RunStatus::Processing);

        let s: RunStatus = serde_json::from_str("\"success\"").unwrap();
        assert_eq!(s, RunStatus::Success);

        // Unknown statuses fail loudly instead of polling forever
        assert!(serde_json::from_str::<RunStatus>("\"exploded\"").is_err());
    }

    #[test]
    fn test_snapshot_summary() {
        let snap: RunSnapshot = serde_json::from_str(
            r#"{"status":"processing","progress":42.0,"status_message":"rendering"}"#,
        )
        .unwrap();
        assert!(!snap.is_terminal());
        assert_eq!(snap.summary(), "processing - rendering");

        let bare: RunSnapshot = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert!(bare.is_terminal());
        assert_eq!(bare.summary(), "success");
    }

    #[test]
    fn test_run_spec_constructors() {
        let spec = RunSpec::agent(FileId::from("file-1"), AgentId::from("agent-1"));
        assert!(spec.auto);
        assert_eq!(spec.target, RunTarget::Agent(AgentId::from("agent-1")));

        let spec = RunSpec::prompt(FileId::from("file-1"), "remove silences")
            .with_auto(false)
            .with_parameters(serde_json::json!({"language": "en"}));
        assert!(!spec.auto);
        assert!(spec.parameters.is_some());
    }
}
