//! Tool definitions and parameter schemas.
//!
//! Each tool advertises a JSON schema for its parameters so a calling LLM
//! can fill them in without guessing.

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Parameters for `upload_video_from_local_file`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UploadLocalParams {
    /// Absolute path of the video on this machine
    pub path: String,
    /// Name to store the video under, derived from the path when omitted
    #[serde(default)]
    pub filename: Option<String>,
}

/// Parameters for `upload_video_from_url`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UploadUrlParams {
    /// http(s) URL of the video to ingest
    pub url: String,
}

/// Parameters for `create_or_run_agent`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateOrRunParams {
    /// Asset to process, from one of the upload tools
    pub file_id: String,
    /// Existing agent, by catalog name or raw id
    #[serde(default)]
    pub agent: Option<String>,
    /// Free-text prompt for an agent Mosaic builds on the fly
    #[serde(default)]
    pub prompt: Option<String>,
    /// Let the server pick parameters automatically
    #[serde(default = "default_true")]
    pub auto: bool,
    /// Extra agent parameters, passed through verbatim
    #[serde(default)]
    pub parameters: Option<serde_json::Value>,
}

impl CreateOrRunParams {
    /// Exactly one of agent or prompt must carry a value; empty strings
    /// count as absent.
    pub fn target(&self) -> Result<Target<'_>, String> {
        let agent = self.agent.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let prompt = self.prompt.as_deref().map(str::trim).filter(|s| !s.is_empty());
        match (agent, prompt) {
            (Some(agent), None) => Ok(Target::Agent(agent)),
            (None, Some(prompt)) => Ok(Target::Prompt(prompt)),
            _ => Err(
                "Provide exactly one of 'agent' (existing) or 'prompt' (generated)".to_string(),
            ),
        }
    }
}

/// Which of the two exclusive inputs was supplied.
#[derive(Debug, PartialEq, Eq)]
pub enum Target<'a> {
    Agent(&'a str),
    Prompt(&'a str),
}

/// Parameters for the run-id keyed tools.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RunIdParams {
    /// Run identifier from `create_or_run_agent`
    pub run_id: String,
}

/// One advertised tool.
#[derive(Debug, Serialize)]
pub struct ToolDef {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: schemars::schema::RootSchema,
}

/// Everything the surface exposes, `list_tools` itself included.
pub fn tool_catalog() -> Vec<ToolDef> {
    #[derive(JsonSchema)]
    struct NoParams {}

    vec![
        ToolDef {
            name: "upload_video_from_local_file",
            description: "Upload a video from a local file path to Mosaic, returns its file_id",
            parameters: schema_for!(UploadLocalParams),
        },
        ToolDef {
            name: "upload_video_from_url",
            description: "Download a video from a URL and upload it to Mosaic, returns its file_id",
            parameters: schema_for!(UploadUrlParams),
        },
        ToolDef {
            name: "create_or_run_agent",
            description: "Start Mosaic processing: pass 'agent' (name or UUID) to run an \
                          existing agent, or 'prompt' to have Mosaic build one on the fly; \
                          these are mutually exclusive. Returns a run_id",
            parameters: schema_for!(CreateOrRunParams),
        },
        ToolDef {
            name: "get_run_status",
            description: "Fetch the current status and progress of a run",
            parameters: schema_for!(RunIdParams),
        },
        ToolDef {
            name: "get_output_urls",
            description: "List the signed download URLs of a finished run",
            parameters: schema_for!(RunIdParams),
        },
        ToolDef {
            name: "list_agents",
            description: "List the known agents as {name, id, description} objects",
            parameters: schema_for!(NoParams),
        },
        ToolDef {
            name: "list_tools",
            description: "Describe every tool on this surface with its parameter schema",
            parameters: schema_for!(NoParams),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_requires_exactly_one() {
        let mut params = CreateOrRunParams {
            file_id: "f".to_string(),
            agent: Some("add_captions".to_string()),
            prompt: None,
            auto: true,
            parameters: None,
        };
        assert_eq!(params.target(), Ok(Target::Agent("add_captions")));

        params.agent = None;
        params.prompt = Some("remove silences".to_string());
        assert_eq!(params.target(), Ok(Target::Prompt("remove silences")));

        params.agent = Some("add_captions".to_string());
        assert!(params.target().is_err());

        params.agent = None;
        params.prompt = None;
        assert!(params.target().is_err());

        // Empty strings count as absent
        params.agent = Some("".to_string());
        params.prompt = Some("p".to_string());
        assert_eq!(params.target(), Ok(Target::Prompt("p")));
    }

    #[test]
    fn test_auto_defaults_on() {
        let params: CreateOrRunParams =
            serde_json::from_value(serde_json::json!({"file_id": "f", "agent": "a"})).unwrap();
        assert!(params.auto);
    }

    #[test]
    fn test_catalog_advertises_schemas() {
        let catalog = tool_catalog();
        assert_eq!(catalog.len(), 7);

        let create = catalog
            .iter()
            .find(|t| t.name == "create_or_run_agent")
            .unwrap();
        let schema = serde_json::to_value(&create.parameters).unwrap();
        assert!(schema["properties"].get("file_id").is_some());
        assert!(schema["properties"].get("prompt").is_some());
    }
}
