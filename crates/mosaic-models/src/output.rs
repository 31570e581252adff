//! Run output models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One downloadable product of a finished run.
///
/// The server may return more fields per output; only the ones the
/// integrations consume are modeled, the rest are ignored on decode.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RunOutput {
    /// Pre-signed URL to fetch the rendered file from
    pub download_url: String,
    /// Identifier of the graph node that produced this output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    /// Server-suggested filename, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl RunOutput {
    /// Short stem used to name the downloaded file: the first 8 characters
    /// of the producing node id, or `output` when the server sent none.
    pub fn output_stem(&self) -> String {
        match &self.node_id {
            Some(id) if !id.is_empty() => id.chars().take(8).collect(),
            _ => "output".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_stem_truncates_node_id() {
        let out = RunOutput {
            download_url: "https://cdn.example/file.mp4".to_string(),
            node_id: Some("b94b296d-7bd8-4d60-851d-ff821c0c9a9d".to_string()),
            filename: None,
        };
        assert_eq!(out.output_stem(), "b94b296d");
    }

    #[test]
    fn test_output_stem_fallback() {
        let out = RunOutput {
            download_url: "https://cdn.example/file.mp4".to_string(),
            node_id: None,
            filename: None,
        };
        assert_eq!(out.output_stem(), "output");

        let out = RunOutput {
            download_url: "https://cdn.example/file.mp4".to_string(),
            node_id: Some(String::new()),
            filename: None,
        };
        assert_eq!(out.output_stem(), "output");
    }

    #[test]
    fn test_output_decode_ignores_extra_fields() {
        let out: RunOutput = serde_json::from_str(
            r#"{"download_url":"https://cdn.example/a.mp4","node_id":"abc","size_bytes":123,"kind":"video"}"#,
        )
        .unwrap();
        assert_eq!(out.node_id.as_deref(), Some("abc"));
    }
}
