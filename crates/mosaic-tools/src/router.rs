//! Tool dispatch.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use mosaic_client::MosaicClient;
use mosaic_models::{AgentCatalog, FileId, RunId, RunSpec};

use crate::error::{ToolError, ToolResult};
use crate::tools::{
    tool_catalog, CreateOrRunParams, RunIdParams, Target, UploadLocalParams, UploadUrlParams,
};

fn parse<P: serde::de::DeserializeOwned>(params: Value) -> ToolResult<P> {
    serde_json::from_value(params).map_err(|e| ToolError::invalid_params(e.to_string()))
}

/// Routes tool calls by name onto the Mosaic client.
pub struct ToolRouter {
    client: MosaicClient,
    catalog: AgentCatalog,
}

impl ToolRouter {
    pub fn new(client: MosaicClient, catalog: AgentCatalog) -> Self {
        Self { client, catalog }
    }

    /// Dispatch one call, returning the tool's JSON result.
    pub async fn dispatch(&self, tool: &str, params: Value) -> ToolResult<Value> {
        match tool {
            "upload_video_from_local_file" => self.upload_local(parse(params)?).await,
            "upload_video_from_url" => self.upload_url(parse(params)?).await,
            "create_or_run_agent" => self.create_or_run(parse(params)?).await,
            "get_run_status" => self.run_status(parse(params)?).await,
            "get_output_urls" => self.output_urls(parse(params)?).await,
            "list_agents" => Ok(serde_json::to_value(self.catalog.entries())?),
            "list_tools" => Ok(serde_json::to_value(tool_catalog())?),
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }

    async fn upload_local(&self, params: UploadLocalParams) -> ToolResult<Value> {
        let path = Path::new(&params.path);
        if !tokio::fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false) {
            return Err(ToolError::invalid_params(format!(
                "File path not found: {}",
                params.path
            )));
        }

        let file_id = match params.filename {
            // A caller-supplied name means the stored name differs from the
            // path, so the bytes go up under that name instead.
            Some(filename) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|e| ToolError::failed(e.to_string()))?;
                self.client.upload_bytes(&filename, bytes).await?
            }
            None => self.client.upload_file(path).await?,
        };

        Ok(serde_json::to_value(file_id)?)
    }

    async fn upload_url(&self, params: UploadUrlParams) -> ToolResult<Value> {
        let file_id = self.client.upload_from_url(&params.url).await?;
        Ok(serde_json::to_value(file_id)?)
    }

    async fn create_or_run(&self, params: CreateOrRunParams) -> ToolResult<Value> {
        let spec = match params.target().map_err(ToolError::InvalidParams)? {
            Target::Agent(agent) => RunSpec::agent(
                FileId::from_string(params.file_id.clone()),
                self.catalog.resolve(agent),
            ),
            Target::Prompt(prompt) => {
                RunSpec::prompt(FileId::from_string(params.file_id.clone()), prompt)
            }
        };
        let spec = match params.parameters {
            Some(parameters) => spec.with_auto(params.auto).with_parameters(parameters),
            None => spec.with_auto(params.auto),
        };

        let run_id = self.client.run_agent(&spec).await?;
        info!("Tool started run {}", run_id);
        Ok(serde_json::to_value(run_id)?)
    }

    async fn run_status(&self, params: RunIdParams) -> ToolResult<Value> {
        let snapshot = self.client.get_run(&RunId::from_string(params.run_id)).await?;
        Ok(serde_json::json!({
            "status": snapshot.status,
            "progress": snapshot.progress,
        }))
    }

    async fn output_urls(&self, params: RunIdParams) -> ToolResult<Value> {
        let outputs = self
            .client
            .get_run_outputs(&RunId::from_string(params.run_id))
            .await?;
        let urls: Vec<String> = outputs.into_iter().map(|o| o.download_url).collect();
        Ok(serde_json::to_value(urls)?)
    }
}
