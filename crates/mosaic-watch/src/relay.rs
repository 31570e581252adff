//! Per-file relay pipeline.
//!
//! Fetch from the source, upload to Mosaic, run the configured agent, poll
//! to a terminal state, then stage and deliver the outputs. One file at a
//! time, start to finish.

use tracing::{info, warn};

use mosaic_client::{wait_for_run, MosaicClient, MosaicError, PollConfig};
use mosaic_models::{RunId, RunSpec, RunTarget};

use crate::error::WatchResult;
use crate::sink::{OutputSink, StagedOutput};
use crate::source::{RemoteFile, WatchSource};

/// How one file's trip through the pipeline ended.
#[derive(Debug)]
pub enum RelayOutcome {
    /// Run succeeded and outputs were delivered to the sink
    Delivered { run_id: RunId, outputs: usize },
    /// Run reached the failed state
    RunFailed {
        run_id: RunId,
        message: Option<String>,
    },
    /// Run never reached a terminal state before the deadline
    TimedOut { run_id: RunId },
}

/// Drives files through upload, run, poll, and delivery.
pub struct Relay {
    client: MosaicClient,
    target: RunTarget,
    poll: PollConfig,
}

impl Relay {
    pub fn new(client: MosaicClient, target: RunTarget, poll: PollConfig) -> Self {
        Self {
            client,
            target,
            poll,
        }
    }

    /// Process one file end to end.
    pub async fn process(
        &self,
        source: &dyn WatchSource,
        sink: &dyn OutputSink,
        file: &RemoteFile,
    ) -> WatchResult<RelayOutcome> {
        let staging = tempfile::tempdir()?;
        let local = source.fetch(file, staging.path()).await?;

        let file_id = self.client.upload_file(&local).await?;

        let spec = match &self.target {
            RunTarget::Agent(agent_id) => RunSpec::agent(file_id, agent_id.clone()),
            RunTarget::Prompt(prompt) => RunSpec::prompt(file_id, prompt.clone()),
        };
        let run_id = self.client.run_agent(&spec).await?;

        let snapshot = match wait_for_run(&self.client, &run_id, &self.poll).await {
            Ok(snapshot) => snapshot,
            Err(MosaicError::PollDeadline(secs)) => {
                warn!("Run {} still not terminal after {}s", run_id, secs);
                return Ok(RelayOutcome::TimedOut { run_id });
            }
            Err(e) => return Err(e.into()),
        };

        if !snapshot.status.is_success() {
            return Ok(RelayOutcome::RunFailed {
                run_id,
                message: snapshot.status_message,
            });
        }

        let outputs = self.client.get_run_outputs(&run_id).await?;
        if outputs.is_empty() {
            warn!("Run {} succeeded but produced no outputs", run_id);
        }

        let mut staged = Vec::with_capacity(outputs.len());
        for (idx, output) in outputs.iter().enumerate() {
            let node_stem = output.output_stem();
            let path = staging.path().join(format!("out-{}-{}.mp4", idx, node_stem));
            self.client
                .download_to_file(&output.download_url, &path)
                .await?;
            staged.push(StagedOutput { path, node_stem });
        }

        let delivered = sink.deliver(file, &staged).await?;
        info!(
            "Relayed {} through run {} ({} output(s))",
            file.name, run_id, delivered
        );
        Ok(RelayOutcome::Delivered {
            run_id,
            outputs: delivered,
        })
    }
}
