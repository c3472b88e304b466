//! The dispatch, locate, and wait stages of the gate.

mod await_conclusion;
mod disable_workflow;
mod dispatch_workflow;
mod locate_run;

pub use await_conclusion::*;
#[cfg(feature = "disable-workflow")]
pub use disable_workflow::*;
pub use dispatch_workflow::*;
pub use locate_run::*;

use reqwest::{Client, Response, StatusCode};
use thiserror::Error;
use tokio::time::sleep;
use tracing::error;

use crate::config::Config;

/// The exit status propagated when the tracked run concludes with `"failure"`.
pub const FAILURE_EXIT_STATUS: u8 = 13;

/// A fatal error that aborts the gate.
///
/// Every variant is unrecoverable: the gate never retries, and makes no
/// distinction between transient and permanent failures.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The remote service rejected a request.
    #[error("request to {url} was rejected: {status}: {body}")]
    Rejected {
        /// The rejected request URL.
        url: String,
        /// The response status code.
        status: StatusCode,
        /// The raw response body, surfaced for diagnostics.
        body: String,
    },
    /// The in-progress runs matching the workflow path did not narrow down to
    /// exactly one.
    #[error("expected exactly one in-progress run of {workflow}, found {matched}")]
    AmbiguousRuns {
        /// The workflow identifier that was matched against run paths.
        workflow: String,
        /// The number of in-progress runs that matched.
        matched: usize,
    },
    /// The run was still not completed once the poll cap was exhausted.
    #[error("run {run_id} still not completed after {polls} polls")]
    Timeout {
        /// The tracked run.
        run_id: u64,
        /// The number of polls performed.
        polls: u32,
    },
    /// The request never produced a response, or its body could not be
    /// decoded.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// A result of a gate stage.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Runs the whole gate: dispatches the workflow, locates the run it created,
/// and waits for that run's conclusion.
///
/// # Errors
///
/// Returns the first stage error; no stage runs after a failed one.
pub async fn run(client: &Client, config: &Config) -> PipelineResult<String> {
    dispatch_workflow(client, config).await?;
    sleep(config.poll.startup_delay).await;
    let run_id = locate_run(client, config).await?;
    await_conclusion(client, config, run_id).await
}

/// Maps a run conclusion to the process exit status.
///
/// Only `"failure"` is distinguished; every other conclusion (success,
/// cancelled, skipped, …) maps to success.
pub fn exit_status(conclusion: &str) -> u8 {
    if conclusion == "failure" {
        FAILURE_EXIT_STATUS
    } else {
        0
    }
}

/// Passes a response through unless the remote service rejected the request.
///
/// Redirects count as accepted; only 4xx and 5xx responses are fatal.
pub(crate) async fn ensure_accepted(url: &str, response: Response) -> PipelineResult<Response> {
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        let body = response.text().await.unwrap_or_default();
        error!("request to {url} was rejected: {}: {body}", status.as_u16());
        Err(PipelineError::Rejected {
            url: url.to_owned(),
            status,
            body,
        })
    } else {
        Ok(response)
    }
}
