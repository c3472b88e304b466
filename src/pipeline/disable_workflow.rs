#![cfg(feature = "disable-workflow")]

use reqwest::{Client, Method};
use tracing::{debug, info};

use crate::{
    config::Config,
    pipeline::{PipelineResult, ensure_accepted},
    workflow::github_api_request_builder,
};

/// Disables the configured workflow, preventing further dispatches.
///
/// Not part of the gate itself: callers invoke this separately when a
/// downstream workflow should stop accepting triggers.
///
/// # Errors
///
/// Returns an error carrying the raw response body if the remote service
/// rejects the request, or a transport error if the request never completes.
pub async fn disable_workflow(client: &Client, config: &Config) -> PipelineResult<()> {
    let url = config.disable_url();
    debug!("disabling workflow at {url}…");

    let response = github_api_request_builder(client, Method::PUT, &url, config)
        .send()
        .await?;
    ensure_accepted(&url, response).await?;

    info!("disabled workflow {}", config.workflow);
    Ok(())
}
