use reqwest::{Client, Method};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    config::Config,
    pipeline::{PipelineResult, ensure_accepted},
    workflow::github_api_request_builder,
};

#[derive(Debug, Serialize)]
struct DispatchRequest<'a> {
    r#ref: &'a str,
}

/// Dispatches a new run of the configured workflow on the configured
/// reference.
///
/// Dispatching is not idempotent: the remote service creates a fresh run for
/// every accepted request.
///
/// # Errors
///
/// Returns an error carrying the raw response body if the remote service
/// rejects the dispatch, or a transport error if the request never completes.
pub async fn dispatch_workflow(client: &Client, config: &Config) -> PipelineResult<()> {
    let url = config.dispatch_url();
    debug!("dispatching workflow at {url}…");

    let response = github_api_request_builder(client, Method::POST, &url, config)
        .json(&DispatchRequest {
            r#ref: &config.reference,
        })
        .send()
        .await?;
    ensure_accepted(&url, response).await?;

    info!(
        "dispatched workflow {} on {}",
        config.workflow, config.reference
    );
    Ok(())
}
