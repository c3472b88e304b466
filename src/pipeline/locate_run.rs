use reqwest::{Client, Method};
use tracing::{debug, error, info};

use crate::{
    config::Config,
    pipeline::{PipelineError, PipelineResult, ensure_accepted},
    workflow::{WorkflowRuns, github_api_request_builder},
};

/// Locates the single in-progress run produced by the configured workflow.
///
/// Runs are matched by substring containment of the workflow identifier in
/// their `path`, tolerating directory-prefix variations. Anything but exactly
/// one match is ambiguous: falling back to the most recent run could track a
/// run some other dispatcher started.
///
/// # Errors
///
/// Returns an error if the run listing is rejected by the remote service, or
/// if the number of matching in-progress runs is not exactly one.
pub async fn locate_run(client: &Client, config: &Config) -> PipelineResult<u64> {
    let url = config.runs_url();
    debug!("listing in-progress runs at {url}…");

    let response = github_api_request_builder(client, Method::GET, &url, config)
        .query(&[("status", "in_progress")])
        .send()
        .await?;
    let runs = ensure_accepted(&url, response)
        .await?
        .json::<WorkflowRuns>()
        .await?;

    debug!("in-progress runs: {runs:?}");

    let matched = runs
        .workflow_runs
        .iter()
        .filter(|run| run.path.contains(&config.workflow))
        .collect::<Vec<_>>();

    match matched.as_slice() {
        [run] => {
            info!("located run {} of {}", run.id, run.path);
            Ok(run.id)
        }
        matched => {
            error!(
                "expected exactly one in-progress run of {}, found {}",
                config.workflow,
                matched.len()
            );
            Err(PipelineError::AmbiguousRuns {
                workflow: config.workflow.clone(),
                matched: matched.len(),
            })
        }
    }
}
