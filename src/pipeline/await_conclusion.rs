use std::future::Future;

use reqwest::{Client, Method};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::{
    config::{Config, PollSettings},
    pipeline::{PipelineError, PipelineResult, ensure_accepted},
    workflow::{WorkflowRun, github_api_request_builder},
};

const COMPLETED: &str = "completed";

/// Polls the given run at a fixed interval until it completes, returning its
/// conclusion.
///
/// A completed run that reports no conclusion counts as `"failure"`.
///
/// # Errors
///
/// Returns an error if a poll is rejected by the remote service, or if the
/// run is still not completed once [`PollSettings::max_polls`] is exhausted.
pub async fn await_conclusion(
    client: &Client,
    config: &Config,
    run_id: u64,
) -> PipelineResult<String> {
    let url = config.run_url(run_id);
    poll_until_completed(&config.poll, run_id, || fetch_run(client, config, &url)).await
}

async fn fetch_run(client: &Client, config: &Config, url: &str) -> PipelineResult<WorkflowRun> {
    debug!("fetching run at {url}…");

    let run = ensure_accepted(
        url,
        github_api_request_builder(client, Method::GET, url, config)
            .send()
            .await?,
    )
    .await?
    .json::<WorkflowRun>()
    .await?;

    debug!("fetched run: {run:?}");
    Ok(run)
}

/// Drives the polling state machine over an arbitrary source of run records.
///
/// Each iteration sleeps for the configured interval, fetches, and inspects
/// the lifecycle status; the first `"completed"` record is terminal and no
/// further fetch happens after it.
async fn poll_until_completed<F, Fut>(
    settings: &PollSettings,
    run_id: u64,
    mut fetch: F,
) -> PipelineResult<String>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PipelineResult<WorkflowRun>>,
{
    let mut polls: u32 = 0;
    loop {
        if settings.max_polls.is_some_and(|max| polls >= max) {
            return Err(PipelineError::Timeout { run_id, polls });
        }

        sleep(settings.interval).await;
        polls += 1;

        let run = fetch().await?;
        if run.status == COMPLETED {
            let conclusion = run.conclusion.unwrap_or_else(|| "failure".to_owned());
            info!("run {run_id} completed with conclusion {conclusion}");
            return Ok(conclusion);
        }
    }
}
