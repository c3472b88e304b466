//! Data models of GitHub Actions workflow runs.

use reqwest::{Client, Method, RequestBuilder, header};
use serde::Deserialize;

use crate::config::Config;

/// Represents a GitHub Actions workflow run from GitHub REST API.
#[derive(Debug, Deserialize, Clone)]
pub struct WorkflowRun {
    pub id: u64,
    /// The path of the workflow definition that produced this run.
    pub path: String,
    /// The lifecycle state, `"completed"` once the run is terminal.
    pub status: String,
    /// The terminal outcome, present only once the run is completed.
    pub conclusion: Option<String>,
}

/// Represents a page of workflow runs from GitHub REST API.
#[derive(Debug, Deserialize, Clone)]
pub struct WorkflowRuns {
    pub total_count: u32,
    pub workflow_runs: Vec<WorkflowRun>,
}

/// Builds a request for GitHub REST API.
pub fn github_api_request_builder(
    client: &Client,
    method: Method,
    url: &str,
    config: &Config,
) -> RequestBuilder {
    client
        .request(method, url)
        .header(header::ACCEPT, "application/vnd.github+json")
        .header(header::CONTENT_TYPE, "application/json")
        .bearer_auth(&config.token)
        .header("X-GitHub-Api-Version", "2022-11-28")
        .header("User-Agent", "workflow-gate/0.1")
}
