//! Target coordinates and polling behavior, resolved once at startup.

use std::{env, time::Duration};

use anyhow::{Context as _, Result};

/// The default API base for repository-scoped routes.
pub const DEFAULT_API_BASE: &str = "https://api.github.com/repos";
/// The default path segment for workflow-scoped routes.
pub const DEFAULT_WORKFLOWS_PATH: &str = "actions/workflows";
/// The default path segment for run-scoped routes.
pub const DEFAULT_RUNS_PATH: &str = "actions/runs";

const DEFAULT_REFERENCE: &str = "master";
const DEFAULT_POLL_SECONDS: u64 = 10;

/// Fixed delays and bounds applied around run polling.
#[derive(Debug, Clone)]
pub struct PollSettings {
    /// The delay between dispatching and locating the new run, giving the
    /// remote service time to move it into `in_progress`.
    pub startup_delay: Duration,
    /// The delay before each status poll.
    pub interval: Duration,
    /// The number of status polls after which waiting gives up, or [`None`]
    /// to poll until the run completes.
    pub max_polls: Option<u32>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            startup_delay: Duration::from_secs(DEFAULT_POLL_SECONDS),
            interval: Duration::from_secs(DEFAULT_POLL_SECONDS),
            max_polls: None,
        }
    }
}

/// The coordinates of the workflow to dispatch and track.
///
/// Constructed once at startup and passed by reference to every operation;
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// The bearer token authorizing every API request.
    pub token: String,
    /// The owner or organization of the target repository.
    pub workspace: String,
    /// The target repository name.
    pub repository: String,
    /// The workflow file identifier, matched against run paths.
    pub workflow: String,
    /// The git reference new runs are dispatched on.
    pub reference: String,
    /// The API base for repository-scoped routes.
    pub api_base: String,
    /// The path segment for workflow-scoped routes.
    pub workflows_path: String,
    /// The path segment for run-scoped routes.
    pub runs_path: String,
    /// Delays and bounds applied around run polling.
    pub poll: PollSettings,
}

impl Config {
    /// Creates a configuration for the given coordinates with the default API
    /// paths, dispatch reference, and polling behavior.
    pub fn new(token: String, workspace: String, repository: String, workflow: String) -> Self {
        Self {
            token,
            workspace,
            repository,
            workflow,
            reference: DEFAULT_REFERENCE.to_owned(),
            api_base: DEFAULT_API_BASE.to_owned(),
            workflows_path: DEFAULT_WORKFLOWS_PATH.to_owned(),
            runs_path: DEFAULT_RUNS_PATH.to_owned(),
            poll: PollSettings::default(),
        }
    }

    /// Resolves the configuration from `INPUT_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is not set, or if a numeric
    /// variable does not parse.
    pub fn from_env() -> Result<Self> {
        Self::resolve(|key| env::var(key).ok())
    }

    fn resolve<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required =
            |key: &str| var(key).with_context(|| format!("{key} not set in environment"));

        let mut config = Self::new(
            required("INPUT_GITHUBTOKEN")?,
            required("INPUT_WORKSPACE")?,
            required("INPUT_REPOSITORY")?,
            required("INPUT_WORKFLOW")?,
        );

        if let Some(reference) = var("INPUT_REF") {
            config.reference = reference;
        }
        if let Some(seconds) = var("INPUT_POLL_SECONDS") {
            let seconds = seconds
                .parse::<u64>()
                .with_context(|| format!("INPUT_POLL_SECONDS is not a number: {seconds}"))?;
            config.poll.interval = Duration::from_secs(seconds);
        }
        if let Some(polls) = var("INPUT_MAX_POLLS") {
            let polls = polls
                .parse::<u32>()
                .with_context(|| format!("INPUT_MAX_POLLS is not a number: {polls}"))?;
            config.poll.max_polls = Some(polls);
        }

        Ok(config)
    }

    /// The URL that dispatches a new run of the configured workflow.
    pub fn dispatch_url(&self) -> String {
        format!(
            "{}/{}/{}/{}/{}/dispatches",
            self.api_base, self.workspace, self.repository, self.workflows_path, self.workflow
        )
    }

    /// The URL that disables the configured workflow.
    #[cfg(feature = "disable-workflow")]
    pub fn disable_url(&self) -> String {
        format!(
            "{}/{}/{}/{}/{}/disable",
            self.api_base, self.workspace, self.repository, self.workflows_path, self.workflow
        )
    }

    /// The URL listing runs of the configured repository.
    pub fn runs_url(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.api_base, self.workspace, self.repository, self.runs_path
        )
    }

    /// The URL of a single run.
    pub fn run_url(&self, run_id: u64) -> String {
        format!("{}/{run_id}", self.runs_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    fn required_vars() -> HashMap<String, String> {
        vars(&[
            ("INPUT_GITHUBTOKEN", "token"),
            ("INPUT_WORKSPACE", "acme"),
            ("INPUT_REPOSITORY", "widgets"),
            ("INPUT_WORKFLOW", "ci.yml"),
        ])
    }

    #[test]
    fn resolves_required_variables_with_defaults() {
        let env = required_vars();
        let config = Config::resolve(|key| env.get(key).cloned()).unwrap();

        assert_eq!(config.token, "token");
        assert_eq!(config.workspace, "acme");
        assert_eq!(config.repository, "widgets");
        assert_eq!(config.workflow, "ci.yml");
        assert_eq!(config.reference, "master");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.poll.interval, Duration::from_secs(10));
        assert_eq!(config.poll.max_polls, None);
    }

    #[test]
    fn missing_required_variable_is_fatal() {
        let mut env = required_vars();
        env.remove("INPUT_REPOSITORY");

        let err = Config::resolve(|key| env.get(key).cloned()).unwrap_err();
        assert!(err.to_string().contains("INPUT_REPOSITORY"));
    }

    #[test]
    fn optional_variables_override_defaults() {
        let mut env = required_vars();
        env.extend(vars(&[
            ("INPUT_REF", "main"),
            ("INPUT_POLL_SECONDS", "3"),
            ("INPUT_MAX_POLLS", "120"),
        ]));

        let config = Config::resolve(|key| env.get(key).cloned()).unwrap();
        assert_eq!(config.reference, "main");
        assert_eq!(config.poll.interval, Duration::from_secs(3));
        assert_eq!(config.poll.max_polls, Some(120));
    }

    #[test]
    fn unparsable_poll_interval_is_fatal() {
        let mut env = required_vars();
        env.extend(vars(&[("INPUT_POLL_SECONDS", "soon")]));

        let err = Config::resolve(|key| env.get(key).cloned()).unwrap_err();
        assert!(err.to_string().contains("INPUT_POLL_SECONDS"));
    }

    #[test]
    fn urls_follow_the_repository_layout() {
        let env = required_vars();
        let config = Config::resolve(|key| env.get(key).cloned()).unwrap();

        assert_eq!(
            config.dispatch_url(),
            "https://api.github.com/repos/acme/widgets/actions/workflows/ci.yml/dispatches"
        );
        assert_eq!(
            config.runs_url(),
            "https://api.github.com/repos/acme/widgets/actions/runs"
        );
        assert_eq!(
            config.run_url(42),
            "https://api.github.com/repos/acme/widgets/actions/runs/42"
        );
    }
}
