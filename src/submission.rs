//! One-shot submission of this service's public URL, made after startup

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::SubmissionConfig;
use crate::upstream::{CityDataClient, Submission};

/// Spawns the submission as a detached task.
///
/// Returns `None` when no public URL is configured or no API key is available.
/// Failures are logged and never reach the caller.
pub fn spawn_submission(client: CityDataClient, config: &SubmissionConfig) -> Option<JoinHandle<()>> {
    let api_url = config.public_url.clone()?;
    if !client.has_api_key() {
        tracing::error!("API_KEY is not set, skipping submission for review");
        return None;
    }

    let submission = Submission {
        api_url,
        git_repo: config.git_repo.clone(),
    };
    let delay = Duration::from_secs(config.delay_seconds);

    Some(tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        match client.submit(&submission).await {
            Ok(()) => tracing::info!(api_url = %submission.api_url, "API submitted for review"),
            Err(e) => tracing::error!(error = %e, "Submission failed"),
        }
    }))
}
