//! Taskgate Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{ClaimedTask, ConfigResponse, PollRequest, PollResponse, QueueConfiguration, TaskReport};
use reqwest::{Client, Response, StatusCode, Url};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Worker-side client of a Taskgate server
///
/// # Example
///
/// ```no_run
/// use taskgate_sdk::TaskgateClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = TaskgateClient::connect("http://127.0.0.1:8080").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TaskgateClient {
    http: Client,
    base_url: Url,
}

impl TaskgateClient {
    /// Create a client for the server at `url` (e.g., `http://127.0.0.1:8080`)
    ///
    /// No request is sent; an unreachable server surfaces on the first call.
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();
        let base_url =
            Url::parse(url).map_err(|e| SdkError::InvalidUrl(format!("{}: {}", url, e)))?;

        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(SdkError::InvalidUrl(format!(
                "{}: expected an http(s) base URL",
                url
            )));
        }

        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self { http, base_url })
    }

    /// Fetch the queue's configuration
    pub async fn configuration(&self, queue: &str) -> Result<QueueConfiguration> {
        let response = self.http.get(self.queue_url(queue)?).send().await?;

        if response.status() != StatusCode::OK {
            return Err(error_from(queue, response).await);
        }

        let body: ConfigResponse = serde_json::from_str(&response.text().await?)?;
        Ok(body.configuration)
    }

    /// Report outcomes of earlier tasks, then claim the next one.
    ///
    /// `None` means no task is currently eligible. On error, reports before
    /// the failing one may already have been applied.
    pub async fn poll(&self, queue: &str, reports: &[TaskReport]) -> Result<Option<ClaimedTask>> {
        let response = self
            .http
            .post(self.queue_url(queue)?)
            .json(&PollRequest { tasks: reports })
            .send()
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(None),
            StatusCode::OK => {
                let body: PollResponse = serde_json::from_str(&response.text().await?)?;
                Ok(body.tasks.into_iter().next())
            }
            _ => Err(error_from(queue, response).await),
        }
    }

    fn queue_url(&self, queue: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SdkError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["v1", "queue", queue]);
        Ok(url)
    }
}

async fn error_from(queue: &str, response: Response) -> SdkError {
    let status = response.status();
    let message = match response.text().await {
        Ok(text) => text,
        Err(e) => return SdkError::Transport(e),
    };

    match status {
        StatusCode::NOT_FOUND => SdkError::QueueNotFound(queue.to_string()),
        StatusCode::BAD_REQUEST => SdkError::BadRequest(message),
        _ => SdkError::Server {
            status: status.as_u16(),
            message,
        },
    }
}
