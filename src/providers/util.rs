use anyhow::Error;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// How often, and how far apart, a failed request send is retried.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retry attempts after the first run
    pub retries: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Runs `operation` until it succeeds or the retries are exhausted.
    ///
    /// Only transport failures surface as `reqwest::Error` from `send()`; HTTP
    /// error statuses come back as responses and are never retried here.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, reqwest::Error>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(val) => return Ok(val),
                Err(err) => {
                    if attempt > self.retries || !(err.is_connect() || err.is_timeout()) {
                        return Err(err.into());
                    }
                    debug!(
                        "Attempt {}/{} failed: {}. Retrying...",
                        attempt, self.retries, err
                    );
                    attempt += 1;
                    tokio::time::sleep(self.delay).await;
                }
            }
        }
    }
}

/// Best-effort extraction of a backend's error message from a response body.
///
/// Handles `{"error": "text"}` and `{"error": {"message": "text"}}`, falling
/// back to the raw body.
pub fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|v| match v.get("error") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Object(o)) => o.get("message").and_then(Value::as_str).map(str::to_string),
        _ => None,
    });
    message.unwrap_or_else(|| body.trim().to_string())
}
