use reqwest::StatusCode;

/// A non-2xx HTTP response, carrying the status and the response body.
///
/// Surfaced through `anyhow::Error` once retries are exhausted; callers can
/// recover it with `downcast_ref::<StatusError>()` to inspect the status code
/// and whatever the service said.
#[derive(Debug)]
pub struct StatusError {
    pub status: StatusCode,
    pub body: String,
}

impl std::fmt::Display for StatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.body.is_empty() {
            write!(f, "HTTP {}", self.status)
        } else {
            write!(f, "HTTP {}: {}", self.status, self.body)
        }
    }
}

impl std::error::Error for StatusError {}
