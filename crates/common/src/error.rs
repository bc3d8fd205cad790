use thiserror::Error;

/// Common error types used across the application.
///
/// Everything except `Config` and `Startup` is an iteration-level failure:
/// the poll loop logs it and retries on the next cycle. `Config` and
/// `Startup` abort the process before the loop begins.
#[derive(Debug, Error)]
pub enum HeraldError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("Redirect loop fetching {url}: budget of {budget} follows exhausted")]
    RedirectLoop { url: String, budget: usize },

    #[error("Bad redirect from {url}: {reason}")]
    BadRedirect { url: String, reason: String },

    #[error("HTTP {status} from {url}: {body}")]
    Http {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Startup error: {0}")]
    Startup(String),
}
