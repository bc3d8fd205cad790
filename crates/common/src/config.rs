/// Global application configuration loaded from environment variables.
///
/// The webhook token is the one value that never comes from the environment:
/// it is the required CLI argument, passed in by the binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Review tracker API endpoint (the review-requests collection)
    pub tracker_url: String,

    /// Review group the tracker listing is filtered by (`to-groups`)
    pub tracker_group: String,

    /// Incoming-webhook endpoint, without the token query parameter
    pub webhook_url: String,

    /// Webhook authentication token (CLI argument)
    pub webhook_token: String,

    /// Chat channel notifications are posted to
    pub channel: String,

    /// Seconds between poll cycles (default: 60)
    pub poll_interval_secs: u64,

    /// Whole-request deadline for a single HTTP fetch, redirects included (default: 60)
    pub request_timeout_secs: u64,

    /// Capacity of the posted-id suppression set (default: 1000)
    pub suppression_capacity: usize,

    /// Optional URL of the employee allowlist document
    pub employee_list_url: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env(webhook_token: String) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let suppression_capacity: usize = std::env::var("SUPPRESSION_CAPACITY")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("SUPPRESSION_CAPACITY must be a valid usize"))?;
        if !(1000..=10_000).contains(&suppression_capacity) {
            anyhow::bail!("SUPPRESSION_CAPACITY must be between 1000 and 10000");
        }

        Ok(Self {
            tracker_url: std::env::var("TRACKER_URL")
                .unwrap_or_else(|_| "https://reviews.apache.org/api/review-requests/".to_string()),
            tracker_group: std::env::var("TRACKER_GROUP").unwrap_or_else(|_| "mesos".to_string()),
            webhook_url: std::env::var("WEBHOOK_URL").unwrap_or_else(|_| {
                "https://mesosphere.slack.com/services/hooks/incoming-webhook".to_string()
            }),
            webhook_token,
            channel: std::env::var("NOTIFY_CHANNEL").unwrap_or_else(|_| "#core".to_string()),
            poll_interval_secs: std::env::var("POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("POLL_INTERVAL_SECS must be a valid u64"))?,
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("REQUEST_TIMEOUT_SECS must be a valid u64"))?,
            suppression_capacity,
            employee_list_url: std::env::var("EMPLOYEE_LIST_URL").ok(),
        })
    }

    /// Webhook endpoint with the authentication token attached.
    pub fn webhook_endpoint(&self) -> String {
        format!("{}?token={}", self.webhook_url, self.webhook_token)
    }
}
