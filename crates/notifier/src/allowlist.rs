//! Employee allowlist — submitters whose requests never reach the chat channel.
//!
//! Loaded once at startup and static for the process lifetime. The source is
//! a JSON array of display names; an unreachable or malformed source is a
//! startup failure, not something to limp along without.

use std::collections::HashSet;

use herald_common::error::HeraldError;
use herald_common::http::HttpFetcher;

/// Set of submitter display names excluded from notification.
#[derive(Debug, Default)]
pub struct EmployeeAllowlist {
    names: HashSet<String>,
}

impl EmployeeAllowlist {
    /// Empty allowlist — nothing is filtered.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Fetch and parse the allowlist document once.
    pub async fn load(fetcher: &HttpFetcher, url: &str) -> Result<Self, HeraldError> {
        let body = fetcher.get(url, &[]).await.map_err(|e| {
            HeraldError::Startup(format!("employee allowlist unreachable at {url}: {e}"))
        })?;

        Self::from_json(&body)
            .map_err(|e| HeraldError::Startup(format!("employee allowlist at {url}: {e}")))
    }

    /// Parse a JSON array of display names.
    pub fn from_json(body: &[u8]) -> Result<Self, HeraldError> {
        let names: Vec<String> = serde_json::from_slice(body)
            .map_err(|e| HeraldError::Decode(format!("malformed employee allowlist: {e}")))?;
        Ok(Self::from_names(names))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
