//! HTTP transport shared by the tracker fetch and webhook delivery paths.
//!
//! Redirects are followed manually against a fixed budget, so a misbehaving
//! endpoint cannot send the poller around a redirect cycle forever. The whole
//! chain (initial request plus every follow) runs under a single deadline.

use std::time::Duration;

use reqwest::header::LOCATION;
use reqwest::{Client, Method, Url};

use crate::error::HeraldError;

/// Maximum number of redirect follows per logical request.
pub const MAX_REDIRECTS: usize = 10;

/// HTTP client wrapper with manual redirect handling and a whole-request deadline.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Build a fetcher with the given whole-request deadline.
    ///
    /// Automatic redirects are disabled on the underlying client so the
    /// budget in [`MAX_REDIRECTS`] is authoritative. TLS verification stays
    /// at reqwest defaults.
    pub fn new(timeout: Duration) -> Result<Self, HeraldError> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client, timeout })
    }

    /// GET `url` with the given query parameters, returning the response body.
    pub async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<u8>, HeraldError> {
        let target = if query.is_empty() {
            Url::parse(url)
        } else {
            Url::parse_with_params(url, query)
        }
        .map_err(|e| HeraldError::Config(format!("invalid URL {url}: {e}")))?;

        self.execute(Method::GET, target, None).await
    }

    /// POST `url` with a form-encoded body, returning the response body.
    pub async fn post_form(
        &self,
        url: &str,
        form: &[(&str, String)],
    ) -> Result<Vec<u8>, HeraldError> {
        let target =
            Url::parse(url).map_err(|e| HeraldError::Config(format!("invalid URL {url}: {e}")))?;

        self.execute(Method::POST, target, Some(form)).await
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        form: Option<&[(&str, String)]>,
    ) -> Result<Vec<u8>, HeraldError> {
        let display_url = url.to_string();

        tokio::time::timeout(self.timeout, self.follow_redirects(method, url, form))
            .await
            .map_err(|_| HeraldError::Timeout {
                url: display_url,
                timeout_secs: self.timeout.as_secs(),
            })?
    }

    /// Issue the request, chasing redirects until a non-3xx response arrives
    /// or the budget runs out.
    async fn follow_redirects(
        &self,
        method: Method,
        mut url: Url,
        form: Option<&[(&str, String)]>,
    ) -> Result<Vec<u8>, HeraldError> {
        let mut remaining = MAX_REDIRECTS;

        loop {
            let mut request = self.client.request(method.clone(), url.clone());
            if let Some(fields) = form {
                request = request.form(fields);
            }

            let response = request.send().await?;
            let status = response.status();

            if status.is_redirection() {
                if remaining == 0 {
                    return Err(HeraldError::RedirectLoop {
                        url: url.to_string(),
                        budget: MAX_REDIRECTS,
                    });
                }
                let target = redirect_target(&url, &response)?;
                tracing::debug!(from = %url, to = %target, remaining, "Following redirect");
                url = target;
                remaining -= 1;
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(HeraldError::Http {
                    url: url.to_string(),
                    status: status.as_u16(),
                    body,
                });
            }

            return Ok(response.bytes().await?.to_vec());
        }
    }
}

/// Resolve a redirect's `Location` header against the URL it arrived from.
fn redirect_target(url: &Url, response: &reqwest::Response) -> Result<Url, HeraldError> {
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| HeraldError::BadRedirect {
            url: url.to_string(),
            reason: "missing Location header".to_string(),
        })?;

    url.join(location).map_err(|e| HeraldError::BadRedirect {
        url: url.to_string(),
        reason: format!("unresolvable Location {location:?}: {e}"),
    })
}
