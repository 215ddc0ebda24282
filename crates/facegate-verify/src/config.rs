use crate::VerifyError;
use reqwest::Url;
use std::time::Duration;

/// Configuration for [`crate::HttpEndpoint`].
#[derive(Clone, Debug)]
pub struct EndpointConfig {
    page_url: Url,
    csrf_token: Option<String>,
    timeout: Option<Duration>,
}

impl EndpointConfig {
    /// Configure an endpoint that posts to `page_url`, the verification page itself.
    pub fn new(page_url: &str) -> Result<Self, VerifyError> {
        let page_url =
            Url::parse(page_url).map_err(|e| VerifyError::InvalidUrl(format!("{page_url}: {e}")))?;
        Ok(Self {
            page_url,
            csrf_token: None,
            timeout: None,
        })
    }

    /// Use this token instead of reading it from the page.
    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    /// Give up on a request after `timeout`. Without one, a request waits as
    /// long as the transport does.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    // Getters
    pub fn page_url(&self) -> &Url {
        &self.page_url
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Resolve a redirect target from a response against the page URL.
    pub fn resolve(&self, target: &str) -> Result<Url, VerifyError> {
        self.page_url
            .join(target)
            .map_err(|e| VerifyError::InvalidUrl(format!("{target}: {e}")))
    }
}
