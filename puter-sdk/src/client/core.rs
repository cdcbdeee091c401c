use std::fmt::Debug;
use std::time::Duration;

use url::Url;

use crate::errors::BuildError;

const DEFAULT_USER_AGENT: &str = concat!("puter.rs", "@", env!("CARGO_PKG_VERSION"),);

/// The Puter cloud API origin used when the builder is not given one.
pub const DEFAULT_API_URL: &str = "https://api.puter.com";

#[derive(Debug, Clone)]
#[must_use]
/// Configures a [`PuterHttpClient`] before construction.
///
/// Customize the API origin, timeouts and user-agent. Most code obtains this
/// via [`PuterHttpClient::builder()`], which simply returns
/// `PuterHttpClientBuilder::default()`.
///
/// # Defaults
/// - API base URL: [`DEFAULT_API_URL`] unless set via [`Self::api_url`]
/// - HTTP request timeout: reqwest default (no global timeout) unless set via
///   [`Self::request_timeout`]
/// - User-agent: `puter.rs@<crate-version>` plus any [`Self::user_agent_extra`]
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// # use puter::{PuterHttpClient, PuterHttpClientBuilder};
/// let client = PuterHttpClient::builder()
///     .request_timeout(Duration::from_secs(10))
///     .user_agent_extra("myapp/1.2.3")
///     .build()?;
/// # Ok::<_, puter::BuildError>(())
/// ```
///
/// Point the client at a self-hosted Puter instance:
/// ```
/// # use puter::{PuterHttpClient, PuterHttpClientBuilder};
/// # fn main() -> Result<(), puter::BuildError> {
/// let client = PuterHttpClient::builder()
///     .api_url("http://puter.localhost:4100")
///     .build()?;
/// # Ok(()) }
/// ```
#[derive(Default)]
pub struct PuterHttpClientBuilder {
    api_url: Option<String>,
    http_request_timeout: Option<Duration>,

    /// Optional user-agent segment appended to the default UA for app-level telemetry.
    user_agent_extra: Option<String>,
}

impl PuterHttpClientBuilder {
    /// Set the API origin all requests are issued against.
    ///
    /// Accepts any absolute `http(s)` URL; use this to target a self-hosted
    /// Puter instance instead of [`DEFAULT_API_URL`].
    pub fn api_url<S: Into<String>>(&mut self, url: S) -> &mut Self {
        self.api_url = Some(url.into());

        self
    }

    /// Set HTTP requests timeout.
    pub fn request_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.http_request_timeout = Some(timeout);

        self
    }

    /// Append an extra user-agent segment after the default `puter.rs@<version>`.
    /// Enables app-level telemetry.
    /// Example: `.user_agent_extra("myapp/1.2.3")`
    pub fn user_agent_extra<S: Into<String>>(&mut self, extra: S) -> &mut Self {
        self.user_agent_extra = Some(extra.into());
        self
    }

    /// Build [`PuterHttpClient`]
    pub fn build(&self) -> Result<PuterHttpClient, BuildError> {
        let api_url = match &self.api_url {
            Some(raw) => Url::parse(raw)?,
            None => Url::parse(DEFAULT_API_URL)?,
        };

        // Compose user agent with optional extra part.
        let user_agent = match &self.user_agent_extra {
            Some(extra) if !extra.trim().is_empty() => {
                &format!("{DEFAULT_USER_AGENT} {}", extra.trim())
            }
            _ => DEFAULT_USER_AGENT,
        };

        let mut http_builder = reqwest::Client::builder().user_agent(user_agent);

        if let Some(timeout) = self.http_request_timeout {
            http_builder = http_builder.timeout(timeout);
        }

        Ok(PuterHttpClient {
            http: http_builder.build()?,
            api_url,
        })
    }
}

/// Transport client for the Puter cloud API.
///
/// `PuterHttpClient` is the low-level, stateless engine the higher-level
/// resource adapters (`Auth`, `FileSystem`, `KeyValue`, `Apps`, `Hosting`,
/// `Ai`, `Usage`) are built on. It owns:
/// - One reqwest HTTP client with the crate's user-agent.
/// - The API origin ([`DEFAULT_API_URL`] or a self-hosted one) every endpoint
///   path is resolved against.
///
/// ### What it *doesn't* do
/// - It is **not** session aware. No token handling, no per-user scoping.
///   For authenticated flows use [`crate::Puter`] and its adapters.
///
/// ### When to use
/// - You want direct control over transport configuration (timeouts,
///   user-agent, self-hosted origin) before handing it to [`crate::Puter::with_client`].
///
/// ### Construction
/// Use [`PuterHttpClient::builder()`] to tweak the origin, timeout, or
/// user-agent; or pick the defaults via [`PuterHttpClient::new()`].
///
/// ### Example
/// ```no_run
/// # use puter::{Puter, PuterHttpClient};
/// let client = PuterHttpClient::builder()
///     .api_url("http://puter.localhost:4100")
///     .build()?;
/// let puter = Puter::with_client(client, Some("my-token".to_string()));
/// # Ok::<_, puter::BuildError>(())
/// ```
#[derive(Clone, Debug)]
pub struct PuterHttpClient {
    pub(crate) http: reqwest::Client,
    pub(crate) api_url: Url,
}

impl PuterHttpClient {
    /// Creates a client configured for the public Puter cloud ([`DEFAULT_API_URL`]).
    pub fn new() -> Result<PuterHttpClient, BuildError> {
        Self::builder().build()
    }

    /// Returns a builder to edit settings before creating [`PuterHttpClient`].
    pub fn builder() -> PuterHttpClientBuilder {
        PuterHttpClientBuilder::default()
    }

    // === Getters ===

    /// Returns the API origin this client issues requests against.
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Resolve an endpoint path (e.g. `drivers/call`) against the API origin.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.api_url.join(path)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_to_the_public_cloud_origin() {
        let client = PuterHttpClient::new().unwrap();
        assert_eq!(client.api_url().as_str(), "https://api.puter.com/");
    }

    #[test]
    fn custom_origin_is_used_for_endpoints() {
        let client = PuterHttpClient::builder()
            .api_url("http://puter.localhost:4100")
            .build()
            .unwrap();
        let url = client.endpoint("drivers/call").unwrap();
        assert_eq!(url.as_str(), "http://puter.localhost:4100/drivers/call");
    }

    #[test]
    fn invalid_origin_is_a_build_error() {
        let result = PuterHttpClient::builder().api_url("not a url").build();
        assert!(matches!(result, Err(BuildError::ApiUrl(_))));
    }
}
