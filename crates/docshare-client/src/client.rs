//! Reqwest-based client for the docshare backend.

use std::sync::Arc;

use docshare_core::preview::ObjectUrlStore;
use docshare_core::{Error, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::error::transport;
use crate::session::Session;

/// Tracing target for backend API operations.
pub const TRACING_TARGET: &str = "docshare_client::api";

/// Longest response body excerpt carried in an error message.
const ERROR_BODY_LIMIT: usize = 256;

/// Inner client that holds the HTTP client and its collaborators.
struct ApiClientInner {
    http: Client,
    config: ClientConfig,
    base_url: Url,
    session: Session,
    objects: ObjectUrlStore,
}

/// Client for every backend endpoint.
///
/// Authorization is taken from the [`Session`] passed at construction.
/// Endpoints that need a token fail with
/// [`ErrorKind::Unauthenticated`](docshare_core::ErrorKind::Unauthenticated)
/// before any request is sent when none is held.
///
/// # Examples
///
/// ```rust,ignore
/// use docshare_client::{ApiClient, ClientConfig, Session};
///
/// let client = ApiClient::new(ClientConfig::default(), Session::in_memory())?;
/// let documents = client.team_files().await?;
/// ```
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.inner.config)
            .field("objects", &self.inner.objects)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a new client with the given configuration and session.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: ClientConfig, session: Session) -> Result<Self> {
        let base_url = config.base_url()?;
        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %base_url,
            timeout_ms = timeout.as_millis(),
            "Creating API client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()
            .map_err(|e| {
                Error::configuration()
                    .with_message("failed to create HTTP client")
                    .with_source(e)
            })?;

        let inner = ApiClientInner {
            http,
            config,
            base_url,
            session,
            objects: ObjectUrlStore::new(),
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Gets the session this client authorizes with.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Gets the registry backing preview access URLs.
    pub fn object_urls(&self) -> &ObjectUrlStore {
        &self.inner.objects
    }

    /// Gets the underlying HTTP client.
    pub(crate) fn http(&self) -> &Client {
        &self.inner.http
    }

    /// Builds an endpoint URL by appending percent-encoded path segments.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::configuration().with_message("API URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Starts a request that carries no credentials.
    pub(crate) fn public(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        Ok(self.http().request(method, self.endpoint(segments)?))
    }

    /// Starts a request authorized with the session token.
    pub(crate) async fn authorized(
        &self,
        method: Method,
        segments: &[&str],
    ) -> Result<RequestBuilder> {
        let bearer = self.session().bearer().await?;
        Ok(self.public(method, segments)?.header(AUTHORIZATION, bearer))
    }

    /// Starts a request that requires the administrator role.
    pub(crate) async fn authorized_admin(
        &self,
        method: Method,
        segments: &[&str],
    ) -> Result<RequestBuilder> {
        let bearer = self.session().require_admin().await?;
        Ok(self.public(method, segments)?.header(AUTHORIZATION, bearer))
    }

    /// Sends the request and maps non-success statuses into errors.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(transport)?;
        let status = response.status();

        tracing::debug!(
            target: TRACING_TARGET,
            url = %response.url(),
            status = status.as_u16(),
            "Backend responded"
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body))
    }

    /// Sends the request and decodes the JSON response body.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await.map_err(transport)?;
        serde_json::from_slice(&bytes).map_err(transport)
    }

    /// Sends the request and discards the response body.
    pub(crate) async fn send_empty(&self, request: RequestBuilder) -> Result<()> {
        self.send(request).await.map(drop)
    }
}

/// Maps a non-success backend status into an error.
pub(crate) fn status_error(status: StatusCode, body: &str) -> Error {
    let error = if status == StatusCode::UNAUTHORIZED {
        Error::unauthenticated()
    } else {
        Error::network_error()
    };

    let detail = body.trim();
    let message = if detail.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_owned()
    } else {
        detail.chars().take(ERROR_BODY_LIMIT).collect()
    };

    error.with_status(status.as_u16()).with_message(message)
}
