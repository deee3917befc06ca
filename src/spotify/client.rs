use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{error::ServiceError, spotify::upstream_detail};

/// Shared Web API client: one connection pool, base URL and deadline for
/// every relay call.
///
/// The service never stores tokens, so this type carries none. Each request
/// borrows the caller's access token through
/// [`with_token`](Self::with_token), which yields an [`AuthorizedClient`]
/// scoped to that token.
#[derive(Debug, Clone)]
pub struct SpotifyApi {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl SpotifyApi {
    /// Creates a client for the Web API at `base_url` (no trailing slash).
    pub fn new(base_url: String, timeout: Duration) -> Self {
        SpotifyApi {
            http: Client::new(),
            base_url,
            timeout,
        }
    }

    /// Binds a bearer token to this client for the duration of one borrow.
    pub fn with_token<'a>(&'a self, access_token: &'a str) -> AuthorizedClient<'a> {
        AuthorizedClient {
            api: self,
            access_token,
        }
    }
}

/// A [`SpotifyApi`] handle bound to one caller's access token.
///
/// Centralizes what every Web API call shares: the bearer header, the
/// per-request timeout, and the mapping of upstream failures onto
/// [`ServiceError`]. A 401 or 403 from Spotify means the token is expired,
/// revoked or under-scoped and becomes [`ServiceError::Unauthorized`]; any
/// other non-success status becomes [`ServiceError::Upstream`] with the
/// upstream status and message attached.
pub struct AuthorizedClient<'a> {
    api: &'a SpotifyApi,
    access_token: &'a str,
}

impl AuthorizedClient<'_> {
    /// GETs `path` and deserializes the JSON response body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ServiceError> {
        let mut request = self.request(Method::GET, path);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::upstream(None, format!("invalid upstream payload: {e}")))
    }

    /// GETs `path`, treating `204 No Content` and empty bodies as `None`.
    ///
    /// The player state endpoint answers 204 when nothing is playing and no
    /// device is online, so absence is a regular outcome here rather than an
    /// error.
    pub async fn get_optional_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, ServiceError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::upstream(None, format!("invalid upstream payload: {e}")))?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| ServiceError::upstream(None, format!("invalid upstream payload: {e}")))
    }

    /// PUTs to `path`, optionally with a JSON body, expecting no content back.
    ///
    /// Player commands answer 204 (sometimes 202); any success status counts.
    pub async fn put_no_content(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<(), ServiceError> {
        let mut request = self.request(Method::PUT, path);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request).await.map(|_| ())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.api
            .http
            .request(method, format!("{}{}", self.api.base_url, path))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ServiceError> {
        let response = request
            .bearer_auth(self.access_token)
            .timeout(self.api.timeout)
            .send()
            .await
            .map_err(|e| ServiceError::upstream(None, format!("request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = upstream_detail(response).await;
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ServiceError::Unauthorized(detail));
        }
        Err(ServiceError::upstream(Some(status.as_u16()), detail))
    }
}
