use std::time::Duration;

use reqwest::{Client, Response, Url};
use tokio::time::sleep;

use crate::{
    config::AppConfig,
    error::ServiceError,
    spotify::upstream_detail,
    types::{RefreshedToken, TokenPair},
};

/// Implements the OAuth 2.0 authorization-code flow against Spotify.
///
/// This is the confidential-client variant of the flow: the service holds
/// the client secret and authenticates at the token endpoint with HTTP Basic
/// credentials. The browser only ever sees the authorization URL and the
/// resulting tokens; the secret never leaves the backend.
///
/// # Flow
///
/// 1. **Authorization URL**: [`authorize_url`](Self::authorize_url) builds
///    the URL the frontend sends the user to
/// 2. **User Authorization**: the user grants permissions on Spotify's
///    consent page and is redirected to our callback with a one-time code
/// 3. **Token Exchange**: [`exchange_code`](Self::exchange_code) trades the
///    code for an access/refresh token pair
/// 4. **Renewal**: [`refresh`](Self::refresh) trades the refresh token for a
///    fresh access token whenever the old one expires
///
/// All endpoint URLs come from [`AppConfig`], so tests can point an instance
/// at a local mock server.
#[derive(Debug, Clone)]
pub struct SpotifyAuth {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scope: String,
    authorize_endpoint: Url,
    token_endpoint: Url,
    http: Client,
    timeout: Duration,
}

impl SpotifyAuth {
    pub fn new(config: &AppConfig) -> Self {
        SpotifyAuth {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            scope: config.scope.clone(),
            authorize_endpoint: config.authorize_url.clone(),
            token_endpoint: config.token_url.clone(),
            http: Client::new(),
            timeout: config.request_timeout,
        }
    }

    /// Constructs the authorization URL the user is sent to.
    ///
    /// The URL carries exactly five query parameters: `client_id`,
    /// `response_type=code`, `redirect_uri`, the configured `scope`, and
    /// `show_dialog=true`. The consent dialog is forced so a returning user
    /// can pick a different account instead of being silently logged in with
    /// the previous one.
    ///
    /// # Example
    ///
    /// ```
    /// let url = auth.authorize_url();
    /// // https://accounts.spotify.com/authorize?client_id=...&response_type=code&...
    /// ```
    pub fn authorize_url(&self) -> Url {
        let mut url = self.authorize_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", &self.scope)
            .append_pair("show_dialog", "true");
        url
    }

    /// Exchanges an authorization code for an access/refresh token pair.
    ///
    /// Posts the code to the token endpoint with the `authorization_code`
    /// grant type. The `redirect_uri` must be sent again and must match the
    /// one used in the authorization request, per the OAuth specification.
    ///
    /// # Arguments
    ///
    /// * `code` - Single-use authorization code received on the callback
    ///
    /// # Errors
    ///
    /// Every failure surfaces as
    /// [`ServiceError::AuthenticationFailed`]: a non-success status from the
    /// token endpoint (expired or reused codes, mismatched redirect URI), a
    /// malformed response body, or a response whose token fields are empty
    /// strings. Spotify's `error_description` is included when present.
    ///
    /// # Security Note
    ///
    /// The authorization code is single-use and expires within minutes, so
    /// the exchange happens immediately when the callback is hit.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenPair, ServiceError> {
        tracing::debug!("exchanging authorization code for tokens");

        let response = self
            .token_request(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", &self.redirect_uri),
            ])
            .await
            .map_err(ServiceError::AuthenticationFailed)?;

        if !response.status().is_success() {
            let detail = upstream_detail(response).await;
            return Err(ServiceError::AuthenticationFailed(detail));
        }

        let pair: TokenPair = response
            .json()
            .await
            .map_err(|e| ServiceError::AuthenticationFailed(format!("malformed token response: {e}")))?;

        // A 200 with empty credentials is as unusable as a rejection.
        if pair.access_token.is_empty() || pair.refresh_token.is_empty() {
            return Err(ServiceError::AuthenticationFailed(
                "token endpoint returned empty credentials".to_string(),
            ));
        }

        Ok(pair)
    }

    /// Obtains a fresh access token from a refresh token.
    ///
    /// Uses the `refresh_token` grant type. Spotify may omit both the
    /// refresh token and `expires_in` from the renewal response; the caller
    /// keeps using its original refresh token and the expiry defaults to one
    /// hour.
    ///
    /// # Arguments
    ///
    /// * `refresh_token` - Refresh token obtained from a previous exchange
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::RefreshFailed`] when the endpoint rejects the
    /// token (revoked application access, malformed token) or the response
    /// cannot be parsed.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshedToken, ServiceError> {
        tracing::debug!("refreshing access token");

        let response = self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await
            .map_err(ServiceError::RefreshFailed)?;

        if !response.status().is_success() {
            let detail = upstream_detail(response).await;
            return Err(ServiceError::RefreshFailed(detail));
        }

        let renewed: RefreshedToken = response
            .json()
            .await
            .map_err(|e| ServiceError::RefreshFailed(format!("malformed token response: {e}")))?;

        if renewed.access_token.is_empty() {
            return Err(ServiceError::RefreshFailed(
                "token endpoint returned an empty access token".to_string(),
            ));
        }

        Ok(renewed)
    }

    /// Posts a form to the token endpoint with Basic client credentials.
    ///
    /// Retries once when no HTTP response arrived at all (connect failure or
    /// timeout). A response is never retried, whatever its status; the
    /// authorization code grant is single-use and resending it can only fail.
    async fn token_request(&self, form: &[(&str, &str)]) -> Result<Response, String> {
        let mut attempted = false;

        loop {
            let result = self
                .http
                .post(self.token_endpoint.clone())
                .basic_auth(&self.client_id, Some(&self.client_secret))
                .form(form)
                .timeout(self.timeout)
                .send()
                .await;

            match result {
                Ok(response) => return Ok(response),
                Err(err) if !attempted && (err.is_connect() || err.is_timeout()) => {
                    tracing::warn!("token endpoint unreachable, retrying once: {err}");
                    attempted = true;
                    sleep(Duration::from_millis(500)).await;
                    continue; // retry
                }
                Err(err) => return Err(err.to_string()), // propagate other errors
            }
        }
    }
}
