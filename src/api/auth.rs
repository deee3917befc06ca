use std::collections::HashMap;

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{api::require, error::ServiceError, server::AppState};

pub async fn login(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "auth_url": state.auth.authorize_url().to_string()
    }))
}

pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ServiceError> {
    // The consent screen redirects back with error= when the user declines.
    if let Some(error) = params.get("error") {
        return Err(ServiceError::AuthenticationFailed(format!(
            "authorization was denied: {error}"
        )));
    }

    let code = require(&params, "code")?;
    let tokens = state.auth.exchange_code(code).await?;

    let mut target = state.config.frontend_url.clone();
    target
        .query_pairs_mut()
        .append_pair("access_token", &tokens.access_token)
        .append_pair("refresh_token", &tokens.refresh_token)
        .append_pair("expires_in", &tokens.expires_in.to_string());

    tracing::info!("authorization code exchanged, redirecting to frontend");
    Ok((StatusCode::FOUND, [(header::LOCATION, target.to_string())]).into_response())
}

#[derive(Debug, Deserialize)]
struct RefreshBody {
    refresh_token: Option<String>,
}

pub async fn refresh(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Json<Value>, ServiceError> {
    // The token may arrive as a query parameter or inside a JSON body; the
    // query parameter wins when both are present.
    let refresh_token = params
        .get("refresh_token")
        .filter(|token| !token.trim().is_empty())
        .cloned()
        .or_else(|| {
            serde_json::from_slice::<RefreshBody>(&body)
                .ok()
                .and_then(|body| body.refresh_token)
                .filter(|token| !token.trim().is_empty())
        })
        .ok_or_else(|| {
            ServiceError::validation("refresh_token is required (query parameter or JSON body)")
        })?;

    let renewed = state.auth.refresh(&refresh_token).await?;
    Ok(Json(json!({
        "access_token": renewed.access_token,
        "expires_in": renewed.expires_in,
    })))
}
