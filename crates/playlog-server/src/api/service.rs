//! Remote call and record listing handlers

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, HeaderMap},
    Json,
};
use playlog_core::endpoint::Empty;
use playlog_core::{Error, PlaybackRecord, RelayCall, UserId};
use serde::Deserialize;
use tracing::debug;

use super::ApiError;
use crate::AppState;

/// Resolve the caller from `Authorization: Bearer <token>`
fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<UserId, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(Error::Unauthenticated)?;

    Ok(state.service.directory().authenticate(token)?)
}

/// POST /service
pub async fn service_call(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<RelayCall>, JsonRejection>,
) -> Result<Json<Empty>, ApiError> {
    let user = authenticate(&state, &headers)?;
    let Json(call) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    debug!(user = user.0, method = call.method_name(), "Remote call");
    Ok(Json(state.service.call(user, call).await?))
}

#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    pub context: i64,
}

/// GET /records?context=<id>
pub async fn list_records(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RecordsQuery>,
) -> Result<Json<Vec<PlaybackRecord>>, ApiError> {
    let user = authenticate(&state, &headers)?;
    Ok(Json(state.service.records(user, query.context).await?))
}
