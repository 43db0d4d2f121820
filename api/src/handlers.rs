use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::answer_response::{AnswerResponse, HealthResponse};
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::AppState;
use crate::query_payload::ValidationPolicy;
use crate::request_log::request_id;

/// Handler: POST /
///
/// ```bash
/// curl -X POST http://127.0.0.1:3000/ \
///   -H 'content-type: application/json' \
///   -d '{"question":"What is the return policy?"}'
/// ```
pub async fn handle_root(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> GatewayResult<Json<AnswerResponse>> {
    let body = read_body(body)?;
    answer_with_policy(&state, state.root_policy, &headers, &body).await
}

/// Handler: POST /query
pub async fn handle_query(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> GatewayResult<Json<AnswerResponse>> {
    let body = read_body(body)?;
    answer_with_policy(&state, state.query_policy, &headers, &body).await
}

/// Keeps body-read failures (notably an exceeded `MAX_BODY_BYTES`) in the
/// gateway's JSON error shape.
fn read_body(body: Result<Bytes, BytesRejection>) -> GatewayResult<Bytes> {
    body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            GatewayError::PayloadTooLarge
        } else {
            GatewayError::UnreadableBody(rejection.body_text())
        }
    })
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

async fn answer_with_policy(
    state: &AppState,
    policy: ValidationPolicy,
    headers: &HeaderMap,
    body: &[u8],
) -> GatewayResult<Json<AnswerResponse>> {
    let request_id = request_id(headers);

    let payload = policy.parse(body).map_err(|e| {
        log::warn!("[{}] rejected body ({:?}): {}", request_id, policy, e);
        e
    })?;

    log::debug!(
        "[{}] question of {} chars, image: {}",
        request_id,
        payload.question.chars().count(),
        payload.image.is_some()
    );

    let result = state
        .answers
        .get_relevant_answer(&payload.question, payload.image.as_deref())
        .await
        .map_err(|e| {
            log::error!("[{}] answer service failed: {:#}", request_id, e);
            GatewayError::Upstream(e)
        })?;

    if let Some(position) = result.first_link_without_url() {
        log::error!(
            "[{}] answer service returned a link without url at position {}",
            request_id,
            position
        );
        return Err(GatewayError::MalformedLink(position));
    }

    Ok(Json(result.into()))
}
