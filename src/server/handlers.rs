use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use serde::Serialize;

use super::error::ApiError;
use super::AppState;
use crate::events::{Classification, EventNormalizer, StoredRecord};
use crate::github::{WebhookPayload, EVENT_HEADER, SIGNATURE_HEADER};

pub const EVENT_PROCESSED: &str = "Event processed";
pub const NO_ACTION: &str = "No action handled";
pub const DUPLICATE_IGNORED: &str = "Duplicate event ignored";

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    tracing::debug!(bytes = body.len(), "Received webhook delivery");

    let signature = header_str(&headers, SIGNATURE_HEADER);
    if !state.validator.verify(&body, signature) {
        tracing::warn!(
            signature = signature.unwrap_or("<missing>"),
            "Rejected webhook with invalid signature"
        );
        return Err(ApiError::InvalidSignature);
    }

    let payload: WebhookPayload =
        serde_json::from_slice(&body).map_err(|e| ApiError::MalformedPayload(e.to_string()))?;
    let discriminator = EventNormalizer::discriminator(&payload, header_str(&headers, EVENT_HEADER));

    let record = match EventNormalizer::normalize(&payload, discriminator, Utc::now()) {
        Classification::Record(record) => record,
        Classification::NoAction => {
            tracing::info!(
                discriminator = discriminator.unwrap_or("<none>"),
                "No actionable event type received"
            );
            return Ok(MessageResponse::new(NO_ACTION));
        }
    };

    // Held until the append below so concurrent redeliveries cannot both pass the check.
    let _dedupe_guard = match (state.dedupe_deliveries, record.request_id.as_deref()) {
        (true, Some(request_id)) => {
            let guard = state.dedupe_lock.lock().await;
            if state
                .store
                .contains(request_id, record.action)
                .await
                .map_err(ApiError::StoreWrite)?
            {
                tracing::info!(
                    request_id,
                    action = %record.action,
                    "Ignoring redelivered event"
                );
                return Ok(MessageResponse::new(DUPLICATE_IGNORED));
            }
            Some(guard)
        }
        _ => None,
    };

    let id = state
        .store
        .append(&record)
        .await
        .map_err(ApiError::StoreWrite)?;
    tracing::info!(
        id = %id,
        request_id = ?record.request_id,
        action = %record.action,
        to_branch = ?record.to_branch,
        "Stored action"
    );

    Ok(MessageResponse::new(EVENT_PROCESSED))
}

pub async fn list_actions(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredRecord>>, ApiError> {
    let actions = state.store.list_recent().await.map_err(ApiError::StoreRead)?;
    tracing::debug!(count = actions.len(), "Fetched actions");
    Ok(Json(actions))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
