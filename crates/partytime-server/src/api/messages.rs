use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use partytime_shared::protocol::{ContactRequest, MessageResponse};
use partytime_store::Message;

use super::extract::{parse_id, ApiJson, ApiPath};
use super::AppState;
use crate::error::ServerError;

/// Public contact form.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ContactRequest>,
) -> Result<(StatusCode, Json<Message>), ServerError> {
    let name = req.name.trim();
    let email = req.email.trim();
    if name.is_empty() || email.is_empty() || req.message.trim().is_empty() {
        return Err(ServerError::BadRequest("Could not send message.".to_string()));
    }

    let message = Message {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        message: req.message,
        created_at: Utc::now(),
    };

    let db = state.db.lock().await;
    db.create_message(&message)?;

    info!(id = %message.id, "Contact message received");
    Ok((StatusCode::CREATED, Json(message)))
}

/// Newest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Message>>, ServerError> {
    let db = state.db.lock().await;
    Ok(Json(db.list_messages()?))
}

pub async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<MessageResponse>, ServerError> {
    let not_found = || ServerError::NotFound("Message not found.".to_string());
    let id = parse_id(&id, not_found)?;

    let db = state.db.lock().await;
    if !db.delete_message(id)? {
        return Err(not_found());
    }

    info!(id = %id, "Message deleted");
    Ok(Json(MessageResponse::new("Message deleted.")))
}
