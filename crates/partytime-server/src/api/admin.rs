use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use tracing::{info, warn};

use partytime_shared::protocol::{
    ChangePasswordRequest, LoginRequest, MeResponse, MessageResponse,
};

use super::extract::ApiJson;
use super::AppState;
use crate::auth::session::{clear_session_cookie, session_cookie};
use crate::auth::{AuthSubject, CredentialError};
use crate::error::ServerError;

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Response, ServerError> {
    let admin = match state.credentials.verify(&req.username, &req.password).await {
        Ok(admin) => admin,
        Err(CredentialError::NotFound) => {
            warn!(username = %req.username, "Login for unknown admin");
            return Err(ServerError::InvalidCredentials);
        }
        Err(CredentialError::Mismatch) => {
            warn!(username = %req.username, "Login with wrong password");
            return Err(ServerError::InvalidCredentials);
        }
        Err(e) => return Err(ServerError::Internal(e.to_string())),
    };

    let token = state
        .tokens
        .issue(admin.id, &admin.username)
        .map_err(|e| ServerError::Internal(format!("Failed to sign token: {e}")))?;
    let cookie = session_cookie(&token, state.tokens.ttl_secs(), state.config.cookie_secure)
        .map_err(|e| ServerError::Internal(format!("Unencodable session cookie: {e}")))?;

    info!(username = %admin.username, "Admin logged in");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::new("Login successful.")),
    )
        .into_response())
}

/// Clears the cookie only; an already issued token stays valid until expiry.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_session_cookie(state.config.cookie_secure))],
        Json(MessageResponse::new("Logged out successfully.")),
    )
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(subject): Extension<AuthSubject>,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ServerError> {
    if req.new_password.is_empty() {
        return Err(ServerError::BadRequest("New password is required.".to_string()));
    }

    let admin_gone = || ServerError::NotFound("Admin not found.".to_string());

    match state.credentials.verify_id(subject.id, &req.old_password).await {
        Ok(_) => {}
        Err(CredentialError::NotFound) => return Err(admin_gone()),
        Err(CredentialError::Mismatch) => {
            warn!(username = %subject.username, "Password change with wrong old password");
            return Err(ServerError::IncorrectPassword);
        }
        Err(e) => return Err(ServerError::Internal(e.to_string())),
    }

    match state.credentials.update_password(subject.id, &req.new_password).await {
        Ok(()) => {}
        Err(CredentialError::NotFound) => return Err(admin_gone()),
        Err(e) => return Err(ServerError::Internal(e.to_string())),
    }

    info!(username = %subject.username, "Admin password changed");
    Ok(Json(MessageResponse::new("Password changed successfully.")))
}

pub async fn me(Extension(subject): Extension<AuthSubject>) -> Json<MeResponse> {
    Json(MeResponse {
        id: subject.id,
        username: subject.username,
    })
}
