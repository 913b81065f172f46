//! Session transport: the `token` cookie, the bearer header and the guard
//! that protects admin routes.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, header::InvalidHeaderValue, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use partytime_shared::constants::TOKEN_COOKIE;

use super::jwt::TokenService;
use crate::error::ServerError;

/// `Set-Cookie` value carrying a freshly issued token.
pub fn session_cookie(
    token: &str,
    max_age_secs: i64,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut value = format!(
        "{TOKEN_COOKIE}={token}; HttpOnly; SameSite=Strict; Path=/; Max-Age={max_age_secs}"
    );
    if secure {
        value.push_str("; Secure");
    }
    HeaderValue::from_str(&value)
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn clear_session_cookie(secure: bool) -> HeaderValue {
    const EXPIRED: &str = concat!(
        "token=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0; ",
        "Expires=Thu, 01 Jan 1970 00:00:00 GMT"
    );
    const EXPIRED_SECURE: &str = concat!(
        "token=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0; ",
        "Expires=Thu, 01 Jan 1970 00:00:00 GMT; Secure"
    );
    let value = if secure { EXPIRED_SECURE } else { EXPIRED };
    HeaderValue::from_static(value)
}

/// Read a cookie by name from the `Cookie` header(s).
pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for cookie in headers.get_all(header::COOKIE) {
        let Ok(s) = cookie.to_str() else { continue };
        for part in s.split(';') {
            if let Some((k, v)) = part.trim().split_once('=') {
                if k == name && !v.is_empty() {
                    return Some(v.to_string());
                }
            }
        }
    }
    None
}

/// Locate the session token: `Authorization: Bearer` wins over the cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    match bearer {
        Some(token) => Some(token.to_string()),
        None => parse_cookie(headers, TOKEN_COOKIE),
    }
}

/// Route guard for admin endpoints.
///
/// Rejects with 401 when no token is present and 403 when the token does
/// not verify. On success the [`AuthSubject`](super::AuthSubject) is made
/// available to handlers as an `Extension`.
pub async fn require_session(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let token = extract_token(req.headers()).ok_or(ServerError::Unauthenticated)?;

    let subject = tokens.verify(&token).map_err(|_| {
        debug!(path = %req.uri().path(), "Rejected session token");
        ServerError::InvalidToken
    })?;

    req.extensions_mut().insert(subject);
    Ok(next.run(req).await)
}
