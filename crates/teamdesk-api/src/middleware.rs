use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use tracing::error;

use teamdesk_types::SessionUser;

use crate::{AppState, error::ApiError};

pub const SESSION_COOKIE: &str = "session_id";

/// Resolves the session cookie and stashes the user snapshot as a
/// request extension. API routes behind this layer answer 401 JSON when
/// the cookie is absent, unknown, or expired.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(ApiError::Unauthorized)?;

    let user = state
        .sessions
        .resolve(&token)?
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Page variant: pages redirect to the login screen instead of failing,
/// so a broken session store just reads as "not signed in".
pub fn page_session(state: &AppState, jar: &CookieJar) -> Option<SessionUser> {
    let token = jar.get(SESSION_COOKIE)?.value().to_string();
    match state.sessions.resolve(&token) {
        Ok(user) => user,
        Err(e) => {
            error!("Session lookup failed: {:#}", e);
            None
        }
    }
}
