use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use sha2::{Digest, Sha256};
use tracing::warn;
use uuid::Uuid;

use teamdesk_types::api::{ChangePasswordForm, LoginForm};
use teamdesk_types::{Role, SessionUser};

use crate::middleware::{SESSION_COOKIE, page_session};
use crate::{AppState, error::ApiError, layout};

const SESSION_MAX_AGE_SECS: i64 = 86_400;

/// SHA-256 hex digest. The only form a password is ever stored in.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

pub async fn login_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    if page_session(&state, &jar).is_some() {
        return Redirect::to("/home").into_response();
    }
    layout::login_page().into_response()
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let db = state.clone();
    let username = form.username.clone();
    let row = tokio::task::spawn_blocking(move || db.db.get_user_by_username(&username)).await??;

    let Some(row) = row else {
        warn!("Login failed for unknown user '{}'", form.username);
        return Ok(layout::login_failed().into_response());
    };
    if hash_password(&form.password) != row.password {
        warn!("Login failed for '{}'", form.username);
        return Ok(layout::login_failed().into_response());
    }

    // Session snapshot never carries the password hash.
    let user = SessionUser {
        id: row.id.parse::<Uuid>().map_err(|e| {
            ApiError::Internal(anyhow::anyhow!("corrupt user id '{}': {}", row.id, e))
        })?,
        username: row.username,
        role: Role::parse(&row.role),
    };
    let token = state.sessions.create(user)?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(SESSION_MAX_AGE_SECS))
        .build();

    Ok((jar.add(cookie), Redirect::to("/home")).into_response())
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.destroy(cookie.value())?;
    }
    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    Ok((jar.remove(removal), Redirect::to("/")).into_response())
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Form(form): Form<ChangePasswordForm>,
) -> Result<Response, ApiError> {
    let db = state.clone();
    let id = user.id.to_string();
    let row = tokio::task::spawn_blocking(move || db.db.get_user_by_id(&id))
        .await??
        .ok_or(ApiError::NotFound)?;

    if hash_password(&form.old_password) != row.password {
        return Err(ApiError::Forbidden);
    }

    let db = state.clone();
    let id = user.id.to_string();
    let new_hash = hash_password(&form.new_password);
    tokio::task::spawn_blocking(move || db.db.update_user_password(&id, &new_hash)).await??;

    Ok(Redirect::to("/home").into_response())
}
