use axum::{
    Extension, Form, Json,
    extract::{Path, State},
    response::Redirect,
};
use tracing::warn;
use uuid::Uuid;

use teamdesk_types::api::{ChangeRoleForm, CreateUserForm, OkBody};
use teamdesk_types::SessionUser;

use crate::auth::hash_password;
use crate::{AppState, error::ApiError};

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Form(form): Form<CreateUserForm>,
) -> Result<Redirect, ApiError> {
    if !user.role.is_admin() {
        return Err(ApiError::Forbidden);
    }

    let id = Uuid::new_v4().to_string();
    let password_hash = hash_password(&form.password);

    let db = state.clone();
    let result = tokio::task::spawn_blocking(move || {
        db.db
            .create_user(&id, &form.username, &password_hash, form.role.as_str())
    })
    .await?;

    // Duplicate usernames are swallowed; the admin page just reloads
    // without the new row.
    if let Err(e) = result {
        warn!("User insert rejected (duplicate username?): {:#}", e);
    }

    Ok(Redirect::to("/admin"))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<OkBody>, ApiError> {
    if !user.role.is_admin() {
        return Err(ApiError::Forbidden);
    }

    let db = state.clone();
    tokio::task::spawn_blocking(move || db.db.delete_user(&id)).await??;
    Ok(Json(OkBody { ok: true }))
}

pub async fn change_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<SessionUser>,
    Form(form): Form<ChangeRoleForm>,
) -> Result<Redirect, ApiError> {
    if !user.role.is_admin() {
        return Err(ApiError::Forbidden);
    }

    let db = state.clone();
    let changed =
        tokio::task::spawn_blocking(move || db.db.update_user_role(&id, form.role.as_str()))
            .await??;
    if changed == 0 {
        return Err(ApiError::NotFound);
    }

    Ok(Redirect::to("/admin"))
}
