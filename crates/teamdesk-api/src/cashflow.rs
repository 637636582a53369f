use axum::{
    Extension, Form, Json,
    extract::{Path, State},
    response::Redirect,
};

use teamdesk_types::api::{CashflowForm, FlowDirection, OkBody};
use teamdesk_types::SessionUser;

use crate::{AppState, error::ApiError};

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Form(form): Form<CashflowForm>,
) -> Result<Redirect, ApiError> {
    if !user.role.can_write() {
        return Err(ApiError::Forbidden);
    }

    // The form always submits a positive magnitude; the direction
    // decides the sign.
    let amount = match form.direction {
        FlowDirection::In => form.amount.abs(),
        FlowDirection::Out => -form.amount.abs(),
    };

    let db = state.clone();
    tokio::task::spawn_blocking(move || {
        db.db.insert_cashflow(
            &form.date.to_string(),
            &form.description,
            amount,
            form.category.as_str(),
            &user.username,
        )
    })
    .await??;

    Ok(Redirect::to("/cashflow"))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<i64>,
) -> Result<Json<OkBody>, ApiError> {
    if !user.role.can_write() {
        return Err(ApiError::Forbidden);
    }

    let db = state.clone();
    let deleted = tokio::task::spawn_blocking(move || db.db.delete_cashflow(id)).await??;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(Json(OkBody { ok: true }))
}
