use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use teamdesk_ledger::{BalancedEntry, CategoryFilter, filter_by_category, with_running_balance};
use teamdesk_types::CashflowEntry;

use crate::middleware::page_session;
use crate::{AppState, error::ApiError, layout};

#[derive(Debug, Deserialize)]
pub struct CashflowQuery {
    pub cat: Option<String>,
}

pub async fn home(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    let Some(user) = page_session(&state, &jar) else {
        return Ok(Redirect::to("/").into_response());
    };

    let db = state.clone();
    let (balance, events, notes) = tokio::task::spawn_blocking(move || {
        let balance = db.db.cashflow_total()?;
        let events = db.db.upcoming_events(5)?;
        let notes = db.db.recent_notes(4)?;
        Ok::<_, anyhow::Error>((balance, events, notes))
    })
    .await??;

    Ok(layout::home_page(&user, balance, &events, &notes).into_response())
}

pub async fn calendar(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    let Some(user) = page_session(&state, &jar) else {
        return Ok(Redirect::to("/").into_response());
    };
    Ok(layout::calendar_page(&user).into_response())
}

pub async fn cashflow(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CashflowQuery>,
) -> Result<Response, ApiError> {
    let Some(user) = page_session(&state, &jar) else {
        return Ok(Redirect::to("/").into_response());
    };

    let filter = CategoryFilter::parse(query.cat.as_deref());

    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_cashflow()).await??;
    let entries: Vec<CashflowEntry> = rows.into_iter().map(Into::into).collect();

    let balanced = with_running_balance(filter_by_category(entries, filter));
    let balance = balanced.last().map(|b| b.balance).unwrap_or(0);
    // Most recent transaction first; balances stay attached to their
    // chronological values.
    let display: Vec<BalancedEntry> = balanced.into_iter().rev().collect();

    Ok(layout::cashflow_page(&user, filter, balance, &display).into_response())
}

pub async fn notes(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    let Some(user) = page_session(&state, &jar) else {
        return Ok(Redirect::to("/").into_response());
    };
    Ok(layout::notes_page(&user).into_response())
}

pub async fn admin(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    let Some(user) = page_session(&state, &jar) else {
        return Ok(Redirect::to("/").into_response());
    };
    if !user.role.is_admin() {
        return Ok(Redirect::to("/home").into_response());
    }

    let db = state.clone();
    let users = tokio::task::spawn_blocking(move || db.db.list_users()).await??;

    Ok(layout::admin_page(&user, &users).into_response())
}
