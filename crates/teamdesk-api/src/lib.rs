pub mod auth;
pub mod cashflow;
pub mod error;
pub mod events;
pub mod layout;
pub mod middleware;
pub mod notes;
pub mod pages;
pub mod users;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use teamdesk_db::Database;
use teamdesk_session::SessionStore;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub sessions: SessionStore,
}

/// The full application router. HTML pages resolve their own session
/// and redirect to the login screen; JSON APIs sit behind the session
/// middleware and answer 401 JSON instead.
pub fn router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route("/", get(auth::login_page))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/home", get(pages::home))
        .route("/calendar", get(pages::calendar))
        .route("/cashflow", get(pages::cashflow))
        .route("/notes", get(pages::notes))
        .route("/admin", get(pages::admin))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/api/events", get(events::list).post(events::create))
        .route("/api/events/{id}", put(events::update).delete(events::remove))
        .route("/api/cashflow", post(cashflow::create))
        .route("/api/cashflow/{id}", delete(cashflow::remove))
        .route("/api/notes", get(notes::list).post(notes::create))
        .route("/api/notes/{id}", put(notes::update).delete(notes::remove))
        .route("/api/users", post(users::create))
        .route("/api/users/{id}", delete(users::remove))
        .route("/api/users/{id}/role", post(users::change_role))
        .route("/api/change-password", post(auth::change_password))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_session,
        ))
        .with_state(state);

    Router::new().merge(page_routes).merge(api_routes)
}
