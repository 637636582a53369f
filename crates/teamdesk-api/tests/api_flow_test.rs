//! Integration tests: drive the assembled router end-to-end over an
//! in-memory database, from login cookie to gated mutations.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use teamdesk_api::{AppState, AppStateInner};
use teamdesk_session::SessionStore;

fn app() -> Router {
    let state: AppState = Arc::new(AppStateInner {
        db: teamdesk_db::Database::open(Path::new(":memory:")).unwrap(),
        sessions: SessionStore::new(),
    });
    teamdesk_api::router(state)
}

async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.unwrap()
}

async fn body_string(resp: Response<Body>) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(resp: Response<Body>) -> Value {
    serde_json::from_str(&body_string(resp).await).unwrap()
}

/// Logs in and returns the `session_id=<token>` cookie pair.
async fn login(app: &Router, username: &str, password: &str) -> String {
    let resp = send(
        app,
        Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!(
                "username={}&password={}",
                username, password
            )))
            .unwrap(),
    )
    .await;
    assert!(resp.status().is_redirection(), "login should redirect");

    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets the session cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

fn get(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, cookie: &str, json: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

fn post_form(uri: &str, cookie: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

fn delete(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn unauthenticated_requests_are_turned_away() {
    let app = app();

    // APIs answer 401 JSON.
    let resp = send(&app, Request::builder().uri("/api/notes").body(Body::empty()).unwrap()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "unauthorized");

    // Pages redirect to the login screen.
    let resp = send(&app, Request::builder().uri("/home").body(Body::empty()).unwrap()).await;
    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
}

#[tokio::test]
async fn login_logout_round_trip() {
    let app = app();

    // Wrong credentials render the retry page, no cookie.
    let resp = send(
        &app,
        post_form("/login", "", "username=admin&password=salah"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    assert!(body_string(resp).await.contains("Login Gagal"));

    // The seeded admin signs in; the cookie opens the API.
    let cookie = login(&app, "admin", "admin").await;
    let resp = send(&app, get("/api/notes", &cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Logout kills the session; the old cookie is dead.
    let resp = send(&app, post_form("/logout", &cookie, "")).await;
    assert!(resp.status().is_redirection());
    let resp = send(&app, get("/api/notes", &cookie)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn notes_folder_lifecycle() {
    let app = app();
    let cookie = login(&app, "admin", "admin").await;

    let resp = send(
        &app,
        post_json(
            "/api/notes",
            &cookie,
            r#"{"title":"Dokumen","content":"","is_folder":1,"parent_id":null}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let folder_id = body_json(resp).await["id"].as_str().unwrap().to_string();

    let resp = send(
        &app,
        post_json(
            "/api/notes",
            &cookie,
            &format!(
                r#"{{"title":"Notulen","content":"isi rapat","is_folder":0,"parent_id":"{}"}}"#,
                folder_id
            ),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let note_id = body_json(resp).await["id"].as_str().unwrap().to_string();

    // A folder with children cannot be deleted.
    let resp = send(&app, delete(&format!("/api/notes/{}", folder_id), &cookie)).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "folder_not_empty");

    // The list still holds both rows, child intact.
    let resp = send(&app, get("/api/notes", &cookie)).await;
    let notes = body_json(resp).await;
    assert_eq!(notes.as_array().unwrap().len(), 2);

    // Child first, then the folder goes.
    let resp = send(&app, delete(&format!("/api/notes/{}", note_id), &cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = send(&app, delete(&format!("/api/notes/{}", folder_id), &cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&app, get("/api/notes", &cookie)).await;
    assert_eq!(body_json(resp).await.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn cashflow_page_carries_the_running_balance() {
    let app = app();
    let cookie = login(&app, "admin", "admin").await;

    let resp = send(
        &app,
        post_form(
            "/api/cashflow",
            &cookie,
            "date=2024-01-01&type=IN&description=Donasi&amount=1000&category=umum",
        ),
    )
    .await;
    assert!(resp.status().is_redirection());
    let resp = send(
        &app,
        post_form(
            "/api/cashflow",
            &cookie,
            "date=2024-01-02&type=OUT&description=Beli+Snack&amount=300&category=yatim",
        ),
    )
    .await;
    assert!(resp.status().is_redirection());

    // Unfiltered: balance 700, most recent transaction listed first.
    let resp = send(&app, get("/cashflow", &cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("Rp 700"));
    let newer = html.find("2024-01-02").unwrap();
    let older = html.find("2024-01-01").unwrap();
    assert!(newer < older, "display order is most recent first");

    // Category filter computes its own balance.
    let resp = send(&app, get("/cashflow?cat=umum", &cookie)).await;
    let html = body_string(resp).await;
    assert!(html.contains("Rp 1.000"));

    // Deleting a missing entry is a 404.
    let resp = send(&app, delete("/api/cashflow/999", &cookie)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn view_only_users_cannot_write() {
    let app = app();
    let admin = login(&app, "admin", "admin").await;

    let resp = send(
        &app,
        post_form(
            "/api/users",
            &admin,
            "username=tamu&password=rahasia&role=view_only",
        ),
    )
    .await;
    assert!(resp.status().is_redirection());

    let viewer = login(&app, "tamu", "rahasia").await;

    // Reads pass, writes do not.
    let resp = send(&app, get("/api/notes", &viewer)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = send(
        &app,
        post_json(
            "/api/notes",
            &viewer,
            r#"{"title":"x","content":"y","is_folder":0,"parent_id":null}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(resp).await["error"], "forbidden");

    // User management stays admin-only; the admin page bounces viewers.
    let resp = send(&app, delete("/api/users/someone", &viewer)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let resp = send(&app, get("/admin", &viewer)).await;
    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/home");

    let resp = send(&app, get("/admin", &admin)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("tamu"));
}

#[tokio::test]
async fn event_ownership_is_enforced_over_http() {
    let app = app();
    let admin = login(&app, "admin", "admin").await;

    let resp = send(
        &app,
        post_form(
            "/api/users",
            &admin,
            "username=budi&password=rahasia&role=contributor",
        ),
    )
    .await;
    assert!(resp.status().is_redirection());

    // Admin creates an event; the feed derives the color from the category.
    let resp = send(
        &app,
        post_json(
            "/api/events",
            &admin,
            r#"{"title":"Rapat","description":"koordinasi","start_time":"2024-03-01T09:00","end_time":"2024-03-01T10:00","category":"bipeka"}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&app, get("/api/events", &admin)).await;
    let feed = body_json(resp).await;
    let item = &feed.as_array().unwrap()[0];
    assert_eq!(item["backgroundColor"], "#059669");
    assert_eq!(item["extendedProps"]["created_by"], "admin");
    let event_id = item["id"].as_str().unwrap().to_string();

    // A contributor cannot delete someone else's event.
    let budi = login(&app, "budi", "rahasia").await;
    let resp = send(&app, delete(&format!("/api/events/{}", event_id), &budi)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // The owner (admin) can.
    let resp = send(&app, delete(&format!("/api/events/{}", event_id), &admin)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = send(&app, delete(&format!("/api/events/{}", event_id), &admin)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn change_password_checks_the_old_one() {
    let app = app();
    let cookie = login(&app, "admin", "admin").await;

    let resp = send(
        &app,
        post_form(
            "/api/change-password",
            &cookie,
            "old_password=salah&new_password=baru",
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = send(
        &app,
        post_form(
            "/api/change-password",
            &cookie,
            "old_password=admin&new_password=baru",
        ),
    )
    .await;
    assert!(resp.status().is_redirection());

    // The new password works on a fresh login.
    login(&app, "admin", "baru").await;
}
