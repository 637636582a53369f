use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use teamdesk_db::models::EventRow;
use teamdesk_types::api::{EventFeedItem, EventPayload, EventProps, OkBody};
use teamdesk_types::{EventCategory, SessionUser};

use crate::{AppState, error::ApiError};

/// Shapes a stored event for the calendar widget. The display color is
/// derived from the category here, never persisted.
fn feed_item(row: EventRow) -> EventFeedItem {
    let category = EventCategory::parse(&row.category);
    EventFeedItem {
        id: row.id,
        title: row.title,
        start: row.start_time,
        end: row.end_time,
        background_color: category.color().to_string(),
        border_color: category.color().to_string(),
        extended_props: EventProps {
            created_by: row.created_by,
            description: row.description.unwrap_or_default(),
            category,
        },
    }
}

pub async fn list(
    State(state): State<AppState>,
    Extension(_user): Extension<SessionUser>,
) -> Result<Json<Vec<EventFeedItem>>, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_events()).await??;
    Ok(Json(rows.into_iter().map(feed_item).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<EventPayload>,
) -> Result<Json<OkBody>, ApiError> {
    let db = state.clone();
    let id = Uuid::new_v4().to_string();
    tokio::task::spawn_blocking(move || {
        db.db.insert_event(
            &id,
            &payload.title,
            payload.description.as_deref(),
            &payload.start_time,
            &payload.end_time,
            payload.category.as_str(),
            &user.username,
        )
    })
    .await??;
    Ok(Json(OkBody { ok: true }))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<EventPayload>,
) -> Result<Json<OkBody>, ApiError> {
    check_ownership(&state, &id, &user).await?;

    let db = state.clone();
    tokio::task::spawn_blocking(move || {
        db.db.update_event(
            &id,
            &payload.title,
            payload.description.as_deref(),
            &payload.start_time,
            &payload.end_time,
            payload.category.as_str(),
        )
    })
    .await??;
    Ok(Json(OkBody { ok: true }))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<OkBody>, ApiError> {
    check_ownership(&state, &id, &user).await?;

    let db = state.clone();
    tokio::task::spawn_blocking(move || db.db.delete_event(&id)).await??;
    Ok(Json(OkBody { ok: true }))
}

/// Non-admins may only touch their own events; admins bypass.
async fn check_ownership(state: &AppState, id: &str, user: &SessionUser) -> Result<(), ApiError> {
    let db = state.clone();
    let id = id.to_string();
    let row = tokio::task::spawn_blocking(move || db.db.get_event(&id))
        .await??
        .ok_or(ApiError::NotFound)?;

    if !user.role.is_admin() && row.created_by != user.username {
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use teamdesk_types::Role;

    use crate::AppStateInner;

    fn test_state() -> AppState {
        Arc::new(AppStateInner {
            db: teamdesk_db::Database::open(std::path::Path::new(":memory:")).unwrap(),
            sessions: teamdesk_session::SessionStore::new(),
        })
    }

    fn session(username: &str, role: Role) -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            username: username.into(),
            role,
        }
    }

    #[tokio::test]
    async fn ownership_gates_non_admins() {
        let state = test_state();
        state
            .db
            .insert_event("e1", "Rapat", None, "2024-03-01T09:00", "2024-03-01T10:00", "bph", "alice")
            .unwrap();

        let result = check_ownership(&state, "e1", &session("bob", Role::Contributor)).await;
        assert!(matches!(result, Err(ApiError::Forbidden)));

        check_ownership(&state, "e1", &session("alice", Role::Member))
            .await
            .unwrap();
        check_ownership(&state, "e1", &session("root", Role::Admin))
            .await
            .unwrap();

        let result = check_ownership(&state, "missing", &session("root", Role::Admin)).await;
        assert!(matches!(result, Err(ApiError::NotFound)));
    }

    #[test]
    fn feed_item_derives_color_from_category() {
        let row = EventRow {
            id: "e1".into(),
            title: "Rapat".into(),
            description: None,
            start_time: "2024-03-01T09:00".into(),
            end_time: "2024-03-01T10:00".into(),
            category: "bipeka".into(),
            created_by: "admin".into(),
        };
        let item = feed_item(row);
        assert_eq!(item.background_color, "#059669");
        assert_eq!(item.border_color, item.background_color);
        assert_eq!(item.extended_props.category, EventCategory::Bipeka);
        assert_eq!(item.extended_props.description, "");
    }

    #[test]
    fn unknown_category_falls_back_to_default_color() {
        let row = EventRow {
            id: "e2".into(),
            title: "x".into(),
            description: Some("d".into()),
            start_time: "s".into(),
            end_time: "e".into(),
            category: "#3b82f6".into(), // legacy rows stored raw colors
            created_by: "admin".into(),
        };
        let item = feed_item(row);
        assert_eq!(item.background_color, EventCategory::Bph.color());
    }
}
