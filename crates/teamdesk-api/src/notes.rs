use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use teamdesk_types::api::{NoteCreated, NoteOk, SaveNotePayload};
use teamdesk_types::{Note, SessionUser};

use crate::{AppState, error::ApiError};

/// The full forest, most recently touched first. The client mirror
/// replaces its entire local set from this response.
pub async fn list(
    State(state): State<AppState>,
    Extension(_user): Extension<SessionUser>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_notes()).await??;
    Ok(Json(rows.into_iter().map(Note::from).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<SaveNotePayload>,
) -> Result<Json<NoteCreated>, ApiError> {
    if !user.role.can_write() {
        return Err(ApiError::Forbidden);
    }

    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now().timestamp_millis();
    // Folder content is unused by definition.
    let content = if payload.is_folder != 0 {
        String::new()
    } else {
        payload.content
    };

    let db = state.clone();
    let note_id = id.clone();
    tokio::task::spawn_blocking(move || {
        db.db.insert_note(
            &note_id,
            payload.parent_id.as_deref(),
            &payload.title,
            &content,
            payload.is_folder,
            now,
            &user.username,
        )
    })
    .await??;

    Ok(Json(NoteCreated { success: true, id }))
}

/// Rewrites title/content and refreshes the timestamp. Moving a note or
/// toggling folder status is not supported.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<SaveNotePayload>,
) -> Result<Json<NoteOk>, ApiError> {
    if !user.role.can_write() {
        return Err(ApiError::Forbidden);
    }

    let now = chrono::Utc::now().timestamp_millis();
    let db = state.clone();
    let updated = tokio::task::spawn_blocking(move || {
        db.db.update_note(&id, &payload.title, &payload.content, now)
    })
    .await??;

    if updated == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(Json(NoteOk { success: true }))
}

/// Deletes exactly one row. A folder that still has children is
/// rejected rather than orphaning its subtree.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<NoteOk>, ApiError> {
    if !user.role.can_write() {
        return Err(ApiError::Forbidden);
    }

    let db = state.clone();
    let note_id = id.clone();
    let children = tokio::task::spawn_blocking(move || db.db.count_note_children(&note_id)).await??;
    if children > 0 {
        return Err(ApiError::FolderNotEmpty);
    }

    let db = state.clone();
    let deleted = tokio::task::spawn_blocking(move || db.db.delete_note(&id)).await??;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(Json(NoteOk { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, State};
    use std::sync::Arc;
    use teamdesk_types::Role;

    use crate::AppStateInner;

    fn test_state() -> AppState {
        Arc::new(AppStateInner {
            db: teamdesk_db::Database::open(std::path::Path::new(":memory:")).unwrap(),
            sessions: teamdesk_session::SessionStore::new(),
        })
    }

    fn writer() -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            username: "budi".into(),
            role: Role::Contributor,
        }
    }

    #[tokio::test]
    async fn non_empty_folder_delete_is_rejected() {
        let state = test_state();
        state.db.insert_note("f1", None, "Folder", "", 1, 1, "budi").unwrap();
        state.db.insert_note("n1", Some("f1"), "Inside", "x", 0, 2, "budi").unwrap();

        let result = remove(
            State(state.clone()),
            Path("f1".to_string()),
            Extension(writer()),
        )
        .await;
        assert!(matches!(result, Err(ApiError::FolderNotEmpty)));
        // Nothing was orphaned or deleted.
        assert_eq!(state.db.list_notes().unwrap().len(), 2);

        // After removing the child, the folder goes.
        remove(State(state.clone()), Path("n1".to_string()), Extension(writer()))
            .await
            .unwrap();
        remove(State(state.clone()), Path("f1".to_string()), Extension(writer()))
            .await
            .unwrap();
        assert!(state.db.list_notes().unwrap().is_empty());
    }

    #[tokio::test]
    async fn read_only_roles_cannot_mutate() {
        let state = test_state();
        let viewer = SessionUser {
            id: Uuid::new_v4(),
            username: "tamu".into(),
            role: Role::ViewOnly,
        };

        let payload = SaveNotePayload {
            id: None,
            parent_id: None,
            title: "x".into(),
            content: "y".into(),
            is_folder: 0,
        };
        let result = create(State(state.clone()), Extension(viewer), Json(payload)).await;
        assert!(matches!(result, Err(ApiError::Forbidden)));
        assert!(state.db.list_notes().unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_a_missing_note_is_not_found() {
        let state = test_state();
        let result = remove(
            State(state),
            Path("gone".to_string()),
            Extension(writer()),
        )
        .await;
        assert!(matches!(result, Err(ApiError::NotFound)));
    }
}
