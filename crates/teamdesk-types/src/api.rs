use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Category, EventCategory, Role};

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordForm {
    pub old_password: String,
    pub new_password: String,
}

// -- User management --

#[derive(Debug, Deserialize)]
pub struct CreateUserForm {
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleForm {
    pub role: Role,
}

// -- Cashflow --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FlowDirection {
    In,
    Out,
}

#[derive(Debug, Deserialize)]
pub struct CashflowForm {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub direction: FlowDirection,
    pub description: String,
    pub amount: i64,
    pub category: Category,
}

// -- Events --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventPayload {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub category: EventCategory,
}

/// One entry of the calendar feed, shaped for the calendar widget.
#[derive(Debug, Serialize)]
pub struct EventFeedItem {
    pub id: String,
    pub title: String,
    pub start: String,
    pub end: String,
    #[serde(rename = "backgroundColor")]
    pub background_color: String,
    #[serde(rename = "borderColor")]
    pub border_color: String,
    #[serde(rename = "extendedProps")]
    pub extended_props: EventProps,
}

#[derive(Debug, Serialize)]
pub struct EventProps {
    pub created_by: String,
    pub description: String,
    pub category: EventCategory,
}

// -- Notes --

/// The note editor sends the same payload for create and update; the
/// id travels in the URL on update, so the body id is ignored.
#[derive(Debug, Deserialize)]
pub struct SaveNotePayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_folder: i64,
}

#[derive(Debug, Serialize)]
pub struct NoteCreated {
    pub success: bool,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct NoteOk {
    pub success: bool,
}

// -- Generic --

#[derive(Debug, Serialize)]
pub struct OkBody {
    pub ok: bool,
}
