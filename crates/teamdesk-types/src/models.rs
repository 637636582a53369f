use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account roles. Anything the store hands us that we don't recognize
/// collapses to `ViewOnly`, so a bad row can never grant write access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Contributor,
    Member,
    #[serde(other)]
    ViewOnly,
}

impl Role {
    pub fn parse(s: &str) -> Role {
        match s {
            "admin" => Role::Admin,
            "contributor" => Role::Contributor,
            "member" => Role::Member,
            _ => Role::ViewOnly,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Contributor => "contributor",
            Role::Member => "member",
            Role::ViewOnly => "view_only",
        }
    }

    /// Writers may create/update/delete notes and cashflow entries.
    pub fn can_write(&self) -> bool {
        matches!(self, Role::Admin | Role::Contributor)
    }

    /// Admins manage users and bypass event ownership checks.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// The per-request user snapshot stored in the session record at login.
/// Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

/// Cashflow ledger categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Umum,
    Yatim,
    Beras,
}

impl Category {
    pub fn parse(s: &str) -> Option<Category> {
        match s {
            "umum" => Some(Category::Umum),
            "yatim" => Some(Category::Yatim),
            "beras" => Some(Category::Beras),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Umum => "umum",
            Category::Yatim => "yatim",
            Category::Beras => "beras",
        }
    }

    pub const ALL: [Category; 3] = [Category::Umum, Category::Yatim, Category::Beras];
}

/// Calendar event categories. The data model stores the category; the
/// display color is a pure lookup applied only when shaping the
/// calendar feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Bph,
    Bidang,
    Bipeka,
    Struktural,
    Aleg,
}

impl EventCategory {
    pub fn parse(s: &str) -> EventCategory {
        match s {
            "bidang" => EventCategory::Bidang,
            "bipeka" => EventCategory::Bipeka,
            "struktural" => EventCategory::Struktural,
            "aleg" => EventCategory::Aleg,
            _ => EventCategory::Bph,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Bph => "bph",
            EventCategory::Bidang => "bidang",
            EventCategory::Bipeka => "bipeka",
            EventCategory::Struktural => "struktural",
            EventCategory::Aleg => "aleg",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventCategory::Bph => "Agenda BPH",
            EventCategory::Bidang => "Agenda Bidang",
            EventCategory::Bipeka => "Agenda Bipeka",
            EventCategory::Struktural => "Agenda Struktural DPC+",
            EventCategory::Aleg => "Agenda Aleg",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            EventCategory::Bph => "#7c3aed",
            EventCategory::Bidang => "#2563eb",
            EventCategory::Bipeka => "#059669",
            EventCategory::Struktural => "#d97706",
            EventCategory::Aleg => "#dc2626",
        }
    }

    pub const ALL: [EventCategory; 5] = [
        EventCategory::Bph,
        EventCategory::Bidang,
        EventCategory::Bipeka,
        EventCategory::Struktural,
        EventCategory::Aleg,
    ];
}

/// A single ledger entry. `amount` is signed: positive = inflow,
/// negative = outflow. Ids are insertion-ordered integers so the
/// `(transaction_date, id)` ordering has a stable tie-break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashflowEntry {
    pub id: i64,
    pub transaction_date: NaiveDate,
    pub description: String,
    pub amount: i64,
    pub category: Category,
    pub created_by: String,
}

/// A note or folder. The flat wire shape (`parent_id` back-reference,
/// numeric `is_folder`, millisecond `updated_at`) is shared between the
/// server API and the client mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub parent_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub is_folder: i64,
    pub updated_at: i64,
    pub created_by: String,
}

impl Note {
    pub fn folder(&self) -> bool {
        self.is_folder != 0
    }
}
