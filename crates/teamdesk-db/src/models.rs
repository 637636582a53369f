//! Database row types; these map directly to SQLite rows.
//! Distinct from the teamdesk-types API models to keep the DB layer
//! independent.

use chrono::NaiveDate;
use teamdesk_types::{CashflowEntry, Category, Note};
use tracing::warn;

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub role: String,
    pub created_at: String,
}

pub struct EventRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub category: String,
    pub created_by: String,
}

pub struct CashflowRow {
    pub id: i64,
    pub transaction_date: String,
    pub description: String,
    pub amount: i64,
    pub category: String,
    pub created_by: String,
}

pub struct NoteRow {
    pub id: String,
    pub parent_id: Option<String>,
    pub title: String,
    pub content: String,
    pub is_folder: i64,
    pub updated_at: i64,
    pub created_by: String,
}

impl From<CashflowRow> for CashflowEntry {
    fn from(row: CashflowRow) -> Self {
        let transaction_date = row
            .transaction_date
            .parse::<NaiveDate>()
            .unwrap_or_else(|e| {
                warn!(
                    "Corrupt transaction_date '{}' on cashflow {}: {}",
                    row.transaction_date, row.id, e
                );
                NaiveDate::default()
            });
        let category = Category::parse(&row.category).unwrap_or_else(|| {
            warn!("Unknown category '{}' on cashflow {}", row.category, row.id);
            Category::Umum
        });
        CashflowEntry {
            id: row.id,
            transaction_date,
            description: row.description,
            amount: row.amount,
            category,
            created_by: row.created_by,
        }
    }
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Note {
            id: row.id,
            parent_id: row.parent_id,
            title: row.title,
            content: row.content,
            is_folder: row.is_folder,
            updated_at: row.updated_at,
            created_by: row.created_by,
        }
    }
}
