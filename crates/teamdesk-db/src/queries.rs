use crate::Database;
use crate::models::{CashflowRow, EventRow, NoteRow, UserRow};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

impl Database {
    // -- Users --

    pub fn create_user(&self, id: &str, username: &str, password_hash: &str, role: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, password, role) VALUES (?1, ?2, ?3, ?4)",
                (id, username, password_hash, role),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    pub fn list_users(&self) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, username, password, role, created_at FROM users ORDER BY username",
            )?;
            let rows = stmt
                .query_map([], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn delete_user(&self, id: &str) -> Result<usize> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM users WHERE id = ?1", [id])?))
    }

    pub fn update_user_role(&self, id: &str, role: &str) -> Result<usize> {
        self.with_conn(|conn| {
            Ok(conn.execute("UPDATE users SET role = ?1 WHERE id = ?2", (role, id))?)
        })
    }

    pub fn update_user_password(&self, id: &str, password_hash: &str) -> Result<usize> {
        self.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE users SET password = ?1 WHERE id = ?2",
                (password_hash, id),
            )?)
        })
    }

    // -- Events --

    pub fn list_events(&self) -> Result<Vec<EventRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, description, start_time, end_time, category, created_by
                 FROM events",
            )?;
            let rows = stmt
                .query_map([], event_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Events starting today or later, soonest first.
    pub fn upcoming_events(&self, limit: u32) -> Result<Vec<EventRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, description, start_time, end_time, category, created_by
                 FROM events
                 WHERE date(start_time) >= date('now')
                 ORDER BY start_time ASC
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([limit], event_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_event(&self, id: &str) -> Result<Option<EventRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, title, description, start_time, end_time, category, created_by
                     FROM events WHERE id = ?1",
                    [id],
                    event_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn insert_event(
        &self,
        id: &str,
        title: &str,
        description: Option<&str>,
        start_time: &str,
        end_time: &str,
        category: &str,
        created_by: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO events (id, title, description, start_time, end_time, category, created_by)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![id, title, description, start_time, end_time, category, created_by],
            )?;
            Ok(())
        })
    }

    pub fn update_event(
        &self,
        id: &str,
        title: &str,
        description: Option<&str>,
        start_time: &str,
        end_time: &str,
        category: &str,
    ) -> Result<usize> {
        self.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE events SET title = ?1, description = ?2, start_time = ?3,
                        end_time = ?4, category = ?5
                 WHERE id = ?6",
                rusqlite::params![title, description, start_time, end_time, category, id],
            )?)
        })
    }

    pub fn delete_event(&self, id: &str) -> Result<usize> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM events WHERE id = ?1", [id])?))
    }

    // -- Cashflow --

    /// All entries in ledger order: ascending by (transaction_date, id).
    pub fn list_cashflow(&self) -> Result<Vec<CashflowRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, transaction_date, description, amount, category, created_by
                 FROM cashflow
                 ORDER BY transaction_date ASC, id ASC",
            )?;
            let rows = stmt
                .query_map([], cashflow_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn cashflow_total(&self) -> Result<i64> {
        self.with_conn(|conn| {
            let total: Option<i64> =
                conn.query_row("SELECT SUM(amount) FROM cashflow", [], |row| row.get(0))?;
            Ok(total.unwrap_or(0))
        })
    }

    pub fn insert_cashflow(
        &self,
        transaction_date: &str,
        description: &str,
        amount: i64,
        category: &str,
        created_by: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO cashflow (transaction_date, description, amount, category, created_by)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![transaction_date, description, amount, category, created_by],
            )?;
            Ok(())
        })
    }

    pub fn delete_cashflow(&self, id: i64) -> Result<usize> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM cashflow WHERE id = ?1", [id])?))
    }

    // -- Notes --

    /// The full forest, most recently touched first. No pagination; the
    /// client mirror replaces its whole set from this.
    pub fn list_notes(&self) -> Result<Vec<NoteRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, parent_id, title, content, is_folder, updated_at, created_by
                 FROM notes
                 ORDER BY updated_at DESC",
            )?;
            let rows = stmt
                .query_map([], note_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn recent_notes(&self, limit: u32) -> Result<Vec<NoteRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, parent_id, title, content, is_folder, updated_at, created_by
                 FROM notes
                 WHERE is_folder = 0
                 ORDER BY updated_at DESC
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([limit], note_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn insert_note(
        &self,
        id: &str,
        parent_id: Option<&str>,
        title: &str,
        content: &str,
        is_folder: i64,
        updated_at: i64,
        created_by: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO notes (id, parent_id, title, content, is_folder, updated_at, created_by)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![id, parent_id, title, content, is_folder, updated_at, created_by],
            )?;
            Ok(())
        })
    }

    /// Rewrites title/content and refreshes the timestamp. Never moves a
    /// note or toggles folder status.
    pub fn update_note(&self, id: &str, title: &str, content: &str, updated_at: i64) -> Result<usize> {
        self.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE notes SET title = ?1, content = ?2, updated_at = ?3 WHERE id = ?4",
                rusqlite::params![title, content, updated_at, id],
            )?)
        })
    }

    pub fn delete_note(&self, id: &str) -> Result<usize> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM notes WHERE id = ?1", [id])?))
    }

    pub fn count_note_children(&self, id: &str) -> Result<i64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM notes WHERE parent_id = ?1",
                [id],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let row = conn
        .query_row(
            "SELECT id, username, password, role, created_at FROM users WHERE username = ?1",
            [username],
            user_from_row,
        )
        .optional()?;
    Ok(row)
}

fn query_user_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    let row = conn
        .query_row(
            "SELECT id, username, password, role, created_at FROM users WHERE id = ?1",
            [id],
            user_from_row,
        )
        .optional()?;
    Ok(row)
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
        role: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn event_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        start_time: row.get(3)?,
        end_time: row.get(4)?,
        category: row.get(5)?,
        created_by: row.get(6)?,
    })
}

fn cashflow_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CashflowRow> {
    Ok(CashflowRow {
        id: row.get(0)?,
        transaction_date: row.get(1)?,
        description: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        created_by: row.get(5)?,
    })
}

fn note_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<NoteRow> {
    Ok(NoteRow {
        id: row.get(0)?,
        parent_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        is_folder: row.get(4)?,
        updated_at: row.get(5)?,
        created_by: row.get(6)?,
    })
}
