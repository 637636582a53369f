use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            username    TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            role        TEXT NOT NULL DEFAULT 'member',
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS events (
            id          TEXT PRIMARY KEY,
            title       TEXT NOT NULL,
            description TEXT,
            start_time  TEXT NOT NULL,
            end_time    TEXT NOT NULL,
            category    TEXT NOT NULL DEFAULT 'bph',
            created_by  TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_events_start
            ON events(start_time);

        CREATE TABLE IF NOT EXISTS cashflow (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            transaction_date  TEXT NOT NULL,
            description       TEXT NOT NULL,
            amount            INTEGER NOT NULL,
            category          TEXT NOT NULL DEFAULT 'umum',
            created_by        TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_cashflow_date
            ON cashflow(transaction_date, id);

        CREATE TABLE IF NOT EXISTS notes (
            id          TEXT PRIMARY KEY,
            parent_id   TEXT,
            title       TEXT NOT NULL,
            content     TEXT NOT NULL DEFAULT '',
            is_folder   INTEGER NOT NULL DEFAULT 0,
            updated_at  INTEGER NOT NULL,
            created_by  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_notes_parent
            ON notes(parent_id);

        CREATE INDEX IF NOT EXISTS idx_notes_updated
            ON notes(updated_at);

        -- Seed the initial admin account (password: admin, sha256 digest).
        -- A fresh deployment has no other way to sign in.
        INSERT OR IGNORE INTO users (id, username, password, role)
            VALUES ('00000000-0000-0000-0000-000000000001', 'admin',
                    '8c6976e5b5410415bde908bd4dee15dfb167a9c873fc4bb8a81f6f2ab448a918',
                    'admin');
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
