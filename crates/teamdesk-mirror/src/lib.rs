//! Client-side offline mirror of the notes forest.
//!
//! The server set is authoritative. Sync is full-replace: render the
//! local mirror first for instant response, then fetch, then discard
//! and rewrite the whole local set on success. A failed fetch leaves
//! the mirror exactly as it was: no retry, no offline write queue.

pub mod remote;
pub mod view;

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use teamdesk_types::Note;
use tracing::debug;

use crate::remote::NotesRemote;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Loading,
    Offline,
    Online,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Loading => write!(f, "Loading"),
            SyncStatus::Offline => write!(f, "Offline Mode"),
            SyncStatus::Online => write!(f, "Online"),
        }
    }
}

pub struct Mirror {
    notes: HashMap<String, Note>,
    status: SyncStatus,
}

impl Mirror {
    pub fn new() -> Self {
        Self {
            notes: HashMap::new(),
            status: SyncStatus::Loading,
        }
    }

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.get(id)
    }

    /// The full local set, in no particular order. View functions take
    /// care of scoping and sorting.
    pub fn snapshot(&self) -> Vec<Note> {
        self.notes.values().cloned().collect()
    }

    /// Clear + bulk insert: the full-replace half of the sync protocol.
    pub fn replace_all(&mut self, notes: Vec<Note>) {
        self.notes.clear();
        for note in notes {
            self.notes.insert(note.id.clone(), note);
        }
    }

    /// Runs one sync pass against the remote.
    ///
    /// 1. A non-empty local mirror renders immediately as Offline Mode,
    ///    so the UI responds before the network does.
    /// 2. On a successful fetch the local set is fully replaced and
    ///    rendered again as Online.
    /// 3. On a failed fetch the mirror and its last rendering stay
    ///    untouched; the error is returned to the caller.
    pub async fn sync<R: NotesRemote>(
        &mut self,
        remote: &R,
        mut render: impl FnMut(&Mirror),
    ) -> Result<()> {
        if !self.notes.is_empty() {
            self.status = SyncStatus::Offline;
            render(self);
        }

        let fetched = remote.fetch_all().await?;
        debug!("Fetched {} notes from server", fetched.len());

        self.replace_all(fetched);
        self.status = SyncStatus::Online;
        render(self);
        Ok(())
    }

    /// Loads a mirror persisted with [`Mirror::save`]. A missing file
    /// is an empty mirror, not an error.
    pub fn load(path: &Path) -> Result<Mirror> {
        if !path.exists() {
            return Ok(Mirror::new());
        }
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading mirror cache {}", path.display()))?;
        let notes: Vec<Note> = serde_json::from_str(&data)
            .with_context(|| format!("parsing mirror cache {}", path.display()))?;
        let mut mirror = Mirror::new();
        mirror.replace_all(notes);
        Ok(mirror)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut notes = self.snapshot();
        notes.sort_by(|a, b| a.id.cmp(&b.id));
        let data = serde_json::to_string(&notes)?;
        fs::write(path, data)
            .with_context(|| format!("writing mirror cache {}", path.display()))?;
        Ok(())
    }
}

impl Default for Mirror {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeRemote {
        notes: Vec<Note>,
        fail: bool,
    }

    impl NotesRemote for FakeRemote {
        async fn fetch_all(&self) -> Result<Vec<Note>> {
            if self.fail {
                anyhow::bail!("network down");
            }
            Ok(self.notes.clone())
        }
    }

    fn note(id: &str, parent: Option<&str>, title: &str) -> Note {
        Note {
            id: id.into(),
            parent_id: parent.map(String::from),
            title: title.into(),
            content: String::new(),
            is_folder: 0,
            updated_at: 0,
            created_by: "admin".into(),
        }
    }

    #[tokio::test]
    async fn empty_mirror_successful_fetch() {
        let mut mirror = Mirror::new();
        let remote = FakeRemote {
            notes: vec![note("a", None, "first")],
            fail: false,
        };

        let mut renders = Vec::new();
        mirror
            .sync(&remote, |m| renders.push((m.len(), m.status())))
            .await
            .unwrap();

        assert_eq!(mirror.len(), 1);
        assert!(mirror.get("a").is_some());
        assert_eq!(mirror.status(), SyncStatus::Online);
        // Empty local mirror skips the offline render.
        assert_eq!(renders, vec![(1, SyncStatus::Online)]);
    }

    #[tokio::test]
    async fn nonempty_mirror_failed_fetch_left_untouched() {
        let mut mirror = Mirror::new();
        mirror.replace_all(vec![note("a", None, "kept")]);
        let remote = FakeRemote {
            notes: vec![],
            fail: true,
        };

        let mut renders = Vec::new();
        let result = mirror
            .sync(&remote, |m| renders.push((m.len(), m.status())))
            .await;

        assert!(result.is_err());
        assert_eq!(mirror.len(), 1);
        assert_eq!(mirror.get("a").unwrap().title, "kept");
        assert_eq!(mirror.status(), SyncStatus::Offline);
        assert_eq!(mirror.status().to_string(), "Offline Mode");
        // Rendered exactly once, from the local set.
        assert_eq!(renders, vec![(1, SyncStatus::Offline)]);
    }

    #[tokio::test]
    async fn full_replace_discards_local_only_entries() {
        let mut mirror = Mirror::new();
        mirror.replace_all(vec![note("a", None, "stale"), note("local", None, "mine")]);
        let remote = FakeRemote {
            notes: vec![note("a", None, "fresh")],
            fail: false,
        };

        mirror.sync(&remote, |_| {}).await.unwrap();

        assert_eq!(mirror.len(), 1);
        assert_eq!(mirror.get("a").unwrap().title, "fresh");
        assert!(mirror.get("local").is_none());
    }

    #[tokio::test]
    async fn offline_render_comes_before_fetch() {
        let mut mirror = Mirror::new();
        mirror.replace_all(vec![note("a", None, "cached")]);
        let remote = FakeRemote {
            notes: vec![note("a", None, "cached"), note("b", None, "new")],
            fail: false,
        };

        let mut statuses = Vec::new();
        mirror
            .sync(&remote, |m| statuses.push(m.status()))
            .await
            .unwrap();

        assert_eq!(statuses, vec![SyncStatus::Offline, SyncStatus::Online]);
        assert_eq!(mirror.len(), 2);
    }

    #[test]
    fn cache_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "teamdesk-mirror-test-{}.json",
            std::process::id()
        ));

        let mut mirror = Mirror::new();
        mirror.replace_all(vec![note("a", None, "saved"), note("b", Some("a"), "child")]);
        mirror.save(&path).unwrap();

        let loaded = Mirror::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("b").unwrap().parent_id.as_deref(), Some("a"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_cache_is_empty_mirror() {
        let mirror = Mirror::load(Path::new("/nonexistent/teamdesk-cache.json")).unwrap();
        assert!(mirror.is_empty());
        assert_eq!(mirror.status(), SyncStatus::Loading);
    }
}
