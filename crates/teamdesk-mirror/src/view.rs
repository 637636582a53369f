//! View computations over the in-memory note set: folder scoping,
//! breadcrumb trails, search mode, and the shared sort policy.

use teamdesk_types::Note;

/// Traversal bound for breadcrumb walks. A cycle in corrupted data must
/// not hang the renderer.
pub const MAX_BREADCRUMB_HOPS: usize = 10;

/// One segment of a breadcrumb trail. `id: None` is the Home root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub id: Option<String>,
    pub title: String,
}

/// Items of one folder (`None` = root), folders first, then titles.
pub fn folder_contents<'a>(notes: &'a [Note], folder: Option<&str>) -> Vec<&'a Note> {
    let mut items: Vec<&Note> = notes
        .iter()
        .filter(|n| n.parent_id.as_deref() == folder)
        .collect();
    sort_items(&mut items);
    items
}

/// Search mode: case-insensitive substring match over title and content
/// across the whole set, ignoring folder scoping.
pub fn search<'a>(notes: &'a [Note], term: &str) -> Vec<&'a Note> {
    let needle = term.to_lowercase();
    let mut items: Vec<&Note> = notes
        .iter()
        .filter(|n| {
            n.title.to_lowercase().contains(&needle)
                || n.content.to_lowercase().contains(&needle)
        })
        .collect();
    sort_items(&mut items);
    items
}

/// Walks `parent_id` links from the current folder to a root and
/// returns the trail root-to-leaf, starting at Home. The walk stops at
/// [`MAX_BREADCRUMB_HOPS`] or at the first dangling reference.
pub fn breadcrumbs(notes: &[Note], folder: Option<&str>) -> Vec<Crumb> {
    let mut path = vec![Crumb {
        id: None,
        title: "Home".into(),
    }];

    let mut cursor = folder.map(String::from);
    let mut hops = 0;
    while let Some(id) = cursor {
        if hops >= MAX_BREADCRUMB_HOPS {
            break;
        }
        hops += 1;
        match notes.iter().find(|n| n.id == id) {
            Some(n) => {
                path.insert(
                    1,
                    Crumb {
                        id: Some(n.id.clone()),
                        title: n.title.clone(),
                    },
                );
                cursor = n.parent_id.clone();
            }
            None => cursor = None,
        }
    }
    path
}

fn sort_items(items: &mut [&Note]) {
    items.sort_by(|a, b| {
        b.is_folder
            .cmp(&a.is_folder)
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
    });
}
