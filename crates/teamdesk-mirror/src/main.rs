//! Terminal notes client: logs in, syncs the offline mirror, prints the
//! current view. Works from the local cache when the server is away.

use std::env;
use std::path::PathBuf;

use tracing::warn;

use teamdesk_mirror::remote::HttpRemote;
use teamdesk_mirror::{Mirror, view};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teamdesk_mirror=info".into()),
        )
        .init();

    let base_url = env::var("TEAMDESK_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".into());
    let username = env::var("TEAMDESK_USER").unwrap_or_else(|_| "admin".into());
    let password = env::var("TEAMDESK_PASSWORD").unwrap_or_else(|_| "admin".into());
    let cache: PathBuf = env::var("TEAMDESK_CACHE")
        .unwrap_or_else(|_| "teamdesk-notes.json".into())
        .into();

    // Optional search term; without one, the root folder is listed.
    let term = env::args().nth(1);

    let mut mirror = Mirror::load(&cache)?;

    let remote = HttpRemote::new(&base_url)?;
    if let Err(e) = remote.login(&username, &password).await {
        warn!("Login failed, staying on the local cache: {}", e);
    }

    if let Err(e) = mirror.sync(&remote, |m| print_view(m, term.as_deref())).await {
        warn!("Sync failed: {}", e);
        if mirror.is_empty() {
            println!("No local cache yet and the server is unreachable.");
        }
    }

    mirror.save(&cache)?;
    Ok(())
}

fn print_view(mirror: &Mirror, term: Option<&str>) {
    let notes = mirror.snapshot();
    println!("== {} ==", mirror.status());

    match term {
        Some(t) if !t.trim().is_empty() => {
            println!("Search: \"{}\"", t);
            let hits = view::search(&notes, t);
            if hits.is_empty() {
                println!("  (no matches)");
            }
            for n in hits {
                print_item(n);
            }
        }
        _ => {
            let trail: Vec<String> = view::breadcrumbs(&notes, None)
                .into_iter()
                .map(|c| c.title)
                .collect();
            println!("{}", trail.join(" > "));
            let items = view::folder_contents(&notes, None);
            if items.is_empty() {
                println!("  (empty)");
            }
            for n in items {
                print_item(n);
            }
        }
    }
    println!();
}

fn print_item(note: &teamdesk_types::Note) {
    if note.folder() {
        println!("  {}/", note.title);
    } else {
        println!("  {}", note.title);
    }
}
