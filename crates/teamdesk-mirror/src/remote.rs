//! Server side of the sync protocol, as seen from the client.

use anyhow::Result;
use teamdesk_types::Note;

/// Anything that can hand over the full authoritative note set.
#[allow(async_fn_in_trait)]
pub trait NotesRemote {
    async fn fetch_all(&self) -> Result<Vec<Note>>;
}

/// HTTP remote speaking the cookie-session API.
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemote {
    pub fn new(base_url: &str) -> Result<Self> {
        // Redirects stay visible: a successful login is a 302, a failed
        // one renders a retry page with status 200.
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let resp = self
            .client
            .post(format!("{}/login", self.base_url))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        if resp.status().is_redirection() {
            Ok(())
        } else {
            anyhow::bail!("login rejected ({})", resp.status())
        }
    }
}

impl NotesRemote for HttpRemote {
    async fn fetch_all(&self) -> Result<Vec<Note>> {
        let resp = self
            .client
            .get(format!("{}/api/notes", self.base_url))
            .send()
            .await?;
        let notes = resp.error_for_status()?.json::<Vec<Note>>().await?;
        Ok(notes)
    }
}
