//! Social share links for the player page, plus clipboard copy.

use player_proto::config::ShareConfig;
use tracing::{info, warn};

/// Builds share URLs for the configured page and phrase.
#[derive(Debug, Clone)]
pub struct ShareLinks {
    page_url: String,
    text: String,
}

impl ShareLinks {
    pub fn new(page_url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            text: text.into(),
        }
    }

    pub fn from_config(share: &ShareConfig) -> Self {
        Self::new(share.page_url.clone(), share.text.clone())
    }

    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    pub fn facebook(&self) -> String {
        format!(
            "https://www.facebook.com/sharer/sharer.php?u={}",
            encode_component(&self.page_url)
        )
    }

    pub fn twitter(&self) -> String {
        format!(
            "https://twitter.com/intent/tweet?url={}&text={}",
            encode_component(&self.page_url),
            encode_component(&self.text)
        )
    }

    pub fn whatsapp(&self) -> String {
        let message = format!("{} {}", self.text, self.page_url);
        format!(
            "https://api.whatsapp.com/send?text={}",
            encode_component(&message)
        )
    }

    /// Put the page URL on the system clipboard.  Failures are logged and
    /// returned; they never panic.
    pub fn copy_page_url(&self) -> anyhow::Result<()> {
        match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(self.page_url.clone())) {
            Ok(()) => {
                info!("share link copied to clipboard");
                Ok(())
            }
            Err(e) => {
                warn!("clipboard copy failed: {e}");
                Err(anyhow::anyhow!("clipboard copy failed: {e}"))
            }
        }
    }
}

/// Percent-encode a URL component.  Keeps the characters `encodeURIComponent`
/// leaves literal; everything else is emitted as UTF-8 `%XX` escapes.
fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' => out.push(byte as char),
            b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
