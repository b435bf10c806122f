//! Output format selection among a collection's links.

use std::borrow::Borrow;

use ogcapi_protocol::Link;
use serde::{Deserialize, Serialize};

/// The format and base URL chosen for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatSelection {
    pub format: String,
    pub base_url: String,
}

/// Pick the link whose media type matches `preferred`, falling back to the
/// first link. Only an empty list yields no selection.
///
/// Media types compare case-insensitively and without parameters, so
/// `image/png; mode=8bit` matches `image/png`.
pub fn select_format<L: Borrow<Link>>(links: &[L], preferred: &str) -> Option<FormatSelection> {
    let wanted = essence(preferred);
    let chosen = links
        .iter()
        .map(as_link)
        .find(|link| essence(link.media_type()) == wanted)
        .or_else(|| links.first().map(as_link))?;

    Some(FormatSelection {
        format: chosen.media_type().to_string(),
        base_url: chosen.href.clone(),
    })
}

/// Distinct media types offered by `links`, in link order.
pub fn available_formats<L: Borrow<Link>>(links: &[L]) -> Vec<String> {
    let mut formats: Vec<String> = Vec::new();
    for link in links.iter().map(as_link) {
        let media_type = link.media_type();
        if !media_type.is_empty() && !formats.iter().any(|f| f == media_type) {
            formats.push(media_type.to_string());
        }
    }
    formats
}

fn as_link<L: Borrow<Link>>(link: &L) -> &Link {
    link.borrow()
}

fn essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}
