use serde::{Deserialize, Serialize};

use crate::reveal::issue_token;
use crate::Match;

pub const EXPORT_FILE_NAME: &str = "secret-santa-matches.txt";

const HIDDEN_RECEIVER: &str = "???";

/// One `"<n>. <giver> → <receiver>"` line per assignment.
pub fn export_lines(matches: &[Match]) -> String {
    clipboard_text(matches, true)
}

/// Like [`export_lines`], but receivers stay hidden until revealed.
pub fn clipboard_text(matches: &[Match], revealed: bool) -> String {
    matches
        .iter()
        .enumerate()
        .map(|(index, m)| {
            let receiver = if revealed {
                m.receiver.name.as_str()
            } else {
                HIDDEN_RECEIVER
            };
            format!("{}. {} → {}", index + 1, m.giver.name, receiver)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn reveal_url(base: &str, token: &str) -> String {
    format!("{}/reveal?t={token}", base.trim_end_matches('/'))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShareLink {
    pub giver: String,
    pub giver_id: String,
    pub url: String,
}

pub fn share_links(matches: &[Match], base: &str) -> Vec<ShareLink> {
    matches
        .iter()
        .map(|m| ShareLink {
            giver: m.giver.name.clone(),
            giver_id: m.giver.id.clone(),
            url: reveal_url(base, &issue_token(m, matches)),
        })
        .collect()
}

/// Text for "copy all links": `<giver>: <url>` blocks separated by a blank line.
pub fn share_links_text(links: &[ShareLink]) -> String {
    links
        .iter()
        .map(|link| format!("{}: {}", link.giver, link.url))
        .collect::<Vec<_>>()
        .join("\n\n")
}
