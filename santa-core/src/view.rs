//! In-memory page state and its query-string form.
//!
//! The URL is the only place state lives: `p` holds the encoded participants,
//! `m` the encoded matches, `r=true` marks matches as revealed and `v` names
//! the current view when it is not `setup`.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::codec::{decode_matches, decode_participants, encode_matches, encode_participants};
use crate::matcher::{generate_matches, MatchError};
use crate::{Match, Participant};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Setup,
    Matches,
    Reveal,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Setup => "setup",
            View::Matches => "matches",
            View::Reveal => "reveal",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "setup" => Ok(View::Setup),
            "matches" => Ok(View::Matches),
            "reveal" => Ok(View::Reveal),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UrlState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<String>,
}

impl UrlState {
    /// Renders `p=..&m=..`. Every value is already URL-safe.
    pub fn to_query(&self) -> String {
        [("p", &self.p), ("m", &self.m), ("r", &self.r), ("v", &self.v)]
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|value| format!("{key}={value}")))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub participants: Vec<Participant>,
    pub matches: Vec<Match>,
    pub is_revealed: bool,
    pub current_view: View,
}

impl ViewState {
    pub fn from_url(url: &UrlState) -> Self {
        Self {
            participants: url.p.as_deref().map(decode_participants).unwrap_or_default(),
            matches: url.m.as_deref().map(decode_matches).unwrap_or_default(),
            is_revealed: url.r.as_deref() == Some("true"),
            current_view: url
                .v
                .as_deref()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        }
    }

    pub fn to_url(&self) -> UrlState {
        UrlState {
            p: (!self.participants.is_empty()).then(|| encode_participants(&self.participants)),
            m: (!self.matches.is_empty()).then(|| encode_matches(&self.matches)),
            r: self.is_revealed.then(|| "true".to_string()),
            v: (self.current_view != View::Setup).then(|| self.current_view.as_str().to_string()),
        }
    }

    pub fn to_query(&self) -> String {
        self.to_url().to_query()
    }

    /// Draws fresh matches and moves to the hidden matches view. On error the
    /// state is left as it was.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), MatchError> {
        let matches = generate_matches(&self.participants, rng)?;
        self.matches = matches;
        self.is_revealed = false;
        self.current_view = View::Matches;
        Ok(())
    }

    pub fn toggle_reveal(&mut self) {
        self.is_revealed = !self.is_revealed;
    }

    pub fn show(&mut self, view: View) {
        self.current_view = view;
    }

    /// Replaces the participant list. Matches drawn for the old list no
    /// longer apply, so they are cleared and the view returns to setup.
    pub fn set_participants(&mut self, participants: Vec<Participant>) {
        if participants != self.participants {
            self.matches.clear();
            self.is_revealed = false;
            self.current_view = View::Setup;
        }
        self.participants = participants;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
