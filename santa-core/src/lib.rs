use serde::{Deserialize, Serialize};

pub mod codec;
pub mod export;
pub mod id;
pub mod matcher;
pub mod reveal;
pub mod roster;
pub mod validation;
pub mod view;

pub use codec::{decode_matches, decode_participants, encode_matches, encode_participants};
pub use export::{clipboard_text, export_lines, reveal_url, share_links, share_links_text, ShareLink};
pub use id::{generate_id, generate_id_with};
pub use matcher::{generate_matches, generate_matches_bounded, MatchError, MAX_ATTEMPTS};
pub use reveal::{issue_token, match_set_digest, token_matches_set, verify_token, Reveal};
pub use roster::{add_exclusion, add_participant, remove_exclusion, remove_participant, RosterError};
pub use validation::{validate_email, validate_name, ValidationError};
pub use view::{UrlState, View, ViewState};

pub type ParticipantId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Ids this participant must not be assigned to give to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusions: Option<Vec<ParticipantId>>,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            exclusions: None,
        }
    }

    pub fn excludes(&self, id: &str) -> bool {
        self.exclusions
            .as_ref()
            .map(|ids| ids.iter().any(|excluded| excluded == id))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Match {
    pub giver: Participant,
    pub receiver: Participant,
}
