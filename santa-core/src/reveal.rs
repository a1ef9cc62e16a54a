//! Per-giver reveal tokens.
//!
//! A token carries one assignment plus a digest of the whole match set it
//! came from. [`verify_token`] only decodes: it trusts the embedded names and
//! never compares the digest against a live match set, so a token keeps
//! working against a stale or edited set. That is acceptable for a no-login
//! gift exchange; callers that want the check can use [`token_matches_set`].

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::codec::{decode_value, encode_value};
use crate::Match;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reveal {
    pub giver: String,
    pub receiver: String,
    #[serde(rename = "giverId")]
    pub giver_id: String,
}

#[derive(Serialize, Deserialize)]
struct TokenBody {
    #[serde(flatten)]
    reveal: Reveal,
    #[serde(default)]
    hash: Option<String>,
}

/// Hex SHA-256 of the JSON form of `matches`.
pub fn match_set_digest(matches: &[Match]) -> String {
    let json = serde_json::to_vec(matches).unwrap_or_default();
    hex::encode(Sha256::digest(&json))
}

pub fn issue_token(assignment: &Match, matches: &[Match]) -> String {
    let body = TokenBody {
        reveal: Reveal {
            giver: assignment.giver.name.clone(),
            receiver: assignment.receiver.name.clone(),
            giver_id: assignment.giver.id.clone(),
        },
        hash: Some(match_set_digest(matches)),
    };
    encode_value(&body).unwrap_or_default()
}

pub fn verify_token(token: &str) -> Option<Reveal> {
    decode_value::<TokenBody>(token).map(|body| body.reveal)
}

/// True when the token decodes and its digest was taken over `matches`.
pub fn token_matches_set(token: &str, matches: &[Match]) -> bool {
    decode_value::<TokenBody>(token)
        .and_then(|body| body.hash)
        .map(|hash| hash == match_set_digest(matches))
        .unwrap_or(false)
}
