//! URL-safe text encoding of participant and match lists.
//!
//! Values are serialized as JSON and wrapped in unpadded URL-safe base64, so
//! an encoded value can sit in a query string without escaping. Decoding is
//! fail-soft: anything that does not decode yields an empty list.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{Match, Participant};

pub fn encode_value<T: Serialize + ?Sized>(value: &T) -> Option<String> {
    serde_json::to_vec(value)
        .ok()
        .map(|json| URL_SAFE_NO_PAD.encode(json))
}

/// Accepts the URL-safe alphabet as well as links produced by the browser
/// app: standard alphabet with padding, optionally percent-escaped JSON.
pub fn decode_value<T: DeserializeOwned>(token: &str) -> Option<T> {
    let normalized: String = token
        .trim()
        .trim_end_matches('=')
        .chars()
        .map(|ch| match ch {
            // form decoding turns '+' into a space
            '+' | ' ' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    let bytes = URL_SAFE_NO_PAD.decode(normalized.as_bytes()).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    let json = if text.starts_with('%') {
        urlencoding::decode(&text).ok()?.into_owned()
    } else {
        text
    };
    serde_json::from_str(&json).ok()
}

pub fn encode_participants(participants: &[Participant]) -> String {
    encode_value(participants).unwrap_or_default()
}

pub fn decode_participants(token: &str) -> Vec<Participant> {
    decode_value(token).unwrap_or_default()
}

pub fn encode_matches(matches: &[Match]) -> String {
    encode_value(matches).unwrap_or_default()
}

pub fn decode_matches(token: &str) -> Vec<Match> {
    decode_value(token).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use proptest::prelude::*;

    fn participant(id: &str, name: &str) -> Participant {
        Participant::new(id, name)
    }

    #[test]
    fn empty_list_round_trips() {
        let token = encode_participants(&[]);
        assert!(!token.is_empty());
        assert_eq!(decode_participants(&token), Vec::<Participant>::new());
        assert_eq!(decode_matches(&encode_matches(&[])), Vec::<Match>::new());
    }

    #[test]
    fn unicode_and_optional_fields_survive() {
        let list = vec![
            Participant {
                email: Some("jose@example.com".into()),
                exclusions: Some(vec!["2".into()]),
                ..participant("1", "José ❄")
            },
            participant("2", "Zoë 🎁"),
            Participant {
                exclusions: Some(vec![]),
                ..participant("3", "李雷")
            },
        ];
        let token = encode_participants(&list);
        assert!(token
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'));
        assert_eq!(decode_participants(&token), list);
    }

    #[test]
    fn missing_optionals_are_omitted_from_json() {
        let token = encode_participants(&[participant("1", "Alice")]);
        let json = String::from_utf8(URL_SAFE_NO_PAD.decode(token).unwrap()).unwrap();
        assert_eq!(json, r#"[{"id":"1","name":"Alice"}]"#);
    }

    #[test]
    fn decodes_browser_tokens() {
        let json = r#"[{"id":"abc","name":"Alice?>"},{"id":"def","name":"Bob"}]"#;
        let plain = STANDARD.encode(json);
        assert!(plain.contains('+') || plain.contains('/') || plain.ends_with('='));
        let decoded = decode_participants(&plain);
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].name, "Alice?>");

        let escaped = STANDARD.encode(urlencoding::encode(r#"[{"id":"1","name":"José ❄"}]"#).as_bytes());
        assert_eq!(decode_participants(&escaped), vec![participant("1", "José ❄")]);

        let spaced = plain.replace('+', " ");
        assert_eq!(decode_participants(&spaced).len(), 2);
    }

    #[test]
    fn malformed_tokens_decode_to_empty() {
        let valid = encode_participants(&[participant("1", "Alice"), participant("2", "Bob")]);
        let truncated = &valid[..valid.len() / 2];
        for token in ["", "!!!", "not base64 at all", "e30", truncated, "W3siaWQiOjF9XQ"] {
            assert!(decode_participants(token).is_empty(), "{token}");
            assert!(decode_matches(token).is_empty(), "{token}");
        }
        // a participant list is not a match list
        assert!(decode_matches(&valid).is_empty());
    }

    fn arb_participant() -> impl Strategy<Value = Participant> {
        (
            "[a-z0-9]{1,9}",
            "\\PC{1,16}",
            proptest::option::of("[a-z]{1,8}@[a-z]{1,8}\\.[a-z]{2,3}"),
            proptest::option::of(proptest::collection::vec("[a-z0-9]{1,9}", 0..4)),
        )
            .prop_map(|(id, name, email, exclusions)| Participant {
                id,
                name,
                email,
                exclusions,
            })
    }

    proptest! {
        #[test]
        fn participants_round_trip(list in proptest::collection::vec(arb_participant(), 0..8)) {
            prop_assert_eq!(decode_participants(&encode_participants(&list)), list);
        }

        #[test]
        fn matches_round_trip(pairs in proptest::collection::vec((arb_participant(), arb_participant()), 0..6)) {
            let matches: Vec<Match> = pairs
                .into_iter()
                .map(|(giver, receiver)| Match { giver, receiver })
                .collect();
            prop_assert_eq!(decode_matches(&encode_matches(&matches)), matches);
        }

        #[test]
        fn garbage_never_panics(token in "\\PC{0,64}") {
            let _ = decode_participants(&token);
            let _ = decode_matches(&token);
        }
    }
}
