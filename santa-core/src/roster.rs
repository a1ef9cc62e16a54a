use rand::Rng;
use thiserror::Error;

use crate::id::generate_id_with;
use crate::validation::{validate_email, validate_name, ValidationError};
use crate::Participant;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("This name is already in the list!")]
    DuplicateName,
    #[error("participant not found")]
    UnknownParticipant,
    #[error("a participant never draws themselves")]
    SelfExclusion,
}

pub fn add_participant<'a, R: Rng + ?Sized>(
    participants: &'a mut Vec<Participant>,
    name: &str,
    email: Option<&str>,
    rng: &mut R,
) -> Result<&'a Participant, RosterError> {
    let name = validate_name(name)?;
    let email = validate_email(email.unwrap_or(""))?;

    let lowered = name.to_lowercase();
    if participants
        .iter()
        .any(|p| p.name.trim().to_lowercase() == lowered)
    {
        return Err(RosterError::DuplicateName);
    }

    participants.push(Participant {
        id: generate_id_with(rng),
        name,
        email,
        exclusions: None,
    });
    participants.last().ok_or(RosterError::UnknownParticipant)
}

/// Removes the participant and drops them from everyone's exclusions.
pub fn remove_participant(participants: &mut Vec<Participant>, id: &str) -> Option<Participant> {
    let index = participants.iter().position(|p| p.id == id)?;
    let removed = participants.remove(index);
    for participant in participants.iter_mut() {
        if let Some(exclusions) = participant.exclusions.as_mut() {
            exclusions.retain(|excluded| excluded != id);
        }
    }
    Some(removed)
}

pub fn add_exclusion(
    participants: &mut [Participant],
    giver_id: &str,
    excluded_id: &str,
) -> Result<(), RosterError> {
    if !participants.iter().any(|p| p.id == excluded_id) {
        return Err(RosterError::UnknownParticipant);
    }
    if giver_id == excluded_id {
        return Err(RosterError::SelfExclusion);
    }

    let giver = participants
        .iter_mut()
        .find(|p| p.id == giver_id)
        .ok_or(RosterError::UnknownParticipant)?;

    let exclusions = giver.exclusions.get_or_insert_with(Vec::new);
    if !exclusions.iter().any(|id| id == excluded_id) {
        exclusions.push(excluded_id.to_string());
    }
    Ok(())
}

pub fn remove_exclusion(
    participants: &mut [Participant],
    giver_id: &str,
    excluded_id: &str,
) -> Result<(), RosterError> {
    let giver = participants
        .iter_mut()
        .find(|p| p.id == giver_id)
        .ok_or(RosterError::UnknownParticipant)?;

    if let Some(exclusions) = giver.exclusions.as_mut() {
        exclusions.retain(|id| id != excluded_id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn roster() -> (Vec<Participant>, ChaCha8Rng) {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut participants = Vec::new();
        for name in ["Alice", "Bob", "Cara"] {
            add_participant(&mut participants, name, None, &mut rng).unwrap();
        }
        (participants, rng)
    }

    #[test]
    fn add_trims_and_assigns_ids() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut participants = Vec::new();
        let added = add_participant(&mut participants, "  Bo  ", Some("bo@example.com"), &mut rng)
            .unwrap()
            .clone();
        assert_eq!(added.name, "Bo");
        assert_eq!(added.email.as_deref(), Some("bo@example.com"));
        assert_eq!(added.id.len(), crate::id::ID_LEN);
        assert_eq!(participants, vec![added]);
    }

    #[test]
    fn add_rejects_bad_input_without_touching_roster() {
        let (mut participants, mut rng) = roster();
        let before = participants.clone();

        assert_eq!(
            add_participant(&mut participants, "alice ", None, &mut rng).unwrap_err(),
            RosterError::DuplicateName
        );
        assert_eq!(
            add_participant(&mut participants, "A", None, &mut rng).unwrap_err(),
            RosterError::Invalid(ValidationError::NameTooShort { min: 2 })
        );
        assert_eq!(
            add_participant(&mut participants, "Dan", Some("nope"), &mut rng).unwrap_err(),
            RosterError::Invalid(ValidationError::InvalidFormat)
        );
        assert_eq!(participants, before);
    }

    #[test]
    fn remove_cleans_up_exclusions() {
        let (mut participants, _) = roster();
        let alice = participants[0].id.clone();
        let bob = participants[1].id.clone();
        add_exclusion(&mut participants, &alice, &bob).unwrap();

        let removed = remove_participant(&mut participants, &bob).unwrap();
        assert_eq!(removed.name, "Bob");
        assert_eq!(participants.len(), 2);
        assert_eq!(participants[0].exclusions, Some(vec![]));
        assert!(remove_participant(&mut participants, &bob).is_none());
    }

    #[test]
    fn exclusions_are_idempotent_and_checked() {
        let (mut participants, _) = roster();
        let alice = participants[0].id.clone();
        let cara = participants[2].id.clone();

        add_exclusion(&mut participants, &alice, &cara).unwrap();
        add_exclusion(&mut participants, &alice, &cara).unwrap();
        assert_eq!(participants[0].exclusions, Some(vec![cara.clone()]));
        assert!(participants[0].excludes(&cara));

        assert_eq!(
            add_exclusion(&mut participants, &alice, &alice),
            Err(RosterError::SelfExclusion)
        );
        assert_eq!(
            add_exclusion(&mut participants, &alice, "missing"),
            Err(RosterError::UnknownParticipant)
        );
        assert_eq!(
            add_exclusion(&mut participants, "missing", &cara),
            Err(RosterError::UnknownParticipant)
        );

        remove_exclusion(&mut participants, &alice, &cara).unwrap();
        assert!(!participants[0].excludes(&cara));
    }
}
