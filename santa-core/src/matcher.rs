use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::{Match, Participant};

/// Shuffles tried before an exclusion set is declared unsatisfiable.
pub const MAX_ATTEMPTS: usize = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("need at least 2 participants, got {found}")]
    InsufficientParticipants { found: usize },
    #[error("no assignment satisfies the exclusions after {attempts} attempts")]
    NoFeasibleAssignment { attempts: usize },
}

/// Draws a gift-giving cycle over every participant.
///
/// The participants are shuffled and each one gives to the next in the
/// shuffled order, wrapping at the end, so nobody draws themselves and the
/// result is a single cycle. A shuffle that breaks an exclusion is thrown
/// away and a fresh one is drawn, up to [`MAX_ATTEMPTS`] times.
pub fn generate_matches<R: Rng + ?Sized>(
    participants: &[Participant],
    rng: &mut R,
) -> Result<Vec<Match>, MatchError> {
    generate_matches_bounded(participants, rng, MAX_ATTEMPTS)
}

pub fn generate_matches_bounded<R: Rng + ?Sized>(
    participants: &[Participant],
    rng: &mut R,
    max_attempts: usize,
) -> Result<Vec<Match>, MatchError> {
    if participants.len() < 2 {
        return Err(MatchError::InsufficientParticipants {
            found: participants.len(),
        });
    }

    let mut order: Vec<&Participant> = participants.iter().collect();
    for _ in 0..max_attempts {
        order.shuffle(rng);
        if let Some(matches) = cycle(&order) {
            return Ok(matches);
        }
    }

    tracing::debug!(
        participants = participants.len(),
        attempts = max_attempts,
        "exclusions left no valid cycle"
    );
    Err(MatchError::NoFeasibleAssignment {
        attempts: max_attempts,
    })
}

fn cycle(order: &[&Participant]) -> Option<Vec<Match>> {
    let n = order.len();
    let mut matches = Vec::with_capacity(n);
    for (i, giver) in order.iter().enumerate() {
        let receiver = order[(i + 1) % n];
        // duplicate ids would otherwise sneak in a self-assignment
        if giver.id == receiver.id || giver.excludes(&receiver.id) {
            return None;
        }
        matches.push(Match {
            giver: (*giver).clone(),
            receiver: receiver.clone(),
        });
    }
    Some(matches)
}
