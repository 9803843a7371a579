//! Assignment engine - draws a giver → recipient map for a roster
//!
//! The draw is a single sequential pass: each giver, in roster order, picks a
//! recipient uniformly from the names nobody has claimed yet, never itself.
//! A pass can paint itself into a corner (the last giver is the only name
//! left), which is reported as [`AssignmentError::Exhausted`] rather than
//! hidden; callers decide whether to draw again.

use std::collections::BTreeSet;

use rand::seq::IteratorRandom;
use rand::Rng;
use thiserror::Error;

use crate::event::SantaMap;

/// Smallest roster that can produce an assignment.
pub const MIN_PARTICIPANTS: usize = 2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("at least 2 participants are required, got {count}")]
    InsufficientParticipants { count: usize },

    #[error("no recipient left for {player:?}")]
    Exhausted { player: String },
}

/// Run one pass of the self-avoiding draw over `participants`.
///
/// Duplicate names share a single slot in the candidate pool, and a later
/// duplicate overwrites the earlier giver's entry in the returned map.
pub fn assign<R>(participants: &[String], rng: &mut R) -> Result<SantaMap, AssignmentError>
where
    R: Rng + ?Sized,
{
    if participants.len() < MIN_PARTICIPANTS {
        return Err(AssignmentError::InsufficientParticipants {
            count: participants.len(),
        });
    }

    let mut remaining: BTreeSet<&str> = participants.iter().map(String::as_str).collect();
    let mut lookup = SantaMap::new();

    for player in participants {
        let removed_self = remaining.remove(player.as_str());

        let pick = match remaining.iter().copied().choose(rng) {
            Some(pick) => pick,
            None => {
                return Err(AssignmentError::Exhausted {
                    player: player.clone(),
                })
            }
        };

        if removed_self {
            remaining.insert(player.as_str());
        }
        remaining.remove(pick);
        lookup.insert(player.clone(), pick.to_string());
    }

    Ok(lookup)
}
