//! Tournament settlement.
//!
//! A tournament is the `tournament_announced` event itself: its id is the
//! tournament id and its payload carries `held_on` and `prize`. On the
//! `held_on` day the clock gathers every `tournament.registered` event that
//! names it, runs a single-elimination bracket and pays the winner.
//!
//! Brackets seed entrants in ascending id and pair them off in order; an
//! odd fighter out gets a bye into the next round.

use std::collections::BTreeSet;

use ascension_types::{CharacterId, EventDraft, EventId, Randomizer, WorldEvent, event_types};
use serde_json::json;
use tracing::info;

use crate::arena::Arena;
use crate::error::ClockError;
use crate::state::SimulationState;

/// Tournaments whose `held_on` is `day`, in id order.
pub fn held_on(events: &[WorldEvent], day: u64) -> Vec<&WorldEvent> {
    events
        .iter()
        .filter(|event| event.event_type == event_types::TOURNAMENT_ANNOUNCED)
        .filter(|event| event.payload_u64("held_on") == Some(day))
        .collect()
}

/// Registered entrants for a tournament, ascending and de-duplicated.
pub fn entrants(events: &[WorldEvent], tournament: EventId) -> Vec<CharacterId> {
    events
        .iter()
        .filter(|event| event.event_type == event_types::TOURNAMENT_REGISTERED)
        .filter(|event| event.payload_u64("tournament_event_id") == Some(tournament.into_inner()))
        .filter_map(|event| event.subject)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Run a single-elimination bracket and return the champion.
///
/// # Errors
///
/// Returns [`ClockError::UnknownCharacter`] for an entrant who is not in
/// the world, or any error from the fights.
pub fn run_bracket(
    state: &SimulationState,
    arena: &Arena<'_>,
    seeds: &[CharacterId],
    rng: &mut dyn Randomizer,
) -> Result<Option<CharacterId>, ClockError> {
    let mut round: Vec<CharacterId> = seeds.to_vec();
    while round.len() > 1 {
        let mut next = Vec::with_capacity(round.len().div_ceil(2));
        for pair in round.chunks(2) {
            match pair {
                [left, right] => {
                    let left = character(state, *left)?;
                    let right = character(state, *right)?;
                    next.push(arena.duel(left, right, rng)?);
                }
                [bye] => next.push(*bye),
                _ => {}
            }
        }
        round = next;
    }
    Ok(round.first().copied())
}

fn character(
    state: &SimulationState,
    id: CharacterId,
) -> Result<&ascension_types::Character, ClockError> {
    state
        .characters
        .get(&id)
        .ok_or(ClockError::UnknownCharacter(id))
}

/// Settle every tournament held today: fight, pay, announce.
///
/// # Errors
///
/// Returns [`ClockError`] if a fight cannot be resolved.
pub fn settle_tournaments(
    state: &mut SimulationState,
    arena: &Arena<'_>,
    rng: &mut dyn Randomizer,
) -> Result<Vec<EventDraft>, ClockError> {
    let day = state.world.day;
    let tournaments: Vec<(EventId, u64)> = held_on(state.events.events(), day)
        .into_iter()
        .map(|event| (event.id, event.payload_u64("prize").unwrap_or(0)))
        .collect();

    let mut drafts = Vec::new();
    for (tournament, prize) in tournaments {
        let seeds: Vec<CharacterId> = entrants(state.events.events(), tournament)
            .into_iter()
            .filter(|id| state.characters.contains_key(id))
            .collect();
        let winner = run_bracket(state, arena, &seeds, rng)?;
        if let Some(champion) = winner.and_then(|id| state.characters.get_mut(&id)) {
            champion.money = champion.money.saturating_add(prize);
        }
        info!(
            %tournament,
            day,
            entrants = seeds.len(),
            winner = ?winner,
            prize,
            "tournament concluded"
        );
        drafts.push(EventDraft::global(
            event_types::TOURNAMENT_CONCLUDED,
            json!({
                "tournament_event_id": tournament,
                "winner": winner,
                "entrants": seeds,
                "prize": prize,
            }),
        ));
    }
    Ok(drafts)
}
