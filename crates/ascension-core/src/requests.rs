//! Applies the requests goal handlers emit.
//!
//! Handlers only ask; the clock decides. Each request event from today's
//! goal pass is applied in id order against the live world:
//!
//! - `dojo.fee_paid` moves coins from the student to the dojo master;
//! - `dojo.claim_requested` hands an unowned dojo to the claimant;
//! - `dojo.challenge_requested` fights the master and transfers mastery to
//!   a winning challenger;
//! - `settlement.project_start_requested` starts construction when the
//!   economy is enabled.
//!
//! A request that no longer makes sense (someone else claimed first, the
//! settlement got busy) is dropped with a debug line.

use ascension_types::{CharacterId, Coord, EventDraft, Randomizer, WorldEvent, event_types};
use serde_json::json;
use tracing::{debug, info};

use crate::arena::Arena;
use crate::economy::{EconomyCatalog, start_project};
use crate::error::ClockError;
use crate::state::SimulationState;

/// Apply request events and return the events they cause.
///
/// # Errors
///
/// Returns [`ClockError`] only if a challenge fight fails to resolve.
pub fn apply_requests(
    state: &mut SimulationState,
    requests: &[WorldEvent],
    arena: &Arena<'_>,
    economy: Option<&EconomyCatalog>,
    rng: &mut dyn Randomizer,
) -> Result<Vec<EventDraft>, ClockError> {
    let mut caused = Vec::new();
    for request in requests {
        let (Some(subject), Some(tile)) = (request.subject, request.payload_coord()) else {
            continue;
        };
        match request.event_type.as_str() {
            event_types::DOJO_FEE_PAID => {
                pay_fee(state, subject, tile, request.payload_u64("amount").unwrap_or(0));
            }
            event_types::DOJO_CLAIM_REQUESTED => {
                caused.extend(claim(state, subject, tile));
            }
            event_types::DOJO_CHALLENGE_REQUESTED => {
                caused.extend(challenge(state, subject, tile, arena, rng)?);
            }
            event_types::SETTLEMENT_PROJECT_START_REQUESTED => {
                let Some(catalog) = economy else {
                    debug!(%subject, "economy disabled, project request dropped");
                    continue;
                };
                let building = request
                    .payload
                    .get("building")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default();
                let Some(settlement) = state.settlement_at(tile).map(|s| s.id) else {
                    continue;
                };
                if let Err(refusal) = start_project(state, catalog, settlement, building) {
                    debug!(%subject, %settlement, building, ?refusal, "project request refused");
                }
            }
            _ => {}
        }
    }
    Ok(caused)
}

fn pay_fee(state: &mut SimulationState, student: CharacterId, tile: Coord, amount: u64) {
    let Some(payer) = state.characters.get_mut(&student) else {
        return;
    };
    let paid = amount.min(payer.money);
    payer.money = payer.money.saturating_sub(paid);
    let master = state.dojos.get(&tile).and_then(|dojo| dojo.master);
    if let Some(master) = master.filter(|m| *m != student) {
        if let Some(receiver) = state.characters.get_mut(&master) {
            receiver.money = receiver.money.saturating_add(paid);
        }
    }
    debug!(%student, paid, "dojo fee paid");
}

fn claim(state: &mut SimulationState, claimant: CharacterId, tile: Coord) -> Option<EventDraft> {
    let dojo = state.dojos.get_mut(&tile)?;
    if dojo.master.is_some() {
        debug!(%claimant, %tile, "dojo already claimed");
        return None;
    }
    dojo.master = Some(claimant);
    info!(%claimant, %tile, "dojo claimed");
    Some(master_changed(claimant, tile, None))
}

fn challenge(
    state: &mut SimulationState,
    challenger: CharacterId,
    tile: Coord,
    arena: &Arena<'_>,
    rng: &mut dyn Randomizer,
) -> Result<Option<EventDraft>, ClockError> {
    let Some(master) = state.dojos.get(&tile).and_then(|dojo| dojo.master) else {
        return Ok(claim(state, challenger, tile));
    };
    if master == challenger {
        return Ok(None);
    }
    let (Some(left), Some(right)) = (state.characters.get(&challenger), state.characters.get(&master)) else {
        return Ok(None);
    };
    let winner = arena.duel(left, right, rng)?;
    info!(%challenger, %master, %winner, %tile, "dojo challenge fought");
    if winner != challenger {
        return Ok(None);
    }
    if let Some(dojo) = state.dojos.get_mut(&tile) {
        dojo.master = Some(challenger);
    }
    Ok(Some(master_changed(challenger, tile, Some(master))))
}

fn master_changed(master: CharacterId, tile: Coord, previous: Option<CharacterId>) -> EventDraft {
    EventDraft::about(
        master,
        event_types::DOJO_MASTER_CHANGED,
        json!({"x": tile.x, "y": tile.y, "master": master, "previous": previous}),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::BTreeMap;

    use ascension_characters::TransformationCatalog;
    use ascension_combat::{SimulationRules, TechniqueCatalog};
    use ascension_types::{
        Character, CoreAttributes, EventId, ScriptedRandomizer, SettlementId, World, WorldId,
    };

    use super::*;
    use crate::economy::BuildingDef;
    use crate::state::{Dojo, Settlement};

    fn state() -> SimulationState {
        let mut state = SimulationState::new(World {
            id: WorldId::new(1),
            name: String::from("Earth"),
            day: 3,
            width: 10,
            height: 10,
        });
        for (raw, power, money) in [(1, 3, 20), (2, 14, 0)] {
            let mut c = Character::new(
                CharacterId::new(raw),
                WorldId::new(1),
                format!("Fighter {raw}"),
                Coord::new(4, 4),
                CoreAttributes::uniform(power),
            );
            c.money = money;
            state.add_character(c);
        }
        state.add_dojo(Dojo {
            position: Coord::new(4, 4),
            multiplier: 2.0,
            fee: 5,
            level: 0,
            master: None,
        });
        state
    }

    fn request(id: u64, who: u64, event_type: &str, extra: serde_json::Value) -> WorldEvent {
        let mut payload = json!({"x": 4, "y": 4});
        if let (Some(map), Some(more)) = (payload.as_object_mut(), extra.as_object()) {
            map.extend(more.clone());
        }
        WorldEvent {
            id: EventId::new(id),
            world_id: WorldId::new(1),
            subject: Some(CharacterId::new(who)),
            event_type: event_type.to_owned(),
            day: 3,
            payload,
        }
    }

    fn run(state: &mut SimulationState, requests: &[WorldEvent], economy: Option<&EconomyCatalog>) -> Vec<EventDraft> {
        let techniques = TechniqueCatalog::default();
        let transformations = TransformationCatalog::default();
        let arena = Arena {
            techniques: &techniques,
            transformations: &transformations,
            rules: SimulationRules::default(),
        };
        let mut rng = ScriptedRandomizer::new(vec![0]);
        apply_requests(state, requests, &arena, economy, &mut rng).unwrap()
    }

    #[test]
    fn first_claim_wins_and_fee_reaches_master() {
        let mut state = state();
        let caused = run(
            &mut state,
            &[
                request(1, 2, event_types::DOJO_CLAIM_REQUESTED, json!({})),
                request(2, 1, event_types::DOJO_CLAIM_REQUESTED, json!({})),
                request(3, 1, event_types::DOJO_FEE_PAID, json!({"amount": 5})),
            ],
            None,
        );
        assert_eq!(caused.len(), 1);
        assert_eq!(caused[0].event_type, event_types::DOJO_MASTER_CHANGED);
        assert_eq!(state.dojos[&Coord::new(4, 4)].master, Some(CharacterId::new(2)));
        assert_eq!(state.characters[&CharacterId::new(1)].money, 15);
        assert_eq!(state.characters[&CharacterId::new(2)].money, 5);
    }

    #[test]
    fn challenger_must_win_to_take_over() {
        let mut state = state();
        state.dojos.get_mut(&Coord::new(4, 4)).unwrap().master = Some(CharacterId::new(2));
        let caused = run(
            &mut state,
            &[request(1, 1, event_types::DOJO_CHALLENGE_REQUESTED, json!({"master": 2}))],
            None,
        );
        assert!(caused.is_empty());
        assert_eq!(state.dojos[&Coord::new(4, 4)].master, Some(CharacterId::new(2)));

        state.dojos.get_mut(&Coord::new(4, 4)).unwrap().master = Some(CharacterId::new(1));
        let caused = run(
            &mut state,
            &[request(2, 2, event_types::DOJO_CHALLENGE_REQUESTED, json!({"master": 1}))],
            None,
        );
        assert_eq!(caused[0].payload["previous"], 1);
        assert_eq!(state.dojos[&Coord::new(4, 4)].master, Some(CharacterId::new(2)));
    }

    #[test]
    fn project_request_needs_economy() {
        let mut state = state();
        state.add_settlement(Settlement {
            id: SettlementId::new(7),
            name: String::from("Ginger Town"),
            position: Coord::new(4, 4),
            treasury: 0,
            buildings: BTreeMap::new(),
            project: None,
        });
        let ask = request(
            1,
            1,
            event_types::SETTLEMENT_PROJECT_START_REQUESTED,
            json!({"building": "wall"}),
        );
        run(&mut state, std::slice::from_ref(&ask), None);
        assert!(state.settlements[&SettlementId::new(7)].project.is_none());

        let economy = EconomyCatalog {
            buildings: BTreeMap::from([(
                String::from("wall"),
                BuildingDef {
                    output_per_level: 0,
                    unit_price: 0,
                    wage_per_level: 0,
                    build_days: 3,
                    build_cost: 0,
                },
            )]),
        };
        run(&mut state, &[ask], Some(&economy));
        let project = state.settlements[&SettlementId::new(7)].project.clone().unwrap();
        assert_eq!(project.building, "wall");
        assert_eq!(project.days_remaining, 3);
    }
}
