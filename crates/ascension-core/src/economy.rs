//! Settlement economy pass.
//!
//! Once a day, per settlement in ascending id:
//!
//! 1. every building level produces `output_per_level` units sold at
//!    `unit_price` into the treasury;
//! 2. an active construction project ticks down and, on its last day,
//!    raises the building one level and emits
//!    `settlement.project_completed`;
//! 3. wages (`wage_per_level * level` summed over buildings) are paid out of
//!    the treasury, capped by the balance, split evenly across residents in
//!    id order with the remainder going one coin each to the lowest ids.

use std::collections::BTreeMap;

use ascension_types::{EventDraft, SettlementId, event_types};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::error::ClockError;
use crate::state::{Project, SimulationState};

/// Economics of one building type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingDef {
    /// Units produced per level per day.
    #[serde(default)]
    pub output_per_level: u64,
    /// Sale price per unit.
    #[serde(default)]
    pub unit_price: u64,
    /// Daily wage bill per level.
    #[serde(default)]
    pub wage_per_level: u64,
    /// Days to build one level.
    pub build_days: u32,
    /// Coins taken from the treasury to start a level.
    #[serde(default)]
    pub build_cost: u64,
}

/// Building definitions by code.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EconomyCatalog {
    /// Buildings by code.
    #[serde(default)]
    pub buildings: BTreeMap<String, BuildingDef>,
}

impl EconomyCatalog {
    /// Reject buildings that could never finish.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidBuilding`] for a zero `build_days`.
    pub fn validate(&self) -> Result<(), ClockError> {
        for (code, def) in &self.buildings {
            if def.build_days == 0 {
                return Err(ClockError::InvalidBuilding {
                    building: code.clone(),
                    reason: String::from("build_days must be positive"),
                });
            }
        }
        Ok(())
    }
}

/// Why a project request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectRefusal {
    /// No such settlement.
    UnknownSettlement,
    /// The building is not in the catalog.
    UnknownBuilding,
    /// Something is already being built.
    Busy,
    /// The treasury cannot cover the build cost.
    Unaffordable,
}

/// Start construction of one more level of `building`.
///
/// # Errors
///
/// Returns the [`ProjectRefusal`] when the request cannot start; refusals
/// are soft and only logged by the caller.
pub fn start_project(
    state: &mut SimulationState,
    catalog: &EconomyCatalog,
    settlement: SettlementId,
    building: &str,
) -> Result<(), ProjectRefusal> {
    let site = state
        .settlements
        .get_mut(&settlement)
        .ok_or(ProjectRefusal::UnknownSettlement)?;
    let def = catalog
        .buildings
        .get(building)
        .ok_or(ProjectRefusal::UnknownBuilding)?;
    if site.project.is_some() {
        return Err(ProjectRefusal::Busy);
    }
    site.treasury = site
        .treasury
        .checked_sub(def.build_cost)
        .ok_or(ProjectRefusal::Unaffordable)?;
    site.project = Some(Project {
        building: building.to_owned(),
        days_remaining: def.build_days,
    });
    info!(%settlement, building, days = def.build_days, "construction started");
    Ok(())
}

/// Run one day of production, construction and wages.
pub fn run_economy(state: &mut SimulationState, catalog: &EconomyCatalog) -> Vec<EventDraft> {
    let mut events = Vec::new();
    let ids: Vec<SettlementId> = state.settlements.keys().copied().collect();
    for id in ids {
        let residents = state.residents(id);
        let Some(site) = state.settlements.get_mut(&id) else {
            continue;
        };

        let revenue = site
            .buildings
            .iter()
            .filter_map(|(code, level)| {
                let def = catalog.buildings.get(code)?;
                Some(
                    u64::from(*level)
                        .saturating_mul(def.output_per_level)
                        .saturating_mul(def.unit_price),
                )
            })
            .fold(0_u64, u64::saturating_add);
        site.treasury = site.treasury.saturating_add(revenue);

        if let Some(project) = site.project.as_mut() {
            project.days_remaining = project.days_remaining.saturating_sub(1);
            if project.days_remaining == 0 {
                let building = project.building.clone();
                let level = site.buildings.entry(building.clone()).or_insert(0);
                *level = level.saturating_add(1);
                let level = *level;
                site.project = None;
                info!(settlement = %id, building = %building, level, "construction completed");
                events.push(EventDraft::global(
                    event_types::SETTLEMENT_PROJECT_COMPLETED,
                    json!({"settlement_id": id, "building": building, "level": level}),
                ));
            }
        }

        let wage_bill = site
            .buildings
            .iter()
            .filter_map(|(code, level)| {
                let def = catalog.buildings.get(code)?;
                Some(u64::from(*level).saturating_mul(def.wage_per_level))
            })
            .fold(0_u64, u64::saturating_add);
        if residents.is_empty() || wage_bill == 0 {
            continue;
        }
        let paid = wage_bill.min(site.treasury);
        site.treasury = site.treasury.saturating_sub(paid);
        let shares = split_evenly(paid, residents.len());
        debug!(settlement = %id, revenue, paid, residents = residents.len(), "wages paid");
        for (resident, share) in residents.iter().zip(shares) {
            if let Some(character) = state.characters.get_mut(resident) {
                character.money = character.money.saturating_add(share);
            }
        }
    }
    events
}

/// Split `amount` into `parts` shares, the first `amount % parts` one larger.
pub fn split_evenly(amount: u64, parts: usize) -> Vec<u64> {
    let Ok(count) = u64::try_from(parts) else {
        return Vec::new();
    };
    let base = amount.checked_div(count).unwrap_or(0);
    let remainder = amount.checked_rem(count).unwrap_or(0);
    (0..count)
        .map(|index| {
            if index < remainder {
                base.saturating_add(1)
            } else {
                base
            }
        })
        .collect()
}
