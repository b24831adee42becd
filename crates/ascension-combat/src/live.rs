//! Live combat resolution against persisted per-session state.
//!
//! A tactical session may host one active [`Combat`] at a time. It is
//! created lazily by the first hostile action, every actor touched by a
//! hostile action is enlisted as a [`Combatant`] with HP and ki sized from
//! its effective attributes, and the combat resolves once at most one team
//! still has someone standing. The next hostile action in that session then
//! opens a fresh combat.
//!
//! Transformations live on the combatant: [`CombatResolver::transform`] and
//! [`CombatResolver::revert`] drive the lifecycle, and
//! [`CombatResolver::advance_transformations`] drains ki each session tick
//! and drops forms that run out of ki or reach their tick limit. Damage
//! always uses the attributes scaled by the combatant's current state.
//!
//! Persistence goes through the [`CombatStore`] trait so the resolver can
//! run against a database or the bundled [`InMemoryCombatStore`].
//!
//! Success rolls are hash-based (see [`crate::roll`]): replaying the same
//! actions on the same session ticks reproduces the same fight.

use std::collections::{BTreeMap, BTreeSet};

use ascension_characters::transformation::tick;
use ascension_characters::{
    CharacterError, TransformationCatalog, activate, deactivate, effective_attributes,
};
use ascension_types::{
    ActorId, CombatId, CoreAttributes, Coord, SessionId, TeamId, TransformationState,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::combatant::{ChargingTechnique, Combatant};
use crate::error::CombatError;
use crate::log::{CombatLogEntry, DEFAULT_LOG_RADIUS};
use crate::roll::{RollSeed, SuccessRoll};
use crate::targeting::{Positioned, TargetSpec, resolve_targets};
use crate::technique::{
    AttemptOutcome, TechniqueCatalog, TechniqueDefinition, attempt, melee_damage, release_succeeds,
    technique_damage,
};

const fn default_log_radius() -> u32 {
    DEFAULT_LOG_RADIUS
}

/// Tunables for the live resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatRules {
    /// Visibility radius stamped on every log line.
    #[serde(default = "default_log_radius")]
    pub log_radius: u32,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            log_radius: DEFAULT_LOG_RADIUS,
        }
    }
}

/// An actor present in a tactical session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatActor {
    /// Actor identifier.
    pub id: ActorId,
    /// Display name used in log lines.
    pub name: String,
    /// Side the actor fights on.
    pub team: TeamId,
    /// Current cell.
    pub position: Coord,
    /// Base attributes; the resolvers apply transformation scaling.
    pub attributes: CoreAttributes,
    /// Transformation state the actor brings into the fight.
    pub transformation: TransformationState,
    /// Known techniques and their proficiency.
    pub proficiencies: BTreeMap<String, u8>,
}

impl CombatActor {
    /// Attributes scaled for `state`.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::Character`] if the active form is not in
    /// `transformations`.
    pub fn effective(
        &self,
        state: &TransformationState,
        transformations: &TransformationCatalog,
    ) -> Result<CoreAttributes, CombatError> {
        Ok(effective_attributes(&self.attributes, state, transformations)?)
    }
}

/// A tactical session: the actors present and the current tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Session identifier.
    pub id: SessionId,
    /// Current session tick.
    pub tick: u64,
    /// Actors by id.
    pub actors: BTreeMap<ActorId, CombatActor>,
}

impl Session {
    /// An empty session at `tick`.
    pub const fn new(id: SessionId, tick: u64) -> Self {
        Self {
            id,
            tick,
            actors: BTreeMap::new(),
        }
    }

    /// Add an actor.
    #[must_use]
    pub fn with_actor(mut self, actor: CombatActor) -> Self {
        self.actors.insert(actor.id, actor);
        self
    }

    /// Look up an actor.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::UnknownActor`] if the actor is not present.
    pub fn actor(&self, id: ActorId) -> Result<&CombatActor, CombatError> {
        self.actors.get(&id).ok_or(CombatError::UnknownActor {
            actor: id,
            session: self.id,
        })
    }
}

/// One encounter within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combat {
    /// Combat identifier.
    pub id: CombatId,
    /// Owning session.
    pub session: SessionId,
    /// Session tick of the first hostile action.
    pub started_tick: u64,
    /// Enlisted fighters.
    pub combatants: BTreeMap<ActorId, Combatant>,
    /// Whether the encounter is over.
    pub resolved: bool,
    /// Team left standing, if any.
    pub winner: Option<TeamId>,
}

impl Combat {
    /// Teams that have at least one enlisted combatant.
    pub fn teams(&self) -> BTreeSet<TeamId> {
        self.combatants.values().map(|c| c.team).collect()
    }

    /// Teams with at least one combatant still standing.
    pub fn standing_teams(&self) -> BTreeSet<TeamId> {
        self.combatants
            .values()
            .filter(|c| c.is_standing())
            .map(|c| c.team)
            .collect()
    }

    fn enlist(&mut self, actor: &CombatActor, transformations: &TransformationCatalog) -> Result<(), CombatError> {
        if self.combatants.contains_key(&actor.id) {
            return Ok(());
        }
        let effective = actor.effective(&actor.transformation, transformations)?;
        let mut combatant = Combatant::new(actor.id, actor.team, &effective);
        combatant.transformation = actor.transformation.clone();
        self.combatants.insert(actor.id, combatant);
        Ok(())
    }

    /// `actor`'s attributes under its in-combat transformation state.
    fn attributes_of(
        &self,
        actor: &CombatActor,
        transformations: &TransformationCatalog,
    ) -> Result<CoreAttributes, CombatError> {
        let state = self
            .combatants
            .get(&actor.id)
            .map_or(&actor.transformation, |c| &c.transformation);
        actor.effective(state, transformations)
    }

    fn is_down(&self, id: ActorId) -> bool {
        self.combatants.get(&id).is_some_and(|c| c.defeated)
    }
}

/// Persistence for combats and their logs.
///
/// Implementations must return at most one unresolved combat per session
/// from [`load_active`](CombatStore::load_active).
pub trait CombatStore {
    /// The unresolved combat in `session`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::Store`] if the backend fails.
    fn load_active(&self, session: SessionId) -> Result<Option<Combat>, CombatError>;

    /// Reserve a fresh combat id.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::Store`] if the backend fails.
    fn allocate_id(&mut self) -> Result<CombatId, CombatError>;

    /// Insert or replace a combat.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::Store`] if the backend fails.
    fn save(&mut self, combat: &Combat) -> Result<(), CombatError>;

    /// Append a log line to a session's combat log.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::Store`] if the backend fails.
    fn append_log(&mut self, session: SessionId, entry: CombatLogEntry) -> Result<(), CombatError>;
}

/// A [`CombatStore`] kept in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCombatStore {
    /// Every combat ever saved.
    combats: BTreeMap<CombatId, Combat>,
    /// Log lines per session, in append order.
    logs: BTreeMap<SessionId, Vec<CombatLogEntry>>,
    /// Last id handed out.
    last_id: u64,
}

impl InMemoryCombatStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A saved combat by id.
    pub fn combat(&self, id: CombatId) -> Option<&Combat> {
        self.combats.get(&id)
    }

    /// Number of combats saved.
    pub fn combat_count(&self) -> usize {
        self.combats.len()
    }

    /// Every log line of a session.
    pub fn log(&self, session: SessionId) -> &[CombatLogEntry] {
        self.logs.get(&session).map(Vec::as_slice).unwrap_or_default()
    }

    /// The log lines of a session visible from `observer`.
    pub fn visible_log(&self, session: SessionId, observer: Coord) -> Vec<&CombatLogEntry> {
        self.log(session)
            .iter()
            .filter(|entry| entry.visible_from(observer))
            .collect()
    }
}

impl CombatStore for InMemoryCombatStore {
    fn load_active(&self, session: SessionId) -> Result<Option<Combat>, CombatError> {
        Ok(self
            .combats
            .values()
            .rev()
            .find(|combat| combat.session == session && !combat.resolved)
            .cloned())
    }

    fn allocate_id(&mut self) -> Result<CombatId, CombatError> {
        self.last_id = self.last_id.checked_add(1).ok_or_else(|| CombatError::Store {
            message: String::from("combat id space exhausted"),
        })?;
        Ok(CombatId::new(self.last_id))
    }

    fn save(&mut self, combat: &Combat) -> Result<(), CombatError> {
        self.combats.insert(combat.id, combat.clone());
        Ok(())
    }

    fn append_log(&mut self, session: SessionId, entry: CombatLogEntry) -> Result<(), CombatError> {
        self.logs.entry(session).or_default().push(entry);
        Ok(())
    }
}

/// Damage dealt to one actor by an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    /// Actor hit.
    pub target: ActorId,
    /// Damage dealt.
    pub damage: u32,
    /// Whether this hit defeated the target.
    pub defeated: bool,
}

/// What an action did to the combat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    /// Combat the action belonged to.
    pub combat: CombatId,
    /// Damage dealt, in application order.
    pub hits: Vec<Hit>,
    /// Whether the combat resolved as a result.
    pub resolved: bool,
    /// Winning team once resolved.
    pub winner: Option<TeamId>,
}

/// Resolves melee, technique and transformation actions in live sessions.
#[derive(Debug)]
pub struct CombatResolver<'a, S> {
    /// Persistence backend.
    store: S,
    /// Technique definitions.
    techniques: &'a TechniqueCatalog,
    /// Transformation definitions.
    transformations: &'a TransformationCatalog,
    /// Tunables.
    rules: CombatRules,
}

impl<'a, S: CombatStore> CombatResolver<'a, S> {
    /// A resolver over `store`.
    pub const fn new(
        store: S,
        techniques: &'a TechniqueCatalog,
        transformations: &'a TransformationCatalog,
        rules: CombatRules,
    ) -> Self {
        Self {
            store,
            techniques,
            transformations,
            rules,
        }
    }

    /// The persistence backend.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consume the resolver, returning the backend.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Melee `target` with `attacker`. The target must be adjacent.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::UnknownActor`] if either actor is not in the
    /// session, or [`CombatError::Store`] on persistence failure.
    pub fn attack(
        &mut self,
        session: &Session,
        attacker: ActorId,
        target: ActorId,
    ) -> Result<ActionReport, CombatError> {
        let transformations = self.transformations;
        let striker = session.actor(attacker)?;
        let victim = session.actor(target)?;
        let mut combat = self.open_combat(session)?;
        combat.enlist(striker, transformations)?;
        combat.enlist(victim, transformations)?;
        let mut lines = Vec::new();
        let mut hits = Vec::new();

        if combat.is_down(attacker) {
            lines.push(format!("{} is down and cannot fight", striker.name));
        } else if combat.is_down(target) {
            lines.push(format!("{} is already down", victim.name));
        } else if striker.position.manhattan(victim.position) > 1 {
            lines.push(format!("{} swings at {} but is too far away", striker.name, victim.name));
        } else {
            let damage = melee_damage(
                &combat.attributes_of(striker, transformations)?,
                &combat.attributes_of(victim, transformations)?,
            );
            let source = format!("{} strikes", striker.name);
            hits.push(apply_hit(&mut combat, victim, damage, &source, &mut lines));
        }

        self.finish(session, striker.position, combat, lines, hits)
    }

    /// Use a technique with `attacker`, aimed by `aim`.
    ///
    /// Misses, failed rolls, insufficient ki and disallowed aims are soft
    /// outcomes written to the log.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::UnknownActor`] for an actor outside the
    /// session, [`CombatError::UnknownTechnique`] or
    /// [`CombatError::Config`] for catalog problems, or
    /// [`CombatError::Store`] on persistence failure.
    pub fn use_technique(
        &mut self,
        session: &Session,
        attacker: ActorId,
        technique: &str,
        aim: &TargetSpec,
    ) -> Result<ActionReport, CombatError> {
        let techniques = self.techniques;
        let transformations = self.transformations;
        let user = session.actor(attacker)?;
        let def = techniques.get(technique)?;
        let mut combat = self.open_combat(session)?;
        combat.enlist(user, transformations)?;
        let mut lines = Vec::new();
        let mut hits = Vec::new();

        let (ki, charging) = combat
            .combatants
            .get(&attacker)
            .map_or((0, false), |c| (c.ki, c.charging.is_some()));
        let proficiency = user.proficiencies.get(technique).copied();

        if combat.is_down(attacker) {
            lines.push(format!("{} is down and cannot fight", user.name));
        } else if !def.allows(aim.mode) {
            lines.push(format!("{} cannot aim {} that way", user.name, def.code));
        } else if charging {
            lines.push(format!("{} is already charging a technique", user.name));
        } else if let Some(proficiency) = proficiency {
            let seed = RollSeed {
                session: session.id,
                tick: session.tick,
                attacker,
                technique,
            };
            let outcome = attempt(def, proficiency, ki, SuccessRoll::Seeded(seed))?;
            if let Some(c) = combat.combatants.get_mut(&attacker) {
                c.spend_ki(outcome.ki_spent());
            }
            match outcome {
                AttemptOutcome::InsufficientKi { available, required } => lines.push(format!(
                    "{} lacks the ki for {} ({available}/{required})",
                    user.name, def.code
                )),
                AttemptOutcome::Failed { ki_spent } => lines.push(format!(
                    "{}'s {} fizzles, wasting {ki_spent} ki",
                    user.name, def.code
                )),
                AttemptOutcome::ChargeStarted { ticks, .. } => {
                    if let Some(c) = combat.combatants.get_mut(&attacker) {
                        c.charging = Some(ChargingTechnique {
                            code: def.code.clone(),
                            target: *aim,
                            ticks_remaining: ticks,
                        });
                    }
                    lines.push(format!("{} begins charging {}", user.name, def.code));
                }
                AttemptOutcome::Succeeded { .. } => {
                    hits = strike(session, &mut combat, user, def, aim, transformations, &mut lines)?;
                }
            }
        } else {
            lines.push(format!("{} does not know {}", user.name, def.code));
        }

        self.finish(session, user.position, combat, lines, hits)
    }

    /// Advance every charging combatant in the session by one tick.
    ///
    /// Charges with more than one tick left pay their hold cost (fizzling
    /// if unaffordable); charges on their last tick are released and roll
    /// for success. Returns `None` when the session has no active combat.
    ///
    /// # Errors
    ///
    /// Returns catalog or persistence errors as for
    /// [`use_technique`](Self::use_technique).
    pub fn advance_charges(&mut self, session: &Session) -> Result<Option<ActionReport>, CombatError> {
        let techniques = self.techniques;
        let transformations = self.transformations;
        let Some(mut combat) = self.store.load_active(session.id)? else {
            return Ok(None);
        };
        let mut lines = Vec::new();
        let mut hits = Vec::new();
        let mut origin = None;

        let chargers: Vec<ActorId> = combat
            .combatants
            .values()
            .filter(|c| c.charging.is_some() && c.is_standing())
            .map(|c| c.actor)
            .collect();

        for id in chargers {
            let Some(charge) = combat.combatants.get_mut(&id).and_then(|c| c.charging.take()) else {
                continue;
            };
            let Some(user) = session.actors.get(&id) else {
                debug!(actor = %id, "charging actor left the session");
                continue;
            };
            origin.get_or_insert(user.position);
            let def = techniques.get(&charge.code)?;

            if charge.ticks_remaining > 1 {
                let hold_cost = def.charge.map_or(0, |spec| spec.hold_cost);
                if let Some(c) = combat.combatants.get_mut(&id) {
                    if c.ki < hold_cost {
                        lines.push(format!("{} cannot hold {} and it fizzles", user.name, def.code));
                    } else {
                        c.spend_ki(hold_cost);
                        c.charging = Some(ChargingTechnique {
                            ticks_remaining: charge.ticks_remaining.saturating_sub(1),
                            ..charge
                        });
                    }
                }
                continue;
            }

            let proficiency = user.proficiencies.get(&def.code).copied().unwrap_or(0);
            let seed = RollSeed {
                session: session.id,
                tick: session.tick,
                attacker: id,
                technique: &def.code,
            };
            if release_succeeds(def, proficiency, SuccessRoll::Seeded(seed))? {
                lines.push(format!("{} releases {}", user.name, def.code));
                let mut landed =
                    strike(session, &mut combat, user, def, &charge.target, transformations, &mut lines)?;
                hits.append(&mut landed);
            } else {
                lines.push(format!("{}'s {} collapses on release", user.name, def.code));
            }
        }

        let origin = origin.unwrap_or_default();
        self.finish(session, origin, combat, lines, hits).map(Some)
    }

    /// Enter transformation `code` with `actor`.
    ///
    /// Being down, already transformed or still exhausted are soft outcomes
    /// written to the log.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::UnknownActor`] for an actor outside the
    /// session, [`CombatError::Character`] for an unknown form, or
    /// [`CombatError::Store`] on persistence failure.
    pub fn transform(
        &mut self,
        session: &Session,
        actor: ActorId,
        code: &str,
    ) -> Result<ActionReport, CombatError> {
        let transformations = self.transformations;
        let user = session.actor(actor)?;
        let def = transformations.get(code)?;
        let mut combat = self.open_combat(session)?;
        combat.enlist(user, transformations)?;
        let mut lines = Vec::new();

        if combat.is_down(actor) {
            lines.push(format!("{} is down and cannot fight", user.name));
        } else if let Some(c) = combat.combatants.get_mut(&actor) {
            match activate(&c.transformation, def) {
                Ok(state) => {
                    c.transformation = state;
                    lines.push(format!("{} transforms into {}", user.name, def.code));
                }
                Err(CharacterError::TransformationUnavailable { reason, .. }) => {
                    lines.push(format!("{} cannot use {}: {reason}", user.name, def.code));
                }
                Err(err) => return Err(err.into()),
            }
        }

        self.finish(session, user.position, combat, lines, Vec::new())
    }

    /// Leave `actor`'s active transformation, entering exhaustion.
    ///
    /// Reverting with no active form is a soft outcome.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::UnknownActor`] for an actor outside the
    /// session, [`CombatError::Character`] for an unknown active form, or
    /// [`CombatError::Store`] on persistence failure.
    pub fn revert(&mut self, session: &Session, actor: ActorId) -> Result<ActionReport, CombatError> {
        let transformations = self.transformations;
        let user = session.actor(actor)?;
        let mut combat = self.open_combat(session)?;
        combat.enlist(user, transformations)?;
        let mut lines = Vec::new();

        if let Some(c) = combat.combatants.get_mut(&actor) {
            if c.transformation.is_active() {
                c.transformation = deactivate(&c.transformation, transformations)?;
                lines.push(format!("{} reverts to normal", user.name));
            } else {
                lines.push(format!("{} is not transformed", user.name));
            }
        }

        self.finish(session, user.position, combat, lines, Vec::new())
    }

    /// Advance every active transformation in the session by one tick.
    ///
    /// Each tick drains the form's ki cost. A combatant who cannot pay
    /// drops the form, as does one whose form reaches `max_ticks`; both
    /// enter exhaustion. Returns `None` when the session has no active
    /// combat.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::Character`] for an unknown active form, or
    /// [`CombatError::Store`] on persistence failure.
    pub fn advance_transformations(
        &mut self,
        session: &Session,
    ) -> Result<Option<ActionReport>, CombatError> {
        let transformations = self.transformations;
        let Some(mut combat) = self.store.load_active(session.id)? else {
            return Ok(None);
        };
        let mut lines = Vec::new();
        let mut origin = None;

        let transformed = combat
            .combatants
            .values_mut()
            .filter(|c| c.is_standing() && c.transformation.is_active());
        for c in transformed {
            let user = session.actors.get(&c.actor);
            let name = user.map_or_else(|| c.actor.to_string(), |user| user.name.clone());
            if let Some(user) = user {
                origin.get_or_insert(user.position);
            }
            let step = tick(&c.transformation, transformations)?;
            if c.ki < step.ki_drain {
                c.ki = 0;
                c.transformation = deactivate(&c.transformation, transformations)?;
                lines.push(format!("{name} runs out of ki and drops the transformation"));
                continue;
            }
            c.spend_ki(step.ki_drain);
            c.transformation = step.state;
            if step.expired {
                lines.push(format!("{name}'s transformation wears off"));
            }
        }

        let origin = origin.unwrap_or_default();
        self.finish(session, origin, combat, lines, Vec::new()).map(Some)
    }

    fn open_combat(&mut self, session: &Session) -> Result<Combat, CombatError> {
        if let Some(combat) = self.store.load_active(session.id)? {
            return Ok(combat);
        }
        let id = self.store.allocate_id()?;
        info!(combat = %id, session = %session.id, tick = session.tick, "combat started");
        Ok(Combat {
            id,
            session: session.id,
            started_tick: session.tick,
            combatants: BTreeMap::new(),
            resolved: false,
            winner: None,
        })
    }

    fn finish(
        &mut self,
        session: &Session,
        origin: Coord,
        mut combat: Combat,
        mut lines: Vec<String>,
        hits: Vec<Hit>,
    ) -> Result<ActionReport, CombatError> {
        let standing = combat.standing_teams();
        if combat.teams().len() >= 2 && standing.len() <= 1 {
            combat.resolved = true;
            combat.winner = standing.first().copied();
            match combat.winner {
                Some(team) => lines.push(format!("The fight is over; team {team} prevails")),
                None => lines.push(String::from("The fight is over; nobody is left standing")),
            }
            info!(
                combat = %combat.id,
                session = %session.id,
                winner = ?combat.winner,
                "combat resolved"
            );
        }

        self.store.save(&combat)?;
        for text in lines {
            self.store.append_log(
                session.id,
                CombatLogEntry {
                    tick: session.tick,
                    origin,
                    radius: self.rules.log_radius,
                    text,
                },
            )?;
        }

        Ok(ActionReport {
            combat: combat.id,
            hits,
            resolved: combat.resolved,
            winner: combat.winner,
        })
    }
}

/// Resolve a landed technique's targets and apply its damage.
fn strike(
    session: &Session,
    combat: &mut Combat,
    user: &CombatActor,
    def: &TechniqueDefinition,
    aim: &TargetSpec,
    transformations: &TransformationCatalog,
    lines: &mut Vec<String>,
) -> Result<Vec<Hit>, CombatError> {
    let proficiency = user.proficiencies.get(&def.code).copied().unwrap_or(0);
    let attributes = combat.attributes_of(user, transformations)?;
    let candidates: Vec<Positioned> = session
        .actors
        .values()
        .filter(|actor| actor.id != user.id && !combat.is_down(actor.id))
        .map(|actor| Positioned {
            id: actor.id,
            position: actor.position,
        })
        .collect();
    let targets = resolve_targets(user.position, &candidates, def.delivery, def.shape(), aim);
    if targets.is_empty() {
        lines.push(format!("{}'s {} hits nothing", user.name, def.code));
        return Ok(Vec::new());
    }

    let mut hits = Vec::with_capacity(targets.len());
    for target in targets {
        let victim = session.actor(target)?;
        combat.enlist(victim, transformations)?;
        let defense = combat.attributes_of(victim, transformations)?;
        let damage = technique_damage(def, proficiency, &attributes, &defense)?;
        let source = format!("{}'s {} hits", user.name, def.code);
        hits.push(apply_hit(combat, victim, damage, &source, lines));
    }
    Ok(hits)
}

fn apply_hit(
    combat: &mut Combat,
    victim: &CombatActor,
    damage: u32,
    source: &str,
    lines: &mut Vec<String>,
) -> Hit {
    let defeated = combat
        .combatants
        .get_mut(&victim.id)
        .is_some_and(|c| c.take_damage(damage));
    lines.push(format!("{source} {} for {damage} damage", victim.name));
    if defeated {
        lines.push(format!("{} is defeated", victim.name));
    }
    Hit {
        target: victim.id,
        damage,
        defeated,
    }
}
