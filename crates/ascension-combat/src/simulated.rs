//! Headless combat: a whole fight resolved in memory.
//!
//! Used for tournaments and background skirmishes where nobody is watching
//! tick by tick. Fighters keep the transformation state they bring in for
//! the whole fight; their attributes are scaled by it once up front. Turn order comes from the [`TurnScheduler`] with each
//! fighter's initiative speed; success rolls come from an injected
//! [`Randomizer`], so a scripted randomizer pins every branch in tests.
//!
//! Each turn a fighter regains ki, then:
//!
//! 1. continues a charge in progress (stepping toward the nearest enemy
//!    while holding when the technique allows moving while prepared), or
//! 2. uses the affordable technique whose geometry deals the most damage to
//!    enemies (ties go to the lowest technique code), or
//! 3. strikes an adjacent enemy, or
//! 4. steps toward the nearest enemy.
//!
//! The fight ends when at most one team is standing or `max_actions` turns
//! have been taken. On the cap the fighter with the highest remaining HP
//! fraction wins (lowest id on ties).

use std::collections::{BTreeMap, BTreeSet};

use ascension_characters::{TransformationCatalog, initiative_speed, ki_regen_per_turn};
use ascension_types::{ActorId, Coord, Direction, Randomizer, TeamId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::combatant::{ChargingTechnique, Combatant};
use crate::error::CombatError;
use crate::live::CombatActor;
use crate::roll::SuccessRoll;
use crate::scheduler::{DEFAULT_THRESHOLD, TurnActor, TurnScheduler};
use crate::targeting::{AimMode, Positioned, TargetSpec, resolve_targets};
use crate::technique::{
    AttemptOutcome, TechniqueCatalog, TechniqueDefinition, attempt, effective_cost, melee_damage,
    release_succeeds, technique_damage,
};

/// Turn cap used when configuration is silent.
pub const DEFAULT_MAX_ACTIONS: u32 = 200;

const fn default_max_actions() -> u32 {
    DEFAULT_MAX_ACTIONS
}

const fn default_threshold() -> u32 {
    DEFAULT_THRESHOLD
}

/// Tunables for a headless fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRules {
    /// Whether techniques can hit teammates.
    #[serde(default)]
    pub friendly_fire: bool,
    /// Maximum turns before the fight is called.
    #[serde(default = "default_max_actions")]
    pub max_actions: u32,
    /// Initiative threshold for the scheduler.
    #[serde(default = "default_threshold")]
    pub threshold: u32,
}

impl Default for SimulationRules {
    fn default() -> Self {
        Self {
            friendly_fire: false,
            max_actions: DEFAULT_MAX_ACTIONS,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Result of a headless fight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedOutcome {
    /// Winning fighter, if anyone is left standing.
    pub winner: Option<ActorId>,
    /// Winning fighter's team.
    pub winning_team: Option<TeamId>,
    /// Narration in turn order.
    pub log: Vec<String>,
    /// Turns taken.
    pub actions: u32,
    /// Whether the fight hit `max_actions`.
    pub capped: bool,
    /// Final fighter state.
    pub combatants: BTreeMap<ActorId, Combatant>,
}

/// A fighter's description plus live state.
struct Fighter {
    actor: CombatActor,
    state: Combatant,
}

type Roster = BTreeMap<ActorId, Fighter>;

/// A technique the AI decided to use.
struct Plan<'c> {
    def: &'c TechniqueDefinition,
    proficiency: u8,
    aim: TargetSpec,
    targets: Vec<ActorId>,
}

/// Runs headless fights against a technique catalog.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedCombatResolver<'a> {
    /// Technique definitions.
    techniques: &'a TechniqueCatalog,
    /// Transformation definitions.
    transformations: &'a TransformationCatalog,
}

impl<'a> SimulatedCombatResolver<'a> {
    /// A resolver over `techniques` and `transformations`.
    pub const fn new(techniques: &'a TechniqueCatalog, transformations: &'a TransformationCatalog) -> Self {
        Self {
            techniques,
            transformations,
        }
    }

    /// Fight until one team remains or the turn cap is reached.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::EmptyActorList`] for no fighters,
    /// [`CombatError::InvalidThreshold`] for a zero threshold, and catalog
    /// errors if a fighter knows a technique or is in a form the catalogs
    /// lack.
    pub fn resolve(
        &self,
        fighters: &[CombatActor],
        rules: &SimulationRules,
        rng: &mut dyn Randomizer,
    ) -> Result<SimulatedOutcome, CombatError> {
        if fighters.is_empty() {
            return Err(CombatError::EmptyActorList);
        }
        let scheduler = TurnScheduler::new(rules.threshold)?;
        let mut roster = Roster::new();
        for actor in fighters {
            let mut actor = actor.clone();
            actor.attributes = actor.effective(&actor.transformation, self.transformations)?;
            let mut state = Combatant::new(actor.id, actor.team, &actor.attributes);
            state.transformation = actor.transformation.clone();
            roster.insert(actor.id, Fighter { actor, state });
        }
        let mut order: Vec<TurnActor> = roster
            .values()
            .map(|f| TurnActor::new(f.actor.id, initiative_speed(&f.actor.attributes)))
            .collect();

        let mut log = Vec::new();
        let mut actions = 0_u32;
        let mut capped = false;
        loop {
            if standing_teams(&roster).len() <= 1 {
                break;
            }
            if actions >= rules.max_actions {
                capped = true;
                break;
            }
            let id = scheduler.pick_next_actor_id(&mut order)?;
            self.take_turn(&mut roster, id, rules, rng, &mut log)?;
            actions = actions.saturating_add(1);
            order.retain(|turn| roster.get(&turn.id).is_some_and(|f| f.state.is_standing()));
        }

        let winner = if capped {
            roster
                .values()
                .filter(|f| f.state.is_standing())
                .fold(None::<&Fighter>, |best, f| match best {
                    Some(b) if f.state.cmp_hp_fraction(&b.state).is_le() => Some(b),
                    _ => Some(f),
                })
        } else {
            roster.values().find(|f| f.state.is_standing())
        };
        let winning_team = winner.map(|f| f.actor.team);
        let winner = winner.map(|f| f.actor.id);
        if let Some(id) = winner {
            log.push(format!(
                "{} wins",
                roster.get(&id).map_or("Nobody", |f| f.actor.name.as_str())
            ));
        }
        info!(winner = ?winner, actions, capped, "simulated combat finished");

        Ok(SimulatedOutcome {
            winner,
            winning_team,
            log,
            actions,
            capped,
            combatants: roster.into_iter().map(|(id, f)| (id, f.state)).collect(),
        })
    }

    fn take_turn(
        &self,
        roster: &mut Roster,
        id: ActorId,
        rules: &SimulationRules,
        rng: &mut dyn Randomizer,
        log: &mut Vec<String>,
    ) -> Result<(), CombatError> {
        let Some(me) = roster.get_mut(&id) else {
            return Ok(());
        };
        if me.state.defeated {
            return Ok(());
        }
        me.state.regen_ki(ki_regen_per_turn(&me.actor.attributes));
        let actor = me.actor.clone();
        let ki = me.state.ki;
        if let Some(charge) = me.state.charging.take() {
            let mobile = self
                .techniques
                .get(&charge.code)?
                .charge
                .is_some_and(|spec| spec.move_while_prepared);
            self.continue_charge(roster, &actor, charge, rules, rng, log)?;
            let holding = roster.get(&id).is_some_and(|me| me.state.charging.is_some());
            let approach = nearest_enemy(roster, &actor)
                .map(|(_, at)| at)
                .filter(|at| mobile && holding && actor.position.manhattan(*at) > 1);
            if let Some(enemy_at) = approach {
                step_toward(roster, &actor, enemy_at, log);
            }
            return Ok(());
        }

        let Some((enemy, enemy_at)) = nearest_enemy(roster, &actor) else {
            return Ok(());
        };

        if let Some(plan) = self.plan_technique(roster, &actor, ki, enemy, enemy_at, rules)? {
            let outcome = attempt(
                plan.def,
                plan.proficiency,
                ki,
                SuccessRoll::Randomizer(rng),
            )?;
            if let Some(me) = roster.get_mut(&id) {
                me.state.spend_ki(outcome.ki_spent());
            }
            match outcome {
                AttemptOutcome::Succeeded { .. } => {
                    apply_technique(roster, &actor, plan.def, plan.proficiency, &plan.targets, log)?;
                }
                AttemptOutcome::Failed { ki_spent } => log.push(format!(
                    "{}'s {} fizzles, wasting {ki_spent} ki",
                    actor.name, plan.def.code
                )),
                AttemptOutcome::ChargeStarted { ticks, .. } => {
                    if let Some(me) = roster.get_mut(&id) {
                        me.state.charging = Some(ChargingTechnique {
                            code: plan.def.code.clone(),
                            target: plan.aim,
                            ticks_remaining: ticks,
                        });
                    }
                    log.push(format!("{} begins charging {}", actor.name, plan.def.code));
                }
                AttemptOutcome::InsufficientKi { available, required } => log.push(format!(
                    "{} lacks the ki for {} ({available}/{required})",
                    actor.name, plan.def.code
                )),
            }
            return Ok(());
        }

        if actor.position.manhattan(enemy_at) <= 1 {
            if let Some(victim) = roster.get_mut(&enemy) {
                let damage = melee_damage(&actor.attributes, &victim.actor.attributes);
                let defeated = victim.state.take_damage(damage);
                log.push(format!(
                    "{} strikes {} for {damage} damage",
                    actor.name, victim.actor.name
                ));
                if defeated {
                    log.push(format!("{} is defeated", victim.actor.name));
                }
            }
            return Ok(());
        }

        step_toward(roster, &actor, enemy_at, log);
        Ok(())
    }

    fn continue_charge(
        &self,
        roster: &mut Roster,
        actor: &CombatActor,
        charge: ChargingTechnique,
        rules: &SimulationRules,
        rng: &mut dyn Randomizer,
        log: &mut Vec<String>,
    ) -> Result<(), CombatError> {
        let def = self.techniques.get(&charge.code)?;
        if charge.ticks_remaining > 1 {
            let hold_cost = def.charge.map_or(0, |spec| spec.hold_cost);
            if let Some(me) = roster.get_mut(&actor.id) {
                if me.state.ki < hold_cost {
                    log.push(format!("{} cannot hold {} and it fizzles", actor.name, def.code));
                } else {
                    me.state.spend_ki(hold_cost);
                    me.state.charging = Some(ChargingTechnique {
                        ticks_remaining: charge.ticks_remaining.saturating_sub(1),
                        ..charge
                    });
                    log.push(format!("{} keeps charging {}", actor.name, def.code));
                }
            }
            return Ok(());
        }

        let proficiency = actor.proficiencies.get(&def.code).copied().unwrap_or(0);
        if release_succeeds(def, proficiency, SuccessRoll::Randomizer(rng))? {
            let candidates = candidates(roster, actor, rules.friendly_fire);
            let targets =
                resolve_targets(actor.position, &candidates, def.delivery, def.shape(), &charge.target);
            log.push(format!("{} releases {}", actor.name, def.code));
            apply_technique(roster, actor, def, proficiency, &targets, log)?;
        } else {
            log.push(format!("{}'s {} collapses on release", actor.name, def.code));
        }
        Ok(())
    }

    /// Pick the affordable technique that deals the most damage to enemies.
    fn plan_technique(
        &self,
        roster: &Roster,
        actor: &CombatActor,
        ki: u32,
        enemy: ActorId,
        enemy_at: Coord,
        rules: &SimulationRules,
    ) -> Result<Option<Plan<'a>>, CombatError> {
        let candidates = candidates(roster, actor, rules.friendly_fire);
        let mut best: Option<(u64, Plan<'a>)> = None;

        for (code, &proficiency) in &actor.proficiencies {
            let def = self.techniques.get(code)?;
            if effective_cost(def, proficiency)? > ki {
                continue;
            }
            let Some(aim) = choose_aim(def, actor.position, enemy, enemy_at) else {
                continue;
            };
            let targets =
                resolve_targets(actor.position, &candidates, def.delivery, def.shape(), &aim);
            let mut expected = 0_u64;
            for target in &targets {
                let Some(victim) = roster.get(target) else {
                    continue;
                };
                if victim.actor.team == actor.team {
                    continue;
                }
                let damage = technique_damage(def, proficiency, &actor.attributes, &victim.actor.attributes)?;
                expected = expected.saturating_add(u64::from(damage));
            }
            if expected == 0 {
                continue;
            }
            if best.as_ref().is_none_or(|(top, _)| expected > *top) {
                debug!(actor = %actor.id, technique = %code, expected, "technique candidate");
                best = Some((
                    expected,
                    Plan {
                        def,
                        proficiency,
                        aim,
                        targets,
                    },
                ));
            }
        }
        Ok(best.map(|(_, plan)| plan))
    }
}

/// Teams with someone standing.
fn standing_teams(roster: &Roster) -> BTreeSet<TeamId> {
    roster
        .values()
        .filter(|f| f.state.is_standing())
        .map(|f| f.actor.team)
        .collect()
}

/// The closest standing enemy by Manhattan distance, lowest id on ties.
fn nearest_enemy(roster: &Roster, actor: &CombatActor) -> Option<(ActorId, Coord)> {
    roster
        .values()
        .filter(|f| f.state.is_standing() && f.actor.team != actor.team)
        .min_by_key(|f| (actor.position.manhattan(f.actor.position), f.actor.id))
        .map(|f| (f.actor.id, f.actor.position))
}

/// Move one tile toward `target` unless a standing fighter is in the way.
fn step_toward(roster: &mut Roster, actor: &CombatActor, target: Coord, log: &mut Vec<String>) {
    let next = actor.position.step_toward(target);
    let blocked = roster
        .values()
        .any(|f| f.actor.id != actor.id && f.state.is_standing() && f.actor.position == next);
    if blocked {
        log.push(format!("{} holds position", actor.name));
    } else if let Some(me) = roster.get_mut(&actor.id) {
        me.actor.position = next;
        log.push(format!("{} moves to {next}", actor.name));
    }
}

/// Standing actors a technique may hit, excluding the user.
fn candidates(roster: &Roster, actor: &CombatActor, friendly_fire: bool) -> Vec<Positioned> {
    roster
        .values()
        .filter(|f| f.actor.id != actor.id && f.state.is_standing())
        .filter(|f| friendly_fire || f.actor.team != actor.team)
        .map(|f| Positioned {
            id: f.actor.id,
            position: f.actor.position,
        })
        .collect()
}

/// The aim a fighter uses against `enemy`, in preference order.
fn choose_aim(
    def: &TechniqueDefinition,
    origin: Coord,
    enemy: ActorId,
    enemy_at: Coord,
) -> Option<TargetSpec> {
    if def.allows(AimMode::Actor) {
        return Some(TargetSpec::at_actor(enemy));
    }
    if def.allows(AimMode::Point) {
        return Some(TargetSpec::at_point(enemy_at));
    }
    if def.allows(AimMode::Direction) {
        return Direction::toward(origin, enemy_at).map(TargetSpec::toward);
    }
    def.allows(AimMode::SelfAim).then(TargetSpec::self_centered)
}

fn apply_technique(
    roster: &mut Roster,
    attacker: &CombatActor,
    def: &TechniqueDefinition,
    proficiency: u8,
    targets: &[ActorId],
    log: &mut Vec<String>,
) -> Result<(), CombatError> {
    if targets.is_empty() {
        log.push(format!("{}'s {} hits nothing", attacker.name, def.code));
        return Ok(());
    }
    for target in targets {
        let Some(victim) = roster.get_mut(target) else {
            continue;
        };
        let damage = technique_damage(def, proficiency, &attacker.attributes, &victim.actor.attributes)?;
        let defeated = victim.state.take_damage(damage);
        log.push(format!(
            "{}'s {} hits {} for {damage} damage",
            attacker.name, def.code, victim.actor.name
        ));
        if defeated {
            log.push(format!("{} is defeated", victim.actor.name));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ascension_characters::TransformationDef;
    use ascension_types::{
        AttributeKind, CoreAttributes, ScriptedRandomizer, SeededRandomizer, TransformationState,
    };

    use super::*;
    use crate::curve::CurveSpec;
    use crate::targeting::{DeliveryShape, Piercing};
    use crate::technique::{ChargeSpec, DamageFormula};

    fn fighter(id: u64, team: u64, x: i32, y: i32, level: u32) -> CombatActor {
        CombatActor {
            id: ActorId::new(id),
            name: format!("Fighter{id}"),
            team: TeamId::new(team),
            position: Coord::new(x, y),
            attributes: CoreAttributes::uniform(level),
            transformation: TransformationState::default(),
            proficiencies: BTreeMap::new(),
        }
    }

    fn nova() -> TechniqueDefinition {
        TechniqueDefinition {
            code: String::from("nova"),
            name: String::from("Nova"),
            aim_modes: vec![AimMode::SelfAim],
            delivery: DeliveryShape::Aoe,
            range: 0,
            aoe_radius: 1,
            piercing: Piercing::First,
            base_cost: 5,
            cost_curve: None,
            success_curve: None,
            failure_cost_multiplier: 0.5,
            damage: DamageFormula {
                base: 10,
                stat: AttributeKind::Strength,
                stat_multiplier: 1.0,
                mitigation_stat: AttributeKind::Durability,
                mitigation_divisor: 2,
                min_damage: 0,
                curve: None,
            },
            charge: None,
        }
    }

    #[test]
    fn stronger_fighter_wins_melee_duel() {
        let catalog = TechniqueCatalog::default();
        let forms = TransformationCatalog::default();
        let resolver = SimulatedCombatResolver::new(&catalog, &forms);
        let mut rng = ScriptedRandomizer::new(vec![0]);
        let outcome = resolver
            .resolve(
                &[fighter(1, 1, 0, 0, 10), fighter(2, 2, 1, 0, 1)],
                &SimulationRules::default(),
                &mut rng,
            )
            .unwrap();
        assert_eq!(outcome.winner, Some(ActorId::new(1)));
        assert_eq!(outcome.winning_team, Some(TeamId::new(1)));
        assert!(!outcome.capped);
        assert!(outcome.combatants[&ActorId::new(2)].defeated);
        assert!(outcome.log.iter().any(|line| line.contains("is defeated")));
    }

    #[test]
    fn fighters_close_the_distance() {
        let catalog = TechniqueCatalog::default();
        let forms = TransformationCatalog::default();
        let resolver = SimulatedCombatResolver::new(&catalog, &forms);
        let mut rng = ScriptedRandomizer::new(vec![0]);
        let outcome = resolver
            .resolve(
                &[fighter(1, 1, 0, 0, 10), fighter(2, 2, 6, 3, 1)],
                &SimulationRules::default(),
                &mut rng,
            )
            .unwrap();
        assert_eq!(outcome.winner, Some(ActorId::new(1)));
        assert!(outcome.log.iter().any(|line| line.contains("moves to")));
    }

    #[test]
    fn cap_awards_best_hp_fraction() {
        let catalog = TechniqueCatalog::default();
        let forms = TransformationCatalog::default();
        let resolver = SimulatedCombatResolver::new(&catalog, &forms);
        let rules = SimulationRules {
            max_actions: 1,
            ..SimulationRules::default()
        };
        let mut rng = ScriptedRandomizer::new(vec![0]);
        let outcome = resolver
            .resolve(&[fighter(1, 1, 0, 0, 10), fighter(2, 2, 1, 0, 1)], &rules, &mut rng)
            .unwrap();
        assert!(outcome.capped);
        assert_eq!(outcome.actions, 1);
        assert_eq!(outcome.winner, Some(ActorId::new(1)));
    }

    #[test]
    fn cap_tie_goes_to_lowest_id() {
        let catalog = TechniqueCatalog::default();
        let forms = TransformationCatalog::default();
        let resolver = SimulatedCombatResolver::new(&catalog, &forms);
        let rules = SimulationRules {
            max_actions: 0,
            ..SimulationRules::default()
        };
        let mut rng = ScriptedRandomizer::new(vec![0]);
        let outcome = resolver
            .resolve(&[fighter(5, 1, 0, 0, 3), fighter(2, 2, 9, 9, 3)], &rules, &mut rng)
            .unwrap();
        assert_eq!(outcome.winner, Some(ActorId::new(2)));
    }

    #[test]
    fn friendly_fire_toggle_filters_teammates() {
        let catalog = TechniqueCatalog::new([nova()]).unwrap();
        let forms = TransformationCatalog::default();
        let resolver = SimulatedCombatResolver::new(&catalog, &forms);
        let mut caster = fighter(1, 1, 0, 0, 10);
        caster.proficiencies.insert(String::from("nova"), 50);
        let roster = [caster, fighter(2, 2, 1, 0, 1), fighter(3, 1, 0, 1, 1)];

        for friendly_fire in [false, true] {
            let rules = SimulationRules {
                friendly_fire,
                max_actions: 1,
                ..SimulationRules::default()
            };
            let mut rng = ScriptedRandomizer::new(vec![0]);
            let outcome = resolver.resolve(&roster, &rules, &mut rng).unwrap();
            let ally = &outcome.combatants[&ActorId::new(3)];
            let enemy = &outcome.combatants[&ActorId::new(2)];
            assert_eq!(enemy.max_hp - enemy.hp, 20);
            if friendly_fire {
                assert_eq!(ally.max_hp - ally.hp, 20);
            } else {
                assert_eq!(ally.hp, ally.max_hp);
            }
        }
    }

    #[test]
    fn same_seed_same_fight() {
        let mut blast = nova();
        blast.code = String::from("blast");
        blast.aim_modes = vec![AimMode::Actor];
        blast.delivery = DeliveryShape::Projectile;
        blast.range = 4;
        blast.success_curve = Some(CurveSpec::linear(0.5, 0.5));
        let catalog = TechniqueCatalog::new([blast]).unwrap();
        let forms = TransformationCatalog::default();
        let resolver = SimulatedCombatResolver::new(&catalog, &forms);
        let mut a = fighter(1, 1, 0, 0, 4);
        a.proficiencies.insert(String::from("blast"), 30);
        let mut b = fighter(2, 2, 3, 0, 4);
        b.proficiencies.insert(String::from("blast"), 30);
        let roster = [a, b];

        let first = resolver
            .resolve(&roster, &SimulationRules::default(), &mut SeededRandomizer::from_seed(9))
            .unwrap();
        let second = resolver
            .resolve(&roster, &SimulationRules::default(), &mut SeededRandomizer::from_seed(9))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn mobile_charge_advances_while_held() {
        let mut bomb = nova();
        bomb.code = String::from("spirit_bomb");
        bomb.aim_modes = vec![AimMode::Actor];
        bomb.delivery = DeliveryShape::Projectile;
        bomb.range = 10;
        bomb.damage.base = 30;
        let rules = SimulationRules {
            max_actions: 3,
            ..SimulationRules::default()
        };

        for move_while_prepared in [false, true] {
            let mut def = bomb.clone();
            def.charge = Some(ChargeSpec {
                charge_ticks: 3,
                hold_cost: 0,
                move_while_prepared,
            });
            let catalog = TechniqueCatalog::new([def]).unwrap();
            let forms = TransformationCatalog::default();
            let resolver = SimulatedCombatResolver::new(&catalog, &forms);
            let mut goku = fighter(1, 1, 0, 0, 10);
            goku.proficiencies.insert(String::from("spirit_bomb"), 50);
            let roster = [goku, fighter(2, 2, 8, 0, 1)];

            let mut rng = ScriptedRandomizer::new(vec![0]);
            let outcome = resolver.resolve(&roster, &rules, &mut rng).unwrap();
            assert!(outcome.log.iter().any(|line| line.contains("keeps charging")));
            let steps = outcome
                .log
                .iter()
                .filter(|line| line.starts_with("Fighter1 moves to"))
                .count();
            if move_while_prepared {
                assert!(steps >= 1);
            } else {
                assert_eq!(steps, 0);
            }
        }
    }

    #[test]
    fn fighters_keep_their_entry_form() {
        let catalog = TechniqueCatalog::default();
        let forms = TransformationCatalog::new([TransformationDef {
            code: String::from("kaioken"),
            name: String::new(),
            multiplier: 4.0,
            ki_drain_per_tick: 0,
            max_ticks: None,
            exhaustion_days: 1,
        }])
        .unwrap();
        let resolver = SimulatedCombatResolver::new(&catalog, &forms);
        let mut underdog = fighter(1, 1, 0, 0, 3);
        underdog.transformation.active = Some(String::from("kaioken"));
        let roster = [underdog, fighter(2, 2, 1, 0, 6)];

        let mut rng = ScriptedRandomizer::new(vec![0]);
        let outcome = resolver
            .resolve(&roster, &SimulationRules::default(), &mut rng)
            .unwrap();
        assert_eq!(outcome.winner, Some(ActorId::new(1)));
        let kept = &outcome.combatants[&ActorId::new(1)].transformation;
        assert_eq!(kept.active.as_deref(), Some("kaioken"));
        // Sized from 12s across the board: 50 + 120 + 60
        assert_eq!(outcome.combatants[&ActorId::new(1)].max_hp, 230);
    }

    #[test]
    fn lone_fighter_wins_without_acting() {
        let catalog = TechniqueCatalog::default();
        let forms = TransformationCatalog::default();
        let resolver = SimulatedCombatResolver::new(&catalog, &forms);
        let mut rng = ScriptedRandomizer::new(vec![0]);
        let outcome = resolver
            .resolve(&[fighter(4, 1, 0, 0, 1)], &SimulationRules::default(), &mut rng)
            .unwrap();
        assert_eq!(outcome.winner, Some(ActorId::new(4)));
        assert_eq!(outcome.actions, 0);
    }

    #[test]
    fn empty_roster_is_an_error() {
        let catalog = TechniqueCatalog::default();
        let forms = TransformationCatalog::default();
        let resolver = SimulatedCombatResolver::new(&catalog, &forms);
        let mut rng = ScriptedRandomizer::new(vec![0]);
        assert!(matches!(
            resolver.resolve(&[], &SimulationRules::default(), &mut rng),
            Err(CombatError::EmptyActorList)
        ));
    }
}
