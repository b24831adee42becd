//! One-on-one fights between characters, settled by the headless resolver.
//!
//! Used for tournament brackets and dojo challenges. Each fighter is its
//! own team and brings its transformation state, which the resolver uses to
//! scale its attributes; the pair starts two tiles apart.

use ascension_characters::TransformationCatalog;
use ascension_combat::{CombatActor, SimulatedCombatResolver, SimulationRules, TechniqueCatalog};
use ascension_types::{ActorId, Character, CharacterId, Coord, Randomizer, TeamId};
use tracing::debug;

use crate::error::ClockError;

/// Catalogs and rules a duel needs.
#[derive(Debug, Clone, Copy)]
pub struct Arena<'a> {
    /// Techniques fighters may use.
    pub techniques: &'a TechniqueCatalog,
    /// Transformations that scale attributes.
    pub transformations: &'a TransformationCatalog,
    /// Headless fight rules.
    pub rules: SimulationRules,
}

impl Arena<'_> {
    /// Describe `character` as a combat actor at `position`.
    pub fn fighter(&self, character: &Character, position: Coord) -> CombatActor {
        CombatActor {
            id: ActorId::from(character.id),
            name: character.name.clone(),
            team: TeamId::new(character.id.into_inner()),
            position,
            attributes: character.attributes,
            transformation: character.transformation.clone(),
            proficiencies: character
                .proficiencies
                .iter()
                .filter(|(code, _)| self.techniques.get(code).is_ok())
                .map(|(code, level)| (code.clone(), *level))
                .collect(),
        }
    }

    /// Fight `left` against `right` and return the winner.
    ///
    /// A fight that ends with nobody standing goes to `left`.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::Combat`] for an unknown active transformation
    /// or rules the resolver rejects.
    pub fn duel(
        &self,
        left: &Character,
        right: &Character,
        rng: &mut dyn Randomizer,
    ) -> Result<CharacterId, ClockError> {
        let fighters = [
            self.fighter(left, Coord::new(0, 0)),
            self.fighter(right, Coord::new(2, 0)),
        ];
        let outcome = SimulatedCombatResolver::new(self.techniques, self.transformations)
            .resolve(&fighters, &self.rules, rng)?;
        let winner = outcome
            .winner
            .map_or(left.id, |actor| CharacterId::new(actor.into_inner()));
        debug!(
            left = %left.id,
            right = %right.id,
            %winner,
            actions = outcome.actions,
            capped = outcome.capped,
            "duel resolved"
        );
        Ok(winner)
    }
}
