//! Overland travel: one tile per day toward the travel target.

use ascension_types::{Character, Coord};

/// What a day of travel did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelStep {
    /// No travel target.
    Idle,
    /// Moved one tile, still under way.
    Moved(Coord),
    /// Reached the target, which is now cleared.
    Arrived(Coord),
}

/// Move `character` one step toward its travel target (x axis first).
pub fn advance(character: &mut Character) -> TravelStep {
    let Some(target) = character.travel_target else {
        return TravelStep::Idle;
    };
    character.position = character.position.step_toward(target);
    if character.position == target {
        character.travel_target = None;
        TravelStep::Arrived(target)
    } else {
        TravelStep::Moved(character.position)
    }
}

#[cfg(test)]
mod tests {
    use ascension_types::{CharacterId, CoreAttributes, WorldId};

    use super::*;

    #[test]
    fn walks_x_first_then_arrives() {
        let mut hero = Character::new(
            CharacterId::new(1),
            WorldId::new(1),
            "Gohan",
            Coord::new(0, 0),
            CoreAttributes::uniform(1),
        );
        assert_eq!(advance(&mut hero), TravelStep::Idle);
        hero.travel_target = Some(Coord::new(1, 1));
        assert_eq!(advance(&mut hero), TravelStep::Moved(Coord::new(1, 0)));
        assert_eq!(advance(&mut hero), TravelStep::Arrived(Coord::new(1, 1)));
        assert!(hero.travel_target.is_none());
        assert_eq!(advance(&mut hero), TravelStep::Idle);
    }
}
