//! Combat log lines with a visibility radius.

use ascension_types::Coord;
use serde::{Deserialize, Serialize};

/// Cells within which bystanders see a combat line, unless configured.
pub const DEFAULT_LOG_RADIUS: u32 = 8;

/// One narrated combat event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatLogEntry {
    /// Session tick the event happened on.
    pub tick: u64,
    /// Where it happened.
    pub origin: Coord,
    /// Manhattan radius within which the line is visible.
    pub radius: u32,
    /// Narration.
    pub text: String,
}

impl CombatLogEntry {
    /// Whether an observer at `observer` can see this line.
    pub const fn visible_from(&self, observer: Coord) -> bool {
        self.origin.manhattan(observer) <= self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_uses_manhattan_radius() {
        let entry = CombatLogEntry {
            tick: 3,
            origin: Coord::new(10, 10),
            radius: 2,
            text: String::from("Goku hits Vegeta"),
        };
        assert!(entry.visible_from(Coord::new(11, 11)));
        assert!(entry.visible_from(Coord::new(10, 8)));
        assert!(!entry.visible_from(Coord::new(13, 10)));
    }
}
