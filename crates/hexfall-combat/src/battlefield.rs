//! Target queries used by class decision logic.

use crate::character::Character;

/// Source of opponents for a deciding character.
pub trait Battlefield {
    /// Nearest living enemy of `of`, if any.
    ///
    /// Ties go to the first candidate in iteration order.
    fn nearest_enemy(&mut self, of: &Character) -> Option<&mut Character>;
}

/// A battlefield with nobody to fight.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnemies;

impl Battlefield for NoEnemies {
    fn nearest_enemy(&mut self, _of: &Character) -> Option<&mut Character> {
        None
    }
}

/// Every living character other than `of` counts as an enemy.
impl Battlefield for [Character] {
    fn nearest_enemy(&mut self, of: &Character) -> Option<&mut Character> {
        let position = of.position();
        self.iter_mut()
            .filter(|c| c.is_alive() && c.id() != of.id())
            .min_by_key(|c| c.position().distance_to(position))
    }
}

impl Battlefield for Vec<Character> {
    fn nearest_enemy(&mut self, of: &Character) -> Option<&mut Character> {
        self.as_mut_slice().nearest_enemy(of)
    }
}
