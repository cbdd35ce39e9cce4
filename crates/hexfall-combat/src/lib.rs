//! # Hexfall Combat
//!
//! Combat core for Hexfall.
//!
//! This crate provides the character combat simulation:
//! - Stat blocks with derived combat stats
//! - Damage types and mitigation
//! - Timed status effects (bleed, stun, buffs)
//! - Abilities with cooldowns, resource costs and ultimate charge
//! - Tiered talent trees
//! - Characters with a per-tick update and class decision hooks
//! - The Warrior specialization
//! - Team encounters

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ability;
pub mod battlefield;
pub mod character;
pub mod class;
pub mod damage;
pub mod effects;
pub mod encounter;
pub mod error;
pub mod stats;
pub mod talent;
pub mod view;
pub mod warrior;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::ability::*;
    pub use crate::battlefield::*;
    pub use crate::character::*;
    pub use crate::class::*;
    pub use crate::damage::*;
    pub use crate::effects::*;
    pub use crate::encounter::*;
    pub use crate::error::*;
    pub use crate::stats::*;
    pub use crate::talent::*;
    pub use crate::view::*;
    pub use crate::warrior::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use hexfall_common::{GridPos, TeamId};

    #[test]
    fn test_warrior_spends_talents_and_fights() {
        let mut hero = Character::warrior("Hero")
            .with_seed(11)
            .with_level(6)
            .with_position(GridPos::new(0, 0));
        for talent in [
            Talent::ImprovedStrength,
            Talent::DeepWounds,
            Talent::DefensiveMastery,
            Talent::ShieldWall,
            Talent::RavagingStorm,
        ] {
            assert!(hero.unlock_talent(talent).is_ok());
        }
        assert_eq!(hero.abilities().len(), 3);
        assert_eq!(
            hero.ultimate().map(Ability::kind),
            Some(AbilityKind::RavagingStorm)
        );

        let dummy = Character::warrior("Dummy")
            .with_seed(12)
            .with_position(GridPos::new(4, 0));
        let mut encounter = Encounter::new()
            .with(TeamId::new(0), hero)
            .with(TeamId::new(1), dummy);

        for _ in 0..10_000 {
            if encounter.is_over() {
                break;
            }
            encounter.step(0.1);
        }
        assert!(encounter.is_over());
    }

    #[test]
    fn test_prelude_exports() {
        let effect = StatusEffect::bleed(1.0, 1.0);
        assert!(effect.is_stackable());
        assert_eq!(CharacterClass::Warrior.tint(), Tint::new(0.8, 0.2, 0.2, 1.0));
        assert!(DamageType::True.mitigation(&DerivedStats::from_base(&BaseStats::default())) < 1e-6);
    }
}
