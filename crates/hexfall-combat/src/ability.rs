//! Abilities with cooldowns and resource costs.
//!
//! Regular abilities occupy one of a character's three slots; ultimate
//! abilities are gated by ultimate charge instead of cooldown.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::character::Character;
use crate::damage::DamageType;
use crate::effects::StatusEffect;
use crate::talent::Talent;

/// Execute damage doubles below this target health fraction.
pub const EXECUTE_THRESHOLD: f32 = 0.2;

/// Kind of ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Heavy physical strike.
    Cleave,
    /// Finisher, doubled against low-health targets.
    Execute,
    /// Strike that applies Mortal Wound.
    MortalStrike,
    /// Strike that heals for half the damage dealt.
    BloodthirstyStrike,
    /// Damage reduction on self.
    ShieldWall,
    /// Ultimate: damage increase on self.
    BattleCry,
    /// Ultimate: massive physical strike.
    RavagingStorm,
    /// Ultimate: invulnerability on self.
    LastStand,
}

impl AbilityKind {
    /// Display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Cleave => "Cleave",
            Self::Execute => "Execute",
            Self::MortalStrike => "Mortal Strike",
            Self::BloodthirstyStrike => "Bloodthirsty Strike",
            Self::ShieldWall => "Shield Wall",
            Self::BattleCry => "Battle Cry",
            Self::RavagingStorm => "Ravaging Storm",
            Self::LastStand => "Last Stand",
        }
    }

    /// Description.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Cleave => "A sweeping strike dealing 120% attack damage.",
            Self::Execute => {
                "Deals 150% attack damage, doubled against targets below 20% health."
            }
            Self::MortalStrike => {
                "Deals 200% attack damage and halves the target's healing received."
            }
            Self::BloodthirstyStrike => {
                "Deals 150% attack damage and heals for half the damage dealt."
            }
            Self::ShieldWall => "Reduces damage taken by 60% for 6 seconds.",
            Self::BattleCry => "Increases damage dealt by 20% for 8 seconds.",
            Self::RavagingStorm => "Deals 300% attack damage to the target.",
            Self::LastStand => "Become immune to damage for 5 seconds, unable to attack.",
        }
    }

    /// Check whether this is an ultimate.
    #[must_use]
    pub fn is_ultimate(self) -> bool {
        matches!(self, Self::BattleCry | Self::RavagingStorm | Self::LastStand)
    }

    /// Check whether activation needs a target.
    #[must_use]
    pub fn requires_target(self) -> bool {
        matches!(
            self,
            Self::Cleave
                | Self::Execute
                | Self::MortalStrike
                | Self::BloodthirstyStrike
                | Self::RavagingStorm
        )
    }

    /// Default resource cost.
    #[must_use]
    pub fn default_cost(self) -> f32 {
        match self {
            Self::Cleave | Self::ShieldWall => 20.0,
            Self::Execute | Self::BloodthirstyStrike => 25.0,
            Self::MortalStrike => 30.0,
            Self::BattleCry | Self::RavagingStorm | Self::LastStand => 0.0,
        }
    }

    /// Default cooldown in seconds.
    #[must_use]
    pub fn default_cooldown(self) -> f32 {
        match self {
            Self::Cleave => 6.0,
            Self::Execute | Self::BloodthirstyStrike => 8.0,
            Self::MortalStrike => 10.0,
            Self::ShieldWall => 30.0,
            Self::BattleCry | Self::RavagingStorm | Self::LastStand => 0.0,
        }
    }

    /// Run the ability's effect.
    ///
    /// Costs, cooldowns and charge are handled by the caller.
    pub(crate) fn activate(self, source: &mut Character, target: Option<&mut Character>) {
        let attack = source.stats().derived().attack_damage;
        debug!("{} uses {}", source.name(), self.name());

        match self {
            Self::Cleave => {
                let bonus = 0.1 * f32::from(source.talents().rank(Talent::ImprovedCleave));
                if let Some(target) = target {
                    source.deal_damage(target, attack * 1.2 * (1.0 + bonus), DamageType::Physical);
                }
            }
            Self::Execute => {
                let bonus = 0.15 * f32::from(source.talents().rank(Talent::ImprovedExecute));
                if let Some(target) = target {
                    let mut raw = attack * 1.5 * (1.0 + bonus);
                    if target.health_fraction() < EXECUTE_THRESHOLD {
                        raw *= 2.0;
                    }
                    source.deal_damage(target, raw, DamageType::Physical);
                }
            }
            Self::MortalStrike => {
                if let Some(target) = target {
                    source.deal_damage(target, attack * 2.0, DamageType::Physical);
                    target.apply_status_effect(StatusEffect::mortal_wound());
                }
            }
            Self::BloodthirstyStrike => {
                if let Some(target) = target {
                    let report = source.deal_damage(target, attack * 1.5, DamageType::Physical);
                    source.heal(report.actual * 0.5);
                }
            }
            Self::ShieldWall => {
                source.apply_status_effect(StatusEffect::shield_wall());
            }
            Self::BattleCry => {
                source.apply_status_effect(StatusEffect::battle_cry());
            }
            Self::RavagingStorm => {
                if let Some(target) = target {
                    source.deal_damage(target, attack * 3.0, DamageType::Physical);
                }
            }
            Self::LastStand => {
                source.apply_status_effect(StatusEffect::last_stand());
            }
        }
    }
}

/// An ability instance owned by a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    kind: AbilityKind,
    cooldown: f32,
    remaining_cooldown: f32,
    cost: f32,
    activation_time: f32,
}

impl Ability {
    /// Create an ability with the kind's default numbers, ready to use.
    #[must_use]
    pub fn new(kind: AbilityKind) -> Self {
        Self {
            kind,
            cooldown: kind.default_cooldown(),
            remaining_cooldown: 0.0,
            cost: kind.default_cost(),
            activation_time: 0.0,
        }
    }

    /// Builder: set resource cost.
    #[must_use]
    pub fn with_cost(mut self, cost: f32) -> Self {
        self.cost = cost.max(0.0);
        self
    }

    /// Builder: set cooldown duration.
    #[must_use]
    pub fn with_cooldown(mut self, cooldown: f32) -> Self {
        self.cooldown = cooldown.max(0.0);
        self.remaining_cooldown = self.remaining_cooldown.min(self.cooldown);
        self
    }

    /// Builder: set activation time.
    #[must_use]
    pub fn with_activation_time(mut self, activation_time: f32) -> Self {
        self.activation_time = activation_time.max(0.0);
        self
    }

    /// Ability kind.
    #[must_use]
    pub fn kind(&self) -> AbilityKind {
        self.kind
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        self.kind.description()
    }

    /// Resource cost.
    #[must_use]
    pub fn cost(&self) -> f32 {
        self.cost
    }

    /// Cooldown duration in seconds.
    #[must_use]
    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Remaining cooldown in seconds.
    #[must_use]
    pub fn remaining_cooldown(&self) -> f32 {
        self.remaining_cooldown
    }

    /// Activation time in seconds.
    #[must_use]
    pub fn activation_time(&self) -> f32 {
        self.activation_time
    }

    /// Check whether this is an ultimate.
    #[must_use]
    pub fn is_ultimate(&self) -> bool {
        self.kind.is_ultimate()
    }

    /// Check whether this is a regular ability.
    #[must_use]
    pub fn is_regular(&self) -> bool {
        !self.kind.is_ultimate()
    }

    /// Check whether the ability is cooling down.
    #[must_use]
    pub fn is_on_cooldown(&self) -> bool {
        self.remaining_cooldown > 0.0
    }

    /// Count the cooldown down by `dt` seconds.
    pub fn tick_cooldown(&mut self, dt: f32) {
        self.remaining_cooldown = (self.remaining_cooldown - dt).max(0.0);
    }

    /// Restart the cooldown at its full duration.
    pub fn start_cooldown(&mut self) {
        self.remaining_cooldown = self.cooldown;
    }
}

impl From<AbilityKind> for Ability {
    fn from(kind: AbilityKind) -> Self {
        Self::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_kind() {
        let cleave = Ability::new(AbilityKind::Cleave);
        assert!((cleave.cost() - 20.0).abs() < f32::EPSILON);
        assert!((cleave.cooldown() - 6.0).abs() < f32::EPSILON);
        assert!(!cleave.is_on_cooldown());
        assert!(cleave.is_regular());

        let storm = Ability::new(AbilityKind::RavagingStorm);
        assert!(storm.is_ultimate());
        assert!(storm.cost().abs() < f32::EPSILON);
    }

    #[test]
    fn test_cooldown_cycle() {
        let mut ability = Ability::new(AbilityKind::MortalStrike);
        ability.start_cooldown();
        assert!((ability.remaining_cooldown() - 10.0).abs() < f32::EPSILON);
        ability.tick_cooldown(4.0);
        assert!((ability.remaining_cooldown() - 6.0).abs() < f32::EPSILON);
        ability.tick_cooldown(100.0);
        assert!(ability.remaining_cooldown().abs() < f32::EPSILON);
        assert!(!ability.is_on_cooldown());
    }

    #[test]
    fn test_builders() {
        let ability = Ability::new(AbilityKind::Cleave)
            .with_cost(30.0)
            .with_cooldown(2.0)
            .with_activation_time(0.5);
        assert!((ability.cost() - 30.0).abs() < f32::EPSILON);
        assert!((ability.cooldown() - 2.0).abs() < f32::EPSILON);
        assert!((ability.activation_time() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_targeting() {
        assert!(AbilityKind::Execute.requires_target());
        assert!(!AbilityKind::ShieldWall.requires_target());
        assert!(!AbilityKind::BattleCry.requires_target());
        assert!(AbilityKind::RavagingStorm.requires_target());
    }
}
