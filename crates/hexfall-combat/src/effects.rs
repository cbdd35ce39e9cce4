//! Timed status effects.
//!
//! This module provides:
//! - The closed set of effect kinds (bleed, stun, wounds, buffs)
//! - Duration countdown and periodic damage ticks
//! - Stack/refresh rules used when the same kind is applied twice
//! - Apply/remove hooks run against the affected character

use serde::{Deserialize, Serialize};
use std::mem;

use crate::character::{Character, CombatState};

/// Interval between periodic damage ticks in seconds.
pub const TICK_INTERVAL: f32 = 1.0;

/// Default Shield Wall duration in seconds.
pub const SHIELD_WALL_DURATION: f32 = 6.0;
/// Default Battle Cry duration in seconds.
pub const BATTLE_CRY_DURATION: f32 = 8.0;
/// Default Last Stand duration in seconds.
pub const LAST_STAND_DURATION: f32 = 5.0;
/// Default Mortal Wound duration in seconds.
pub const MORTAL_WOUND_DURATION: f32 = 10.0;

/// Damage taken while Shield Wall is active.
const SHIELD_WALL_TAKEN: f32 = 0.4;
/// Damage dealt while Battle Cry is active.
const BATTLE_CRY_DEALT: f32 = 1.2;
/// Healing received while Mortal Wound is active.
const MORTAL_WOUND_HEALING: f32 = 0.5;

/// Slack absorbing f32 rounding when summing frame deltas.
const TICK_EPSILON: f32 = 1e-3;

/// Number of whole tick intervals contained in `elapsed` seconds.
fn whole_ticks(elapsed: f32) -> u32 {
    ((elapsed + TICK_EPSILON) / TICK_INTERVAL).floor() as u32
}

/// Kind of status effect, with any per-kind state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Physical damage over time.
    Bleed {
        /// Damage per tick interval.
        damage_per_second: f32,
        /// Active time since the bleed was applied.
        elapsed: f32,
    },
    /// Prevents all actions.
    Stun,
    /// Halves healing received.
    MortalWound,
    /// Reduces damage taken.
    ShieldWall,
    /// Increases damage dealt.
    BattleCry,
    /// No damage taken, no attacks made.
    LastStand,
}

/// A timed effect on a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    name: String,
    description: String,
    duration: f32,
    remaining: f32,
    stackable: bool,
    kind: EffectKind,
}

impl StatusEffect {
    /// Create an effect. Remaining time starts at the full duration.
    #[must_use]
    pub fn new(name: impl Into<String>, duration: f32, stackable: bool, kind: EffectKind) -> Self {
        let duration = duration.max(0.0);
        Self {
            name: name.into(),
            description: String::new(),
            duration,
            remaining: duration,
            stackable,
            kind,
        }
    }

    /// Bleed dealing `damage_per_second` physical damage each second.
    #[must_use]
    pub fn bleed(damage_per_second: f32, duration: f32) -> Self {
        Self::new(
            "Bleed",
            duration,
            true,
            EffectKind::Bleed {
                damage_per_second: damage_per_second.max(0.0),
                elapsed: 0.0,
            },
        )
        .with_description("Taking physical damage every second")
    }

    /// Stun for `duration` seconds.
    #[must_use]
    pub fn stun(duration: f32) -> Self {
        Self::new("Stun", duration, false, EffectKind::Stun)
            .with_description("Unable to act")
    }

    /// Mortal Wound with the default duration.
    #[must_use]
    pub fn mortal_wound() -> Self {
        Self::new("Mortal Wound", MORTAL_WOUND_DURATION, false, EffectKind::MortalWound)
            .with_description("Healing received reduced by 50%")
    }

    /// Shield Wall with the default duration.
    #[must_use]
    pub fn shield_wall() -> Self {
        Self::new("Shield Wall", SHIELD_WALL_DURATION, false, EffectKind::ShieldWall)
            .with_description("Damage taken reduced by 60%")
    }

    /// Battle Cry with the default duration.
    #[must_use]
    pub fn battle_cry() -> Self {
        Self::new("Battle Cry", BATTLE_CRY_DURATION, false, EffectKind::BattleCry)
            .with_description("Damage dealt increased by 20%")
    }

    /// Last Stand with the default duration.
    #[must_use]
    pub fn last_stand() -> Self {
        Self::new("Last Stand", LAST_STAND_DURATION, false, EffectKind::LastStand)
            .with_description("Immune to damage but unable to attack")
    }

    /// Builder: set name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder: set description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder: set duration. Resets the remaining time.
    #[must_use]
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration.max(0.0);
        self.remaining = self.duration;
        self
    }

    /// Effect name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Effect description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Full duration in seconds.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Remaining duration in seconds.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Whether reapplying stacks rather than refreshes.
    #[must_use]
    pub fn is_stackable(&self) -> bool {
        self.stackable
    }

    /// Effect kind.
    #[must_use]
    pub fn kind(&self) -> &EffectKind {
        &self.kind
    }

    /// Check whether the effect has run out.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Check whether both effects are the same kind, ignoring kind state.
    #[must_use]
    pub fn same_kind(&self, other: &Self) -> bool {
        mem::discriminant(&self.kind) == mem::discriminant(&other.kind)
    }

    /// Damage per second for periodic effects.
    #[must_use]
    pub fn damage_per_second(&self) -> f32 {
        match self.kind {
            EffectKind::Bleed {
                damage_per_second, ..
            } => damage_per_second,
            _ => 0.0,
        }
    }

    /// Advance the effect by `dt` seconds.
    ///
    /// Returns periodic damage due this tick. Damage is paid in whole tick
    /// intervals and never for time past expiry.
    pub fn tick(&mut self, dt: f32) -> f32 {
        let active = dt.min(self.remaining.max(0.0));
        self.remaining -= dt;

        match &mut self.kind {
            EffectKind::Bleed {
                damage_per_second,
                elapsed,
            } => {
                // Ticks are counted from total active time so frame rate
                // drift cannot drop the last one
                let before = whole_ticks(*elapsed);
                *elapsed += active;
                let due = whole_ticks(*elapsed).saturating_sub(before);
                due as f32 * *damage_per_second
            }
            _ => 0.0,
        }
    }

    /// Reset remaining time to the incoming effect's duration.
    pub fn refresh(&mut self, incoming: &Self) {
        self.remaining = incoming.duration;
    }

    /// Merge an incoming effect of the same kind into this one.
    ///
    /// Keeps the longer of the remaining and incoming durations; bleeds also
    /// keep the higher damage per second.
    pub fn stack(&mut self, incoming: &Self) {
        self.remaining = self.remaining.max(incoming.duration);
        if let (
            EffectKind::Bleed {
                damage_per_second, ..
            },
            EffectKind::Bleed {
                damage_per_second: incoming_dps,
                ..
            },
        ) = (&mut self.kind, &incoming.kind)
        {
            *damage_per_second = damage_per_second.max(*incoming_dps);
        }
    }

    /// Multiplier on damage taken by the affected character.
    #[must_use]
    pub fn damage_taken_multiplier(&self) -> f32 {
        match self.kind {
            EffectKind::ShieldWall => SHIELD_WALL_TAKEN,
            EffectKind::LastStand => 0.0,
            _ => 1.0,
        }
    }

    /// Multiplier on damage dealt by the affected character.
    #[must_use]
    pub fn damage_dealt_multiplier(&self) -> f32 {
        match self.kind {
            EffectKind::BattleCry => BATTLE_CRY_DEALT,
            _ => 1.0,
        }
    }

    /// Multiplier on healing received by the affected character.
    #[must_use]
    pub fn healing_multiplier(&self) -> f32 {
        match self.kind {
            EffectKind::MortalWound => MORTAL_WOUND_HEALING,
            _ => 1.0,
        }
    }

    /// Whether the effect prevents attacking.
    #[must_use]
    pub fn prevents_attacks(&self) -> bool {
        matches!(self.kind, EffectKind::LastStand | EffectKind::Stun)
    }

    /// Hook run once when the effect is first added.
    pub(crate) fn on_apply(&self, target: &mut Character) {
        if matches!(self.kind, EffectKind::Stun) {
            target.set_combat_state(CombatState::Stunned);
        }
    }

    /// Hook run once when the effect is evicted.
    pub(crate) fn on_remove(&self, target: &mut Character) {
        if matches!(self.kind, EffectKind::Stun) && target.combat_state() == CombatState::Stunned
        {
            target.set_combat_state(CombatState::Idle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_effect_full_remaining() {
        let effect = StatusEffect::stun(2.0);
        assert!((effect.remaining() - 2.0).abs() < f32::EPSILON);
        assert!(!effect.is_expired());
        assert!(!effect.is_stackable());
    }

    #[test]
    fn test_expires_at_zero() {
        let mut effect = StatusEffect::stun(1.0);
        effect.tick(0.5);
        assert!(!effect.is_expired());
        effect.tick(0.5);
        assert!(effect.is_expired());
    }

    #[test]
    fn test_bleed_pays_whole_ticks() {
        let mut bleed = StatusEffect::bleed(4.0, 5.0);
        assert!(bleed.tick(0.5).abs() < f32::EPSILON);
        assert!((bleed.tick(0.5) - 4.0).abs() < f32::EPSILON);
        assert!((bleed.tick(2.0) - 8.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_bleed_total_over_duration() {
        let mut bleed = StatusEffect::bleed(3.0, 5.0);
        let mut total = 0.0;
        for _ in 0..10 {
            total += bleed.tick(1.0);
        }
        assert!((total - 15.0).abs() < f32::EPSILON);
        assert!(bleed.is_expired());
    }

    #[test]
    fn test_bleed_total_independent_of_frame_rate() {
        for fps in [10_u32, 30, 60, 144] {
            let dt = 1.0 / fps as f32;
            let mut bleed = StatusEffect::bleed(10.0, 5.0);
            let mut total = 0.0;
            let mut frames = 0;
            while !bleed.is_expired() && frames < 10 * fps {
                total += bleed.tick(dt);
                frames += 1;
            }
            assert!(bleed.is_expired(), "fps {fps} never expired");
            assert!((total - 50.0).abs() < f32::EPSILON, "fps {fps} dealt {total}");
        }
    }

    #[test]
    fn test_bleed_stack_takes_max() {
        let mut existing = StatusEffect::bleed(10.0, 5.0);
        existing.tick(3.0);
        existing.stack(&StatusEffect::bleed(4.0, 5.0));
        assert!((existing.damage_per_second() - 10.0).abs() < f32::EPSILON);
        assert!((existing.remaining() - 5.0).abs() < f32::EPSILON);

        existing.stack(&StatusEffect::bleed(12.0, 1.0));
        assert!((existing.damage_per_second() - 12.0).abs() < f32::EPSILON);
        assert!((existing.remaining() - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_refresh_resets_to_incoming_duration() {
        let mut existing = StatusEffect::stun(4.0);
        existing.tick(3.0);
        existing.refresh(&StatusEffect::stun(2.0));
        assert!((existing.remaining() - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_same_kind_ignores_state() {
        let a = StatusEffect::bleed(1.0, 5.0);
        let b = StatusEffect::bleed(9.0, 2.0).with_name("Warrior's Bleed");
        assert!(a.same_kind(&b));
        assert!(!a.same_kind(&StatusEffect::stun(1.0)));
    }

    #[test]
    fn test_multipliers() {
        assert!((StatusEffect::shield_wall().damage_taken_multiplier() - 0.4).abs() < 1e-6);
        assert!(StatusEffect::last_stand().damage_taken_multiplier().abs() < 1e-6);
        assert!((StatusEffect::battle_cry().damage_dealt_multiplier() - 1.2).abs() < 1e-6);
        assert!((StatusEffect::mortal_wound().healing_multiplier() - 0.5).abs() < 1e-6);
        assert!(StatusEffect::last_stand().prevents_attacks());
        assert!(!StatusEffect::battle_cry().prevents_attacks());
    }
}
