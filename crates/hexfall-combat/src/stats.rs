//! Character stats.
//!
//! This module provides:
//! - Base attributes (stamina, intelligence, agility, strength, wisdom)
//! - Derived combat stats computed from the attributes
//! - The stat block owned by a character, with clamped health and resource pools

use serde::{Deserialize, Serialize};

// ============================================================================
// Base Attributes
// ============================================================================

/// The five base attributes of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatType {
    /// Health, health regeneration, attack damage, armor.
    Stamina,
    /// Resource pool, magic damage, cast speed, magic resistance.
    Intelligence,
    /// Attack/cast speed, crit chance, dodge, accuracy, movement.
    Agility,
    /// Crit multiplier, armor.
    Strength,
    /// Resource pool, resource regeneration, magic resistance.
    Wisdom,
}

impl StatType {
    /// Get display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Stamina => "Stamina",
            Self::Intelligence => "Intelligence",
            Self::Agility => "Agility",
            Self::Strength => "Strength",
            Self::Wisdom => "Wisdom",
        }
    }

    /// Get all stat types.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Stamina,
            Self::Intelligence,
            Self::Agility,
            Self::Strength,
            Self::Wisdom,
        ]
    }
}

/// Base attribute values. Never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseStats {
    /// Stamina points.
    pub stamina: i32,
    /// Intelligence points.
    pub intelligence: i32,
    /// Agility points.
    pub agility: i32,
    /// Strength points.
    pub strength: i32,
    /// Wisdom points.
    pub wisdom: i32,
}

impl BaseStats {
    /// Create base stats from explicit values.
    #[must_use]
    pub const fn new(
        stamina: i32,
        intelligence: i32,
        agility: i32,
        strength: i32,
        wisdom: i32,
    ) -> Self {
        Self {
            stamina,
            intelligence,
            agility,
            strength,
            wisdom,
        }
    }

    /// Get the value of one attribute.
    #[must_use]
    pub fn get(&self, stat: StatType) -> i32 {
        match stat {
            StatType::Stamina => self.stamina,
            StatType::Intelligence => self.intelligence,
            StatType::Agility => self.agility,
            StatType::Strength => self.strength,
            StatType::Wisdom => self.wisdom,
        }
    }

    /// Add to one attribute, saturating at zero.
    pub fn add(&mut self, stat: StatType, amount: i32) {
        let slot = match stat {
            StatType::Stamina => &mut self.stamina,
            StatType::Intelligence => &mut self.intelligence,
            StatType::Agility => &mut self.agility,
            StatType::Strength => &mut self.strength,
            StatType::Wisdom => &mut self.wisdom,
        };
        *slot = slot.saturating_add(amount).max(0);
    }
}

// ============================================================================
// Derived Stats
// ============================================================================

/// Combat stats derived from base attributes.
///
/// Never set directly during play: rebuilt by [`DerivedStats::from_base`] and
/// then adjusted by talent modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    /// Maximum health points.
    pub max_health: f32,
    /// Maximum resource points.
    pub max_resource: f32,
    /// Health regenerated per second.
    pub health_regen: f32,
    /// Resource regenerated per second.
    pub resource_regen: f32,
    /// Physical attack damage.
    pub attack_damage: f32,
    /// Magic damage.
    pub magic_damage: f32,
    /// Attack speed multiplier.
    pub attack_speed: f32,
    /// Cast speed multiplier.
    pub cast_speed: f32,
    /// Critical strike chance (0.0-1.0).
    pub crit_chance: f32,
    /// Critical strike damage multiplier.
    pub crit_multiplier: f32,
    /// Armor (physical mitigation).
    pub armor: f32,
    /// Magic resistance (magical mitigation).
    pub magic_resistance: f32,
    /// Dodge chance.
    pub dodge: f32,
    /// Hit accuracy.
    pub accuracy: f32,
    /// Grid cells the character may cover in one move.
    pub movement_range: i32,
}

impl DerivedStats {
    /// Compute derived stats from attributes.
    ///
    /// Attack damage scales with stamina, not strength.
    #[must_use]
    pub fn from_base(base: &BaseStats) -> Self {
        let stamina = base.stamina as f32;
        let intelligence = base.intelligence as f32;
        let agility = base.agility as f32;
        let strength = base.strength as f32;
        let wisdom = base.wisdom as f32;

        Self {
            max_health: 100.0 + stamina * 10.0,
            max_resource: 100.0 + intelligence * 5.0 + wisdom * 5.0,
            health_regen: stamina * 0.5,
            resource_regen: wisdom * 0.5,
            attack_damage: 10.0 + stamina * 2.0,
            magic_damage: 10.0 + intelligence * 2.0,
            attack_speed: 1.0 + agility * 0.05,
            cast_speed: 1.0 + intelligence * 0.03 + agility * 0.02,
            crit_chance: 0.05 + agility * 0.01,
            crit_multiplier: 1.5 + strength * 0.02,
            armor: strength + stamina * 0.5,
            magic_resistance: intelligence * 0.5 + wisdom,
            dodge: agility * 0.01,
            accuracy: 0.9 + agility * 0.005,
            movement_range: 3 + (agility * 0.1).floor() as i32,
        }
    }
}

// ============================================================================
// Stat Block
// ============================================================================

/// Stats owned by a single character.
///
/// Holds base attributes, the effective attributes after talent bonuses, the
/// derived stats, and the current health and resource pools. Pools are
/// always within `[0, max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    base: BaseStats,
    effective: BaseStats,
    derived: DerivedStats,
    health: f32,
    resource: f32,
}

impl StatBlock {
    /// Create a stat block with full pools.
    #[must_use]
    pub fn new(base: BaseStats) -> Self {
        let derived = DerivedStats::from_base(&base);
        Self {
            base,
            effective: base,
            health: derived.max_health,
            resource: derived.max_resource,
            derived,
        }
    }

    /// Base attributes.
    #[must_use]
    pub fn base(&self) -> &BaseStats {
        &self.base
    }

    /// Attributes after talent bonuses.
    #[must_use]
    pub fn effective(&self) -> &BaseStats {
        &self.effective
    }

    /// Derived combat stats.
    #[must_use]
    pub fn derived(&self) -> &DerivedStats {
        &self.derived
    }

    /// Current health.
    #[must_use]
    pub fn health(&self) -> f32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub fn max_health(&self) -> f32 {
        self.derived.max_health
    }

    /// Current resource.
    #[must_use]
    pub fn resource(&self) -> f32 {
        self.resource
    }

    /// Maximum resource.
    #[must_use]
    pub fn max_resource(&self) -> f32 {
        self.derived.max_resource
    }

    /// Get health percentage (0.0-1.0).
    #[must_use]
    pub fn health_percent(&self) -> f32 {
        if self.derived.max_health <= 0.0 {
            0.0
        } else {
            (self.health / self.derived.max_health).clamp(0.0, 1.0)
        }
    }

    /// Get resource percentage (0.0-1.0).
    #[must_use]
    pub fn resource_percent(&self) -> f32 {
        if self.derived.max_resource <= 0.0 {
            0.0
        } else {
            (self.resource / self.derived.max_resource).clamp(0.0, 1.0)
        }
    }

    /// Add to a base attribute. Derived stats are stale until the next
    /// recompute.
    pub(crate) fn add_base(&mut self, stat: StatType, amount: i32) {
        self.base.add(stat, amount);
    }

    /// Recompute with no talent bonuses.
    pub fn recompute(&mut self) {
        self.recompute_with(&[], |_, _| {});
    }

    /// Recompute derived stats.
    ///
    /// `attribute_bonuses` are added on top of the base attributes, the
    /// derived stats are rebuilt from the result, and `modify` then adjusts
    /// them. Pools are clamped, never refilled.
    pub fn recompute_with<F>(&mut self, attribute_bonuses: &[(StatType, i32)], modify: F)
    where
        F: FnOnce(&BaseStats, &mut DerivedStats),
    {
        let mut effective = self.base;
        for &(stat, amount) in attribute_bonuses {
            effective.add(stat, amount);
        }

        let mut derived = DerivedStats::from_base(&effective);
        modify(&effective, &mut derived);
        derived.max_health = derived.max_health.max(0.0);
        derived.max_resource = derived.max_resource.max(0.0);

        self.effective = effective;
        self.derived = derived;
        self.clamp_pools();
    }

    /// Set both pools to their maximum.
    pub(crate) fn fill_pools(&mut self) {
        self.health = self.derived.max_health;
        self.resource = self.derived.max_resource;
    }

    fn clamp_pools(&mut self) {
        self.health = self.health.clamp(0.0, self.derived.max_health);
        self.resource = self.resource.clamp(0.0, self.derived.max_resource);
    }

    /// Regenerate both pools over `dt` seconds.
    pub(crate) fn regenerate(&mut self, dt: f32) {
        self.health = (self.health + self.derived.health_regen * dt).min(self.derived.max_health);
        self.resource =
            (self.resource + self.derived.resource_regen * dt).min(self.derived.max_resource);
    }

    /// Remove health, returns the health actually lost.
    pub(crate) fn lose_health(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health - amount).max(0.0);
        before - self.health
    }

    /// Add health, returns the health actually gained.
    pub(crate) fn gain_health(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health + amount).min(self.derived.max_health);
        self.health - before
    }

    /// Add resource up to the maximum.
    pub(crate) fn gain_resource(&mut self, amount: f32) {
        self.resource = (self.resource + amount).min(self.derived.max_resource);
    }

    /// Remove resource down to zero.
    pub(crate) fn lose_resource(&mut self, amount: f32) {
        self.resource = (self.resource - amount).max(0.0);
    }

    /// Check if has enough resource.
    #[must_use]
    pub fn has_resource(&self, amount: f32) -> bool {
        self.resource >= amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_derived_formulas() {
        let base = BaseStats::new(9, 3, 6, 10, 4);
        let d = DerivedStats::from_base(&base);

        assert!(approx(d.max_health, 190.0));
        assert!(approx(d.max_resource, 135.0));
        assert!(approx(d.health_regen, 4.5));
        assert!(approx(d.resource_regen, 2.0));
        assert!(approx(d.attack_damage, 28.0));
        assert!(approx(d.magic_damage, 16.0));
        assert!(approx(d.attack_speed, 1.3));
        assert!(approx(d.cast_speed, 1.21));
        assert!(approx(d.crit_chance, 0.11));
        assert!(approx(d.crit_multiplier, 1.7));
        assert!(approx(d.armor, 14.5));
        assert!(approx(d.magic_resistance, 5.5));
        assert!(approx(d.dodge, 0.06));
        assert!(approx(d.accuracy, 0.93));
        assert_eq!(d.movement_range, 3);
    }

    #[test]
    fn test_movement_range_floors() {
        let d = DerivedStats::from_base(&BaseStats::new(0, 0, 19, 0, 0));
        assert_eq!(d.movement_range, 4);
        let d = DerivedStats::from_base(&BaseStats::new(0, 0, 20, 0, 0));
        assert_eq!(d.movement_range, 5);
    }

    #[test]
    fn test_attack_damage_uses_stamina() {
        let strong = DerivedStats::from_base(&BaseStats::new(0, 0, 0, 50, 0));
        let sturdy = DerivedStats::from_base(&BaseStats::new(5, 0, 0, 0, 0));
        assert!(approx(strong.attack_damage, 10.0));
        assert!(approx(sturdy.attack_damage, 20.0));
    }

    #[test]
    fn test_base_add_saturates_at_zero() {
        let mut base = BaseStats::new(3, 0, 0, 0, 0);
        base.add(StatType::Stamina, -10);
        assert_eq!(base.stamina, 0);
        base.add(StatType::Wisdom, 4);
        assert_eq!(base.get(StatType::Wisdom), 4);
    }

    #[test]
    fn test_new_block_has_full_pools() {
        let block = StatBlock::new(BaseStats::new(9, 3, 6, 10, 4));
        assert!(approx(block.health(), 190.0));
        assert!(approx(block.resource(), 135.0));
        assert!(approx(block.health_percent(), 1.0));
    }

    #[test]
    fn test_recompute_clamps_without_refilling() {
        let mut block = StatBlock::new(BaseStats::new(10, 0, 0, 0, 0));
        block.lose_health(50.0);
        assert!(approx(block.health(), 150.0));

        // Raising max health does not heal.
        block.add_base(StatType::Stamina, 5);
        block.recompute();
        assert!(approx(block.max_health(), 250.0));
        assert!(approx(block.health(), 150.0));

        // Lowering max health below current clamps.
        block.add_base(StatType::Stamina, -15);
        block.recompute();
        assert!(approx(block.max_health(), 100.0));
        assert!(approx(block.health(), 100.0));
    }

    #[test]
    fn test_recompute_with_bonuses_and_modifier() {
        let mut block = StatBlock::new(BaseStats::new(0, 0, 0, 10, 0));
        block.recompute_with(&[(StatType::Strength, 3)], |effective, derived| {
            assert_eq!(effective.strength, 13);
            derived.armor *= 2.0;
        });
        assert_eq!(block.base().strength, 10);
        assert_eq!(block.effective().strength, 13);
        assert!(approx(block.derived().armor, 26.0));
    }

    #[test]
    fn test_regenerate_caps_at_max() {
        let mut block = StatBlock::new(BaseStats::new(10, 0, 0, 0, 10));
        block.lose_health(3.0);
        block.lose_resource(1.0);
        block.regenerate(10.0);
        assert!(approx(block.health(), block.max_health()));
        assert!(approx(block.resource(), block.max_resource()));
    }

    #[test]
    fn test_pool_changes_report_actual_amounts() {
        let mut block = StatBlock::new(BaseStats::default());
        assert!(approx(block.lose_health(130.0), 100.0));
        assert!(approx(block.health(), 0.0));
        assert!(approx(block.gain_health(500.0), 100.0));
        block.lose_resource(30.0);
        assert!(block.has_resource(70.0));
        assert!(!block.has_resource(70.5));
        block.gain_resource(1000.0);
        assert!(approx(block.resource(), 100.0));
    }

    fn base_strategy() -> impl Strategy<Value = BaseStats> {
        (0i32..200, 0i32..200, 0i32..200, 0i32..200, 0i32..200)
            .prop_map(|(sta, int, agi, stre, wis)| BaseStats::new(sta, int, agi, stre, wis))
    }

    proptest! {
        #[test]
        fn prop_recompute_is_idempotent(base in base_strategy()) {
            let mut block = StatBlock::new(base);
            block.recompute();
            let first = block.clone();
            block.recompute();
            prop_assert_eq!(first, block);
        }

        #[test]
        fn prop_pools_stay_in_bounds(
            base in base_strategy(),
            ops in proptest::collection::vec((0u8..4, 0.0f32..500.0), 0..40),
        ) {
            let mut block = StatBlock::new(base);
            for (op, amount) in ops {
                match op {
                    0 => { block.lose_health(amount); }
                    1 => { block.gain_health(amount); }
                    2 => block.regenerate(amount / 10.0),
                    _ => block.lose_resource(amount),
                }
                prop_assert!(block.health() >= 0.0);
                prop_assert!(block.health() <= block.max_health());
                prop_assert!(block.resource() >= 0.0);
                prop_assert!(block.resource() <= block.max_resource());
            }
        }
    }
}
