//! Damage types and mitigation.

use serde::{Deserialize, Serialize};

use crate::stats::DerivedStats;

/// Type of damage, deciding which defense mitigates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    /// Mitigated by armor.
    Physical,
    /// Mitigated by magic resistance.
    Magical,
    /// Never mitigated.
    True,
}

impl DamageType {
    /// Fraction of incoming damage removed by the defender's stats.
    ///
    /// `defense / (defense + 100)` for the matching defense, `0` for true
    /// damage. Negative defense counts as zero.
    #[must_use]
    pub fn mitigation(self, defender: &DerivedStats) -> f32 {
        let defense = match self {
            Self::Physical => defender.armor,
            Self::Magical => defender.magic_resistance,
            Self::True => return 0.0,
        };
        let defense = defense.max(0.0);
        defense / (defense + 100.0)
    }
}

/// Outcome of one damage event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageReport {
    /// Damage before mitigation (after input clamping).
    pub raw: f32,
    /// Damage type.
    pub damage_type: DamageType,
    /// Mitigation fraction applied.
    pub mitigation: f32,
    /// Health actually removed.
    pub actual: f32,
    /// Whether this damage killed the target.
    pub killed: bool,
}

impl DamageReport {
    /// Report for damage that had no effect.
    #[must_use]
    pub const fn ignored(raw: f32, damage_type: DamageType) -> Self {
        Self {
            raw,
            damage_type,
            mitigation: 0.0,
            actual: 0.0,
            killed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::BaseStats;
    use proptest::prelude::*;

    fn defender(armor: f32, magic_resistance: f32) -> DerivedStats {
        let mut stats = DerivedStats::from_base(&BaseStats::default());
        stats.armor = armor;
        stats.magic_resistance = magic_resistance;
        stats
    }

    #[test]
    fn test_physical_mitigation() {
        let d = defender(100.0, 0.0);
        assert!((DamageType::Physical.mitigation(&d) - 0.5).abs() < 1e-6);
        assert!(DamageType::Magical.mitigation(&d).abs() < 1e-6);
    }

    #[test]
    fn test_true_damage_ignores_defense() {
        let d = defender(500.0, 500.0);
        assert!(DamageType::True.mitigation(&d).abs() < f32::EPSILON);
    }

    #[test]
    fn test_negative_defense_is_zero() {
        let d = defender(-40.0, -10.0);
        assert!(DamageType::Physical.mitigation(&d).abs() < f32::EPSILON);
        assert!(DamageType::Magical.mitigation(&d).abs() < f32::EPSILON);
    }

    proptest! {
        #[test]
        fn prop_mitigated_damage_formula(raw in 0.0f32..10_000.0, defense in 0.0f32..5_000.0) {
            let d = defender(defense, defense);
            for ty in [DamageType::Physical, DamageType::Magical] {
                let actual = raw * (1.0 - ty.mitigation(&d));
                let expected = raw * 100.0 / (100.0 + defense);
                prop_assert!((actual - expected).abs() <= expected.max(1.0) * 1e-4);
            }
        }
    }
}
