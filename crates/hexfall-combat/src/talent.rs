//! Talents and talent trees.
//!
//! This module provides:
//! - A static registry of talent definitions (name, description, max rank)
//! - Per-talent stat modifier hooks and ability grants
//! - Per-character talent ranks
//! - The tiered talent tree with prerequisite eligibility

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::ability::AbilityKind;
use crate::class::Specialization;
use crate::error::TalentTreeError;
use crate::stats::{DerivedStats, StatType};

/// Number of tiers in a talent tree.
pub const TIER_COUNT: usize = 5;

// ============================================================================
// Registry
// ============================================================================

/// Static data describing one talent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TalentDef {
    /// Display name.
    pub name: &'static str,
    /// Description shown to the player.
    pub description: &'static str,
    /// Highest rank the talent can reach.
    pub max_rank: u8,
}

const fn def(name: &'static str, description: &'static str, max_rank: u8) -> TalentDef {
    TalentDef {
        name,
        description,
        max_rank,
    }
}

/// Indexed by `Talent as usize`.
static REGISTRY: [TalentDef; 15] = [
    def("Improved Strength", "Increases Strength by 3 per rank.", 3),
    def("Tactical Mastery", "Increases critical strike chance by 2% per rank.", 3),
    def("Improved Charge", "Increases movement range by 1 per rank.", 2),
    def("Anger Management", "Reduces rage decay by 20% per rank.", 2),
    def("Deep Wounds", "Increases bleed damage by 15% per rank.", 3),
    def("Improved Cleave", "Increases Cleave damage by 10% per rank.", 3),
    def("Bloodthirsty Strike", "Grants the Bloodthirsty Strike ability.", 1),
    def("Defensive Mastery", "Increases armor by 10% per rank.", 3),
    def("Improved Execute", "Increases Execute damage by 15% per rank.", 3),
    def("Mortal Strike", "Grants the Mortal Strike ability.", 1),
    def(
        "Second Wind",
        "Once per life, falling below 30% health restores 10% max health per rank.",
        2,
    ),
    def("Shield Wall", "Grants the Shield Wall ability.", 1),
    def("Battle Cry", "Sets Battle Cry as the ultimate ability.", 1),
    def("Ravaging Storm", "Sets Ravaging Storm as the ultimate ability.", 1),
    def("Last Stand", "Sets Last Stand as the ultimate ability.", 1),
];

/// Identifier of a talent in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Talent {
    /// +3 Strength per rank.
    ImprovedStrength,
    /// +2% crit chance per rank.
    TacticalMastery,
    /// +1 movement range per rank.
    ImprovedCharge,
    /// -20% rage decay per rank.
    AngerManagement,
    /// +15% bleed damage per rank.
    DeepWounds,
    /// +10% Cleave damage per rank.
    ImprovedCleave,
    /// Grants Bloodthirsty Strike.
    BloodthirstyStrike,
    /// +10% armor per rank.
    DefensiveMastery,
    /// +15% Execute damage per rank.
    ImprovedExecute,
    /// Grants Mortal Strike.
    MortalStrike,
    /// Emergency heal once per life.
    SecondWind,
    /// Grants Shield Wall.
    ShieldWall,
    /// Ultimate: Battle Cry.
    BattleCry,
    /// Ultimate: Ravaging Storm.
    RavagingStorm,
    /// Ultimate: Last Stand.
    LastStand,
}

impl Talent {
    /// Registry entry for this talent.
    #[must_use]
    pub fn def(self) -> &'static TalentDef {
        &REGISTRY[self as usize]
    }

    /// Display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.def().name
    }

    /// Description.
    #[must_use]
    pub fn description(self) -> &'static str {
        self.def().description
    }

    /// Highest rank.
    #[must_use]
    pub fn max_rank(self) -> u8 {
        self.def().max_rank
    }

    /// Attribute added on top of base stats at `rank`.
    #[must_use]
    pub fn attribute_bonus(self, rank: u8) -> Option<(StatType, i32)> {
        match self {
            Self::ImprovedStrength if rank > 0 => Some((StatType::Strength, 3 * i32::from(rank))),
            _ => None,
        }
    }

    /// Adjust freshly derived stats for this talent at `rank`.
    pub fn apply_modifiers(self, rank: u8, derived: &mut DerivedStats, spec: &mut Specialization) {
        if rank == 0 {
            return;
        }
        let r = f32::from(rank);
        match self {
            Self::TacticalMastery => derived.crit_chance += 0.02 * r,
            Self::ImprovedCharge => derived.movement_range += i32::from(rank),
            Self::DefensiveMastery => derived.armor *= 1.0 + 0.1 * r,
            Self::AngerManagement => {
                if let Some(warrior) = spec.as_warrior_mut() {
                    warrior.rage_decay_rate *= (1.0 - 0.2 * r).max(0.0);
                }
            }
            Self::DeepWounds => {
                if let Some(warrior) = spec.as_warrior_mut() {
                    warrior.bleed_damage_multiplier *= 1.0 + 0.15 * r;
                }
            }
            _ => {}
        }
    }

    /// Ability granted when the talent is first unlocked.
    #[must_use]
    pub fn granted_ability(self) -> Option<AbilityKind> {
        match self {
            Self::BloodthirstyStrike => Some(AbilityKind::BloodthirstyStrike),
            Self::MortalStrike => Some(AbilityKind::MortalStrike),
            Self::ShieldWall => Some(AbilityKind::ShieldWall),
            Self::BattleCry => Some(AbilityKind::BattleCry),
            Self::RavagingStorm => Some(AbilityKind::RavagingStorm),
            Self::LastStand => Some(AbilityKind::LastStand),
            _ => None,
        }
    }
}

// ============================================================================
// Ranks
// ============================================================================

/// Talent ranks held by one character. Absent means rank 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TalentRanks {
    ranks: AHashMap<Talent, u8>,
}

impl TalentRanks {
    /// Create empty ranks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current rank of a talent.
    #[must_use]
    pub fn rank(&self, talent: Talent) -> u8 {
        self.ranks.get(&talent).copied().unwrap_or(0)
    }

    /// Check whether a talent has at least one rank.
    #[must_use]
    pub fn is_unlocked(&self, talent: Talent) -> bool {
        self.rank(talent) > 0
    }

    /// Raise a talent by one rank, returns the new rank.
    pub(crate) fn increment(&mut self, talent: Talent) -> u8 {
        let rank = self.ranks.entry(talent).or_insert(0);
        *rank = rank.saturating_add(1);
        *rank
    }

    /// Total ranks spent.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.ranks.values().map(|&r| u32::from(r)).sum()
    }

    /// Number of talents with a rank.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Check whether no talent has a rank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

// ============================================================================
// Tree
// ============================================================================

/// Five ordered tiers of talents.
///
/// Built once per class. Holds structure only; ranks live in [`TalentRanks`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalentTree {
    tiers: [Vec<Talent>; TIER_COUNT],
}

impl TalentTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a talent in tier `tier` (1-based).
    pub fn add_talent(&mut self, talent: Talent, tier: usize) -> Result<(), TalentTreeError> {
        if !(1..=TIER_COUNT).contains(&tier) {
            return Err(TalentTreeError::InvalidTier(tier));
        }
        if self.contains(talent) {
            return Err(TalentTreeError::Duplicate(talent));
        }
        self.tiers[tier - 1].push(talent);
        Ok(())
    }

    /// Builder: place a talent, ignoring invalid placements.
    #[must_use]
    pub fn with_talent(mut self, talent: Talent, tier: usize) -> Self {
        if let Err(err) = self.add_talent(talent, tier) {
            tracing::warn!("Skipping talent {:?}: {}", talent, err);
        }
        self
    }

    /// Talents in tier `tier` (1-based). Empty for invalid tiers.
    #[must_use]
    pub fn tier(&self, tier: usize) -> &[Talent] {
        tier.checked_sub(1)
            .and_then(|i| self.tiers.get(i))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Tier (1-based) holding a talent.
    #[must_use]
    pub fn tier_of(&self, talent: Talent) -> Option<usize> {
        self.tiers
            .iter()
            .position(|tier| tier.contains(&talent))
            .map(|i| i + 1)
    }

    /// Check whether the tree holds a talent.
    #[must_use]
    pub fn contains(&self, talent: Talent) -> bool {
        self.tier_of(talent).is_some()
    }

    /// Check whether a talent may be unlocked given current ranks.
    ///
    /// Tier 1 is always eligible. Tier N requires at least one unlocked
    /// talent in tier N-1. Talents outside the tree are never eligible.
    #[must_use]
    pub fn is_eligible(&self, talent: Talent, ranks: &TalentRanks) -> bool {
        match self.tier_of(talent) {
            None => false,
            Some(1) => true,
            Some(tier) => self
                .tier(tier - 1)
                .iter()
                .any(|&prereq| ranks.is_unlocked(prereq)),
        }
    }

    /// All talents, tier ascending then insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Talent> + '_ {
        self.tiers.iter().flatten().copied()
    }

    /// Number of talents in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.iter().map(Vec::len).sum()
    }

    /// Check whether the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warrior::Warrior;

    fn small_tree() -> TalentTree {
        TalentTree::new()
            .with_talent(Talent::ImprovedStrength, 1)
            .with_talent(Talent::TacticalMastery, 1)
            .with_talent(Talent::DeepWounds, 2)
            .with_talent(Talent::MortalStrike, 3)
    }

    #[test]
    fn test_registry_lookup() {
        assert_eq!(Talent::ImprovedStrength.name(), "Improved Strength");
        assert_eq!(Talent::ImprovedStrength.max_rank(), 3);
        assert_eq!(Talent::LastStand.name(), "Last Stand");
        assert_eq!(Talent::LastStand.max_rank(), 1);
        assert_eq!(Talent::SecondWind.max_rank(), 2);
    }

    #[test]
    fn test_add_talent_rejects_bad_tier() {
        let mut tree = TalentTree::new();
        assert_eq!(
            tree.add_talent(Talent::BattleCry, 0),
            Err(TalentTreeError::InvalidTier(0))
        );
        assert_eq!(
            tree.add_talent(Talent::BattleCry, 6),
            Err(TalentTreeError::InvalidTier(6))
        );
        assert!(tree.is_empty());
    }

    #[test]
    fn test_add_talent_rejects_duplicate() {
        let mut tree = small_tree();
        assert_eq!(
            tree.add_talent(Talent::DeepWounds, 4),
            Err(TalentTreeError::Duplicate(Talent::DeepWounds))
        );
        assert_eq!(tree.tier_of(Talent::DeepWounds), Some(2));
    }

    #[test]
    fn test_tier_one_always_eligible() {
        let tree = small_tree();
        let ranks = TalentRanks::new();
        assert!(tree.is_eligible(Talent::ImprovedStrength, &ranks));
        assert!(tree.is_eligible(Talent::TacticalMastery, &ranks));
    }

    #[test]
    fn test_tier_requires_previous() {
        let tree = small_tree();
        let mut ranks = TalentRanks::new();
        assert!(!tree.is_eligible(Talent::DeepWounds, &ranks));
        assert!(!tree.is_eligible(Talent::MortalStrike, &ranks));

        ranks.increment(Talent::TacticalMastery);
        assert!(tree.is_eligible(Talent::DeepWounds, &ranks));
        assert!(!tree.is_eligible(Talent::MortalStrike, &ranks));

        ranks.increment(Talent::DeepWounds);
        assert!(tree.is_eligible(Talent::MortalStrike, &ranks));
    }

    #[test]
    fn test_talent_outside_tree_ineligible() {
        let tree = small_tree();
        let mut ranks = TalentRanks::new();
        ranks.increment(Talent::ImprovedStrength);
        assert!(!tree.is_eligible(Talent::LastStand, &ranks));
    }

    #[test]
    fn test_iter_order() {
        let tree = TalentTree::new()
            .with_talent(Talent::DeepWounds, 2)
            .with_talent(Talent::TacticalMastery, 1)
            .with_talent(Talent::ImprovedStrength, 1);
        let order: Vec<_> = tree.iter().collect();
        assert_eq!(
            order,
            vec![
                Talent::TacticalMastery,
                Talent::ImprovedStrength,
                Talent::DeepWounds
            ]
        );
        assert!(tree.tier(0).is_empty());
        assert!(tree.tier(9).is_empty());
    }

    #[test]
    fn test_ranks() {
        let mut ranks = TalentRanks::new();
        assert_eq!(ranks.rank(Talent::DeepWounds), 0);
        assert_eq!(ranks.increment(Talent::DeepWounds), 1);
        assert_eq!(ranks.increment(Talent::DeepWounds), 2);
        ranks.increment(Talent::ShieldWall);
        assert_eq!(ranks.total(), 3);
        assert_eq!(ranks.len(), 2);
    }

    #[test]
    fn test_modifiers() {
        let mut derived = DerivedStats::from_base(&crate::stats::BaseStats::default());
        let mut spec = Specialization::Warrior(Warrior::default());
        let crit = derived.crit_chance;
        let armor = derived.armor;

        Talent::TacticalMastery.apply_modifiers(2, &mut derived, &mut spec);
        Talent::ImprovedCharge.apply_modifiers(1, &mut derived, &mut spec);
        Talent::DeepWounds.apply_modifiers(0, &mut derived, &mut spec);
        assert!((derived.crit_chance - (crit + 0.04)).abs() < 1e-6);
        assert_eq!(derived.movement_range, 4);
        assert!((derived.armor - armor).abs() < 1e-6);

        Talent::AngerManagement.apply_modifiers(2, &mut derived, &mut spec);
        let warrior = spec.as_warrior().copied().unwrap_or_default();
        assert!((warrior.rage_decay_rate - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_attribute_bonus() {
        assert_eq!(
            Talent::ImprovedStrength.attribute_bonus(2),
            Some((StatType::Strength, 6))
        );
        assert_eq!(Talent::ImprovedStrength.attribute_bonus(0), None);
        assert_eq!(Talent::DeepWounds.attribute_bonus(3), None);
    }

    #[test]
    fn test_granted_abilities() {
        assert_eq!(
            Talent::MortalStrike.granted_ability(),
            Some(AbilityKind::MortalStrike)
        );
        assert!(Talent::LastStand
            .granted_ability()
            .is_some_and(AbilityKind::is_ultimate));
        assert_eq!(Talent::ImprovedCleave.granted_ability(), None);
    }
}
