//! Character classes and the class capability interface.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::ability::AbilityKind;
use crate::battlefield::Battlefield;
use crate::character::Character;
use crate::stats::BaseStats;
use crate::talent::TalentTree;
use crate::warrior::Warrior;

/// RGBA color used to draw a class.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Tint {
    /// Red channel (0.0-1.0)
    pub r: f32,
    /// Green channel (0.0-1.0)
    pub g: f32,
    /// Blue channel (0.0-1.0)
    pub b: f32,
    /// Alpha channel (0.0-1.0)
    pub a: f32,
}

impl Tint {
    /// Creates a new tint.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Channels as an array.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Class tag of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    /// Melee fighter using Rage.
    Warrior,
    /// Caster.
    Mage,
    /// Shapeshifter.
    Druid,
    /// Holy knight.
    Paladin,
    /// Stealth melee.
    Rogue,
    /// Shadow caster.
    Warlock,
    /// Martial artist.
    Monk,
    /// Elemental caster.
    Shaman,
}

impl CharacterClass {
    /// Get all classes.
    #[must_use]
    pub const fn all() -> [Self; 8] {
        [
            Self::Warrior,
            Self::Mage,
            Self::Druid,
            Self::Paladin,
            Self::Rogue,
            Self::Warlock,
            Self::Monk,
            Self::Shaman,
        ]
    }

    /// Get display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Warrior => "Warrior",
            Self::Mage => "Mage",
            Self::Druid => "Druid",
            Self::Paladin => "Paladin",
            Self::Rogue => "Rogue",
            Self::Warlock => "Warlock",
            Self::Monk => "Monk",
            Self::Shaman => "Shaman",
        }
    }

    /// Color used when drawing characters of this class.
    #[must_use]
    pub const fn tint(self) -> Tint {
        match self {
            Self::Warrior => Tint::new(0.8, 0.2, 0.2, 1.0),
            Self::Mage => Tint::new(0.2, 0.2, 0.8, 1.0),
            Self::Druid => Tint::new(0.2, 0.8, 0.2, 1.0),
            Self::Paladin => Tint::new(0.8, 0.8, 0.2, 1.0),
            Self::Rogue => Tint::new(0.5, 0.5, 0.5, 1.0),
            Self::Warlock => Tint::new(0.5, 0.2, 0.5, 1.0),
            Self::Monk => Tint::new(0.8, 0.4, 0.0, 1.0),
            Self::Shaman => Tint::new(0.0, 0.8, 0.8, 1.0),
        }
    }

    /// Parse a class name, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|class| class.display_name().eq_ignore_ascii_case(name))
    }
}

/// Capabilities a playable class provides to its characters.
pub trait ClassKit {
    /// Class tag.
    fn class(&self) -> CharacterClass;

    /// Name of the class resource.
    fn resource_name(&self) -> &'static str;

    /// Base attributes of a new character.
    fn initialize_base_stats(&self) -> BaseStats;

    /// Talent tree of the class.
    fn create_talent_tree(&self) -> TalentTree;

    /// Regular abilities a new character knows.
    fn starting_abilities(&self) -> Vec<AbilityKind>;

    /// Recompute class-specific stats from effective attributes.
    fn derive_class_stats(&mut self, effective: &BaseStats);

    /// Choose and perform this tick's action.
    fn decide_next_action<B: Battlefield + ?Sized>(&self, me: &mut Character, battlefield: &mut B);

    /// Class bookkeeping after the decision.
    fn after_update(&self, me: &mut Character, dt: f32);
}

/// Class-specific state of a character.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Specialization {
    /// Warrior state.
    Warrior(Warrior),
}

impl Specialization {
    /// Warrior state, if a warrior.
    #[must_use]
    pub fn as_warrior(&self) -> Option<&Warrior> {
        match self {
            Self::Warrior(warrior) => Some(warrior),
        }
    }

    /// Mutable warrior state, if a warrior.
    pub fn as_warrior_mut(&mut self) -> Option<&mut Warrior> {
        match self {
            Self::Warrior(warrior) => Some(warrior),
        }
    }

    /// Specialization for a class tag, if playable.
    #[must_use]
    pub fn for_class(class: CharacterClass) -> Option<Self> {
        match class {
            CharacterClass::Warrior => Some(Self::Warrior(Warrior::default())),
            _ => None,
        }
    }
}

impl ClassKit for Specialization {
    fn class(&self) -> CharacterClass {
        match self {
            Self::Warrior(w) => w.class(),
        }
    }

    fn resource_name(&self) -> &'static str {
        match self {
            Self::Warrior(w) => w.resource_name(),
        }
    }

    fn initialize_base_stats(&self) -> BaseStats {
        match self {
            Self::Warrior(w) => w.initialize_base_stats(),
        }
    }

    fn create_talent_tree(&self) -> TalentTree {
        match self {
            Self::Warrior(w) => w.create_talent_tree(),
        }
    }

    fn starting_abilities(&self) -> Vec<AbilityKind> {
        match self {
            Self::Warrior(w) => w.starting_abilities(),
        }
    }

    fn derive_class_stats(&mut self, effective: &BaseStats) {
        match self {
            Self::Warrior(w) => w.derive_class_stats(effective),
        }
    }

    fn decide_next_action<B: Battlefield + ?Sized>(&self, me: &mut Character, battlefield: &mut B) {
        match self {
            Self::Warrior(w) => w.decide_next_action(me, battlefield),
        }
    }

    fn after_update(&self, me: &mut Character, dt: f32) {
        match self {
            Self::Warrior(w) => w.after_update(me, dt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_tints() {
        assert_eq!(CharacterClass::Warrior.tint(), Tint::new(0.8, 0.2, 0.2, 1.0));
        assert_eq!(CharacterClass::Monk.tint(), Tint::new(0.8, 0.4, 0.0, 1.0));
        assert_eq!(CharacterClass::Shaman.tint().to_array(), [0.0, 0.8, 0.8, 1.0]);
        for class in CharacterClass::all() {
            assert!((class.tint().a - 1.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_tint_is_pod() {
        let tints = [CharacterClass::Warrior.tint(), CharacterClass::Mage.tint()];
        let bytes: &[u8] = bytemuck::cast_slice(&tints);
        assert_eq!(bytes.len(), 32);
    }

    #[test]
    fn test_class_from_name() {
        assert_eq!(CharacterClass::from_name("warrior"), Some(CharacterClass::Warrior));
        assert_eq!(CharacterClass::from_name("SHAMAN"), Some(CharacterClass::Shaman));
        assert_eq!(CharacterClass::from_name("bard"), None);
    }

    #[test]
    fn test_only_warrior_playable() {
        assert!(Specialization::for_class(CharacterClass::Warrior).is_some());
        assert!(Specialization::for_class(CharacterClass::Mage).is_none());
    }
}
