//! Read-only snapshots for presentation.

use hexfall_common::{CharacterId, GridPos};
use serde::{Deserialize, Serialize};

use crate::character::{Character, CombatState};
use crate::class::{CharacterClass, Tint};

/// Cooldown state of one ability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityView {
    /// Ability name.
    pub name: String,
    /// Seconds until ready.
    pub remaining_cooldown: f32,
}

/// Everything a renderer or report needs from a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterView {
    /// Character id.
    pub id: CharacterId,
    /// Name.
    pub name: String,
    /// Class tag.
    pub class: CharacterClass,
    /// Class draw color.
    pub tint: Tint,
    /// Level.
    pub level: u32,
    /// Grid position.
    pub position: GridPos,
    /// Alive flag.
    pub alive: bool,
    /// Combat state.
    pub state: CombatState,
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Health fraction (0.0-1.0).
    pub health_fraction: f32,
    /// Resource name.
    pub resource_name: String,
    /// Current resource.
    pub resource: f32,
    /// Resource fraction (0.0-1.0).
    pub resource_fraction: f32,
    /// Ultimate charge (0-100).
    pub ultimate_charge: u32,
    /// Regular abilities in slot order.
    pub abilities: Vec<AbilityView>,
    /// Ultimate ability name.
    pub ultimate: Option<String>,
    /// Names of active effects.
    pub effects: Vec<String>,
}

impl From<&Character> for CharacterView {
    fn from(character: &Character) -> Self {
        let stats = character.stats();
        Self {
            id: character.id(),
            name: character.name().to_string(),
            class: character.class(),
            tint: character.tint(),
            level: character.level(),
            position: character.position(),
            alive: character.is_alive(),
            state: character.combat_state(),
            health: stats.health(),
            max_health: stats.max_health(),
            health_fraction: character.health_fraction(),
            resource_name: character.resource_name().to_string(),
            resource: stats.resource(),
            resource_fraction: character.resource_fraction(),
            ultimate_charge: character.ultimate_charge(),
            abilities: character
                .abilities()
                .iter()
                .map(|ability| AbilityView {
                    name: ability.name().to_string(),
                    remaining_cooldown: ability.remaining_cooldown(),
                })
                .collect(),
            ultimate: character.ultimate().map(|u| u.name().to_string()),
            effects: character
                .effects()
                .iter()
                .map(|effect| effect.name().to_string())
                .collect(),
        }
    }
}
