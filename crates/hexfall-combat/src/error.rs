//! Error types for the combat core.

use thiserror::Error;

use crate::talent::Talent;

/// Reasons an action requested of a character was rejected.
///
/// A rejected action leaves the character unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    /// The character is dead
    #[error("character is dead")]
    Dead,
    /// No ability in the requested slot
    #[error("no ability in slot {0}")]
    EmptySlot(usize),
    /// Ability still cooling down
    #[error("ability on cooldown: {remaining}s remaining")]
    OnCooldown {
        /// Time remaining in seconds
        remaining: f32,
    },
    /// Not enough resource to pay the cost
    #[error("insufficient resource: need {required}, have {available}")]
    InsufficientResource {
        /// Resource cost
        required: f32,
        /// Resource available
        available: f32,
    },
    /// Ability needs a target and none was given
    #[error("ability requires a target")]
    NoTarget,
    /// All regular ability slots are taken
    #[error("all ability slots are full")]
    SlotsFull,
    /// Tried to learn an ultimate as a regular ability
    #[error("ability is not a regular ability")]
    NotRegular,
    /// Tried to set a regular ability as the ultimate
    #[error("ability is not an ultimate ability")]
    NotUltimate,
    /// No ultimate ability assigned
    #[error("no ultimate ability assigned")]
    NoUltimate,
    /// Ultimate charge below the maximum
    #[error("ultimate not ready: charge {charge}/100")]
    UltimateNotReady {
        /// Current charge
        charge: u32,
    },
    /// No talent points to spend
    #[error("no talent points available")]
    NoTalentPoints,
    /// Talent is not in the tree or its tier is locked
    #[error("talent not eligible: {0:?}")]
    TalentNotEligible(Talent),
    /// Talent already at max rank
    #[error("talent at max rank: {0:?}")]
    TalentMaxRank(Talent),
}

/// Errors building a talent tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TalentTreeError {
    /// Tier outside 1..=5
    #[error("invalid tier {0}, expected 1..=5")]
    InvalidTier(usize),
    /// Talent already placed in the tree
    #[error("talent already in tree: {0:?}")]
    Duplicate(Talent),
}

/// Result type for character actions.
pub type ActionResult<T> = Result<T, ActionError>;
