//! ID types for combatants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for character IDs.
static CHARACTER_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a character taking part in combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(u64);

impl CharacterId {
    /// Creates a new unique character ID.
    #[must_use]
    pub fn new() -> Self {
        Self(CHARACTER_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates a character ID from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Null/invalid character ID.
    pub const NULL: Self = Self(0);

    /// Checks if this is a valid (non-null) character ID.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier for a team in an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(u8);

impl TeamId {
    /// Creates a team ID from a raw value.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}
