//! # Hexfall Common
//!
//! Common types shared by the Hexfall combat core and its drivers:
//! - Grid coordinates with Chebyshev distance
//! - ID types (CharacterId, TeamId)
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::ids::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_id_generation() {
        let id1 = CharacterId::new();
        let id2 = CharacterId::new();
        assert_ne!(id1, id2);
        assert!(id1.is_valid());
        assert!(!CharacterId::NULL.is_valid());
    }

    #[test]
    fn test_character_id_display() {
        assert_eq!(CharacterId::from_raw(7).to_string(), "#7");
    }

    #[test]
    fn test_team_id_raw() {
        assert_eq!(TeamId::new(2).raw(), 2);
        assert_ne!(TeamId::new(0), TeamId::new(1));
    }
}
