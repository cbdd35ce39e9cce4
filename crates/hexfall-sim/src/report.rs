//! End-of-run report.

use hexfall_combat::{CharacterView, Encounter, Outcome};
use serde::{Deserialize, Serialize};

/// Summary of a finished simulation, printed as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimReport {
    /// Final outcome
    pub outcome: Outcome,
    /// Winning team number, if any
    pub winner: Option<u8>,
    /// Whether the run stopped at the duration limit
    pub timed_out: bool,
    /// Simulated seconds
    pub elapsed: f32,
    /// Simulated ticks
    pub ticks: u64,
    /// Final state of every combatant
    pub combatants: Vec<CharacterView>,
}

impl SimReport {
    /// Summarize an encounter.
    #[must_use]
    pub fn from_encounter(encounter: &Encounter, max_duration: f32) -> Self {
        let outcome = encounter.outcome();
        let winner = match outcome {
            Outcome::Victory(team) => Some(team.raw()),
            Outcome::Draw | Outcome::Ongoing => None,
        };
        Self {
            outcome,
            winner,
            timed_out: outcome == Outcome::Ongoing && encounter.elapsed() >= max_duration,
            elapsed: encounter.elapsed(),
            ticks: encounter.ticks(),
            combatants: encounter.views(),
        }
    }

    /// Pretty JSON rendering.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexfall_combat::Character;
    use hexfall_common::TeamId;

    #[test]
    fn test_report_of_unfinished_encounter() {
        let encounter = Encounter::new()
            .with(TeamId::new(0), Character::warrior("A"))
            .with(TeamId::new(1), Character::warrior("B"));
        let report = SimReport::from_encounter(&encounter, 10.0);
        assert_eq!(report.outcome, Outcome::Ongoing);
        assert_eq!(report.winner, None);
        assert!(!report.timed_out);
    }

    #[test]
    fn test_report_json() {
        let encounter = Encounter::new().with(TeamId::new(3), Character::warrior("Last"));
        let report = SimReport::from_encounter(&encounter, 10.0);
        assert_eq!(report.winner, Some(3));

        let json = report.to_json().expect("Failed to serialize");
        assert!(json.contains("\"winner\": 3"));
        assert!(json.contains("\"name\": \"Last\""));
        let parsed: SimReport = serde_json::from_str(&json).expect("Failed to parse");
        assert_eq!(parsed.winner, Some(3));
    }
}
