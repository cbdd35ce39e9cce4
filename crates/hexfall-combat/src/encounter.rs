//! Team-based encounters.
//!
//! An encounter owns every combatant, steps each living one once per tick
//! and answers nearest-enemy queries across teams.

use hexfall_common::{CharacterId, TeamId};
use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use crate::battlefield::Battlefield;
use crate::character::{sanitize, Character};
use crate::view::CharacterView;

/// A character and its team.
#[derive(Debug, Clone)]
pub struct Combatant {
    /// Team the character fights for.
    pub team: TeamId,
    /// The character.
    pub character: Character,
}

/// Opponents of one acting combatant: everyone else not on its team.
struct Opponents<'a> {
    team: TeamId,
    before: &'a mut [Combatant],
    after: &'a mut [Combatant],
}

impl Battlefield for Opponents<'_> {
    fn nearest_enemy(&mut self, of: &Character) -> Option<&mut Character> {
        let team = self.team;
        let position = of.position();
        self.before
            .iter_mut()
            .chain(self.after.iter_mut())
            .filter(|c| c.team != team && c.character.is_alive())
            .map(|c| &mut c.character)
            .min_by_key(|c| c.position().distance_to(position))
    }
}

/// Final outcome of an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Only this team has living members.
    Victory(TeamId),
    /// Nobody is left alive.
    Draw,
    /// More than one team still stands.
    Ongoing,
}

/// A fight between teams.
#[derive(Debug, Clone, Default)]
pub struct Encounter {
    combatants: Vec<Combatant>,
    elapsed: f32,
    ticks: u64,
}

impl Encounter {
    /// Create an empty encounter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a character to a team, returns its id.
    pub fn add(&mut self, team: TeamId, character: Character) -> CharacterId {
        let id = character.id();
        info!(
            "{} joins team {} at ({}, {})",
            character.name(),
            team.raw(),
            character.position().x,
            character.position().y
        );
        self.combatants.push(Combatant { team, character });
        id
    }

    /// Builder: add a character to a team.
    #[must_use]
    pub fn with(mut self, team: TeamId, character: Character) -> Self {
        self.add(team, character);
        self
    }

    /// Get a character by id.
    #[must_use]
    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.combatants
            .iter()
            .map(|c| &c.character)
            .find(|c| c.id() == id)
    }

    /// Get a mutable character by id.
    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.combatants
            .iter_mut()
            .map(|c| &mut c.character)
            .find(|c| c.id() == id)
    }

    /// All combatants in insertion order.
    #[must_use]
    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    /// Seconds simulated so far.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Ticks simulated so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance every living combatant by `dt` seconds, in insertion order.
    pub fn step(&mut self, dt: f32) {
        let dt = sanitize(dt, "dt");
        for index in 0..self.combatants.len() {
            let (before, rest) = self.combatants.split_at_mut(index);
            let Some((current, after)) = rest.split_first_mut() else {
                continue;
            };
            if !current.character.is_alive() {
                continue;
            }
            let mut opponents = Opponents {
                team: current.team,
                before,
                after,
            };
            current.character.update(dt, &mut opponents);
        }

        self.elapsed += dt;
        self.ticks += 1;
        trace!("Encounter tick {} at {:.2}s", self.ticks, self.elapsed);
    }

    /// Teams with at least one living member, ascending.
    #[must_use]
    pub fn living_teams(&self) -> Vec<TeamId> {
        let mut teams: Vec<_> = self
            .combatants
            .iter()
            .filter(|c| c.character.is_alive())
            .map(|c| c.team)
            .collect();
        teams.sort_unstable();
        teams.dedup();
        teams
    }

    /// Current outcome.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        match self.living_teams().as_slice() {
            [] => Outcome::Draw,
            [team] => Outcome::Victory(*team),
            _ => Outcome::Ongoing,
        }
    }

    /// Check whether at most one team still stands.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome() != Outcome::Ongoing
    }

    /// Snapshots of every combatant.
    #[must_use]
    pub fn views(&self) -> Vec<CharacterView> {
        self.combatants.iter().map(|c| c.character.view()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CombatState;
    use hexfall_common::GridPos;

    const RED: TeamId = TeamId::new(0);
    const BLUE: TeamId = TeamId::new(1);

    #[test]
    fn test_allies_are_not_targets() {
        let mut encounter = Encounter::new()
            .with(RED, Character::warrior("A").with_position(GridPos::new(0, 0)))
            .with(RED, Character::warrior("B").with_position(GridPos::new(1, 0)));
        encounter.step(0.1);
        for c in encounter.combatants() {
            assert_eq!(c.character.combat_state(), CombatState::Idle);
        }
        assert_eq!(encounter.outcome(), Outcome::Victory(RED));
    }

    #[test]
    fn test_enemies_close_in() {
        let mut encounter = Encounter::new()
            .with(RED, Character::warrior("A").with_position(GridPos::new(0, 0)))
            .with(BLUE, Character::warrior("B").with_position(GridPos::new(6, 0)));
        encounter.step(0.1);
        let positions: Vec<_> = encounter
            .combatants()
            .iter()
            .map(|c| c.character.position())
            .collect();
        assert_eq!(positions, vec![GridPos::new(1, 0), GridPos::new(5, 0)]);
        assert_eq!(encounter.ticks(), 1);
        assert!(!encounter.is_over());
    }

    #[test]
    fn test_duel_finishes() {
        let mut encounter = Encounter::new()
            .with(RED, Character::warrior("A").with_seed(1).with_position(GridPos::new(0, 0)))
            .with(BLUE, Character::warrior("B").with_seed(2).with_position(GridPos::new(3, 3)));

        let mut steps = 0;
        while !encounter.is_over() && steps < 20_000 {
            encounter.step(0.1);
            steps += 1;
        }

        assert!(encounter.is_over());
        let dead = encounter
            .combatants()
            .iter()
            .filter(|c| c.character.combat_state() == CombatState::Dead)
            .count();
        match encounter.outcome() {
            Outcome::Victory(_) => assert_eq!(dead, 1),
            Outcome::Draw => assert_eq!(dead, 2),
            Outcome::Ongoing => unreachable!(),
        }
        assert!(encounter.elapsed() > 0.0);
    }

    #[test]
    fn test_lookup_by_id() {
        let mut encounter = Encounter::new();
        let id = encounter.add(BLUE, Character::warrior("Findme"));
        assert_eq!(encounter.get(id).map(Character::name), Some("Findme"));
        if let Some(c) = encounter.get_mut(id) {
            c.kill();
        }
        assert_eq!(encounter.outcome(), Outcome::Draw);
        assert_eq!(encounter.views().len(), 1);
    }
}
