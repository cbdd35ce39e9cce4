//! Scenario setup and the simulation loop.

use hexfall_combat::{Character, CharacterClass, Encounter, Specialization};
use hexfall_common::{GridPos, TeamId};
use tracing::{debug, info, warn};

use crate::config::SimConfig;
use crate::report::SimReport;
use crate::timing::{FixedTimestep, FrameClock};

/// Build the encounter described by a config.
///
/// Unknown or unplayable classes are skipped with a warning.
pub fn build_encounter(config: &SimConfig) -> Encounter {
    let mut encounter = Encounter::new();

    for (index, entry) in config.combatants.iter().enumerate() {
        let Some(class) = CharacterClass::from_name(&entry.class) else {
            warn!("Skipping {}: unknown class '{}'", entry.name, entry.class);
            continue;
        };
        let Some(specialization) = Specialization::for_class(class) else {
            warn!(
                "Skipping {}: {} is not playable yet",
                entry.name,
                class.display_name()
            );
            continue;
        };

        let mut character = Character::new(entry.name.clone(), specialization)
            .with_position(GridPos::new(entry.x, entry.y))
            .with_level(entry.level);
        if let Some(seed) = config.seed {
            character = character.with_seed(seed.wrapping_add(index as u64));
        }

        encounter.add(TeamId::new(entry.team), character);
    }

    encounter
}

/// Run a scenario to completion or timeout.
pub fn run(config: &SimConfig) -> SimReport {
    let mut encounter = build_encounter(config);
    info!(
        "Starting encounter with {} combatants at {} Hz",
        encounter.combatants().len(),
        config.tick_rate
    );

    if config.realtime {
        run_realtime(config, &mut encounter);
    } else {
        run_headless(config, &mut encounter);
    }

    let report = SimReport::from_encounter(&encounter, config.max_duration);
    match report.winner {
        Some(team) => info!(
            "Team {} wins after {:.1}s ({} ticks)",
            team, report.elapsed, report.ticks
        ),
        None => info!(
            "No winner after {:.1}s ({} ticks)",
            report.elapsed, report.ticks
        ),
    }
    report
}

fn run_headless(config: &SimConfig, encounter: &mut Encounter) {
    let dt = config.tick_dt();
    while !encounter.is_over() && encounter.elapsed() < config.max_duration {
        encounter.step(dt);
    }
}

fn run_realtime(config: &SimConfig, encounter: &mut Encounter) {
    let mut timestep = FixedTimestep::new(config.tick_rate);
    let mut clock = FrameClock::new(config.tick_rate);

    while !encounter.is_over() && encounter.elapsed() < config.max_duration {
        let steps = timestep.accumulate(clock.delta_time());
        for _ in 0..steps {
            encounter.step(timestep.fixed_dt());
            if encounter.is_over() {
                break;
            }
        }
        debug!("Frame ran {} steps, {:.3}s carried", steps, timestep.accumulator());
        clock.sleep_remainder();
    }
}
