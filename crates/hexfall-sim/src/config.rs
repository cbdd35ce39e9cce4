//! Simulation configuration.
//!
//! Provides the clock settings and the combatant roster of a scenario.
//! Configuration can be loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{info, warn};

/// Default configuration file name.
pub const CONFIG_FILE: &str = "hexfall.toml";

/// One combatant in the scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatantConfig {
    /// Display name
    pub name: String,
    /// Class name (case-insensitive)
    pub class: String,
    /// Team number
    pub team: u8,
    /// Starting grid X
    pub x: i32,
    /// Starting grid Y
    pub y: i32,
    /// Starting level
    pub level: u32,
}

impl Default for CombatantConfig {
    fn default() -> Self {
        Self {
            name: "Warrior".to_string(),
            class: "warrior".to_string(),
            team: 0,
            x: 0,
            y: 0,
            level: 1,
        }
    }
}

/// Simulation configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Give up after this many simulated seconds
    pub max_duration: f32,
    /// Seed for combat rolls (None = random)
    pub seed: Option<u64>,
    /// Pace the simulation to the wall clock
    pub realtime: bool,
    /// Combatants in insertion order
    pub combatants: Vec<CombatantConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 10,
            max_duration: 300.0,
            seed: None,
            realtime: false,
            combatants: vec![
                CombatantConfig {
                    name: "Test Warrior".to_string(),
                    team: 0,
                    x: 9,
                    y: 5,
                    ..CombatantConfig::default()
                },
                CombatantConfig {
                    name: "Rival Warrior".to_string(),
                    team: 1,
                    x: 3,
                    y: 2,
                    ..CombatantConfig::default()
                },
            ],
        }
    }
}

impl SimConfig {
    /// Load configuration from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }

        let mut config = match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        };
        config.validate();
        config
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.tick_rate = self.tick_rate.clamp(1, 240);
        if !self.max_duration.is_finite() {
            self.max_duration = Self::default().max_duration;
        }
        self.max_duration = self.max_duration.clamp(1.0, 3600.0);

        for combatant in &mut self.combatants {
            combatant.level = combatant.level.clamp(1, 60);
            if combatant.name.trim().is_empty() {
                combatant.name = format!("{} {}", combatant.class, combatant.team);
            }
        }
    }

    /// Fixed simulation timestep in seconds.
    #[must_use]
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}
