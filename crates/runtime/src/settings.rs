//! User-facing game settings and their validation.

use std::ops::RangeInclusive;

use arena_core::{ControlSource, ScriptSlot, Side};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::repository::SettingsRepository;

pub const FPS_RANGE: RangeInclusive<u32> = 30..=120;
pub const SIMULATION_SPEED_RANGE: RangeInclusive<u32> = 1..=10;

/// Who controls a side, as stored in settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerType {
    Human,
    CustomA,
    CustomB,
}

impl PlayerType {
    pub const fn control(self) -> ControlSource {
        match self {
            Self::Human => ControlSource::Human,
            Self::CustomA => ControlSource::Script(ScriptSlot::A),
            Self::CustomB => ControlSource::Script(ScriptSlot::B),
        }
    }
}

impl From<ControlSource> for PlayerType {
    fn from(control: ControlSource) -> Self {
        match control {
            ControlSource::Human => Self::Human,
            ControlSource::Script(ScriptSlot::A) => Self::CustomA,
            ControlSource::Script(ScriptSlot::B) => Self::CustomB,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    /// Target loop frames per second.
    pub fps: u32,
    /// Simulation ticks per loop frame.
    pub simulation_speed: u32,
    #[serde(rename = "player1Type")]
    pub player1: PlayerType,
    #[serde(rename = "player2Type")]
    pub player2: PlayerType,
    /// The countdown only starts while this is set.
    #[serde(rename = "isRunning")]
    pub running: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            fps: 60,
            simulation_speed: 1,
            player1: PlayerType::Human,
            player2: PlayerType::CustomA,
            running: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("fps {0} outside {min}..={max}", min = FPS_RANGE.start(), max = FPS_RANGE.end())]
    Fps(u32),

    #[error(
        "simulation speed {0} outside {min}..={max}",
        min = SIMULATION_SPEED_RANGE.start(),
        max = SIMULATION_SPEED_RANGE.end()
    )]
    SimulationSpeed(u32),

    #[error("player 2 must be script-controlled")]
    HumanSecondPlayer,
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !FPS_RANGE.contains(&self.fps) {
            return Err(SettingsError::Fps(self.fps));
        }
        if !SIMULATION_SPEED_RANGE.contains(&self.simulation_speed) {
            return Err(SettingsError::SimulationSpeed(self.simulation_speed));
        }
        if self.player2 == PlayerType::Human {
            return Err(SettingsError::HumanSecondPlayer);
        }
        Ok(())
    }

    pub fn control(&self, side: Side) -> ControlSource {
        match side {
            Side::First => self.player1.control(),
            Side::Second => self.player2.control(),
        }
    }

    pub fn controls(&self) -> [ControlSource; 2] {
        [self.player1.control(), self.player2.control()]
    }

    /// Whether any side is driven by `slot`.
    pub fn uses_slot(&self, slot: ScriptSlot) -> bool {
        self.controls()
            .iter()
            .any(|control| control.script_slot() == Some(slot))
    }
}

/// Loads stored settings for a new session.
///
/// Missing, unreadable or invalid settings are replaced by the defaults.
/// The result is always paused.
pub fn load_settings(repo: &dyn SettingsRepository) -> GameSettings {
    let stored = match repo.load() {
        Ok(stored) => stored,
        Err(err) => {
            warn!(error = %err, "failed to read stored settings, using defaults");
            None
        }
    };

    let settings = match stored {
        Some(settings) => match settings.validate() {
            Ok(()) => settings,
            Err(err) => {
                warn!(error = %err, "stored settings are invalid, using defaults");
                GameSettings::default()
            }
        },
        None => GameSettings::default(),
    };

    GameSettings {
        running: false,
        ..settings
    }
}
