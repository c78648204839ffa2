//! Command implementations

mod check;
mod export;
mod import;
mod run;

pub use check::Check;
pub use export::Export;
pub use import::Import;
pub use run::Run;

use std::path::Path;

use anyhow::{Context, Result};
use arena_content::ContentFactory;
use arena_core::ScriptSlot;
use arena_runtime::{
    FileScriptRepository, FileSettingsRepository, PlayerType, Runtime, RuntimeConfig,
};

/// Script slot as named on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SlotArg {
    #[value(alias = "1", alias = "a")]
    Slot1,
    #[value(alias = "2", alias = "b")]
    Slot2,
}

impl From<SlotArg> for ScriptSlot {
    fn from(slot: SlotArg) -> Self {
        match slot {
            SlotArg::Slot1 => ScriptSlot::A,
            SlotArg::Slot2 => ScriptSlot::B,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum PlayerArg {
    Human,
    CustomA,
    CustomB,
}

impl From<PlayerArg> for PlayerType {
    fn from(player: PlayerArg) -> Self {
        match player {
            PlayerArg::Human => PlayerType::Human,
            PlayerArg::CustomA => PlayerType::CustomA,
            PlayerArg::CustomB => PlayerType::CustomB,
        }
    }
}

fn script_repository(data_dir: &Path) -> Result<FileScriptRepository> {
    let scripts_dir = ContentFactory::new(data_dir).scripts_dir();
    FileScriptRepository::new(&scripts_dir)
        .with_context(|| format!("Failed to open script directory {}", scripts_dir.display()))
}

/// Runtime over the data directory: `fight.toml`, `settings.json` and the
/// stored scripts, with `ARENA_*` overrides applied.
async fn open_runtime(data_dir: &Path) -> Result<Runtime> {
    let factory = ContentFactory::new(data_dir);
    let fight = factory
        .load_fight_config()
        .context("Failed to load fight configuration")?;
    let config = RuntimeConfig {
        fight,
        ..RuntimeConfig::from_env()
    };

    let settings_path = data_dir.join("settings.json");
    let settings_repo = FileSettingsRepository::new(&settings_path)
        .with_context(|| format!("Failed to open settings file {}", settings_path.display()))?;

    Runtime::builder()
        .config(config)
        .script_repository(script_repository(data_dir)?)
        .settings_repository(settings_repo)
        .build()
        .await
        .context("Failed to start runtime")
}
