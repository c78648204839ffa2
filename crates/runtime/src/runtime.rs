//! High-level runtime.
//!
//! The runtime owns the orchestrator, the script slots, and the repositories,
//! and exposes a builder-based API for clients to drive a session.

use std::env;
use std::str::FromStr;
use std::sync::Arc;

use arena_core::{FightConfig, RoundResult, ScriptSlot};
use arena_script::{CompileOptions, Limits};
use tokio::sync::broadcast;

use crate::api::{InputProvider, Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::isolation::{CompileOutcome, DEFAULT_QUEUE_CAPACITY};
use crate::orchestrator::{
    DEFAULT_COUNTDOWN_STEP_MS, DEFAULT_FAST_COUNTDOWN_STEP_MS, DEFAULT_MATCH_SECONDS,
    DEFAULT_RESTART_DELAY_MS, MatchOrchestrator, MatchTiming, TickOutcome,
};
use crate::repository::{
    InMemoryScriptRepo, InMemorySettingsRepo, ScriptExport, ScriptRepository, SettingsRepository,
};
use crate::scripts::{ScriptSlots, source_for};
use crate::settings::{GameSettings, load_settings};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub fight: FightConfig,
    pub match_seconds: u32,
    pub countdown_step_ms: u64,
    pub fast_countdown_step_ms: u64,
    pub restart_delay_ms: u64,
    pub script_limits: Limits,
    /// Seeds spawn offsets and every script's `Math.random`.
    pub seed: u64,
    pub request_buffer_size: usize,
    pub event_buffer_size: usize,
    /// Overrides the stored fps when set.
    pub fps: Option<u32>,
    /// Overrides the stored simulation speed when set.
    pub simulation_speed: Option<u32>,
    /// Wait for every script reply before each tick, making runs with
    /// scripts reproducible for a given seed.
    pub lockstep: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            fight: FightConfig::default(),
            match_seconds: DEFAULT_MATCH_SECONDS,
            countdown_step_ms: DEFAULT_COUNTDOWN_STEP_MS,
            fast_countdown_step_ms: DEFAULT_FAST_COUNTDOWN_STEP_MS,
            restart_delay_ms: DEFAULT_RESTART_DELAY_MS,
            script_limits: Limits::default(),
            seed: 0,
            request_buffer_size: DEFAULT_QUEUE_CAPACITY,
            event_buffer_size: 100,
            fps: None,
            simulation_speed: None,
            lockstep: false,
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by `ARENA_*` environment variables.
    ///
    /// Unparseable values are ignored. An unset `ARENA_SEED` draws a random
    /// seed.
    pub fn from_env() -> Self {
        let mut config = Self {
            seed: read_env("ARENA_SEED").unwrap_or_else(rand::random),
            fps: read_env("ARENA_FPS"),
            simulation_speed: read_env("ARENA_SIMULATION_SPEED"),
            ..Self::default()
        };

        if let Some(seconds) = read_env("ARENA_MATCH_SECONDS") {
            config.match_seconds = seconds;
        }
        if let Some(delay) = read_env("ARENA_RESTART_DELAY_MS") {
            config.restart_delay_ms = delay;
        }
        if let Some(budget) = read_env("ARENA_SCRIPT_BUDGET") {
            config.script_limits.budget = budget;
        }
        if let Some(capacity) = read_env("ARENA_REQUEST_BUFFER") {
            config.request_buffer_size = capacity;
        }
        if let Some(capacity) = read_env("ARENA_EVENT_BUFFER") {
            config.event_buffer_size = capacity;
        }
        if let Some(lockstep) = read_env("ARENA_LOCKSTEP") {
            config.lockstep = lockstep;
        }

        config
    }

    pub fn validate(&self) -> Result<()> {
        self.fight.validate().map_err(RuntimeError::FightConfig)?;
        if self.match_seconds == 0 {
            return Err(RuntimeError::InvalidConfig(
                "match length must be at least one second".to_owned(),
            ));
        }
        Ok(())
    }

    /// Frame-based timings at `fps`.
    pub fn timing(&self, fps: u32) -> MatchTiming {
        MatchTiming::from_millis(
            fps,
            self.countdown_step_ms,
            self.fast_countdown_step_ms,
            self.restart_delay_ms,
            self.match_seconds,
        )
    }

    /// Applies the fps and speed overrides to `settings`.
    pub fn apply_overrides(&self, settings: GameSettings) -> GameSettings {
        GameSettings {
            fps: self.fps.unwrap_or(settings.fps),
            simulation_speed: self.simulation_speed.unwrap_or(settings.simulation_speed),
            ..settings
        }
    }

    fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            limits: self.script_limits,
            seed: self.seed,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    env::var(key).ok()?.parse().ok()
}

/// One headless session: a match orchestrator plus the scripts driving it.
pub struct Runtime {
    config: RuntimeConfig,
    settings: GameSettings,
    orchestrator: MatchOrchestrator,
    scripts: ScriptSlots,
    script_repo: Arc<dyn ScriptRepository>,
    settings_repo: Arc<dyn SettingsRepository>,
    events: EventBus,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Subscribe to events on `topic`.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.events.subscribe(topic)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn orchestrator(&self) -> &MatchOrchestrator {
        &self.orchestrator
    }

    pub fn orchestrator_mut(&mut self) -> &mut MatchOrchestrator {
        &mut self.orchestrator
    }

    pub fn scripts(&self) -> &ScriptSlots {
        &self.scripts
    }

    /// Compiles the slots the current settings need.
    pub async fn prepare_scripts(&mut self) -> Vec<(ScriptSlot, CompileOutcome)> {
        self.scripts
            .prepare(&self.settings, self.script_repo.as_ref())
            .await
    }

    /// Validates, applies and persists new settings.
    ///
    /// Player type changes take effect from the next round; scripts newly
    /// needed are compiled right away.
    pub async fn update_settings(&mut self, settings: GameSettings) -> Result<()> {
        settings.validate()?;

        if settings.fps != self.settings.fps {
            self.orchestrator.set_timing(self.config.timing(settings.fps));
        }
        self.orchestrator.set_controls(settings.controls());
        self.orchestrator.set_running(settings.running);
        self.settings = settings;
        self.settings_repo.save(&self.settings)?;
        self.prepare_scripts().await;
        Ok(())
    }

    /// Flips the running gate without touching anything else.
    pub fn set_running(&mut self, running: bool) -> Result<()> {
        self.settings.running = running;
        self.orchestrator.set_running(running);
        self.settings_repo.save(&self.settings)?;
        Ok(())
    }

    /// Stores `source` for `slot` and compiles it.
    pub async fn save_script(&mut self, slot: ScriptSlot, source: &str) -> Result<CompileOutcome> {
        self.script_repo.save(slot, source)?;
        Ok(self.scripts.compile(slot, source).await)
    }

    /// The script for `slot` (stored or template) as an export document.
    pub fn export_script(&self, slot: ScriptSlot) -> Result<String> {
        let source = source_for(slot, self.script_repo.as_ref());
        Ok(ScriptExport::new(source).to_json()?)
    }

    /// Reloads both slots from storage and recompiles them.
    pub async fn recompile_all(&mut self) -> Vec<(ScriptSlot, CompileOutcome)> {
        self.scripts.recompile_all(self.script_repo.as_ref()).await
    }

    /// Forces a new round now, cancelling any pending restart.
    pub fn restart_match(&mut self) {
        self.orchestrator.start_match();
    }

    /// Runs one loop frame with the current simulation speed, returning the
    /// result of a round that ended during it.
    pub async fn run_frame(
        &mut self,
        input: &mut (impl InputProvider + ?Sized),
    ) -> Option<RoundResult> {
        if !self.orchestrator.advance_frame() {
            return None;
        }
        for _ in 0..self.settings.simulation_speed.max(1) {
            if self.config.lockstep {
                self.scripts.settle().await;
            }
            if let TickOutcome::RoundOver(result) = self.orchestrator.tick(input, &mut self.scripts)
            {
                return Some(result);
            }
        }
        None
    }

    /// Stops every script worker.
    pub fn shutdown(mut self) {
        self.scripts.terminate_all();
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    settings: Option<GameSettings>,
    script_repo: Option<Arc<dyn ScriptRepository>>,
    settings_repo: Option<Arc<dyn SettingsRepository>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            settings: None,
            script_repo: None,
            settings_repo: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `settings` instead of loading them from the settings repository.
    /// They are validated but not persisted.
    pub fn settings(mut self, settings: GameSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Script storage (default: in-memory)
    pub fn script_repository(mut self, repo: impl ScriptRepository + 'static) -> Self {
        self.script_repo = Some(Arc::new(repo));
        self
    }

    /// Settings storage (default: in-memory)
    pub fn settings_repository(mut self, repo: impl SettingsRepository + 'static) -> Self {
        self.settings_repo = Some(Arc::new(repo));
        self
    }

    /// Build the runtime and compile the scripts its settings need.
    pub async fn build(self) -> Result<Runtime> {
        self.config.validate()?;

        let script_repo = self
            .script_repo
            .unwrap_or_else(|| Arc::new(InMemoryScriptRepo::new()));
        let settings_repo = self
            .settings_repo
            .unwrap_or_else(|| Arc::new(InMemorySettingsRepo::new()));

        let settings = self
            .settings
            .unwrap_or_else(|| load_settings(settings_repo.as_ref()));
        let settings = self.config.apply_overrides(settings);
        settings.validate()?;

        let events = EventBus::with_capacity(self.config.event_buffer_size);
        let scripts = ScriptSlots::new(
            self.config.compile_options(),
            self.config.request_buffer_size,
            events.clone(),
        );
        let mut orchestrator = MatchOrchestrator::new(
            self.config.fight.clone(),
            self.config.timing(settings.fps),
            settings.controls(),
            self.config.seed,
            events.clone(),
        );
        orchestrator.set_running(settings.running);

        tracing::info!(
            fps = settings.fps,
            simulation_speed = settings.simulation_speed,
            player1 = %settings.player1,
            player2 = %settings.player2,
            seed = self.config.seed,
            "runtime initialized"
        );

        let mut runtime = Runtime {
            config: self.config,
            settings,
            orchestrator,
            scripts,
            script_repo,
            settings_repo,
            events,
        };
        runtime.prepare_scripts().await;
        Ok(runtime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_stored_values() {
        let config = RuntimeConfig {
            fps: Some(30),
            ..RuntimeConfig::default()
        };
        let settings = config.apply_overrides(GameSettings::default());
        assert_eq!(settings.fps, 30);
        assert_eq!(settings.simulation_speed, 1);
    }

    #[test]
    fn zero_length_match_is_rejected() {
        let config = RuntimeConfig {
            match_seconds: 0,
            ..RuntimeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RuntimeError::InvalidConfig(_))
        ));
    }
}
