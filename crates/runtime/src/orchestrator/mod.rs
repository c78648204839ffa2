//! Round state machine.
//!
//! `WAITING → COUNTDOWN → FIGHTING → ROUND_END → (restart delay) → WAITING`
//!
//! The orchestrator owns the authoritative actors. It is advanced in two
//! steps: [`MatchOrchestrator::advance_frame`] once per loop frame (running
//! gate, countdown and restart timers), then [`MatchOrchestrator::tick`] up
//! to `simulation_speed` times while the round is fighting.
mod counters;
mod setup;
mod state;
mod timing;

pub use counters::FrameCounters;
pub use setup::{FIRST_SPAWN_X, SECOND_SPAWN_X, SPAWN_JITTER, spawn_offset, spawn_pair};
pub use state::MatchState;
pub use timing::{
    DEFAULT_COUNTDOWN_STEP_MS, DEFAULT_FAST_COUNTDOWN_STEP_MS, DEFAULT_MATCH_SECONDS,
    DEFAULT_RESTART_DELAY_MS, FrameTimer, MatchTiming, TICKS_PER_SECOND, frames_for,
};

use arena_core::{
    Actor, ControlSource, Decision, DecisionSource, EndReason, FightConfig, FightEngine,
    NeutralDecisions, RoundResult, RoundStatus, SessionStats, Side,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace};

use crate::api::InputProvider;
use crate::events::{EventBus, MatchEvent};

/// Value shown when a countdown starts.
pub const COUNTDOWN_START: u8 = 3;

/// What one [`MatchOrchestrator::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Not fighting; actors only settled under neutral input.
    Held,
    /// A fighting tick ran and the round goes on.
    Continue,
    /// This tick ended the round.
    RoundOver(RoundResult),
    /// The round is over; nothing was simulated.
    Ended,
}

pub struct MatchOrchestrator {
    config: FightConfig,
    timing: MatchTiming,
    controls: [ControlSource; 2],
    running: bool,
    state: MatchState,
    first: Actor,
    second: Actor,
    countdown_timer: Option<FrameTimer>,
    restart_timer: Option<FrameTimer>,
    rng: StdRng,
    counters: FrameCounters,
    events: EventBus,
}

impl MatchOrchestrator {
    /// Creates the orchestrator with the first round spawned and waiting.
    pub fn new(
        config: FightConfig,
        timing: MatchTiming,
        controls: [ControlSource; 2],
        seed: u64,
        events: EventBus,
    ) -> Self {
        let (first, second) = spawn_pair(controls, 0.0, &config);
        let mut orchestrator = Self {
            state: MatchState::new(timing.match_ticks),
            config,
            timing,
            controls,
            running: false,
            first,
            second,
            countdown_timer: None,
            restart_timer: None,
            rng: StdRng::seed_from_u64(seed),
            counters: FrameCounters::default(),
            events,
        };
        orchestrator.start_match();
        orchestrator
    }

    /// The external gate for leaving WAITING. While cleared, the countdown
    /// and the fight are paused.
    pub fn set_running(&mut self, running: bool) {
        if self.running != running {
            debug!(running, "running flag changed");
        }
        self.running = running;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Control sources for the next round spawned.
    pub fn set_controls(&mut self, controls: [ControlSource; 2]) {
        self.controls = controls;
    }

    /// Replaces frame-based timings, for the next timer armed.
    pub fn set_timing(&mut self, timing: MatchTiming) {
        self.timing = timing;
    }

    /// Spawns a fresh round, cancelling any pending restart or countdown.
    ///
    /// If the running flag is set the countdown starts immediately.
    pub fn start_match(&mut self) {
        self.restart_timer = None;
        self.countdown_timer = None;

        let offset = spawn_offset(&mut self.rng);
        let (first, second) = spawn_pair(self.controls, offset, &self.config);
        self.first = first;
        self.second = second;

        self.state.round += 1;
        self.state.status = RoundStatus::Waiting;
        self.state.countdown = None;
        self.state.ticks_remaining = self.timing.match_ticks;
        self.counters.reset();

        info!(
            round = self.state.round,
            first = %self.first.control,
            second = %self.second.control,
            "round spawned"
        );
        self.events.publish(MatchEvent::RoundStarted {
            round: self.state.round,
            first: self.first.control,
            second: self.second.control,
            first_x: self.first.x,
            second_x: self.second.x,
        });

        if self.running {
            self.begin_countdown();
        }
    }

    /// Frame-level bookkeeping. Returns whether fighting ticks should run
    /// this frame.
    pub fn advance_frame(&mut self) -> bool {
        self.counters.frames += 1;
        trace!(frame = self.counters.frames, status = %self.state.status, "frame");

        match self.state.status {
            RoundStatus::Waiting => {
                if self.running {
                    self.begin_countdown();
                }
            }
            RoundStatus::Countdown => {
                if self.running {
                    self.step_countdown();
                }
            }
            RoundStatus::Fighting => {}
            RoundStatus::RoundEnd => {
                if let Some(timer) = self.restart_timer.as_mut()
                    && timer.tick()
                {
                    self.start_match();
                }
            }
        }

        self.running && self.state.status.is_fighting()
    }

    /// Runs one simulation tick.
    ///
    /// Only FIGHTING polls `input` for human actors and consults `decisions`
    /// for scripted ones. WAITING and COUNTDOWN step the actors with neutral
    /// input and a stopped clock; ROUND_END holds the last frame.
    pub fn tick(
        &mut self,
        input: &mut (impl InputProvider + ?Sized),
        decisions: &mut (impl DecisionSource + ?Sized),
    ) -> TickOutcome {
        let engine = FightEngine::new(&self.config);
        match self.state.status {
            RoundStatus::RoundEnd => return TickOutcome::Ended,
            RoundStatus::Waiting | RoundStatus::Countdown => {
                self.counters.ticks += 1;
                engine.step(
                    &mut self.first,
                    &mut self.second,
                    [Decision::NEUTRAL; 2],
                    &mut NeutralDecisions,
                );
                return TickOutcome::Held;
            }
            RoundStatus::Fighting => {}
        }

        self.counters.ticks += 1;
        self.counters.fight_ticks += 1;

        let inputs = [
            human_input(&self.first, Side::First, input),
            human_input(&self.second, Side::Second, input),
        ];
        let interactions = engine.step(&mut self.first, &mut self.second, inputs, decisions);
        for (attacker, hit) in interactions.hits() {
            self.counters.hits += 1;
            debug!(attacker = %attacker, damage = hit.damage, counter = ?hit.counter, "hit");
        }

        self.state.ticks_remaining = self.state.ticks_remaining.saturating_sub(1);

        let knocked_out = !self.first.is_alive() || !self.second.is_alive();
        let timed_out = self.state.ticks_remaining == 0;
        if knocked_out || timed_out {
            let reason = if knocked_out {
                EndReason::KnockOut
            } else {
                EndReason::Timeout
            };
            return TickOutcome::RoundOver(self.end_round(reason));
        }
        TickOutcome::Continue
    }

    /// One loop frame: [`Self::advance_frame`] plus up to `speed` ticks.
    /// Stops early when the round ends and returns its result.
    pub fn run_frame(
        &mut self,
        speed: u32,
        input: &mut (impl InputProvider + ?Sized),
        decisions: &mut (impl DecisionSource + ?Sized),
    ) -> Option<RoundResult> {
        if !self.advance_frame() {
            return None;
        }
        for _ in 0..speed.max(1) {
            if let TickOutcome::RoundOver(result) = self.tick(input, decisions) {
                return Some(result);
            }
        }
        None
    }

    fn begin_countdown(&mut self) {
        let step = if self.state.stats.matches_played == 0 {
            self.timing.countdown_step
        } else {
            self.timing.fast_countdown_step
        };
        self.state.status = RoundStatus::Countdown;
        self.state.countdown = Some(COUNTDOWN_START);
        self.countdown_timer = Some(FrameTimer::new(step));
        debug!(round = self.state.round, step_frames = step, "countdown started");
        self.events.publish(MatchEvent::Countdown {
            value: COUNTDOWN_START,
        });
    }

    fn step_countdown(&mut self) {
        let step = self.countdown_step();
        let Some(timer) = self.countdown_timer.as_mut() else {
            return;
        };
        if !timer.tick() {
            return;
        }

        match self.state.countdown {
            Some(value) if value > 0 => {
                let value = value - 1;
                *timer = FrameTimer::new(step);
                self.state.countdown = Some(value);
                self.events.publish(MatchEvent::Countdown { value });
            }
            _ => {
                self.countdown_timer = None;
                self.state.countdown = None;
                self.state.status = RoundStatus::Fighting;
                info!(round = self.state.round, "fight started");
                self.events.publish(MatchEvent::FightStarted);
            }
        }
    }

    fn countdown_step(&self) -> u32 {
        if self.state.stats.matches_played == 0 {
            self.timing.countdown_step
        } else {
            self.timing.fast_countdown_step
        }
    }

    fn end_round(&mut self, reason: EndReason) -> RoundResult {
        let result = RoundResult::decide(self.first.health, self.second.health, reason);
        self.state.stats.record(&result);
        self.state.status = RoundStatus::RoundEnd;
        self.state.last_result = Some(result);
        self.restart_timer = Some(FrameTimer::new(self.timing.restart_delay));

        info!(
            round = self.state.round,
            winner = %result.winner,
            reason = %reason,
            first_health = result.first_health,
            second_health = result.second_health,
            "round ended"
        );
        self.events.publish(MatchEvent::RoundEnded {
            result,
            stats: self.state.stats,
            ticks: self.counters.fight_ticks,
        });
        result
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn status(&self) -> RoundStatus {
        self.state.status
    }

    pub fn stats(&self) -> SessionStats {
        self.state.stats
    }

    pub fn actor(&self, side: Side) -> &Actor {
        match side {
            Side::First => &self.first,
            Side::Second => &self.second,
        }
    }

    /// Mutable access for fixtures that stage a specific situation.
    pub fn actor_mut(&mut self, side: Side) -> &mut Actor {
        match side {
            Side::First => &mut self.first,
            Side::Second => &mut self.second,
        }
    }

    pub fn counters(&self) -> FrameCounters {
        self.counters
    }

    pub fn config(&self) -> &FightConfig {
        &self.config
    }

    pub fn timing(&self) -> MatchTiming {
        self.timing
    }

    /// Frames left before a pending restart fires.
    pub fn restart_pending(&self) -> Option<u32> {
        self.restart_timer.map(|timer| timer.remaining())
    }
}

fn human_input(
    actor: &Actor,
    side: Side,
    input: &mut (impl InputProvider + ?Sized),
) -> Decision {
    match actor.control {
        ControlSource::Human => input.poll(side),
        ControlSource::Script(_) => Decision::NEUTRAL,
    }
}

impl std::fmt::Debug for MatchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchOrchestrator")
            .field("state", &self.state)
            .field("running", &self.running)
            .field("counters", &self.counters)
            .finish_non_exhaustive()
    }
}
