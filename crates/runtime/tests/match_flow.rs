use arena_core::{EndReason, RoundStatus, ScriptSlot, Side};
use arena_runtime::{
    Event, GameLoop, GameSettings, IdleInput, InMemoryScriptRepo, MatchEvent, Pacing, PlayerType,
    Runtime, RuntimeConfig, Topic,
};
use tokio::sync::broadcast;

/// 3-frame countdown steps in the first round, 1-frame steps afterwards,
/// a 6-frame restart delay and 60-tick rounds at 60 fps.
fn fast_config() -> RuntimeConfig {
    RuntimeConfig {
        countdown_step_ms: 50,
        fast_countdown_step_ms: 17,
        restart_delay_ms: 100,
        match_seconds: 1,
        seed: 11,
        ..RuntimeConfig::default()
    }
}

const IDLE_SCRIPT: &str = "function decide(self, opponent) { return {} }";

/// An idle human against a script that never presses anything.
fn humans(running: bool) -> GameSettings {
    GameSettings {
        player1: PlayerType::Human,
        player2: PlayerType::CustomA,
        running,
        ..GameSettings::default()
    }
}

async fn runtime(settings: GameSettings) -> Runtime {
    Runtime::builder()
        .config(fast_config())
        .settings(settings)
        .script_repository(InMemoryScriptRepo::with_script(ScriptSlot::A, IDLE_SCRIPT))
        .build()
        .await
        .expect("runtime should build")
}

fn drain(events: &mut broadcast::Receiver<Event>) -> Vec<MatchEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let Event::Match(event) = event {
            out.push(event);
        }
    }
    out
}

async fn run_until_fighting(runtime: &mut Runtime) -> u32 {
    let mut frames = 0;
    while runtime.orchestrator().status() != RoundStatus::Fighting {
        runtime.run_frame(&mut IdleInput).await;
        frames += 1;
        assert!(frames < 1_000, "round never started");
    }
    frames
}

async fn run_until_round_over(runtime: &mut Runtime) -> arena_core::RoundResult {
    for _ in 0..10_000 {
        if let Some(result) = runtime.run_frame(&mut IdleInput).await {
            return result;
        }
    }
    panic!("round never ended");
}

/// Without the running flag the first round stays in WAITING; once set, the
/// countdown shows 3, 2, 1, 0 and the fight starts.
#[tokio::test]
async fn countdown_waits_for_running_flag() {
    let mut runtime = runtime(humans(false)).await;
    let mut events = runtime.subscribe(Topic::Match);

    for _ in 0..50 {
        assert_eq!(runtime.run_frame(&mut IdleInput).await, None);
    }
    assert_eq!(runtime.orchestrator().status(), RoundStatus::Waiting);
    assert_eq!(runtime.orchestrator().state().countdown, None);
    assert!(drain(&mut events).is_empty());

    runtime.set_running(true).expect("settings should save");
    run_until_fighting(&mut runtime).await;

    let seen = drain(&mut events);
    assert_eq!(
        seen,
        vec![
            MatchEvent::Countdown { value: 3 },
            MatchEvent::Countdown { value: 2 },
            MatchEvent::Countdown { value: 1 },
            MatchEvent::Countdown { value: 0 },
            MatchEvent::FightStarted,
        ]
    );
    assert_eq!(runtime.orchestrator().state().countdown, None);
}

/// Clearing the running flag mid-fight freezes the clock.
#[tokio::test]
async fn paused_fight_keeps_clock() {
    let mut runtime = runtime(humans(true)).await;
    run_until_fighting(&mut runtime).await;
    runtime.run_frame(&mut IdleInput).await;
    let remaining = runtime.orchestrator().state().ticks_remaining;

    runtime.set_running(false).expect("settings should save");
    for _ in 0..30 {
        runtime.run_frame(&mut IdleInput).await;
    }
    assert_eq!(runtime.orchestrator().state().ticks_remaining, remaining);
    assert_eq!(runtime.orchestrator().status(), RoundStatus::Fighting);
}

/// Nobody lands a hit: the round times out at full health and the second
/// player is credited with the win.
#[tokio::test]
async fn timeout_tie_goes_to_second_player() {
    let mut runtime = runtime(humans(true)).await;

    let report = GameLoop::new(Pacing::Unpaced)
        .run(&mut runtime, &mut IdleInput, |_, report| {
            !report.rounds.is_empty() || report.frames > 1_000
        })
        .await;

    let result = report.rounds.first().copied().expect("round should end");
    assert_eq!(result.reason, EndReason::Timeout);
    assert_eq!(result.winner, Side::Second);
    assert_eq!(result.first_health, result.second_health);

    let stats = runtime.orchestrator().stats();
    assert_eq!(stats.matches_played, 1);
    assert_eq!(stats.second_wins, 1);
    assert_eq!(stats.first_wins, 0);
    assert_eq!(runtime.orchestrator().counters().fight_ticks, 60);
}

#[tokio::test]
async fn knock_out_ends_round() {
    let mut runtime = runtime(humans(true)).await;
    let mut events = runtime.subscribe(Topic::Match);
    run_until_fighting(&mut runtime).await;

    runtime.orchestrator_mut().actor_mut(Side::First).health = 0.0;
    let result = run_until_round_over(&mut runtime).await;
    assert_eq!(result.reason, EndReason::KnockOut);
    assert_eq!(result.winner, Side::Second);
    assert_eq!(runtime.orchestrator().status(), RoundStatus::RoundEnd);

    let ended = drain(&mut events)
        .into_iter()
        .find_map(|event| match event {
            MatchEvent::RoundEnded { result, stats, .. } => Some((result, stats)),
            _ => None,
        })
        .expect("round end should be published");
    assert_eq!(ended.0, result);
    assert_eq!(ended.1.matches_played, 1);
    assert_eq!(ended.1.second_wins, 1);
}

/// After the restart delay a new round spawns with mirrored positions and
/// the countdown runs at the fast cadence.
#[tokio::test]
async fn round_restarts_after_delay() {
    let mut runtime = runtime(humans(true)).await;
    run_until_round_over(&mut runtime).await;
    let mut events = runtime.subscribe(Topic::Match);

    let mut frames = 0;
    while runtime.orchestrator().state().round == 1 {
        runtime.run_frame(&mut IdleInput).await;
        frames += 1;
        assert!(frames <= 6, "restart should fire after the delay");
    }
    assert_eq!(frames, 6);
    assert_eq!(runtime.orchestrator().status(), RoundStatus::Countdown);

    let spawned = drain(&mut events)
        .into_iter()
        .find_map(|event| match event {
            MatchEvent::RoundStarted {
                round,
                first_x,
                second_x,
                ..
            } => Some((round, first_x, second_x)),
            _ => None,
        })
        .expect("new round should be published");
    assert_eq!(spawned.0, 2);
    assert!((spawned.1 + spawned.2 - 750.0).abs() < 1e-9);
    assert!((250.0..310.0).contains(&spawned.1));

    let first = runtime.orchestrator().actor(Side::First);
    assert_eq!(first.health, runtime.orchestrator().config().actor.max_health);

    // The frame that starts the fight also runs its first tick.
    assert_eq!(run_until_fighting(&mut runtime).await, 4);
    assert_eq!(
        runtime.orchestrator().state().ticks_remaining,
        runtime.orchestrator().timing().match_ticks - 1
    );
}

/// A forced restart cancels the pending timer and starts a round at once.
#[tokio::test]
async fn restart_match_cancels_pending_restart() {
    let mut runtime = runtime(humans(true)).await;
    run_until_round_over(&mut runtime).await;
    assert!(runtime.orchestrator().restart_pending().is_some());

    runtime.restart_match();
    assert_eq!(runtime.orchestrator().restart_pending(), None);
    assert_eq!(runtime.orchestrator().state().round, 2);
    assert_eq!(runtime.orchestrator().status(), RoundStatus::Countdown);
}

/// Higher simulation speeds run several ticks per frame.
#[tokio::test]
async fn simulation_speed_multiplies_ticks() {
    let mut runtime = runtime(GameSettings {
        simulation_speed: 4,
        ..humans(true)
    })
    .await;
    run_until_fighting(&mut runtime).await;
    let before = runtime.orchestrator().state().ticks_remaining;
    runtime.run_frame(&mut IdleInput).await;
    assert_eq!(runtime.orchestrator().state().ticks_remaining, before - 4);
}
