use arena_core::{ActionState, ActorSnapshot, Facing, RoundStatus, ScriptSlot, Side};
use arena_runtime::{
    Event, FileScriptRepository, FileSettingsRepository, GameSettings, IdleInput,
    InMemoryScriptRepo, PlayerType, Runtime, RuntimeConfig, ScriptEvent, Topic, import_script,
};

const WALK_RIGHT: &str = "function decide(self, opponent) { return { right: true } }";
const WALK_LEFT: &str = "function decide(self, opponent) { return { left: true } }";

fn lockstep_config(seed: u64) -> RuntimeConfig {
    RuntimeConfig {
        countdown_step_ms: 17,
        fast_countdown_step_ms: 17,
        restart_delay_ms: 17,
        seed,
        lockstep: true,
        ..RuntimeConfig::default()
    }
}

/// A human on the left against slot A on the right.
fn against_slot_a() -> GameSettings {
    GameSettings {
        player1: PlayerType::Human,
        player2: PlayerType::CustomA,
        running: true,
        ..GameSettings::default()
    }
}

async fn run_until_fighting(runtime: &mut Runtime) {
    for _ in 0..100 {
        if runtime.orchestrator().status() == RoundStatus::Fighting {
            return;
        }
        runtime.run_frame(&mut IdleInput).await;
    }
    panic!("round never started");
}

async fn frames(runtime: &mut Runtime, count: usize) {
    for _ in 0..count {
        runtime.run_frame(&mut IdleInput).await;
    }
}

/// Recompiling mid-match swaps the live script: once the new worker answers,
/// only its decisions reach the actor.
#[tokio::test]
async fn recompile_mid_match_applies_newest_script() {
    let mut runtime = Runtime::builder()
        .config(lockstep_config(3))
        .settings(against_slot_a())
        .script_repository(InMemoryScriptRepo::with_script(ScriptSlot::A, WALK_RIGHT))
        .build()
        .await
        .expect("runtime should build");
    assert!(runtime.scripts().is_ready(ScriptSlot::A));

    run_until_fighting(&mut runtime).await;
    frames(&mut runtime, 5).await;
    let actor = runtime.orchestrator().actor(Side::Second);
    assert_eq!(actor.facing, Facing::Right);
    assert_eq!(actor.state, ActionState::MoveRight);
    let generation = runtime.scripts().runtime(ScriptSlot::A).generation();

    let outcome = runtime
        .save_script(ScriptSlot::A, WALK_LEFT)
        .await
        .expect("script should save");
    assert!(outcome.success, "{:?}", outcome.error);
    assert!(runtime.scripts().runtime(ScriptSlot::A).generation() > generation);

    // First tick after the swap requests, the second one uses the reply.
    frames(&mut runtime, 2).await;
    for _ in 0..10 {
        let actor = runtime.orchestrator().actor(Side::Second);
        assert_eq!(actor.facing, Facing::Left);
        assert_ne!(actor.state, ActionState::MoveRight);
        frames(&mut runtime, 1).await;
    }
}

/// A script with a loop that never exits is rejected on the host and the
/// slot stays unusable.
#[tokio::test]
async fn unsafe_script_is_rejected() {
    let mut runtime = Runtime::builder()
        .config(lockstep_config(3))
        .settings(against_slot_a())
        .build()
        .await
        .expect("runtime should build");
    let mut events = runtime.subscribe(Topic::Script);

    let outcome = runtime
        .save_script(ScriptSlot::B, "function decide(self, opponent) {\n  while (true) {}\n}")
        .await
        .expect("script should save");
    assert!(!outcome.success);
    let diagnostic = outcome.error.expect("diagnostic should be set");
    assert!(diagnostic.contains("infinite loop"));
    assert!(diagnostic.contains("Line 2: infinite while loop"));
    assert!(!runtime.scripts().is_ready(ScriptSlot::B));
    assert_eq!(runtime.scripts().last_error(ScriptSlot::B), Some(diagnostic.as_str()));

    match events.try_recv() {
        Ok(Event::Script(ScriptEvent::Compiled { slot, success, .. })) => {
            assert_eq!(slot, ScriptSlot::B);
            assert!(!success);
        }
        other => panic!("expected a compile event, got {other:?}"),
    }
}

#[tokio::test]
async fn syntax_error_is_reported() {
    let mut runtime = Runtime::builder()
        .config(lockstep_config(3))
        .settings(against_slot_a())
        .build()
        .await
        .expect("runtime should build");

    let outcome = runtime
        .save_script(ScriptSlot::B, "function decide(self, opponent) { return {")
        .await
        .expect("script should save");
    assert!(!outcome.success);
    assert!(outcome.error.is_some());
    assert!(!runtime.scripts().is_ready(ScriptSlot::B));
}

/// A decision call that throws leaves the actor on neutral input and records
/// the message.
#[tokio::test]
async fn runtime_error_falls_back_to_neutral() {
    let mut runtime = Runtime::builder()
        .config(lockstep_config(3))
        .settings(against_slot_a())
        .script_repository(InMemoryScriptRepo::with_script(
            ScriptSlot::A,
            "function decide(self, opponent) { return missing() }",
        ))
        .build()
        .await
        .expect("runtime should build");
    assert!(runtime.scripts().is_ready(ScriptSlot::A));

    run_until_fighting(&mut runtime).await;
    frames(&mut runtime, 5).await;

    let error = runtime
        .scripts()
        .last_error(ScriptSlot::A)
        .expect("error should be recorded");
    assert!(error.contains("missing is not defined"));
    let actor = runtime.orchestrator().actor(Side::Second);
    assert_eq!(actor.state, ActionState::Idle);
    assert_eq!(actor.facing, Facing::Left);
}

async fn template_match(seed: u64) -> (ActorSnapshot, ActorSnapshot, u64) {
    let mut runtime = Runtime::builder()
        .config(lockstep_config(seed))
        .settings(GameSettings {
            player1: PlayerType::CustomA,
            player2: PlayerType::CustomB,
            running: true,
            ..GameSettings::default()
        })
        .build()
        .await
        .expect("runtime should build");
    assert!(runtime.scripts().is_ready(ScriptSlot::A));
    assert!(runtime.scripts().is_ready(ScriptSlot::B));

    frames(&mut runtime, 600).await;
    let orchestrator = runtime.orchestrator();
    let snapshots = (
        orchestrator.actor(Side::First).snapshot(),
        orchestrator.actor(Side::Second).snapshot(),
        orchestrator.counters().fight_ticks,
    );
    runtime.shutdown();
    snapshots
}

/// In lockstep both templates fight the same way for the same seed.
#[tokio::test]
async fn lockstep_template_match_is_reproducible() {
    let first = template_match(42).await;
    let second = template_match(42).await;
    assert_eq!(first, second);
    assert!(first.2 > 0);
}

/// Settings and scripts survive a restart through the file repositories.
#[tokio::test]
async fn file_repositories_persist_between_sessions() {
    let dir = tempfile::tempdir().expect("tempdir");
    let scripts_dir = dir.path().join("scripts");
    let settings_path = dir.path().join("settings.json");

    let mut runtime = Runtime::builder()
        .config(lockstep_config(5))
        .script_repository(FileScriptRepository::new(&scripts_dir).expect("script repo"))
        .settings_repository(FileSettingsRepository::new(&settings_path).expect("settings repo"))
        .build()
        .await
        .expect("runtime should build");
    assert_eq!(runtime.settings(), &GameSettings::default());

    runtime
        .update_settings(GameSettings {
            fps: 30,
            simulation_speed: 3,
            player2: PlayerType::CustomB,
            running: true,
            ..GameSettings::default()
        })
        .await
        .expect("settings should apply");
    assert!(runtime.scripts().is_ready(ScriptSlot::B));
    let outcome = runtime
        .save_script(ScriptSlot::B, WALK_LEFT)
        .await
        .expect("script should save");
    assert!(outcome.success);
    runtime.shutdown();
    assert!(scripts_dir.join("slot2.js").exists());

    let runtime = Runtime::builder()
        .config(lockstep_config(5))
        .script_repository(FileScriptRepository::new(&scripts_dir).expect("script repo"))
        .settings_repository(FileSettingsRepository::new(&settings_path).expect("settings repo"))
        .build()
        .await
        .expect("runtime should build");
    let settings = runtime.settings();
    assert_eq!(settings.fps, 30);
    assert_eq!(settings.simulation_speed, 3);
    assert_eq!(settings.player2, PlayerType::CustomB);
    assert!(!settings.running, "sessions always start paused");
    assert!(runtime.scripts().is_ready(ScriptSlot::B));

    let exported = runtime.export_script(ScriptSlot::B).expect("export");
    assert_eq!(import_script(&exported).as_deref(), Some(WALK_LEFT));
    let template = runtime.export_script(ScriptSlot::A).expect("export");
    assert_eq!(
        import_script(&template).as_deref(),
        Some(arena_content::template_for(ScriptSlot::A))
    );
}

/// Invalid settings are refused and nothing changes.
#[tokio::test]
async fn invalid_settings_are_rejected() {
    let mut runtime = Runtime::builder()
        .config(lockstep_config(5))
        .build()
        .await
        .expect("runtime should build");

    let result = runtime
        .update_settings(GameSettings {
            player2: PlayerType::Human,
            ..GameSettings::default()
        })
        .await;
    assert!(result.is_err());
    let result = runtime
        .update_settings(GameSettings {
            fps: 10,
            ..GameSettings::default()
        })
        .await;
    assert!(result.is_err());
    assert_eq!(runtime.settings(), &GameSettings::default());
}
