//! End-to-end: source text through analysis, compilation and decision calls.

use arena_core::{ActorSnapshot, Decision, ScriptSlot};
use arena_script::{
    CompileError, CompileOptions, Limits, LoopKind, ScriptError, analyze, compile,
};

fn snapshots() -> (ActorSnapshot, ActorSnapshot) {
    let me = ActorSnapshot {
        x: 280.0,
        y: 305.0,
        health: 100.0,
        energy: 100.0,
        direction: 1,
        width: 55.0,
        height: 110.0,
        ..Default::default()
    };
    let opponent = ActorSnapshot {
        x: 470.0,
        direction: -1,
        ..me
    };
    (me, opponent)
}

fn decide_with(source: &str) -> arena_script::Invocation {
    let (me, opponent) = snapshots();
    let mut script = compile(source, &CompileOptions::default()).unwrap();
    script.decide(&me, &opponent)
}

#[test]
fn unconditional_loop_is_rejected_before_running() {
    let source = "let ran = false\n\
                  function decide(self, opponent) {\n\
                  \x20 while (true) { }\n\
                  }";
    let err = compile(source, &CompileOptions::default()).unwrap_err();
    let CompileError::UnsafeLoops(report) = &err else {
        panic!("expected unsafe loop rejection, got {err:?}");
    };
    assert_eq!(report.loops.len(), 1);
    assert_eq!(report.loops[0].line, 3);
    assert_eq!(report.loops[0].kind, LoopKind::While);
    assert!(err.to_string().contains("Line 3"));
}

#[test]
fn loop_with_conditional_break_is_accepted() {
    let source = "function decide(self, opponent) {\n\
                  let steps = 0\n\
                  while (true) { steps++; if (steps > 3) break }\n\
                  return { left: steps === 4 }\n\
                  }";
    assert!(analyze(source).is_safe());
    assert!(decide_with(source).decision.move_left);
}

#[test]
fn break_in_inner_loop_or_return_in_nested_function_is_not_an_exit() {
    let inner_break = "function decide(s, o) { for (;;) { while (s.x > 0) { break } } }";
    let nested_return = "function decide(s, o) { do { const f = function () { return 1 } } while (1) }";
    for source in [inner_break, nested_return] {
        assert!(matches!(
            compile(source, &CompileOptions::default()),
            Err(CompileError::UnsafeLoops(_))
        ));
    }
}

#[test]
fn missing_entry_point() {
    for source in ["function think(self, opponent) { return {} }", "const decide = 5"] {
        let err = compile(source, &CompileOptions::default()).unwrap_err();
        assert_eq!(err, CompileError::EntryPointMissing);
        assert!(err.to_string().contains("no decision entry point found"));
    }
}

#[test]
fn syntax_error_reports_the_line() {
    let err = compile("function decide(self, opponent) {\n  return {\n}", &CompileOptions::default())
        .unwrap_err();
    let CompileError::Syntax(syntax) = err else {
        panic!("expected syntax error, got {err:?}");
    };
    assert_eq!(syntax.line, 3);
}

#[test]
fn top_level_failure_is_a_compile_error() {
    let err = compile("const x = missing.field\nfunction decide() {}", &CompileOptions::default())
        .unwrap_err();
    assert!(matches!(err, CompileError::TopLevel(ScriptError::Reference(_))));
}

#[test]
fn runtime_error_yields_neutral_and_records_message() {
    let invocation = decide_with("function decide(self, opponent) { return self.nothing.left }");
    assert!(invocation.decision.is_neutral());
    let error = invocation.error.unwrap();
    assert!(error.to_string().contains("Cannot read properties of undefined"));

    let thrown = decide_with("function decide(self, opponent) { throw 'no plan' }");
    assert_eq!(thrown.error, Some(ScriptError::Thrown("no plan".into())));
}

#[test]
fn runaway_loop_hits_the_budget() {
    let options = CompileOptions {
        limits: Limits {
            budget: 5_000,
            max_call_depth: 64,
        },
        seed: 0,
    };
    // Condition depends on data, so static analysis lets it through.
    let source = "function decide(self, opponent) { while (self.health > 0) { } return { left: true } }";
    let (me, opponent) = snapshots();
    let mut script = compile(source, &options).unwrap();
    let invocation = script.decide(&me, &opponent);
    assert_eq!(invocation.decision, Decision::NEUTRAL);
    assert_eq!(invocation.error, Some(ScriptError::BudgetExceeded(5_000)));

    // The next call starts with a full budget again.
    let again = script.decide(&me, &opponent);
    assert_eq!(again.error, Some(ScriptError::BudgetExceeded(5_000)));
}

#[test]
fn only_boolean_true_counts() {
    let invocation = decide_with(
        "function decide(self, opponent) {\n\
         return { left: 1, right: 'yes', up: true, down: null, action1: {}, action3: true }\n\
         }",
    );
    assert_eq!(
        invocation.decision,
        Decision {
            jump: true,
            guard: true,
            ..Decision::NEUTRAL
        }
    );
    assert!(decide_with("function decide() { return 'left' }").decision.is_neutral());
    assert!(decide_with("function decide() { }").decision.is_neutral());
}

#[test]
fn globals_persist_between_calls_but_snapshots_do_not() {
    let source = "let calls = 0\n\
                  function decide(self, opponent) {\n\
                  calls++\n\
                  self.x = -1\n\
                  return { left: calls === 3, right: self.x === -1 && calls === 1 }\n\
                  }";
    let (me, opponent) = snapshots();
    let mut script = compile(source, &CompileOptions::default()).unwrap();
    assert!(script.decide(&me, &opponent).decision.move_right);
    assert!(script.decide(&me, &opponent).decision.is_neutral());
    assert!(script.decide(&me, &opponent).decision.move_left);
    assert_eq!(me.x, 280.0);
}

#[test]
fn seeded_random_is_reproducible() {
    let source = "function decide() { return { left: Math.random() < 0.5, right: Math.random() < 0.5 } }";
    let (me, opponent) = snapshots();
    let options = CompileOptions {
        seed: 42,
        ..Default::default()
    };
    let mut a = compile(source, &options).unwrap();
    let mut b = compile(source, &options).unwrap();
    for _ in 0..20 {
        assert_eq!(a.decide(&me, &opponent), b.decide(&me, &opponent));
    }
}

#[test]
fn templates_compile_and_decide() {
    let (me, opponent) = snapshots();
    for slot in [ScriptSlot::A, ScriptSlot::B] {
        let mut script = compile(arena_content::template_for(slot), &CompileOptions::default())
            .unwrap_or_else(|e| panic!("{slot} template: {e}"));
        for _ in 0..50 {
            let invocation = script.decide(&me, &opponent);
            assert_eq!(invocation.error, None, "{slot} template failed");
        }
    }
}

#[test]
fn strategic_template_guards_against_a_close_light_attack() {
    let (me, mut opponent) = snapshots();
    opponent.x = me.x + 80.0;
    opponent.state = 5;
    opponent.cooldown = 15;
    let mut script = compile(arena_content::STRATEGIC_TEMPLATE, &CompileOptions::default()).unwrap();
    let decision = script.decide(&me, &opponent).decision;
    assert!(decision.guard);
    assert!(!decision.attack_light && !decision.attack_heavy);
}
