//! Headless match runner.

use std::path::Path;

use anyhow::{Context, Result};
use arena_core::{ControlSource, Side};
use arena_runtime::{GameLoop, IdleInput, LoopReport, Pacing, Runtime};
use clap::Parser;

use super::{PlayerArg, open_runtime};

/// Play rounds with the stored scripts and print the results
#[derive(Parser, Debug)]
pub struct Run {
    /// Rounds to play before exiting
    #[arg(long, default_value_t = 3)]
    pub rounds: usize,

    /// Pace frames at the configured fps instead of running flat out
    #[arg(long)]
    pub realtime: bool,

    /// Player 1 control (default: stored settings)
    #[arg(long, value_enum)]
    pub player1: Option<PlayerArg>,

    /// Player 2 control (default: stored settings)
    #[arg(long, value_enum)]
    pub player2: Option<PlayerArg>,
}

impl Run {
    pub async fn execute(self, data_dir: &Path) -> Result<()> {
        let mut runtime = open_runtime(data_dir).await?;

        let mut settings = runtime.settings().clone();
        if let Some(player) = self.player1 {
            settings.player1 = player.into();
        }
        if let Some(player) = self.player2 {
            settings.player2 = player.into();
        }
        settings.running = true;
        runtime
            .update_settings(settings)
            .await
            .context("Invalid player selection")?;

        for side in [Side::First, Side::Second] {
            let control = runtime.settings().control(side);
            match control {
                ControlSource::Human => {
                    tracing::warn!("{} is human; without a terminal it stands idle", side)
                }
                ControlSource::Script(slot) => {
                    if let Some(error) = runtime.scripts().last_error(slot) {
                        tracing::warn!("{} ({}) has an error: {}", side, slot, error);
                    }
                }
            }
        }

        let pacing = if self.realtime {
            Pacing::Realtime
        } else {
            Pacing::Unpaced
        };
        let rounds = self.rounds.max(1);
        let game_loop = GameLoop::new(pacing);

        let mut input = IdleInput;
        let report = tokio::select! {
            report = game_loop.run(&mut runtime, &mut input, |_, report| {
                report.rounds.len() >= rounds
            }) => Some(report),
            _ = tokio::signal::ctrl_c() => None,
        };

        match report {
            Some(report) => print_report(&runtime, &report),
            None => tracing::info!("Interrupted"),
        }

        // The saved settings should not leave the next session running.
        runtime.set_running(false)?;
        runtime.shutdown();
        Ok(())
    }
}

fn print_report(runtime: &Runtime, report: &LoopReport) {
    for (index, result) in report.rounds.iter().enumerate() {
        println!(
            "round {}: {} wins by {} ({:.1} vs {:.1})",
            index + 1,
            result.winner,
            result.reason,
            result.first_health,
            result.second_health
        );
    }

    let stats = runtime.orchestrator().stats();
    println!(
        "{} frames, {} rounds: player 1 won {}, player 2 won {}",
        report.frames, stats.matches_played, stats.first_wins, stats.second_wins
    );
}
