//! Fixed-rate driver for a [`Runtime`].
//!
//! Each loop frame runs [`Runtime::run_frame`], which performs up to
//! `simulation_speed` ticks. No frame waits on a script, except in lockstep
//! mode where the runtime settles replies between ticks.

use std::time::Duration;

use arena_core::RoundResult;
use tokio::time::{Interval, MissedTickBehavior};

use crate::api::InputProvider;
use crate::runtime::Runtime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pacing {
    /// One frame per `1 / fps` seconds of wall-clock time.
    #[default]
    Realtime,
    /// Frames back to back, yielding to the scheduler between them.
    Unpaced,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoopReport {
    pub frames: u64,
    /// Results of rounds finished during the run, in order.
    pub rounds: Vec<RoundResult>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GameLoop {
    pacing: Pacing,
}

impl GameLoop {
    pub fn new(pacing: Pacing) -> Self {
        Self { pacing }
    }

    /// Runs frames until `stop` returns true after one of them.
    pub async fn run<P, F>(&self, runtime: &mut Runtime, input: &mut P, mut stop: F) -> LoopReport
    where
        P: InputProvider + ?Sized,
        F: FnMut(&Runtime, &LoopReport) -> bool,
    {
        let mut report = LoopReport::default();
        let mut fps = runtime.settings().fps;
        let mut interval = self.interval(fps);

        loop {
            match interval.as_mut() {
                Some(interval) => {
                    interval.tick().await;
                }
                None => tokio::task::yield_now().await,
            }

            if let Some(result) = runtime.run_frame(input).await {
                report.rounds.push(result);
            }
            report.frames += 1;

            if stop(runtime, &report) {
                break;
            }

            if runtime.settings().fps != fps {
                fps = runtime.settings().fps;
                interval = self.interval(fps);
                tracing::debug!(fps, "frame rate changed");
            }
        }

        tracing::debug!(frames = report.frames, rounds = report.rounds.len(), "game loop stopped");
        report
    }

    fn interval(&self, fps: u32) -> Option<Interval> {
        match self.pacing {
            Pacing::Realtime => {
                let period = Duration::from_secs_f64(1.0 / f64::from(fps.max(1)));
                let mut interval = tokio::time::interval(period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                Some(interval)
            }
            Pacing::Unpaced => None,
        }
    }
}
