//! Frame-counted timers.
//!
//! Timers are configured in milliseconds and converted to loop frames once,
//! so a run is reproducible at any wall-clock speed.

/// The match clock is counted in simulation ticks, 60 to the second.
pub const TICKS_PER_SECOND: u32 = 60;

pub const DEFAULT_MATCH_SECONDS: u32 = 90;
pub const DEFAULT_COUNTDOWN_STEP_MS: u64 = 700;
pub const DEFAULT_FAST_COUNTDOWN_STEP_MS: u64 = 233;
pub const DEFAULT_RESTART_DELAY_MS: u64 = 1000;

/// Loop frames covering `ms` at `fps`; never less than one.
pub fn frames_for(ms: u64, fps: u32) -> u32 {
    let frames = (ms as f64 * f64::from(fps) / 1000.0).round();
    if frames >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        (frames as u32).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchTiming {
    /// Frames per countdown step in a session's first round.
    pub countdown_step: u32,
    /// Frames per countdown step in later rounds.
    pub fast_countdown_step: u32,
    /// Frames between a round ending and the next one spawning.
    pub restart_delay: u32,
    /// Simulation ticks in one round.
    pub match_ticks: u32,
}

impl MatchTiming {
    pub fn from_millis(
        fps: u32,
        countdown_step_ms: u64,
        fast_countdown_step_ms: u64,
        restart_delay_ms: u64,
        match_seconds: u32,
    ) -> Self {
        Self {
            countdown_step: frames_for(countdown_step_ms, fps),
            fast_countdown_step: frames_for(fast_countdown_step_ms, fps),
            restart_delay: frames_for(restart_delay_ms, fps),
            match_ticks: match_seconds.saturating_mul(TICKS_PER_SECOND).max(1),
        }
    }

    /// Default cadence at `fps`.
    pub fn for_fps(fps: u32) -> Self {
        Self::from_millis(
            fps,
            DEFAULT_COUNTDOWN_STEP_MS,
            DEFAULT_FAST_COUNTDOWN_STEP_MS,
            DEFAULT_RESTART_DELAY_MS,
            DEFAULT_MATCH_SECONDS,
        )
    }
}

impl Default for MatchTiming {
    fn default() -> Self {
        Self::for_fps(60)
    }
}

/// One-shot countdown over loop frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTimer {
    remaining: u32,
}

impl FrameTimer {
    pub fn new(frames: u32) -> Self {
        Self {
            remaining: frames.max(1),
        }
    }

    /// Counts one frame; true on the frame the timer fires.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_convert_to_rounded_frames() {
        assert_eq!(frames_for(700, 60), 42);
        assert_eq!(frames_for(233, 60), 14);
        assert_eq!(frames_for(1000, 30), 30);
        assert_eq!(frames_for(0, 60), 1);
    }

    #[test]
    fn default_timing_at_sixty_fps() {
        let timing = MatchTiming::default();
        assert_eq!(timing.countdown_step, 42);
        assert_eq!(timing.restart_delay, 60);
        assert_eq!(timing.match_ticks, 90 * 60);
    }

    #[test]
    fn timer_fires_once_after_its_frames() {
        let mut timer = FrameTimer::new(2);
        assert!(!timer.tick());
        assert!(timer.tick());
        assert_eq!(timer.remaining(), 0);
    }
}
