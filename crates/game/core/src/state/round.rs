use super::Side;

/// Phase of the current round.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundStatus {
    #[default]
    Waiting,
    Countdown,
    Fighting,
    RoundEnd,
}

impl RoundStatus {
    pub const fn is_fighting(self) -> bool {
        matches!(self, Self::Fighting)
    }
}

/// Why a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EndReason {
    KnockOut,
    Timeout,
}

/// Outcome of a finished round.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundResult {
    pub winner: Side,
    pub reason: EndReason,
    pub first_health: f64,
    pub second_health: f64,
}

impl RoundResult {
    /// Strictly greater health wins; a tie is credited to the second side.
    pub fn decide(first_health: f64, second_health: f64, reason: EndReason) -> Self {
        let winner = if first_health > second_health {
            Side::First
        } else {
            Side::Second
        };
        Self {
            winner,
            reason,
            first_health,
            second_health,
        }
    }
}

/// Session-wide tally; survives round restarts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionStats {
    pub matches_played: u32,
    pub first_wins: u32,
    pub second_wins: u32,
}

impl SessionStats {
    pub fn record(&mut self, result: &RoundResult) {
        self.matches_played += 1;
        match result.winner {
            Side::First => self.first_wins += 1,
            Side::Second => self.second_wins += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tie_goes_to_second_side() {
        let result = RoundResult::decide(40.0, 40.0, EndReason::Timeout);
        assert_eq!(result.winner, Side::Second);
    }

    #[test]
    fn record_counts_matches_and_wins() {
        let mut stats = SessionStats::default();
        stats.record(&RoundResult::decide(50.0, 0.0, EndReason::KnockOut));
        stats.record(&RoundResult::decide(0.0, 0.0, EndReason::KnockOut));
        assert_eq!(stats.matches_played, 2);
        assert_eq!(stats.first_wins, 1);
        assert_eq!(stats.second_wins, 1);
    }
}
