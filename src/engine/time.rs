//! Time management.
//!
//! A `go` command yields a [`TimeControl`]; [`TimeControl::limits`] turns it
//! into a soft limit (no new iteration starts after it) and a hard limit (the
//! search is stopped when it passes).

use std::time::Duration;

/// Usable clock (ms) under which the engine plays from its reserves.
const LOW_CLOCK_MS: u64 = 5000;
/// Remaining time (ms) above the overhead under which half the clock is spent.
const FLAG_MARGIN_MS: u64 = 50;
const MIN_HORIZON: u64 = 10;

/// Tunables for turning a clock into limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeConfig {
    /// Reserved per move for GUI and pipe latency
    pub move_overhead_ms: u64,
    /// Cap on the soft limit, as a percentage of the usable clock
    pub soft_time_percent: u64,
    /// Cap on the hard limit, as a percentage of the usable clock
    pub hard_time_percent: u64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            move_overhead_ms: 50,
            soft_time_percent: 70,
            hard_time_percent: 90,
        }
    }
}

/// The side to move's clock, as given by `wtime`/`btime`, `winc`/`binc`
/// and `movestogo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Clock {
    pub remaining_ms: u64,
    pub increment_ms: u64,
    pub moves_to_go: Option<u64>,
}

/// What bounds a search in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeControl {
    #[default]
    Infinite,
    /// Only depth or node limits apply
    Depth,
    /// `go movetime`: spend exactly this long
    MoveTime(u64),
    Clock(Clock),
}

/// Soft and hard limits for one search; `None` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeLimits {
    pub soft: Option<Duration>,
    pub hard: Option<Duration>,
}

impl TimeLimits {
    pub const UNLIMITED: TimeLimits = TimeLimits {
        soft: None,
        hard: None,
    };

    fn millis(soft: u64, hard: u64) -> Self {
        TimeLimits {
            soft: Some(Duration::from_millis(soft.max(1))),
            hard: Some(Duration::from_millis(hard.max(soft).max(1))),
        }
    }
}

impl TimeControl {
    /// No clock involved.
    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        matches!(self, TimeControl::Infinite | TimeControl::Depth)
    }

    #[must_use]
    pub fn limits(&self, config: &TimeConfig) -> TimeLimits {
        match *self {
            TimeControl::Infinite | TimeControl::Depth => TimeLimits::UNLIMITED,
            // movetime is honoured as given; the GUI already accounts for latency
            TimeControl::MoveTime(ms) => TimeLimits::millis(ms, ms),
            TimeControl::Clock(clock) => clock.limits(config),
        }
    }
}

impl Clock {
    fn limits(&self, config: &TimeConfig) -> TimeLimits {
        let overhead = config.move_overhead_ms;
        if self.remaining_ms <= overhead.saturating_add(FLAG_MARGIN_MS) {
            let half = self.remaining_ms / 2;
            return TimeLimits::millis(half, half);
        }

        let usable = self.remaining_ms - overhead;
        if usable < LOW_CLOCK_MS {
            // Shrinks quadratically: 5% of the clock at 5 s, almost nothing near zero
            let share = usable * usable / (20 * LOW_CLOCK_MS) + self.increment_ms;
            return TimeLimits::millis(share.min(usable / 5), usable / 3);
        }

        let share = usable / self.horizon(usable) + self.increment_ms;
        let soft = share.min(usable * config.soft_time_percent / 100);
        TimeLimits::millis(soft, usable * config.hard_time_percent / 100)
    }

    /// Moves the remaining time has to last.
    fn horizon(&self, usable: u64) -> u64 {
        let expected = self.moves_to_go.unwrap_or(match usable {
            300_001.. => 40,
            60_001..=300_000 => 30,
            _ => 25,
        });
        expected.max(MIN_HORIZON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tight() -> TimeConfig {
        TimeConfig {
            move_overhead_ms: 50,
            soft_time_percent: 5,
            hard_time_percent: 20,
        }
    }

    fn clock(remaining_ms: u64, increment_ms: u64, moves_to_go: Option<u64>) -> TimeControl {
        TimeControl::Clock(Clock {
            remaining_ms,
            increment_ms,
            moves_to_go,
        })
    }

    fn soft_hard(tc: TimeControl, config: &TimeConfig) -> (u64, u64) {
        let limits = tc.limits(config);
        let ms = |d: Option<Duration>| d.unwrap().as_millis() as u64;
        (ms(limits.soft), ms(limits.hard))
    }

    #[test]
    fn test_clockless_controls_are_unlimited() {
        for tc in [TimeControl::Infinite, TimeControl::Depth] {
            assert!(tc.is_unlimited());
            assert_eq!(tc.limits(&tight()), TimeLimits::UNLIMITED);
        }
        assert!(!TimeControl::MoveTime(10).is_unlimited());
        assert!(!clock(1000, 0, None).is_unlimited());
    }

    #[test]
    fn test_movetime_ignores_overhead() {
        assert_eq!(soft_hard(TimeControl::MoveTime(5000), &tight()), (5000, 5000));
        assert_eq!(soft_hard(TimeControl::MoveTime(0), &tight()), (1, 1));
    }

    #[test]
    fn test_moves_to_go_splits_the_clock() {
        // (60000 - 50) / 20, under the 70% soft cap
        let (soft, hard) = soft_hard(clock(60_000, 0, Some(20)), &TimeConfig::default());
        assert_eq!(soft, 2997);
        assert_eq!(hard, 53_955);
    }

    #[test]
    fn test_small_moves_to_go_is_floored() {
        let config = TimeConfig::default();
        assert_eq!(
            soft_hard(clock(60_000, 0, Some(1)), &config),
            soft_hard(clock(60_000, 0, Some(10)), &config)
        );
    }

    #[test]
    fn test_increment_is_added_to_the_share() {
        let (soft, hard) = soft_hard(clock(300_000, 3000, None), &tight());
        // 299950 / 30 + 3000, just under 5% of the usable clock
        assert_eq!(soft, 12_998);
        assert_eq!(hard, 59_990);

        let (soft, hard) = soft_hard(clock(600_000, 5000, None), &TimeConfig::default());
        assert_eq!(soft, 599_950 / 40 + 5000);
        assert!(hard > soft);
    }

    #[test]
    fn test_low_clock_spends_little() {
        let (soft, hard) = soft_hard(clock(3000, 0, None), &tight());
        // 2950 * 2950 / 100000
        assert_eq!(soft, 87);
        assert_eq!(hard, 983);
        assert!(soft < 3000 / 5);
    }

    #[test]
    fn test_nearly_flagged_spends_half() {
        assert_eq!(soft_hard(clock(100, 0, None), &tight()), (50, 50));

        let no_overhead = TimeConfig {
            move_overhead_ms: 0,
            ..tight()
        };
        assert_eq!(soft_hard(clock(0, 0, None), &no_overhead), (1, 1));
    }
}
