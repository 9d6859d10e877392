use std::time::{Duration, Instant};

use serde::Serialize;

/// A started wall-clock span. Callers time their own query and write
/// phases with this and feed the results into [`PhaseDurations`]; the
/// engine never blocks on I/O to measure anything.
#[derive(Debug)]
pub struct PhaseTimer {
    started: Instant,
}

impl PhaseTimer {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn stop(self) -> Duration {
        self.started.elapsed()
    }
}

/// Wall-clock totals for one audit run, or for a whole batch. An explicit
/// value the batch loop threads along, not process state.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PhaseDurations {
    pub query_left: Duration,
    pub query_right: Duration,
    pub compare: Duration,
    pub write: Duration,
}

impl PhaseDurations {
    pub fn total(&self) -> Duration {
        self.query_left + self.query_right + self.compare + self.write
    }

    /// Fold one run's durations into a batch total.
    pub fn accumulate(&mut self, other: &PhaseDurations) {
        self.query_left += other.query_left;
        self.query_right += other.query_right;
        self.compare += other.compare;
        self.write += other.write;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulate_sums_each_phase() {
        let mut totals = PhaseDurations::default();
        let run = PhaseDurations {
            query_left: Duration::from_secs(2),
            query_right: Duration::from_secs(3),
            compare: Duration::from_secs(1),
            write: Duration::from_secs(4),
        };
        totals.accumulate(&run);
        totals.accumulate(&run);
        assert_eq!(totals.query_left, Duration::from_secs(4));
        assert_eq!(totals.query_right, Duration::from_secs(6));
        assert_eq!(totals.compare, Duration::from_secs(2));
        assert_eq!(totals.write, Duration::from_secs(8));
        assert_eq!(totals.total(), Duration::from_secs(20));
    }

    #[test]
    fn timer_measures_elapsed() {
        let timer = PhaseTimer::start();
        let elapsed = timer.stop();
        assert!(elapsed < Duration::from_secs(5));
    }
}
