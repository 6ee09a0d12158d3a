// TremorWatch — Sampling & Analysis Cadence
//
// Both clocks are driven by timestamps from the caller (µs since boot) so the
// same logic runs on the watch and under test. Nothing here sleeps.

/// Fixed-period sampling clock with a bounded catch-up per pass.
///
/// Periods beyond the cap are not recovered; they are only counted in
/// [`SampleClock::missed_periods`].
#[derive(Debug, Clone)]
pub struct SampleClock {
    period_us: u64,
    max_catch_up: u32,
    next_due_us: Option<u64>,
    missed: u64,
}

impl SampleClock {
    pub fn new(period_us: u64, max_catch_up: u32) -> Self {
        Self {
            period_us: period_us.max(1),
            max_catch_up: max_catch_up.max(1),
            next_due_us: None,
            missed: 0,
        }
    }

    /// Number of samples to take in this pass. The first call is due
    /// immediately and fixes the sampling phase.
    pub fn due(&mut self, now_us: u64) -> u32 {
        let next = *self.next_due_us.get_or_insert(now_us);
        if now_us < next {
            return 0;
        }

        let elapsed = (now_us - next) / self.period_us + 1;
        let take = elapsed.min(self.max_catch_up as u64);
        let dropped = elapsed - take;
        if dropped > 0 {
            self.missed += dropped;
            log::debug!("sample catch-up capped, {} period(s) dropped", dropped);
        }
        self.next_due_us = Some(next + elapsed * self.period_us);
        take as u32
    }

    /// Sample periods dropped by the catch-up cap since creation.
    pub fn missed_periods(&self) -> u64 {
        self.missed
    }

    pub fn period_us(&self) -> u64 {
        self.period_us
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisDecision {
    /// Not due yet.
    Idle,
    /// Due and the window is full: analyse now.
    Run,
    /// Due but the window is short; retry after the retry interval.
    Defer,
}

#[derive(Debug, Clone)]
pub struct AnalysisClock {
    period_us: u64,
    retry_us: u64,
    next_due_us: Option<u64>,
    deferrals: u32,
}

impl AnalysisClock {
    pub fn new(period_us: u64, retry_us: u64) -> Self {
        Self {
            period_us,
            retry_us: retry_us.max(1),
            next_due_us: None,
            deferrals: 0,
        }
    }

    /// Arm the clock one full period from `now_us`.
    pub fn start(&mut self, now_us: u64) {
        self.next_due_us = Some(now_us + self.period_us);
        self.deferrals = 0;
    }

    pub fn poll(&mut self, now_us: u64, window_complete: bool) -> AnalysisDecision {
        let due = *self
            .next_due_us
            .get_or_insert(now_us + self.period_us);
        if now_us < due {
            return AnalysisDecision::Idle;
        }

        if window_complete {
            self.start(now_us);
            AnalysisDecision::Run
        } else {
            self.next_due_us = Some(now_us + self.retry_us);
            self.deferrals += 1;
            AnalysisDecision::Defer
        }
    }

    /// Consecutive deferrals of the current window.
    pub fn deferrals(&self) -> u32 {
        self.deferrals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_on_schedule() {
        let mut clock = SampleClock::new(19_230, 8);
        assert_eq!(clock.due(0), 1);
        assert_eq!(clock.due(10_000), 0);
        assert_eq!(clock.due(19_230), 1);
        assert_eq!(clock.due(19_231), 0);
        assert_eq!(clock.missed_periods(), 0);
    }

    #[test]
    fn catches_up_a_few_periods() {
        let mut clock = SampleClock::new(1_000, 8);
        clock.due(0);
        assert_eq!(clock.due(5_500), 5);
        assert_eq!(clock.due(5_999), 0);
        assert_eq!(clock.due(6_000), 1);
        assert_eq!(clock.missed_periods(), 0);
    }

    #[test]
    fn catch_up_is_capped_and_counted() {
        let mut clock = SampleClock::new(1_000, 8);
        clock.due(0);
        // periods at 1000..=20000 → 20 due, 8 taken
        assert_eq!(clock.due(20_000), 8);
        assert_eq!(clock.missed_periods(), 12);
        // phase is kept after the drop
        assert_eq!(clock.due(20_999), 0);
        assert_eq!(clock.due(21_000), 1);
    }

    #[test]
    fn analysis_runs_after_one_period() {
        let mut clock = AnalysisClock::new(3_000_000, 20_000);
        clock.start(0);
        assert_eq!(clock.poll(2_999_999, true), AnalysisDecision::Idle);
        assert_eq!(clock.poll(3_000_000, true), AnalysisDecision::Run);
        assert_eq!(clock.poll(3_000_001, true), AnalysisDecision::Idle);
        assert_eq!(clock.poll(6_000_000, true), AnalysisDecision::Run);
    }

    #[test]
    fn incomplete_window_defers_by_retry_interval() {
        let mut clock = AnalysisClock::new(3_000_000, 20_000);
        clock.start(0);
        assert_eq!(clock.poll(3_000_000, false), AnalysisDecision::Defer);
        assert_eq!(clock.poll(3_010_000, true), AnalysisDecision::Idle);
        assert_eq!(clock.poll(3_020_000, false), AnalysisDecision::Defer);
        assert_eq!(clock.deferrals(), 2);
        assert_eq!(clock.poll(3_040_000, true), AnalysisDecision::Run);
        assert_eq!(clock.deferrals(), 0);
    }
}
