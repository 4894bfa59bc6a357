//! Fixed-interval tick scheduling, decoupled from the render frame rate.

/// Accumulates wall-clock time and releases whole fixed-period ticks.
///
/// Used by models whose state integrates on a steady timer (the wind
/// turbine's 20 Hz charge loop) while rendering runs at whatever rate the
/// host delivers. The owner calls [`FixedTicker::advance`] once per frame
/// and runs its tick body that many times.
#[derive(Debug, Clone)]
pub struct FixedTicker {
    period: f64,
    accumulator: f64,
    max_ticks_per_frame: u32,
}

impl FixedTicker {
    /// A ticker firing every `period` seconds. Periods at or below zero are
    /// treated as 1 ms to keep the accumulator finite.
    pub fn new(period: f64) -> Self {
        FixedTicker {
            period: if period > 0.0 { period } else { 1e-3 },
            accumulator: 0.0,
            max_ticks_per_frame: 8,
        }
    }

    pub fn with_max_ticks_per_frame(mut self, max: u32) -> Self {
        self.max_ticks_per_frame = max.max(1);
        self
    }

    /// Feed `dt` seconds of wall time; returns how many ticks are due.
    ///
    /// The count is capped so a stalled frame cannot unwind into a tick
    /// storm; excess backlog is discarded along with the cap.
    pub fn advance(&mut self, dt: f64) -> u32 {
        if dt.is_finite() && dt > 0.0 {
            self.accumulator += dt;
        }
        let mut ticks = (self.accumulator / self.period).floor() as u32;
        self.accumulator -= ticks as f64 * self.period;
        if ticks > self.max_ticks_per_frame {
            ticks = self.max_ticks_per_frame;
        }
        ticks
    }

    /// Clear pending time. Called when the parameter the tick body reads has
    /// changed, so the reschedule is atomic and no stale partial period fires.
    pub fn restart(&mut self) {
        self.accumulator = 0.0;
    }

    pub fn period(&self) -> f64 {
        self.period
    }
}
