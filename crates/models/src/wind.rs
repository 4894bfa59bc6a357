//! Wind turbine charging a local grid battery.
//!
//! Energy integrates on a fixed 20 Hz tick independent of the render rate;
//! the rotor angle accumulates per render frame and is visual only.

use serde::{Deserialize, Serialize};
use simcore::{FixedTicker, Model, clamp_domain};

/// Below this wind speed the rotor stalls and generates nothing.
pub const CUT_IN: f64 = 20.0;
/// Above this wind speed the rotor is braked for safety.
pub const CUT_OUT: f64 = 85.0;
/// Seconds between charge ticks (20 Hz).
pub const TICK_PERIOD: f64 = 0.05;
/// Fraction of normalized wind speed converted to charge per tick.
pub const CHARGE_FACTOR: f64 = 0.6;
/// Constant grid draw per tick.
pub const CONSUMPTION_RATE: f64 = 0.15;
/// Rotor angle advance per render frame per unit rpm.
pub const ROTATION_PER_FRAME: f64 = 0.25;

/// Rotor operating band, a pure function of wind speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindStatus {
    NoWind,
    Stalled,
    Braked,
    Optimal,
}

impl WindStatus {
    pub fn label(self) -> &'static str {
        match self {
            WindStatus::NoWind => "NO WIND",
            WindStatus::Stalled => "STALLED (LOW WIND)",
            WindStatus::Braked => "BRAKED (HIGH WIND)",
            WindStatus::Optimal => "OPTIMAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindReadout {
    pub wind_speed: f64,
    pub stored_energy: f64,
    pub rpm: f64,
    pub status: WindStatus,
}

impl Default for WindStatus {
    fn default() -> Self {
        WindStatus::NoWind
    }
}

#[derive(Debug)]
pub struct WindTurbine {
    wind_speed: f64,
    stored_energy: f64,
    rotation: f64,
    ticker: FixedTicker,
}

impl Default for WindTurbine {
    fn default() -> Self {
        WindTurbine {
            wind_speed: 40.0,
            stored_energy: 0.0,
            rotation: 0.0,
            ticker: FixedTicker::new(TICK_PERIOD),
        }
    }
}

impl WindTurbine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wind_speed(&self) -> f64 {
        self.wind_speed
    }

    /// Set the wind speed, clamped to [0, 100]. The charge ticker is
    /// restarted so the new speed takes effect on a whole tick boundary and
    /// no stale partial period fires against it.
    pub fn set_wind_speed(&mut self, speed: f64) {
        let speed = clamp_domain(speed, 0.0, 100.0);
        if speed != self.wind_speed {
            self.wind_speed = speed;
            self.ticker.restart();
        }
    }

    pub fn stored_energy(&self) -> f64 {
        self.stored_energy
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Empty the grid battery (the "Drain" action).
    pub fn drain(&mut self) {
        self.stored_energy = 0.0;
    }

    pub fn status(&self) -> WindStatus {
        if self.wind_speed == 0.0 {
            WindStatus::NoWind
        } else if self.wind_speed < CUT_IN {
            WindStatus::Stalled
        } else if self.wind_speed > CUT_OUT {
            WindStatus::Braked
        } else {
            WindStatus::Optimal
        }
    }

    /// Visual rotor speed: zero outside the operating band, else
    /// proportional to normalized wind speed.
    pub fn rpm(&self) -> f64 {
        match self.status() {
            WindStatus::Optimal => self.wind_speed / 100.0,
            _ => 0.0,
        }
    }

    /// One 20 Hz charge tick. Sole writer of `stored_energy`.
    pub fn tick(&mut self) {
        let mut charge_rate = 0.0;
        if (CUT_IN..=CUT_OUT).contains(&self.wind_speed) {
            charge_rate += (self.wind_speed / 100.0) * CHARGE_FACTOR;
        }
        charge_rate -= CONSUMPTION_RATE;
        self.stored_energy = (self.stored_energy + charge_rate).clamp(0.0, 100.0);
    }

    /// Feed wall-clock time to the fixed ticker and run the due charge
    /// ticks. Called once per render frame.
    pub fn advance(&mut self, dt: f64) {
        for _ in 0..self.ticker.advance(dt) {
            self.tick();
        }
        self.rotation += self.rpm() * ROTATION_PER_FRAME;
    }

    pub fn readout(&self) -> WindReadout {
        WindReadout {
            wind_speed: self.wind_speed,
            stored_energy: self.stored_energy,
            rpm: self.rpm(),
            status: self.status(),
        }
    }
}

impl Model for WindTurbine {
    fn reset(&mut self) {
        *self = WindTurbine::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn turbine_at(speed: f64) -> WindTurbine {
        let mut t = WindTurbine::new();
        t.set_wind_speed(speed);
        t
    }

    #[test]
    fn rpm_is_zero_outside_the_operating_band() {
        for speed in [0.0, 5.0, 19.9, 85.1, 100.0] {
            assert_eq!(turbine_at(speed).rpm(), 0.0, "speed {speed}");
        }
    }

    #[test]
    fn rpm_is_proportional_inside_the_band() {
        let mut previous = 0.0;
        let mut speed = CUT_IN;
        while speed <= CUT_OUT {
            let rpm = turbine_at(speed).rpm();
            assert_relative_eq!(rpm, speed / 100.0);
            assert!(rpm > previous);
            previous = rpm;
            speed += 5.0;
        }
    }

    #[test]
    fn status_bands() {
        assert_eq!(turbine_at(0.0).status(), WindStatus::NoWind);
        assert_eq!(turbine_at(10.0).status(), WindStatus::Stalled);
        assert_eq!(turbine_at(20.0).status(), WindStatus::Optimal);
        assert_eq!(turbine_at(85.0).status(), WindStatus::Optimal);
        assert_eq!(turbine_at(90.0).status(), WindStatus::Braked);
    }

    #[test]
    fn stored_energy_converges_and_stays_in_range() {
        let mut t = turbine_at(50.0);
        // charge 0.3/tick, consume 0.15/tick: +0.15 net until full
        for _ in 0..2000 {
            t.tick();
            assert!((0.0..=100.0).contains(&t.stored_energy()));
        }
        assert_relative_eq!(t.stored_energy(), 100.0);
    }

    #[test]
    fn calm_wind_drains_the_store() {
        let mut t = turbine_at(50.0);
        for _ in 0..100 {
            t.tick();
        }
        let charged = t.stored_energy();
        t.set_wind_speed(0.0);
        for _ in 0..50 {
            t.tick();
        }
        assert!(t.stored_energy() < charged);
        for _ in 0..2000 {
            t.tick();
        }
        assert_eq!(t.stored_energy(), 0.0);
    }

    #[test]
    fn tick_rate_is_independent_of_frame_rate() {
        // identical wall time at different frame rates yields the same
        // number of charge ticks, hence the same stored energy
        let mut fast = turbine_at(50.0);
        let mut slow = turbine_at(50.0);
        for _ in 0..120 {
            fast.advance(1.0 / 120.0);
        }
        for _ in 0..30 {
            slow.advance(1.0 / 30.0);
        }
        assert_relative_eq!(fast.stored_energy(), slow.stored_energy(), epsilon = 1e-9);
    }

    #[test]
    fn changing_wind_speed_restarts_the_tick() {
        let mut t = turbine_at(50.0);
        t.advance(0.049); // just under one period accrued
        t.set_wind_speed(60.0);
        // the pending partial period was discarded with the reschedule
        t.advance(0.002);
        assert_eq!(t.stored_energy(), 0.0);
    }

    #[test]
    fn rotor_angle_accumulates_per_frame_only_in_band() {
        let mut t = turbine_at(50.0);
        t.advance(0.0);
        assert_relative_eq!(t.rotation(), 0.5 * ROTATION_PER_FRAME);
        let mut braked = turbine_at(95.0);
        braked.advance(0.0);
        assert_eq!(braked.rotation(), 0.0);
    }

    #[test]
    fn wind_speed_is_clamped() {
        assert_eq!(turbine_at(-10.0).wind_speed(), 0.0);
        assert_eq!(turbine_at(400.0).wind_speed(), 100.0);
    }

    #[test]
    fn drain_and_reset() {
        let mut t = turbine_at(50.0);
        for _ in 0..100 {
            t.tick();
        }
        t.drain();
        assert_eq!(t.stored_energy(), 0.0);
        t.set_wind_speed(70.0);
        simcore::Model::reset(&mut t);
        assert_eq!(t.wind_speed(), 40.0);
        assert_eq!(t.rotation(), 0.0);
    }
}
