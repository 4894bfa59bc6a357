//! Solar panel output: a pure function of time of day and cloud cover.
//!
//! No integration and no phase; every derived value is recomputed from the
//! two parameters on each evaluation.

use serde::{Deserialize, Serialize};
use simcore::{Model, clamp_domain};

/// The sun contributes between these hours (exclusive bounds).
pub const DAWN: f64 = 5.5;
pub const DUSK: f64 = 18.5;
/// Fraction of output lost under full cloud cover.
pub const CLOUD_ATTENUATION: f64 = 0.9;
/// Fan speed multiplier: output 1.0 spins at 40.
pub const FAN_SPEED_FACTOR: f64 = 40.0;
/// Fan speeds past this draw a motion-blur disc.
pub const FAN_BLUR_SPEED: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarParams {
    /// Hour of day, [0, 24).
    pub time_of_day: f64,
    /// Cloud cover percentage, [0, 100].
    pub cloud_density: f64,
}

impl Default for SolarParams {
    fn default() -> Self {
        SolarParams {
            time_of_day: 12.0,
            cloud_density: 0.0,
        }
    }
}

/// Everything the painter and HUD need, derived in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolarDerived {
    pub is_day: bool,
    /// 0 at 6 am, 0.5 at noon, 1 at 6 pm; clamped outside.
    pub day_progress: f64,
    /// sin arc height, 0 at the horizon, 1 at the zenith. 0 at night.
    pub sun_height: f64,
    /// Panel output, 0..=1.
    pub output: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolarReadout {
    pub output_percent: f64,
}

#[derive(Debug, Default)]
pub struct SolarPanel {
    params: SolarParams,
}

impl SolarPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(&self) -> SolarParams {
        self.params
    }

    pub fn set_time_of_day(&mut self, hour: f64) {
        self.params.time_of_day = clamp_domain(hour, 0.0, 23.9);
    }

    pub fn set_cloud_density(&mut self, density: f64) {
        self.params.cloud_density = clamp_domain(density, 0.0, 100.0);
    }

    pub fn derive(&self) -> SolarDerived {
        let p = self.params;
        let is_day = p.time_of_day > DAWN && p.time_of_day < DUSK;
        let day_progress = ((p.time_of_day - 6.0) / 12.0).clamp(0.0, 1.0);
        let sun_height = if is_day {
            (day_progress * std::f64::consts::PI).sin()
        } else {
            0.0
        };
        let cloud_efficiency = 1.0 - (p.cloud_density / 100.0) * CLOUD_ATTENUATION;
        SolarDerived {
            is_day,
            day_progress,
            sun_height,
            output: (sun_height * cloud_efficiency).max(0.0),
        }
    }

    /// Fan rotation speed driven by the output.
    pub fn fan_speed(&self) -> f64 {
        self.derive().output * FAN_SPEED_FACTOR
    }

    pub fn readout(&self) -> SolarReadout {
        SolarReadout {
            output_percent: self.derive().output * 100.0,
        }
    }
}

impl Model for SolarPanel {
    fn reset(&mut self) {
        self.params = SolarParams::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn output_at(hour: f64, clouds: f64) -> f64 {
        let mut panel = SolarPanel::new();
        panel.set_time_of_day(hour);
        panel.set_cloud_density(clouds);
        panel.derive().output
    }

    #[test]
    fn clear_noon_is_the_daily_maximum() {
        let noon = output_at(12.0, 0.0);
        assert_relative_eq!(noon, 1.0, epsilon = 1e-12);
        let mut hour = 0.0;
        while hour < 24.0 {
            assert!(output_at(hour, 0.0) <= noon + 1e-12);
            hour += 0.1;
        }
    }

    #[test]
    fn deep_night_produces_nothing() {
        assert_eq!(output_at(0.0, 0.0), 0.0);
        assert_eq!(output_at(23.9, 0.0), 0.0);
        assert_eq!(output_at(3.0, 50.0), 0.0);
    }

    #[test]
    fn day_bounds_are_exclusive() {
        let mut panel = SolarPanel::new();
        panel.set_time_of_day(5.5);
        assert!(!panel.derive().is_day);
        panel.set_time_of_day(5.6);
        assert!(panel.derive().is_day);
        panel.set_time_of_day(18.5);
        assert!(!panel.derive().is_day);
    }

    #[test]
    fn clouds_strictly_reduce_daytime_output() {
        let mut previous = output_at(10.0, 0.0);
        for clouds in [10.0, 25.0, 50.0, 75.0, 100.0] {
            let current = output_at(10.0, clouds);
            assert!(current < previous, "clouds {clouds}");
            previous = current;
        }
        // even full overcast leaves a 10% floor during the day
        assert!(output_at(12.0, 100.0) > 0.0);
    }

    #[test]
    fn morning_and_evening_are_symmetric() {
        assert_relative_eq!(output_at(9.0, 0.0), output_at(15.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn parameters_clamp_to_their_domains() {
        let mut panel = SolarPanel::new();
        panel.set_time_of_day(36.0);
        assert_eq!(panel.params().time_of_day, 23.9);
        panel.set_cloud_density(-4.0);
        assert_eq!(panel.params().cloud_density, 0.0);
    }

    #[test]
    fn fan_speed_tracks_output() {
        let mut panel = SolarPanel::new();
        panel.set_time_of_day(12.0);
        panel.set_cloud_density(0.0);
        assert_relative_eq!(panel.fan_speed(), FAN_SPEED_FACTOR, epsilon = 1e-9);
        panel.set_time_of_day(2.0);
        assert_eq!(panel.fan_speed(), 0.0);
    }
}
