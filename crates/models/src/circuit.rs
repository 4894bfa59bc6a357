//! Battery/bulb circuit: purely reactive energy sharing.
//!
//! Brightness is a pure function of the parameters; the only animated state
//! is the wire dash offset, which the painter derives from the frame number.

use serde::{Deserialize, Serialize};
use simcore::Model;

pub const MAX_BATTERIES: u8 = 3;
pub const MAX_BULBS: u8 = 3;

/// Energy contributed by one battery, as a fraction of one bulb's full
/// brightness.
pub const ENERGY_PER_BATTERY: f64 = 0.33;

/// Visual banding thresholds for bulb glow.
pub const BAND_DIM: f64 = 0.25;
pub const BAND_AMBER: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitParams {
    /// Number of batteries in series, 0..=3.
    pub batteries: u8,
    /// Number of bulbs sharing the energy, 1..=3.
    pub bulbs: u8,
    pub switch_closed: bool,
}

impl Default for CircuitParams {
    fn default() -> Self {
        CircuitParams {
            batteries: 1,
            bulbs: 1,
            switch_closed: false,
        }
    }
}

impl CircuitParams {
    /// Snap both counts into their declared domains.
    pub fn clamped(mut self) -> Self {
        self.batteries = self.batteries.min(MAX_BATTERIES);
        self.bulbs = self.bulbs.clamp(1, MAX_BULBS);
        self
    }
}

/// Per-frame readout snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CircuitReadout {
    pub brightness: f64,
}

/// Glow band a bulb falls into at a given brightness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlowBand {
    Off,
    DimRed,
    Amber,
    White,
}

#[derive(Debug, Default)]
pub struct CircuitModel {
    params: CircuitParams,
}

impl CircuitModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(&self) -> CircuitParams {
        self.params
    }

    pub fn set_params(&mut self, params: CircuitParams) {
        self.params = params.clamped();
    }

    /// Energy reaching each bulb, 0..=1.
    ///
    /// The (3 batteries, 2 bulbs) pair returns 0.66 rather than the general
    /// 0.495. That exception is intentional in the source material and is
    /// kept as written.
    pub fn brightness(&self) -> f64 {
        let p = self.params;
        if !p.switch_closed || p.batteries == 0 {
            return 0.0;
        }
        if p.batteries == 3 && p.bulbs == 2 {
            return 0.66;
        }
        f64::from(p.batteries) * ENERGY_PER_BATTERY / f64::from(p.bulbs)
    }

    pub fn glow_band(&self) -> GlowBand {
        let b = self.brightness();
        if b <= 0.0 {
            GlowBand::Off
        } else if b < BAND_DIM {
            GlowBand::DimRed
        } else if b < BAND_AMBER {
            GlowBand::Amber
        } else {
            GlowBand::White
        }
    }

    /// Dash-animation speed of the wire current, 0 when dark.
    pub fn current_speed(&self) -> f64 {
        let b = self.brightness();
        if b > 0.0 { b * 0.8 + 0.2 } else { 0.0 }
    }

    pub fn readout(&self) -> CircuitReadout {
        CircuitReadout {
            brightness: self.brightness(),
        }
    }
}

impl Model for CircuitModel {
    fn reset(&mut self) {
        self.params = CircuitParams::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn brightness(batteries: u8, bulbs: u8, switch_closed: bool) -> f64 {
        let mut model = CircuitModel::new();
        model.set_params(CircuitParams {
            batteries,
            bulbs,
            switch_closed,
        });
        model.brightness()
    }

    #[test]
    fn dark_iff_switch_open_or_no_batteries() {
        for batteries in 0..=3u8 {
            for bulbs in 1..=3u8 {
                assert_eq!(brightness(batteries, bulbs, false), 0.0);
                let lit = brightness(batteries, bulbs, true);
                if batteries == 0 {
                    assert_eq!(lit, 0.0);
                } else {
                    assert!(lit > 0.0);
                }
            }
        }
    }

    #[test]
    fn three_batteries_two_bulbs_is_the_exception() {
        assert_relative_eq!(brightness(3, 2, true), 0.66);
        // and stays dark with the switch open regardless
        assert_eq!(brightness(3, 2, false), 0.0);
    }

    #[test]
    fn all_other_pairs_follow_the_division_rule() {
        for batteries in 1..=3u8 {
            for bulbs in 1..=3u8 {
                if batteries == 3 && bulbs == 2 {
                    continue;
                }
                let expected = f64::from(batteries) * 0.33 / f64::from(bulbs);
                assert_relative_eq!(brightness(batteries, bulbs, true), expected);
            }
        }
    }

    #[test]
    fn out_of_domain_counts_are_clamped() {
        let mut model = CircuitModel::new();
        model.set_params(CircuitParams {
            batteries: 9,
            bulbs: 0,
            switch_closed: true,
        });
        assert_eq!(model.params().batteries, 3);
        assert_eq!(model.params().bulbs, 1);
    }

    #[test]
    fn glow_bands_match_thresholds() {
        let mut model = CircuitModel::new();
        model.set_params(CircuitParams {
            batteries: 1,
            bulbs: 3,
            switch_closed: true,
        }); // 0.11
        assert_eq!(model.glow_band(), GlowBand::DimRed);

        model.set_params(CircuitParams {
            batteries: 1,
            bulbs: 1,
            switch_closed: true,
        }); // 0.33
        assert_eq!(model.glow_band(), GlowBand::Amber);

        model.set_params(CircuitParams {
            batteries: 3,
            bulbs: 1,
            switch_closed: true,
        }); // 0.99
        assert_eq!(model.glow_band(), GlowBand::White);

        model.set_params(CircuitParams {
            batteries: 0,
            bulbs: 1,
            switch_closed: true,
        });
        assert_eq!(model.glow_band(), GlowBand::Off);
    }

    #[test]
    fn current_animates_only_when_lit() {
        let mut model = CircuitModel::new();
        assert_eq!(model.current_speed(), 0.0);
        model.set_params(CircuitParams {
            batteries: 2,
            bulbs: 1,
            switch_closed: true,
        });
        assert_relative_eq!(model.current_speed(), 0.66 * 0.8 + 0.2);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut model = CircuitModel::new();
        model.set_params(CircuitParams {
            batteries: 3,
            bulbs: 3,
            switch_closed: true,
        });
        simcore::Model::reset(&mut model);
        assert_eq!(model.params(), CircuitParams::default());
    }
}
