//! Gravitational fall with bounce: potential energy turning kinetic.
//!
//! Integration runs once per render frame in virtual-pixel units
//! (semi-implicit Euler), matching the visual pacing of the original tool
//! rather than metrological gravity.

use serde::{Deserialize, Serialize};
use simcore::{Model, Phase, SimContext, StepModel, clamp_domain};
use std::collections::VecDeque;

/// Virtual-space layout: the drop happens between these two y lines.
pub const GROUND_Y: f64 = 900.0;
pub const TOP_Y: f64 = 100.0;
/// Gravity in virtual pixels per frame squared.
pub const GRAVITY: f64 = 1.2;
/// Impact speeds at or below this stop dead instead of bouncing.
pub const BOUNCE_THRESHOLD: f64 = 2.0;
/// Time scale applied while slow motion is on.
pub const SLOW_MO_SCALE: f64 = 0.2;
/// The 800 px usable drop maps to 10 m.
pub const METERS_PER_PIXEL: f64 = 10.0 / 800.0;
/// Drops requested below this height are ignored.
pub const MIN_DROP_PERCENT: f64 = 5.0;

const TRAIL_ALPHA_DECAY: f64 = 0.015;
const TRAIL_CAP: usize = 64;

/// Which body is being dropped. Each carries fixed physical constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyKind {
    Heavy,
    #[default]
    Medium,
    Light,
}

/// Fixed constants for one selectable body.
#[derive(Debug, Clone, Copy)]
pub struct BodySpec {
    pub label: &'static str,
    /// Radius in virtual pixels.
    pub radius: f64,
    /// Quadratic drag coefficient (only applies with atmosphere on).
    pub drag: f64,
    /// Velocity fraction retained on bounce.
    pub bounciness: f64,
    /// Mass in kg, for the energy readouts.
    pub mass: f64,
}

impl BodyKind {
    pub const ALL: [BodyKind; 3] = [BodyKind::Heavy, BodyKind::Medium, BodyKind::Light];

    pub fn spec(self) -> BodySpec {
        match self {
            BodyKind::Heavy => BodySpec {
                label: "Iron Ball",
                radius: 35.0,
                drag: 0.002,
                bounciness: 0.3,
                mass: 5.0,
            },
            BodyKind::Medium => BodySpec {
                label: "Tennis Ball",
                radius: 30.0,
                drag: 0.02,
                bounciness: 0.7,
                mass: 0.5,
            },
            BodyKind::Light => BodySpec {
                label: "Beach Ball",
                radius: 50.0,
                drag: 0.12,
                bounciness: 0.85,
                mass: 0.1,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallingParams {
    /// Drop height as a percentage of the usable range, [0, 100].
    pub height_percent: f64,
    pub kind: BodyKind,
    pub slow_motion: bool,
    /// Enables the quadratic drag term. Off by default; the vacuum pacing is
    /// the documented behavior and the flag exists for a future air mode.
    pub atmosphere: bool,
}

impl Default for FallingParams {
    fn default() -> Self {
        FallingParams {
            height_percent: 80.0,
            kind: BodyKind::default(),
            slow_motion: false,
            atmosphere: false,
        }
    }
}

/// A fading after-image of the ball.
#[derive(Debug, Clone, Copy)]
pub struct TrailPoint {
    pub y: f64,
    pub alpha: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FallingReadout {
    pub potential_j: f64,
    pub kinetic_j: f64,
    pub speed_mps: f64,
    pub phase: Phase,
}

#[derive(Debug)]
pub struct FallingBody {
    params: FallingParams,
    phase: Phase,
    y: f64,
    velocity: f64,
    impact_pulse: f64,
    trail: VecDeque<TrailPoint>,
    frame: u64,
}

impl Default for FallingBody {
    fn default() -> Self {
        let params = FallingParams::default();
        let mut body = FallingBody {
            params,
            phase: Phase::Idle,
            y: 0.0,
            velocity: 0.0,
            impact_pulse: 0.0,
            trail: VecDeque::new(),
            frame: 0,
        };
        body.y = body.rest_target();
        body
    }
}

impl FallingBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(&self) -> FallingParams {
        self.params
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn impact_pulse(&self) -> f64 {
        self.impact_pulse
    }

    pub fn trail(&self) -> impl Iterator<Item = &TrailPoint> {
        self.trail.iter()
    }

    pub fn spec(&self) -> BodySpec {
        self.params.kind.spec()
    }

    /// Height slider. Interrupts a running drop, per the original behavior.
    pub fn set_height_percent(&mut self, percent: f64) {
        self.params.height_percent = clamp_domain(percent, 0.0, 100.0);
        if self.phase != Phase::Idle {
            self.abort_to_idle();
        }
    }

    /// Body selection. Interrupts a running drop.
    pub fn set_kind(&mut self, kind: BodyKind) {
        if self.params.kind != kind {
            self.params.kind = kind;
            self.abort_to_idle();
        }
    }

    pub fn set_slow_motion(&mut self, on: bool) {
        self.params.slow_motion = on;
    }

    pub fn set_atmosphere(&mut self, on: bool) {
        self.params.atmosphere = on;
    }

    /// Start the drop. Ignored below the minimum height or when already
    /// running; invalid transitions are no-ops, not errors.
    pub fn drop_body(&mut self) {
        if self.phase != Phase::Idle || self.params.height_percent < MIN_DROP_PERCENT {
            return;
        }
        self.phase = Phase::Running;
    }

    fn abort_to_idle(&mut self) {
        self.phase = Phase::Idle;
        self.velocity = 0.0;
        self.impact_pulse = 0.0;
        self.trail.clear();
        self.y = self.rest_target();
    }

    /// Where the ball sits for the current slider value.
    fn rest_target(&self) -> f64 {
        let radius = self.spec().radius;
        let range = GROUND_Y - TOP_Y - radius;
        GROUND_Y - radius - (self.params.height_percent / 100.0) * range
    }

    /// Resting height above the ground contact point, in virtual pixels.
    pub fn height_above_ground(&self) -> f64 {
        (GROUND_Y - self.spec().radius) - self.y
    }

    fn step_running(&mut self) {
        let spec = self.spec();
        let time_scale = if self.params.slow_motion {
            SLOW_MO_SCALE
        } else {
            1.0
        };

        let mut drag_accel = 0.0;
        if self.params.atmosphere {
            drag_accel = spec.drag * self.velocity * self.velocity * self.velocity.signum();
        }
        self.velocity += (GRAVITY - drag_accel) * time_scale;
        self.y += self.velocity * time_scale;

        let trail_stride = if self.params.slow_motion { 5 } else { 2 };
        if self.frame % trail_stride == 0 {
            self.trail.push_back(TrailPoint {
                y: self.y,
                alpha: 0.5,
                radius: spec.radius,
            });
            if self.trail.len() > TRAIL_CAP {
                self.trail.pop_front();
            }
        }

        let floor = GROUND_Y - spec.radius;
        if self.y >= floor {
            self.y = floor;
            if self.velocity.abs() > BOUNCE_THRESHOLD {
                self.impact_pulse = self.velocity.abs() * 3.0;
                self.velocity *= -spec.bounciness;
            } else {
                self.velocity = 0.0;
                self.phase = Phase::Finished;
            }
        }
    }

    pub fn readout(&self) -> FallingReadout {
        let spec = self.spec();
        let height_m = self.height_above_ground() * METERS_PER_PIXEL;
        let speed_mps = self.velocity.abs() * 10.0 * METERS_PER_PIXEL;
        FallingReadout {
            potential_j: spec.mass * 9.8 * height_m,
            kinetic_j: 0.5 * spec.mass * speed_mps * speed_mps,
            speed_mps,
            phase: self.phase,
        }
    }
}

impl Model for FallingBody {
    fn reset(&mut self) {
        let params = self.params;
        *self = FallingBody::default();
        self.params = params;
        self.y = self.rest_target();
    }
}

impl StepModel for FallingBody {
    fn step(&mut self, _ctx: SimContext) {
        self.frame += 1;
        match self.phase {
            Phase::Running => self.step_running(),
            Phase::Idle => {
                // ease toward the slider target; velocity held at zero
                self.y += (self.rest_target() - self.y) * 0.2;
                self.velocity = 0.0;
                if self.impact_pulse > 0.0 {
                    self.impact_pulse *= 0.9;
                }
            }
            // terminal: the ball stays on the floor until reset
            Phase::Finished => {
                if self.impact_pulse > 0.0 {
                    self.impact_pulse *= 0.9;
                }
            }
        }
        for point in &mut self.trail {
            point.alpha -= TRAIL_ALPHA_DECAY;
        }
        self.trail.retain(|point| point.alpha > 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CTX: SimContext = SimContext { dt: 1.0 / 60.0, t: 0.0 };

    fn dropped(percent: f64, kind: BodyKind) -> FallingBody {
        let mut body = FallingBody::new();
        body.set_kind(kind);
        body.set_height_percent(percent);
        // let the idle smoothing settle on the rest target
        for _ in 0..200 {
            body.step(CTX);
        }
        body.drop_body();
        body
    }

    #[test]
    fn speed_grows_monotonically_until_first_contact() {
        let mut body = dropped(80.0, BodyKind::Medium);
        let mut last_speed = 0.0;
        for _ in 0..2000 {
            body.step(CTX);
            if body.velocity() <= 0.0 || body.phase() != Phase::Running {
                break; // first bounce reflected the velocity
            }
            assert!(body.velocity() > last_speed);
            last_speed = body.velocity();
        }
        assert!(last_speed > BOUNCE_THRESHOLD);
    }

    #[test]
    fn first_bounce_flips_sign_and_shrinks_by_bounciness() {
        let mut body = dropped(80.0, BodyKind::Medium);
        let mut impact_speed = 0.0;
        for _ in 0..2000 {
            let before = body.velocity();
            body.step(CTX);
            if body.velocity() < 0.0 {
                impact_speed = before + GRAVITY; // velocity after gravity, pre-reflection
                break;
            }
        }
        assert!(impact_speed > 0.0, "never bounced");
        assert_relative_eq!(body.velocity(), -impact_speed * 0.7, epsilon = 1e-9);
        assert!(body.impact_pulse() > 0.0);
    }

    #[test]
    fn bounces_decay_and_reach_finished_at_rest() {
        let mut body = dropped(80.0, BodyKind::Medium);
        let mut peaks = Vec::new();
        for _ in 0..20_000 {
            let previous = body.velocity();
            body.step(CTX);
            // apex: upward motion just turned back into a fall
            if previous < 0.0 && body.velocity() >= 0.0 {
                peaks.push(body.height_above_ground());
            }
            if body.phase() == Phase::Finished {
                break;
            }
        }
        assert_eq!(body.phase(), Phase::Finished);
        assert_eq!(body.velocity(), 0.0);
        for pair in peaks.windows(2) {
            assert!(pair[1] < pair[0], "bounce amplitude grew: {peaks:?}");
        }
    }

    #[test]
    fn finished_ball_stays_on_the_floor_until_reset() {
        let mut body = dropped(80.0, BodyKind::Medium);
        for _ in 0..20_000 {
            body.step(CTX);
            if body.phase() == Phase::Finished {
                break;
            }
        }
        assert_eq!(body.phase(), Phase::Finished);

        let floor = GROUND_Y - body.spec().radius;
        for _ in 0..120 {
            body.step(CTX);
            assert_eq!(body.phase(), Phase::Finished);
            assert_relative_eq!(body.y(), floor, epsilon = 1e-9);
            assert_eq!(body.velocity(), 0.0);
        }

        body.reset();
        assert_eq!(body.phase(), Phase::Idle);
    }

    #[test]
    fn idle_tracks_the_slider_exponentially() {
        let mut body = FallingBody::new();
        body.set_height_percent(0.0);
        for _ in 0..300 {
            body.step(CTX);
        }
        let spec = body.spec();
        assert_relative_eq!(body.y(), GROUND_Y - spec.radius, epsilon = 1e-6);
        body.set_height_percent(100.0);
        let before = body.y();
        body.step(CTX);
        assert!(body.y() < before); // moving toward the new target
        assert_eq!(body.velocity(), 0.0);
    }

    #[test]
    fn parameter_changes_interrupt_a_running_drop() {
        let mut body = dropped(80.0, BodyKind::Medium);
        for _ in 0..10 {
            body.step(CTX);
        }
        body.set_kind(BodyKind::Heavy);
        assert_eq!(body.phase(), Phase::Idle);
        assert_eq!(body.velocity(), 0.0);

        let mut body = dropped(80.0, BodyKind::Medium);
        for _ in 0..10 {
            body.step(CTX);
        }
        body.set_height_percent(30.0);
        assert_eq!(body.phase(), Phase::Idle);
    }

    #[test]
    fn drop_below_minimum_height_is_a_no_op() {
        let mut body = FallingBody::new();
        body.set_height_percent(3.0);
        body.drop_body();
        assert_eq!(body.phase(), Phase::Idle);
    }

    #[test]
    fn drag_slows_the_fall_when_atmosphere_is_on() {
        let mut vacuum = dropped(100.0, BodyKind::Light);
        let mut air = dropped(100.0, BodyKind::Light);
        air.set_atmosphere(true);
        air.drop_body(); // set_atmosphere does not abort, but be explicit
        for _ in 0..30 {
            vacuum.step(CTX);
            air.step(CTX);
        }
        assert!(air.velocity() < vacuum.velocity());
    }

    #[test]
    fn trail_is_bounded_and_decays() {
        let mut body = dropped(100.0, BodyKind::Light);
        for _ in 0..500 {
            body.step(CTX);
        }
        assert!(body.trail().count() <= TRAIL_CAP);
        for point in body.trail() {
            assert!(point.alpha > 0.0 && point.alpha <= 0.5);
        }
    }

    #[test]
    fn readout_energies_match_the_formulas() {
        let mut body = FallingBody::new();
        body.set_kind(BodyKind::Heavy);
        body.set_height_percent(100.0);
        for _ in 0..300 {
            body.step(CTX);
        }
        let r = body.readout();
        // full height: 765 px above contact for the 35 px iron ball
        let height_m = body.height_above_ground() * METERS_PER_PIXEL;
        assert_relative_eq!(r.potential_j, 5.0 * 9.8 * height_m, epsilon = 1e-9);
        assert_relative_eq!(r.kinetic_j, 0.0);
    }
}
