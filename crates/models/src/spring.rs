//! Elastic spring launcher: stored elastic energy converting to motion.
//!
//! Two coupled pieces after release: the ball, attached to the spring while
//! its displacement is negative and coasting with friction after detachment,
//! and the spring head, which oscillates back to rest on its own damped
//! dynamics once the ball leaves.

use serde::{Deserialize, Serialize};
use simcore::{Model, Phase, SimContext, StepModel, clamp_domain};

/// Full slider travel compresses the spring by this many virtual pixels.
pub const MAX_COMPRESSION_PIXELS: f64 = 120.0;
pub const PIXELS_PER_METER: f64 = 100.0;
/// Raw pixel energies scale to display joules by this factor.
pub const JOULE_SCALE: f64 = 0.005;
/// Releases are ignored below this compression percentage.
pub const MIN_RELEASE_PERCENT: f64 = 5.0;

const BALL_MASS: f64 = 2.0;
const K_STIFF: f64 = 1.5;
const K_LOOSE: f64 = 0.5;
/// Per-frame velocity retention after detachment.
const FRICTION: f64 = 0.99;
/// Coasting speeds below this snap to zero.
const STOP_THRESHOLD: f64 = 0.1;
/// The free spring head behaves as a 0.5-unit mass with heavy damping.
const SPRING_HEAD_MASS: f64 = 0.5;
const SPRING_DAMPING: f64 = 0.85;
const IDLE_SMOOTHING: f64 = 0.2;
const CAMERA_SMOOTHING: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringParams {
    /// Compression slider, [0, 100]. Editable only while idle.
    pub compression: f64,
    /// Stiff spring stores more energy per pixel. Editable only while idle.
    pub stiff: bool,
}

impl Default for SpringParams {
    fn default() -> Self {
        SpringParams {
            compression: 0.0,
            stiff: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpringReadout {
    pub potential_j: f64,
    pub kinetic_j: f64,
    pub distance_m: f64,
    pub speed_mps: f64,
    pub phase: Phase,
}

#[derive(Debug, Default)]
pub struct SpringModel {
    params: SpringParams,
    phase: Phase,
    ball_disp: f64,
    start_disp: f64,
    spring_disp: f64,
    velocity: f64,
    spring_velocity: f64,
    camera_x: f64,
}

impl SpringModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(&self) -> SpringParams {
        self.params
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn ball_disp(&self) -> f64 {
        self.ball_disp
    }

    pub fn spring_disp(&self) -> f64 {
        self.spring_disp
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn camera_x(&self) -> f64 {
        self.camera_x
    }

    pub fn stiffness(&self) -> f64 {
        if self.params.stiff { K_STIFF } else { K_LOOSE }
    }

    /// Compression slider; ignored while the launch is running.
    pub fn set_compression(&mut self, percent: f64) {
        if self.phase == Phase::Idle {
            self.params.compression = clamp_domain(percent, 0.0, 100.0);
        }
    }

    /// Stiffness toggle; ignored while the launch is running.
    pub fn set_stiff(&mut self, stiff: bool) {
        if self.phase == Phase::Idle {
            self.params.stiff = stiff;
        }
    }

    /// Release the ball. A no-op unless idle with enough compression.
    pub fn release(&mut self) {
        if self.phase != Phase::Idle || self.params.compression < MIN_RELEASE_PERCENT {
            return;
        }
        let dist = (self.params.compression / 100.0) * MAX_COMPRESSION_PIXELS;
        self.ball_disp = -dist;
        self.start_disp = -dist;
        self.spring_disp = -dist;
        self.velocity = 0.0;
        self.phase = Phase::Running;
    }

    /// Target camera offset: follow once the ball passes the middle of the
    /// visible span. `virtual_width` is the letterboxed width of the frame
    /// being drawn, so this is re-evaluated against the live surface size.
    pub fn update_camera(&mut self, virtual_width: f64, world_rest_x: f64) {
        let ball_world_x = world_rest_x + self.ball_disp;
        let target = if ball_world_x > virtual_width * 0.5 {
            ball_world_x - virtual_width * 0.5
        } else {
            0.0
        };
        self.camera_x += (target - self.camera_x) * CAMERA_SMOOTHING;
    }

    fn step_running(&mut self) {
        let k = self.stiffness();
        if self.ball_disp < 0.0 {
            // attached: the spring pushes the ball toward equilibrium
            let force = -k * self.ball_disp;
            self.velocity += force / BALL_MASS;
            self.ball_disp += self.velocity;
            self.spring_disp = self.ball_disp;
            if self.ball_disp >= 0.0 {
                self.ball_disp = 0.0; // detach point
            }
        } else {
            // detached: the ball coasts, the spring rings down on its own
            self.ball_disp += self.velocity;
            self.velocity *= FRICTION;
            if self.velocity.abs() < STOP_THRESHOLD {
                self.velocity = 0.0;
            }
            let spring_force = -k * self.spring_disp;
            self.spring_velocity += spring_force / SPRING_HEAD_MASS;
            self.spring_velocity *= SPRING_DAMPING;
            self.spring_disp += self.spring_velocity;
        }
    }

    pub fn readout(&self) -> SpringReadout {
        let k = self.stiffness();
        let raw_pe = 0.5 * k * self.spring_disp * self.spring_disp;
        let raw_ke = 0.5 * BALL_MASS * self.velocity * self.velocity;
        SpringReadout {
            potential_j: raw_pe * JOULE_SCALE,
            kinetic_j: raw_ke * JOULE_SCALE,
            distance_m: (self.ball_disp - self.start_disp).abs() / PIXELS_PER_METER,
            // per-frame velocity to m/s assuming a 60 fps cadence
            speed_mps: self.velocity.abs() * 60.0 / PIXELS_PER_METER,
            phase: self.phase,
        }
    }
}

impl Model for SpringModel {
    fn reset(&mut self) {
        *self = SpringModel::default();
    }
}

impl StepModel for SpringModel {
    fn step(&mut self, _ctx: SimContext) {
        match self.phase {
            Phase::Running => self.step_running(),
            _ => {
                let target = -(self.params.compression / 100.0) * MAX_COMPRESSION_PIXELS;
                self.ball_disp += (target - self.ball_disp) * IDLE_SMOOTHING;
                self.spring_disp = self.ball_disp;
                self.velocity = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CTX: SimContext = SimContext { dt: 1.0 / 60.0, t: 0.0 };

    fn released(compression: f64, stiff: bool) -> SpringModel {
        let mut spring = SpringModel::new();
        spring.set_stiff(stiff);
        spring.set_compression(compression);
        for _ in 0..200 {
            spring.step(CTX);
        }
        spring.release();
        spring
    }

    #[test]
    fn ball_detaches_within_a_bounded_number_of_frames() {
        let mut spring = released(50.0, false);
        let mut detached = false;
        for _ in 0..600 {
            spring.step(CTX);
            if spring.ball_disp() >= 0.0 {
                detached = true;
                break;
            }
        }
        assert!(detached, "ball never crossed the detach point");
        assert!(spring.velocity() > 0.0);
    }

    #[test]
    fn mechanical_energy_decays_after_detachment() {
        let mut spring = released(50.0, false);
        while spring.ball_disp() < 0.0 {
            spring.step(CTX);
        }
        let at_detach = spring.readout();
        let budget = at_detach.potential_j + at_detach.kinetic_j;
        let mut previous_ke = at_detach.kinetic_j;
        let mut last_total = budget;
        for _ in 0..600 {
            spring.step(CTX);
            let r = spring.readout();
            // friction only removes kinetic energy, never adds it
            assert!(r.kinetic_j <= previous_ke + 1e-9);
            previous_ke = r.kinetic_j;
            // the ringing spring head stays inside the detach-time budget
            last_total = r.potential_j + r.kinetic_j;
            assert!(last_total <= budget + 1e-9);
        }
        assert!(last_total < budget * 0.1);
    }

    #[test]
    fn stiff_spring_launches_faster() {
        let mut loose = released(80.0, false);
        let mut stiff = released(80.0, true);
        for _ in 0..600 {
            loose.step(CTX);
            stiff.step(CTX);
        }
        let v_loose = loose.readout().speed_mps;
        let v_stiff = stiff.readout().speed_mps;
        // both eventually stop; compare peak travel instead when both are 0
        let d_loose = loose.readout().distance_m;
        let d_stiff = stiff.readout().distance_m;
        assert!(d_stiff > d_loose, "stiff {d_stiff} vs loose {d_loose}");
        assert!(v_stiff >= v_loose);
    }

    #[test]
    fn release_requires_minimum_compression() {
        let mut spring = released(3.0, false);
        assert_eq!(spring.phase(), Phase::Idle);
        // and releasing twice is a no-op, not a restart
        let mut spring = released(50.0, false);
        let start = spring.ball_disp();
        spring.release();
        assert_eq!(spring.ball_disp(), start);
    }

    #[test]
    fn parameters_are_frozen_while_running() {
        let mut spring = released(50.0, false);
        spring.set_compression(90.0);
        spring.set_stiff(true);
        assert_relative_eq!(spring.params().compression, 50.0);
        assert!(!spring.params().stiff);
    }

    #[test]
    fn idle_displacement_eases_toward_the_slider_target() {
        let mut spring = SpringModel::new();
        spring.set_compression(100.0);
        for _ in 0..200 {
            spring.step(CTX);
        }
        assert_relative_eq!(spring.ball_disp(), -MAX_COMPRESSION_PIXELS, epsilon = 1e-6);
        assert_eq!(spring.velocity(), 0.0);
        assert_relative_eq!(spring.spring_disp(), spring.ball_disp());
    }

    #[test]
    fn spring_head_rings_down_to_rest_after_launch() {
        let mut spring = released(80.0, true);
        for _ in 0..2000 {
            spring.step(CTX);
        }
        assert!(spring.spring_disp().abs() < 1e-3);
    }

    #[test]
    fn camera_follows_only_past_half_width() {
        let mut spring = released(100.0, true);
        for _ in 0..5 {
            spring.step(CTX);
            spring.update_camera(1000.0, 400.0);
        }
        assert_eq!(spring.camera_x(), 0.0);
        // run the launch well past the half-width mark
        for _ in 0..600 {
            spring.step(CTX);
            spring.update_camera(1000.0, 400.0);
        }
        assert!(spring.camera_x() > 0.0);
    }

    #[test]
    fn reset_restores_idle_defaults() {
        let mut spring = released(80.0, true);
        for _ in 0..50 {
            spring.step(CTX);
        }
        simcore::Model::reset(&mut spring);
        assert_eq!(spring.phase(), Phase::Idle);
        assert_eq!(spring.ball_disp(), 0.0);
        assert_eq!(spring.params(), SpringParams::default());
    }

    #[test]
    fn distance_and_speed_use_the_documented_conversions() {
        let mut spring = released(50.0, false);
        while spring.ball_disp() < 0.0 {
            spring.step(CTX);
        }
        let r = spring.readout();
        assert_relative_eq!(
            r.distance_m,
            (spring.ball_disp() - -60.0).abs() / PIXELS_PER_METER,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            r.speed_mps,
            spring.velocity() * 60.0 / PIXELS_PER_METER,
            epsilon = 1e-9
        );
    }
}
