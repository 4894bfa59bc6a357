use serde::{Deserialize, Serialize};

/// Wall-clock step context handed to every model update.
#[derive(Debug, Clone, Copy)]
pub struct SimContext {
    /// Seconds elapsed since the previous update.
    pub dt: f64,
    /// Seconds since the station was mounted.
    pub t: f64,
}

/// Discrete lifecycle state of a model, gating which dynamics apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Finished,
}

impl Phase {
    pub fn is_running(self) -> bool {
        self == Phase::Running
    }
}

pub trait Model {
    /// Return all state to documented defaults. Safe to call from any phase.
    fn reset(&mut self);
}

/// A model whose continuous state evolves once per render frame.
pub trait StepModel: Model {
    fn step(&mut self, ctx: SimContext);
}

/// Clamp a parameter write into its declared domain.
///
/// Out-of-domain writes are silently snapped to the nearest bound; a
/// parameter setter never fails.
pub fn clamp_domain(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}
