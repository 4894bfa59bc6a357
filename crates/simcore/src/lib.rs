//! Shared simulation vocabulary for the energy lab
//!
//! This crate provides:
//! - The per-step context and lifecycle phase types
//! - The `Model` / `StepModel` trait family
//! - A fixed-interval ticker decoupled from the render frame rate
//! - A push-based readout publisher for per-frame numeric output

pub mod readout;
pub mod ticker;
pub mod traits;

pub use readout::*;
pub use ticker::*;
pub use traits::*;
