//! The five energy-transformation physics models
//!
//! Each model owns its state exclusively, evolves it in an explicit step
//! function (no closure-captured parameters), and projects it into a small
//! readout snapshot every frame. Drawing lives elsewhere; nothing in this
//! crate knows about a surface.

pub mod circuit;
pub mod falling;
pub mod solar;
pub mod spring;
pub mod wind;

pub use circuit::*;
pub use falling::*;
pub use solar::*;
pub use spring::*;
pub use wind::*;
