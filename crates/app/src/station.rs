//! The five stations and the live model behind the canvas.
//!
//! Only the selected station's model exists; switching stations drops the
//! old model and builds a fresh one, so no hidden state survives a switch.

use egui::{Painter, Rect};
use models::circuit::{CircuitModel, CircuitReadout};
use models::falling::{FallingBody, FallingReadout};
use models::solar::{SolarPanel, SolarReadout};
use models::spring::{SpringModel, SpringReadout};
use models::wind::{WindReadout, WindTurbine};
use scene::SceneError;
use simcore::{SimContext, StepModel};

use crate::hud::ReadoutChannel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Station {
    Circuit,
    Wind,
    Falling,
    Solar,
    Spring,
}

impl Station {
    pub const ALL: [Station; 5] = [
        Station::Circuit,
        Station::Wind,
        Station::Falling,
        Station::Solar,
        Station::Spring,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Station::Circuit => "Battery & Bulb",
            Station::Wind => "Wind Energy & Limits",
            Station::Falling => "Gravitational Energy",
            Station::Solar => "Solar Panel",
            Station::Spring => "Elastic Spring",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Station::Circuit => {
                "Connect the energy source to the receiver. Observe how sharing energy affects intensity."
            }
            Station::Wind => {
                "Turbines power a local grid. They need enough wind to generate surplus energy, but must stop in storms."
            }
            Station::Falling => {
                "Explore how mass and height affect falling objects. Potential energy transforms into kinetic energy."
            }
            Station::Solar => {
                "Sunlight converts to electricity to power the fan. Time of day and weather affect efficiency."
            }
            Station::Spring => {
                "Compress the spring to store potential energy. Releasing it converts that potential into speed."
            }
        }
    }
}

/// The live model plus its readout channel. One variant is alive at a time.
pub enum StationModel {
    Circuit(CircuitModel, ReadoutChannel<CircuitReadout>),
    Wind(WindTurbine, ReadoutChannel<WindReadout>),
    Falling(FallingBody, ReadoutChannel<FallingReadout>),
    Solar(SolarPanel, ReadoutChannel<SolarReadout>),
    Spring(SpringModel, ReadoutChannel<SpringReadout>),
}

impl StationModel {
    pub fn new(station: Station) -> Self {
        match station {
            Station::Circuit => {
                StationModel::Circuit(CircuitModel::new(), ReadoutChannel::new())
            }
            Station::Wind => StationModel::Wind(WindTurbine::new(), ReadoutChannel::new()),
            Station::Falling => {
                StationModel::Falling(FallingBody::new(), ReadoutChannel::new())
            }
            Station::Solar => StationModel::Solar(SolarPanel::new(), ReadoutChannel::new()),
            Station::Spring => StationModel::Spring(SpringModel::new(), ReadoutChannel::new()),
        }
    }

    pub fn station(&self) -> Station {
        match self {
            StationModel::Circuit(..) => Station::Circuit,
            StationModel::Wind(..) => Station::Wind,
            StationModel::Falling(..) => Station::Falling,
            StationModel::Solar(..) => Station::Solar,
            StationModel::Spring(..) => Station::Spring,
        }
    }

    /// Advance physics by one render frame and publish the fresh readout.
    pub fn step_and_publish(&mut self, ctx: SimContext, viewport_width: f64) {
        match self {
            StationModel::Circuit(model, channel) => {
                // stateless per frame, the readout is derived on demand
                channel.publish(model.readout());
            }
            StationModel::Wind(model, channel) => {
                model.advance(ctx.dt);
                channel.publish(model.readout());
            }
            StationModel::Falling(model, channel) => {
                model.step(ctx);
                channel.publish(model.readout());
            }
            StationModel::Solar(model, channel) => {
                channel.publish(model.readout());
            }
            StationModel::Spring(model, channel) => {
                model.step(ctx);
                model.update_camera(viewport_width, 400.0);
                channel.publish(model.readout());
            }
        }
    }

    pub fn paint(&self, painter: &Painter, rect: Rect, frame: u64) -> Result<(), SceneError> {
        match self {
            StationModel::Circuit(model, _) => scene::circuit_scene::paint(model, painter, rect, frame),
            StationModel::Wind(model, _) => scene::wind_scene::paint(model, painter, rect, frame),
            StationModel::Falling(model, _) => scene::falling_scene::paint(model, painter, rect, frame),
            StationModel::Solar(model, _) => scene::solar_scene::paint(model, painter, rect, frame),
            StationModel::Spring(model, _) => scene::spring_scene::paint(model, painter, rect, frame),
        }
    }
}
