//! The eframe host: station switching, controls, canvas and plots.

use eframe::egui;
use egui::{Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotBounds};
use models::circuit::{CircuitModel, MAX_BATTERIES, MAX_BULBS};
use models::falling::{BodyKind, FallingBody, MIN_DROP_PERCENT};
use models::solar::SolarPanel;
use models::spring::{SpringModel, MIN_RELEASE_PERCENT};
use models::wind::WindTurbine;
use scene::RenderSurface;
use simcore::{Model, Phase, SimContext};

use crate::hud::{self, HudCard, HudCorner};
use crate::station::{Station, StationModel};
use crate::trace::EnergyTrace;

const PLOT_WINDOW_S: f64 = 10.0;
const ACCENT_GREEN: Color32 = Color32::from_rgb(0x4a, 0xde, 0x80);
const ACCENT_BLUE: Color32 = Color32::from_rgb(0x60, 0xa5, 0xfa);
const ACCENT_ORANGE: Color32 = Color32::from_rgb(0xfb, 0x92, 0x3c);
const ACCENT_RED: Color32 = Color32::from_rgb(0xf8, 0x71, 0x71);
const ACCENT_PURPLE: Color32 = Color32::from_rgb(0xc0, 0x84, 0xfc);

pub struct EnergyLabApp {
    model: StationModel,
    surface: RenderSurface,
    trace: EnergyTrace,
    paused: bool,
    t: f64,
}

impl EnergyLabApp {
    pub fn new() -> Self {
        EnergyLabApp {
            model: StationModel::new(Station::Circuit),
            surface: RenderSurface::new(),
            trace: EnergyTrace::new(PLOT_WINDOW_S, 1.0 / 60.0),
            paused: false,
            t: 0.0,
        }
    }

    fn switch_station(&mut self, station: Station) {
        if self.model.station() != station {
            log::info!("switching to station: {}", station.title());
            self.model = StationModel::new(station);
            self.surface = RenderSurface::new();
            self.trace.clear();
            self.t = 0.0;
        }
    }

    fn reset_station(&mut self) {
        self.model = StationModel::new(self.model.station());
        self.trace.clear();
    }

    /// Physics first, then publish, so the painters and HUD both see the
    /// same stepped state this frame.
    fn step(&mut self, dt: f64, canvas_virtual_width: f64) {
        if self.paused {
            return;
        }
        self.t += dt;
        let ctx = SimContext { dt, t: self.t };
        self.model.step_and_publish(ctx, canvas_virtual_width);

        match &self.model {
            StationModel::Falling(_, channel) => {
                let r = channel.latest();
                self.trace.push(self.t, r.potential_j, r.kinetic_j);
            }
            StationModel::Spring(_, channel) => {
                let r = channel.latest();
                self.trace.push(self.t, r.potential_j, r.kinetic_j);
            }
            _ => {}
        }
    }

    fn has_plot(&self) -> bool {
        matches!(
            self.model.station(),
            Station::Falling | Station::Spring
        )
    }
}

impl Default for EnergyLabApp {
    fn default() -> Self {
        Self::new()
    }
}

impl eframe::App for EnergyLabApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dt = ctx.input(|i| i.stable_dt).min(0.05) as f64;

        egui::TopBottomPanel::bottom("stations").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                for station in Station::ALL {
                    let selected = self.model.station() == station;
                    if ui.selectable_label(selected, station.title()).clicked() {
                        self.switch_station(station);
                    }
                }
                ui.separator();
                if ui
                    .button(if self.paused { "\u{25b6} Resume" } else { "\u{23f8} Pause" })
                    .clicked()
                {
                    self.paused = !self.paused;
                }
                if ui.button("\u{27f2} Reset").clicked() {
                    self.reset_station();
                }
            });
        });

        egui::SidePanel::right("controls")
            .resizable(false)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading(self.model.station().title());
                ui.label(self.model.station().description());
                ui.separator();
                match &mut self.model {
                    StationModel::Circuit(model, _) => circuit_controls(ui, model),
                    StationModel::Wind(model, _) => wind_controls(ui, model),
                    StationModel::Falling(model, _) => falling_controls(ui, model),
                    StationModel::Solar(model, _) => solar_controls(ui, model),
                    StationModel::Spring(model, _) => spring_controls(ui, model),
                }
            });

        if self.has_plot() {
            egui::TopBottomPanel::bottom("energy_plot")
                .default_height(160.0)
                .show(ctx, |ui| {
                    self.show_plot(ui);
                });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                // the spring camera needs the canvas width before stepping
                let canvas_width = ui.available_width().max(1.0);
                let virtual_width = (canvas_width / (ui.available_height().max(1.0)) * 500.0) as f64;
                self.step(dt, virtual_width);

                self.surface.set_animated(!self.paused);
                let (model, surface) = (&self.model, &mut self.surface);
                let mut canvas_rect = None;
                surface.canvas(ui, |painter, rect, frame| {
                    canvas_rect = Some(rect);
                    model.paint(painter, rect, frame)
                });
                if let Some(rect) = canvas_rect {
                    draw_hud(ui.painter(), rect, &self.model);
                }
            });

        ctx.request_repaint_after(std::time::Duration::from_millis(10));
    }
}

impl EnergyLabApp {
    fn show_plot(&mut self, ui: &mut Ui) {
        let x_max = self.trace.latest_t().unwrap_or(0.0).max(1.0);
        let x_min = (x_max - PLOT_WINDOW_S).max(0.0);
        let y_max = (self.trace.max_energy() * 1.1).max(1.0);
        Plot::new("energy")
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Time (s)")
            .y_axis_label("Energy (J)")
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_min, 0.0], [x_max, y_max]));
                plot_ui.line(Line::new("Potential (J)", self.trace.potential_line()));
                plot_ui.line(Line::new("Kinetic (J)", self.trace.kinetic_line()));
            });
    }
}

/// Integer count adjusted with -/+ buttons.
fn stepper(ui: &mut Ui, label: &str, value: &mut u8, min: u8, max: u8) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.add_enabled(*value < max, egui::Button::new("+")).clicked() {
                *value += 1;
            }
            ui.monospace(format!("{value}"));
            if ui.add_enabled(*value > min, egui::Button::new("-")).clicked() {
                *value -= 1;
            }
        });
    });
}

fn circuit_controls(ui: &mut Ui, model: &mut CircuitModel) {
    let mut params = model.params();
    stepper(ui, "Batteries (Source)", &mut params.batteries, 0, MAX_BATTERIES);
    ui.checkbox(&mut params.switch_closed, "Circuit Switch");
    stepper(ui, "Bulbs (Receiver)", &mut params.bulbs, 1, MAX_BULBS);
    model.set_params(params);
}

fn wind_controls(ui: &mut Ui, model: &mut WindTurbine) {
    let mut speed = model.wind_speed();
    if ui
        .add(egui::Slider::new(&mut speed, 0.0..=100.0).text("Wind Speed (MPH)"))
        .changed()
    {
        model.set_wind_speed(speed);
    }
    ui.small("Calm: battery drains. Above 85 MPH: safety brake.");
    if ui.button("Drain").clicked() {
        model.drain();
    }
}

fn falling_controls(ui: &mut Ui, model: &mut FallingBody) {
    ui.horizontal(|ui| {
        for kind in BodyKind::ALL {
            let selected = model.params().kind == kind;
            if ui.selectable_label(selected, kind.spec().label).clicked() {
                model.set_kind(kind);
            }
        }
    });

    let mut height = model.params().height_percent;
    if ui
        .add(egui::Slider::new(&mut height, 0.0..=100.0).text("Drop Height (%)"))
        .changed()
    {
        model.set_height_percent(height);
    }

    let mut slow = model.params().slow_motion;
    if ui.checkbox(&mut slow, "Slow Motion").changed() {
        model.set_slow_motion(slow);
    }

    let mut air = model.params().atmosphere;
    if ui.checkbox(&mut air, "Atmosphere (drag)").changed() {
        model.set_atmosphere(air);
    }

    match model.phase() {
        Phase::Idle => {
            let armed = model.params().height_percent >= MIN_DROP_PERCENT;
            if ui.add_enabled(armed, egui::Button::new("DROP")).clicked() {
                model.drop_body();
            }
        }
        Phase::Running => {
            ui.add_enabled(false, egui::Button::new("Dropping..."));
        }
        Phase::Finished => {
            if ui.button("Reset").clicked() {
                model.reset();
            }
        }
    }
}

fn solar_controls(ui: &mut Ui, model: &mut SolarPanel) {
    let mut hour = model.params().time_of_day;
    let response = ui.add(
        egui::Slider::new(&mut hour, 0.0..=23.9)
            .text("Time")
            .custom_formatter(|v, _| format_time(v)),
    );
    if response.changed() {
        model.set_time_of_day(hour);
    }

    ui.horizontal(|ui| {
        if ui.button("Sunrise").clicked() {
            model.set_time_of_day(6.0);
        }
        if ui.button("Noon").clicked() {
            model.set_time_of_day(12.0);
        }
        if ui.button("Night").clicked() {
            model.set_time_of_day(22.0);
        }
    });

    let mut clouds = model.params().cloud_density;
    if ui
        .add(egui::Slider::new(&mut clouds, 0.0..=100.0).text("Clouds"))
        .changed()
    {
        model.set_cloud_density(clouds);
    }
}

fn spring_controls(ui: &mut Ui, model: &mut SpringModel) {
    let idle = model.phase() == Phase::Idle;

    ui.add_enabled_ui(idle, |ui| {
        let mut stiff = model.params().stiff;
        let label = if stiff { "Spring: STIFF" } else { "Spring: LOOSE" };
        if ui.checkbox(&mut stiff, label).changed() {
            model.set_stiff(stiff);
        }
        let mut compression = model.params().compression;
        if ui
            .add(egui::Slider::new(&mut compression, 0.0..=100.0).text("Compression"))
            .changed()
        {
            model.set_compression(compression);
        }
    });

    if idle {
        let armed = model.params().compression >= MIN_RELEASE_PERCENT;
        if ui.add_enabled(armed, egui::Button::new("RELEASE")).clicked() {
            model.release();
        }
    } else if ui.button("RESET").clicked() {
        model.reset();
    }
}

fn format_time(hour: f64) -> String {
    let h = hour.floor() as u32;
    let m = ((hour.fract()) * 60.0).floor() as u32;
    let ampm = if h >= 12 { "PM" } else { "AM" };
    let display_h = match h % 12 {
        0 => 12,
        other => other,
    };
    format!("{display_h}:{m:02} {ampm}")
}

fn draw_hud(painter: &egui::Painter, rect: egui::Rect, model: &StationModel) {
    match model {
        StationModel::Circuit(circuit, channel) => {
            let batteries = circuit.params().batteries;
            let r = channel.latest();
            hud::draw_cards(
                painter,
                rect,
                HudCorner::TopLeft,
                &[HudCard::new("SOURCE", format!("{batteries}x"), "BATT", Color32::WHITE)],
            );
            hud::draw_cards(
                painter,
                rect,
                HudCorner::TopRight,
                &[HudCard::new(
                    "OUTPUT",
                    format!("{:.0}", r.brightness * 100.0),
                    "%",
                    Color32::WHITE,
                )],
            );
        }
        StationModel::Wind(_, channel) => {
            let r = channel.latest();
            hud::draw_cards(
                painter,
                rect,
                HudCorner::TopLeft,
                &[HudCard::new("INPUT", format!("{:.0}", r.wind_speed), "MPH", Color32::WHITE)],
            );
            hud::draw_cards(
                painter,
                rect,
                HudCorner::TopRight,
                &[HudCard::new(
                    "BATTERY",
                    format!("{:.0}", r.stored_energy),
                    "%",
                    Color32::WHITE,
                )],
            );
        }
        StationModel::Falling(_, channel) => {
            let r = channel.latest();
            hud::draw_cards(
                painter,
                rect,
                HudCorner::TopLeft,
                &[HudCard::new("SPEED", format!("{:.1}", r.speed_mps), "m/s", ACCENT_GREEN)],
            );
            hud::draw_cards(
                painter,
                rect,
                HudCorner::TopRight,
                &[
                    HudCard::new("POTENTIAL", format!("{:.1}", r.potential_j), "J", ACCENT_BLUE),
                    HudCard::new("KINETIC", format!("{:.1}", r.kinetic_j), "J", ACCENT_ORANGE),
                ],
            );
        }
        StationModel::Solar(solar, channel) => {
            let r = channel.latest();
            hud::draw_cards(
                painter,
                rect,
                HudCorner::TopLeft,
                &[HudCard::new(
                    "INPUT",
                    format_time(solar.params().time_of_day),
                    "",
                    Color32::WHITE,
                )],
            );
            hud::draw_cards(
                painter,
                rect,
                HudCorner::TopRight,
                &[HudCard::new(
                    "FAN SPEED",
                    format!("{:.0}", r.output_percent),
                    "%",
                    ACCENT_GREEN,
                )],
            );
        }
        StationModel::Spring(_, channel) => {
            let r = channel.latest();
            hud::draw_cards(
                painter,
                rect,
                HudCorner::TopLeft,
                &[
                    HudCard::new("KINETIC", format!("{:.1}", r.kinetic_j), "J", ACCENT_BLUE),
                    HudCard::new("POTENTIAL", format!("{:.1}", r.potential_j), "J", ACCENT_RED),
                ],
            );
            hud::draw_cards(
                painter,
                rect,
                HudCorner::TopRight,
                &[
                    HudCard::new("DISTANCE", format!("{:.2}", r.distance_m), "m", ACCENT_PURPLE),
                    HudCard::new("SPEED", format!("{:.1}", r.speed_mps), "m/s", ACCENT_GREEN),
                ],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_formatting_matches_the_clock() {
        assert_eq!(format_time(0.0), "12:00 AM");
        assert_eq!(format_time(6.5), "6:30 AM");
        assert_eq!(format_time(12.0), "12:00 PM");
        assert_eq!(format_time(22.25), "10:15 PM");
    }

    #[test]
    fn switching_station_clears_time_and_trace() {
        let mut app = EnergyLabApp::new();
        app.t = 5.0;
        app.trace.push(5.0, 1.0, 1.0);
        app.switch_station(Station::Spring);
        assert_eq!(app.t, 0.0);
        assert_eq!(app.model.station(), Station::Spring);
        assert!(app.trace.latest_t().is_none());
    }

    #[test]
    fn stepping_while_paused_freezes_the_clock() {
        let mut app = EnergyLabApp::new();
        app.paused = true;
        app.step(0.016, 1000.0);
        assert_eq!(app.t, 0.0);
    }
}
