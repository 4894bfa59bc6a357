//! Wind turbine scene.
//!
//! Night landscape in a 1000x1000 virtual space: starfield, turbine with
//! three blades at (500,300), charge station at (650,780) and a city tower
//! at x=860 whose windows light up once the battery holds a charge.

use egui::{Align2, Color32, FontId, Painter, Rect, Shape, Stroke, StrokeKind, vec2};
use models::wind::{WindStatus, WindTurbine};
use rand::Rng;

use crate::primitives::{dashed_line, rotate_around};
use crate::viewport::Viewport;
use crate::{ensure_finite, theme, SceneError};

const HUB: (f32, f32) = (500.0, 300.0);
const STATION: (f32, f32) = (650.0, 780.0);
const TOWER_X: f32 = 860.0;
const TOWER_BASE_Y: f32 = 850.0;
const TOWER_W: f32 = 100.0;
const TOWER_H: f32 = 300.0;
const FLOORS: u32 = 12;
const WINDOWS_PER_FLOOR: u32 = 4;

pub fn paint(
    model: &WindTurbine,
    painter: &Painter,
    rect: Rect,
    frame: u64,
) -> Result<(), SceneError> {
    let vp = match Viewport::fit_square(rect, 1000.0) {
        Some(vp) => vp,
        None => return Ok(()),
    };
    let rotation = ensure_finite(model.rotation(), "rotation")? as f32;
    let wind = model.wind_speed() as f32;
    let energy = model.stored_energy() as f32;
    let rpm = model.rpm() as f32;
    let status = model.status();

    paint_sky(painter, &vp, wind, frame);
    if wind > 0.0 {
        paint_wind_streaks(painter, &vp, wind, frame);
    }
    paint_turbine(painter, &vp, rotation, status);
    paint_station(painter, &vp, energy, rpm, frame);
    paint_tower(painter, &vp, energy, frame);
    paint_status_banner(painter, &vp, wind, status);
    Ok(())
}

fn paint_sky(painter: &Painter, vp: &Viewport, wind: f32, frame: u64) {
    let sky = if wind > 80.0 {
        // storm tint
        Color32::from_rgb(0x1e, 0x1b, 0x4b)
    } else {
        Color32::from_rgb(0x0f, 0x17, 0x2a)
    };
    painter.rect_filled(vp.rect(0.0, 0.0, 1000.0, 1000.0), 0.0, sky);

    // deterministic starfield with a slow per-star flicker
    for i in 0..50u32 {
        let sx = ((i as f32 * 132.1).sin() * 43758.5453).fract().abs() * 1000.0;
        let sy = ((i as f32 * 42.5).cos() * 43758.5453).fract().abs() * 600.0;
        let size = if i % 3 == 0 { 2.0 } else { 1.0 };
        let flicker = (frame as f32 * 0.05 + i as f32).sin() * 0.3 + 0.7;
        painter.circle_filled(
            vp.pt(sx, sy),
            vp.len(size),
            Color32::from_white_alpha((flicker * 128.0) as u8),
        );
    }

    // rolling dark hills
    painter.rect_filled(
        vp.rect(0.0, 850.0, 1000.0, 150.0),
        0.0,
        Color32::from_rgb(0x02, 0x06, 0x17),
    );
}

fn paint_wind_streaks(painter: &Painter, vp: &Viewport, wind: f32, frame: u64) {
    let speed_mul = wind / 100.0;
    let p_speed = speed_mul * 20.0 + 5.0;
    let p_length = speed_mul * 200.0 + 50.0;
    let p_alpha = speed_mul * 0.5 + 0.1;
    let cycle = 1500.0 + p_length;
    let stroke_w = 2.0 + speed_mul * 4.0;
    for i in 0..40u32 {
        let offset = (i * 937) as f32 % cycle;
        let x = (frame as f32 * p_speed + offset) % cycle - 200.0;
        let y = 100.0 + (i * 37 % 600) as f32 + (x * 0.002 + frame as f32 * 0.01).sin() * 20.0;
        let color = theme::WIND_BLADE.gamma_multiply(p_alpha);
        painter.line_segment(
            [vp.pt(x, y), vp.pt(x - p_length, y)],
            Stroke::new(vp.len(stroke_w), color),
        );
    }
}

fn paint_turbine(painter: &Painter, vp: &Viewport, rotation: f32, status: WindStatus) {
    // tapered tower
    painter.add(Shape::convex_polygon(
        vec![
            vp.pt(490.0, 300.0),
            vp.pt(510.0, 300.0),
            vp.pt(540.0, 900.0),
            vp.pt(460.0, 900.0),
        ],
        Color32::from_rgb(0x47, 0x55, 0x69),
        Stroke::NONE,
    ));

    let braked = status == WindStatus::Braked;
    let blade_fill = if braked {
        Color32::from_rgb(0xfc, 0xa5, 0xa5)
    } else {
        Color32::from_rgb(0xf1, 0xf5, 0xf9)
    };
    let blade_edge = if braked {
        theme::SWITCH_OPEN
    } else {
        Color32::from_rgb(0xcb, 0xd5, 0xe1)
    };

    let hub = vp.pt(HUB.0, HUB.1);
    for i in 0..3 {
        let angle = rotation + std::f32::consts::TAU / 3.0 * i as f32;
        // blade outline in local space, rotated about the hub. Split into
        // two convex quads since the full outline is not convex.
        let local = |x: f32, y: f32| rotate_around(hub + vec2(vp.len(x), vp.len(y)), hub, angle);
        painter.add(Shape::convex_polygon(
            vec![
                local(0.0, 0.0),
                local(15.0, -40.0),
                local(-15.0, -40.0),
            ],
            blade_fill,
            Stroke::new(vp.len(2.0), blade_edge),
        ));
        painter.add(Shape::convex_polygon(
            vec![
                local(15.0, -40.0),
                local(10.0, -280.0),
                local(0.0, -300.0),
                local(-10.0, -280.0),
                local(-15.0, -40.0),
            ],
            blade_fill,
            Stroke::new(vp.len(2.0), blade_edge),
        ));
    }
    painter.circle_filled(hub, vp.len(25.0), Color32::from_rgb(0xcb, 0xd5, 0xe1));
}

fn paint_station(painter: &Painter, vp: &Viewport, energy: f32, rpm: f32, frame: u64) {
    let (sx, sy) = STATION;

    // feed cable from the hub, animated while generating
    let cable = if rpm > 0.0 {
        Stroke::new(vp.len(4.0), theme::WIRE_ACTIVE)
    } else {
        Stroke::new(vp.len(4.0), theme::BATTERY_BODY)
    };
    let steps = 24;
    let mut pts = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        // quadratic ease between hub and station, sagging through y=600
        let x = HUB.0 + (sx - HUB.0) * t * t;
        let y = HUB.1 + (600.0 - HUB.1) * (2.0 * t - t * t).min(1.0) + (sy - 600.0) * t * t;
        pts.push(vp.pt(x, y));
    }
    if rpm > 0.0 {
        let offset = -(frame as f32) * 2.0 * vp.scale();
        let mut walked = 0.0;
        for pair in pts.windows(2) {
            dashed_line(
                painter,
                pair[0],
                pair[1],
                vp.len(10.0),
                vp.len(10.0),
                offset - walked,
                cable,
            );
            walked += (pair[1] - pair[0]).length();
        }
    } else {
        for pair in pts.windows(2) {
            painter.line_segment([pair[0], pair[1]], cable);
        }
    }

    // station cabinet with a charge gauge
    let body = vp.rect(sx - 40.0, sy, 80.0, 120.0);
    painter.rect_filled(body, 0.0, theme::BACKGROUND);
    painter.rect_stroke(
        body,
        0.0,
        Stroke::new(vp.len(2.0), Color32::from_rgb(0x47, 0x55, 0x69)),
        StrokeKind::Outside,
    );
    painter.rect_filled(
        vp.rect(sx - 20.0, sy - 10.0, 40.0, 10.0),
        0.0,
        Color32::from_rgb(0x47, 0x55, 0x69),
    );

    let fill_h = energy / 100.0 * 110.0;
    let charge_color = if energy > 80.0 {
        theme::SWITCH_CLOSED
    } else if energy > 30.0 {
        Color32::from_rgb(0xea, 0xb3, 0x08)
    } else {
        theme::SWITCH_OPEN
    };
    painter.rect_filled(
        vp.rect(sx - 35.0, sy + 115.0 - fill_h, 70.0, fill_h),
        0.0,
        charge_color,
    );
    if rpm > 0.0 {
        painter.text(
            vp.pt(sx, sy + 60.0),
            Align2::CENTER_CENTER,
            "⚡",
            FontId::proportional(vp.len(24.0)),
            Color32::WHITE,
        );
    }
}

fn paint_tower(painter: &Painter, vp: &Viewport, energy: f32, frame: u64) {
    let has_power = energy > 1.0;
    let left = TOWER_X - TOWER_W / 2.0;
    let top = TOWER_BASE_Y - TOWER_H;

    // distribution line from the station to a standoff on the tower wall
    painter.line_segment(
        [vp.pt(STATION.0 + 40.0, STATION.1 + 20.0), vp.pt(left, TOWER_BASE_Y - 150.0)],
        Stroke::new(vp.len(3.0), Color32::from_rgb(0x64, 0x74, 0x8b)),
    );
    painter.rect_filled(
        vp.rect(left - 2.0, TOWER_BASE_Y - 155.0, 4.0, 10.0),
        0.0,
        theme::BATTERY_BODY,
    );

    painter.rect_filled(vp.rect(left, top, TOWER_W, TOWER_H), 0.0, theme::BACKGROUND);
    // roof machinery and mast
    painter.rect_filled(vp.rect(TOWER_X - 20.0, top - 15.0, 40.0, 15.0), 0.0, theme::BATTERY_NEG);
    painter.rect_filled(vp.rect(TOWER_X + 10.0, top - 25.0, 10.0, 25.0), 0.0, theme::BATTERY_NEG);

    if has_power {
        let blink = (frame as f32 * 0.1).sin() > 0.0;
        let beacon = if blink {
            theme::SWITCH_OPEN
        } else {
            Color32::from_rgb(0x7f, 0x1d, 0x1d)
        };
        painter.circle_filled(vp.pt(TOWER_X + 15.0, top - 25.0), vp.len(3.0), beacon);
    }

    let win_w = 14.0;
    let win_h = 16.0;
    let gap_x = (TOWER_W - WINDOWS_PER_FLOOR as f32 * win_w) / (WINDOWS_PER_FLOOR + 1) as f32;
    let gap_y = (TOWER_H - FLOORS as f32 * win_h) / (FLOORS + 1) as f32;
    let mut rng = rand::thread_rng();
    for f in 0..FLOORS {
        for w in 0..WINDOWS_PER_FLOOR {
            let wx = left + gap_x + w as f32 * (win_w + gap_x);
            let wy = top + gap_y + f as f32 * (win_h + gap_y) + 10.0;
            // a few tenants are always out
            let tenant_active = (f * 7 + w * 13) % 5 != 0;
            let fill = if has_power && tenant_active {
                let warm = (f + w) % 2 == 0;
                if rng.gen::<f32>() > 0.995 {
                    theme::WIRE
                } else if warm {
                    Color32::from_rgb(0xfe, 0xf3, 0xc7)
                } else {
                    theme::WIND_BLADE
                }
            } else {
                theme::BACKGROUND
            };
            painter.rect_filled(vp.rect(wx, wy, win_w, win_h), 0.0, fill);
        }
    }
}

fn paint_status_banner(painter: &Painter, vp: &Viewport, wind: f32, status: WindStatus) {
    painter.rect_filled(
        vp.rect(260.0, 150.0, 480.0, 70.0),
        vp.len(30.0),
        Color32::from_black_alpha(150),
    );
    let color = match status {
        WindStatus::NoWind => theme::WIRE,
        WindStatus::Stalled => theme::WIRE_ACTIVE,
        WindStatus::Braked => theme::SWITCH_OPEN,
        WindStatus::Optimal => Color32::from_rgb(0x4a, 0xde, 0x80),
    };
    painter.text(
        vp.pt(500.0, 185.0),
        Align2::CENTER_CENTER,
        status.label(),
        FontId::monospace(vp.len(40.0)),
        color,
    );
    if wind > 80.0 {
        for x in [300.0, 700.0] {
            painter.text(
                vp.pt(x, 190.0),
                Align2::CENTER_CENTER,
                "⚠",
                FontId::proportional(vp.len(50.0)),
                theme::WIRE_ACTIVE,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn empty_rect_is_a_clean_skip() {
        let model = WindTurbine::new();
        let ctx = egui::Context::default();
        let painter = egui::Painter::new(
            ctx,
            egui::LayerId::background(),
            Rect::from_min_size(pos2(0.0, 0.0), vec2(10.0, 10.0)),
        );
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(0.0, 0.0));
        assert_eq!(paint(&model, &painter, rect, 0), Ok(()));
    }
}
