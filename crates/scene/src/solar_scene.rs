//! Solar panel scene.
//!
//! Width-driven viewport: 1000 virtual units fill the surface horizontally
//! and the ground line sits 120 units above the bottom edge, wherever that
//! falls on the derived virtual height. The sun rides a flattened arc whose
//! radius adapts to the available sky.

use egui::{Color32, Painter, Rect, Shape, Stroke, vec2};
use models::solar::{SolarDerived, SolarPanel, FAN_BLUR_SPEED};

use crate::primitives::{dashed_line, ellipse_filled, glow_circle, rotate_around};
use crate::viewport::Viewport;
use crate::{ensure_finite, theme, SceneError};

const V_WIDTH: f32 = 1000.0;

pub fn paint(
    model: &SolarPanel,
    painter: &Painter,
    rect: Rect,
    frame: u64,
) -> Result<(), SceneError> {
    let vp = match Viewport::fit_width(rect, V_WIDTH) {
        Some(vp) => vp,
        None => return Ok(()),
    };
    let derived = model.derive();
    let output = ensure_finite(derived.output, "output")? as f32;
    let cloud_density = model.params().cloud_density as f32;

    let v_height = vp.virtual_height();
    let center_x = V_WIDTH / 2.0;
    let ground_y = v_height - 120.0;

    paint_sky(painter, &vp, &derived, ground_y, frame);
    paint_mountains(painter, &vp, derived.is_day, ground_y);

    let sun = if derived.is_day {
        let sun = sun_position(&derived, center_x, ground_y);
        paint_sun(painter, &vp, sun, frame);
        Some(sun)
    } else {
        let moon = (V_WIDTH * 0.8, 150.0);
        paint_moon(painter, &vp, moon);
        None
    };

    paint_ground(painter, &vp, derived.is_day, ground_y, v_height, frame);

    let fan_x = center_x + 300.0;
    let fan_y = ground_y + 30.0;
    paint_wire(painter, &vp, center_x, fan_x, ground_y, output, frame);
    if let Some((sx, sy)) = sun {
        if output > 0.0 {
            paint_photons(painter, &vp, (sx, sy), (center_x, ground_y - 40.0), frame);
        }
    }
    paint_panel(painter, &vp, center_x, ground_y - 35.0, derived.is_day);
    paint_fan(painter, &vp, fan_x, fan_y, output, frame);
    if cloud_density > 0.0 {
        paint_clouds(painter, &vp, cloud_density, frame);
    }
    Ok(())
}

/// Where the sun sits on its arc for the current day progress.
fn sun_position(derived: &SolarDerived, center_x: f32, ground_y: f32) -> (f32, f32) {
    let available_sky = ground_y - 100.0;
    let max_radius = (V_WIDTH * 0.45).min(available_sky * 0.9);
    let arc_center_y = ground_y + max_radius * 0.3;
    let angle = std::f32::consts::PI * (1.0 - derived.day_progress as f32);
    (
        center_x + angle.cos() * max_radius,
        arc_center_y - angle.sin() * max_radius,
    )
}

fn paint_sky(painter: &Painter, vp: &Viewport, derived: &SolarDerived, ground_y: f32, frame: u64) {
    let v_height = vp.virtual_height();
    let sun_height = derived.sun_height as f32;
    let sky = if derived.is_day {
        if sun_height < 0.2 {
            // golden hour blend toward the horizon orange
            theme::lerp(
                Color32::from_rgb(0x60, 0xa5, 0xfa),
                Color32::from_rgb(0xfb, 0x92, 0x3c),
                1.0 - sun_height * 5.0,
            )
        } else {
            theme::lerp(
                Color32::from_rgb(0x02, 0x84, 0xc7),
                Color32::from_rgb(0xba, 0xe6, 0xfd),
                0.4,
            )
        }
    } else {
        Color32::from_rgb(0x0f, 0x17, 0x2a)
    };
    painter.rect_filled(vp.rect(0.0, 0.0, V_WIDTH, v_height), 0.0, sky);

    // stars fade in as the sun drops below 0.1
    if !derived.is_day || sun_height < 0.1 {
        let opacity = if derived.is_day {
            1.0 - sun_height * 10.0
        } else {
            1.0
        };
        for i in 0..80u32 {
            let x = ((i as f32 * 123.0).sin() * 10000.0).abs() % V_WIDTH;
            let y = ((i as f32 * 61.5).cos() * 10000.0).abs() % (ground_y * 0.8);
            let size = if i % 3 == 0 { 1.5 } else { 1.0 };
            let twinkle = (frame as f32 * 0.03 + i as f32).sin() * 0.25 + 0.55;
            painter.circle_filled(
                vp.pt(x, y),
                vp.len(size),
                Color32::from_white_alpha((twinkle * opacity * 255.0) as u8),
            );
        }
    }
}

fn paint_mountains(painter: &Painter, vp: &Viewport, is_day: bool, ground_y: f32) {
    let color = if is_day {
        Color32::from_rgba_unmultiplied(0x1e, 0x3a, 0x8a, 76)
    } else {
        Color32::from_rgba_unmultiplied(0x02, 0x06, 0x17, 128)
    };
    // the ridge line is concave, so fill it as triangles against the base
    let ridge = [
        (0.0, ground_y - 100.0),
        (200.0, ground_y - 250.0),
        (450.0, ground_y - 80.0),
        (700.0, ground_y - 180.0),
        (1000.0, ground_y - 50.0),
    ];
    for pair in ridge.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        painter.add(Shape::convex_polygon(
            vec![vp.pt(x0, ground_y), vp.pt(x0, y0), vp.pt(x1, y1), vp.pt(x1, ground_y)],
            color,
            Stroke::NONE,
        ));
    }
}

fn paint_sun(painter: &Painter, vp: &Viewport, sun: (f32, f32), frame: u64) {
    let (sx, sy) = sun;
    let corona = 150.0 + (frame as f32 * 0.05).sin() * 10.0;
    glow_circle(
        painter,
        vp.pt(sx, sy),
        vp.len(corona * 0.35),
        Color32::from_rgba_unmultiplied(0xfd, 0xba, 0x74, 110),
        4,
    );
    painter.circle_filled(vp.pt(sx, sy), vp.len(35.0), Color32::from_rgb(0xff, 0xfb, 0xeb));
}

fn paint_moon(painter: &Painter, vp: &Viewport, moon: (f32, f32)) {
    let (mx, my) = moon;
    let center = vp.pt(mx, my);
    painter.circle_filled(center, vp.len(30.0), Color32::from_rgb(0xf8, 0xfa, 0xfc));
    let crater = Color32::from_rgb(0xcb, 0xd5, 0xe1);
    painter.circle_filled(center + vec2(vp.len(-10.0), vp.len(5.0)), vp.len(8.0), crater);
    painter.circle_filled(center + vec2(vp.len(12.0), vp.len(-8.0)), vp.len(5.0), crater);
}

fn paint_ground(
    painter: &Painter,
    vp: &Viewport,
    is_day: bool,
    ground_y: f32,
    v_height: f32,
    frame: u64,
) {
    let grass = if is_day {
        theme::GROUND
    } else {
        Color32::from_rgb(0x06, 0x4e, 0x3b)
    };
    painter.rect_filled(vp.rect(0.0, ground_y, V_WIDTH, v_height - ground_y), 0.0, grass);

    // swaying grass blades along the top edge
    let blade = Stroke::new(
        vp.len(2.0),
        if is_day {
            Color32::from_rgb(0x16, 0xa3, 0x4a)
        } else {
            Color32::from_rgb(0x06, 0x5f, 0x46)
        },
    );
    let mut i = 0.0;
    while i < V_WIDTH {
        let y_base = ground_y - 5.0 + (i * 0.02).sin() * 20.0;
        if y_base <= ground_y + 20.0 {
            let h = 5.0 + ((i * 321.0).sin() + 1.0) * 3.0;
            let sway = (frame as f32 * 0.05 + i).sin() * 2.0;
            painter.line_segment([vp.pt(i, y_base), vp.pt(i + sway, y_base - h)], blade);
        }
        i += 15.0;
    }
}

fn paint_wire(
    painter: &Painter,
    vp: &Viewport,
    center_x: f32,
    fan_x: f32,
    ground_y: f32,
    output: f32,
    frame: u64,
) {
    let path = [
        vp.pt(center_x, ground_y + 25.0),
        vp.pt(center_x + 100.0, ground_y + 20.0),
        vp.pt(fan_x, ground_y + 20.0),
        vp.pt(fan_x, ground_y - 50.0),
    ];
    for pair in path.windows(2) {
        painter.line_segment([pair[0], pair[1]], Stroke::new(vp.len(6.0), theme::BATTERY_BODY));
    }
    if output > 0.0 {
        let pulse = if output > 0.8 {
            Color32::from_rgb(0xfa, 0xcc, 0x15)
        } else {
            theme::WIRE_ACTIVE
        };
        let offset = -(frame as f32 * output * 10.0) % 20.0 * vp.scale();
        let mut walked = 0.0;
        for pair in path.windows(2) {
            dashed_line(
                painter,
                pair[0],
                pair[1],
                vp.len(10.0),
                vp.len(30.0),
                offset - walked,
                Stroke::new(vp.len(3.0), pulse),
            );
            walked += (pair[1] - pair[0]).length();
        }
    }
}

fn paint_photons(painter: &Painter, vp: &Viewport, sun: (f32, f32), panel: (f32, f32), frame: u64) {
    let stroke = Stroke::new(vp.len(1.0), Color32::from_white_alpha(75));
    for i in 0..5u32 {
        let t = ((frame + i as u64 * 20) % 100) as f32 / 100.0;
        let lx = sun.0 + (panel.0 - sun.0) * t;
        let ly = sun.1 + (panel.1 - sun.1) * t;
        let jitter = (t * 10.0 + i as f32).sin() * 20.0;
        painter.line_segment(
            [
                vp.pt(lx + jitter, ly),
                vp.pt(
                    lx + jitter - (panel.0 - sun.0) * 0.05,
                    ly - (panel.1 - sun.1) * 0.05,
                ),
            ],
            stroke,
        );
    }
}

fn paint_panel(painter: &Painter, vp: &Viewport, center_x: f32, panel_y: f32, is_day: bool) {
    // stand legs and rear support
    painter.add(Shape::convex_polygon(
        vec![
            vp.pt(center_x - 40.0, panel_y + 60.0),
            vp.pt(center_x + 40.0, panel_y + 60.0),
            vp.pt(center_x + 50.0, panel_y + 90.0),
            vp.pt(center_x - 50.0, panel_y + 90.0),
        ],
        theme::WIRE,
        Stroke::NONE,
    ));
    painter.rect_filled(
        vp.rect(center_x - 5.0, panel_y, 10.0, 80.0),
        0.0,
        Color32::from_rgb(0x64, 0x74, 0x8b),
    );

    // tilted board, drawn as rotated quads
    let tilt = 0.1;
    let center = vp.pt(center_x, panel_y);
    let quad = |w: f32, h: f32| -> Vec<egui::Pos2> {
        [(-w, -h), (w, -h), (w, h), (-w, h)]
            .iter()
            .map(|&(dx, dy)| {
                rotate_around(center + vec2(vp.len(dx / 2.0), vp.len(dy / 2.0)), center, tilt)
            })
            .collect()
    };
    painter.add(Shape::convex_polygon(
        quad(280.0, 160.0),
        Color32::from_rgb(0x94, 0xa3, 0xb8),
        Stroke::NONE,
    ));
    let cells = if is_day {
        Color32::from_rgb(0x17, 0x25, 0x54)
    } else {
        Color32::from_rgb(0x02, 0x06, 0x17)
    };
    painter.add(Shape::convex_polygon(quad(264.0, 144.0), cells, Stroke::NONE));

    // silver cell grid
    let grid = Stroke::new(vp.len(2.0), Color32::from_white_alpha(38));
    let cell_w = 264.0;
    let cell_h = 144.0;
    let local = |x: f32, y: f32| rotate_around(center + vec2(vp.len(x), vp.len(y)), center, tilt);
    for i in 1..4 {
        let y = -cell_h / 2.0 + cell_h / 4.0 * i as f32;
        painter.line_segment([local(-cell_w / 2.0, y), local(cell_w / 2.0, y)], grid);
    }
    for i in 1..6 {
        let x = -cell_w / 2.0 + cell_w / 6.0 * i as f32;
        painter.line_segment([local(x, -cell_h / 2.0), local(x, cell_h / 2.0)], grid);
    }
}

fn paint_fan(painter: &Painter, vp: &Viewport, fan_x: f32, fan_y: f32, output: f32, frame: u64) {
    ellipse_filled(
        painter,
        vp.pt(fan_x, fan_y),
        vec2(vp.len(40.0), vp.len(10.0)),
        Color32::from_rgb(0x47, 0x55, 0x69),
    );
    painter.rect_filled(
        vp.rect(fan_x - 4.0, fan_y - 100.0, 8.0, 100.0),
        0.0,
        Color32::from_rgb(0x64, 0x74, 0x8b),
    );
    let hub = vp.pt(fan_x, fan_y - 100.0);
    painter.rect_filled(
        Rect::from_center_size(hub, vec2(vp.len(40.0), vp.len(40.0))),
        vp.len(10.0),
        theme::BATTERY_BODY,
    );
    painter.circle_stroke(hub, vp.len(65.0), Stroke::new(vp.len(3.0), theme::WIRE));

    let speed = output * 40.0;
    let fast = speed as f64 > FAN_BLUR_SPEED;
    let angle = frame as f32 * speed * 0.05;
    if fast {
        let blur = ((speed - 15.0) / 40.0).min(0.4);
        painter.circle_filled(
            hub,
            vp.len(60.0),
            Color32::from_rgba_unmultiplied(0xc8, 0xdc, 0xf0, (blur * 255.0) as u8),
        );
    }
    let blade_alpha = if fast { 150 } else { 255 };
    let blade_fill = Color32::from_rgba_unmultiplied(0xe2, 0xe8, 0xf0, blade_alpha);
    for i in 0..3 {
        let a = angle + std::f32::consts::TAU / 3.0 * i as f32;
        // teardrop blade approximated by a rotated triangle fan
        let tip = rotate_around(hub + vec2(vp.len(55.0), 0.0), hub, a);
        let lead = rotate_around(hub + vec2(vp.len(30.0), vp.len(-12.0)), hub, a);
        let trail = rotate_around(hub + vec2(vp.len(28.0), vp.len(14.0)), hub, a);
        painter.add(Shape::convex_polygon(
            vec![hub, lead, tip, trail],
            blade_fill,
            Stroke::NONE,
        ));
    }
    painter.circle_filled(hub, vp.len(8.0), Color32::from_rgb(0xcb, 0xd5, 0xe1));
}

fn paint_clouds(painter: &Painter, vp: &Viewport, density: f32, frame: u64) {
    let opacity = (density / 80.0).min(0.95);
    let drift = 0.5;
    let wrap = V_WIDTH + 300.0;
    let mut clouds = vec![
        ((frame as f32 * drift) % wrap - 150.0, 150.0, 1.2),
        ((frame as f32 * drift * 0.8 + 500.0) % wrap - 150.0, 220.0, 0.9),
    ];
    if density > 50.0 {
        clouds.push(((frame as f32 * drift * 1.2 + 200.0) % wrap - 150.0, 100.0, 1.5));
    }
    for (cx, cy, scale) in clouds {
        let puff = |dx: f32, dy: f32, r: f32, color: Color32| {
            painter.circle_filled(
                vp.pt(cx + dx * scale, cy + dy * scale),
                vp.len(r * scale),
                color,
            );
        };
        let shadow = Color32::from_rgba_unmultiplied(0x1e, 0x29, 0x3b, (opacity * 76.0) as u8);
        puff(10.0, 10.0, 35.0, shadow);
        puff(50.0, 15.0, 30.0, shadow);
        let white = Color32::from_rgba_unmultiplied(255, 255, 255, (opacity * 255.0) as u8);
        puff(0.0, 0.0, 40.0, white);
        puff(40.0, -10.0, 50.0, white);
        puff(80.0, 5.0, 40.0, white);
        puff(40.0, 20.0, 35.0, white);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn empty_rect_is_a_clean_skip() {
        let model = SolarPanel::new();
        let ctx = egui::Context::default();
        let painter = egui::Painter::new(
            ctx,
            egui::LayerId::background(),
            Rect::from_min_size(pos2(0.0, 0.0), vec2(10.0, 10.0)),
        );
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(0.0, 100.0));
        assert_eq!(paint(&model, &painter, rect, 0), Ok(()));
    }

    #[test]
    fn sun_arc_spans_horizon_to_horizon() {
        let mut model = SolarPanel::new();
        model.set_time_of_day(6.0);
        let dawn = sun_position(&model.derive(), 500.0, 600.0);
        model.set_time_of_day(12.0);
        let noon = sun_position(&model.derive(), 500.0, 600.0);
        model.set_time_of_day(18.0);
        let dusk = sun_position(&model.derive(), 500.0, 600.0);
        assert!(dawn.0 < noon.0 && noon.0 < dusk.0);
        assert!(noon.1 < dawn.1 && noon.1 < dusk.1);
    }
}
