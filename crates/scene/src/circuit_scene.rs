//! Battery and bulb circuit scene.
//!
//! Virtual space is 1000x1000 with the wire loop spanning (200,200) to
//! (800,800) and the knife switch sitting mid-span on the bottom wire.

use egui::{Align2, Color32, CornerRadius, FontId, Painter, Rect, Stroke, StrokeKind, vec2};
use models::circuit::{CircuitModel, GlowBand};

use crate::primitives::{dashed_polyline, glow_circle, rotate_around};
use crate::viewport::Viewport;
use crate::{ensure_finite, theme, SceneError};

const LEFT_X: f32 = 200.0;
const RIGHT_X: f32 = 800.0;
const TOP_Y: f32 = 200.0;
const BOTTOM_Y: f32 = 800.0;
const SWITCH_X: f32 = 500.0;
const SLOT_SPACING: f32 = 200.0;

pub fn paint(
    model: &CircuitModel,
    painter: &Painter,
    rect: Rect,
    frame: u64,
) -> Result<(), SceneError> {
    let vp = match Viewport::fit_square(rect, 1000.0) {
        Some(vp) => vp,
        None => return Ok(()),
    };
    let brightness = ensure_finite(model.brightness(), "brightness")? as f32;
    let params = model.params();
    let lit = brightness > 0.0;

    let wire = |a: (f32, f32), b: (f32, f32)| {
        let from = vp.pt(a.0, a.1);
        let to = vp.pt(b.0, b.1);
        painter.line_segment([from, to], Stroke::new(vp.len(16.0), Color32::from_black_alpha(100)));
        let core = if lit {
            Color32::from_rgb(0xf5, 0x9e, 0x0b)
        } else {
            theme::BULB_OFF
        };
        painter.line_segment([from, to], Stroke::new(vp.len(10.0), core));
        painter.line_segment(
            [from, to],
            Stroke::new(vp.len(2.0), Color32::from_white_alpha(50)),
        );
    };

    wire((LEFT_X, TOP_Y), (RIGHT_X, TOP_Y));
    wire((RIGHT_X, TOP_Y), (RIGHT_X, BOTTOM_Y));
    wire((LEFT_X, TOP_Y), (LEFT_X, BOTTOM_Y));
    if params.switch_closed {
        wire((LEFT_X, BOTTOM_Y), (RIGHT_X, BOTTOM_Y));
    } else {
        // the bottom wire parts around the open switch
        wire((LEFT_X, BOTTOM_Y), (SWITCH_X - 50.0, BOTTOM_Y));
        wire((SWITCH_X + 50.0, BOTTOM_Y), (RIGHT_X, BOTTOM_Y));
    }

    for (x, y) in [
        (LEFT_X, TOP_Y),
        (RIGHT_X, TOP_Y),
        (RIGHT_X, BOTTOM_Y),
        (LEFT_X, BOTTOM_Y),
    ] {
        let c = vp.pt(x, y);
        painter.circle_filled(c, vp.len(8.0), theme::BACKGROUND);
        painter.circle_stroke(c, vp.len(8.0), Stroke::new(vp.len(2.0), theme::WIRE));
    }

    if lit {
        let speed = model.current_speed() as f32;
        let mut loop_pts = vec![
            vp.pt(LEFT_X, TOP_Y),
            vp.pt(RIGHT_X, TOP_Y),
            vp.pt(RIGHT_X, BOTTOM_Y),
        ];
        if params.switch_closed {
            loop_pts.push(vp.pt(LEFT_X, BOTTOM_Y));
        }
        loop_pts.push(vp.pt(LEFT_X, TOP_Y));
        let offset = -(frame as f32) * speed * 15.0 * vp.scale();
        dashed_polyline(
            painter,
            &loop_pts,
            vp.len(10.0),
            vp.len(30.0),
            offset,
            Stroke::new(vp.len(4.0), Color32::from_white_alpha(150)),
        );
    }

    paint_switch(painter, &vp, params.switch_closed);
    paint_batteries(painter, &vp, params.batteries);
    paint_bulbs(painter, &vp, model, params.bulbs, brightness);
    Ok(())
}

fn paint_switch(painter: &Painter, vp: &Viewport, closed: bool) {
    let center = vp.pt(SWITCH_X, BOTTOM_Y);
    let body = Rect::from_center_size(center, vec2(vp.len(140.0), vp.len(40.0)));
    painter.rect_filled(body, vp.len(10.0), theme::BATTERY_BODY);
    painter.rect_stroke(
        body,
        vp.len(10.0),
        Stroke::new(vp.len(2.0), theme::BACKGROUND),
        StrokeKind::Outside,
    );

    for dx in [-50.0, 50.0] {
        let t = center + vec2(vp.len(dx), 0.0);
        painter.circle_filled(t, vp.len(8.0), Color32::from_rgb(0xcb, 0xd5, 0xe1));
    }

    // the lever pivots on the left terminal, raised 45 degrees when open
    let pivot = center + vec2(vp.len(-50.0), 0.0);
    let angle = if closed { 0.0 } else { -std::f32::consts::FRAC_PI_4 };
    let tip = rotate_around(pivot + vec2(vp.len(110.0), 0.0), pivot, angle);
    painter.line_segment(
        [pivot, tip],
        Stroke::new(vp.len(12.0), Color32::from_rgb(0xe2, 0xe8, 0xf0)),
    );
    let handle = rotate_around(pivot + vec2(vp.len(105.0), 0.0), pivot, angle);
    painter.circle_filled(handle, vp.len(12.0), theme::SWITCH_OPEN);

    painter.text(
        center + vec2(0.0, vp.len(45.0)),
        Align2::CENTER_CENTER,
        if closed { "ON" } else { "OFF" },
        FontId::proportional(vp.len(16.0)),
        theme::WIRE,
    );
}

fn paint_batteries(painter: &Painter, vp: &Viewport, count: u8) {
    if count == 0 {
        let slot = Rect::from_center_size(vp.pt(LEFT_X, 500.0), vec2(vp.len(100.0), vp.len(160.0)));
        painter.rect_stroke(
            slot,
            0.0,
            Stroke::new(vp.len(2.0), Color32::from_white_alpha(25)),
            StrokeKind::Outside,
        );
        painter.text(
            slot.center(),
            Align2::CENTER_CENTER,
            "No Source",
            FontId::proportional(vp.len(16.0)),
            Color32::from_white_alpha(25),
        );
        return;
    }

    let start_y = 500.0 - (count - 1) as f32 * SLOT_SPACING / 2.0;
    for i in 0..count {
        let center = vp.pt(LEFT_X, start_y + i as f32 * SLOT_SPACING);
        let body = Rect::from_center_size(center, vec2(vp.len(100.0), vp.len(160.0)));
        painter.rect_filled(body, 0.0, theme::BATTERY_BODY);
        // label band and metal nub
        let band = Rect::from_center_size(center, vec2(vp.len(100.0), vp.len(40.0)));
        painter.rect_filled(band, 0.0, Color32::from_rgb(0x0e, 0xa5, 0xe9));
        let nub = Rect::from_center_size(
            center - vec2(0.0, vp.len(87.5)),
            vec2(vp.len(40.0), vp.len(15.0)),
        );
        painter.rect_filled(nub, CornerRadius::same(2), Color32::from_rgb(0xe2, 0xe8, 0xf0));
        painter.text(
            center,
            Align2::CENTER_CENTER,
            "VOLT",
            FontId::proportional(vp.len(24.0)),
            Color32::WHITE,
        );
        painter.text(
            center + vec2(0.0, vp.len(50.0)),
            Align2::CENTER_CENTER,
            "1.5V",
            FontId::monospace(vp.len(20.0)),
            theme::WIRE,
        );
        painter.text(
            center - vec2(0.0, vp.len(40.0)),
            Align2::CENTER_CENTER,
            "+",
            FontId::proportional(vp.len(40.0)),
            theme::BATTERY_POS,
        );
        painter.text(
            center + vec2(0.0, vp.len(50.0)),
            Align2::CENTER_TOP,
            "-",
            FontId::proportional(vp.len(40.0)),
            Color32::from_white_alpha(50),
        );
    }
}

fn paint_bulbs(painter: &Painter, vp: &Viewport, model: &CircuitModel, count: u8, brightness: f32) {
    let start_y = 500.0 - (count - 1) as f32 * SLOT_SPACING / 2.0;
    let band = model.glow_band();
    for i in 0..count {
        let center = vp.pt(RIGHT_X, start_y + i as f32 * SLOT_SPACING);

        if brightness > 0.0 {
            let glow_color = match band {
                GlowBand::DimRed => Color32::from_rgb(0xea, 0x58, 0x0c),
                GlowBand::Amber => Color32::from_rgb(0xfd, 0xe0, 0x47),
                _ => Color32::WHITE,
            };
            let alpha = (brightness.powf(1.2) * 0.85).min(1.0);
            glow_circle(
                painter,
                center,
                vp.len(60.0 + brightness * 120.0),
                Color32::from_rgba_unmultiplied(
                    glow_color.r(),
                    glow_color.g(),
                    glow_color.b(),
                    (alpha * 160.0) as u8,
                ),
                3,
            );
        }

        // screw base below the glass
        let base = Rect::from_min_size(
            center + vec2(vp.len(-25.0), vp.len(40.0)),
            vec2(vp.len(50.0), vp.len(50.0)),
        );
        painter.rect_filled(base, 0.0, Color32::from_rgb(0xb4, 0x53, 0x09));
        for dy in [15.0, 30.0] {
            painter.line_segment(
                [
                    base.left_top() + vec2(0.0, vp.len(dy)),
                    base.right_top() + vec2(0.0, vp.len(dy - 5.0)),
                ],
                Stroke::new(vp.len(2.0), Color32::from_black_alpha(50)),
            );
        }

        let glass = match band {
            GlowBand::Off => theme::BULB_OFF,
            GlowBand::DimRed => Color32::from_rgb(0xfd, 0xba, 0x74),
            GlowBand::Amber => theme::BULB_ON,
            GlowBand::White => Color32::WHITE,
        };
        painter.circle_filled(center, vp.len(60.0), glass);
        painter.circle_stroke(
            center,
            vp.len(60.0),
            Stroke::new(vp.len(2.0), Color32::from_white_alpha(75)),
        );

        // filament zigzag
        let filament = match band {
            GlowBand::Off => Stroke::new(vp.len(1.0), Color32::from_rgb(0x64, 0x74, 0x8b)),
            GlowBand::DimRed => Stroke::new(vp.len(2.0), theme::SWITCH_OPEN),
            GlowBand::Amber => Stroke::new(vp.len(3.0), Color32::from_rgb(0xfc, 0xd3, 0x4d)),
            GlowBand::White => Stroke::new(vp.len(4.0), Color32::from_rgb(0xf5, 0x9e, 0x0b)),
        };
        let f = |x: f32, y: f32| center + vec2(vp.len(x), vp.len(y));
        for pair in [
            (f(-10.0, 40.0), f(-10.0, 0.0)),
            (f(10.0, 40.0), f(10.0, 0.0)),
        ] {
            painter.line_segment([pair.0, pair.1], Stroke::new(vp.len(2.0), theme::WIRE));
        }
        let zigzag = [
            f(-10.0, 0.0),
            f(-5.0, -10.0),
            f(0.0, 0.0),
            f(5.0, -10.0),
            f(10.0, 0.0),
        ];
        for pair in zigzag.windows(2) {
            painter.line_segment([pair[0], pair[1]], filament);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn empty_rect_is_a_clean_skip() {
        let model = CircuitModel::new();
        let ctx = egui::Context::default();
        let painter = egui::Painter::new(
            ctx,
            egui::LayerId::background(),
            Rect::from_min_size(pos2(0.0, 0.0), vec2(0.0, 0.0)),
        );
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(0.0, 0.0));
        assert_eq!(paint(&model, &painter, rect, 0), Ok(()));
    }
}
