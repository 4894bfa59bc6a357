//! Falling body scene.
//!
//! Height-driven viewport: 1000 virtual units fill the surface vertically
//! and the virtual width follows the aspect ratio, so the drop column stays
//! full height on any surface. The ball falls down the horizontal center.

use egui::{Align2, Color32, FontId, Painter, Rect, Stroke, vec2};
use models::falling::{BodyKind, FallingBody, GROUND_Y, TOP_Y};

use crate::primitives::ellipse_filled;
use crate::viewport::Viewport;
use crate::{ensure_finite, SceneError};

const V_HEIGHT: f32 = 1000.0;

fn body_colors(kind: BodyKind) -> (Color32, Color32) {
    match kind {
        BodyKind::Heavy => (
            Color32::from_rgb(0x94, 0xa3, 0xb8),
            Color32::from_rgb(0xe2, 0xe8, 0xf0),
        ),
        BodyKind::Medium => (
            Color32::from_rgb(0x65, 0xa3, 0x0d),
            Color32::from_rgb(0xbe, 0xf2, 0x64),
        ),
        BodyKind::Light => (
            Color32::from_rgb(0xdb, 0x27, 0x77),
            Color32::from_rgb(0xfb, 0xcf, 0xe8),
        ),
    }
}

pub fn paint(
    model: &FallingBody,
    painter: &Painter,
    rect: Rect,
    _frame: u64,
) -> Result<(), SceneError> {
    let vp = match Viewport::fit_height(rect, V_HEIGHT) {
        Some(vp) => vp,
        None => return Ok(()),
    };
    let y = ensure_finite(model.y(), "position")? as f32;
    let velocity = ensure_finite(model.velocity(), "velocity")? as f32;

    let v_width = vp.virtual_width();
    let cx = v_width / 2.0;
    let ground_y = GROUND_Y as f32;
    let top_y = TOP_Y as f32;
    let spec = model.spec();
    let radius = spec.radius as f32;
    let (color_main, color_highlight) = body_colors(model.params().kind);

    paint_grid(painter, &vp, cx, ground_y);
    paint_floor(painter, &vp, cx, ground_y);
    if v_width > 350.0 {
        paint_ruler(painter, &vp, cx, ground_y, top_y, radius);
    }

    // flattened shadow, larger and darker as the ball approaches
    let height_from_ground = (ground_y - radius) - y;
    let shadow_scale = (1.0 - height_from_ground / 800.0).max(0.2);
    let shadow_alpha = (0.6 - height_from_ground / 600.0).max(0.1);
    ellipse_filled(
        painter,
        vp.pt(cx, ground_y),
        vec2(vp.len(radius * shadow_scale * 1.5), vp.len(radius * shadow_scale * 0.45)),
        Color32::from_black_alpha((shadow_alpha * 255.0) as u8),
    );

    for point in model.trail() {
        let alpha = (point.alpha * 255.0) as u8;
        painter.circle_filled(
            vp.pt(cx, point.y as f32),
            vp.len(point.radius as f32 * 0.6),
            Color32::from_rgba_unmultiplied(
                color_highlight.r(),
                color_highlight.g(),
                color_highlight.b(),
                alpha,
            ),
        );
    }

    let pulse = model.impact_pulse() as f32;
    if pulse > 0.5 {
        // impact ripple, a flattened expanding ring
        let ring_alpha = ((pulse / 40.0).min(1.0) * 255.0) as u8;
        painter.add(egui::Shape::from(egui::epaint::EllipseShape::stroke(
            vp.pt(cx, ground_y),
            vec2(vp.len(pulse * 3.0), vp.len(pulse * 0.9)),
            Stroke::new(vp.len(4.0), Color32::from_white_alpha(ring_alpha)),
        )));
    }

    // the ball, highlight on top of the base color for a fake specular
    let center = vp.pt(cx, y);
    painter.circle_filled(center, vp.len(radius), color_main);
    painter.circle_filled(
        center - vec2(vp.len(radius / 3.0), vp.len(radius / 3.0)),
        vp.len(radius / 2.5),
        Color32::from_rgba_unmultiplied(
            color_highlight.r(),
            color_highlight.g(),
            color_highlight.b(),
            170,
        ),
    );
    if model.params().kind == BodyKind::Light {
        // beach ball stripes
        for dx in [-12.0, 12.0] {
            painter.add(egui::Shape::from(egui::epaint::EllipseShape::stroke(
                center + vec2(vp.len(dx / 2.0), 0.0),
                vec2(vp.len(dx.abs()), vp.len(radius * 0.95)),
                Stroke::new(vp.len(3.0), Color32::from_white_alpha(100)),
            )));
        }
    }
    painter.circle_stroke(
        center,
        vp.len(radius - 1.0),
        Stroke::new(vp.len(2.0), Color32::from_white_alpha(75)),
    );

    if velocity.abs() > 0.5 {
        paint_velocity_arrow(painter, &vp, cx + radius + 30.0, y, velocity);
    }
    Ok(())
}

fn paint_grid(painter: &Painter, vp: &Viewport, cx: f32, ground_y: f32) {
    let stroke = Stroke::new(vp.len(2.0), Color32::from_white_alpha(8));
    let v_width = vp.virtual_width();
    let mut i = 0.0;
    while i <= v_width / 2.0 {
        painter.line_segment([vp.pt(cx + i, 0.0), vp.pt(cx + i, ground_y)], stroke);
        painter.line_segment([vp.pt(cx - i, 0.0), vp.pt(cx - i, ground_y)], stroke);
        i += 100.0;
    }
    let mut j = TOP_Y as f32;
    while j <= ground_y {
        painter.line_segment([vp.pt(0.0, j), vp.pt(v_width, j)], stroke);
        j += 100.0;
    }
}

fn paint_floor(painter: &Painter, vp: &Viewport, cx: f32, ground_y: f32) {
    let v_width = vp.virtual_width();
    painter.rect_filled(
        vp.rect(0.0, ground_y, v_width, V_HEIGHT - ground_y),
        0.0,
        Color32::from_rgb(0x33, 0x41, 0x55),
    );
    let grid = Stroke::new(
        vp.len(2.0),
        Color32::from_rgba_unmultiplied(0x38, 0xbd, 0xf8, 50),
    );
    painter.line_segment([vp.pt(0.0, ground_y), vp.pt(v_width, ground_y)], grid);
    // radiating perspective lines converging toward the center
    let mut i = -500.0;
    while i <= v_width + 500.0 {
        painter.line_segment(
            [vp.pt(i, V_HEIGHT), vp.pt(cx + (i - cx) * 0.3, ground_y)],
            grid,
        );
        i += 150.0;
    }
}

fn paint_ruler(painter: &Painter, vp: &Viewport, cx: f32, ground_y: f32, top_y: f32, radius: f32) {
    let ruler_x = cx - 150.0;
    let line = Stroke::new(vp.len(1.0), Color32::from_white_alpha(50));
    painter.line_segment([vp.pt(ruler_x, top_y), vp.pt(ruler_x, ground_y)], line);
    let max_h = ground_y - top_y - radius;
    for i in (0..=100).step_by(25) {
        let y = ground_y - i as f32 / 100.0 * max_h - radius;
        painter.line_segment([vp.pt(ruler_x - 10.0, y), vp.pt(ruler_x, y)], line);
        painter.text(
            vp.pt(ruler_x - 15.0, y),
            Align2::RIGHT_CENTER,
            format!("{i}%"),
            FontId::monospace(vp.len(12.0)),
            Color32::from_white_alpha(100),
        );
    }
}

fn paint_velocity_arrow(painter: &Painter, vp: &Viewport, x: f32, y: f32, velocity: f32) {
    let stroke = Stroke::new(vp.len(5.0), Color32::from_rgb(0x22, 0xc5, 0x5e));
    let tail = vp.pt(x, y);
    let tip = vp.pt(x, y + velocity * 5.0);
    painter.line_segment([tail, tip], stroke);
    let head = vp.len(12.0) * velocity.signum();
    painter.line_segment([tip, tip + vec2(-vp.len(6.0), -head)], stroke);
    painter.line_segment([tip, tip + vec2(vp.len(6.0), -head)], stroke);
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn empty_rect_is_a_clean_skip() {
        let model = FallingBody::new();
        let ctx = egui::Context::default();
        let painter = egui::Painter::new(
            ctx,
            egui::LayerId::background(),
            Rect::from_min_size(pos2(0.0, 0.0), vec2(10.0, 10.0)),
        );
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 0.0));
        assert_eq!(paint(&model, &painter, rect, 0), Ok(()));
    }

    #[test]
    fn each_body_has_distinct_colors() {
        let colors: Vec<_> = BodyKind::ALL.iter().map(|k| body_colors(*k)).collect();
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
    }
}
