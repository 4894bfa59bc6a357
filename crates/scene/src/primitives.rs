//! Small drawing helpers shared by the station painters.

use egui::emath::Rot2;
use egui::epaint::EllipseShape;
use egui::{Color32, Painter, Pos2, Shape, Stroke, Vec2, vec2};

/// Rotate `point` around `pivot` by `angle` radians.
pub fn rotate_around(point: Pos2, pivot: Pos2, angle: f32) -> Pos2 {
    pivot + Rot2::from_angle(angle) * (point - pivot)
}

/// Dashed line with a moving phase offset, used for animated current flow.
/// egui draws its own dashes but offers no phase control, so the segments
/// are laid out by hand.
pub fn dashed_line(
    painter: &Painter,
    from: Pos2,
    to: Pos2,
    dash: f32,
    gap: f32,
    offset: f32,
    stroke: Stroke,
) {
    let delta = to - from;
    let length = delta.length();
    if length <= f32::EPSILON || dash <= 0.0 {
        return;
    }
    let dir = delta / length;
    let period = dash + gap;
    // start one period early so the phase shift never leaves a bare lead-in
    let mut start = -period + offset.rem_euclid(period);
    while start < length {
        let a = start.max(0.0);
        let b = (start + dash).min(length);
        if b > a {
            painter.line_segment([from + dir * a, from + dir * b], stroke);
        }
        start += period;
    }
}

/// Dashed outline of a closed polygon, phase shared across all edges.
pub fn dashed_polyline(
    painter: &Painter,
    points: &[Pos2],
    dash: f32,
    gap: f32,
    offset: f32,
    stroke: Stroke,
) {
    if points.len() < 2 {
        return;
    }
    let mut walked = 0.0;
    for pair in points.windows(2) {
        dashed_line(painter, pair[0], pair[1], dash, gap, offset - walked, stroke);
        walked += (pair[1] - pair[0]).length();
    }
}

/// Soft glow: concentric translucent discs widening outward.
pub fn glow_circle(painter: &Painter, center: Pos2, radius: f32, color: Color32, layers: u8) {
    for i in (1..=layers).rev() {
        let t = i as f32 / layers as f32;
        let alpha = ((1.0 - t * 0.8) * color.a() as f32 * 0.35) as u8;
        painter.circle_filled(
            center,
            radius * (1.0 + t),
            Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha),
        );
    }
    painter.circle_filled(center, radius, color);
}

/// Axis-aligned ellipse, filled.
pub fn ellipse_filled(painter: &Painter, center: Pos2, radii: Vec2, color: Color32) {
    painter.add(Shape::from(EllipseShape::filled(center, radii, color)));
}

/// Filled arrow from `from` to `to` with a triangular head.
pub fn arrow(painter: &Painter, from: Pos2, to: Pos2, head: f32, stroke: Stroke) {
    let delta = to - from;
    let length = delta.length();
    if length <= f32::EPSILON {
        return;
    }
    let dir = delta / length;
    let normal = vec2(-dir.y, dir.x);
    let base = to - dir * head;
    painter.line_segment([from, base], stroke);
    painter.add(Shape::convex_polygon(
        vec![to, base + normal * head * 0.5, base - normal * head * 0.5],
        stroke.color,
        Stroke::NONE,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use egui::pos2;

    #[test]
    fn rotation_is_about_the_pivot() {
        let p = rotate_around(pos2(2.0, 1.0), pos2(1.0, 1.0), std::f32::consts::FRAC_PI_2);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn dashed_line_handles_degenerate_input() {
        let ctx = egui::Context::default();
        let painter = Painter::new(
            ctx,
            egui::LayerId::background(),
            egui::Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 100.0)),
        );
        // zero-length segment and zero dash length are both no-ops
        dashed_line(
            &painter,
            pos2(5.0, 5.0),
            pos2(5.0, 5.0),
            4.0,
            2.0,
            0.0,
            Stroke::new(1.0, Color32::WHITE),
        );
        dashed_line(
            &painter,
            pos2(0.0, 0.0),
            pos2(10.0, 0.0),
            0.0,
            2.0,
            0.0,
            Stroke::new(1.0, Color32::WHITE),
        );
    }
}
