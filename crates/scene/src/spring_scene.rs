//! Elastic spring scene.
//!
//! Height-driven viewport over a 500-unit-tall side view. The camera pans
//! right with the ball once it crosses the middle of the screen; everything
//! here draws in world coordinates shifted by the model's camera offset.

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, vec2};
use models::spring::{SpringModel, MAX_COMPRESSION_PIXELS, PIXELS_PER_METER};

use crate::primitives::dashed_line;
use crate::viewport::Viewport;
use crate::{ensure_finite, theme, SceneError};

const V_HEIGHT: f32 = 500.0;
const GROUND_Y: f32 = 380.0;
const WORLD_REST_X: f32 = 400.0;
const WALL_X: f32 = 100.0;
const COILS: u32 = 12;
const COIL_RADIUS: f32 = 25.0;
const BALL_RADIUS: f32 = 35.0;

pub fn paint(
    model: &SpringModel,
    painter: &Painter,
    rect: Rect,
    _frame: u64,
) -> Result<(), SceneError> {
    let vp = match Viewport::fit_height(rect, V_HEIGHT) {
        Some(vp) => vp,
        None => return Ok(()),
    };
    let ball_disp = ensure_finite(model.ball_disp(), "ball displacement")? as f32;
    let spring_disp = ensure_finite(model.spring_disp(), "spring displacement")? as f32;
    let camera_x = ensure_finite(model.camera_x(), "camera")? as f32;

    let v_width = vp.virtual_width();
    // world coordinate -> screen, with the camera pan applied
    let world = |x: f32, y: f32| -> Pos2 { vp.pt(x - camera_x, y) };

    painter.rect_filled(
        vp.rect(0.0, 0.0, v_width, V_HEIGHT),
        0.0,
        Color32::from_rgb(0x0f, 0x17, 0x2a),
    );
    painter.rect_filled(
        vp.rect(0.0, GROUND_Y, v_width, V_HEIGHT - GROUND_Y),
        0.0,
        Color32::from_rgb(0x33, 0x41, 0x55),
    );

    paint_distance_grid(painter, &vp, &world, camera_x, v_width);
    paint_rest_marker(painter, &vp, &world, camera_x, v_width);
    paint_wall(painter, &vp, &world);
    paint_spring(painter, &vp, &world, spring_disp);
    paint_ball(painter, &vp, &world, ball_disp);
    Ok(())
}

fn paint_distance_grid(
    painter: &Painter,
    vp: &Viewport,
    world: &impl Fn(f32, f32) -> Pos2,
    camera_x: f32,
    v_width: f32,
) {
    let tick = Stroke::new(vp.len(1.0), Color32::from_white_alpha(25));
    let start = ((camera_x - 100.0) / 100.0).floor() * 100.0;
    let end = start + v_width + 400.0;
    let mut x = start;
    while x < end {
        painter.line_segment([world(x, GROUND_Y), world(x, GROUND_Y + 10.0)], tick);
        if x >= WORLD_REST_X {
            let meters = (x - WORLD_REST_X) / PIXELS_PER_METER as f32;
            painter.text(
                world(x, GROUND_Y + 25.0),
                Align2::CENTER_CENTER,
                format!("{meters:.0}m"),
                FontId::monospace(vp.len(14.0)),
                Color32::from_white_alpha(75),
            );
        }
        x += 100.0;
    }
}

fn paint_rest_marker(
    painter: &Painter,
    vp: &Viewport,
    world: &impl Fn(f32, f32) -> Pos2,
    camera_x: f32,
    v_width: f32,
) {
    // skip once the camera has panned the marker off screen
    if WORLD_REST_X < camera_x - 50.0 || WORLD_REST_X > camera_x + v_width + 50.0 {
        return;
    }
    dashed_line(
        painter,
        world(WORLD_REST_X, GROUND_Y - 150.0),
        world(WORLD_REST_X, GROUND_Y + 20.0),
        vp.len(5.0),
        vp.len(5.0),
        0.0,
        Stroke::new(vp.len(2.0), theme::SWITCH_CLOSED),
    );
    painter.text(
        world(WORLD_REST_X, GROUND_Y - 160.0),
        Align2::CENTER_CENTER,
        "REST",
        FontId::proportional(vp.len(12.0)),
        theme::SWITCH_CLOSED,
    );
}

fn paint_wall(painter: &Painter, vp: &Viewport, world: &impl Fn(f32, f32) -> Pos2) {
    let top = world(WALL_X - 20.0, GROUND_Y - 160.0);
    painter.rect_filled(
        Rect::from_min_size(top, vec2(vp.len(20.0), vp.len(160.0))),
        0.0,
        Color32::from_rgb(0x47, 0x55, 0x69),
    );
}

fn paint_spring(
    painter: &Painter,
    vp: &Viewport,
    world: &impl Fn(f32, f32) -> Pos2,
    spring_disp: f32,
) {
    let spring_start = WALL_X + 20.0;
    let spring_end = WORLD_REST_X + spring_disp;
    let length = spring_end - spring_start;
    if length <= 0.0 {
        return;
    }

    // color shifts from slate toward red with compression
    let ratio = (-spring_disp / MAX_COMPRESSION_PIXELS as f32).max(0.0);
    let color = theme::lerp(theme::WIRE, theme::SWITCH_OPEN, ratio);
    let stroke = Stroke::new(vp.len(5.0), color);

    let half_coils = COILS * 2;
    let step = length / half_coils as f32;
    let y_base = GROUND_Y - 35.0;
    let mut previous = world(spring_start, y_base);
    for i in 1..=half_coils {
        let x = spring_start + i as f32 * step;
        let y_offset = if i % 2 == 0 { -COIL_RADIUS } else { COIL_RADIUS };
        let next = world(x, y_base + y_offset);
        painter.line_segment([previous, next], stroke);
        previous = next;
    }
    painter.line_segment([previous, world(spring_end, y_base)], stroke);
}

fn paint_ball(painter: &Painter, vp: &Viewport, world: &impl Fn(f32, f32) -> Pos2, ball_disp: f32) {
    let ball_x = WORLD_REST_X + ball_disp;
    let center = world(ball_x, GROUND_Y - BALL_RADIUS);
    painter.circle_filled(center, vp.len(BALL_RADIUS), Color32::from_rgb(0x4c, 0x1d, 0x95));
    painter.circle_filled(
        center - vec2(vp.len(10.0), vp.len(10.0)),
        vp.len(BALL_RADIUS / 2.5),
        Color32::from_rgba_unmultiplied(0xc4, 0xb5, 0xfd, 150),
    );

    // rolling cross marks rotation as distance over radius
    let rotation = ball_x / BALL_RADIUS;
    let cross = Stroke::new(vp.len(4.0), Color32::from_white_alpha(150));
    let (sin, cos) = rotation.sin_cos();
    let r = vp.len(BALL_RADIUS);
    let axis_a = vec2(cos, sin) * r;
    let axis_b = vec2(-sin, cos) * r;
    painter.line_segment([center - axis_a, center + axis_a], cross);
    painter.line_segment([center - axis_b, center + axis_b], cross);
}
