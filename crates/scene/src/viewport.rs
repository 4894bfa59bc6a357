//! Coordinate normalization between virtual model space and the surface.
//!
//! Every model draws in a fixed virtual space; the viewport maps it onto
//! whatever rect the host allocated this frame. It is recomputed per frame,
//! never cached, since the surface can change size between frames.

use egui::{Pos2, Rect, Vec2, pos2, vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    origin: Pos2,
    offset: Vec2,
    scale: f32,
    virtual_size: Vec2,
}

impl Viewport {
    /// Uniform scale by the smaller surface dimension, centered both ways.
    /// The virtual space is `side` × `side`.
    pub fn fit_square(rect: Rect, side: f32) -> Option<Self> {
        if !valid(rect) || side <= 0.0 {
            return None;
        }
        let scale = rect.width().min(rect.height()) / side;
        let offset = vec2(
            (rect.width() - side * scale) / 2.0,
            (rect.height() - side * scale) / 2.0,
        );
        Some(Viewport {
            origin: rect.min,
            offset,
            scale,
            virtual_size: vec2(side, side),
        })
    }

    /// Height-driven scale: the virtual height fills the surface exactly and
    /// the virtual width is derived from the aspect ratio (letterboxed
    /// horizontally rather than vertically).
    pub fn fit_height(rect: Rect, virtual_height: f32) -> Option<Self> {
        if !valid(rect) || virtual_height <= 0.0 {
            return None;
        }
        let scale = rect.height() / virtual_height;
        Some(Viewport {
            origin: rect.min,
            offset: Vec2::ZERO,
            scale,
            virtual_size: vec2(rect.width() / scale, virtual_height),
        })
    }

    /// Width-driven scale: the virtual width fills the surface exactly.
    pub fn fit_width(rect: Rect, virtual_width: f32) -> Option<Self> {
        if !valid(rect) || virtual_width <= 0.0 {
            return None;
        }
        let scale = rect.width() / virtual_width;
        Some(Viewport {
            origin: rect.min,
            offset: Vec2::ZERO,
            scale,
            virtual_size: vec2(virtual_width, rect.height() / scale),
        })
    }

    /// Map a virtual point to screen space.
    pub fn pt(&self, x: f32, y: f32) -> Pos2 {
        self.origin + self.offset + vec2(x, y) * self.scale
    }

    /// Map a virtual length to screen space.
    pub fn len(&self, l: f32) -> f32 {
        l * self.scale
    }

    /// Map a virtual axis-aligned rect to screen space.
    pub fn rect(&self, x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::from_min_size(self.pt(x, y), vec2(w, h) * self.scale)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn virtual_width(&self) -> f32 {
        self.virtual_size.x
    }

    pub fn virtual_height(&self) -> f32 {
        self.virtual_size.y
    }
}

fn valid(rect: Rect) -> bool {
    rect.width() > 0.0 && rect.height() > 0.0 && rect.is_finite()
}
