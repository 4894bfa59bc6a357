//! Render surface adapter.
//!
//! Owns the per-frame draw contract shared by all station painters: measure
//! the drawable area in device pixels, skip the frame entirely when the area
//! is zero, clear the background, run the painter, and keep an animation
//! frame counter that only advances when something was actually drawn. Draw
//! errors are logged and swallowed so one bad frame never kills the loop.

use egui::{Painter, Rect, Ui};
use log::error;

use crate::theme;
use crate::SceneError;

/// Drawable area in device pixels, floored from logical points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn from_points(points: egui::Vec2, pixels_per_point: f32) -> Self {
        SurfaceSize {
            width: (points.x * pixels_per_point).floor().max(0.0) as u32,
            height: (points.y * pixels_per_point).floor().max(0.0) as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

pub struct RenderSurface {
    frame: u64,
    animated: bool,
}

impl RenderSurface {
    pub fn new() -> Self {
        RenderSurface {
            frame: 0,
            animated: true,
        }
    }

    /// Frames drawn so far. Painters key pulse and rotation effects off this.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// A paused surface still draws but the frame counter stands still, so
    /// pulse effects freeze in place.
    pub fn set_animated(&mut self, animated: bool) {
        self.animated = animated;
    }

    /// One draw tick: skip empty surfaces, otherwise draw and advance the
    /// counter. The counter advances even when the painter errors; an error
    /// is one bad frame, not a stall.
    pub fn tick<F>(&mut self, size: SurfaceSize, draw: F) -> bool
    where
        F: FnOnce(u64) -> Result<(), SceneError>,
    {
        if size.is_empty() {
            return false;
        }
        if let Err(err) = draw(self.frame) {
            error!("draw failed on frame {}: {err}", self.frame);
        }
        if self.animated {
            self.frame += 1;
        }
        true
    }

    /// egui wrapper around [`tick`](Self::tick): allocates the remaining
    /// space in `ui`, clears it to the scene background, and hands the
    /// painter and rect to `draw`.
    pub fn canvas<F>(&mut self, ui: &mut Ui, draw: F) -> bool
    where
        F: FnOnce(&Painter, Rect, u64) -> Result<(), SceneError>,
    {
        let size = ui.available_size();
        let surface = SurfaceSize::from_points(size, ui.ctx().pixels_per_point());
        let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
        let rect = response.rect;
        self.tick(surface, |frame| {
            painter.rect_filled(rect, 0.0, theme::BACKGROUND);
            draw(&painter, rect, frame)
        })
    }
}

impl Default for RenderSurface {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_size_floors_points() {
        let size = SurfaceSize::from_points(egui::vec2(300.5, 200.9), 2.0);
        assert_eq!(size, SurfaceSize { width: 601, height: 401 });
        assert!(!size.is_empty());
    }

    #[test]
    fn zero_area_skips_the_frame() {
        let mut surface = RenderSurface::new();
        let mut drew = false;
        let drawn = surface.tick(SurfaceSize { width: 0, height: 100 }, |_| {
            drew = true;
            Ok(())
        });
        assert!(!drawn);
        assert!(!drew);
        assert_eq!(surface.frame(), 0);
    }

    #[test]
    fn frame_counter_advances_per_drawn_frame() {
        let mut surface = RenderSurface::new();
        let size = SurfaceSize { width: 800, height: 600 };
        for expected in 0..4u64 {
            surface.tick(size, |frame| {
                assert_eq!(frame, expected);
                Ok(())
            });
        }
        assert_eq!(surface.frame(), 4);
    }

    #[test]
    fn draw_error_still_advances_the_counter() {
        let mut surface = RenderSurface::new();
        let size = SurfaceSize { width: 10, height: 10 };
        surface.tick(size, |_| Err(SceneError::NonFinite("rotation")));
        assert_eq!(surface.frame(), 1);
    }

    #[test]
    fn paused_surface_freezes_the_counter() {
        let mut surface = RenderSurface::new();
        let size = SurfaceSize { width: 10, height: 10 };
        surface.tick(size, |_| Ok(()));
        surface.set_animated(false);
        surface.tick(size, |_| Ok(()));
        surface.tick(size, |_| Ok(()));
        assert_eq!(surface.frame(), 1);
    }
}
