//! Readout cards drawn over the scene.
//!
//! Each station publishes one readout snapshot per frame; the HUD holds the
//! subscribing end and renders small value cards in the corners of the
//! canvas, mirroring the overlay style of the scenes themselves.

use std::cell::RefCell;
use std::rc::Rc;

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, vec2};
use simcore::ReadoutPublisher;

/// One publish/subscribe pair: the app publishes after stepping, the HUD
/// reads the latest snapshot when it draws.
pub struct ReadoutChannel<T: Copy + Default + 'static> {
    publisher: ReadoutPublisher<T>,
    latest: Rc<RefCell<T>>,
}

impl<T: Copy + Default + 'static> ReadoutChannel<T> {
    pub fn new() -> Self {
        let latest = Rc::new(RefCell::new(T::default()));
        let mut publisher = ReadoutPublisher::new();
        let sink = Rc::clone(&latest);
        publisher.subscribe(move |snapshot: &T| *sink.borrow_mut() = *snapshot);
        ReadoutChannel { publisher, latest }
    }

    pub fn publish(&mut self, snapshot: T) {
        self.publisher.publish(&snapshot);
    }

    pub fn latest(&self) -> T {
        *self.latest.borrow()
    }
}

impl<T: Copy + Default + 'static> Default for ReadoutChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Corner anchor for a card stack.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum HudCorner {
    TopLeft,
    TopRight,
}

pub struct HudCard {
    pub label: &'static str,
    pub value: String,
    pub unit: &'static str,
    pub accent: Color32,
}

impl HudCard {
    pub fn new(label: &'static str, value: String, unit: &'static str, accent: Color32) -> Self {
        HudCard {
            label,
            value,
            unit,
            accent,
        }
    }
}

const CARD_SIZE: egui::Vec2 = vec2(110.0, 44.0);
const MARGIN: f32 = 12.0;

/// Draw a vertical stack of cards in the given corner of `rect`.
pub fn draw_cards(painter: &Painter, rect: Rect, corner: HudCorner, cards: &[HudCard]) {
    for (i, card) in cards.iter().enumerate() {
        let top = rect.top() + MARGIN + i as f32 * (CARD_SIZE.y + 8.0);
        let min = match corner {
            HudCorner::TopLeft => Pos2::new(rect.left() + MARGIN, top),
            HudCorner::TopRight => Pos2::new(rect.right() - MARGIN - CARD_SIZE.x, top),
        };
        let card_rect = Rect::from_min_size(min, CARD_SIZE);
        painter.rect_filled(card_rect, 10.0, Color32::from_black_alpha(170));
        painter.text(
            card_rect.min + vec2(10.0, 8.0),
            Align2::LEFT_TOP,
            card.label,
            FontId::proportional(9.0),
            Color32::from_rgb(0x94, 0xa3, 0xb8),
        );
        let value_pos = card_rect.min + vec2(10.0, 22.0);
        let value_rect = painter.text(
            value_pos,
            Align2::LEFT_TOP,
            &card.value,
            FontId::monospace(16.0),
            card.accent,
        );
        painter.text(
            value_rect.right_bottom() + vec2(4.0, -2.0),
            Align2::LEFT_BOTTOM,
            card.unit,
            FontId::proportional(9.0),
            Color32::from_rgb(0x64, 0x74, 0x8b),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_round_trips_the_latest_snapshot() {
        let mut channel: ReadoutChannel<f64> = ReadoutChannel::new();
        assert_eq!(channel.latest(), 0.0);
        channel.publish(4.5);
        channel.publish(6.0);
        assert_eq!(channel.latest(), 6.0);
    }
}
