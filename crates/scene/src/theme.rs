//! Shared slate palette for every station scene.

use egui::Color32;

pub const BACKGROUND: Color32 = Color32::from_rgb(0x1e, 0x29, 0x3b);
pub const WIRE: Color32 = Color32::from_rgb(0x94, 0xa3, 0xb8);
pub const WIRE_ACTIVE: Color32 = Color32::from_rgb(0xfb, 0xbf, 0x24);
pub const BATTERY_BODY: Color32 = Color32::from_rgb(0x33, 0x41, 0x55);
pub const BATTERY_POS: Color32 = Color32::from_rgb(0xef, 0x44, 0x44);
pub const BATTERY_NEG: Color32 = Color32::from_rgb(0x0f, 0x17, 0x2a);
pub const BULB_OFF: Color32 = Color32::from_rgb(0x47, 0x55, 0x69);
pub const BULB_ON: Color32 = Color32::from_rgb(0xfe, 0xf0, 0x8a);
pub const SWITCH_OPEN: Color32 = Color32::from_rgb(0xef, 0x44, 0x44);
pub const SWITCH_CLOSED: Color32 = Color32::from_rgb(0x22, 0xc5, 0x5e);
pub const WIND_BLADE: Color32 = Color32::from_rgb(0xe0, 0xf2, 0xfe);
pub const GROUND: Color32 = Color32::from_rgb(0x15, 0x80, 0x3d);

/// Linear blend between two palette colors, `t` clamped to 0..1.
pub fn lerp(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color32::from_rgb(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints_and_midpoint() {
        assert_eq!(lerp(BULB_OFF, BULB_ON, 0.0), BULB_OFF);
        assert_eq!(lerp(BULB_OFF, BULB_ON, 1.0), BULB_ON);
        let mid = lerp(Color32::BLACK, Color32::WHITE, 0.5);
        assert_eq!(mid, Color32::from_rgb(128, 128, 128));
    }

    #[test]
    fn lerp_clamps_out_of_range_t() {
        assert_eq!(lerp(BULB_OFF, BULB_ON, -2.0), BULB_OFF);
        assert_eq!(lerp(BULB_OFF, BULB_ON, 5.0), BULB_ON);
    }
}
