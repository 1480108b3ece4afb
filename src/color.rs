use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Heat layer opacity at full intensity.
pub const HEAT_OPACITY: f32 = 0.8;

/// Cells below this intensity are not drawn.
pub const HEAT_FLOOR: f32 = 0.02;

/// Histogram bar fill.
pub const BAR_COLOR: Color32 = Color32::from_rgb(255, 75, 75);

// ---------------------------------------------------------------------------
// Heat ramp: intensity → Color32
// ---------------------------------------------------------------------------

/// Map a normalized intensity to a pale-yellow → deep-red colour whose alpha
/// grows with intensity.
pub fn heat_color(intensity: f32) -> Color32 {
    let t = intensity.clamp(0.0, 1.0);
    let hue = 60.0 * (1.0 - t) - 12.0 * t;
    let lightness = 0.85 - 0.45 * t;
    let hsl = Hsl::new(hue, 1.0, lightness);
    let rgb: Srgb = hsl.into_color();
    let alpha = HEAT_OPACITY * (0.35 + 0.65 * t);
    Color32::from_rgba_unmultiplied(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
        (alpha * 255.0) as u8,
    )
}
