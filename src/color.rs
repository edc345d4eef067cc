use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Series colours
// ---------------------------------------------------------------------------

/// Dashboard base palette, used before falling back to generated hues.
const BASE: [Color32; 5] = [
    Color32::from_rgb(0x8e, 0xca, 0xe6),
    Color32::from_rgb(0x21, 0x9e, 0xbc),
    Color32::from_rgb(0x02, 0x30, 0x47),
    Color32::from_rgb(0xff, 0xb7, 0x03),
    Color32::from_rgb(0xfb, 0x85, 0x00),
];

/// Single-series bar colour.
pub const BAR: Color32 = BASE[1];

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// `n` colours for chart series: the base palette first, then generated hues.
pub fn series_colors(n: usize) -> Vec<Color32> {
    if n <= BASE.len() {
        return BASE[..n].to_vec();
    }
    generate_palette(n)
}

// ---------------------------------------------------------------------------
// Heat-map ramp
// ---------------------------------------------------------------------------

/// Colour for a share in `0.0..=1.0`, from light blue to dark navy.
pub fn heat_color(share: f64) -> Color32 {
    let low: LinSrgb = Srgb::new(0.557_f32, 0.792, 0.902).into_linear();
    let high: LinSrgb = Srgb::new(0.008_f32, 0.188, 0.278).into_linear();
    let mixed = low.mix(high, share.clamp(0.0, 1.0) as f32);
    let rgb: Srgb<u8> = Srgb::from_linear(mixed);
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Black or white, whichever reads better on `background`.
pub fn text_on(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_series_use_the_base_palette() {
        assert_eq!(series_colors(3), BASE[..3].to_vec());
        assert_eq!(series_colors(8).len(), 8);
    }

    #[test]
    fn heat_ramp_darkens_with_share() {
        let light = heat_color(0.0);
        let dark = heat_color(1.0);
        assert!(light.r() > dark.r());
        assert_eq!(text_on(light), Color32::BLACK);
        assert_eq!(text_on(dark), Color32::WHITE);
    }
}
