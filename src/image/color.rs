//! Gradient recoloring of grayscale artwork into suit colors.
//!
//! All transforms work on the raw RGBA buffer in one pass over
//! `chunks_exact_mut(4)` rather than per-coordinate pixel access.

use image::RgbaImage;

use crate::core::config::TextureFill;
use crate::core::style::Color;

/// Default strength used to pull motif colors toward the secondary color.
pub const DEFAULT_MOTIF_BLEND: f32 = 0.8;

/// How transparent pixels are treated by [`map_image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaPolicy {
    /// Output is fully opaque; see [`TextureFill`].
    Opaque(TextureFill),
    /// Source alpha passes through unchanged.
    Preserve,
}

/// BT.601 luma of an RGB triple.
pub fn luma(rgb: [u8; 3]) -> f32 {
    0.299 * f32::from(rgb[0]) + 0.587 * f32::from(rgb[1]) + 0.114 * f32::from(rgb[2])
}

/// Interpolate channel-wise from `low` (gray 0) to `high` (gray 255), truncating.
pub fn map_color(gray: f32, low: Color, high: Color) -> [u8; 3] {
    let t = (gray / 255.0).clamp(0.0, 1.0);
    let mut out = [0u8; 3];
    for (channel, (lo, hi)) in out.iter_mut().zip(low.0.iter().zip(high.0.iter())) {
        *channel = (f32::from(*lo) * (1.0 - t) + f32::from(*hi) * t) as u8;
    }
    out
}

/// Pull `primary` toward `secondary` by `strength` (0 keeps primary, 1 yields secondary).
pub fn lighten(primary: Color, secondary: Color, strength: f32) -> Color {
    let strength = strength.clamp(0.0, 1.0);
    let mut out = [0u8; 3];
    for (channel, (p, s)) in out.iter_mut().zip(primary.0.iter().zip(secondary.0.iter())) {
        let p = f32::from(*p);
        *channel = (p + (f32::from(*s) - p) * strength) as u8;
    }
    Color(out)
}

/// Recolor `image` into the `primary` → `secondary` gradient keyed on luma.
pub fn map_image(image: &RgbaImage, primary: Color, secondary: Color, policy: AlphaPolicy) -> RgbaImage {
    let mut out = image.clone();
    for px in out.chunks_exact_mut(4) {
        let alpha = px[3];
        let mapped = map_color(luma([px[0], px[1], px[2]]), primary, secondary);
        let [r, g, b, a] = match policy {
            AlphaPolicy::Preserve => [mapped[0], mapped[1], mapped[2], alpha],
            AlphaPolicy::Opaque(TextureFill::ForceOpaque) => {
                if alpha == 0 {
                    let [r, g, b] = secondary.0;
                    [r, g, b, 255]
                } else {
                    [mapped[0], mapped[1], mapped[2], 255]
                }
            }
            AlphaPolicy::Opaque(TextureFill::PreComposite) => {
                let [r, g, b] = blend_over(mapped, secondary.0, alpha);
                [r, g, b, 255]
            }
        };
        px.copy_from_slice(&[r, g, b, a]);
    }
    out
}

/// Recolor a small repeated motif, using a lightened primary as the dark end.
pub fn map_motif(image: &RgbaImage, primary: Color, secondary: Color, blend: f32) -> RgbaImage {
    let low = lighten(primary, secondary, blend);
    map_image(image, low, secondary, AlphaPolicy::Preserve)
}

/// Recolor a monochrome glyph keyed on the plain channel average; alpha is kept.
pub fn recolor(image: &RgbaImage, black_target: Color, white_target: Color) -> RgbaImage {
    let mut out = image.clone();
    for px in out.chunks_exact_mut(4) {
        let gray = (f32::from(px[0]) + f32::from(px[1]) + f32::from(px[2])) / 3.0;
        let [r, g, b] = map_color(gray, black_target, white_target);
        px[0] = r;
        px[1] = g;
        px[2] = b;
    }
    out
}

fn blend_over(src: [u8; 3], backdrop: [u8; 3], alpha: u8) -> [u8; 3] {
    let a = f32::from(alpha) / 255.0;
    let mut out = [0u8; 3];
    for (channel, (s, d)) in out.iter_mut().zip(src.iter().zip(backdrop.iter())) {
        *channel = (f32::from(*s) * a + f32::from(*d) * (1.0 - a)).round() as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const PINK: Color = Color::rgb(0xE6, 0xA8, 0xE6);
    const PALE: Color = Color::rgb(0xF5, 0xD4, 0xF5);

    fn close(a: [u8; 3], b: [u8; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= 1)
    }

    proptest! {
        #[test]
        fn gradient_endpoints_hit_the_targets(p in any::<[u8; 3]>(), s in any::<[u8; 3]>()) {
            prop_assert_eq!(map_color(0.0, Color(p), Color(s)), p);
            prop_assert!(close(map_color(255.0, Color(p), Color(s)), s));
            prop_assert!(close(map_color(luma([255, 255, 255]), Color(p), Color(s)), s));
        }
    }

    #[test]
    fn midpoint_is_linear() {
        let out = map_color(127.5, Color::BLACK, Color::rgb(200, 100, 50));
        assert_eq!(out, [100, 50, 25]);
    }

    #[test]
    fn preserve_mode_keeps_transparency() {
        let mut src = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        src.put_pixel(1, 0, Rgba([255, 255, 255, 0]));
        let out = map_image(&src, PINK, PALE, AlphaPolicy::Preserve);
        assert_eq!(out.get_pixel(0, 0), &Rgba([0xE6, 0xA8, 0xE6, 255]));
        assert_eq!(out.get_pixel(1, 0)[3], 0);
    }

    #[test]
    fn opaque_modes_agree_on_solid_and_empty_pixels() {
        let mut src = RgbaImage::from_pixel(3, 1, Rgba([0, 0, 0, 255]));
        src.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        src.put_pixel(2, 0, Rgba([120, 120, 120, 255]));
        let forced = map_image(&src, PINK, PALE, AlphaPolicy::Opaque(TextureFill::ForceOpaque));
        let composited =
            map_image(&src, PINK, PALE, AlphaPolicy::Opaque(TextureFill::PreComposite));
        for x in 0..3 {
            let a = forced.get_pixel(x, 0);
            let b = composited.get_pixel(x, 0);
            assert_eq!(a[3], 255);
            assert_eq!(b[3], 255);
            assert!(close([a[0], a[1], a[2]], [b[0], b[1], b[2]]), "pixel {x}: {a:?} vs {b:?}");
        }
        assert_eq!(forced.get_pixel(1, 0), &Rgba([0xF5, 0xD4, 0xF5, 255]));
    }

    #[test]
    fn lighten_moves_toward_secondary() {
        assert_eq!(lighten(Color::BLACK, Color::rgb(100, 200, 250), 0.8), Color::rgb(80, 160, 200));
        assert_eq!(lighten(PINK, PALE, 0.0), PINK);
        assert_eq!(lighten(PINK, PALE, 1.0), PALE);
    }

    #[test]
    fn motif_dark_end_is_lightened_primary() {
        let src = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 200]));
        let out = map_motif(&src, Color::BLACK, Color::rgb(100, 100, 100), DEFAULT_MOTIF_BLEND);
        assert_eq!(out.get_pixel(0, 0), &Rgba([80, 80, 80, 200]));
    }

    #[test]
    fn recolor_uses_channel_average_and_keeps_alpha() {
        let mut src = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        // average 85, luma would be 76
        src.put_pixel(1, 0, Rgba([255, 0, 0, 40]));
        let out = recolor(&src, Color::rgb(0, 0, 0), Color::rgb(255, 255, 255));
        assert_eq!(out.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(out.get_pixel(1, 0), &Rgba([85, 85, 85, 40]));
    }
}
