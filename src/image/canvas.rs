use std::path::Path;

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::definitions::Image;
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;

use crate::core::error::{CardError, CardResult};
use crate::core::style::Color;

const BASE_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BASE_OUTLINE: Rgba<u8> = Rgba([200, 200, 200, 255]);
const OUTLINE_WIDTH: u32 = 2;

/// Gap left between neighbouring motifs of a chess pattern.
pub const CHESS_SPACING: u32 = 20;

/// A positioned bitmap waiting to be pasted onto the card.
#[derive(Debug, Clone)]
pub struct Layer {
    pub image: RgbaImage,
    pub x: i64,
    pub y: i64,
}

impl Layer {
    pub fn new(image: RgbaImage, x: i64, y: i64) -> Self {
        Self { image, x, y }
    }

    pub fn paste_onto(&self, canvas: &mut RgbaImage) {
        paste(canvas, &self.image, self.x, self.y);
    }
}

/// Open an image file as RGBA.
pub fn load_rgba(path: &Path) -> CardResult<RgbaImage> {
    let image = image::open(path).map_err(|err| CardError::missing_asset(path, err))?;
    Ok(image.to_rgba8())
}

/// Transparent buffer holding the white rounded card base with a light-gray outline.
pub fn new_canvas(width: u32, height: u32, corner_radius: u32) -> RgbaImage {
    let mut canvas = RgbaImage::new(width, height);
    fill_rounded_rect(&mut canvas, 0, 0, width, height, corner_radius, BASE_OUTLINE);
    if width > 2 * OUTLINE_WIDTH && height > 2 * OUTLINE_WIDTH {
        fill_rounded_rect(
            &mut canvas,
            OUTLINE_WIDTH as i32,
            OUTLINE_WIDTH as i32,
            width - 2 * OUTLINE_WIDTH,
            height - 2 * OUTLINE_WIDTH,
            corner_radius.saturating_sub(OUTLINE_WIDTH),
            BASE_FILL,
        );
    }
    canvas
}

/// Single-channel mask: 255 inside the rounded rectangle, 0 outside.
pub fn rounded_mask(width: u32, height: u32, corner_radius: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    fill_rounded_rect(&mut mask, 0, 0, width, height, corner_radius, Luma([255]));
    mask
}

/// Replace the canvas alpha channel with `mask`.
pub fn apply_mask(canvas: &mut RgbaImage, mask: &GrayImage) {
    for (px, m) in canvas.pixels_mut().zip(mask.pixels()) {
        px[3] = m[0];
    }
}

/// Alpha-masked overwrite: source pixels replace the destination wherever their
/// alpha is non-zero. Offsets may be negative; out-of-canvas parts are cropped.
pub fn paste(canvas: &mut RgbaImage, layer: &RgbaImage, x: i64, y: i64) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(layer.width())).min(i64::from(canvas.width()));
    let y1 = (y + i64::from(layer.height())).min(i64::from(canvas.height()));
    for dy in y0..y1 {
        for dx in x0..x1 {
            let src = layer.get_pixel((dx - x) as u32, (dy - y) as u32);
            if src[3] > 0 {
                canvas.put_pixel(dx as u32, dy as u32, *src);
            }
        }
    }
}

/// Stretch to an exact size; aspect ratio is not preserved.
pub fn resize_exact(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    imageops::resize(image, width.max(1), height.max(1), FilterType::CatmullRom)
}

/// Scale to `width`, keeping the aspect ratio.
pub fn resize_to_width(image: &RgbaImage, width: u32) -> RgbaImage {
    let height = (u64::from(image.height()) * u64::from(width) / u64::from(image.width().max(1))) as u32;
    resize_exact(image, width, height)
}

/// Tile `logo` over a `width`×`height` block filled with `background`,
/// only on cells where `(row + col)` is even.
pub fn chess_pattern(width: u32, height: u32, logo: &RgbaImage, background: Color) -> RgbaImage {
    let mut block = RgbaImage::from_pixel(width, height, background.to_rgba());
    let stride_x = logo.width() + CHESS_SPACING;
    let stride_y = logo.height() + CHESS_SPACING;
    let cols = width.div_ceil(stride_x);
    let rows = height.div_ceil(stride_y);
    let inset = i64::from(CHESS_SPACING / 2);
    for row in 0..rows {
        for col in 0..cols {
            if (row + col) % 2 != 0 {
                continue;
            }
            let x = i64::from(col * stride_x) + inset;
            let y = i64::from(row * stride_y) + inset;
            paste(&mut block, logo, x, y);
        }
    }
    block
}

/// Fill a rounded rectangle whose top-left corner is `(x, y)`.
pub fn fill_rounded_rect<P>(
    image: &mut Image<P>,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    radius: u32,
    color: P,
) where
    P: image::Pixel,
{
    if width == 0 || height == 0 {
        return;
    }
    let r = radius.min(width / 2).min(height / 2);
    if r == 0 {
        draw_filled_rect_mut(image, Rect::at(x, y).of_size(width, height), color);
        return;
    }
    if height > 2 * r {
        draw_filled_rect_mut(image, Rect::at(x, y + r as i32).of_size(width, height - 2 * r), color);
    }
    if width > 2 * r {
        draw_filled_rect_mut(image, Rect::at(x + r as i32, y).of_size(width - 2 * r, height), color);
    }
    let ri = r as i32;
    let left = x + ri;
    let right = x + width as i32 - 1 - ri;
    let top = y + ri;
    let bottom = y + height as i32 - 1 - ri;
    for center in [(left, top), (right, top), (left, bottom), (right, bottom)] {
        draw_filled_circle_mut(image, center, ri, color);
    }
}
