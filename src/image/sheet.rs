//! Raster print sheets: finished cards laid out on A4 pages.

use image::imageops::overlay;
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::image::canvas::resize_exact;

pub const CARD_WIDTH_MM: f32 = 63.0;
pub const CARD_HEIGHT_MM: f32 = 88.0;
const A4_WIDTH_MM: f32 = 210.0;
const A4_HEIGHT_MM: f32 = 297.0;
const MM_PER_INCH: f32 = 25.4;

const CUT_LINE_DISTANCE_MM: f32 = 1.0;
const CUT_LINE_LENGTH_MM: f32 = 5.0;
const HOME_MARGIN_MM: f32 = 10.0;
const HOME_SPACING_MM: f32 = 5.0;
const HOME_COLUMNS: usize = 3;
const HOME_ROWS: usize = 3;

const PAGE_BG: Rgba<u8> = Rgba([255, 255, 255, 255]);
const CUT_LINE: Rgba<u8> = Rgba([128, 128, 128, 255]);

/// How finished cards are arranged on print pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetLayout {
    /// One centered card per page with corner cut lines.
    Single,
    /// Nine cards per page, each front page followed by a mirrored back page.
    Home,
}

#[derive(Debug, Clone)]
pub struct SheetOptions {
    pub layout: SheetLayout,
    pub dpi: u32,
    pub cover: Option<RgbaImage>,
}

/// A card-sized rectangle on a page, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

pub fn mm_to_px(mm: f32, dpi: u32) -> u32 {
    (mm / MM_PER_INCH * dpi as f32).round() as u32
}

fn mm_to_px_f(mm: f32, dpi: u32) -> f32 {
    mm / MM_PER_INCH * dpi as f32
}

fn blank_page(dpi: u32) -> RgbaImage {
    RgbaImage::from_pixel(mm_to_px(A4_WIDTH_MM, dpi), mm_to_px(A4_HEIGHT_MM, dpi), PAGE_BG)
}

/// The centered card slot of a single-card page.
pub fn single_slot(dpi: u32) -> Slot {
    let width = mm_to_px(CARD_WIDTH_MM, dpi);
    let height = mm_to_px(CARD_HEIGHT_MM, dpi);
    let page_w = mm_to_px(A4_WIDTH_MM, dpi);
    let page_h = mm_to_px(A4_HEIGHT_MM, dpi);
    Slot {
        x: ((page_w as i64 - width as i64) / 2).max(0),
        y: ((page_h as i64 - height as i64) / 2).max(0),
        width,
        height,
    }
}

/// The nine slots of a home-print page in row-major order.
pub fn home_slots(dpi: u32) -> Vec<Slot> {
    let available_w = A4_WIDTH_MM - 2.0 * HOME_MARGIN_MM - (HOME_COLUMNS - 1) as f32 * HOME_SPACING_MM;
    let available_h = A4_HEIGHT_MM - 2.0 * HOME_MARGIN_MM - (HOME_ROWS - 1) as f32 * HOME_SPACING_MM;
    let card_w = available_w / HOME_COLUMNS as f32;
    let card_h = available_h / HOME_ROWS as f32;

    let mut slots = Vec::with_capacity(HOME_COLUMNS * HOME_ROWS);
    for row in 0..HOME_ROWS {
        for col in 0..HOME_COLUMNS {
            let x = HOME_MARGIN_MM + col as f32 * (card_w + HOME_SPACING_MM);
            let y = HOME_MARGIN_MM + row as f32 * (card_h + HOME_SPACING_MM);
            slots.push(Slot {
                x: i64::from(mm_to_px(x, dpi)),
                y: i64::from(mm_to_px(y, dpi)),
                width: mm_to_px(card_w, dpi),
                height: mm_to_px(card_h, dpi),
            });
        }
    }
    slots
}

/// Slot index on the back page that lands behind `index` after a long-edge flip.
pub fn mirrored_index(index: usize) -> usize {
    let row = index / HOME_COLUMNS;
    let col = index % HOME_COLUMNS;
    row * HOME_COLUMNS + (HOME_COLUMNS - 1 - col)
}

fn place(page: &mut RgbaImage, image: &RgbaImage, slot: Slot) {
    let scaled = resize_exact(image, slot.width, slot.height);
    overlay(page, &scaled, slot.x, slot.y);
}

/// Short gray ticks just outside each corner of `slot`.
pub fn draw_cut_lines(page: &mut RgbaImage, slot: Slot, dpi: u32) {
    let d = mm_to_px_f(CUT_LINE_DISTANCE_MM, dpi);
    let half = mm_to_px_f(CUT_LINE_LENGTH_MM, dpi) / 2.0;
    let left = slot.x as f32;
    let top = slot.y as f32;
    let right = left + slot.width as f32;
    let bottom = top + slot.height as f32;

    for (cx, cy, dy) in [(left, top, -d), (right, top, -d), (left, bottom, d), (right, bottom, d)] {
        draw_line_segment_mut(page, (cx - half, cy + dy), (cx + half, cy + dy), CUT_LINE);
    }
    for (cx, cy, dx) in [(left, top, -d), (right, top, d), (left, bottom, -d), (right, bottom, d)] {
        draw_line_segment_mut(page, (cx + dx, cy - half), (cx + dx, cy + half), CUT_LINE);
    }
}

/// Lay cards out on print pages. `None` entries are cards that failed to
/// build; their slots stay empty.
pub fn render_pages(cards: &[Option<RgbaImage>], options: &SheetOptions) -> Vec<RgbaImage> {
    let dpi = options.dpi.clamp(72, 1200);
    match options.layout {
        SheetLayout::Single => single_pages(cards, options.cover.as_ref(), dpi),
        SheetLayout::Home => home_pages(cards, options.cover.as_ref(), dpi),
    }
}

fn single_pages(cards: &[Option<RgbaImage>], cover: Option<&RgbaImage>, dpi: u32) -> Vec<RgbaImage> {
    let slot = single_slot(dpi);
    let mut pages: Vec<RgbaImage> = cards
        .iter()
        .map(|card| single_page(card.as_ref(), slot, dpi))
        .collect();
    if let Some(cover) = cover {
        pages.push(single_page(Some(cover), slot, dpi));
    }
    pages
}

fn single_page(image: Option<&RgbaImage>, slot: Slot, dpi: u32) -> RgbaImage {
    let mut page = blank_page(dpi);
    if let Some(image) = image {
        place(&mut page, image, slot);
    }
    draw_cut_lines(&mut page, slot, dpi);
    page
}

fn home_pages(cards: &[Option<RgbaImage>], cover: Option<&RgbaImage>, dpi: u32) -> Vec<RgbaImage> {
    let slots = home_slots(dpi);
    let mut pages = Vec::new();
    for chunk in cards.chunks(slots.len()) {
        let mut front = blank_page(dpi);
        for (card, slot) in chunk.iter().zip(&slots) {
            if let Some(image) = card {
                place(&mut front, image, *slot);
            }
        }
        pages.push(front);

        if let Some(cover) = cover {
            let mut back = blank_page(dpi);
            for index in 0..chunk.len() {
                place(&mut back, cover, slots[mirrored_index(index)]);
            }
            pages.push(back);
        }
    }
    pages
}

/// File name of the `n`-th page, counting from 1.
pub fn page_file_name(n: usize) -> String {
    format!("page_{n:04}.png")
}
