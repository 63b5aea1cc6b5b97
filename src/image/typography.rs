//! Font sizing, greedy justified wrapping and outlined badge text.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use image::imageops;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::core::error::{CardError, CardResult};

/// Extra pixels between consecutive lines on top of the point size.
pub const LINE_LEADING: u32 = 5;

/// Offsets used to fake a stroke by over-drawing around the glyphs.
pub const OUTLINE_OFFSETS: [(i32, i32); 8] = [
    (-2, -2),
    (-2, 0),
    (-2, 2),
    (0, -2),
    (0, 2),
    (2, -2),
    (2, 0),
    (2, 2),
];

/// Length thresholds and point sizes for [`adaptive_font_size`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSizing {
    pub min_len: usize,
    pub max_len: usize,
    pub min_size: u32,
    pub max_size: u32,
}

impl FontSizing {
    pub const TITLE: FontSizing = FontSizing {
        min_len: 10,
        max_len: 30,
        min_size: 28,
        max_size: 45,
    };

    pub const DESCRIPTION: FontSizing = FontSizing {
        min_len: 100,
        max_len: 200,
        min_size: 30,
        max_size: 40,
    };

    pub fn size_for(&self, text: &str) -> u32 {
        adaptive_font_size(text, self.min_len, self.max_len, self.min_size, self.max_size)
    }
}

/// Shrink the point size linearly as the text grows from `min_len` to `max_len` characters.
pub fn adaptive_font_size(
    text: &str,
    min_len: usize,
    max_len: usize,
    min_size: u32,
    max_size: u32,
) -> u32 {
    let len = text.chars().count();
    if len <= min_len {
        return max_size;
    }
    if len >= max_len {
        return min_size;
    }
    let span = (max_len - min_len) as f64;
    let drop = (len - min_len) as f64 * (f64::from(max_size) - f64::from(min_size)) / span;
    (f64::from(max_size) - drop) as u32
}

/// A font file loaded into memory.
pub struct Typeface {
    font: FontVec,
    path: PathBuf,
}

impl Typeface {
    pub fn load(path: &Path) -> CardResult<Self> {
        let bytes = fs::read(path).map_err(|err| CardError::font(path, err.to_string()))?;
        let font = FontVec::try_from_vec(bytes).map_err(|err| CardError::font(path, err.to_string()))?;
        Ok(Self {
            font,
            path: path.to_path_buf(),
        })
    }

    pub fn at(&self, size: u32) -> SizedFont<'_> {
        SizedFont {
            font: &self.font,
            scale: PxScale::from(size as f32),
        }
    }
}

/// A typeface paired with a point size.
#[derive(Clone, Copy)]
pub struct SizedFont<'a> {
    font: &'a FontVec,
    scale: PxScale,
}

impl fmt::Debug for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typeface").field("path", &self.path).finish()
    }
}

impl fmt::Debug for SizedFont<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SizedFont").field("scale", &self.scale.y).finish()
    }
}

impl<'a> SizedFont<'a> {
    pub fn width(&self, text: &str) -> u32 {
        text_size(self.scale, self.font, text).0
    }

    pub fn draw(&self, canvas: &mut RgbaImage, text: &str, x: i32, y: i32, color: Rgba<u8>) {
        draw_text_mut(canvas, color, x, y, self.scale, self.font, text);
    }

    /// Tight pixel bounds of the inked glyphs, relative to the draw origin.
    pub fn ink_bounds(&self, text: &str) -> Option<InkBounds> {
        let scaled = self.font.as_scaled(self.scale);
        let mut caret = 0.0f32;
        let mut prev = None;
        let mut bounds: Option<InkBounds> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(self.scale, point(caret, scaled.ascent()));
            caret += scaled.h_advance(id);
            prev = Some(id);
            if let Some(outline) = self.font.outline_glyph(glyph) {
                let rect = outline.px_bounds();
                let next = InkBounds {
                    min_x: rect.min.x,
                    min_y: rect.min.y,
                    max_x: rect.max.x,
                    max_y: rect.max.y,
                };
                bounds = Some(match bounds {
                    Some(current) => current.union(next),
                    None => next,
                });
            }
        }
        bounds
    }

    /// Draw `text` so the center of its ink lands on `center`.
    pub fn draw_centered(&self, canvas: &mut RgbaImage, text: &str, center: (f32, f32), color: Rgba<u8>) {
        if let Some(bounds) = self.ink_bounds(text) {
            let (x, y) = bounds.centered_origin(center);
            self.draw(canvas, text, x, y, color);
        }
    }

    /// Centered text with a stroke faked by drawing at [`OUTLINE_OFFSETS`] first.
    pub fn draw_outlined(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        center: (f32, f32),
        fill: Rgba<u8>,
        outline: Rgba<u8>,
    ) {
        let Some(bounds) = self.ink_bounds(text) else {
            return;
        };
        let (x, y) = bounds.centered_origin(center);
        for (dx, dy) in OUTLINE_OFFSETS {
            self.draw(canvas, text, x + dx, y + dy, outline);
        }
        self.draw(canvas, text, x, y, fill);
    }

    /// Render `text` onto its own transparent bitmap, rotated 90° counter-clockwise.
    pub fn rotated_label(&self, text: &str, color: Rgba<u8>) -> RgbaImage {
        let (w, h) = text_size(self.scale, self.font, text);
        let pad = 4;
        let [r, g, b, _] = color.0;
        let mut label = RgbaImage::from_pixel(w + 2 * pad, h + 2 * pad, Rgba([r, g, b, 0]));
        self.draw(&mut label, text, pad as i32, pad as i32, color);
        imageops::rotate270(&label)
    }
}

/// Pixel box covered by rendered glyphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InkBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl InkBounds {
    pub fn union(self, other: InkBounds) -> InkBounds {
        InkBounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Draw origin that puts the middle of the ink on `center`.
    pub fn centered_origin(&self, center: (f32, f32)) -> (i32, i32) {
        let mid_x = (self.min_x + self.max_x) / 2.0;
        let mid_y = (self.min_y + self.max_y) / 2.0;
        ((center.0 - mid_x).round() as i32, (center.1 - mid_y).round() as i32)
    }
}

/// One whitespace-separated word of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word<'a> {
    pub text: &'a str,
    pub emphasized: bool,
}

/// Width oracle used by the line breaker.
pub trait TextMeasure {
    fn word_width(&self, word: &Word<'_>) -> u32;
    fn space_width(&self) -> u32;
}

/// Card names that are drawn in the emphasis face when quoted in a description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmphasisSet {
    names: Vec<Vec<String>>,
}

impl EmphasisSet {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for name in names {
            let tokens: Vec<String> = name.as_ref().split_whitespace().map(normalize_token).collect();
            if !tokens.is_empty() && tokens.iter().all(|t| !t.is_empty()) && !set.names.contains(&tokens) {
                set.names.push(tokens);
            }
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Split `text` into words, flagging every run that spells a known name.
    pub fn split<'a>(&self, text: &'a str) -> Vec<Word<'a>> {
        let raw: Vec<&str> = text.split_whitespace().collect();
        let tokens: Vec<String> = raw.iter().map(|w| normalize_token(w)).collect();
        let mut marks = vec![false; raw.len()];
        for name in &self.names {
            if name.len() > tokens.len() {
                continue;
            }
            for start in 0..=tokens.len() - name.len() {
                if tokens[start..start + name.len()] == name[..] {
                    marks[start..start + name.len()].iter_mut().for_each(|m| *m = true);
                }
            }
        }
        raw.into_iter()
            .zip(marks)
            .map(|(text, emphasized)| Word { text, emphasized })
            .collect()
    }
}

fn normalize_token(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase()
}

/// A word with its horizontal offset from the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedWord<'a> {
    pub word: Word<'a>,
    pub x: u32,
}

/// One laid-out line of a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphLine<'a> {
    pub words: Vec<PlacedWord<'a>>,
    /// Width with single spaces between words.
    pub natural_width: u32,
    /// Width after gap stretching.
    pub width: u32,
    pub justified: bool,
}

/// Greedy line breaking: a word joins the line while the line still fits in
/// `max_width`; a word that fits nowhere stands on a line of its own.
pub fn wrap_words<'a, M: TextMeasure + ?Sized>(
    words: &[Word<'a>],
    max_width: u32,
    measure: &M,
) -> Vec<Vec<Word<'a>>> {
    let space = measure.space_width();
    let mut lines = Vec::new();
    let mut current: Vec<Word<'a>> = Vec::new();
    let mut current_width = 0u32;
    for word in words {
        let width = measure.word_width(word);
        if current.is_empty() {
            current.push(*word);
            current_width = width;
            continue;
        }
        let candidate = current_width + space + width;
        if candidate <= max_width {
            current.push(*word);
            current_width = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push(*word);
            current_width = width;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrap and fully justify a paragraph.
///
/// Every line but the last is stretched to `max_width` by spreading the slack
/// evenly over the gaps; the integer-division remainder is dropped. The last
/// line and single-word lines keep natural spacing.
pub fn layout_paragraph<'a, M: TextMeasure + ?Sized>(
    words: &[Word<'a>],
    max_width: u32,
    measure: &M,
) -> Vec<ParagraphLine<'a>> {
    let space = measure.space_width();
    let lines = wrap_words(words, max_width, measure);
    let count = lines.len();
    lines
        .into_iter()
        .enumerate()
        .map(|(idx, line)| {
            let widths: Vec<u32> = line.iter().map(|w| measure.word_width(w)).collect();
            let gaps = widths.len().saturating_sub(1) as u32;
            let natural_width = widths.iter().sum::<u32>() + gaps * space;
            let justified = idx + 1 < count && gaps > 0;
            let extra = if justified {
                max_width.saturating_sub(natural_width) / gaps
            } else {
                0
            };
            let mut x = 0u32;
            let mut placed = Vec::with_capacity(line.len());
            for (word, width) in line.into_iter().zip(widths.iter()) {
                placed.push(PlacedWord { word, x });
                x += width + space + extra;
            }
            let width = natural_width + extra * gaps;
            ParagraphLine {
                words: placed,
                natural_width,
                width,
                justified,
            }
        })
        .collect()
}

/// Regular and emphasis faces at one size, chosen per word.
#[derive(Debug, Clone, Copy)]
pub struct ParagraphFonts<'a> {
    pub regular: SizedFont<'a>,
    pub emphasis: Option<SizedFont<'a>>,
}

impl<'a> ParagraphFonts<'a> {
    pub fn for_word(&self, word: &Word<'_>) -> SizedFont<'a> {
        match (word.emphasized, self.emphasis) {
            (true, Some(bold)) => bold,
            _ => self.regular,
        }
    }
}

impl TextMeasure for ParagraphFonts<'_> {
    fn word_width(&self, word: &Word<'_>) -> u32 {
        self.for_word(word).width(word.text)
    }

    fn space_width(&self) -> u32 {
        self.regular.width(" ")
    }
}

/// Lay out and draw a justified paragraph with its top-left corner at `origin`.
/// Returns the number of lines drawn.
pub fn draw_paragraph(
    canvas: &mut RgbaImage,
    words: &[Word<'_>],
    origin: (i32, i32),
    max_width: u32,
    point_size: u32,
    fonts: &ParagraphFonts<'_>,
    color: Rgba<u8>,
) -> usize {
    let lines = layout_paragraph(words, max_width, fonts);
    let pitch = (point_size + LINE_LEADING) as i32;
    for (row, line) in lines.iter().enumerate() {
        let y = origin.1 + row as i32 * pitch;
        for placed in &line.words {
            fonts
                .for_word(&placed.word)
                .draw(canvas, placed.word.text, origin.0 + placed.x as i32, y, color);
        }
    }
    lines.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    /// Every character, space included, advances 10px; emphasis adds 2px per word.
    struct FixedAdvance;

    impl TextMeasure for FixedAdvance {
        fn word_width(&self, word: &Word<'_>) -> u32 {
            word.text.chars().count() as u32 * 10 + if word.emphasized { 2 } else { 0 }
        }

        fn space_width(&self) -> u32 {
            10
        }
    }

    fn plain(text: &str) -> Vec<Word<'_>> {
        EmphasisSet::default().split(text)
    }

    #[test]
    fn description_sizes_follow_the_ramp() {
        let sizing = FontSizing::DESCRIPTION;
        assert_eq!(sizing.size_for(&"x".repeat(100)), 40);
        assert_eq!(sizing.size_for(&"x".repeat(200)), 30);
        assert_eq!(sizing.size_for(&"x".repeat(150)), 35);
        assert_eq!(sizing.size_for(""), 40);
        assert_eq!(sizing.size_for(&"x".repeat(500)), 30);
    }

    #[test]
    fn title_sizes_follow_the_ramp() {
        let sizing = FontSizing::TITLE;
        assert_eq!(sizing.size_for("Hero"), 45);
        assert_eq!(sizing.size_for(&"x".repeat(30)), 28);
        // 45 - 10 * 17 / 20 = 36.5, truncated
        assert_eq!(sizing.size_for(&"x".repeat(20)), 36);
    }

    #[test]
    fn sizing_counts_characters_not_bytes() {
        assert_eq!(adaptive_font_size("ééééé", 4, 6, 10, 20), 15);
    }

    proptest! {
        #[test]
        fn font_size_never_grows_with_length(a in 0usize..300, b in 0usize..300) {
            let (short, long) = if a <= b { (a, b) } else { (b, a) };
            let sizing = FontSizing::DESCRIPTION;
            prop_assert!(sizing.size_for(&"x".repeat(short)) >= sizing.size_for(&"x".repeat(long)));
        }

        #[test]
        fn font_size_is_clamped_outside_the_ramp(len in 0usize..400) {
            let sizing = FontSizing::TITLE;
            let size = sizing.size_for(&"x".repeat(len));
            if len <= sizing.min_len {
                prop_assert_eq!(size, sizing.max_size);
            }
            if len >= sizing.max_len {
                prop_assert_eq!(size, sizing.min_size);
            }
            prop_assert!(size >= sizing.min_size && size <= sizing.max_size);
        }
    }

    #[test]
    fn empty_description_renders_no_lines() {
        assert!(layout_paragraph(&plain(""), 650, &FixedAdvance).is_empty());
        assert!(layout_paragraph(&plain("   \n "), 650, &FixedAdvance).is_empty());
    }

    #[test]
    fn twelfth_word_overflows_to_a_left_aligned_last_line() {
        let text = vec!["abcd"; 12].join(" ");
        // eleven words: 11 * 40 + 10 * 10 = 540; twelve would be 590
        let lines = layout_paragraph(&plain(&text), 560, &FixedAdvance);
        assert_eq!(lines.len(), 2);

        let first = &lines[0];
        assert_eq!(first.words.len(), 11);
        assert!(first.justified);
        assert_eq!(first.natural_width, 540);
        assert_eq!(first.width, 560);
        assert_eq!(first.words[1].x, 52);
        let last = first.words.last().unwrap();
        assert_eq!(last.x + 40, 560);

        let second = &lines[1];
        assert_eq!(second.words.len(), 1);
        assert!(!second.justified);
        assert_eq!(second.words[0].x, 0);
        assert_eq!(second.width, 40);
    }

    #[test]
    fn remainder_pixels_are_dropped() {
        let text = vec!["abcd"; 12].join(" ");
        let lines = layout_paragraph(&plain(&text), 565, &FixedAdvance);
        let first = &lines[0];
        // slack 25 over 10 gaps: 2px each, 5px lost
        assert_eq!(first.width, 560);
        assert!(565 - first.width <= first.words.len() as u32 - 2);
    }

    #[test]
    fn last_line_is_not_stretched() {
        let lines = layout_paragraph(&plain("aa bb cc dd ee"), 60, &FixedAdvance);
        let widths: Vec<u32> = lines.iter().map(|l| l.width).collect();
        assert_eq!(widths, vec![60, 60, 20]);
        let last = lines.last().unwrap();
        assert!(!last.justified);
        assert_eq!(last.width, last.natural_width);
    }

    #[test]
    fn overlong_word_stands_alone_unstretched() {
        let lines = layout_paragraph(&plain("a extraordinarily b"), 60, &FixedAdvance);
        let texts: Vec<Vec<&str>> = lines
            .iter()
            .map(|l| l.words.iter().map(|w| w.word.text).collect())
            .collect();
        assert_eq!(texts, vec![vec!["a"], vec!["extraordinarily"], vec!["b"]]);
        assert!(lines.iter().all(|l| !l.justified));
        assert_eq!(lines[1].width, 150);
    }

    #[test]
    fn justified_lines_fill_the_width_exactly() {
        let text = "the quick brown fox jumps over the lazy dog and keeps running far away";
        for max_width in [120u32, 157, 200, 333] {
            let lines = layout_paragraph(&plain(text), max_width, &FixedAdvance);
            for line in &lines {
                if line.justified {
                    let gaps = line.words.len() as u32 - 1;
                    assert!(line.width <= max_width);
                    assert!(max_width - line.width < gaps, "{line:?} at {max_width}");
                } else {
                    assert_eq!(line.width, line.natural_width);
                }
            }
        }
    }

    #[test]
    fn emphasis_marks_whole_names_only() {
        let set = EmphasisSet::from_names(["Chat Noir", "Lantern", "  "]);
        let words = set.split("The chat noir meets a Lantern. Chat alone is plain.");
        let marked: Vec<&str> = words.iter().filter(|w| w.emphasized).map(|w| w.text).collect();
        assert_eq!(marked, vec!["chat", "noir", "Lantern."]);
    }

    #[test]
    fn emphasized_words_are_measured_with_their_face() {
        let set = EmphasisSet::from_names(["bb"]);
        let lines = layout_paragraph(&set.split("aa bb"), 100, &FixedAdvance);
        assert_eq!(lines[0].natural_width, 20 + 10 + 22);
    }

    #[test]
    fn ink_is_centered_on_the_target() {
        let bounds = InkBounds {
            min_x: 2.0,
            min_y: 10.0,
            max_x: 42.0,
            max_y: 60.0,
        };
        assert_eq!(bounds.centered_origin((75.0, 75.0)), (53, 40));
        let merged = bounds.union(InkBounds {
            min_x: 0.0,
            min_y: 12.0,
            max_x: 50.0,
            max_y: 58.0,
        });
        assert_eq!(merged.min_x, 0.0);
        assert_eq!(merged.max_x, 50.0);
        assert_eq!(merged.min_y, 10.0);
    }

    #[test]
    fn outline_offsets_surround_the_origin() {
        assert_eq!(OUTLINE_OFFSETS.len(), 8);
        assert!(!OUTLINE_OFFSETS.contains(&(0, 0)));
        assert!(OUTLINE_OFFSETS.iter().all(|(x, y)| x.abs() <= 2 && y.abs() <= 2));
    }

    #[test]
    fn missing_font_is_reported_with_its_path() {
        let err = Typeface::load(Path::new("/nonexistent/fonts/title.ttf")).unwrap_err();
        assert!(matches!(err, CardError::Font { .. }));
        assert!(err.to_string().contains("title.ttf"));
    }
}
