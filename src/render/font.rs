//! Font resolution and text rasterisation.
//!
//! Text is rendered to an anti-aliased f32 coverage mask ([`TextMask`]),
//! which the painter then rotates, tints and blends onto the template.
//!
//! Two kinds of face feed the mask:
//! - TTF faces loaded at render time (decorative + optional fallback), via ab_glyph
//! - the built-in Spleen 12x24 bitmap face, scaled to the requested size,
//!   used whenever no TTF face answers for a family
//!
//! Only regular faces are loaded, so bold and italic are synthesised on the
//! mask (horizontal dilation and a shear about the baseline).

use ab_glyph::{Font, FontArc, ScaleFont, point};
use spleen_font::{FONT_12X24, PSF2Font};

use crate::certificate::{Alignment, FieldConfig, FontStyle, FontWeight};
use crate::error::CertificateError;

/// Spleen 12x24 cell metrics.
const CELL_WIDTH: usize = 12;
const CELL_HEIGHT: usize = 24;
/// Baseline row inside a 12x24 Spleen cell.
const CELL_BASELINE: f32 = 19.0;

/// Shear applied for synthetic italics.
const ITALIC_SLANT: f32 = 0.2;

/// Largest coverage mask one field may allocate (32 Mpx, 128 MiB of f32).
pub const MAX_MASK_PIXELS: usize = 1 << 25;

/// Parse TTF/OTF bytes into a face.
pub fn parse_font(bytes: Vec<u8>) -> Result<FontArc, CertificateError> {
    FontArc::try_from_vec(bytes).map_err(|e| CertificateError::Font(e.to_string()))
}

/// Rendered text as a coverage buffer.
///
/// Mask coordinates: `(origin_x, baseline)` is where the pen started.
#[derive(Debug, Clone)]
pub struct TextMask {
    pub width: usize,
    pub height: usize,
    /// Mask x of the pen start.
    pub origin_x: f32,
    /// Mask y of the baseline.
    pub baseline: f32,
    /// Pen advance over the whole string.
    pub advance: f32,
    /// Coverage values: 0.0 = empty, 1.0 = fully inked.
    pub data: Vec<f32>,
}

impl TextMask {
    fn blank(
        width: usize,
        height: usize,
        origin_x: f32,
        baseline: f32,
        advance: f32,
    ) -> Result<Self, CertificateError> {
        let width = width.max(1);
        let height = height.max(1);
        let pixels = width
            .checked_mul(height)
            .filter(|&n| n <= MAX_MASK_PIXELS)
            .ok_or_else(|| {
                CertificateError::InvalidInput(format!(
                    "Text too large to draw: {}x{} px mask exceeds {} px",
                    width, height, MAX_MASK_PIXELS
                ))
            })?;
        Ok(Self {
            width,
            height,
            origin_x,
            baseline,
            advance,
            data: vec![0.0; pixels],
        })
    }

    /// Coverage at an integer pixel; zero outside the mask.
    #[inline]
    pub fn coverage(&self, x: i64, y: i64) -> f32 {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return 0.0;
        }
        self.data[y as usize * self.width + x as usize]
    }

    /// Bilinear coverage at a fractional position (pixel centres at +0.5).
    pub fn sample(&self, fx: f32, fy: f32) -> f32 {
        let u = fx - 0.5;
        let v = fy - 0.5;
        let x0 = u.floor();
        let y0 = v.floor();
        let tx = u - x0;
        let ty = v - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = self.coverage(x0, y0) * (1.0 - tx) + self.coverage(x0 + 1, y0) * tx;
        let bottom = self.coverage(x0, y0 + 1) * (1.0 - tx) + self.coverage(x0 + 1, y0 + 1) * tx;
        top * (1.0 - ty) + bottom * ty
    }

    /// Mask x of the anchor for an alignment.
    pub fn anchor_x(&self, align: Alignment) -> f32 {
        match align {
            Alignment::Left => self.origin_x,
            Alignment::Center => self.origin_x + self.advance / 2.0,
            Alignment::Right => self.origin_x + self.advance,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&c| c <= 0.0)
    }

    /// Synthetic bold: dilate every row `radius` pixels to the right.
    pub fn embolden(self, radius: usize) -> Result<Self, CertificateError> {
        if radius == 0 {
            return Ok(self);
        }
        let mut out = Self::blank(
            self.width + radius,
            self.height,
            self.origin_x,
            self.baseline,
            self.advance + radius as f32,
        )?;
        for y in 0..out.height {
            for x in 0..out.width {
                let mut c = 0.0f32;
                for k in 0..=radius {
                    c = c.max(self.coverage(x as i64 - k as i64, y as i64));
                }
                out.data[y * out.width + x] = c;
            }
        }
        Ok(out)
    }

    /// Synthetic italic: shear rows about the baseline, tops leaning right.
    pub fn slant(self, factor: f32) -> Result<Self, CertificateError> {
        if factor == 0.0 {
            return Ok(self);
        }
        let below = (self.height as f32 - self.baseline).max(0.0);
        let left_pad = (below * factor).ceil().max(0.0);
        let right_pad = (self.baseline * factor).ceil().max(0.0);
        let mut out = Self::blank(
            self.width + (left_pad + right_pad) as usize,
            self.height,
            self.origin_x + left_pad,
            self.baseline,
            self.advance,
        )?;
        for y in 0..out.height {
            let shift = left_pad + (self.baseline - (y as f32 + 0.5)) * factor;
            for x in 0..out.width {
                out.data[y * out.width + x] = self.sample(x as f32 + 0.5 - shift, y as f32 + 0.5);
            }
        }
        Ok(out)
    }
}

/// A face that can rasterise text.
#[derive(Clone)]
pub enum Face {
    Ttf(FontArc),
    /// Built-in Spleen bitmap face.
    Bitmap,
}

impl Face {
    pub fn is_bitmap(&self) -> bool {
        matches!(self, Face::Bitmap)
    }

    /// Rasterise `text` at `pixel_height`.
    ///
    /// Fails with `InvalidInput` when the mask would exceed [`MAX_MASK_PIXELS`].
    pub fn rasterize(&self, text: &str, pixel_height: f32) -> Result<TextMask, CertificateError> {
        match self {
            Face::Ttf(font) => rasterize_ttf(font, text, pixel_height),
            Face::Bitmap => rasterize_bitmap(text, pixel_height),
        }
    }
}

/// Faces available to one render call.
pub struct FontBook {
    decorative_family: String,
    decorative: Option<FontArc>,
    fallback: Option<FontArc>,
}

impl FontBook {
    /// A book with only the built-in bitmap face.
    pub fn builtin(decorative_family: impl Into<String>) -> Self {
        Self {
            decorative_family: decorative_family.into(),
            decorative: None,
            fallback: None,
        }
    }

    pub fn with_decorative(mut self, font: FontArc) -> Self {
        self.decorative = Some(font);
        self
    }

    pub fn with_fallback(mut self, font: FontArc) -> Self {
        self.fallback = Some(font);
        self
    }

    pub fn has_decorative(&self) -> bool {
        self.decorative.is_some()
    }

    /// Pick a face for a CSS-style family list (`"Great Vibes", serif`).
    ///
    /// The decorative face answers for its own family name; every other
    /// family goes to the fallback TTF, then the bitmap face.
    pub fn resolve(&self, family: &str) -> Face {
        let wants_decorative = family
            .split(',')
            .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\''))
            .any(|f| f.eq_ignore_ascii_case(&self.decorative_family));

        if wants_decorative && let Some(font) = &self.decorative {
            return Face::Ttf(font.clone());
        }
        match &self.fallback {
            Some(font) => Face::Ttf(font.clone()),
            None => Face::Bitmap,
        }
    }

    /// Rasterise a field's text with its family, size, weight and style.
    pub fn rasterize(&self, text: &str, style: &FieldConfig) -> Result<TextMask, CertificateError> {
        if !style.font_size.is_finite() {
            return Err(CertificateError::InvalidInput(format!(
                "Font size must be finite, got {}",
                style.font_size
            )));
        }
        let pixel_height = style.font_size.max(1.0);
        let mut mask = self.resolve(&style.font_family).rasterize(text, pixel_height)?;

        if style.font_weight == FontWeight::Bold {
            let radius = (pixel_height / 24.0).round().max(1.0) as usize;
            mask = mask.embolden(radius)?;
        }
        if style.font_style == FontStyle::Italic {
            mask = mask.slant(ITALIC_SLANT)?;
        }
        Ok(mask)
    }
}

fn rasterize_ttf(font: &FontArc, text: &str, pixel_height: f32) -> Result<TextMask, CertificateError> {
    let scaled = font.as_scaled(pixel_height);

    // Script faces overhang their advance box; leave room on every side.
    let pad = (pixel_height * 0.5).ceil();

    let mut glyphs = Vec::new();
    let mut caret_x = 0.0f32;
    let mut previous = None;

    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        if let Some(prev) = previous {
            caret_x += scaled.kern(prev, glyph_id);
        }
        glyphs.push((glyph_id, caret_x));
        caret_x += scaled.h_advance(glyph_id);
        previous = Some(glyph_id);
    }

    let ascent = scaled.ascent();
    let descent = scaled.descent();
    let width = (caret_x + pad * 2.0).ceil() as usize;
    let height = (ascent - descent + pad * 2.0).ceil() as usize;
    let baseline = pad + ascent;

    let mut mask = TextMask::blank(width, height, pad, baseline, caret_x)?;
    let (mask_w, mask_h) = (mask.width as i32, mask.height as i32);

    for &(glyph_id, glyph_x) in &glyphs {
        let glyph = glyph_id.with_scale_and_position(pixel_height, point(pad + glyph_x, baseline));

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;

                if x >= 0 && x < mask_w && y >= 0 && y < mask_h {
                    let idx = y as usize * mask.width + x as usize;
                    mask.data[idx] = (mask.data[idx] + coverage).min(1.0);
                }
            });
        }
    }

    Ok(mask)
}

/// One 12x24 cell per character: 1 = ink.
fn bitmap_cells(text: &str) -> Vec<[u8; CELL_WIDTH * CELL_HEIGHT]> {
    let mut spleen = PSF2Font::new(FONT_12X24).ok();

    text.chars()
        .map(|ch| {
            let mut cell = [0u8; CELL_WIDTH * CELL_HEIGHT];
            if ch == ' ' {
                return cell;
            }
            let utf8 = ch.to_string();
            let glyph = spleen
                .as_mut()
                .and_then(|font| font.glyph_for_utf8(utf8.as_bytes()));

            match glyph {
                Some(glyph) => {
                    for (row_y, row) in glyph.enumerate() {
                        for (col_x, on) in row.enumerate() {
                            let idx = row_y * CELL_WIDTH + col_x;
                            if idx < cell.len() && col_x < CELL_WIDTH {
                                cell[idx] = u8::from(on);
                            }
                        }
                    }
                }
                None => draw_box(&mut cell),
            }
            cell
        })
        .collect()
}

/// Outline box for characters the bitmap face lacks.
fn draw_box(cell: &mut [u8; CELL_WIDTH * CELL_HEIGHT]) {
    for y in 4..CELL_BASELINE as usize {
        for x in 2..CELL_WIDTH - 2 {
            let edge = y == 4 || y == CELL_BASELINE as usize - 1 || x == 2 || x == CELL_WIDTH - 3;
            if edge {
                cell[y * CELL_WIDTH + x] = 1;
            }
        }
    }
}

fn rasterize_bitmap(text: &str, pixel_height: f32) -> Result<TextMask, CertificateError> {
    let cells = bitmap_cells(text);
    let scale = pixel_height / CELL_HEIGHT as f32;
    let advance = cells.len() as f32 * CELL_WIDTH as f32 * scale;
    let width = advance.ceil() as usize;
    let height = pixel_height.ceil() as usize;

    let mut mask = TextMask::blank(width, height, 0.0, CELL_BASELINE * scale, advance)?;

    // Nearest-neighbour scale of the concatenated cells.
    for y in 0..mask.height {
        let src_y = ((y as f32 + 0.5) / scale) as usize;
        if src_y >= CELL_HEIGHT {
            continue;
        }
        for x in 0..mask.width {
            let src_x = ((x as f32 + 0.5) / scale) as usize;
            let (cell_idx, col) = (src_x / CELL_WIDTH, src_x % CELL_WIDTH);
            if let Some(cell) = cells.get(cell_idx)
                && cell[src_y * CELL_WIDTH + col] == 1
            {
                mask.data[y * mask.width + x] = 1.0;
            }
        }
    }

    Ok(mask)
}
