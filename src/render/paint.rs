//! Drawing surface: template base layer plus rotated, tinted text.
//!
//! Each field is drawn in its own frame: translate to the anchor, rotate,
//! blit the mask. Nothing carries over between fields, so one field's
//! rotation never leaks into the next.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

use super::font::{FontBook, TextMask};
use crate::certificate::{Alignment, Color, PlacedText};
use crate::error::CertificateError;

/// Rotate a point around the origin (angle in degrees, clockwise with y down).
#[inline]
fn rotate_deg(x: f32, y: f32, angle_deg: f32) -> (f32, f32) {
    let (sin_a, cos_a) = angle_deg.to_radians().sin_cos();
    (x * cos_a - y * sin_a, x * sin_a + y * cos_a)
}

/// RGBA canvas sized to the template's native pixel dimensions.
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// Use the template as the base layer. No scaling.
    pub fn from_template(template: &DynamicImage) -> Result<Self, CertificateError> {
        if template.width() == 0 || template.height() == 0 {
            return Err(CertificateError::Surface(format!(
                "template has zero size ({}x{})",
                template.width(),
                template.height()
            )));
        }
        Ok(Self {
            image: template.to_rgba8(),
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Draw one planned field.
    pub fn draw(&mut self, placed: &PlacedText, fonts: &FontBook) -> Result<(), CertificateError> {
        if placed.text.is_empty() {
            return Ok(());
        }
        let mask = fonts.rasterize(&placed.text, &placed.style)?;
        self.blit_mask(
            &mask,
            (placed.x, placed.y),
            placed.style.text_align,
            placed.style.rotation_degrees(),
            placed.style.color,
        );
        Ok(())
    }

    /// Composite `mask` so its aligned anchor lands on `anchor`, rotated by
    /// `rotation` degrees about that point.
    pub fn blit_mask(
        &mut self,
        mask: &TextMask,
        anchor: (f32, f32),
        align: Alignment,
        rotation: f32,
        color: Color,
    ) {
        let (ax, ay) = (mask.anchor_x(align), mask.baseline);
        let (w, h) = (mask.width as f32, mask.height as f32);

        // Destination bounding box of the rotated mask.
        let corners = [(-ax, -ay), (w - ax, -ay), (-ax, h - ay), (w - ax, h - ay)];
        let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
        let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
        for (cx, cy) in corners {
            let (rx, ry) = rotate_deg(cx, cy, rotation);
            min_x = min_x.min(rx);
            min_y = min_y.min(ry);
            max_x = max_x.max(rx);
            max_y = max_y.max(ry);
        }

        let x0 = (anchor.0 + min_x).floor().max(0.0) as u32;
        let y0 = (anchor.1 + min_y).floor().max(0.0) as u32;
        let x1 = ((anchor.0 + max_x).ceil().max(0.0) as u32).min(self.width());
        let y1 = ((anchor.1 + max_y).ceil().max(0.0) as u32).min(self.height());

        let [r, g, b, a] = color.0;
        let ink_alpha = a as f32 / 255.0;

        for py in y0..y1 {
            for px in x0..x1 {
                let dx = px as f32 + 0.5 - anchor.0;
                let dy = py as f32 + 0.5 - anchor.1;
                let (lx, ly) = rotate_deg(dx, dy, -rotation);
                let coverage = mask.sample(lx + ax, ly + ay);
                if coverage <= 0.0 {
                    continue;
                }
                let alpha = (coverage * ink_alpha).min(1.0);
                let dst = self.image.get_pixel_mut(px, py);
                *dst = blend(*dst, [r, g, b], alpha);
            }
        }
    }

    /// Encode the surface as PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>, CertificateError> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(self.image.clone())
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| CertificateError::Encode(format!("Failed to encode PNG: {}", e)))?;
        Ok(bytes)
    }
}

/// Source-over blend of an opaque ink colour at `alpha`.
#[inline]
fn blend(dst: Rgba<u8>, ink: [u8; 3], alpha: f32) -> Rgba<u8> {
    let [dr, dg, db, da] = dst.0;
    let mix = |d: u8, s: u8| (d as f32 * (1.0 - alpha) + s as f32 * alpha).round() as u8;
    let out_a = da as f32 / 255.0 + alpha * (1.0 - da as f32 / 255.0);
    Rgba([
        mix(dr, ink[0]),
        mix(dg, ink[1]),
        mix(db, ink[2]),
        (out_a * 255.0).round() as u8,
    ])
}
