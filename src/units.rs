//! Unit conversion between template pixels, millimetres and PDF points.

use serde::{Deserialize, Serialize};

/// Millimetres per inch.
pub const MM_PER_INCH: f32 = 25.4;

/// PDF points per millimetre (72 pt per inch).
pub const PT_PER_MM: f32 = 72.0 / MM_PER_INCH;

/// Convert a pixel length at `dpi` into millimetres.
///
/// No range checks: a zero or negative DPI yields an infinite or negative
/// length, which is passed through.
pub fn px_to_mm(px: f32, dpi: f32) -> f32 {
    (px / dpi) * MM_PER_INCH
}

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

pub fn pt_to_mm(pt: f32) -> f32 {
    pt / PT_PER_MM
}

/// Physical page size in millimetres. Always landscape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PageSize {
    /// Size a page to match a template's pixel dimensions at `dpi`.
    ///
    /// Portrait results are swapped so that `width_mm >= height_mm`.
    pub fn from_template(width_px: f32, height_px: f32, dpi: f32) -> Self {
        let mut width_mm = px_to_mm(width_px, dpi);
        let mut height_mm = px_to_mm(height_px, dpi);
        if width_mm < height_mm {
            std::mem::swap(&mut width_mm, &mut height_mm);
        }
        Self {
            width_mm,
            height_mm,
        }
    }
}
