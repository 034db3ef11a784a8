//! Verification QR code: encode the URL, rasterise it at an exact pixel
//! size, then recolour dark modules and background into an RGBA image.

use std::io::Cursor;

use image::imageops;
use image::{GrayImage, ImageFormat, Luma, Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode};
use serde::{Deserialize, Serialize};

use crate::error::{CertError, Result};

/// QR redundancy tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorCorrection {
    /// ~7 % recovery.
    Low,
    /// ~15 % recovery.
    #[default]
    Medium,
    /// ~25 % recovery.
    Quartile,
    /// ~30 % recovery.
    High,
}

impl ErrorCorrection {
    /// Parse a single-letter code (`L`, `M`, `Q`, `H`) case-insensitively.
    /// Anything else, including the empty string, is `Medium`.
    pub fn parse_lenient(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "L" => ErrorCorrection::Low,
            "M" => ErrorCorrection::Medium,
            "Q" => ErrorCorrection::Quartile,
            "H" => ErrorCorrection::High,
            _ => ErrorCorrection::Medium,
        }
    }

    fn ec_level(self) -> EcLevel {
        match self {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

/// Build `{base}#{registration}` with trailing slashes removed from `base`.
pub fn verification_url(base_url: &str, registration_number: &str) -> String {
    format!("{}#{}", base_url.trim_end_matches('/'), registration_number)
}

/// Light border around the symbol on each side, in modules.
pub const QUIET_ZONE_MODULES: u32 = 4;

/// A recoloured, square QR bitmap.
#[derive(Debug, Clone)]
pub struct QrImage {
    pixels: RgbaImage,
}

impl QrImage {
    /// Encode `payload` at `level` into a `size_px` × `size_px` image with
    /// dark modules painted `foreground` and everything else `background`.
    pub fn render(
        payload: &str,
        level: ErrorCorrection,
        size_px: u32,
        foreground: [u8; 4],
        background: [u8; 4],
    ) -> Result<Self> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), level.ec_level())
            .map_err(|e| CertError::QrGeneration(format!("cannot encode {payload:?}: {e}")))?;

        // Every module needs at least one whole pixel.
        let span = symbol_span(&code);
        if size_px < span {
            return Err(CertError::QrGeneration(format!(
                "{size_px} px is too small for a {span}-module QR code (quiet zone included)"
            )));
        }
        log::debug!(
            "QR {}x{} modules at {:?}, {} px per module, for {payload}",
            code.width(),
            code.width(),
            level,
            size_px / span
        );

        let bitmap = two_tone_bitmap(&code, size_px);
        Ok(Self {
            pixels: recolor(&bitmap, foreground, background),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Encode as PNG for embedding in the PDF.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.pixels
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| CertError::QrGeneration(format!("cannot encode QR PNG: {e}")))?;
        Ok(buf.into_inner())
    }
}

/// Modules across the rendered symbol, quiet zone included.
fn symbol_span(code: &QrCode) -> u32 {
    code.width() as u32 + 2 * QUIET_ZONE_MODULES
}

/// Standard black-on-white rendering with a whole number of pixels per
/// module, centred on a white `size_px` square. Leftover pixels become
/// extra border.
fn two_tone_bitmap(code: &QrCode, size_px: u32) -> GrayImage {
    let ppm = (size_px / symbol_span(code)).max(1);
    let symbol = code
        .render::<Luma<u8>>()
        .quiet_zone(true)
        .module_dimensions(ppm, ppm)
        .build();

    let mut canvas = GrayImage::from_pixel(size_px, size_px, Luma([255]));
    let offset = (size_px.saturating_sub(symbol.width()) / 2) as i64;
    imageops::replace(&mut canvas, &symbol, offset, offset);
    canvas
}

fn recolor(bitmap: &GrayImage, foreground: [u8; 4], background: [u8; 4]) -> RgbaImage {
    let (width, height) = bitmap.dimensions();
    let mut out = RgbaImage::from_pixel(width, height, Rgba(background));
    for y in 0..height {
        for x in 0..width {
            // Dark modules render as luma 0.
            if bitmap.get_pixel(x, y).0[0] < 128 {
                out.put_pixel(x, y, Rgba(foreground));
            }
        }
    }
    out
}
