//! Built-in (base-14) font selection and text measurement.
//!
//! Certificates use the PDF standard fonts so nothing has to be embedded.
//! Widths come from the Adobe font metrics for Helvetica; Times falls back
//! to an average-width heuristic and Courier is monospaced.

use printpdf::BuiltinFont;
use serde::{Deserialize, Serialize};

/// Standard font families a certificate can be set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontFamily {
    Helvetica,
    Times,
    Courier,
}

impl FontFamily {
    /// Map a configured family name onto a standard font.
    ///
    /// Unknown names fall back to Helvetica with a warning.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "helvetica" | "arial" | "sans" | "sans-serif" => FontFamily::Helvetica,
            "times" | "times-roman" | "times new roman" | "serif" => FontFamily::Times,
            "courier" | "courier new" | "monospace" => FontFamily::Courier,
            other => {
                log::warn!("Unknown font family {other:?}, using Helvetica");
                FontFamily::Helvetica
            }
        }
    }
}

/// A concrete face: family plus weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontFace {
    pub family: FontFamily,
    pub bold: bool,
}

impl FontFace {
    pub fn new(family: FontFamily, bold: bool) -> Self {
        Self { family, bold }
    }

    pub fn builtin(&self) -> BuiltinFont {
        match (self.family, self.bold) {
            (FontFamily::Helvetica, false) => BuiltinFont::Helvetica,
            (FontFamily::Helvetica, true) => BuiltinFont::HelveticaBold,
            (FontFamily::Times, false) => BuiltinFont::TimesRoman,
            (FontFamily::Times, true) => BuiltinFont::TimesBold,
            (FontFamily::Courier, false) => BuiltinFont::Courier,
            (FontFamily::Courier, true) => BuiltinFont::CourierBold,
        }
    }

    /// Advance width of `text` at `font_size` points, in points.
    pub fn measure_text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.glyph_width(c) as u32).sum();
        units as f32 * font_size / 1000.0
    }

    /// Glyph advance in 1/1000 em.
    fn glyph_width(&self, c: char) -> u16 {
        match self.family {
            FontFamily::Courier => 600,
            FontFamily::Helvetica => {
                let table = if self.bold {
                    &HELVETICA_BOLD_WIDTHS
                } else {
                    &HELVETICA_WIDTHS
                };
                ascii_width(table, c).unwrap_or(556)
            }
            // Average proportional width, bold ~10 % wider.
            FontFamily::Times => {
                if self.bold {
                    550
                } else {
                    500
                }
            }
        }
    }
}

fn ascii_width(table: &[u16; 95], c: char) -> Option<u16> {
    let code = c as u32;
    if (32..127).contains(&code) {
        Some(table[(code - 32) as usize])
    } else {
        None
    }
}

/// Helvetica advances for U+0020..=U+007E.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold advances for U+0020..=U+007E.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Convert a UTF-8 string to raw Windows-1252 bytes then wrap in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts use
/// WinAnsiEncoding, so each glyph is one byte). Unmappable characters become `?`.
pub fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80, // euro
            '\u{201A}' => 0x82, // single low-9 quote
            '\u{201E}' => 0x84, // double low-9 quote
            '\u{2026}' => 0x85, // ellipsis
            '\u{2018}' => 0x91, // left single quote
            '\u{2019}' => 0x92, // right single quote
            '\u{201C}' => 0x93, // left double quote
            '\u{201D}' => 0x94, // right double quote
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96, // en-dash
            '\u{2014}' => 0x97, // em-dash
            '\u{2122}' => 0x99, // trademark
            '\u{00A0}' => 0x20, // non-breaking space -> space
            c if (c as u32) < 256 => c as u8,
            _ => b'?',
        })
        .collect();
    // SAFETY: the String is intentionally non-UTF-8 above 0x7F and must never
    // be inspected as text. It is only handed to `Op::WriteTextBuiltinFont`;
    // printpdf encodes builtin-font text through lopdf's
    // `SimpleEncoding(WinAnsiEncoding)`, which copies `as_bytes()` verbatim
    // into the content stream. Re-check this if printpdf/lopdf change how
    // builtin-font strings are encoded.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_names() {
        assert_eq!(FontFamily::from_name("Helvetica"), FontFamily::Helvetica);
        assert_eq!(FontFamily::from_name("Arial"), FontFamily::Helvetica);
        assert_eq!(FontFamily::from_name("times"), FontFamily::Times);
        assert_eq!(FontFamily::from_name(" Courier "), FontFamily::Courier);
        assert_eq!(FontFamily::from_name("Comic Sans"), FontFamily::Helvetica);
    }

    #[test]
    fn builtin_mapping() {
        let bold = FontFace::new(FontFamily::Helvetica, true);
        assert!(matches!(bold.builtin(), BuiltinFont::HelveticaBold));
        let times = FontFace::new(FontFamily::Times, false);
        assert!(matches!(times.builtin(), BuiltinFont::TimesRoman));
    }

    #[test]
    fn helvetica_width() {
        let face = FontFace::new(FontFamily::Helvetica, false);
        // H=722 e=556 l=222 l=222 o=556 → 2278 units
        let w = face.measure_text_width("Hello", 10.0);
        assert!((w - 22.78).abs() < 0.001, "got {w}");
    }

    #[test]
    fn bold_is_wider() {
        let regular = FontFace::new(FontFamily::Helvetica, false);
        let bold = FontFace::new(FontFamily::Helvetica, true);
        assert!(bold.measure_text_width("Jane Doe", 42.0) > regular.measure_text_width("Jane Doe", 42.0));
    }

    #[test]
    fn courier_is_monospaced() {
        let face = FontFace::new(FontFamily::Courier, false);
        assert!((face.measure_text_width("iiii", 10.0) - face.measure_text_width("MMMM", 10.0)).abs() < f32::EPSILON);
        assert!((face.measure_text_width("ab", 10.0) - 12.0).abs() < 0.001);
    }

    #[test]
    fn winlatin_maps_latin1_and_replaces_the_rest() {
        assert_eq!(to_winlatin("Jane").as_bytes(), b"Jane");
        assert_eq!(to_winlatin("Jos\u{e9}").as_bytes(), &[b'J', b'o', b's', 0xE9]);
        assert_eq!(to_winlatin("\u{65E5}").as_bytes(), b"?");
    }

    #[test]
    fn winlatin_maps_typographic_punctuation() {
        let encoded = to_winlatin("\u{2018}\u{2019}\u{201C}\u{201D}\u{20AC}\u{2013}\u{00A0}");
        assert_eq!(encoded.as_bytes(), &[0x91, 0x92, 0x93, 0x94, 0x80, 0x96, 0x20]);
    }
}
