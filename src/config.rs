//! Render configuration – every layout and styling knob for a certificate,
//! resolved once from the environment (or any key/value source) and then
//! passed by reference into the generator.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::qr::ErrorCorrection;

/// Base URL the QR code points at when `VERIFICATION_BASE_URL` is unset.
pub const DEFAULT_VERIFICATION_BASE_URL: &str = "https://peaceandhumanity.org/verification";

/// Label drawn in front of the registration number.
pub const DEFAULT_REG_LABEL: &str = "Registration Number : ";

/// Horizontal placement of a text field relative to its `left` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Text starts at the anchor.
    #[default]
    Left,
    /// Text is centred on the anchor using its measured width.
    Center,
}

impl TextAlign {
    /// Parse `left` / `center` (also `centre`), case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Some(TextAlign::Left),
            "center" | "centre" => Some(TextAlign::Center),
            _ => None,
        }
    }
}

/// Styling and position for one line of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFieldStyle {
    /// Font size in points. Also used as the text cell height in mm.
    pub size: f32,
    /// Anchor x in mm from the left page edge.
    pub left: f32,
    /// Top of the text cell in mm from the top page edge.
    pub top: f32,
    pub color: [u8; 3],
    pub bold: bool,
    pub align: TextAlign,
}

/// Placement and colouring of the verification QR code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrStyle {
    /// Left edge in mm.
    pub left: f32,
    /// Top edge in mm.
    pub top: f32,
    /// Edge length of the square bitmap in pixels (converted to mm at the render DPI).
    pub size_px: u32,
    pub level: ErrorCorrection,
    /// RGBA of dark modules.
    pub foreground: [u8; 4],
    /// RGBA of everything else, quiet zone included.
    pub background: [u8; 4],
}

/// Resolved configuration snapshot for one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Background template image. `None` renders on a blank page.
    pub template_image: Option<PathBuf>,
    /// Inset in mm applied on every side of the stretched template.
    pub template_safety_mm: f32,
    pub font_family: String,
    pub template_width_px: f32,
    pub template_height_px: f32,
    pub dpi: f32,
    pub name: TextFieldStyle,
    pub registration: TextFieldStyle,
    /// Text drawn before the registration number.
    pub registration_label: String,
    pub qr: QrStyle,
    pub verification_base_url: String,
    /// Append the recipient name to the output filename.
    pub filename_include_name: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            template_image: None,
            template_safety_mm: 1.0,
            font_family: "Helvetica".to_string(),
            template_width_px: 2500.0,
            template_height_px: 1932.0,
            dpi: 300.0,
            name: TextFieldStyle {
                size: 42.0,
                left: 50.0,
                top: 70.0,
                color: [0, 0, 0],
                bold: true,
                align: TextAlign::Left,
            },
            registration: TextFieldStyle {
                size: 18.0,
                left: 50.0,
                top: 110.0,
                color: [0, 0, 0],
                bold: false,
                align: TextAlign::Left,
            },
            registration_label: DEFAULT_REG_LABEL.to_string(),
            qr: QrStyle {
                left: 160.0,
                top: 110.0,
                size_px: 180,
                level: ErrorCorrection::Medium,
                foreground: [0, 0, 0, 255],
                background: [0, 0, 0, 0],
            },
            verification_base_url: DEFAULT_VERIFICATION_BASE_URL.to_string(),
            filename_include_name: false,
        }
    }
}

impl RenderConfig {
    /// Load `.env` from the working directory if present, then resolve
    /// every setting from the process environment.
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("Ignoring .env file: {e}");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve every setting through `lookup`, falling back to the
    /// defaults for missing, empty or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let r = Resolver { lookup };

        Self {
            template_image: r.string("TEMPLATE_IMAGE").map(PathBuf::from),
            template_safety_mm: r.float("TEMPLATE_SAFETY_MM", d.template_safety_mm),
            font_family: r.string("FONT_FAMILY").unwrap_or(d.font_family),
            template_width_px: r.float("TEMPLATE_WIDTH_PX", d.template_width_px),
            template_height_px: r.float("TEMPLATE_HEIGHT_PX", d.template_height_px),
            dpi: r.float("DPI", d.dpi),
            name: r.text_field("NAME", &d.name),
            registration: r.text_field("REG", &d.registration),
            registration_label: r.raw("REG_LABEL").unwrap_or(d.registration_label),
            qr: QrStyle {
                left: r.float("QR_LEFT", d.qr.left),
                top: r.float("QR_TOP", d.qr.top),
                size_px: r.uint("QR_SIZE", d.qr.size_px),
                level: r
                    .string("QR_ERROR_CORRECTION")
                    .map(|s| ErrorCorrection::parse_lenient(&s))
                    .unwrap_or(d.qr.level),
                foreground: r.rgba("QR_FG", d.qr.foreground),
                background: r.rgba("QR_BG", d.qr.background),
            },
            verification_base_url: r
                .string("VERIFICATION_BASE_URL")
                .unwrap_or(d.verification_base_url),
            filename_include_name: r.flag("FILENAME_INCLUDE_NAME", d.filename_include_name),
        }
    }
}

/// Typed accessors over a key lookup function.
struct Resolver<F> {
    lookup: F,
}

impl<F> Resolver<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Value exactly as stored, `None` when absent or empty.
    fn raw(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.is_empty())
    }

    /// Trimmed value, `None` when absent or blank.
    fn string(&self, key: &str) -> Option<String> {
        self.raw(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parsed<T: std::str::FromStr>(&self, key: &str, default: T) -> T {
        match self.string(key) {
            Some(v) => v.parse().unwrap_or_else(|_| {
                log::warn!("{key}={v:?} is not valid, using default");
                default
            }),
            None => default,
        }
    }

    fn float(&self, key: &str, default: f32) -> f32 {
        self.parsed(key, default)
    }

    fn uint(&self, key: &str, default: u32) -> u32 {
        self.parsed(key, default)
    }

    /// Colour channel: any integer, truncated to its low byte.
    fn byte(&self, key: &str, default: u8) -> u8 {
        self.parsed::<i64>(key, default as i64) as u8
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        match self.string(key) {
            Some(v) => match v.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    log::warn!("{key}={v:?} is not a boolean, using default");
                    default
                }
            },
            None => default,
        }
    }

    fn rgb(&self, prefix: &str, default: [u8; 3]) -> [u8; 3] {
        [
            self.byte(&format!("{prefix}_R"), default[0]),
            self.byte(&format!("{prefix}_G"), default[1]),
            self.byte(&format!("{prefix}_B"), default[2]),
        ]
    }

    fn rgba(&self, prefix: &str, default: [u8; 4]) -> [u8; 4] {
        let [r, g, b] = self.rgb(prefix, [default[0], default[1], default[2]]);
        [r, g, b, self.byte(&format!("{prefix}_A"), default[3])]
    }

    fn text_field(&self, prefix: &str, d: &TextFieldStyle) -> TextFieldStyle {
        let align_key = format!("{prefix}_ALIGN");
        let align = match self.string(&align_key) {
            Some(v) => TextAlign::parse(&v).unwrap_or_else(|| {
                log::warn!("{align_key}={v:?} is not left/center, using default");
                d.align
            }),
            None => d.align,
        };

        TextFieldStyle {
            size: self.float(&format!("{prefix}_SIZE"), d.size),
            left: self.float(&format!("{prefix}_LEFT"), d.left),
            top: self.float(&format!("{prefix}_TOP"), d.top),
            color: self.rgb(&format!("{prefix}_COLOR"), d.color),
            bold: self.flag(&format!("{prefix}_BOLD"), d.bold),
            align,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(pairs: &[(&str, &str)]) -> RenderConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RenderConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(resolve(&[]), RenderConfig::default());
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let cfg = resolve(&[("DPI", ""), ("FONT_FAMILY", ""), ("TEMPLATE_IMAGE", "")]);
        assert_eq!(cfg.dpi, 300.0);
        assert_eq!(cfg.font_family, "Helvetica");
        assert!(cfg.template_image.is_none());
    }

    #[test]
    fn typed_values_are_parsed() {
        let cfg = resolve(&[
            ("TEMPLATE_IMAGE", "assets/cert.png"),
            ("DPI", "150"),
            ("NAME_SIZE", "36.5"),
            ("NAME_COLOR_R", "200"),
            ("NAME_ALIGN", "Center"),
            ("REG_BOLD", "yes"),
            ("QR_SIZE", "240"),
            ("QR_ERROR_CORRECTION", "h"),
            ("QR_BG_A", "255"),
            ("FILENAME_INCLUDE_NAME", "true"),
        ]);
        assert_eq!(cfg.template_image, Some(PathBuf::from("assets/cert.png")));
        assert_eq!(cfg.dpi, 150.0);
        assert_eq!(cfg.name.size, 36.5);
        assert_eq!(cfg.name.color, [200, 0, 0]);
        assert_eq!(cfg.name.align, TextAlign::Center);
        assert!(cfg.registration.bold);
        assert_eq!(cfg.qr.size_px, 240);
        assert_eq!(cfg.qr.level, ErrorCorrection::High);
        assert_eq!(cfg.qr.background, [0, 0, 0, 255]);
        assert!(cfg.filename_include_name);
    }

    #[test]
    fn out_of_range_values_pass_through() {
        let cfg = resolve(&[("DPI", "-72"), ("NAME_LEFT", "-10"), ("QR_FG_R", "300")]);
        assert_eq!(cfg.dpi, -72.0);
        assert_eq!(cfg.name.left, -10.0);
        // 300 truncated to a byte
        assert_eq!(cfg.qr.foreground[0], 44);
    }

    #[test]
    fn garbage_values_use_defaults() {
        let cfg = resolve(&[("DPI", "high"), ("QR_SIZE", "-5"), ("NAME_ALIGN", "justify")]);
        assert_eq!(cfg.dpi, 300.0);
        assert_eq!(cfg.qr.size_px, 180);
        assert_eq!(cfg.name.align, TextAlign::Left);
    }

    #[test]
    fn path_and_url_are_trimmed() {
        let cfg = resolve(&[
            ("TEMPLATE_IMAGE", "  assets/cert.png\n"),
            ("VERIFICATION_BASE_URL", " https://example.org/verify/ "),
            ("FONT_FAMILY", "   "),
        ]);
        assert_eq!(cfg.template_image, Some(PathBuf::from("assets/cert.png")));
        assert_eq!(cfg.verification_base_url, "https://example.org/verify/");
        assert_eq!(cfg.font_family, "Helvetica");
    }

    #[test]
    fn registration_label_keeps_whitespace() {
        let cfg = resolve(&[("REG_LABEL", "Reg. No: ")]);
        assert_eq!(cfg.registration_label, "Reg. No: ");
    }

    #[test]
    fn config_json_roundtrip() {
        let cfg = RenderConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: RenderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
