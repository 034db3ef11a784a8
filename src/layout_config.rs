//! Certificate layout – the intermediate representation between placement
//! arithmetic and PDF rendering. Encodes exactly what is drawn on the single
//! page, in draw order, with top-left-origin millimetre coordinates.

use serde::{Deserialize, Serialize};

use crate::fonts::FontFace;
use crate::units::PageSize;

/// A complete single-page certificate ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateLayout {
    /// Document title embedded in the PDF metadata.
    pub title: String,
    pub page: PageSize,
    /// Drawn in order; later elements paint over earlier ones.
    pub elements: Vec<Element>,
}

/// One drawing operation on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Image(ImagePlacement),
    Text(TextPlacement),
}

/// Which image asset an [`ImagePlacement`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSlot {
    Template,
    QrCode,
}

/// An image stretched into a rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePlacement {
    pub slot: ImageSlot,
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

/// One line of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPlacement {
    pub text: String,
    pub font: FontFace,
    pub font_size_pt: f32,
    pub color: [u8; 3],
    /// Left edge of the first glyph.
    pub x_mm: f32,
    /// Baseline, measured down from the top edge.
    pub baseline_mm: f32,
}

impl CertificateLayout {
    pub fn image(&self, slot: ImageSlot) -> Option<&ImagePlacement> {
        self.images().into_iter().find(|i| i.slot == slot)
    }

    /// Image placements in draw order.
    pub fn images(&self) -> Vec<&ImagePlacement> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                Element::Image(img) => Some(img),
                Element::Text(_) => None,
            })
            .collect()
    }

    /// Text placements in draw order.
    pub fn texts(&self) -> Vec<&TextPlacement> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                Element::Text(text) => Some(text),
                Element::Image(_) => None,
            })
            .collect()
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }
}
