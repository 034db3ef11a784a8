//! Placement arithmetic: turns a [`RenderConfig`] plus the recipient's
//! details into a [`CertificateLayout`].
//!
//! Text uses a cell model: a field's cell sits at `(left, top)` with a
//! height equal to the field's size value in mm, and the text is vertically
//! centred in it. Existing template configurations are tuned against this.

use crate::config::{RenderConfig, TextAlign, TextFieldStyle};
use crate::fonts::{FontFace, FontFamily};
use crate::layout_config::{CertificateLayout, Element, ImagePlacement, ImageSlot, TextPlacement};
use crate::units::{pt_to_mm, px_to_mm, PageSize};

/// Horizontal padding between the cell edge and the first glyph, in mm.
pub const CELL_PADDING_MM: f32 = 1.0;

/// Baseline offset below the cell centre, as a fraction of the font size.
const BASELINE_FACTOR: f32 = 0.3;

/// Lay out a certificate for `name` / `registration_number`.
pub fn compose_layout(
    config: &RenderConfig,
    name: &str,
    registration_number: &str,
) -> CertificateLayout {
    let page = PageSize::from_template(
        config.template_width_px,
        config.template_height_px,
        config.dpi,
    );
    let family = FontFamily::from_name(&config.font_family);

    let registration_text = format!("{}{}", config.registration_label, registration_number);
    let qr_mm = px_to_mm(config.qr.size_px as f32, config.dpi);

    // Template, then text, then the QR code on top.
    let mut elements = Vec::new();
    if config.template_image.is_some() {
        elements.push(Element::Image(template_placement(
            &page,
            config.template_safety_mm,
        )));
    }
    elements.push(Element::Text(place_text(name, family, &config.name)));
    elements.push(Element::Text(place_text(
        &registration_text,
        family,
        &config.registration,
    )));
    elements.push(Element::Image(ImagePlacement {
        slot: ImageSlot::QrCode,
        x_mm: config.qr.left,
        y_mm: config.qr.top,
        width_mm: qr_mm,
        height_mm: qr_mm,
    }));

    CertificateLayout {
        title: format!("Certificate - {name}"),
        page,
        elements,
    }
}

/// Template stretched over the whole page, inset by `safety_mm` on each side.
fn template_placement(page: &PageSize, safety_mm: f32) -> ImagePlacement {
    ImagePlacement {
        slot: ImageSlot::Template,
        x_mm: safety_mm,
        y_mm: safety_mm,
        width_mm: page.width_mm - safety_mm * 2.0,
        height_mm: page.height_mm - safety_mm * 2.0,
    }
}

fn place_text(text: &str, family: FontFamily, style: &TextFieldStyle) -> TextPlacement {
    let font = FontFace::new(family, style.bold);

    let anchor = match style.align {
        TextAlign::Left => style.left,
        TextAlign::Center => {
            let width_mm = pt_to_mm(font.measure_text_width(text, style.size));
            style.left - width_mm / 2.0
        }
    };

    let cell_height_mm = style.size;
    let baseline_mm =
        style.top + cell_height_mm / 2.0 + BASELINE_FACTOR * pt_to_mm(style.size);

    TextPlacement {
        text: text.to_string(),
        font,
        font_size_pt: style.size,
        color: style.color,
        x_mm: anchor + CELL_PADDING_MM,
        baseline_mm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn default_layout() {
        let layout = compose_layout(&RenderConfig::default(), "Jane Doe", "REG-001");

        assert!((layout.page.width_mm - 211.67).abs() < 0.01);
        assert!((layout.page.height_mm - 163.58).abs() < 0.01);
        assert_eq!(layout.title, "Certificate - Jane Doe");

        // No template configured: only the QR image.
        assert_eq!(layout.images().len(), 1);
        let qr = layout.image(ImageSlot::QrCode).unwrap();
        assert_eq!((qr.x_mm, qr.y_mm), (160.0, 110.0));
        // 180 px @ 300 dpi = 15.24 mm
        assert!((qr.width_mm - 15.24).abs() < 0.001);
        assert_eq!(qr.width_mm, qr.height_mm);

        assert_eq!(layout.texts()[0].text, "Jane Doe");
        assert!(layout.texts()[0].font.bold);
        assert_eq!(layout.texts()[1].text, "Registration Number : REG-001");
        assert!(!layout.texts()[1].font.bold);
    }

    #[test]
    fn template_is_drawn_first_with_safety_inset() {
        let config = RenderConfig {
            template_image: Some(PathBuf::from("template.png")),
            ..RenderConfig::default()
        };
        let layout = compose_layout(&config, "A", "B");
        assert_eq!(layout.images()[0].slot, ImageSlot::Template);
        assert_eq!(layout.images()[1].slot, ImageSlot::QrCode);

        let tpl = layout.images()[0];
        assert_eq!((tpl.x_mm, tpl.y_mm), (1.0, 1.0));
        assert!((tpl.width_mm - (layout.page.width_mm - 2.0)).abs() < 1e-4);
        assert!((tpl.height_mm - (layout.page.height_mm - 2.0)).abs() < 1e-4);
    }

    #[test]
    fn qr_is_drawn_over_text() {
        let config = RenderConfig {
            template_image: Some(PathBuf::from("template.png")),
            ..RenderConfig::default()
        };
        let layout = compose_layout(&config, "Jane Doe", "REG-001");
        let order: Vec<&str> = layout
            .elements
            .iter()
            .map(|e| match e {
                Element::Image(img) if img.slot == ImageSlot::Template => "template",
                Element::Image(_) => "qr",
                Element::Text(_) => "text",
            })
            .collect();
        assert_eq!(order, ["template", "text", "text", "qr"]);
    }

    #[test]
    fn left_anchored_text_position() {
        let layout = compose_layout(&RenderConfig::default(), "Jane Doe", "REG-001");
        let name = layout.texts()[0];
        assert!((name.x_mm - 51.0).abs() < 1e-4);
        // 70 + 42/2 + 0.3 * (42 pt in mm)
        let expected = 70.0 + 21.0 + 0.3 * 42.0 * 25.4 / 72.0;
        assert!((name.baseline_mm - expected).abs() < 1e-3);
    }

    #[test]
    fn centred_text_straddles_anchor() {
        let mut config = RenderConfig::default();
        config.name.align = TextAlign::Center;
        config.name.left = 105.0;

        let layout = compose_layout(&config, "Jane Doe", "REG-001");
        let name = layout.texts()[0];
        let width_mm = pt_to_mm(name.font.measure_text_width("Jane Doe", 42.0));
        let left = name.x_mm - CELL_PADDING_MM;
        assert!(left < 105.0);
        assert!((left + width_mm / 2.0 - 105.0).abs() < 1e-3);

        // Registration line keeps its own (left) alignment.
        assert!((layout.texts()[1].x_mm - 51.0).abs() < 1e-4);
    }

    #[test]
    fn custom_label_and_colours() {
        let mut config = RenderConfig::default();
        config.registration_label = "No. ".to_string();
        config.registration.color = [120, 10, 10];
        let layout = compose_layout(&config, "A", "42");
        assert_eq!(layout.texts()[1].text, "No. 42");
        assert_eq!(layout.texts()[1].color, [120, 10, 10]);
    }

    #[test]
    fn layout_json_roundtrip() {
        let layout = compose_layout(&RenderConfig::default(), "Jane Doe", "REG-001");
        let parsed = CertificateLayout::from_json(&layout.to_json()).unwrap();
        assert_eq!(parsed, layout);
    }
}
