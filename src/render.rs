//! PDF renderer – takes a [`CertificateLayout`] plus the image bytes it
//! refers to and produces a single-page PDF using `printpdf` (v0.8 ops API).

use std::collections::HashMap;

use printpdf::*;

use crate::error::{CertError, Result};
use crate::fonts::to_winlatin;
use crate::layout_config::{CertificateLayout, Element, ImagePlacement, ImageSlot, TextPlacement};
use crate::units::mm_to_pt;

/// Encoded (PNG/JPEG) image bytes keyed by the slot they fill.
pub type ImageAssets = HashMap<ImageSlot, Vec<u8>>;

/// A printpdf XObject together with the pixel dimensions of the source image.
struct ImageResource {
    xobj_id: XObjectId,
    px_width: u32,
    px_height: u32,
}

/// Render a layout into PDF bytes.
///
/// Every placed image must have its bytes in `assets`; a template that
/// cannot be decoded is a [`CertError::TemplateImage`], a QR code that
/// cannot be decoded a [`CertError::QrGeneration`].
pub fn render_pdf(layout: &CertificateLayout, assets: &ImageAssets) -> Result<Vec<u8>> {
    let mut doc = PdfDocument::new(&layout.title);

    let resources = register_images(&mut doc, layout, assets)?;
    let ops = page_ops(layout, &resources);

    // A certificate is exactly one page.
    let page = PdfPage::new(Mm(layout.page.width_mm), Mm(layout.page.height_mm), ops);
    doc.with_pages(vec![page]);

    Ok(doc.save(&PdfSaveOptions::default(), &mut Vec::new()))
}

/// Decode every placed image once and add it to `doc` as an XObject.
fn register_images(
    doc: &mut PdfDocument,
    layout: &CertificateLayout,
    assets: &ImageAssets,
) -> Result<HashMap<ImageSlot, ImageResource>> {
    let mut resources: HashMap<ImageSlot, ImageResource> = HashMap::new();
    let mut img_warnings: Vec<PdfWarnMsg> = Vec::new();

    for placement in layout.images() {
        if resources.contains_key(&placement.slot) {
            continue;
        }
        let bytes = assets.get(&placement.slot).ok_or_else(|| {
            image_error(placement.slot, "no image data supplied".to_string())
        })?;

        let raw = RawImage::decode_from_bytes(bytes, &mut img_warnings)
            .map_err(|e| image_error(placement.slot, format!("decode error: {e}")))?;
        let (px_width, px_height) = (raw.width as u32, raw.height as u32);
        let xobj_id = doc.add_image(&raw);

        resources.insert(
            placement.slot,
            ImageResource {
                xobj_id,
                px_width,
                px_height,
            },
        );
    }
    if !img_warnings.is_empty() {
        log::debug!("printpdf reported {} image warning(s)", img_warnings.len());
    }

    Ok(resources)
}

/// Content-stream ops for the page, in layout order.
fn page_ops(layout: &CertificateLayout, resources: &HashMap<ImageSlot, ImageResource>) -> Vec<Op> {
    let page_h_pt = mm_to_pt(layout.page.height_mm);
    let mut ops = Vec::new();

    for element in &layout.elements {
        match element {
            Element::Image(placement) => {
                if let Some(res) = resources.get(&placement.slot) {
                    draw_image(&mut ops, placement, res, page_h_pt);
                }
            }
            Element::Text(text) => draw_text(&mut ops, text, page_h_pt),
        }
    }
    ops
}

fn image_error(slot: ImageSlot, msg: String) -> CertError {
    match slot {
        ImageSlot::Template => CertError::TemplateImage(msg),
        ImageSlot::QrCode => CertError::QrGeneration(msg),
    }
}

fn draw_image(ops: &mut Vec<Op>, placement: &ImagePlacement, res: &ImageResource, page_h_pt: f32) {
    // PDF origin is bottom-left; layout origin is top-left.
    let x_pt = mm_to_pt(placement.x_mm);
    let bottom_pt = page_h_pt - mm_to_pt(placement.y_mm + placement.height_mm);

    // At dpi=72 printpdf renders 1 px = 1 pt, so scale = desired_pt / px_dim.
    let scale_x = if res.px_width > 0 {
        mm_to_pt(placement.width_mm) / res.px_width as f32
    } else {
        1.0
    };
    let scale_y = if res.px_height > 0 {
        mm_to_pt(placement.height_mm) / res.px_height as f32
    } else {
        1.0
    };

    ops.push(Op::UseXobject {
        id: res.xobj_id.clone(),
        transform: XObjectTransform {
            translate_x: Some(Pt(x_pt)),
            translate_y: Some(Pt(bottom_pt)),
            dpi: Some(72.0),
            scale_x: Some(scale_x),
            scale_y: Some(scale_y),
            rotate: None,
        },
    });
}

fn draw_text(ops: &mut Vec<Op>, text: &TextPlacement, page_h_pt: f32) {
    if text.text.is_empty() {
        return;
    }
    let font = text.font.builtin();

    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point {
            x: Pt(mm_to_pt(text.x_mm)),
            y: Pt(page_h_pt - mm_to_pt(text.baseline_mm)),
        },
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(text.font_size_pt),
        font,
    });
    ops.push(Op::SetFillColor {
        col: Color::Rgb(Rgb {
            r: text.color[0] as f32 / 255.0,
            g: text.color[1] as f32 / 255.0,
            b: text.color[2] as f32 / 255.0,
            icc_profile: None,
        }),
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(to_winlatin(&text.text))],
        font,
    });
    ops.push(Op::EndTextSection);
}
