//! Pipeline – ties together configuration, unit conversion, QR rendering,
//! layout, PDF rendering and the output write into a single function call.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::RenderConfig;
use crate::error::{CertError, Result};
use crate::layout::compose_layout;
use crate::layout_config::{CertificateLayout, ImageSlot};
use crate::qr::{verification_url, QrImage};
use crate::render::{render_pdf, ImageAssets};
use crate::sanitize::sanitize_filename;

/// Who the certificate is for and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRequest {
    pub name: String,
    pub registration_number: String,
    pub output_dir: PathBuf,
}

impl CertificateRequest {
    pub fn new(
        name: impl Into<String>,
        registration_number: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            registration_number: registration_number.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Sanitised `<registration>[_<name>].pdf`.
    pub fn output_filename(&self, config: &RenderConfig) -> String {
        let stem = if config.filename_include_name {
            format!("{}_{}", self.registration_number, self.name)
        } else {
            self.registration_number.clone()
        };
        sanitize_filename(&format!("{stem}.pdf"))
    }
}

/// Compute the layout only (no QR encoding, no PDF) – useful for previews
/// and testing.
pub fn compute_layout(request: &CertificateRequest, config: &RenderConfig) -> CertificateLayout {
    compose_layout(config, &request.name, &request.registration_number)
}

/// Full pipeline: request + config → PDF file on disk.
///
/// Returns the absolute path of the written file. On error nothing is left
/// at the output path.
pub fn generate(request: &CertificateRequest, config: &RenderConfig) -> Result<PathBuf> {
    // 1. Layout (page size, placements)
    let layout = compute_layout(request, config);
    log::info!(
        "Template: {:.0}x{:.0} px @ {:.0} DPI -> PDF: {:.2}x{:.2} mm",
        config.template_width_px,
        config.template_height_px,
        config.dpi,
        layout.page.width_mm,
        layout.page.height_mm
    );

    // 2. QR code
    let url = verification_url(&config.verification_base_url, &request.registration_number);
    let qr = QrImage::render(
        &url,
        config.qr.level,
        config.qr.size_px,
        config.qr.foreground,
        config.qr.background,
    )?;

    let mut assets = ImageAssets::new();
    assets.insert(ImageSlot::QrCode, qr.to_png_bytes()?);

    // 3. Template
    if let Some(path) = &config.template_image {
        assets.insert(ImageSlot::Template, read_template(path)?);
    }

    // 4. Render
    let bytes = render_pdf(&layout, &assets)?;

    // 5. Write
    let filename = request.output_filename(config);
    let output = write_pdf(&request.output_dir, &filename, &bytes)?;
    log::info!("PDF generated: {filename}");

    Ok(output)
}

fn read_template(path: &Path) -> Result<Vec<u8>> {
    if !path.is_file() {
        return Err(CertError::TemplateNotFound(path.to_path_buf()));
    }
    fs::read(path).map_err(|e| CertError::TemplateImage(format!("{}: {e}", path.display())))
}

/// Write `bytes` to `dir/filename` atomically: the data goes to a temporary
/// file in `dir` that is renamed over the target only once fully written.
fn write_pdf(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    let target = dir.join(filename);
    let write_err = |source| CertError::PdfWrite {
        path: target.clone(),
        source,
    };

    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir).map_err(write_err)?;
    }
    let tmp_dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };

    let mut tmp = tempfile::NamedTempFile::new_in(tmp_dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(&target).map_err(|e| write_err(e.error))?;

    fs::canonicalize(&target).map_err(write_err)
}
