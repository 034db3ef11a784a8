//! # cert-forge – certificate PDF generator
//!
//! Renders a one-page certificate: a background template image overlaid with
//! the recipient's name, a registration number and a QR code linking to a
//! verification URL. The pipeline stages are:
//!
//! 1. **Configure** – resolve a [`RenderConfig`] from the environment ([`config`])
//! 2. **Size** – template pixels at a DPI → landscape page in mm ([`units`])
//! 3. **Lay out** – text and image placements ([`layout`], [`layout_config`])
//! 4. **QR** – encode and recolour the verification code ([`qr`])
//! 5. **Render** – emit PDF bytes via printpdf ([`render`])
//! 6. **Write** – sanitised filename, atomic write ([`sanitize`], [`pipeline`])

pub mod config;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod layout_config;
pub mod pipeline;
pub mod qr;
pub mod render;
pub mod sanitize;
pub mod units;

// Re-exports for convenience
pub use config::RenderConfig;
pub use error::{CertError, Result};
pub use pipeline::{compute_layout, generate, CertificateRequest};
