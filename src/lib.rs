//! # Platen
//!
//! Adaptive single-page document layout and export for business paperwork:
//! itemized invoices and product-proposal notes.
//!
//! Most document generators flow overflow onto more pages. An order sheet
//! handed to a driver does the opposite: **the page count is fixed at one,
//! and density adapts.** More line items mean a smaller font, tighter rows,
//! and eventually a two-column table, never a second sheet. The layout
//! policy that makes those calls is a chain of pure functions over one
//! number, the active item count, so identical orders always produce
//! identical paper.
//!
//! ## Architecture
//!
//! ```text
//! Input (Document + optional profile override)
//!       ↓
//!   [layout]   — profile selection, density, column partitioning
//!       ↓
//!   [render]   — build the block tree (header, parties, tables, totals)
//!       ↓
//!   [surface]  — compose one fixed page under a style profile
//!       ↓
//!   [export]   — print spooler (fire-and-forget) or file capture (PDF)
//! ```
//!
//! Everything above the export sinks is side-effect free; the sinks own
//! the only failure channels.

pub mod error;
pub mod export;
pub mod font;
pub mod image_loader;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod render;
pub mod style;
pub mod surface;
pub mod tree;

pub use error::{CaptureError, RenderError};
pub use export::{
    print_document, CaptureState, ExportMeta, FileCapture, PrintSpooler, SavedFile,
};
pub use layout::LayoutProfile;
pub use model::{BusinessConfig, Document, DocumentKind, LineItem, Party};
pub use render::Renderer;
pub use style::StyleProfile;
pub use tree::RenderedDocument;

use font::FontContext;

/// Run the pure half of the pipeline: select a profile (unless the caller
/// overrides it), resolve density, partition, and render the block tree.
///
/// This is the primary entry point. The document is only read; overriding
/// the profile never mutates it.
pub fn compose(
    config: &BusinessConfig,
    doc: &Document,
    override_profile: Option<LayoutProfile>,
) -> RenderedDocument {
    let profile =
        override_profile.unwrap_or_else(|| LayoutProfile::for_count(doc.active_count()));
    Renderer::new(config.clone()).render(doc, profile)
}

/// Compose a document described as JSON.
pub fn compose_json(
    config: &BusinessConfig,
    json: &str,
    override_profile: Option<LayoutProfile>,
) -> Result<RenderedDocument, serde_json::Error> {
    let doc: Document = serde_json::from_str(json)?;
    Ok(compose(config, &doc.normalized(), override_profile))
}

/// One-shot convenience: compose and run a file capture into `out_dir`.
pub fn export_pdf(
    config: &BusinessConfig,
    doc: &Document,
    override_profile: Option<LayoutProfile>,
    out_dir: impl AsRef<std::path::Path>,
) -> Result<SavedFile, CaptureError> {
    let rendered = compose(config, doc, override_profile);
    let capture = FileCapture::new(out_dir);
    capture.capture(
        &rendered,
        &StyleProfile::file(),
        &FontContext::new(),
        &ExportMeta::for_document(doc, config),
    )
}
