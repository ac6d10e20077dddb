//! # Export Sinks
//!
//! The two ways a rendered document leaves the pipeline: the interactive
//! print flow and the downloadable file. Both consume the same composed
//! surface; they differ in the style profile they compose under and in
//! what happens to the result.
//!
//! Failure is per-attempt and terminal: neither sink retries, and a failed
//! file capture leaves the document and layout selection exactly as they
//! were so the caller can retry or fall back to print.

pub mod capture;
pub mod print;

pub use capture::{CaptureState, FileAssembler, FileCapture, PdfAssembler, SavedFile};
pub use print::{print_document, PrintSpooler};

use crate::model::{BusinessConfig, Document, DocumentKind};

/// The identity strings an export needs from the document: file naming and
/// the output file's information dictionary.
#[derive(Debug, Clone)]
pub struct ExportMeta {
    pub kind: DocumentKind,
    pub number: String,
    pub party_name: String,
    pub issuer: String,
}

impl ExportMeta {
    pub fn for_document(doc: &Document, config: &BusinessConfig) -> Self {
        Self {
            kind: doc.kind,
            number: doc.number.clone(),
            party_name: doc.party.name.clone(),
            issuer: config.name.clone(),
        }
    }

    /// Deterministic export file name:
    /// `<prefix>_<party-name-normalized>_<number>.<ext>`.
    pub fn file_name(&self, ext: &str) -> String {
        format!(
            "{}_{}_{}.{}",
            self.kind.file_prefix(),
            normalize_component(&self.party_name),
            normalize_component(&self.number),
            ext
        )
    }
}

/// Collapse every whitespace run to a single `_` so the name is safe on
/// any filesystem a download lands on.
fn normalize_component(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join("_")
}
