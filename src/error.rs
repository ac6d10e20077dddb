//! Error types for the export sinks.
//!
//! The pure pipeline stages (profile selection, density resolution,
//! partitioning, rendering) are total over valid documents and carry no error
//! channel. Only the two export sinks can fail, and each failure is terminal
//! for that single export attempt.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A surface could not be constructed or was missing at render time.
///
/// Raised before any platform call is made: a failed surface build is a
/// no-op with respect to the print flow and the filesystem.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The composition target does not exist or could not be built.
    #[error("render surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// The style profile asked for a page geometry the composer cannot
    /// satisfy (zero or negative content area after margins).
    #[error("unusable page geometry: {0}")]
    BadGeometry(String),
}

/// A file-capture attempt failed.
///
/// The off-screen surface is torn down regardless of which step failed;
/// the document and layout selection are untouched and the capture returns
/// to a retry-ready state.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// A capture is already running against this document's surface.
    #[error("a file capture for this document is already in flight")]
    InFlight,

    /// Surface composition failed before any output was produced.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Serializing the surface into the output file format failed.
    #[error("file assembly failed: {0}")]
    Assemble(String),

    /// The assembled file could not be written to disk.
    #[error("could not save {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
