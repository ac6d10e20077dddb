//! File capture sink.
//!
//! Renders the document off-screen and produces a downloadable PDF:
//!
//! 1. construct the hidden off-screen surface,
//! 2. populate it by composing the styled tree,
//! 3. serialize it into the output file at the target page size,
//! 4. write the file,
//! 5. tear the surface down, on every path, success or failure.
//!
//! Teardown is the `Drop` of [`OffscreenSurface`], so no exit from the
//! capture can skip it. At most one capture may be in flight per document;
//! the state machine below rejects a second attempt until the first one
//! settles.

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{CaptureError, RenderError};
use crate::font::FontContext;
use crate::pdf::{PdfInfo, PdfWriter};
use crate::style::StyleProfile;
use crate::surface::{self, Surface};
use crate::tree::RenderedDocument;

use super::ExportMeta;

/// Lifecycle of one export attempt. `Failed` and `Saved` are terminal for
/// the attempt but not for the capture; a new attempt may start from
/// either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Capturing,
    Saved,
    Failed,
}

/// Serializes a composed surface into the bytes of the output file.
///
/// The production assembler writes a PDF; tests substitute failing or
/// reentrant assemblers to exercise the capture's failure paths.
pub trait FileAssembler {
    fn assemble(
        &self,
        surface: &Surface,
        fonts: &FontContext,
        meta: &ExportMeta,
    ) -> Result<Vec<u8>, CaptureError>;
}

/// The default assembler: one A4 PDF page.
pub struct PdfAssembler;

impl FileAssembler for PdfAssembler {
    fn assemble(
        &self,
        surface: &Surface,
        _fonts: &FontContext,
        meta: &ExportMeta,
    ) -> Result<Vec<u8>, CaptureError> {
        let info = PdfInfo {
            title: Some(format!("{} {}", meta.kind.file_prefix(), meta.number)),
            author: Some(meta.issuer.clone()),
        };
        Ok(PdfWriter::new().write(surface, &info))
    }
}

/// The hidden surface an export owns for its lifetime. Dropping it is the
/// teardown step; the shared flag lets the owning capture (and tests)
/// observe that it is gone.
struct OffscreenSurface {
    surface: Surface,
    live: Rc<Cell<bool>>,
}

impl OffscreenSurface {
    fn new(surface: Surface, live: Rc<Cell<bool>>) -> Self {
        live.set(true);
        Self { surface, live }
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }
}

impl Drop for OffscreenSurface {
    fn drop(&mut self) {
        self.live.set(false);
        log::debug!("off-screen capture surface torn down");
    }
}

/// A saved export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub path: PathBuf,
    pub bytes: usize,
}

/// Per-document file export driver.
///
/// Interior mutability keeps the API `&self`: UI hosts hold shared handles
/// to the capture while it is in flight, and the in-flight guard has to
/// hold even if a callback re-enters the pipeline.
pub struct FileCapture {
    out_dir: PathBuf,
    state: Cell<CaptureState>,
    surface_live: Rc<Cell<bool>>,
}

impl FileCapture {
    pub fn new(out_dir: impl AsRef<Path>) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
            state: Cell::new(CaptureState::Idle),
            surface_live: Rc::new(Cell::new(false)),
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state.get()
    }

    /// Whether the caller should present as "exporting".
    pub fn in_flight(&self) -> bool {
        self.state.get() == CaptureState::Capturing
    }

    /// Whether the off-screen surface currently exists.
    pub fn surface_active(&self) -> bool {
        self.surface_live.get()
    }

    /// Run one capture attempt with the default PDF assembler.
    pub fn capture(
        &self,
        rendered: &RenderedDocument,
        profile: &StyleProfile,
        fonts: &FontContext,
        meta: &ExportMeta,
    ) -> Result<SavedFile, CaptureError> {
        self.capture_with(&PdfAssembler, rendered, profile, fonts, meta)
    }

    /// Run one capture attempt with an explicit assembler.
    pub fn capture_with(
        &self,
        assembler: &dyn FileAssembler,
        rendered: &RenderedDocument,
        profile: &StyleProfile,
        fonts: &FontContext,
        meta: &ExportMeta,
    ) -> Result<SavedFile, CaptureError> {
        if self.in_flight() {
            return Err(CaptureError::InFlight);
        }
        self.state.set(CaptureState::Capturing);

        let result = self.run(assembler, rendered, profile, fonts, meta);

        // Teardown has already run by this point (the off-screen guard
        // drops inside `run`), so the caller observes settle-after-release.
        self.state.set(match result {
            Ok(_) => CaptureState::Saved,
            Err(_) => CaptureState::Failed,
        });
        result
    }

    fn run(
        &self,
        assembler: &dyn FileAssembler,
        rendered: &RenderedDocument,
        profile: &StyleProfile,
        fonts: &FontContext,
        meta: &ExportMeta,
    ) -> Result<SavedFile, CaptureError> {
        let surface = surface::compose(rendered, profile, fonts)?;
        if surface.elements.is_empty() {
            return Err(CaptureError::Render(RenderError::SurfaceUnavailable(
                "composed capture surface has no content".to_string(),
            )));
        }

        let offscreen = OffscreenSurface::new(surface, Rc::clone(&self.surface_live));

        let bytes = assembler.assemble(offscreen.surface(), fonts, meta)?;

        let path = self.out_dir.join(meta.file_name("pdf"));
        fs::write(&path, &bytes).map_err(|e| CaptureError::Save {
            path: path.clone(),
            source: e,
        })?;
        log::info!("saved {} ({} bytes)", path.display(), bytes.len());

        Ok(SavedFile {
            path,
            bytes: bytes.len(),
        })
    }
}
