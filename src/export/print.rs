//! Interactive print sink.
//!
//! Composes the self-contained print surface and hands it to the platform
//! print flow. Fire-and-forget: once the spooler has the surface, print
//! completion is outside the pipeline's control and nothing is reported
//! back. The one failure this sink owns is the surface itself: if it
//! cannot be built, the operation is a no-op and the spooler is never
//! touched.

use crate::error::RenderError;
use crate::font::FontContext;
use crate::style::StyleProfile;
use crate::surface::{self, Surface};
use crate::tree::RenderedDocument;

/// The platform's synchronous print/preview flow. The surface handed over
/// is owned by the spooler from that point on; the pipeline keeps nothing.
pub trait PrintSpooler {
    fn submit(&mut self, surface: Surface);
}

/// Compose `rendered` under the print style profile and trigger the
/// platform print flow.
///
/// Returns without calling the spooler when the surface cannot be
/// constructed; there is no partial invocation.
pub fn print_document(
    rendered: &RenderedDocument,
    profile: &StyleProfile,
    fonts: &FontContext,
    spooler: &mut dyn PrintSpooler,
) -> Result<(), RenderError> {
    let surface = surface::compose(rendered, profile, fonts)?;
    if surface.elements.is_empty() {
        return Err(RenderError::SurfaceUnavailable(
            "composed print surface has no content".to_string(),
        ));
    }
    spooler.submit(surface);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutProfile;
    use crate::model::{BusinessConfig, Document, DocumentKind, LineItem, Party};
    use crate::render::Renderer;
    use crate::style::Edges;
    use chrono::NaiveDate;

    #[derive(Default)]
    struct RecordingSpooler {
        submitted: Vec<Surface>,
    }

    impl PrintSpooler for RecordingSpooler {
        fn submit(&mut self, surface: Surface) {
            self.submitted.push(surface);
        }
    }

    fn rendered() -> RenderedDocument {
        let doc = Document::new(
            DocumentKind::Invoice,
            "100481",
            Party {
                name: "Green Villa Market".into(),
                address: "88 Atlantic Ave, Brooklyn NY".into(),
            },
            NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
            vec![LineItem::new("p-1", "Okra-Indian", 3.0, 2.25)],
        );
        Renderer::new(BusinessConfig::default()).render(&doc, LayoutProfile::LargeSingle)
    }

    #[test]
    fn test_print_submits_forced_color_surface() {
        let mut spooler = RecordingSpooler::default();
        print_document(
            &rendered(),
            &StyleProfile::print(),
            &FontContext::new(),
            &mut spooler,
        )
        .unwrap();
        assert_eq!(spooler.submitted.len(), 1);
        assert!(spooler.submitted[0].force_color);
        assert!(!spooler.submitted[0].elements.is_empty());
    }

    #[test]
    fn test_failed_surface_never_reaches_spooler() {
        let mut spooler = RecordingSpooler::default();
        let mut profile = StyleProfile::print();
        profile.margin = Edges::uniform(1000.0);
        let err = print_document(&rendered(), &profile, &FontContext::new(), &mut spooler);
        assert!(err.is_err());
        assert!(spooler.submitted.is_empty());
    }
}
