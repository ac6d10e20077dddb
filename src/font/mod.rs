//! # Font Management
//!
//! The document sets prose in Helvetica and figures in Courier, both
//! standard PDF fonts, so nothing is ever embedded. This module maps the
//! style system's (family, weight, italic) triple onto a concrete standard
//! font and answers text-measurement queries for the composer.

pub mod metrics;

pub use metrics::StandardFontMetrics;

use crate::style::FontFamily;

/// The standard PDF fonts the pipeline can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    Courier,
    CourierBold,
    CourierOblique,
}

impl StandardFont {
    /// The PDF BaseFont name.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
            Self::CourierOblique => "Courier-Oblique",
        }
    }

    pub fn metrics(&self) -> StandardFontMetrics {
        match self {
            Self::Helvetica | Self::HelveticaOblique => metrics::HELVETICA,
            Self::HelveticaBold | Self::HelveticaBoldOblique => metrics::HELVETICA_BOLD,
            Self::Courier | Self::CourierBold | Self::CourierOblique => metrics::COURIER,
        }
    }
}

/// Measurement context shared by the composer and the PDF serializer.
pub struct FontContext;

impl Default for FontContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FontContext {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a style triple to a concrete font. Weights ≥ 600 snap to
    /// bold; Courier has no bold-oblique in our set, oblique wins.
    pub fn resolve(&self, family: FontFamily, weight: u32, italic: bool) -> StandardFont {
        let bold = weight >= 600;
        match (family, bold, italic) {
            (FontFamily::Sans, false, false) => StandardFont::Helvetica,
            (FontFamily::Sans, true, false) => StandardFont::HelveticaBold,
            (FontFamily::Sans, false, true) => StandardFont::HelveticaOblique,
            (FontFamily::Sans, true, true) => StandardFont::HelveticaBoldOblique,
            (FontFamily::Mono, _, true) => StandardFont::CourierOblique,
            (FontFamily::Mono, true, false) => StandardFont::CourierBold,
            (FontFamily::Mono, false, false) => StandardFont::Courier,
        }
    }

    /// Width of a string in points for the given style triple.
    pub fn measure_string(
        &self,
        text: &str,
        family: FontFamily,
        weight: u32,
        italic: bool,
        font_size: f64,
        letter_spacing: f64,
    ) -> f64 {
        self.resolve(family, weight, italic)
            .metrics()
            .measure_string(text, font_size, letter_spacing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_snaps_weight() {
        let ctx = FontContext::new();
        assert_eq!(
            ctx.resolve(FontFamily::Sans, 700, false),
            StandardFont::HelveticaBold
        );
        assert_eq!(
            ctx.resolve(FontFamily::Sans, 650, false),
            StandardFont::HelveticaBold
        );
        assert_eq!(
            ctx.resolve(FontFamily::Sans, 400, false),
            StandardFont::Helvetica
        );
    }

    #[test]
    fn test_mono_resolves_to_courier() {
        let ctx = FontContext::new();
        assert_eq!(
            ctx.resolve(FontFamily::Mono, 700, false),
            StandardFont::CourierBold
        );
    }

    #[test]
    fn test_measure_bold_wider_than_regular() {
        let ctx = FontContext::new();
        let regular = ctx.measure_string("TOTAL", FontFamily::Sans, 400, false, 9.5, 0.0);
        let bold = ctx.measure_string("TOTAL", FontFamily::Sans, 700, false, 9.5, 0.0);
        assert!(bold > regular);
    }
}
