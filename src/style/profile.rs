//! The two export style profiles.
//!
//! Print and file output share one composer; the differences between them
//! are pure data. Keeping them as values (rather than forked render paths)
//! is what keeps the two outputs visually consistent.

use super::Edges;

/// A4 portrait in points (1/72 inch).
pub const A4_WIDTH_PT: f64 = 595.28;
pub const A4_HEIGHT_PT: f64 = 841.89;

/// Pixel-exact content width for file output: A4 at the 96 dpi reference
/// resolution. The file sink composes in these units and scales down to
/// points at assembly time.
pub const FILE_PAGE_WIDTH_PX: f64 = 794.0;

/// Pixel density multiplier for file output. Bitmap content (the logo) is
/// sampled at this factor so the saved file stays legible when zoomed.
pub const FILE_PIXEL_SCALE: f64 = 2.0;

/// Inner padding of the printed sheet, in layout units.
const PAGE_INSET: f64 = 32.0;

/// The fixed page/margin/color rules distinguishing one sink's output from
/// the other's. Data only; consumed by the surface composer.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleProfile {
    /// Page width in layout units (points for print, CSS px for file).
    pub page_width: f64,
    /// Page height in layout units.
    pub page_height: f64,
    /// Outer page margin. Zero for print (the platform dialog adds its
    /// own), a fixed inset for file output.
    pub margin: Edges,
    /// Inner padding between the margin and the content.
    pub inset: Edges,
    /// Force exact colors in the output (print dialogs otherwise strip
    /// backgrounds).
    pub force_color: bool,
    /// A row of the item table must never straddle the bottom page edge;
    /// rows that would are clipped whole.
    pub avoid_row_break: bool,
    /// Fixed gap between the two table columns in a split layout.
    pub column_gap: f64,
    /// Layout units per PDF point. 1.0 when composing directly in points;
    /// px-per-pt for the pixel-exact file profile.
    pub units_per_point: f64,
    /// Bitmap sampling multiplier for embedded images.
    pub pixel_scale: f64,
}

impl StyleProfile {
    /// Interactive print: A4 composed directly in points, zero margin,
    /// forced color.
    pub fn print() -> Self {
        Self {
            page_width: A4_WIDTH_PT,
            page_height: A4_HEIGHT_PT,
            margin: Edges::uniform(0.0),
            inset: Edges::uniform(PAGE_INSET),
            force_color: true,
            avoid_row_break: true,
            column_gap: 24.0,
            units_per_point: 1.0,
            pixel_scale: 1.0,
        }
    }

    /// File capture: A4 composed at the 96 dpi pixel width, fixed inset
    /// margin, double-density bitmaps.
    pub fn file() -> Self {
        let units_per_point = FILE_PAGE_WIDTH_PX / A4_WIDTH_PT;
        Self {
            page_width: FILE_PAGE_WIDTH_PX,
            page_height: A4_HEIGHT_PT * units_per_point,
            margin: Edges::uniform(0.0),
            inset: Edges::uniform(PAGE_INSET * units_per_point),
            force_color: false,
            avoid_row_break: true,
            column_gap: 24.0 * units_per_point,
            units_per_point,
            pixel_scale: FILE_PIXEL_SCALE,
        }
    }

    /// Width left for content after margin and inset.
    pub fn content_width(&self) -> f64 {
        self.page_width - self.margin.horizontal() - self.inset.horizontal()
    }

    /// Height left for content after margin and inset.
    pub fn content_height(&self) -> f64 {
        self.page_height - self.margin.vertical() - self.inset.vertical()
    }
}
