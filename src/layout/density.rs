//! Density resolution: (profile, active count) → concrete sizing.
//!
//! Fixed profiles are a straight bucket lookup. The universal profile
//! computes its sizing from the live count through two independent
//! breakpoints: the font bucket and the two-column switch. Both key off the
//! same count but are separate functions on purpose, so each can be tuned
//! and tested without disturbing the other.

use super::LayoutProfile;

/// Item count above which the universal profile splits into two columns.
///
/// This is a tuning constant inherited from the source system, not derived
/// from page-capacity math. Callers that need a different split point go
/// through [`universal_two_columns_at`].
pub const UNIVERSAL_TWO_COLUMN_MIN: usize = 20;

/// Item count above which the universal profile drops to the compact font.
const UNIVERSAL_COMPACT_MIN: usize = 20;

/// Concrete sizing parameters handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Density {
    /// Item table font size in points.
    pub font_size: f64,
    /// Vertical padding above and below each row's text, in points.
    pub row_padding: f64,
    /// Extra vertical reserve under the bill-to block. Non-zero only when
    /// the page would otherwise look sparse.
    pub bill_to_spacer: f64,
}

impl LayoutProfile {
    /// Resolve sizing for this profile at the given active count.
    pub fn density(&self, count: usize) -> Density {
        match self {
            LayoutProfile::LargeSingle => Density {
                font_size: 9.5,
                row_padding: if count <= 8 { 7.0 } else { 6.0 },
                bill_to_spacer: sparse_spacer(count),
            },
            LayoutProfile::CondensedSingle => Density {
                font_size: if count <= 22 { 8.5 } else { 8.0 },
                row_padding: if count <= 22 { 4.0 } else { 3.0 },
                bill_to_spacer: 0.0,
            },
            LayoutProfile::TwoColumn => Density {
                font_size: if count <= 40 { 8.0 } else { 7.5 },
                row_padding: if count <= 40 { 2.5 } else { 2.0 },
                bill_to_spacer: 0.0,
            },
            LayoutProfile::Universal => {
                let (font_size, row_padding) = universal_font_bucket(count);
                Density {
                    font_size,
                    row_padding,
                    bill_to_spacer: 0.0,
                }
            }
        }
    }
}

/// Extra space reserved under the bill-to block so short invoices don't
/// float a tiny table in a sea of white.
fn sparse_spacer(count: usize) -> f64 {
    if count <= 10 {
        14.0
    } else {
        0.0
    }
}

/// Universal profile, breakpoint one: font bucket by count.
pub fn universal_font_bucket(count: usize) -> (f64, f64) {
    if count <= UNIVERSAL_COMPACT_MIN {
        (9.5, 6.0)
    } else {
        (7.0, 1.5)
    }
}

/// Universal profile, breakpoint two: the two-column switch.
///
/// Independent of the font bucket even though both read the same count.
pub fn universal_two_columns(count: usize) -> bool {
    universal_two_columns_at(count, UNIVERSAL_TWO_COLUMN_MIN)
}

/// Two-column switch with an explicit threshold, for callers tuning the
/// split point.
pub fn universal_two_columns_at(count: usize, threshold: usize) -> bool {
    count > threshold
}
