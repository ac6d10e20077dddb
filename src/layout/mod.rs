//! # Adaptive Layout Policy
//!
//! Everything here is a pure function of the active item count. The pipeline
//! deliberately targets a single fixed page: instead of flowing overflow onto
//! a second sheet, it degrades font size and row height and, past a point,
//! splits the item table into two columns. The decision chain is
//!
//! ```text
//! active count ──► LayoutProfile ──► Density (font, row padding, spacer)
//!                        │
//!                        └─────────► one column / two columns
//! ```
//!
//! Profile selection can be overridden by the caller at any time before
//! rendering; overriding never touches the document itself.

pub mod density;
pub mod partition;

pub use density::{Density, UNIVERSAL_TWO_COLUMN_MIN};
pub use partition::{partition, Columns, Numbered};

use serde::{Deserialize, Serialize};

/// Largest count the roomy single-column profile accepts.
pub const LARGE_SINGLE_MAX: usize = 15;
/// Largest count the condensed single-column profile accepts.
pub const CONDENSED_SINGLE_MAX: usize = 30;
/// Largest count the fixed two-column profile accepts; everything above
/// falls through to [`LayoutProfile::Universal`].
pub const TWO_COLUMN_MAX: usize = 50;

/// A named presentation mode: column count plus a density-by-count mapping.
///
/// The set is closed and the selector below is total over every
/// non-negative count, so there is no error channel anywhere in selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutProfile {
    /// Up to [`LARGE_SINGLE_MAX`] items: one column, generous type.
    LargeSingle,
    /// Up to [`CONDENSED_SINGLE_MAX`] items: one column, tightened rows.
    CondensedSingle,
    /// Up to [`TWO_COLUMN_MAX`] items: fixed two-column split.
    TwoColumn,
    /// Open-ended: computes its own font bucket and two-column switch from
    /// the live count instead of a fixed table.
    Universal,
}

impl LayoutProfile {
    /// Select a profile from the active item count.
    ///
    /// A count of 0 is valid and yields the roomiest profile; the renderer
    /// fills the empty table with a placeholder row.
    pub fn for_count(count: usize) -> Self {
        if count <= LARGE_SINGLE_MAX {
            LayoutProfile::LargeSingle
        } else if count <= CONDENSED_SINGLE_MAX {
            LayoutProfile::CondensedSingle
        } else if count <= TWO_COLUMN_MAX {
            LayoutProfile::TwoColumn
        } else {
            LayoutProfile::Universal
        }
    }

    /// Whether this profile lays the item table out in two columns for the
    /// given count. Fixed profiles answer from their definition; the
    /// universal profile answers from its own threshold.
    pub fn two_columns(&self, count: usize) -> bool {
        match self {
            LayoutProfile::LargeSingle | LayoutProfile::CondensedSingle => false,
            LayoutProfile::TwoColumn => true,
            LayoutProfile::Universal => density::universal_two_columns(count),
        }
    }

    /// Parse a profile name as given on the CLI.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "large-single" => Some(LayoutProfile::LargeSingle),
            "condensed-single" => Some(LayoutProfile::CondensedSingle),
            "two-column" => Some(LayoutProfile::TwoColumn),
            "universal" => Some(LayoutProfile::Universal),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayoutProfile::LargeSingle => "large-single",
            LayoutProfile::CondensedSingle => "condensed-single",
            LayoutProfile::TwoColumn => "two-column",
            LayoutProfile::Universal => "universal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_thresholds() {
        assert_eq!(LayoutProfile::for_count(0), LayoutProfile::LargeSingle);
        assert_eq!(LayoutProfile::for_count(15), LayoutProfile::LargeSingle);
        assert_eq!(LayoutProfile::for_count(16), LayoutProfile::CondensedSingle);
        assert_eq!(LayoutProfile::for_count(30), LayoutProfile::CondensedSingle);
        assert_eq!(LayoutProfile::for_count(31), LayoutProfile::TwoColumn);
        assert_eq!(LayoutProfile::for_count(50), LayoutProfile::TwoColumn);
        assert_eq!(LayoutProfile::for_count(51), LayoutProfile::Universal);
        assert_eq!(LayoutProfile::for_count(500), LayoutProfile::Universal);
    }

    #[test]
    fn test_selector_is_total_and_monotonic() {
        // Density tier (by profile order) never decreases as the count grows.
        fn tier(p: LayoutProfile) -> u8 {
            match p {
                LayoutProfile::LargeSingle => 0,
                LayoutProfile::CondensedSingle => 1,
                LayoutProfile::TwoColumn => 2,
                LayoutProfile::Universal => 3,
            }
        }
        let mut last = 0;
        for n in 0..200 {
            let t = tier(LayoutProfile::for_count(n));
            assert!(t >= last, "tier regressed at count {}", n);
            last = t;
        }
    }

    #[test]
    fn test_two_column_activation() {
        assert!(!LayoutProfile::LargeSingle.two_columns(10));
        assert!(!LayoutProfile::CondensedSingle.two_columns(30));
        assert!(LayoutProfile::TwoColumn.two_columns(35));
        assert!(!LayoutProfile::Universal.two_columns(20));
        assert!(LayoutProfile::Universal.two_columns(21));
        assert!(LayoutProfile::Universal.two_columns(60));
    }

    #[test]
    fn test_profile_names_round_trip() {
        for p in [
            LayoutProfile::LargeSingle,
            LayoutProfile::CondensedSingle,
            LayoutProfile::TwoColumn,
            LayoutProfile::Universal,
        ] {
            assert_eq!(LayoutProfile::parse(p.name()), Some(p));
        }
        assert_eq!(LayoutProfile::parse("three-column"), None);
    }
}
