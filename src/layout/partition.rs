//! Column partitioning.
//!
//! Splits the ordered active-item sequence into one or two presentation
//! columns without disturbing global order or numbering. The split point is
//! `ceil(n / 2)`, so an odd count leaves the extra item in the first column
//! and the second column's numbering continues where the first left off.

use crate::model::LineItem;

/// A line item paired with its 1-based sequence number.
#[derive(Debug, Clone, Copy)]
pub struct Numbered<'a> {
    pub seq: usize,
    pub item: &'a LineItem,
}

/// One or two ordered columns. `right` is empty in single-column layouts.
#[derive(Debug, Clone)]
pub struct Columns<'a> {
    pub left: Vec<Numbered<'a>>,
    pub right: Vec<Numbered<'a>>,
}

impl<'a> Columns<'a> {
    pub fn is_split(&self) -> bool {
        !self.right.is_empty()
    }

    /// Total item count across both columns.
    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

/// Partition `items` into presentation columns.
///
/// Deterministic for identical input: same items, same flag, same columns.
pub fn partition<'a>(items: &[&'a LineItem], two_columns: bool) -> Columns<'a> {
    let numbered = items
        .iter()
        .enumerate()
        .map(|(i, item)| Numbered { seq: i + 1, item });

    if !two_columns || items.len() < 2 {
        return Columns {
            left: numbered.collect(),
            right: Vec::new(),
        };
    }

    let split = items.len().div_ceil(2);
    let mut left = Vec::with_capacity(split);
    let mut right = Vec::with_capacity(items.len() - split);
    for entry in numbered {
        if entry.seq <= split {
            left.push(entry);
        } else {
            right.push(entry);
        }
    }
    Columns { left, right }
}
