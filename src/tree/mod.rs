//! # Rendered Document Tree
//!
//! The renderer's output: a structural tree of blocks, not markup. Every
//! export sink consumes this same tree; the sinks differ only in the style
//! profile they compose it under.
//!
//! The tree is derived data. It is built for one export, owned by the sink
//! that consumes it, and discarded afterwards; nothing holds onto it
//! across export operations.

use crate::layout::{Density, LayoutProfile};
use crate::style::Style;
use serde::{Deserialize, Serialize};

/// A node in the rendered tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub kind: BlockKind,

    #[serde(default)]
    pub style: Style,

    #[serde(default)]
    pub children: Vec<Block>,
}

/// The different kinds of blocks in the rendered tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BlockKind {
    /// A container that stacks its children.
    Stack { direction: Direction },

    /// A text block with string content.
    Text { content: String },

    /// An item table. `start_index` is the sequence number of the first
    /// row, so a second column continues the numbering of the first.
    Table { start_index: usize },

    /// A row inside a Table. Header rows repeat the column captions.
    Row { header: bool },

    /// A cell inside a Row.
    Cell,

    /// A horizontal rule the full width of the parent.
    Rule,

    /// Fixed vertical whitespace.
    Spacer { height: f64 },

    /// An image resolved from a source string (path, data URI, base64).
    Image { src: String, width: f64, height: f64 },
}

/// Stacking direction for container blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Column,
    Row,
}

impl Block {
    /// A vertical container.
    pub fn column(style: Style, children: Vec<Block>) -> Self {
        Self {
            kind: BlockKind::Stack {
                direction: Direction::Column,
            },
            style,
            children,
        }
    }

    /// A horizontal container.
    pub fn row(style: Style, children: Vec<Block>) -> Self {
        Self {
            kind: BlockKind::Stack {
                direction: Direction::Row,
            },
            style,
            children,
        }
    }

    pub fn text(content: impl Into<String>, style: Style) -> Self {
        Self {
            kind: BlockKind::Text {
                content: content.into(),
            },
            style,
            children: vec![],
        }
    }

    pub fn rule(style: Style) -> Self {
        Self {
            kind: BlockKind::Rule,
            style,
            children: vec![],
        }
    }

    pub fn spacer(height: f64) -> Self {
        Self {
            kind: BlockKind::Spacer { height },
            style: Style::default(),
            children: vec![],
        }
    }

    /// Depth-first walk over this block and everything under it.
    pub fn walk(&self) -> impl Iterator<Item = &Block> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            for child in next.children.iter().rev() {
                stack.push(child);
            }
            Some(next)
        })
    }

    /// Text content, if this is a text block.
    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            BlockKind::Text { content } => Some(content.as_str()),
            _ => None,
        }
    }
}

/// The output of the renderer: the tree plus the layout decisions it was
/// built under, so a sink (or a test) can see which policy produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub profile: LayoutProfile,
    pub density: Density,
    pub root: Block,
}

impl RenderedDocument {
    /// All item tables in presentation order.
    pub fn tables(&self) -> Vec<&Block> {
        self.root
            .walk()
            .filter(|b| matches!(b.kind, BlockKind::Table { .. }))
            .collect()
    }

    /// Non-header rows across all tables, in presentation order.
    pub fn item_rows(&self) -> Vec<&Block> {
        self.root
            .walk()
            .filter(|b| matches!(b.kind, BlockKind::Row { header: false }))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_is_depth_first_in_order() {
        let tree = Block::column(
            Style::default(),
            vec![
                Block::text("a", Style::default()),
                Block::row(
                    Style::default(),
                    vec![
                        Block::text("b", Style::default()),
                        Block::text("c", Style::default()),
                    ],
                ),
                Block::text("d", Style::default()),
            ],
        );
        let texts: Vec<&str> = tree.walk().filter_map(Block::text_content).collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_tree_serializes() {
        let tree = Block::column(
            Style::default(),
            vec![Block::spacer(4.0), Block::rule(Style::default())],
        );
        let json = serde_json::to_string(&tree).unwrap();
        let back: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }
}
