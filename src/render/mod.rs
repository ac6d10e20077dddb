//! # Document Renderer
//!
//! Pure composition: (document, profile, density, columns) → rendered tree.
//! The renderer decides *what* appears where (header, parties, item
//! tables, totals, footer) and tags every block with its style. It never
//! touches an export sink, never recomputes the grand total, and holds no
//! state beyond the business configuration it was built with.
//!
//! Zero-quantity items are filtered here one more time even though
//! `Document::active_items` already excludes them; a caller handing us an
//! unfiltered item slice still gets a clean table.

use crate::layout::{partition, Columns, Density, LayoutProfile, Numbered};
use crate::model::{BusinessConfig, Document, DocumentKind, LineItem};
use crate::style::{palette, Color, Edges, FontFamily, Style, TextAlign};
use crate::tree::{Block, BlockKind, RenderedDocument};

/// Relative column widths of the item table: seq, name, qty, price, total.
/// Fixed by the style contract; they never reflow.
const TABLE_COLUMNS: [f64; 5] = [0.07, 0.44, 0.12, 0.17, 0.20];

/// Hairline between item rows.
const ROW_RULE: Color = Color {
    r: 0.94,
    g: 0.95,
    b: 0.96,
};

pub struct Renderer {
    config: BusinessConfig,
}

impl Renderer {
    pub fn new(config: BusinessConfig) -> Self {
        Self { config }
    }

    /// Render under an already-selected profile, deriving density and the
    /// column split from the active count.
    pub fn render(&self, doc: &Document, profile: LayoutProfile) -> RenderedDocument {
        let active: Vec<&LineItem> = doc.active_items().collect();
        let density = profile.density(active.len());
        let columns = partition(&active, profile.two_columns(active.len()));
        self.render_with(doc, profile, density, &columns)
    }

    /// The full contract: every layout decision is already made, this just
    /// builds the tree.
    pub fn render_with(
        &self,
        doc: &Document,
        profile: LayoutProfile,
        density: Density,
        columns: &Columns<'_>,
    ) -> RenderedDocument {
        let mut children = vec![self.header(doc), self.parties(doc)];
        if density.bill_to_spacer > 0.0 {
            children.push(Block::spacer(density.bill_to_spacer));
        }
        children.push(self.item_tables(columns, density));
        children.push(self.totals(doc));
        children.push(self.footer());

        RenderedDocument {
            profile,
            density,
            root: Block::column(Style::default(), children),
        }
    }

    // ── Header: issuer identity vs. date + number ───────────────

    fn header(&self, doc: &Document) -> Block {
        let mut identity = Vec::new();
        if let Some(src) = &self.config.logo {
            identity.push(Block {
                kind: BlockKind::Image {
                    src: src.clone(),
                    width: 36.0,
                    height: 36.0,
                },
                style: Style {
                    width: Some(0.12),
                    margin: Some(Edges {
                        right: 10.0,
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                children: vec![],
            });
        }
        let identity_width = if identity.is_empty() { 1.0 } else { 0.88 };
        identity.push(Block::column(
            Style {
                width: Some(identity_width),
                ..Default::default()
            },
            vec![
                Block::text(
                    &self.config.name,
                    Style::text(13.0, 700, palette::INK).with_uppercase(),
                ),
                Block::text(
                    format!("Phone: {}", self.config.phone),
                    Style {
                        margin: Some(Edges::top(3.0)),
                        ..Style::text(9.0, 600, palette::MUTED)
                    },
                ),
            ],
        ));

        let issued = Block::column(
            Style {
                width: Some(0.45),
                ..Default::default()
            },
            vec![
                label("Date Issued", TextAlign::Right),
                Block::text(
                    doc.issued_on.format("%m/%d/%Y").to_string(),
                    Style::text(9.0, 700, palette::INK).with_align(TextAlign::Right),
                ),
            ],
        );
        let number_box = Block::column(
            Style {
                width: Some(0.55),
                padding: Some(Edges::symmetric(5.0, 8.0)),
                background_color: Some(palette::PANEL),
                border_width: Some(Edges::uniform(0.5)),
                border_color: Some(palette::FAINT),
                ..Default::default()
            },
            vec![
                label(doc.kind.heading(), TextAlign::Center),
                Block::text(
                    &doc.number,
                    Style::text(10.0, 700, palette::INK)
                        .with_family(FontFamily::Mono)
                        .with_align(TextAlign::Center),
                ),
            ],
        );

        Block::row(
            Style {
                padding: Some(Edges::bottom(10.0)),
                border_width: Some(Edges::bottom(2.0)),
                border_color: Some(palette::INK),
                margin: Some(Edges::bottom(12.0)),
                ..Default::default()
            },
            vec![
                Block::row(
                    Style {
                        width: Some(0.62),
                        ..Default::default()
                    },
                    identity,
                ),
                Block::row(
                    Style {
                        width: Some(0.38),
                        ..Default::default()
                    },
                    vec![issued, number_box],
                ),
            ],
        )
    }

    // ── Bill-to vs. terms ───────────────────────────────────────

    fn parties(&self, doc: &Document) -> Block {
        let bill_to = Block::column(
            Style {
                width: Some(0.62),
                ..Default::default()
            },
            vec![
                Block::text(
                    "Bill To",
                    Style {
                        letter_spacing: Some(1.0),
                        margin: Some(Edges::bottom(4.0)),
                        ..Style::text(8.0, 700, palette::INK).with_uppercase()
                    },
                ),
                Block::text(
                    &doc.party.name,
                    Style::text(11.0, 700, palette::INK).with_uppercase(),
                ),
                Block::text(
                    &doc.party.address,
                    Style {
                        margin: Some(Edges::top(2.0)),
                        ..Style::text(8.5, 400, palette::MUTED)
                    },
                ),
            ],
        );

        // Proposal notes carry no payment terms; the right side stays blank.
        let terms = match doc.kind {
            DocumentKind::Invoice => Block::text(
                format!("Terms: {}", self.config.terms),
                Style {
                    margin: Some(Edges::top(18.0)),
                    ..Style::text(7.5, 700, palette::MUTED)
                        .with_uppercase()
                        .with_align(TextAlign::Right)
                },
            ),
            DocumentKind::ProposalNote => Block::column(Style::default(), vec![]),
        };

        Block::row(
            Style {
                margin: Some(Edges::bottom(12.0)),
                ..Default::default()
            },
            vec![
                bill_to,
                Block::column(
                    Style {
                        width: Some(0.38),
                        ..Default::default()
                    },
                    vec![terms],
                ),
            ],
        )
    }

    // ── Item tables ─────────────────────────────────────────────

    fn item_tables(&self, columns: &Columns<'_>, density: Density) -> Block {
        if columns.is_empty() {
            return self.table(&[], 1, density);
        }
        if !columns.is_split() {
            return self.table(&columns.left, 1, density);
        }
        let continue_at = columns.left.len() + 1;
        Block::row(
            Style::default(),
            vec![
                self.table(&columns.left, 1, density),
                self.table(&columns.right, continue_at, density),
            ],
        )
    }

    fn table(&self, entries: &[Numbered<'_>], start_index: usize, density: Density) -> Block {
        let mut rows = vec![self.caption_row()];
        if entries.is_empty() {
            rows.push(self.empty_row());
        } else {
            for entry in entries {
                rows.push(self.item_row(entry, density));
            }
        }
        Block {
            kind: BlockKind::Table { start_index },
            style: Style::default(),
            children: rows,
        }
    }

    fn caption_row(&self) -> Block {
        let caption = |text: &str, width: f64, align: TextAlign| {
            cell(
                width,
                Block::text(
                    text,
                    Style {
                        letter_spacing: Some(1.2),
                        ..Style::text(7.0, 700, palette::FAINT)
                            .with_uppercase()
                            .with_align(align)
                    },
                ),
            )
        };
        Block {
            kind: BlockKind::Row { header: true },
            style: Style {
                padding: Some(Edges::symmetric(4.0, 0.0)),
                border_width: Some(Edges::bottom(1.5)),
                border_color: Some(palette::INK),
                ..Default::default()
            },
            children: vec![
                caption("#", TABLE_COLUMNS[0], TextAlign::Left),
                caption("Item Description", TABLE_COLUMNS[1], TextAlign::Left),
                caption("Qty", TABLE_COLUMNS[2], TextAlign::Center),
                caption("Price", TABLE_COLUMNS[3], TextAlign::Right),
                caption("Total", TABLE_COLUMNS[4], TextAlign::Right),
            ],
        }
    }

    fn item_row(&self, entry: &Numbered<'_>, density: Density) -> Block {
        let item = entry.item;
        let size = density.font_size;
        let figures = |text: String, width: f64, weight: u32, color: Color, align: TextAlign| {
            cell(
                width,
                Block::text(
                    text,
                    Style::text(size, weight, color)
                        .with_family(FontFamily::Mono)
                        .with_align(align),
                ),
            )
        };
        Block {
            kind: BlockKind::Row { header: false },
            style: Style {
                padding: Some(Edges::symmetric(density.row_padding, 0.0)),
                border_width: Some(Edges::bottom(0.5)),
                border_color: Some(ROW_RULE),
                ..Default::default()
            },
            children: vec![
                figures(
                    entry.seq.to_string(),
                    TABLE_COLUMNS[0],
                    400,
                    palette::FAINT,
                    TextAlign::Left,
                ),
                cell(
                    TABLE_COLUMNS[1],
                    Block::text(
                        &item.name,
                        Style::text(size, 700, palette::INK).with_uppercase(),
                    ),
                ),
                figures(
                    format_quantity(item.quantity),
                    TABLE_COLUMNS[2],
                    700,
                    palette::MUTED,
                    TextAlign::Center,
                ),
                figures(
                    format_currency(item.unit_price),
                    TABLE_COLUMNS[3],
                    400,
                    palette::MUTED,
                    TextAlign::Right,
                ),
                figures(
                    format_currency(item.total),
                    TABLE_COLUMNS[4],
                    700,
                    palette::INK,
                    TextAlign::Right,
                ),
            ],
        }
    }

    /// Placeholder row so an empty document still shows a table body.
    fn empty_row(&self) -> Block {
        Block {
            kind: BlockKind::Row { header: false },
            style: Style {
                padding: Some(Edges::symmetric(14.0, 0.0)),
                ..Default::default()
            },
            children: vec![cell(
                1.0,
                Block::text(
                    "No items on this document",
                    Style {
                        italic: Some(true),
                        ..Style::text(8.0, 700, palette::FAINT)
                            .with_uppercase()
                            .with_align(TextAlign::Center)
                    },
                ),
            )],
        }
    }

    // ── Totals and footer ───────────────────────────────────────

    fn totals(&self, doc: &Document) -> Block {
        let conditions = Block::column(
            Style {
                width: Some(0.58),
                ..Default::default()
            },
            vec![
                Block::text(
                    "Conditions of Sale:",
                    Style {
                        italic: Some(true),
                        margin: Some(Edges::bottom(3.0)),
                        ..Style::text(7.0, 700, palette::INK)
                    },
                ),
                Block::text(
                    &self.config.conditions,
                    Style::text(7.0, 700, palette::FAINT).with_uppercase(),
                ),
            ],
        );

        // The figure comes straight off the document; the renderer never
        // re-adds the rows.
        let amount = Block::column(
            Style {
                width: Some(0.42),
                ..Default::default()
            },
            vec![
                Block::text(
                    "Grand Total Amount",
                    Style {
                        letter_spacing: Some(1.6),
                        margin: Some(Edges::bottom(5.0)),
                        ..Style::text(8.0, 700, palette::FAINT)
                            .with_uppercase()
                            .with_align(TextAlign::Right)
                    },
                ),
                Block::column(
                    Style {
                        padding: Some(Edges::symmetric(9.0, 18.0)),
                        background_color: Some(palette::INK),
                        ..Default::default()
                    },
                    vec![Block::text(
                        format_currency(doc.grand_total),
                        Style::text(22.0, 700, Color::WHITE)
                            .with_family(FontFamily::Mono)
                            .with_align(TextAlign::Right),
                    )],
                ),
            ],
        );

        Block::row(
            Style {
                margin: Some(Edges::top(10.0)),
                padding: Some(Edges::top(10.0)),
                border_width: Some(Edges::top(3.0)),
                border_color: Some(palette::INK),
                ..Default::default()
            },
            vec![conditions, amount],
        )
    }

    fn footer(&self) -> Block {
        Block::row(
            Style {
                margin: Some(Edges::top(18.0)),
                padding: Some(Edges::top(6.0)),
                border_width: Some(Edges::top(0.5)),
                border_color: Some(ROW_RULE),
                ..Default::default()
            },
            vec![
                cell(
                    0.6,
                    Block::text(
                        &self.config.footer_line,
                        Style {
                            letter_spacing: Some(3.0),
                            ..Style::text(6.5, 700, palette::FAINT).with_uppercase()
                        },
                    ),
                ),
                cell(
                    0.4,
                    Block::text(
                        format!("For Re-orders: {}", self.config.reorder_phone),
                        Style {
                            italic: Some(true),
                            ..Style::text(6.0, 700, palette::FAINT).with_align(TextAlign::Right)
                        },
                    ),
                ),
            ],
        )
    }
}

fn cell(width: f64, child: Block) -> Block {
    Block {
        kind: BlockKind::Cell,
        style: Style {
            width: Some(width),
            ..Default::default()
        },
        children: vec![child],
    }
}

fn label(text: &str, align: TextAlign) -> Block {
    Block::text(
        text,
        Style {
            letter_spacing: Some(0.8),
            margin: Some(Edges::bottom(2.0)),
            ..Style::text(6.5, 700, palette::FAINT)
                .with_uppercase()
                .with_align(align)
        },
    )
}

/// US-style currency display: `$1,234.56`. Display formatting only; the
/// amounts themselves are computed upstream.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let (sign, cents) = if cents < 0 { ("-", -cents) } else { ("", cents) };
    let dollars = cents / 100;
    let rem = cents % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{rem:02}")
}

/// Quantities print without trailing zeros: `3`, `2.5`, `0.25`.
pub fn format_quantity(quantity: f64) -> String {
    let s = format!("{quantity:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(7.5), "$7.50");
        assert_eq!(format_currency(1234.56), "$1,234.56");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
    }

    #[test]
    fn test_format_quantity_trims_zeros() {
        assert_eq!(format_quantity(3.0), "3");
        assert_eq!(format_quantity(2.5), "2.5");
        assert_eq!(format_quantity(0.25), "0.25");
    }
}
