//! # Document Model
//!
//! The input representation for the layout pipeline. A document is a flat,
//! ordered list of line items plus the party being billed and a little
//! metadata. This is designed to be easily produced by an order-entry UI or
//! direct JSON construction.
//!
//! The model is read-only from the pipeline's point of view: once a document
//! is handed to `compose`, nothing downstream mutates it. Editing a document
//! means building a new value and replacing the old one in whatever
//! collection owns it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single order line.
///
/// `total` is always `quantity * unit_price` at render time. It is stored
/// rather than recomputed on the fly so the rendered figures and the grand
/// total come from the same arithmetic pass, but it is never edited
/// independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Identity of the product this line refers to (opaque to the pipeline).
    pub product: String,
    /// Display name printed in the item table.
    pub name: String,
    /// Non-negative quantity. Items with quantity 0 are never rendered.
    pub quantity: f64,
    /// Non-negative unit price.
    pub unit_price: f64,
    /// Line total, `quantity * unit_price`.
    pub total: f64,
}

impl LineItem {
    pub fn new(product: &str, name: &str, quantity: f64, unit_price: f64) -> Self {
        Self {
            product: product.to_string(),
            name: name.to_string(),
            quantity,
            unit_price,
            total: quantity * unit_price,
        }
    }

    /// An item takes part in rendering only when something was ordered.
    pub fn is_active(&self) -> bool {
        self.quantity > 0.0
    }
}

/// The party a document is addressed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    /// Free-text address, printed as-is under the bill-to heading.
    pub address: String,
}

/// The two printable document families the pipeline produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    /// An itemized invoice.
    Invoice,
    /// A product-proposal note: same table layout, different heading and
    /// no payment terms.
    ProposalNote,
}

impl DocumentKind {
    /// Heading printed in the document number box.
    pub fn heading(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "Invoice #",
            DocumentKind::ProposalNote => "Proposal #",
        }
    }

    /// Prefix used when deriving an export file name.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "Invoice",
            DocumentKind::ProposalNote => "Proposal",
        }
    }
}

/// A complete business document ready for layout.
///
/// Immutable once handed to the pipeline. Item order is presentation order;
/// the column partitioner preserves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default = "default_kind")]
    pub kind: DocumentKind,
    /// Opaque document number, unique within the owning collection.
    pub number: String,
    pub party: Party,
    pub issued_on: NaiveDate,
    pub items: Vec<LineItem>,
    /// Sum of active line totals, fixed at construction. The renderer
    /// trusts this value and never recomputes it from the rows.
    pub grand_total: f64,
}

fn default_kind() -> DocumentKind {
    DocumentKind::Invoice
}

impl Document {
    /// Build a document, normalizing every line total and the grand total
    /// in one pass.
    pub fn new(
        kind: DocumentKind,
        number: &str,
        party: Party,
        issued_on: NaiveDate,
        items: Vec<LineItem>,
    ) -> Self {
        let items: Vec<LineItem> = items
            .into_iter()
            .map(|it| LineItem {
                total: it.quantity * it.unit_price,
                ..it
            })
            .collect();
        let grand_total = items
            .iter()
            .filter(|it| it.is_active())
            .map(|it| it.total)
            .sum();
        Self {
            kind,
            number: number.to_string(),
            party,
            issued_on,
            items,
            grand_total,
        }
    }

    /// Rebuild a document that arrived from external input (JSON) so the
    /// stored line totals and grand total satisfy the construction
    /// invariant, whatever the input claimed.
    pub fn normalized(self) -> Self {
        Document::new(self.kind, &self.number, self.party, self.issued_on, self.items)
    }

    /// Items with quantity > 0, in insertion order.
    pub fn active_items(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter().filter(|it| it.is_active())
    }

    /// Count of active items; this is the number every layout decision
    /// keys off.
    pub fn active_count(&self) -> usize {
        self.active_items().count()
    }
}

/// Process-wide business identity and boilerplate, passed explicitly into
/// the renderer rather than read from globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessConfig {
    pub name: String,
    pub phone: String,
    /// Phone number printed in the re-order footer line.
    pub reorder_phone: String,
    /// Payment terms shown opposite the bill-to block (invoices only).
    pub terms: String,
    /// Conditions-of-sale paragraph printed above the grand total.
    pub conditions: String,
    /// Small-caps tag line in the page footer.
    pub footer_line: String,
    /// Optional logo source: file path, data URI, or raw base64. Rendered
    /// in the header when it decodes to a JPEG or PNG.
    #[serde(default)]
    pub logo: Option<String>,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            name: "EVER GREEN PRODUCE L.L.C".to_string(),
            phone: "646-667-9749".to_string(),
            reorder_phone: "646-667-9749".to_string(),
            terms: "Due on Delivery".to_string(),
            conditions: "Deliveries must be verified on-site. No adjustments after departure. \
                         EVER GREEN PRODUCE L.L.C is not liable for indirect damages \
                         post-acceptance."
                .to_string(),
            footer_line: "PRODUCE DISTRIBUTION HUB".to_string(),
            logo: None,
        }
    }
}
