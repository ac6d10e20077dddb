//! Integration tests for the Platen layout and export pipeline.
//!
//! These tests exercise the full path from a Document to rendered trees
//! and exported files. They verify:
//! - profile selection and density tiers track the item count
//! - two-column partitioning preserves order and numbering
//! - rendering is pure, idempotent, and filters inactive items
//! - the grand total shown is the sum of the rendered line totals
//! - both export sinks honor their failure contracts

use chrono::NaiveDate;
use platen::export::{CaptureState, ExportMeta, FileAssembler, FileCapture};
use platen::font::FontContext;
use platen::render::format_currency;
use platen::surface::Surface;
use platen::tree::{Block, BlockKind, RenderedDocument};
use platen::{
    compose, export_pdf, print_document, BusinessConfig, CaptureError, Document, DocumentKind,
    LayoutProfile, LineItem, Party, PrintSpooler, StyleProfile,
};

// ─── Helpers ────────────────────────────────────────────────────

fn party() -> Party {
    Party {
        name: "Green Villa Market".to_string(),
        address: "88 Atlantic Ave, Brooklyn NY 11201".to_string(),
    }
}

fn issued() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 3).unwrap()
}

fn make_doc(item_count: usize) -> Document {
    let items = (0..item_count)
        .map(|i| {
            LineItem::new(
                &format!("p-{i}"),
                &format!("Item {i}"),
                (i % 4 + 1) as f64,
                0.25 * (i % 7 + 1) as f64,
            )
        })
        .collect();
    Document::new(DocumentKind::Invoice, "100481", party(), issued(), items)
}

fn make_rendered(item_count: usize) -> RenderedDocument {
    compose(&BusinessConfig::default(), &make_doc(item_count), None)
}

/// Sequence-number texts of the non-header rows, in presentation order.
fn row_numbers(rendered: &RenderedDocument) -> Vec<usize> {
    rendered
        .item_rows()
        .iter()
        .filter_map(|row| row.children.first())
        .filter_map(|cell| cell.children.first())
        .filter_map(Block::text_content)
        .filter_map(|t| t.parse().ok())
        .collect()
}

/// The line-total text of each non-header row (last cell).
fn row_totals(rendered: &RenderedDocument) -> Vec<f64> {
    rendered
        .item_rows()
        .iter()
        .filter_map(|row| row.children.last())
        .filter_map(|cell| cell.children.first())
        .filter_map(Block::text_content)
        .map(parse_currency)
        .collect()
}

fn parse_currency(text: &str) -> f64 {
    text.trim_start_matches('$')
        .replace(',', "")
        .parse()
        .unwrap()
}

fn all_texts(rendered: &RenderedDocument) -> Vec<&str> {
    rendered
        .root
        .walk()
        .filter_map(Block::text_content)
        .collect()
}

// ─── Layout scenarios ───────────────────────────────────────────

#[test]
fn scenario_a_ten_items_large_single_column() {
    let rendered = make_rendered(10);
    assert_eq!(rendered.profile, LayoutProfile::LargeSingle);
    assert_eq!(rendered.tables().len(), 1);
    assert_eq!(rendered.density.font_size, 9.5);
    assert!(rendered.density.row_padding >= 6.0);
    assert!(rendered.density.bill_to_spacer > 0.0);
    assert_eq!(row_numbers(&rendered), (1..=10).collect::<Vec<_>>());
}

#[test]
fn scenario_b_thirty_five_items_two_columns() {
    let rendered = make_rendered(35);
    assert_eq!(rendered.profile, LayoutProfile::TwoColumn);

    let tables = rendered.tables();
    assert_eq!(tables.len(), 2);
    match (&tables[0].kind, &tables[1].kind) {
        (
            BlockKind::Table { start_index: first },
            BlockKind::Table {
                start_index: second,
            },
        ) => {
            assert_eq!(*first, 1);
            assert_eq!(*second, 19);
        }
        _ => unreachable!(),
    }
    // 18 + 17 rows, numbered 1-18 then 19-35.
    assert_eq!(tables[0].children.len() - 1, 18);
    assert_eq!(tables[1].children.len() - 1, 17);
    assert_eq!(row_numbers(&rendered), (1..=35).collect::<Vec<_>>());
}

#[test]
fn scenario_c_sixty_items_universal_compact_split() {
    let rendered = make_rendered(60);
    assert_eq!(rendered.profile, LayoutProfile::Universal);
    // Past the universal breakpoints: compact type and an automatic split.
    assert_eq!(rendered.density.font_size, 7.0);
    assert_eq!(rendered.tables().len(), 2);
    assert_eq!(row_numbers(&rendered), (1..=60).collect::<Vec<_>>());
}

#[test]
fn scenario_d_empty_document_renders_placeholder() {
    let items = vec![
        LineItem::new("p-0", "Lime", 0.0, 0.4),
        LineItem::new("p-1", "Ginger", 0.0, 3.1),
    ];
    let doc = Document::new(DocumentKind::Invoice, "100500", party(), issued(), items);
    assert_eq!(doc.active_count(), 0);

    let rendered = compose(&BusinessConfig::default(), &doc, None);
    assert_eq!(rendered.profile, LayoutProfile::LargeSingle);

    let tables = rendered.tables();
    assert_eq!(tables.len(), 1);
    // Caption row survives, and exactly one placeholder row follows it.
    let header_rows: Vec<_> = rendered
        .root
        .walk()
        .filter(|b| matches!(b.kind, BlockKind::Row { header: true }))
        .collect();
    assert_eq!(header_rows.len(), 1);
    assert_eq!(rendered.item_rows().len(), 1);
    let texts = all_texts(&rendered);
    assert!(texts.contains(&"No items on this document"));
    assert!(texts.contains(&"$0.00"));
}

// ─── Pipeline properties ────────────────────────────────────────

#[test]
fn rendering_is_idempotent() {
    for n in [0, 10, 35, 60] {
        let doc = make_doc(n);
        let config = BusinessConfig::default();
        let a = compose(&config, &doc, None);
        let b = compose(&config, &doc, None);
        assert_eq!(a, b, "render of {n} items not reproducible");
    }
}

#[test]
fn zero_quantity_items_never_render() {
    let mut items: Vec<LineItem> = (0..12)
        .map(|i| LineItem::new(&format!("p-{i}"), &format!("Item {i}"), 1.0, 2.0))
        .collect();
    items.insert(4, LineItem::new("p-x", "Ghost Pepper", 0.0, 9.0));
    items.push(LineItem::new("p-y", "Ghost Garlic", 0.0, 5.0));
    let doc = Document::new(DocumentKind::Invoice, "100481", party(), issued(), items);

    let rendered = compose(&BusinessConfig::default(), &doc, None);
    assert_eq!(rendered.item_rows().len(), 12);
    let texts = all_texts(&rendered);
    assert!(!texts.iter().any(|t| t.contains("Ghost")));
    // Numbering closes the gap the inactive items would have left.
    assert_eq!(row_numbers(&rendered), (1..=12).collect::<Vec<_>>());
}

#[test]
fn grand_total_matches_rendered_rows() {
    for n in [3, 28, 47, 75] {
        let doc = make_doc(n);
        let rendered = compose(&BusinessConfig::default(), &doc, None);
        let sum: f64 = row_totals(&rendered).iter().sum();
        let texts = all_texts(&rendered);
        assert!(
            texts.contains(&format_currency(sum).as_str()),
            "displayed grand total disagrees with rendered rows for {n} items"
        );
    }
}

#[test]
fn override_changes_layout_without_touching_document() {
    let doc = make_doc(5);
    let before = doc.clone();
    let rendered = compose(
        &BusinessConfig::default(),
        &doc,
        Some(LayoutProfile::TwoColumn),
    );
    assert_eq!(rendered.profile, LayoutProfile::TwoColumn);
    assert_eq!(rendered.tables().len(), 2);
    assert_eq!(doc, before);
}

#[test]
fn proposal_notes_drop_payment_terms() {
    let doc = Document::new(
        DocumentKind::ProposalNote,
        "2031",
        party(),
        issued(),
        vec![LineItem::new("p-1", "Paan Leaf", 4.0, 1.5)],
    );
    let rendered = compose(&BusinessConfig::default(), &doc, None);
    let texts = all_texts(&rendered);
    assert!(texts.contains(&"Proposal #"));
    assert!(!texts.iter().any(|t| t.starts_with("Terms:")));

    let invoice = compose(&BusinessConfig::default(), &make_doc(1), None);
    assert!(all_texts(&invoice).iter().any(|t| t.starts_with("Terms:")));
}

// ─── Export sinks ───────────────────────────────────────────────

#[derive(Default)]
struct RecordingSpooler {
    submitted: Vec<Surface>,
}

impl PrintSpooler for RecordingSpooler {
    fn submit(&mut self, surface: Surface) {
        self.submitted.push(surface);
    }
}

#[test]
fn print_sink_submits_one_surface() {
    let rendered = make_rendered(20);
    let mut spooler = RecordingSpooler::default();
    print_document(
        &rendered,
        &StyleProfile::print(),
        &FontContext::new(),
        &mut spooler,
    )
    .unwrap();
    assert_eq!(spooler.submitted.len(), 1);
    let surface = &spooler.submitted[0];
    assert!(surface.force_color);
    assert_eq!(surface.units_per_point, 1.0);
    assert!(surface.texts().contains(&"GREEN VILLA MARKET"));
}

#[test]
fn file_export_writes_named_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let doc = make_doc(35);
    let saved = export_pdf(&BusinessConfig::default(), &doc, None, dir.path()).unwrap();

    assert_eq!(
        saved.path.file_name().unwrap().to_str().unwrap(),
        "Invoice_Green_Villa_Market_100481.pdf"
    );
    let bytes = std::fs::read(&saved.path).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.7"));
    assert!(bytes.windows(5).any(|w| w == b"%%EOF"));
    // The media box is A4 points even though the file profile composes in
    // pixel units.
    let needle = b"/MediaBox [0 0 595.28 841.89]";
    assert!(bytes.windows(needle.len()).any(|w| w == needle));
}

struct FailingAssembler;

impl FileAssembler for FailingAssembler {
    fn assemble(
        &self,
        _surface: &Surface,
        _fonts: &FontContext,
        _meta: &ExportMeta,
    ) -> Result<Vec<u8>, CaptureError> {
        Err(CaptureError::Assemble("simulated raster failure".into()))
    }
}

#[test]
fn scenario_e_failed_capture_tears_down_and_leaves_state_intact() {
    let dir = tempfile::tempdir().unwrap();
    let config = BusinessConfig::default();
    let doc = make_doc(10);
    let before = doc.clone();
    let rendered = compose(&config, &doc, None);
    let capture = FileCapture::new(dir.path());

    let err = capture.capture_with(
        &FailingAssembler,
        &rendered,
        &StyleProfile::file(),
        &FontContext::new(),
        &ExportMeta::for_document(&doc, &config),
    );
    assert!(matches!(err, Err(CaptureError::Assemble(_))));
    assert_eq!(capture.state(), CaptureState::Failed);
    assert!(!capture.surface_active(), "off-screen surface leaked");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    // Document and layout selection survive the failure; the retry works.
    assert_eq!(doc, before);
    let retried = capture.capture(
        &rendered,
        &StyleProfile::file(),
        &FontContext::new(),
        &ExportMeta::for_document(&doc, &config),
    );
    assert!(retried.is_ok());
    assert_eq!(capture.state(), CaptureState::Saved);
}

#[test]
fn compose_json_round_trip_normalizes_totals() {
    let json = r#"{
        "number": "100900",
        "party": { "name": "Corner Deli", "address": "5 Main St" },
        "issuedOn": "2025-11-03",
        "grandTotal": 999.99,
        "items": [
            { "product": "p-1", "name": "Lime", "quantity": 4, "unitPrice": 0.5, "total": 0.0 }
        ]
    }"#;
    let rendered = platen::compose_json(&BusinessConfig::default(), json, None).unwrap();
    let texts = all_texts(&rendered);
    // 4 × $0.50, not the stale figures the JSON claimed.
    assert!(texts.contains(&"$2.00"));
    assert!(!texts.contains(&"$999.99"));
}
