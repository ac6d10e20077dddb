//! # Surface Composition
//!
//! Turns a rendered block tree plus a style profile into a `Surface`: one
//! fixed page of absolutely positioned draw commands. This is the single
//! code path both export sinks share: print and file output differ only in
//! the profile data fed in, never in composition logic.
//!
//! The composer is deliberately simpler than a general layout engine. The
//! document contract fixes everything a flexbox would otherwise negotiate:
//! column widths are fractions that never reflow, table rows are one line
//! high, and overflow is clipped at the page edge rather than flowed to a
//! second page. Density selection upstream exists precisely so that clip
//! never has to happen.

use crate::error::RenderError;
use crate::font::{FontContext, StandardFont};
use crate::image_loader::{self, LoadedImage};
use crate::style::{Color, Edges, Style, StyleProfile, TextAlign};
use crate::tree::{Block, BlockKind, Direction, RenderedDocument};

/// Baseline offset from the top of a text line, as a fraction of font size.
pub const ASCENT: f64 = 0.78;
/// Line height as a multiple of font size.
const LEADING: f64 = 1.35;

/// A composed page: absolutely positioned elements in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    /// Page width in layout units.
    pub width: f64,
    /// Page height in layout units.
    pub height: f64,
    /// Layout units per PDF point (1.0 when composed directly in points).
    pub units_per_point: f64,
    /// Whether the consumer must force exact color rendering.
    pub force_color: bool,
    /// Bitmap sampling multiplier carried from the style profile.
    pub pixel_scale: f64,
    pub elements: Vec<Placed>,
}

/// A positioned element on the page (top-left origin).
#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub draw: Draw,
}

/// What to draw for an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Draw {
    /// Background fill and/or per-side border rules.
    Rect {
        background: Option<Color>,
        border_width: Edges,
        border_color: Color,
    },
    /// One line of text. `font_size` is in layout units; the baseline sits
    /// [`ASCENT`] × font_size below `y`.
    Text {
        content: String,
        font: StandardFont,
        font_size: f64,
        letter_spacing: f64,
        color: Color,
    },
    /// An embedded image.
    Image { image: LoadedImage },
    /// Grey placeholder when image loading fails.
    ImagePlaceholder,
}

impl Surface {
    /// All text content in paint order, for assertions and debugging.
    pub fn texts(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|e| match &e.draw {
                Draw::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Compose a rendered document under a style profile.
pub fn compose(
    rendered: &RenderedDocument,
    profile: &StyleProfile,
    fonts: &FontContext,
) -> Result<Surface, RenderError> {
    if profile.content_width() <= 0.0 || profile.content_height() <= 0.0 {
        return Err(RenderError::BadGeometry(format!(
            "no content area inside a {:.0}x{:.0} page",
            profile.page_width, profile.page_height
        )));
    }

    let mut composer = Composer {
        fonts,
        profile,
        u: profile.units_per_point,
        bottom: profile.page_height - profile.margin.bottom - profile.inset.bottom,
        elements: Vec::new(),
    };

    let x = profile.margin.left + profile.inset.left;
    let y = profile.margin.top + profile.inset.top;
    composer.place(&rendered.root, x, y, profile.content_width());

    Ok(Surface {
        width: profile.page_width,
        height: profile.page_height,
        units_per_point: profile.units_per_point,
        force_color: profile.force_color,
        pixel_scale: profile.pixel_scale,
        elements: composer.elements,
    })
}

struct Composer<'a> {
    fonts: &'a FontContext,
    profile: &'a StyleProfile,
    /// Layout units per point; every style length is authored in points.
    u: f64,
    /// Lower clip edge of the content area.
    bottom: f64,
    elements: Vec<Placed>,
}

impl<'a> Composer<'a> {
    fn len(&self, v: f64) -> f64 {
        v * self.u
    }

    fn edges(&self, e: Option<Edges>) -> Edges {
        let e = e.unwrap_or_default();
        Edges {
            top: self.len(e.top),
            right: self.len(e.right),
            bottom: self.len(e.bottom),
            left: self.len(e.left),
        }
    }

    /// Place a block at (x, y) within `avail_w`; returns the outer height
    /// consumed (margin included).
    fn place(&mut self, block: &Block, x: f64, y: f64, avail_w: f64) -> f64 {
        let margin = self.edges(block.style.margin);
        let padding = self.edges(block.style.padding);

        let bx = x + margin.left;
        let by = y + margin.top;
        let bw = (avail_w - margin.horizontal()).max(0.0);
        let cx = bx + padding.left;
        let cy = by + padding.top;
        let cw = (bw - padding.horizontal()).max(0.0);

        // Reserve the paint slot before children so backgrounds sit behind
        // their content.
        let paints = block.style.background_color.is_some() || block.style.border_width.is_some();
        let rect_idx = if paints {
            self.elements.push(Placed {
                x: bx,
                y: by,
                width: bw,
                height: 0.0,
                draw: Draw::Rect {
                    background: block.style.background_color,
                    border_width: self.edges(block.style.border_width),
                    border_color: block.style.border_color.unwrap_or(Color::BLACK),
                },
            });
            Some(self.elements.len() - 1)
        } else {
            None
        };

        let content_h = match &block.kind {
            BlockKind::Stack {
                direction: Direction::Column,
            }
            | BlockKind::Cell => self.place_column(&block.children, cx, cy, cw),
            BlockKind::Stack {
                direction: Direction::Row,
            } => self.place_row(&block.children, cx, cy, cw),
            BlockKind::Text { content } => self.place_text(block, content, cx, cy, cw),
            BlockKind::Table { .. } => self.place_table(&block.children, cx, cy, cw),
            BlockKind::Row { .. } => self.place_table_row(block, cx, cy, cw),
            BlockKind::Spacer { height } => self.len(*height),
            BlockKind::Rule => {
                let h = self.edges(block.style.border_width).bottom.max(0.5);
                self.emit(Placed {
                    x: cx,
                    y: cy,
                    width: cw,
                    height: h,
                    draw: Draw::Rect {
                        background: Some(block.style.border_color.unwrap_or(Color::BLACK)),
                        border_width: Edges::default(),
                        border_color: Color::BLACK,
                    },
                });
                h
            }
            BlockKind::Image { src, width, height } => {
                self.place_image(src, cx, cy, self.len(*width), self.len(*height))
            }
        };

        let box_h = content_h + padding.vertical();
        if let Some(idx) = rect_idx {
            self.elements[idx].height = box_h;
            if self.elements[idx].y + box_h > self.bottom {
                // The box fell off the page; drop its paint.
                self.elements[idx].draw = Draw::Rect {
                    background: None,
                    border_width: Edges::default(),
                    border_color: Color::BLACK,
                };
            }
        }
        box_h + margin.vertical()
    }

    fn place_column(&mut self, children: &[Block], x: f64, y: f64, w: f64) -> f64 {
        let mut cy = y;
        for child in children {
            cy += self.place(child, x, cy, w);
        }
        cy - y
    }

    fn place_row(&mut self, children: &[Block], x: f64, y: f64, w: f64) -> f64 {
        if children.is_empty() {
            return 0.0;
        }

        // A row of item tables is the two-column split; it gets the
        // profile's fixed inter-column gap.
        let all_tables = children
            .iter()
            .all(|c| matches!(c.kind, BlockKind::Table { .. }));
        let gap = if all_tables && children.len() > 1 {
            self.profile.column_gap
        } else {
            0.0
        };

        let usable = w - gap * (children.len() - 1) as f64;
        let explicit: f64 = children.iter().filter_map(|c| c.style.width).sum();
        let unset = children.iter().filter(|c| c.style.width.is_none()).count();
        let default_frac = if unset > 0 {
            ((1.0 - explicit) / unset as f64).max(0.0)
        } else {
            0.0
        };

        let mut cx = x;
        let mut max_h: f64 = 0.0;
        for child in children {
            let frac = child.style.width.unwrap_or(default_frac);
            let cw = usable * frac;
            let h = self.place(child, cx, y, cw);
            max_h = max_h.max(h);
            cx += cw + gap;
        }
        max_h
    }

    fn place_table(&mut self, rows: &[Block], x: f64, y: f64, w: f64) -> f64 {
        let mut cy = y;
        for row in rows {
            cy += self.place(row, x, cy, w);
        }
        cy - y
    }

    /// One table row: fixed-fraction cells, one line of text each. A row
    /// that would straddle the page bottom is clipped whole; the cursor
    /// still advances so everything after it clips consistently too.
    fn place_table_row(&mut self, row: &Block, x: f64, y: f64, w: f64) -> f64 {
        let line_h = row
            .children
            .iter()
            .filter_map(|c| c.children.first())
            .map(|t| self.len(t.style.font_size.unwrap_or(9.0)) * LEADING)
            .fold(0.0, f64::max);
        let row_h = line_h;

        // row_h here is the content height; the caller's wrapper already
        // added the row padding into `y`, so check against the padded box.
        let padding = self.edges(row.style.padding);
        if self.profile.avoid_row_break && y + row_h + padding.bottom > self.bottom {
            return row_h;
        }

        let mut cx = x;
        for cell in &row.children {
            let frac = cell.style.width.unwrap_or(0.0);
            let cw = w * frac;
            if let Some(text_block) = cell.children.first() {
                if let BlockKind::Text { content } = &text_block.kind {
                    self.place_cell_text(text_block, content, cx, y, cw, line_h);
                }
            }
            cx += cw;
        }
        row_h
    }

    fn place_cell_text(
        &mut self,
        block: &Block,
        content: &str,
        x: f64,
        y: f64,
        w: f64,
        line_h: f64,
    ) {
        let style = &block.style;
        let size = self.len(style.font_size.unwrap_or(9.0));
        let ls = self.len(style.letter_spacing.unwrap_or(0.0));
        let font = self.resolve_font(style);
        let text = self.transform(content, style);
        let text = self.truncate_to_width(&text, font, size, ls, w);
        let text_w = font.metrics().measure_string(&text, size, ls);

        let x = match style.text_align.unwrap_or_default() {
            TextAlign::Left => x,
            TextAlign::Center => x + (w - text_w) / 2.0,
            TextAlign::Right => x + (w - text_w),
        };
        // Center the single line inside the row's line box.
        let y = y + (line_h - size * LEADING) / 2.0;
        self.emit(Placed {
            x,
            y,
            width: text_w,
            height: size * LEADING,
            draw: Draw::Text {
                content: text,
                font,
                font_size: size,
                letter_spacing: ls,
                color: style.color.unwrap_or(Color::BLACK),
            },
        });
    }

    /// Free-flowing text wraps on word boundaries within the available
    /// width.
    fn place_text(&mut self, block: &Block, content: &str, x: f64, y: f64, w: f64) -> f64 {
        let style = &block.style;
        let size = self.len(style.font_size.unwrap_or(9.0));
        let ls = self.len(style.letter_spacing.unwrap_or(0.0));
        let font = self.resolve_font(style);
        let text = self.transform(content, style);
        let line_h = size * LEADING;

        let mut cy = y;
        for line in wrap_words(&text, |s| font.metrics().measure_string(s, size, ls), w) {
            let line_w = font.metrics().measure_string(&line, size, ls);
            let lx = match style.text_align.unwrap_or_default() {
                TextAlign::Left => x,
                TextAlign::Center => x + (w - line_w) / 2.0,
                TextAlign::Right => x + (w - line_w),
            };
            self.emit(Placed {
                x: lx,
                y: cy,
                width: line_w,
                height: line_h,
                draw: Draw::Text {
                    content: line,
                    font,
                    font_size: size,
                    letter_spacing: ls,
                    color: style.color.unwrap_or(Color::BLACK),
                },
            });
            cy += line_h;
        }
        cy - y
    }

    fn place_image(&mut self, src: &str, x: f64, y: f64, w: f64, h: f64) -> f64 {
        let draw = match image_loader::load_image(src) {
            Ok(image) => Draw::Image { image },
            Err(e) => {
                log::warn!("logo failed to load, drawing placeholder: {e}");
                Draw::ImagePlaceholder
            }
        };
        self.emit(Placed {
            x,
            y,
            width: w,
            height: h,
            draw,
        });
        h
    }

    fn resolve_font(&self, style: &Style) -> StandardFont {
        self.fonts.resolve(
            style.font_family.unwrap_or_default(),
            style.font_weight.unwrap_or(400),
            style.italic.unwrap_or(false),
        )
    }

    fn transform(&self, content: &str, style: &Style) -> String {
        if style.uppercase.unwrap_or(false) {
            content.to_uppercase()
        } else {
            content.to_string()
        }
    }

    fn truncate_to_width(
        &self,
        text: &str,
        font: StandardFont,
        size: f64,
        ls: f64,
        max_w: f64,
    ) -> String {
        let metrics = font.metrics();
        if metrics.measure_string(text, size, ls) <= max_w {
            return text.to_string();
        }
        let mut kept: String = text.to_string();
        while !kept.is_empty() {
            kept.pop();
            let candidate = format!("{}…", kept.trim_end());
            if metrics.measure_string(&candidate, size, ls) <= max_w {
                return candidate;
            }
        }
        "…".to_string()
    }

    /// Drop anything that lands entirely past the page bottom.
    fn emit(&mut self, placed: Placed) {
        if placed.y >= self.bottom {
            return;
        }
        self.elements.push(placed);
    }
}

/// Greedy word wrap: fills each line up to `max_w` using the provided
/// measure function. Words longer than the line stand alone.
fn wrap_words(text: &str, measure: impl Fn(&str) -> f64, max_w: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if !current.is_empty() && measure(&candidate) > max_w {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutProfile;
    use crate::model::{BusinessConfig, Document, DocumentKind, LineItem, Party};
    use crate::render::Renderer;
    use chrono::NaiveDate;

    fn doc(n: usize) -> Document {
        let items = (0..n)
            .map(|i| LineItem::new(&format!("p-{i}"), &format!("Item {i}"), 2.0, 1.5))
            .collect();
        Document::new(
            DocumentKind::Invoice,
            "100481",
            Party {
                name: "Green Villa Market".into(),
                address: "88 Atlantic Ave, Brooklyn NY".into(),
            },
            NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
            items,
        )
    }

    fn composed(n: usize, profile: &StyleProfile) -> Surface {
        let rendered = Renderer::new(BusinessConfig::default())
            .render(&doc(n), LayoutProfile::for_count(n));
        compose(&rendered, profile, &FontContext::new()).unwrap()
    }

    #[test]
    fn test_compose_produces_elements_within_page() {
        let surface = composed(10, &StyleProfile::print());
        assert!(!surface.elements.is_empty());
        for el in &surface.elements {
            assert!(el.x >= 0.0 && el.y >= 0.0);
            assert!(el.x + el.width <= surface.width + 0.5);
        }
    }

    #[test]
    fn test_compose_is_deterministic() {
        let a = composed(35, &StyleProfile::file());
        let b = composed(35, &StyleProfile::file());
        assert_eq!(a, b);
    }

    #[test]
    fn test_file_surface_records_profile_data() {
        let surface = composed(5, &StyleProfile::file());
        assert_eq!(surface.width, crate::style::FILE_PAGE_WIDTH_PX);
        assert_eq!(surface.pixel_scale, crate::style::FILE_PIXEL_SCALE);
        assert!(!surface.force_color);
        let print = composed(5, &StyleProfile::print());
        assert!(print.force_color);
    }

    #[test]
    fn test_wrap_words_fills_lines() {
        let lines = wrap_words("aa bb cc dd", |s| s.len() as f64, 5.0);
        assert_eq!(lines, vec!["aa bb", "cc dd"]);
        let lines = wrap_words("", |s| s.len() as f64, 5.0);
        assert_eq!(lines, vec![""]);
    }

    #[test]
    fn test_bad_geometry_is_rejected() {
        let mut profile = StyleProfile::print();
        profile.margin = Edges::uniform(500.0);
        let rendered = Renderer::new(BusinessConfig::default())
            .render(&doc(3), LayoutProfile::LargeSingle);
        let err = compose(&rendered, &profile, &FontContext::new());
        assert!(matches!(err, Err(RenderError::BadGeometry(_))));
    }

    #[test]
    fn test_uppercase_transform_applies() {
        let surface = composed(2, &StyleProfile::print());
        let texts = surface.texts();
        assert!(texts.iter().any(|t| t.contains("ITEM 0")));
        assert!(texts.iter().any(|t| *t == "BILL TO"));
    }
}
