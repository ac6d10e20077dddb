//! # Style System
//!
//! A small CSS-like style model for rendered blocks, plus the two fixed
//! export style profiles (print vs. file).
//!
//! We don't try to cover all of CSS. We cover the properties a fixed-layout
//! business document actually uses: box edges, typography, color, border
//! rules. Anything the composer doesn't read has no business being here.

pub mod profile;

pub use profile::{StyleProfile, FILE_PAGE_WIDTH_PX, FILE_PIXEL_SCALE};

use serde::{Deserialize, Serialize};

/// Style properties for a block. Every field is optional; the composer
/// falls back to inherited or default values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    // ── Box Model ──────────────────────────────────────────────
    /// Fixed width as a fraction (0.0-1.0) of the parent's content width.
    pub width: Option<f64>,
    /// Padding inside the border.
    pub padding: Option<Edges>,
    /// Margin outside the border.
    pub margin: Option<Edges>,

    // ── Typography ─────────────────────────────────────────────
    pub font_family: Option<FontFamily>,
    /// Font size in points.
    pub font_size: Option<f64>,
    /// Font weight (400 or 700; anything ≥ 600 renders bold).
    pub font_weight: Option<u32>,
    pub italic: Option<bool>,
    pub text_align: Option<TextAlign>,
    /// Letter spacing in points.
    pub letter_spacing: Option<f64>,
    /// Render text in uppercase.
    pub uppercase: Option<bool>,

    // ── Color & rules ──────────────────────────────────────────
    pub color: Option<Color>,
    pub background_color: Option<Color>,
    /// Border rule width per edge.
    pub border_width: Option<Edges>,
    pub border_color: Option<Color>,
}

impl Style {
    /// Shorthand for the common text style triple.
    pub fn text(size: f64, weight: u32, color: Color) -> Self {
        Self {
            font_size: Some(size),
            font_weight: Some(weight),
            color: Some(color),
            ..Default::default()
        }
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.text_align = Some(align);
        self
    }

    pub fn with_family(mut self, family: FontFamily) -> Self {
        self.font_family = Some(family);
        self
    }

    pub fn with_uppercase(mut self) -> Self {
        self.uppercase = Some(true);
        self
    }
}

/// The two type families the document uses: sans for prose, mono for
/// figures. Both resolve to standard PDF fonts, so nothing is embedded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    Sans,
    Mono,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Edge values (top, right, bottom, left) used for margin, padding and
/// border rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn bottom(v: f64) -> Self {
        Self {
            bottom: v,
            ..Default::default()
        }
    }

    pub fn top(v: f64) -> Self {
        Self {
            top: v,
            ..Default::default()
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// An RGB color. The document palette is monochrome-plus-accent, so there
/// is no alpha channel to carry around.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64, // 0.0 - 1.0
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        let (r, g, b) = match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).unwrap_or(0);
                (r, g, b)
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                (r, g, b)
            }
            _ => (0, 0, 0),
        };
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// The document's fixed palette, lifted from the issuer's house style.
pub mod palette {
    use super::Color;

    pub const INK: Color = Color {
        r: 0.06,
        g: 0.09,
        b: 0.16,
    };
    pub const MUTED: Color = Color {
        r: 0.39,
        g: 0.45,
        b: 0.55,
    };
    pub const FAINT: Color = Color {
        r: 0.58,
        g: 0.64,
        b: 0.72,
    };
    pub const PANEL: Color = Color {
        r: 0.97,
        g: 0.98,
        b: 0.99,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        let c = Color::hex("#16a34a");
        assert!((c.r - 22.0 / 255.0).abs() < 1e-9);
        assert!((c.g - 163.0 / 255.0).abs() < 1e-9);
        assert!((c.b - 74.0 / 255.0).abs() < 1e-9);
        assert_eq!(Color::hex("fff"), Color::WHITE);
        assert_eq!(Color::hex("not-a-color"), Color::BLACK);
    }

    #[test]
    fn test_edges_sums() {
        let e = Edges::symmetric(2.0, 5.0);
        assert_eq!(e.vertical(), 4.0);
        assert_eq!(e.horizontal(), 10.0);
    }
}
