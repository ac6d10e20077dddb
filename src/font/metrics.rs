//! Advance-width tables for the standard PDF fonts the document uses.
//!
//! Widths are in 1/1000 em, straight from the Adobe AFM files for the
//! base-14 fonts. Only the printable ASCII range is tabulated; anything
//! outside it falls back to the font's default advance, which is plenty for
//! measuring invoice text.

/// Metrics for one standard font.
#[derive(Debug, Clone, Copy)]
pub struct StandardFontMetrics {
    /// Advance widths for codepoints 0x20..=0x7E.
    widths: &'static [u16; 95],
    /// Fallback advance for anything not tabulated.
    default_width: u16,
}

impl StandardFontMetrics {
    /// Advance width of one character in points at the given size.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let cp = ch as u32;
        let units = if (0x20..=0x7E).contains(&cp) {
            self.widths[(cp - 0x20) as usize]
        } else {
            self.default_width
        };
        units as f64 / 1000.0 * font_size
    }

    /// Width of a string in points, including letter spacing between and
    /// after glyphs.
    pub fn measure_string(&self, text: &str, font_size: f64, letter_spacing: f64) -> f64 {
        text.chars()
            .map(|ch| self.char_width(ch, font_size) + letter_spacing)
            .sum()
    }
}

pub const HELVETICA: StandardFontMetrics = StandardFontMetrics {
    widths: &HELVETICA_WIDTHS,
    default_width: 556,
};

pub const HELVETICA_BOLD: StandardFontMetrics = StandardFontMetrics {
    widths: &HELVETICA_BOLD_WIDTHS,
    default_width: 556,
};

pub const COURIER: StandardFontMetrics = StandardFontMetrics {
    widths: &COURIER_WIDTHS,
    default_width: 600,
};

#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 95] = [
    // 0x20 space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0x30 0-9 : ; < = > ?
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    // 0x40 @ A-O
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    // 0x50 P-Z [ \ ] ^ _
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    // 0x60 ` a-o
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    // 0x70 p-z { | } ~
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

// Courier is monospaced; every glyph advances 600/1000 em.
#[rustfmt::skip]
static COURIER_WIDTHS: [u16; 95] = [600; 95];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_width_matches_afm() {
        // Helvetica space is 278/1000 em: 3.336 pt at 12 pt.
        let w = HELVETICA.char_width(' ', 12.0);
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn test_bold_is_wider() {
        assert!(HELVETICA_BOLD.char_width('a', 10.0) > HELVETICA.char_width('a', 10.0));
    }

    #[test]
    fn test_courier_is_monospaced() {
        let i = COURIER.char_width('i', 10.0);
        let m = COURIER.char_width('M', 10.0);
        assert_eq!(i, m);
    }

    #[test]
    fn test_untabulated_falls_back() {
        let w = HELVETICA.char_width('é', 10.0);
        assert_eq!(w, 5.56);
    }
}
