//! # PDF Serializer
//!
//! Takes a composed surface and writes a valid PDF file.
//!
//! This is a from-scratch PDF 1.7 writer. We write the raw bytes ourselves
//! because it gives us full control over the output and keeps the pipeline
//! self-contained. The subset of PDF a one-page business document needs
//! (standard Type1 fonts, flate-compressed content streams, image
//! XObjects) is small enough to manage by hand.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (fonts, page, content stream, images)
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! Surfaces composed in pixel units (the file style profile) are written
//! under a single page-level coordinate transform, so the media box stays
//! A4 points while every element keeps its pixel-exact geometry.

use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use crate::font::StandardFont;
use crate::image_loader::{ImagePixelData, LoadedImage};
use crate::style::{Color, Edges};
use crate::surface::{Draw, Placed, Surface, ASCENT};
use miniz_oxide::deflate::compress_to_vec_zlib;

/// Document information dictionary values.
#[derive(Debug, Clone, Default)]
pub struct PdfInfo {
    pub title: Option<String>,
    pub author: Option<String>,
}

pub struct PdfWriter;

struct PdfObject {
    data: Vec<u8>,
}

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    objects: Vec<PdfObject>,
    /// Fonts in resource order: /F0, /F1, ...
    fonts: Vec<(StandardFont, usize)>,
    /// XObject obj IDs for images in occurrence order: /Im0, /Im1, ...
    images: Vec<usize>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write a composed surface to a PDF byte vector.
    pub fn write(&self, surface: &Surface, info: &PdfInfo) -> Vec<u8> {
        let mut builder = PdfBuilder {
            objects: Vec::new(),
            fonts: Vec::new(),
            images: Vec::new(),
        };

        // Reserve object IDs:
        // 0 = placeholder (PDF objects are 1-indexed)
        // 1 = Catalog
        // 2 = Pages (page tree root)
        // 3+ = fonts, images, content stream, page object
        builder.objects.push(PdfObject { data: vec![] });
        builder.objects.push(PdfObject { data: vec![] });
        builder.objects.push(PdfObject { data: vec![] });

        self.register_fonts(&mut builder, surface);
        self.register_images(&mut builder, surface);

        let content = self.build_content_stream(surface, &builder);
        let compressed = compress_to_vec_zlib(content.as_bytes(), 6);

        let content_obj_id = builder.objects.len();
        let mut content_data: Vec<u8> = Vec::new();
        let _ = write!(
            content_data,
            "<< /Length {} /Filter /FlateDecode >>\nstream\n",
            compressed.len()
        );
        content_data.extend_from_slice(&compressed);
        content_data.extend_from_slice(b"\nendstream");
        builder.objects.push(PdfObject { data: content_data });

        let page_w = surface.width / surface.units_per_point;
        let page_h = surface.height / surface.units_per_point;
        let page_obj_id = builder.objects.len();
        let font_resources = builder
            .fonts
            .iter()
            .enumerate()
            .map(|(i, (_, obj_id))| format!("/F{} {} 0 R", i, obj_id))
            .collect::<Vec<_>>()
            .join(" ");
        let xobject_resources = builder
            .images
            .iter()
            .enumerate()
            .map(|(i, obj_id)| format!("/Im{} {} 0 R", i, obj_id))
            .collect::<Vec<_>>()
            .join(" ");
        let resources = if xobject_resources.is_empty() {
            format!("/Font << {} >>", font_resources)
        } else {
            format!(
                "/Font << {} >> /XObject << {} >>",
                font_resources, xobject_resources
            )
        };
        let page_dict = format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
             /Contents {} 0 R /Resources << {} >> >>",
            page_w, page_h, content_obj_id, resources
        );
        builder.objects.push(PdfObject {
            data: page_dict.into_bytes(),
        });

        // Catalog (object 1) and the one-page tree (object 2).
        builder.objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();
        builder.objects[2].data =
            format!("<< /Type /Pages /Kids [{} 0 R] /Count 1 >>", page_obj_id).into_bytes();

        // Info dictionary (metadata)
        let info_obj_id = if info.title.is_some() || info.author.is_some() {
            let id = builder.objects.len();
            let mut dict = String::from("<< ");
            if let Some(ref title) = info.title {
                let _ = write!(dict, "/Title ({}) ", Self::escape_pdf_string(title));
            }
            if let Some(ref author) = info.author {
                let _ = write!(dict, "/Author ({}) ", Self::escape_pdf_string(author));
            }
            let _ = write!(dict, "/Producer (Platen 0.1) /Creator (Platen) >>");
            builder.objects.push(PdfObject {
                data: dict.into_bytes(),
            });
            Some(id)
        } else {
            None
        };

        self.serialize(&builder, info_obj_id)
    }

    /// Collect the standard fonts used across the surface, in a
    /// deterministic order, and write one Type1 dictionary each.
    fn register_fonts(&self, builder: &mut PdfBuilder, surface: &Surface) {
        let mut used: Vec<StandardFont> = surface
            .elements
            .iter()
            .filter_map(|el| match &el.draw {
                Draw::Text { font, .. } => Some(*font),
                _ => None,
            })
            .collect();
        used.sort_by_key(|f| f.pdf_name());
        used.dedup();

        // Always have at least Helvetica
        if used.is_empty() {
            used.push(StandardFont::Helvetica);
        }

        for font in used {
            let obj_id = builder.objects.len();
            let font_dict = format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                 /Encoding /WinAnsiEncoding >>",
                font.pdf_name()
            );
            builder.objects.push(PdfObject {
                data: font_dict.into_bytes(),
            });
            builder.fonts.push((font, obj_id));
        }
    }

    fn font_index(&self, font: StandardFont, fonts: &[(StandardFont, usize)]) -> usize {
        fonts.iter().position(|(f, _)| *f == font).unwrap_or(0)
    }

    /// Write an XObject for every image on the surface, in occurrence
    /// order, so the content stream can reference /Im0, /Im1, ...
    fn register_images(&self, builder: &mut PdfBuilder, surface: &Surface) {
        let images: Vec<&LoadedImage> = surface
            .elements
            .iter()
            .filter_map(|el| match &el.draw {
                Draw::Image { image } => Some(image),
                _ => None,
            })
            .collect();
        for image in images {
            let obj_id = Self::write_image_xobject(builder, image);
            builder.images.push(obj_id);
        }
    }

    /// Write a single image as one or two XObject PDF objects (the second
    /// is the SMask for PNG transparency). Returns the main XObject ID.
    fn write_image_xobject(builder: &mut PdfBuilder, image: &LoadedImage) -> usize {
        match &image.pixel_data {
            ImagePixelData::Jpeg { data } => {
                let obj_id = builder.objects.len();
                let mut obj_data: Vec<u8> = Vec::new();
                let _ = write!(
                    obj_data,
                    "<< /Type /XObject /Subtype /Image \
                     /Width {} /Height {} \
                     /ColorSpace /DeviceRGB \
                     /BitsPerComponent 8 \
                     /Filter /DCTDecode \
                     /Length {} >>\nstream\n",
                    image.width_px,
                    image.height_px,
                    data.len()
                );
                obj_data.extend_from_slice(data);
                obj_data.extend_from_slice(b"\nendstream");
                builder.objects.push(PdfObject { data: obj_data });
                obj_id
            }
            ImagePixelData::Decoded { rgb, alpha } => {
                let smask_id = alpha.as_ref().map(|alpha| {
                    let compressed = compress_to_vec_zlib(alpha, 6);
                    let id = builder.objects.len();
                    let mut obj_data: Vec<u8> = Vec::new();
                    let _ = write!(
                        obj_data,
                        "<< /Type /XObject /Subtype /Image \
                         /Width {} /Height {} \
                         /ColorSpace /DeviceGray \
                         /BitsPerComponent 8 \
                         /Filter /FlateDecode \
                         /Length {} >>\nstream\n",
                        image.width_px,
                        image.height_px,
                        compressed.len()
                    );
                    obj_data.extend_from_slice(&compressed);
                    obj_data.extend_from_slice(b"\nendstream");
                    builder.objects.push(PdfObject { data: obj_data });
                    id
                });

                let compressed = compress_to_vec_zlib(rgb, 6);
                let obj_id = builder.objects.len();
                let mut obj_data: Vec<u8> = Vec::new();
                let smask_entry = smask_id
                    .map(|id| format!("/SMask {} 0 R ", id))
                    .unwrap_or_default();
                let _ = write!(
                    obj_data,
                    "<< /Type /XObject /Subtype /Image \
                     /Width {} /Height {} \
                     /ColorSpace /DeviceRGB \
                     /BitsPerComponent 8 \
                     {}/Filter /FlateDecode \
                     /Length {} >>\nstream\n",
                    image.width_px,
                    image.height_px,
                    smask_entry,
                    compressed.len()
                );
                obj_data.extend_from_slice(&compressed);
                obj_data.extend_from_slice(b"\nendstream");
                builder.objects.push(PdfObject { data: obj_data });
                obj_id
            }
        }
    }

    /// Build the content stream for the page.
    fn build_content_stream(&self, surface: &Surface, builder: &PdfBuilder) -> String {
        let mut stream = String::new();
        let scale = 1.0 / surface.units_per_point;
        let scaled = (scale - 1.0).abs() > 1e-9;
        if scaled {
            let _ = write!(stream, "q\n{:.6} 0 0 {:.6} 0 0 cm\n", scale, scale);
        }

        let mut image_counter = 0usize;
        for element in &surface.elements {
            self.write_element(
                &mut stream,
                element,
                surface.height,
                builder,
                &mut image_counter,
            );
        }

        if scaled {
            stream.push_str("Q\n");
        }
        stream
    }

    /// Write a single placed element as PDF operators. Coordinates flip
    /// from top-left origin to PDF's bottom-left origin here.
    fn write_element(
        &self,
        stream: &mut String,
        element: &Placed,
        page_height: f64,
        builder: &PdfBuilder,
        image_counter: &mut usize,
    ) {
        match &element.draw {
            Draw::Rect {
                background,
                border_width,
                border_color,
            } => {
                let x = element.x;
                let y = page_height - element.y - element.height;
                let w = element.width;
                let h = element.height;

                if let Some(bg) = background {
                    let _ = write!(
                        stream,
                        "q\n{:.3} {:.3} {:.3} rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
                        bg.r, bg.g, bg.b, x, y, w, h
                    );
                }
                self.write_border_rules(stream, element, page_height, border_width, border_color);
            }

            Draw::Text {
                content,
                font,
                font_size,
                letter_spacing,
                color,
            } => {
                let idx = self.font_index(*font, &builder.fonts);
                let baseline = page_height - element.y - ASCENT * font_size;
                let _ = write!(
                    stream,
                    "BT\n{:.3} {:.3} {:.3} rg\n/F{} {:.2} Tf\n",
                    color.r, color.g, color.b, idx, font_size
                );
                if letter_spacing.abs() > 1e-9 {
                    let _ = write!(stream, "{:.3} Tc\n", letter_spacing);
                }
                let _ = write!(stream, "{:.2} {:.2} Td\n", element.x, baseline);

                let mut text_str = String::new();
                for ch in content.chars() {
                    let b = Self::unicode_to_winansi(ch).unwrap_or(b'?');
                    match b {
                        b'\\' => text_str.push_str("\\\\"),
                        b'(' => text_str.push_str("\\("),
                        b')' => text_str.push_str("\\)"),
                        0x20..=0x7E => text_str.push(b as char),
                        _ => {
                            // Octal escape for bytes outside ASCII printable range
                            let _ = write!(text_str, "\\{:03o}", b);
                        }
                    }
                }
                let _ = write!(stream, "({}) Tj\nET\n", text_str);
            }

            Draw::Image { .. } => {
                let img_idx = *image_counter;
                *image_counter += 1;
                let x = element.x;
                let y = page_height - element.y - element.height;
                let _ = write!(
                    stream,
                    "q\n{:.4} 0 0 {:.4} {:.2} {:.2} cm\n/Im{} Do\nQ\n",
                    element.width, element.height, x, y, img_idx
                );
            }

            Draw::ImagePlaceholder => {
                let x = element.x;
                let y = page_height - element.y - element.height;
                let _ = write!(
                    stream,
                    "q\n0.9 0.9 0.9 rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
                    x, y, element.width, element.height
                );
            }
        }
    }

    /// Border rules are filled rectangles, one per edge with a width.
    fn write_border_rules(
        &self,
        stream: &mut String,
        element: &Placed,
        page_height: f64,
        widths: &Edges,
        color: &Color,
    ) {
        let rules = [
            // (x, y_top, w, h) in top-left coordinates
            (element.x, element.y, element.width, widths.top),
            (
                element.x,
                element.y + element.height - widths.bottom,
                element.width,
                widths.bottom,
            ),
            (element.x, element.y, widths.left, element.height),
            (
                element.x + element.width - widths.right,
                element.y,
                widths.right,
                element.height,
            ),
        ];
        for (x, y_top, w, h) in rules {
            if h <= 0.0 || w <= 0.0 {
                continue;
            }
            let y = page_height - y_top - h;
            let _ = write!(
                stream,
                "q\n{:.3} {:.3} {:.3} rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
                color.r, color.g, color.b, x, y, w, h
            );
        }
    }

    /// Escape special characters in a PDF string.
    fn escape_pdf_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)")
    }

    /// Map a Unicode codepoint to a WinAnsiEncoding byte value.
    ///
    /// WinAnsiEncoding is based on Windows-1252. Most codepoints in
    /// 0x20..=0x7E and 0xA0..=0xFF map directly. The 0x80..=0x9F range
    /// contains special mappings for smart quotes, bullets, dashes, etc.
    fn unicode_to_winansi(ch: char) -> Option<u8> {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
            return Some(cp as u8);
        }
        match cp {
            0x20AC => Some(0x80), // Euro sign
            0x201A => Some(0x82), // Single low-9 quotation mark
            0x0192 => Some(0x83), // Latin small letter f with hook
            0x201E => Some(0x84), // Double low-9 quotation mark
            0x2026 => Some(0x85), // Horizontal ellipsis
            0x2020 => Some(0x86), // Dagger
            0x2021 => Some(0x87), // Double dagger
            0x02C6 => Some(0x88), // Modifier letter circumflex accent
            0x2030 => Some(0x89), // Per mille sign
            0x0160 => Some(0x8A), // Latin capital letter S with caron
            0x2039 => Some(0x8B), // Single left-pointing angle quotation
            0x0152 => Some(0x8C), // Latin capital ligature OE
            0x017D => Some(0x8E), // Latin capital letter Z with caron
            0x2018 => Some(0x91), // Left single quotation mark
            0x2019 => Some(0x92), // Right single quotation mark
            0x201C => Some(0x93), // Left double quotation mark
            0x201D => Some(0x94), // Right double quotation mark
            0x2022 => Some(0x95), // Bullet
            0x2013 => Some(0x96), // En dash
            0x2014 => Some(0x97), // Em dash
            0x02DC => Some(0x98), // Small tilde
            0x2122 => Some(0x99), // Trade mark sign
            0x0161 => Some(0x9A), // Latin small letter s with caron
            0x203A => Some(0x9B), // Single right-pointing angle quotation
            0x0153 => Some(0x9C), // Latin small ligature oe
            0x017E => Some(0x9E), // Latin small letter z with caron
            0x0178 => Some(0x9F), // Latin capital letter Y with diaeresis
            _ => None,
        }
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: Option<usize>) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        // Header
        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let header = format!("{} 0 obj\n", i);
            output.extend_from_slice(header.as_bytes());
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for i in 1..builder.objects.len() {
            let _ = write!(output, "{:010} 00000 n \n", offsets[i]);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R",
            builder.objects.len()
        );
        if let Some(info_id) = info_obj_id {
            let _ = write!(output, " /Info {} 0 R", info_id);
        }
        let _ = write!(output, " >>\nstartxref\n{}\n%%EOF\n", xref_offset);

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_surface() -> Surface {
        Surface {
            width: 595.28,
            height: 841.89,
            units_per_point: 1.0,
            force_color: false,
            pixel_scale: 1.0,
            elements: vec![],
        }
    }

    fn assert_valid_pdf(bytes: &[u8]) {
        assert!(bytes.len() > 50, "PDF too small to be valid");
        assert!(bytes.starts_with(b"%PDF-1.7"), "Missing PDF header");
        assert!(
            bytes.windows(5).any(|w| w == b"%%EOF"),
            "Missing %%EOF marker"
        );
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_escape_pdf_string() {
        assert_eq!(
            PdfWriter::escape_pdf_string("Hello (World)"),
            "Hello \\(World\\)"
        );
        assert_eq!(PdfWriter::escape_pdf_string("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_empty_surface_produces_valid_pdf() {
        let bytes = PdfWriter::new().write(&empty_surface(), &PdfInfo::default());
        assert_valid_pdf(&bytes);
        // The fallback Helvetica font dictionary is present.
        assert!(contains(&bytes, b"/BaseFont /Helvetica"));
    }

    #[test]
    fn test_text_surface_registers_fonts() {
        let mut surface = empty_surface();
        surface.elements.push(Placed {
            x: 40.0,
            y: 40.0,
            width: 100.0,
            height: 12.0,
            draw: Draw::Text {
                content: "GRAND TOTAL".to_string(),
                font: StandardFont::CourierBold,
                font_size: 10.0,
                letter_spacing: 0.0,
                color: Color::BLACK,
            },
        });
        let bytes = PdfWriter::new().write(&surface, &PdfInfo::default());
        assert_valid_pdf(&bytes);
        assert!(contains(&bytes, b"/BaseFont /Courier-Bold"));
    }

    #[test]
    fn test_info_dictionary_written() {
        let info = PdfInfo {
            title: Some("Invoice 100481".to_string()),
            author: Some("EVER GREEN PRODUCE L.L.C".to_string()),
        };
        let bytes = PdfWriter::new().write(&empty_surface(), &info);
        assert!(contains(&bytes, b"/Title (Invoice 100481)"));
    }

    #[test]
    fn test_pixel_surface_keeps_a4_media_box() {
        let mut surface = empty_surface();
        surface.units_per_point = 794.0 / 595.28;
        surface.width = 794.0;
        surface.height = 841.89 * surface.units_per_point;
        let bytes = PdfWriter::new().write(&surface, &PdfInfo::default());
        assert!(contains(&bytes, b"/MediaBox [0 0 595.28 841.89]"));
    }
}
