//! # PDF Serializer
//!
//! Takes the laid-out pages and writes a PDF 1.7 file.
//!
//! The writer is hand-rolled: the subset of PDF needed for text, lines and
//! filled paths is small, and producing the bytes directly keeps the crate
//! free of a PDF dependency.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (fonts, pages, content streams, etc.)
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! Layout coordinates have their origin at the top-left with y growing down.
//! PDF puts the origin at the bottom-left, so every y is flipped here.
//!
//! Standard fonts are referenced as Type1 with WinAnsiEncoding. Custom
//! TrueType fonts are embedded whole as CIDFontType2 with Identity-H
//! encoding: FontFile2, FontDescriptor, CIDFont, ToUnicode CMap and the
//! Type0 root.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as FmtWrite;
use std::io::Write as IoWrite;

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::error::{RenderError, Result};
use crate::font::{CustomFontMetrics, FontContext, FontRole, ResolvedFont};
use crate::layout::{DrawOp, LayoutPage, Point, TextRun};
use crate::model::Metadata;
use crate::style::Color;

const PRODUCER: &str = concat!("mdpdf ", env!("CARGO_PKG_VERSION"));
const TAB_WIDTH: usize = 4;

#[derive(Debug, Default)]
pub struct PdfWriter;

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    objects: Vec<PdfObject>,
    fonts: Vec<FontEntry>,
}

struct PdfObject {
    data: Vec<u8>,
}

/// A font registered in the document: the role it serves, the object that
/// pages reference, and how its text must be encoded.
struct FontEntry {
    role: FontRole,
    obj_id: usize,
    encoding: TextEncoding,
}

enum TextEncoding {
    /// Single-byte WinAnsi string.
    WinAnsi,
    /// Two-byte glyph IDs.
    Identity(HashMap<char, u16>),
}

impl PdfBuilder {
    fn push(&mut self, data: Vec<u8>) -> usize {
        let id = self.objects.len();
        self.objects.push(PdfObject { data });
        id
    }

    fn push_stream(&mut self, dict_extra: &str, content: &[u8]) -> usize {
        let compressed = compress_to_vec_zlib(content, 6);
        let mut data: Vec<u8> = Vec::new();
        let _ = write!(
            data,
            "<< /Length {}{} /Filter /FlateDecode >>\nstream\n",
            compressed.len(),
            dict_extra
        );
        data.extend_from_slice(&compressed);
        data.extend_from_slice(b"\nendstream");
        self.push(data)
    }

    fn font_for(&self, role: FontRole) -> Option<(usize, &FontEntry)> {
        self.fonts.iter().enumerate().find(|(_, f)| f.role == role)
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write laid-out pages to a PDF byte vector.
    pub fn write(&self, pages: &[LayoutPage], metadata: &Metadata, fonts: &FontContext) -> Result<Vec<u8>> {
        let mut builder = PdfBuilder {
            objects: Vec::new(),
            fonts: Vec::new(),
        };

        // 0 = placeholder (PDF objects are 1-indexed), 1 = Catalog, 2 = Pages.
        builder.push(Vec::new());
        builder.push(Vec::new());
        builder.push(Vec::new());

        self.register_fonts(&mut builder, pages, fonts)?;
        let font_resources = self.build_font_resource_dict(&builder);

        let mut page_obj_ids: Vec<usize> = Vec::new();
        for page in pages {
            let content = self.build_content_stream(page, &builder);
            let content_obj_id = builder.push_stream("", content.as_bytes());

            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << /Font << {} >> >> >>",
                page.width, page.height, content_obj_id, font_resources
            );
            page_obj_ids.push(builder.push(page_dict.into_bytes()));
        }

        builder.objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2].data = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let info_obj_id = builder.push(Self::build_info_dict(metadata).into_bytes());

        log::debug!(
            "serializing {} page(s), {} font(s), {} objects",
            pages.len(),
            builder.fonts.len(),
            builder.objects.len() - 1
        );
        Ok(self.serialize(&builder, info_obj_id))
    }

    /// Write laid-out pages as PDF to `out` and flush it.
    pub fn write_to<W: IoWrite>(
        &self,
        pages: &[LayoutPage],
        metadata: &Metadata,
        fonts: &FontContext,
        out: &mut W,
    ) -> Result<()> {
        let bytes = self.write(pages, metadata, fonts)?;
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(())
    }

    fn build_info_dict(metadata: &Metadata) -> String {
        let mut info = String::from("<< ");
        if let Some(ref title) = metadata.title {
            let _ = write!(info, "/Title {} ", Self::encode_text_string(title));
        }
        if let Some(ref author) = metadata.author {
            let _ = write!(info, "/Author {} ", Self::encode_text_string(author));
        }
        if let Some(ref subject) = metadata.subject {
            let _ = write!(info, "/Subject {} ", Self::encode_text_string(subject));
        }
        let _ = write!(info, "/Producer ({}) /Creator (mdpdf) >>", PRODUCER);
        info
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream(&self, page: &LayoutPage, builder: &PdfBuilder) -> String {
        let mut stream = String::new();
        for op in &page.ops {
            match op {
                DrawOp::Text(run) => self.write_text_run(&mut stream, run, page.height, builder),
                DrawOp::Line {
                    from,
                    to,
                    color,
                    stroke_width,
                } => Self::write_line(&mut stream, *from, *to, *color, *stroke_width, page.height),
                DrawOp::RoundedRect { rect, radius, fill } => {
                    let _ = writeln!(stream, "q\n{:.3} {:.3} {:.3} rg", fill.r, fill.g, fill.b);
                    let y = page.height - rect.y - rect.height;
                    Self::write_rounded_rect(&mut stream, rect.x, y, rect.width, rect.height, *radius);
                    let _ = writeln!(stream, "f\nQ");
                }
            }
        }
        stream
    }

    fn write_text_run(&self, stream: &mut String, run: &TextRun, page_height: f64, builder: &PdfBuilder) {
        if run.text.is_empty() {
            return;
        }
        let Some((idx, font)) = builder.font_for(run.font.role) else {
            log::warn!("no font registered for {:?}; dropping text run", run.font.role);
            return;
        };

        let encoded = match &font.encoding {
            TextEncoding::WinAnsi => format!("({})", Self::encode_winansi(&run.text)),
            TextEncoding::Identity(char_to_gid) => format!("<{}>", Self::encode_identity(&run.text, char_to_gid)),
        };

        let _ = writeln!(
            stream,
            "BT\n/F{} {:.2} Tf\n{:.3} {:.3} {:.3} rg\n{:.2} {:.2} Td\n{} Tj\nET",
            idx,
            run.font.size,
            run.color.r,
            run.color.g,
            run.color.b,
            run.x,
            page_height - run.baseline,
            encoded
        );
    }

    fn write_line(stream: &mut String, from: Point, to: Point, color: Color, width: f64, page_height: f64) {
        let _ = writeln!(
            stream,
            "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ",
            color.r,
            color.g,
            color.b,
            width,
            from.x,
            page_height - from.y,
            to.x,
            page_height - to.y
        );
    }

    /// Append a closed rounded-rectangle path. (x, y) is the bottom-left
    /// corner in PDF space. The radius is clamped to half the shorter side.
    fn write_rounded_rect(stream: &mut String, x: f64, y: f64, w: f64, h: f64, radius: f64) {
        // Bezier control point distance for a quarter circle.
        let k = 0.5522847498;
        let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);

        if r == 0.0 {
            let _ = writeln!(stream, "{:.2} {:.2} {:.2} {:.2} re", x, y, w, h);
            return;
        }

        let _ = writeln!(stream, "{:.2} {:.2} m", x + r, y);
        let _ = writeln!(stream, "{:.2} {:.2} l", x + w - r, y);
        let _ = writeln!(
            stream,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            x + w - r + r * k, y,
            x + w, y + r - r * k,
            x + w, y + r
        );
        let _ = writeln!(stream, "{:.2} {:.2} l", x + w, y + h - r);
        let _ = writeln!(
            stream,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            x + w, y + h - r + r * k,
            x + w - r + r * k, y + h,
            x + w - r, y + h
        );
        let _ = writeln!(stream, "{:.2} {:.2} l", x + r, y + h);
        let _ = writeln!(
            stream,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            x + r - r * k, y + h,
            x, y + h - r + r * k,
            x, y + h - r
        );
        let _ = writeln!(stream, "{:.2} {:.2} l", x, y + r);
        let _ = writeln!(
            stream,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            x, y + r - r * k,
            x + r - r * k, y,
            x + r, y
        );
        let _ = writeln!(stream, "h");
    }

    /// Register one font per role that appears in the pages, in role order.
    fn register_fonts(&self, builder: &mut PdfBuilder, pages: &[LayoutPage], fonts: &FontContext) -> Result<()> {
        let mut used: BTreeSet<FontRole> = BTreeSet::new();
        let mut used_chars: HashMap<FontRole, BTreeSet<char>> = HashMap::new();
        for run in pages.iter().flat_map(|p| p.text_runs()) {
            used.insert(run.font.role);
            used_chars.entry(run.font.role).or_default().extend(run.text.chars());
        }

        // Pages always carry a font resource, even when blank.
        if used.is_empty() {
            used.insert(FontRole::Body);
        }

        for role in used {
            let entry = match fonts.resolve(role) {
                ResolvedFont::Standard(std_font) => {
                    let dict = format!(
                        "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                         /Encoding /WinAnsiEncoding >>",
                        std_font.pdf_name()
                    );
                    FontEntry {
                        role,
                        obj_id: builder.push(dict.into_bytes()),
                        encoding: TextEncoding::WinAnsi,
                    }
                }
                ResolvedFont::Custom { family, data, metrics } => {
                    let chars = used_chars.remove(&role).unwrap_or_default();
                    let char_to_gid: HashMap<char, u16> = chars
                        .iter()
                        .filter_map(|ch| metrics.glyph_ids.get(ch).map(|&gid| (*ch, gid)))
                        .collect();
                    let obj_id = Self::write_custom_font_objects(builder, family, data, metrics, &char_to_gid)?;
                    FontEntry {
                        role,
                        obj_id,
                        encoding: TextEncoding::Identity(char_to_gid),
                    }
                }
            };
            builder.fonts.push(entry);
        }
        Ok(())
    }

    /// Write the 5 CIDFont objects for a custom TrueType font.
    /// Returns the object ID of the Type0 root font dictionary.
    fn write_custom_font_objects(
        builder: &mut PdfBuilder,
        family: &str,
        ttf_data: &[u8],
        metrics: &CustomFontMetrics,
        char_to_gid: &HashMap<char, u16>,
    ) -> Result<usize> {
        let face = ttf_parser::Face::parse(ttf_data, 0)
            .map_err(|e| RenderError::Font(format!("failed to parse font '{family}': {e}")))?;
        let pdf_font_name = Self::sanitize_font_name(family);
        let scale = 1000.0 / metrics.units_per_em as f64;

        // 1. FontFile2
        let fontfile2_id = builder.push_stream(&format!(" /Length1 {}", ttf_data.len()), ttf_data);

        // 2. FontDescriptor
        let bbox = face.global_bounding_box();
        let cap_height = face.capital_height().unwrap_or(metrics.ascender) as f64 * scale;
        let descriptor = format!(
            "<< /Type /FontDescriptor /FontName /{} /Flags 4 \
             /FontBBox [{} {} {} {}] /ItalicAngle 0 \
             /Ascent {} /Descent {} /CapHeight {} /StemV 80 \
             /FontFile2 {} 0 R >>",
            pdf_font_name,
            (bbox.x_min as f64 * scale) as i32,
            (bbox.y_min as f64 * scale) as i32,
            (bbox.x_max as f64 * scale) as i32,
            (bbox.y_max as f64 * scale) as i32,
            (metrics.ascender as f64 * scale) as i32,
            (metrics.descender as f64 * scale) as i32,
            cap_height as i32,
            fontfile2_id,
        );
        let descriptor_id = builder.push(descriptor.into_bytes());

        // 3. CIDFont
        let cidfont = format!(
            "<< /Type /Font /Subtype /CIDFontType2 /BaseFont /{} \
             /CIDSystemInfo << /Registry (Adobe) /Ordering (Identity) /Supplement 0 >> \
             /FontDescriptor {} 0 R /DW {} /W {} /CIDToGIDMap /Identity >>",
            pdf_font_name,
            descriptor_id,
            (metrics.default_advance as f64 * scale) as u32,
            Self::build_w_array(char_to_gid, metrics),
        );
        let cidfont_id = builder.push(cidfont.into_bytes());

        // 4. ToUnicode
        let cmap = Self::build_tounicode_cmap(char_to_gid, &pdf_font_name);
        let tounicode_id = builder.push_stream("", cmap.as_bytes());

        // 5. Type0 root
        let type0 = format!(
            "<< /Type /Font /Subtype /Type0 /BaseFont /{} /Encoding /Identity-H \
             /DescendantFonts [{} 0 R] /ToUnicode {} 0 R >>",
            pdf_font_name, cidfont_id, tounicode_id,
        );
        Ok(builder.push(type0.into_bytes()))
    }

    /// Build the /W array of per-glyph widths: [gid [width] gid [width] ...]
    fn build_w_array(char_to_gid: &HashMap<char, u16>, metrics: &CustomFontMetrics) -> String {
        let scale = 1000.0 / metrics.units_per_em as f64;
        let mut entries: Vec<(u16, u32)> = char_to_gid
            .iter()
            .map(|(ch, &gid)| {
                let advance = metrics.advance_widths.get(ch).copied().unwrap_or(metrics.default_advance);
                (gid, (advance as f64 * scale) as u32)
            })
            .collect();
        entries.sort_by_key(|(gid, _)| *gid);
        entries.dedup_by_key(|(gid, _)| *gid);

        let mut result = String::from("[");
        for (gid, width) in &entries {
            let _ = write!(result, " {} [{}]", gid, width);
        }
        result.push_str(" ]");
        result
    }

    /// Build a ToUnicode CMap so text can be extracted and copied.
    fn build_tounicode_cmap(char_to_gid: &HashMap<char, u16>, font_name: &str) -> String {
        let mut gid_to_unicode: Vec<(u16, u32)> = char_to_gid.iter().map(|(&ch, &gid)| (gid, ch as u32)).collect();
        gid_to_unicode.sort_by_key(|(gid, _)| *gid);

        let mut cmap = String::new();
        cmap.push_str("/CIDInit /ProcSet findresource begin\n12 dict begin\nbegincmap\n");
        cmap.push_str("/CIDSystemInfo\n<< /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
        let _ = writeln!(cmap, "/CMapName /{}-UTF16 def", font_name);
        cmap.push_str("/CMapType 2 def\n1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n");

        // At most 100 entries per bfchar block.
        for chunk in gid_to_unicode.chunks(100) {
            let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
            for &(gid, unicode) in chunk {
                let _ = writeln!(cmap, "<{:04X}> <{:04X}>", gid, unicode);
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
        cmap
    }

    /// Strip everything a PDF name cannot hold.
    fn sanitize_font_name(family: &str) -> String {
        let name: String = family
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if name.is_empty() {
            "CustomFont".to_string()
        } else {
            name
        }
    }

    fn build_font_resource_dict(&self, builder: &PdfBuilder) -> String {
        builder
            .fonts
            .iter()
            .enumerate()
            .map(|(i, font)| format!("/F{} {} 0 R", i, font.obj_id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Escape special characters in a PDF string.
    fn escape_pdf_string(s: &str) -> String {
        s.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)")
    }

    /// Encode a document text string for the Info dictionary.
    ///
    /// ASCII stays a literal string. Anything else becomes a UTF-16BE hex
    /// string with a byte order mark, since readers decode literal Info
    /// strings as PDFDocEncoding.
    fn encode_text_string(s: &str) -> String {
        if s.is_ascii() {
            return format!("({})", Self::escape_pdf_string(s));
        }
        let mut hex = String::from("<FEFF");
        for unit in s.encode_utf16() {
            let _ = write!(hex, "{unit:04X}");
        }
        hex.push('>');
        hex
    }

    /// Encode text as the body of a WinAnsi literal string.
    ///
    /// Tabs expand to spaces, other control characters are dropped, and
    /// characters outside WinAnsi become `?`. Bytes above 0x7E are written
    /// as octal escapes so the content stream stays ASCII.
    fn encode_winansi(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            if ch == '\t' {
                out.push_str(&" ".repeat(TAB_WIDTH));
                continue;
            }
            if ch.is_control() {
                continue;
            }
            match Self::unicode_to_winansi(ch).unwrap_or(b'?') {
                b'\\' => out.push_str("\\\\"),
                b'(' => out.push_str("\\("),
                b')' => out.push_str("\\)"),
                b @ 0x20..=0x7E => out.push(b as char),
                b => {
                    let _ = write!(out, "\\{:03o}", b);
                }
            }
        }
        out
    }

    /// Encode text as hex glyph IDs. Characters the font lacks map to glyph 0.
    fn encode_identity(text: &str, char_to_gid: &HashMap<char, u16>) -> String {
        let mut out = String::with_capacity(text.len() * 4);
        for ch in text.chars() {
            if ch == '\t' {
                let space = char_to_gid.get(&' ').copied().unwrap_or(0);
                for _ in 0..TAB_WIDTH {
                    let _ = write!(out, "{:04X}", space);
                }
                continue;
            }
            if ch.is_control() {
                continue;
            }
            let _ = write!(out, "{:04X}", char_to_gid.get(&ch).copied().unwrap_or(0));
        }
        out
    }

    /// Map a Unicode codepoint to a WinAnsiEncoding byte value.
    ///
    /// WinAnsiEncoding is Windows-1252: 0x20..=0x7E and 0xA0..=0xFF map
    /// directly, 0x80..=0x9F hold smart quotes, bullets, dashes and friends.
    fn unicode_to_winansi(ch: char) -> Option<u8> {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
            return Some(cp as u8);
        }
        match cp {
            0x20AC => Some(0x80), // Euro sign
            0x201A => Some(0x82),
            0x0192 => Some(0x83),
            0x201E => Some(0x84),
            0x2026 => Some(0x85), // Horizontal ellipsis
            0x2020 => Some(0x86),
            0x2021 => Some(0x87),
            0x02C6 => Some(0x88),
            0x2030 => Some(0x89),
            0x0160 => Some(0x8A),
            0x2039 => Some(0x8B),
            0x0152 => Some(0x8C),
            0x017D => Some(0x8E),
            0x2018 => Some(0x91), // Left single quotation mark
            0x2019 => Some(0x92), // Right single quotation mark
            0x201C => Some(0x93), // Left double quotation mark
            0x201D => Some(0x94), // Right double quotation mark
            0x2022 => Some(0x95), // Bullet
            0x2013 => Some(0x96), // En dash
            0x2014 => Some(0x97), // Em dash
            0x02DC => Some(0x98),
            0x2122 => Some(0x99), // Trade mark sign
            0x0161 => Some(0x9A),
            0x203A => Some(0x9B),
            0x0153 => Some(0x9C),
            0x017E => Some(0x9E),
            0x0178 => Some(0x9F),
            _ => None,
        }
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            builder.objects.len(),
            info_obj_id,
            xref_offset
        );

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontSpec;
    use crate::layout::{Rect, Surface};

    fn blank_page() -> LayoutPage {
        LayoutPage::new(595.0, 842.0, 1)
    }

    fn run(text: &str, font: FontSpec) -> TextRun {
        TextRun {
            x: 54.0,
            baseline: 64.0,
            text: text.to_string(),
            font,
            color: Color::BLACK,
        }
    }

    fn write(pages: &[LayoutPage], metadata: &Metadata) -> String {
        let bytes = PdfWriter::new()
            .write(pages, metadata, &FontContext::new())
            .unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Decompress every FlateDecode stream in the file and concatenate them.
    fn content_streams(pdf: &[u8]) -> String {
        let mut out = String::new();
        let mut rest = pdf;
        while let Some(start) = find(rest, b"stream\n") {
            let body = &rest[start + 7..];
            let Some(end) = find(body, b"\nendstream") else { break };
            if let Ok(raw) = miniz_oxide::inflate::decompress_to_vec_zlib(&body[..end]) {
                out.push_str(&String::from_utf8_lossy(&raw));
            }
            rest = &body[end + b"\nendstream".len()..];
        }
        out
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    #[test]
    fn test_escape_pdf_string() {
        assert_eq!(PdfWriter::escape_pdf_string("Hello (World)"), "Hello \\(World\\)");
        assert_eq!(PdfWriter::escape_pdf_string("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_winansi_encoding() {
        assert_eq!(PdfWriter::encode_winansi("a(b)"), "a\\(b\\)");
        assert_eq!(PdfWriter::encode_winansi("\u{2022}"), "\\225");
        assert_eq!(PdfWriter::encode_winansi("caf\u{e9}"), "caf\\351");
        assert_eq!(PdfWriter::encode_winansi("\tx"), "    x");
        assert_eq!(PdfWriter::encode_winansi("\u{4e2d}"), "?");
    }

    #[test]
    fn test_empty_document_produces_valid_pdf() {
        let text = write(&[blank_page()], &Metadata::default());
        assert!(text.starts_with("%PDF-1.7"));
        assert!(text.contains("%%EOF"));
        assert!(text.contains("xref"));
        assert!(text.contains("trailer"));
        assert!(text.contains("/Count 1"));
        assert!(text.contains("/Producer (mdpdf"));
    }

    #[test]
    fn test_metadata_in_pdf() {
        let metadata = Metadata {
            title: Some("Release Notes (draft)".to_string()),
            author: Some("Docs Team".to_string()),
            subject: None,
        };
        let text = write(&[blank_page()], &metadata);
        assert!(text.contains("/Title (Release Notes \\(draft\\))"));
        assert!(text.contains("/Author (Docs Team)"));
        assert!(!text.contains("/Subject"));
    }

    #[test]
    fn test_non_ascii_metadata_is_utf16_hex() {
        let metadata = Metadata {
            title: Some("Café".to_string()),
            author: Some("Docs Team".to_string()),
            subject: Some("札幌 🎉".to_string()),
        };
        let text = write(&[blank_page()], &metadata);
        assert!(text.contains("/Title <FEFF00430061006600E9>"));
        assert!(text.contains("/Author (Docs Team)"));
        // Astral characters go out as a surrogate pair.
        assert!(text.contains("/Subject <FEFF672D5E4C0020D83CDF89>"));
        assert!(!text.contains("Café"));
    }

    #[test]
    fn test_one_font_per_used_role() {
        let mut page = blank_page();
        page.draw_text_run(run("Heading", FontSpec::title(14.0)));
        page.draw_text_run(run("body", FontSpec::body(10.0)));
        page.draw_text_run(run("more body", FontSpec::body(10.0)));
        let text = write(&[page], &Metadata::default());

        assert!(text.contains("/BaseFont /Helvetica-Bold"));
        assert!(text.contains("/BaseFont /Helvetica "));
        assert!(!text.contains("/BaseFont /Courier"));
        assert_eq!(text.matches("/Subtype /Type1").count(), 2);
        assert!(!text.contains("CIDFontType2"));
    }

    #[test]
    fn test_text_is_flipped_to_pdf_space() {
        let mut page = blank_page();
        page.draw_text_run(run("Hi", FontSpec::body(10.0)));
        let bytes = PdfWriter::new()
            .write(&[page], &Metadata::default(), &FontContext::new())
            .unwrap();
        let content = content_streams(&bytes);
        assert!(content.contains("/F0 10.00 Tf"));
        assert!(content.contains("54.00 778.00 Td"));
        assert!(content.contains("(Hi) Tj"));
    }

    #[test]
    fn test_rounded_rect_and_line_ops() {
        let mut page = blank_page();
        page.draw_rounded_rect(
            Rect {
                x: 54.0,
                y: 54.0,
                width: 487.0,
                height: 39.0,
            },
            4.0,
            Color::CODE_BACKGROUND,
        );
        page.draw_line(Point::new(54.0, 100.0), Point::new(541.0, 100.0), Color::LIGHT_GRAY, 1.0);
        let bytes = PdfWriter::new()
            .write(&[page], &Metadata::default(), &FontContext::new())
            .unwrap();
        let content = content_streams(&bytes);

        // Bottom edge at 842 - 54 - 39 = 749, starting one radius in.
        assert!(content.contains("58.00 749.00 m"));
        assert_eq!(content.matches(" c\n").count(), 4);
        assert!(content.contains("f\nQ"));
        assert!(content.contains("54.00 742.00 m\n541.00 742.00 l\nS"));
    }

    #[test]
    fn test_page_count_and_sizes() {
        let pages = vec![
            LayoutPage::new(842.0, 595.0, 1),
            LayoutPage::new(842.0, 595.0, 2),
        ];
        let text = write(&pages, &Metadata::default());
        assert!(text.contains("/Count 2"));
        assert_eq!(text.matches("/MediaBox [0 0 842.00 595.00]").count(), 2);
    }

    #[test]
    fn test_write_to_flushes_into_writer() {
        let mut out: Vec<u8> = Vec::new();
        PdfWriter::new()
            .write_to(&[blank_page()], &Metadata::default(), &FontContext::new(), &mut out)
            .unwrap();
        assert!(out.starts_with(b"%PDF-1.7"));
        assert!(out.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn test_sanitize_font_name() {
        assert_eq!(PdfWriter::sanitize_font_name("Fira Code (Retina)"), "FiraCodeRetina");
        assert_eq!(PdfWriter::sanitize_font_name("   "), "CustomFont");
    }
}
