//! # PDF Serializer
//!
//! Takes the laid-out pages from the layout engine and writes a valid PDF file.
//!
//! This is a from-scratch PDF 1.7 writer. Exam papers only ever use the
//! standard Type1 fonts, straight rules and one kind of box, so the subset
//! of PDF we need is small: a catalog, a page tree, one font object per face
//! actually used, a Flate-compressed content stream per page and an info
//! dictionary.
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
//! Layout coordinates are millimetres from the top-left corner; PDF user
//! space is points from the bottom-left. Conversion happens here and nowhere
//! else.

use std::collections::BTreeSet;
use std::fmt::Write as FmtWrite;
use std::io::Write as IoWrite;

use crate::font::{win_ansi_byte, FontContext, StandardFont};
use crate::layout::{DrawCommand, LayoutElement, LayoutPage};
use crate::model::{non_empty, ExamMeta};
use miniz_oxide::deflate::compress_to_vec_zlib;

/// Points per millimetre.
const PT_PER_MM: f64 = 72.0 / 25.4;

/// Strings written to the PDF info dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub author: Option<String>,
}

impl DocumentInfo {
    /// Title is `"<SUBJECT> <paper name>"`, author is the exam board.
    pub fn from_meta(meta: &ExamMeta) -> Self {
        let subject = non_empty(&meta.subject);
        let title = match (subject, non_empty(&meta.paper_name)) {
            (Some(s), Some(p)) => Some(format!("{} {}", s.to_uppercase(), p)),
            (Some(s), None) => Some(s.to_uppercase()),
            (None, Some(p)) => Some(p.to_string()),
            (None, None) => None,
        };
        Self {
            title,
            subject: subject.map(str::to_string),
            author: non_empty(&meta.board).map(str::to_string),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PdfWriter;

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    objects: Vec<PdfObject>,
    /// Font faces in resource order: `/F0`, `/F1`, ...
    font_objects: Vec<(StandardFont, usize)>,
}

struct PdfObject {
    data: Vec<u8>,
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write laid-out pages to a PDF byte vector.
    pub fn write(&self, pages: &[LayoutPage], info: &DocumentInfo, font_context: &FontContext) -> Vec<u8> {
        let mut builder = PdfBuilder {
            objects: Vec::new(),
            font_objects: Vec::new(),
        };

        // 0 = placeholder (PDF objects are 1-indexed)
        // 1 = Catalog
        // 2 = Pages (page tree root)
        // 3+ = fonts, then content streams and page objects
        for _ in 0..3 {
            builder.objects.push(PdfObject { data: vec![] });
        }

        self.register_fonts(&mut builder, pages, font_context);
        let font_resources = self.build_font_resource_dict(&builder.font_objects);
        let total_pages = pages.len();

        let mut page_obj_ids: Vec<usize> = Vec::new();
        for page in pages {
            let content = self.build_content_stream(page, total_pages, &builder.font_objects, font_context);
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

            let page_obj_id = builder.objects.len();
            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << /Font << {} >> >> >>",
                page.width * PT_PER_MM,
                page.height * PT_PER_MM,
                content_obj_id,
                font_resources
            );
            builder.objects.push(PdfObject {
                data: page_dict.into_bytes(),
            });
            page_obj_ids.push(page_obj_id);
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

        let info_obj_id = builder.objects.len();
        let mut dict = String::from("<< ");
        let entries = [
            ("Title", &info.title),
            ("Subject", &info.subject),
            ("Author", &info.author),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                let _ = write!(dict, "/{} ({}) ", key, encode_text(value));
            }
        }
        dict.push_str("/Producer (Doclin) /Creator (Doclin) >>");
        builder.objects.push(PdfObject {
            data: dict.into_bytes(),
        });

        self.serialize(&builder, info_obj_id)
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream(
        &self,
        page: &LayoutPage,
        total_pages: usize,
        font_objects: &[(StandardFont, usize)],
        font_context: &FontContext,
    ) -> String {
        let mut stream = String::new();
        for element in &page.elements {
            self.write_element(&mut stream, element, page, total_pages, font_objects, font_context);
        }
        stream
    }

    /// Write a single layout element as PDF operators.
    fn write_element(
        &self,
        stream: &mut String,
        element: &LayoutElement,
        page: &LayoutPage,
        total_pages: usize,
        font_objects: &[(StandardFont, usize)],
        font_context: &FontContext,
    ) {
        let x = element.x * PT_PER_MM;
        match &element.draw {
            DrawCommand::Text { text, style, .. } => {
                let text = substitute_placeholders(text, page.number, total_pages);
                let font = font_context.resolve(style.font_style);
                let index = font_objects
                    .iter()
                    .position(|(f, _)| *f == font)
                    .unwrap_or(0);
                let baseline = (page.height - element.y) * PT_PER_MM;
                let _ = writeln!(
                    stream,
                    "BT\n/F{} {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET",
                    index,
                    style.font_size,
                    x,
                    baseline,
                    encode_text(&text)
                );
            }
            DrawCommand::Rule { line_width } => {
                let y = (page.height - element.y) * PT_PER_MM;
                let x2 = (element.x + element.width) * PT_PER_MM;
                let _ = writeln!(
                    stream,
                    "q\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ",
                    line_width * PT_PER_MM,
                    x,
                    y,
                    x2,
                    y
                );
            }
            DrawCommand::Rect { line_width } => {
                let bottom = (page.height - element.y - element.height) * PT_PER_MM;
                let _ = writeln!(
                    stream,
                    "q\n{:.2} w\n{:.2} {:.2} {:.2} {:.2} re\nS\nQ",
                    line_width * PT_PER_MM,
                    x,
                    bottom,
                    element.width * PT_PER_MM,
                    element.height * PT_PER_MM
                );
            }
        }
    }

    /// Register the faces used across all pages, in a stable order.
    fn register_fonts(&self, builder: &mut PdfBuilder, pages: &[LayoutPage], font_context: &FontContext) {
        let mut faces: BTreeSet<StandardFont> = pages
            .iter()
            .flat_map(|page| page.elements.iter())
            .filter_map(|element| match &element.draw {
                DrawCommand::Text { style, .. } => Some(font_context.resolve(style.font_style)),
                _ => None,
            })
            .collect();

        // Always have at least the regular face
        if faces.is_empty() {
            faces.insert(font_context.resolve(Default::default()));
        }

        for face in faces {
            let obj_id = builder.objects.len();
            let font_dict = format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                 /Encoding /WinAnsiEncoding >>",
                face.pdf_name()
            );
            builder.objects.push(PdfObject {
                data: font_dict.into_bytes(),
            });
            builder.font_objects.push((face, obj_id));
        }
    }

    fn build_font_resource_dict(&self, font_objects: &[(StandardFont, usize)]) -> String {
        font_objects
            .iter()
            .enumerate()
            .map(|(i, (_, obj_id))| format!("/F{} {} 0 R", i, obj_id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

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

/// Fill in `{{pageNumber}}` and `{{totalPages}}`.
fn substitute_placeholders(text: &str, page_number: usize, total_pages: usize) -> String {
    if !text.contains("{{") {
        return text.to_string();
    }
    text.replace("{{pageNumber}}", &page_number.to_string())
        .replace("{{totalPages}}", &total_pages.to_string())
}

/// Encode text as the body of a PDF literal string: WinAnsi bytes, with
/// delimiters escaped and non-ASCII bytes written as octal escapes.
fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let byte = match win_ansi_byte(ch) {
            Some(b) => b,
            None => {
                log::warn!("character {:?} (U+{:04X}) has no WinAnsi code, drawing '?'", ch, ch as u32);
                b'?'
            }
        };
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            0x20..=0x7E => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\{:03o}", byte);
            }
        }
    }
    out
}
