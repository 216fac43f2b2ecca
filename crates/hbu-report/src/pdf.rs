//! PDF serialization of laid-out documents.
//!
//! Pages use the three standard Helvetica faces, so no font program is
//! embedded. Layout coordinates are millimetres from the top-left corner;
//! PDF user space is points from the bottom-left.

use crate::config::ReportConfig;
use crate::document::Document;
use crate::error::{ReportError, Result};
use crate::layout::{DrawOp, FontStyle, Page};
use crate::metrics::PT_PER_MM;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::debug;

const FONTS: [(FontStyle, &[u8], &[u8]); 3] = [
    (FontStyle::Regular, b"F1", b"Helvetica"),
    (FontStyle::Bold, b"F2", b"Helvetica-Bold"),
    (FontStyle::Oblique, b"F3", b"Helvetica-Oblique"),
];

fn font_name(style: FontStyle) -> Name<'static> {
    match style {
        FontStyle::Regular => Name(b"F1"),
        FontStyle::Bold => Name(b"F2"),
        FontStyle::Oblique => Name(b"F3"),
    }
}

/// WinAnsi (CP-1252) byte for `c`, `?` when it has none.
pub fn winansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8a,
        '‹' => 0x8b,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9a,
        '›' => 0x9b,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        _ => b'?',
    }
}

pub fn encode_winansi(text: &str) -> Vec<u8> {
    text.chars().map(winansi_byte).collect()
}

fn rgb(color: (u8, u8, u8)) -> (f32, f32, f32) {
    (
        color.0 as f32 / 255.0,
        color.1 as f32 / 255.0,
        color.2 as f32 / 255.0,
    )
}

/// Content stream for one page of height `page_height` millimetres.
fn page_content(page: &Page, page_height: f32) -> Vec<u8> {
    let mut content = Content::new();
    for op in &page.ops {
        match op {
            DrawOp::Rect { x, y, w, h, fill } => {
                let (r, g, b) = rgb(*fill);
                content.set_fill_rgb(r, g, b);
                content.rect(
                    x * PT_PER_MM,
                    (page_height - (y + h)) * PT_PER_MM,
                    w * PT_PER_MM,
                    h * PT_PER_MM,
                );
                content.fill_nonzero();
            }
            DrawOp::Text {
                x,
                y,
                text,
                font,
                size,
                color,
            } => {
                let (r, g, b) = rgb(*color);
                content.set_fill_rgb(r, g, b);
                content
                    .begin_text()
                    .set_font(font_name(*font), *size)
                    .next_line(x * PT_PER_MM, (page_height - y) * PT_PER_MM)
                    .show(Str(&encode_winansi(text)))
                    .end_text();
            }
        }
    }
    content.finish()
}

/// Serialize `document` to PDF bytes.
pub fn write_pdf(document: &Document, config: &ReportConfig) -> Result<Vec<u8>> {
    let pages = &document.layout.pages;
    if pages.is_empty() {
        return Err(ReportError::PdfError("document has no pages".to_string()));
    }

    let mut next = 1;
    let mut alloc = || {
        let id = Ref::new(next);
        next += 1;
        id
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();
    let font_ids: Vec<Ref> = FONTS.iter().map(|_| alloc()).collect();
    let page_ids: Vec<Ref> = pages.iter().map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = pages.iter().map(|_| alloc()).collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(pages.len() as i32);

    for ((_, _, base), id) in FONTS.iter().zip(&font_ids) {
        pdf.type1_font(*id)
            .base_font(Name(*base))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    let geometry = &config.page;
    for (i, page) in pages.iter().enumerate() {
        let body = page_content(page, geometry.height);
        if config.compress {
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(body.as_slice(), 6);
            pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
        } else {
            pdf.stream(content_ids[i], &body);
        }

        let mut writer = pdf.page(page_ids[i]);
        writer
            .media_box(Rect::new(
                0.0,
                0.0,
                geometry.width * PT_PER_MM,
                geometry.height * PT_PER_MM,
            ))
            .parent(pages_id)
            .contents(content_ids[i]);
        {
            let mut resources = writer.resources();
            let mut fonts = resources.fonts();
            for ((_, name, _), id) in FONTS.iter().zip(&font_ids) {
                fonts.pair(Name(*name), *id);
            }
            fonts.finish();
        }
        writer.finish();
    }

    let producer = format!("hbu-report {}", env!("CARGO_PKG_VERSION"));
    pdf.document_info(info_id)
        .title(TextStr(&document.title))
        .producer(TextStr(&producer));

    let bytes = pdf.finish();
    debug!(
        pages = pages.len(),
        bytes = bytes.len(),
        compressed = config.compress,
        "pdf serialized"
    );
    Ok(bytes)
}
