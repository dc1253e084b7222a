//! `word/document.xml` serialization.
//!
//! Hand-written WordprocessingML: paragraphs with style/spacing/indent/border
//! properties, runs with bold/italic/underline/font/size/color, hyperlink
//! wrappers referencing external relationships, and fixed-width tables.
//! Literal newlines in run text become `w:br` elements so code blocks keep
//! their line structure byte-for-byte in visible text.

use std::fmt::Write;

use mdw_renderer::{DocBlock, Document, Paragraph, ParagraphChild, Run, RunMeta, RunStyle, Table};
use quick_xml::escape::escape;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Distinct hyperlink targets in document order. The relationship id of a
/// target is its position here plus two (`rId1` is the styles part).
pub(crate) fn collect_hyperlinks(document: &Document) -> Vec<String> {
    let mut targets: Vec<String> = Vec::new();
    let mut visit = |run: &Run| {
        if let Some(RunMeta::Hyperlink(url)) = &run.meta
            && !targets.iter().any(|t| t == url)
        {
            targets.push(url.clone());
        }
    };
    for block in document.blocks() {
        match block {
            DocBlock::Paragraph(paragraph) => paragraph.runs().for_each(&mut visit),
            DocBlock::Table(table) => {
                for row in table.rows() {
                    for cell in row.cells() {
                        cell.paragraph.runs().for_each(&mut visit);
                    }
                }
            }
        }
    }
    targets
}

/// Serialize the document body.
pub(crate) fn document_xml(document: &Document, hyperlinks: &[String]) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(out, r#"<w:document xmlns:w="{W_NS}" xmlns:r="{R_NS}"><w:body>"#)
        .expect("writing to a String cannot fail");

    for block in document.blocks() {
        match block {
            DocBlock::Paragraph(paragraph) => write_paragraph(paragraph, hyperlinks, &mut out),
            DocBlock::Table(table) => write_table(table, hyperlinks, &mut out),
        }
    }
    // The body must end with a paragraph, not a table.
    if let Some(DocBlock::Table(_)) = document.blocks().last() {
        out.push_str("<w:p/>");
    }

    out.push_str(concat!(
        r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/>"#,
        r#"<w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440"/></w:sectPr>"#,
    ));
    out.push_str("</w:body></w:document>");
    out
}

fn write_paragraph(paragraph: &Paragraph, hyperlinks: &[String], out: &mut String) {
    out.push_str("<w:p>");
    write_paragraph_properties(paragraph, out);

    let children = &paragraph.children;
    let mut index = 0;
    while index < children.len() {
        match &children[index] {
            ParagraphChild::Break => {
                out.push_str("<w:r><w:br/></w:r>");
                index += 1;
            }
            ParagraphChild::Run(run) => {
                if let Some(RunMeta::Hyperlink(url)) = &run.meta {
                    let rid = hyperlink_rid(hyperlinks, url);
                    write!(out, r#"<w:hyperlink r:id="rId{rid}">"#)
                        .expect("writing to a String cannot fail");
                    // Consecutive runs of the same link share one wrapper.
                    while let Some(ParagraphChild::Run(run)) = children.get(index) {
                        match &run.meta {
                            Some(RunMeta::Hyperlink(next)) if next == url => {
                                write_run(run, out);
                                index += 1;
                            }
                            _ => break,
                        }
                    }
                    out.push_str("</w:hyperlink>");
                } else {
                    write_run(run, out);
                    index += 1;
                }
            }
        }
    }
    out.push_str("</w:p>");
}

fn hyperlink_rid(hyperlinks: &[String], url: &str) -> usize {
    hyperlinks.iter().position(|t| t == url).map_or(1, |p| p + 2)
}

fn write_paragraph_properties(paragraph: &Paragraph, out: &mut String) {
    if paragraph.style.is_none()
        && paragraph.spacing_after.is_none()
        && paragraph.indent.is_none()
        && !paragraph.bottom_border
    {
        return;
    }
    out.push_str("<w:pPr>");
    if let Some(style) = &paragraph.style {
        write!(out, r#"<w:pStyle w:val="{}"/>"#, escape(style.as_str()))
            .expect("writing to a String cannot fail");
    }
    if paragraph.bottom_border {
        out.push_str(
            r#"<w:pBdr><w:bottom w:val="single" w:sz="6" w:space="1" w:color="auto"/></w:pBdr>"#,
        );
    }
    if let Some(after) = paragraph.spacing_after {
        write!(out, r#"<w:spacing w:after="{after}"/>"#).expect("writing to a String cannot fail");
    }
    if let Some(indent) = paragraph.indent {
        write!(
            out,
            r#"<w:ind w:left="{}" w:right="{}"/>"#,
            indent.left, indent.right
        )
        .expect("writing to a String cannot fail");
    }
    out.push_str("</w:pPr>");
}

fn write_run(run: &Run, out: &mut String) {
    out.push_str("<w:r>");
    write_run_properties(&run.style, out);
    let mut segments = run.text.split('\n');
    if let Some(first) = segments.next() {
        write_text(first, out);
    }
    for segment in segments {
        out.push_str("<w:br/>");
        write_text(segment, out);
    }
    out.push_str("</w:r>");
}

fn write_text(text: &str, out: &mut String) {
    if text.is_empty() {
        return;
    }
    write!(out, r#"<w:t xml:space="preserve">{}</w:t>"#, escape(text))
        .expect("writing to a String cannot fail");
}

fn write_run_properties(style: &RunStyle, out: &mut String) {
    if !style.bold
        && !style.italic
        && !style.underline
        && style.color.is_none()
        && style.size.is_none()
        && style.font.is_none()
    {
        return;
    }
    out.push_str("<w:rPr>");
    if let Some(font) = &style.font {
        let font = escape(font.as_str());
        write!(out, r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}"/>"#)
            .expect("writing to a String cannot fail");
    }
    if style.bold {
        out.push_str("<w:b/>");
    }
    if style.italic {
        out.push_str("<w:i/>");
    }
    if let Some(color) = &style.color {
        write!(out, r#"<w:color w:val="{}"/>"#, escape(color.as_str()))
            .expect("writing to a String cannot fail");
    }
    if let Some(size) = style.size {
        write!(out, r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#)
            .expect("writing to a String cannot fail");
    }
    if style.underline {
        out.push_str(r#"<w:u w:val="single"/>"#);
    }
    out.push_str("</w:rPr>");
}

fn write_table(table: &Table, hyperlinks: &[String], out: &mut String) {
    let column_width = if table.columns > 0 {
        table.width / u32::try_from(table.columns).unwrap_or(1)
    } else {
        table.width
    };

    out.push_str("<w:tbl>");
    write!(out, r#"<w:tblPr><w:tblW w:w="{}" w:type="dxa"/>"#, table.width)
        .expect("writing to a String cannot fail");
    out.push_str(concat!(
        r#"<w:tblBorders>"#,
        r#"<w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
        r#"<w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
        r#"<w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
        r#"<w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
        r#"<w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
        r#"<w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
        r#"</w:tblBorders></w:tblPr>"#,
    ));

    out.push_str("<w:tblGrid>");
    for _ in 0..table.columns {
        write!(out, r#"<w:gridCol w:w="{column_width}"/>"#)
            .expect("writing to a String cannot fail");
    }
    out.push_str("</w:tblGrid>");

    for row in table.rows() {
        out.push_str("<w:tr>");
        if row.cells().is_empty() {
            // A row requires at least one cell.
            write!(
                out,
                r#"<w:tc><w:tcPr><w:tcW w:w="{column_width}" w:type="dxa"/></w:tcPr><w:p/></w:tc>"#
            )
            .expect("writing to a String cannot fail");
        }
        for cell in row.cells() {
            out.push_str("<w:tc>");
            write!(out, r#"<w:tcPr><w:tcW w:w="{column_width}" w:type="dxa"/></w:tcPr>"#)
                .expect("writing to a String cannot fail");
            write_paragraph(&cell.paragraph, hyperlinks, out);
            out.push_str("</w:tc>");
        }
        out.push_str("</w:tr>");
    }
    out.push_str("</w:tbl>");
}
