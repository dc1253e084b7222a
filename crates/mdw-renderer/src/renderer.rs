//! Block-level rendering.
//!
//! One pre-order, depth-first pass over the block forest. Each block kind
//! maps to one or more output paragraphs (or a table), populated through the
//! inline renderer. Unrecognized or unsupported shapes are skipped, never
//! fatal; the only conversion failure is a sink failure, which is passed
//! through unchanged.

use mdw_ast::Block;
use tracing::debug;

use crate::document::{Document, Indent, Paragraph, ParagraphChild, Run};
use crate::inline::render_inline;
use crate::sink::DocumentSink;
use crate::style::RunStyle;
use crate::table::render_table;

/// Spacing after headings and thematic breaks, twentieths of a point.
const SPACING_AFTER_HEADING: u32 = 200;
/// Spacing after body paragraphs, twentieths of a point.
const SPACING_AFTER_BODY: u32 = 150;
/// Block quote indentation, twentieths of a point.
const QUOTE_INDENT: Indent = Indent {
    left: 720,
    right: 360,
};
/// Code block font size in half-points (10pt).
const CODE_SIZE: u32 = 20;
/// Literal prefix for bullet list items.
const BULLET: &str = "\u{2022} ";

/// Rendering knobs, typically sourced from `mdw.toml`.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Font family for code blocks and code spans.
    pub monospace_font: String,
    /// Emit named `HeadingN` paragraph styles. When disabled, headings fall
    /// back to manual bold formatting with a fixed size ladder.
    pub named_heading_styles: bool,
    /// Prefix ordered list items with a literal ordinal ("1. ", "2. ", ...).
    pub numbered_ordered_lists: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            monospace_font: "Courier New".to_owned(),
            named_heading_styles: true,
            numbered_ordered_lists: true,
        }
    }
}

/// AST-to-document renderer.
///
/// Stateless apart from its options: each [`Renderer::render`] call produces
/// an independent [`Document`], so converting the same tree twice yields
/// structurally identical output.
#[derive(Debug, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    /// Create a renderer with the given options.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Rendering options in effect.
    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a block forest into a new document.
    #[must_use]
    pub fn render(&self, blocks: &[Block]) -> Document {
        let mut document = Document::new();
        self.render_blocks(blocks, &mut document);
        document
    }

    /// Render and serialize through `sink`. Sink failures are returned with
    /// their underlying cause; the caller discards the partial output.
    pub fn render_into<S: DocumentSink>(
        &self,
        blocks: &[Block],
        sink: &mut S,
    ) -> Result<Document, S::Error> {
        let document = self.render(blocks);
        sink.serialize(&document)?;
        Ok(document)
    }

    fn render_blocks(&self, blocks: &[Block], document: &mut Document) {
        for block in blocks {
            self.render_block(block, document);
        }
    }

    fn render_block(&self, block: &Block, document: &mut Document) {
        match block {
            Block::Heading { level, content } => self.heading(*level, content, document),
            Block::Paragraph { content } => {
                let mut paragraph = Paragraph {
                    spacing_after: Some(SPACING_AFTER_BODY),
                    ..Paragraph::default()
                };
                render_inline(content, &RunStyle::default(), &self.options, &mut paragraph.children);
                document.push_paragraph(paragraph);
            }
            Block::BulletList { items } => {
                for item in items {
                    self.list_item(BULLET, item, document);
                }
            }
            Block::OrderedList { start, items } => {
                for (offset, item) in items.iter().enumerate() {
                    let prefix = if self.options.numbered_ordered_lists {
                        format!("{}. ", start + offset as u64)
                    } else {
                        String::new()
                    };
                    self.list_item(&prefix, item, document);
                }
            }
            Block::FencedCodeBlock { literal, .. } | Block::IndentedCodeBlock { literal } => {
                self.code_block(literal, document);
            }
            Block::BlockQuote { children } => self.block_quote(children, document),
            Block::ThematicBreak => {
                document.push_paragraph(Paragraph {
                    spacing_after: Some(SPACING_AFTER_HEADING),
                    bottom_border: true,
                    ..Paragraph::default()
                });
            }
            Block::Table { header, rows } => {
                document.push_table(render_table(header, rows, &self.options));
            }
            Block::HtmlBlock { .. } => {
                debug!("skipping raw HTML block");
            }
        }
    }

    fn heading(&self, level: u8, content: &[mdw_ast::Inline], document: &mut Document) {
        let mut paragraph = Paragraph {
            spacing_after: Some(SPACING_AFTER_HEADING),
            ..Paragraph::default()
        };
        if self.options.named_heading_styles {
            let level = if (1..=6).contains(&level) { level } else { 1 };
            paragraph.style = Some(format!("Heading{level}"));
            render_inline(content, &RunStyle::default(), &self.options, &mut paragraph.children);
        } else {
            // Manual fallback: bold the whole heading at a ladder size.
            let style = RunStyle::default()
                .with_bold()
                .with_size(heading_ladder_size(level));
            render_inline(content, &style, &self.options, &mut paragraph.children);
        }
        document.push_paragraph(paragraph);
    }

    /// One paragraph per item, prefixed with a literal marker run; nested
    /// block content follows as additional paragraphs in document order.
    fn list_item(&self, prefix: &str, item: &[Block], document: &mut Document) {
        let mut paragraph = Paragraph {
            spacing_after: Some(SPACING_AFTER_BODY),
            ..Paragraph::default()
        };
        if !prefix.is_empty() {
            paragraph.push_run(Run::new(prefix, RunStyle::default()));
        }

        let rest = if let Some((Block::Paragraph { content }, rest)) = item.split_first() {
            render_inline(content, &RunStyle::default(), &self.options, &mut paragraph.children);
            rest
        } else {
            item
        };
        document.push_paragraph(paragraph);
        self.render_blocks(rest, document);
    }

    fn code_block(&self, literal: &str, document: &mut Document) {
        let style = RunStyle::default()
            .with_monospace(&self.options.monospace_font)
            .with_size(CODE_SIZE);
        let mut paragraph = Paragraph {
            spacing_after: Some(SPACING_AFTER_BODY),
            ..Paragraph::default()
        };
        // Verbatim single run; the sink renders internal newlines as breaks.
        paragraph.push_run(Run::new(literal, style));
        document.push_paragraph(paragraph);
    }

    /// One indented paragraph per quote, all inline content forced italic
    /// regardless of its own markup. Nested quotes flatten into the same
    /// paragraph with the same indent.
    fn block_quote(&self, children: &[Block], document: &mut Document) {
        let mut paragraph = Paragraph {
            spacing_after: Some(SPACING_AFTER_BODY),
            indent: Some(QUOTE_INDENT),
            ..Paragraph::default()
        };
        self.quote_content(children, &mut paragraph.children);
        document.push_paragraph(paragraph);
    }

    fn quote_content(&self, blocks: &[Block], out: &mut Vec<ParagraphChild>) {
        let italic = RunStyle::default().with_italic();
        for block in blocks {
            match block {
                Block::Paragraph { content } | Block::Heading { content, .. } => {
                    if !out.is_empty() {
                        out.push(ParagraphChild::Break);
                    }
                    render_inline(content, &italic, &self.options, out);
                }
                Block::BlockQuote { children } => self.quote_content(children, out),
                Block::BulletList { items } | Block::OrderedList { items, .. } => {
                    for item in items {
                        self.quote_content(item, out);
                    }
                }
                _ => {
                    debug!("skipping non-text block inside quote");
                }
            }
        }
    }
}

/// Manual heading sizes in half-points: 24pt, 20pt, 16pt, then 14pt.
fn heading_ladder_size(level: u8) -> u32 {
    match level {
        1 => 48,
        2 => 40,
        3 => 32,
        _ => 28,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocBlock, RunMeta};
    use mdw_ast::Inline;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_owned())
    }

    fn paragraph_at(document: &Document, index: usize) -> &Paragraph {
        match &document.blocks()[index] {
            DocBlock::Paragraph(paragraph) => paragraph,
            DocBlock::Table(_) => panic!("expected a paragraph at {index}"),
        }
    }

    fn table_at(document: &Document, index: usize) -> &crate::document::Table {
        match &document.blocks()[index] {
            DocBlock::Table(table) => table,
            DocBlock::Paragraph(_) => panic!("expected a table at {index}"),
        }
    }

    #[test]
    fn test_heading_uses_named_style() {
        let renderer = Renderer::default();
        for level in 1..=6 {
            let document = renderer.render(&[Block::Heading {
                level,
                content: vec![text("t")],
            }]);
            let paragraph = paragraph_at(&document, 0);
            assert_eq!(paragraph.style.as_deref(), Some(format!("Heading{level}").as_str()));
            assert_eq!(paragraph.spacing_after, Some(200));
        }
    }

    #[test]
    fn test_out_of_range_heading_level_maps_to_heading1() {
        let renderer = Renderer::default();
        for level in [0, 7, 99] {
            let document = renderer.render(&[Block::Heading {
                level,
                content: vec![text("t")],
            }]);
            assert_eq!(paragraph_at(&document, 0).style.as_deref(), Some("Heading1"));
        }
    }

    #[test]
    fn test_heading_fallback_ladder() {
        let renderer = Renderer::new(RenderOptions {
            named_heading_styles: false,
            ..RenderOptions::default()
        });
        for (level, size) in [(1, 48), (2, 40), (3, 32), (4, 28), (6, 28), (9, 28)] {
            let document = renderer.render(&[Block::Heading {
                level,
                content: vec![text("t")],
            }]);
            let paragraph = paragraph_at(&document, 0);
            assert_eq!(paragraph.style, None);
            let run = paragraph.runs().next().expect("one run");
            assert!(run.style.bold);
            assert_eq!(run.style.size, Some(size));
        }
    }

    #[test]
    fn test_scenario_title_and_bold_word() {
        // "# Title\n\nHello **world**."
        let blocks = vec![
            Block::Heading {
                level: 1,
                content: vec![text("Title")],
            },
            Block::Paragraph {
                content: vec![text("Hello "), Inline::Strong(vec![text("world")]), text(".")],
            },
        ];
        let document = Renderer::default().render(&blocks);

        let heading = paragraph_at(&document, 0);
        assert_eq!(heading.style.as_deref(), Some("Heading1"));
        assert_eq!(heading.text(), "Title");

        let body = paragraph_at(&document, 1);
        assert_eq!(body.text(), "Hello world.");
        assert_eq!(body.spacing_after, Some(150));
        let bold: Vec<bool> = body.runs().map(|run| run.style.bold).collect();
        assert_eq!(bold, vec![false, true, false]);
    }

    #[test]
    fn test_scenario_table() {
        // 2x2 markdown table with a header row.
        let blocks = vec![Block::Table {
            header: vec![vec![text("h1")], vec![text("h2")]],
            rows: vec![
                vec![vec![text("a")], vec![text("b")]],
                vec![vec![text("c")], vec![text("d")]],
            ],
        }];
        let document = Renderer::default().render(&blocks);
        assert_eq!(document.blocks().len(), 1);

        let table = table_at(&document, 0);
        assert_eq!(table.columns, 2);
        assert_eq!(table.rows().len(), 3);
        for cell in table.rows()[0].cells() {
            for run in cell.paragraph.runs() {
                assert!(run.style.bold);
            }
        }
        for row in &table.rows()[1..] {
            for cell in row.cells() {
                for run in cell.paragraph.runs() {
                    assert!(!run.style.bold);
                }
            }
        }
    }

    #[test]
    fn test_scenario_code_block_verbatim() {
        let literal = "fn main() {\n    body();\n}\n";
        let document = Renderer::default().render(&[Block::FencedCodeBlock {
            language: Some("rust".to_owned()),
            literal: literal.to_owned(),
        }]);

        let paragraph = paragraph_at(&document, 0);
        assert_eq!(paragraph.children.len(), 1);
        let run = paragraph.runs().next().expect("one run");
        assert_eq!(run.text, literal);
        assert!(run.style.monospace);
        assert_eq!(run.style.size, Some(20));
        assert_eq!(run.style.font.as_deref(), Some("Courier New"));
    }

    #[test]
    fn test_indented_code_block_matches_fenced_formatting() {
        let document = Renderer::default().render(&[Block::IndentedCodeBlock {
            literal: "x\n".to_owned(),
        }]);
        let run = paragraph_at(&document, 0).runs().next().expect("one run");
        assert!(run.style.monospace);
    }

    #[test]
    fn test_scenario_nested_bullet_list_order() {
        let blocks = vec![Block::BulletList {
            items: vec![
                vec![
                    Block::Paragraph {
                        content: vec![text("parent")],
                    },
                    Block::BulletList {
                        items: vec![vec![Block::Paragraph {
                            content: vec![text("child")],
                        }]],
                    },
                ],
                vec![Block::Paragraph {
                    content: vec![text("sibling")],
                }],
            ],
        }];
        let document = Renderer::default().render(&blocks);

        let texts: Vec<String> = (0..document.blocks().len())
            .map(|index| paragraph_at(&document, index).text())
            .collect();
        assert_eq!(
            texts,
            vec!["\u{2022} parent", "\u{2022} child", "\u{2022} sibling"]
        );
    }

    #[test]
    fn test_bullet_prefix_is_plain_first_run() {
        let document = Renderer::default().render(&[Block::BulletList {
            items: vec![vec![Block::Paragraph {
                content: vec![Inline::Strong(vec![text("item")])],
            }]],
        }]);
        let paragraph = paragraph_at(&document, 0);
        let runs: Vec<&Run> = paragraph.runs().collect();
        assert_eq!(runs[0].text, "\u{2022} ");
        assert!(!runs[0].style.bold);
        assert!(runs[1].style.bold);
    }

    #[test]
    fn test_ordered_list_counts_from_start() {
        let items = vec![
            vec![Block::Paragraph {
                content: vec![text("x")],
            }],
            vec![Block::Paragraph {
                content: vec![text("y")],
            }],
        ];
        let document = Renderer::default().render(&[Block::OrderedList {
            start: 3,
            items: items.clone(),
        }]);
        assert_eq!(paragraph_at(&document, 0).text(), "3. x");
        assert_eq!(paragraph_at(&document, 1).text(), "4. y");

        let plain = Renderer::new(RenderOptions {
            numbered_ordered_lists: false,
            ..RenderOptions::default()
        })
        .render(&[Block::OrderedList { start: 3, items }]);
        assert_eq!(paragraph_at(&plain, 0).text(), "x");
    }

    #[test]
    fn test_block_quote_forces_italic_and_indents() {
        let blocks = vec![Block::BlockQuote {
            children: vec![Block::Paragraph {
                content: vec![text("quoted "), Inline::Strong(vec![text("loud")])],
            }],
        }];
        let document = Renderer::default().render(&blocks);

        let paragraph = paragraph_at(&document, 0);
        assert_eq!(paragraph.indent, Some(Indent { left: 720, right: 360 }));
        assert_eq!(paragraph.spacing_after, Some(150));
        for run in paragraph.runs() {
            assert!(run.style.italic);
        }
        // Own markup still composes on top of the forced italic.
        let runs: Vec<&Run> = paragraph.runs().collect();
        assert!(runs[1].style.bold);
    }

    #[test]
    fn test_nested_quote_flattens_without_extra_indent() {
        let blocks = vec![Block::BlockQuote {
            children: vec![
                Block::Paragraph {
                    content: vec![text("outer")],
                },
                Block::BlockQuote {
                    children: vec![Block::Paragraph {
                        content: vec![text("inner")],
                    }],
                },
            ],
        }];
        let document = Renderer::default().render(&blocks);

        assert_eq!(document.blocks().len(), 1);
        let paragraph = paragraph_at(&document, 0);
        assert_eq!(paragraph.text(), "outerinner");
        assert_eq!(paragraph.indent, Some(Indent { left: 720, right: 360 }));
    }

    #[test]
    fn test_thematic_break_paragraph() {
        let document = Renderer::default().render(&[Block::ThematicBreak]);
        let paragraph = paragraph_at(&document, 0);
        assert!(paragraph.bottom_border);
        assert!(paragraph.children.is_empty());
        assert_eq!(paragraph.spacing_after, Some(200));
    }

    #[test]
    fn test_html_block_is_skipped() {
        let document = Renderer::default().render(&[Block::HtmlBlock {
            literal: "<div></div>".to_owned(),
        }]);
        assert!(document.is_empty());
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let blocks = vec![
            Block::Heading {
                level: 2,
                content: vec![text("h")],
            },
            Block::Paragraph {
                content: vec![Inline::Link {
                    destination: "https://example.com".to_owned(),
                    children: vec![text("link")],
                }],
            },
            Block::Table {
                header: vec![vec![text("a")]],
                rows: vec![vec![vec![text("b")]]],
            },
        ];
        let renderer = Renderer::default();
        assert_eq!(renderer.render(&blocks), renderer.render(&blocks));
    }

    #[test]
    fn test_link_annotation_survives_block_rendering() {
        let document = Renderer::default().render(&[Block::Paragraph {
            content: vec![Inline::Link {
                destination: "https://example.com".to_owned(),
                children: vec![text("label")],
            }],
        }]);
        let run = paragraph_at(&document, 0).runs().next().expect("one run");
        assert_eq!(
            run.meta,
            Some(RunMeta::Hyperlink("https://example.com".to_owned()))
        );
        assert_eq!(run.text, "label");
    }

    #[derive(Debug, thiserror::Error)]
    #[error("sink unavailable")]
    struct SinkDown;

    struct FailingSink;

    impl DocumentSink for FailingSink {
        type Error = SinkDown;

        fn serialize(&mut self, _document: &Document) -> Result<(), Self::Error> {
            Err(SinkDown)
        }
    }

    #[test]
    fn test_sink_failure_propagates() {
        let result = Renderer::default().render_into(
            &[Block::Paragraph {
                content: vec![text("x")],
            }],
            &mut FailingSink,
        );
        assert!(result.is_err());
    }
}
