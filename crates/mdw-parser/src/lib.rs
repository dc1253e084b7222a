//! Markdown parsing adapter.
//!
//! Folds the `pulldown-cmark` event stream into the [`mdw_ast`] tree. The
//! adapter never fails: any input yields a (possibly empty) block list.
//! Events with no AST counterpart (footnotes, math, inline HTML, metadata)
//! are dropped.

use mdw_ast::{Block, Inline};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// Parse markdown text into a block tree.
#[must_use]
pub fn parse(markdown: &str) -> Vec<Block> {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(markdown, options);

    let mut builder = TreeBuilder::new();
    for event in parser {
        builder.process(event);
    }
    builder.finish()
}

/// In-progress fenced or indented code block.
struct CodeAccum {
    fenced: bool,
    language: Option<String>,
    content: String,
}

/// In-progress image; inner events are flattened into alt text.
struct ImageAccum {
    src: String,
    alt: String,
}

/// In-progress table.
#[derive(Default)]
struct TableAccum {
    header: Vec<Vec<Inline>>,
    rows: Vec<Vec<Vec<Inline>>>,
    current_row: Vec<Vec<Inline>>,
    in_head: bool,
}

/// In-progress list.
struct ListAccum {
    ordered: bool,
    start: u64,
    items: Vec<Vec<Block>>,
}

/// Folds events into nested blocks.
///
/// Block containers (document, block quotes, list items) are a stack of block
/// buffers; inline marks are a stack of span buffers that wrap into their
/// parent on the matching end event.
struct TreeBuilder {
    /// Block scopes; the bottom entry is the document.
    block_stack: Vec<Vec<Block>>,
    /// Current inline accumulation.
    inline: Vec<Inline>,
    /// Parent span buffers for nested inline marks.
    inline_stack: Vec<Vec<Inline>>,
    /// Destinations of open links.
    link_stack: Vec<String>,
    /// Level of the open heading.
    heading_level: Option<u8>,
    code: Option<CodeAccum>,
    html: Option<String>,
    image: Option<ImageAccum>,
    /// Depth of images nested inside the open image's alt content.
    image_depth: usize,
    table: Option<TableAccum>,
    list_stack: Vec<ListAccum>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            block_stack: vec![Vec::new()],
            inline: Vec::new(),
            inline_stack: Vec::new(),
            link_stack: Vec::new(),
            heading_level: None,
            code: None,
            html: None,
            image: None,
            image_depth: 0,
            table: None,
            list_stack: Vec::new(),
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_pending();
        // Collapse any unbalanced scopes rather than dropping their content.
        while self.block_stack.len() > 1 {
            let orphan = self.block_stack.pop().unwrap_or_default();
            if let Some(parent) = self.block_stack.last_mut() {
                parent.extend(orphan);
            }
        }
        self.block_stack.pop().unwrap_or_default()
    }

    /// Append a finished block to the current scope.
    fn push_block(&mut self, block: Block) {
        if let Some(scope) = self.block_stack.last_mut() {
            scope.push(block);
        }
    }

    /// Wrap loose inline content into a paragraph.
    ///
    /// Tight list items carry their text without paragraph events, so a
    /// sibling block (nested list, quote, code) starting while inline content
    /// is pending means that content forms a paragraph of its own.
    fn flush_pending(&mut self) {
        if !self.inline.is_empty() && self.inline_stack.is_empty() {
            let content = std::mem::take(&mut self.inline);
            self.push_block(Block::Paragraph { content });
        }
    }

    /// Open an inline mark: save the parent span buffer.
    fn open_mark(&mut self) {
        self.inline_stack.push(std::mem::take(&mut self.inline));
    }

    /// Close an inline mark: restore the parent buffer and return the
    /// children accumulated since [`Self::open_mark`].
    fn close_mark(&mut self) -> Vec<Inline> {
        let children = std::mem::take(&mut self.inline);
        self.inline = self.inline_stack.pop().unwrap_or_default();
        children
    }

    fn process(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) => {
                if let Some(buffer) = self.html.as_mut() {
                    buffer.push_str(&html);
                }
            }
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.hard_break(),
            Event::Rule => {
                self.flush_pending();
                self.push_block(Block::ThematicBreak);
            }
            // No AST counterpart.
            Event::InlineHtml(_)
            | Event::FootnoteReference(_)
            | Event::TaskListMarker(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_) => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {}
            Tag::Heading { level, .. } => {
                self.flush_pending();
                self.heading_level = Some(heading_level_to_num(level));
            }
            Tag::BlockQuote(_) => {
                self.flush_pending();
                self.block_stack.push(Vec::new());
            }
            Tag::CodeBlock(kind) => {
                self.flush_pending();
                let (fenced, language) = match kind {
                    CodeBlockKind::Fenced(info) => {
                        let lang = info.into_string();
                        (true, if lang.is_empty() { None } else { Some(lang) })
                    }
                    CodeBlockKind::Indented => (false, None),
                };
                self.code = Some(CodeAccum {
                    fenced,
                    language,
                    content: String::new(),
                });
            }
            Tag::HtmlBlock => {
                self.flush_pending();
                self.html = Some(String::new());
            }
            Tag::List(start) => {
                self.flush_pending();
                self.list_stack.push(ListAccum {
                    ordered: start.is_some(),
                    start: start.unwrap_or(1),
                    items: Vec::new(),
                });
            }
            Tag::Item => {
                self.block_stack.push(Vec::new());
            }
            Tag::Table(_) => {
                self.flush_pending();
                self.table = Some(TableAccum::default());
            }
            Tag::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = true;
                    table.current_row.clear();
                }
            }
            Tag::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.current_row.clear();
                }
            }
            Tag::TableCell => {
                self.inline.clear();
            }
            // Marks inside image alt content flatten into the alt text.
            Tag::Emphasis | Tag::Strong | Tag::Strikethrough => {
                if self.image.is_none() {
                    self.open_mark();
                }
            }
            Tag::Link { dest_url, .. } => {
                if self.image.is_none() {
                    self.link_stack.push(dest_url.into_string());
                    self.open_mark();
                }
            }
            Tag::Image { dest_url, .. } => {
                if self.image.is_some() {
                    self.image_depth += 1;
                } else {
                    self.image = Some(ImageAccum {
                        src: dest_url.into_string(),
                        alt: String::new(),
                    });
                }
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                let content = std::mem::take(&mut self.inline);
                if !content.is_empty() {
                    self.push_block(Block::Paragraph { content });
                }
            }
            TagEnd::Heading(_) => {
                if let Some(level) = self.heading_level.take() {
                    let content = std::mem::take(&mut self.inline);
                    self.push_block(Block::Heading { level, content });
                }
            }
            TagEnd::BlockQuote(_) => {
                self.flush_pending();
                let children = self.block_stack.pop().unwrap_or_default();
                self.push_block(Block::BlockQuote { children });
            }
            TagEnd::CodeBlock => {
                if let Some(code) = self.code.take() {
                    let block = if code.fenced {
                        Block::FencedCodeBlock {
                            language: code.language,
                            literal: code.content,
                        }
                    } else {
                        Block::IndentedCodeBlock {
                            literal: code.content,
                        }
                    };
                    self.push_block(block);
                }
            }
            TagEnd::HtmlBlock => {
                if let Some(literal) = self.html.take() {
                    self.push_block(Block::HtmlBlock { literal });
                }
            }
            TagEnd::List(_) => {
                if let Some(list) = self.list_stack.pop() {
                    let block = if list.ordered {
                        Block::OrderedList {
                            start: list.start,
                            items: list.items,
                        }
                    } else {
                        Block::BulletList { items: list.items }
                    };
                    self.push_block(block);
                }
            }
            TagEnd::Item => {
                self.flush_pending();
                let blocks = self.block_stack.pop().unwrap_or_default();
                if let Some(list) = self.list_stack.last_mut() {
                    list.items.push(blocks);
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.push_block(Block::Table {
                        header: table.header,
                        rows: table.rows,
                    });
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.header = std::mem::take(&mut table.current_row);
                    table.in_head = false;
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.current_row);
                    table.rows.push(row);
                }
            }
            TagEnd::TableCell => {
                let cell = std::mem::take(&mut self.inline);
                if let Some(table) = self.table.as_mut() {
                    table.current_row.push(cell);
                }
            }
            TagEnd::Emphasis => {
                if self.image.is_none() {
                    let children = self.close_mark();
                    self.inline.push(Inline::Emphasis(children));
                }
            }
            TagEnd::Strong => {
                if self.image.is_none() {
                    let children = self.close_mark();
                    self.inline.push(Inline::Strong(children));
                }
            }
            TagEnd::Strikethrough => {
                if self.image.is_none() {
                    let children = self.close_mark();
                    self.inline.push(Inline::Strikethrough(children));
                }
            }
            TagEnd::Link => {
                if self.image.is_none() {
                    let children = self.close_mark();
                    if let Some(destination) = self.link_stack.pop() {
                        self.inline.push(Inline::Link {
                            destination,
                            children,
                        });
                    }
                }
            }
            TagEnd::Image => {
                if self.image_depth > 0 {
                    self.image_depth -= 1;
                } else if let Some(image) = self.image.take() {
                    self.inline.push(Inline::Image {
                        alt: image.alt,
                        src: image.src,
                    });
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(code) = self.code.as_mut() {
            code.content.push_str(text);
        } else if let Some(html) = self.html.as_mut() {
            html.push_str(text);
        } else if let Some(image) = self.image.as_mut() {
            image.alt.push_str(text);
        } else {
            self.inline.push(Inline::Text(text.to_owned()));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if let Some(image) = self.image.as_mut() {
            image.alt.push_str(code);
        } else {
            self.inline.push(Inline::Code(code.to_owned()));
        }
    }

    fn soft_break(&mut self) {
        if let Some(image) = self.image.as_mut() {
            image.alt.push(' ');
        } else {
            self.inline.push(Inline::SoftBreak);
        }
    }

    fn hard_break(&mut self) {
        if let Some(image) = self.image.as_mut() {
            image.alt.push(' ');
        } else {
            self.inline.push(Inline::HardBreak);
        }
    }
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
