//! AST-to-document rendering engine.
//!
//! Turns a parsed Markdown tree ([`mdw_ast`]) into an ordered sequence of
//! styled paragraphs, runs, and tables — the [`Document`] model — which a
//! [`DocumentSink`] then serializes into a target container.
//!
//! # Architecture
//!
//! - [`Renderer`] walks the block forest in one pre-order, depth-first pass
//!   and dispatches per block kind.
//! - [`render_inline`] recursively splits inline content into minimal styled
//!   runs; [`RunStyle`] is an immutable value composed on the way down, so
//!   formatting never bleeds between sibling subtrees.
//! - Tables are reconciled positionally into a fixed-width grid
//!   ([`Table::cell_at`] creates rows and cells on demand).
//! - The renderer is maximally permissive on input shape (unknown kinds are
//!   skipped or degraded to text) and strict only at the sink boundary,
//!   where failures carry their underlying cause.
//!
//! # Example
//!
//! ```
//! use mdw_ast::{Block, Inline};
//! use mdw_renderer::{RenderOptions, Renderer};
//!
//! let blocks = vec![Block::Paragraph {
//!     content: vec![Inline::Strong(vec![Inline::Text("hi".to_owned())])],
//! }];
//! let document = Renderer::new(RenderOptions::default()).render(&blocks);
//! assert_eq!(document.blocks().len(), 1);
//! ```

mod document;
mod inline;
mod renderer;
mod sink;
mod style;
mod table;

pub use document::{
    DocBlock, Document, Indent, Paragraph, ParagraphChild, Run, RunMeta, Table, TableCell,
    TableRow,
};
pub use inline::render_inline;
pub use renderer::{RenderOptions, Renderer};
pub use sink::DocumentSink;
pub use style::RunStyle;
