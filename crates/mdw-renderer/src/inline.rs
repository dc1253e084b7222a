//! Inline rendering.
//!
//! Walks inline nodes left-to-right and appends minimal styled runs to the
//! caller's buffer. Recursion always *appends* new runs — it never writes
//! into a run owned by the caller — so formatting boundaries stay exact and
//! run order equals source reading order.

use mdw_ast::Inline;

use crate::document::{ParagraphChild, Run, RunMeta};
use crate::renderer::RenderOptions;
use crate::style::RunStyle;

/// Visual color for hyperlink runs (hex RGB).
pub(crate) const LINK_COLOR: &str = "0563C1";

/// Render inline nodes under `style`, appending runs and break markers to
/// `out`.
///
/// Each formatting mark recurses with a new composed style value; the
/// caller's `style` is untouched, so flags never leak to sibling subtrees.
/// Nodes without a specialized handler descend into their children with the
/// unchanged style, preserving their text instead of raising an error.
pub fn render_inline(
    nodes: &[Inline],
    style: &RunStyle,
    options: &RenderOptions,
    out: &mut Vec<ParagraphChild>,
) {
    for node in nodes {
        match node {
            Inline::Text(literal) => {
                out.push(ParagraphChild::Run(Run::new(literal.clone(), style.clone())));
            }
            Inline::Emphasis(children) => {
                render_inline(children, &style.clone().with_italic(), options, out);
            }
            Inline::Strong(children) => {
                render_inline(children, &style.clone().with_bold(), options, out);
            }
            Inline::Underline(children) => {
                render_inline(children, &style.clone().with_underline(), options, out);
            }
            Inline::Code(literal) => {
                let style = style.clone().with_monospace(&options.monospace_font);
                out.push(ParagraphChild::Run(Run::new(literal.clone(), style)));
            }
            Inline::Link {
                destination,
                children,
            } => {
                let style = style.clone().with_underline().with_color(LINK_COLOR);
                let first = out.len();
                render_inline(children, &style, options, out);
                // The label text is the visible content; the destination rides
                // along as an annotation for the sink's relationship wiring.
                for child in &mut out[first..] {
                    if let ParagraphChild::Run(run) = child {
                        run.meta = Some(RunMeta::Hyperlink(destination.clone()));
                    }
                }
            }
            Inline::Image { alt, src } => {
                // Degraded fallback: the alt text stands in for the image,
                // with the source retained for sinks that can embed it.
                let mut run = Run::new(alt.clone(), style.clone());
                run.meta = Some(RunMeta::Image { src: src.clone() });
                out.push(ParagraphChild::Run(run));
            }
            Inline::SoftBreak | Inline::HardBreak => {
                out.push(ParagraphChild::Break);
            }
            // No specialized handler: descend with the unchanged style.
            Inline::Strikethrough(children) => {
                render_inline(children, style, options, out);
            }
        }
    }
}
