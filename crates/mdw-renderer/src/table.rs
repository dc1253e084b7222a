//! Table grid reconciliation.
//!
//! Reconciles a Markdown table's row/column shape into the grid model:
//! row and cell creation is positional and idempotent (never based on
//! content matching), ragged rows grow cells on demand, and no row is ever
//! truncated. The grid gets a fixed overall width with equal-width columns.

use mdw_ast::Inline;

use crate::document::Table;
use crate::inline::render_inline;
use crate::renderer::RenderOptions;
use crate::style::RunStyle;

/// Overall table width in twentieths of a point (6.5" page body).
pub(crate) const TABLE_WIDTH: u32 = 9360;

/// Build the grid for one source table. The header row lands at index 0,
/// body rows follow in order. Header cells are bolded uniformly regardless
/// of their own inline markup.
pub(crate) fn render_table(
    header: &[Vec<Inline>],
    rows: &[Vec<Vec<Inline>>],
    options: &RenderOptions,
) -> Table {
    let columns = std::iter::once(header.len())
        .chain(rows.iter().map(Vec::len))
        .max()
        .unwrap_or(0);
    let mut table = Table::new(TABLE_WIDTH, columns);

    let source_rows = std::iter::once(header).chain(rows.iter().map(Vec::as_slice));
    for (row_index, source_row) in source_rows.enumerate() {
        let base = if row_index == 0 {
            RunStyle::default().with_bold()
        } else {
            RunStyle::default()
        };
        table.row_at(row_index);
        for (column, cell) in source_row.iter().enumerate() {
            let mut children = Vec::new();
            render_inline(cell, &base, options, &mut children);
            table.cell_at(row_index, column).paragraph.children = children;
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cell(s: &str) -> Vec<Inline> {
        vec![Inline::Text(s.to_owned())]
    }

    #[test]
    fn test_two_by_two_table() {
        let header = vec![cell("h1"), cell("h2")];
        let rows = vec![
            vec![cell("a"), cell("b")],
            vec![cell("c"), cell("d")],
        ];
        let table = render_table(&header, &rows, &RenderOptions::default());

        assert_eq!(table.columns, 2);
        assert_eq!(table.rows().len(), 3);
        assert_eq!(table.rows()[1].cells()[0].paragraph.text(), "a");
        assert_eq!(table.rows()[2].cells()[1].paragraph.text(), "d");
    }

    #[test]
    fn test_header_cells_forced_bold() {
        let header = vec![vec![Inline::Emphasis(vec![Inline::Text("h".to_owned())])]];
        let rows = vec![vec![cell("body")]];
        let table = render_table(&header, &rows, &RenderOptions::default());

        for run in table.rows()[0].cells()[0].paragraph.runs() {
            assert!(run.style.bold);
        }
        for run in table.rows()[1].cells()[0].paragraph.runs() {
            assert!(!run.style.bold);
        }
    }

    #[test]
    fn test_header_markup_still_composes() {
        let header = vec![vec![Inline::Emphasis(vec![Inline::Text("h".to_owned())])]];
        let table = render_table(&header, &[], &RenderOptions::default());

        let paragraph = &table.rows()[0].cells()[0].paragraph;
        let run = paragraph.runs().next().expect("one run");
        assert!(run.style.bold && run.style.italic);
    }

    #[test]
    fn test_ragged_rows_grow_cells_on_demand() {
        let header = vec![cell("a")];
        let rows = vec![vec![cell("b"), cell("c"), cell("d")]];
        let table = render_table(&header, &rows, &RenderOptions::default());

        assert_eq!(table.columns, 3);
        // No row truncated: every source cell has a destination.
        assert_eq!(table.rows()[0].cells().len(), 1);
        assert_eq!(table.rows()[1].cells().len(), 3);
        assert_eq!(table.rows()[1].cells()[2].paragraph.text(), "d");
    }

    #[test]
    fn test_output_counts_cover_input() {
        let header = vec![cell("h")];
        let rows = vec![vec![], vec![cell("x"), cell("y")]];
        let table = render_table(&header, &rows, &RenderOptions::default());

        assert!(table.rows().len() >= 1 + rows.len());
        for (index, source_row) in rows.iter().enumerate() {
            assert!(table.rows()[index + 1].cells().len() >= source_row.len());
        }
    }
}
