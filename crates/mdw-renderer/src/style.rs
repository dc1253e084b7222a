//! Run-level style state.

/// Composed inline formatting flags active at a point of the traversal.
///
/// An immutable value: descending into a formatting mark composes a *new*
/// style with the `with_*` helpers and passes it down by value, so a sibling
/// subtree never observes flags set inside a preceding subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStyle {
    /// Bold.
    pub bold: bool,
    /// Italic.
    pub italic: bool,
    /// Underline.
    pub underline: bool,
    /// Monospace (code) formatting.
    pub monospace: bool,
    /// Hex RGB color override without a leading `#`, e.g. `0563C1`.
    pub color: Option<String>,
    /// Font size in half-points.
    pub size: Option<u32>,
    /// Explicit font family.
    pub font: Option<String>,
}

impl RunStyle {
    /// Style with bold set.
    #[must_use]
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Style with italic set.
    #[must_use]
    pub fn with_italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Style with underline set.
    #[must_use]
    pub fn with_underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Style with monospace set and the font fixed to `font`.
    #[must_use]
    pub fn with_monospace(mut self, font: &str) -> Self {
        self.monospace = true;
        self.font = Some(font.to_owned());
        self
    }

    /// Style with a color override.
    #[must_use]
    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_owned());
        self
    }

    /// Style with an explicit size in half-points.
    #[must_use]
    pub fn with_size(mut self, half_points: u32) -> Self {
        self.size = Some(half_points);
        self
    }
}
