//! Recognized-page layout traversal.
//!
//! The native engine exposes recognition results as one flat cursor over
//! leaf elements, annotated with "last child of level L" boundary flags.
//! This module layers the logical five-level hierarchy on top of it:
//! [`get_layout`] wraps a [`CursorBackend`] into a [`BlocksView`], and
//! each level's view hands out child views over the same shared cursor.
//!
//! The traversal is single-pass and cooperative. Iterating a child view
//! advances the one physical cursor that every open view reads; callers
//! must fully consume (or abandon) a child before resuming its parent
//! and must never interleave two independently advancing views. Misuse
//! is not detected — the views silently desynchronize, exactly like the
//! native cursor they wrap.

mod cursor;
mod views;

pub use cursor::{CursorBackend, LayoutCursor};
pub use views::{
    get_layout, BlocksView, ParagraphsView, SymbolsView, TextLinesView, WordsView,
};

use serde::{Deserialize, Serialize};

/// A level of the page layout hierarchy, ordered from coarsest to
/// finest: `Block < Paragraph < TextLine < Word < Symbol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    /// A block of content (text column, image region, table, ...).
    Block,
    /// A paragraph within a block.
    Paragraph,
    /// A line of text within a paragraph.
    TextLine,
    /// A word within a text line.
    Word,
    /// A single glyph within a word.
    Symbol,
}

impl Level {
    /// The enclosing level, or `None` for [`Level::Block`].
    pub const fn parent(self) -> Option<Level> {
        match self {
            Level::Block => None,
            Level::Paragraph => Some(Level::Block),
            Level::TextLine => Some(Level::Paragraph),
            Level::Word => Some(Level::TextLine),
            Level::Symbol => Some(Level::Word),
        }
    }
}

/// Classification of a layout block as reported by the native engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockType {
    /// Flowing text.
    FlowingText,
    /// A heading.
    Heading,
    /// A pull-out or caption.
    Caption,
    /// A table region.
    Table,
    /// A vertical text region.
    VerticalText,
    /// An image region.
    Image,
    /// A horizontal or vertical separator line.
    Separator,
    /// Noise or an unclassified region.
    Unknown,
}

/// An axis-aligned bounding box in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge, inclusive.
    pub x1: i32,
    /// Top edge, inclusive.
    pub y1: i32,
    /// Right edge, exclusive.
    pub x2: i32,
    /// Bottom edge, exclusive.
    pub y2: i32,
}

impl Rect {
    /// Create a rectangle from its corner coordinates.
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Width in pixels.
    pub const fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    /// Height in pixels.
    pub const fn height(&self) -> i32 {
        self.y2 - self.y1
    }
}

/// Typeface attributes of a recognized word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontInfo {
    /// Bold face.
    pub bold: bool,
    /// Italic face.
    pub italic: bool,
    /// Underlined.
    pub underlined: bool,
    /// Fixed-pitch face.
    pub monospace: bool,
    /// Serif face.
    pub serif: bool,
    /// Small-caps face.
    pub smallcaps: bool,
    /// Point size estimated from the image resolution.
    pub point_size: u32,
    /// Engine-internal font identifier.
    pub font_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_total_order() {
        assert!(Level::Block < Level::Paragraph);
        assert!(Level::Paragraph < Level::TextLine);
        assert!(Level::TextLine < Level::Word);
        assert!(Level::Word < Level::Symbol);
    }

    #[test]
    fn test_level_parents() {
        assert_eq!(Level::Block.parent(), None);
        assert_eq!(Level::Symbol.parent(), Some(Level::Word));
        assert_eq!(Level::Paragraph.parent(), Some(Level::Block));
    }

    #[test]
    fn test_rect_extents() {
        let r = Rect::new(10, 20, 30, 25);
        assert_eq!(r.width(), 20);
        assert_eq!(r.height(), 5);
    }

    #[test]
    fn test_serde_shapes() {
        let json = serde_json::to_string(&Level::TextLine).unwrap();
        assert_eq!(json, r#""TextLine""#);
        let rect: Rect = serde_json::from_str(r#"{"x1":0,"y1":1,"x2":2,"y2":3}"#).unwrap();
        assert_eq!(rect, Rect::new(0, 1, 2, 3));
    }
}
