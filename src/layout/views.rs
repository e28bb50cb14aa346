//! Nested level views over the shared cursor.
//!
//! Every view follows the same `move_next` contract: the first call
//! reports whether the cursor holds an element at all (the cursor
//! already sits on the first child when a view is created), later calls
//! check the enclosing level's boundary before physically advancing the
//! one shared cursor. Child views are created fresh from the current
//! parent element and are single-pass.

use std::cell::RefCell;
use std::rc::Rc;

use crate::layout::cursor::{CursorBackend, LayoutCursor};
use crate::layout::{BlockType, FontInfo, Level, Rect};
use crate::pix::PixBuffer;

/// Wrap a recognized page's flat cursor into the top-level blocks view.
///
/// The backend is positioned on the first element immediately. All
/// views derived from the result share one physical cursor; see the
/// module documentation for the single-pass discipline this imposes.
pub fn get_layout<C: CursorBackend>(backend: C) -> BlocksView<C> {
    let mut cursor = LayoutCursor::new(backend);
    cursor.begin();
    BlocksView {
        core: ViewCore::new(Rc::new(RefCell::new(cursor)), Level::Block),
    }
}

/// Shared mechanics of one level's view: the cursor reference, the
/// level tag, and the per-view first-call flag. The cursor has no
/// per-view memory, so the flag lives here.
struct ViewCore<C: CursorBackend> {
    cursor: Rc<RefCell<LayoutCursor<C>>>,
    level: Level,
    first: bool,
}

impl<C: CursorBackend> ViewCore<C> {
    fn new(cursor: Rc<RefCell<LayoutCursor<C>>>, level: Level) -> Self {
        Self {
            cursor,
            level,
            first: true,
        }
    }

    fn move_next(&mut self) -> bool {
        let mut cursor = self.cursor.borrow_mut();
        if self.first {
            // The cursor already sits on this view's first element.
            self.first = false;
            return cursor.has_element();
        }
        if let Some(parent) = self.level.parent() {
            if cursor.is_at_final_element(parent, self.level) {
                return false;
            }
        }
        cursor.advance(self.level)
    }

    fn text(&self) -> Option<String> {
        self.cursor.borrow().text(self.level)
    }

    fn confidence(&self) -> Option<f32> {
        self.cursor.borrow().confidence(self.level)
    }

    fn bounding_box(&self) -> Option<Rect> {
        self.cursor.borrow().bounding_box(self.level)
    }

    fn binary_image(&self) -> Option<PixBuffer> {
        self.cursor.borrow().element_image(self.level)
    }
}

macro_rules! level_accessors {
    () => {
        /// Advance to this view's next element.
        ///
        /// Returns `true` while an element is available. The first call
        /// reports the element the shared cursor already sits on; later
        /// calls stop at the enclosing level's boundary.
        pub fn move_next(&mut self) -> bool {
            self.core.move_next()
        }

        /// Concatenated text of the current element, if any.
        pub fn text(&self) -> Option<String> {
            self.core.text()
        }

        /// Confidence for the current element as a 0.0–1.0 fraction.
        pub fn confidence(&self) -> Option<f32> {
            self.core.confidence()
        }

        /// Bounding box of the current element. Absence (whitespace,
        /// non-text regions) is an expected outcome, not an error.
        pub fn bounding_box(&self) -> Option<Rect> {
            self.core.bounding_box()
        }

        /// Binarized image crop of the current element, if available.
        pub fn binary_image(&self) -> Option<PixBuffer> {
            self.core.binary_image()
        }
    };
}

/// The blocks of a recognized page. Obtained from [`get_layout`].
pub struct BlocksView<C: CursorBackend> {
    core: ViewCore<C>,
}

impl<C: CursorBackend> BlocksView<C> {
    level_accessors!();

    /// Restart the whole traversal at the first block.
    ///
    /// Child views created before the reset are left desynchronized and
    /// must be discarded.
    pub fn reset(&mut self) {
        self.core.cursor.borrow_mut().reset();
        self.core.first = true;
    }

    /// Classification of the current block.
    pub fn block_type(&self) -> BlockType {
        self.core.cursor.borrow().backend().block_type()
    }

    /// The paragraphs of the current block.
    pub fn paragraphs(&self) -> ParagraphsView<C> {
        ParagraphsView {
            core: ViewCore::new(Rc::clone(&self.core.cursor), Level::Paragraph),
        }
    }
}

/// The paragraphs of one block.
pub struct ParagraphsView<C: CursorBackend> {
    core: ViewCore<C>,
}

impl<C: CursorBackend> ParagraphsView<C> {
    level_accessors!();

    /// The text lines of the current paragraph.
    pub fn text_lines(&self) -> TextLinesView<C> {
        TextLinesView {
            core: ViewCore::new(Rc::clone(&self.core.cursor), Level::TextLine),
        }
    }
}

/// The text lines of one paragraph.
pub struct TextLinesView<C: CursorBackend> {
    core: ViewCore<C>,
}

impl<C: CursorBackend> TextLinesView<C> {
    level_accessors!();

    /// The words of the current text line.
    pub fn words(&self) -> WordsView<C> {
        WordsView {
            core: ViewCore::new(Rc::clone(&self.core.cursor), Level::Word),
        }
    }
}

/// The words of one text line.
pub struct WordsView<C: CursorBackend> {
    core: ViewCore<C>,
}

impl<C: CursorBackend> WordsView<C> {
    level_accessors!();

    /// Whether the current word is numeric.
    pub fn is_numeric(&self) -> bool {
        let cursor = self.core.cursor.borrow();
        cursor.has_element() && cursor.backend().word_is_numeric()
    }

    /// Whether the current word came from the engine's dictionary.
    pub fn is_from_dictionary(&self) -> bool {
        let cursor = self.core.cursor.borrow();
        cursor.has_element() && cursor.backend().word_is_from_dictionary()
    }

    /// Typeface attributes of the current word, if computed.
    pub fn font(&self) -> Option<FontInfo> {
        let cursor = self.core.cursor.borrow();
        if !cursor.has_element() {
            return None;
        }
        cursor.backend().word_font()
    }

    /// The symbols of the current word.
    pub fn symbols(&self) -> SymbolsView<C> {
        SymbolsView {
            core: ViewCore::new(Rc::clone(&self.core.cursor), Level::Symbol),
        }
    }
}

/// The symbols of one word.
pub struct SymbolsView<C: CursorBackend> {
    core: ViewCore<C>,
}

impl<C: CursorBackend> SymbolsView<C> {
    level_accessors!();

    /// Whether the current symbol is superscript.
    pub fn is_superscript(&self) -> bool {
        let cursor = self.core.cursor.borrow();
        cursor.has_element() && cursor.backend().symbol_is_superscript()
    }

    /// Whether the current symbol is subscript.
    pub fn is_subscript(&self) -> bool {
        let cursor = self.core.cursor.borrow();
        cursor.has_element() && cursor.backend().symbol_is_subscript()
    }
}
