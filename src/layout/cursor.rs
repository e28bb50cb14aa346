//! The flat native cursor and its state machine wrapper.

use unicode_normalization::UnicodeNormalization;

use crate::layout::{BlockType, FontInfo, Level, Rect};
use crate::pix::PixBuffer;

/// The native engine's flat result cursor, as seen by this crate.
///
/// A recognized page is a single forward-only sequence of leaf elements
/// annotated with boundary flags at every coarser level; there is no
/// real tree on the native side. Implementations are produced by the
/// host binding from the engine's per-page iterator handle and are
/// assumed to answer promptly and without I/O.
///
/// Absent results (no bounding box for a whitespace region, no text for
/// a non-text block) are `None`, never errors.
pub trait CursorBackend {
    /// Position the cursor on the first leaf element in document order.
    /// Returns `false` when the page has no elements at all; the native
    /// primitive has no separate "is empty" query, so this is the only
    /// place emptiness is observable.
    fn begin(&mut self) -> bool;

    /// Advance to the next element at `level`, crossing any boundary.
    /// Returns `false` when no further element exists at that level.
    fn next(&mut self, level: Level) -> bool;

    /// Whether the current `level` element is the last child of the
    /// current `parent` element.
    fn is_at_final_element(&self, parent: Level, level: Level) -> bool;

    /// Recognized text of the current element at `level`, if any.
    fn text(&self, level: Level) -> Option<String>;

    /// Engine confidence for the current element at `level`, on the
    /// native 0–100 scale.
    fn confidence(&self, level: Level) -> Option<f32>;

    /// Bounding box of the current element at `level`, if the engine
    /// reports one.
    fn bounding_box(&self, level: Level) -> Option<Rect>;

    /// Binarized image crop of the current element at `level`, if
    /// available.
    fn element_image(&self, level: Level) -> Option<PixBuffer>;

    /// Classification of the current block.
    fn block_type(&self) -> BlockType;

    /// Whether the current word is numeric.
    fn word_is_numeric(&self) -> bool;

    /// Whether the current word came from the engine's dictionary.
    fn word_is_from_dictionary(&self) -> bool;

    /// Typeface attributes of the current word, if the engine computed
    /// them.
    fn word_font(&self) -> Option<FontInfo>;

    /// Whether the current symbol is superscript.
    fn symbol_is_superscript(&self) -> bool;

    /// Whether the current symbol is subscript.
    fn symbol_is_subscript(&self) -> bool;
}

/// State machine over a [`CursorBackend`].
///
/// Two states exist per traversal session: `NotStarted` and
/// `Positioned`. [`LayoutCursor::begin`] enters `Positioned` at the
/// first element; advancing never leaves it — exhaustion is only
/// observable relative to an enclosing level via
/// [`LayoutCursor::is_at_final_element`], checked before advancing.
/// The wrapper also records whether `begin` landed on a real element,
/// because the native primitive cannot be asked afterwards.
pub struct LayoutCursor<C: CursorBackend> {
    backend: C,
    started: bool,
    positioned: bool,
}

impl<C: CursorBackend> LayoutCursor<C> {
    /// Wrap a backend without positioning it.
    pub fn new(backend: C) -> Self {
        Self {
            backend,
            started: false,
            positioned: false,
        }
    }

    /// Move to the first element in document order.
    pub fn begin(&mut self) {
        self.positioned = self.backend.begin();
        self.started = true;
    }

    /// Re-enter `begin` semantics, restarting the traversal.
    pub fn reset(&mut self) {
        self.begin();
    }

    /// Whether `begin` has run for the current session.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether the cursor sits on a real element (false before `begin`
    /// and on empty pages).
    pub fn has_element(&self) -> bool {
        self.started && self.positioned
    }

    /// Advance to the next element at `level`. Callers staying inside a
    /// parent scope check [`LayoutCursor::is_at_final_element`] first.
    pub fn advance(&mut self, level: Level) -> bool {
        if !self.started {
            log::warn!("advance({:?}) called before begin", level);
            return false;
        }
        if !self.positioned {
            return false;
        }
        self.backend.next(level)
    }

    /// Whether the current `level` element is the last child of its
    /// enclosing `parent` element.
    pub fn is_at_final_element(&self, parent: Level, level: Level) -> bool {
        if !self.has_element() {
            return true;
        }
        self.backend.is_at_final_element(parent, level)
    }

    /// Text of the current element at `level`, NFC-normalized. Absent
    /// on empty pages and for elements without text.
    pub fn text(&self, level: Level) -> Option<String> {
        if !self.has_element() {
            return None;
        }
        self.backend
            .text(level)
            .map(|t| t.nfc().collect::<String>())
    }

    /// Confidence of the current element at `level` as a 0.0–1.0
    /// fraction (the engine reports 0–100).
    pub fn confidence(&self, level: Level) -> Option<f32> {
        if !self.has_element() {
            return None;
        }
        self.backend.confidence(level).map(|c| c / 100.0)
    }

    /// Bounding box of the current element at `level`, if reported.
    pub fn bounding_box(&self, level: Level) -> Option<Rect> {
        if !self.has_element() {
            return None;
        }
        self.backend.bounding_box(level)
    }

    /// Binarized crop of the current element at `level`, if available.
    pub fn element_image(&self, level: Level) -> Option<PixBuffer> {
        if !self.has_element() {
            return None;
        }
        self.backend.element_image(level)
    }

    /// Direct access to the backend for leaf attribute queries.
    pub(crate) fn backend(&self) -> &C {
        &self.backend
    }
}
