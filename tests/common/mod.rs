//! Scripted cursor backend for layout traversal tests.
//!
//! `FlatPage` mimics the native engine's result cursor: a flat list of
//! leaf (symbol) elements, each carrying its index path through the
//! five-level hierarchy. Boundary and text queries are answered by
//! prefix scans over the leaf list, which is exactly the structure the
//! real cursor walks.

use ocrbridge::layout::{BlockType, CursorBackend, FontInfo, Level, Rect};
use ocrbridge::pix::{Depth, PixBuffer};

const LEVELS: usize = 5;

struct Leaf {
    /// Index path: block, paragraph, line, word, symbol.
    path: [usize; LEVELS],
    ch: char,
}

pub struct FlatPage {
    leaves: Vec<Leaf>,
    pos: usize,
}

impl FlatPage {
    /// Build a page from nested blocks → paragraphs → lines → words;
    /// each word's symbols are its characters.
    pub fn from_blocks(blocks: &[&[&[&[&str]]]]) -> Self {
        let mut leaves = Vec::new();
        for (b, paragraphs) in blocks.iter().enumerate() {
            for (p, lines) in paragraphs.iter().enumerate() {
                for (l, words) in lines.iter().enumerate() {
                    for (w, word) in words.iter().enumerate() {
                        for (s, ch) in word.chars().enumerate() {
                            leaves.push(Leaf {
                                path: [b, p, l, w, s],
                                ch,
                            });
                        }
                    }
                }
            }
        }
        Self { leaves, pos: 0 }
    }

    /// A page with no detected text at all.
    pub fn empty() -> Self {
        Self {
            leaves: Vec::new(),
            pos: 0,
        }
    }

    fn prefix(&self, index: usize, level: Level) -> &[usize] {
        &self.leaves[index].path[..=level as usize]
    }

    /// First and one-past-last leaf index of the current element at
    /// `level`.
    fn element_span(&self, level: Level) -> (usize, usize) {
        let mut first = self.pos;
        while first > 0 && self.prefix(first - 1, level) == self.prefix(self.pos, level) {
            first -= 1;
        }
        let mut last = self.pos;
        while last + 1 < self.leaves.len()
            && self.prefix(last + 1, level) == self.prefix(self.pos, level)
        {
            last += 1;
        }
        (first, last + 1)
    }
}

impl CursorBackend for FlatPage {
    fn begin(&mut self) -> bool {
        self.pos = 0;
        !self.leaves.is_empty()
    }

    fn next(&mut self, level: Level) -> bool {
        for j in self.pos + 1..self.leaves.len() {
            if self.prefix(j, level) != self.prefix(self.pos, level) {
                self.pos = j;
                return true;
            }
        }
        false
    }

    fn is_at_final_element(&self, parent: Level, level: Level) -> bool {
        for j in self.pos + 1..self.leaves.len() {
            if self.prefix(j, parent) != self.prefix(self.pos, parent) {
                break;
            }
            if self.prefix(j, level) != self.prefix(self.pos, level) {
                return false;
            }
        }
        true
    }

    fn text(&self, level: Level) -> Option<String> {
        let (first, end) = self.element_span(level);
        let mut out = String::new();
        for j in first..end {
            if j > first {
                let prev = &self.leaves[j - 1].path;
                let cur = &self.leaves[j].path;
                if cur[..2] != prev[..2] {
                    out.push_str("\n\n");
                } else if cur[..3] != prev[..3] {
                    out.push('\n');
                } else if cur[..4] != prev[..4] {
                    out.push(' ');
                }
            }
            out.push(self.leaves[j].ch);
        }
        Some(out)
    }

    fn confidence(&self, _level: Level) -> Option<f32> {
        Some(95.0)
    }

    fn bounding_box(&self, level: Level) -> Option<Rect> {
        let (first, end) = self.element_span(level);
        Some(Rect::new(first as i32 * 10, 0, end as i32 * 10, 16))
    }

    fn element_image(&self, level: Level) -> Option<PixBuffer> {
        let (first, end) = self.element_span(level);
        PixBuffer::new((end - first) as u32 * 8, 16, Depth::One).ok()
    }

    fn block_type(&self) -> BlockType {
        BlockType::FlowingText
    }

    fn word_is_numeric(&self) -> bool {
        let (first, end) = self.element_span(Level::Word);
        self.leaves[first..end].iter().all(|l| l.ch.is_ascii_digit())
    }

    fn word_is_from_dictionary(&self) -> bool {
        let (first, end) = self.element_span(Level::Word);
        end - first > 2 && self.leaves[first..end].iter().all(|l| l.ch.is_alphabetic())
    }

    fn word_font(&self) -> Option<FontInfo> {
        Some(FontInfo {
            point_size: 12,
            serif: true,
            ..FontInfo::default()
        })
    }

    fn symbol_is_superscript(&self) -> bool {
        false
    }

    fn symbol_is_subscript(&self) -> bool {
        self.leaves[self.pos].ch == '_'
    }
}
