//! The per-cell view the grid hands to the sprite cache.
//!
//! Only the parts of a terminal cell that affect the rasterized glyph live
//! here: the character, its style flags, and its combining marks. Colors,
//! hyperlinks and underline decorations are drawn by other passes and never
//! reach the atlas.

use bitflags::bitflags;

use crate::key::{CombiningMarks, GlyphStyle};

bitflags! {
    /// Cell attribute flags that matter to glyph selection.
    ///
    /// Bit positions match the grid's SGR flags so a grid cell's flags can
    /// be passed through with `from_bits_truncate`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CellFlags: u16 {
        const BOLD              = 1 << 0;
        const ITALIC            = 1 << 2;
        const WIDE_CHAR         = 1 << 8;
        const WIDE_CHAR_SPACER  = 1 << 9;
    }
}

impl Default for CellFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// One visible cell, reduced to what identifies its glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGlyph {
    /// The character stored in this cell.
    pub ch: char,
    /// Attribute flags.
    pub flags: CellFlags,
    /// Combining marks appended to this cell.
    pub marks: CombiningMarks,
}

impl Default for CellGlyph {
    fn default() -> Self {
        Self::new(' ')
    }
}

impl CellGlyph {
    /// A plain cell holding `ch`.
    pub const fn new(ch: char) -> Self {
        Self {
            ch,
            flags: CellFlags::empty(),
            marks: CombiningMarks::NONE,
        }
    }

    /// Same cell with `flags` set.
    #[must_use]
    pub const fn with_flags(self, flags: CellFlags) -> Self {
        Self { flags, ..self }
    }

    /// Append a combining mark (zero-width character) to this cell.
    ///
    /// Marks past the second are dropped.
    pub fn push_zerowidth(&mut self, mark: char) {
        self.marks = self.marks.push(mark);
    }

    /// The glyph style encoded in this cell's flags.
    pub fn style(&self) -> GlyphStyle {
        let mut style = GlyphStyle::empty();
        style.set(GlyphStyle::BOLD, self.flags.contains(CellFlags::BOLD));
        style.set(GlyphStyle::ITALIC, self.flags.contains(CellFlags::ITALIC));
        style
    }
}

#[cfg(test)]
mod tests;
