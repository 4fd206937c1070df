//! Rendering keys: the identity of one glyph appearance in the atlas.
//!
//! A key packs the character and its bold/italic bits into a single `u32`
//! glyph word, carries up to two combining marks in a `u64`, and flags the
//! right half of a wide character (which is rasterized as its own sprite).
//! Two keys that compare equal always render to identical pixels.

use bitflags::bitflags;

use crate::cell::{CellFlags, CellGlyph};

/// Mask selecting the Unicode scalar value from a glyph word.
pub const CHAR_MASK: u32 = 0x1F_FFFF;

/// Bit offset of the style attributes within a glyph word.
pub const STYLE_SHIFT: u32 = 21;

/// Number of combining marks a key can carry.
pub const MAX_MARKS: usize = 2;

bitflags! {
    /// Style attributes that change a glyph's rasterized shape.
    ///
    /// Stored unshifted here; `RenderingKey` embeds them at `STYLE_SHIFT`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GlyphStyle: u8 {
        const BOLD   = 1 << 0;
        const ITALIC = 1 << 1;
    }
}

impl Default for GlyphStyle {
    fn default() -> Self {
        Self::empty()
    }
}

/// Up to two combining marks packed into one word, low mark first.
///
/// Each mark occupies 32 bits; a zero half means "no mark". Marks beyond
/// the second are dropped, matching what the rasterizer can stack in a
/// single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CombiningMarks(u64);

impl CombiningMarks {
    pub const NONE: Self = Self(0);

    /// Pack the first `MAX_MARKS` characters of `marks`.
    pub fn from_chars(marks: &[char]) -> Self {
        let mut packed = Self::NONE;
        for &mark in marks.iter().take(MAX_MARKS) {
            packed = packed.push(mark);
        }
        packed
    }

    /// Build from a raw packed word (as stored by the cell grid).
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw packed word.
    pub const fn raw(self) -> u64 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Append a mark into the first free half. Full sets are returned unchanged.
    pub fn push(self, mark: char) -> Self {
        let mark = u64::from(u32::from(mark));
        if self.0 & 0xFFFF_FFFF == 0 {
            Self(self.0 | mark)
        } else if self.0 >> 32 == 0 {
            Self(self.0 | (mark << 32))
        } else {
            self
        }
    }

    /// Iterate the marks in the order they were pushed.
    pub fn iter(self) -> impl Iterator<Item = char> {
        [self.0 as u32, (self.0 >> 32) as u32]
            .into_iter()
            .filter(|&half| half != 0)
            .filter_map(char::from_u32)
    }
}

/// Identity of a unique glyph appearance.
///
/// Equality covers all three parts: glyph word (character + style),
/// combining marks, and the wide-character half flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderingKey {
    glyph: u32,
    marks: CombiningMarks,
    second_half: bool,
}

impl RenderingKey {
    /// Key for `ch` drawn with `style`, no marks, left half.
    pub fn new(ch: char, style: GlyphStyle) -> Self {
        Self {
            glyph: u32::from(ch) | (u32::from(style.bits()) << STYLE_SHIFT),
            marks: CombiningMarks::NONE,
            second_half: false,
        }
    }

    /// Same key with the given combining marks.
    #[must_use]
    pub fn with_marks(self, marks: CombiningMarks) -> Self {
        Self { marks, ..self }
    }

    /// Same key, marking it as the right half of a wide character.
    #[must_use]
    pub fn as_second_half(self) -> Self {
        Self {
            second_half: true,
            ..self
        }
    }

    /// Key for the glyph shown in `cell`.
    ///
    /// When the preceding cell holds a wide character, `cell` is its spacer
    /// and displays the wide glyph's right half: the key is built from the
    /// previous cell's character and style, without marks.
    pub fn for_cell(cell: &CellGlyph, previous: Option<&CellGlyph>) -> Self {
        match previous {
            Some(prev) if prev.flags.contains(CellFlags::WIDE_CHAR) => {
                Self::new(prev.ch, prev.style()).as_second_half()
            }
            _ => Self::new(cell.ch, cell.style()).with_marks(cell.marks),
        }
    }

    /// The base character.
    pub fn ch(self) -> char {
        char::from_u32(self.glyph & CHAR_MASK).unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    /// The embedded style bits.
    pub fn style(self) -> GlyphStyle {
        GlyphStyle::from_bits_truncate((self.glyph >> STYLE_SHIFT) as u8)
    }

    /// Character and style bits as one word.
    pub const fn glyph_word(self) -> u32 {
        self.glyph
    }

    pub const fn marks(self) -> CombiningMarks {
        self.marks
    }

    pub const fn is_second_half(self) -> bool {
        self.second_half
    }

    /// Bucket index in the slot table.
    ///
    /// Bits 0-7 are the low byte of the character, bit 8 is BOLD and bit 9
    /// is ITALIC. Printable ASCII in any style combination therefore maps to
    /// distinct buckets. Marks and the half flag do not participate.
    pub(crate) const fn bucket(self) -> usize {
        (((self.glyph >> (STYLE_SHIFT - 8)) & 0x300) | (self.glyph & 0xFF)) as usize
    }
}
