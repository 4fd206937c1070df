use super::{CellFlags, CellGlyph};
use crate::key::{CombiningMarks, GlyphStyle};

#[test]
fn default_cell_is_plain_space() {
    let cell = CellGlyph::default();
    assert_eq!(cell.ch, ' ');
    assert!(cell.flags.is_empty());
    assert!(cell.marks.is_empty());
}

#[test]
fn style_follows_bold_and_italic_flags() {
    let cell = CellGlyph::new('A').with_flags(CellFlags::BOLD | CellFlags::ITALIC);
    assert_eq!(cell.style(), GlyphStyle::BOLD | GlyphStyle::ITALIC);

    let wide = CellGlyph::new('好').with_flags(CellFlags::WIDE_CHAR);
    assert!(wide.style().is_empty());
}

#[test]
fn push_zerowidth_keeps_two_marks() {
    let mut cell = CellGlyph::new('e');
    cell.push_zerowidth('\u{0301}');
    cell.push_zerowidth('\u{0323}');
    cell.push_zerowidth('\u{0308}'); // dropped

    assert_eq!(
        cell.marks,
        CombiningMarks::from_chars(&['\u{0301}', '\u{0323}'])
    );
    assert_eq!(cell.marks.iter().count(), 2);
}

#[test]
fn flags_from_grid_bits_drop_unrelated_attributes() {
    // DIM (1 << 1) and UNDERLINE (1 << 3) on the grid side carry no glyph info.
    let flags = CellFlags::from_bits_truncate(0b1111);
    assert_eq!(flags, CellFlags::BOLD | CellFlags::ITALIC);
}
