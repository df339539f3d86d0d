//! Text layout against the panel's proportional font.
//!
//! A text line is made of one or more fields. Each field has a width in
//! cells (40 px each, minus one pixel of gutter) and an alignment. Text is
//! measured glyph by glyph, hard-truncated at the first glyph that does not
//! fit, and optionally padded with spaces (17 px) and single-pixel filler
//! glyphs so that the field is filled exactly.

use crate::color::TextAlignment;
use crate::font::{glyph_width, text_width};

/// Pixel width of one field cell.
pub const CELL_WIDTH: u16 = 40;

/// Placeholder sent in place of every space in the caller's text.
pub const SPACE_PLACEHOLDER: &str = "___";

/// Nominal width of a space glyph, used for padding.
pub const SPACE_WIDTH: u16 = 17;

/// Padding glyph one pixel wide.
pub const PIXEL_FILLER: u8 = b'{';

/// Byte terminating or separating fields in a line payload.
pub const FIELD_SEPARATOR: u8 = 0;

/// Cells per field when a line is split by a tab.
pub const TAB_FIELD_CELLS: u16 = 4;

/// Cells per field when a line is split by a tab and an icon is reserved.
pub const TAB_FIELD_CELLS_WITH_ICON: u16 = 3;

/// Cells taken by the field that reserves icon space.
pub const ICON_FIELD_CELLS: u16 = 1;

/// Returns the pixel budget of a field `cells` wide.
///
/// A zero-width field has no budget: its text is passed through untruncated
/// and the panel clips it.
pub fn pixel_budget(cells: u16) -> Option<u16> {
    if cells == 0 {
        None
    } else {
        Some(cells.saturating_mul(CELL_WIDTH) - 1)
    }
}

/// Replaces spaces with the placeholder and trims surrounding whitespace.
pub fn substitute_spaces(text: &str) -> String {
    text.replace(' ', SPACE_PLACEHOLDER).trim().to_string()
}

/// Returns the longest prefix of `bytes` whose width fits in `budget`.
pub fn truncate(bytes: &[u8], budget: u16) -> &[u8] {
    let mut width: u16 = 0;
    for (i, &b) in bytes.iter().enumerate() {
        width = width.saturating_add(glyph_width(b));
        if width > budget {
            return &bytes[..i];
        }
    }
    bytes
}

/// Pads already-fitting text out to `budget` pixels.
fn align(text: &[u8], budget: u16, alignment: TextAlignment) -> Vec<u8> {
    let remaining = budget.saturating_sub(text_width(text));
    let spaces = (remaining / SPACE_WIDTH) as usize;
    let pixels = (remaining % SPACE_WIDTH) as usize;

    let mut out = Vec::with_capacity(text.len() + spaces + pixels);
    match alignment {
        TextAlignment::None => out.extend_from_slice(text),
        TextAlignment::Left => {
            out.extend_from_slice(text);
            out.resize(out.len() + spaces, b' ');
            out.resize(out.len() + pixels, PIXEL_FILLER);
        }
        TextAlignment::Right => {
            out.resize(spaces, b' ');
            out.resize(spaces + pixels, PIXEL_FILLER);
            out.extend_from_slice(text);
        }
        TextAlignment::Centre => {
            // Odd remainders go to the right-hand side.
            let (left_spaces, left_pixels) = (spaces / 2, pixels / 2);
            out.resize(left_pixels, PIXEL_FILLER);
            out.resize(left_pixels + left_spaces, b' ');
            out.extend_from_slice(text);
            out.resize(out.len() + spaces - left_spaces, b' ');
            out.resize(out.len() + pixels - left_pixels, PIXEL_FILLER);
        }
    }
    out
}

/// Lays out `text` inside a field of `budget` pixels.
///
/// Spaces become the placeholder sequence before measuring, the result is
/// truncated at the first glyph that would overflow and then padded according
/// to `alignment`.
pub fn layout(text: &str, budget: u16, alignment: TextAlignment) -> Vec<u8> {
    let substituted = substitute_spaces(text);
    let kept = truncate(substituted.as_bytes(), budget);
    align(kept, budget, alignment)
}

/// One independently aligned span of a text line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    pub text: String,
    pub cells: u16,
    pub alignment: TextAlignment,
}

impl TextField {
    pub fn new(text: impl Into<String>, cells: u16, alignment: TextAlignment) -> Self {
        Self {
            text: text.into(),
            cells,
            alignment,
        }
    }

    /// Returns the field bytes ready for the payload.
    pub fn render(&self) -> Vec<u8> {
        match pixel_budget(self.cells) {
            Some(budget) => layout(&self.text, budget, self.alignment),
            None => substitute_spaces(&self.text).into_bytes(),
        }
    }
}

/// Ordered list of fields making up one text line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineLayout {
    pub fields: Vec<TextField>,
}

impl LineLayout {
    /// Splits a line into fields.
    ///
    /// Without a tab the line is a single field whose width is the first entry
    /// of `field_lengths` taken modulo 8 (7 when icon space is reserved). A tab
    /// splits the line in two fixed-width fields; further tabs are dropped.
    /// With `pad_for_icon` a one-cell, left-aligned empty field is inserted
    /// between them. Missing alignments default to [`TextAlignment::None`].
    pub fn new(
        text: &str,
        pad_for_icon: bool,
        alignments: &[TextAlignment],
        field_lengths: &[u16],
    ) -> Self {
        let alignment_at = |i: usize| alignments.get(i).copied().unwrap_or_default();

        let fields = match text.split_once('\t') {
            None => {
                let divisor = if pad_for_icon { 7 } else { 8 };
                let cells = field_lengths.first().copied().unwrap_or(0) % divisor;
                vec![TextField::new(text, cells, alignment_at(0))]
            }
            Some((first, rest)) => {
                let cells = if pad_for_icon {
                    TAB_FIELD_CELLS_WITH_ICON
                } else {
                    TAB_FIELD_CELLS
                };
                let mut fields = vec![
                    TextField::new(first, cells, alignment_at(0)),
                    TextField::new(rest.replace('\t', ""), cells, alignment_at(1)),
                ];
                if pad_for_icon {
                    fields.insert(
                        1,
                        TextField::new("", ICON_FIELD_CELLS, TextAlignment::Left),
                    );
                }
                fields
            }
        };

        Self { fields }
    }

    /// Returns the payload bytes for the line.
    ///
    /// A single field is terminated by a separator; multiple fields are
    /// joined by one with no trailing separator.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let last = self.fields.len().saturating_sub(1);
        for (i, field) in self.fields.iter().enumerate() {
            out.extend(field.render());
            if i < last || self.fields.len() == 1 {
                out.push(FIELD_SEPARATOR);
            }
        }
        out
    }

    /// Returns the summed width of all fields in cells.
    pub fn total_cells(&self) -> u16 {
        self.fields.iter().map(|f| f.cells).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_budget() {
        assert_eq!(pixel_budget(0), None);
        assert_eq!(pixel_budget(1), Some(39));
        assert_eq!(pixel_budget(7), Some(279));
    }

    #[test]
    fn test_spaces_become_placeholder() {
        assert_eq!(substitute_spaces("a b"), "a___b");
        assert_eq!(substitute_spaces("\tab\n"), "ab");
        assert_eq!(layout("a b", 279, TextAlignment::None), b"a___b".to_vec());
    }

    #[test]
    fn test_truncate_at_first_overflow() {
        // '0'..'9' are 17 px each: 39 px fits two of them.
        assert_eq!(truncate(b"0123", 39), b"01");
        assert_eq!(truncate(b"0123", 34), b"01");
        assert_eq!(truncate(b"0123", 33), b"0");
        assert_eq!(truncate(b"0123", 1000), b"0123");
        assert_eq!(truncate(b"", 0), b"");
    }

    #[test]
    fn test_truncation_length_matches_overflow_index() {
        let text = b"The quick brown fox";
        for budget in [0u16, 10, 39, 79, 119, 159, 279] {
            let mut width = 0u16;
            let k = text
                .iter()
                .position(|&b| {
                    width += glyph_width(b);
                    width > budget
                })
                .unwrap_or(text.len());
            assert_eq!(truncate(text, budget).len(), k, "budget {}", budget);
        }
    }

    #[test]
    fn test_truncation_drops_offending_glyph_even_if_later_ones_fit() {
        // 'W' (28) overflows 39 after '0' (17), the trailing 'i' (4) would fit.
        assert_eq!(layout("0Wi", 39, TextAlignment::None), b"0".to_vec());
    }

    #[test]
    fn test_alignment_fills_budget_exactly() {
        for alignment in [
            TextAlignment::Left,
            TextAlignment::Right,
            TextAlignment::Centre,
        ] {
            for text in ["", "Hi", "CPU 45", "a much longer line of text"] {
                let out = layout(text, 279, alignment);
                assert_eq!(text_width(&out), 279, "{:?} {:?}", alignment, text);
            }
        }
    }

    #[test]
    fn test_left_and_right_padding() {
        // "Hi" is 21 px, leaving 18 px in one cell: one space and one filler.
        assert_eq!(layout("Hi", 39, TextAlignment::Left), b"Hi {".to_vec());
        assert_eq!(layout("Hi", 39, TextAlignment::Right), b" {Hi".to_vec());
        assert_eq!(layout("Hi", 39, TextAlignment::None), b"Hi".to_vec());
    }

    #[test]
    fn test_centre_padding() {
        // 79 - 21 = 58 px: three spaces and seven fillers.
        assert_eq!(
            layout("Hi", 79, TextAlignment::Centre),
            b"{{{ Hi  {{{{".to_vec()
        );
    }

    #[test]
    fn test_single_field_line() {
        let line = LineLayout::new("Hi", false, &[TextAlignment::None], &[7]);
        assert_eq!(line.fields.len(), 1);
        assert_eq!(line.total_cells(), 7);
        assert_eq!(line.encode(), b"Hi\0".to_vec());
    }

    #[test]
    fn test_field_length_wraps() {
        let line = LineLayout::new("Hi", false, &[], &[9]);
        assert_eq!(line.fields[0].cells, 1);
        let line = LineLayout::new("Hi", true, &[], &[9]);
        assert_eq!(line.fields[0].cells, 2);
    }

    #[test]
    fn test_zero_length_field_is_unbounded() {
        let line = LineLayout::new("0123456789 0123456789", false, &[], &[8]);
        assert_eq!(line.fields[0].cells, 0);
        assert_eq!(line.encode(), b"0123456789___0123456789\0".to_vec());
    }

    #[test]
    fn test_tab_line_without_icon() {
        let line = LineLayout::new(
            "CPU\t45\t%",
            false,
            &[TextAlignment::None, TextAlignment::None],
            &[1],
        );
        assert_eq!(line.fields.len(), 2);
        assert_eq!(line.fields[1].text, "45%");
        assert!(line.fields.iter().all(|f| f.cells == TAB_FIELD_CELLS));
        assert_eq!(line.total_cells(), 8);
        assert_eq!(line.encode(), b"CPU\x0045%".to_vec());
    }

    #[test]
    fn test_tab_line_with_icon_reservation() {
        let line = LineLayout::new(
            "CPU\t45",
            true,
            &[TextAlignment::None, TextAlignment::Right],
            &[],
        );
        assert_eq!(line.fields.len(), 3);
        assert_eq!(line.fields[0].cells, 3);
        assert_eq!(
            line.fields[1],
            TextField::new("", ICON_FIELD_CELLS, TextAlignment::Left)
        );
        assert_eq!(line.fields[2].cells, 3);
        assert_eq!(line.fields[2].alignment, TextAlignment::Right);
        assert_eq!(line.total_cells(), 7);

        let payload = line.encode();
        assert_eq!(payload.iter().filter(|&&b| b == FIELD_SEPARATOR).count(), 2);
        assert_eq!(payload.last(), Some(&b'5'));
    }
}
