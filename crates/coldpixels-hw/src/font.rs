//! Proportional font metrics of the panel's built-in text font.
//!
//! Widths are in pixels and cover printable ASCII 32-125. Anything outside
//! that range is drawn as nothing by the firmware and measures zero.

/// First character code covered by the width table.
pub const FIRST_GLYPH: u8 = 32;

/// Last character code covered by the width table.
pub const LAST_GLYPH: u8 = 125;

/// Pixel width of each glyph, indexed by `code - FIRST_GLYPH`.
pub const GLYPH_WIDTHS: [u8; 94] = [
    0x11, 0x06, 0x08, 0x15, 0x0E, 0x19, 0x15, 0x03, 0x08, 0x08, 0x0F, 0x0D, //
    0x05, 0x08, 0x06, 0x0B, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, //
    0x11, 0x11, 0x06, 0x06, 0x13, 0x10, 0x13, 0x0C, 0x1A, 0x14, 0x10, 0x12, //
    0x13, 0x0F, 0x0D, 0x13, 0x11, 0x04, 0x07, 0x11, 0x0E, 0x14, 0x11, 0x15, //
    0x0F, 0x15, 0x12, 0x10, 0x13, 0x11, 0x14, 0x1C, 0x13, 0x13, 0x12, 0x07, //
    0x0B, 0x07, 0x0B, 0x02, 0x08, 0x0E, 0x0F, 0x0E, 0x0F, 0x10, 0x0B, 0x0F, //
    0x0E, 0x04, 0x07, 0x0F, 0x04, 0x18, 0x0E, 0x10, 0x0F, 0x0F, 0x0A, 0x0D, //
    0x0B, 0x0E, 0x10, 0x16, 0x10, 0x10, 0x0E, 0x01, 0x11, 0x02,
];

/// Returns the rendered width of a single byte.
pub fn glyph_width(byte: u8) -> u16 {
    if (FIRST_GLYPH..=LAST_GLYPH).contains(&byte) {
        GLYPH_WIDTHS[(byte - FIRST_GLYPH) as usize] as u16
    } else {
        0
    }
}

/// Returns the rendered width of a byte string.
pub fn text_width(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |acc, &b| acc.saturating_add(glyph_width(b)))
}
