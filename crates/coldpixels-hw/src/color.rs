//! Named colors, text alignment and line masks.
//!
//! The panel addresses text colors through a small palette index (1-31, with
//! gaps) and background colors as raw RGB565 values. The encoder accepts any
//! number and wraps it; these enums only name the values the firmware is
//! known to render.

use crate::{Error, Result};
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// Foreground text color (firmware palette index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum TextColor {
    Green = 1,
    Yellow = 2,
    Red = 3,
    #[default]
    White = 5,
    Cyan = 6,
    Grey = 7,
    Black = 13,
    Brown = 15,
    BrickRed = 16,
    DarkBlue = 17,
    LightBlue = 18,
    Orange = 21,
    Purple = 22,
    Pink = 23,
    Peach = 24,
    Gold = 25,
    Lavender = 26,
    OrangeRed = 27,
    Magenta = 28,
    Navy = 30,
    LightGreen = 31,
}

const TEXT_COLOR_NAMES: [(TextColor, &str); 21] = [
    (TextColor::Green, "green"),
    (TextColor::Yellow, "yellow"),
    (TextColor::Red, "red"),
    (TextColor::White, "white"),
    (TextColor::Cyan, "cyan"),
    (TextColor::Grey, "grey"),
    (TextColor::Black, "black"),
    (TextColor::Brown, "brown"),
    (TextColor::BrickRed, "brick-red"),
    (TextColor::DarkBlue, "dark-blue"),
    (TextColor::LightBlue, "light-blue"),
    (TextColor::Orange, "orange"),
    (TextColor::Purple, "purple"),
    (TextColor::Pink, "pink"),
    (TextColor::Peach, "peach"),
    (TextColor::Gold, "gold"),
    (TextColor::Lavender, "lavender"),
    (TextColor::OrangeRed, "orange-red"),
    (TextColor::Magenta, "magenta"),
    (TextColor::Navy, "navy"),
    (TextColor::LightGreen, "light-green"),
];

impl TextColor {
    /// Returns the palette index sent to the firmware.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Returns all named text colors.
    pub fn all() -> impl Iterator<Item = TextColor> {
        TEXT_COLOR_NAMES.iter().map(|(color, _)| *color)
    }
}

impl From<TextColor> for u8 {
    fn from(color: TextColor) -> Self {
        color.code()
    }
}

impl FromStr for TextColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.to_lowercase().replace('_', "-");
        TEXT_COLOR_NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(color, _)| *color)
            .ok_or_else(|| Error::InvalidTextColor(s.to_string()))
    }
}

impl std::fmt::Display for TextColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = TEXT_COLOR_NAMES
            .iter()
            .find(|(color, _)| color == self)
            .map_or("unknown", |(_, n)| *n);
        write!(f, "{}", name)
    }
}

/// Text background color as an RGB565 swatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u16)]
pub enum BackgroundColor {
    #[default]
    Black = 0x0000,
    Blue = 0x001F,
    Green = 0x07E0,
    Cyan = 0x07FF,
    Brown = 0x79E0,
    DarkGrey = 0x7BEF,
    LightGrey = 0xBDF7,
    Red = 0xF800,
    Purple = 0xF81F,
    Orange = 0xFBE0,
    Gold = 0xFD20,
    Yellow = 0xFFE0,
    White = 0xFFFF,
}

const BACKGROUND_COLOR_NAMES: [(BackgroundColor, &str); 13] = [
    (BackgroundColor::Black, "black"),
    (BackgroundColor::Blue, "blue"),
    (BackgroundColor::Green, "green"),
    (BackgroundColor::Cyan, "cyan"),
    (BackgroundColor::Brown, "brown"),
    (BackgroundColor::DarkGrey, "dark-grey"),
    (BackgroundColor::LightGrey, "light-grey"),
    (BackgroundColor::Red, "red"),
    (BackgroundColor::Purple, "purple"),
    (BackgroundColor::Orange, "orange"),
    (BackgroundColor::Gold, "gold"),
    (BackgroundColor::Yellow, "yellow"),
    (BackgroundColor::White, "white"),
];

impl BackgroundColor {
    /// Returns the RGB565 value.
    pub fn rgb565(&self) -> u16 {
        *self as u16
    }

    /// Returns all named background swatches.
    pub fn all() -> impl Iterator<Item = BackgroundColor> {
        BACKGROUND_COLOR_NAMES.iter().map(|(color, _)| *color)
    }
}

impl From<BackgroundColor> for u16 {
    fn from(color: BackgroundColor) -> Self {
        color.rgb565()
    }
}

impl FromStr for BackgroundColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.to_lowercase().replace('_', "-");
        BACKGROUND_COLOR_NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(color, _)| *color)
            .ok_or_else(|| Error::InvalidBackgroundColor(s.to_string()))
    }
}

impl std::fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = BACKGROUND_COLOR_NAMES
            .iter()
            .find(|(color, _)| color == self)
            .map_or("unknown", |(_, n)| *n);
        write!(f, "{}", name)
    }
}

/// Horizontal alignment of a text field inside its pixel budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    /// No padding; the text is sent as measured.
    #[default]
    None,
    Centre,
    Left,
    Right,
}

impl FromStr for TextAlignment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(TextAlignment::None),
            "centre" | "center" => Ok(TextAlignment::Centre),
            "left" => Ok(TextAlignment::Left),
            "right" => Ok(TextAlignment::Right),
            _ => Err(Error::InvalidAlignment(s.to_string())),
        }
    }
}

impl std::fmt::Display for TextAlignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextAlignment::None => write!(f, "none"),
            TextAlignment::Centre => write!(f, "centre"),
            TextAlignment::Left => write!(f, "left"),
            TextAlignment::Right => write!(f, "right"),
        }
    }
}

/// Bitmask selecting text lines for a clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextLines(u16);

impl TextLines {
    pub const LINE_1: TextLines = TextLines(1 << 0);
    pub const LINE_2: TextLines = TextLines(1 << 1);
    pub const LINE_3: TextLines = TextLines(1 << 2);
    pub const LINE_4: TextLines = TextLines(1 << 3);
    pub const LINE_5: TextLines = TextLines(1 << 4);
    pub const LINE_6: TextLines = TextLines(1 << 5);
    pub const ALL: TextLines = TextLines(0b11_1111);

    /// Returns the mask for a single 1-based line number.
    pub fn line(number: u8) -> Result<Self> {
        if !(1..=6).contains(&number) {
            return Err(Error::InvalidTextLine(number));
        }
        Ok(TextLines(1 << (number - 1)))
    }

    /// Builds a mask from 1-based line numbers.
    pub fn from_lines<I: IntoIterator<Item = u8>>(lines: I) -> Result<Self> {
        lines
            .into_iter()
            .try_fold(TextLines::default(), |mask, n| Ok(mask | TextLines::line(n)?))
    }

    /// Returns the raw mask.
    pub fn bits(&self) -> u16 {
        self.0
    }
}

impl From<TextLines> for u16 {
    fn from(lines: TextLines) -> Self {
        lines.0
    }
}

impl BitOr for TextLines {
    type Output = TextLines;

    fn bitor(self, rhs: TextLines) -> TextLines {
        TextLines(self.0 | rhs.0)
    }
}

impl BitOrAssign for TextLines {
    fn bitor_assign(&mut self, rhs: TextLines) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_color_codes() {
        assert_eq!(TextColor::Green.code(), 1);
        assert_eq!(TextColor::White.code(), 5);
        assert_eq!(TextColor::LightGreen.code(), 31);
        assert_eq!(TextColor::all().count(), 21);
        assert!(TextColor::all().all(|c| c.code() < 32));
    }

    #[test]
    fn test_text_color_from_str() {
        assert_eq!("red".parse::<TextColor>().unwrap(), TextColor::Red);
        assert_eq!(
            "light_blue".parse::<TextColor>().unwrap(),
            TextColor::LightBlue
        );
        assert_eq!(
            "Orange-Red".parse::<TextColor>().unwrap(),
            TextColor::OrangeRed
        );
        assert!("teal".parse::<TextColor>().is_err());
    }

    #[test]
    fn test_color_display_roundtrip() {
        for color in TextColor::all() {
            assert_eq!(color.to_string().parse::<TextColor>().unwrap(), color);
        }
        for color in BackgroundColor::all() {
            assert_eq!(
                color.to_string().parse::<BackgroundColor>().unwrap(),
                color
            );
        }
    }

    #[test]
    fn test_background_rgb565() {
        assert_eq!(BackgroundColor::Red.rgb565(), 0xF800);
        assert_eq!(BackgroundColor::DarkGrey.rgb565(), 0x7BEF);
        assert_eq!(u16::from(BackgroundColor::White), 0xFFFF);
        assert_eq!(BackgroundColor::all().count(), 13);
    }

    #[test]
    fn test_alignment_from_str() {
        assert_eq!(
            "center".parse::<TextAlignment>().unwrap(),
            TextAlignment::Centre
        );
        assert_eq!("LEFT".parse::<TextAlignment>().unwrap(), TextAlignment::Left);
        assert_eq!(
            "none".parse::<TextAlignment>().unwrap(),
            TextAlignment::None
        );
        assert!("justify".parse::<TextAlignment>().is_err());
    }

    #[test]
    fn test_text_lines() {
        assert_eq!((TextLines::LINE_1 | TextLines::LINE_3).bits(), 0b101);
        assert_eq!(TextLines::from_lines([1, 3]).unwrap().bits(), 5);
        assert_eq!(TextLines::from_lines(1..=6).unwrap(), TextLines::ALL);
        assert!(TextLines::line(0).is_err());
        assert!(TextLines::line(7).is_err());
    }
}
