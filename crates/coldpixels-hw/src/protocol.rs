//! Vendor control-transfer protocol definitions and encoding.
//!
//! Every display operation maps to exactly one host-to-device vendor control
//! transfer: a request code, the 16-bit `wValue` and `wIndex` fields and an
//! optional payload. Out-of-range inputs are wrapped into range, never
//! rejected; the firmware expects the wrapped values bit for bit.

use crate::layout::LineLayout;
use crate::{Error, Result, TextAlignment};
use serde::Serialize;

/// Number of addressable icon slots.
pub const ICON_SLOTS: u16 = 47;

/// wIndex marker for icon-by-slot requests.
pub const ICON_SLOT_MARKER: u16 = 25600;

/// wIndex marker sent when idle dimming is disabled.
pub const DIM_DISABLE_MARKER: u16 = 266;

/// Right edge of the free-text bounding box.
pub const TEXT_BOX_RIGHT_EDGE: u16 = 319;

/// Height of the free-text bounding box.
pub const TEXT_BOX_HEIGHT: u16 = 40;

/// Horizontal wrap for coordinates.
pub const COORD_X_WRAP: u16 = crate::PANEL_WIDTH;

/// Vertical wrap for icon coordinates.
pub const ICON_Y_WRAP: u16 = crate::PANEL_HEIGHT;

/// Vertical wrap for text coordinates.
pub const TEXT_Y_WRAP: u16 = 320;

/// Added to the text length when no icon space is reserved.
pub const UNPADDED_LAYOUT_FLAG: u16 = 256;

/// Number of text lines.
pub const TEXT_LINES: u16 = 6;

/// Valid line mask bits are wrapped modulo this value.
pub const LINE_MASK_WRAP: u16 = 63;

/// Text palette size.
pub const TEXT_COLOR_WRAP: u8 = 32;

/// Brightness levels are wrapped modulo this value.
pub const BRIGHTNESS_WRAP: u16 = 255;

/// Vendor request codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Request {
    SetBrightness = 13,
    SaveBrightness = 14,
    SendCommandToFlash = 15,
    DimWhenIdle = 17,
    DisplayNetworkInfo = 20,
    DisplayCpuInfo = 21,
    DisplayRamGpuInfo = 22,
    DisplayFanInfo = 23,
    DisplayTextOnLine = 24,
    DisplayTextAnywhere = 25,
    ClearLines = 26,
    /// Icons by slot and by coordinates both go through this request; the
    /// slot form is told apart by [`ICON_SLOT_MARKER`].
    DisplayIconAnywhere = 29,
    SetTextBackgroundColor = 30,
}

/// A single vendor control transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlRequest {
    pub request: u8,
    pub value: u16,
    pub index: u16,
    pub payload: Vec<u8>,
}

impl ControlRequest {
    /// Builds a request without payload.
    pub fn new(request: Request, value: u16, index: u16) -> Self {
        Self::with_payload(request, value, index, Vec::new())
    }

    /// Builds a request carrying `payload`.
    pub fn with_payload(request: Request, value: u16, index: u16, payload: Vec<u8>) -> Self {
        Self {
            request: request as u8,
            value,
            index,
            payload,
        }
    }
}

/// A high-level display operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayOperation {
    SetBrightness {
        level: u16,
    },
    /// Stores the backlight levels used while idle (`off`) and active (`on`).
    SaveBrightness {
        off: u16,
        on: u16,
    },
    DisplayIcon {
        position: u16,
        icon: u16,
    },
    DisplayIconAt {
        x: u16,
        y: u16,
        icon: u16,
    },
    SetTextBackground {
        color: u16,
    },
    DisplayTextOnLine {
        line: u16,
        text: String,
        pad_for_icon: bool,
        alignments: Vec<TextAlignment>,
        color: u8,
        field_lengths: Vec<u16>,
    },
    DisplayTextAt {
        x: u16,
        y: u16,
        text: String,
        color: u8,
    },
    DimWhenIdle {
        enabled: bool,
    },
    ClearLines {
        lines: u16,
        color: u16,
    },
    SendFlashCommand {
        address: u16,
        command: u16,
    },
}

/// Returns `len` as a 16-bit transfer length.
///
/// Payloads longer than `wLength` can describe are rejected rather than
/// truncated.
pub(crate) fn wire_length(request: u8, len: usize) -> Result<u16> {
    u16::try_from(len).map_err(|_| Error::PayloadTooLarge { request, len })
}

/// Appends `v` as two big-endian bytes.
fn push_be(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_be_bytes());
}

impl DisplayOperation {
    /// Returns the operation name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            DisplayOperation::SetBrightness { .. } => "set_brightness",
            DisplayOperation::SaveBrightness { .. } => "save_brightness",
            DisplayOperation::DisplayIcon { .. } => "display_icon",
            DisplayOperation::DisplayIconAt { .. } => "display_icon_at",
            DisplayOperation::SetTextBackground { .. } => "set_text_background",
            DisplayOperation::DisplayTextOnLine { .. } => "display_text_on_line",
            DisplayOperation::DisplayTextAt { .. } => "display_text_at",
            DisplayOperation::DimWhenIdle { .. } => "dim_when_idle",
            DisplayOperation::ClearLines { .. } => "clear_lines",
            DisplayOperation::SendFlashCommand { .. } => "send_flash_command",
        }
    }

    /// Encodes the operation into its control transfer.
    ///
    /// Fails with [`Error::PayloadTooLarge`] when the text does not fit in a
    /// single transfer.
    pub fn encode(&self) -> Result<ControlRequest> {
        let request = match self {
            DisplayOperation::SetBrightness { level } => {
                let level = level % BRIGHTNESS_WRAP;
                ControlRequest::new(Request::SetBrightness, level, level)
            }
            DisplayOperation::SaveBrightness { off, on } => ControlRequest::new(
                Request::SaveBrightness,
                off.wrapping_add(on.wrapping_mul(256)),
                0,
            ),
            DisplayOperation::DisplayIcon { position, icon } => ControlRequest::new(
                Request::DisplayIconAnywhere,
                ((position % ICON_SLOTS) * 512).wrapping_add(*icon),
                ICON_SLOT_MARKER,
            ),
            DisplayOperation::DisplayIconAt { x, y, icon } => {
                let x = x % COORD_X_WRAP;
                let y = y % ICON_Y_WRAP;
                let mut payload = Vec::with_capacity(4);
                push_be(&mut payload, y);
                push_be(&mut payload, x);
                let id = (icon << 8).wrapping_add(*icon);
                ControlRequest::with_payload(Request::DisplayIconAnywhere, id, id, payload)
            }
            DisplayOperation::SetTextBackground { color } => {
                ControlRequest::new(Request::SetTextBackgroundColor, *color, 0)
            }
            DisplayOperation::DisplayTextOnLine {
                line,
                text,
                pad_for_icon,
                alignments,
                color,
                field_lengths,
            } => {
                let payload =
                    LineLayout::new(text, *pad_for_icon, alignments, field_lengths).encode();
                let code = Request::DisplayTextOnLine as u8;
                let mut value = wire_length(code, payload.len())?;
                if !pad_for_icon {
                    value = value
                        .checked_add(UNPADDED_LAYOUT_FLAG)
                        .ok_or(Error::PayloadTooLarge {
                            request: code,
                            len: payload.len(),
                        })?;
                }
                let color = u16::from(color % TEXT_COLOR_WRAP);
                let line = match line % TEXT_LINES {
                    0 => 1,
                    l => l,
                };
                ControlRequest::with_payload(
                    Request::DisplayTextOnLine,
                    value,
                    (line - 1) * 256 + color,
                    payload,
                )
            }
            DisplayOperation::DisplayTextAt { x, y, text, color } => {
                let x = x % COORD_X_WRAP;
                let y = y % TEXT_Y_WRAP;
                let mut payload = Vec::with_capacity(8 + text.len());
                push_be(&mut payload, x);
                push_be(&mut payload, y);
                push_be(&mut payload, TEXT_BOX_RIGHT_EDGE);
                push_be(&mut payload, y + TEXT_BOX_HEIGHT);
                payload.extend_from_slice(text.as_bytes());
                let value = wire_length(Request::DisplayTextAnywhere as u8, payload.len())?;
                ControlRequest::with_payload(
                    Request::DisplayTextAnywhere,
                    value,
                    u16::from(*color),
                    payload,
                )
            }
            DisplayOperation::DimWhenIdle { enabled } => {
                if *enabled {
                    ControlRequest::new(Request::DimWhenIdle, 1, 0)
                } else {
                    ControlRequest::new(Request::DimWhenIdle, 0, DIM_DISABLE_MARKER)
                }
            }
            DisplayOperation::ClearLines { lines, color } => {
                ControlRequest::new(Request::ClearLines, line_mask(*lines), *color)
            }
            DisplayOperation::SendFlashCommand { address, command } => {
                ControlRequest::new(Request::SendCommandToFlash, *address, *command)
            }
        };
        Ok(request)
    }
}

/// Wraps a line bitmask into range; an empty mask selects line 1.
pub fn line_mask(lines: u16) -> u16 {
    match lines % LINE_MASK_WRAP {
        0 => 1,
        mask => mask,
    }
}
