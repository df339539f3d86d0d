//! Post-command delays.
//!
//! The panel accepts the next command as soon as a control transfer returns,
//! even while it is still redrawing. Callers therefore wait a per-operation
//! delay sized to the redraw cost before issuing the next command.

use crate::layout::LineLayout;
use crate::protocol::{line_mask, DisplayOperation};
use std::time::Duration;

/// Icon indices whose artwork takes noticeably longer to draw.
pub const LARGE_IMAGE_INDICES: [u16; 8] = [180, 218, 256, 294, 332, 370, 408, 446];

/// Cells that a full-width text line occupies at `chars_per_icon` = 2.75.
const FULL_LINE_UNITS: f64 = 22.0;

/// Number of text lines a clear can cover.
const CLEARABLE_LINES: f64 = 6.0;

/// Fraction of `clear_line_wait` spent per cleared line.
const CLEAR_LINE_FACTOR: f64 = 0.8;

/// Scales `duration` by `factor`, rounded to the nearest nanosecond.
fn scale(duration: Duration, factor: f64) -> Duration {
    let nanos = duration.as_nanos() as f64 * factor.max(0.0);
    Duration::from_nanos(nanos.round() as u64)
}

/// Returns true if `icon` is drawn from the large image bank.
pub fn is_large_image(icon: u16) -> bool {
    LARGE_IMAGE_INDICES.contains(&icon)
}

/// Timing configuration of a display session.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingPolicy {
    /// Timeout handed to the transport for each control transfer.
    pub usb_timeout: Duration,
    /// Delay for clearing all six lines.
    pub clear_line_wait: Duration,
    /// Flash sector erase time.
    pub erase_sector_wait: Duration,
    pub min_icon_wait: Duration,
    pub max_icon_wait: Duration,
    /// Flash page write time.
    pub write_page_wait: Duration,
    pub sysinfo_wait: Duration,
    /// Delay for a full-width text line.
    pub max_text_wait: Duration,
    /// Ratio between a field cell and a rendered character.
    pub chars_per_icon: f64,
}

impl Default for TimingPolicy {
    fn default() -> Self {
        Self {
            usb_timeout: Duration::from_millis(5000),
            clear_line_wait: Duration::from_millis(1000),
            erase_sector_wait: Duration::from_millis(220),
            min_icon_wait: Duration::from_millis(10),
            max_icon_wait: Duration::from_millis(700),
            write_page_wait: Duration::from_millis(15),
            sysinfo_wait: Duration::from_millis(50),
            max_text_wait: Duration::from_millis(85),
            chars_per_icon: 2.75,
        }
    }
}

impl TimingPolicy {
    /// Returns the delay after drawing `icon`.
    pub fn icon_delay(&self, icon: u16) -> Duration {
        if is_large_image(icon) {
            self.max_icon_wait
        } else {
            self.min_icon_wait
        }
    }

    /// Returns the delay after writing a text line `cells` wide in total.
    pub fn text_line_delay(&self, cells: u16) -> Duration {
        let share = f64::from(cells) * self.chars_per_icon / FULL_LINE_UNITS;
        scale(self.max_text_wait, share)
    }

    /// Returns the delay after clearing the lines in `mask`.
    pub fn clear_lines_delay(&self, mask: u16) -> Duration {
        let cleared = f64::from(mask.count_ones());
        scale(
            self.clear_line_wait,
            cleared / CLEARABLE_LINES * CLEAR_LINE_FACTOR,
        )
    }

    /// Returns the delay the caller must wait after `op` has been sent.
    pub fn delay_after(&self, op: &DisplayOperation) -> Duration {
        match op {
            DisplayOperation::DisplayIcon { icon, .. }
            | DisplayOperation::DisplayIconAt { icon, .. } => self.icon_delay(*icon),
            DisplayOperation::DisplayTextOnLine {
                text,
                pad_for_icon,
                alignments,
                field_lengths,
                ..
            } => {
                let line = LineLayout::new(text, *pad_for_icon, alignments, field_lengths);
                self.text_line_delay(line.total_cells())
            }
            DisplayOperation::DisplayTextAt { .. } => self.max_text_wait,
            DisplayOperation::ClearLines { lines, .. } => {
                self.clear_lines_delay(line_mask(*lines))
            }
            DisplayOperation::SetBrightness { .. }
            | DisplayOperation::SaveBrightness { .. }
            | DisplayOperation::SetTextBackground { .. }
            | DisplayOperation::DimWhenIdle { .. }
            | DisplayOperation::SendFlashCommand { .. } => Duration::ZERO,
        }
    }
}
