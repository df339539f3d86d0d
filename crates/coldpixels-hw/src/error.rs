//! Error types for the coldpixels hardware library.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when interacting with the panel.
#[derive(Error, Debug)]
pub enum Error {
    /// No LCD panel matched the vendor/product filter.
    #[error("LCD device not found (VID:PID 16C0:05DC)")]
    DeviceNotFound,

    /// USB enumeration or open failure.
    #[error("USB error: {0}")]
    Usb(#[from] std::io::Error),

    /// The transport rejected a control transfer.
    #[error("Control transfer (request {request}) failed: {source}")]
    Transfer {
        request: u8,
        #[source]
        source: nusb::transfer::TransferError,
    },

    /// The payload does not fit in a single control transfer.
    #[error("Payload of {len} bytes is too large for request {request}")]
    PayloadTooLarge { request: u8, len: usize },

    /// An operation was issued before the session was opened.
    #[error("Display session is not open")]
    NotOpen,

    /// An operation was issued after the session was released.
    #[error("Display session has been released")]
    Released,

    /// Unknown text color name.
    #[error("Invalid text color: {0}")]
    InvalidTextColor(String),

    /// Unknown background color name.
    #[error("Invalid background color: {0}")]
    InvalidBackgroundColor(String),

    /// Unknown alignment name.
    #[error("Invalid text alignment: {0}")]
    InvalidAlignment(String),

    /// Text line outside 1-6.
    #[error("Invalid text line (must be 1-6): {0}")]
    InvalidTextLine(u8),
}
