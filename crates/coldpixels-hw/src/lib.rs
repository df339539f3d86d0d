//! Coldpixels Hardware Library
//!
//! Drives small USB-attached character/icon LCD panels by translating display
//! requests (text, icons, line clears, colors, brightness) into the panel's
//! vendor control-transfer protocol.

pub mod color;
pub mod error;
pub mod font;
pub mod layout;
pub mod protocol;
pub mod session;
pub mod sysinfo;
pub mod timing;
pub mod transport;

pub use color::{BackgroundColor, TextAlignment, TextColor, TextLines};
pub use error::{Error, Result};
pub use protocol::{ControlRequest, DisplayOperation, Request};
pub use session::Display;
pub use sysinfo::SysinfoPanel;
pub use timing::TimingPolicy;
pub use transport::{Discovery, Transport, UsbDiscovery, UsbTransport};

/// LCD panel dimensions
pub const PANEL_WIDTH: u16 = 320;
pub const PANEL_HEIGHT: u16 = 240;

/// USB VID:PID for the LCD panel
pub const PANEL_VID: u16 = 0x16C0;
pub const PANEL_PID: u16 = 0x05DC;
