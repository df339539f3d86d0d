//! Display session.
//!
//! A [`Display`] wraps one opened panel. Each operation holds the session lock
//! while it encodes the request, sends it and waits out the redraw delay, so
//! commands issued from several threads never overtake a redraw in progress.

use crate::protocol::{ControlRequest, DisplayOperation};
use crate::sysinfo::SysinfoPanel;
use crate::timing::TimingPolicy;
use crate::transport::{Discovery, Transport, UsbTransport};
use crate::{Error, Result, TextAlignment, PANEL_PID, PANEL_VID};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

enum SessionState<T> {
    Unopened,
    Open(T),
    Released,
}

/// LCD panel session.
pub struct Display<T: Transport = UsbTransport> {
    state: Mutex<SessionState<T>>,
    timing: TimingPolicy,
}

impl<T: Transport> Display<T> {
    /// Creates a session that has not been connected to a device yet.
    pub fn new(timing: TimingPolicy) -> Self {
        Self {
            state: Mutex::new(SessionState::Unopened),
            timing,
        }
    }

    /// Discovers and opens a panel.
    pub fn open<D>(discovery: &D, timing: TimingPolicy) -> Result<Self>
    where
        D: Discovery<Transport = T>,
    {
        let display = Self::new(timing);
        display.connect(discovery)?;
        Ok(display)
    }

    /// Connects an unopened session to a panel.
    ///
    /// Connecting an open session is a no-op; a released session cannot be
    /// reopened.
    pub fn connect<D>(&self, discovery: &D) -> Result<()>
    where
        D: Discovery<Transport = T>,
    {
        let mut state = self.lock();
        match *state {
            SessionState::Unopened => {}
            SessionState::Open(_) => {
                debug!("Display session already open");
                return Ok(());
            }
            SessionState::Released => return Err(Error::Released),
        }
        *state = SessionState::Open(discovery.open(PANEL_VID, PANEL_PID)?);
        Ok(())
    }

    /// Returns the timing policy.
    pub fn timing(&self) -> &TimingPolicy {
        &self.timing
    }

    /// Returns true while the session holds an open device.
    pub fn is_open(&self) -> bool {
        matches!(*self.lock(), SessionState::Open(_))
    }

    fn lock(&self) -> MutexGuard<'_, SessionState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Encodes, sends and waits under a single lock.
    fn send<F>(&self, name: &str, build: F) -> Result<Duration>
    where
        F: FnOnce(&TimingPolicy) -> Result<(ControlRequest, Duration)>,
    {
        let mut state = self.lock();
        let transport = match &mut *state {
            SessionState::Open(transport) => transport,
            SessionState::Unopened => return Err(Error::NotOpen),
            SessionState::Released => return Err(Error::Released),
        };

        let (request, delay) = build(&self.timing)?;
        debug!(
            "{}: request={} value={:#06X} index={:#06X} payload={} bytes",
            name,
            request.request,
            request.value,
            request.index,
            request.payload.len()
        );
        transport.control_out(&request, self.timing.usb_timeout)?;

        if !delay.is_zero() {
            debug!("Waiting {:?} for the panel to redraw", delay);
            std::thread::sleep(delay);
        }
        Ok(delay)
    }

    /// Runs a display operation and returns the redraw delay that was applied.
    pub fn execute(&self, op: &DisplayOperation) -> Result<Duration> {
        self.send(op.name(), |timing| Ok((op.encode()?, timing.delay_after(op))))
    }

    /// Draws a system information panel.
    pub fn display_sysinfo(&self, panel: &SysinfoPanel) -> Result<Duration> {
        self.send(panel.name(), |timing| Ok((panel.encode(), timing.sysinfo_wait)))
    }

    /// Sets the backlight level.
    pub fn set_brightness(&self, level: u16) -> Result<()> {
        self.execute(&DisplayOperation::SetBrightness { level })?;
        Ok(())
    }

    /// Stores the idle and active backlight levels.
    pub fn save_brightness(&self, off: u16, on: u16) -> Result<()> {
        self.execute(&DisplayOperation::SaveBrightness { off, on })?;
        Ok(())
    }

    /// Draws icon `icon` in slot `position`.
    pub fn display_icon(&self, position: u16, icon: u16) -> Result<()> {
        self.execute(&DisplayOperation::DisplayIcon { position, icon })?;
        Ok(())
    }

    /// Draws icon `icon` with its top-left corner at (`x`, `y`).
    pub fn display_icon_at(&self, x: u16, y: u16, icon: u16) -> Result<()> {
        self.execute(&DisplayOperation::DisplayIconAt { x, y, icon })?;
        Ok(())
    }

    /// Sets the background color drawn behind text.
    pub fn set_text_background_color(&self, color: impl Into<u16>) -> Result<()> {
        self.execute(&DisplayOperation::SetTextBackground {
            color: color.into(),
        })?;
        Ok(())
    }

    /// Writes `text` on a text line.
    ///
    /// A tab in `text` splits the line in two fields; `alignments` and
    /// `field_lengths` are applied per field (see [`crate::layout::LineLayout`]).
    pub fn display_text_on_line(
        &self,
        line: u16,
        text: &str,
        pad_for_icon: bool,
        alignments: &[TextAlignment],
        color: impl Into<u8>,
        field_lengths: &[u16],
    ) -> Result<()> {
        self.execute(&DisplayOperation::DisplayTextOnLine {
            line,
            text: text.to_string(),
            pad_for_icon,
            alignments: alignments.to_vec(),
            color: color.into(),
            field_lengths: field_lengths.to_vec(),
        })?;
        Ok(())
    }

    /// Writes `text` in a 40 px high box starting at (`x`, `y`).
    pub fn display_text_at(&self, x: u16, y: u16, text: &str, color: impl Into<u8>) -> Result<()> {
        self.execute(&DisplayOperation::DisplayTextAt {
            x,
            y,
            text: text.to_string(),
            color: color.into(),
        })?;
        Ok(())
    }

    /// Enables or disables dimming the backlight while idle.
    pub fn dim_when_idle(&self, enabled: bool) -> Result<()> {
        self.execute(&DisplayOperation::DimWhenIdle { enabled })?;
        Ok(())
    }

    /// Clears the lines selected by `lines` to `color`.
    pub fn clear_lines(&self, lines: impl Into<u16>, color: impl Into<u16>) -> Result<()> {
        self.execute(&DisplayOperation::ClearLines {
            lines: lines.into(),
            color: color.into(),
        })?;
        Ok(())
    }

    /// Sends a raw command to the panel's flash controller.
    pub fn send_command_to_flash(&self, address: u16, command: u16) -> Result<()> {
        self.execute(&DisplayOperation::SendFlashCommand { address, command })?;
        Ok(())
    }

    /// Closes the device. Releasing twice is a no-op.
    pub fn release(&self) -> Result<()> {
        let mut state = self.lock();
        match std::mem::replace(&mut *state, SessionState::Released) {
            SessionState::Open(mut transport) => {
                transport.close()?;
                info!("LCD device released");
            }
            SessionState::Unopened => debug!("Released a session that was never opened"),
            SessionState::Released => debug!("Display session already released"),
        }
        Ok(())
    }
}
