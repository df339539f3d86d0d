//! USB transport for the panel.
//!
//! The session only needs two capabilities: finding and opening the panel
//! ([`Discovery`]) and pushing vendor control transfers to it ([`Transport`]).
//! [`UsbDiscovery`] and [`UsbTransport`] provide them on top of `nusb`.

use crate::protocol::{wire_length, ControlRequest};
use crate::{Error, Result};
use nusb::transfer::{Control, ControlType, Recipient};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Interface claimed on the panel for control transfers.
const PANEL_INTERFACE: u8 = 0;

/// Longest timeout usbfs accepts (a 32-bit millisecond count).
const MAX_TIMEOUT: Duration = Duration::from_millis(u32::MAX as u64);

/// Caps `timeout` to what the host controller accepts.
fn clamp_timeout(timeout: Duration) -> Duration {
    timeout.min(MAX_TIMEOUT)
}

/// Delivers control transfers to an opened device.
pub trait Transport: Send {
    /// Sends `request` as a vendor control-out transfer, returning the number
    /// of payload bytes written.
    fn control_out(&mut self, request: &ControlRequest, timeout: Duration) -> Result<usize>;

    /// Releases the device handle.
    fn close(&mut self) -> Result<()>;
}

/// Finds and opens a device by VID:PID.
pub trait Discovery {
    type Transport: Transport;

    /// Opens the first device matching `vendor_id`/`product_id`.
    fn open(&self, vendor_id: u16, product_id: u16) -> Result<Self::Transport>;
}

/// Discovery over the host's USB buses.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsbDiscovery;

impl Discovery for UsbDiscovery {
    type Transport = UsbTransport;

    fn open(&self, vendor_id: u16, product_id: u16) -> Result<UsbTransport> {
        let devices: Vec<_> = nusb::list_devices()?
            .filter(|d| d.vendor_id() == vendor_id && d.product_id() == product_id)
            .collect();

        for dev in &devices {
            debug!(
                "Found USB device: bus={}, address={}",
                dev.bus_number(),
                dev.device_address()
            );
        }

        let device_info = devices.first().ok_or(Error::DeviceNotFound)?;
        if devices.len() > 1 {
            warn!(
                "{} matching LCD devices found, using the first one",
                devices.len()
            );
        }

        let device = device_info.open()?;
        let interface = device.claim_interface(PANEL_INTERFACE)?;

        info!(
            "LCD device opened (VID:{:04X} PID:{:04X}, bus={}, address={})",
            vendor_id,
            product_id,
            device_info.bus_number(),
            device_info.device_address()
        );

        Ok(UsbTransport {
            interface: Some(interface),
        })
    }
}

/// A claimed USB interface on the panel.
pub struct UsbTransport {
    interface: Option<nusb::Interface>,
}

impl Transport for UsbTransport {
    fn control_out(&mut self, request: &ControlRequest, timeout: Duration) -> Result<usize> {
        let interface = self.interface.as_ref().ok_or(Error::Released)?;
        wire_length(request.request, request.payload.len())?;
        let control = Control {
            control_type: ControlType::Vendor,
            recipient: Recipient::Device,
            request: request.request,
            value: request.value,
            index: request.index,
        };
        interface
            .control_out_blocking(control, &request.payload, clamp_timeout(timeout))
            .map_err(|source| Error::Transfer {
                request: request.request,
                source,
            })
    }

    fn close(&mut self) -> Result<()> {
        // Dropping the interface releases it and closes the device.
        if self.interface.take().is_some() {
            debug!("USB interface released");
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_clamped() {
        let secs = Duration::from_secs(5);
        assert_eq!(clamp_timeout(secs), secs);
        assert_eq!(clamp_timeout(Duration::from_secs(u64::MAX)), MAX_TIMEOUT);
        assert_eq!(MAX_TIMEOUT.as_millis(), u128::from(u32::MAX));
    }

    // Hardware tests are skipped by default
    #[test]
    #[ignore]
    fn test_device_open() {
        let transport = UsbDiscovery.open(crate::PANEL_VID, crate::PANEL_PID);
        assert!(transport.is_ok());
    }
}
