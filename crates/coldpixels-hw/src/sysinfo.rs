//! System information panels.
//!
//! The firmware has dedicated requests that draw a CPU, RAM/GPU, network or
//! fan panel from two readings. Readings travel in `wValue`/`wIndex`; the
//! payload is the decimal palette indices of the readings' colors written
//! back to back as ASCII digits.

use crate::protocol::{ControlRequest, Request};

/// A system information panel and its readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SysinfoPanel {
    Cpu {
        utilisation: u16,
        temperature: u16,
        utilisation_color: u8,
        temperature_color: u8,
    },
    RamGpu {
        ram: u16,
        temperature: u16,
        ram_color: u8,
        temperature_color: u8,
    },
    Network {
        received: u16,
        sent: u16,
        received_color: u8,
        sent_color: u8,
        /// Readings are in megabytes rather than kilobytes.
        received_mb: bool,
        sent_mb: bool,
    },
    Fan {
        cpu: u16,
        chassis: u16,
        cpu_color: u8,
        chassis_color: u8,
    },
}

impl SysinfoPanel {
    /// Returns the panel name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            SysinfoPanel::Cpu { .. } => "cpu",
            SysinfoPanel::RamGpu { .. } => "ram_gpu",
            SysinfoPanel::Network { .. } => "network",
            SysinfoPanel::Fan { .. } => "fan",
        }
    }

    /// Encodes the panel into its control transfer.
    pub fn encode(&self) -> ControlRequest {
        match *self {
            SysinfoPanel::Cpu {
                utilisation,
                temperature,
                utilisation_color,
                temperature_color,
            } => ControlRequest::with_payload(
                Request::DisplayCpuInfo,
                utilisation,
                temperature,
                format!("{}{}", utilisation_color, temperature_color).into_bytes(),
            ),
            SysinfoPanel::RamGpu {
                ram,
                temperature,
                ram_color,
                temperature_color,
            } => ControlRequest::with_payload(
                Request::DisplayRamGpuInfo,
                ram,
                temperature,
                format!("{}{}", ram_color, temperature_color).into_bytes(),
            ),
            SysinfoPanel::Network {
                received,
                sent,
                received_color,
                sent_color,
                received_mb,
                sent_mb,
            } => ControlRequest::with_payload(
                Request::DisplayNetworkInfo,
                received,
                sent,
                format!(
                    "{}{}{}{}",
                    u8::from(received_mb),
                    u8::from(sent_mb),
                    received_color,
                    sent_color
                )
                .into_bytes(),
            ),
            SysinfoPanel::Fan {
                cpu,
                chassis,
                cpu_color,
                chassis_color,
            } => ControlRequest::with_payload(
                Request::DisplayFanInfo,
                cpu,
                chassis,
                format!("{}{}", cpu_color, chassis_color).into_bytes(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextColor;

    #[test]
    fn test_cpu_panel() {
        let req = SysinfoPanel::Cpu {
            utilisation: 42,
            temperature: 61,
            utilisation_color: TextColor::Green.code(),
            temperature_color: TextColor::OrangeRed.code(),
        }
        .encode();
        assert_eq!(req.request, 21);
        assert_eq!((req.value, req.index), (42, 61));
        assert_eq!(req.payload, b"127".to_vec());
    }

    #[test]
    fn test_ram_gpu_and_fan_panels() {
        let req = SysinfoPanel::RamGpu {
            ram: 8,
            temperature: 55,
            ram_color: 5,
            temperature_color: 3,
        }
        .encode();
        assert_eq!((req.request, req.value, req.index), (22, 8, 55));
        assert_eq!(req.payload, b"53".to_vec());

        let req = SysinfoPanel::Fan {
            cpu: 1200,
            chassis: 800,
            cpu_color: 18,
            chassis_color: 30,
        }
        .encode();
        assert_eq!((req.request, req.value, req.index), (23, 1200, 800));
        assert_eq!(req.payload, b"1830".to_vec());
    }

    #[test]
    fn test_network_panel_flags() {
        let req = SysinfoPanel::Network {
            received: 512,
            sent: 3,
            received_color: 1,
            sent_color: 22,
            received_mb: false,
            sent_mb: true,
        }
        .encode();
        assert_eq!((req.request, req.value, req.index), (20, 512, 3));
        assert_eq!(req.payload, b"01122".to_vec());
    }
}
