use serialport::{SerialPortInfo, SerialPortType};

use crate::error::{Result, TransportError};

/// Kind of device behind a serial port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortKind {
    /// USB serial adapter or CDC-ACM device.
    Usb {
        vid: u16,
        pid: u16,
        product: Option<String>,
    },
    Pci,
    Bluetooth,
    Unknown,
}

impl PortKind {
    /// Short label used in listings.
    pub fn label(&self) -> &'static str {
        match self {
            PortKind::Usb { .. } => "usb",
            PortKind::Pci => "pci",
            PortKind::Bluetooth => "bluetooth",
            PortKind::Unknown => "unknown",
        }
    }
}

/// A serial port present on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub name: String,
    pub kind: PortKind,
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        let kind = match info.port_type {
            SerialPortType::UsbPort(usb) => PortKind::Usb {
                vid: usb.vid,
                pid: usb.pid,
                product: usb.product,
            },
            SerialPortType::PciPort => PortKind::Pci,
            SerialPortType::BluetoothPort => PortKind::Bluetooth,
            SerialPortType::Unknown => PortKind::Unknown,
        };
        Self {
            name: info.port_name,
            kind,
        }
    }
}

/// List serial ports, sorted by name.
pub fn available_ports() -> Result<Vec<PortInfo>> {
    let mut ports: Vec<PortInfo> = serialport::available_ports()
        .map_err(TransportError::Enumerate)?
        .into_iter()
        .map(PortInfo::from)
        .collect();
    ports.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!(count = ports.len(), "enumerated serial ports");
    Ok(ports)
}

#[cfg(test)]
mod tests {
    use serialport::UsbPortInfo;

    use super::*;

    #[test]
    fn usb_port_info_converts() {
        let info = SerialPortInfo {
            port_name: "/dev/ttyACM0".to_string(),
            port_type: SerialPortType::UsbPort(UsbPortInfo {
                vid: 0x2e8a,
                pid: 0x000a,
                serial_number: None,
                manufacturer: None,
                product: Some("Pico".to_string()),
            }),
        };

        let port = PortInfo::from(info);
        assert_eq!(port.name, "/dev/ttyACM0");
        assert_eq!(port.kind.label(), "usb");
        assert!(matches!(
            port.kind,
            PortKind::Usb { vid: 0x2e8a, pid: 0x000a, .. }
        ));
    }

    #[test]
    fn non_usb_kinds_have_labels() {
        assert_eq!(PortKind::Pci.label(), "pci");
        assert_eq!(PortKind::Bluetooth.label(), "bluetooth");
        assert_eq!(PortKind::Unknown.label(), "unknown");
    }
}
