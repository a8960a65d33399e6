//! Boot commands
//!
//! POWER_UP itself is replayed from [`catalog::BOOT`](crate::catalog::BOOT).
//! PART_INFO is issued right after it to make sure the driver is talking to an
//! Si4463 before the rest of the configuration goes out.

use core::convert::Infallible;

use regiface::FromByteArray;

use crate::{Command, NoParameters};

/// Part number reported by an Si4463
pub const SI4463_PART: u16 = 0x4463;

/// PART_INFO response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PartInfoResponse {
    /// Chip mask revision
    pub chip_rev: u8,
    /// Part number, e.g. 0x4463
    pub part: u16,
    /// Part build
    pub part_build: u8,
    /// Device ID
    pub id: u16,
    /// Customer ID
    pub customer: u8,
    /// ROM ID (0x03 = revB1B, 0x06 = revC2A)
    pub rom_id: u8,
}

impl FromByteArray for PartInfoResponse {
    type Error = Infallible;
    type Array = [u8; 8];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            chip_rev: bytes[0],
            part: u16::from_be_bytes([bytes[1], bytes[2]]),
            part_build: bytes[3],
            id: u16::from_be_bytes([bytes[4], bytes[5]]),
            customer: bytes[6],
            rom_id: bytes[7],
        })
    }
}

/// PART_INFO command (0x01)
///
/// Reports basic information about the device.
///
/// # Important Notes
/// - Only valid after POWER_UP
/// - CTS may stay low for a while after POWER_UP while the chip boots
#[derive(Debug, Clone)]
pub struct PartInfo;

impl Command for PartInfo {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = PartInfoResponse;

    fn id() -> Self::IdType {
        0x01
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_info_decodes_big_endian_fields() {
        let info =
            PartInfoResponse::from_bytes([0x11, 0x44, 0x63, 0x00, 0x86, 0x00, 0x00, 0x06]).unwrap();

        assert_eq!(info.part, SI4463_PART);
        assert_eq!(info.chip_rev, 0x11);
        assert_eq!(info.id, 0x8600);
        assert_eq!(info.rom_id, 0x06);
    }
}
