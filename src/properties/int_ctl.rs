//! Interrupt control properties

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use crate::{ChipInterrupts, InterruptGroups, ModemInterrupts, PacketHandlerInterrupts};

/// Interrupt enables (INT_CTL_ENABLE..INT_CTL_CHIP_ENABLE, 0x0100)
///
/// Selects which pending interrupts pull NIRQ low. A group bit must be set
/// for any of its individual enables to have an effect.
#[register(0x0100u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct InterruptEnable {
    /// Group enables
    pub groups: InterruptGroups,
    /// Packet handler enables
    pub packet_handler: PacketHandlerInterrupts,
    /// Modem enables
    pub modem: ModemInterrupts,
    /// Chip enables
    pub chip: ChipInterrupts,
}

impl InterruptEnable {
    /// Enables for the events the driver waits on
    pub fn driver_events() -> Self {
        Self {
            groups: InterruptGroups::PACKET_HANDLER | InterruptGroups::MODEM,
            packet_handler: PacketHandlerInterrupts::PACKET_SENT
                | PacketHandlerInterrupts::PACKET_RX
                | PacketHandlerInterrupts::CRC_ERROR,
            modem: ModemInterrupts::SYNC_DETECT,
            chip: ChipInterrupts::empty(),
        }
    }
}

impl FromByteArray for InterruptEnable {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            groups: InterruptGroups::from_bits_retain(bytes[0]),
            packet_handler: PacketHandlerInterrupts::from_bits_retain(bytes[1]),
            modem: ModemInterrupts::from_bits_retain(bytes[2]),
            chip: ChipInterrupts::from_bits_retain(bytes[3]),
        })
    }
}

impl ToByteArray for InterruptEnable {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([
            self.groups.bits(),
            self.packet_handler.bits(),
            self.modem.bits(),
            self.chip.bits(),
        ])
    }
}
