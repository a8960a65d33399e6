//! FIFO commands

use bitflags::bitflags;
use core::convert::Infallible;

use regiface::{FromByteArray, ToByteArray};

use crate::Command;

/// Size of each of the two FIFOs, in bytes
pub const FIFO_SIZE: usize = 64;

/// READ_RX_FIFO opcode, handled outside the command processor
pub const READ_RX_FIFO: u8 = 0x77;

/// WRITE_TX_FIFO opcode, handled outside the command processor
pub const WRITE_TX_FIFO: u8 = 0x66;

bitflags! {
    /// FIFOs to reset
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FifoReset: u8 {
        /// Reset the RX FIFO
        const RX = 1 << 1;
        /// Reset the TX FIFO
        const TX = 1;
    }
}

impl ToByteArray for FifoReset {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.bits()])
    }
}

/// FIFO_INFO response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoStatus {
    /// Bytes waiting in the RX FIFO
    pub rx_count: u8,
    /// Free space in the TX FIFO
    pub tx_space: u8,
}

impl FromByteArray for FifoStatus {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            rx_count: bytes[0],
            tx_space: bytes[1],
        })
    }
}

/// FifoInfo command (0x15)
///
/// Reports FIFO occupancy and optionally resets either FIFO.
///
/// # Important Notes
/// - The counts are sampled before the reset takes effect
/// - An empty [`FifoReset`] only reads
#[derive(Debug, Clone)]
pub struct FifoInfo {
    /// FIFOs to reset
    pub reset: FifoReset,
}

impl Command for FifoInfo {
    type IdType = u8;
    type CommandParameters = FifoReset;
    type ResponseParameters = FifoStatus;

    fn id() -> Self::IdType {
        0x15
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.reset
    }
}
