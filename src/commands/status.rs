//! Status commands
//!
//! This module contains commands for monitoring the radio:
//! - Latched interrupt status (GET_INT_STATUS)
//! - Current state machine state and channel (REQUEST_DEVICE_STATE)
//!
//! GET_INT_STATUS doubles as the interrupt acknowledge. Reading it with
//! [`StatusRead::ClearPending`] clears every latched bit and releases NIRQ;
//! [`StatusRead::KeepPending`] leaves the chip untouched and is meant for
//! diagnostics.

use bitflags::bitflags;
use core::convert::Infallible;

use regiface::{FromByteArray, ToByteArray};

use crate::{Command, NoParameters};

/// Error type for invalid chip state values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipStateError {
    /// The value does not correspond to a valid chip state
    InvalidValue(u8),
}

/// State of the radio's main state machine
///
/// Used both as the argument of CHANGE_STATE and as a next-state selector in
/// the START_TX / START_RX templates, where [`ChipState::NoChange`] means
/// "stay where you are".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipState {
    /// Remain in the current state
    NoChange = 0,
    /// SLEEP: only the wake-up timer and SPI interface are alive
    Sleep = 1,
    /// SPI_ACTIVE: SPI and LDO running, crystal off
    SpiActive = 2,
    /// READY: crystal running, synthesizer off
    Ready = 3,
    /// Alternate encoding of READY
    Ready2 = 4,
    /// TX_TUNE: synthesizer locked for TX
    TxTune = 5,
    /// RX_TUNE: synthesizer locked for RX
    RxTune = 6,
    /// TX: transmitting
    Tx = 7,
    /// RX: receiving or searching for preamble
    Rx = 8,
}

impl TryFrom<u8> for ChipState {
    type Error = ChipStateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NoChange),
            1 => Ok(Self::Sleep),
            2 => Ok(Self::SpiActive),
            3 => Ok(Self::Ready),
            4 => Ok(Self::Ready2),
            5 => Ok(Self::TxTune),
            6 => Ok(Self::RxTune),
            7 => Ok(Self::Tx),
            8 => Ok(Self::Rx),
            invalid => Err(ChipStateError::InvalidValue(invalid)),
        }
    }
}

impl ToByteArray for ChipState {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self as u8])
    }
}

bitflags! {
    /// Interrupt groups reported in INT_PEND
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InterruptGroups: u8 {
        /// At least one chip interrupt is pending
        const CHIP = 1 << 2;
        /// At least one modem interrupt is pending
        const MODEM = 1 << 1;
        /// At least one packet handler interrupt is pending
        const PACKET_HANDLER = 1;
    }
}

bitflags! {
    /// Packet handler interrupts (PH_PEND)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PacketHandlerInterrupts: u8 {
        /// Received packet matched the address filter
        const FILTER_MATCH = 1 << 7;
        /// Received packet was rejected by the address filter
        const FILTER_MISS = 1 << 6;
        /// Transmission of the packet completed
        const PACKET_SENT = 1 << 5;
        /// A valid packet was received
        const PACKET_RX = 1 << 4;
        /// A packet was received with a CRC error
        const CRC_ERROR = 1 << 3;
        /// Alternate CRC check failed
        const ALT_CRC_ERROR = 1 << 2;
        /// TX FIFO fell below its almost-empty threshold
        const TX_FIFO_ALMOST_EMPTY = 1 << 1;
        /// RX FIFO rose above its almost-full threshold
        const RX_FIFO_ALMOST_FULL = 1;
    }
}

bitflags! {
    /// Modem interrupts (MODEM_PEND)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModemInterrupts: u8 {
        /// RSSI latched
        const RSSI_LATCH = 1 << 7;
        /// Postamble detected
        const POSTAMBLE_DETECT = 1 << 6;
        /// Sync word search timed out
        const INVALID_SYNC = 1 << 5;
        /// RSSI jumped by more than the configured threshold
        const RSSI_JUMP = 1 << 4;
        /// RSSI above threshold
        const RSSI = 1 << 3;
        /// Preamble search timed out
        const INVALID_PREAMBLE = 1 << 2;
        /// Preamble detected
        const PREAMBLE_DETECT = 1 << 1;
        /// Sync word detected
        const SYNC_DETECT = 1;
    }
}

bitflags! {
    /// Chip interrupts (CHIP_PEND)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChipInterrupts: u8 {
        /// Calibration requested
        const CAL = 1 << 6;
        /// TX FIFO underflow or RX FIFO overflow
        const FIFO_UNDERFLOW_OVERFLOW_ERROR = 1 << 5;
        /// State machine changed state
        const STATE_CHANGE = 1 << 4;
        /// Last command was invalid
        const CMD_ERROR = 1 << 3;
        /// Chip finished booting
        const CHIP_READY = 1 << 2;
        /// Battery voltage below threshold
        const LOW_BATT = 1 << 1;
        /// Wake-up timer expired
        const WUT = 1;
    }
}

/// Pending interrupts reported by GET_INT_STATUS
///
/// Only the PEND bytes are kept. The STATUS bytes mirror live conditions and
/// the driver never looks at them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptStatus {
    /// Groups with at least one pending interrupt
    pub groups: InterruptGroups,
    /// Packet handler interrupts
    pub packet_handler: PacketHandlerInterrupts,
    /// Modem interrupts
    pub modem: ModemInterrupts,
    /// Chip interrupts
    pub chip: ChipInterrupts,
}

#[cfg(feature = "defmt")]
impl defmt::Format for InterruptStatus {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(
            f,
            "InterruptStatus(ph {=u8:#x} modem {=u8:#x} chip {=u8:#x})",
            self.packet_handler.bits(),
            self.modem.bits(),
            self.chip.bits()
        )
    }
}

impl InterruptStatus {
    /// Status with no bits set
    pub const fn empty() -> Self {
        Self {
            groups: InterruptGroups::empty(),
            packet_handler: PacketHandlerInterrupts::empty(),
            modem: ModemInterrupts::empty(),
            chip: ChipInterrupts::empty(),
        }
    }

    /// Whether no interrupt at all is pending
    pub fn is_empty(&self) -> bool {
        self.packet_handler.is_empty() && self.modem.is_empty() && self.chip.is_empty()
    }
}

impl Default for InterruptStatus {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromByteArray for InterruptStatus {
    type Error = Infallible;
    type Array = [u8; 8];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            groups: InterruptGroups::from_bits_retain(bytes[0]),
            packet_handler: PacketHandlerInterrupts::from_bits_retain(bytes[2]),
            modem: ModemInterrupts::from_bits_retain(bytes[4]),
            chip: ChipInterrupts::from_bits_retain(bytes[6]),
        })
    }
}

/// How GET_INT_STATUS treats the latched bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusRead {
    /// Acknowledge everything that is pending
    ClearPending,
    /// Report without acknowledging
    KeepPending,
}

impl ToByteArray for StatusRead {
    type Error = Infallible;
    type Array = [u8; 3];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        // A zero bit clears the corresponding pending bit.
        Ok(match self {
            StatusRead::ClearPending => [0x00, 0x00, 0x00],
            StatusRead::KeepPending => [0xFF, 0xFF, 0xFF],
        })
    }
}

/// GetIntStatus command (0x20)
///
/// Returns the pending interrupts of all three groups and optionally
/// acknowledges them.
///
/// # Important Notes
/// - NIRQ stays low until every enabled pending bit is cleared
/// - A packet that arrives between reading and clearing is lost from the
///   status, but not from the FIFO
#[derive(Debug, Clone)]
pub struct GetIntStatus {
    /// Whether to clear what was read
    pub read: StatusRead,
}

impl Command for GetIntStatus {
    type IdType = u8;
    type CommandParameters = StatusRead;
    type ResponseParameters = InterruptStatus;

    fn id() -> Self::IdType {
        0x20
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.read
    }
}

/// REQUEST_DEVICE_STATE response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceState {
    /// Current main state
    pub state: ChipState,
    /// Channel currently selected
    pub channel: u8,
}

impl FromByteArray for DeviceState {
    type Error = ChipStateError;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            state: ChipState::try_from(bytes[0] & 0x0F)?,
            channel: bytes[1],
        })
    }
}

/// RequestDeviceState command (0x33)
///
/// Reads the current state of the main state machine.
#[derive(Debug, Clone)]
pub struct RequestDeviceState;

impl Command for RequestDeviceState {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = DeviceState;

    fn id() -> Self::IdType {
        0x33
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}
