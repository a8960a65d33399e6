//! Operational commands
//!
//! This module contains commands that move the radio's state machine:
//! - Direct state changes (sleep, ready)
//! - Transmit start with the post-TX state
//! - Receive start with timeout and next-state selection
//!
//! START_TX and START_RX take their arguments from a template ([`TxConfig`],
//! [`RxArmConfig`]) that the driver owns and updates in place.

use core::convert::Infallible;

use crate::{ChipState, Command, NoParameters, ToByteArray};

/// ChangeState command (0x34)
///
/// Forces the state machine into the given state.
///
/// # Important Notes
/// - SLEEP keeps the configuration; any SPI activity wakes the chip into
///   SPI_ACTIVE
/// - Use READY to leave SLEEP with the crystal running
#[derive(Debug, Clone)]
pub struct ChangeState {
    /// Target state
    pub state: ChipState,
}

impl Command for ChangeState {
    type IdType = u8;
    type CommandParameters = ChipState;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x34
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.state
    }
}

/// START_TX template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxConfig {
    /// Channel number
    pub channel: u8,
    /// State entered once the packet is sent
    pub next_state: ChipState,
    /// Number of bytes to send from the TX FIFO, 0 uses the packet handler
    /// field lengths
    pub length: u16,
    /// Delay between repeated packets
    pub delay: u8,
    /// Extra repetitions of the packet
    pub repeats: u8,
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            channel: 0,
            next_state: ChipState::Ready,
            length: 0,
            delay: 0,
            repeats: 0,
        }
    }
}

impl ToByteArray for TxConfig {
    type Error = Infallible;
    type Array = [u8; 6];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let [len_hi, len_lo] = self.length.to_be_bytes();

        // CONDITION: TXCOMPLETE_STATE in the high nibble, start immediately.
        Ok([
            self.channel,
            (self.next_state as u8) << 4,
            len_hi,
            len_lo,
            self.delay,
            self.repeats,
        ])
    }
}

/// StartTx command (0x31)
///
/// Sends the content of the TX FIFO.
///
/// # Important Notes
/// - The FIFO must be filled before this command is issued
/// - PACKET_SENT is raised once the last bit has left the antenna
/// - The chip then enters the configured next state
#[derive(Debug, Clone)]
pub struct StartTx {
    /// Transmit parameters
    pub config: TxConfig,
}

impl Command for StartTx {
    type IdType = u8;
    type CommandParameters = TxConfig;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x31
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.config
    }
}

/// START_RX template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxArmConfig {
    /// Channel number
    pub channel: u8,
    /// Wait for the wake-up timer before entering RX
    pub delayed_start: bool,
    /// Expected packet length, 0 for variable length packets
    pub length: u16,
    /// State entered when the preamble search times out
    pub timeout_state: ChipState,
    /// State entered after a valid packet
    pub valid_state: ChipState,
    /// State entered after an invalid packet
    pub invalid_state: ChipState,
}

impl Default for RxArmConfig {
    fn default() -> Self {
        Self {
            channel: 0,
            delayed_start: false,
            length: 0,
            timeout_state: ChipState::NoChange,
            valid_state: ChipState::Ready,
            invalid_state: ChipState::Ready,
        }
    }
}

impl ToByteArray for RxArmConfig {
    type Error = Infallible;
    type Array = [u8; 7];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let [len_hi, len_lo] = self.length.to_be_bytes();

        Ok([
            self.channel,
            self.delayed_start as u8,
            len_hi,
            len_lo,
            self.timeout_state as u8,
            self.valid_state as u8,
            self.invalid_state as u8,
        ])
    }
}

/// StartRx command (0x32)
///
/// Enters receive mode on the given channel.
///
/// # Important Notes
/// - Received bytes accumulate in the RX FIFO
/// - PACKET_RX or CRC_ERROR is raised at the end of each packet
/// - A length of 0 takes the packet length from the packet handler fields
#[derive(Debug, Clone)]
pub struct StartRx {
    /// Receive parameters
    pub config: RxArmConfig,
}

impl Command for StartRx {
    type IdType = u8;
    type CommandParameters = RxArmConfig;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x32
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.config
    }
}
