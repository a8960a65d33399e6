//! Radio command implementations
//!
//! This module contains typed Si4463 API commands. Every command implements
//! [`regiface::Command`] with a `u8` opcode and is issued through
//! [`Device::execute_command`](crate::Device::execute_command).
//!
//! # Command Categories
//! - [`boot`]: part identification after POWER_UP
//! - [`operational`]: state changes and the START_TX / START_RX templates
//!   - [`TxConfig`]: channel, post-TX state, length, repeat count
//!   - [`RxArmConfig`]: channel, expected length, next states
//! - [`status`]: interrupt status and device state queries
//! - [`fifo`]: FIFO occupancy and reset
//!
//! # Command Execution
//! The Si4463 command processor drives CTS high when it can accept a command.
//! The driver waits for CTS before selecting the chip, writes the opcode and
//! parameters, and deselects. Commands with a response are then polled with
//! READ_CMD_BUFF until the chip answers `0xFF`, after which the response bytes
//! follow in the same transfer.
//!
//! # Important Notes
//! - FIFO reads and writes bypass the command processor
//! - SET_PROPERTY commands are issued through the typed properties in
//!   [`properties`](crate::properties) or replayed from the [`catalog`](crate::catalog)
//! - Responses must be read before the next command is sent

pub mod boot;
pub mod fifo;
pub mod operational;
pub mod status;

pub use boot::*;
pub use fifo::*;
pub use operational::*;
pub use status::*;

/// READ_CMD_BUFF: polls CTS and clocks out the pending response
pub const READ_CMD_BUFF: u8 = 0x44;

/// Value READ_CMD_BUFF returns once the response is ready
pub const CTS_READY: u8 = 0xFF;

/// SET_PROPERTY opcode
pub const SET_PROPERTY: u8 = 0x11;

/// GET_PROPERTY opcode
pub const GET_PROPERTY: u8 = 0x12;
