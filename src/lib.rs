#![cfg_attr(not(test), no_std)]
//! Si4463 Radio Driver
//!
//! This crate provides a type-safe interface for the Silicon Labs Si4463 sub-GHz
//! transceiver as found on HC-12 serial radio modules, together with a small
//! link layer that speaks the HC-12 over-the-air frame format.
//!
//! # Features
//! - Command transport with CTS handshaking over a plain SPI bus
//! - Static configuration tables replayed at power-up
//! - Interrupt-driven receive and transmit with a lock-free pending flag
//! - HC-12 compatible fixed-size frames for every module air rate
//!
//! # Architecture
//! The driver is organized into several layers:
//!
//! - [`device`]: Bus transport for the Si4463 command processor
//!   - Waits for CTS, frames commands, polls for responses
//!   - Typed property access through `regiface` registers
//!
//! - [`catalog`]: Static command lists replayed at init
//!
//! - [`commands`]: Typed command interface
//!   - [`commands::boot`]: part identification
//!   - [`commands::operational`]: state changes, START_TX / START_RX
//!   - [`commands::status`]: interrupt status and device state
//!   - [`commands::fifo`]: FIFO occupancy and reset
//!
//! - [`properties`]: Properties changed at run time
//!
//! - [`radio`]: Interrupt-driven state machine and packet I/O
//!
//! - [`link`]: HC-12 framing, receive validation and echo
//!
//! # Usage
//! The application owns a [`PendingFlag`] in a `static` and calls
//! [`PendingFlag::notify_edge`] from the NIRQ falling-edge handler. Everything
//! else runs on the main loop:
//!
//! 1. Create a [`Device`] from the SPI bus, chip select and CTS pins
//! 2. Wrap it in a [`Radio`] with a [`Platform`] and a [`RadioConfig`]
//! 3. Call [`Radio::init`] once
//! 4. Exchange frames with a [`Link`]
//!
//! # Important Notes
//! - The driver never touches the bus from interrupt context
//! - CRC failures and malformed frames are reported as "no packet", not as errors
//! - A failed [`Radio::init`] is final; the chip is left untouched after the
//!   part check fails
//!
//! # Example
//! ```no_run
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::SpiBus;
//! use si4463::{Device, Error, Link, LinkConfig, PendingFlag, Platform, Radio, RadioConfig};
//!
//! static RADIO_IRQ: PendingFlag = PendingFlag::new();
//!
//! fn run<SPI, CS, CTS, P>(spi: SPI, cs: CS, cts: CTS, platform: P) -> Result<(), Error>
//! where
//!     SPI: SpiBus,
//!     CS: OutputPin,
//!     CTS: InputPin,
//!     P: Platform,
//! {
//!     let device = Device::new(spi, cs, cts);
//!     let mut radio = Radio::new(device, platform, &RADIO_IRQ, RadioConfig::default());
//!     radio.init()?;
//!
//!     let mut link = Link::new(radio, LinkConfig::default());
//!     let mut frame = [0u8; 64];
//!     loop {
//!         link.echo(&mut frame)?;
//!     }
//! }
//! ```

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod catalog;
pub mod commands;
pub mod device;
mod error;
pub mod irq;
pub mod link;
mod platform;
pub mod properties;
pub mod radio;

#[cfg(test)]
mod test;

use regiface::*;

pub use catalog::CommandList;
pub use commands::*;
pub use device::Device;
pub use error::Error;
pub use irq::PendingFlag;
pub use link::{AirRate, Echo, Link, LinkConfig, Received};
pub use platform::Platform;
pub use properties::*;
pub use radio::{Mode, PacketEvent, Radio, RadioConfig};
