//! Si4463 Bus Transport
//!
//! This module provides the low-level interface to the Si4463 command
//! processor over SPI.
//!
//! The interface is built around the `Device<SPI, CS, CTS>` struct which wraps an
//! SPI bus, the chip select line and the CTS line (GPIO1 on HC-12 modules), and
//! provides methods for:
//! - Sending raw command frames and polling for their responses
//! - Executing typed commands
//! - Reading and writing properties
//! - Accessing the packet FIFOs
//!
//! Every transfer waits for CTS before selecting the chip and deselects it
//! afterwards, including when the transfer fails.
//!
//! # Example
//! ```no_run
//! # use embedded_hal::{digital::{InputPin, OutputPin}, spi::SpiBus};
//! use si4463::{commands::PartInfo, Device, Error};
//!
//! fn part<SPI: SpiBus, CS: OutputPin, CTS: InputPin>(
//!     device: &mut Device<SPI, CS, CTS>,
//! ) -> Result<u16, Error> {
//!     Ok(device.execute_command(PartInfo)?.part)
//! }
//! ```

use core::convert::Infallible;

use embedded_hal::{
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};
use regiface::{
    ByteArray, Command, FromByteArray, ReadableRegister, ToByteArray, WritableRegister,
};

use crate::commands::{
    CTS_READY, GET_PROPERTY, READ_CMD_BUFF, READ_RX_FIFO, SET_PROPERTY, WRITE_TX_FIFO,
};
use crate::Error;

/// Number of READ_CMD_BUFF polls before a response is given up on
pub const CTS_POLL_LIMIT: u16 = 0xFFFF;

/// Filler clocked out while reading
const FILLER: u8 = 0xFF;

/// Bus interface to the Si4463.
///
/// Owns the SPI bus, the chip select output and the CTS input. Chip select is
/// driven manually because a command is followed by a separate selection for
/// every response poll.
pub struct Device<SPI, CS, CTS> {
    spi: SPI,
    cs: CS,
    cts: CTS,
}

impl<SPI, CS, CTS> Device<SPI, CS, CTS> {
    /// Creates a new Device instance.
    ///
    /// # Arguments
    /// * `spi` - SPI bus connected to the radio
    /// * `cs` - Chip select (NSEL), active low
    /// * `cts` - Clear-to-send input, high when the command processor is idle
    pub fn new(spi: SPI, cs: CS, cts: CTS) -> Self {
        Self { spi, cs, cts }
    }

    /// Releases the bus and pins.
    pub fn release(self) -> (SPI, CS, CTS) {
        (self.spi, self.cs, self.cts)
    }
}

impl<SPI, CS, CTS> Device<SPI, CS, CTS>
where
    SPI: SpiBus,
    CS: OutputPin,
    CTS: InputPin,
{
    /// Spins until the command processor reports CTS.
    ///
    /// There is no timeout. The chip always raises CTS once it has finished
    /// the previous command.
    fn wait_for_cts(&mut self) -> Result<(), Error> {
        while !self.cts.is_high().map_err(|_| Error::Pin)? {}
        Ok(())
    }

    /// Runs `f` with the chip selected. Chip select is released even if `f`
    /// fails.
    fn selected<T>(
        &mut self,
        f: impl FnOnce(&mut SPI) -> Result<T, SPI::Error>,
    ) -> Result<T, Error> {
        self.cs.set_low().map_err(|_| Error::Pin)?;

        let result = match f(&mut self.spi) {
            Ok(value) => self.spi.flush().map(|()| value),
            Err(err) => Err(err),
        };
        let deselect = self.cs.set_high();

        let value = result.map_err(|_| Error::Spi)?;
        deselect.map_err(|_| Error::Pin)?;
        Ok(value)
    }

    /// Sends a complete command frame without reading a response.
    ///
    /// # Arguments
    /// * `command` - Opcode followed by its parameters
    ///
    /// # Errors
    /// * `Error::Spi` - SPI communication failed
    /// * `Error::Pin` - CTS or chip select access failed
    pub fn transact(&mut self, command: &[u8]) -> Result<(), Error> {
        self.wait_for_cts()?;
        self.selected(|spi| spi.write(command))
    }

    /// Sends a header and a payload inside a single selection.
    ///
    /// Used where the opcode and the data come from different places, such as
    /// property writes and TX FIFO fills.
    pub fn transact_with_payload(&mut self, header: &[u8], payload: &[u8]) -> Result<(), Error> {
        self.wait_for_cts()?;
        self.selected(|spi| {
            spi.write(header)?;
            if !payload.is_empty() {
                spi.write(payload)?;
            }
            Ok(())
        })
    }

    /// Sends a command and reads its response.
    ///
    /// # Errors
    /// * `Error::Timeout` - No response within [`CTS_POLL_LIMIT`] polls
    pub fn query(&mut self, command: &[u8], response: &mut [u8]) -> Result<(), Error> {
        self.transact(command)?;
        self.read_response(response)
    }

    /// Polls READ_CMD_BUFF until the pending response is ready and reads it.
    ///
    /// Each poll is its own selection. A poll that does not return `0xFF` is
    /// abandoned after its status byte. On success `response.len()` bytes are
    /// clocked in the same selection as the status byte.
    ///
    /// # Errors
    /// * `Error::Timeout` - The chip did not answer within [`CTS_POLL_LIMIT`]
    ///   polls; `response` is left untouched
    pub fn read_response(&mut self, response: &mut [u8]) -> Result<(), Error> {
        let mut polls: u16 = 0;

        loop {
            let ready = self.selected(|spi| {
                spi.write(&[READ_CMD_BUFF])?;

                let mut status = [FILLER];
                spi.transfer_in_place(&mut status)?;
                if status[0] != CTS_READY {
                    return Ok(false);
                }

                if !response.is_empty() {
                    response.fill(FILLER);
                    spi.transfer_in_place(response)?;
                }
                Ok(true)
            })?;

            if ready {
                return Ok(());
            }

            polls = polls.wrapping_add(1);
            if polls == CTS_POLL_LIMIT {
                warn!("no CTS after {=u16} polls", polls);
                return Err(Error::Timeout);
            }
        }
    }

    /// Executes a command on the device.
    ///
    /// Commands whose response type is empty are sent without polling for a
    /// response.
    ///
    /// # Type Parameters
    /// * `C` - Command type implementing the Command trait with u8 ID
    ///
    /// # Returns
    /// Command response parameters on success
    ///
    /// # Errors
    /// * `Error::Spi` - SPI communication failed
    /// * `Error::Timeout` - No response was reported
    /// * `Error::Deserialization` - Failed to parse command response
    pub fn execute_command<C>(&mut self, command: C) -> Result<C::ResponseParameters, Error>
    where
        C: Command<IdType = u8>,
        C::CommandParameters: ToByteArray<Error = Infallible>,
    {
        let request = match command.invoking_parameters().to_bytes() {
            Ok(request) => request,
            Err(never) => match never {},
        };
        let mut raw_response = <C::ResponseParameters as FromByteArray>::Array::new();

        self.transact_with_payload(&[C::id()], request.as_ref())?;
        if !raw_response.as_ref().is_empty() {
            self.read_response(raw_response.as_mut())?;
        }

        C::ResponseParameters::from_bytes(raw_response).map_err(|_| Error::Deserialization)
    }

    /// Reads a property from the device.
    ///
    /// # Type Parameters
    /// * `R` - Property type implementing ReadableRegister with u16 ID
    ///
    /// # Errors
    /// * `Error::Timeout` - GET_PROPERTY was never answered
    /// * `Error::Deserialization` - Failed to parse property value
    pub fn read_property<R>(&mut self) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u16>,
    {
        let [group, index] = R::id().to_be_bytes();
        let mut raw_value = R::Array::new();
        let count = raw_value.as_ref().len() as u8;

        self.query(&[GET_PROPERTY, group, count, index], raw_value.as_mut())?;

        R::from_bytes(raw_value).map_err(|_| Error::Deserialization)
    }

    /// Writes a property to the device.
    ///
    /// # Type Parameters
    /// * `R` - Property type implementing WritableRegister with u16 ID
    pub fn write_property<R>(&mut self, property: R) -> Result<(), Error>
    where
        R: WritableRegister<IdType = u16, Error = Infallible>,
    {
        let raw_value = match property.to_bytes() {
            Ok(raw_value) => raw_value,
            Err(never) => match never {},
        };
        let [group, index] = R::id().to_be_bytes();
        let count = raw_value.as_ref().len() as u8;

        self.transact_with_payload(&[SET_PROPERTY, group, count, index], raw_value.as_ref())
    }

    /// Reads `bytes.len()` bytes from the RX FIFO.
    ///
    /// FIFO access bypasses the command processor, so CTS is not checked.
    pub fn read_fifo(&mut self, bytes: &mut [u8]) -> Result<(), Error> {
        self.selected(|spi| {
            spi.write(&[READ_RX_FIFO])?;
            if !bytes.is_empty() {
                bytes.fill(FILLER);
                spi.transfer_in_place(bytes)?;
            }
            Ok(())
        })
    }

    /// Appends `bytes` to the TX FIFO.
    pub fn write_fifo(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.transact_with_payload(&[WRITE_TX_FIFO], bytes)
    }
}
