//! Driver error type

use core::fmt;

/// Errors reported by the driver.
///
/// Noise on the channel is not an error: CRC failures and malformed frames are
/// reported as "no packet" outcomes by [`Radio`](crate::Radio) and
/// [`Link`](crate::Link) instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// SPI transfer failed
    Spi,
    /// Chip select or CTS pin access failed
    Pin,
    /// The command processor never reported CTS within the poll limit
    Timeout,
    /// A command response could not be decoded
    Deserialization,
    /// PART_INFO reported a part number other than 0x4463
    UnexpectedPart(u16),
    /// PA power level outside 0..=127
    InvalidTxPower(u8),
    /// Payload does not fit the 64 byte TX FIFO
    PayloadTooLong(usize),
    /// Caller supplied buffer is shorter than a frame
    BufferTooSmall {
        /// Bytes required
        needed: usize,
        /// Bytes supplied
        got: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Spi => f.write_str("SPI transfer failed"),
            Error::Pin => f.write_str("GPIO access failed"),
            Error::Timeout => f.write_str("timed out waiting for CTS"),
            Error::Deserialization => f.write_str("malformed command response"),
            Error::UnexpectedPart(part) => write!(f, "unexpected part number {:#06x}", part),
            Error::InvalidTxPower(power) => write!(f, "TX power {} out of range", power),
            Error::PayloadTooLong(len) => write!(f, "payload of {} bytes exceeds the TX FIFO", len),
            Error::BufferTooSmall { needed, got } => {
                write!(f, "buffer too small: need {} bytes, got {}", needed, got)
            }
        }
    }
}
