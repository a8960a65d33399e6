//! Packet handler properties

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// Length of packet field 1 (PKT_FIELD_1_LENGTH, 0x120D)
///
/// For variable length packets field 1 carries the length byte of the
/// following field, so the driver sets it to 1 before arming RX with a length
/// of 0.
#[register(0x120Du16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PktField1Length {
    /// Field length in bytes, 13 bits
    pub length: u16,
}

impl FromByteArray for PktField1Length {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            length: u16::from_be_bytes(bytes) & 0x1FFF,
        })
    }
}

impl ToByteArray for PktField1Length {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok((self.length & 0x1FFF).to_be_bytes())
    }
}
