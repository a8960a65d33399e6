//! Power amplifier properties

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// PA level presets of the HC-12 `AT+Px` command, lowest first
pub const HC12_POWER_LEVELS: [u8; 8] = [4, 6, 9, 13, 18, 26, 40, 127];

/// PA power level property (PA_PWR_LVL, 0x2201)
///
/// Sets the output power of the power amplifier. The scale is roughly
/// logarithmic from 0 (PA off) to 127 (about +20 dBm on an Si4463).
///
/// # Important Notes
/// - Takes effect on the next transmission
/// - Values above 127 are not valid
#[register(0x2201u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PaPowerLevel {
    /// PA drive level, 0..=127
    pub level: u8,
}

impl PaPowerLevel {
    /// Highest accepted level
    pub const MAX: u8 = 127;

    /// Creates a power level, or `None` if `level` is above [`Self::MAX`]
    pub const fn new(level: u8) -> Option<Self> {
        if level <= Self::MAX {
            Some(Self { level })
        } else {
            None
        }
    }

    /// Maps an HC-12 power setting (1 = lowest, 8 = highest) to a PA level
    pub fn from_hc12_level(setting: u8) -> Option<Self> {
        let index = usize::from(setting.checked_sub(1)?);
        HC12_POWER_LEVELS
            .get(index)
            .map(|&level| Self { level })
    }
}

impl Default for PaPowerLevel {
    fn default() -> Self {
        Self { level: Self::MAX }
    }
}

impl FromByteArray for PaPowerLevel {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            level: bytes[0] & 0x7F,
        })
    }
}

impl ToByteArray for PaPowerLevel {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.level])
    }
}
