//! Static configuration command catalog
//!
//! The Si4463 is configured by replaying an ordered list of API commands after
//! power-up. Most of them are SET_PROPERTY commands carrying calibrated RF
//! parameters (frequency deviation, data rate, preamble, sync word, CRC
//! polynomial, channel filter coefficients, PA setup). The values here must stay
//! byte-for-byte identical to the HC-12 reference configuration, otherwise peer
//! modules will not decode our frames.
//!
//! # Blob Format
//! Each list is a single static blob of length-prefixed commands:
//!
//! ```text
//! [len, opcode, params...] [len, opcode, params...] ... [0x00]
//! ```
//!
//! A set-property command is `[len, 0x11, group, count, index, values...]`
//! where `count == len - 4`.
//!
//! The catalog never touches the bus. [`CommandList::commands`] hands out
//! immutable byte slices which the radio passes to
//! [`Device::transact`](crate::Device::transact).

/// A length-prefixed, zero-terminated list of chip commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandList {
    blob: &'static [u8],
}

impl CommandList {
    /// Wraps a static command blob.
    pub const fn new(blob: &'static [u8]) -> Self {
        Self { blob }
    }

    /// Raw blob, including length prefixes and the terminator.
    pub const fn as_bytes(&self) -> &'static [u8] {
        self.blob
    }

    /// Iterates over the commands of the list in replay order.
    pub fn commands(&self) -> Commands<'static> {
        Commands { rest: self.blob }
    }
}

/// Iterator over the commands of a [`CommandList`].
///
/// Stops at the zero terminator. A length prefix that runs past the end of the
/// blob also ends the iteration rather than yielding a short command.
#[derive(Debug, Clone)]
pub struct Commands<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for Commands<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let (&len, tail) = self.rest.split_first()?;
        let len = len as usize;
        if len == 0 || tail.len() < len {
            self.rest = &[];
            return None;
        }
        let (command, rest) = tail.split_at(len);
        self.rest = rest;
        Some(command)
    }
}

/// Cold boot to configured-but-idle.
///
/// Starts with POWER_UP, so the radio replays the first entry, checks the part
/// number and only then replays the rest.
pub const BOOT: CommandList = CommandList::new(BOOT_BLOB);

/// HC-12 FU3 modem parameters, applied on top of [`BOOT`].
pub const FU3_MODEM: CommandList = CommandList::new(FU3_MODEM_BLOB);

/// HC-12 FU2 power saving overlay: enables the 32 kHz clock and programs the
/// wake-up timer (about 0.5 s period with a 1.5 ms listen window).
///
/// The chip runs the duty cycle autonomously once configured. No dedicated
/// re-arm sequencing is implemented for it.
pub const FU2_WAKE_TIMER: CommandList = CommandList::new(FU2_WAKE_TIMER_BLOB);

/// GPIO_PIN_CFG used while receiving (also the boot mapping).
///
/// GPIO0 TX state, GPIO1 CTS, GPIO2/GPIO3 antenna switch, NIRQ, SDO.
pub const GPIO_RX: &[u8] = &[0x13, 0x60, 0x48, 0x57, 0x56, 0x5a, 0x4b];

/// GPIO_PIN_CFG used while transmitting: antenna switch lines swapped.
pub const GPIO_TX: &[u8] = &[0x13, 0x60, 0x48, 0x56, 0x57, 0x5a, 0x4b];

#[rustfmt::skip]
const BOOT_BLOB: &[u8] = &[
    // POWER_UP: boot main app, TCXO off, 30 MHz XO
    0x07, 0x02, 0x01, 0x00, 0x01, 0xc9, 0xc3, 0x80,
    // GPIO_PIN_CFG: receive antenna map
    0x07, 0x13, 0x60, 0x48, 0x57, 0x56, 0x5a, 0x4b,
    // GLOBAL_XO_TUNE
    0x05, 0x11, 0x00, 0x01, 0x00, 0x48,
    // GLOBAL_CONFIG
    0x05, 0x11, 0x00, 0x01, 0x03, 0x40,
    // INT_CTL_ENABLE
    0x05, 0x11, 0x01, 0x01, 0x00, 0x00,
    // FRR_CTL_A_MODE..D
    0x08, 0x11, 0x02, 0x04, 0x00, 0x03, 0x07, 0x00, 0x00,
    // PREAMBLE_TX_LENGTH..
    0x0d, 0x11, 0x10, 0x09, 0x00, 0x06, 0x14, 0x00, 0x50, 0x31, 0x00, 0x00, 0x00, 0x00,
    // SYNC_CONFIG, SYNC_BITS
    0x09, 0x11, 0x11, 0x05, 0x00, 0x21, 0x89, 0x89, 0x00, 0x00,
    // PKT_CRC_CONFIG
    0x05, 0x11, 0x12, 0x01, 0x00, 0x81,
    // PKT_CONFIG1
    0x05, 0x11, 0x12, 0x01, 0x06, 0x02,
    // PKT_LEN, PKT_LEN_FIELD_SOURCE, PKT_LEN_ADJUST
    0x07, 0x11, 0x12, 0x03, 0x08, 0x00, 0x00, 0x00,
    // PKT_FIELD_1..3 LENGTH/CONFIG/CRC
    0x10, 0x11, 0x12, 0x0c, 0x0d, 0x00, 0x40, 0x06, 0xaa, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    // PKT_FIELD_4..5 LENGTH/CONFIG/CRC
    0x0c, 0x11, 0x12, 0x08, 0x19, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    // MODEM_MOD_TYPE..MODEM_FREQ_DEV_1
    0x10, 0x11, 0x20, 0x0c, 0x00, 0x03, 0x00, 0x07, 0x26, 0x25, 0xa0, 0x01, 0xc9, 0xc3, 0x80, 0x00, 0x22,
    // MODEM_FREQ_DEV_0
    0x05, 0x11, 0x20, 0x01, 0x0c, 0x22,
    // MODEM_TX_RAMP_DELAY..
    0x0c, 0x11, 0x20, 0x08, 0x18, 0x01, 0x00, 0x08, 0x03, 0x80, 0x00, 0x00, 0x30,
    // MODEM_BCR_OSR..
    0x0d, 0x11, 0x20, 0x09, 0x22, 0x00, 0x78, 0x04, 0x44, 0x44, 0x04, 0x44, 0x02, 0x00,
    // MODEM_AFC_GEAR..
    0x0b, 0x11, 0x20, 0x07, 0x2c, 0x00, 0x23, 0x8f, 0xff, 0x00, 0xde, 0xa0,
    // MODEM_AGC_CONTROL
    0x05, 0x11, 0x20, 0x01, 0x35, 0xe2,
    // MODEM_AGC_WINDOW_SIZE..
    0x0d, 0x11, 0x20, 0x09, 0x38, 0x22, 0x0d, 0x0d, 0x00, 0x1a, 0x40, 0x00, 0x00, 0x28,
    // MODEM_OOK_CNT1..
    0x0f, 0x11, 0x20, 0x0b, 0x42, 0xa4, 0x03, 0xd6, 0x03, 0x01, 0x0a, 0x01, 0x80, 0xff, 0x0c, 0x00,
    // MODEM_RSSI_COMP
    0x05, 0x11, 0x20, 0x01, 0x4e, 0x40,
    // MODEM_CLKGEN_BAND
    0x05, 0x11, 0x20, 0x01, 0x51, 0x0a,
    // MODEM_CHFLT_RX1 coefficients
    0x10, 0x11, 0x21, 0x0c, 0x00, 0x5b, 0x47, 0x0f, 0xc0, 0x6d, 0x25, 0xf4, 0xdb, 0xd6, 0xdf, 0xec, 0xf7,
    // MODEM_CHFLT_RX1/RX2 coefficients
    0x10, 0x11, 0x21, 0x0c, 0x0c, 0xfe, 0x01, 0x15, 0xf0, 0xff, 0x03, 0x5b, 0x47, 0x0f, 0xc0, 0x6d, 0x25,
    // MODEM_CHFLT_RX2 coefficients
    0x10, 0x11, 0x21, 0x0c, 0x18, 0xf4, 0xdb, 0xd6, 0xdf, 0xec, 0xf7, 0xfe, 0x01, 0x15, 0xf0, 0xff, 0x03,
    // PA_MODE, PA_PWR_LVL, PA_BIAS_CLKDUTY, PA_TC
    0x08, 0x11, 0x22, 0x04, 0x00, 0x08, 0x7f, 0x00, 0x5d,
    // SYNTH_PFDCP_CPFF..
    0x0b, 0x11, 0x23, 0x07, 0x00, 0x01, 0x05, 0x0b, 0x05, 0x02, 0x00, 0x03,
    // MATCH_VALUE_1..4
    0x10, 0x11, 0x30, 0x0c, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    // FREQ_CONTROL_INTE..
    0x0c, 0x11, 0x40, 0x08, 0x00, 0x38, 0x0d, 0xdd, 0xdd, 0x36, 0x9d, 0x20, 0xfe,
    // GET_INT_STATUS: clear everything latched during boot
    0x04, 0x20, 0x00, 0x00, 0x00,
    0x00,
];

#[rustfmt::skip]
const FU3_MODEM_BLOB: &[u8] = &[
    // MODEM_MOD_TYPE..MODEM_FREQ_DEV_1
    0x10, 0x11, 0x20, 0x0c, 0x00, 0x03, 0x00, 0x07, 0x00, 0xea, 0x60, 0x04, 0x2d, 0xc6, 0xc0, 0x00, 0x04,
    // MODEM_FREQ_DEV_0
    0x05, 0x11, 0x20, 0x01, 0x0c, 0x19,
    // MODEM_TX_RAMP_DELAY..
    0x0c, 0x11, 0x20, 0x08, 0x18, 0x01, 0x80, 0x08, 0x03, 0x80, 0x00, 0x20, 0x10,
    // MODEM_BCR_OSR..
    0x0d, 0x11, 0x20, 0x09, 0x22, 0x00, 0xa7, 0x03, 0x12, 0x6f, 0x01, 0x88, 0x02, 0xc2,
    // MODEM_AFC_GEAR..
    0x0b, 0x11, 0x20, 0x07, 0x2c, 0x04, 0x36, 0x80, 0x2c, 0x07, 0xe9, 0x80,
    // MODEM_AGC_WINDOW_SIZE..
    0x0d, 0x11, 0x20, 0x09, 0x38, 0x11, 0x25, 0x25, 0x00, 0x1a, 0x80, 0x00, 0x00, 0x29,
    // MODEM_OOK_CNT1..
    0x0f, 0x11, 0x20, 0x0b, 0x42, 0xa4, 0x02, 0xd6, 0x83, 0x01, 0x44, 0x01, 0x80, 0xff, 0x0c, 0x00,
    // MODEM_CHFLT_RX1 coefficients
    0x10, 0x11, 0x21, 0x0c, 0x00, 0xcc, 0xa1, 0x30, 0xa0, 0x21, 0xd1, 0xb9, 0xc9, 0xea, 0x05, 0x12, 0x11,
    // MODEM_CHFLT_RX1/RX2 coefficients
    0x10, 0x11, 0x21, 0x0c, 0x0c, 0x0a, 0x04, 0x15, 0xfc, 0x03, 0x00, 0xcc, 0xa1, 0x30, 0xa0, 0x21, 0xd1,
    // MODEM_CHFLT_RX2 coefficients
    0x10, 0x11, 0x21, 0x0c, 0x18, 0xb9, 0xc9, 0xea, 0x05, 0x12, 0x11, 0x0a, 0x04, 0x15, 0xfc, 0x03, 0x00,
    // PA_MODE, PA_PWR_LVL, PA_BIAS_CLKDUTY, PA_TC
    0x08, 0x11, 0x22, 0x04, 0x00, 0x08, 0x7f, 0x00, 0x3d,
    // SYNTH_PFDCP_CPFF..
    0x0b, 0x11, 0x23, 0x07, 0x00, 0x2c, 0x0e, 0x0b, 0x04, 0x0c, 0x73, 0x03,
    // PA_PWR_LVL
    0x05, 0x11, 0x22, 0x01, 0x01, 0x7f,
    0x00,
];

#[rustfmt::skip]
const FU2_WAKE_TIMER_BLOB: &[u8] = &[
    // GLOBAL_CLK_CFG
    0x05, 0x11, 0x00, 0x01, 0x01, 0x01,
    // GLOBAL_WUT_CONFIG..
    0x0a, 0x11, 0x00, 0x06, 0x04, 0x00, 0x0f, 0x5c, 0x20, 0x0d, 0x01,
    // PA_PWR_LVL
    0x05, 0x11, 0x22, 0x01, 0x01, 0x7f,
    0x00,
];
