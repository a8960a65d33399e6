//! HC-12 compatible link layer
//!
//! HC-12 modules exchange fixed-size frames whose size depends on the air rate:
//!
//! ```text
//! ┌──────┬────────┬─────────────────┬──────────────┐
//! │ 0x18 │ length │ payload         │ ' ' padding  │
//! └──────┴────────┴─────────────────┴──────────────┘
//!  1 byte  1 byte   length bytes      up to frame size
//! ```
//!
//! Stock HC-12 firmware drops frames with a different header and does not
//! cope well with NUL bytes in the padding, hence the spaces.

use embedded_hal::{
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};

use crate::commands::FIFO_SIZE;
use crate::{Error, Platform, Radio};

/// First byte of every HC-12 frame
pub const HEADER: u8 = 0x18;

/// Fill byte after the payload
pub const PADDING: u8 = b' ';

/// Bytes in front of the payload
pub const OVERHEAD: usize = 2;

/// Air rates of the HC-12 firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AirRate {
    /// 5 kbps
    Kbps5,
    /// 15 kbps, the factory default
    #[default]
    Kbps15,
    /// 58 kbps
    Kbps58,
    /// 236 kbps
    Kbps236,
}

impl AirRate {
    /// On-air frame size
    pub const fn frame_size(self) -> usize {
        match self {
            AirRate::Kbps5 => 12,
            AirRate::Kbps15 => 20,
            AirRate::Kbps58 => 33,
            AirRate::Kbps236 => 49,
        }
    }

    /// Time a back-to-back follow-up frame needs to show up, in ms
    pub const fn guard_ms(self) -> u32 {
        match self {
            AirRate::Kbps5 => 24,
            AirRate::Kbps15 => 8,
            AirRate::Kbps58 => 4,
            AirRate::Kbps236 => 2,
        }
    }
}

/// Link layer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    /// Size of every frame on air, header included
    pub frame_size: usize,
    /// Wait after a reception before echoing
    pub guard_ms: u32,
    /// Receptions [`Link::echo`] tries before giving up
    pub max_receive_attempts: usize,
}

impl LinkConfig {
    /// Configuration matching an HC-12 at `rate`
    pub const fn for_rate(rate: AirRate) -> Self {
        Self {
            frame_size: rate.frame_size(),
            guard_ms: rate.guard_ms(),
            max_receive_attempts: 8,
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::for_rate(AirRate::default())
    }
}

/// Outcome of [`Link::receive`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Received<'a> {
    /// A valid frame; the payload borrows the caller's buffer
    Packet(&'a [u8]),
    /// Nothing usable arrived (CRC failure)
    NoPacket,
    /// A frame arrived with the wrong header byte
    MalformedHeader(u8),
}

/// Outcome of [`Link::echo`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Echo {
    /// A payload of this length was sent back
    Echoed(usize),
    /// The reception failed its CRC
    NoPacket,
    /// The reception had the wrong header byte
    Malformed(u8),
    /// Every attempt was followed by another frame; nothing was sent
    Deferred,
}

/// Builds a frame of `frame.len()` bytes around `payload`.
///
/// The payload is truncated to the room left after the header. Returns the
/// number of payload bytes that made it into the frame.
pub fn encode_frame(payload: &[u8], frame: &mut [u8]) -> usize {
    if frame.len() < OVERHEAD {
        return 0;
    }

    let len = payload.len().min(frame.len() - OVERHEAD).min(usize::from(u8::MAX));
    frame[0] = HEADER;
    frame[1] = len as u8;
    frame[OVERHEAD..OVERHEAD + len].copy_from_slice(&payload[..len]);
    frame[OVERHEAD + len..].fill(PADDING);
    len
}

/// Validates the first `received` bytes of `frame`.
///
/// A length byte that overshoots the received bytes is clamped. When the
/// buffer has room after the payload a NUL is written there.
pub fn decode_frame(frame: &mut [u8], received: usize) -> Received<'_> {
    let received = received.min(frame.len());
    if received == 0 {
        return Received::NoPacket;
    }

    let header = frame[0];
    if header != HEADER {
        warn!("invalid header {=u8:#x}", header);
        return Received::MalformedHeader(header);
    }
    if received < OVERHEAD {
        return Received::Packet(&[]);
    }

    let end = (OVERHEAD + usize::from(frame[1])).min(received);
    if end < frame.len() {
        frame[end] = 0;
    }
    Received::Packet(&frame[OVERHEAD..end])
}

/// HC-12 link on top of a [`Radio`]
pub struct Link<'a, SPI, CS, CTS, P> {
    radio: Radio<'a, SPI, CS, CTS, P>,
    config: LinkConfig,
}

impl<'a, SPI, CS, CTS, P> Link<'a, SPI, CS, CTS, P> {
    /// Wraps an initialized radio. The frame size is limited to one FIFO.
    pub fn new(radio: Radio<'a, SPI, CS, CTS, P>, config: LinkConfig) -> Self {
        Self {
            radio,
            config: LinkConfig {
                frame_size: config.frame_size.clamp(OVERHEAD, FIFO_SIZE),
                ..config
            },
        }
    }

    /// Active configuration
    pub fn config(&self) -> LinkConfig {
        self.config
    }

    /// The underlying radio
    pub fn radio(&mut self) -> &mut Radio<'a, SPI, CS, CTS, P> {
        &mut self.radio
    }

    /// Releases the radio.
    pub fn release(self) -> Radio<'a, SPI, CS, CTS, P> {
        self.radio
    }
}

impl<'a, SPI, CS, CTS, P> Link<'a, SPI, CS, CTS, P>
where
    SPI: SpiBus,
    CS: OutputPin,
    CTS: InputPin,
    P: Platform,
{
    /// Sends `payload` in one frame. Returns how much of it fit.
    pub fn send(&mut self, payload: &[u8]) -> Result<usize, Error> {
        let mut frame = [0u8; FIFO_SIZE];
        let frame = &mut frame[..self.config.frame_size];
        let sent = encode_frame(payload, frame);
        self.radio.transmit(frame)?;
        Ok(sent)
    }

    /// Receives one frame into `buf`.
    ///
    /// # Errors
    /// * `Error::BufferTooSmall` - `buf` is shorter than a frame
    pub fn receive<'b>(&mut self, buf: &'b mut [u8]) -> Result<Received<'b>, Error> {
        let frame_size = self.config.frame_size;
        if buf.len() < frame_size {
            return Err(Error::BufferTooSmall {
                needed: frame_size,
                got: buf.len(),
            });
        }

        let received = self.radio.receive(&mut buf[..frame_size])?;
        Ok(decode_frame(buf, received))
    }

    /// Receives a frame and sends its payload back.
    ///
    /// After a reception the link waits for the guard time. If another frame
    /// started arriving in the meantime, answering would collide with it, so
    /// that frame is received instead.
    pub fn echo(&mut self, buf: &mut [u8]) -> Result<Echo, Error> {
        for _ in 0..self.config.max_receive_attempts {
            let len = match self.receive(buf)? {
                Received::Packet(payload) => payload.len(),
                Received::NoPacket => return Ok(Echo::NoPacket),
                Received::MalformedHeader(header) => return Ok(Echo::Malformed(header)),
            };

            self.radio.delay_ms(self.config.guard_ms);
            if self.radio.interrupt_pending() {
                debug!("frame in flight, not echoing");
                continue;
            }

            let mut payload = [0u8; FIFO_SIZE];
            payload[..len].copy_from_slice(&buf[OVERHEAD..OVERHEAD + len]);
            self.send(&payload[..len])?;
            return Ok(Echo::Echoed(len));
        }

        Ok(Echo::Deferred)
    }
}
