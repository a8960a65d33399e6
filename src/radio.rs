//! Interrupt-driven radio state machine
//!
//! [`Radio`] owns the [`Device`], the [`Platform`] and the START_TX / START_RX
//! templates, and turns NIRQ edges into packet events:
//!
//! ```text
//!  NIRQ edge ──> PendingFlag ──> wait_for_event ──> GET_INT_STATUS (clear)
//!                                      │
//!                    ┌─────────────────┴─────────────────┐
//!               PACKET_RX / CRC_ERROR               PACKET_SENT
//!            wait_for_packet_or_error           wait_for_tx_complete
//! ```
//!
//! The radio is half-duplex. Every transmission ends by switching the antenna
//! back and re-arming RX with the last receive template.

use embedded_hal::{
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};

use crate::catalog::{self, CommandList};
use crate::commands::{
    ChangeState, ChipState, DeviceState, FifoInfo, FifoReset, GetIntStatus, InterruptStatus,
    PacketHandlerInterrupts, PartInfo, RequestDeviceState, RxArmConfig, StartRx, StartTx,
    StatusRead, TxConfig, FIFO_SIZE, SI4463_PART,
};
use crate::properties::{InterruptEnable, PaPowerLevel, PktField1Length};
use crate::{Device, Error, PendingFlag, Platform};

/// Radio configuration applied by [`Radio::init`]
#[derive(Debug, Clone, Copy)]
pub struct RadioConfig {
    /// Channel for both directions
    pub channel: u8,
    /// PA power level, 0..=127
    pub tx_power: u8,
    /// Command lists replayed after the boot configuration
    pub overlays: &'static [CommandList],
    /// Receive template. The channel is replaced by [`Self::channel`]
    pub rx: RxArmConfig,
    /// Transmit template. The channel is replaced by [`Self::channel`]
    pub tx: TxConfig,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            // HC-12 factory default
            channel: 1,
            tx_power: PaPowerLevel::MAX,
            overlays: &[],
            rx: RxArmConfig::default(),
            tx: TxConfig::default(),
        }
    }
}

/// What the driver believes the chip is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Constructed, [`Radio::init`] not run yet
    Idle,
    /// Put to sleep with [`Radio::halt`]
    Sleeping,
    /// Configured and not receiving
    Ready,
    /// START_RX issued with this template
    ArmedRx(RxArmConfig),
    /// START_TX issued with this template
    Transmitting(TxConfig),
}

/// End of a packet reception
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketEvent {
    /// A packet with a valid CRC is in the RX FIFO
    Received,
    /// A packet failed its CRC check
    CrcError,
}

/// Si4463 driver context.
///
/// Holds everything the main loop needs. The interrupt handler only ever
/// sees the [`PendingFlag`].
pub struct Radio<'a, SPI, CS, CTS, P> {
    device: Device<SPI, CS, CTS>,
    platform: P,
    pending: &'a PendingFlag,
    config: RadioConfig,
    rx: RxArmConfig,
    tx: TxConfig,
    armed: Option<RxArmConfig>,
    mode: Mode,
}

impl<'a, SPI, CS, CTS, P> Radio<'a, SPI, CS, CTS, P> {
    /// Creates a driver context. Nothing is sent until [`Radio::init`].
    pub fn new(
        device: Device<SPI, CS, CTS>,
        platform: P,
        pending: &'a PendingFlag,
        config: RadioConfig,
    ) -> Self {
        Self {
            device,
            platform,
            pending,
            rx: RxArmConfig {
                channel: config.channel,
                ..config.rx
            },
            tx: TxConfig {
                channel: config.channel,
                ..config.tx
            },
            config,
            armed: None,
            mode: Mode::Idle,
        }
    }

    /// Current driver mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Receive template used when re-arming
    pub fn rx_config(&self) -> RxArmConfig {
        self.rx
    }

    /// Transmit template
    pub fn tx_config(&self) -> TxConfig {
        self.tx
    }

    /// Whether an NIRQ edge arrived since the last event was consumed
    pub fn interrupt_pending(&self) -> bool {
        self.pending.is_set()
    }

    /// Raw access to the transport, for diagnostics
    pub fn device(&mut self) -> &mut Device<SPI, CS, CTS> {
        &mut self.device
    }

    /// Releases the transport and the platform.
    pub fn release(self) -> (Device<SPI, CS, CTS>, P) {
        (self.device, self.platform)
    }
}

impl<'a, SPI, CS, CTS, P> Radio<'a, SPI, CS, CTS, P>
where
    SPI: SpiBus,
    CS: OutputPin,
    CTS: InputPin,
    P: Platform,
{
    /// Powers up and configures the chip.
    ///
    /// Sends POWER_UP, checks the part number, replays the boot configuration
    /// and the configured overlays, enables the interrupts the driver waits
    /// on and applies channel and TX power.
    ///
    /// # Errors
    /// * `Error::UnexpectedPart` - Not an Si4463; nothing is written after
    ///   PART_INFO
    pub fn init(&mut self) -> Result<(), Error> {
        let mut boot = catalog::BOOT.commands();
        if let Some(power_up) = boot.next() {
            self.device.transact(power_up)?;
        }

        let info = self.device.execute_command(PartInfo)?;
        if info.part != SI4463_PART {
            error!("unexpected part {=u16:#x}", info.part);
            return Err(Error::UnexpectedPart(info.part));
        }
        debug!("Si{=u16:x} rom {=u8}", info.part, info.rom_id);

        for command in boot {
            debug!("boot command, {=usize} bytes", command.len());
            self.device.transact(command)?;
        }
        for overlay in self.config.overlays {
            for command in overlay.commands() {
                debug!("overlay command, {=usize} bytes", command.len());
                self.device.transact(command)?;
            }
        }

        self.device
            .write_property(InterruptEnable::driver_events())?;
        self.set_tx_power(self.config.tx_power)?;
        self.mode = Mode::Ready;
        self.set_channel(self.config.channel)
    }

    /// Sets the PA power level (0..=127).
    pub fn set_tx_power(&mut self, power: u8) -> Result<(), Error> {
        let level = PaPowerLevel::new(power).ok_or(Error::InvalidTxPower(power))?;
        self.device.write_property(level)
    }

    /// Selects the channel for both directions.
    ///
    /// If RX is armed it is re-armed on the new channel, which flushes the
    /// FIFOs.
    pub fn set_channel(&mut self, channel: u8) -> Result<(), Error> {
        self.rx.channel = channel;
        self.tx.channel = channel;

        if let Mode::ArmedRx(_) = self.mode {
            self.arm_rx(self.rx)?;
        }
        Ok(())
    }

    /// Puts the chip to sleep. Configuration is retained.
    pub fn halt(&mut self) -> Result<(), Error> {
        self.device.execute_command(ChangeState {
            state: ChipState::Sleep,
        })?;
        self.mode = Mode::Sleeping;
        Ok(())
    }

    /// Returns the chip to READY after [`Radio::halt`].
    pub fn wakeup(&mut self) -> Result<(), Error> {
        self.device.execute_command(ChangeState {
            state: ChipState::Ready,
        })?;
        self.mode = Mode::Ready;
        Ok(())
    }

    /// Reads the current chip state.
    pub fn chip_state(&mut self) -> Result<DeviceState, Error> {
        let state = self.device.execute_command(RequestDeviceState)?;
        debug!("chip state {}, channel {=u8}", state.state, state.channel);
        Ok(state)
    }

    /// Reads the latched interrupts.
    ///
    /// [`StatusRead::KeepPending`] has no side effects on the chip.
    pub fn interrupt_status(&mut self, read: StatusRead) -> Result<InterruptStatus, Error> {
        let status = self.device.execute_command(GetIntStatus { read })?;
        trace!(
            "ph {=u8:#x} modem {=u8:#x} chip {=u8:#x}",
            status.packet_handler.bits(),
            status.modem.bits(),
            status.chip.bits()
        );
        Ok(status)
    }

    /// Waits for an NIRQ edge and acknowledges everything pending.
    ///
    /// The flag is checked and the core halted inside one critical section,
    /// so an edge cannot slip in between. A status read that times out is
    /// reported as an empty status.
    pub fn wait_for_event(&mut self) -> Result<InterruptStatus, Error> {
        loop {
            let taken = critical_section::with(|cs| {
                if self.pending.take(cs) {
                    true
                } else {
                    self.platform.wait_for_interrupt();
                    false
                }
            });
            if taken {
                break;
            }
            self.platform.run_deferred_work();
        }

        match self.interrupt_status(StatusRead::ClearPending) {
            Err(Error::Timeout) => Ok(InterruptStatus::empty()),
            result => result,
        }
    }

    /// Waits until a packet ends, with or without a valid CRC.
    ///
    /// A valid packet wins if both bits are latched.
    pub fn wait_for_packet_or_error(&mut self) -> Result<PacketEvent, Error> {
        loop {
            let status = self.wait_for_event()?;
            if status
                .packet_handler
                .contains(PacketHandlerInterrupts::PACKET_RX)
            {
                return Ok(PacketEvent::Received);
            }
            if status
                .packet_handler
                .contains(PacketHandlerInterrupts::CRC_ERROR)
            {
                return Ok(PacketEvent::CrcError);
            }
            trace!("spurious wake");
        }
    }

    /// Waits until the packet in flight has been sent.
    pub fn wait_for_tx_complete(&mut self) -> Result<(), Error> {
        loop {
            let status = self.wait_for_event()?;
            if status
                .packet_handler
                .contains(PacketHandlerInterrupts::PACKET_SENT)
            {
                return Ok(());
            }
            trace!("wake while transmitting");
        }
    }

    /// Starts receiving with `config`.
    ///
    /// The FIFOs are flushed when the channel or length differs from the
    /// previous arm. A length of 0 selects variable length packets.
    pub fn arm_rx(&mut self, config: RxArmConfig) -> Result<(), Error> {
        if let Some(previous) = self.armed {
            if previous.channel != config.channel || previous.length != config.length {
                self.clear_fifos()?;
            }
        }

        if config.length == 0 {
            self.device
                .write_property(PktField1Length { length: 1 })?;
        }

        self.device.execute_command(StartRx { config })?;
        self.rx = config;
        self.armed = Some(config);
        self.mode = Mode::ArmedRx(config);
        Ok(())
    }

    /// Bytes waiting in the RX FIFO. A status read that times out counts as
    /// an empty FIFO.
    pub fn rx_fifo_count(&mut self) -> Result<usize, Error> {
        match self.device.execute_command(FifoInfo {
            reset: FifoReset::empty(),
        }) {
            Ok(fifo) => {
                trace!("rx fifo {=u8} bytes", fifo.rx_count);
                Ok(usize::from(fifo.rx_count))
            }
            Err(Error::Timeout) => Ok(0),
            Err(err) => Err(err),
        }
    }

    /// Reads up to `buf.len()` bytes from the RX FIFO. Returns the number of
    /// bytes read.
    pub fn read_rx_fifo(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let len = self.rx_fifo_count()?.min(buf.len());
        self.device.read_fifo(&mut buf[..len])?;
        Ok(len)
    }

    /// Flushes both FIFOs.
    pub fn clear_fifos(&mut self) -> Result<(), Error> {
        self.device.execute_command(FifoInfo {
            reset: FifoReset::RX | FifoReset::TX,
        })?;
        Ok(())
    }

    /// Appends `bytes` to the TX FIFO.
    pub fn write_tx_fifo(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if bytes.len() > FIFO_SIZE {
            return Err(Error::PayloadTooLong(bytes.len()));
        }
        self.device.write_fifo(bytes)
    }

    /// Sends `length` bytes from the TX FIFO.
    pub fn start_tx(&mut self, length: u16) -> Result<(), Error> {
        self.tx.length = length;
        self.device.execute_command(StartTx { config: self.tx })?;
        self.mode = Mode::Transmitting(self.tx);
        Ok(())
    }

    /// Sends one packet and returns to RX.
    ///
    /// Blocks until PACKET_SENT. Events seen while sending are acknowledged
    /// and dropped. If sending fails the antenna is switched back and the
    /// radio is left in [`Mode::Ready`]; the next [`Radio::receive`] arms RX.
    pub fn transmit(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if bytes.len() > FIFO_SIZE {
            return Err(Error::PayloadTooLong(bytes.len()));
        }

        self.device.transact(catalog::GPIO_TX)?;
        let sent = self
            .write_tx_fifo(bytes)
            .and_then(|()| self.start_tx(bytes.len() as u16))
            .and_then(|()| self.wait_for_tx_complete());
        let restored = self.device.transact(catalog::GPIO_RX);
        self.mode = Mode::Ready;
        if let Err(err) = sent {
            warn!("transmit failed");
            return Err(err);
        }
        restored?;

        self.arm_rx(self.rx)
    }

    /// Receives one fixed-size packet of `buf.len()` bytes.
    ///
    /// Returns the number of bytes read, or 0 after a CRC error. A packet
    /// that is already waiting in the FIFO is read without waiting for an
    /// edge. RX is re-armed afterwards unless the chip is still receiving.
    ///
    /// # Errors
    /// * `Error::BufferTooSmall` - `buf` is empty
    pub fn receive(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if buf.is_empty() {
            return Err(Error::BufferTooSmall { needed: 1, got: 0 });
        }
        let len = buf.len().min(FIFO_SIZE);
        let config = RxArmConfig {
            length: len as u16,
            ..self.rx
        };
        if self.mode != Mode::ArmedRx(config) {
            self.arm_rx(config)?;
        }

        let read = if self.rx_fifo_count()? >= len {
            // The edge of this packet is stale, its status is not.
            critical_section::with(|cs| self.pending.take(cs));
            let status = match self.interrupt_status(StatusRead::ClearPending) {
                Ok(status) => status,
                Err(Error::Timeout) => InterruptStatus::empty(),
                Err(err) => return Err(err),
            };
            let ph = status.packet_handler;
            if ph.contains(PacketHandlerInterrupts::CRC_ERROR)
                && !ph.contains(PacketHandlerInterrupts::PACKET_RX)
            {
                debug!("crc error on waiting packet");
                self.clear_fifos()?;
                0
            } else {
                self.read_rx_fifo(&mut buf[..len])?
            }
        } else {
            match self.wait_for_packet_or_error()? {
                PacketEvent::Received => self.read_rx_fifo(&mut buf[..len])?,
                PacketEvent::CrcError => {
                    debug!("crc error");
                    self.clear_fifos()?;
                    0
                }
            }
        };

        if read > 0 {
            self.clear_fifos()?;
        }

        let receiving = match self.chip_state() {
            Ok(state) => state.state == ChipState::Rx,
            Err(Error::Timeout | Error::Deserialization) => false,
            Err(err) => return Err(err),
        };
        if !receiving {
            self.arm_rx(config)?;
        }

        Ok(read)
    }

    /// Blocks for `ms` milliseconds.
    pub fn delay_ms(&mut self, ms: u32) {
        self.platform.delay_ms(ms);
    }
}
