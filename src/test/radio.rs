use super::sim::{AirEvent, Sim};

use crate::catalog::{self, FU2_WAKE_TIMER};
use crate::commands::{ChipState, PartInfo, RxArmConfig, StatusRead};
use crate::device::CTS_POLL_LIMIT;
use crate::properties::PaPowerLevel;
use crate::{Error, Mode, PacketEvent, PendingFlag, RadioConfig};

fn frame(fill: u8) -> Vec<u8> {
    let mut frame = vec![fill; 20];
    frame[0] = 0x18;
    frame[1] = 18;
    frame
}

#[test]
fn init_replays_boot_configuration() {
    let flag = PendingFlag::new();
    let sim = Sim::new();
    let mut radio = sim.radio(&flag, RadioConfig::default());

    radio.init().unwrap();

    let chip = sim.chip();
    let boot: Vec<&[u8]> = catalog::BOOT.commands().collect();
    assert_eq!(chip.frames[0], boot[0]);
    assert_eq!(chip.frames[1], [0x01]);
    for (sent, expected) in chip.frames[2..].iter().zip(&boot[1..]) {
        assert_eq!(sent.as_slice(), *expected);
    }
    // Interrupt enables and PA level follow the tables.
    assert_eq!(chip.frames.len(), 2 + boot.len() - 1 + 2);
    assert_eq!(chip.property(0x0100), Some(0x03));
    assert_eq!(chip.property(0x0101), Some(0x38));
    assert_eq!(chip.property(0x2201), Some(127));
    assert_eq!(radio.mode(), Mode::Ready);
    assert_eq!(radio.rx_config().channel, 1);
}

#[test]
fn init_rejects_other_parts_without_touching_the_chip() {
    let flag = PendingFlag::new();
    let sim = Sim::new();
    sim.chip().part = 0x1234;
    let mut radio = sim.radio(&flag, RadioConfig::default());

    assert_eq!(radio.init(), Err(Error::UnexpectedPart(0x1234)));

    let chip = sim.chip();
    assert_eq!(chip.frames.len(), 2, "only POWER_UP and PART_INFO");
    assert_eq!(chip.frames[1], [0x01]);
    assert!(chip.properties.is_empty());
    assert_eq!(radio.mode(), Mode::Idle);
}

#[test]
fn init_replays_overlays_after_boot() {
    static OVERLAYS: [crate::CommandList; 1] = [FU2_WAKE_TIMER];
    let flag = PendingFlag::new();
    let sim = Sim::new();
    let mut radio = sim.radio(
        &flag,
        RadioConfig {
            tx_power: 16,
            overlays: &OVERLAYS,
            ..Default::default()
        },
    );

    radio.init().unwrap();

    let chip = sim.chip();
    let overlay: Vec<&[u8]> = FU2_WAKE_TIMER.commands().collect();
    let start = chip.frames.len() - 2 - overlay.len();
    for (sent, expected) in chip.frames[start..].iter().zip(&overlay) {
        assert_eq!(sent.as_slice(), *expected);
    }
    // The explicit power level wins over the overlay's.
    assert_eq!(chip.property(0x2201), Some(16));
}

#[test]
fn response_poll_gives_up_after_limit() {
    let sim = Sim::new();
    sim.chip().cts_ready = false;
    let mut device = sim.device();

    assert_eq!(device.execute_command(PartInfo), Err(Error::Timeout));

    let chip = sim.chip();
    assert_eq!(chip.polls, usize::from(CTS_POLL_LIMIT));
    assert_eq!(chip.responses_read, 0);
}

#[test]
fn status_timeout_reads_as_no_event() {
    let flag = PendingFlag::new();
    let sim = Sim::new();
    let mut radio = sim.ready_radio(&flag);
    sim.chip().cts_ready = false;

    flag.notify_edge();
    let status = radio.wait_for_event().unwrap();

    assert!(status.is_empty());
    assert!(!flag.is_set());
}

#[test]
fn repeated_arm_is_idempotent() {
    let flag = PendingFlag::new();
    let sim = Sim::new();
    let mut radio = sim.ready_radio(&flag);
    let config = RxArmConfig {
        channel: 1,
        length: 20,
        ..Default::default()
    };

    radio.arm_rx(config).unwrap();
    let first = std::mem::take(&mut sim.chip().frames);
    let resets = sim.chip().fifo_resets;
    radio.arm_rx(config).unwrap();
    let second = std::mem::take(&mut sim.chip().frames);

    assert_eq!(first, second);
    assert_eq!(first, [vec![0x32, 1, 0, 0, 20, 0, 3, 3]]);
    assert_eq!(sim.chip().fifo_resets, resets);
    assert_eq!(radio.mode(), Mode::ArmedRx(config));
}

#[test]
fn variable_length_arm_sets_length_field() {
    let flag = PendingFlag::new();
    let sim = Sim::new();
    let mut radio = sim.ready_radio(&flag);

    radio
        .arm_rx(RxArmConfig {
            channel: 1,
            length: 0,
            ..Default::default()
        })
        .unwrap();

    let chip = sim.chip();
    assert_eq!(chip.frames[0], [0x11, 0x12, 0x02, 0x0D, 0x00, 0x01]);
    assert_eq!(chip.frames[1][..5], [0x32, 1, 0, 0, 0]);
}

#[test]
fn channel_change_flushes_fifos_and_rearms() {
    let flag = PendingFlag::new();
    let sim = Sim::new();
    let mut radio = sim.ready_radio(&flag);
    radio
        .arm_rx(RxArmConfig {
            channel: 1,
            length: 20,
            ..Default::default()
        })
        .unwrap();
    sim.chip().rx_fifo.extend([1, 2, 3]);
    let resets = sim.chip().fifo_resets;

    radio.set_channel(5).unwrap();

    let chip = sim.chip();
    assert_eq!(chip.fifo_resets, resets + 1);
    assert!(chip.rx_fifo.is_empty());
    assert_eq!(chip.channel, 5);
    assert_eq!(radio.tx_config().channel, 5);
    assert_eq!(chip.frames_with(0x32).last().unwrap()[1], 5);
}

#[test]
fn set_channel_while_idle_only_updates_templates() {
    let flag = PendingFlag::new();
    let sim = Sim::new();
    let mut radio = sim.ready_radio(&flag);

    radio.set_channel(9).unwrap();

    assert!(sim.chip().frames.is_empty());
    assert_eq!(radio.rx_config().channel, 9);
    assert_eq!(radio.tx_config().channel, 9);
}

#[test]
fn crc_error_yields_no_packet_then_recovers() {
    let flag = PendingFlag::new();
    let sim = Sim::new();
    let mut radio = sim.ready_radio(&flag);
    sim.chip().air.extend([
        AirEvent::Corrupt(frame(b'?')),
        AirEvent::Packet(frame(b'a')),
    ]);

    let mut buf = [0u8; 20];
    assert_eq!(radio.receive(&mut buf).unwrap(), 0);
    {
        let chip = sim.chip();
        assert!(chip.rx_fifo.is_empty());
        assert_eq!(chip.state, ChipState::Rx as u8, "re-armed after the error");
    }

    assert_eq!(radio.receive(&mut buf).unwrap(), 20);
    assert_eq!(buf.as_slice(), frame(b'a'));
    assert_eq!(sim.chip().state, ChipState::Rx as u8);
    assert!(sim.chip().air.is_empty());
}

#[test]
fn valid_packet_wins_over_crc_error() {
    let flag = PendingFlag::new();
    let sim = Sim::new();
    let mut radio = sim.ready_radio(&flag);
    {
        let mut chip = sim.chip();
        chip.ph_pend = 0x10 | 0x08;
        chip.air.push_back(AirEvent::Glitch);
    }

    assert_eq!(radio.wait_for_packet_or_error().unwrap(), PacketEvent::Received);
}

#[test]
fn spurious_wakes_are_skipped() {
    let flag = PendingFlag::new();
    let sim = Sim::new();
    let mut radio = sim.ready_radio(&flag);
    radio
        .arm_rx(RxArmConfig {
            channel: 1,
            length: 20,
            ..Default::default()
        })
        .unwrap();
    sim.chip().air.extend([
        AirEvent::Glitch,
        AirEvent::SyncDetect,
        AirEvent::Packet(frame(b'z')),
    ]);

    assert_eq!(radio.wait_for_packet_or_error().unwrap(), PacketEvent::Received);
    assert!(sim.chip().air.is_empty());
}

#[test]
fn waiting_packet_is_read_without_waiting() {
    let flag = PendingFlag::new();
    let sim = Sim::new();
    let mut radio = sim.ready_radio(&flag);
    let config = RxArmConfig {
        channel: 1,
        length: 20,
        ..Default::default()
    };
    radio.arm_rx(config).unwrap();
    sim.inject(AirEvent::Packet(frame(b'r')), &flag);
    assert!(flag.is_set());

    // Nothing scripted on the air: halting would panic.
    let mut buf = [0u8; 20];
    assert_eq!(radio.receive(&mut buf).unwrap(), 20);

    assert_eq!(buf.as_slice(), frame(b'r'));
    assert!(!flag.is_set(), "stale edge consumed");
    assert_eq!(sim.chip().ph_pend, 0, "stale status acknowledged");
    assert_eq!(radio.mode(), Mode::ArmedRx(config));
}

#[test]
fn corrupt_packet_waiting_in_fifo_is_discarded() {
    let flag = PendingFlag::new();
    let sim = Sim::new();
    let mut radio = sim.ready_radio(&flag);
    let config = RxArmConfig {
        channel: 1,
        length: 20,
        ..Default::default()
    };
    radio.arm_rx(config).unwrap();
    sim.inject(AirEvent::Corrupt(frame(b'?')), &flag);

    let mut buf = [0u8; 20];
    assert_eq!(radio.receive(&mut buf).unwrap(), 0);

    assert_eq!(buf, [0; 20]);
    assert!(!flag.is_set());
    let chip = sim.chip();
    assert!(chip.rx_fifo.is_empty());
    assert_eq!(chip.ph_pend, 0);
    assert_eq!(chip.state, ChipState::Rx as u8, "re-armed after the error");
}

#[test]
fn fifo_is_flushed_after_every_read() {
    let flag = PendingFlag::new();
    let sim = Sim::new();
    let mut radio = sim.ready_radio(&flag);
    let mut long = frame(b'x');
    long.extend([0xEE; 4]);
    sim.chip().air.push_back(AirEvent::Packet(long));

    let mut buf = [0u8; 20];
    assert_eq!(radio.receive(&mut buf).unwrap(), 20);

    assert!(sim.chip().rx_fifo.is_empty());
}

#[test]
fn rx_fifo_read_is_clamped_to_occupancy() {
    let flag = PendingFlag::new();
    let sim = Sim::new();
    let mut radio = sim.ready_radio(&flag);
    sim.chip().rx_fifo.extend([1, 2, 3]);

    let mut buf = [0u8; 8];
    assert_eq!(radio.read_rx_fifo(&mut buf).unwrap(), 3);
    assert_eq!(buf[..3], [1, 2, 3]);
    assert_eq!(radio.rx_fifo_count().unwrap(), 0);
}

#[test]
fn transmit_survives_sync_edge_and_returns_to_rx() {
    let flag = PendingFlag::new();
    let sim = Sim::new();
    let mut radio = sim.ready_radio(&flag);
    let config = RxArmConfig {
        channel: 1,
        length: 20,
        ..Default::default()
    };
    radio.arm_rx(config).unwrap();
    // An inbound sync word shows up before our own TX completes.
    sim.chip().air.push_back(AirEvent::SyncDetect);

    let packet = frame(b't');
    radio.transmit(&packet).unwrap();

    let chip = sim.chip();
    assert_eq!(chip.sent, [packet]);
    assert_eq!(chip.gpio, catalog::GPIO_RX);
    assert_eq!(chip.frames_with(0x13), [catalog::GPIO_TX, catalog::GPIO_RX]);
    assert_eq!(chip.frames_with(0x31), [vec![0x31, 1, 0x30, 0, 20, 0, 0]]);
    assert_eq!(chip.state, ChipState::Rx as u8);
    assert!(chip.air.is_empty());
    assert_eq!(radio.mode(), Mode::ArmedRx(config));
}

#[test]
fn failed_transmit_restores_antenna() {
    let flag = PendingFlag::new();
    let sim = Sim::new();
    let mut radio = sim.ready_radio(&flag);
    sim.chip().failing_opcode = Some(0x66);

    assert_eq!(radio.transmit(&frame(b't')), Err(Error::Spi));
    {
        let chip = sim.chip();
        assert!(chip.sent.is_empty());
        assert_eq!(chip.gpio, catalog::GPIO_RX);
        assert_eq!(chip.frames_with(0x13), [catalog::GPIO_TX, catalog::GPIO_RX]);
    }
    assert_eq!(radio.mode(), Mode::Ready);

    // The next receive arms RX again.
    {
        let mut chip = sim.chip();
        chip.failing_opcode = None;
        chip.air.push_back(AirEvent::Packet(frame(b'a')));
    }
    let mut buf = [0u8; 20];
    assert_eq!(radio.receive(&mut buf).unwrap(), 20);
    assert_eq!(buf.as_slice(), frame(b'a'));
}

#[test]
fn oversized_payload_is_rejected() {
    let flag = PendingFlag::new();
    let sim = Sim::new();
    let mut radio = sim.ready_radio(&flag);

    assert_eq!(radio.transmit(&[0; 65]), Err(Error::PayloadTooLong(65)));
    assert!(sim.chip().frames.is_empty());
}

#[test]
fn halt_and_wakeup() {
    let flag = PendingFlag::new();
    let sim = Sim::new();
    let mut radio = sim.ready_radio(&flag);

    radio.halt().unwrap();
    assert_eq!(sim.chip().frames.last().unwrap(), &[0x34, 0x01]);
    assert_eq!(radio.chip_state().unwrap().state, ChipState::Sleep);
    assert_eq!(radio.mode(), Mode::Sleeping);

    radio.wakeup().unwrap();
    assert_eq!(radio.chip_state().unwrap().state, ChipState::Ready);
    assert_eq!(radio.mode(), Mode::Ready);
}

#[test]
fn tx_power_is_range_checked() {
    let flag = PendingFlag::new();
    let sim = Sim::new();
    let mut radio = sim.ready_radio(&flag);

    radio.set_tx_power(40).unwrap();
    assert_eq!(sim.chip().property(0x2201), Some(40));
    let level: PaPowerLevel = radio.device().read_property().unwrap();
    assert_eq!(level.level, 40);

    assert_eq!(radio.set_tx_power(128), Err(Error::InvalidTxPower(128)));
    assert_eq!(sim.chip().property(0x2201), Some(40));
}

#[test]
fn diagnostic_status_read_keeps_pending_bits() {
    let flag = PendingFlag::new();
    let sim = Sim::new();
    let mut radio = sim.ready_radio(&flag);
    sim.chip().ph_pend = 0x10;

    let kept = radio.interrupt_status(StatusRead::KeepPending).unwrap();
    assert_eq!(kept.packet_handler.bits(), 0x10);
    assert_eq!(sim.chip().ph_pend, 0x10);

    radio.interrupt_status(StatusRead::ClearPending).unwrap();
    assert_eq!(sim.chip().ph_pend, 0);
}

#[test]
fn receive_rejects_empty_buffer() {
    let flag = PendingFlag::new();
    let sim = Sim::new();
    let mut radio = sim.ready_radio(&flag);

    assert_eq!(
        radio.receive(&mut []),
        Err(Error::BufferTooSmall { needed: 1, got: 0 })
    );
}
