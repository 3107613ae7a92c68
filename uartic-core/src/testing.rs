//! Shared test fixtures

use uartic_hal::UartHardware;
use uartic_sim::{SimNvic, SimUsic};

use crate::callback::{EventData, UartCallback, UartEvent};
use crate::channel::{InitRequest, UartChannel};
use crate::config::{xmc4500_channels, ChannelConfig, ChannelId, InterruptRouting, IrqLine};
use crate::table::{ChannelTable, InterruptKind};

/// Class A channel without protocol monitoring
pub const ROUTING: InterruptRouting =
    InterruptRouting::new(IrqLine::new(86, 60), IrqLine::new(85, 59), 2, 1);

/// Class B channel without protocol monitoring
pub const ALT_ROUTING: InterruptRouting =
    InterruptRouting::new(IrqLine::new(88, 60), IrqLine::new(87, 59), 4, 3);

/// Callback that records everything it is told
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<UartEvent>,
    pub transmitted: Vec<Vec<u8>>,
    pub received: Vec<Vec<u8>>,
    pub chars: Vec<u8>,
}

impl Recorder {
    pub fn count(&self, event: UartEvent) -> usize {
        self.events.iter().filter(|e| **e == event).count()
    }
}

impl<H: UartHardware> UartCallback<H> for Recorder {
    fn on_event(&mut self, _uart: &mut UartChannel<H>, data: EventData, event: UartEvent) {
        self.events.push(event);
        match data {
            EventData::None => {}
            EventData::Char(unit) => self.chars.push(unit),
            EventData::Transmitted(buffer) => self.transmitted.push(buffer.to_vec()),
            EventData::Received(buffer) => self.received.push(buffer.to_vec()),
        }
    }
}

/// Copy `data` into a buffer that lives for the rest of the test run
pub fn leak(data: &[u8]) -> &'static [u8] {
    Box::leak(data.to_vec().into_boxed_slice())
}

/// Zeroed receive buffer that lives for the rest of the test run
pub fn leak_zeroed(len: usize) -> &'static mut [u8] {
    Box::leak(vec![0u8; len].into_boxed_slice())
}

/// Closed channel 0 on simulated hardware
pub fn channel(config: ChannelConfig) -> UartChannel<SimUsic> {
    UartChannel::new(ChannelId::Channel0, config, ROUTING, SimUsic::new())
}

/// Open channel 0 on simulated hardware
pub fn open_channel(config: ChannelConfig) -> UartChannel<SimUsic> {
    let mut uart = channel(config);
    uart.init(InitRequest::Open, &mut SimNvic::new()).unwrap();
    uart
}

/// Closed channel built from the reference board table
pub fn board_channel(index: usize) -> UartChannel<SimUsic> {
    xmc4500_channels()[index].into_channel(SimUsic::new())
}

/// Run interrupts and frame times for up to `frames` frames
pub fn pump<C: UartCallback<SimUsic>>(
    uart: &mut UartChannel<SimUsic>,
    callback: &mut C,
    frames: usize,
) {
    for _ in 0..frames {
        if uart.hardware_mut().tx_interrupt_pending() {
            uart.on_tx_interrupt(callback);
        }
        if uart.hardware_mut().rx_interrupt_pending() {
            uart.on_rx_interrupt(callback);
        }
        if uart.hardware().protocol_interrupt_pending() {
            uart.on_protocol_interrupt(callback);
        }
        uart.hardware_mut().shift();
    }
}

/// [`pump`] for every channel of a table
pub fn pump_table<C: UartCallback<SimUsic>, const N: usize>(
    table: &mut ChannelTable<SimUsic, C, N>,
    frames: usize,
) {
    for _ in 0..frames {
        for index in 0..N {
            let Some(channel) = table.channel_mut(index) else {
                continue;
            };
            let hw = channel.hardware_mut();
            let tx = hw.tx_interrupt_pending();
            let rx = hw.rx_interrupt_pending();
            let protocol = hw.protocol_interrupt_pending();

            if tx {
                table.on_interrupt(index, InterruptKind::Tx);
            }
            if rx {
                table.on_interrupt(index, InterruptKind::Rx);
            }
            if protocol {
                table.on_interrupt(index, InterruptKind::Error);
            }
            if let Some(channel) = table.channel_mut(index) {
                channel.hardware_mut().shift();
            }
        }
    }
}
