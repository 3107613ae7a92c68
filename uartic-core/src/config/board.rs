//! Reference board assignment
//!
//! Channel, interrupt line and service request assignment for the XMC4500
//! reference board. Board crates with different wiring build their own
//! [`ChannelSetup`] arrays the same way.

use uartic_hal::UartHardware;

use super::channel::{ChannelConfig, ChannelId, InterruptRouting, IrqLine, ProtocolRouting};
use crate::channel::UartChannel;

/// Baud rate the reference board runs every channel at
pub const BOARD_BAUDRATE: u32 = 115200;

/// Static description of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelSetup {
    pub id: ChannelId,
    pub config: ChannelConfig,
    pub routing: InterruptRouting,
}

impl ChannelSetup {
    /// Bind this description to a hardware channel
    pub fn into_channel<H: UartHardware>(self, hw: H) -> UartChannel<H> {
        UartChannel::new(self.id, self.config, self.routing, hw)
    }
}

/// Channels 0, 2 and 3 as wired on the XMC4500 reference board
///
/// Only channel 0 monitors protocol faults.
pub const fn xmc4500_channels() -> [ChannelSetup; 3] {
    [
        ChannelSetup {
            id: ChannelId::Channel0,
            config: ChannelConfig::new(BOARD_BAUDRATE),
            routing: InterruptRouting::new(IrqLine::new(86, 60), IrqLine::new(85, 59), 2, 1)
                .with_protocol(ProtocolRouting::all(IrqLine::new(84, 58), 5)),
        },
        ChannelSetup {
            id: ChannelId::Channel2,
            config: ChannelConfig::new(BOARD_BAUDRATE),
            routing: InterruptRouting::new(IrqLine::new(91, 62), IrqLine::new(90, 61), 1, 0),
        },
        ChannelSetup {
            id: ChannelId::Channel3,
            config: ChannelConfig::new(BOARD_BAUDRATE),
            routing: InterruptRouting::new(IrqLine::new(93, 62), IrqLine::new(92, 61), 3, 2),
        },
    ]
}
