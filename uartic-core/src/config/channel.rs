//! Channel configuration types
//!
//! Frame format, operating mode, FIFO sizing and interrupt routing for one
//! USIC channel. Everything here is fixed once the channel is built, except
//! the baud rate which `UartChannel::set_baudrate` may change.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use uartic_hal::{FifoSize, ProtocolEvents, UartConfig};

use crate::error::UartError;

/// Number of USIC channels a table can address
pub const MAX_CHANNELS: usize = 4;

/// Baud rates `set_baudrate` accepts
pub const SUPPORTED_BAUDRATES: [u32; 6] = [1200, 4800, 9600, 19200, 38400, 115200];

/// Highest interrupt priority value the NVIC implements (6 bits)
pub const MAX_PRIORITY: u8 = 0x3F;

/// Check if `baudrate` is one of [`SUPPORTED_BAUDRATES`]
pub fn is_supported_baudrate(baudrate: u32) -> bool {
    SUPPORTED_BAUDRATES.contains(&baudrate)
}

/// USIC channel identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChannelId {
    Channel0,
    Channel1,
    Channel2,
    Channel3,
}

impl ChannelId {
    /// All identities in index order
    pub const ALL: [ChannelId; MAX_CHANNELS] = [
        ChannelId::Channel0,
        ChannelId::Channel1,
        ChannelId::Channel2,
        ChannelId::Channel3,
    ];

    /// Numeric channel index (0-3)
    pub const fn index(self) -> u8 {
        match self {
            ChannelId::Channel0 => 0,
            ChannelId::Channel1 => 1,
            ChannelId::Channel2 => 2,
            ChannelId::Channel3 => 3,
        }
    }
}

impl TryFrom<u8> for ChannelId {
    type Error = UartError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ChannelId::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(UartError::InvalidArgument)
    }
}

/// How the receiver is wired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OperatingMode {
    /// Separate receive pin
    #[default]
    FullDuplex,
    /// Receive on the transmit pin
    HalfDuplex,
    /// Receive the channel's own transmit output
    Loopback,
}

/// FIFO size per direction
///
/// `FifoSize::Disabled` runs that direction one unit per interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FifoConfig {
    pub tx_size: FifoSize,
    pub rx_size: FifoSize,
}

impl FifoConfig {
    /// Same size in both directions
    pub const fn symmetric(size: FifoSize) -> Self {
        Self {
            tx_size: size,
            rx_size: size,
        }
    }

    /// Byte-at-a-time in both directions
    pub const fn disabled() -> Self {
        Self::symmetric(FifoSize::Disabled)
    }
}

impl Default for FifoConfig {
    fn default() -> Self {
        Self::symmetric(FifoSize::Words32)
    }
}

/// Everything needed to bring one channel up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelConfig {
    /// Frame format and baud rate
    pub uart: UartConfig,
    /// Receiver wiring
    pub mode: OperatingMode,
    /// FIFO sizes
    pub fifo: FifoConfig,
}

impl ChannelConfig {
    /// Full duplex at `baudrate` with the default frame and FIFO sizes
    pub const fn new(baudrate: u32) -> Self {
        Self {
            uart: UartConfig::new(baudrate),
            mode: OperatingMode::FullDuplex,
            fifo: FifoConfig::symmetric(FifoSize::Words32),
        }
    }

    /// Replace the operating mode
    pub const fn with_mode(mut self, mode: OperatingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the FIFO sizes
    pub const fn with_fifo(mut self, fifo: FifoConfig) -> Self {
        self.fifo = fifo;
        self
    }
}

/// One NVIC interrupt line and its priority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IrqLine {
    pub irq: u8,
    pub priority: u8,
}

impl IrqLine {
    /// Create a line; the priority is masked to [`MAX_PRIORITY`]
    pub const fn new(irq: u8, priority: u8) -> Self {
        Self {
            irq,
            priority: priority & MAX_PRIORITY,
        }
    }
}

/// Routing of the protocol (error) interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProtocolRouting {
    /// Error interrupt line
    pub line: IrqLine,
    /// Service request the protocol node raises
    pub service_request: u8,
    /// Faults to monitor
    pub events: ProtocolEvents,
}

impl ProtocolRouting {
    /// Monitor every protocol fault
    pub const fn all(line: IrqLine, service_request: u8) -> Self {
        Self {
            line,
            service_request,
            events: ProtocolEvents::all(),
        }
    }
}

/// Interrupt routing for one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterruptRouting {
    /// Transmit interrupt line
    pub tx: IrqLine,
    /// Receive interrupt line
    pub rx: IrqLine,
    /// Service request raised for transmit events (also software-triggered
    /// to kick off a transfer)
    pub tx_service_request: u8,
    /// Service request raised for receive events
    pub rx_service_request: u8,
    /// Protocol fault routing, `None` leaves faults unmonitored
    pub protocol: Option<ProtocolRouting>,
}

impl InterruptRouting {
    /// Transmit and receive routing without protocol monitoring
    pub const fn new(
        tx: IrqLine,
        rx: IrqLine,
        tx_service_request: u8,
        rx_service_request: u8,
    ) -> Self {
        Self {
            tx,
            rx,
            tx_service_request,
            rx_service_request,
            protocol: None,
        }
    }

    /// Add protocol fault routing
    pub const fn with_protocol(mut self, protocol: ProtocolRouting) -> Self {
        self.protocol = Some(protocol);
        self
    }
}
