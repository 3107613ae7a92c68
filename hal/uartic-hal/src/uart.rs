//! UART channel capability
//!
//! [`UartHardware`] exposes the primitive, blocking operations of a single
//! serial channel. Every method completes synchronously; interrupt-driven
//! behavior is built on top of them by the driver core.

use crate::events::{ChannelEvents, FifoEvents, InterruptNode, ProtocolEvents, StatusFlags};
use crate::fifo::FifoSize;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Failure reported by a hardware primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HwError {
    /// Operation rejected by the peripheral
    Failed,
    /// A frame is still shifting out
    Busy,
}

/// Source selected for the receive data input (DX0)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputSource {
    /// External pin routed to DX0 input `n` (0 = A, 1 = B, ...)
    Pin(u8),
    /// The pin currently driving the transmit output (half duplex)
    TransmitPin,
    /// Internal loop from the channel's own output (loopback)
    Internal,
}

/// One serial channel in UART mode
///
/// Implementations are bound to a single hardware channel, so no method
/// takes a channel argument. All methods take `&mut self`: even status
/// queries are register accesses, and simulators may advance time on them.
pub trait UartHardware {
    /// Program frame format and baud generator
    fn configure(&mut self, config: &UartConfig) -> Result<(), HwError>;

    /// Select where received data is sampled from
    fn set_input_source(&mut self, source: InputSource);

    /// Enable the protocol engine
    fn start(&mut self);

    /// Stop the protocol engine
    ///
    /// Returns [`HwError::Busy`] while a frame is still being shifted.
    fn stop(&mut self) -> Result<(), HwError>;

    /// Reprogram the baud generator
    fn set_baudrate(&mut self, baudrate: u32, oversampling: u16) -> Result<(), HwError>;

    /// Place and size the transmit FIFO
    fn configure_tx_fifo(&mut self, data_pointer: u8, size: FifoSize, limit: u8);

    /// Place and size the receive FIFO
    fn configure_rx_fifo(&mut self, data_pointer: u8, size: FifoSize, limit: u8);

    /// Change the receive FIFO trigger limit
    fn set_rx_fifo_limit(&mut self, size: FifoSize, limit: u8);

    /// Discard everything queued in the transmit FIFO
    fn flush_tx_fifo(&mut self);

    /// Discard everything queued in the receive FIFO
    fn flush_rx_fifo(&mut self);

    /// Enable channel events (byte mode)
    fn enable_events(&mut self, events: ChannelEvents);

    /// Disable channel events (byte mode)
    fn disable_events(&mut self, events: ChannelEvents);

    /// Enable transmit FIFO events
    fn enable_tx_fifo_events(&mut self, events: FifoEvents);

    /// Disable transmit FIFO events
    fn disable_tx_fifo_events(&mut self, events: FifoEvents);

    /// Enable receive FIFO events
    fn enable_rx_fifo_events(&mut self, events: FifoEvents);

    /// Disable receive FIFO events
    fn disable_rx_fifo_events(&mut self, events: FifoEvents);

    /// Enable protocol-related (fault) events
    fn enable_protocol_events(&mut self, events: ProtocolEvents);

    /// Protocol events currently enabled
    fn protocol_events(&mut self) -> ProtocolEvents;

    /// Route an interrupt node to a service request line
    fn set_interrupt_node(&mut self, node: InterruptNode, service_request: u8);

    /// Raise a service request by software
    fn trigger_service_request(&mut self, service_request: u8);

    /// Transmit FIFO cannot accept another unit
    fn tx_fifo_full(&mut self) -> bool;

    /// Transmit FIFO holds no units
    fn tx_fifo_empty(&mut self) -> bool;

    /// Receive FIFO holds no units
    fn rx_fifo_empty(&mut self) -> bool;

    /// The transmit buffer still holds a frame that has not left the wire
    fn transmit_buffer_busy(&mut self) -> bool;

    /// Force the transmit buffer status to idle
    fn set_transmit_buffer_idle(&mut self);

    /// Write one unit to the transmit buffer (or FIFO)
    fn transmit_unit(&mut self, data: u8);

    /// Read one unit from the receive buffer (or FIFO)
    fn receive_unit(&mut self) -> u8;

    /// Read the protocol status register
    fn status_flags(&mut self) -> StatusFlags;

    /// Clear protocol status flags
    fn clear_status_flags(&mut self, flags: StatusFlags);
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits per word
    pub data_bits: DataBits,
    /// Number of bits per frame (equal to data bits for plain UART)
    pub frame_length: u8,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
    /// Samples per bit
    pub oversampling: u16,
}

impl UartConfig {
    /// 8N1 at the given baud rate with 16x oversampling
    pub const fn new(baudrate: u32) -> Self {
        Self {
            baudrate,
            data_bits: DataBits::Eight,
            frame_length: 8,
            parity: Parity::None,
            stop_bits: StopBits::One,
            oversampling: 16,
        }
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::new(9600)
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

impl DataBits {
    /// Word length in bits
    pub const fn bits(self) -> u8 {
        match self {
            DataBits::Seven => 7,
            DataBits::Eight => 8,
            DataBits::Nine => 9,
        }
    }
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopBits {
    One,
    Two,
}
