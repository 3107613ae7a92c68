//! Completion callback contract
//!
//! The channel table owns a single handler that every channel reports to
//! from interrupt context. Buffers handed to `transmit`/`receive` come back
//! through [`EventData`] when the transfer finishes.

use uartic_hal::UartHardware;

use crate::channel::UartChannel;

/// Events a channel reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartEvent {
    /// Break condition on the line
    SyncBreakDetect,
    /// Transmitted level differed from the line level
    CollisionDetect,
    /// Majority decision saw disagreeing samples
    ReceiverNoiseDetect,
    /// First stop bit sampled low
    FormatError0,
    /// Second stop bit sampled low
    FormatError1,
    /// Unit received with no receive transfer pending
    RxChar,
    /// Transmit transfer finished and the line is idle
    TxComplete,
    /// Receive transfer filled its buffer
    RxComplete,
}

/// Payload accompanying an event
#[derive(Debug, PartialEq, Eq)]
pub enum EventData {
    None,
    /// Unsolicited unit
    Char(u8),
    /// Buffer of a completed transmit
    Transmitted(&'static [u8]),
    /// Buffer of a completed receive, holding the received units
    Received(&'static mut [u8]),
}

/// Handler for channel events
///
/// Called from interrupt context after the channel has released the
/// direction's control block, so the handler may issue a new request on
/// `uart` for either direction.
pub trait UartCallback<H: UartHardware> {
    fn on_event(&mut self, uart: &mut UartChannel<H>, data: EventData, event: UartEvent);
}

impl<H, F> UartCallback<H> for F
where
    H: UartHardware,
    F: FnMut(&mut UartChannel<H>, EventData, UartEvent),
{
    fn on_event(&mut self, uart: &mut UartChannel<H>, data: EventData, event: UartEvent) {
        self(uart, data, event)
    }
}
