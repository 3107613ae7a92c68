//! Event masks, status flags and interrupt nodes
//!
//! Bit positions follow the USIC register layout so that a register-level
//! implementation can pass `bits()` straight through.

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// Channel events used when the FIFOs are disabled (byte mode)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ChannelEvents: u32 {
        /// Standard receive event (RIEN)
        const STANDARD_RECEIVE = 1 << 14;
        /// Transmit buffer event (TBIEN)
        const TRANSMIT_BUFFER = 1 << 15;
        /// Alternative receive event (AIEN)
        const ALTERNATIVE_RECEIVE = 1 << 16;
    }
}

bitflags! {
    /// Transmit or receive FIFO events
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FifoEvents: u32 {
        /// Fill level crossed the trigger limit
        const STANDARD = 1 << 30;
        /// FIFO error (overflow or underflow)
        const ERROR = 1 << 31;
        /// Alternative event (receive FIFO only)
        const ALTERNATE = 1 << 27;
    }
}

bitflags! {
    /// Protocol-related events that can be monitored on the error line
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
    pub struct ProtocolEvents: u32 {
        /// Synchronization break detected
        const SYNC_BREAK = 1 << 2;
        /// Collision between transmitted and received data
        const COLLISION = 1 << 3;
        /// Receiver noise detected
        const RECEIVER_NOISE = 1 << 4;
        /// Format error in either stop bit
        const FORMAT_ERROR = 1 << 5;
    }
}

bitflags! {
    /// Protocol status register flags (ASC mode)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StatusFlags: u32 {
        /// Synchronization break detected
        const SYNC_BREAK_DETECTED = 1 << 2;
        /// Collision detected
        const COLLISION_DETECTED = 1 << 3;
        /// Receiver noise detected
        const RECEIVER_NOISE_DETECTED = 1 << 4;
        /// Format error in stop bit 0
        const FORMAT_ERROR_STOP_BIT_0 = 1 << 5;
        /// Format error in stop bit 1
        const FORMAT_ERROR_STOP_BIT_1 = 1 << 6;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ChannelEvents {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ChannelEvents({=u32:#x})", self.bits())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FifoEvents {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "FifoEvents({=u32:#x})", self.bits())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ProtocolEvents {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ProtocolEvents({=u32:#x})", self.bits())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusFlags {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "StatusFlags({=u32:#x})", self.bits())
    }
}

/// Interrupt node of a channel that can be routed to a service request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptNode {
    /// Transmit buffer event
    TransmitBuffer,
    /// Standard receive event
    Receive,
    /// Alternative receive event
    AlternateReceive,
    /// Protocol-specific events
    Protocol,
    /// Transmit FIFO standard event
    TxFifoStandard,
    /// Receive FIFO standard event
    RxFifoStandard,
    /// Receive FIFO alternate event
    RxFifoAlternate,
}
