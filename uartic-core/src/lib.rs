//! Interrupt-driven UART channel driver
//!
//! This crate contains the board-agnostic driver for USIC serial channels
//! in UART mode:
//!
//! - Channel configuration types and the reference board table
//! - Per-channel state machine (open/close, transmit, receive, abort,
//!   baud rate changes)
//! - Interrupt-context transmit, receive and protocol-fault paths
//! - Receive FIFO trigger-limit recomputation
//! - Channel table and interrupt dispatch
//!
//! Requests never block: `transmit` and `receive` record a transfer and
//! return, the interrupt paths move the data and report completion
//! through a single [`UartCallback`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This must go first so the logging macros are visible to the other modules
mod fmt;

pub mod callback;
pub mod channel;
pub mod config;
pub mod error;
pub mod shared;
pub mod table;

#[cfg(test)]
mod testing;

pub use callback::{EventData, UartCallback, UartEvent};
pub use channel::{AbortDirection, ChannelState, InitRequest, TransferProgress, UartChannel};
pub use config::{
    ChannelConfig, ChannelId, ChannelSetup, FifoConfig, InterruptRouting, IrqLine, OperatingMode,
    ProtocolRouting,
};
pub use error::{UartError, UartResult};
pub use shared::SharedChannelTable;
pub use table::{ChannelTable, InterruptKind};
