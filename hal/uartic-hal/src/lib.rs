//! uartic Hardware Abstraction Layer
//!
//! This crate defines the capability traits the UART channel driver is
//! written against. A chip family (XMC4 USIC, a host simulator, ...)
//! implements them once; the driver core never touches registers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (callback + requests)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  uartic-core (channel state machine)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  uartic-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  XMC4 USIC    │       │  uartic-sim   │
//! │  registers    │       │  (host tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartHardware`] - One USIC channel in ASC (UART) mode
//! - [`irq::InterruptController`] - NVIC priority and enable
//!
//! The remaining modules hold the vocabulary both sides share: frame
//! format, FIFO sizes, event masks and status flags.

#![no_std]
#![deny(unsafe_code)]

pub mod events;
pub mod fifo;
pub mod irq;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use events::{ChannelEvents, FifoEvents, InterruptNode, ProtocolEvents, StatusFlags};
pub use fifo::FifoSize;
pub use irq::InterruptController;
pub use uart::{DataBits, HwError, InputSource, Parity, StopBits, UartConfig, UartHardware};
