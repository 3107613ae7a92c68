//! Simulated USIC hardware
//!
//! Host-side implementations of the `uartic-hal` capability traits:
//!
//! - [`SimUsic`] - one USIC channel in UART mode with FIFOs, a transmit
//!   shift stage, event masks and protocol status flags
//! - [`SimNvic`] - an interrupt controller that records priorities and
//!   enabled lines
//!
//! The simulator has no clock of its own. Time advances one frame per
//! [`SimUsic::shift`] call, and polling the transmit buffer status also
//! advances it (so a driver spinning on it terminates). Tests decide when
//! interrupts fire by querying the `*_interrupt_pending` methods.

#![no_std]
#![deny(unsafe_code)]

pub mod nvic;
pub mod usic;

pub use nvic::SimNvic;
pub use usic::{SimUsic, FIFO_RAM_WORDS, LINE_CAPACITY};
