//! Configuration types
//!
//! Per-channel UART settings and interrupt routing, plus the reference
//! board assignment.

pub mod board;
pub mod channel;

pub use board::*;
pub use channel::*;
