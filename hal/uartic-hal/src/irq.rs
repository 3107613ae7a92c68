//! Interrupt controller abstraction

/// Nested vectored interrupt controller
///
/// Only the two operations the UART driver needs when a channel is
/// opened. Priority encoding (grouping, sub-priority) is left to the
/// implementation.
pub trait InterruptController {
    /// Set the preemption priority of an interrupt line
    ///
    /// Lower numbers preempt higher ones.
    fn set_priority(&mut self, irq: u8, priority: u8);

    /// Enable an interrupt line
    fn enable(&mut self, irq: u8);
}
