//! Simulated interrupt controller

use heapless::Vec;
use uartic_hal::InterruptController;

/// Maximum number of interrupt lines tracked
pub const MAX_LINES: usize = 16;

/// Interrupt controller that records what the driver asked for
#[derive(Debug, Default)]
pub struct SimNvic {
    priorities: Vec<(u8, u8), MAX_LINES>,
    enabled: Vec<u8, MAX_LINES>,
}

impl SimNvic {
    /// Create a controller with every line disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Priority last programmed for `irq`
    pub fn priority(&self, irq: u8) -> Option<u8> {
        self.priorities
            .iter()
            .find(|(line, _)| *line == irq)
            .map(|(_, priority)| *priority)
    }

    /// Check if `irq` has been enabled
    pub fn is_enabled(&self, irq: u8) -> bool {
        self.enabled.contains(&irq)
    }

    /// Number of enabled lines
    pub fn enabled_count(&self) -> usize {
        self.enabled.len()
    }
}

impl InterruptController for SimNvic {
    fn set_priority(&mut self, irq: u8, priority: u8) {
        if let Some(entry) = self.priorities.iter_mut().find(|(line, _)| *line == irq) {
            entry.1 = priority;
        } else {
            // Lines beyond MAX_LINES are silently untracked
            let _ = self.priorities.push((irq, priority));
        }
    }

    fn enable(&mut self, irq: u8) {
        if !self.enabled.contains(&irq) {
            let _ = self.enabled.push(irq);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_overwrite() {
        let mut nvic = SimNvic::new();
        nvic.set_priority(86, 60);
        nvic.set_priority(86, 62);
        assert_eq!(nvic.priority(86), Some(62));
        assert_eq!(nvic.priority(85), None);
    }

    #[test]
    fn test_enable_is_idempotent() {
        let mut nvic = SimNvic::new();
        nvic.enable(85);
        nvic.enable(85);
        assert!(nvic.is_enabled(85));
        assert_eq!(nvic.enabled_count(), 1);
    }
}
