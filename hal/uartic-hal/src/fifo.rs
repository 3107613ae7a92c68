//! FIFO size encoding

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Size of a transmit or receive FIFO
///
/// The discriminant is the hardware encoding: a FIFO of encoding `n`
/// holds `1 << n` units. `Disabled` selects byte-at-a-time operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum FifoSize {
    Disabled = 0,
    Words2 = 1,
    Words4 = 2,
    Words8 = 3,
    Words16 = 4,
    #[default]
    Words32 = 5,
    Words64 = 6,
}

impl FifoSize {
    /// Number of units the FIFO holds (0 when disabled)
    pub const fn capacity(self) -> usize {
        match self {
            FifoSize::Disabled => 0,
            size => 1usize << (size as usize),
        }
    }

    /// Whether the FIFO is in use
    pub const fn is_enabled(self) -> bool {
        !matches!(self, FifoSize::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity() {
        assert_eq!(FifoSize::Disabled.capacity(), 0);
        assert_eq!(FifoSize::Words2.capacity(), 2);
        assert_eq!(FifoSize::Words16.capacity(), 16);
        assert_eq!(FifoSize::Words32.capacity(), 32);
        assert_eq!(FifoSize::Words64.capacity(), 64);
    }

    #[test]
    fn test_disabled_is_byte_mode() {
        assert!(!FifoSize::Disabled.is_enabled());
        assert!(FifoSize::default().is_enabled());
    }
}
