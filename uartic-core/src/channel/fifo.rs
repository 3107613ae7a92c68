//! FIFO placement and trigger-limit arithmetic

use uartic_hal::{FifoSize, InputSource};

use crate::config::{ChannelId, OperatingMode};

/// Where a channel's FIFOs live in the shared FIFO RAM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoLayout {
    pub tx_data_pointer: u8,
    pub rx_data_pointer: u8,
}

impl FifoLayout {
    /// Transmit FIFO trigger limit programmed at open
    pub const TX_INITIAL_LIMIT: u8 = 1;
    /// Receive FIFO trigger limit programmed at open
    pub const RX_INITIAL_LIMIT: u8 = 0;

    /// Even channels sit in the upper half of their module's FIFO RAM,
    /// odd channels in the lower half
    pub const fn for_channel(id: ChannelId) -> Self {
        match id {
            ChannelId::Channel0 | ChannelId::Channel2 => Self {
                tx_data_pointer: 48,
                rx_data_pointer: 32,
            },
            ChannelId::Channel1 | ChannelId::Channel3 => Self {
                tx_data_pointer: 16,
                rx_data_pointer: 0,
            },
        }
    }
}

/// Receive input selected for a channel in `mode`
pub const fn input_source(id: ChannelId, mode: OperatingMode) -> InputSource {
    match mode {
        OperatingMode::FullDuplex => match id {
            ChannelId::Channel0 | ChannelId::Channel3 => InputSource::Pin(3),
            ChannelId::Channel1 | ChannelId::Channel2 => InputSource::Pin(0),
        },
        OperatingMode::HalfDuplex => InputSource::TransmitPin,
        OperatingMode::Loopback => InputSource::Internal,
    }
}

/// Receive FIFO trigger limit for `remaining` outstanding units
///
/// The receive event fires once the fill level exceeds the limit, so the
/// next interrupt arrives exactly when the transfer can finish or the FIFO
/// is full, whichever comes first.
pub fn rx_trigger_limit(remaining: usize, size: FifoSize) -> u8 {
    let wanted = remaining.min(size.capacity()).saturating_sub(1);
    u8::try_from(wanted).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_layout_classes() {
        let a = FifoLayout::for_channel(ChannelId::Channel0);
        assert_eq!(a, FifoLayout::for_channel(ChannelId::Channel2));
        assert_eq!((a.tx_data_pointer, a.rx_data_pointer), (48, 32));

        let b = FifoLayout::for_channel(ChannelId::Channel1);
        assert_eq!(b, FifoLayout::for_channel(ChannelId::Channel3));
        assert_eq!((b.tx_data_pointer, b.rx_data_pointer), (16, 0));
    }

    #[test]
    fn test_input_source_table() {
        use ChannelId::*;
        let full = OperatingMode::FullDuplex;
        assert_eq!(input_source(Channel0, full), InputSource::Pin(3));
        assert_eq!(input_source(Channel1, full), InputSource::Pin(0));
        assert_eq!(input_source(Channel2, full), InputSource::Pin(0));
        assert_eq!(input_source(Channel3, full), InputSource::Pin(3));
        for id in ChannelId::ALL {
            assert_eq!(
                input_source(id, OperatingMode::HalfDuplex),
                InputSource::TransmitPin
            );
            assert_eq!(
                input_source(id, OperatingMode::Loopback),
                InputSource::Internal
            );
        }
    }

    #[test]
    fn test_trigger_limit_examples() {
        assert_eq!(rx_trigger_limit(50, FifoSize::Words32), 31);
        assert_eq!(rx_trigger_limit(18, FifoSize::Words32), 17);
        assert_eq!(rx_trigger_limit(1, FifoSize::Words32), 0);
        assert_eq!(rx_trigger_limit(0, FifoSize::Words32), 0);
        assert_eq!(rx_trigger_limit(100, FifoSize::Words64), 63);
    }

    proptest! {
        #[test]
        fn prop_trigger_limit_within_fifo(remaining in 1usize..4096, exp in 1u8..=6) {
            let size = match exp {
                1 => FifoSize::Words2,
                2 => FifoSize::Words4,
                3 => FifoSize::Words8,
                4 => FifoSize::Words16,
                5 => FifoSize::Words32,
                _ => FifoSize::Words64,
            };
            let limit = usize::from(rx_trigger_limit(remaining, size));

            // Event fires at limit + 1 units: never more than outstanding
            // and never more than the FIFO holds
            prop_assert!(limit + 1 <= remaining);
            prop_assert!(limit < size.capacity());
            prop_assert_eq!(limit + 1, remaining.min(size.capacity()));
        }
    }
}
