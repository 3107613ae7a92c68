//! Transmit request and transmit interrupt path

use uartic_hal::{ChannelEvents, FifoEvents, UartHardware};

use super::UartChannel;
use crate::callback::{EventData, UartCallback, UartEvent};
use crate::error::{UartError, UartResult};

impl<H: UartHardware> UartChannel<H> {
    /// Start sending the first `length` units of `source`
    ///
    /// Returns as soon as the transfer is recorded; the transmit interrupt
    /// moves the data and reports `TxComplete` with `source` when the line
    /// goes idle.
    pub fn transmit(&mut self, source: Option<&'static [u8]>, length: usize) -> UartResult {
        let Some(source) = source else {
            return Err(UartError::InvalidArgument);
        };
        if length == 0 {
            return Err(UartError::InvalidArgument);
        }
        if !self.state.init {
            warn!("uart{}: transmit on closed channel", self.id.index());
            return Err(UartError::Failed);
        }
        if length > source.len() {
            return Err(UartError::OutOfBound);
        }
        if self.state.tx_claimed() {
            return Err(UartError::Busy);
        }

        self.tx.start(source, length);
        self.state.tx_busy = true;
        self.state.tx_lock = true;

        if self.config.fifo.tx_size.is_enabled() {
            self.hw.flush_tx_fifo();
            self.hw.enable_tx_fifo_events(FifoEvents::STANDARD);
        } else {
            self.hw.enable_events(ChannelEvents::TRANSMIT_BUFFER);
        }

        // First interrupt fills the FIFO
        self.hw
            .trigger_service_request(self.routing.tx_service_request);
        trace!("uart{}: transmit {} units", self.id.index(), length);
        Ok(())
    }

    /// Transmit interrupt entry
    ///
    /// Refills the FIFO (or the transmit buffer in byte mode) while units
    /// remain; once everything is queued and the line drains, releases the
    /// transfer and reports `TxComplete`.
    pub fn on_tx_interrupt<C: UartCallback<H>>(&mut self, callback: &mut C) {
        if !self.state.tx_active() {
            return;
        }
        let Some(buffer) = self.tx.buffer else {
            return;
        };
        let fifo_mode = self.config.fifo.tx_size.is_enabled();
        let progress = &mut self.tx.progress;

        if !progress.is_done() {
            if fifo_mode {
                while progress.index < progress.length && !self.hw.tx_fifo_full() {
                    self.hw.transmit_unit(buffer[progress.index]);
                    progress.index += 1;
                }
            } else {
                self.hw.transmit_unit(buffer[progress.index]);
                progress.index += 1;
            }
            return;
        }

        if fifo_mode {
            self.hw.disable_tx_fifo_events(FifoEvents::STANDARD);
        } else {
            self.hw.disable_events(ChannelEvents::TRANSMIT_BUFFER);
        }

        // Last frame must be on the wire before the buffer goes back
        loop {
            let shifting = self.hw.transmit_buffer_busy();
            if !shifting && self.hw.tx_fifo_empty() {
                break;
            }
        }

        self.state.tx_busy = false;
        self.state.tx_lock = false;
        if let Some(buffer) = self.tx.release() {
            trace!("uart{}: tx complete", self.id.index());
            callback.on_event(self, EventData::Transmitted(buffer), UartEvent::TxComplete);
        }
    }

    pub(super) fn abort_tx(&mut self) {
        self.state.tx_busy = false;
        self.tx.release();

        if self.config.fifo.tx_size.is_enabled() {
            self.hw.disable_tx_fifo_events(FifoEvents::STANDARD);
            self.hw.flush_tx_fifo();
        } else {
            self.hw.disable_events(ChannelEvents::TRANSMIT_BUFFER);
        }
        self.hw.set_transmit_buffer_idle();
    }
}

#[cfg(test)]
mod tests {
    use crate::channel::{AbortDirection, InitRequest};
    use crate::config::{ChannelConfig, FifoConfig};
    use crate::error::UartError;
    use crate::testing::{leak, open_channel, pump, Recorder};
    use crate::{EventData, UartEvent};
    use uartic_hal::{FifoSize, UartHardware};
    use uartic_sim::SimNvic;

    #[test]
    fn test_transmit_validation_order() {
        static DATA: [u8; 4] = *b"abcd";
        let mut uart = crate::testing::channel(ChannelConfig::default());

        // Argument checks come before the open check
        assert_eq!(uart.transmit(None, 4), Err(UartError::InvalidArgument));
        assert_eq!(uart.transmit(Some(&DATA), 0), Err(UartError::InvalidArgument));
        assert_eq!(uart.transmit(Some(&DATA), 4), Err(UartError::Failed));

        uart.init(InitRequest::Open, &mut SimNvic::new()).unwrap();
        assert_eq!(uart.transmit(Some(&DATA), 5), Err(UartError::OutOfBound));
        assert_eq!(uart.state().bits(), 0b1);
        assert_eq!(uart.hardware().service_request_count(), 0);
    }

    #[test]
    fn test_transmit_sets_flags_and_kicks_interrupt() {
        static DATA: [u8; 3] = *b"hey";
        let mut uart = open_channel(ChannelConfig::default());
        assert_eq!(uart.transmit(Some(&DATA), 3), Ok(()));

        let state = uart.state();
        assert!(state.tx_lock && state.tx_busy);
        assert_eq!(uart.tx_progress().length, 3);
        assert_eq!(uart.hardware().service_request_count(), 1);
        assert_eq!(uart.hardware().tx_flush_count(), 1);
    }

    #[test]
    fn test_second_transmit_is_busy() {
        static FIRST: [u8; 5] = *b"first";
        static SECOND: [u8; 6] = *b"second";
        let mut uart = open_channel(ChannelConfig::default());
        uart.transmit(Some(&FIRST), 5).unwrap();

        assert_eq!(uart.transmit(Some(&SECOND), 6), Err(UartError::Busy));
        assert_eq!(uart.tx_progress().length, 5);
        assert_eq!(uart.hardware().service_request_count(), 1);
    }

    #[test]
    fn test_fifo_transmit_completes_once() {
        let data = leak(b"Hello, USIC FIFO mode with more than thirty-two bytes!");
        let len = data.len();
        let mut uart = open_channel(ChannelConfig::default());
        let mut recorder = Recorder::default();

        uart.transmit(Some(data), len).unwrap();
        pump(&mut uart, &mut recorder, 200);

        assert_eq!(uart.hardware().line(), data);
        assert_eq!(recorder.count(UartEvent::TxComplete), 1);
        assert_eq!(recorder.transmitted, vec![data.to_vec()]);
        assert_eq!(uart.state().bits(), 0b1);
        assert!(uart.hardware_mut().tx_fifo_empty());
    }

    #[test]
    fn test_byte_mode_transmit() {
        let data = leak(b"byte");
        let config = ChannelConfig::default().with_fifo(FifoConfig::disabled());
        let mut uart = open_channel(config);
        let mut recorder = Recorder::default();

        uart.transmit(Some(data), 4).unwrap();
        pump(&mut uart, &mut recorder, 50);

        assert_eq!(uart.hardware().line(), b"byte");
        assert_eq!(recorder.count(UartEvent::TxComplete), 1);
        assert_eq!(uart.state().bits(), 0b1);
    }

    #[test]
    fn test_partial_length_transmit() {
        let data = leak(b"0123456789");
        let mut uart = open_channel(ChannelConfig::default());
        let mut recorder = Recorder::default();

        uart.transmit(Some(data), 4).unwrap();
        pump(&mut uart, &mut recorder, 50);

        assert_eq!(uart.hardware().line(), b"0123");
        // Whole buffer goes back to the caller
        assert_eq!(recorder.transmitted, vec![data.to_vec()]);
    }

    #[test]
    fn test_small_fifo_refills() {
        let data = leak(&[0xA5; 20]);
        let config =
            ChannelConfig::default().with_fifo(FifoConfig::symmetric(FifoSize::Words2));
        let mut uart = open_channel(config);
        let mut recorder = Recorder::default();

        uart.transmit(Some(data), 20).unwrap();
        pump(&mut uart, &mut recorder, 100);

        assert_eq!(uart.hardware().line().len(), 20);
        assert_eq!(recorder.count(UartEvent::TxComplete), 1);
        assert!(!uart.hardware().overflowed());
    }

    #[test]
    fn test_callback_can_chain_transmit() {
        let first = leak(b"one");
        let second = leak(b"two");
        let mut uart = open_channel(ChannelConfig::default());
        let mut pending = Some(second);
        let mut completions = 0;

        let mut callback = |uart: &mut crate::UartChannel<uartic_sim::SimUsic>,
                            _data: EventData,
                            event: UartEvent| {
            if event == UartEvent::TxComplete {
                completions += 1;
                if let Some(next) = pending.take() {
                    assert_eq!(uart.transmit(Some(next), next.len()), Ok(()));
                }
            }
        };

        uart.transmit(Some(first), 3).unwrap();
        pump(&mut uart, &mut callback, 100);

        assert_eq!(completions, 2);
        assert_eq!(uart.hardware().line(), b"onetwo");
    }

    #[test]
    fn test_abort_tx_keeps_lock() {
        let data = leak(&[0x55; 40]);
        let mut uart = open_channel(ChannelConfig::default());
        let mut recorder = Recorder::default();

        uart.transmit(Some(data), 40).unwrap();
        assert!(uart.hardware_mut().tx_interrupt_pending());
        uart.on_tx_interrupt(&mut recorder);
        assert_eq!(uart.tx_progress().index, 32);

        assert_eq!(uart.abort(AbortDirection::Tx), Ok(()));
        let state = uart.state();
        assert!(state.tx_lock);
        assert!(!state.tx_busy);
        assert_eq!(uart.hardware().tx_fifo_len(), 0);
        assert_eq!(uart.hardware().tx_flush_count(), 2);

        // A stale interrupt after abort does nothing
        uart.on_tx_interrupt(&mut recorder);
        assert!(recorder.events.is_empty());

        // Still locked until the channel is reopened
        let again = leak(b"again");
        assert_eq!(uart.transmit(Some(again), 5), Err(UartError::Busy));

        let mut nvic = SimNvic::new();
        uart.init(InitRequest::Close, &mut nvic).unwrap();
        uart.init(InitRequest::Open, &mut nvic).unwrap();
        assert_eq!(uart.transmit(Some(again), 5), Ok(()));
    }

    #[test]
    fn test_interrupt_without_transfer_is_noop() {
        let mut uart = open_channel(ChannelConfig::default());
        let mut recorder = Recorder::default();
        uart.on_tx_interrupt(&mut recorder);
        assert!(recorder.events.is_empty());
        assert!(uart.hardware().line().is_empty());
    }
}
