//! Receive request and receive interrupt path

use uartic_hal::{ChannelEvents, FifoEvents, UartHardware};

use super::fifo::rx_trigger_limit;
use super::UartChannel;
use crate::callback::{EventData, UartCallback, UartEvent};
use crate::error::{UartError, UartResult};

const RX_FIFO_EVENTS: FifoEvents = FifoEvents::STANDARD.union(FifoEvents::ALTERNATE);
const RX_EVENTS: ChannelEvents =
    ChannelEvents::STANDARD_RECEIVE.union(ChannelEvents::ALTERNATIVE_RECEIVE);

impl<H: UartHardware> UartChannel<H> {
    /// Start receiving `length` units into `destination`
    ///
    /// `RxComplete` hands `destination` back once `length` units arrived.
    pub fn receive(&mut self, destination: Option<&'static mut [u8]>, length: usize) -> UartResult {
        let Some(destination) = destination else {
            return Err(UartError::InvalidArgument);
        };
        if length == 0 {
            return Err(UartError::InvalidArgument);
        }
        if !self.state.init {
            warn!("uart{}: receive on closed channel", self.id.index());
            return Err(UartError::Failed);
        }
        if length > destination.len() {
            return Err(UartError::OutOfBound);
        }
        if self.state.rx_claimed() {
            return Err(UartError::Busy);
        }

        self.rx.start(destination, length);
        self.state.rx_busy = true;
        self.state.rx_lock = true;

        let size = self.config.fifo.rx_size;
        if size.is_enabled() {
            self.hw.flush_rx_fifo();
            self.hw.set_rx_fifo_limit(size, rx_trigger_limit(length, size));
            self.hw.enable_rx_fifo_events(RX_FIFO_EVENTS);
        } else {
            self.hw.enable_events(RX_EVENTS);
        }
        trace!("uart{}: receive {} units", self.id.index(), length);
        Ok(())
    }

    /// Receive interrupt entry
    ///
    /// Without a pending receive the unit is delivered on its own as
    /// `RxChar`.
    pub fn on_rx_interrupt<C: UartCallback<H>>(&mut self, callback: &mut C) {
        let size = self.config.fifo.rx_size;

        if !self.state.rx_active() {
            let unit = if size.is_enabled() && self.hw.rx_fifo_empty() {
                None
            } else {
                Some(self.hw.receive_unit())
            };
            if let Some(unit) = unit {
                callback.on_event(self, EventData::Char(unit), UartEvent::RxChar);
            }
            return;
        }

        let Some(buffer) = self.rx.buffer.as_deref_mut() else {
            return;
        };
        let progress = &mut self.rx.progress;

        if size.is_enabled() {
            while progress.index < progress.length && !self.hw.rx_fifo_empty() {
                buffer[progress.index] = self.hw.receive_unit();
                progress.index += 1;
            }
            if !progress.is_done() {
                let limit = rx_trigger_limit(progress.remaining(), size);
                self.hw.set_rx_fifo_limit(size, limit);
                return;
            }
            self.hw.disable_rx_fifo_events(RX_FIFO_EVENTS);
        } else {
            buffer[progress.index] = self.hw.receive_unit();
            progress.index += 1;
            if !progress.is_done() {
                return;
            }
            self.hw.disable_events(RX_EVENTS);
        }

        self.state.rx_busy = false;
        self.state.rx_lock = false;
        if let Some(buffer) = self.rx.release() {
            trace!("uart{}: rx complete", self.id.index());
            callback.on_event(self, EventData::Received(buffer), UartEvent::RxComplete);
        }
    }

    pub(super) fn abort_rx(&mut self) {
        self.state.rx_busy = false;
        self.rx.release();

        if self.config.fifo.rx_size.is_enabled() {
            self.hw.disable_rx_fifo_events(RX_FIFO_EVENTS);
        } else {
            self.hw.disable_events(RX_EVENTS);
        }
    }
}
