//! Channel table and interrupt dispatch
//!
//! Owns every channel of a board plus the single completion callback, and
//! turns interrupt vector invocations into calls on the owning channel.

use uartic_hal::{InterruptController, UartHardware};

use crate::callback::UartCallback;
use crate::channel::{InitRequest, UartChannel};
use crate::config::ChannelId;
use crate::error::UartResult;

/// Which path of a channel an interrupt belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptKind {
    Tx,
    Rx,
    /// Protocol faults
    Error,
}

/// Fixed set of channels sharing one callback
pub struct ChannelTable<H, C, const N: usize> {
    channels: [UartChannel<H>; N],
    callback: C,
}

impl<H, C, const N: usize> ChannelTable<H, C, N>
where
    H: UartHardware,
    C: UartCallback<H>,
{
    pub fn new(channels: [UartChannel<H>; N], callback: C) -> Self {
        Self { channels, callback }
    }

    /// Number of channels
    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    pub fn channel(&self, index: usize) -> Option<&UartChannel<H>> {
        self.channels.get(index)
    }

    pub fn channel_mut(&mut self, index: usize) -> Option<&mut UartChannel<H>> {
        self.channels.get_mut(index)
    }

    /// Find the channel driving USIC channel `id`
    pub fn channel_by_id(&mut self, id: ChannelId) -> Option<&mut UartChannel<H>> {
        self.channels.iter_mut().find(|channel| channel.id() == id)
    }

    pub fn channels(&self) -> &[UartChannel<H>] {
        &self.channels
    }

    pub fn callback(&self) -> &C {
        &self.callback
    }

    pub fn callback_mut(&mut self) -> &mut C {
        &mut self.callback
    }

    /// Open or close every channel in table order
    ///
    /// Stops at the first channel that fails; channels before it keep their
    /// new state.
    pub fn init_all<I: InterruptController>(
        &mut self,
        request: InitRequest,
        nvic: &mut I,
    ) -> UartResult {
        for channel in self.channels.iter_mut() {
            channel.init(request, nvic)?;
        }
        info!("uart: {} channels {}", N, request);
        Ok(())
    }

    /// Run one interrupt path of the channel at `index`
    pub fn on_interrupt(&mut self, index: usize, kind: InterruptKind) {
        let Some(channel) = self.channels.get_mut(index) else {
            warn!("uart: interrupt for unknown channel {}", index);
            return;
        };
        let callback = &mut self.callback;

        match kind {
            InterruptKind::Tx => channel.on_tx_interrupt(callback),
            InterruptKind::Rx => channel.on_rx_interrupt(callback),
            InterruptKind::Error => {
                if channel.routing().protocol.is_some() {
                    channel.on_protocol_interrupt(callback);
                }
            }
        }
    }

    /// Map an NVIC line to the channel and path it serves
    pub fn route(&self, irq: u8) -> Option<(usize, InterruptKind)> {
        self.channels
            .iter()
            .enumerate()
            .find_map(|(index, channel)| {
                let routing = channel.routing();
                if routing.tx.irq == irq {
                    Some((index, InterruptKind::Tx))
                } else if routing.rx.irq == irq {
                    Some((index, InterruptKind::Rx))
                } else if routing.protocol.is_some_and(|p| p.line.irq == irq) {
                    Some((index, InterruptKind::Error))
                } else {
                    None
                }
            })
    }

    /// Dispatch an NVIC line; returns `false` if no channel owns it
    pub fn on_irq(&mut self, irq: u8) -> bool {
        match self.route(irq) {
            Some((index, kind)) => {
                self.on_interrupt(index, kind);
                true
            }
            None => {
                warn!("uart: stray irq {}", irq);
                false
            }
        }
    }
}
