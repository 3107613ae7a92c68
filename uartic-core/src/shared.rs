//! Channel table shared between application code and interrupt vectors
//!
//! ```ignore
//! static UARTS: SharedChannelTable<Usic, Handler, 3> = SharedChannelTable::new();
//!
//! #[interrupt]
//! fn USIC0_5() {
//!     UARTS.on_irq(Interrupt::USIC0_5 as u8);
//! }
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use uartic_hal::UartHardware;

use crate::callback::UartCallback;
use crate::table::ChannelTable;

/// Critical-section guarded slot holding a [`ChannelTable`]
///
/// Every access runs with interrupts masked, so a request issued from
/// application code never interleaves with the interrupt path of the same
/// channel.
pub struct SharedChannelTable<H, C, const N: usize> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Option<ChannelTable<H, C, N>>>>,
}

impl<H, C, const N: usize> SharedChannelTable<H, C, N> {
    /// Create an empty slot
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }
}

impl<H, C, const N: usize> Default for SharedChannelTable<H, C, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H, C, const N: usize> SharedChannelTable<H, C, N>
where
    H: UartHardware,
    C: UartCallback<H>,
{
    /// Place `table` in the slot, returning the previous one
    pub fn install(&self, table: ChannelTable<H, C, N>) -> Option<ChannelTable<H, C, N>> {
        self.inner.lock(|cell| cell.borrow_mut().replace(table))
    }

    /// Remove the table from the slot
    pub fn take(&self) -> Option<ChannelTable<H, C, N>> {
        self.inner.lock(|cell| cell.borrow_mut().take())
    }

    /// Run `f` on the installed table; `None` if nothing is installed
    pub fn with<R>(&self, f: impl FnOnce(&mut ChannelTable<H, C, N>) -> R) -> Option<R> {
        self.inner.lock(|cell| cell.borrow_mut().as_mut().map(f))
    }

    /// Dispatch an NVIC line; `false` if no table is installed or no
    /// channel owns the line
    pub fn on_irq(&self, irq: u8) -> bool {
        self.with(|table| table.on_irq(irq)).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::InitRequest;
    use crate::config::xmc4500_channels;
    use crate::testing::{leak, Recorder};
    use crate::UartEvent;
    use uartic_sim::{SimNvic, SimUsic};

    fn board_table() -> ChannelTable<SimUsic, Recorder, 3> {
        let channels = xmc4500_channels().map(|setup| setup.into_channel(SimUsic::new()));
        ChannelTable::new(channels, Recorder::default())
    }

    #[test]
    fn test_empty_slot() {
        let shared: SharedChannelTable<SimUsic, Recorder, 3> = SharedChannelTable::new();
        assert!(!shared.on_irq(86));
        assert_eq!(shared.with(|table| table.len()), None);
    }

    #[test]
    fn test_install_and_dispatch() {
        let shared = SharedChannelTable::new();
        assert!(shared.install(board_table()).is_none());

        let data = leak(b"shared");
        let opened = shared.with(|table| {
            table.init_all(InitRequest::Open, &mut SimNvic::new())?;
            table.channel_mut(0).unwrap().transmit(Some(data), data.len())
        });
        assert_eq!(opened, Some(Ok(())));

        // Software request kicks the first interrupt on line 86
        assert!(shared.on_irq(86));
        shared.with(|table| {
            table.channel_mut(0).unwrap().hardware_mut().run_until_idle();
        });
        assert!(shared.on_irq(86));

        let table = shared.take().unwrap();
        assert_eq!(table.callback().count(UartEvent::TxComplete), 1);
        assert_eq!(table.channel(0).unwrap().hardware().line(), data);
        assert!(shared.take().is_none());
    }

    #[test]
    fn test_install_replaces() {
        let shared = SharedChannelTable::new();
        shared.install(board_table());
        let previous = shared.install(board_table());
        assert!(previous.is_some());
    }
}
