//! Channel state record and transfer control blocks

/// Open/transfer flags of one channel
///
/// `lock` marks a direction as owned by a transfer, `busy` marks it as
/// actively moving data. The interrupt path clears both on completion;
/// `abort` clears only `busy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelState {
    pub init: bool,
    pub tx_lock: bool,
    pub tx_busy: bool,
    pub rx_lock: bool,
    pub rx_busy: bool,
}

impl ChannelState {
    const INIT: u8 = 1 << 0;
    const TX_LOCK: u8 = 1 << 1;
    const TX_BUSY: u8 = 1 << 2;
    const RX_LOCK: u8 = 1 << 3;
    const RX_BUSY: u8 = 1 << 4;

    /// Packed diagnostic view (bit 0 init, then tx lock/busy, rx lock/busy)
    pub const fn bits(&self) -> u8 {
        let mut bits = 0;
        if self.init {
            bits |= Self::INIT;
        }
        if self.tx_lock {
            bits |= Self::TX_LOCK;
        }
        if self.tx_busy {
            bits |= Self::TX_BUSY;
        }
        if self.rx_lock {
            bits |= Self::RX_LOCK;
        }
        if self.rx_busy {
            bits |= Self::RX_BUSY;
        }
        bits
    }

    /// Inverse of [`ChannelState::bits`]; unknown bits are ignored
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            init: bits & Self::INIT != 0,
            tx_lock: bits & Self::TX_LOCK != 0,
            tx_busy: bits & Self::TX_BUSY != 0,
            rx_lock: bits & Self::RX_LOCK != 0,
            rx_busy: bits & Self::RX_BUSY != 0,
        }
    }

    /// Transmit direction is claimed or moving data
    pub const fn tx_claimed(&self) -> bool {
        self.tx_lock || self.tx_busy
    }

    /// Receive direction is claimed or moving data
    pub const fn rx_claimed(&self) -> bool {
        self.rx_lock || self.rx_busy
    }

    /// Transmit transfer in flight
    pub const fn tx_active(&self) -> bool {
        self.tx_lock && self.tx_busy
    }

    /// Receive transfer in flight
    pub const fn rx_active(&self) -> bool {
        self.rx_lock && self.rx_busy
    }
}

/// Position of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferProgress {
    /// Units moved so far
    pub index: usize,
    /// Units requested
    pub length: usize,
}

impl TransferProgress {
    /// Units still to move
    pub const fn remaining(&self) -> usize {
        self.length.saturating_sub(self.index)
    }

    pub const fn is_done(&self) -> bool {
        self.index >= self.length
    }
}

/// Buffer and position of one direction
///
/// `progress.index <= progress.length <= buffer.len()` holds whenever a
/// buffer is present.
#[derive(Debug)]
pub(crate) struct TransferControl<B> {
    pub(crate) buffer: Option<B>,
    pub(crate) progress: TransferProgress,
}

impl<B> TransferControl<B> {
    pub(crate) const fn new() -> Self {
        Self {
            buffer: None,
            progress: TransferProgress {
                index: 0,
                length: 0,
            },
        }
    }

    pub(crate) fn start(&mut self, buffer: B, length: usize) {
        self.buffer = Some(buffer);
        self.progress = TransferProgress { index: 0, length };
    }

    /// Drop the transfer, returning the buffer
    pub(crate) fn release(&mut self) -> Option<B> {
        self.progress = TransferProgress::default();
        self.buffer.take()
    }
}

impl<B> Default for TransferControl<B> {
    fn default() -> Self {
        Self::new()
    }
}
