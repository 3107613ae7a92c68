//! UART channel state machine
//!
//! One [`UartChannel`] drives one USIC channel. Application code opens and
//! closes it, starts transfers and changes the baud rate; interrupt vectors
//! call the `on_*_interrupt` paths which move data and report completion.
//!
//! Lifecycle:
//!
//! ```text
//! Closed --init(Open)--> Idle --transmit/receive--> TxBusy / RxBusy
//!    ^                    |  <--completion/abort---
//!    +----init(Close)-----+
//! ```

pub mod fifo;
mod protocol;
mod rx;
pub mod state;
mod tx;

pub use fifo::{input_source, rx_trigger_limit, FifoLayout};
pub use state::{ChannelState, TransferProgress};

use uartic_hal::{InterruptController, InterruptNode, UartHardware};

use crate::config::{is_supported_baudrate, ChannelConfig, ChannelId, InterruptRouting, IrqLine};
use crate::error::{UartError, UartResult};
use state::TransferControl;

/// Open or close request for [`UartChannel::init`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitRequest {
    Close,
    Open,
}

impl TryFrom<u8> for InitRequest {
    type Error = UartError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(InitRequest::Close),
            1 => Ok(InitRequest::Open),
            _ => Err(UartError::InvalidArgument),
        }
    }
}

/// Direction(s) cancelled by [`UartChannel::abort`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AbortDirection {
    Tx,
    Rx,
    TxRx,
}

impl AbortDirection {
    pub const fn includes_tx(self) -> bool {
        matches!(self, AbortDirection::Tx | AbortDirection::TxRx)
    }

    pub const fn includes_rx(self) -> bool {
        matches!(self, AbortDirection::Rx | AbortDirection::TxRx)
    }
}

impl TryFrom<u8> for AbortDirection {
    type Error = UartError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AbortDirection::Tx),
            1 => Ok(AbortDirection::Rx),
            2 => Ok(AbortDirection::TxRx),
            _ => Err(UartError::InvalidArgument),
        }
    }
}

/// Driver for one USIC channel in UART mode
pub struct UartChannel<H> {
    id: ChannelId,
    config: ChannelConfig,
    routing: InterruptRouting,
    state: ChannelState,
    tx: TransferControl<&'static [u8]>,
    rx: TransferControl<&'static mut [u8]>,
    hw: H,
}

impl<H: UartHardware> UartChannel<H> {
    /// Create a closed channel
    pub fn new(id: ChannelId, config: ChannelConfig, routing: InterruptRouting, hw: H) -> Self {
        Self {
            id,
            config,
            routing,
            state: ChannelState::default(),
            tx: TransferControl::new(),
            rx: TransferControl::new(),
            hw,
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub fn routing(&self) -> &InterruptRouting {
        &self.routing
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.init
    }

    /// Position of the current (or last aborted) transmit
    pub fn tx_progress(&self) -> TransferProgress {
        self.tx.progress
    }

    /// Position of the current (or last aborted) receive
    pub fn rx_progress(&self) -> TransferProgress {
        self.rx.progress
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    /// Open or close the channel
    ///
    /// Opening an open channel and closing a closed one succeed without
    /// touching the hardware. Closing is refused with `Busy` while a transfer
    /// is moving data or the last frame is still shifting out.
    pub fn init<N: InterruptController>(
        &mut self,
        request: InitRequest,
        nvic: &mut N,
    ) -> UartResult {
        match request {
            InitRequest::Open => self.open(nvic),
            InitRequest::Close => self.close(),
        }
    }

    fn open<N: InterruptController>(&mut self, nvic: &mut N) -> UartResult {
        if self.state.init {
            return Ok(());
        }

        if let Err(e) = self.hw.configure(&self.config.uart) {
            warn!("uart{}: configure failed: {}", self.id.index(), e);
            return Err(UartError::Failed);
        }

        self.hw.set_input_source(input_source(self.id, self.config.mode));

        let layout = FifoLayout::for_channel(self.id);
        self.hw.configure_tx_fifo(
            layout.tx_data_pointer,
            self.config.fifo.tx_size,
            FifoLayout::TX_INITIAL_LIMIT,
        );
        self.hw.configure_rx_fifo(
            layout.rx_data_pointer,
            self.config.fifo.rx_size,
            FifoLayout::RX_INITIAL_LIMIT,
        );

        self.hw.start();
        self.route_nodes();

        if let Some(protocol) = self.routing.protocol {
            self.hw.enable_protocol_events(protocol.events);
            enable_line(nvic, protocol.line);
        }
        enable_line(nvic, self.routing.tx);
        enable_line(nvic, self.routing.rx);

        self.state.init = true;
        debug!(
            "uart{}: open at {} baud",
            self.id.index(),
            self.config.uart.baudrate
        );
        Ok(())
    }

    fn route_nodes(&mut self) {
        let tx_sr = self.routing.tx_service_request;
        let rx_sr = self.routing.rx_service_request;

        self.hw.set_interrupt_node(InterruptNode::TransmitBuffer, tx_sr);
        self.hw.set_interrupt_node(InterruptNode::TxFifoStandard, tx_sr);

        self.hw.set_interrupt_node(InterruptNode::Receive, rx_sr);
        self.hw.set_interrupt_node(InterruptNode::AlternateReceive, rx_sr);
        self.hw.set_interrupt_node(InterruptNode::RxFifoStandard, rx_sr);
        self.hw.set_interrupt_node(InterruptNode::RxFifoAlternate, rx_sr);

        if let Some(protocol) = self.routing.protocol {
            self.hw
                .set_interrupt_node(InterruptNode::Protocol, protocol.service_request);
        }
    }

    fn close(&mut self) -> UartResult {
        if !self.state.init {
            return Ok(());
        }
        if self.state.tx_busy || self.state.rx_busy {
            return Err(UartError::Busy);
        }

        if let Err(e) = self.hw.stop() {
            warn!("uart{}: stop refused: {}", self.id.index(), e);
            return Err(e.into());
        }

        // Also drops a lock left behind by abort
        self.state = ChannelState::default();
        self.tx.release();
        self.rx.release();
        debug!("uart{}: closed", self.id.index());
        Ok(())
    }

    /// Change the baud rate, keeping the configured oversampling
    ///
    /// Refused while either direction owns a transfer.
    pub fn set_baudrate(&mut self, baudrate: u32) -> UartResult {
        if !is_supported_baudrate(baudrate) {
            warn!("uart{}: unsupported baud rate {}", self.id.index(), baudrate);
            return Err(UartError::InvalidArgument);
        }
        if self.state.tx_claimed() || self.state.rx_claimed() {
            return Err(UartError::Busy);
        }

        if let Err(e) = self
            .hw
            .set_baudrate(baudrate, self.config.uart.oversampling)
        {
            warn!("uart{}: baud rate change failed: {}", self.id.index(), e);
            return Err(UartError::Failed);
        }

        self.config.uart.baudrate = baudrate;
        debug!("uart{}: baud rate {}", self.id.index(), baudrate);
        Ok(())
    }

    /// Cancel transfers in progress
    ///
    /// The cancelled buffer is discarded without a callback. The direction's
    /// lock stays set, so further requests on it report `Busy` until the
    /// channel is closed and reopened.
    pub fn abort(&mut self, direction: AbortDirection) -> UartResult {
        if direction.includes_tx() {
            self.abort_tx();
        }
        if direction.includes_rx() {
            self.abort_rx();
        }
        debug!("uart{}: abort {}", self.id.index(), direction);
        Ok(())
    }
}

fn enable_line<N: InterruptController>(nvic: &mut N, line: IrqLine) {
    nvic.set_priority(line.irq, line.priority);
    nvic.enable(line.irq);
}
