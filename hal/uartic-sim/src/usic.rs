//! Simulated USIC channel in UART mode

use heapless::{Deque, Vec};
use uartic_hal::{
    ChannelEvents, FifoEvents, FifoSize, HwError, InputSource, InterruptNode, ProtocolEvents,
    StatusFlags, UartConfig, UartHardware,
};

/// Words of FIFO RAM available to one direction
pub const FIFO_RAM_WORDS: usize = 64;

/// Number of transmitted bytes the wire log retains
pub const LINE_CAPACITY: usize = 1024;

/// Number of routable interrupt nodes
const NODE_COUNT: usize = 7;

/// One direction's FIFO as programmed by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FifoSetup {
    /// Offset into the shared FIFO RAM
    pub data_pointer: u8,
    /// Configured size
    pub size: FifoSize,
    /// Trigger limit
    pub limit: u8,
}

/// Simulated USIC channel
///
/// Transmitted frames end up in a wire log (see [`SimUsic::take_line`]);
/// in loopback (`InputSource::Internal`) they are also received by the
/// same channel. Bytes from a remote peer are injected with
/// [`SimUsic::feed`].
#[derive(Debug)]
pub struct SimUsic {
    config: Option<UartConfig>,
    input: Option<InputSource>,
    running: bool,
    baudrate: u32,

    tx_setup: FifoSetup,
    rx_setup: FifoSetup,
    tx_fifo: Deque<u8, FIFO_RAM_WORDS>,
    rx_fifo: Deque<u8, FIFO_RAM_WORDS>,
    /// Frame waiting in (or shifting out of) the transmit buffer
    tbuf: Option<u8>,
    /// Receive buffer used when the receive FIFO is disabled
    rbuf: Option<u8>,
    line: Vec<u8, LINE_CAPACITY>,
    overflowed: bool,

    channel_events: ChannelEvents,
    tx_fifo_events: FifoEvents,
    rx_fifo_events: FifoEvents,
    protocol_events: ProtocolEvents,
    status: StatusFlags,

    nodes: [Option<u8>; NODE_COUNT],
    software_requests: Vec<u8, 8>,
    service_request_count: u32,

    // Fault injection
    fail_configure: bool,
    fail_baudrate: bool,
    stop_busy: u8,

    // Call accounting
    configure_count: u32,
    stop_count: u32,
    tx_flush_count: u32,
    rx_flush_count: u32,
}

impl Default for SimUsic {
    fn default() -> Self {
        Self::new()
    }
}

impl SimUsic {
    /// Create a powered-down channel
    pub fn new() -> Self {
        Self {
            config: None,
            input: None,
            running: false,
            baudrate: 0,
            tx_setup: FifoSetup::default(),
            rx_setup: FifoSetup::default(),
            tx_fifo: Deque::new(),
            rx_fifo: Deque::new(),
            tbuf: None,
            rbuf: None,
            line: Vec::new(),
            overflowed: false,
            channel_events: ChannelEvents::empty(),
            tx_fifo_events: FifoEvents::empty(),
            rx_fifo_events: FifoEvents::empty(),
            protocol_events: ProtocolEvents::empty(),
            status: StatusFlags::empty(),
            nodes: [None; NODE_COUNT],
            software_requests: Vec::new(),
            service_request_count: 0,
            fail_configure: false,
            fail_baudrate: false,
            stop_busy: 0,
            configure_count: 0,
            stop_count: 0,
            tx_flush_count: 0,
            rx_flush_count: 0,
        }
    }

    // ---- Fault injection ----

    /// Make `configure` report a failure
    pub fn fail_configure(&mut self, fail: bool) {
        self.fail_configure = fail;
    }

    /// Make `set_baudrate` report a failure
    pub fn fail_baudrate(&mut self, fail: bool) {
        self.fail_baudrate = fail;
    }

    /// Report busy for the next `count` stop requests
    pub fn hold_stop_busy(&mut self, count: u8) {
        self.stop_busy = count;
    }

    // ---- Time and wire ----

    /// Let one frame time pass
    ///
    /// The frame in the transmit buffer leaves the wire and, in FIFO mode,
    /// the next queued unit moves into the transmit buffer. Returns `true`
    /// if anything moved.
    pub fn shift(&mut self) -> bool {
        let mut moved = false;
        if let Some(frame) = self.tbuf.take() {
            self.emit(frame);
            moved = true;
        }
        if self.tx_setup.size.is_enabled() && self.running {
            if let Some(next) = self.tx_fifo.pop_front() {
                self.tbuf = Some(next);
                moved = true;
            }
        }
        moved
    }

    /// Shift until nothing is left to transmit
    pub fn run_until_idle(&mut self) -> usize {
        let mut frames = 0;
        while self.shift() {
            frames += 1;
        }
        frames
    }

    /// Deliver bytes from a remote transmitter
    pub fn feed(&mut self, data: &[u8]) {
        for &byte in data {
            self.receive_frame(byte);
        }
    }

    /// Everything that left the wire so far, oldest first
    pub fn line(&self) -> &[u8] {
        &self.line
    }

    /// Take the wire log, leaving it empty
    pub fn take_line(&mut self) -> Vec<u8, LINE_CAPACITY> {
        core::mem::take(&mut self.line)
    }

    /// Raise protocol status flags as the hardware would
    pub fn raise_status(&mut self, flags: StatusFlags) {
        self.status |= flags;
    }

    fn emit(&mut self, frame: u8) {
        // Wire log is a bounded history
        let _ = self.line.push(frame);
        if self.input == Some(InputSource::Internal) {
            self.receive_frame(frame);
        }
    }

    fn receive_frame(&mut self, frame: u8) {
        if !self.running {
            return;
        }
        if self.rx_setup.size.is_enabled() {
            if self.rx_fifo.len() >= self.rx_setup.size.capacity()
                || self.rx_fifo.push_back(frame).is_err()
            {
                self.overflowed = true;
            }
        } else {
            if self.rbuf.is_some() {
                self.overflowed = true;
            }
            self.rbuf = Some(frame);
        }
    }

    // ---- Interrupt conditions ----

    /// Whether the transmit interrupt line would fire now
    ///
    /// A pending software service request on a transmit node is consumed.
    pub fn tx_interrupt_pending(&mut self) -> bool {
        let nodes = [InterruptNode::TxFifoStandard, InterruptNode::TransmitBuffer];
        if self.take_software_request(&nodes) {
            return true;
        }
        if self.tx_setup.size.is_enabled() {
            self.tx_fifo_events.contains(FifoEvents::STANDARD)
                && self.tx_fifo.len() <= usize::from(self.tx_setup.limit)
        } else {
            self.channel_events.contains(ChannelEvents::TRANSMIT_BUFFER) && self.tbuf.is_none()
        }
    }

    /// Whether the receive interrupt line would fire now
    pub fn rx_interrupt_pending(&mut self) -> bool {
        let nodes = [
            InterruptNode::RxFifoStandard,
            InterruptNode::RxFifoAlternate,
            InterruptNode::Receive,
            InterruptNode::AlternateReceive,
        ];
        if self.take_software_request(&nodes) {
            return true;
        }
        if self.rx_setup.size.is_enabled() {
            self.rx_fifo_events.contains(FifoEvents::STANDARD)
                && self.rx_fifo.len() > usize::from(self.rx_setup.limit)
        } else {
            self.channel_events.contains(ChannelEvents::STANDARD_RECEIVE) && self.rbuf.is_some()
        }
    }

    /// Whether the protocol (error) interrupt line would fire now
    pub fn protocol_interrupt_pending(&self) -> bool {
        let enabled = self.protocol_events;
        let status = self.status;
        (enabled.contains(ProtocolEvents::SYNC_BREAK)
            && status.contains(StatusFlags::SYNC_BREAK_DETECTED))
            || (enabled.contains(ProtocolEvents::COLLISION)
                && status.contains(StatusFlags::COLLISION_DETECTED))
            || (enabled.contains(ProtocolEvents::RECEIVER_NOISE)
                && status.contains(StatusFlags::RECEIVER_NOISE_DETECTED))
            || (enabled.contains(ProtocolEvents::FORMAT_ERROR)
                && status.intersects(
                    StatusFlags::FORMAT_ERROR_STOP_BIT_0 | StatusFlags::FORMAT_ERROR_STOP_BIT_1,
                ))
    }

    fn take_software_request(&mut self, nodes: &[InterruptNode]) -> bool {
        let position = self.software_requests.iter().position(|sr| {
            nodes
                .iter()
                .any(|node| self.nodes[node_index(*node)] == Some(*sr))
        });
        match position {
            Some(index) => {
                self.software_requests.swap_remove(index);
                true
            }
            None => false,
        }
    }

    // ---- Inspection ----

    /// Configuration last programmed
    pub fn config(&self) -> Option<&UartConfig> {
        self.config.as_ref()
    }

    /// Input source last selected
    pub fn input_source(&self) -> Option<InputSource> {
        self.input
    }

    /// Protocol engine running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Baud rate currently programmed
    pub fn baudrate(&self) -> u32 {
        self.baudrate
    }

    /// Transmit FIFO setup
    pub fn tx_fifo_setup(&self) -> FifoSetup {
        self.tx_setup
    }

    /// Receive FIFO setup
    pub fn rx_fifo_setup(&self) -> FifoSetup {
        self.rx_setup
    }

    /// Units queued in the transmit FIFO
    pub fn tx_fifo_len(&self) -> usize {
        self.tx_fifo.len()
    }

    /// Units queued in the receive FIFO
    pub fn rx_fifo_len(&self) -> usize {
        self.rx_fifo.len()
    }

    /// A received unit was dropped for lack of room
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Enabled channel events
    pub fn channel_events(&self) -> ChannelEvents {
        self.channel_events
    }

    /// Enabled transmit FIFO events
    pub fn tx_fifo_events(&self) -> FifoEvents {
        self.tx_fifo_events
    }

    /// Enabled receive FIFO events
    pub fn rx_fifo_events(&self) -> FifoEvents {
        self.rx_fifo_events
    }

    /// Current protocol status flags
    pub fn status(&self) -> StatusFlags {
        self.status
    }

    /// Service request a node is routed to
    pub fn interrupt_node(&self, node: InterruptNode) -> Option<u8> {
        self.nodes[node_index(node)]
    }

    /// Number of software-triggered service requests
    pub fn service_request_count(&self) -> u32 {
        self.service_request_count
    }

    /// Number of `configure` calls
    pub fn configure_count(&self) -> u32 {
        self.configure_count
    }

    /// Number of `stop` calls
    pub fn stop_count(&self) -> u32 {
        self.stop_count
    }

    /// Number of transmit FIFO flushes
    pub fn tx_flush_count(&self) -> u32 {
        self.tx_flush_count
    }

    /// Number of receive FIFO flushes
    pub fn rx_flush_count(&self) -> u32 {
        self.rx_flush_count
    }
}

fn node_index(node: InterruptNode) -> usize {
    match node {
        InterruptNode::TransmitBuffer => 0,
        InterruptNode::Receive => 1,
        InterruptNode::AlternateReceive => 2,
        InterruptNode::Protocol => 3,
        InterruptNode::TxFifoStandard => 4,
        InterruptNode::RxFifoStandard => 5,
        InterruptNode::RxFifoAlternate => 6,
    }
}

impl UartHardware for SimUsic {
    fn configure(&mut self, config: &UartConfig) -> Result<(), HwError> {
        self.configure_count += 1;
        if self.fail_configure {
            return Err(HwError::Failed);
        }
        self.config = Some(*config);
        self.baudrate = config.baudrate;
        Ok(())
    }

    fn set_input_source(&mut self, source: InputSource) {
        self.input = Some(source);
    }

    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) -> Result<(), HwError> {
        self.stop_count += 1;
        if self.stop_busy > 0 {
            self.stop_busy -= 1;
            return Err(HwError::Busy);
        }
        self.running = false;
        Ok(())
    }

    fn set_baudrate(&mut self, baudrate: u32, _oversampling: u16) -> Result<(), HwError> {
        if self.fail_baudrate {
            return Err(HwError::Failed);
        }
        self.baudrate = baudrate;
        Ok(())
    }

    fn configure_tx_fifo(&mut self, data_pointer: u8, size: FifoSize, limit: u8) {
        self.tx_setup = FifoSetup {
            data_pointer,
            size,
            limit,
        };
        self.tx_fifo.clear();
    }

    fn configure_rx_fifo(&mut self, data_pointer: u8, size: FifoSize, limit: u8) {
        self.rx_setup = FifoSetup {
            data_pointer,
            size,
            limit,
        };
        self.rx_fifo.clear();
    }

    fn set_rx_fifo_limit(&mut self, size: FifoSize, limit: u8) {
        self.rx_setup.size = size;
        self.rx_setup.limit = limit;
    }

    fn flush_tx_fifo(&mut self) {
        self.tx_flush_count += 1;
        self.tx_fifo.clear();
    }

    fn flush_rx_fifo(&mut self) {
        self.rx_flush_count += 1;
        self.rx_fifo.clear();
    }

    fn enable_events(&mut self, events: ChannelEvents) {
        self.channel_events |= events;
    }

    fn disable_events(&mut self, events: ChannelEvents) {
        self.channel_events &= !events;
    }

    fn enable_tx_fifo_events(&mut self, events: FifoEvents) {
        self.tx_fifo_events |= events;
    }

    fn disable_tx_fifo_events(&mut self, events: FifoEvents) {
        self.tx_fifo_events &= !events;
    }

    fn enable_rx_fifo_events(&mut self, events: FifoEvents) {
        self.rx_fifo_events |= events;
    }

    fn disable_rx_fifo_events(&mut self, events: FifoEvents) {
        self.rx_fifo_events &= !events;
    }

    fn enable_protocol_events(&mut self, events: ProtocolEvents) {
        self.protocol_events |= events;
    }

    fn protocol_events(&mut self) -> ProtocolEvents {
        self.protocol_events
    }

    fn set_interrupt_node(&mut self, node: InterruptNode, service_request: u8) {
        self.nodes[node_index(node)] = Some(service_request);
    }

    fn trigger_service_request(&mut self, service_request: u8) {
        self.service_request_count += 1;
        if !self.software_requests.contains(&service_request) {
            let _ = self.software_requests.push(service_request);
        }
    }

    fn tx_fifo_full(&mut self) -> bool {
        self.tx_fifo.len() >= self.tx_setup.size.capacity()
    }

    fn tx_fifo_empty(&mut self) -> bool {
        self.tx_fifo.is_empty()
    }

    fn rx_fifo_empty(&mut self) -> bool {
        if self.rx_setup.size.is_enabled() {
            self.rx_fifo.is_empty()
        } else {
            self.rbuf.is_none()
        }
    }

    fn transmit_buffer_busy(&mut self) -> bool {
        let busy = self.tbuf.is_some() || !self.tx_fifo.is_empty();
        if busy {
            // Polling takes time on real hardware too
            self.shift();
        }
        busy
    }

    fn set_transmit_buffer_idle(&mut self) {
        self.tbuf = None;
    }

    fn transmit_unit(&mut self, data: u8) {
        if self.tx_setup.size.is_enabled() {
            if self.tx_fifo.len() >= self.tx_setup.size.capacity()
                || self.tx_fifo.push_back(data).is_err()
            {
                self.overflowed = true;
            }
        } else {
            if let Some(previous) = self.tbuf.take() {
                self.emit(previous);
            }
            self.tbuf = Some(data);
        }
    }

    fn receive_unit(&mut self) -> u8 {
        if self.rx_setup.size.is_enabled() {
            self.rx_fifo.pop_front().unwrap_or(0)
        } else {
            self.rbuf.take().unwrap_or(0)
        }
    }

    fn status_flags(&mut self) -> StatusFlags {
        self.status
    }

    fn clear_status_flags(&mut self, flags: StatusFlags) {
        self.status &= !flags;
    }
}
