//! Core W80x I2S driver implementation.
//!
//! This module contains the main [`I2s`] structure and core operations:
//!
//! - Initialization and configuration
//! - Buffer appends onto the per-direction descriptor rings
//! - Start/stop/pause/resume per direction
//! - DMA completion handling and the RX degraded drain
//! - Format control, status queries and diagnostics
//!
//! # Execution context
//!
//! [`I2s::on_dma_complete`] and [`I2s::handle_interrupt`] run in interrupt
//! context and mutate the same ring state as [`I2s::append_buffer`]. Calls
//! from task context must be serialized against them, for example with
//! [`SharedI2s`](crate::sync::SharedI2s).

#[cfg(feature = "log")]
use log::{debug, info, trace, warn};

use super::config::{
    BitWidth, ChannelType, Direction, DirectionConfig, DirectionState, I2sConfig, Role,
    TransferMode,
};
use super::error::{ConfigError, DmaError, IoError, IoResult, Result};
use super::event::{EventCallback, EventKind, I2sEvent};
use super::interrupt::InterruptStatus;
use crate::hal::dma::{DmaChannel, DmaRequest, DmaService};
use crate::internal::constants::{
    BUFFER_ALIGN, FIFO_WORD_SIZE, MAX_PACKET_SIZE, RX_FIFO_THRESHOLD, TX_FIFO_THRESHOLD,
};
use crate::internal::dma::DescriptorRing;
use crate::internal::register::RegisterBlock;
use crate::internal::register::i2s::{
    CTRL_LZCEN, CTRL_MONO, CTRL_MUTE, CTRL_RX_CLK_PHASE, CTRL_RXEN, CTRL_RXLCH, CTRL_RZCEN,
    CTRL_TIMEOUT_EN, CTRL_TX_CLK_PHASE, CTRL_TXEN, I2sRegs, INT_RXDONE,
};

// =============================================================================
// Statistics
// =============================================================================

/// Per-direction transfer counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferStats {
    /// Buffers reported complete
    pub packets: u32,
    /// Bytes reported complete
    pub bytes: u64,
    /// Buffers appended since init
    pub pushed: u32,
    /// Ring slots consumed since init
    pub consumed: u32,
}

/// Degraded-drain counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlushStats {
    /// RX-done interrupts that entered the drain
    pub total: u32,
    /// Drains that completed a buffer
    pub valid: u32,
    /// Bytes reported by completed drains
    pub bytes: u64,
}

/// Snapshot of one direction for [`I2sInfo`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DirectionInfo {
    /// Driver state
    pub state: DirectionState,
    /// Ring depth (0 when unused)
    pub depth: usize,
    /// Queued buffers
    pub occupancy: usize,
    /// Next slot expected to complete
    pub consume_index: usize,
    /// Next slot to receive a buffer
    pub append_index: usize,
    /// Ring drained and engine idle
    pub zombie: bool,
    /// DMA channel running
    pub dma_running: bool,
    /// Transfer counters
    pub stats: TransferStats,
}

/// Driver and register snapshot returned by [`I2s::dump_info`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2sInfo {
    /// Control register
    pub control: u32,
    /// Interrupt mask register
    pub interrupt_mask: u32,
    /// Pending interrupt flags
    pub interrupt_flags: u32,
    /// Words in the TX FIFO
    pub tx_fifo_words: u32,
    /// Words in the RX FIFO
    pub rx_fifo_words: u32,
    /// Transmit direction
    pub tx: DirectionInfo,
    /// Receive direction
    pub rx: DirectionInfo,
    /// Degraded-drain counters
    pub flush: FlushStats,
}

// =============================================================================
// Direction Lane
// =============================================================================

/// Ring, DMA assignment and callback of one direction
struct Lane {
    ring: DescriptorRing,
    state: DirectionState,
    channel: Option<DmaChannel>,
    callback: Option<EventCallback>,
    packet_size: usize,
    packets: u32,
    bytes: u64,
}

impl Lane {
    const fn new(direction: Direction) -> Self {
        Self {
            ring: DescriptorRing::new(direction),
            state: DirectionState::Uninitialized,
            channel: None,
            callback: None,
            packet_size: 0,
            packets: 0,
            bytes: 0,
        }
    }

    fn request(&self) -> DmaRequest {
        request_for(self.ring.direction())
    }

    fn record(&mut self, packets: usize, bytes: usize) {
        self.packets = self.packets.wrapping_add(packets as u32);
        self.bytes = self.bytes.wrapping_add(bytes as u64);
    }

    fn notify(&self, event: &I2sEvent) {
        if let Some(callback) = self.callback {
            callback(event);
        }
    }

    /// Retire the descriptors the engine finished and report them as one
    /// event. Returns the number retired.
    fn complete_batch(&mut self) -> usize {
        let direction = self.ring.direction();
        let result = self.ring.advance_on_consume();
        if result.nodes == 0 {
            #[cfg(feature = "log")]
            trace!("I2S {:?} completion without progress", direction);
            return 0;
        }

        self.record(result.nodes, result.nodes * self.packet_size);
        let event = I2sEvent {
            kind: match direction {
                Direction::Tx => EventKind::TxDone,
                Direction::Rx => EventKind::RxReady,
            },
            direction,
            buffer: result.first_buffer,
            len: self.packet_size,
            nodes: result.nodes,
            free_slots: result.free_slots,
        };

        #[cfg(feature = "log")]
        trace!(
            "I2S {:?} done: {} buffers, {} free, zombie {}",
            direction,
            result.nodes,
            result.free_slots,
            self.ring.is_zombie()
        );

        self.notify(&event);
        result.nodes
    }

    fn stats(&self) -> TransferStats {
        TransferStats {
            packets: self.packets,
            bytes: self.bytes,
            pushed: self.ring.pushed(),
            consumed: self.ring.consumed_total(),
        }
    }

    fn reset(&mut self) {
        self.ring.teardown();
        self.state = DirectionState::Uninitialized;
        self.channel = None;
        self.callback = None;
        self.packet_size = 0;
        self.packets = 0;
        self.bytes = 0;
    }
}

/// DMA request line serving `direction`
const fn request_for(direction: Direction) -> DmaRequest {
    match direction {
        Direction::Tx => DmaRequest::I2sTx,
        Direction::Rx => DmaRequest::I2sRx,
    }
}

fn set_direction_enable<R: RegisterBlock>(regs: &mut I2sRegs<R>, direction: Direction, on: bool) {
    let bit = match direction {
        Direction::Tx => CTRL_TXEN,
        Direction::Rx => CTRL_RXEN,
    };
    regs.set_control_bit(bit, on);
}

// =============================================================================
// I2S Driver
// =============================================================================

/// W80x I2S Driver
///
/// Owns the I2S register block, one descriptor ring per direction and a
/// [`DmaService`] handle.
///
/// The DMA engine follows raw links between the ring descriptors, so the
/// device must not move between [`init`](Self::init) and
/// [`deinit`](Self::deinit). Place it in a `static`.
///
/// # Example
/// ```ignore
/// static I2S: SharedI2s<Mmio, W80xDma<Mmio, Delay>> =
///     SharedI2s::new(I2s::new(unsafe { Mmio::new(I2S_BASE) }, dma));
///
/// let config = I2sConfig::new()
///     .with_mode(TransferMode::Out)
///     .with_tx_callback(on_tx_done);
///
/// I2S.with(|i2s| {
///     i2s.init(config)?;
///     unsafe { i2s.append_buffer(Direction::Tx, BUF.as_mut_ptr(), BUF.len())? };
///     i2s.start(Direction::Tx)
/// })?;
/// ```
pub struct I2s<R, D> {
    regs: I2sRegs<R>,
    dma: D,
    tx: Lane,
    rx: Lane,
    mode: TransferMode,
    initialized: bool,
    flush: FlushStats,
}

impl<R: RegisterBlock, D: DmaService> I2s<R, D> {
    /// Create a new, uninitialized driver
    ///
    /// This is a const function suitable for static initialization.
    pub const fn new(bus: R, dma: D) -> Self {
        Self {
            regs: I2sRegs::new(bus),
            dma,
            tx: Lane::new(Direction::Tx),
            rx: Lane::new(Direction::Rx),
            mode: TransferMode::InOut,
            initialized: false,
            flush: FlushStats {
                total: 0,
                valid: 0,
                bytes: 0,
            },
        }
    }

    // =========================================================================
    // Internal Accessors
    // =========================================================================

    fn lane(&self, direction: Direction) -> &Lane {
        match direction {
            Direction::Tx => &self.tx,
            Direction::Rx => &self.rx,
        }
    }

    fn lane_mut(&mut self, direction: Direction) -> &mut Lane {
        match direction {
            Direction::Tx => &mut self.tx,
            Direction::Rx => &mut self.rx,
        }
    }

    /// Split borrow of one lane together with the DMA and register handles
    fn parts(&mut self, direction: Direction) -> (&mut Lane, &mut D, &mut I2sRegs<R>) {
        let Self {
            regs, dma, tx, rx, ..
        } = self;
        let lane = match direction {
            Direction::Tx => tx,
            Direction::Rx => rx,
        };
        (lane, dma, regs)
    }

    /// DMA channel of an initialized, enabled direction
    fn active(&self, direction: Direction) -> IoResult<DmaChannel> {
        if !self.initialized {
            return Err(IoError::NotInitialized);
        }
        self.lane(direction)
            .channel
            .ok_or(IoError::DirectionDisabled)
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize the controller
    ///
    /// Builds a descriptor ring and claims a DMA channel for every direction
    /// in the transfer mode, then programs the controller. Any failure undoes
    /// everything done so far.
    ///
    /// # Errors
    /// - `AlreadyInitialized` - driver already initialized
    /// - Any [`I2sConfig::validate`] error
    /// - `ChannelBusy` - a DMA channel is held by another client
    pub fn init(&mut self, config: I2sConfig) -> Result<()> {
        if self.initialized {
            return Err(ConfigError::AlreadyInitialized.into());
        }
        config.validate()?;

        for direction in Direction::ALL {
            if !config.mode.uses(direction) {
                continue;
            }
            if let Err(err) = self.bring_up_lane(direction, config.direction(direction)) {
                self.release_lanes();
                return Err(err);
            }
        }

        self.configure_controller(&config);
        self.mode = config.mode;
        self.flush = FlushStats::default();
        self.initialized = true;

        #[cfg(feature = "log")]
        debug!(
            "I2S init: {:?} {:?} {:?}, tx depth {}, rx depth {}",
            config.role,
            config.mode,
            config.standard,
            self.tx.ring.depth(),
            self.rx.ring.depth()
        );

        Ok(())
    }

    fn bring_up_lane(&mut self, direction: Direction, config: &DirectionConfig) -> Result<()> {
        let channel = DmaChannel::new(config.dma_channel)?;
        let request = request_for(direction);
        let fifo_addr = match direction {
            Direction::Tx => self.regs.tx_fifo_addr(),
            Direction::Rx => self.regs.rx_fifo_addr(),
        };

        let (lane, dma, _) = self.parts(direction);
        lane.ring
            .build(config.depth, channel.number(), request.req_sel(), fifo_addr)?;
        if let Err(err) = dma.register(channel, request) {
            lane.ring.teardown();
            return Err(err.into());
        }

        lane.channel = Some(channel);
        lane.callback = config.callback;
        lane.packet_size = config.packet_size;
        lane.packets = 0;
        lane.bytes = 0;
        lane.state = DirectionState::Configured;
        Ok(())
    }

    fn release_lanes(&mut self) {
        for direction in Direction::ALL {
            let (lane, dma, _) = self.parts(direction);
            if let Some(channel) = lane.channel {
                dma.unregister(channel);
            }
            lane.reset();
        }
    }

    fn configure_controller(&mut self, config: &I2sConfig) {
        let regs = &mut self.regs;

        regs.reset_control();
        regs.mask_all_interrupts();
        regs.clear_all_interrupts();

        regs.set_slave(config.role == Role::Slave);
        if config.mode == TransferMode::InOut {
            regs.enable_duplex();
        }
        regs.set_format_field(config.standard.to_reg_value());
        regs.set_word_width_field(BitWidth::default().to_reg_value());
        regs.set_control_bit(CTRL_LZCEN | CTRL_RZCEN, false);
        regs.set_tx_threshold(TX_FIFO_THRESHOLD);
        regs.set_rx_threshold(RX_FIFO_THRESHOLD);

        if config.mode.uses(Direction::Tx) {
            regs.clear_tx_fifo();
            regs.enable_tx_dma();
            self.dma.clear_request(DmaRequest::I2sTx);
        }
        if config.mode.uses(Direction::Rx) {
            regs.clear_rx_fifo();
            regs.enable_rx_dma();
            regs.set_control_bit(CTRL_TIMEOUT_EN, true);
            regs.unmask_interrupts(INT_RXDONE);
            self.dma.clear_request(DmaRequest::I2sRx);
        }
    }

    /// Shut the controller down
    ///
    /// Stops both directions (queued buffers are dropped without events),
    /// releases the DMA channels, masks and clears interrupts and writes
    /// the control register back to its reset value. The driver ends up
    /// uninitialized even when a DMA channel fails to stop; that failure is
    /// still returned.
    ///
    /// # Errors
    /// - `NotInitialized` - driver not initialized
    /// - `StopTimeout` - a DMA channel did not stop
    pub fn deinit(&mut self) -> Result<()> {
        if !self.initialized {
            return Err(IoError::NotInitialized.into());
        }

        let mut first_err = None;
        for direction in Direction::ALL {
            if self.lane(direction).channel.is_none() {
                continue;
            }
            if let Err(err) = self.stop(direction) {
                first_err.get_or_insert(err);
            }
        }

        self.release_lanes();
        self.regs.mask_all_interrupts();
        self.regs.clear_all_interrupts();
        self.regs.reset_control();
        self.mode = TransferMode::default();
        self.initialized = false;

        #[cfg(feature = "log")]
        debug!("I2S deinit");

        first_err.map_or(Ok(()), Err)
    }

    // =========================================================================
    // Buffers
    // =========================================================================

    /// Queue a buffer on a direction's ring
    ///
    /// The buffer belongs to the driver until an event reports it. Buffers
    /// still queued when the direction is stopped are dropped without an
    /// event and return to the caller.
    ///
    /// # Safety
    /// `buffer` must be valid for reads (TX) or writes (RX) of `len` bytes
    /// and must not be accessed by anything else until the driver reports
    /// it, the direction is stopped or the driver is deinitialized.
    ///
    /// # Errors
    /// - `NotInitialized` / `DirectionDisabled`
    /// - `NullBuffer` - `buffer` is null
    /// - `InvalidLength` - empty, unaligned or longer than one descriptor
    /// - `RingFull` - every slot is pending, retry after the next event
    pub unsafe fn append_buffer(
        &mut self,
        direction: Direction,
        buffer: *mut u8,
        len: usize,
    ) -> Result<()> {
        self.active(direction)?;
        if buffer.is_null() {
            return Err(IoError::NullBuffer.into());
        }
        if len == 0
            || len > MAX_PACKET_SIZE
            || len % BUFFER_ALIGN != 0
            || (buffer as usize) % BUFFER_ALIGN != 0
        {
            return Err(DmaError::InvalidLength.into());
        }

        let _slot = self.lane_mut(direction).ring.append(buffer as usize, len)?;

        #[cfg(feature = "log")]
        trace!("I2S {:?} append: {} bytes at {:p} into slot {}", direction, len, buffer, _slot);

        Ok(())
    }

    // =========================================================================
    // Start / Stop / Pause / Resume
    // =========================================================================

    /// Start a direction
    ///
    /// Hands the ring head to the DMA engine and sets the direction enable
    /// bit (and the controller enable bit if needed). A running direction
    /// whose ring drained, or whose engine went idle, is re-armed at the
    /// ring head. A direction with the engine still moving data is left
    /// alone.
    ///
    /// # Errors
    /// - `NotInitialized` / `DirectionDisabled`
    /// - `InvalidState` - direction is paused (use [`resume`](Self::resume))
    /// - `NoBufferQueued` - the ring head holds no buffer; nothing changed
    /// - DMA errors from configuring or starting the channel
    pub fn start(&mut self, direction: Direction) -> Result<()> {
        let channel = self.active(direction)?;
        let (lane, dma, regs) = self.parts(direction);

        let rearm = match lane.state {
            DirectionState::Paused => return Err(IoError::InvalidState.into()),
            DirectionState::Running if !lane.ring.is_zombie() && dma.is_running(channel) => {
                return Ok(());
            }
            DirectionState::Running => true,
            DirectionState::Configured | DirectionState::Uninitialized => false,
        };

        if !lane.ring.head().is_valid() {
            return Err(DmaError::NoBufferQueued.into());
        }

        if rearm {
            dma.stop(channel)?;
        }

        lane.ring.set_zombie(false);
        let armed = dma
            .configure(channel, lane.request(), lane.ring.head_ptr())
            .and_then(|()| dma.start(channel));
        if let Err(err) = armed {
            lane.ring.set_zombie(true);
            return Err(err.into());
        }

        set_direction_enable(regs, direction, true);
        if !regs.is_enabled() {
            regs.enable();
        }
        lane.state = DirectionState::Running;

        #[cfg(feature = "log")]
        debug!(
            "I2S {:?} start: slot {} occupancy {}",
            direction,
            lane.ring.consume_index(),
            lane.ring.occupancy()
        );

        Ok(())
    }

    /// Stop a direction
    ///
    /// Stops the DMA channel, drops every queued buffer without an event,
    /// clears the direction enable bit and flushes the direction's FIFO.
    /// Stopping a stopped direction is harmless.
    ///
    /// # Errors
    /// - `NotInitialized` / `DirectionDisabled`
    /// - `StopTimeout` - the DMA channel did not stop; the ring is still
    ///   emptied
    pub fn stop(&mut self, direction: Direction) -> Result<()> {
        let channel = self.active(direction)?;
        let (lane, dma, regs) = self.parts(direction);

        let stopped = dma.stop(channel);
        lane.ring.stop();
        set_direction_enable(regs, direction, false);
        lane.ring.set_zombie(true);
        match direction {
            Direction::Tx => regs.clear_tx_fifo(),
            Direction::Rx => regs.clear_rx_fifo(),
        }
        lane.state = DirectionState::Configured;

        if let Err(err) = stopped {
            #[cfg(feature = "log")]
            warn!("I2S {:?} stop: DMA channel {} did not stop", direction, channel.number());
            return Err(err.into());
        }

        #[cfg(feature = "log")]
        debug!("I2S {:?} stop", direction);

        Ok(())
    }

    /// Pause a running direction
    ///
    /// Only the direction enable bit is cleared. The DMA channel and the
    /// queued buffers are left as they are.
    ///
    /// # Errors
    /// - `NotInitialized` / `DirectionDisabled`
    /// - `InvalidState` - direction is not running
    pub fn pause(&mut self, direction: Direction) -> Result<()> {
        self.active(direction)?;
        let (lane, _, regs) = self.parts(direction);
        if lane.state != DirectionState::Running {
            return Err(IoError::InvalidState.into());
        }

        set_direction_enable(regs, direction, false);
        lane.state = DirectionState::Paused;

        #[cfg(feature = "log")]
        debug!("I2S {:?} pause", direction);

        Ok(())
    }

    /// Resume a paused direction
    ///
    /// # Errors
    /// - `NotInitialized` / `DirectionDisabled`
    /// - `InvalidState` - direction is not paused
    pub fn resume(&mut self, direction: Direction) -> Result<()> {
        self.active(direction)?;
        let (lane, _, regs) = self.parts(direction);
        if lane.state != DirectionState::Paused {
            return Err(IoError::InvalidState.into());
        }

        set_direction_enable(regs, direction, true);
        lane.state = DirectionState::Running;

        #[cfg(feature = "log")]
        debug!("I2S {:?} resume", direction);

        Ok(())
    }

    /// Check if a direction's ring drained and its engine is idle.
    ///
    /// Also true for a direction that is not configured.
    pub fn is_zombie(&self, direction: Direction) -> bool {
        let lane = self.lane(direction);
        !self.initialized || !lane.ring.is_built() || lane.ring.is_zombie()
    }

    // =========================================================================
    // Interrupt Entry Points
    // =========================================================================

    /// DMA transfer-done handler for `direction`
    ///
    /// Retires every finished descriptor and reports them to the
    /// direction's callback as one event carrying the first buffer, the
    /// configured packet size, the number of buffers and the free slots.
    /// Nothing is reported when no descriptor finished.
    pub fn on_dma_complete(&mut self, direction: Direction) {
        if self.active(direction).is_err() {
            return;
        }
        self.lane_mut(direction).complete_batch();
    }

    /// I2S interrupt handler
    ///
    /// Reads and clears the flag register. RX-done runs the degraded drain
    /// when the receiver is still enabled.
    pub fn handle_interrupt(&mut self) -> InterruptStatus {
        let status = InterruptStatus::from_raw(self.regs.interrupt_flags());
        self.regs.clear_interrupts(status.to_raw());

        if status.rx_done && self.active(Direction::Rx).is_ok() && self.regs.is_rx_enabled() {
            self.drain_rx();
        }

        status
    }

    /// Finish the RX buffer in flight by reading the FIFO directly.
    fn drain_rx(&mut self) {
        self.flush.total = self.flush.total.wrapping_add(1);
        let Self {
            regs,
            dma,
            rx: lane,
            flush,
            ..
        } = self;
        let Some(channel) = lane.channel else {
            return;
        };

        let was_zombie = lane.ring.is_zombie();
        if let Err(_err) = dma.stop(channel) {
            #[cfg(feature = "log")]
            warn!("I2S drain: RX DMA stop failed: {}", _err);
        }
        lane.ring.set_zombie(true);

        let status = dma.status(channel);

        // Descriptors the engine already finished go out as a normal batch
        // first; the transfer count then belongs to the next descriptor.
        let retired = if lane.ring.occupancy() > 0 && !lane.ring.head().is_valid() {
            lane.complete_batch()
        } else {
            0
        };
        let in_flight = lane.ring.occupancy() > 0 && lane.ring.head().is_valid();

        if !in_flight {
            if retired > 0 {
                lane.notify(&I2sEvent {
                    kind: EventKind::RxDone,
                    direction: Direction::Rx,
                    buffer: None,
                    len: 0,
                    nodes: 0,
                    free_slots: lane.ring.free_slots(),
                });
            } else {
                #[cfg(feature = "log")]
                warn!("I2S drain: no RX buffer in flight");
            }
            return;
        }

        if status.xfer_count == 0 {
            lane.ring.set_zombie(was_zombie);
            if let Err(_err) = dma.start(channel) {
                #[cfg(feature = "log")]
                warn!("I2S drain: RX DMA restart failed: {}", _err);
            }
            #[cfg(feature = "log")]
            warn!("I2S drain: nothing transferred, DMA restarted");
            return;
        }

        let head = lane.ring.head();
        let dest = head.buffer_addr(Direction::Rx);
        let len = head.len();
        let mut offset = usize::from(status.xfer_count).min(len);

        // Words that do not fit stay in the FIFO
        while offset + FIFO_WORD_SIZE <= len && regs.rx_fifo_count() > 0 {
            let word = regs.rx_data();
            // SAFETY: `append_buffer` requires the buffer to stay writable
            // for `len` bytes until it is reported
            unsafe { ((dest + offset) as *mut u32).write_unaligned(word) };
            offset += FIFO_WORD_SIZE;
        }

        let Some(slot) = lane.ring.consume_one() else {
            return;
        };
        lane.record(1, offset);

        let ready = I2sEvent {
            kind: EventKind::RxReady,
            direction: Direction::Rx,
            buffer: Some(slot.buffer),
            len: offset,
            nodes: 1,
            free_slots: lane.ring.free_slots(),
        };

        #[cfg(feature = "log")]
        trace!("I2S drain: {} of {} bytes at {:#x}", offset, slot.len, slot.buffer);

        lane.notify(&ready);

        flush.valid = flush.valid.wrapping_add(1);
        flush.bytes = flush.bytes.wrapping_add(offset as u64);

        lane.notify(&I2sEvent {
            kind: EventKind::RxDone,
            buffer: None,
            len: 0,
            nodes: 0,
            ..ready
        });
    }

    // =========================================================================
    // Format Control
    // =========================================================================

    fn update_control(&mut self, bit: u32, on: bool) -> Result<()> {
        if !self.initialized {
            return Err(IoError::NotInitialized.into());
        }
        self.regs.set_control_bit(bit, on);
        Ok(())
    }

    /// Set the sample width and channel layout
    pub fn set_format(&mut self, bits: BitWidth, channel: ChannelType) -> Result<()> {
        if !self.initialized {
            return Err(IoError::NotInitialized.into());
        }
        self.regs.set_word_width_field(bits.to_reg_value());
        match channel {
            ChannelType::Stereo => self.regs.set_control_bit(CTRL_MONO, false),
            ChannelType::MonoLeft | ChannelType::MonoRight => {
                self.regs.set_control_bit(CTRL_MONO, true);
                self.regs
                    .set_control_bit(CTRL_RXLCH, channel == ChannelType::MonoRight);
            }
        }
        Ok(())
    }

    /// Enable left channel zero-cross detection
    pub fn set_left_zero_cross(&mut self, enable: bool) -> Result<()> {
        self.update_control(CTRL_LZCEN, enable)
    }

    /// Enable right channel zero-cross detection
    pub fn set_right_zero_cross(&mut self, enable: bool) -> Result<()> {
        self.update_control(CTRL_RZCEN, enable)
    }

    /// Receive mono data from the left (`true`) or right channel
    pub fn set_mono_left(&mut self, left: bool) -> Result<()> {
        self.update_control(CTRL_RXLCH, !left)
    }

    /// Invert the transmit clock phase
    pub fn set_tx_clock_inverted(&mut self, inverted: bool) -> Result<()> {
        self.update_control(CTRL_TX_CLK_PHASE, inverted)
    }

    /// Invert the receive clock phase
    pub fn set_rx_clock_inverted(&mut self, inverted: bool) -> Result<()> {
        self.update_control(CTRL_RX_CLK_PHASE, inverted)
    }

    /// Mute the transmitter
    pub fn set_tx_mute(&mut self, mute: bool) -> Result<()> {
        self.update_control(CTRL_MUTE, mute)
    }

    // =========================================================================
    // Status Queries
    // =========================================================================

    /// Check if the driver is initialized
    #[inline(always)]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Configured transfer mode
    #[inline(always)]
    pub fn mode(&self) -> TransferMode {
        self.mode
    }

    /// State of a direction
    #[inline(always)]
    pub fn state(&self, direction: Direction) -> DirectionState {
        self.lane(direction).state
    }

    /// Check if a direction's DMA channel is running
    pub fn is_dma_running(&self, direction: Direction) -> bool {
        self.lane(direction)
            .channel
            .is_some_and(|channel| self.dma.is_running(channel))
    }

    /// Check if a direction's enable bit is set
    pub fn is_enabled(&self, direction: Direction) -> bool {
        match direction {
            Direction::Tx => self.regs.is_tx_enabled(),
            Direction::Rx => self.regs.is_rx_enabled(),
        }
    }

    /// Free ring slots of a direction
    pub fn free_slots(&self, direction: Direction) -> usize {
        self.lane(direction).ring.free_slots()
    }

    /// Queued buffers of a direction
    pub fn occupancy(&self, direction: Direction) -> usize {
        self.lane(direction).ring.occupancy()
    }

    /// Transfer counters of a direction
    pub fn stats(&self, direction: Direction) -> TransferStats {
        self.lane(direction).stats()
    }

    /// Degraded-drain counters
    pub fn flush_stats(&self) -> FlushStats {
        self.flush
    }

    /// Snapshot registers and driver state, logging it when `log` is enabled
    pub fn dump_info(&self) -> I2sInfo {
        let info = I2sInfo {
            control: self.regs.control(),
            interrupt_mask: self.regs.interrupt_mask(),
            interrupt_flags: self.regs.interrupt_flags(),
            tx_fifo_words: self.regs.tx_fifo_count(),
            rx_fifo_words: self.regs.rx_fifo_count(),
            tx: self.direction_info(Direction::Tx),
            rx: self.direction_info(Direction::Rx),
            flush: self.flush,
        };

        #[cfg(feature = "log")]
        {
            info!(
                "I2S ctrl={:#010x} imask={:#06x} flags={:#06x} txfifo={} rxfifo={}",
                info.control,
                info.interrupt_mask,
                info.interrupt_flags,
                info.tx_fifo_words,
                info.rx_fifo_words
            );
            for (name, dir) in [("tx", &info.tx), ("rx", &info.rx)] {
                info!(
                    "I2S {}: {:?} depth={} occ={} consume={} append={} zombie={} dma={} packets={} bytes={}",
                    name,
                    dir.state,
                    dir.depth,
                    dir.occupancy,
                    dir.consume_index,
                    dir.append_index,
                    dir.zombie,
                    dir.dma_running,
                    dir.stats.packets,
                    dir.stats.bytes
                );
            }
            info!(
                "I2S flush: total={} valid={} bytes={}",
                info.flush.total, info.flush.valid, info.flush.bytes
            );
        }

        info
    }

    fn direction_info(&self, direction: Direction) -> DirectionInfo {
        let lane = self.lane(direction);
        DirectionInfo {
            state: lane.state,
            depth: lane.ring.depth(),
            occupancy: lane.ring.occupancy(),
            consume_index: lane.ring.consume_index(),
            append_index: lane.ring.append_index(),
            zombie: self.is_zombie(direction),
            dma_running: self.is_dma_running(direction),
            stats: lane.stats(),
        }
    }

    // =========================================================================
    // Collaborators
    // =========================================================================

    /// DMA service
    pub fn dma(&self) -> &D {
        &self.dma
    }

    /// Mutable DMA service (for dispatching its interrupts)
    pub fn dma_mut(&mut self) -> &mut D {
        &mut self.dma
    }

    /// I2S register bus
    pub fn registers(&self) -> &R {
        self.regs.bus()
    }

    #[cfg(test)]
    pub(crate) fn ring(&self, direction: Direction) -> &DescriptorRing {
        &self.lane(direction).ring
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
