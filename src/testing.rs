//! Testing utilities and mock implementations
//!
//! Host-side stand-ins for the I2S register block, the DMA engine and the
//! delay provider, plus a recorder for completion events.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::vec::Vec;

use crate::driver::error::{DmaError, DmaResult};
use crate::driver::event::I2sEvent;
use crate::hal::dma::{ChannelTable, DmaChannel, DmaRequest, DmaService, DmaStatus};
use crate::internal::constants::DMA_CHANNEL_COUNT;
use crate::internal::dma::DmaDescriptor;
use crate::internal::register::RegisterBlock;
use crate::internal::register::dma::INT_STATUS_OFFSET;
use crate::internal::register::i2s::{
    CONTROL_OFFSET, CTRL_RXCLR, CTRL_TXCLR, INT_FLAG_OFFSET, RX_OFFSET, STATUS_OFFSET,
    STATUS_RXCNT_MASK, STATUS_RXCNT_SHIFT,
};

// =============================================================================
// Mock Registers
// =============================================================================

/// In-memory register block.
///
/// Plain registers hold the last value written. The [`MockRegisters::i2s`]
/// flavour adds a simulated RX FIFO and write-1-to-clear interrupt flags.
///
/// # Example
///
/// ```ignore
/// let regs = MockRegisters::i2s(0x4001_2000);
/// regs.push_rx_fifo(&[1, 2, 3, 4]);
/// let i2s = I2sRegs::new(regs);
/// assert_eq!(i2s.rx_fifo_count(), 4);
/// ```
#[derive(Debug, Default)]
pub struct MockRegisters {
    base: usize,
    /// Register values by offset
    registers: RefCell<HashMap<usize, u32>>,
    /// Record of writes: (offset, value)
    write_log: RefCell<Vec<(usize, u32)>>,
    /// Offsets with write-1-to-clear semantics
    w1c: Vec<usize>,
    /// Simulated RX FIFO, when enabled
    rx_fifo: Option<RefCell<VecDeque<u32>>>,
}

impl MockRegisters {
    /// Plain register block at `base`
    pub fn new(base: usize) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    /// I2S register block with a simulated RX FIFO
    pub fn i2s(base: usize) -> Self {
        Self {
            base,
            w1c: std::vec![INT_FLAG_OFFSET],
            rx_fifo: Some(RefCell::new(VecDeque::new())),
            ..Self::default()
        }
    }

    /// DMA register block with write-1-to-clear interrupt status
    pub fn dma(base: usize) -> Self {
        Self {
            base,
            w1c: std::vec![INT_STATUS_OFFSET],
            ..Self::default()
        }
    }

    /// Set a register value without logging a write
    pub fn set_register(&self, offset: usize, value: u32) {
        self.registers.borrow_mut().insert(offset, value);
    }

    /// Stored register value (no FIFO side effects)
    pub fn register(&self, offset: usize) -> u32 {
        self.registers.borrow().get(&offset).copied().unwrap_or(0)
    }

    /// Get all writes that have been made
    pub fn get_writes(&self) -> Vec<(usize, u32)> {
        self.write_log.borrow().clone()
    }

    /// Writes to one offset, in order
    pub fn writes_to(&self, offset: usize) -> Vec<u32> {
        self.write_log
            .borrow()
            .iter()
            .filter(|(o, _)| *o == offset)
            .map(|(_, v)| *v)
            .collect()
    }

    /// Clear the write log
    pub fn clear_writes(&self) {
        self.write_log.borrow_mut().clear();
    }

    /// Queue words into the simulated RX FIFO
    pub fn push_rx_fifo(&self, words: &[u32]) {
        if let Some(fifo) = &self.rx_fifo {
            fifo.borrow_mut().extend(words.iter().copied());
        }
    }

    /// Words left in the simulated RX FIFO
    pub fn rx_fifo_len(&self) -> usize {
        self.rx_fifo.as_ref().map_or(0, |fifo| fifo.borrow().len())
    }
}

impl RegisterBlock for MockRegisters {
    fn base_addr(&self) -> usize {
        self.base
    }

    fn read(&self, offset: usize) -> u32 {
        if let Some(fifo) = &self.rx_fifo {
            if offset == RX_OFFSET {
                return fifo.borrow_mut().pop_front().unwrap_or(0);
            }
            if offset == STATUS_OFFSET {
                let count = fifo.borrow().len().min(0xF) as u32;
                return (self.register(offset) & !STATUS_RXCNT_MASK)
                    | (count << STATUS_RXCNT_SHIFT);
            }
        }
        self.register(offset)
    }

    fn write(&mut self, offset: usize, value: u32) {
        self.write_log.borrow_mut().push((offset, value));

        if self.w1c.contains(&offset) {
            let current = self.register(offset);
            self.set_register(offset, current & !value);
            return;
        }

        if offset == CONTROL_OFFSET {
            if let Some(fifo) = &self.rx_fifo {
                if value & CTRL_RXCLR != 0 {
                    fifo.borrow_mut().clear();
                }
                // FIFO clear bits self-reset
                self.set_register(offset, value & !(CTRL_RXCLR | CTRL_TXCLR));
                return;
            }
        }

        self.set_register(offset, value);
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay for testing without actual timing
///
/// Records delays for verification without actually waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: RefCell<u64>,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        *self.total_ns.borrow()
    }

    /// Get total microseconds that were "delayed"
    pub fn total_us(&self) -> u64 {
        self.total_ns() / 1_000
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += ns as u64;
    }
}

// =============================================================================
// Mock DMA Engine
// =============================================================================

/// Calls recorded by [`MockDma`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmaCall {
    Configure { channel: u8, request: DmaRequest, head: usize },
    Start(u8),
    Stop(u8),
    Status(u8),
    Register(u8, DmaRequest),
    Unregister(u8),
    ClearRequest(DmaRequest),
}

const CHANNELS: usize = DMA_CHANNEL_COUNT as usize;

/// Mock DMA engine.
///
/// Records every call and walks descriptor chains on demand: each
/// [`MockDma::complete`] step clears the valid flag of the descriptor under
/// the channel cursor and follows its link, the way the engine does in
/// chain mode.
#[derive(Debug, Default)]
pub struct MockDma {
    calls: Vec<DmaCall>,
    table: ChannelTable,
    cursor: [usize; CHANNELS],
    running: [bool; CHANNELS],
    xfer_count: [u16; CHANNELS],
    fail_start: bool,
    fail_stop: bool,
}

impl MockDma {
    /// Create a new mock engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded calls, in order
    pub fn calls(&self) -> &[DmaCall] {
        &self.calls
    }

    /// Forget recorded calls
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Count recorded calls matching `pred`
    pub fn count(&self, pred: impl Fn(&DmaCall) -> bool) -> usize {
        self.calls.iter().filter(|call| pred(call)).count()
    }

    /// Owner map
    pub fn table(&self) -> &ChannelTable {
        &self.table
    }

    /// Bytes to report as moved for the descriptor in flight
    pub fn set_xfer_count(&mut self, channel: u8, count: u16) {
        self.xfer_count[channel as usize] = count;
    }

    /// Make the next `start` calls fail
    pub fn set_fail_start(&mut self, fail: bool) {
        self.fail_start = fail;
    }

    /// Make the next `stop` calls time out
    pub fn set_fail_stop(&mut self, fail: bool) {
        self.fail_stop = fail;
    }

    /// Check if the channel was started and not stopped
    pub fn running(&self, channel: u8) -> bool {
        self.running[channel as usize]
    }

    /// Finish up to `n` descriptors on `channel`, returning how many
    /// completed. The engine idles at the first descriptor that is not valid.
    pub fn complete(&mut self, channel: u8, n: usize) -> usize {
        let ch = channel as usize;
        let mut done = 0;
        while done < n && self.cursor[ch] != 0 {
            // SAFETY: the cursor was set from a live descriptor chain by
            // `configure`, and the owning driver does not move while tests run.
            let desc = unsafe { &*(self.cursor[ch] as *const DmaDescriptor) };
            if !desc.is_valid() {
                self.running[ch] = false;
                break;
            }
            desc.clear_valid();
            self.cursor[ch] = desc.next_addr();
            self.xfer_count[ch] = 0;
            done += 1;
        }
        done
    }
}

impl DmaService for MockDma {
    fn configure(
        &mut self,
        channel: DmaChannel,
        request: DmaRequest,
        head: *const DmaDescriptor,
    ) -> DmaResult<()> {
        let ch = channel.number();
        self.calls.push(DmaCall::Configure {
            channel: ch,
            request,
            head: head as usize,
        });
        self.cursor[ch as usize] = head as usize;
        Ok(())
    }

    fn start(&mut self, channel: DmaChannel) -> DmaResult<()> {
        let ch = channel.number();
        self.calls.push(DmaCall::Start(ch));
        if self.fail_start {
            return Err(DmaError::ChannelBusy);
        }
        self.running[ch as usize] = true;
        Ok(())
    }

    fn stop(&mut self, channel: DmaChannel) -> DmaResult<()> {
        let ch = channel.number();
        self.calls.push(DmaCall::Stop(ch));
        if self.fail_stop {
            return Err(DmaError::StopTimeout);
        }
        self.running[ch as usize] = false;
        Ok(())
    }

    fn status(&mut self, channel: DmaChannel) -> DmaStatus {
        let ch = channel.number();
        self.calls.push(DmaCall::Status(ch));
        DmaStatus {
            running: self.running[ch as usize],
            xfer_count: self.xfer_count[ch as usize],
        }
    }

    fn is_running(&self, channel: DmaChannel) -> bool {
        self.running[channel.number() as usize]
    }

    fn register(&mut self, channel: DmaChannel, request: DmaRequest) -> DmaResult<()> {
        self.calls.push(DmaCall::Register(channel.number(), request));
        self.table.register(channel, request)
    }

    fn unregister(&mut self, channel: DmaChannel) {
        self.calls.push(DmaCall::Unregister(channel.number()));
        self.table.unregister(channel);
    }

    fn clear_request(&mut self, request: DmaRequest) {
        self.calls.push(DmaCall::ClearRequest(request));
    }
}

// =============================================================================
// Event Recorder
// =============================================================================

std::thread_local! {
    static EVENTS: RefCell<Vec<I2sEvent>> = const { RefCell::new(Vec::new()) };
}

/// Completion callback that records every event on the current thread
pub fn record_event(event: &I2sEvent) {
    EVENTS.with(|events| events.borrow_mut().push(*event));
}

/// Take the events recorded on the current thread
pub fn take_events() -> Vec<I2sEvent> {
    EVENTS.with(|events| core::mem::take(&mut *events.borrow_mut()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::config::Direction;
    use crate::driver::event::EventKind;
    use embedded_hal::delay::DelayNs;

    #[test]
    fn mock_registers_read_write() {
        let mut regs = MockRegisters::new(0);
        assert_eq!(regs.read(0x04), 0);
        regs.write(0x04, 0x1234);
        assert_eq!(regs.read(0x04), 0x1234);
        assert_eq!(regs.get_writes(), std::vec![(0x04, 0x1234)]);

        regs.clear_writes();
        assert!(regs.get_writes().is_empty());
    }

    #[test]
    fn simulated_fifo_pops_and_counts() {
        let regs = MockRegisters::i2s(0);
        regs.push_rx_fifo(&[0xA, 0xB]);
        assert_eq!(regs.read(STATUS_OFFSET) & STATUS_RXCNT_MASK, 2);
        assert_eq!(regs.read(RX_OFFSET), 0xA);
        assert_eq!(regs.read(STATUS_OFFSET) & STATUS_RXCNT_MASK, 1);
        assert_eq!(regs.rx_fifo_len(), 1);
    }

    #[test]
    fn rx_clear_empties_fifo_and_self_resets() {
        let mut regs = MockRegisters::i2s(0);
        regs.push_rx_fifo(&[1, 2, 3]);
        regs.set_bits(CONTROL_OFFSET, CTRL_RXCLR | 1);
        assert_eq!(regs.rx_fifo_len(), 0);
        assert_eq!(regs.read(CONTROL_OFFSET), 1);
    }

    #[test]
    fn w1c_register_clears_written_bits() {
        let mut regs = MockRegisters::i2s(0);
        regs.set_register(INT_FLAG_OFFSET, 0b1010);
        regs.write(INT_FLAG_OFFSET, 0b0010);
        assert_eq!(regs.read(INT_FLAG_OFFSET), 0b1000);
    }

    #[test]
    fn mock_delay_tracking() {
        let mut delay = MockDelay::new();
        delay.delay_us(3);
        delay.delay_ns(500);
        assert_eq!(delay.total_ns(), 3_500);
        assert_eq!(delay.total_us(), 3);
    }

    #[test]
    fn mock_dma_walks_chain_until_invalid() {
        let a = DmaDescriptor::new();
        let b = DmaDescriptor::new();
        a.link(&b);
        b.link(&a);
        a.set_valid();
        b.set_valid();

        let mut dma = MockDma::new();
        let ch = DmaChannel::new(0).unwrap();
        dma.configure(ch, DmaRequest::I2sTx, &a).unwrap();
        dma.start(ch).unwrap();

        assert_eq!(dma.complete(0, 5), 2);
        assert!(!a.is_valid());
        assert!(!b.is_valid());
        assert!(!dma.running(0));
    }

    #[test]
    fn event_recorder_takes_in_order() {
        let event = I2sEvent {
            kind: EventKind::TxDone,
            direction: Direction::Tx,
            buffer: Some(0x100),
            len: 64,
            nodes: 1,
            free_slots: 3,
        };
        record_event(&event);
        record_event(&I2sEvent { buffer: Some(0x200), ..event });

        let events = take_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].buffer, Some(0x100));
        assert_eq!(events[1].buffer, Some(0x200));
        assert!(take_events().is_empty());
    }
}
