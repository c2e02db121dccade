//! W80x DMA Controller
//!
//! Register-backed [`DmaService`] for the W80x general purpose DMA block.
//! Channels run in hardware-request, chained list mode: the engine walks
//! the descriptor links on its own and raises the transfer-done interrupt
//! per descriptor.

#[cfg(feature = "log")]
use log::warn;

use embedded_hal::delay::DelayNs;

use super::dma::{ChannelTable, DmaChannel, DmaRequest, DmaService, DmaStatus};
use crate::driver::error::{DmaError, DmaResult};
use crate::internal::constants::{DMA_CHANNEL_COUNT, DMA_STOP_POLL_US, DMA_STOP_TIMEOUT_US};
use crate::internal::dma::DmaDescriptor;
use crate::internal::register::RegisterBlock;
use crate::internal::register::dma::{DmaRegs, INT_XFER_DONE, channel_int_bit};

/// W80x DMA controller
#[derive(Debug)]
pub struct W80xDma<R, D> {
    regs: DmaRegs<R>,
    delay: D,
    table: ChannelTable,
    timeout_us: u32,
}

impl<R: RegisterBlock, D: DelayNs> W80xDma<R, D> {
    /// Create a controller over `bus`, masking and clearing every channel
    /// interrupt
    pub fn new(bus: R, delay: D) -> Self {
        let mut regs = DmaRegs::new(bus);
        regs.reset_interrupts();
        Self {
            regs,
            delay,
            table: ChannelTable::new(),
            timeout_us: DMA_STOP_TIMEOUT_US,
        }
    }

    /// Create a controller with a custom stop timeout
    pub fn with_timeout(bus: R, delay: D, timeout_us: u32) -> Self {
        Self {
            timeout_us,
            ..Self::new(bus, delay)
        }
    }

    /// Owner map
    pub fn table(&self) -> &ChannelTable {
        &self.table
    }

    /// Register block
    pub fn regs(&self) -> &DmaRegs<R> {
        &self.regs
    }

    /// Take the next finished channel from the interrupt status.
    ///
    /// Call from the DMA interrupt handler until it returns `None`, and
    /// forward each owner to its driver. Flags of unowned channels are
    /// cleared and skipped.
    pub fn next_completion(&mut self) -> Option<(DmaChannel, DmaRequest)> {
        let status = self.regs.int_status();
        for number in 0..DMA_CHANNEL_COUNT {
            if status & channel_int_bit(number, INT_XFER_DONE) == 0 {
                continue;
            }
            self.regs.clear_channel_interrupts(number);
            let Ok(channel) = DmaChannel::new(number) else {
                continue;
            };
            if let Some(owner) = self.table.owner(channel) {
                return Some((channel, owner));
            }
        }
        None
    }
}

impl<R: RegisterBlock, D: DelayNs> DmaService for W80xDma<R, D> {
    fn configure(
        &mut self,
        channel: DmaChannel,
        request: DmaRequest,
        head: *const DmaDescriptor,
    ) -> DmaResult<()> {
        let ch = channel.number();
        if self.regs.is_started(ch) {
            return Err(DmaError::ChannelBusy);
        }

        self.regs.reset_channel(ch);
        self.regs.set_mode(ch, true, true, request.req_sel(), true);
        // The bus is 32 bits wide on the target
        self.regs.set_desc_addr(ch, head as usize as u32);
        self.regs.clear_channel_interrupts(ch);
        self.regs.unmask_channel_interrupt(ch, INT_XFER_DONE);
        Ok(())
    }

    fn start(&mut self, channel: DmaChannel) -> DmaResult<()> {
        self.regs.start(channel.number());
        Ok(())
    }

    fn stop(&mut self, channel: DmaChannel) -> DmaResult<()> {
        let ch = channel.number();
        if !self.regs.is_started(ch) {
            return Ok(());
        }

        self.regs.request_stop(ch);
        let max_iterations = self.timeout_us / DMA_STOP_POLL_US;
        for _ in 0..max_iterations {
            if !self.regs.is_started(ch) {
                return Ok(());
            }
            self.delay.delay_us(DMA_STOP_POLL_US);
        }

        #[cfg(feature = "log")]
        warn!("DMA channel {} did not stop within {}us", ch, self.timeout_us);

        Err(DmaError::StopTimeout)
    }

    fn status(&mut self, channel: DmaChannel) -> DmaStatus {
        let ch = channel.number();
        let status = DmaStatus {
            running: self.regs.is_started(ch),
            xfer_count: self.regs.xfer_count(ch),
        };
        self.regs.clear_channel_interrupts(ch);
        status
    }

    fn is_running(&self, channel: DmaChannel) -> bool {
        self.regs.is_started(channel.number())
    }

    fn register(&mut self, channel: DmaChannel, request: DmaRequest) -> DmaResult<()> {
        self.table.register(channel, request)
    }

    fn unregister(&mut self, channel: DmaChannel) {
        self.regs.mask_channel_interrupt(channel.number(), INT_XFER_DONE);
        self.table.unregister(channel);
    }

    fn clear_request(&mut self, request: DmaRequest) {
        self.regs.clear_request(request.req_sel());
    }
}
