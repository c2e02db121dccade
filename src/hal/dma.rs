//! DMA engine contract
//!
//! The I2S driver does not own the DMA controller. It consumes the
//! [`DmaService`] trait, which the register-backed
//! [`W80xDma`](super::w80x_dma::W80xDma) implements and host tests mock.
//!
//! Channel ownership is tracked in a [`ChannelTable`] owned by the service
//! instead of a global callback array. A channel registered to one request
//! source cannot be claimed by another until it is released.

use crate::driver::error::{DmaError, DmaResult};
use crate::internal::constants::{DMA_CHANNEL_COUNT, DMA_REQ_I2S_RX, DMA_REQ_I2S_TX};
use crate::internal::dma::DmaDescriptor;

// =============================================================================
// Channel and Request Types
// =============================================================================

/// A DMA channel number known to be in range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DmaChannel(u8);

impl DmaChannel {
    /// Create a channel handle, rejecting numbers past the last channel
    pub const fn new(number: u8) -> DmaResult<Self> {
        if number < DMA_CHANNEL_COUNT {
            Ok(Self(number))
        } else {
            Err(DmaError::InvalidChannel)
        }
    }

    /// Channel number
    #[inline(always)]
    pub const fn number(self) -> u8 {
        self.0
    }

    #[inline(always)]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Peripheral request line that paces a hardware-triggered transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaRequest {
    /// I2S receive FIFO has data
    I2sRx,
    /// I2S transmit FIFO has room
    I2sTx,
}

impl DmaRequest {
    /// Request select value programmed into the channel mode
    #[inline(always)]
    pub const fn req_sel(self) -> u32 {
        match self {
            DmaRequest::I2sRx => DMA_REQ_I2S_RX,
            DmaRequest::I2sTx => DMA_REQ_I2S_TX,
        }
    }
}

/// Channel status snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DmaStatus {
    /// Channel start bit still set
    pub running: bool,
    /// Bytes moved for the descriptor in flight
    pub xfer_count: u16,
}

// =============================================================================
// Service Trait
// =============================================================================

/// DMA engine operations consumed by the I2S driver.
///
/// Completion delivery is platform glue: the DMA interrupt handler looks the
/// finished channel up in the owner table and calls
/// [`I2s::on_dma_complete`](crate::I2s::on_dma_complete) for it.
pub trait DmaService {
    /// Point `channel` at a descriptor chain head and program its mode.
    ///
    /// The chain must stay in place until the channel is stopped.
    fn configure(
        &mut self,
        channel: DmaChannel,
        request: DmaRequest,
        head: *const DmaDescriptor,
    ) -> DmaResult<()>;

    /// Start walking the configured chain
    fn start(&mut self, channel: DmaChannel) -> DmaResult<()>;

    /// Stop the channel and wait for it to go idle
    fn stop(&mut self, channel: DmaChannel) -> DmaResult<()>;

    /// Read the channel status (clears its pending interrupt flags)
    fn status(&mut self, channel: DmaChannel) -> DmaStatus;

    /// Check if the channel is running, without side effects
    fn is_running(&self, channel: DmaChannel) -> bool;

    /// Claim `channel` for `request`
    fn register(&mut self, channel: DmaChannel, request: DmaRequest) -> DmaResult<()>;

    /// Release `channel`
    fn unregister(&mut self, channel: DmaChannel);

    /// Drop a latched request from `request`
    fn clear_request(&mut self, request: DmaRequest);
}

impl<T: DmaService + ?Sized> DmaService for &mut T {
    fn configure(
        &mut self,
        channel: DmaChannel,
        request: DmaRequest,
        head: *const DmaDescriptor,
    ) -> DmaResult<()> {
        (**self).configure(channel, request, head)
    }

    fn start(&mut self, channel: DmaChannel) -> DmaResult<()> {
        (**self).start(channel)
    }

    fn stop(&mut self, channel: DmaChannel) -> DmaResult<()> {
        (**self).stop(channel)
    }

    fn status(&mut self, channel: DmaChannel) -> DmaStatus {
        (**self).status(channel)
    }

    fn is_running(&self, channel: DmaChannel) -> bool {
        (**self).is_running(channel)
    }

    fn register(&mut self, channel: DmaChannel, request: DmaRequest) -> DmaResult<()> {
        (**self).register(channel, request)
    }

    fn unregister(&mut self, channel: DmaChannel) {
        (**self).unregister(channel);
    }

    fn clear_request(&mut self, request: DmaRequest) {
        (**self).clear_request(request);
    }
}

// =============================================================================
// Channel Table
// =============================================================================

/// Per-channel owner map of a DMA controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelTable {
    owners: [Option<DmaRequest>; DMA_CHANNEL_COUNT as usize],
}

impl ChannelTable {
    /// Create an empty table
    pub const fn new() -> Self {
        Self {
            owners: [None; DMA_CHANNEL_COUNT as usize],
        }
    }

    /// Claim `channel` for `request`.
    ///
    /// Re-registering the same owner succeeds. A channel held by a
    /// different owner is [`DmaError::ChannelBusy`].
    pub fn register(&mut self, channel: DmaChannel, request: DmaRequest) -> DmaResult<()> {
        match self.owners[channel.index()] {
            Some(owner) if owner != request => Err(DmaError::ChannelBusy),
            _ => {
                self.owners[channel.index()] = Some(request);
                Ok(())
            }
        }
    }

    /// Release `channel`
    pub fn unregister(&mut self, channel: DmaChannel) {
        self.owners[channel.index()] = None;
    }

    /// Current owner of `channel`
    pub fn owner(&self, channel: DmaChannel) -> Option<DmaRequest> {
        self.owners[channel.index()]
    }

    /// Channel currently owned by `request`
    pub fn channel_of(&self, request: DmaRequest) -> Option<DmaChannel> {
        self.owners
            .iter()
            .position(|owner| *owner == Some(request))
            .map(|i| DmaChannel(i as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(n: u8) -> DmaChannel {
        DmaChannel::new(n).unwrap()
    }

    #[test]
    fn channel_range_checked() {
        assert!(DmaChannel::new(7).is_ok());
        assert_eq!(DmaChannel::new(8), Err(DmaError::InvalidChannel));
        assert_eq!(ch(3).number(), 3);
    }

    #[test]
    fn request_select_values() {
        assert_eq!(DmaRequest::I2sRx.req_sel(), 10);
        assert_eq!(DmaRequest::I2sTx.req_sel(), 11);
    }

    #[test]
    fn register_and_release() {
        let mut table = ChannelTable::new();
        assert!(table.register(ch(2), DmaRequest::I2sTx).is_ok());
        assert_eq!(table.owner(ch(2)), Some(DmaRequest::I2sTx));
        assert_eq!(table.channel_of(DmaRequest::I2sTx), Some(ch(2)));

        table.unregister(ch(2));
        assert_eq!(table.owner(ch(2)), None);
        assert_eq!(table.channel_of(DmaRequest::I2sTx), None);
    }

    #[test]
    fn second_owner_rejected() {
        let mut table = ChannelTable::new();
        table.register(ch(0), DmaRequest::I2sTx).unwrap();
        assert_eq!(table.register(ch(0), DmaRequest::I2sRx), Err(DmaError::ChannelBusy));
        // Same owner again is fine
        assert!(table.register(ch(0), DmaRequest::I2sTx).is_ok());
        assert_eq!(table.owner(ch(0)), Some(DmaRequest::I2sTx));
    }
}
