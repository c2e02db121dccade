//! DMA Controller Register Definitions
//!
//! The W80x DMA controller has eight channels. A small common block holds
//! the interrupt mask/status and the request-clear register; each channel
//! then has its own block of twelve words starting at [`CHANNEL_BLOCK_OFFSET`].

use super::{RegisterBlock, reg_rw};

// =============================================================================
// Common Register Offsets
// =============================================================================

/// Interrupt Mask Register offset (1 = masked)
pub const INT_MASK_OFFSET: usize = 0x00;
/// Interrupt Status Register offset (write-1-to-clear)
pub const INT_STATUS_OFFSET: usize = 0x04;
/// UART channel select / request clear register offset
pub const REQ_CTRL_OFFSET: usize = 0x08;

/// Offset of channel 0's register block
pub const CHANNEL_BLOCK_OFFSET: usize = 0x10;
/// Size of one channel register block in bytes
pub const CHANNEL_BLOCK_SIZE: usize = 0x30;

// =============================================================================
// Per-Channel Register Offsets (relative to the channel block)
// =============================================================================

/// Source address
pub const CH_SRC_ADDR: usize = 0x00;
/// Destination address
pub const CH_DEST_ADDR: usize = 0x04;
/// Source wrap address
pub const CH_SRC_WRAP_ADDR: usize = 0x08;
/// Destination wrap address
pub const CH_DEST_WRAP_ADDR: usize = 0x0C;
/// Wrap lengths
pub const CH_WRAP_SIZE: usize = 0x10;
/// Start/stop control
pub const CH_CTRL: usize = 0x14;
/// Mode (software/hardware request, chain mode, request select)
pub const CH_MODE: usize = 0x18;
/// Transfer control for non-chained transfers
pub const CH_XFER_CTRL: usize = 0x1C;
/// Transfer status (bytes moved for the current descriptor)
pub const CH_STATUS: usize = 0x20;
/// Descriptor list head address
pub const CH_DESC_ADDR: usize = 0x24;
/// Current destination address
pub const CH_CUR_DEST_ADDR: usize = 0x28;

/// Number of 32-bit words in a channel block
pub const CHANNEL_BLOCK_WORDS: usize = 12;

// =============================================================================
// Bit Definitions
// =============================================================================

/// CH_CTRL: start the channel (reads back 1 while running)
pub const CH_CTRL_START: u32 = 1 << 0;
/// CH_CTRL: stop after the current burst
pub const CH_CTRL_STOP: u32 = 1 << 1;

/// CH_MODE: hardware request mode (0 = software)
pub const CH_MODE_HW: u32 = 1 << 0;
/// CH_MODE: chain (descriptor list) mode
pub const CH_MODE_CHAIN: u32 = 1 << 1;
/// CH_MODE: request select shift
pub const CH_MODE_REQ_SEL_SHIFT: u32 = 2;
/// CH_MODE: request select mask
pub const CH_MODE_REQ_SEL_MASK: u32 = 0xF << 2;
/// CH_MODE: follow the descriptor `next` link
pub const CH_MODE_CHAIN_LINK_EN: u32 = 1 << 6;

/// CH_STATUS: transferred byte count mask
pub const CH_STATUS_XFER_CNT_MASK: u32 = 0xFFFF;

/// REQ_CTRL: UART DMA channel select mask
pub const REQ_CTRL_UART_CH_MASK: u32 = 0x7;
/// REQ_CTRL: request clear field shift (one bit per request source)
pub const REQ_CTRL_CLEAR_SHIFT: u32 = 8;

/// Interrupt bits per channel (burst done, transfer done)
pub const INT_BITS_PER_CHANNEL: u32 = 2;
/// Burst done interrupt index within a channel's pair
pub const INT_BURST_DONE: u32 = 0;
/// Transfer done interrupt index within a channel's pair
pub const INT_XFER_DONE: u32 = 1;
/// All channel interrupts
pub const INT_ALL_CHANNELS: u32 = 0xFFFF;

/// Interrupt bit for `kind` on channel `ch`
#[inline(always)]
pub const fn channel_int_bit(ch: u8, kind: u32) -> u32 {
    1 << (ch as u32 * INT_BITS_PER_CHANNEL + kind)
}

/// Both interrupt bits of channel `ch`
#[inline(always)]
pub const fn channel_int_bits(ch: u8) -> u32 {
    channel_int_bit(ch, INT_BURST_DONE) | channel_int_bit(ch, INT_XFER_DONE)
}

/// Absolute offset of a per-channel register
#[inline(always)]
pub const fn channel_reg(ch: u8, reg: usize) -> usize {
    CHANNEL_BLOCK_OFFSET + ch as usize * CHANNEL_BLOCK_SIZE + reg
}

// =============================================================================
// Register Block
// =============================================================================

/// DMA controller registers over a [`RegisterBlock`] bus.
#[derive(Debug)]
pub struct DmaRegs<R> {
    bus: R,
}

impl<R: RegisterBlock> DmaRegs<R> {
    /// Wrap a register bus.
    pub const fn new(bus: R) -> Self {
        Self { bus }
    }

    /// Access the underlying bus.
    pub fn bus(&self) -> &R {
        &self.bus
    }

    reg_rw!(int_mask, set_int_mask, INT_MASK_OFFSET, "Interrupt Mask register");
    reg_rw!(int_status, set_int_status, INT_STATUS_OFFSET, "Interrupt Status register");
    reg_rw!(req_ctrl, set_req_ctrl, REQ_CTRL_OFFSET, "Request Control register");

    /// Zero every register of a channel block
    pub fn reset_channel(&mut self, ch: u8) {
        for word in 0..CHANNEL_BLOCK_WORDS {
            self.bus.write(channel_reg(ch, word * 4), 0);
        }
    }

    /// Program the descriptor list head of a chained transfer
    pub fn set_desc_addr(&mut self, ch: u8, addr: u32) {
        self.bus.write(channel_reg(ch, CH_DESC_ADDR), addr);
    }

    /// Read the descriptor list head
    pub fn desc_addr(&self, ch: u8) -> u32 {
        self.bus.read(channel_reg(ch, CH_DESC_ADDR))
    }

    /// Program the channel mode register
    pub fn set_mode(&mut self, ch: u8, hw_request: bool, chain: bool, req_sel: u32, chain_link: bool) {
        let mut mode = (req_sel << CH_MODE_REQ_SEL_SHIFT) & CH_MODE_REQ_SEL_MASK;
        if hw_request {
            mode |= CH_MODE_HW;
        }
        if chain {
            mode |= CH_MODE_CHAIN;
        }
        if chain_link {
            mode |= CH_MODE_CHAIN_LINK_EN;
        }
        self.bus.write(channel_reg(ch, CH_MODE), mode);
    }

    /// Read the channel mode register
    pub fn mode(&self, ch: u8) -> u32 {
        self.bus.read(channel_reg(ch, CH_MODE))
    }

    /// Set the start bit of a channel
    pub fn start(&mut self, ch: u8) {
        self.bus.set_bits(channel_reg(ch, CH_CTRL), CH_CTRL_START);
    }

    /// Request a channel stop after the current burst
    pub fn request_stop(&mut self, ch: u8) {
        self.bus.set_bits(channel_reg(ch, CH_CTRL), CH_CTRL_STOP);
    }

    /// Check if the channel start bit still reads back set
    pub fn is_started(&self, ch: u8) -> bool {
        (self.bus.read(channel_reg(ch, CH_CTRL)) & CH_CTRL_START) != 0
    }

    /// Bytes moved for the descriptor currently in flight
    pub fn xfer_count(&self, ch: u8) -> u16 {
        (self.bus.read(channel_reg(ch, CH_STATUS)) & CH_STATUS_XFER_CNT_MASK) as u16
    }

    /// Unmask one interrupt of a channel
    pub fn unmask_channel_interrupt(&mut self, ch: u8, kind: u32) {
        self.bus.clear_bits(INT_MASK_OFFSET, channel_int_bit(ch, kind));
    }

    /// Mask one interrupt of a channel
    pub fn mask_channel_interrupt(&mut self, ch: u8, kind: u32) {
        self.bus.set_bits(INT_MASK_OFFSET, channel_int_bit(ch, kind));
    }

    /// Clear both pending interrupts of a channel
    pub fn clear_channel_interrupts(&mut self, ch: u8) {
        self.bus.write(INT_STATUS_OFFSET, channel_int_bits(ch));
    }

    /// Mask and clear every channel interrupt
    pub fn reset_interrupts(&mut self) {
        self.bus.set_bits(INT_MASK_OFFSET, INT_ALL_CHANNELS);
        self.bus.write(INT_STATUS_OFFSET, INT_ALL_CHANNELS);
    }

    /// Clear a latched peripheral request line
    pub fn clear_request(&mut self, req_sel: u32) {
        self.bus
            .set_bits(REQ_CTRL_OFFSET, 1 << (req_sel + REQ_CTRL_CLEAR_SHIFT));
    }
}
