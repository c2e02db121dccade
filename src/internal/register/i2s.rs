//! I2S Controller Register Definitions
//!
//! The W80x I2S block has a single control register carrying the mode,
//! format, FIFO and DMA request settings, plus interrupt mask/flag, status
//! and the TX/RX FIFO data ports.

use super::{RegisterBlock, reg_bit_check, reg_bit_ops, reg_ro, reg_rw};

// =============================================================================
// Register Offsets
// =============================================================================

/// Control Register offset
pub const CONTROL_OFFSET: usize = 0x00;
/// Interrupt Mask Register offset
pub const IMASK_OFFSET: usize = 0x04;
/// Interrupt Flag Register offset
pub const INT_FLAG_OFFSET: usize = 0x08;
/// Status Register offset
pub const STATUS_OFFSET: usize = 0x0C;
/// TX FIFO data port offset
pub const TX_OFFSET: usize = 0x10;
/// RX FIFO data port offset
pub const RX_OFFSET: usize = 0x14;

// =============================================================================
// Control Register (CONTROL) Bits
// =============================================================================

/// I2S controller enable
pub const CTRL_I2SEN: u32 = 1 << 0;
/// Transmitter enable
pub const CTRL_TXEN: u32 = 1 << 1;
/// Receiver enable
pub const CTRL_RXEN: u32 = 1 << 2;
/// Transmit mute
pub const CTRL_MUTE: u32 = 1 << 3;
/// Word width field shift (0 = 8 bit ... 3 = 32 bit)
pub const CTRL_WDWIDTH_SHIFT: u32 = 4;
/// Word width field mask
pub const CTRL_WDWIDTH_MASK: u32 = 0x3 << 4;
/// TX clock phase: 1 = data changes on the rising edge
pub const CTRL_TX_CLK_PHASE: u32 = 1 << 8;
/// TX FIFO threshold shift
pub const CTRL_TXTH_SHIFT: u32 = 9;
/// TX FIFO threshold mask
pub const CTRL_TXTH_MASK: u32 = 0x7 << 9;
/// RX FIFO threshold shift
pub const CTRL_RXTH_SHIFT: u32 = 12;
/// RX FIFO threshold mask
pub const CTRL_RXTH_MASK: u32 = 0x7 << 12;
/// RX clock phase: 1 = data sampled on the falling edge
pub const CTRL_RX_CLK_PHASE: u32 = 1 << 15;
/// Right channel zero-cross enable
pub const CTRL_RZCEN: u32 = 1 << 16;
/// Left channel zero-cross enable
pub const CTRL_LZCEN: u32 = 1 << 17;
/// Clear TX FIFO (self-clearing)
pub const CTRL_TXCLR: u32 = 1 << 18;
/// Clear RX FIFO (self-clearing)
pub const CTRL_RXCLR: u32 = 1 << 19;
/// TX DMA request enable
pub const CTRL_TXDMAEN: u32 = 1 << 20;
/// RX DMA request enable
pub const CTRL_RXDMAEN: u32 = 1 << 21;
/// Mono mode (0 = stereo)
pub const CTRL_MONO: u32 = 1 << 22;
/// Mono channel select: 1 = right channel, 0 = left channel
pub const CTRL_RXLCH: u32 = 1 << 23;
/// Data standard field shift (I2S, MSB, PCM-A, PCM-B)
pub const CTRL_FORMAT_SHIFT: u32 = 24;
/// Data standard field mask
pub const CTRL_FORMAT_MASK: u32 = 0x3 << 24;
/// RX timeout enable
pub const CTRL_TIMEOUT_EN: u32 = 1 << 26;
/// Full duplex enable
pub const CTRL_DUPLEX_EN: u32 = 1 << 27;
/// Role: 0 = master, 1 = slave
pub const CTRL_SLAVE: u32 = 1 << 28;

/// Control register value after reset
pub const CTRL_RESET_VALUE: u32 = 0;

// =============================================================================
// Interrupt Mask / Flag Bits
// =============================================================================

/// RX FIFO underflow
pub const INT_RXUD: u32 = 1 << 0;
/// RX FIFO overflow
pub const INT_RXOV: u32 = 1 << 1;
/// RX FIFO threshold
pub const INT_RXTH: u32 = 1 << 2;
/// RX done (no new data for the quiet period)
pub const INT_RXDONE: u32 = 1 << 3;
/// TX FIFO underflow
pub const INT_TXUD: u32 = 1 << 4;
/// TX FIFO overflow
pub const INT_TXOV: u32 = 1 << 5;
/// TX FIFO threshold
pub const INT_TXTH: u32 = 1 << 6;
/// TX done
pub const INT_TXDONE: u32 = 1 << 7;
/// Right channel zero-crossing
pub const INT_RZC: u32 = 1 << 8;
/// Left channel zero-crossing
pub const INT_LZC: u32 = 1 << 9;
/// Summary flag: any I2S event (flag register only)
pub const INT_I2S: u32 = 1 << 10;
/// Summary flag: any receive event (flag register only)
pub const INT_RX: u32 = 1 << 11;
/// Summary flag: any transmit event (flag register only)
pub const INT_TX: u32 = 1 << 12;

/// All maskable interrupt sources
pub const INT_MASK_ALL: u32 = 0x3FF;
/// All readable interrupt flags
pub const INT_FLAG_GET_ALL: u32 = 0x1FFF;
/// Write-1-to-clear value for all clearable flags
pub const INT_FLAG_CLEAR_ALL: u32 = 0x3FF;

// =============================================================================
// Status Register Bits
// =============================================================================

/// Words currently in the RX FIFO, shift
pub const STATUS_RXCNT_SHIFT: u32 = 0;
/// Words currently in the RX FIFO, mask
pub const STATUS_RXCNT_MASK: u32 = 0xF;
/// Words currently in the TX FIFO, shift
pub const STATUS_TXCNT_SHIFT: u32 = 4;
/// Words currently in the TX FIFO, mask
pub const STATUS_TXCNT_MASK: u32 = 0xF << 4;
/// Valid bytes in the last RX word (0 means all 4), shift
pub const STATUS_VALIDBYTE_SHIFT: u32 = 8;
/// Valid bytes in the last RX word, mask
pub const STATUS_VALIDBYTE_MASK: u32 = 0x3 << 8;

// =============================================================================
// Register Block
// =============================================================================

/// I2S controller registers over a [`RegisterBlock`] bus.
#[derive(Debug)]
pub struct I2sRegs<R> {
    bus: R,
}

impl<R: RegisterBlock> I2sRegs<R> {
    /// Wrap a register bus.
    pub const fn new(bus: R) -> Self {
        Self { bus }
    }

    /// Access the underlying bus.
    pub fn bus(&self) -> &R {
        &self.bus
    }

    /// Mutable access to the underlying bus.
    pub fn bus_mut(&mut self) -> &mut R {
        &mut self.bus
    }

    /// Release the underlying bus.
    pub fn into_inner(self) -> R {
        self.bus
    }

    reg_rw!(control, set_control, CONTROL_OFFSET, "Control register");
    reg_rw!(interrupt_mask, set_interrupt_mask, IMASK_OFFSET, "Interrupt Mask register");
    reg_ro!(status, STATUS_OFFSET, "Status register");
    reg_ro!(rx_data, RX_OFFSET, "one word from the RX FIFO");

    reg_bit_ops!(enable, disable, CONTROL_OFFSET, CTRL_I2SEN, "I2S controller", "Enable", "Disable");
    reg_bit_ops!(enable_tx, disable_tx, CONTROL_OFFSET, CTRL_TXEN, "transmitter", "Enable", "Disable");
    reg_bit_ops!(enable_rx, disable_rx, CONTROL_OFFSET, CTRL_RXEN, "receiver", "Enable", "Disable");
    reg_bit_ops!(enable_tx_dma, disable_tx_dma, CONTROL_OFFSET, CTRL_TXDMAEN, "TX DMA request", "Enable", "Disable");
    reg_bit_ops!(enable_rx_dma, disable_rx_dma, CONTROL_OFFSET, CTRL_RXDMAEN, "RX DMA request", "Enable", "Disable");
    reg_bit_ops!(enable_duplex, disable_duplex, CONTROL_OFFSET, CTRL_DUPLEX_EN, "full duplex", "Enable", "Disable");
    reg_bit_check!(is_enabled, CONTROL_OFFSET, CTRL_I2SEN, "Check if the I2S controller is enabled");
    reg_bit_check!(is_tx_enabled, CONTROL_OFFSET, CTRL_TXEN, "Check if the transmitter is enabled");
    reg_bit_check!(is_rx_enabled, CONTROL_OFFSET, CTRL_RXEN, "Check if the receiver is enabled");

    /// Write the control register back to its reset value
    pub fn reset_control(&mut self) {
        self.bus.write(CONTROL_OFFSET, CTRL_RESET_VALUE);
    }

    /// Flush the TX FIFO (the clear bit self-resets in hardware)
    pub fn clear_tx_fifo(&mut self) {
        self.bus.set_bits(CONTROL_OFFSET, CTRL_TXCLR);
    }

    /// Flush the RX FIFO (the clear bit self-resets in hardware)
    pub fn clear_rx_fifo(&mut self) {
        self.bus.set_bits(CONTROL_OFFSET, CTRL_RXCLR);
    }

    /// Set or clear `bit` in the control register
    #[inline(always)]
    pub fn set_control_bit(&mut self, bit: u32, on: bool) {
        if on {
            self.bus.set_bits(CONTROL_OFFSET, bit);
        } else {
            self.bus.clear_bits(CONTROL_OFFSET, bit);
        }
    }

    /// Select slave (`true`) or master role
    pub fn set_slave(&mut self, slave: bool) {
        self.set_control_bit(CTRL_SLAVE, slave);
    }

    /// Program the data standard field (raw 2-bit value)
    pub fn set_format_field(&mut self, format: u32) {
        self.bus
            .write_field(CONTROL_OFFSET, CTRL_FORMAT_MASK, CTRL_FORMAT_SHIFT, format);
    }

    /// Program the word width field (raw 2-bit value)
    pub fn set_word_width_field(&mut self, width: u32) {
        self.bus
            .write_field(CONTROL_OFFSET, CTRL_WDWIDTH_MASK, CTRL_WDWIDTH_SHIFT, width);
    }

    /// Program the TX FIFO threshold in words
    pub fn set_tx_threshold(&mut self, words: u32) {
        self.bus
            .write_field(CONTROL_OFFSET, CTRL_TXTH_MASK, CTRL_TXTH_SHIFT, words);
    }

    /// Program the RX FIFO threshold in words
    pub fn set_rx_threshold(&mut self, words: u32) {
        self.bus
            .write_field(CONTROL_OFFSET, CTRL_RXTH_MASK, CTRL_RXTH_SHIFT, words);
    }

    // -------------------------------------------------------------------------
    // Interrupts
    // -------------------------------------------------------------------------

    /// Mask every interrupt source
    pub fn mask_all_interrupts(&mut self) {
        self.bus.set_bits(IMASK_OFFSET, INT_MASK_ALL);
    }

    /// Unmask the given sources (a set mask bit disables the source)
    pub fn unmask_interrupts(&mut self, sources: u32) {
        self.bus.clear_bits(IMASK_OFFSET, sources);
    }

    /// Read pending interrupt flags
    pub fn interrupt_flags(&self) -> u32 {
        self.bus.read(INT_FLAG_OFFSET) & INT_FLAG_GET_ALL
    }

    /// Clear every pending interrupt flag (write-1-to-clear)
    pub fn clear_all_interrupts(&mut self) {
        self.bus.write(INT_FLAG_OFFSET, INT_FLAG_CLEAR_ALL);
    }

    /// Clear the given interrupt flags (write-1-to-clear)
    pub fn clear_interrupts(&mut self, flags: u32) {
        self.bus.write(INT_FLAG_OFFSET, flags & INT_FLAG_CLEAR_ALL);
    }

    // -------------------------------------------------------------------------
    // FIFO status
    // -------------------------------------------------------------------------

    /// Words currently held in the RX FIFO
    pub fn rx_fifo_count(&self) -> u32 {
        (self.status() & STATUS_RXCNT_MASK) >> STATUS_RXCNT_SHIFT
    }

    /// Words currently held in the TX FIFO
    pub fn tx_fifo_count(&self) -> u32 {
        (self.status() & STATUS_TXCNT_MASK) >> STATUS_TXCNT_SHIFT
    }

    /// Valid bytes in the last received word (0 means all four)
    pub fn rx_last_word_valid_bytes(&self) -> u32 {
        (self.status() & STATUS_VALIDBYTE_MASK) >> STATUS_VALIDBYTE_SHIFT
    }

    /// Bus address of the TX FIFO data port
    pub fn tx_fifo_addr(&self) -> usize {
        self.bus.base_addr() + TX_OFFSET
    }

    /// Bus address of the RX FIFO data port
    pub fn rx_fifo_addr(&self) -> usize {
        self.bus.base_addr() + RX_OFFSET
    }
}
