//! Interrupt status handling for the W80x I2S controller.
//!
//! This module provides the [`InterruptStatus`] structure for parsing
//! the I2S interrupt flag register.

use crate::internal::register::i2s::{
    INT_I2S, INT_LZC, INT_RX, INT_RXDONE, INT_RXOV, INT_RXTH, INT_RXUD, INT_RZC, INT_TX,
    INT_TXDONE, INT_TXOV, INT_TXTH, INT_TXUD,
};

// =============================================================================
// Interrupt Status
// =============================================================================

/// Interrupt flags parsed from the I2S flag register.
///
/// # Example
///
/// ```ignore
/// let status = InterruptStatus::from_raw(flags);
/// if status.rx_done {
///     // Receiver went quiet, drain the FIFO
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptStatus {
    /// RX FIFO underflow
    pub rx_underflow: bool,
    /// RX FIFO overflow
    pub rx_overflow: bool,
    /// RX FIFO reached its threshold
    pub rx_threshold: bool,
    /// No RX data for the quiet period
    pub rx_done: bool,
    /// TX FIFO underflow
    pub tx_underflow: bool,
    /// TX FIFO overflow
    pub tx_overflow: bool,
    /// TX FIFO reached its threshold
    pub tx_threshold: bool,
    /// TX FIFO drained
    pub tx_done: bool,
    /// Right channel zero cross
    pub right_zero_cross: bool,
    /// Left channel zero cross
    pub left_zero_cross: bool,
    /// Controller summary
    pub i2s_summary: bool,
    /// Receive summary
    pub rx_summary: bool,
    /// Transmit summary
    pub tx_summary: bool,
}

impl InterruptStatus {
    /// Create from raw flag register value
    #[inline]
    pub fn from_raw(flags: u32) -> Self {
        Self {
            rx_underflow: (flags & INT_RXUD) != 0,
            rx_overflow: (flags & INT_RXOV) != 0,
            rx_threshold: (flags & INT_RXTH) != 0,
            rx_done: (flags & INT_RXDONE) != 0,
            tx_underflow: (flags & INT_TXUD) != 0,
            tx_overflow: (flags & INT_TXOV) != 0,
            tx_threshold: (flags & INT_TXTH) != 0,
            tx_done: (flags & INT_TXDONE) != 0,
            right_zero_cross: (flags & INT_RZC) != 0,
            left_zero_cross: (flags & INT_LZC) != 0,
            i2s_summary: (flags & INT_I2S) != 0,
            rx_summary: (flags & INT_RX) != 0,
            tx_summary: (flags & INT_TX) != 0,
        }
    }

    /// Convert to raw value for clearing (write-1-to-clear, summaries excluded)
    #[inline]
    pub fn to_raw(&self) -> u32 {
        let pairs = [
            (self.rx_underflow, INT_RXUD),
            (self.rx_overflow, INT_RXOV),
            (self.rx_threshold, INT_RXTH),
            (self.rx_done, INT_RXDONE),
            (self.tx_underflow, INT_TXUD),
            (self.tx_overflow, INT_TXOV),
            (self.tx_threshold, INT_TXTH),
            (self.tx_done, INT_TXDONE),
            (self.right_zero_cross, INT_RZC),
            (self.left_zero_cross, INT_LZC),
        ];
        pairs
            .iter()
            .filter(|(set, _)| *set)
            .fold(0, |acc, (_, bit)| acc | bit)
    }

    /// Check if any source flag is set (excluding summary bits)
    #[inline]
    pub fn any(&self) -> bool {
        self.to_raw() != 0
    }

    /// Check if a FIFO overflow or underflow occurred
    #[inline]
    pub fn has_error(&self) -> bool {
        self.rx_underflow || self.rx_overflow || self.tx_underflow || self.tx_overflow
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
