//! Centralized Constants
//!
//! Single source of truth for the sizing, FIFO and timing numbers used
//! throughout the I2S driver.
//!
//! # Note
//!
//! Hardware register bit definitions remain in their respective modules
//! (`register/i2s.rs`, `register/dma.rs`) as they are specific to those
//! hardware blocks.

// =============================================================================
// Descriptor Rings
// =============================================================================

/// Largest ring depth (descriptors of backing storage per direction)
pub const MAX_RING_DEPTH: usize = 16;

/// Smallest usable ring depth
pub const MIN_RING_DEPTH: usize = 2;

/// Default ring depth per direction
pub const DEFAULT_RING_DEPTH: usize = 4;

/// Default per-packet buffer size in bytes
pub const DEFAULT_PACKET_SIZE: usize = 1024;

/// Largest buffer a single descriptor can move
pub const MAX_PACKET_SIZE: usize = 0xFFFF;

// =============================================================================
// FIFO
// =============================================================================

/// FIFO word size in bytes
pub const FIFO_WORD_SIZE: usize = 4;

/// Depth of each hardware FIFO in words
pub const FIFO_DEPTH_WORDS: u32 = 8;

/// TX FIFO threshold (words) at which a DMA request is raised
pub const TX_FIFO_THRESHOLD: u32 = 4;

/// RX FIFO threshold (words) at which a DMA request is raised
pub const RX_FIFO_THRESHOLD: u32 = 0;

/// Buffer lengths and addresses must be a multiple of this
pub const BUFFER_ALIGN: usize = 4;

// =============================================================================
// DMA Engine
// =============================================================================

/// Number of DMA channels on the W80x
pub const DMA_CHANNEL_COUNT: u8 = 8;

/// Default DMA channel for transmit
pub const DEFAULT_TX_DMA_CHANNEL: u8 = 0;

/// Default DMA channel for receive
pub const DEFAULT_RX_DMA_CHANNEL: u8 = 1;

/// Request select value for I2S receive
pub const DMA_REQ_I2S_RX: u32 = 10;

/// Request select value for I2S transmit
pub const DMA_REQ_I2S_TX: u32 = 11;

// =============================================================================
// Timing
// =============================================================================

/// Upper bound on waiting for a DMA channel to stop, in microseconds
pub const DMA_STOP_TIMEOUT_US: u32 = 1_000;

/// Poll interval while waiting for a DMA channel to stop, in microseconds
pub const DMA_STOP_POLL_US: u32 = 1;
