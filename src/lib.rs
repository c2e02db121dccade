//! W80x I2S Driver
//!
//! A `no_std`, `no_alloc` Rust implementation of the WinnerMicro W80x I2S
//! audio controller, streaming through chained DMA descriptor rings.
//!
//! # Architecture
//!
//! The driver is organized into three layers:
//!
//! 1. **Driver Layer** ([`driver::i2s`]): Ring management, start/stop state
//!    machine, completion events and the RX degraded drain
//! 2. **HAL Layer** ([`hal`]): The [`DmaService`] contract and the
//!    register-backed [`W80xDma`] controller
//! 3. **Internal Layer**: Register maps, descriptor layout and rings
//!
//! ## Data Flow
//!
//! The application lends buffers with [`I2s::append_buffer`]. Each buffer
//! fills one descriptor of a fixed ring (2 to 16 slots per direction). The
//! DMA engine walks the chain on its own; every transfer-done interrupt
//! retires the finished descriptors and reports them through the
//! direction's [`EventCallback`]. When a ring runs dry the direction goes
//! *zombie* and the next [`I2s::start`] re-arms the engine at the ring head.
//!
//! A receive stream that ends mid-buffer raises the I2S RX-done interrupt;
//! [`I2s::handle_interrupt`] then completes the buffer in flight straight
//! from the FIFO and reports its real length.
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting for public types
//! - `log`: Log state transitions and diagnostics through the `log` facade
//! - `critical-section`: Enable the ISR-safe [`SharedI2s`] wrapper
//!
//! # Example
//!
//! ```ignore
//! use w80x_i2s::{Direction, I2s, I2sConfig, I2sEvent, SharedI2s, TransferMode, W80xDma};
//! use w80x_i2s::unsafe_registers::Mmio;
//!
//! static mut BUFS: [[u8; 1024]; 4] = [[0; 1024]; 4];
//!
//! fn on_tx_done(event: &I2sEvent) {
//!     // refill event.buffer and append it again
//! }
//!
//! let dma = W80xDma::new(unsafe { Mmio::new(DMA_BASE) }, delay);
//! static I2S: SharedI2s<Mmio, W80xDma<Mmio, Delay>> = /* ... */;
//!
//! I2S.with(|i2s| {
//!     i2s.init(
//!         I2sConfig::new()
//!             .with_mode(TransferMode::Out)
//!             .with_tx_callback(on_tx_done),
//!     )?;
//!     for buf in unsafe { BUFS.iter_mut() } {
//!         unsafe { i2s.append_buffer(Direction::Tx, buf.as_mut_ptr(), buf.len())? };
//!     }
//!     i2s.start(Direction::Tx)
//! })?;
//! ```
//!
//! # Memory Requirements
//!
//! Each direction carries 16 descriptors of 28 bytes, about 900 bytes of
//! driver state in total. Audio buffers are owned by the application.

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod driver;
pub mod hal;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::config::{
    BitWidth, ChannelType, Direction, DirectionConfig, DirectionState, I2sConfig, Role, Standard,
    TransferMode,
};
pub use driver::error::{
    ConfigError, ConfigResult, DmaError, DmaResult, Error, IoError, IoResult, Result,
};
pub use driver::event::{EventCallback, EventKind, I2sEvent};
pub use driver::i2s::{DirectionInfo, FlushStats, I2s, I2sInfo, TransferStats};
pub use driver::interrupt::InterruptStatus;
pub use hal::dma::{ChannelTable, DmaChannel, DmaRequest, DmaService, DmaStatus};
pub use hal::w80x_dma::W80xDma;
pub use internal::dma::DmaDescriptor;

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::{CriticalSectionCell, SharedI2s};

/// Low-level register accessors for advanced use.
///
/// These are intentionally separated from the primary facade. Most users should
/// prefer the driver APIs instead of touching registers directly.
///
/// # Safety
///
/// Direct register access bypasses driver invariants. Use only if you fully
/// understand the W80x I2S and DMA hardware and accept responsibility for
/// correct sequencing and synchronization.
pub mod unsafe_registers {
    pub use crate::internal::register::dma::DmaRegs;
    pub use crate::internal::register::i2s::I2sRegs;
    pub use crate::internal::register::{Mmio, RegisterBlock};
}

/// Shared driver constants.
pub mod constants {
    pub use crate::internal::constants::{
        BUFFER_ALIGN, DEFAULT_PACKET_SIZE, DEFAULT_RING_DEPTH, DEFAULT_RX_DMA_CHANNEL,
        DEFAULT_TX_DMA_CHANNEL, DMA_CHANNEL_COUNT, DMA_STOP_TIMEOUT_US, FIFO_DEPTH_WORDS,
        FIFO_WORD_SIZE, MAX_PACKET_SIZE, MAX_RING_DEPTH, MIN_RING_DEPTH,
    };
}
