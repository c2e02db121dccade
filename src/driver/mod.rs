//! Core driver components for the W80x I2S peripheral.
//!
//! This module contains the essential building blocks for configuring and
//! operating the I2S controller:
//!
//! - [`config`] - Configuration types and builder patterns
//! - [`error`] - Error types and result aliases
//! - [`event`] - Completion events delivered to callbacks
//! - [`i2s`] - The main I2S controller implementation
//! - [`interrupt`] - Decoded interrupt flags
//!
//! # Example
//!
//! ```ignore
//! use w80x_i2s::driver::{Direction, I2sConfig, I2sEvent, TransferMode};
//!
//! fn on_rx(event: &I2sEvent) { /* hand event.buffer back to the app */ }
//!
//! let config = I2sConfig::new()
//!     .with_mode(TransferMode::In)
//!     .with_rx_depth(8)
//!     .with_rx_callback(on_rx);
//! ```

// Submodules
pub mod config;
pub mod error;
pub mod event;
pub mod i2s;
pub mod interrupt;

// Re-exports for convenience
pub use config::{
    BitWidth, ChannelType, Direction, DirectionConfig, DirectionState, I2sConfig, Role, Standard,
    TransferMode,
};
pub use error::{ConfigError, ConfigResult, DmaError, DmaResult, Error, IoError, IoResult, Result};
pub use event::{EventCallback, EventKind, I2sEvent};
pub use i2s::{DirectionInfo, FlushStats, I2s, I2sInfo, TransferStats};
pub use interrupt::InterruptStatus;
