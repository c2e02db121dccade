//! Hardware Abstraction Layer
//!
//! Collaborators of the I2S driver that live outside the I2S block itself.
//!
//! # Modules
//!
//! - [`dma`]: The DMA engine contract consumed by the driver
//! - [`w80x_dma`]: Register-backed W80x DMA controller
//!
//! # Delay Integration
//!
//! Bounded waits use `embedded_hal::delay::DelayNs` directly.
//! Pass any delay implementation from your HAL.

pub mod dma;
pub mod w80x_dma;

// Re-export commonly used types
pub use dma::{ChannelTable, DmaChannel, DmaRequest, DmaService, DmaStatus};
pub use w80x_dma::W80xDma;
