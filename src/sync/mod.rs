//! Synchronization Support
//!
//! Critical-section protected access to the I2S driver from task code and
//! interrupt handlers:
//!
//! - [`CriticalSectionCell`] - ISR-safe interior mutability
//! - [`SharedI2s`] - ISR-safe I2S driver wrapper
//!
//! # Feature Flags
//!
//! - `critical-section`: Enables this module

mod primitives;
mod shared;

pub use primitives::CriticalSectionCell;
pub use shared::SharedI2s;
