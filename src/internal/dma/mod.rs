//! DMA descriptors and descriptor rings
//!
//! - [`DmaDescriptor`]: the seven-word chained descriptor the engine walks
//! - [`DescriptorRing`]: fixed-capacity ring with index-based bookkeeping
//!
//! All storage is static; a ring is built in place and must not move while
//! the DMA engine may follow its links.

pub mod descriptor;
pub mod ring;

pub use descriptor::DmaDescriptor;
pub use ring::{ConsumeResult, ConsumedSlot, DescriptorRing};
