//! Circular DMA descriptor ring with index-based bookkeeping.
//!
//! The descriptors are linked into a closed chain for the DMA engine to
//! walk, but the driver never follows those links itself: it tracks the
//! ring with a consume cursor and an occupancy count. The append cursor is
//! always `(consume + occupancy) % depth`.

#[cfg(feature = "log")]
use log::trace;

use super::descriptor::DmaDescriptor;
use crate::driver::config::Direction;
use crate::driver::error::{ConfigError, ConfigResult, DmaError, DmaResult};
use crate::internal::constants::{MAX_RING_DEPTH, MIN_RING_DEPTH};

/// Outcome of one [`DescriptorRing::advance_on_consume`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsumeResult {
    /// Buffer address of the first descriptor consumed by this call
    pub first_buffer: Option<usize>,
    /// Descriptors consumed by this call
    pub nodes: usize,
    /// Free slots left after this call
    pub free_slots: usize,
}

/// A buffer taken off the ring outside the normal completion path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsumedSlot {
    /// Buffer address the slot carried
    pub buffer: usize,
    /// Configured transfer length of the slot
    pub len: usize,
}

/// Fixed-capacity descriptor ring for one transfer direction.
///
/// Backing storage is always [`MAX_RING_DEPTH`] descriptors; `build`
/// links the first `depth` of them into the cycle.
pub struct DescriptorRing {
    descriptors: [DmaDescriptor; MAX_RING_DEPTH],
    direction: Direction,
    depth: usize,
    consume: usize,
    occupancy: usize,
    pushed: u32,
    consumed_total: u32,
    zombie: bool,
}

impl DescriptorRing {
    /// Create an unbuilt ring (depth 0).
    #[must_use]
    pub const fn new(direction: Direction) -> Self {
        Self {
            descriptors: [const { DmaDescriptor::new() }; MAX_RING_DEPTH],
            direction,
            depth: 0,
            consume: 0,
            occupancy: 0,
            pushed: 0,
            consumed_total: 0,
            zombie: true,
        }
    }

    /// Build the ring: configure `depth` descriptors for this direction and
    /// link them into a cycle.
    ///
    /// The ring must not move afterwards, the DMA engine follows the links.
    pub fn build(&mut self, depth: usize, channel: u8, req_sel: u32, fifo_addr: usize) -> ConfigResult<()> {
        if !(MIN_RING_DEPTH..=MAX_RING_DEPTH).contains(&depth) {
            return Err(ConfigError::InvalidRingDepth);
        }

        for i in 0..depth {
            let next: *const DmaDescriptor = &self.descriptors[(i + 1) % depth];
            let desc = &self.descriptors[i];
            desc.configure(self.direction, channel, req_sel, fifo_addr);
            desc.link(next);
        }
        for desc in &self.descriptors[depth..] {
            desc.configure(self.direction, channel, req_sel, fifo_addr);
            desc.link(core::ptr::null());
        }

        self.depth = depth;
        self.consume = 0;
        self.occupancy = 0;
        self.pushed = 0;
        self.consumed_total = 0;
        self.zombie = true;
        Ok(())
    }

    /// Return the ring to its unbuilt state.
    pub fn teardown(&mut self) {
        for desc in &self.descriptors {
            desc.clear_valid();
            desc.set_buffer_addr(self.direction, 0);
            desc.link(core::ptr::null());
        }
        self.depth = 0;
        self.consume = 0;
        self.occupancy = 0;
        self.zombie = true;
    }

    /// Check if the ring has been built.
    #[inline(always)]
    pub fn is_built(&self) -> bool {
        self.depth != 0
    }

    /// Queue a buffer at the append cursor.
    ///
    /// Returns the slot index used. A full ring is reported as
    /// [`DmaError::RingFull`] and leaves the ring untouched.
    pub fn append(&mut self, buffer: usize, len: usize) -> DmaResult<usize> {
        if self.occupancy >= self.depth {
            return Err(DmaError::RingFull);
        }

        let slot = self.append_index();
        let desc = &self.descriptors[slot];
        desc.set_buffer_addr(self.direction, buffer);
        desc.set_len(len);
        desc.set_valid();

        self.occupancy += 1;
        self.pushed = self.pushed.wrapping_add(1);

        #[cfg(feature = "log")]
        trace!(
            "{:?} ring append slot={} addr={:#x} len={} occupancy={}",
            self.direction, slot, buffer, len, self.occupancy
        );

        Ok(slot)
    }

    /// Retire every descriptor the engine has finished, in ring order.
    ///
    /// Stops at the first descriptor that is still valid. Sets the zombie
    /// flag once the ring runs empty.
    pub fn advance_on_consume(&mut self) -> ConsumeResult {
        let mut first_buffer = None;
        let mut nodes = 0;

        for _ in 0..self.depth {
            if self.occupancy == 0 {
                self.zombie = true;
                break;
            }

            let desc = &self.descriptors[self.consume];
            if desc.is_valid() {
                break;
            }

            if first_buffer.is_none() {
                first_buffer = Some(desc.buffer_addr(self.direction));
            }
            desc.set_buffer_addr(self.direction, 0);
            self.retire_head();
            nodes += 1;

            if self.occupancy == 0 {
                self.zombie = true;
                break;
            }
        }

        ConsumeResult {
            first_buffer,
            nodes,
            free_slots: self.free_slots(),
        }
    }

    /// Retire the head descriptor regardless of its valid flag.
    ///
    /// Used when the driver completes a transfer by hand. Returns `None` on
    /// an empty ring.
    pub fn consume_one(&mut self) -> Option<ConsumedSlot> {
        if self.occupancy == 0 {
            return None;
        }

        let desc = &self.descriptors[self.consume];
        let slot = ConsumedSlot {
            buffer: desc.buffer_addr(self.direction),
            len: desc.len(),
        };
        desc.set_buffer_addr(self.direction, 0);
        desc.clear_valid();
        self.retire_head();

        Some(slot)
    }

    /// Drop every queued buffer without reporting it and rewind the cursors.
    pub fn stop(&mut self) {
        for i in 0..self.occupancy {
            let desc = &self.descriptors[(self.consume + i) % self.depth];
            desc.set_buffer_addr(self.direction, 0);
            desc.clear_valid();
        }
        self.occupancy = 0;
        self.consume = 0;
    }

    #[inline(always)]
    fn retire_head(&mut self) {
        self.consume = (self.consume + 1) % self.depth;
        self.occupancy -= 1;
        self.consumed_total = self.consumed_total.wrapping_add(1);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Direction this ring serves
    #[inline(always)]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Configured depth (0 when unbuilt)
    #[inline(always)]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Slots holding not-yet-consumed buffers
    #[inline(always)]
    pub fn occupancy(&self) -> usize {
        self.occupancy
    }

    /// Slots available for appending
    #[inline(always)]
    pub fn free_slots(&self) -> usize {
        self.depth - self.occupancy
    }

    /// Index of the next slot expected to complete
    #[inline(always)]
    pub fn consume_index(&self) -> usize {
        self.consume
    }

    /// Index of the next slot to receive a buffer
    #[inline(always)]
    pub fn append_index(&self) -> usize {
        if self.depth == 0 {
            0
        } else {
            (self.consume + self.occupancy) % self.depth
        }
    }

    /// Buffers appended since the ring was built
    #[inline(always)]
    pub fn pushed(&self) -> u32 {
        self.pushed
    }

    /// Slots consumed since the ring was built
    #[inline(always)]
    pub fn consumed_total(&self) -> u32 {
        self.consumed_total
    }

    /// Check if the ring drained and the engine is idle
    #[inline(always)]
    pub fn is_zombie(&self) -> bool {
        self.zombie
    }

    /// Set or clear the zombie flag
    #[inline(always)]
    pub fn set_zombie(&mut self, zombie: bool) {
        self.zombie = zombie;
    }

    /// Descriptor at the consume cursor
    #[inline(always)]
    pub fn head(&self) -> &DmaDescriptor {
        &self.descriptors[self.consume]
    }

    /// Address of the descriptor at the consume cursor
    #[inline(always)]
    pub fn head_ptr(&self) -> *const DmaDescriptor {
        &self.descriptors[self.consume]
    }

    /// Descriptor at `index` (wraps at the configured depth)
    #[cfg(test)]
    pub fn descriptor(&self, index: usize) -> &DmaDescriptor {
        &self.descriptors[index % self.depth.max(1)]
    }
}

// =============================================================================
// Tests
// =============================================================================
