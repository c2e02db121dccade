//! Chained DMA descriptor for the W80x DMA engine.
//!
//! In list mode the engine fetches the first five words of each descriptor,
//! moves `len` bytes between `src_addr` and `dest_addr`, clears the valid
//! word and follows `next`. The two trailing words are driver bookkeeping.

pub mod bits;

use bits::{ctrl, extend, vld};

use crate::driver::config::Direction;

/// Volatile cell wrapper for descriptor fields
///
/// Ensures all accesses are volatile to prevent compiler optimization
/// from reordering or caching descriptor field accesses.
#[repr(transparent)]
pub(crate) struct VolatileCell<T: Copy> {
    value: core::cell::UnsafeCell<T>,
}

// Safety: all access is volatile and word-sized, which is atomic on the
// W80x core.
unsafe impl<T: Copy> Sync for VolatileCell<T> {}

impl<T: Copy> VolatileCell<T> {
    /// Create a new volatile cell with the given initial value
    #[inline(always)]
    pub const fn new(value: T) -> Self {
        Self {
            value: core::cell::UnsafeCell::new(value),
        }
    }

    /// Read the value (volatile read)
    #[inline(always)]
    pub fn get(&self) -> T {
        unsafe { core::ptr::read_volatile(self.value.get()) }
    }

    /// Write a value (volatile write)
    #[inline(always)]
    pub fn set(&self, value: T) {
        unsafe { core::ptr::write_volatile(self.value.get(), value) }
    }

    /// Update the value using a function (read-modify-write)
    #[inline(always)]
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(T) -> T,
    {
        let old = self.get();
        self.set(f(old));
    }
}

/// Hardware DMA descriptor (seven words on the 32-bit target).
///
/// Address fields are `usize` so the layout matches the 32-bit bus on
/// the target while host builds keep full pointers.
#[repr(C, align(4))]
pub struct DmaDescriptor {
    /// Valid word (engine-owned while [`vld::VALID`] is set)
    vld: VolatileCell<u32>,
    /// Chain transfer control: increment modes, unit, burst, length
    ctrl: VolatileCell<u32>,
    /// Source address
    src_addr: VolatileCell<usize>,
    /// Destination address
    dest_addr: VolatileCell<usize>,
    /// Next descriptor in the chain
    next: VolatileCell<usize>,
    /// Channel, interrupt and request configuration
    extend_ctrl: VolatileCell<u32>,
    /// Wrap lengths (unused in I2S streaming)
    warp_info: VolatileCell<u32>,
}

impl DmaDescriptor {
    /// Create a new zeroed descriptor.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vld: VolatileCell::new(0),
            ctrl: VolatileCell::new(0),
            src_addr: VolatileCell::new(0),
            dest_addr: VolatileCell::new(0),
            next: VolatileCell::new(0),
            extend_ctrl: VolatileCell::new(0),
            warp_info: VolatileCell::new(0),
        }
    }

    /// Pre-fill the per-direction transfer parameters.
    ///
    /// The FIFO side is fixed to `fifo_addr`, the memory side increments
    /// and is filled in on append. Word units, single-unit bursts,
    /// transfer-done interrupt, hardware request, list mode with chaining.
    pub fn configure(&self, direction: Direction, channel: u8, req_sel: u32, fifo_addr: usize) {
        let (src_inc, dest_inc) = match direction {
            Direction::Tx => (ctrl::ADDR_INC, ctrl::ADDR_FIXED),
            Direction::Rx => (ctrl::ADDR_FIXED, ctrl::ADDR_INC),
        };

        self.vld.set(0);
        self.ctrl.set(
            (src_inc << ctrl::SRC_INC_SHIFT)
                | (dest_inc << ctrl::DEST_INC_SHIFT)
                | (ctrl::UNIT_WORD << ctrl::DATA_UNIT_SHIFT),
        );

        match direction {
            Direction::Tx => {
                self.src_addr.set(0);
                self.dest_addr.set(fifo_addr);
            }
            Direction::Rx => {
                self.src_addr.set(fifo_addr);
                self.dest_addr.set(0);
            }
        }

        self.extend_ctrl.set(
            (((channel as u32) << extend::CH_SHIFT) & extend::CH_MASK)
                | extend::INT_EN
                | (extend::INT_TYPE_XFER_DONE << extend::INT_TYPE_SHIFT)
                | extend::MODE_HW
                | ((req_sel << extend::REQ_SEL_SHIFT) & extend::REQ_SEL_MASK)
                | extend::CHAIN_MODE_LIST
                | extend::CHAIN_EN,
        );
        self.warp_info.set(0);
    }

    /// Point this descriptor at `next`.
    pub fn link(&self, next: *const DmaDescriptor) {
        self.next.set(next as usize);
    }

    /// Address of the next descriptor.
    #[inline(always)]
    pub fn next_addr(&self) -> usize {
        self.next.get()
    }

    /// Check if the descriptor is still owned by the DMA engine.
    #[inline(always)]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (self.vld.get() & vld::VALID) != 0
    }

    /// Hand the descriptor to the DMA engine.
    #[inline(always)]
    pub fn set_valid(&self) {
        self.vld.set(vld::VALID);
    }

    /// Take the descriptor back from the DMA engine.
    #[inline(always)]
    pub fn clear_valid(&self) {
        self.vld.set(0);
    }

    /// Transfer length in bytes.
    #[inline(always)]
    pub fn len(&self) -> usize {
        ((self.ctrl.get() & ctrl::LEN_MASK) >> ctrl::LEN_SHIFT) as usize
    }

    /// Check if the transfer length is zero.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set the transfer length in bytes (truncated to 16 bits).
    #[inline(always)]
    pub fn set_len(&self, len: usize) {
        self.ctrl.update(|v| {
            (v & !ctrl::LEN_MASK) | (((len as u32) << ctrl::LEN_SHIFT) & ctrl::LEN_MASK)
        });
    }

    /// Memory-side buffer address for `direction` (0 when the slot is empty).
    #[inline(always)]
    pub fn buffer_addr(&self, direction: Direction) -> usize {
        match direction {
            Direction::Tx => self.src_addr.get(),
            Direction::Rx => self.dest_addr.get(),
        }
    }

    /// Set the memory-side buffer address for `direction`.
    #[inline(always)]
    pub fn set_buffer_addr(&self, direction: Direction, addr: usize) {
        match direction {
            Direction::Tx => self.src_addr.set(addr),
            Direction::Rx => self.dest_addr.set(addr),
        }
    }

    /// Source address.
    pub fn src_addr(&self) -> usize {
        self.src_addr.get()
    }

    /// Destination address.
    pub fn dest_addr(&self) -> usize {
        self.dest_addr.get()
    }

    /// Raw chain control word.
    pub fn ctrl(&self) -> u32 {
        self.ctrl.get()
    }

    /// Channel number recorded in the extended control word.
    pub fn channel(&self) -> u8 {
        ((self.extend_ctrl.get() & extend::CH_MASK) >> extend::CH_SHIFT) as u8
    }

    /// Request source recorded in the extended control word.
    pub fn req_sel(&self) -> u32 {
        (self.extend_ctrl.get() & extend::REQ_SEL_MASK) >> extend::REQ_SEL_SHIFT
    }

    /// Raw extended control word.
    pub fn extend_ctrl(&self) -> u32 {
        self.extend_ctrl.get()
    }
}

impl Default for DmaDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIFO: usize = 0x4001_2010;

    #[test]
    fn tx_configuration_fixes_destination() {
        let desc = DmaDescriptor::new();
        desc.configure(Direction::Tx, 3, 11, FIFO);

        assert_eq!(desc.dest_addr(), FIFO);
        assert_eq!(desc.src_addr(), 0);
        assert_eq!(desc.ctrl() & ctrl::SRC_INC_MASK, ctrl::ADDR_INC);
        assert_eq!(desc.ctrl() & ctrl::DEST_INC_MASK, ctrl::ADDR_FIXED << ctrl::DEST_INC_SHIFT);
        assert_eq!(desc.channel(), 3);
        assert_eq!(desc.req_sel(), 11);
        assert!(!desc.is_valid());
    }

    #[test]
    fn rx_configuration_fixes_source() {
        let desc = DmaDescriptor::new();
        desc.configure(Direction::Rx, 1, 10, FIFO + 4);

        assert_eq!(desc.src_addr(), FIFO + 4);
        assert_eq!(desc.buffer_addr(Direction::Rx), 0);
        assert_eq!(desc.ctrl() & ctrl::DEST_INC_MASK, ctrl::ADDR_INC << ctrl::DEST_INC_SHIFT);
        assert_eq!(desc.ctrl() & ctrl::DATA_UNIT_MASK, ctrl::UNIT_WORD << ctrl::DATA_UNIT_SHIFT);
        let ext = desc.extend_ctrl();
        assert_ne!(ext & extend::INT_EN, 0);
        assert_ne!(ext & extend::CHAIN_MODE_LIST, 0);
        assert_ne!(ext & extend::CHAIN_EN, 0);
        assert_eq!(ext & extend::WARP_EN, 0);
    }

    #[test]
    fn length_preserves_control_bits() {
        let desc = DmaDescriptor::new();
        desc.configure(Direction::Tx, 0, 11, FIFO);
        let before = desc.ctrl() & !ctrl::LEN_MASK;

        desc.set_len(400);
        assert_eq!(desc.len(), 400);
        assert_eq!(desc.ctrl() & !ctrl::LEN_MASK, before);

        desc.set_len(ctrl::LEN_MAX);
        assert_eq!(desc.len(), ctrl::LEN_MAX);
    }

    #[test]
    fn valid_flag_round_trip() {
        let desc = DmaDescriptor::new();
        desc.set_valid();
        assert!(desc.is_valid());
        desc.clear_valid();
        assert!(!desc.is_valid());
    }

    #[test]
    fn link_records_address() {
        let a = DmaDescriptor::new();
        let b = DmaDescriptor::new();
        a.link(&b);
        assert_eq!(a.next_addr(), &b as *const DmaDescriptor as usize);
    }

    #[test]
    fn buffer_address_follows_direction() {
        let desc = DmaDescriptor::new();
        desc.set_buffer_addr(Direction::Tx, 0x2000_0000);
        assert_eq!(desc.src_addr(), 0x2000_0000);
        desc.set_buffer_addr(Direction::Rx, 0x2000_1000);
        assert_eq!(desc.dest_addr(), 0x2000_1000);
    }
}
