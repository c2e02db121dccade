//! Register access for the W80x I2S and DMA controllers
//!
//! Peripheral register blocks are reached through the [`RegisterBlock`]
//! trait so the driver logic can run against memory-mapped hardware
//! ([`Mmio`]) or a host-side mock during tests. All hardware access is
//! volatile.

pub mod dma;
pub mod i2s;

/// Read a 32-bit register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn read_reg(addr: usize) -> u32 {
    unsafe { core::ptr::read_volatile(addr as *const u32) }
}

/// Write a 32-bit value to a register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn write_reg(addr: usize, value: u32) {
    unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
}

// =============================================================================
// Register Block Trait
// =============================================================================

/// A block of 32-bit registers addressed by byte offset from a base address.
pub trait RegisterBlock {
    /// Bus address of offset 0 (used to hand FIFO addresses to the DMA engine)
    fn base_addr(&self) -> usize;

    /// Read the register at `offset`
    fn read(&self, offset: usize) -> u32;

    /// Write the register at `offset`
    fn write(&mut self, offset: usize, value: u32);

    /// Read-modify-write the register at `offset`
    #[inline(always)]
    fn modify<F>(&mut self, offset: usize, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(offset);
        self.write(offset, f(value));
    }

    /// Set bits in the register at `offset`
    #[inline(always)]
    fn set_bits(&mut self, offset: usize, bits: u32) {
        self.modify(offset, |v| v | bits);
    }

    /// Clear bits in the register at `offset`
    #[inline(always)]
    fn clear_bits(&mut self, offset: usize, bits: u32) {
        self.modify(offset, |v| v & !bits);
    }

    /// Replace the field selected by `mask` (already shifted) with `value << shift`
    #[inline(always)]
    fn write_field(&mut self, offset: usize, mask: u32, shift: u32, value: u32) {
        self.modify(offset, |v| (v & !mask) | ((value << shift) & mask));
    }
}

impl<T: RegisterBlock + ?Sized> RegisterBlock for &mut T {
    fn base_addr(&self) -> usize {
        (**self).base_addr()
    }

    fn read(&self, offset: usize) -> u32 {
        (**self).read(offset)
    }

    fn write(&mut self, offset: usize, value: u32) {
        (**self).write(offset, value);
    }
}

/// Memory-mapped register block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// Create a register block at `base`.
    ///
    /// # Safety
    /// `base` must be the address of the peripheral's register block and
    /// nothing else may drive that peripheral while this value is alive.
    #[must_use]
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }
}

impl RegisterBlock for Mmio {
    #[inline(always)]
    fn base_addr(&self) -> usize {
        self.base
    }

    #[inline(always)]
    fn read(&self, offset: usize) -> u32 {
        // SAFETY: `Mmio::new` requires a valid peripheral base
        unsafe { read_reg(self.base + offset) }
    }

    #[inline(always)]
    fn write(&mut self, offset: usize, value: u32) {
        // SAFETY: `Mmio::new` requires a valid peripheral base
        unsafe { write_reg(self.base + offset, value) }
    }
}

// =============================================================================
// Register Access Macros
// =============================================================================

/// Generate read/write accessor methods for a register of a `bus`-backed block.
///
/// # Example
/// ```ignore
/// impl<R: RegisterBlock> I2sRegs<R> {
///     reg_rw!(control, set_control, CONTROL_OFFSET, "Control register");
/// }
/// ```
macro_rules! reg_rw {
    ($read_fn:ident, $write_fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn(&self) -> u32 {
            self.bus.read($offset)
        }

        #[doc = concat!("Write ", $doc)]
        #[inline(always)]
        pub fn $write_fn(&mut self, value: u32) {
            self.bus.write($offset, value);
        }
    };
}

/// Generate a read-only accessor method for a register.
macro_rules! reg_ro {
    ($read_fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn(&self) -> u32 {
            self.bus.read($offset)
        }
    };
}

/// Generate set/clear bit operation methods for a register.
///
/// # Example
/// ```ignore
/// impl<R: RegisterBlock> I2sRegs<R> {
///     reg_bit_ops!(enable_tx, disable_tx, CONTROL_OFFSET, CTRL_TXEN,
///                  "transmitter", "Enable", "Disable");
/// }
/// ```
macro_rules! reg_bit_ops {
    ($set_fn:ident, $clear_fn:ident, $offset:expr, $bit:expr, $what:expr, $set_verb:expr, $clear_verb:expr) => {
        #[doc = concat!($set_verb, " ", $what)]
        #[inline(always)]
        pub fn $set_fn(&mut self) {
            self.bus.set_bits($offset, $bit);
        }

        #[doc = concat!($clear_verb, " ", $what)]
        #[inline(always)]
        pub fn $clear_fn(&mut self) {
            self.bus.clear_bits($offset, $bit);
        }
    };
}

/// Generate a bit check method (true when the bit is set).
macro_rules! reg_bit_check {
    ($fn:ident, $offset:expr, $bit:expr, $doc:expr) => {
        #[doc = $doc]
        #[inline(always)]
        pub fn $fn(&self) -> bool {
            (self.bus.read($offset) & $bit) != 0
        }
    };
}

// Export macros for use in submodules
pub(crate) use reg_bit_check;
pub(crate) use reg_bit_ops;
pub(crate) use reg_ro;
pub(crate) use reg_rw;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRegisters;

    #[test]
    fn modify_preserves_other_bits() {
        let mut regs = MockRegisters::new(0x4000_0000);
        regs.write(0x00, 0xF0F0);
        regs.modify(0x00, |v| v | 0x000F);
        assert_eq!(regs.read(0x00), 0xF0FF);
    }

    #[test]
    fn set_and_clear_bits() {
        let mut regs = MockRegisters::new(0);
        regs.set_bits(0x04, 1 << 3);
        assert_eq!(regs.read(0x04), 1 << 3);
        regs.clear_bits(0x04, 1 << 3);
        assert_eq!(regs.read(0x04), 0);
    }

    #[test]
    fn write_field_masks_value() {
        let mut regs = MockRegisters::new(0);
        regs.write(0x00, 0xFFFF_FFFF);
        regs.write_field(0x00, 0x3 << 4, 4, 0x1);
        assert_eq!(regs.read(0x00), 0xFFFF_FFDF);
        // Values wider than the field are truncated
        regs.write_field(0x00, 0x3 << 4, 4, 0x6);
        assert_eq!(regs.read(0x00) & (0x3 << 4), 0x2 << 4);
    }

    #[test]
    fn mutable_reference_forwards_access() {
        fn poke<R: RegisterBlock>(mut bus: R) -> usize {
            bus.write(0x08, 42);
            bus.base_addr()
        }

        let mut regs = MockRegisters::new(0x1000);
        assert_eq!(poke(&mut regs), 0x1000);
        assert_eq!(regs.read(0x08), 42);
    }
}
