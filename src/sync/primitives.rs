//! Critical-section cell shared by task code and the I2S/DMA interrupts.

use core::cell::RefCell;
use critical_section::{CriticalSection, Mutex};

/// Value guarded by a `critical_section::Mutex` around a `RefCell`.
///
/// Every access runs with interrupts masked, so the completion and RX-done
/// handlers never observe a half-updated ring.
pub struct CriticalSectionCell<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> CriticalSectionCell<T> {
    /// Wrap `value`. Usable in a `static`.
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    #[inline]
    fn cell<'cs>(&'cs self, cs: CriticalSection<'cs>) -> &'cs RefCell<T> {
        self.inner.borrow(cs)
    }

    /// Run `f` on the value with interrupts masked.
    ///
    /// # Panics
    /// Re-entering the cell from inside `f` panics; use
    /// [`try_with`](Self::try_with) where nesting is possible.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| f(&mut self.cell(cs).borrow_mut()))
    }

    /// Like [`with`](Self::with), but `None` when the value is already
    /// borrowed further up the stack.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            let mut value = self.cell(cs).try_borrow_mut().ok()?;
            Some(f(&mut value))
        })
    }

    /// Read-only access, for status queries.
    #[inline]
    pub fn with_ref<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        critical_section::with(|cs| f(&self.cell(cs).borrow()))
    }
}
