//! ISR-safe I2S wrapper using critical sections.

use super::primitives::CriticalSectionCell;
use crate::driver::config::Direction;
use crate::driver::i2s::I2s;
use crate::driver::interrupt::InterruptStatus;
use crate::hal::dma::DmaService;
use crate::internal::register::RegisterBlock;

/// ISR-safe I2S driver wrapper.
///
/// All access goes through `critical_section::with()`, so task code and the
/// I2S and DMA interrupt handlers never observe a ring mid-update. Completion
/// callbacks run inside the critical section and must not call back into
/// the wrapper.
///
/// # Example
///
/// ```ignore
/// static I2S: SharedI2s<Mmio, W80xDma<Mmio, Delay>> = SharedI2s::new(I2s::new(bus, dma));
///
/// #[interrupt]
/// fn I2S_IRQ() {
///     I2S.handle_interrupt();
/// }
///
/// #[interrupt]
/// fn DMA_CH1_IRQ() {
///     I2S.on_dma_complete(Direction::Rx);
/// }
/// ```
pub struct SharedI2s<R, D> {
    inner: CriticalSectionCell<I2s<R, D>>,
}

impl<R: RegisterBlock, D: DmaService> SharedI2s<R, D> {
    /// Wrap a driver (const, suitable for static initialization).
    pub const fn new(i2s: I2s<R, D>) -> Self {
        Self {
            inner: CriticalSectionCell::new(i2s),
        }
    }

    /// Execute a closure with exclusive access to the driver.
    ///
    /// Interrupts are disabled for the duration of the closure.
    #[inline]
    pub fn with<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&mut I2s<R, D>) -> T,
    {
        self.inner.with(f)
    }

    /// Try to execute a closure, returning `None` if already borrowed.
    #[inline]
    pub fn try_with<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&mut I2s<R, D>) -> T,
    {
        self.inner.try_with(f)
    }

    /// Forward a DMA transfer-done interrupt for `direction`.
    pub fn on_dma_complete(&self, direction: Direction) {
        self.inner.with(|i2s| i2s.on_dma_complete(direction));
    }

    /// Service the I2S interrupt.
    pub fn handle_interrupt(&self) -> InterruptStatus {
        self.inner.with(I2s::handle_interrupt)
    }

    /// Check if a direction's ring drained and its engine is idle.
    pub fn is_zombie(&self, direction: Direction) -> bool {
        self.inner.with_ref(|i2s| i2s.is_zombie(direction))
    }
}
