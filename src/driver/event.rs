//! Completion events delivered to the application.
//!
//! Callbacks run in interrupt context and must not block. A buffer handed to
//! [`I2s::append_buffer`](crate::I2s::append_buffer) belongs to the driver
//! until an event reports it.

use super::config::Direction;

/// What an [`I2sEvent`] reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    /// Transmit buffers have been played out
    TxDone,
    /// Receive buffers have been filled
    RxReady,
    /// The receiver went quiet after a drained partial packet
    RxDone,
}

/// Completion record passed to an [`EventCallback`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2sEvent {
    /// Event kind
    pub kind: EventKind,
    /// Direction that produced the event
    pub direction: Direction,
    /// Address of the first buffer completed by this event
    pub buffer: Option<usize>,
    /// Bytes per buffer: the configured packet size, or the drained count
    pub len: usize,
    /// Buffers completed by this event
    pub nodes: usize,
    /// Free ring slots after this event
    pub free_slots: usize,
}

impl I2sEvent {
    /// First completed buffer as a raw pointer
    #[must_use]
    pub fn buffer_ptr(&self) -> Option<*mut u8> {
        self.buffer.map(|addr| addr as *mut u8)
    }
}

/// Application completion callback
pub type EventCallback = fn(&I2sEvent);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_ptr_matches_address() {
        let event = I2sEvent {
            kind: EventKind::RxReady,
            direction: Direction::Rx,
            buffer: Some(0x2000_0400),
            len: 400,
            nodes: 1,
            free_slots: 3,
        };
        assert_eq!(event.buffer_ptr(), Some(0x2000_0400 as *mut u8));

        let done = I2sEvent { kind: EventKind::RxDone, buffer: None, ..event };
        assert_eq!(done.buffer_ptr(), None);
    }
}
