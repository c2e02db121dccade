//! Error types for the W80x I2S driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Initialization and configuration failures
//! - [`DmaError`]: Descriptor ring and DMA channel issues
//! - [`IoError`]: Runtime state and parameter failures
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most driver methods.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration and initialization errors
///
/// These errors occur while validating an [`I2sConfig`](crate::I2sConfig)
/// or bringing up the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Driver already initialized
    AlreadyInitialized,
    /// Invalid configuration parameter
    InvalidConfig,
    /// Ring depth outside the supported range
    InvalidRingDepth,
    /// An enabled direction has no completion callback
    MissingCallback,
    /// Both directions were assigned the same DMA channel
    ChannelConflict,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::AlreadyInitialized => "already initialized",
            ConfigError::InvalidConfig => "invalid configuration",
            ConfigError::InvalidRingDepth => "ring depth out of range",
            ConfigError::MissingCallback => "missing completion callback",
            ConfigError::ChannelConflict => "DMA channel assigned twice",
        }
    }
}

// =============================================================================
// DMA Errors
// =============================================================================

/// DMA ring and channel errors
///
/// [`DmaError::RingFull`] is an expected condition: retry the append after
/// the next completion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaError {
    /// Every ring slot holds a pending buffer
    RingFull,
    /// Buffer length is zero, unaligned or too long for one descriptor
    InvalidLength,
    /// DMA channel number out of range
    InvalidChannel,
    /// DMA channel already registered to another client
    ChannelBusy,
    /// Start requested with no valid descriptor at the ring head
    NoBufferQueued,
    /// DMA channel did not stop in time
    StopTimeout,
}

impl core::fmt::Display for DmaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DmaError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DmaError::RingFull => "descriptor ring full",
            DmaError::InvalidLength => "invalid buffer length",
            DmaError::InvalidChannel => "invalid DMA channel",
            DmaError::ChannelBusy => "DMA channel busy",
            DmaError::NoBufferQueued => "no buffer queued",
            DmaError::StopTimeout => "DMA stop timed out",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Runtime state and parameter errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// Driver not initialized
    NotInitialized,
    /// Direction not enabled by the configured transfer mode
    DirectionDisabled,
    /// Invalid state for operation (e.g., pause while not running)
    InvalidState,
    /// Null buffer pointer
    NullBuffer,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::NotInitialized => "not initialized",
            IoError::DirectionDisabled => "direction not enabled",
            IoError::InvalidState => "invalid state for operation",
            IoError::NullBuffer => "null buffer",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match i2s.append_static(Direction::Tx, buf) {
///     Err(Error::Dma(DmaError::RingFull)) => { /* wait for TxDone */ }
///     Err(Error::Io(IoError::NotInitialized)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// DMA error
    Dma(DmaError),
    /// I/O error
    Io(IoError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Dma(e) => write!(f, "dma: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

// From impls for automatic conversion
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<DmaError> for Error {
    fn from(e: DmaError) -> Self {
        Error::Dma(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for I2S operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for DMA operations
pub type DmaResult<T> = core::result::Result<T, DmaError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;
    use std::format;

    use super::*;

    #[test]
    fn config_error_as_str_non_empty() {
        let variants = [
            ConfigError::AlreadyInitialized,
            ConfigError::InvalidConfig,
            ConfigError::InvalidRingDepth,
            ConfigError::MissingCallback,
            ConfigError::ChannelConflict,
        ];

        for variant in variants {
            assert!(!variant.as_str().is_empty(), "ConfigError::{variant:?} has empty string");
        }
    }

    #[test]
    fn config_error_display() {
        let display = format!("{}", ConfigError::InvalidRingDepth);
        assert_eq!(display, "ring depth out of range");
    }

    #[test]
    fn dma_error_as_str_non_empty() {
        let variants = [
            DmaError::RingFull,
            DmaError::InvalidLength,
            DmaError::InvalidChannel,
            DmaError::ChannelBusy,
            DmaError::NoBufferQueued,
            DmaError::StopTimeout,
        ];

        for variant in variants {
            assert!(!variant.as_str().is_empty(), "DmaError::{variant:?} has empty string");
        }
    }

    #[test]
    fn dma_error_display() {
        assert_eq!(format!("{}", DmaError::RingFull), "descriptor ring full");
    }

    #[test]
    fn io_error_as_str_non_empty() {
        let variants = [
            IoError::NotInitialized,
            IoError::DirectionDisabled,
            IoError::InvalidState,
            IoError::NullBuffer,
        ];

        for variant in variants {
            assert!(!variant.as_str().is_empty(), "IoError::{variant:?} has empty string");
        }
    }

    #[test]
    fn io_error_equality() {
        assert_eq!(IoError::NullBuffer, IoError::NullBuffer);
        assert_ne!(IoError::NullBuffer, IoError::InvalidState);
    }

    #[test]
    fn error_from_domain_errors() {
        assert_eq!(Error::from(ConfigError::MissingCallback), Error::Config(ConfigError::MissingCallback));
        assert_eq!(Error::from(DmaError::ChannelBusy), Error::Dma(DmaError::ChannelBusy));
        assert_eq!(Error::from(IoError::NotInitialized), Error::Io(IoError::NotInitialized));
    }

    #[test]
    fn error_display_prefixes_domain() {
        let config = format!("{}", Error::Config(ConfigError::ChannelConflict));
        assert!(config.starts_with("config:"));

        let dma = format!("{}", Error::Dma(DmaError::StopTimeout));
        assert!(dma.starts_with("dma:"));
        assert!(dma.contains("timed out"));

        let io = format!("{}", Error::Io(IoError::DirectionDisabled));
        assert!(io.starts_with("io:"));
    }

    #[test]
    fn question_mark_converts_domain_errors() {
        fn append() -> Result<()> {
            let ring: DmaResult<()> = Err(DmaError::RingFull);
            ring?;
            Ok(())
        }

        assert_eq!(append(), Err(Error::Dma(DmaError::RingFull)));
    }
}
