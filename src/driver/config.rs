//! Configuration types for the W80x I2S driver

use super::error::{ConfigError, ConfigResult};
use super::event::EventCallback;
use crate::internal::constants::{
    BUFFER_ALIGN, DEFAULT_PACKET_SIZE, DEFAULT_RING_DEPTH, DEFAULT_RX_DMA_CHANNEL,
    DEFAULT_TX_DMA_CHANNEL, DMA_CHANNEL_COUNT, MAX_PACKET_SIZE, MAX_RING_DEPTH, MIN_RING_DEPTH,
};

/// Clock role of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    /// Controller drives BCLK and LRCLK
    #[default]
    Master,
    /// Controller follows an external clock
    Slave,
}

/// Which directions the controller moves data in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferMode {
    /// Receive only
    In,
    /// Transmit only
    Out,
    /// Full duplex
    #[default]
    InOut,
}

impl TransferMode {
    /// Check if the mode uses `direction`
    #[must_use]
    pub const fn uses(self, direction: Direction) -> bool {
        match direction {
            Direction::Tx => matches!(self, TransferMode::Out | TransferMode::InOut),
            Direction::Rx => matches!(self, TransferMode::In | TransferMode::InOut),
        }
    }
}

/// Serial data standard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Standard {
    /// Philips I2S
    #[default]
    I2s = 0,
    /// MSB justified (left justified)
    Msb = 1,
    /// PCM short frame sync
    PcmA = 2,
    /// PCM long frame sync
    PcmB = 3,
}

impl Standard {
    /// Convert to the format field value for the control register
    #[must_use]
    pub const fn to_reg_value(self) -> u32 {
        self as u32
    }
}

/// Sample word width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitWidth {
    /// 8-bit samples
    Bits8,
    /// 16-bit samples
    #[default]
    Bits16,
    /// 24-bit samples
    Bits24,
    /// 32-bit samples
    Bits32,
}

impl BitWidth {
    /// Sample width in bits
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            BitWidth::Bits8 => 8,
            BitWidth::Bits16 => 16,
            BitWidth::Bits24 => 24,
            BitWidth::Bits32 => 32,
        }
    }

    /// Convert to the word width field value for the control register
    #[must_use]
    pub const fn to_reg_value(self) -> u32 {
        self.bits() / 8 - 1
    }
}

/// Channel layout of the audio stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelType {
    /// Mono on the left channel
    MonoLeft,
    /// Mono on the right channel
    MonoRight,
    /// Two channels
    #[default]
    Stereo,
}

/// Transfer direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Memory to I2S (playback)
    Tx,
    /// I2S to memory (capture)
    Rx,
}

impl Direction {
    /// Both directions, transmit first
    pub const ALL: [Direction; 2] = [Direction::Tx, Direction::Rx];

    /// Stable index for per-direction arrays
    #[inline(always)]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Direction::Tx => 0,
            Direction::Rx => 1,
        }
    }
}

/// Per-direction driver state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DirectionState {
    /// Driver not initialized, or direction not part of the transfer mode
    #[default]
    Uninitialized,
    /// Ring built, DMA idle
    Configured,
    /// DMA armed and the direction enable bit set
    Running,
    /// Direction enable bit cleared, DMA and ring untouched
    Paused,
}

/// Settings for one transfer direction
#[derive(Debug, Clone, Copy)]
pub struct DirectionConfig {
    /// DMA channel serving this direction
    pub dma_channel: u8,
    /// Descriptor ring depth
    pub depth: usize,
    /// Nominal bytes per buffer, reported on completion
    pub packet_size: usize,
    /// Completion callback (required when the direction is used)
    pub callback: Option<EventCallback>,
}

impl DirectionConfig {
    const fn new(dma_channel: u8) -> Self {
        Self {
            dma_channel,
            depth: DEFAULT_RING_DEPTH,
            packet_size: DEFAULT_PACKET_SIZE,
            callback: None,
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if !(MIN_RING_DEPTH..=MAX_RING_DEPTH).contains(&self.depth) {
            return Err(ConfigError::InvalidRingDepth);
        }
        if self.packet_size == 0
            || self.packet_size > MAX_PACKET_SIZE
            || self.packet_size % BUFFER_ALIGN != 0
        {
            return Err(ConfigError::InvalidConfig);
        }
        if self.dma_channel >= DMA_CHANNEL_COUNT {
            return Err(ConfigError::InvalidConfig);
        }
        if self.callback.is_none() {
            return Err(ConfigError::MissingCallback);
        }
        Ok(())
    }
}

/// Complete I2S configuration
#[derive(Debug, Clone, Copy)]
pub struct I2sConfig {
    /// Master or slave clocking
    pub role: Role,
    /// Directions in use
    pub mode: TransferMode,
    /// Serial data standard
    pub standard: Standard,
    /// Transmit direction settings
    pub tx: DirectionConfig,
    /// Receive direction settings
    pub rx: DirectionConfig,
}

impl Default for I2sConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl I2sConfig {
    /// Create a new configuration with defaults
    ///
    /// Master, full duplex, Philips I2S, four 1024-byte buffers per
    /// direction on DMA channels 0 (TX) and 1 (RX). Callbacks must still
    /// be supplied.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            role: Role::Master,
            mode: TransferMode::InOut,
            standard: Standard::I2s,
            tx: DirectionConfig::new(DEFAULT_TX_DMA_CHANNEL),
            rx: DirectionConfig::new(DEFAULT_RX_DMA_CHANNEL),
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Set the clock role
    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Set the transfer mode
    #[must_use]
    pub const fn with_mode(mut self, mode: TransferMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the data standard
    #[must_use]
    pub const fn with_standard(mut self, standard: Standard) -> Self {
        self.standard = standard;
        self
    }

    /// Set the transmit DMA channel
    #[must_use]
    pub const fn with_tx_dma_channel(mut self, channel: u8) -> Self {
        self.tx.dma_channel = channel;
        self
    }

    /// Set the receive DMA channel
    #[must_use]
    pub const fn with_rx_dma_channel(mut self, channel: u8) -> Self {
        self.rx.dma_channel = channel;
        self
    }

    /// Set the transmit ring depth (2..=16)
    #[must_use]
    pub const fn with_tx_depth(mut self, depth: usize) -> Self {
        self.tx.depth = depth;
        self
    }

    /// Set the receive ring depth (2..=16)
    #[must_use]
    pub const fn with_rx_depth(mut self, depth: usize) -> Self {
        self.rx.depth = depth;
        self
    }

    /// Set the nominal transmit packet size in bytes
    #[must_use]
    pub const fn with_tx_packet_size(mut self, size: usize) -> Self {
        self.tx.packet_size = size;
        self
    }

    /// Set the nominal receive packet size in bytes
    #[must_use]
    pub const fn with_rx_packet_size(mut self, size: usize) -> Self {
        self.rx.packet_size = size;
        self
    }

    /// Set the transmit completion callback
    #[must_use]
    pub const fn with_tx_callback(mut self, callback: EventCallback) -> Self {
        self.tx.callback = Some(callback);
        self
    }

    /// Set the receive completion callback
    #[must_use]
    pub const fn with_rx_callback(mut self, callback: EventCallback) -> Self {
        self.rx.callback = Some(callback);
        self
    }

    /// Settings of one direction
    #[must_use]
    pub const fn direction(&self, direction: Direction) -> &DirectionConfig {
        match direction {
            Direction::Tx => &self.tx,
            Direction::Rx => &self.rx,
        }
    }

    /// Check the configuration for consistency.
    ///
    /// Only directions used by [`TransferMode`] are checked.
    pub fn validate(&self) -> ConfigResult<()> {
        for direction in Direction::ALL {
            if self.mode.uses(direction) {
                self.direction(direction).validate()?;
            }
        }

        if self.mode == TransferMode::InOut && self.tx.dma_channel == self.rx.dma_channel {
            return Err(ConfigError::ChannelConflict);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::event::I2sEvent;

    fn noop(_: &I2sEvent) {}

    fn valid() -> I2sConfig {
        I2sConfig::new()
            .with_tx_callback(noop)
            .with_rx_callback(noop)
    }

    #[test]
    fn defaults() {
        let config = I2sConfig::default();
        assert_eq!(config.role, Role::Master);
        assert_eq!(config.mode, TransferMode::InOut);
        assert_eq!(config.standard, Standard::I2s);
        assert_eq!(config.tx.depth, DEFAULT_RING_DEPTH);
        assert_eq!(config.rx.packet_size, DEFAULT_PACKET_SIZE);
        assert_eq!(config.tx.dma_channel, 0);
        assert_eq!(config.rx.dma_channel, 1);
        assert!(config.tx.callback.is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let config = valid()
            .with_role(Role::Slave)
            .with_mode(TransferMode::Out)
            .with_standard(Standard::PcmA)
            .with_tx_dma_channel(5)
            .with_tx_depth(8)
            .with_tx_packet_size(512);

        assert_eq!(config.role, Role::Slave);
        assert_eq!(config.mode, TransferMode::Out);
        assert_eq!(config.standard, Standard::PcmA);
        assert_eq!(config.direction(Direction::Tx).dma_channel, 5);
        assert_eq!(config.direction(Direction::Tx).depth, 8);
        assert_eq!(config.direction(Direction::Tx).packet_size, 512);
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn missing_callback_rejected_only_for_used_direction() {
        let tx_only = I2sConfig::new()
            .with_mode(TransferMode::Out)
            .with_tx_callback(noop);
        assert!(tx_only.validate().is_ok());

        let rx_missing = I2sConfig::new().with_tx_callback(noop);
        assert_eq!(rx_missing.validate(), Err(ConfigError::MissingCallback));
    }

    #[test]
    fn ring_depth_range_enforced() {
        assert_eq!(valid().with_tx_depth(1).validate(), Err(ConfigError::InvalidRingDepth));
        assert_eq!(valid().with_rx_depth(17).validate(), Err(ConfigError::InvalidRingDepth));
        assert!(valid().with_rx_depth(2).with_tx_depth(16).validate().is_ok());
    }

    #[test]
    fn packet_size_must_be_word_aligned() {
        assert_eq!(valid().with_rx_packet_size(0).validate(), Err(ConfigError::InvalidConfig));
        assert_eq!(valid().with_rx_packet_size(402).validate(), Err(ConfigError::InvalidConfig));
        assert_eq!(
            valid().with_tx_packet_size(MAX_PACKET_SIZE + 1).validate(),
            Err(ConfigError::InvalidConfig)
        );
    }

    #[test]
    fn duplex_channels_must_differ() {
        let config = valid().with_tx_dma_channel(3).with_rx_dma_channel(3);
        assert_eq!(config.validate(), Err(ConfigError::ChannelConflict));

        // Same channel is fine when only one direction is used
        assert!(config.with_mode(TransferMode::In).validate().is_ok());
    }

    #[test]
    fn channel_out_of_range_rejected() {
        assert_eq!(valid().with_tx_dma_channel(8).validate(), Err(ConfigError::InvalidConfig));
    }

    #[test]
    fn transfer_mode_directions() {
        assert!(TransferMode::In.uses(Direction::Rx));
        assert!(!TransferMode::In.uses(Direction::Tx));
        assert!(TransferMode::Out.uses(Direction::Tx));
        assert!(!TransferMode::Out.uses(Direction::Rx));
        assert!(TransferMode::InOut.uses(Direction::Tx));
        assert!(TransferMode::InOut.uses(Direction::Rx));
    }

    #[test]
    fn register_encodings() {
        assert_eq!(BitWidth::Bits8.to_reg_value(), 0);
        assert_eq!(BitWidth::Bits16.to_reg_value(), 1);
        assert_eq!(BitWidth::Bits24.to_reg_value(), 2);
        assert_eq!(BitWidth::Bits32.to_reg_value(), 3);
        assert_eq!(Standard::PcmB.to_reg_value(), 3);
    }
}
