//! Bit field definitions for the W80x chained DMA descriptor.

/// Valid word: set while the descriptor is owned by the DMA engine.
pub mod vld {
    /// Descriptor holds a buffer the engine has not finished yet
    pub const VALID: u32 = 1 << 31;
}

/// Chain-mode transfer control word
pub mod ctrl {
    /// Source address increment mode shift
    pub const SRC_INC_SHIFT: u32 = 0;
    /// Source address increment mode mask
    pub const SRC_INC_MASK: u32 = 0x3;
    /// Destination address increment mode shift
    pub const DEST_INC_SHIFT: u32 = 2;
    /// Destination address increment mode mask
    pub const DEST_INC_MASK: u32 = 0x3 << 2;
    /// Data unit shift
    pub const DATA_UNIT_SHIFT: u32 = 4;
    /// Data unit mask
    pub const DATA_UNIT_MASK: u32 = 0x3 << 4;
    /// Burst size: 0 = one unit, 1 = four units
    pub const BURST_4: u32 = 1 << 6;
    /// Transfer length shift
    pub const LEN_SHIFT: u32 = 7;
    /// Transfer length mask (16 bits)
    pub const LEN_MASK: u32 = 0xFFFF << 7;
    /// Largest transfer length one descriptor can carry
    pub const LEN_MAX: usize = 0xFFFF;

    /// Address stays fixed (peripheral FIFO)
    pub const ADDR_FIXED: u32 = 0;
    /// Address increments after each unit (memory buffer)
    pub const ADDR_INC: u32 = 1;

    /// 8-bit data unit
    pub const UNIT_BYTE: u32 = 0;
    /// 16-bit data unit
    pub const UNIT_HALF_WORD: u32 = 1;
    /// 32-bit data unit
    pub const UNIT_WORD: u32 = 2;
}

/// Extended control word (read by the driver, not by the engine)
pub mod extend {
    /// Channel number shift
    pub const CH_SHIFT: u32 = 0;
    /// Channel number mask
    pub const CH_MASK: u32 = 0xF;
    /// Interrupt enable
    pub const INT_EN: u32 = 1 << 4;
    /// Interrupt type shift
    pub const INT_TYPE_SHIFT: u32 = 5;
    /// Interrupt type mask
    pub const INT_TYPE_MASK: u32 = 0x3 << 5;
    /// Hardware request mode
    pub const MODE_HW: u32 = 1 << 7;
    /// Request select shift
    pub const REQ_SEL_SHIFT: u32 = 8;
    /// Request select mask
    pub const REQ_SEL_MASK: u32 = 0xF << 8;
    /// Descriptor list mode
    pub const CHAIN_MODE_LIST: u32 = 1 << 12;
    /// UART DMA channel shift
    pub const UART_CH_SHIFT: u32 = 13;
    /// UART DMA channel mask
    pub const UART_CH_MASK: u32 = 0x7 << 13;
    /// Wrap mode enable
    pub const WARP_EN: u32 = 1 << 16;
    /// Follow `next` links
    pub const CHAIN_EN: u32 = 1 << 17;

    /// Interrupt on transfer done
    pub const INT_TYPE_XFER_DONE: u32 = 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_fields_do_not_overlap() {
        let fields = [
            ctrl::SRC_INC_MASK,
            ctrl::DEST_INC_MASK,
            ctrl::DATA_UNIT_MASK,
            ctrl::BURST_4,
            ctrl::LEN_MASK,
        ];
        for (i, a) in fields.iter().enumerate() {
            for b in &fields[i + 1..] {
                assert_eq!(a & b, 0);
            }
        }
    }

    #[test]
    fn extend_fields_do_not_overlap() {
        let fields = [
            extend::CH_MASK,
            extend::INT_EN,
            extend::INT_TYPE_MASK,
            extend::MODE_HW,
            extend::REQ_SEL_MASK,
            extend::CHAIN_MODE_LIST,
            extend::UART_CH_MASK,
            extend::WARP_EN,
            extend::CHAIN_EN,
        ];
        for (i, a) in fields.iter().enumerate() {
            for b in &fields[i + 1..] {
                assert_eq!(a & b, 0);
            }
        }
    }
}
