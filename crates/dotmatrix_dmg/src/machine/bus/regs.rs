use bitflags::bitflags;

bitflags! {
    /// LCD control, `0xFF40`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct Lcdc: u8 {
        const BG_ENABLE = 1 << 0;
        const OBJ_ENABLE = 1 << 1;
        const OBJ_SIZE = 1 << 2;
        const BG_MAP = 1 << 3;
        const TILE_DATA = 1 << 4;
        const WINDOW_ENABLE = 1 << 5;
        const WINDOW_MAP = 1 << 6;
        const LCD_ENABLE = 1 << 7;
    }
}

bitflags! {
    /// LCD status, `0xFF41`. The low three bits are driven by the PPU,
    /// the interrupt selects are writable by software.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct Stat: u8 {
        const MODE_LO = 1 << 0;
        const MODE_HI = 1 << 1;
        const COINCIDENCE = 1 << 2;
        const HBLANK_IRQ = 1 << 3;
        const VBLANK_IRQ = 1 << 4;
        const OAM_IRQ = 1 << 5;
        const COINCIDENCE_IRQ = 1 << 6;
    }
}

/// The LCD register file plus the interrupt flag and enable bytes.
///
/// Values here are the ones the boot ROM leaves behind when it hands
/// control to the cartridge at `0x0100`.
pub(crate) struct HwRegs {
    pub(crate) lcdc: Lcdc,
    pub(crate) stat: Stat,
    pub(crate) scy: u8,
    pub(crate) scx: u8,
    pub(crate) ly: u8,
    pub(crate) lyc: u8,
    pub(crate) wy: u8,
    pub(crate) wx: u8,
    pub(crate) dma: u8,
    pub(crate) if_reg: u8,
    pub(crate) ie_reg: u8,
}

impl HwRegs {
    pub(crate) fn new() -> Self {
        Self {
            lcdc: Lcdc::from_bits_truncate(0x91),
            stat: Stat::from_bits_truncate(0x85),
            scy: 0,
            scx: 0,
            ly: 0,
            lyc: 0,
            wy: 0,
            wx: 0,
            dma: 0xFF,
            if_reg: 0x01,
            ie_reg: 0x00,
        }
    }

    pub(crate) fn set_mode(&mut self, mode: u8) {
        let bits = (self.stat.bits() & !0x03) | (mode & 0x03);
        self.stat = Stat::from_bits_truncate(bits);
    }
}
