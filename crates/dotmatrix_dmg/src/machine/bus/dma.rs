use super::DmgBus;
use crate::cpu::Bus;

impl DmgBus {
    /// OAM DMA, triggered by a write to `0xFF46`. All 160 bytes are
    /// copied in one go from `value << 8`.
    pub(super) fn oam_dma(&mut self, value: u8) {
        self.regs.dma = value;
        let base = u16::from(value) << 8;
        for i in 0..self.oam.len() as u16 {
            self.oam[i as usize] = self.read8(base + i);
        }
    }
}
