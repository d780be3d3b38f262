//! The DMG memory map, as seen by the CPU core.

use super::regs::{Lcdc, Stat};
use super::DmgBus;
use crate::cpu::Bus;

impl Bus for DmgBus {
    fn read8(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF => self.cartridge.rom_read(addr),
            0x8000..=0x9FFF => self.vram[usize::from(addr - 0x8000)],
            0xA000..=0xBFFF => self.cartridge.ram_read(addr - 0xA000),
            0xC000..=0xDFFF => self.wram[usize::from(addr - 0xC000)],
            // Echo RAM mirrors work RAM.
            0xE000..=0xFDFF => self.wram[usize::from(addr - 0xE000)],
            0xFE00..=0xFE9F => self.oam[usize::from(addr - 0xFE00)],
            0xFEA0..=0xFEFF => 0x00,
            0xFF00..=0xFF7F => self.io_read(addr),
            0xFF80..=0xFFFE => self.hram[usize::from(addr - 0xFF80)],
            0xFFFF => self.regs.ie_reg,
        }
    }

    fn write8(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x7FFF => self.cartridge.rom_write(addr, value),
            0x8000..=0x9FFF => {
                self.vram[usize::from(addr - 0x8000)] = value;
                self.ppu.vram_dirty = true;
            }
            0xA000..=0xBFFF => self.cartridge.ram_write(addr - 0xA000, value),
            0xC000..=0xDFFF => self.wram[usize::from(addr - 0xC000)] = value,
            0xE000..=0xFDFF => self.wram[usize::from(addr - 0xE000)] = value,
            0xFE00..=0xFE9F => self.oam[usize::from(addr - 0xFE00)] = value,
            0xFEA0..=0xFEFF => {}
            0xFF00..=0xFF7F => self.io_write(addr, value),
            0xFF80..=0xFFFE => self.hram[usize::from(addr - 0xFF80)] = value,
            0xFFFF => self.regs.ie_reg = value,
        }
    }
}

impl DmgBus {
    fn io_read(&mut self, addr: u16) -> u8 {
        match addr {
            0xFF00 => self.joypad.read(),
            0xFF01 => self.serial.sb,
            0xFF02 => self.serial.sc | 0x7E,
            0xFF04 => self.timer.div(),
            0xFF05 => self.timer.tima,
            0xFF06 => self.timer.tma,
            0xFF07 => self.timer.tac | 0xF8,
            0xFF0F => self.regs.if_reg | 0xE0,
            0xFF40 => self.regs.lcdc.bits(),
            0xFF41 => self.regs.stat.bits() | 0x80,
            0xFF42 => self.regs.scy,
            0xFF43 => self.regs.scx,
            0xFF44 => self.regs.ly,
            0xFF45 => self.regs.lyc,
            0xFF46 => self.regs.dma,
            0xFF4A => self.regs.wy,
            0xFF4B => self.regs.wx,
            // Sound, palettes and everything else unimplemented read
            // back as open bus.
            _ => 0xFF,
        }
    }

    fn io_write(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF00 => self.joypad.write(value),
            0xFF01 => self.serial.write_sb(value),
            0xFF02 => self.serial.sc = value,
            0xFF04 => self.timer.div_write(),
            0xFF05 => self.timer.tima_write(value),
            0xFF06 => self.timer.tma_write(value),
            0xFF07 => self.timer.tac_write(value),
            0xFF0F => self.regs.if_reg = value & 0x1F,
            0xFF40 => {
                self.regs.lcdc = Lcdc::from_bits_truncate(value);
                // Map and tile-data selects feed the overlay view.
                self.ppu.vram_dirty = true;
            }
            0xFF41 => {
                // The mode and coincidence bits stay under PPU control.
                let bits = (self.regs.stat.bits() & 0x07) | (value & 0x78);
                self.regs.stat = Stat::from_bits_truncate(bits);
            }
            0xFF42 => self.regs.scy = value,
            0xFF43 => self.regs.scx = value,
            // LY is read-only.
            0xFF44 => {}
            0xFF45 => self.regs.lyc = value,
            0xFF46 => self.oam_dma(value),
            0xFF4A => self.regs.wy = value,
            0xFF4B => self.regs.wx = value,
            // Sound and palette writes are accepted and dropped.
            _ => {}
        }
    }
}
