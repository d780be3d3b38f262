mod dma;
mod joypad;
mod mmio;
mod ppu;
mod regs;

use super::cartridge::Cartridge;
use super::serial::Serial;
use super::timer::Timer;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};
use anyhow::Result;
use joypad::Joypad;
use ppu::Ppu;
use regs::HwRegs;

const VRAM_SIZE: usize = 0x2000;
const WRAM_SIZE: usize = 0x2000;
const OAM_SIZE: usize = 0xA0;
const HRAM_SIZE: usize = 0x7F;

/// Everything on the far side of the CPU pins: the cartridge, the
/// internal RAMs, the memory-mapped peripherals and the PPU.
pub(crate) struct DmgBus {
    pub(crate) cartridge: Cartridge,
    pub(crate) vram: [u8; VRAM_SIZE],
    wram: [u8; WRAM_SIZE],
    pub(crate) oam: [u8; OAM_SIZE],
    hram: [u8; HRAM_SIZE],
    pub(crate) regs: HwRegs,
    pub(crate) timer: Timer,
    pub(crate) serial: Serial,
    pub(crate) joypad: Joypad,
    pub(crate) ppu: Ppu,
}

impl DmgBus {
    pub(crate) fn new(rom: &[u8]) -> Result<Self> {
        Ok(Self {
            cartridge: Cartridge::new(rom)?,
            vram: [0; VRAM_SIZE],
            wram: [0; WRAM_SIZE],
            oam: [0; OAM_SIZE],
            hram: [0; HRAM_SIZE],
            regs: HwRegs::new(),
            timer: Timer::new(),
            serial: Serial::new(),
            joypad: Joypad::new(),
            ppu: Ppu::new(),
        })
    }

    pub(crate) fn framebuffer(&self) -> &[u8; SCREEN_WIDTH * SCREEN_HEIGHT] {
        &self.ppu.framebuffer
    }
}
