use super::{ram_banks, rom_banks, RAM_BANK_SIZE, ROM_BANK_SIZE};
use anyhow::Result;

/// The MBC1 mapper.
///
/// Writes into the ROM area set one of four latch registers; the
/// effective bank numbers for both ROM windows and the RAM window are
/// recomputed from the latches after every write.
#[derive(Debug)]
pub(crate) struct Mbc1 {
    rom: Vec<u8>,
    ram: Vec<u8>,
    rom_pages: usize,
    ram_pages: usize,

    ram_enable: u8,
    low_rom: u8,
    upper_bits: u8,
    mode: u8,

    /// Effective bank for `0x0000..=0x3FFF`.
    low_bank: usize,
    /// Effective bank for `0x4000..=0x7FFF`.
    high_bank: usize,
    ram_bank: usize,
}

impl Mbc1 {
    pub(crate) fn new(rom: &[u8]) -> Result<Self> {
        let rom_pages = rom_banks(rom)?;
        let ram_pages = ram_banks(rom)?;
        let mut cart = Self {
            rom: rom.to_vec(),
            // Unwritten RAM reads back as open bus.
            ram: vec![0xFF; ram_pages * RAM_BANK_SIZE],
            rom_pages,
            ram_pages,
            ram_enable: 0,
            low_rom: 0,
            upper_bits: 0,
            mode: 0,
            low_bank: 0,
            high_bank: 1,
            ram_bank: 0,
        };
        cart.recompute();
        Ok(cart)
    }

    fn ram_enabled(&self) -> bool {
        self.ram_enable & 0x0F == 0x0A && !self.ram.is_empty()
    }

    fn recompute(&mut self) {
        let upper = usize::from(self.upper_bits) << 5;
        let low5 = match self.low_rom & 0x1F {
            // A zero in the low latch always selects bank 1.
            0 => 1,
            n => usize::from(n),
        };
        self.low_bank = if self.mode != 0 { upper % self.rom_pages } else { 0 };
        self.high_bank = (upper | low5) % self.rom_pages;
        self.ram_bank = if self.mode != 0 && self.ram_pages > 0 {
            usize::from(self.upper_bits) % self.ram_pages
        } else {
            0
        };
    }

    pub(crate) fn rom_read(&self, addr: u16) -> u8 {
        let (bank, offset) = if addr < 0x4000 {
            (self.low_bank, usize::from(addr))
        } else {
            (self.high_bank, usize::from(addr - 0x4000))
        };
        self.rom[bank * ROM_BANK_SIZE + offset]
    }

    pub(crate) fn rom_write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enable = value,
            0x2000..=0x3FFF => self.low_rom = value,
            0x4000..=0x5FFF => self.upper_bits = value & 0x03,
            _ => self.mode = value & 0x01,
        }
        self.recompute();
    }

    pub(crate) fn ram_read(&self, offset: u16) -> u8 {
        if !self.ram_enabled() {
            return 0xFF;
        }
        self.ram[self.ram_bank * RAM_BANK_SIZE + usize::from(offset)]
    }

    pub(crate) fn ram_write(&mut self, offset: u16, value: u8) {
        if !self.ram_enabled() {
            return;
        }
        self.ram[self.ram_bank * RAM_BANK_SIZE + usize::from(offset)] = value;
    }
}
