mod mbc1;
mod rom_only;

use anyhow::{bail, Result};
use mbc1::Mbc1;
use rom_only::RomOnly;

pub(crate) const ROM_BANK_SIZE: usize = 0x4000;
pub(crate) const RAM_BANK_SIZE: usize = 0x2000;

/// Offsets into the cartridge header.
const HEADER_END: usize = 0x150;
const CART_TYPE: usize = 0x147;
const ROM_SIZE: usize = 0x148;
const RAM_SIZE: usize = 0x149;

/// A game cartridge: the ROM image plus whatever mapper hardware the
/// header declares.
#[derive(Debug)]
pub(crate) enum Cartridge {
    RomOnly(RomOnly),
    Mbc1(Mbc1),
}

impl Cartridge {
    pub(crate) fn new(rom: &[u8]) -> Result<Self> {
        if rom.len() < HEADER_END {
            bail!("ROM image too small to hold a cartridge header ({} bytes)", rom.len());
        }
        match rom[CART_TYPE] {
            0x00 => Ok(Self::RomOnly(RomOnly::new(rom)?)),
            0x01..=0x03 => Ok(Self::Mbc1(Mbc1::new(rom)?)),
            kind => bail!("unsupported cartridge type {kind:#04X}"),
        }
    }

    pub(crate) fn rom_read(&self, addr: u16) -> u8 {
        match self {
            Self::RomOnly(cart) => cart.rom_read(addr),
            Self::Mbc1(cart) => cart.rom_read(addr),
        }
    }

    pub(crate) fn rom_write(&mut self, addr: u16, value: u8) {
        match self {
            Self::RomOnly(_) => {}
            Self::Mbc1(cart) => cart.rom_write(addr, value),
        }
    }

    pub(crate) fn ram_read(&self, offset: u16) -> u8 {
        match self {
            Self::RomOnly(_) => 0xFF,
            Self::Mbc1(cart) => cart.ram_read(offset),
        }
    }

    pub(crate) fn ram_write(&mut self, offset: u16, value: u8) {
        match self {
            Self::RomOnly(_) => {}
            Self::Mbc1(cart) => cart.ram_write(offset, value),
        }
    }
}

/// Decodes the ROM size byte into a bank count and checks it against
/// the actual image length.
fn rom_banks(rom: &[u8]) -> Result<usize> {
    let code = rom[ROM_SIZE];
    if code > 0x08 {
        bail!("unknown ROM size code {code:#04X}");
    }
    let banks = 2usize << code;
    if rom.len() != banks * ROM_BANK_SIZE {
        bail!(
            "inconsistent cartridge header: {} bytes of ROM but size code {code:#04X} ({banks} banks)",
            rom.len()
        );
    }
    Ok(banks)
}

/// Decodes the RAM size byte into a bank count.
fn ram_banks(rom: &[u8]) -> Result<usize> {
    match rom[RAM_SIZE] {
        0x00 => Ok(0),
        // Code 0x01 is a partial 2 KiB bank; a full bank is allocated.
        0x01 | 0x02 => Ok(1),
        0x03 => Ok(4),
        0x04 => Ok(16),
        0x05 => Ok(8),
        code => bail!("unknown RAM size code {code:#04X}"),
    }
}
