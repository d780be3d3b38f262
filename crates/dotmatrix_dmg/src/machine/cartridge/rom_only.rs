use anyhow::Result;

/// A 32 KiB cartridge with no mapper at all.
#[derive(Debug)]
pub(crate) struct RomOnly {
    rom: Vec<u8>,
}

impl RomOnly {
    pub(crate) fn new(rom: &[u8]) -> Result<Self> {
        super::rom_banks(rom)?;
        Ok(Self { rom: rom.to_vec() })
    }

    pub(crate) fn rom_read(&self, addr: u16) -> u8 {
        self.rom.get(usize::from(addr)).copied().unwrap_or(0xFF)
    }
}
