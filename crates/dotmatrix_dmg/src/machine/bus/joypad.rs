use super::DmgBus;

pub(crate) const JOYPAD_IRQ: u8 = 1 << 4;

const SELECT_DPAD: u8 = 1 << 4;
const SELECT_BUTTONS: u8 = 1 << 5;

/// Button matrix state. A set bit means the key is held; the inversion
/// to active-low only happens when `0xFF00` is read.
pub(crate) struct Joypad {
    /// Bits 0..=3: right, left, up, down.
    dpad: u8,
    /// Bits 0..=3: A, B, Select, Start.
    buttons: u8,
    /// Bits 4 and 5 of the last `0xFF00` write (0 selects the half).
    select: u8,
}

impl Joypad {
    pub(crate) fn new() -> Self {
        Self {
            dpad: 0,
            buttons: 0,
            select: SELECT_DPAD | SELECT_BUTTONS,
        }
    }

    pub(crate) fn write(&mut self, value: u8) {
        self.select = value & (SELECT_DPAD | SELECT_BUTTONS);
    }

    pub(crate) fn read(&self) -> u8 {
        let mut low = 0x0F;
        if self.select & SELECT_DPAD == 0 {
            low &= !self.dpad;
        }
        if self.select & SELECT_BUTTONS == 0 {
            low &= !self.buttons;
        }
        0xC0 | self.select | (low & 0x0F)
    }
}

impl DmgBus {
    pub(crate) fn set_dpad(&mut self, bit: u8, pressed: bool) {
        if pressed {
            if self.joypad.dpad & (1 << bit) == 0 {
                self.regs.if_reg |= JOYPAD_IRQ;
            }
            self.joypad.dpad |= 1 << bit;
        } else {
            self.joypad.dpad &= !(1 << bit);
        }
    }

    pub(crate) fn set_button(&mut self, bit: u8, pressed: bool) {
        if pressed {
            if self.joypad.buttons & (1 << bit) == 0 {
                self.regs.if_reg |= JOYPAD_IRQ;
            }
            self.joypad.buttons |= 1 << bit;
        } else {
            self.joypad.buttons &= !(1 << bit);
        }
    }
}
