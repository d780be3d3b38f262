//! Interrupt dispatch state machine.
//!
//! Dispatch takes five machine cycles (six when waking from HALT): two
//! idle cycles, two stack pushes of PC, and a final cycle that drops IME,
//! picks the highest-priority pending source, clears its IF bit, and jumps
//! to the vector. The source is chosen in the last cycle so that a stack
//! push landing on IE (SP near 0xFFFF) can still cancel the dispatch, in
//! which case the CPU ends up at 0x0000.

use super::{Bus, Cpu};

const IF_ADDR: u16 = 0xFF0F;
const IE_ADDR: u16 = 0xFFFF;

impl Cpu {
    /// Pending interrupt sources: `IE & IF & 0x1F`.
    #[inline]
    pub(super) fn pending_interrupts<B: Bus>(bus: &mut B) -> u8 {
        bus.read8(IE_ADDR) & bus.read8(IF_ADDR) & 0x1F
    }

    pub(super) fn begin_dispatch(&mut self, len: u8) {
        self.dispatching = true;
        self.dispatch_stage = 0;
        self.dispatch_len = len;
    }

    pub(super) fn step_dispatch_mcycle<B: Bus>(&mut self, bus: &mut B) {
        // Normalize so the last five stages line up regardless of the
        // extra leading wake cycle.
        let stage = self.dispatch_stage as i8 - (self.dispatch_len as i8 - 5);
        match stage {
            2 => {
                let pc = self.regs.pc;
                self.push_byte(bus, (pc >> 8) as u8);
            }
            3 => {
                let pc = self.regs.pc;
                self.push_byte(bus, pc as u8);
            }
            4 => self.finish_dispatch(bus),
            _ => {} // idle cycles
        }

        self.dispatch_stage += 1;
        if self.dispatch_stage >= self.dispatch_len {
            self.dispatching = false;
        }
    }

    fn finish_dispatch<B: Bus>(&mut self, bus: &mut B) {
        self.ime = false;
        self.ime_pending = false;

        let pending = Self::pending_interrupts(bus);
        if pending == 0 {
            // The PC push overwrote IE and cancelled every source.
            log::debug!("cpu: interrupt dispatch cancelled, jumping to 0000");
            self.regs.pc = 0x0000;
            return;
        }

        // Bit 0 (v-blank) has the highest priority.
        let index = pending.trailing_zeros() as u8;
        let if_reg = bus.read8(IF_ADDR);
        bus.write8(IF_ADDR, if_reg & !(1 << index));

        let vector = 0x0040 + 8 * index as u16;
        if self.trace.jumps {
            log::trace!(target: "dmg::jump", "int {index} -> {vector:04X}");
        }
        self.regs.pc = vector;
    }
}
