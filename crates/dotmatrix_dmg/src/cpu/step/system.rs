use crate::cpu::opcodes::Kind;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn step_system<B: Bus>(&mut self, bus: &mut B) {
        match self.instr.kind {
            Kind::Halt => {
                let pending = Self::pending_interrupts(bus);
                if !self.ime && pending != 0 {
                    // HALT bug: the CPU fails to halt and the next opcode
                    // byte is fetched without advancing PC.
                    log::trace!(target: "dmg::cpu", "halt bug at {:04X}", self.regs.pc);
                    self.halt_bug = true;
                } else {
                    self.halted = true;
                }
            }
            Kind::Stop => {
                log::debug!("cpu: STOP at {:04X}", self.regs.pc);
                self.stopped = true;
            }
            Kind::Di => {
                self.ime = false;
                self.ime_pending = false;
            }
            Kind::Ei => {
                // IME rises one instruction later; see `fetch`.
                if !self.ime {
                    self.ime_pending = true;
                }
            }
            _ => unreachable!("non-system kind routed to step_system"),
        }
    }
}
