use crate::cpu::opcodes::{CbOp, Kind, CB_OPCODES};
use crate::cpu::{Bus, Cpu, Flag};

impl Cpu {
    pub(super) fn step_cb<B: Bus>(&mut self, bus: &mut B) {
        match self.instr.kind {
            Kind::CbPrefix => {
                // Stage 1 is the operand-byte fetch cycle, this
                // instruction's only bus access after the prefix.
                if self.stage == 1 {
                    let byte = bus.read8(self.regs.pc);
                    self.regs.pc = self.regs.pc.wrapping_add(1);
                    self.instr = &CB_OPCODES[byte as usize];
                    self.stage_count = self.instr.mcycles;
                    self.step_cb(bus);
                }
            }
            Kind::Cb(op, r) => {
                // Register work rides along with the operand fetch.
                if self.stage == 1 {
                    let value = self.reg8(r);
                    if let Some(result) = self.cb_apply(op, value) {
                        self.set_reg8(r, result);
                    }
                }
            }
            Kind::CbHl(op) => match self.stage {
                2 => {
                    let value = bus.read8(self.regs.hl());
                    match self.cb_apply(op, value) {
                        // BIT ends here; read-modify-write ops hold the
                        // result for the write stage.
                        Some(result) => self.mem = result,
                        None => {}
                    }
                }
                3 => bus.write8(self.regs.hl(), self.mem),
                _ => {}
            },
            _ => unreachable!("non-CB kind routed to step_cb"),
        }
    }

    /// Apply a CB operation to `value`. Returns the result to write back,
    /// or `None` for BIT, which only sets flags.
    fn cb_apply(&mut self, op: CbOp, value: u8) -> Option<u8> {
        match op {
            CbOp::Rlc => Some(self.rotate_left(value, false)),
            CbOp::Rrc => Some(self.rotate_right(value, false)),
            CbOp::Rl => Some(self.rotate_left(value, true)),
            CbOp::Rr => Some(self.rotate_right(value, true)),
            CbOp::Sla => {
                let result = value << 1;
                self.clear_flags();
                self.set_flag(Flag::Z, result == 0);
                self.set_flag(Flag::C, value & 0x80 != 0);
                Some(result)
            }
            CbOp::Sra => {
                let result = (value >> 1) | (value & 0x80);
                self.clear_flags();
                self.set_flag(Flag::Z, result == 0);
                self.set_flag(Flag::C, value & 0x01 != 0);
                Some(result)
            }
            CbOp::Swap => {
                let result = value.rotate_left(4);
                self.clear_flags();
                self.set_flag(Flag::Z, result == 0);
                Some(result)
            }
            CbOp::Srl => {
                let result = value >> 1;
                self.clear_flags();
                self.set_flag(Flag::Z, result == 0);
                self.set_flag(Flag::C, value & 0x01 != 0);
                Some(result)
            }
            CbOp::Bit(bit) => {
                self.set_flag(Flag::Z, value & (1 << bit) == 0);
                self.set_flag(Flag::N, false);
                self.set_flag(Flag::H, true);
                None
            }
            CbOp::Res(bit) => Some(value & !(1 << bit)),
            CbOp::Set(bit) => Some(value | (1 << bit)),
        }
    }
}
