use crate::cpu::opcodes::{AluOp, Kind};
use crate::cpu::{Bus, Cpu, Flag};

impl Cpu {
    pub(super) fn step_alu<B: Bus>(&mut self, bus: &mut B) {
        match self.instr.kind {
            Kind::Alu(op, src) => {
                let value = self.reg8(src);
                self.alu_binop(op, value);
            }
            Kind::AluHl(op) => {
                if self.stage == 1 {
                    let value = bus.read8(self.regs.hl());
                    self.alu_binop(op, value);
                }
            }
            Kind::AluImm(op) => {
                if self.stage == 1 {
                    let value = bus.read8(self.regs.pc);
                    self.regs.pc = self.regs.pc.wrapping_add(1);
                    self.alu_binop(op, value);
                }
            }
            Kind::IncR(r) => {
                let result = self.inc8(self.reg8(r));
                self.set_reg8(r, result);
            }
            Kind::DecR(r) => {
                let result = self.dec8(self.reg8(r));
                self.set_reg8(r, result);
            }
            Kind::IncHlInd => match self.stage {
                1 => self.mem = bus.read8(self.regs.hl()),
                2 => {
                    let result = self.inc8(self.mem);
                    bus.write8(self.regs.hl(), result);
                }
                _ => {}
            },
            Kind::DecHlInd => match self.stage {
                1 => self.mem = bus.read8(self.regs.hl()),
                2 => {
                    let result = self.dec8(self.mem);
                    bus.write8(self.regs.hl(), result);
                }
                _ => {}
            },
            Kind::IncRr(rr) => {
                // 16-bit inc/dec spend one internal cycle on the update.
                if self.stage == 1 {
                    let value = self.reg16(rr).wrapping_add(1);
                    self.set_reg16(rr, value);
                }
            }
            Kind::DecRr(rr) => {
                if self.stage == 1 {
                    let value = self.reg16(rr).wrapping_sub(1);
                    self.set_reg16(rr, value);
                }
            }
            Kind::AddHl(rr) => {
                if self.stage == 1 {
                    let value = self.reg16(rr);
                    self.alu_add_hl(value);
                }
            }
            Kind::Daa => self.alu_daa(),
            Kind::Cpl => {
                self.regs.a = !self.regs.a;
                self.set_flag(Flag::N, true);
                self.set_flag(Flag::H, true);
            }
            Kind::Scf => {
                self.set_flag(Flag::N, false);
                self.set_flag(Flag::H, false);
                self.set_flag(Flag::C, true);
            }
            Kind::Ccf => {
                let carry = self.get_flag(Flag::C);
                self.set_flag(Flag::N, false);
                self.set_flag(Flag::H, false);
                self.set_flag(Flag::C, !carry);
            }
            // The accumulator rotates clear Z unconditionally, unlike their
            // CB-prefixed counterparts.
            Kind::Rlca => {
                let result = self.rotate_left(self.regs.a, false);
                self.regs.a = result;
                self.set_flag(Flag::Z, false);
            }
            Kind::Rla => {
                let result = self.rotate_left(self.regs.a, true);
                self.regs.a = result;
                self.set_flag(Flag::Z, false);
            }
            Kind::Rrca => {
                let result = self.rotate_right(self.regs.a, false);
                self.regs.a = result;
                self.set_flag(Flag::Z, false);
            }
            Kind::Rra => {
                let result = self.rotate_right(self.regs.a, true);
                self.regs.a = result;
                self.set_flag(Flag::Z, false);
            }
            _ => unreachable!("non-ALU kind routed to step_alu"),
        }
    }

    fn alu_binop(&mut self, op: AluOp, value: u8) {
        match op {
            AluOp::Add => self.alu_add(value, false),
            AluOp::Adc => self.alu_add(value, true),
            AluOp::Sub => self.alu_sub(value, false),
            AluOp::Sbc => self.alu_sub(value, true),
            AluOp::And => self.alu_and(value),
            AluOp::Xor => self.alu_xor(value),
            AluOp::Or => self.alu_or(value),
            AluOp::Cp => self.alu_cp(value),
        }
    }

    /// INC: Z/H computed, N cleared, C preserved.
    pub(crate) fn inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, (value & 0x0F) == 0x0F);
        result
    }

    /// DEC: Z/H computed, N set, C preserved.
    pub(crate) fn dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, (value & 0x0F) == 0);
        result
    }

    /// Rotate left, optionally through carry; sets Z from the result.
    pub(crate) fn rotate_left(&mut self, value: u8, through_carry: bool) -> u8 {
        let carry_out = value & 0x80 != 0;
        let bit0 = if through_carry {
            self.get_flag(Flag::C) as u8
        } else {
            carry_out as u8
        };
        let result = (value << 1) | bit0;
        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::C, carry_out);
        result
    }

    /// Rotate right, optionally through carry; sets Z from the result.
    pub(crate) fn rotate_right(&mut self, value: u8, through_carry: bool) -> u8 {
        let carry_out = value & 0x01 != 0;
        let bit7 = if through_carry {
            self.get_flag(Flag::C) as u8
        } else {
            carry_out as u8
        };
        let result = (value >> 1) | (bit7 << 7);
        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::C, carry_out);
        result
    }
}
