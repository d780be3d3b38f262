use crate::cpu::opcodes::Kind;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn step_ld<B: Bus>(&mut self, bus: &mut B) {
        match self.instr.kind {
            Kind::LdRR(dst, src) => {
                // Stage 0 only; pure register move.
                let value = self.reg8(src);
                self.set_reg8(dst, value);
            }
            Kind::LdRImm(dst) => {
                if self.stage == 1 {
                    let value = bus.read8(self.regs.pc);
                    self.regs.pc = self.regs.pc.wrapping_add(1);
                    self.set_reg8(dst, value);
                }
            }
            Kind::LdRInd(dst, ind) => {
                if self.stage == 1 {
                    let addr = self.ind_addr(ind);
                    let value = bus.read8(addr);
                    self.set_reg8(dst, value);
                }
            }
            Kind::LdIndR(ind, src) => {
                if self.stage == 1 {
                    let addr = self.ind_addr(ind);
                    let value = self.reg8(src);
                    bus.write8(addr, value);
                }
            }
            Kind::LdIndImm => match self.stage {
                1 => {
                    let value = bus.read8(self.regs.pc);
                    self.regs.pc = self.regs.pc.wrapping_add(1);
                    self.mem = value;
                }
                2 => bus.write8(self.regs.hl(), self.mem),
                _ => {}
            },
            Kind::LdAA16 => match self.stage {
                1 => self.read_imm_lo(bus),
                2 => self.read_imm_hi(bus),
                3 => self.regs.a = bus.read8(self.imm),
                _ => {}
            },
            Kind::LdA16A => match self.stage {
                1 => self.read_imm_lo(bus),
                2 => self.read_imm_hi(bus),
                3 => bus.write8(self.imm, self.regs.a),
                _ => {}
            },
            Kind::LdhAC => {
                if self.stage == 1 {
                    let addr = 0xFF00 | self.regs.c as u16;
                    self.regs.a = bus.read8(addr);
                }
            }
            Kind::LdhCA => {
                if self.stage == 1 {
                    let addr = 0xFF00 | self.regs.c as u16;
                    bus.write8(addr, self.regs.a);
                }
            }
            Kind::LdhAImm => match self.stage {
                1 => self.read_imm_lo(bus),
                2 => {
                    let addr = 0xFF00 | (self.imm & 0x00FF);
                    self.regs.a = bus.read8(addr);
                }
                _ => {}
            },
            Kind::LdhImmA => match self.stage {
                1 => self.read_imm_lo(bus),
                2 => {
                    let addr = 0xFF00 | (self.imm & 0x00FF);
                    bus.write8(addr, self.regs.a);
                }
                _ => {}
            },
            Kind::LdRrImm(rr) => match self.stage {
                1 => self.read_imm_lo(bus),
                2 => {
                    self.read_imm_hi(bus);
                    let value = self.imm;
                    self.set_reg16(rr, value);
                }
                _ => {}
            },
            Kind::LdA16Sp => match self.stage {
                1 => self.read_imm_lo(bus),
                2 => self.read_imm_hi(bus),
                3 => bus.write8(self.imm, self.regs.sp as u8),
                4 => bus.write8(self.imm.wrapping_add(1), (self.regs.sp >> 8) as u8),
                _ => {}
            },
            Kind::LdSpHl => {
                // The transfer occupies the internal cycle after fetch.
                if self.stage == 1 {
                    self.regs.sp = self.regs.hl();
                }
            }
            Kind::LdHlSpOff => match self.stage {
                1 => self.read_imm_lo(bus),
                2 => {
                    let result = self.alu_sp_offset(self.imm as u8);
                    self.regs.set_hl(result);
                }
                _ => {}
            },
            Kind::AddSpOff => match self.stage {
                1 => self.read_imm_lo(bus),
                // Two internal delay cycles; SP is updated in the last one.
                3 => {
                    let result = self.alu_sp_offset(self.imm as u8);
                    self.regs.sp = result;
                }
                _ => {}
            },
            _ => unreachable!("non-load kind routed to step_ld"),
        }
    }
}
