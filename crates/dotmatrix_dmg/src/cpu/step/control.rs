use crate::cpu::opcodes::Kind;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn step_control<B: Bus>(&mut self, bus: &mut B) {
        match self.instr.kind {
            Kind::Jr(_) => match self.stage {
                1 => self.read_imm_lo(bus),
                // Only reached when taken; the not-taken prefix ends at
                // stage 1.
                2 => {
                    let offset = self.imm as u8 as i8;
                    let target = self.regs.pc.wrapping_add(offset as i16 as u16);
                    self.trace_jump("jr", target);
                    self.regs.pc = target;
                }
                _ => {}
            },
            Kind::Jp(_) => match self.stage {
                1 => self.read_imm_lo(bus),
                2 => self.read_imm_hi(bus),
                3 => {
                    self.trace_jump("jp", self.imm);
                    self.regs.pc = self.imm;
                }
                _ => {}
            },
            Kind::JpHl => {
                let target = self.regs.hl();
                self.trace_jump("jp hl", target);
                self.regs.pc = target;
            }
            Kind::Call(_) => match self.stage {
                1 => self.read_imm_lo(bus),
                2 => self.read_imm_hi(bus),
                // Stage 3 is the internal delay before the stack writes.
                4 => {
                    let ret = self.regs.pc;
                    self.push_byte(bus, (ret >> 8) as u8);
                }
                5 => {
                    let ret = self.regs.pc;
                    self.push_byte(bus, ret as u8);
                    self.trace_jump("call", self.imm);
                    self.regs.pc = self.imm;
                }
                _ => {}
            },
            Kind::Ret | Kind::Reti => match self.stage {
                1 => {
                    let lo = self.pop_byte(bus);
                    self.imm = (self.imm & 0xFF00) | lo as u16;
                }
                2 => {
                    let hi = self.pop_byte(bus);
                    self.imm = ((hi as u16) << 8) | (self.imm & 0x00FF);
                }
                3 => {
                    self.trace_jump("ret", self.imm);
                    self.regs.pc = self.imm;
                    if matches!(self.instr.kind, Kind::Reti) {
                        // RETI restores IME without the EI delay.
                        self.ime = true;
                    }
                }
                _ => {}
            },
            Kind::RetCond(_) => match self.stage {
                // Stage 1 is the condition-evaluation delay cycle.
                2 => {
                    let lo = self.pop_byte(bus);
                    self.imm = (self.imm & 0xFF00) | lo as u16;
                }
                3 => {
                    let hi = self.pop_byte(bus);
                    self.imm = ((hi as u16) << 8) | (self.imm & 0x00FF);
                }
                4 => {
                    self.trace_jump("ret", self.imm);
                    self.regs.pc = self.imm;
                }
                _ => {}
            },
            Kind::Rst(vector) => match self.stage {
                // Stage 1 is an internal delay.
                2 => {
                    let ret = self.regs.pc;
                    self.push_byte(bus, (ret >> 8) as u8);
                }
                3 => {
                    let ret = self.regs.pc;
                    self.push_byte(bus, ret as u8);
                    self.trace_jump("rst", vector as u16);
                    self.regs.pc = vector as u16;
                }
                _ => {}
            },
            _ => unreachable!("non-control kind routed to step_control"),
        }
    }

    #[inline]
    fn trace_jump(&self, what: &str, target: u16) {
        if self.trace.jumps {
            log::trace!(target: "dmg::jump", "{what} -> {target:04X}");
        }
    }
}
