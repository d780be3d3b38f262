use crate::cpu::opcodes::Kind;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn step_stack<B: Bus>(&mut self, bus: &mut B) {
        match self.instr.kind {
            Kind::Push(rr) => match self.stage {
                // Stage 1 is the internal pre-decrement delay.
                2 => {
                    let value = self.reg16(rr);
                    self.push_byte(bus, (value >> 8) as u8);
                }
                3 => {
                    let value = self.reg16(rr);
                    self.push_byte(bus, value as u8);
                }
                _ => {}
            },
            Kind::Pop(rr) => match self.stage {
                1 => {
                    let lo = self.pop_byte(bus);
                    self.imm = (self.imm & 0xFF00) | lo as u16;
                }
                2 => {
                    let hi = self.pop_byte(bus);
                    self.imm = ((hi as u16) << 8) | (self.imm & 0x00FF);
                    // set_reg16 masks the low nibble of F for POP AF.
                    let value = self.imm;
                    self.set_reg16(rr, value);
                }
                _ => {}
            },
            _ => unreachable!("non-stack kind routed to step_stack"),
        }
    }
}
