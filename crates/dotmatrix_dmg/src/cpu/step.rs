//! Per-machine-cycle interpretation of decoded instructions.
//!
//! Stage 0 of every instruction is the fetch cycle; work that needs no bus
//! access may happen there. Each later stage performs at most one memory
//! access, so the stage index of a memory step is exactly its M-cycle
//! position within the instruction.

mod alu;
mod cb;
mod control;
mod ld;
mod stack;
mod system;

use super::opcodes::{Ind, Kind};
use super::{Bus, Cpu};

impl Cpu {
    /// Run the stage `self.stage` of the instruction in flight.
    pub(super) fn exec_stage<B: Bus>(&mut self, bus: &mut B) {
        match self.instr.kind {
            Kind::Nop => {}
            Kind::Stop | Kind::Halt | Kind::Di | Kind::Ei => self.step_system(bus),

            Kind::LdRR(..)
            | Kind::LdRImm(_)
            | Kind::LdRInd(..)
            | Kind::LdIndR(..)
            | Kind::LdIndImm
            | Kind::LdAA16
            | Kind::LdA16A
            | Kind::LdhAC
            | Kind::LdhCA
            | Kind::LdhAImm
            | Kind::LdhImmA
            | Kind::LdRrImm(_)
            | Kind::LdA16Sp
            | Kind::LdSpHl
            | Kind::LdHlSpOff
            | Kind::AddSpOff => self.step_ld(bus),

            Kind::Push(_) | Kind::Pop(_) => self.step_stack(bus),

            Kind::Alu(..)
            | Kind::AluHl(_)
            | Kind::AluImm(_)
            | Kind::IncR(_)
            | Kind::DecR(_)
            | Kind::IncHlInd
            | Kind::DecHlInd
            | Kind::IncRr(_)
            | Kind::DecRr(_)
            | Kind::AddHl(_)
            | Kind::Daa
            | Kind::Cpl
            | Kind::Scf
            | Kind::Ccf
            | Kind::Rlca
            | Kind::Rla
            | Kind::Rrca
            | Kind::Rra => self.step_alu(bus),

            Kind::Jr(_)
            | Kind::Jp(_)
            | Kind::JpHl
            | Kind::Call(_)
            | Kind::Ret
            | Kind::RetCond(_)
            | Kind::Reti
            | Kind::Rst(_) => self.step_control(bus),

            Kind::CbPrefix | Kind::Cb(..) | Kind::CbHl(_) => self.step_cb(bus),

            // Illegal opcodes never survive fetch.
            Kind::Illegal => unreachable!("illegal opcode dispatched"),
        }
    }

    /// Read one operand byte at PC, latching it into the low or high half
    /// of the immediate scratch word.
    #[inline]
    pub(super) fn read_imm_lo<B: Bus>(&mut self, bus: &mut B) {
        let lo = bus.read8(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        self.imm = (self.imm & 0xFF00) | lo as u16;
    }

    #[inline]
    pub(super) fn read_imm_hi<B: Bus>(&mut self, bus: &mut B) {
        let hi = bus.read8(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        self.imm = ((hi as u16) << 8) | (self.imm & 0x00FF);
    }

    /// Resolve an indirection target, applying the HL post-increment or
    /// post-decrement side effect.
    #[inline]
    pub(super) fn ind_addr(&mut self, ind: Ind) -> u16 {
        match ind {
            Ind::BC => self.regs.bc(),
            Ind::DE => self.regs.de(),
            Ind::HL => self.regs.hl(),
            Ind::HLI => {
                let addr = self.regs.hl();
                self.regs.set_hl(addr.wrapping_add(1));
                addr
            }
            Ind::HLD => {
                let addr = self.regs.hl();
                self.regs.set_hl(addr.wrapping_sub(1));
                addr
            }
        }
    }

    /// Push one byte onto the stack (SP pre-decrement).
    #[inline]
    pub(super) fn push_byte<B: Bus>(&mut self, bus: &mut B, value: u8) {
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, value);
    }

    /// Pop one byte off the stack (SP post-increment).
    #[inline]
    pub(super) fn pop_byte<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read8(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        value
    }
}
