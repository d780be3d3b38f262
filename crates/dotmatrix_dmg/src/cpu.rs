pub mod opcodes;

mod interrupts;
mod step;

#[cfg(test)]
mod tests;

use anyhow::{bail, Result};

use crate::trace::TraceConfig;
use opcodes::{Cond, Instr, Kind, R16, R8, OPCODES};

/// Registers for the Game Boy CPU (SM83).
///
/// Eight 8-bit registers pairable into AF/BC/DE/HL, plus the 16-bit stack
/// pointer and program counter. The low nibble of F is not backed by
/// hardware and always reads as zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct Registers {
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}

impl Registers {
    #[inline]
    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.a, self.f & 0xF0])
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        let [a, f] = value.to_be_bytes();
        self.a = a;
        // Lower 4 bits of F are always zero.
        self.f = f & 0xF0;
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        let [b, c] = value.to_be_bytes();
        self.b = b;
        self.c = c;
    }

    #[inline]
    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        let [d, e] = value.to_be_bytes();
        self.d = d;
        self.e = e;
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        let [h, l] = value.to_be_bytes();
        self.h = h;
        self.l = l;
    }
}

/// Flag bits in the F register.
///
/// Layout (bit index in the byte, from MSB to LSB):
/// - bit 7: Z (zero)
/// - bit 6: N (subtract)
/// - bit 5: H (half carry)
/// - bit 4: C (carry)
/// - bits 0–3 are always zero.
#[derive(Clone, Copy, Debug)]
pub enum Flag {
    Z = 7,
    N = 6,
    H = 5,
    C = 4,
}

/// Abstraction over the memory bus seen by the CPU.
///
/// Every call corresponds to a bus access inside one machine cycle; the
/// CPU never performs more than one access per cycle.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);
}

/// SM83 CPU core driven one machine cycle at a time.
///
/// Instructions are executed as stage-indexed state machines: the decoder
/// resolves an opcode to a static [`Instr`] whose kind selects a per-stage
/// interpreter, and `step_mcycle` advances exactly one stage per call.
/// Interrupt dispatch is a second state machine interleaved at instruction
/// boundaries.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: Registers,
    /// Interrupt master enable latch.
    pub ime: bool,
    pub halted: bool,
    stopped: bool,
    /// One-shot flag set by HALT with IME=0 and a pending interrupt; the
    /// next fetch consumes it and skips the PC increment once.
    halt_bug: bool,
    /// Set by EI; IME goes high at the following fetch so interrupts are
    /// recognised only after one more instruction completes.
    ime_pending: bool,
    pub trace: TraceConfig,

    /// Metadata of the instruction currently in flight.
    instr: &'static Instr,
    /// Next stage index to execute; stage 0 is the fetch cycle.
    stage: u8,
    /// Number of stages for this execution (the not-taken prefix for
    /// conditional instructions whose condition failed).
    stage_count: u8,
    /// Condition outcome evaluated at fetch time.
    cond_taken: bool,
    /// Operand bytes read during stages (low byte first).
    imm: u16,
    /// Byte in flight between memory and registers across stages.
    mem: u8,

    dispatching: bool,
    dispatch_stage: u8,
    dispatch_len: u8,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
            ime: false,
            halted: false,
            stopped: false,
            halt_bug: false,
            ime_pending: false,
            trace: TraceConfig::default(),
            instr: &OPCODES[0x00],
            stage: 0,
            stage_count: 0,
            cond_taken: false,
            imm: 0,
            mem: 0,
            dispatching: false,
            dispatch_stage: 0,
            dispatch_len: 0,
        };
        cpu.apply_dmg_boot_state();
        cpu
    }

    /// Reset the CPU to the post-boot-ROM handoff state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Initialize registers to match the DMG boot ROM's state after it
    /// hands control to cartridge code at 0x0100 (per Pan Docs).
    fn apply_dmg_boot_state(&mut self) {
        self.regs.a = 0x01;
        self.regs.f = 0xB0;
        self.regs.b = 0x00;
        self.regs.c = 0x13;
        self.regs.d = 0x00;
        self.regs.e = 0xD8;
        self.regs.h = 0x01;
        self.regs.l = 0x4D;
        self.regs.sp = 0xFFFE;
        self.regs.pc = 0x0100;
        self.ime = false;
    }

    /// True when no instruction or interrupt entry is in flight, i.e. the
    /// next `step_mcycle` call will fetch.
    #[inline]
    pub fn is_idle(&self) -> bool {
        !self.dispatching && self.stage >= self.stage_count
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Leave STOP mode. Called by the machine when a button is pressed.
    pub(crate) fn wake_from_stop(&mut self) {
        if self.stopped {
            log::debug!("cpu: leaving STOP on joypad input");
            self.stopped = false;
        }
    }

    /// Execute one machine cycle.
    ///
    /// At an instruction boundary this checks for interrupt dispatch, then
    /// fetches and decodes; otherwise it runs the next stage of whatever is
    /// in flight. Exactly one machine cycle of work happens per call.
    /// Fetching an undefined opcode is a fatal error.
    pub fn step_mcycle<B: Bus>(&mut self, bus: &mut B) -> Result<()> {
        if self.dispatching {
            self.step_dispatch_mcycle(bus);
            return Ok(());
        }

        if self.stage >= self.stage_count {
            let pending = Self::pending_interrupts(bus);
            if pending != 0 {
                if self.halted {
                    self.halted = false;
                    if self.ime {
                        // Wake plus dispatch: six cycles in total.
                        self.begin_dispatch(6);
                        self.step_dispatch_mcycle(bus);
                    }
                    // IME off: wake only, one idle cycle before the next
                    // fetch. Pending bits stay latched in IF.
                    return Ok(());
                }
                if self.ime {
                    self.begin_dispatch(5);
                    self.step_dispatch_mcycle(bus);
                    return Ok(());
                }
                // IME off and not halted: interrupts sit in IF; fall
                // through to a normal fetch.
            } else if self.halted {
                return Ok(());
            }
            if self.stopped {
                return Ok(());
            }
            self.fetch(bus)?;
        }

        self.exec_stage(bus);
        self.stage += 1;
        Ok(())
    }

    /// Fetch and decode the next instruction, advancing PC.
    fn fetch<B: Bus>(&mut self, bus: &mut B) -> Result<()> {
        // EI takes effect here, after the instruction that followed it was
        // already committed to execute.
        if self.ime_pending {
            self.ime = true;
            self.ime_pending = false;
        }

        let pc = self.regs.pc;
        let opcode = bus.read8(pc);
        if self.halt_bug {
            // The byte is fetched but PC stays put, so it will be read
            // again as the start of the following instruction.
            self.halt_bug = false;
        } else {
            self.regs.pc = pc.wrapping_add(1);
        }

        // A 0xCB prefix decodes to a stub entry; the operand byte is
        // fetched on the next machine cycle.
        let instr: &'static Instr = &OPCODES[opcode as usize];

        if matches!(instr.kind, Kind::Illegal) {
            bail!("illegal opcode {opcode:#04X} at {pc:#06X}");
        }

        self.cond_taken = match instr.kind {
            Kind::Jr(cond) | Kind::Jp(cond) | Kind::Call(cond) | Kind::RetCond(cond) => {
                let taken = self.eval_cond(cond);
                if self.trace.flow && cond != Cond::Always {
                    log::trace!(
                        target: "dmg::flow",
                        "{pc:04X} {} {}",
                        instr.mnemonic,
                        if taken { "taken" } else { "not taken" },
                    );
                }
                taken
            }
            _ => true,
        };

        self.instr = instr;
        self.stage = 0;
        self.stage_count = if self.cond_taken {
            instr.mcycles
        } else {
            instr.mcycles_alt
        };
        self.imm = 0;
        self.mem = 0;

        if self.trace.cpu {
            log::trace!(
                target: "dmg::cpu",
                "{pc:04X} {:<12} af={:04X} bc={:04X} de={:04X} hl={:04X} sp={:04X}",
                instr.mnemonic,
                self.regs.af(),
                self.regs.bc(),
                self.regs.de(),
                self.regs.hl(),
                self.regs.sp,
            );
        }

        Ok(())
    }

    #[inline]
    fn eval_cond(&self, cond: Cond) -> bool {
        match cond {
            Cond::Always => true,
            Cond::NZ => !self.get_flag(Flag::Z),
            Cond::Z => self.get_flag(Flag::Z),
            Cond::NC => !self.get_flag(Flag::C),
            Cond::C => self.get_flag(Flag::C),
        }
    }

    #[inline]
    pub fn get_flag(&self, flag: Flag) -> bool {
        (self.regs.f & (1 << flag as u8)) != 0
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        if value {
            self.regs.f |= 1 << flag as u8;
        } else {
            self.regs.f &= !(1 << flag as u8);
        }
    }

    #[inline]
    pub fn clear_flags(&mut self) {
        self.regs.f = 0;
    }

    #[inline]
    pub(crate) fn reg8(&self, r: R8) -> u8 {
        match r {
            R8::A => self.regs.a,
            R8::B => self.regs.b,
            R8::C => self.regs.c,
            R8::D => self.regs.d,
            R8::E => self.regs.e,
            R8::H => self.regs.h,
            R8::L => self.regs.l,
        }
    }

    #[inline]
    pub(crate) fn set_reg8(&mut self, r: R8, value: u8) {
        match r {
            R8::A => self.regs.a = value,
            R8::B => self.regs.b = value,
            R8::C => self.regs.c = value,
            R8::D => self.regs.d = value,
            R8::E => self.regs.e = value,
            R8::H => self.regs.h = value,
            R8::L => self.regs.l = value,
        }
    }

    #[inline]
    pub(crate) fn reg16(&self, r: R16) -> u16 {
        match r {
            R16::AF => self.regs.af(),
            R16::BC => self.regs.bc(),
            R16::DE => self.regs.de(),
            R16::HL => self.regs.hl(),
            R16::SP => self.regs.sp,
        }
    }

    #[inline]
    pub(crate) fn set_reg16(&mut self, r: R16, value: u16) {
        match r {
            R16::AF => self.regs.set_af(value),
            R16::BC => self.regs.set_bc(value),
            R16::DE => self.regs.set_de(value),
            R16::HL => self.regs.set_hl(value),
            R16::SP => self.regs.sp = value,
        }
    }

    // --- ALU ---

    /// Core 8-bit ADD/ADC operation on A.
    ///
    /// `use_carry` selects between ADD (false) and ADC (true); the half and
    /// full carries incorporate the carry-in so ADC reports a carry from
    /// either addition step.
    pub(crate) fn alu_add(&mut self, value: u8, use_carry: bool) {
        let a = self.regs.a;
        let carry_in = (use_carry && self.get_flag(Flag::C)) as u8;

        let half = (a & 0x0F) + (value & 0x0F) + carry_in;
        let full = a as u16 + value as u16 + carry_in as u16;
        let result = full as u8;

        self.regs.a = result;
        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::H, half > 0x0F);
        self.set_flag(Flag::C, full > 0xFF);
    }

    /// Core 8-bit SUB/SBC operation on A.
    pub(crate) fn alu_sub(&mut self, value: u8, use_carry: bool) {
        let a = self.regs.a;
        let carry_in = (use_carry && self.get_flag(Flag::C)) as i16;

        let half = (a & 0x0F) as i16 - (value & 0x0F) as i16 - carry_in;
        let full = a as i16 - value as i16 - carry_in;
        let result = full as u8;

        self.regs.a = result;
        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, half < 0);
        self.set_flag(Flag::C, full < 0);
    }

    #[inline]
    pub(crate) fn alu_and(&mut self, value: u8) {
        let result = self.regs.a & value;
        self.regs.a = result;
        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::H, true);
    }

    #[inline]
    pub(crate) fn alu_or(&mut self, value: u8) {
        let result = self.regs.a | value;
        self.regs.a = result;
        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
    }

    #[inline]
    pub(crate) fn alu_xor(&mut self, value: u8) {
        let result = self.regs.a ^ value;
        self.regs.a = result;
        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
    }

    /// Compare A with `value`: flags as for SUB, A unchanged.
    #[inline]
    pub(crate) fn alu_cp(&mut self, value: u8) {
        let a = self.regs.a;
        self.clear_flags();
        self.set_flag(Flag::Z, a == value);
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, (a & 0x0F) < (value & 0x0F));
        self.set_flag(Flag::C, a < value);
    }

    /// Decimal adjust A after BCD addition/subtraction.
    pub(crate) fn alu_daa(&mut self) {
        let mut a = self.regs.a;
        let mut carry = self.get_flag(Flag::C);

        if !self.get_flag(Flag::N) {
            if carry || a > 0x99 {
                a = a.wrapping_add(0x60);
                carry = true;
            }
            if self.get_flag(Flag::H) || (a & 0x0F) > 0x09 {
                a = a.wrapping_add(0x06);
            }
        } else {
            if carry {
                a = a.wrapping_sub(0x60);
            }
            if self.get_flag(Flag::H) {
                a = a.wrapping_sub(0x06);
            }
        }

        self.regs.a = a;
        self.set_flag(Flag::Z, a == 0);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, carry);
    }

    /// 16-bit ADD HL,rr. H comes from bit 11, C from bit 15, Z preserved.
    pub(crate) fn alu_add_hl(&mut self, value: u16) {
        let hl = self.regs.hl();
        let (result, carry) = hl.overflowing_add(value);
        self.regs.set_hl(result);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
        self.set_flag(Flag::C, carry);
    }

    /// SP plus signed offset, used by ADD SP,r8 and LD HL,SP+r8.
    ///
    /// Flags come from the unsigned low byte of SP and the unsigned
    /// immediate; Z and N are always cleared.
    pub(crate) fn alu_sp_offset(&mut self, offset: u8) -> u16 {
        let sp = self.regs.sp;
        let result = sp.wrapping_add(offset as i8 as i16 as u16);
        self.clear_flags();
        self.set_flag(Flag::H, (sp & 0x0F) + (offset as u16 & 0x0F) > 0x0F);
        self.set_flag(Flag::C, (sp & 0xFF) + offset as u16 > 0xFF);
        result
    }
}
