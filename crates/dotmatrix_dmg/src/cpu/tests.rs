use super::opcodes::{CB_OPCODES, OPCODES};
use super::*;

/// Flat 64 KiB bus with the program placed at the reset handoff
/// address 0x0100.
struct TestBus {
    mem: [u8; 0x10000],
}

impl TestBus {
    fn new(program: &[u8]) -> Self {
        let mut mem = [0u8; 0x10000];
        mem[0x0100..0x0100 + program.len()].copy_from_slice(program);
        Self { mem }
    }
}

impl Bus for TestBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.mem[usize::from(addr)]
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.mem[usize::from(addr)] = value;
    }
}

/// Steps until the CPU reaches the next instruction boundary and
/// returns the number of machine cycles that took.
fn step_instr(cpu: &mut Cpu, bus: &mut TestBus) -> u32 {
    let mut cycles = 0;
    loop {
        cpu.step_mcycle(bus).unwrap();
        cycles += 1;
        if cpu.is_idle() {
            return cycles;
        }
    }
}

const Z: u8 = 0x80;
const N: u8 = 0x40;
const H: u8 = 0x20;
const C: u8 = 0x10;

#[test]
fn boot_handoff_register_state() {
    let cpu = Cpu::new();
    assert_eq!(cpu.regs.af(), 0x01B0);
    assert_eq!(cpu.regs.bc(), 0x0013);
    assert_eq!(cpu.regs.de(), 0x00D8);
    assert_eq!(cpu.regs.hl(), 0x014D);
    assert_eq!(cpu.regs.sp, 0xFFFE);
    assert_eq!(cpu.regs.pc, 0x0100);
    assert!(!cpu.ime);
}

#[test]
fn f_low_nibble_is_never_set() {
    let mut regs = Registers::default();
    regs.set_af(0x12FF);
    assert_eq!(regs.af(), 0x12F0);
}

#[test]
fn ld_r_imm() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0x3E, 0x42]);
    assert_eq!(step_instr(&mut cpu, &mut bus), 2);
    assert_eq!(cpu.regs.a, 0x42);
    assert_eq!(cpu.regs.pc, 0x0102);
}

#[test]
fn add_a_a_overflow_flags() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0x87, 0x8F]); // ADD A,A; ADC A,A
    cpu.regs.a = 0x80;
    cpu.regs.f = 0;

    step_instr(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(cpu.regs.f, Z | C);

    // ADC picks up the carry: 0 + 0 + 1.
    step_instr(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x01);
    assert_eq!(cpu.regs.f, 0x00);
}

#[test]
fn sub_and_cp_flags() {
    let mut cpu = Cpu::new();
    cpu.regs.a = 0x3E;
    cpu.alu_sub(0x0F, false);
    assert_eq!(cpu.regs.a, 0x2F);
    assert_eq!(cpu.regs.f, N | H);

    cpu.regs.a = 0x10;
    cpu.alu_cp(0x20);
    assert_eq!(cpu.regs.a, 0x10);
    assert_eq!(cpu.regs.f, N | C);
}

#[test]
fn daa_after_bcd_addition() {
    let mut cpu = Cpu::new();
    cpu.regs.a = 0x15;
    cpu.regs.f = 0;
    cpu.alu_add(0x27, false);
    assert_eq!(cpu.regs.a, 0x3C);
    cpu.alu_daa();
    assert_eq!(cpu.regs.a, 0x42);
    assert!(!cpu.get_flag(Flag::C));

    // 0x99 + 0x01 = BCD 100: carry out.
    cpu.regs.a = 0x99;
    cpu.regs.f = 0;
    cpu.alu_add(0x01, false);
    cpu.alu_daa();
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.get_flag(Flag::Z));
    assert!(cpu.get_flag(Flag::C));
}

#[test]
fn inc_dec_preserve_carry() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0x3C, 0x3D]); // INC A; DEC A
    cpu.regs.a = 0xFF;
    cpu.regs.f = C;

    step_instr(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(cpu.regs.f, Z | H | C);

    step_instr(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0xFF);
    assert_eq!(cpu.regs.f, N | H | C);
}

#[test]
fn ld_hl_post_increment_and_decrement() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0x22, 0x3A]); // LD (HL+),A; LD A,(HL-)
    cpu.regs.set_hl(0xC000);
    cpu.regs.a = 0x55;
    bus.mem[0xC001] = 0x77;

    assert_eq!(step_instr(&mut cpu, &mut bus), 2);
    assert_eq!(bus.mem[0xC000], 0x55);
    assert_eq!(cpu.regs.hl(), 0xC001);

    assert_eq!(step_instr(&mut cpu, &mut bus), 2);
    assert_eq!(cpu.regs.a, 0x77);
    assert_eq!(cpu.regs.hl(), 0xC000);
}

#[test]
fn pop_af_masks_flag_low_nibble() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0xF1]); // POP AF
    cpu.regs.sp = 0xC000;
    bus.mem[0xC000] = 0xFF;
    bus.mem[0xC001] = 0x12;

    assert_eq!(step_instr(&mut cpu, &mut bus), 3);
    assert_eq!(cpu.regs.a, 0x12);
    assert_eq!(cpu.regs.f, 0xF0);
    assert_eq!(cpu.regs.sp, 0xC002);
}

#[test]
fn push_writes_high_byte_first() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0xC5]); // PUSH BC
    cpu.regs.set_bc(0x1234);
    cpu.regs.sp = 0xC002;

    assert_eq!(step_instr(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.sp, 0xC000);
    assert_eq!(bus.mem[0xC001], 0x12);
    assert_eq!(bus.mem[0xC000], 0x34);
}

#[test]
fn jr_conditional_timing() {
    // JR NZ,+5 with Z set: fall through in 2 cycles.
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0x20, 0x05]);
    cpu.regs.f = Z;
    assert_eq!(step_instr(&mut cpu, &mut bus), 2);
    assert_eq!(cpu.regs.pc, 0x0102);

    // Same instruction with Z clear: taken in 3 cycles.
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0x20, 0x05]);
    cpu.regs.f = 0;
    assert_eq!(step_instr(&mut cpu, &mut bus), 3);
    assert_eq!(cpu.regs.pc, 0x0107);
}

#[test]
fn jr_backward_offset() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0x18, 0xFE]); // JR -2
    assert_eq!(step_instr(&mut cpu, &mut bus), 3);
    assert_eq!(cpu.regs.pc, 0x0100);
}

#[test]
fn call_and_ret() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0xCD, 0x00, 0x02]); // CALL 0x0200
    bus.mem[0x0200] = 0xC9; // RET

    assert_eq!(step_instr(&mut cpu, &mut bus), 6);
    assert_eq!(cpu.regs.pc, 0x0200);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(bus.mem[0xFFFD], 0x01);
    assert_eq!(bus.mem[0xFFFC], 0x03);

    assert_eq!(step_instr(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0103);
    assert_eq!(cpu.regs.sp, 0xFFFE);
}

#[test]
fn ret_conditional_timing() {
    // RET NZ not taken: 2 cycles.
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0xC0]);
    cpu.regs.f = Z;
    assert_eq!(step_instr(&mut cpu, &mut bus), 2);
    assert_eq!(cpu.regs.pc, 0x0101);

    // Taken: 5 cycles.
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0xC0]);
    cpu.regs.f = 0;
    cpu.regs.sp = 0xC000;
    bus.mem[0xC000] = 0x34;
    bus.mem[0xC001] = 0x12;
    assert_eq!(step_instr(&mut cpu, &mut bus), 5);
    assert_eq!(cpu.regs.pc, 0x1234);
}

#[test]
fn jp_hl_is_a_single_cycle() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0xE9]);
    cpu.regs.set_hl(0x4000);
    assert_eq!(step_instr(&mut cpu, &mut bus), 1);
    assert_eq!(cpu.regs.pc, 0x4000);
}

#[test]
fn rst_vectors() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0xFF]); // RST 0x38
    assert_eq!(step_instr(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0038);
    assert_eq!(bus.mem[0xFFFD], 0x01);
    assert_eq!(bus.mem[0xFFFC], 0x01);
}

#[test]
fn ld_a16_sp_timing() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0x08, 0x00, 0xC0]); // LD (0xC000),SP
    cpu.regs.sp = 0xBEEF;
    assert_eq!(step_instr(&mut cpu, &mut bus), 5);
    assert_eq!(bus.mem[0xC000], 0xEF);
    assert_eq!(bus.mem[0xC001], 0xBE);
}

#[test]
fn add_sp_signed_offset_flags() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0xE8, 0xFF]); // ADD SP,-1
    assert_eq!(step_instr(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.sp, 0xFFFD);
    // Flags from the unsigned low-byte addition 0xFE + 0xFF.
    assert_eq!(cpu.regs.f, H | C);
}

#[test]
fn ld_hl_sp_offset() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0xF8, 0x02]); // LD HL,SP+2
    cpu.regs.sp = 0xC0FF;
    assert_eq!(step_instr(&mut cpu, &mut bus), 3);
    assert_eq!(cpu.regs.hl(), 0xC101);
    assert_eq!(cpu.regs.sp, 0xC0FF);
    assert!(cpu.get_flag(Flag::H));
    assert!(cpu.get_flag(Flag::C));
}

#[test]
fn add_hl_keeps_zero_flag() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0x09]); // ADD HL,BC
    cpu.regs.set_hl(0x0FFF);
    cpu.regs.set_bc(0x0001);
    cpu.regs.f = Z;
    assert_eq!(step_instr(&mut cpu, &mut bus), 2);
    assert_eq!(cpu.regs.hl(), 0x1000);
    assert_eq!(cpu.regs.f, Z | H);
}

#[test]
fn rlca_always_clears_zero() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0x07]);
    cpu.regs.a = 0x85;
    cpu.regs.f = Z;
    step_instr(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x0B);
    assert_eq!(cpu.regs.f, C);
}

#[test]
fn cb_swap_register() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0xCB, 0x37]); // SWAP A
    cpu.regs.a = 0xF1;
    assert_eq!(step_instr(&mut cpu, &mut bus), 2);
    assert_eq!(cpu.regs.a, 0x1F);
    assert_eq!(cpu.regs.f, 0);
}

#[test]
fn cb_bit_hl_timing() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0xCB, 0x46]); // BIT 0,(HL)
    cpu.regs.set_hl(0xC000);
    cpu.regs.f = 0;
    bus.mem[0xC000] = 0xFE;
    assert_eq!(step_instr(&mut cpu, &mut bus), 3);
    assert_eq!(cpu.regs.f, Z | H);
}

#[test]
fn cb_set_hl_timing() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0xCB, 0xC6]); // SET 0,(HL)
    cpu.regs.set_hl(0xC000);
    assert_eq!(step_instr(&mut cpu, &mut bus), 4);
    assert_eq!(bus.mem[0xC000], 0x01);
}

#[test]
fn cb_instructions_make_one_bus_access_per_cycle() {
    // Counts data accesses only; interrupt-line polling at the
    // instruction boundary is not a memory cycle.
    struct CountingBus {
        mem: [u8; 0x10000],
        accesses: u32,
    }

    impl Bus for CountingBus {
        fn read8(&mut self, addr: u16) -> u8 {
            if addr != 0xFF0F && addr != 0xFFFF {
                self.accesses += 1;
            }
            self.mem[usize::from(addr)]
        }

        fn write8(&mut self, addr: u16, value: u8) {
            self.accesses += 1;
            self.mem[usize::from(addr)] = value;
        }
    }

    let mut bus = CountingBus {
        mem: [0; 0x10000],
        accesses: 0,
    };
    bus.mem[0x0100..0x0102].copy_from_slice(&[0xCB, 0xC6]); // SET 0,(HL)
    let mut cpu = Cpu::new();
    cpu.regs.set_hl(0xC000);

    // Prefix fetch, operand fetch, read, write: one access each.
    for cycle in 0..4 {
        let before = bus.accesses;
        cpu.step_mcycle(&mut bus).unwrap();
        assert_eq!(bus.accesses - before, 1, "cycle {cycle}");
    }
    assert!(cpu.is_idle());
    assert_eq!(bus.mem[0xC000], 0x01);
}

#[test]
fn cb_srl_sets_carry_from_bit0() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0xCB, 0x3F]); // SRL A
    cpu.regs.a = 0x01;
    step_instr(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(cpu.regs.f, Z | C);
}

#[test]
fn ei_takes_effect_after_one_instruction() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0xFB, 0x00, 0x00]); // EI; NOP; NOP
    bus.mem[0xFF0F] = 0x01;
    bus.mem[0xFFFF] = 0x01;

    step_instr(&mut cpu, &mut bus); // EI
    assert!(!cpu.ime);

    step_instr(&mut cpu, &mut bus); // NOP, IME rises at its fetch
    assert!(cpu.ime);
    assert_eq!(cpu.regs.pc, 0x0102);

    // The next boundary dispatches instead of fetching.
    let cycles = step_instr(&mut cpu, &mut bus);
    assert_eq!(cycles, 5);
    assert_eq!(cpu.regs.pc, 0x0040);
    assert!(!cpu.ime);
    assert_eq!(bus.mem[0xFF0F] & 0x01, 0);
}

#[test]
fn interrupt_dispatch_pushes_pc_and_jumps() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0x00]);
    cpu.ime = true;
    bus.mem[0xFF0F] = 0x04; // timer
    bus.mem[0xFFFF] = 0x04;

    assert_eq!(step_instr(&mut cpu, &mut bus), 5);
    assert_eq!(cpu.regs.pc, 0x0050);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(bus.mem[0xFFFD], 0x01);
    assert_eq!(bus.mem[0xFFFC], 0x00);
    assert_eq!(bus.mem[0xFF0F], 0x00);
}

#[test]
fn interrupt_priority_is_lowest_bit() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0x00]);
    cpu.ime = true;
    bus.mem[0xFF0F] = 0x1F;
    bus.mem[0xFFFF] = 0x1F;

    step_instr(&mut cpu, &mut bus);
    // VBlank wins; the other bits stay latched.
    assert_eq!(cpu.regs.pc, 0x0040);
    assert_eq!(bus.mem[0xFF0F], 0x1E);
}

#[test]
fn dispatch_cancelled_when_push_clobbers_ie() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0x00]);
    cpu.ime = true;
    cpu.regs.pc = 0x0200;
    // Pushing the PC high byte lands on IE itself and disables the
    // only pending source.
    cpu.regs.sp = 0x0000;
    bus.mem[0xFF0F] = 0x01;
    bus.mem[0xFFFF] = 0x01;

    assert_eq!(step_instr(&mut cpu, &mut bus), 5);
    assert_eq!(cpu.regs.pc, 0x0000);
    assert!(!cpu.ime);
    assert_eq!(bus.mem[0xFFFF], 0x02);
}

#[test]
fn halt_wakes_without_dispatch_when_ime_clear() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0x76, 0x3C]); // HALT; INC A
    step_instr(&mut cpu, &mut bus);
    assert!(cpu.halted);

    // Stays asleep with nothing pending.
    cpu.step_mcycle(&mut bus).unwrap();
    assert!(cpu.halted);
    assert_eq!(cpu.regs.pc, 0x0101);

    bus.mem[0xFF0F] = 0x01;
    bus.mem[0xFFFF] = 0x01;
    cpu.step_mcycle(&mut bus).unwrap(); // wake cycle
    assert!(!cpu.halted);
    step_instr(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x02);
    // IF stays latched.
    assert_eq!(bus.mem[0xFF0F], 0x01);
}

#[test]
fn halted_dispatch_takes_six_cycles() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0xFB, 0x00, 0x76]); // EI; NOP; HALT
    step_instr(&mut cpu, &mut bus);
    step_instr(&mut cpu, &mut bus);
    step_instr(&mut cpu, &mut bus);
    assert!(cpu.halted);

    bus.mem[0xFF0F] = 0x01;
    bus.mem[0xFFFF] = 0x01;
    assert_eq!(step_instr(&mut cpu, &mut bus), 6);
    assert_eq!(cpu.regs.pc, 0x0040);
}

#[test]
fn halt_bug_repeats_following_byte() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0x76, 0x3C]); // HALT; INC A
    bus.mem[0xFF0F] = 0x01;
    bus.mem[0xFFFF] = 0x01;

    step_instr(&mut cpu, &mut bus); // HALT: bug armed, no sleep
    assert!(!cpu.halted);
    step_instr(&mut cpu, &mut bus); // INC A, PC not advanced
    step_instr(&mut cpu, &mut bus); // INC A again
    assert_eq!(cpu.regs.a, 0x03);
    assert_eq!(cpu.regs.pc, 0x0102);
}

#[test]
fn reti_restores_ime_immediately() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0xD9]); // RETI
    cpu.regs.sp = 0xC000;
    bus.mem[0xC000] = 0x00;
    bus.mem[0xC001] = 0x02;
    assert_eq!(step_instr(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0200);
    assert!(cpu.ime);
}

#[test]
fn stop_freezes_until_woken() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0x10, 0x00, 0x3C]); // STOP; (pad); INC A
    step_instr(&mut cpu, &mut bus);
    assert!(cpu.is_stopped());

    let pc = cpu.regs.pc;
    for _ in 0..8 {
        cpu.step_mcycle(&mut bus).unwrap();
    }
    assert_eq!(cpu.regs.pc, pc);

    cpu.wake_from_stop();
    step_instr(&mut cpu, &mut bus);
    assert!(cpu.regs.pc > pc);
}

#[test]
fn illegal_opcode_is_fatal() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new(&[0xD3]);
    let err = cpu.step_mcycle(&mut bus).unwrap_err();
    assert!(err.to_string().contains("illegal opcode"));
}

#[test]
fn opcode_table_lengths_are_consistent() {
    // Every non-CB instruction's operand count matches its length.
    for (op, instr) in OPCODES.iter().enumerate() {
        assert!(
            (1..=3).contains(&instr.length),
            "opcode {op:#04X} has length {}",
            instr.length
        );
        assert!(
            instr.mcycles >= instr.mcycles_alt,
            "opcode {op:#04X} not-taken count exceeds taken count"
        );
        assert!(instr.mcycles_alt >= 1, "opcode {op:#04X} has zero cycles");
    }
    for (op, instr) in CB_OPCODES.iter().enumerate() {
        assert_eq!(instr.length, 2, "CB opcode {op:#04X}");
        assert_eq!(instr.mcycles, instr.mcycles_alt, "CB opcode {op:#04X}");
    }
}
