//! Static instruction metadata for the 256 primary and 256 CB-prefixed
//! opcodes: mnemonic, byte length, machine-cycle counts, and the kind tag
//! the micro-sequencer interprets stage by stage.
//!
//! Conditional instructions carry two cycle counts; the sequencer runs the
//! not-taken prefix when the condition fails. The eleven holes in the
//! primary map are tagged [`Kind::Illegal`] and abort execution.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum R8 {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum R16 {
    AF,
    BC,
    DE,
    HL,
    SP,
}

/// Memory indirection targets; HLI/HLD post-increment/-decrement HL.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ind {
    BC,
    DE,
    HL,
    HLI,
    HLD,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cond {
    Always,
    NZ,
    Z,
    NC,
    C,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

/// CB-prefixed operation families. BIT/RES/SET carry the bit index.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CbOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
    Bit(u8),
    Res(u8),
    Set(u8),
}

/// Decoded instruction shape interpreted by the per-stage sequencer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    Nop,
    Stop,
    Halt,
    Di,
    Ei,
    Illegal,

    LdRR(R8, R8),
    LdRImm(R8),
    LdRInd(R8, Ind),
    LdIndR(Ind, R8),
    /// LD (HL),d8
    LdIndImm,
    /// LD A,(a16)
    LdAA16,
    /// LD (a16),A
    LdA16A,
    /// LD A,(FF00+C)
    LdhAC,
    /// LD (FF00+C),A
    LdhCA,
    /// LDH A,(a8)
    LdhAImm,
    /// LDH (a8),A
    LdhImmA,
    LdRrImm(R16),
    /// LD (a16),SP
    LdA16Sp,
    LdSpHl,
    /// LD HL,SP+r8
    LdHlSpOff,
    /// ADD SP,r8
    AddSpOff,
    Push(R16),
    Pop(R16),

    Alu(AluOp, R8),
    /// ALU op against (HL)
    AluHl(AluOp),
    /// ALU op against d8
    AluImm(AluOp),
    IncR(R8),
    DecR(R8),
    IncHlInd,
    DecHlInd,
    IncRr(R16),
    DecRr(R16),
    AddHl(R16),
    Daa,
    Cpl,
    Scf,
    Ccf,
    Rlca,
    Rla,
    Rrca,
    Rra,

    Jr(Cond),
    Jp(Cond),
    JpHl,
    Call(Cond),
    Ret,
    RetCond(Cond),
    Reti,
    Rst(u8),

    /// The 0xCB prefix byte. The operand byte is fetched on the next
    /// cycle, and the real entry comes from [`CB_OPCODES`].
    CbPrefix,
    Cb(CbOp, R8),
    CbHl(CbOp),
}

/// Immutable per-opcode metadata.
#[derive(Copy, Clone, Debug)]
pub struct Instr {
    pub mnemonic: &'static str,
    /// Instruction length in bytes (1–3), CB prefix included.
    pub length: u8,
    /// Machine cycles when executed (taken path for conditionals).
    pub mcycles: u8,
    /// Machine cycles when a condition fails; equals `mcycles` otherwise.
    pub mcycles_alt: u8,
    pub kind: Kind,
}

const fn op(mnemonic: &'static str, length: u8, mcycles: u8, kind: Kind) -> Instr {
    Instr {
        mnemonic,
        length,
        mcycles,
        mcycles_alt: mcycles,
        kind,
    }
}

const fn cond_op(
    mnemonic: &'static str,
    length: u8,
    taken: u8,
    not_taken: u8,
    kind: Kind,
) -> Instr {
    Instr {
        mnemonic,
        length,
        mcycles: taken,
        mcycles_alt: not_taken,
        kind,
    }
}

const fn illegal() -> Instr {
    op("??", 1, 1, Kind::Illegal)
}

/// Primary opcode map.
pub static OPCODES: [Instr; 256] = [
    // 0x00
    op("NOP", 1, 1, Kind::Nop),
    op("LD BC,d16", 3, 3, Kind::LdRrImm(R16::BC)),
    op("LD (BC),A", 1, 2, Kind::LdIndR(Ind::BC, R8::A)),
    op("INC BC", 1, 2, Kind::IncRr(R16::BC)),
    op("INC B", 1, 1, Kind::IncR(R8::B)),
    op("DEC B", 1, 1, Kind::DecR(R8::B)),
    op("LD B,d8", 2, 2, Kind::LdRImm(R8::B)),
    op("RLCA", 1, 1, Kind::Rlca),
    op("LD (a16),SP", 3, 5, Kind::LdA16Sp),
    op("ADD HL,BC", 1, 2, Kind::AddHl(R16::BC)),
    op("LD A,(BC)", 1, 2, Kind::LdRInd(R8::A, Ind::BC)),
    op("DEC BC", 1, 2, Kind::DecRr(R16::BC)),
    op("INC C", 1, 1, Kind::IncR(R8::C)),
    op("DEC C", 1, 1, Kind::DecR(R8::C)),
    op("LD C,d8", 2, 2, Kind::LdRImm(R8::C)),
    op("RRCA", 1, 1, Kind::Rrca),
    // 0x10
    op("STOP", 1, 1, Kind::Stop),
    op("LD DE,d16", 3, 3, Kind::LdRrImm(R16::DE)),
    op("LD (DE),A", 1, 2, Kind::LdIndR(Ind::DE, R8::A)),
    op("INC DE", 1, 2, Kind::IncRr(R16::DE)),
    op("INC D", 1, 1, Kind::IncR(R8::D)),
    op("DEC D", 1, 1, Kind::DecR(R8::D)),
    op("LD D,d8", 2, 2, Kind::LdRImm(R8::D)),
    op("RLA", 1, 1, Kind::Rla),
    op("JR r8", 2, 3, Kind::Jr(Cond::Always)),
    op("ADD HL,DE", 1, 2, Kind::AddHl(R16::DE)),
    op("LD A,(DE)", 1, 2, Kind::LdRInd(R8::A, Ind::DE)),
    op("DEC DE", 1, 2, Kind::DecRr(R16::DE)),
    op("INC E", 1, 1, Kind::IncR(R8::E)),
    op("DEC E", 1, 1, Kind::DecR(R8::E)),
    op("LD E,d8", 2, 2, Kind::LdRImm(R8::E)),
    op("RRA", 1, 1, Kind::Rra),
    // 0x20
    cond_op("JR NZ,r8", 2, 3, 2, Kind::Jr(Cond::NZ)),
    op("LD HL,d16", 3, 3, Kind::LdRrImm(R16::HL)),
    op("LD (HL+),A", 1, 2, Kind::LdIndR(Ind::HLI, R8::A)),
    op("INC HL", 1, 2, Kind::IncRr(R16::HL)),
    op("INC H", 1, 1, Kind::IncR(R8::H)),
    op("DEC H", 1, 1, Kind::DecR(R8::H)),
    op("LD H,d8", 2, 2, Kind::LdRImm(R8::H)),
    op("DAA", 1, 1, Kind::Daa),
    cond_op("JR Z,r8", 2, 3, 2, Kind::Jr(Cond::Z)),
    op("ADD HL,HL", 1, 2, Kind::AddHl(R16::HL)),
    op("LD A,(HL+)", 1, 2, Kind::LdRInd(R8::A, Ind::HLI)),
    op("DEC HL", 1, 2, Kind::DecRr(R16::HL)),
    op("INC L", 1, 1, Kind::IncR(R8::L)),
    op("DEC L", 1, 1, Kind::DecR(R8::L)),
    op("LD L,d8", 2, 2, Kind::LdRImm(R8::L)),
    op("CPL", 1, 1, Kind::Cpl),
    // 0x30
    cond_op("JR NC,r8", 2, 3, 2, Kind::Jr(Cond::NC)),
    op("LD SP,d16", 3, 3, Kind::LdRrImm(R16::SP)),
    op("LD (HL-),A", 1, 2, Kind::LdIndR(Ind::HLD, R8::A)),
    op("INC SP", 1, 2, Kind::IncRr(R16::SP)),
    op("INC (HL)", 1, 3, Kind::IncHlInd),
    op("DEC (HL)", 1, 3, Kind::DecHlInd),
    op("LD (HL),d8", 2, 3, Kind::LdIndImm),
    op("SCF", 1, 1, Kind::Scf),
    cond_op("JR C,r8", 2, 3, 2, Kind::Jr(Cond::C)),
    op("ADD HL,SP", 1, 2, Kind::AddHl(R16::SP)),
    op("LD A,(HL-)", 1, 2, Kind::LdRInd(R8::A, Ind::HLD)),
    op("DEC SP", 1, 2, Kind::DecRr(R16::SP)),
    op("INC A", 1, 1, Kind::IncR(R8::A)),
    op("DEC A", 1, 1, Kind::DecR(R8::A)),
    op("LD A,d8", 2, 2, Kind::LdRImm(R8::A)),
    op("CCF", 1, 1, Kind::Ccf),
    // 0x40
    op("LD B,B", 1, 1, Kind::LdRR(R8::B, R8::B)),
    op("LD B,C", 1, 1, Kind::LdRR(R8::B, R8::C)),
    op("LD B,D", 1, 1, Kind::LdRR(R8::B, R8::D)),
    op("LD B,E", 1, 1, Kind::LdRR(R8::B, R8::E)),
    op("LD B,H", 1, 1, Kind::LdRR(R8::B, R8::H)),
    op("LD B,L", 1, 1, Kind::LdRR(R8::B, R8::L)),
    op("LD B,(HL)", 1, 2, Kind::LdRInd(R8::B, Ind::HL)),
    op("LD B,A", 1, 1, Kind::LdRR(R8::B, R8::A)),
    op("LD C,B", 1, 1, Kind::LdRR(R8::C, R8::B)),
    op("LD C,C", 1, 1, Kind::LdRR(R8::C, R8::C)),
    op("LD C,D", 1, 1, Kind::LdRR(R8::C, R8::D)),
    op("LD C,E", 1, 1, Kind::LdRR(R8::C, R8::E)),
    op("LD C,H", 1, 1, Kind::LdRR(R8::C, R8::H)),
    op("LD C,L", 1, 1, Kind::LdRR(R8::C, R8::L)),
    op("LD C,(HL)", 1, 2, Kind::LdRInd(R8::C, Ind::HL)),
    op("LD C,A", 1, 1, Kind::LdRR(R8::C, R8::A)),
    // 0x50
    op("LD D,B", 1, 1, Kind::LdRR(R8::D, R8::B)),
    op("LD D,C", 1, 1, Kind::LdRR(R8::D, R8::C)),
    op("LD D,D", 1, 1, Kind::LdRR(R8::D, R8::D)),
    op("LD D,E", 1, 1, Kind::LdRR(R8::D, R8::E)),
    op("LD D,H", 1, 1, Kind::LdRR(R8::D, R8::H)),
    op("LD D,L", 1, 1, Kind::LdRR(R8::D, R8::L)),
    op("LD D,(HL)", 1, 2, Kind::LdRInd(R8::D, Ind::HL)),
    op("LD D,A", 1, 1, Kind::LdRR(R8::D, R8::A)),
    op("LD E,B", 1, 1, Kind::LdRR(R8::E, R8::B)),
    op("LD E,C", 1, 1, Kind::LdRR(R8::E, R8::C)),
    op("LD E,D", 1, 1, Kind::LdRR(R8::E, R8::D)),
    op("LD E,E", 1, 1, Kind::LdRR(R8::E, R8::E)),
    op("LD E,H", 1, 1, Kind::LdRR(R8::E, R8::H)),
    op("LD E,L", 1, 1, Kind::LdRR(R8::E, R8::L)),
    op("LD E,(HL)", 1, 2, Kind::LdRInd(R8::E, Ind::HL)),
    op("LD E,A", 1, 1, Kind::LdRR(R8::E, R8::A)),
    // 0x60
    op("LD H,B", 1, 1, Kind::LdRR(R8::H, R8::B)),
    op("LD H,C", 1, 1, Kind::LdRR(R8::H, R8::C)),
    op("LD H,D", 1, 1, Kind::LdRR(R8::H, R8::D)),
    op("LD H,E", 1, 1, Kind::LdRR(R8::H, R8::E)),
    op("LD H,H", 1, 1, Kind::LdRR(R8::H, R8::H)),
    op("LD H,L", 1, 1, Kind::LdRR(R8::H, R8::L)),
    op("LD H,(HL)", 1, 2, Kind::LdRInd(R8::H, Ind::HL)),
    op("LD H,A", 1, 1, Kind::LdRR(R8::H, R8::A)),
    op("LD L,B", 1, 1, Kind::LdRR(R8::L, R8::B)),
    op("LD L,C", 1, 1, Kind::LdRR(R8::L, R8::C)),
    op("LD L,D", 1, 1, Kind::LdRR(R8::L, R8::D)),
    op("LD L,E", 1, 1, Kind::LdRR(R8::L, R8::E)),
    op("LD L,H", 1, 1, Kind::LdRR(R8::L, R8::H)),
    op("LD L,L", 1, 1, Kind::LdRR(R8::L, R8::L)),
    op("LD L,(HL)", 1, 2, Kind::LdRInd(R8::L, Ind::HL)),
    op("LD L,A", 1, 1, Kind::LdRR(R8::L, R8::A)),
    // 0x70
    op("LD (HL),B", 1, 2, Kind::LdIndR(Ind::HL, R8::B)),
    op("LD (HL),C", 1, 2, Kind::LdIndR(Ind::HL, R8::C)),
    op("LD (HL),D", 1, 2, Kind::LdIndR(Ind::HL, R8::D)),
    op("LD (HL),E", 1, 2, Kind::LdIndR(Ind::HL, R8::E)),
    op("LD (HL),H", 1, 2, Kind::LdIndR(Ind::HL, R8::H)),
    op("LD (HL),L", 1, 2, Kind::LdIndR(Ind::HL, R8::L)),
    op("HALT", 1, 1, Kind::Halt),
    op("LD (HL),A", 1, 2, Kind::LdIndR(Ind::HL, R8::A)),
    op("LD A,B", 1, 1, Kind::LdRR(R8::A, R8::B)),
    op("LD A,C", 1, 1, Kind::LdRR(R8::A, R8::C)),
    op("LD A,D", 1, 1, Kind::LdRR(R8::A, R8::D)),
    op("LD A,E", 1, 1, Kind::LdRR(R8::A, R8::E)),
    op("LD A,H", 1, 1, Kind::LdRR(R8::A, R8::H)),
    op("LD A,L", 1, 1, Kind::LdRR(R8::A, R8::L)),
    op("LD A,(HL)", 1, 2, Kind::LdRInd(R8::A, Ind::HL)),
    op("LD A,A", 1, 1, Kind::LdRR(R8::A, R8::A)),
    // 0x80
    op("ADD A,B", 1, 1, Kind::Alu(AluOp::Add, R8::B)),
    op("ADD A,C", 1, 1, Kind::Alu(AluOp::Add, R8::C)),
    op("ADD A,D", 1, 1, Kind::Alu(AluOp::Add, R8::D)),
    op("ADD A,E", 1, 1, Kind::Alu(AluOp::Add, R8::E)),
    op("ADD A,H", 1, 1, Kind::Alu(AluOp::Add, R8::H)),
    op("ADD A,L", 1, 1, Kind::Alu(AluOp::Add, R8::L)),
    op("ADD A,(HL)", 1, 2, Kind::AluHl(AluOp::Add)),
    op("ADD A,A", 1, 1, Kind::Alu(AluOp::Add, R8::A)),
    op("ADC A,B", 1, 1, Kind::Alu(AluOp::Adc, R8::B)),
    op("ADC A,C", 1, 1, Kind::Alu(AluOp::Adc, R8::C)),
    op("ADC A,D", 1, 1, Kind::Alu(AluOp::Adc, R8::D)),
    op("ADC A,E", 1, 1, Kind::Alu(AluOp::Adc, R8::E)),
    op("ADC A,H", 1, 1, Kind::Alu(AluOp::Adc, R8::H)),
    op("ADC A,L", 1, 1, Kind::Alu(AluOp::Adc, R8::L)),
    op("ADC A,(HL)", 1, 2, Kind::AluHl(AluOp::Adc)),
    op("ADC A,A", 1, 1, Kind::Alu(AluOp::Adc, R8::A)),
    // 0x90
    op("SUB B", 1, 1, Kind::Alu(AluOp::Sub, R8::B)),
    op("SUB C", 1, 1, Kind::Alu(AluOp::Sub, R8::C)),
    op("SUB D", 1, 1, Kind::Alu(AluOp::Sub, R8::D)),
    op("SUB E", 1, 1, Kind::Alu(AluOp::Sub, R8::E)),
    op("SUB H", 1, 1, Kind::Alu(AluOp::Sub, R8::H)),
    op("SUB L", 1, 1, Kind::Alu(AluOp::Sub, R8::L)),
    op("SUB (HL)", 1, 2, Kind::AluHl(AluOp::Sub)),
    op("SUB A", 1, 1, Kind::Alu(AluOp::Sub, R8::A)),
    op("SBC A,B", 1, 1, Kind::Alu(AluOp::Sbc, R8::B)),
    op("SBC A,C", 1, 1, Kind::Alu(AluOp::Sbc, R8::C)),
    op("SBC A,D", 1, 1, Kind::Alu(AluOp::Sbc, R8::D)),
    op("SBC A,E", 1, 1, Kind::Alu(AluOp::Sbc, R8::E)),
    op("SBC A,H", 1, 1, Kind::Alu(AluOp::Sbc, R8::H)),
    op("SBC A,L", 1, 1, Kind::Alu(AluOp::Sbc, R8::L)),
    op("SBC A,(HL)", 1, 2, Kind::AluHl(AluOp::Sbc)),
    op("SBC A,A", 1, 1, Kind::Alu(AluOp::Sbc, R8::A)),
    // 0xA0
    op("AND B", 1, 1, Kind::Alu(AluOp::And, R8::B)),
    op("AND C", 1, 1, Kind::Alu(AluOp::And, R8::C)),
    op("AND D", 1, 1, Kind::Alu(AluOp::And, R8::D)),
    op("AND E", 1, 1, Kind::Alu(AluOp::And, R8::E)),
    op("AND H", 1, 1, Kind::Alu(AluOp::And, R8::H)),
    op("AND L", 1, 1, Kind::Alu(AluOp::And, R8::L)),
    op("AND (HL)", 1, 2, Kind::AluHl(AluOp::And)),
    op("AND A", 1, 1, Kind::Alu(AluOp::And, R8::A)),
    op("XOR B", 1, 1, Kind::Alu(AluOp::Xor, R8::B)),
    op("XOR C", 1, 1, Kind::Alu(AluOp::Xor, R8::C)),
    op("XOR D", 1, 1, Kind::Alu(AluOp::Xor, R8::D)),
    op("XOR E", 1, 1, Kind::Alu(AluOp::Xor, R8::E)),
    op("XOR H", 1, 1, Kind::Alu(AluOp::Xor, R8::H)),
    op("XOR L", 1, 1, Kind::Alu(AluOp::Xor, R8::L)),
    op("XOR (HL)", 1, 2, Kind::AluHl(AluOp::Xor)),
    op("XOR A", 1, 1, Kind::Alu(AluOp::Xor, R8::A)),
    // 0xB0
    op("OR B", 1, 1, Kind::Alu(AluOp::Or, R8::B)),
    op("OR C", 1, 1, Kind::Alu(AluOp::Or, R8::C)),
    op("OR D", 1, 1, Kind::Alu(AluOp::Or, R8::D)),
    op("OR E", 1, 1, Kind::Alu(AluOp::Or, R8::E)),
    op("OR H", 1, 1, Kind::Alu(AluOp::Or, R8::H)),
    op("OR L", 1, 1, Kind::Alu(AluOp::Or, R8::L)),
    op("OR (HL)", 1, 2, Kind::AluHl(AluOp::Or)),
    op("OR A", 1, 1, Kind::Alu(AluOp::Or, R8::A)),
    op("CP B", 1, 1, Kind::Alu(AluOp::Cp, R8::B)),
    op("CP C", 1, 1, Kind::Alu(AluOp::Cp, R8::C)),
    op("CP D", 1, 1, Kind::Alu(AluOp::Cp, R8::D)),
    op("CP E", 1, 1, Kind::Alu(AluOp::Cp, R8::E)),
    op("CP H", 1, 1, Kind::Alu(AluOp::Cp, R8::H)),
    op("CP L", 1, 1, Kind::Alu(AluOp::Cp, R8::L)),
    op("CP (HL)", 1, 2, Kind::AluHl(AluOp::Cp)),
    op("CP A", 1, 1, Kind::Alu(AluOp::Cp, R8::A)),
    // 0xC0
    cond_op("RET NZ", 1, 5, 2, Kind::RetCond(Cond::NZ)),
    op("POP BC", 1, 3, Kind::Pop(R16::BC)),
    cond_op("JP NZ,a16", 3, 4, 3, Kind::Jp(Cond::NZ)),
    op("JP a16", 3, 4, Kind::Jp(Cond::Always)),
    cond_op("CALL NZ,a16", 3, 6, 3, Kind::Call(Cond::NZ)),
    op("PUSH BC", 1, 4, Kind::Push(R16::BC)),
    op("ADD A,d8", 2, 2, Kind::AluImm(AluOp::Add)),
    op("RST 00H", 1, 4, Kind::Rst(0x00)),
    cond_op("RET Z", 1, 5, 2, Kind::RetCond(Cond::Z)),
    op("RET", 1, 4, Kind::Ret),
    cond_op("JP Z,a16", 3, 4, 3, Kind::Jp(Cond::Z)),
    op("PREFIX CB", 2, 2, Kind::CbPrefix),
    cond_op("CALL Z,a16", 3, 6, 3, Kind::Call(Cond::Z)),
    op("CALL a16", 3, 6, Kind::Call(Cond::Always)),
    op("ADC A,d8", 2, 2, Kind::AluImm(AluOp::Adc)),
    op("RST 08H", 1, 4, Kind::Rst(0x08)),
    // 0xD0
    cond_op("RET NC", 1, 5, 2, Kind::RetCond(Cond::NC)),
    op("POP DE", 1, 3, Kind::Pop(R16::DE)),
    cond_op("JP NC,a16", 3, 4, 3, Kind::Jp(Cond::NC)),
    illegal(),
    cond_op("CALL NC,a16", 3, 6, 3, Kind::Call(Cond::NC)),
    op("PUSH DE", 1, 4, Kind::Push(R16::DE)),
    op("SUB d8", 2, 2, Kind::AluImm(AluOp::Sub)),
    op("RST 10H", 1, 4, Kind::Rst(0x10)),
    cond_op("RET C", 1, 5, 2, Kind::RetCond(Cond::C)),
    op("RETI", 1, 4, Kind::Reti),
    cond_op("JP C,a16", 3, 4, 3, Kind::Jp(Cond::C)),
    illegal(),
    cond_op("CALL C,a16", 3, 6, 3, Kind::Call(Cond::C)),
    illegal(),
    op("SBC A,d8", 2, 2, Kind::AluImm(AluOp::Sbc)),
    op("RST 18H", 1, 4, Kind::Rst(0x18)),
    // 0xE0
    op("LDH (a8),A", 2, 3, Kind::LdhImmA),
    op("POP HL", 1, 3, Kind::Pop(R16::HL)),
    op("LD (C),A", 1, 2, Kind::LdhCA),
    illegal(),
    illegal(),
    op("PUSH HL", 1, 4, Kind::Push(R16::HL)),
    op("AND d8", 2, 2, Kind::AluImm(AluOp::And)),
    op("RST 20H", 1, 4, Kind::Rst(0x20)),
    op("ADD SP,r8", 2, 4, Kind::AddSpOff),
    op("JP HL", 1, 1, Kind::JpHl),
    op("LD (a16),A", 3, 4, Kind::LdA16A),
    illegal(),
    illegal(),
    illegal(),
    op("XOR d8", 2, 2, Kind::AluImm(AluOp::Xor)),
    op("RST 28H", 1, 4, Kind::Rst(0x28)),
    // 0xF0
    op("LDH A,(a8)", 2, 3, Kind::LdhAImm),
    op("POP AF", 1, 3, Kind::Pop(R16::AF)),
    op("LD A,(C)", 1, 2, Kind::LdhAC),
    op("DI", 1, 1, Kind::Di),
    illegal(),
    op("PUSH AF", 1, 4, Kind::Push(R16::AF)),
    op("OR d8", 2, 2, Kind::AluImm(AluOp::Or)),
    op("RST 30H", 1, 4, Kind::Rst(0x30)),
    op("LD HL,SP+r8", 2, 3, Kind::LdHlSpOff),
    op("LD SP,HL", 1, 2, Kind::LdSpHl),
    op("LD A,(a16)", 3, 4, Kind::LdAA16),
    op("EI", 1, 1, Kind::Ei),
    illegal(),
    illegal(),
    op("CP d8", 2, 2, Kind::AluImm(AluOp::Cp)),
    op("RST 38H", 1, 4, Kind::Rst(0x38)),
];

/// CB-prefixed opcode map, generated row by row from the regular encoding:
/// bits 7-6 select the family, bits 5-3 the sub-op or bit index, bits 2-0
/// the register column ((HL) in column 6).
pub static CB_OPCODES: [Instr; 256] = build_cb_table();

const fn cb_reg(index: usize) -> Option<R8> {
    match index & 0x07 {
        0 => Some(R8::B),
        1 => Some(R8::C),
        2 => Some(R8::D),
        3 => Some(R8::E),
        4 => Some(R8::H),
        5 => Some(R8::L),
        6 => None, // (HL)
        _ => Some(R8::A),
    }
}

const fn cb_op(index: usize) -> CbOp {
    let bit = ((index >> 3) & 0x07) as u8;
    match index >> 6 {
        0 => match (index >> 3) & 0x07 {
            0 => CbOp::Rlc,
            1 => CbOp::Rrc,
            2 => CbOp::Rl,
            3 => CbOp::Rr,
            4 => CbOp::Sla,
            5 => CbOp::Sra,
            6 => CbOp::Swap,
            _ => CbOp::Srl,
        },
        1 => CbOp::Bit(bit),
        2 => CbOp::Res(bit),
        _ => CbOp::Set(bit),
    }
}

const fn cb_mnemonic(index: usize) -> &'static str {
    match index >> 3 {
        0 => "RLC",
        1 => "RRC",
        2 => "RL",
        3 => "RR",
        4 => "SLA",
        5 => "SRA",
        6 => "SWAP",
        7 => "SRL",
        8 => "BIT 0",
        9 => "BIT 1",
        10 => "BIT 2",
        11 => "BIT 3",
        12 => "BIT 4",
        13 => "BIT 5",
        14 => "BIT 6",
        15 => "BIT 7",
        16 => "RES 0",
        17 => "RES 1",
        18 => "RES 2",
        19 => "RES 3",
        20 => "RES 4",
        21 => "RES 5",
        22 => "RES 6",
        23 => "RES 7",
        24 => "SET 0",
        25 => "SET 1",
        26 => "SET 2",
        27 => "SET 3",
        28 => "SET 4",
        29 => "SET 5",
        30 => "SET 6",
        _ => "SET 7",
    }
}

const fn build_cb_table() -> [Instr; 256] {
    let mut table = [illegal(); 256];
    let mut i = 0;
    while i < 256 {
        let cbop = cb_op(i);
        let (kind, mcycles) = match cb_reg(i) {
            Some(r) => (Kind::Cb(cbop, r), 2),
            None => {
                // (HL) column: BIT only reads, the rest read-modify-write.
                let mcycles = if matches!(cbop, CbOp::Bit(_)) { 3 } else { 4 };
                (Kind::CbHl(cbop), mcycles)
            }
        };
        table[i] = Instr {
            mnemonic: cb_mnemonic(i),
            length: 2,
            mcycles,
            mcycles_alt: mcycles,
            kind,
        };
        i += 1;
    }
    table
}
