use std::fmt;

use crate::constants::PROGRAM_START;
use crate::opcode::{assemble, Opcode};
use crate::state::Register;

/// # Instructions
/// Every opcode form of the base instruction set.
///
/// Addresses are 12 bits and bytes are the low 8 bits of the opcode. Decoding is total over
/// the forms below: any other bit pattern is not an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 0NNN: call a machine code routine; ignored
    Sys(u16),
    /// 00E0
    Clear,
    /// 00EE
    Return,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XKK
    SkipEqImm(Register, u8),
    /// 4XKK
    SkipNeImm(Register, u8),
    /// 5XY0
    SkipEqReg(Register, Register),
    /// 6XKK
    LoadImm(Register, u8),
    /// 7XKK
    AddImm(Register, u8),
    /// 8XY0
    Move(Register, Register),
    /// 8XY1
    Or(Register, Register),
    /// 8XY2
    And(Register, Register),
    /// 8XY3
    Xor(Register, Register),
    /// 8XY4
    AddReg(Register, Register),
    /// 8XY5
    Sub(Register, Register),
    /// 8XY6
    ShiftRight(Register, Register),
    /// 8XY7
    SubReversed(Register, Register),
    /// 8XYE
    ShiftLeft(Register, Register),
    /// 9XY0
    SkipNeReg(Register, Register),
    /// ANNN
    LoadIndex(u16),
    /// BNNN
    JumpOffset(u16),
    /// CXKK
    Random(Register, u8),
    /// DXYN
    Draw(Register, Register, u8),
    /// EX9E
    SkipKeyPressed(Register),
    /// EXA1
    SkipKeyNotPressed(Register),
    /// FX07
    LoadDelay(Register),
    /// FX0A
    WaitKey(Register),
    /// FX15
    SetDelay(Register),
    /// FX18
    SetSound(Register),
    /// FX1E
    AddIndex(Register),
    /// FX29
    LoadGlyph(Register),
    /// FX33
    StoreBcd(Register),
    /// FX55
    StoreRegisters(Register),
    /// FX65
    LoadRegisters(Register),
}

use Instruction::*;

impl Instruction {
    /// Selects the Instruction for a given Opcode, if there is one
    pub fn decode(op: u16) -> Option<Self> {
        let (x, y) = (op.x(), op.y());
        let instruction = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Clear,
            (0x0, 0x0, 0xE, 0xE) => Return,
            (0x0, ..) => Sys(op.addr()),
            (0x1, ..) => Jump(op.addr()),
            (0x2, ..) => Call(op.addr()),
            (0x3, ..) => SkipEqImm(x, op.kk()),
            (0x4, ..) => SkipNeImm(x, op.kk()),
            (0x5, .., 0x0) => SkipEqReg(x, y),
            (0x6, ..) => LoadImm(x, op.kk()),
            (0x7, ..) => AddImm(x, op.kk()),
            (0x8, .., 0x0) => Move(x, y),
            (0x8, .., 0x1) => Or(x, y),
            (0x8, .., 0x2) => And(x, y),
            (0x8, .., 0x3) => Xor(x, y),
            (0x8, .., 0x4) => AddReg(x, y),
            (0x8, .., 0x5) => Sub(x, y),
            (0x8, .., 0x6) => ShiftRight(x, y),
            (0x8, .., 0x7) => SubReversed(x, y),
            (0x8, .., 0xE) => ShiftLeft(x, y),
            (0x9, .., 0x0) => SkipNeReg(x, y),
            (0xA, ..) => LoadIndex(op.addr()),
            (0xB, ..) => JumpOffset(op.addr()),
            (0xC, ..) => Random(x, op.kk()),
            (0xD, ..) => Draw(x, y, op.n()),
            (0xE, _, 0x9, 0xE) => SkipKeyPressed(x),
            (0xE, _, 0xA, 0x1) => SkipKeyNotPressed(x),
            (0xF, _, 0x0, 0x7) => LoadDelay(x),
            (0xF, _, 0x0, 0xA) => WaitKey(x),
            (0xF, _, 0x1, 0x5) => SetDelay(x),
            (0xF, _, 0x1, 0x8) => SetSound(x),
            (0xF, _, 0x1, 0xE) => AddIndex(x),
            (0xF, _, 0x2, 0x9) => LoadGlyph(x),
            (0xF, _, 0x3, 0x3) => StoreBcd(x),
            (0xF, _, 0x5, 0x5) => StoreRegisters(x),
            (0xF, _, 0x6, 0x5) => LoadRegisters(x),
            _ => return None,
        };
        Some(instruction)
    }

    /// The Opcode this Instruction decodes from
    pub fn encode(&self) -> u16 {
        let with_addr = |family: u16, addr: u16| family << 12 | (addr & 0x0FFF);
        let with_byte = |family: u16, x: Register, kk: u8| {
            family << 12 | (x.index() as u16) << 8 | u16::from(kk)
        };
        let alu = |x: Register, y: Register, n: u8| assemble(0x8, x, y, n);
        let misc = |family: u16, x: Register, low: u8| with_byte(family, x, low);

        match *self {
            Sys(addr) => with_addr(0x0, addr),
            Clear => 0x00E0,
            Return => 0x00EE,
            Jump(addr) => with_addr(0x1, addr),
            Call(addr) => with_addr(0x2, addr),
            SkipEqImm(x, kk) => with_byte(0x3, x, kk),
            SkipNeImm(x, kk) => with_byte(0x4, x, kk),
            SkipEqReg(x, y) => assemble(0x5, x, y, 0x0),
            LoadImm(x, kk) => with_byte(0x6, x, kk),
            AddImm(x, kk) => with_byte(0x7, x, kk),
            Move(x, y) => alu(x, y, 0x0),
            Or(x, y) => alu(x, y, 0x1),
            And(x, y) => alu(x, y, 0x2),
            Xor(x, y) => alu(x, y, 0x3),
            AddReg(x, y) => alu(x, y, 0x4),
            Sub(x, y) => alu(x, y, 0x5),
            ShiftRight(x, y) => alu(x, y, 0x6),
            SubReversed(x, y) => alu(x, y, 0x7),
            ShiftLeft(x, y) => alu(x, y, 0xE),
            SkipNeReg(x, y) => assemble(0x9, x, y, 0x0),
            LoadIndex(addr) => with_addr(0xA, addr),
            JumpOffset(addr) => with_addr(0xB, addr),
            Random(x, kk) => with_byte(0xC, x, kk),
            Draw(x, y, n) => assemble(0xD, x, y, n),
            SkipKeyPressed(x) => misc(0xE, x, 0x9E),
            SkipKeyNotPressed(x) => misc(0xE, x, 0xA1),
            LoadDelay(x) => misc(0xF, x, 0x07),
            WaitKey(x) => misc(0xF, x, 0x0A),
            SetDelay(x) => misc(0xF, x, 0x15),
            SetSound(x) => misc(0xF, x, 0x18),
            AddIndex(x) => misc(0xF, x, 0x1E),
            LoadGlyph(x) => misc(0xF, x, 0x29),
            StoreBcd(x) => misc(0xF, x, 0x33),
            StoreRegisters(x) => misc(0xF, x, 0x55),
            LoadRegisters(x) => misc(0xF, x, 0x65),
        }
    }

    /// The opcode form, with operands written as placeholders
    pub fn pattern(&self) -> &'static str {
        match self {
            Sys(_) => "0NNN",
            Clear => "00E0",
            Return => "00EE",
            Jump(_) => "1NNN",
            Call(_) => "2NNN",
            SkipEqImm(..) => "3XKK",
            SkipNeImm(..) => "4XKK",
            SkipEqReg(..) => "5XY0",
            LoadImm(..) => "6XKK",
            AddImm(..) => "7XKK",
            Move(..) => "8XY0",
            Or(..) => "8XY1",
            And(..) => "8XY2",
            Xor(..) => "8XY3",
            AddReg(..) => "8XY4",
            Sub(..) => "8XY5",
            ShiftRight(..) => "8XY6",
            SubReversed(..) => "8XY7",
            ShiftLeft(..) => "8XYE",
            SkipNeReg(..) => "9XY0",
            LoadIndex(_) => "ANNN",
            JumpOffset(_) => "BNNN",
            Random(..) => "CXKK",
            Draw(..) => "DXYN",
            SkipKeyPressed(_) => "EX9E",
            SkipKeyNotPressed(_) => "EXA1",
            LoadDelay(_) => "FX07",
            WaitKey(_) => "FX0A",
            SetDelay(_) => "FX15",
            SetSound(_) => "FX18",
            AddIndex(_) => "FX1E",
            LoadGlyph(_) => "FX29",
            StoreBcd(_) => "FX33",
            StoreRegisters(_) => "FX55",
            LoadRegisters(_) => "FX65",
        }
    }
}

/// Assembler mnemonics
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Sys(addr) => write!(f, "SYS {:#05X}", addr),
            Clear => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump(addr) => write!(f, "JP {:#05X}", addr),
            Call(addr) => write!(f, "CALL {:#05X}", addr),
            SkipEqImm(x, kk) => write!(f, "SE {}, {:#04X}", x, kk),
            SkipNeImm(x, kk) => write!(f, "SNE {}, {:#04X}", x, kk),
            SkipEqReg(x, y) => write!(f, "SE {}, {}", x, y),
            LoadImm(x, kk) => write!(f, "LD {}, {:#04X}", x, kk),
            AddImm(x, kk) => write!(f, "ADD {}, {:#04X}", x, kk),
            Move(x, y) => write!(f, "LD {}, {}", x, y),
            Or(x, y) => write!(f, "OR {}, {}", x, y),
            And(x, y) => write!(f, "AND {}, {}", x, y),
            Xor(x, y) => write!(f, "XOR {}, {}", x, y),
            AddReg(x, y) => write!(f, "ADD {}, {}", x, y),
            Sub(x, y) => write!(f, "SUB {}, {}", x, y),
            ShiftRight(x, y) => write!(f, "SHR {}, {}", x, y),
            SubReversed(x, y) => write!(f, "SUBN {}, {}", x, y),
            ShiftLeft(x, y) => write!(f, "SHL {}, {}", x, y),
            SkipNeReg(x, y) => write!(f, "SNE {}, {}", x, y),
            LoadIndex(addr) => write!(f, "LD I, {:#05X}", addr),
            JumpOffset(addr) => write!(f, "JP V0, {:#05X}", addr),
            Random(x, kk) => write!(f, "RND {}, {:#04X}", x, kk),
            Draw(x, y, n) => write!(f, "DRW {}, {}, {}", x, y, n),
            SkipKeyPressed(x) => write!(f, "SKP {}", x),
            SkipKeyNotPressed(x) => write!(f, "SKNP {}", x),
            LoadDelay(x) => write!(f, "LD {}, DT", x),
            WaitKey(x) => write!(f, "LD {}, K", x),
            SetDelay(x) => write!(f, "LD DT, {}", x),
            SetSound(x) => write!(f, "LD ST, {}", x),
            AddIndex(x) => write!(f, "ADD I, {}", x),
            LoadGlyph(x) => write!(f, "LD F, {}", x),
            StoreBcd(x) => write!(f, "LD B, {}", x),
            StoreRegisters(x) => write!(f, "LD [I], {}", x),
            LoadRegisters(x) => write!(f, "LD {}, [I]", x),
        }
    }
}

/// Walks a ROM two bytes at a time as it would be laid out in memory.
///
/// Yields the address, the raw opcode and its Instruction if it decodes. A trailing odd byte
/// is not an opcode and is skipped. Addresses keep counting past the end of memory, since the
/// input may be any file.
pub fn disassemble(rom: &[u8]) -> impl Iterator<Item = (usize, u16, Option<Instruction>)> + '_ {
    rom.chunks_exact(2).enumerate().map(|(index, word)| {
        let address = usize::from(PROGRAM_START) + 2 * index;
        let op = u16::from_be_bytes([word[0], word[1]]);
        (address, op, Instruction::decode(op))
    })
}

#[cfg(test)]
mod test_instruction {
    use super::*;

    fn reg(nibble: u8) -> Register {
        Register::from_nibble(nibble)
    }

    #[test]
    fn test_decodes_every_form() {
        let cases = [
            (0x0123, Sys(0x123)),
            (0x00E0, Clear),
            (0x00EE, Return),
            (0x1ABC, Jump(0xABC)),
            (0x2123, Call(0x123)),
            (0x3111, SkipEqImm(reg(1), 0x11)),
            (0x4111, SkipNeImm(reg(1), 0x11)),
            (0x5120, SkipEqReg(reg(1), reg(2))),
            (0x6122, LoadImm(reg(1), 0x22)),
            (0x7122, AddImm(reg(1), 0x22)),
            (0x8120, Move(reg(1), reg(2))),
            (0x8121, Or(reg(1), reg(2))),
            (0x8122, And(reg(1), reg(2))),
            (0x8123, Xor(reg(1), reg(2))),
            (0x8124, AddReg(reg(1), reg(2))),
            (0x8125, Sub(reg(1), reg(2))),
            (0x8126, ShiftRight(reg(1), reg(2))),
            (0x8127, SubReversed(reg(1), reg(2))),
            (0x812E, ShiftLeft(reg(1), reg(2))),
            (0x9120, SkipNeReg(reg(1), reg(2))),
            (0xAABC, LoadIndex(0xABC)),
            (0xBABC, JumpOffset(0xABC)),
            (0xC10F, Random(reg(1), 0x0F)),
            (0xD015, Draw(reg(0), reg(1), 5)),
            (0xE19E, SkipKeyPressed(reg(1))),
            (0xE1A1, SkipKeyNotPressed(reg(1))),
            (0xF107, LoadDelay(reg(1))),
            (0xF10A, WaitKey(reg(1))),
            (0xF115, SetDelay(reg(1))),
            (0xF118, SetSound(reg(1))),
            (0xF11E, AddIndex(reg(1))),
            (0xF129, LoadGlyph(reg(1))),
            (0xF133, StoreBcd(reg(1))),
            (0xF455, StoreRegisters(reg(4))),
            (0xF465, LoadRegisters(reg(4))),
        ];
        assert_eq!(cases.len(), 35);
        for (op, expected) in cases.iter() {
            assert_eq!(Instruction::decode(*op), Some(*expected), "{:04X}", op);
            assert_eq!(expected.encode(), *op);
        }
    }

    #[test]
    fn test_rejects_unknown_forms() {
        for op in [0x5121, 0x8008, 0x800F, 0x9121, 0xE09F, 0xE0A2, 0xF000, 0xF0FF, 0xFFFF] {
            assert_eq!(Instruction::decode(op), None, "{:04X}", op);
        }
    }

    #[test]
    fn test_patterns() {
        assert_eq!(Instruction::decode(0x8124).unwrap().pattern(), "8XY4");
        assert_eq!(Instruction::decode(0xF065).unwrap().pattern(), "FX65");
        assert_eq!(Instruction::decode(0x00E0).unwrap().pattern(), "00E0");
    }

    #[test]
    fn test_mnemonics() {
        let mnemonic = |op: u16| Instruction::decode(op).unwrap().to_string();
        assert_eq!(mnemonic(0x00E0), "CLS");
        assert_eq!(mnemonic(0x1228), "JP 0x228");
        assert_eq!(mnemonic(0x6122), "LD V1, 0x22");
        assert_eq!(mnemonic(0x8AB4), "ADD VA, VB");
        assert_eq!(mnemonic(0xD015), "DRW V0, V1, 5");
        assert_eq!(mnemonic(0xA22A), "LD I, 0x22A");
        assert_eq!(mnemonic(0xBABC), "JP V0, 0xABC");
        assert_eq!(mnemonic(0xF30A), "LD V3, K");
        assert_eq!(mnemonic(0xF255), "LD [I], V2");
    }

    #[test]
    fn test_disassemble() {
        let rom = [0x00, 0xE0, 0xA2, 0x2A, 0xFF, 0xFF, 0x12];
        let listing: Vec<_> = disassemble(&rom).collect();
        assert_eq!(
            listing,
            vec![
                (0x200, 0x00E0, Some(Clear)),
                (0x202, 0xA22A, Some(LoadIndex(0x22A))),
                (0x204, 0xFFFF, None),
            ]
        );
    }

    #[test]
    fn test_disassemble_oversized_input() {
        let rom = vec![0x00; 70_000];
        assert_eq!(disassemble(&rom).count(), 35_000);
        let last = disassemble(&rom).last();
        assert_eq!(last, Some((0x200 + 69_998, 0x0000, Some(Sys(0x000)))));
    }
}
