use std::fmt;
use std::str::FromStr;

use crate::constants::{PROGRAM_START, REGISTER_COUNT, STACK_SIZE};
use crate::error::{ParseRegisterError, Result, VmError};

/// One of the 16 general purpose registers V0..VF.
///
/// Only constructible from a nibble, so indexing `Registers` with it never goes out of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Register(u8);

impl Register {
    /// VF doubles as the carry, borrow and collision flag
    pub const VF: Register = Register(0xF);
    pub const V0: Register = Register(0x0);

    /// Bits above the low nibble are ignored
    pub fn from_nibble(nibble: u8) -> Self {
        Register(nibble & 0xF)
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// V0..=self, the range touched by FX55 and FX65
    pub fn through(self) -> impl Iterator<Item = Register> {
        (0..=self.0).map(Register)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X}", self.0)
    }
}

/// Accepts `V0`..`VF` as well as a bare hex digit, in either case.
impl FromStr for Register {
    type Err = ParseRegisterError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let digit = s
            .strip_prefix('V')
            .or_else(|| s.strip_prefix('v'))
            .unwrap_or(s);
        match u8::from_str_radix(digit, 16) {
            Ok(index) if digit.len() == 1 => Ok(Register(index)),
            _ => Err(ParseRegisterError(s.to_string())),
        }
    }
}

/// ## Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry flag
/// - (i) a 16-bit memory address register, only the low 12 bits address memory
/// - (pc) a 16-bit program counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    v: [u8; REGISTER_COUNT],
    i: u16,
    pc: u16,
}

impl Registers {
    pub fn new() -> Self {
        Registers {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
        }
    }

    pub fn get(&self, register: Register) -> u8 {
        self.v[register.index()]
    }

    pub fn set(&mut self, register: Register, value: u8) {
        self.v[register.index()] = value;
    }

    pub fn set_flag(&mut self, flag: bool) {
        self.v[Register::VF.index()] = u8::from(flag);
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn set_i(&mut self, i: u16) {
        self.i = i;
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    /// Moves on to the next instruction
    pub fn advance_pc(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    /// Moves past the next instruction without executing it
    pub fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(4);
    }

    /// All of V0..VF in order
    pub fn v(&self) -> &[u8; REGISTER_COUNT] {
        &self.v
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

/// ## Stack
/// Stores return addresses when subroutines are called.
/// The pointer is always in `0..=STACK_SIZE`; pushing onto a full stack or popping an empty
/// one is an error rather than being clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stack {
    frames: [u16; STACK_SIZE],
    sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Stack {
            frames: [0; STACK_SIZE],
            sp: 0,
        }
    }

    /// `pc` is the address of the call, reported if the stack is already full
    pub fn push(&mut self, address: u16, pc: u16) -> Result<()> {
        if self.sp == STACK_SIZE {
            return Err(VmError::StackOverflow { pc });
        }
        self.frames[self.sp] = address;
        self.sp += 1;
        Ok(())
    }

    /// `pc` is the address of the return, reported if the stack is empty
    pub fn pop(&mut self, pc: u16) -> Result<u16> {
        if self.sp == 0 {
            return Err(VmError::StackUnderflow { pc });
        }
        self.sp -= 1;
        Ok(self.frames[self.sp])
    }

    pub fn depth(&self) -> usize {
        self.sp
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
