use crate::state::Register;

/// # Opcodes
///
/// Opcodes are 16 bits each, stored big-endian. Their form is cased on some combination of:
/// - `(n, _, _, _)` broad categorization; applies to all opcodes
/// - `(_, _, _, n)` specific behavior within the 8XY_ category
/// - `(_, _, n, n)` specific behavior within the EX__ and FX__ categories
/// - `(_, n, n, n)` some fixed function that doesn't require variables (e.g. 00E0; clear screen)
///
/// Nibbles not used to determine the form carry the operands.
/// - `(_, n, n, n)` a 12-bit address
/// - `(_, _, n, n)` a byte that is assigned to and/or compared with Vx
/// - `(_, n, _, _)` either the register Vx or the range of registers V0..=Vx
/// - `(_, _, n, _)` the register Vy
/// - `(_, _, _, n)` the height of a sprite
pub trait Opcode {
    /// The Opcode's component nibbles.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// The Opcode's second nibble as a register.
    /// `[_x__]`
    fn x(&self) -> Register;

    /// The Opcode's third nibble as a register.
    /// `[__y_]`
    fn y(&self) -> Register;

    /// The Opcode's fourth nibble.
    /// `[___n]`
    fn n(&self) -> u8;

    /// The Opcode's least significant byte.
    /// `[__kk]`
    fn kk(&self) -> u8;

    /// The Opcode without its most significant nibble.
    /// `[_adr]`
    fn addr(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (
            ((self & 0xF000) >> 12) as u8,
            ((self & 0x0F00) >> 8) as u8,
            ((self & 0x00F0) >> 4) as u8,
            self.n(),
        )
    }

    fn x(&self) -> Register {
        Register::from_nibble(((self & 0x0F00) >> 8) as u8)
    }

    fn y(&self) -> Register {
        Register::from_nibble(((self & 0x00F0) >> 4) as u8)
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn addr(&self) -> u16 {
        self & 0x0FFF
    }
}

/// Assembles an opcode from its family nibble and 12 bits of operands.
pub(crate) fn assemble(family: u8, x: Register, y: Register, n: u8) -> u16 {
    u16::from(family & 0xF) << 12
        | (x.index() as u16) << 8
        | (y.index() as u16) << 4
        | u16::from(n & 0xF)
}

#[cfg(test)]
mod test_opcode {
    use super::*;

    #[test]
    fn test_nibbles() {
        let op: u16 = 0xABCD;
        assert_eq!(op.nibbles(), (0xA, 0xB, 0xC, 0xD));
    }

    #[test]
    fn test_x() {
        let op: u16 = 0xABCD;
        assert_eq!(op.x(), Register::from_nibble(0xB));
    }

    #[test]
    fn test_y() {
        let op: u16 = 0xABCD;
        assert_eq!(op.y(), Register::from_nibble(0xC));
    }

    #[test]
    fn test_n() {
        let op: u16 = 0xABCD;
        assert_eq!(op.n(), 0xD);
    }

    #[test]
    fn test_kk() {
        let op: u16 = 0xABCD;
        assert_eq!(op.kk(), 0xCD);
    }

    #[test]
    fn test_addr() {
        let op: u16 = 0xABCD;
        assert_eq!(op.addr(), 0x0BCD);
    }

    #[test]
    fn test_assemble() {
        let op = assemble(0x8, Register::from_nibble(0x1), Register::from_nibble(0x2), 0x4);
        assert_eq!(op, 0x8124);
        assert_eq!(op.nibbles(), (0x8, 0x1, 0x2, 0x4));
    }
}
