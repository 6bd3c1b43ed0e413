use thiserror::Error;

pub type Result<T> = std::result::Result<T, VmError>;

/// Everything that can go wrong while loading or running a program.
///
/// Fatal errors halt the machine until it is reset; the others are reported to the caller
/// and leave the machine untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VmError {
    #[error("memory access out of bounds at {address:#06X}")]
    OutOfBoundsMemoryAccess { address: usize },

    #[error("stack overflow: call at {pc:#06X} exceeds 16 nested subroutines")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: return at {pc:#06X} with an empty call stack")]
    StackUnderflow { pc: u16 },

    #[error("unknown opcode {opcode:#06X} at {pc:#06X}")]
    UnknownOpcode { opcode: u16, pc: u16 },

    #[error("ROM is {size} bytes, the largest that fits is {max} bytes")]
    InvalidRomSize { size: usize, max: usize },

    #[error("key code {0:#X} is not on the keypad")]
    InvalidKey(u8),
}

impl VmError {
    /// Whether this error halts the machine
    pub fn is_fatal(&self) -> bool {
        !matches!(self, VmError::InvalidRomSize { .. } | VmError::InvalidKey(_))
    }
}

/// Failures reading a `Config`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

/// A string that doesn't name one of V0..VF
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected register {0:?}")]
pub struct ParseRegisterError(pub String);
