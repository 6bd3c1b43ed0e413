use crate::constants::KEY_COUNT;
use crate::error::{Result, VmError};
use crate::state::Register;

/// # Keypad
/// A 16 key hexadecimal keypad.
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
/// Tracks the pressed status of each key and, while FX0A is pending, which register is
/// waiting for the next key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keypad {
    pressed: [bool; KEY_COUNT],
    awaiting: Option<Register>,
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pressed status of a key.
    ///
    /// A press while a register is awaiting a key resolves the wait, returning the register
    /// that should receive `code`.
    pub fn set_key(&mut self, code: u8, pressed: bool) -> Result<Option<Register>> {
        let key = self
            .pressed
            .get_mut(usize::from(code))
            .ok_or(VmError::InvalidKey(code))?;
        *key = pressed;
        if pressed {
            Ok(self.awaiting.take())
        } else {
            Ok(None)
        }
    }

    /// Out of range codes are never pressed
    pub fn is_pressed(&self, code: u8) -> bool {
        self.pressed
            .get(usize::from(code))
            .copied()
            .unwrap_or(false)
    }

    /// Suspends until the next key press, which will be stored in `register`
    pub fn await_key(&mut self, register: Register) {
        self.awaiting = Some(register);
    }

    pub fn awaiting(&self) -> Option<Register> {
        self.awaiting
    }
}
