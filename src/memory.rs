use crate::constants::{MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET, SPRITE_SHEET_ADDR};
use crate::error::{Result, VmError};

/// ## Memory
/// 4096 bytes of addressable memory.
/// - 0x000..0x050 holds the hex digit sprite sheet
/// - 0x200.. is where ROMs are loaded
///
/// Every access is bounds checked; addresses past the end are errors, never wrapped.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: Box<[u8; MEMORY_SIZE]>,
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = Box::new([0; MEMORY_SIZE]);
        let sheet = usize::from(SPRITE_SHEET_ADDR);
        bytes[sheet..sheet + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
        Memory { bytes }
    }

    pub fn read8(&self, address: usize) -> Result<u8> {
        self.bytes
            .get(address)
            .copied()
            .ok_or(VmError::OutOfBoundsMemoryAccess { address })
    }

    /// Reads a big-endian word from `address` and `address + 1`
    pub fn read16(&self, address: usize) -> Result<u16> {
        let high = self.read8(address)?;
        let low = self.read8(address + 1)?;
        Ok(u16::from_be_bytes([high, low]))
    }

    pub fn write8(&mut self, address: usize, value: u8) -> Result<()> {
        let byte = self
            .bytes
            .get_mut(address)
            .ok_or(VmError::OutOfBoundsMemoryAccess { address })?;
        *byte = value;
        Ok(())
    }

    /// A read-only view of `len` bytes from `address`.
    /// Fails on the first address that falls outside memory.
    pub fn slice(&self, address: usize, len: usize) -> Result<&[u8]> {
        let end = address + len;
        if end > MEMORY_SIZE {
            return Err(VmError::OutOfBoundsMemoryAccess {
                address: address.max(MEMORY_SIZE),
            });
        }
        Ok(&self.bytes[address..end])
    }

    /// Copies a ROM into the program region, clearing whatever was there before.
    pub fn load(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(VmError::InvalidRomSize {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        let start = usize::from(PROGRAM_START);
        self.bytes[start..].fill(0);
        self.bytes[start..start + rom.len()].copy_from_slice(rom);
        Ok(())
    }

    /// The whole address space
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..]
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory").field("size", &MEMORY_SIZE).finish()
    }
}
