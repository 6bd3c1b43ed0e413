use std::time::Duration;

/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// Where ROMs are loaded into memory and where the pc starts
pub const PROGRAM_START: u16 = 0x200;

/// The largest ROM that fits between `PROGRAM_START` and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Maximum depth of nested subroutine calls
pub const STACK_SIZE: usize = 16;

/// Number of general purpose registers (V0..VF)
pub const REGISTER_COUNT: usize = 16;

/// Number of keys on the hexadecimal keypad
pub const KEY_COUNT: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Sprites are at most 15 rows tall since the row count is a single nibble
pub const MAX_SPRITE_ROWS: usize = 15;

/// Where the built-in hex digit sprites are stored
pub const SPRITE_SHEET_ADDR: u16 = 0x000;

/// Bytes per hex digit sprite
pub const SPRITE_HEIGHT: u16 = 5;

/// Timers count down at 60Hz regardless of the instruction rate
pub const TIMER_HZ: u64 = 60;

/// Default instruction rate
pub const INSTRUCTIONS_PER_SECOND: u32 = 700;

pub const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// The period of a single timer tick, rounded down to the nearest nanosecond
pub const TIMER_PERIOD: Duration = Duration::from_nanos(1_000_000_000 / TIMER_HZ);

/// # Sprite Sheet
/// The hex digits 0..F, each 4 pixels wide and 5 tall.
/// Each byte is one row and only the high nibble is used.
/// ```text
/// 0xF0 -> 1111 ****
/// 0x90 -> 1001 *  *
/// 0x90 -> 1001 *  *
/// 0x90 -> 1001 *  *
/// 0xF0 -> 1111 ****
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
