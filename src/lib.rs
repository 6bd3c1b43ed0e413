pub use chip8::{Chip8, Status, StepOutcome};
pub use config::{Config, Quirks};
pub use error::{ConfigError, ParseRegisterError, Result, VmError};
pub use instruction::{disassemble, Instruction};
pub use keypad::Keypad;
pub use memory::Memory;
pub use scheduler::{Advance, Scheduler};
pub use screen::{FrameBuffer, Screen};
pub use state::{Register, Registers, Stack};
pub use timers::Timers;

mod chip8;
mod config;
pub mod constants;
mod error;
mod instruction;
mod keypad;
mod memory;
mod opcode;
mod operations;
mod scheduler;
mod screen;
mod state;
mod timers;
