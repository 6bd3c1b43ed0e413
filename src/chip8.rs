use log::{debug, error, info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{Config, Quirks};
use crate::error::{Result, VmError};
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::memory::Memory;
use crate::screen::{FrameBuffer, Screen};
use crate::state::{Register, Registers, Stack};
use crate::timers::Timers;

/// Where the machine is in its run / wait / halt cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    /// FX0A is pending; the next key press lands in this register
    WaitingForKey(Register),
    /// A fatal error occurred; nothing more runs until `reset`
    Halted(VmError),
}

/// What a single call to `step` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Executed(Instruction),
    /// Nothing ran because the machine is waiting for a key press
    Waiting(Register),
    /// A jump to its own address ran; the program can't make progress without a reset
    Stalled,
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Owns every piece of machine state:
///  - `memory`, `registers`, `stack` and `timers`, only ever changed by executing instructions
///  - `screen`, which renderers read between steps
///  - `keypad`, which input handlers write between steps
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing the CPU by one instruction
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
/// - resetting everything
#[derive(Debug, Clone)]
pub struct Chip8 {
    pub(crate) memory: Memory,
    pub(crate) registers: Registers,
    pub(crate) stack: Stack,
    pub(crate) timers: Timers,
    pub(crate) screen: Screen,
    pub(crate) keypad: Keypad,
    pub(crate) quirks: Quirks,
    pub(crate) rng: StdRng,
    seed: Option<u64>,
    halted: Option<VmError>,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        Chip8 {
            memory: Memory::new(),
            registers: Registers::new(),
            stack: Stack::new(),
            timers: Timers::new(),
            screen: Screen::new(),
            keypad: Keypad::new(),
            quirks: config.quirks,
            rng: Self::rng(config.seed),
            seed: config.seed,
            halted: None,
        }
    }

    fn rng(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Copies a ROM into memory at 0x200.
    /// Oversized ROMs are rejected before anything is written.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        self.memory.load(rom)?;
        info!("loaded {} byte ROM", rom.len());
        Ok(())
    }

    /// Puts every piece of state back the way `new` left it, including memory
    pub fn reset(&mut self) {
        debug!("resetting");
        self.memory = Memory::new();
        self.registers = Registers::new();
        self.stack = Stack::new();
        self.timers = Timers::new();
        // blank, but flagged so renderers pick up the wipe
        self.screen.clear();
        self.keypad = Keypad::new();
        self.rng = Self::rng(self.seed);
        self.halted = None;
    }

    /// Advances the CPU by a single instruction
    /// - does nothing if halted, returning the error that halted it
    /// - does nothing if awaiting a keypress
    /// - otherwise fetches, decodes and executes the opcode at the pc
    ///
    /// Any error halts the machine.
    pub fn step(&mut self) -> Result<StepOutcome> {
        if let Some(err) = self.halted {
            return Err(err);
        }
        if let Some(register) = self.keypad.awaiting() {
            return Ok(StepOutcome::Waiting(register));
        }

        self.cycle().map_err(|err| {
            error!("halted: {}", err);
            self.halted = Some(err);
            err
        })
    }

    fn cycle(&mut self) -> Result<StepOutcome> {
        let pc = self.registers.pc();
        let op = self.fetch()?;
        let instruction =
            Instruction::decode(op).ok_or(VmError::UnknownOpcode { opcode: op, pc })?;
        trace!(
            "{:04X} {:04X} {:<16} v{:02X?} i{:04X}",
            pc,
            op,
            instruction.to_string(),
            self.registers.v(),
            self.registers.i()
        );

        self.execute(instruction)?;

        match instruction {
            Instruction::Jump(addr) if addr == pc => Ok(StepOutcome::Stalled),
            Instruction::WaitKey(register) => {
                debug!("waiting for a key press into {}", register);
                Ok(StepOutcome::Executed(instruction))
            }
            _ => Ok(StepOutcome::Executed(instruction)),
        }
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn fetch(&self) -> Result<u16> {
        self.memory.read16(usize::from(self.registers.pc()))
    }

    /// Sets the pressed status of a key.
    ///
    /// A press while FX0A is pending stores the key in the waiting register and moves the pc
    /// past the FX0A, so the next step carries on with the program.
    pub fn set_key(&mut self, code: u8, pressed: bool) -> Result<()> {
        if let Some(register) = self.keypad.set_key(code, pressed)? {
            self.registers.set(register, code);
            self.registers.advance_pc();
            debug!("{} = key {:X}, resuming", register, code);
        }
        Ok(())
    }

    pub fn key_press(&mut self, code: u8) -> Result<()> {
        self.set_key(code, true)
    }

    pub fn key_release(&mut self, code: u8) -> Result<()> {
        self.set_key(code, false)
    }

    /// Counts both timers down by one; call at 60Hz
    pub fn tick_timers(&mut self) {
        self.timers.tick();
    }

    pub fn sound_active(&self) -> bool {
        self.timers.sound_active()
    }

    /// The current contents of the screen
    pub fn frame(&self) -> &FrameBuffer {
        self.screen.snapshot()
    }

    /// Returns the FrameBuffer if the display should be redrawn
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        self.screen.take_frame()
    }

    pub fn status(&self) -> Status {
        match (self.halted, self.keypad.awaiting()) {
            (Some(err), _) => Status::Halted(err),
            (None, Some(register)) => Status::WaitingForKey(register),
            (None, None) => Status::Running,
        }
    }

    /// Steps until the program stalls or errors, or `max_steps` instructions have run.
    /// Returns the number of steps taken.
    pub fn run_until_stall(&mut self, max_steps: usize) -> Result<usize> {
        for taken in 0..max_steps {
            match self.step()? {
                StepOutcome::Executed(_) => continue,
                StepOutcome::Waiting(_) | StepOutcome::Stalled => return Ok(taken + 1),
            }
        }
        Ok(max_steps)
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Chip8 {
        Chip8::with_config(&Config {
            seed: Some(0x8),
            ..Config::default()
        })
    }

    #[test]
    fn test_chip8_gets_op() {
        let mut chip8 = seeded();
        chip8.load_rom(&[0xAA, 0xBB]).unwrap();
        assert_eq!(chip8.fetch(), Ok(0xAABB));
    }

    #[test]
    fn test_cycles_while_no_register_needs_key() {
        let mut chip8 = seeded();
        let starting_pc = chip8.registers.pc();
        chip8.load_rom(&[0x00, 0xE0]).unwrap();
        assert_eq!(chip8.step(), Ok(StepOutcome::Executed(Instruction::Clear)));
        assert_eq!(chip8.registers.pc(), starting_pc + 0x2);
    }

    #[test]
    fn test_captures_key_presses() {
        let mut chip8 = seeded();
        chip8.keypad.await_key(Register::from_nibble(0x1));
        chip8.key_press(0xE).unwrap();
        assert_eq!(chip8.status(), Status::Running);
        assert_eq!(chip8.registers.get(Register::from_nibble(0x1)), 0xE);
    }

    #[test]
    fn test_doesnt_cycle_while_register_needs_key() {
        let mut chip8 = seeded();
        let starting_pc = chip8.registers.pc();
        chip8.keypad.await_key(Register::from_nibble(0x1));
        assert_eq!(
            chip8.step(),
            Ok(StepOutcome::Waiting(Register::from_nibble(0x1)))
        );
        assert_eq!(chip8.registers.pc(), starting_pc);
    }

    #[test]
    fn test_wait_for_key_freezes_pc_until_pressed() {
        let mut chip8 = seeded();
        // LD V3, K; LD V4, 0x01
        chip8.load_rom(&[0xF3, 0x0A, 0x64, 0x01]).unwrap();
        chip8.step().unwrap();
        for _ in 0..10 {
            assert_eq!(
                chip8.step(),
                Ok(StepOutcome::Waiting(Register::from_nibble(3)))
            );
            assert_eq!(chip8.registers.pc(), 0x200);
        }
        // releases don't count
        chip8.key_release(0x7).unwrap();
        assert_eq!(chip8.status(), Status::WaitingForKey(Register::from_nibble(3)));

        chip8.key_press(0x7).unwrap();
        assert_eq!(chip8.status(), Status::Running);
        assert_eq!(chip8.registers.get(Register::from_nibble(3)), 0x7);
        assert_eq!(chip8.registers.pc(), 0x202);

        chip8.step().unwrap();
        assert_eq!(chip8.registers.get(Register::from_nibble(4)), 0x1);
        assert_eq!(chip8.registers.pc(), 0x204);
    }

    #[test]
    fn test_timers_keep_running_while_waiting() {
        let mut chip8 = seeded();
        chip8.timers.set_delay(2);
        chip8.keypad.await_key(Register::V0);
        chip8.step().unwrap();
        chip8.tick_timers();
        assert_eq!(chip8.timers().delay(), 1);
    }

    #[test]
    fn test_invalid_key() {
        let mut chip8 = seeded();
        assert_eq!(chip8.key_press(0x10), Err(VmError::InvalidKey(0x10)));
        assert_eq!(chip8.status(), Status::Running);
    }

    #[test]
    fn test_unknown_opcode_halts() {
        let mut chip8 = seeded();
        chip8.load_rom(&[0x00, 0xE0, 0xFF, 0xFF]).unwrap();
        chip8.step().unwrap();
        let err = VmError::UnknownOpcode { opcode: 0xFFFF, pc: 0x202 };
        assert_eq!(chip8.step(), Err(err));
        assert_eq!(chip8.status(), Status::Halted(err));
        // nothing else runs
        assert_eq!(chip8.step(), Err(err));
        assert_eq!(chip8.registers.pc(), 0x202);
    }

    #[test]
    fn test_runaway_recursion_halts() {
        let mut chip8 = seeded();
        // CALL 0x200
        chip8.load_rom(&[0x22, 0x00]).unwrap();
        let err = VmError::StackOverflow { pc: 0x200 };
        assert_eq!(chip8.run_until_stall(100), Err(err));
        assert_eq!(chip8.stack().depth(), 16);
        assert_eq!(chip8.status(), Status::Halted(err));
    }

    #[test]
    fn test_running_off_the_end_of_memory_halts() {
        let mut chip8 = seeded();
        chip8.registers.set_pc(0xFFF);
        assert_eq!(
            chip8.step(),
            Err(VmError::OutOfBoundsMemoryAccess { address: 0x1000 })
        );
    }

    #[test]
    fn test_reset() {
        let mut chip8 = seeded();
        chip8.load_rom(&[0x60, 0x12, 0xFF, 0xFF]).unwrap();
        chip8.step().unwrap();
        chip8.step().unwrap_err();
        chip8.key_press(0x1).unwrap();

        chip8.reset();

        assert_eq!(chip8.status(), Status::Running);
        assert_eq!(chip8.registers(), &Registers::new());
        assert_eq!(chip8.stack(), &Stack::new());
        assert_eq!(chip8.timers(), &Timers::new());
        assert_eq!(chip8.keypad(), &Keypad::new());
        assert_eq!(chip8.memory(), &Memory::new());
        assert_eq!(chip8.frame(), Screen::new().snapshot());
    }

    #[test]
    fn test_reset_redraws() {
        let mut chip8 = seeded();
        // LD F, V0; DRW V0, V0, 5
        chip8.load_rom(&[0xF0, 0x29, 0xD0, 0x05]).unwrap();
        chip8.step().unwrap();
        chip8.step().unwrap();
        assert!(chip8.take_frame().is_some());

        chip8.reset();
        let frame = chip8.take_frame().copied();
        assert_eq!(frame, Some(*Screen::new().snapshot()));
        assert!(chip8.take_frame().is_none());
    }

    #[test]
    fn test_reset_reseeds_random() {
        let mut chip8 = seeded();
        // RND V0, 0xFF
        chip8.load_rom(&[0xC0, 0xFF]).unwrap();
        chip8.step().unwrap();
        let first = chip8.registers.get(Register::V0);

        chip8.reset();
        chip8.load_rom(&[0xC0, 0xFF]).unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.registers.get(Register::V0), first);
    }

    #[test]
    fn test_oversized_rom_doesnt_halt() {
        let mut chip8 = seeded();
        assert_eq!(
            chip8.load_rom(&[0; 4000]),
            Err(VmError::InvalidRomSize { size: 4000, max: 3584 })
        );
        assert_eq!(chip8.status(), Status::Running);
    }

    #[test]
    fn test_jump_to_self_stalls() {
        let mut chip8 = seeded();
        // LD V0, 0x01; JP 0x202
        chip8.load_rom(&[0x60, 0x01, 0x12, 0x02]).unwrap();
        assert_eq!(chip8.run_until_stall(100), Ok(2));
        assert_eq!(chip8.step(), Ok(StepOutcome::Stalled));
        assert_eq!(chip8.registers.pc(), 0x202);
    }

    #[test]
    fn test_run_until_stall_gives_up() {
        let mut chip8 = seeded();
        // JP 0x202; JP 0x200
        chip8.load_rom(&[0x12, 0x02, 0x12, 0x00]).unwrap();
        assert_eq!(chip8.run_until_stall(50), Ok(50));
    }

    #[test]
    fn test_take_frame() {
        let mut chip8 = seeded();
        chip8.load_rom(&[0x00, 0xE0]).unwrap();
        assert!(chip8.take_frame().is_none());
        chip8.step().unwrap();
        assert!(chip8.take_frame().is_some());
        assert!(chip8.take_frame().is_none());
    }
}
