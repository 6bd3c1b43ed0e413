use rand::Rng;

use crate::chip8::Chip8;
use crate::constants::{SPRITE_HEIGHT, SPRITE_SHEET_ADDR};
use crate::error::Result;
use crate::instruction::Instruction::{self, *};
use crate::state::Register;

/// Where the pc goes once an instruction has run
enum Flow {
    /// on to the following instruction
    Next,
    /// past the following instruction
    Skip,
    /// somewhere else entirely
    Jump(u16),
    /// nowhere; the instruction isn't done until a key is pressed
    Stay,
}

impl Flow {
    fn skip_if(condition: bool) -> Self {
        if condition {
            Flow::Skip
        } else {
            Flow::Next
        }
    }
}

impl Chip8 {
    /// Executes a single decoded instruction against the machine.
    ///
    /// Anything that can fail is checked before state is touched, so an error leaves the
    /// machine exactly as it was before the instruction.
    pub(crate) fn execute(&mut self, instruction: Instruction) -> Result<()> {
        let flow = match instruction {
            Sys(_) => Flow::Next,
            Clear => self.clr(),
            Return => self.rts()?,
            Jump(addr) => Flow::Jump(addr),
            Call(addr) => self.call(addr)?,
            SkipEqImm(x, kk) => Flow::skip_if(self.registers.get(x) == kk),
            SkipNeImm(x, kk) => Flow::skip_if(self.registers.get(x) != kk),
            SkipEqReg(x, y) => Flow::skip_if(self.registers.get(x) == self.registers.get(y)),
            SkipNeReg(x, y) => Flow::skip_if(self.registers.get(x) != self.registers.get(y)),
            LoadImm(x, kk) => self.load(x, kk),
            AddImm(x, kk) => self.add(x, kk),
            Move(x, y) => self.load(x, self.registers.get(y)),
            Or(x, y) => self.logic(x, y, |a, b| a | b),
            And(x, y) => self.logic(x, y, |a, b| a & b),
            Xor(x, y) => self.logic(x, y, |a, b| a ^ b),
            AddReg(x, y) => self.addr(x, y),
            Sub(x, y) => self.sub(x, x, y),
            SubReversed(x, y) => self.sub(x, y, x),
            ShiftRight(x, y) => self.shr(x, y),
            ShiftLeft(x, y) => self.shl(x, y),
            LoadIndex(addr) => self.loadi(addr),
            JumpOffset(addr) => Flow::Jump(addr + u16::from(self.registers.get(Register::V0))),
            Random(x, kk) => self.rand(x, kk),
            Draw(x, y, n) => self.draw(x, y, n)?,
            SkipKeyPressed(x) => Flow::skip_if(self.keypad.is_pressed(self.registers.get(x))),
            SkipKeyNotPressed(x) => Flow::skip_if(!self.keypad.is_pressed(self.registers.get(x))),
            LoadDelay(x) => self.load(x, self.timers.delay()),
            WaitKey(x) => self.keyd(x),
            SetDelay(x) => {
                self.timers.set_delay(self.registers.get(x));
                Flow::Next
            }
            SetSound(x) => {
                self.timers.set_sound(self.registers.get(x));
                Flow::Next
            }
            AddIndex(x) => self.addi(x),
            LoadGlyph(x) => self.ldspr(x),
            StoreBcd(x) => self.bcd(x)?,
            StoreRegisters(x) => self.stor(x)?,
            LoadRegisters(x) => self.read(x)?,
        };

        match flow {
            Flow::Next => self.registers.advance_pc(),
            Flow::Skip => self.registers.skip(),
            Flow::Jump(addr) => self.registers.set_pc(addr),
            Flow::Stay => {}
        }
        Ok(())
    }

    /// clear
    fn clr(&mut self) -> Flow {
        self.screen.clear();
        Flow::Next
    }

    /// PC = STACK.pop()
    fn rts(&mut self) -> Result<Flow> {
        let pc = self.registers.pc();
        Ok(Flow::Jump(self.stack.pop(pc)?))
    }

    /// STACK.push(PC + 2); PC = addr
    fn call(&mut self, addr: u16) -> Result<Flow> {
        let pc = self.registers.pc();
        self.stack.push(pc.wrapping_add(2), pc)?;
        Ok(Flow::Jump(addr))
    }

    /// Vx = kk
    fn load(&mut self, x: Register, kk: u8) -> Flow {
        self.registers.set(x, kk);
        Flow::Next
    }

    /// Vx += kk
    /// Add kk to Vx; allow for overflow but implicitly drop it, VF is untouched
    fn add(&mut self, x: Register, kk: u8) -> Flow {
        let vx = self.registers.get(x);
        self.registers.set(x, vx.wrapping_add(kk));
        Flow::Next
    }

    /// Vx = Vx op Vy; VF = 0 on original hardware
    fn logic(&mut self, x: Register, y: Register, op: fn(u8, u8) -> u8) -> Flow {
        let (vx, vy) = (self.registers.get(x), self.registers.get(y));
        self.registers.set(x, op(vx, vy));
        if self.quirks.logic_resets_flag {
            self.registers.set_flag(false);
        }
        Flow::Next
    }

    /// Vx += Vy; VF = overflow
    fn addr(&mut self, x: Register, y: Register) -> Flow {
        let (vx, vy) = (self.registers.get(x), self.registers.get(y));
        let (res, over) = vx.overflowing_add(vy);
        self.registers.set(x, res);
        self.registers.set_flag(over);
        Flow::Next
    }

    /// Vx = minuend - subtrahend; VF = !underflow
    fn sub(&mut self, x: Register, minuend: Register, subtrahend: Register) -> Flow {
        let minuend = self.registers.get(minuend);
        let (res, under) = minuend.overflowing_sub(self.registers.get(subtrahend));
        self.registers.set(x, res);
        self.registers.set_flag(!under);
        Flow::Next
    }

    /// The register shifted by 8XY6 and 8XYE
    fn shift_source(&self, x: Register, y: Register) -> u8 {
        if self.quirks.shift_uses_vy {
            self.registers.get(y)
        } else {
            self.registers.get(x)
        }
    }

    /// Vx = Vy >> 1; VF = lsb
    fn shr(&mut self, x: Register, y: Register) -> Flow {
        let source = self.shift_source(x, y);
        self.registers.set(x, source >> 1);
        self.registers.set_flag(source & 0x01 == 0x01);
        Flow::Next
    }

    /// Vx = Vy << 1; VF = msb
    fn shl(&mut self, x: Register, y: Register) -> Flow {
        let source = self.shift_source(x, y);
        self.registers.set(x, source << 1);
        self.registers.set_flag(source & 0x80 == 0x80);
        Flow::Next
    }

    /// I = addr
    fn loadi(&mut self, addr: u16) -> Flow {
        self.registers.set_i(addr);
        Flow::Next
    }

    /// Vx = rand_byte & kk
    fn rand(&mut self, x: Register, kk: u8) -> Flow {
        let rand_byte: u8 = self.rng.gen();
        self.registers.set(x, rand_byte & kk);
        Flow::Next
    }

    /// draw_sprite(x=Vx y=Vy size=n)
    /// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer with wrapping.
    /// Sets VF if any pixels were erased
    fn draw(&mut self, x: Register, y: Register, n: u8) -> Result<Flow> {
        let i = usize::from(self.registers.i());
        let (vx, vy) = (self.registers.get(x), self.registers.get(y));
        let rows = self.memory.slice(i, usize::from(n))?;
        let collision = self.screen.draw_sprite(vx, vy, rows);
        self.registers.set_flag(collision);
        Ok(Flow::Next)
    }

    /// await keypress for Vx
    fn keyd(&mut self, x: Register) -> Flow {
        self.keypad.await_key(x);
        Flow::Stay
    }

    /// I += Vx
    fn addi(&mut self, x: Register) -> Flow {
        let (i, vx) = (self.registers.i(), self.registers.get(x));
        self.registers.set_i(i.wrapping_add(u16::from(vx)));
        Flow::Next
    }

    /// I = Vx * 5
    /// Set I to the memory address of the sprite for the low nibble of Vx
    /// See constants::SPRITE_SHEET for more details
    fn ldspr(&mut self, x: Register) -> Flow {
        let digit = u16::from(self.registers.get(x) & 0xF);
        self.registers.set_i(SPRITE_SHEET_ADDR + digit * SPRITE_HEIGHT);
        Flow::Next
    }

    /// mem[I..I+3] = bcd(Vx)
    /// Store BCD repr of Vx in memory starting at address i
    fn bcd(&mut self, x: Register) -> Result<Flow> {
        let value = self.registers.get(x);
        let bcd = [value / 100 % 10, value / 10 % 10, value % 10];
        self.write_at_i(&bcd)?;
        Ok(Flow::Next)
    }

    /// mem[I..=I+x] = V0..=Vx
    /// Fill memory starting at address i with V0..=Vx
    fn stor(&mut self, x: Register) -> Result<Flow> {
        let values: Vec<u8> = x.through().map(|r| self.registers.get(r)).collect();
        self.write_at_i(&values)?;
        self.bump_index(x);
        Ok(Flow::Next)
    }

    /// V0..=Vx = mem[I..=I+x]
    /// Fill V0..=Vx with memory starting at address i
    fn read(&mut self, x: Register) -> Result<Flow> {
        let i = usize::from(self.registers.i());
        let bytes = self.memory.slice(i, x.index() + 1)?;
        for (register, &byte) in x.through().zip(bytes) {
            self.registers.set(register, byte);
        }
        self.bump_index(x);
        Ok(Flow::Next)
    }

    /// Writes `bytes` from I onwards, all or nothing
    fn write_at_i(&mut self, bytes: &[u8]) -> Result<()> {
        let start = usize::from(self.registers.i());
        self.memory.slice(start, bytes.len())?;
        for (offset, &byte) in bytes.iter().enumerate() {
            self.memory.write8(start + offset, byte)?;
        }
        Ok(())
    }

    /// I += x + 1 on original hardware
    fn bump_index(&mut self, x: Register) {
        if self.quirks.load_store_increments_index {
            let i = self.registers.i();
            self.registers.set_i(i.wrapping_add(x.index() as u16 + 1));
        }
    }
}
