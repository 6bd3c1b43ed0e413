use std::time::Duration;

use log::trace;

use crate::chip8::{Chip8, StepOutcome};
use crate::config::Config;
use crate::constants::{NANOS_PER_SECOND, TIMER_HZ};
use crate::error::Result;
use crate::state::Register;

/// What a call to `Scheduler::advance` did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    /// Instructions executed
    pub steps: usize,
    /// Timer ticks applied
    pub ticks: usize,
    /// The program jumped to itself at some point
    pub stalled: bool,
    /// The machine is suspended until a key lands in this register
    pub waiting: Option<Register>,
}

/// # Scheduler
/// Turns real elapsed time into instruction steps and 60Hz timer ticks.
///
/// Steps and ticks are owed independently: a second of elapsed time is always worth exactly
/// `instructions_per_second` steps and 60 ticks, however it is split across calls.
/// Leftover time is carried as `nanoseconds * rate` so that nothing is lost to rounding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduler {
    instructions_per_second: u32,
    step_credit: u128,
    tick_credit: u128,
}

impl Scheduler {
    pub fn new(instructions_per_second: u32) -> Self {
        Scheduler {
            instructions_per_second,
            step_credit: 0,
            tick_credit: 0,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.instructions_per_second)
    }

    pub fn instructions_per_second(&self) -> u32 {
        self.instructions_per_second
    }

    /// Drops any time carried over from earlier calls
    pub fn reset(&mut self) {
        self.step_credit = 0;
        self.tick_credit = 0;
    }

    /// Runs every step and tick owed for `elapsed` more time.
    ///
    /// Ticks are spread evenly between the steps. Timers keep ticking while the machine is
    /// waiting for a key. A step error stops the advance and is returned; the machine is
    /// halted at that point.
    pub fn advance(&mut self, chip8: &mut Chip8, elapsed: Duration) -> Result<Advance> {
        let nanos = elapsed.as_nanos();
        let steps = Self::drain(
            &mut self.step_credit,
            nanos,
            u128::from(self.instructions_per_second),
        );
        let ticks = Self::drain(&mut self.tick_credit, nanos, u128::from(TIMER_HZ));

        let mut advance = Advance::default();
        for step in 0..steps {
            if advance.waiting.is_none() {
                match chip8.step()? {
                    StepOutcome::Executed(_) => advance.steps += 1,
                    StepOutcome::Stalled => {
                        advance.steps += 1;
                        advance.stalled = true;
                    }
                    StepOutcome::Waiting(register) => advance.waiting = Some(register),
                }
            }
            // ticks owed by the time this step is done
            let due = ticks * (step + 1) / steps;
            while advance.ticks < due {
                chip8.tick_timers();
                advance.ticks += 1;
            }
        }
        while advance.ticks < ticks {
            chip8.tick_timers();
            advance.ticks += 1;
        }

        trace!(
            "advanced {:?}: {} steps, {} ticks",
            elapsed,
            advance.steps,
            advance.ticks
        );
        Ok(advance)
    }

    /// Adds `nanos * rate` to `credit` and takes out every whole unit owed
    fn drain(credit: &mut u128, nanos: u128, rate: u128) -> usize {
        *credit += nanos * rate;
        let owed = *credit / NANOS_PER_SECOND;
        *credit %= NANOS_PER_SECOND;
        usize::try_from(owed).unwrap_or(usize::MAX)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
