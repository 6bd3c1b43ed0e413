/// # Timers
/// Two 8-bit timers that count down towards 0 once per tick, at 60Hz.
/// - the delay timer is read and written by programs for timing
/// - the sound timer plays a tone for as long as it is above 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timers {
    delay: u8,
    sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decrements both timers, stopping at 0
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    pub fn delay(&self) -> u8 {
        self.delay
    }

    pub fn set_delay(&mut self, value: u8) {
        self.delay = value;
    }

    pub fn sound(&self) -> u8 {
        self.sound
    }

    pub fn set_sound(&mut self, value: u8) {
        self.sound = value;
    }

    /// Whether a tone should currently be playing
    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }
}
