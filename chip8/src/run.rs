use std::error::Error;
use std::time::Instant;

use log::{error, info};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use vip8::constants::TIMER_PERIOD;
use vip8::{Chip8, Config, Scheduler, Status};
use vip8_display::Display;

use crate::audio::Beeper;
use crate::keymap::keymap;

const TITLE: &str = "VIP-8";

/// Runs `rom` in a window until it is closed.
///
/// Besides the keypad:
/// - `P` pauses and resumes
/// - `Backspace` resets the machine and reloads the ROM
/// - `Escape` quits
pub fn run(rom: &[u8], config: &Config, scale: u32) -> Result<(), Box<dyn Error>> {
    let mut chip8 = Chip8::with_config(config);
    chip8.load_rom(rom)?;
    let mut scheduler = Scheduler::from_config(config);

    // Get SDL2 context
    let sdl = sdl2::init()?;
    let mut display = Display::new(&sdl, TITLE, scale)?;
    let mut beeper = Beeper::new(&sdl)?;
    let mut events = sdl.event_pump()?;

    // Whether the machine is frozen by the user
    let mut paused = false;
    let mut last_frame = Instant::now();

    'event: loop {
        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'event,
                Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } => match (key, keymap(key)) {
                    (_, Some(code)) => chip8.key_press(code)?,
                    (Keycode::P, _) => {
                        paused = !paused;
                        info!("{}", if paused { "paused" } else { "resumed" });
                        display.set_status(TITLE, paused.then_some("paused"))?;
                    }
                    (Keycode::Backspace, _) => {
                        chip8.reset();
                        chip8.load_rom(rom)?;
                        scheduler.reset();
                        display.set_status(TITLE, None)?;
                        info!("reset");
                    }
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(code) = keymap(key) {
                        chip8.key_release(code)?;
                    }
                }
                _ => continue,
            };
        }

        // Update state
        let now = Instant::now();
        let elapsed = now - last_frame;
        last_frame = now;
        let halted = matches!(chip8.status(), Status::Halted(_));
        if !paused && !halted {
            if let Err(err) = scheduler.advance(&mut chip8, elapsed) {
                error!("{}", err);
                display.set_status(TITLE, Some("halted"))?;
            }
        }
        beeper.set(!paused && chip8.sound_active());

        // If the screen changed, render the current frame
        if let Some(frame) = chip8.take_frame() {
            display.render(frame)?;
        }

        // Handle timing
        let spent = now.elapsed();
        if spent < TIMER_PERIOD {
            std::thread::sleep(TIMER_PERIOD - spent);
        }
    }
    Ok(())
}
