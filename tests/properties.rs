use proptest::prelude::*;

use vip8::{Chip8, Config, Instruction, Register};

fn run(rom: &[u8], steps: usize) -> Chip8 {
    let mut chip8 = Chip8::with_config(&Config {
        seed: Some(0),
        ..Config::default()
    });
    chip8.load_rom(rom).unwrap();
    for _ in 0..steps {
        chip8.step().unwrap();
    }
    chip8
}

fn v(chip8: &Chip8, nibble: u8) -> u8 {
    chip8.registers().get(Register::from_nibble(nibble))
}

proptest! {
    #[test]
    fn decode_then_encode_is_identity(op in any::<u16>()) {
        if let Some(instruction) = Instruction::decode(op) {
            prop_assert_eq!(instruction.encode(), op);
            let again = Instruction::decode(instruction.encode());
            prop_assert_eq!(again, Some(instruction));
            prop_assert_eq!(
                again.map(|i| i.to_string()),
                Some(instruction.to_string()),
                "mnemonic changed for {:#06X}",
                op
            );
        }
    }

    #[test]
    fn add_immediate_wraps_without_flag(a in any::<u8>(), b in any::<u8>()) {
        // LD V0, a; ADD V0, b
        let chip8 = run(&[0x60, a, 0x70, b], 2);
        prop_assert_eq!(v(&chip8, 0x0), a.wrapping_add(b));
        prop_assert_eq!(v(&chip8, 0xF), 0);
    }

    #[test]
    fn add_registers_carries(a in any::<u8>(), b in any::<u8>()) {
        // LD V0, a; LD V1, b; ADD V0, V1
        let chip8 = run(&[0x60, a, 0x61, b, 0x80, 0x14], 3);
        prop_assert_eq!(v(&chip8, 0x0), a.wrapping_add(b));
        prop_assert_eq!(v(&chip8, 0xF), u8::from(u16::from(a) + u16::from(b) > 0xFF));
    }

    #[test]
    fn sub_flags_no_borrow(a in any::<u8>(), b in any::<u8>()) {
        // LD V0, a; LD V1, b; SUB V0, V1
        let chip8 = run(&[0x60, a, 0x61, b, 0x80, 0x15], 3);
        prop_assert_eq!(v(&chip8, 0x0), a.wrapping_sub(b));
        prop_assert_eq!(v(&chip8, 0xF), u8::from(a >= b));
    }

    #[test]
    fn overlapping_sprites_collide_when_a_pixel_turns_off(a in any::<u8>(), b in any::<u8>()) {
        let rom = [
            0xA2, 0x0C, // LD I, 0x20C
            0xD0, 0x01, // DRW V0, V0, 1
            0xA2, 0x0D, // LD I, 0x20D
            0xD0, 0x01, // DRW V0, V0, 1
            0x12, 0x08, // JP 0x208
            0x00, 0x00,
            a, b,
        ];
        let mut chip8 = run(&rom, 0);
        prop_assert!(chip8.run_until_stall(10).is_ok());
        prop_assert_eq!(v(&chip8, 0xF), u8::from(a & b != 0));
        let row: u8 = chip8.frame()[0][..8]
            .iter()
            .fold(0, |acc, &pixel| (acc << 1) | pixel);
        prop_assert_eq!(row, a ^ b);
    }
}
