use crate::constants::MEMORY_SIZE;
use crate::error::Chip8Error;
use crate::keypad::Keypad;
use crate::opcode::Instruction;
use crate::operations::*;
use crate::state::State;

/// Executes a single decoded instruction against the state it is handed
pub type Handler = fn(op: &Instruction, state: State, keys: &Keypad) -> Result<State, Chip8Error>;

/// Instruction families, indexed by an opcode's most significant nibble
const FAMILIES: [Handler; 16] = [
    special, jump, call, ske, skne, skre, load, add, arithmetic, skrne, loadi, jumpi, rand,
    draw, key, misc,
];

/// The `8XYN` instructions, indexed by `N`
///
/// `8XYE` (shl) takes the last slot rather than slot 0xE.
const ARITHMETIC: [Handler; 9] = [mv, or, and, xor, addr, sub, shr, subn, shl];

/// Dispatches an instruction to the handler for its family
///
/// Fails if the instruction would leave the program counter with no opcode to fetch.
pub fn execute(op: &Instruction, state: State, keys: &Keypad) -> Result<State, Chip8Error> {
    let state = FAMILIES[op.family as usize](op, state, keys)?;
    if state.pc as usize > MEMORY_SIZE - 2 {
        return Err(Chip8Error::MemoryOutOfBounds {
            address: state.pc as usize,
        });
    }
    Ok(state)
}

/// `0NNN`: clear, return, or a machine code call we can't make
fn special(op: &Instruction, state: State, keys: &Keypad) -> Result<State, Chip8Error> {
    match op.nnn {
        0x0E0 => clr(op, state, keys),
        0x0EE => rts(op, state, keys),
        address => Err(Chip8Error::NativeCallUnsupported { address }),
    }
}

/// `8XYN`: register to register arithmetic
fn arithmetic(op: &Instruction, state: State, keys: &Keypad) -> Result<State, Chip8Error> {
    let slot = match op.n {
        0x0..=0x7 => op.n as usize,
        0xE => ARITHMETIC.len() - 1,
        _ => return Err(unknown(op)),
    };
    ARITHMETIC[slot](op, state, keys)
}

/// `EXNN`: keypad tests
fn key(op: &Instruction, state: State, keys: &Keypad) -> Result<State, Chip8Error> {
    match op.nn {
        0x9E => skpr(op, state, keys),
        0xA1 => skup(op, state, keys),
        _ => Err(unknown(op)),
    }
}

/// `FXNN`: timers, key waits and index register operations
fn misc(op: &Instruction, state: State, keys: &Keypad) -> Result<State, Chip8Error> {
    match op.nn {
        0x07 => moved(op, state, keys),
        0x0A => keyd(op, state, keys),
        0x15 => loads(op, state, keys),
        0x18 => ld(op, state, keys),
        0x1E => addi(op, state, keys),
        0x29 => ldspr(op, state, keys),
        0x33 => bcd(op, state, keys),
        0x55 => stor(op, state, keys),
        0x65 => read(op, state, keys),
        _ => Err(unknown(op)),
    }
}

#[cfg(test)]
mod test_instruction {
    use super::*;
    use crate::constants::{FONT_BASE, STACK_SIZE};

    /// A fresh state about to execute from 0x200
    fn state() -> State {
        let mut state = State::new(0);
        state.pc = 0x200;
        state
    }

    /// Fetch and execute `op` as if it were stored at the program counter
    fn step(op: u16, mut state: State, keys: &Keypad) -> Result<State, Chip8Error> {
        let pc = state.pc;
        state.memory.write_slice(pc, &op.to_be_bytes())?;
        let instruction = state.fetch()?;
        execute(&instruction, state, keys)
    }

    fn run(op: u16, state: State) -> State {
        step(op, state, &Keypad::new()).unwrap()
    }

    #[test]
    fn test_00e0_cls() {
        let mut state = state();
        state.frame_buffer.draw_sprite(0, 0, &[0x80]);
        let state = run(0x00E0, state);
        assert!(!state.frame_buffer.pixel(0, 0));
        assert!(state.draw_flag);
    }

    #[test]
    fn test_00ee_ret() {
        let mut state = state();
        state.sp = 0x1;
        state.stack[0x0] = 0x0ABC;
        let state = run(0x00EE, state);
        assert_eq!(state.sp, 0x0);
        assert_eq!(state.pc, 0x0ABC);
    }

    #[test]
    fn test_00ee_ret_underflows() {
        let err = step(0x00EE, state(), &Keypad::new()).unwrap_err();
        assert!(matches!(err, Chip8Error::StackUnderflow));
    }

    #[test]
    fn test_0nnn_sys_unsupported() {
        let err = step(0x0123, state(), &Keypad::new()).unwrap_err();
        assert!(matches!(
            err,
            Chip8Error::NativeCallUnsupported { address: 0x123 }
        ));
    }

    #[test]
    fn test_1nnn_jp() {
        let state = run(0x1ABC, state());
        assert_eq!(state.pc, 0x0ABC);
    }

    #[test]
    fn test_1nnn_jp_rejects_odd_address() {
        let err = step(0x1ABD, state(), &Keypad::new()).unwrap_err();
        assert!(matches!(err, Chip8Error::MisalignedJump { address: 0xABD }));
    }

    #[test]
    fn test_2nnn_call() {
        let state = run(0x2124, state());
        assert_eq!(state.sp, 0x1);
        assert_eq!(state.stack[0x0], 0x0202);
        assert_eq!(state.pc, 0x0124);
    }

    #[test]
    fn test_2nnn_call_overflows() {
        let mut state = state();
        state.sp = STACK_SIZE as u8;
        let err = step(0x2124, state, &Keypad::new()).unwrap_err();
        assert!(matches!(err, Chip8Error::StackOverflow { address: 0x124 }));
    }

    #[test]
    fn test_2nnn_call_rejects_odd_address() {
        let err = step(0x2125, state(), &Keypad::new()).unwrap_err();
        assert!(matches!(err, Chip8Error::MisalignedJump { address: 0x125 }));
    }

    #[test]
    fn test_2nnn_call_with_sp_past_stack() {
        let mut state = state();
        state.sp = STACK_SIZE as u8 + 0x1;
        let err = step(0x2204, state, &Keypad::new()).unwrap_err();
        assert!(matches!(err, Chip8Error::StackOverflow { address: 0x204 }));
    }

    #[test]
    fn test_00ee_ret_with_sp_past_stack() {
        let mut state = state();
        state.sp = 0xFF;
        let err = step(0x00EE, state, &Keypad::new()).unwrap_err();
        assert!(matches!(err, Chip8Error::StackOverflow { .. }));
    }

    #[test]
    fn test_3xnn_se_skips() {
        let mut state = state();
        state.v[0x1] = 0x11;
        let state = run(0x3111, state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_3xnn_se_doesntskip() {
        let state = run(0x3111, state());
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_4xnn_sne_skips() {
        let state = run(0x4111, state());
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_4xnn_sne_doesntskip() {
        let mut state = state();
        state.v[0x1] = 0x11;
        let state = run(0x4111, state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_5xy0_se_skips() {
        let mut state = state();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        let state = run(0x5120, state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_5xy0_se_doesntskip() {
        let mut state = state();
        state.v[0x1] = 0x11;
        let state = run(0x5120, state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_5xyn_unknown() {
        let err = step(0x5121, state(), &Keypad::new()).unwrap_err();
        assert!(matches!(err, Chip8Error::UnknownOpcode { opcode: 0x5121 }));
    }

    #[test]
    fn test_6xnn_ld() {
        let state = run(0x6122, state());
        assert_eq!(state.v[0x1], 0x22);
    }

    #[test]
    fn test_7xnn_add() {
        let mut state = state();
        state.v[0x1] = 0x1;
        let state = run(0x7122, state);
        assert_eq!(state.v[0x1], 0x23);
    }

    #[test]
    fn test_7xnn_add_wraps_without_flag() {
        let mut state = state();
        state.v[0x7] = 0x42;
        let state = run(0x77FF, state);
        assert_eq!(state.v[0x7], 0x41);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy0_ld() {
        let mut state = state();
        state.v[0x2] = 0x1;
        let state = run(0x8120, state);
        assert_eq!(state.v[0x1], 0x1);
    }

    #[test]
    fn test_8xy1_or() {
        let mut state = state();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        let state = run(0x8121, state);
        assert_eq!(state.v[0x1], 0x7);
    }

    #[test]
    fn test_8xy2_and() {
        let mut state = state();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        let state = run(0x8122, state);
        assert_eq!(state.v[0x1], 0x2);
    }

    #[test]
    fn test_8xy3_xor() {
        let mut state = state();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        let state = run(0x8123, state);
        assert_eq!(state.v[0x1], 0x5);
    }

    #[test]
    fn test_8xy4_add_nocarry() {
        let mut state = state();
        state.v[0x1] = 0xEE;
        state.v[0x2] = 0x11;
        let state = run(0x8124, state);
        assert_eq!(state.v[0x1], 0xFF);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy4_add_carry() {
        let mut state = state();
        state.v[0x1] = 0xFF;
        state.v[0x2] = 0x11;
        let state = run(0x8124, state);
        assert_eq!(state.v[0x1], 0x10);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy4_flag_written_after_result() {
        // VF is both an operand and the flag; the flag wins
        let mut state = state();
        state.v[0xF] = 0xFF;
        state.v[0x1] = 0x01;
        let state = run(0x8F14, state);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_noborrow() {
        let mut state = state();
        state.v[0x1] = 0x33;
        state.v[0x2] = 0x11;
        let state = run(0x8125, state);
        assert_eq!(state.v[0x1], 0x22);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_equal_is_noborrow() {
        let mut state = state();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        let state = run(0x8125, state);
        assert_eq!(state.v[0x1], 0x0);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_borrow() {
        let mut state = state();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x12;
        let state = run(0x8125, state);
        assert_eq!(state.v[0x1], 0xFF);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy6_shr_reads_vy() {
        let mut state = state();
        state.v[0x1] = 0xF0;
        state.v[0x2] = 0x5;
        let state = run(0x8126, state);
        assert_eq!(state.v[0x1], 0x2);
        assert_eq!(state.v[0x2], 0x5);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy6_shr_nolsb() {
        let mut state = state();
        state.v[0x2] = 0x4;
        let state = run(0x8126, state);
        assert_eq!(state.v[0x1], 0x2);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy7_subn_noborrow() {
        let mut state = state();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x33;
        let state = run(0x8127, state);
        assert_eq!(state.v[0x1], 0x22);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy7_subn_borrow() {
        let mut state = state();
        state.v[0x1] = 0x12;
        state.v[0x2] = 0x11;
        let state = run(0x8127, state);
        assert_eq!(state.v[0x1], 0xFF);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xye_shl_msb() {
        let mut state = state();
        state.v[0x2] = 0x81;
        let state = run(0x812E, state);
        assert_eq!(state.v[0x1], 0x2);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xye_shl_nomsb() {
        let mut state = state();
        state.v[0x2] = 0x4;
        let state = run(0x812E, state);
        assert_eq!(state.v[0x1], 0x8);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xyn_gaps_are_unknown() {
        for n in [0x8, 0x9, 0xA, 0xB, 0xC, 0xD, 0xF] {
            let op = 0x8120 | n;
            let err = step(op, state(), &Keypad::new()).unwrap_err();
            assert!(matches!(err, Chip8Error::UnknownOpcode { opcode } if opcode == op));
        }
    }

    #[test]
    fn test_9xy0_sne_skips() {
        let mut state = state();
        state.v[0x1] = 0x11;
        let state = run(0x9120, state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_9xy0_sne_doesntskip() {
        let mut state = state();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        let state = run(0x9120, state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_9xyn_unknown() {
        let err = step(0x9121, state(), &Keypad::new()).unwrap_err();
        assert!(matches!(err, Chip8Error::UnknownOpcode { opcode: 0x9121 }));
    }

    #[test]
    fn test_annn_ld() {
        let state = run(0xAABC, state());
        assert_eq!(state.i, 0xABC);
    }

    #[test]
    fn test_bnnn_jp() {
        let mut state = state();
        state.v[0x0] = 0x2;
        let state = run(0xBABC, state);
        assert_eq!(state.pc, 0xABE);
    }

    #[test]
    fn test_bnnn_jp_wraps_to_12_bits() {
        let mut state = state();
        state.v[0x0] = 0x4;
        let state = run(0xBFFE, state);
        assert_eq!(state.pc, 0x002);
    }

    #[test]
    fn test_bnnn_jp_rejects_odd_address() {
        let mut state = state();
        state.v[0x0] = 0x1;
        let err = step(0xB200, state, &Keypad::new()).unwrap_err();
        assert!(matches!(err, Chip8Error::MisalignedJump { address: 0x201 }));
    }

    #[test]
    fn test_skip_past_memory_fails() {
        let mut state = state();
        state.pc = 0xFFC;
        let err = step(0x4111, state, &Keypad::new()).unwrap_err();
        assert!(matches!(err, Chip8Error::MemoryOutOfBounds { address: 0x1000 }));
    }

    #[test]
    fn test_last_word_has_nothing_to_fall_through_to() {
        let mut state = state();
        state.pc = 0xFFE;
        let err = step(0x6122, state, &Keypad::new()).unwrap_err();
        assert!(matches!(err, Chip8Error::MemoryOutOfBounds { address: 0x1000 }));
    }

    #[test]
    fn test_cxnn_rnd_masks() {
        let mut state = state();
        state.v[0x1] = 0xFF;
        let state = run(0xC10F, state);
        assert_eq!(state.v[0x1] & 0xF0, 0x0);
    }

    #[test]
    fn test_cxnn_rnd_zero_mask() {
        let mut state = state();
        state.v[0x1] = 0xFF;
        let state = run(0xC100, state);
        assert_eq!(state.v[0x1], 0x0);
    }

    #[test]
    fn test_dxyn_drw_draws() {
        let mut state = state();
        state.v[0x0] = 0x1;
        state.i = FONT_BASE;
        // Draw the 0x0 glyph with a 1x 1y offset
        let state = run(0xD005, state);
        let expected = [
            [true, true, true, true],
            [true, false, false, true],
            [true, false, false, true],
            [true, false, false, true],
            [true, true, true, true],
        ];
        for (row, pixels) in expected.iter().enumerate() {
            let drawn: Vec<bool> = (1..5).map(|x| state.frame_buffer.pixel(x, row + 1)).collect();
            assert_eq!(drawn, pixels);
        }
        assert_eq!(state.v[0xF], 0x0);
        assert!(state.draw_flag);
    }

    #[test]
    fn test_dxyn_drw_collides() {
        let mut state = state();
        state.frame_buffer.draw_sprite(0, 0, &[0x80]);
        state.i = FONT_BASE;
        let state = run(0xD001, state);
        assert_eq!(state.v[0xF], 0x1);
        assert!(!state.frame_buffer.pixel(0, 0));
    }

    #[test]
    fn test_dxyn_drw_wraps_origin() {
        let mut state = state();
        state.v[0x0] = 70;
        state.v[0x1] = 33;
        state.i = 0x300;
        state.memory.write(0x300, 0x80).unwrap();
        let state = run(0xD011, state);
        assert!(state.frame_buffer.pixel(6, 1));
    }

    #[test]
    fn test_dxyn_drw_sprite_past_memory() {
        let mut state = state();
        state.i = 0xFFE;
        let err = step(0xD003, state, &Keypad::new()).unwrap_err();
        assert!(matches!(err, Chip8Error::MemoryOutOfBounds { .. }));
    }

    #[test]
    fn test_ex9e_skp_skips() {
        let mut state = state();
        let mut keys = Keypad::new();
        keys.press(0xE);
        state.v[0x1] = 0xE;
        let state = step(0xE19E, state, &keys).unwrap();
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_ex9e_skp_masks_key() {
        let mut state = state();
        let mut keys = Keypad::new();
        keys.press(0xE);
        state.v[0x1] = 0x1E;
        let state = step(0xE19E, state, &keys).unwrap();
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_ex9e_skp_doesntskip() {
        let state = run(0xE19E, state());
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_exa1_sknp_skips() {
        let state = run(0xE1A1, state());
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_exa1_sknp_doesntskip() {
        let mut state = state();
        let mut keys = Keypad::new();
        keys.press(0xE);
        state.v[0x1] = 0xE;
        let state = step(0xE1A1, state, &keys).unwrap();
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_exnn_unknown() {
        let err = step(0xE1A2, state(), &Keypad::new()).unwrap_err();
        assert!(matches!(err, Chip8Error::UnknownOpcode { opcode: 0xE1A2 }));
    }

    #[test]
    fn test_fx07_ld() {
        let mut state = state();
        state.delay_timer = 0xF;
        let state = run(0xF107, state);
        assert_eq!(state.v[0x1], 0xF);
    }

    #[test]
    fn test_fx0a_ld_sets_awaiting_key() {
        let state = run(0xF10A, state());
        assert_eq!(state.awaiting_key, Some(0x1));
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_fx15_ld() {
        let mut state = state();
        state.v[0x1] = 0xF;
        let state = run(0xF115, state);
        assert_eq!(state.delay_timer, 0xF);
    }

    #[test]
    fn test_fx18_ld() {
        let mut state = state();
        state.v[0x1] = 0xF;
        let state = run(0xF118, state);
        assert_eq!(state.sound_timer, 0xF);
    }

    #[test]
    fn test_fx1e_add() {
        let mut state = state();
        state.i = 0x1;
        state.v[0x1] = 0x1;
        let state = run(0xF11E, state);
        assert_eq!(state.i, 0x2);
    }

    #[test]
    fn test_fx1e_add_wraps_to_12_bits() {
        let mut state = state();
        state.i = 0xFFF;
        state.v[0x1] = 0x2;
        let state = run(0xF11E, state);
        assert_eq!(state.i, 0x1);
    }

    #[test]
    fn test_fx29_ld() {
        let mut state = state();
        state.v[0x1] = 0xA;
        let state = run(0xF129, state);
        assert_eq!(state.i, FONT_BASE + 5 * 10);
    }

    #[test]
    fn test_fx29_ld_masks_digit() {
        let mut state = state();
        state.v[0x1] = 0x12;
        let state = run(0xF129, state);
        assert_eq!(state.i, FONT_BASE + 5 * 2);
    }

    #[test]
    fn test_fx33_ld() {
        let mut state = state();
        // 0x7B -> 123
        state.v[0x1] = 0x7B;
        state.i = 0x300;
        let state = run(0xF133, state);
        assert_eq!(state.memory.as_bytes()[0x300..0x303], [0x1, 0x2, 0x3]);
        assert_eq!(state.i, 0x300);
    }

    #[test]
    fn test_fx33_ld_past_memory() {
        let mut state = state();
        state.i = 0xFFE;
        let err = step(0xF133, state, &Keypad::new()).unwrap_err();
        assert!(matches!(err, Chip8Error::MemoryOutOfBounds { .. }));
    }

    #[test]
    fn test_fx55_ld() {
        let mut state = state();
        state.i = 0x300;
        state.v[0x0..0x5].copy_from_slice(&[0x1, 0x2, 0x3, 0x4, 0x5]);
        let state = run(0xF455, state);
        assert_eq!(state.memory.as_bytes()[0x300..0x306], [0x1, 0x2, 0x3, 0x4, 0x5, 0x0]);
        assert_eq!(state.i, 0x300);
    }

    #[test]
    fn test_fx65_ld() {
        let mut state = state();
        state.i = 0x300;
        state
            .memory
            .write_slice(0x300, &[0x1, 0x2, 0x3, 0x4, 0x5, 0x6])
            .unwrap();
        let state = run(0xF465, state);
        assert_eq!(state.v[0x0..0x6], [0x1, 0x2, 0x3, 0x4, 0x5, 0x0]);
        assert_eq!(state.i, 0x300);
    }

    #[test]
    fn test_fxnn_unknown() {
        let err = step(0xF1FF, state(), &Keypad::new()).unwrap_err();
        assert!(matches!(err, Chip8Error::UnknownOpcode { opcode: 0xF1FF }));
    }
}
