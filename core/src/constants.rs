/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// Address at which ROMs are loaded and execution begins
pub const PROGRAM_START: u16 = 0x200;

/// Largest ROM that fits between `PROGRAM_START` and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Address of the first glyph in the sprite sheet
pub const FONT_BASE: u16 = 0x000;

/// Height in bytes (rows) of each glyph in the sprite sheet
pub const GLYPH_HEIGHT: u16 = 5;

/// Index registers and program counters are only ever 12 bits wide
pub const ADDRESS_MASK: u16 = 0x0FFF;

/// Levels of nested subroutines before the stack overflows
pub const STACK_SIZE: usize = 12;

/// Number of keys on the hexadecimal keypad
pub const KEY_COUNT: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Pixels are packed 8 to a byte, most significant bit leftmost
pub const FRAME_BUFFER_SIZE: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT / 8;

/// Instructions per second the driver should aim for
pub const CLOCK_SPEED: u32 = 500;

/// Rate in Hz at which the delay and sound timers count down
pub const TIMER_RATE: u32 = 60;

/// Seed used for `CXNN` when none is supplied
pub const DEFAULT_SEED: u64 = 0xC8;

/// Default depth of the rewind history; 0 disables rewinding
pub const MAX_SAVED_STATES: usize = 0;

/// # Sprite Sheet
/// Glyphs for the hexadecimal digits 0..F, each 8 pixels wide and 5 tall.
///
/// e.g. the glyph for 0 is
/// ```text
/// 0xF0  ****
/// 0x90  *  *
/// 0x90  *  *
/// 0x90  *  *
/// 0xF0  ****
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
