use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{ADDRESS_MASK, STACK_SIZE};
use crate::error::Chip8Error;
use crate::frame::FrameBuffer;
use crate::memory::Memory;
use crate::opcode::Instruction;

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is also the carry, borrow, shift and collision flag
/// - (i) a memory address register; only the low 12 bits are ever set
///
/// Counter
/// - (pc) a 16-bit program counter, always even
///
/// Pointer
/// - (sp) the number of return addresses on the stack
///
/// Timers
/// - 2 8-bit timers (delay & sound)
/// - they only count down when the driver calls `Chip8::step_timers`
///
/// ## Memory
/// - 12 entry stack of return addresses for nested subroutines
/// - 4096 bytes of addressable memory
/// - 64x32 pixel frame buffer
///     - stores the contents of the next frame to be drawn
///
/// ## Input
/// - Emulation halts while `awaiting_key` names the register a key should go to
///
/// ## Randomness
/// - a seeded generator backing `CXNN`, reseeded from the same seed on every reset
#[derive(Clone, Debug)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub awaiting_key: Option<u8>,
    seed: u64,
    rng: StdRng,
}

impl State {
    /// A zeroed state with the sprite sheet installed
    ///
    /// # Arguments
    /// * `seed` the seed `CXNN` draws its random bytes from
    pub fn new(seed: u64) -> Self {
        let mut memory = Memory::new();
        memory.install_font();

        State {
            v: [0; 16],
            i: 0,
            pc: 0,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: FrameBuffer::new(),
            draw_flag: false,
            awaiting_key: None,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Return to the state `new` produced, reseeding the random generator
    pub fn reset(&mut self) {
        *self = State::new(self.seed);
    }

    /// A uniformly distributed random byte
    pub fn random(&mut self) -> u8 {
        self.rng.gen()
    }

    /// Reads the opcode at the program counter and moves the counter past it
    ///
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn fetch(&mut self) -> Result<Instruction, Chip8Error> {
        let op = self.memory.word(self.pc)?;
        self.pc += 0x2;
        Ok(Instruction::decode(op))
    }

    /// Sets I, dropping anything above 12 bits
    pub fn set_i(&mut self, address: u16) {
        self.i = address & ADDRESS_MASK;
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}
