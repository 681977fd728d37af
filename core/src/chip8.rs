use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, trace, warn};

use crate::constants::{DEFAULT_SEED, MAX_SAVED_STATES, PROGRAM_START};
use crate::error::Chip8Error;
use crate::frame::FrameBuffer;
use crate::instruction;
use crate::keypad::Keypad;
use crate::state::State;

/// What a single call to `Chip8::tick` accomplished
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cycle {
    /// The opcode that was executed
    Executed(u16),
    /// `FX0A` is still waiting on a key-down; nothing ran
    AwaitingKey,
    /// A key-down satisfied a pending `FX0A`; the key is now in the register
    KeyReceived(u8),
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `previous_states` for rewinding
///  - `keypad` with public interfaces for manipulating it
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing and rewinding the CPU
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
///
/// Cadence is the driver's business: `tick` runs exactly one instruction and
/// `step_timers` should be called at 60Hz, independently of it.
pub struct Chip8 {
    state: State,
    previous_states: VecDeque<State>,
    history: usize,
    keypad: Keypad,
    loaded: bool,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// A machine whose random number generator is seeded with `seed` on every reset
    pub fn with_seed(seed: u64) -> Self {
        Chip8 {
            state: State::new(seed),
            previous_states: VecDeque::new(),
            history: MAX_SAVED_STATES,
            keypad: Keypad::new(),
            loaded: false,
        }
    }

    /// Keep up to `capacity` previous states so the CPU can be rewound
    pub fn with_history(mut self, capacity: usize) -> Self {
        self.history = capacity;
        self.previous_states = VecDeque::with_capacity(capacity);
        self
    }

    /// Load a rom that's already in memory
    ///
    /// The machine is reset first, so the rom always starts from a clean slate.
    /// A rom that doesn't fit is rejected and the machine is left untouched.
    ///
    /// # Arguments
    /// * `rom` the raw bytes of the program, at most `MAX_ROM_SIZE` long
    pub fn load_from_memory(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        let mut state = State::new(self.state.seed());
        state.memory.load(rom)?;
        state.pc = PROGRAM_START;

        self.reset();
        self.state = state;
        self.loaded = true;
        debug!("loaded {} byte rom", rom.len());
        Ok(())
    }

    /// Load a rom from a reader
    ///
    /// # Arguments
    /// * `reader` a reader that contains a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<(), Chip8Error> {
        let mut rom = Vec::new();
        reader.read_to_end(&mut rom)?;
        self.load_from_memory(&rom)
    }

    /// Load a rom from a file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Chip8Error> {
        let file = File::open(path.as_ref())?;
        debug!("reading rom from {}", path.as_ref().display());
        self.load_rom(&mut BufReader::new(file))
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Return to power-on state
    /// - registers, timers, stack, memory, display and keys are cleared
    /// - the sprite sheet is reinstalled and the random generator reseeded
    /// - the loaded rom is gone, so a new one must be loaded before ticking
    pub fn reset(&mut self) {
        self.state.reset();
        self.keypad.reset();
        self.previous_states.clear();
        self.loaded = false;
        debug!("reset");
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        self.keypad.press(key);
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        self.keypad.release(key);
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    /// Advances the CPU by a single instruction
    /// - if awaiting a keypress, consumes a latched key-down or does nothing
    /// - otherwise fetches and executes the next opcode
    ///
    /// On error the state is exactly as it was before the call.
    pub fn tick(&mut self) -> Result<Cycle, Chip8Error> {
        if !self.loaded {
            return Err(Chip8Error::NotLoaded);
        }

        if let Some(register) = self.state.awaiting_key {
            return Ok(match self.keypad.take_press() {
                Some(key) => {
                    self.save_state();
                    // Only the low nibble names a register
                    let register = register & 0xF;
                    self.state.v[register as usize] = key;
                    self.state.awaiting_key = None;
                    debug!("key {:X} stored in v{:X}", key, register);
                    Cycle::KeyReceived(key)
                }
                None => Cycle::AwaitingKey,
            });
        }

        let mut next = self.state.clone();
        let op = next.fetch()?;
        trace!(
            "{:04X} v{:02X?} i{:04X} pc{:04X}",
            op.opcode,
            self.state.v,
            self.state.i,
            self.state.pc
        );
        let next = instruction::execute(&op, next, &self.keypad)?;

        if next.awaiting_key.is_some() {
            // Only presses from here on count
            self.keypad.clear_latch();
            debug!("awaiting key for v{:X}", op.x);
        }

        self.save_state();
        self.state = next;
        Ok(Cycle::Executed(op.opcode))
    }

    /// Reverses the CPU by a single tick if possible
    /// - if there are previous_states, pops the most recent one and restores it
    ///
    /// Returns whether a state was restored.
    pub fn rewind(&mut self) -> bool {
        match self.previous_states.pop_front() {
            Some(state) => {
                self.state = state;
                true
            }
            None => {
                warn!("no saved states to rewind to");
                false
            }
        }
    }

    /// Puts the current state in previous_states
    /// - if there are already `history` states saved then the oldest is dropped
    fn save_state(&mut self) {
        if self.history == 0 {
            return;
        }
        if self.previous_states.len() == self.history {
            self.previous_states.pop_back();
        }
        self.previous_states.push_front(self.state.clone());
    }

    /// Counts both timers down by one, stopping at 0
    pub fn step_timers(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }

    /// Whether a tone should be playing
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Returns the FrameBuffer if the display should be redrawn, clearing the draw flag
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
