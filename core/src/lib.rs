//! A CHIP-8 virtual machine.
//!
//! `Chip8` owns everything: memory, registers, the frame buffer and the keypad.
//! Drivers load a rom, call `tick` at their chosen clock speed and `step_timers`
//! at 60Hz, feed key presses in and read frames out.

pub use chip8::{Chip8, Cycle};
pub use constants::{CLOCK_SPEED, TIMER_RATE};
pub use error::Chip8Error;
pub use frame::FrameBuffer;
pub use keypad::Keypad;
pub use memory::Memory;
pub use opcode::Instruction;
pub use state::State;

mod chip8;
pub mod constants;
mod error;
mod frame;
mod instruction;
mod keypad;
mod memory;
mod opcode;
mod operations;
pub mod state;
