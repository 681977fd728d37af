use std::io;

use thiserror::Error;

/// Everything that can go wrong while loading or running a program.
///
/// None of these are fatal to the host; `Chip8::tick` hands them back to the driver
/// with the machine left exactly as it was before the failing instruction.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("ROM is too large ({size} bytes), at most {max} bytes fit in memory")]
    RomTooLarge { size: usize, max: usize },

    #[error("unable to read ROM: {0}")]
    Io(#[from] io::Error),

    #[error("no ROM has been loaded")]
    NotLoaded,

    #[error("unknown opcode {opcode:#06X}")]
    UnknownOpcode { opcode: u16 },

    #[error("stack overflow at {address:#05X}")]
    StackOverflow { address: u16 },

    #[error("stack underflow: returned with an empty call stack")]
    StackUnderflow,

    #[error("machine code subroutine at {address:#05X} can't be executed")]
    NativeCallUnsupported { address: u16 },

    #[error("memory access out of bounds at {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("jump to odd address {address:#05X}")]
    MisalignedJump { address: u16 },
}
