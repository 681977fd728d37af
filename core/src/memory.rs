use crate::constants::{FONT_BASE, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET};
use crate::error::Chip8Error;

/// # Memory
/// 4096 bytes of flat, byte-addressable memory.
///
/// - `0x000..0x200` is reserved for the interpreter and holds the sprite sheet
/// - `0x200..0x1000` holds the loaded ROM along with any data it writes
///
/// Every accessor is bounds checked; reaching past `0xFFF` is reported as
/// `Chip8Error::MemoryOutOfBounds` rather than panicking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            bytes: [0; MEMORY_SIZE],
        }
    }

    /// Copy a ROM into memory starting at `PROGRAM_START`
    ///
    /// Nothing is written if the ROM doesn't fit.
    ///
    /// # Arguments
    /// * `rom` the raw bytes of the program
    pub fn load(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        self.write_slice(PROGRAM_START, rom)
    }

    /// Write the sprite sheet to the reserved region at `FONT_BASE`
    pub fn install_font(&mut self) {
        let start = FONT_BASE as usize;
        self.bytes[start..start + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
    }

    pub fn read(&self, address: u16) -> Result<u8, Chip8Error> {
        self.bytes
            .get(address as usize)
            .copied()
            .ok_or(Chip8Error::MemoryOutOfBounds {
                address: address as usize,
            })
    }

    pub fn write(&mut self, address: u16, value: u8) -> Result<(), Chip8Error> {
        let cell = self
            .bytes
            .get_mut(address as usize)
            .ok_or(Chip8Error::MemoryOutOfBounds {
                address: address as usize,
            })?;
        *cell = value;
        Ok(())
    }

    /// Reads the big-endian word starting at `address`
    pub fn word(&self, address: u16) -> Result<u16, Chip8Error> {
        let bytes = self.slice(address, 2)?;
        Ok(u16::from(bytes[0]) << 8 | u16::from(bytes[1]))
    }

    /// Borrow `len` bytes starting at `address`
    pub fn slice(&self, address: u16, len: usize) -> Result<&[u8], Chip8Error> {
        let range = Self::range(address, len)?;
        Ok(&self.bytes[range])
    }

    /// Overwrite `values.len()` bytes starting at `address`
    pub fn write_slice(&mut self, address: u16, values: &[u8]) -> Result<(), Chip8Error> {
        let range = Self::range(address, values.len())?;
        self.bytes[range].copy_from_slice(values);
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8; MEMORY_SIZE] {
        &self.bytes
    }

    fn range(address: u16, len: usize) -> Result<std::ops::Range<usize>, Chip8Error> {
        let start = address as usize;
        let end = start + len;
        if end > MEMORY_SIZE {
            // Report the first byte that doesn't exist
            return Err(Chip8Error::MemoryOutOfBounds {
                address: start.max(MEMORY_SIZE),
            });
        }
        Ok(start..end)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
