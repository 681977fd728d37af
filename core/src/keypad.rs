use crate::constants::KEY_COUNT;

/// # Keypad
/// The pressed status of the 16 keys 0..F of a hexadecimal keypad.
///
/// Besides the held keys it latches the most recent key-down transition, which is
/// what `FX0A` waits on: a key that was already held before the wait began doesn't
/// satisfy it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keypad {
    pressed: [bool; KEY_COUNT],
    last_press: Option<u8>,
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as held and latch the transition
    ///
    /// Only the low nibble of `key` is used.
    pub fn press(&mut self, key: u8) {
        let key = key & 0xF;
        if !self.pressed[key as usize] {
            self.last_press = Some(key);
        }
        self.pressed[key as usize] = true;
    }

    pub fn release(&mut self, key: u8) {
        self.pressed[(key & 0xF) as usize] = false;
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.pressed[(key & 0xF) as usize]
    }

    /// Consume the latched key-down transition, if there was one
    pub fn take_press(&mut self) -> Option<u8> {
        self.last_press.take()
    }

    /// Forget any latched transition without touching held keys
    pub fn clear_latch(&mut self) {
        self.last_press = None;
    }

    /// Release every key and drop the latch
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
