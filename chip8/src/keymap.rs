/// # Keymap
/// Chip-8 input is generated with a hexadecimal keypad, laid out on a QWERTY keyboard as
///
/// ```text
/// Keypad      Keyboard
/// 1 2 3 C     1 2 3 4
/// 4 5 6 D     Q W E R
/// 7 8 9 E     A S D F
/// A 0 B F     Z X C V
/// ```
pub fn keymap(key: char) -> Option<u8> {
    match key.to_ascii_lowercase() {
        '1' => Some(0x1),
        '2' => Some(0x2),
        '3' => Some(0x3),
        '4' => Some(0xC),
        'q' => Some(0x4),
        'w' => Some(0x5),
        'e' => Some(0x6),
        'r' => Some(0xD),
        'a' => Some(0x7),
        's' => Some(0x8),
        'd' => Some(0x9),
        'f' => Some(0xE),
        'z' => Some(0xA),
        'x' => Some(0x0),
        'c' => Some(0xB),
        'v' => Some(0xF),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_keypad_corners() {
        assert_eq!(keymap('1'), Some(0x1));
        assert_eq!(keymap('4'), Some(0xC));
        assert_eq!(keymap('z'), Some(0xA));
        assert_eq!(keymap('V'), Some(0xF));
    }

    #[test]
    fn test_covers_every_key_once() {
        let mut keys: Vec<u8> = "1234qwerasdfzxcv".chars().filter_map(keymap).collect();
        keys.sort_unstable();
        assert_eq!(keys, (0x0..=0xF).collect::<Vec<u8>>());
    }

    #[test]
    fn test_ignores_unmapped_keys() {
        assert_eq!(keymap('p'), None);
        assert_eq!(keymap(' '), None);
    }
}
