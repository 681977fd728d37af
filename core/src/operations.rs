use crate::constants::{ADDRESS_MASK, FONT_BASE, GLYPH_HEIGHT, STACK_SIZE};
use crate::error::Chip8Error;
use crate::keypad::Keypad;
use crate::opcode::Instruction;
use crate::state::State;

// Every handler receives the state as it should be after the fetch, with the program
// counter already pointing at the following instruction, and returns the state the
// instruction leaves behind. Handlers that fail do so before writing anything.

/// The error for an opcode that doesn't name any instruction
pub fn unknown(op: &Instruction) -> Chip8Error {
    Chip8Error::UnknownOpcode { opcode: op.opcode }
}

/// Program counters must stay even
fn jump_target(address: u16) -> Result<u16, Chip8Error> {
    if address % 2 == 0 {
        Ok(address)
    } else {
        Err(Chip8Error::MisalignedJump { address })
    }
}

/// clear
pub fn clr(_op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    state.frame_buffer.clear();
    state.draw_flag = true;
    Ok(state)
}

/// PC = STACK.pop()
pub fn rts(_op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    let top = state.sp.checked_sub(0x1).ok_or(Chip8Error::StackUnderflow)?;
    // An sp past the stack can only come from outside; treat it as overflowed
    let address = *state
        .stack
        .get(top as usize)
        .ok_or(Chip8Error::StackOverflow { address: state.pc })?;
    state.sp = top;
    state.pc = address;
    Ok(state)
}

/// PC = addr
pub fn jump(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    state.pc = jump_target(op.nnn)?;
    Ok(state)
}

/// STACK.push(PC); PC = addr
pub fn call(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    if state.sp as usize >= STACK_SIZE {
        return Err(Chip8Error::StackOverflow { address: op.nnn });
    }
    let target = jump_target(op.nnn)?;
    let slot = state
        .stack
        .get_mut(state.sp as usize)
        .ok_or(Chip8Error::StackOverflow { address: op.nnn })?;
    *slot = state.pc;
    state.sp += 0x1;
    state.pc = target;
    Ok(state)
}

/// if Vx == nn then pc += 2
pub fn ske(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    if state.v[op.x as usize] == op.nn {
        state.pc += 0x2;
    }
    Ok(state)
}

/// if Vx != nn then pc += 2
pub fn skne(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    if state.v[op.x as usize] != op.nn {
        state.pc += 0x2;
    }
    Ok(state)
}

/// if Vx == Vy then pc += 2
pub fn skre(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    if op.n != 0x0 {
        return Err(unknown(op));
    }
    if state.v[op.x as usize] == state.v[op.y as usize] {
        state.pc += 0x2;
    }
    Ok(state)
}

/// Vx = nn
pub fn load(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    state.v[op.x as usize] = op.nn;
    Ok(state)
}

/// Vx += nn
/// Add nn to Vx; allow for overflow but implicitly drop it
pub fn add(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    let x = op.x as usize;
    state.v[x] = state.v[x].wrapping_add(op.nn);
    Ok(state)
}

/// Vx = Vy
pub fn mv(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    state.v[op.x as usize] = state.v[op.y as usize];
    Ok(state)
}

/// Vx |= Vy
pub fn or(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    state.v[op.x as usize] |= state.v[op.y as usize];
    Ok(state)
}

/// Vx &= Vy
pub fn and(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    state.v[op.x as usize] &= state.v[op.y as usize];
    Ok(state)
}

/// Vx ^= Vy
pub fn xor(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    state.v[op.x as usize] ^= state.v[op.y as usize];
    Ok(state)
}

/// Vx += Vy; VF = overflow
pub fn addr(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    let (res, over) = state.v[op.x as usize].overflowing_add(state.v[op.y as usize]);
    state.v[op.x as usize] = res;
    state.v[0xF] = u8::from(over);
    Ok(state)
}

/// Vx -= Vy; VF = !underflow
pub fn sub(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    let (vx, vy) = (state.v[op.x as usize], state.v[op.y as usize]);
    state.v[op.x as usize] = vx.wrapping_sub(vy);
    state.v[0xF] = u8::from(vy <= vx);
    Ok(state)
}

/// Vx = Vy >> 1; VF = lsb(Vy)
pub fn shr(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    let vy = state.v[op.y as usize];
    state.v[op.x as usize] = vy >> 1;
    state.v[0xF] = vy & 0x1;
    Ok(state)
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    let (vx, vy) = (state.v[op.x as usize], state.v[op.y as usize]);
    state.v[op.x as usize] = vy.wrapping_sub(vx);
    state.v[0xF] = u8::from(vx <= vy);
    Ok(state)
}

/// Vx = Vy << 1; VF = msb(Vy)
pub fn shl(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    let vy = state.v[op.y as usize];
    state.v[op.x as usize] = vy << 1;
    state.v[0xF] = vy >> 7;
    Ok(state)
}

/// if Vx != Vy then pc +=2
pub fn skrne(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    if op.n != 0x0 {
        return Err(unknown(op));
    }
    if state.v[op.x as usize] != state.v[op.y as usize] {
        state.pc += 0x2;
    }
    Ok(state)
}

/// I = addr
pub fn loadi(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    state.set_i(op.nnn);
    Ok(state)
}

/// PC = V0 + addr
pub fn jumpi(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    let address = (u16::from(state.v[0x0]) + op.nnn) & ADDRESS_MASK;
    state.pc = jump_target(address)?;
    Ok(state)
}

/// Vx = rand_byte & nn
pub fn rand(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    let rand_byte = state.random();
    state.v[op.x as usize] = rand_byte & op.nn;
    Ok(state)
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixels were erased
pub fn draw(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    let x = state.v[op.x as usize] as usize;
    let y = state.v[op.y as usize] as usize;
    let sprite = state.memory.slice(state.i, op.n as usize)?;
    let collision = state.frame_buffer.draw_sprite(x, y, sprite);
    state.v[0xF] = u8::from(collision);
    state.draw_flag = true;
    Ok(state)
}

/// if Vx.pressed then pc += 2
pub fn skpr(op: &Instruction, mut state: State, keys: &Keypad) -> Result<State, Chip8Error> {
    if keys.is_pressed(state.v[op.x as usize] & 0xF) {
        state.pc += 0x2;
    }
    Ok(state)
}

/// if !Vx.pressed then pc += 2
pub fn skup(op: &Instruction, mut state: State, keys: &Keypad) -> Result<State, Chip8Error> {
    if !keys.is_pressed(state.v[op.x as usize] & 0xF) {
        state.pc += 0x2;
    }
    Ok(state)
}

/// Vx = DT
pub fn moved(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    state.v[op.x as usize] = state.delay_timer;
    Ok(state)
}

/// await keypress for Vx
pub fn keyd(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    state.awaiting_key = Some(op.x);
    Ok(state)
}

/// DT = Vx
pub fn loads(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    state.delay_timer = state.v[op.x as usize];
    Ok(state)
}

/// ST = Vx
pub fn ld(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    state.sound_timer = state.v[op.x as usize];
    Ok(state)
}

/// I += Vx
pub fn addi(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    let address = state.i + u16::from(state.v[op.x as usize]);
    state.set_i(address);
    Ok(state)
}

/// I = FONT_BASE + Vx * 5
/// Set I to the memory address of the glyph for the low nibble of Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    let digit = u16::from(state.v[op.x as usize] & 0xF);
    state.set_i(FONT_BASE + digit * GLYPH_HEIGHT);
    Ok(state)
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    let vx = state.v[op.x as usize];
    let bcd = [vx / 100 % 10, vx / 10 % 10, vx % 10];
    state.memory.write_slice(state.i, &bcd)?;
    Ok(state)
}

/// mem[I..=I+x] = V0..=Vx
/// Fill memory starting at address i with V0..=Vx, leaving i as it was
pub fn stor(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    state
        .memory
        .write_slice(state.i, &state.v[..=op.x as usize])?;
    Ok(state)
}

/// V0..=Vx = mem[I..=I+x]
/// Fill V0..=Vx with memory starting at address i, leaving i as it was
pub fn read(op: &Instruction, mut state: State, _keys: &Keypad) -> Result<State, Chip8Error> {
    let len = op.x as usize + 1;
    let values = state.memory.slice(state.i, len)?;
    state.v[..len].copy_from_slice(values);
    Ok(state)
}
