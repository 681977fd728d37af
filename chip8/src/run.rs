use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use log::{error, info, warn};

use chip8_core::{Chip8, Chip8Error, Cycle};
use chip8_display::Display;

use crate::keymap::keymap;

/// Everything the driver needs to know to run a rom
#[derive(Debug)]
pub struct Config {
    pub rom: PathBuf,
    /// Instructions to execute before stopping; `None` runs until an error
    pub cycles: Option<u64>,
    /// Instructions per second
    pub clock_speed: u32,
    /// Timer decrements per second
    pub timer_rate: u32,
    /// Keyboard characters held down for the whole run
    pub keys: String,
    pub seed: u64,
    /// Run as fast as possible instead of at `clock_speed`
    pub no_throttle: bool,
}

/// Why `drive` stopped ticking
#[derive(Debug)]
enum Halt {
    CycleLimit,
    /// Held keys were pressed before the run, so nothing can satisfy `FX0A`
    AwaitingKey,
    Failed(Chip8Error),
}

/// Ticks `chip8` until `limit` instructions have run, one fails, or the rom waits on a key
///
/// Timers are stepped once every `cycles_per_timer` instructions. With a `throttle` each
/// instruction takes at least that long.
///
/// Returns how many instructions were executed and why it stopped.
fn drive(
    chip8: &mut Chip8,
    limit: Option<u64>,
    cycles_per_timer: u64,
    throttle: Option<Duration>,
) -> (u64, Halt) {
    let mut executed: u64 = 0;
    let mut last_cycle = Instant::now();

    while limit.map_or(true, |limit| executed < limit) {
        match chip8.tick() {
            Ok(Cycle::AwaitingKey) => return (executed, Halt::AwaitingKey),
            Ok(_) => executed += 1,
            Err(e) => return (executed, Halt::Failed(e)),
        }

        if executed % cycles_per_timer == 0 {
            chip8.step_timers();
        }

        // Handle timing
        if let Some(cycle_time) = throttle {
            let elapsed_cycle_time = last_cycle.elapsed();
            if cycle_time > elapsed_cycle_time {
                std::thread::sleep(cycle_time - elapsed_cycle_time);
            }
            last_cycle = Instant::now();
        }
    }
    (executed, Halt::CycleLimit)
}

pub fn run(config: Config) -> anyhow::Result<()> {
    if config.clock_speed == 0 || config.timer_rate == 0 {
        bail!("clock speed and timer rate must be above 0");
    }

    let mut chip8 = Chip8::with_seed(config.seed);
    chip8
        .load_from_file(&config.rom)
        .with_context(|| format!("unable to load {}", config.rom.display()))?;
    info!("successfully loaded {}", config.rom.display());

    for c in config.keys.chars() {
        match keymap(c) {
            Some(key) => chip8.key_press(key),
            None => bail!("{:?} isn't mapped to a key", c),
        }
    }

    let throttle = (!config.no_throttle).then(|| Duration::from_secs(1) / config.clock_speed);
    let cycles_per_timer = u64::from((config.clock_speed / config.timer_rate).max(1));
    let (executed, halt) = drive(&mut chip8, config.cycles, cycles_per_timer, throttle);
    match halt {
        Halt::CycleLimit => {}
        Halt::AwaitingKey => warn!("halting after {} cycles: rom is waiting for a key", executed),
        Halt::Failed(e) => error!("halting after {} cycles: {}", executed, e),
    }

    info!("stopped after {} cycles", executed);
    Display::default()
        .with_border()
        .draw(chip8.frame(), &mut io::stdout().lock())
        .context("unable to draw the final frame")?;
    Ok(())
}
