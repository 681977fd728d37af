use std::path::PathBuf;

use clap::Parser;

use chip8_core::constants::DEFAULT_SEED;
use chip8_core::{CLOCK_SPEED, TIMER_RATE};

mod keymap;
mod run;

/// Run a CHIP-8 rom headlessly and print the final frame
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the rom to run
    rom: PathBuf,

    /// Stop after this many instructions instead of at the first error
    #[arg(short, long)]
    cycles: Option<u64>,

    /// Instructions per second
    #[arg(long, default_value_t = CLOCK_SPEED)]
    clock_speed: u32,

    /// Timer decrements per second
    #[arg(long, default_value_t = TIMER_RATE)]
    timer_rate: u32,

    /// Keys held for the whole run, using the QWERTY layout (e.g. "qe")
    #[arg(short, long, default_value = "")]
    keys: String,

    /// Seed for the random number generator
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Don't sleep between instructions
    #[arg(long)]
    no_throttle: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    run::run(run::Config {
        rom: args.rom,
        cycles: args.cycles,
        clock_speed: args.clock_speed,
        timer_rate: args.timer_rate,
        keys: args.keys,
        seed: args.seed,
        no_throttle: args.no_throttle,
    })
}
