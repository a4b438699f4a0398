#[macro_use]
extern crate log;

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use gb_core::{Cartridge, GameBoy};

#[derive(Parser)]
#[command(about = "Run a Game Boy ROM headless")]
struct Args {
  /// Path to ROM file
  rom: PathBuf,

  /// Number of frames to run
  #[arg(long, default_value_t = 60)]
  frames: usize,

  /// Print bytes sent over the serial port
  #[arg(long)]
  serial: bool,
}

fn main() -> Result<()> {
  env_logger::init();
  let args = Args::parse();

  let data = fs::read(&args.rom)
    .with_context(|| format!("Could not read {}", args.rom.display()))?;
  let cart = Cartridge::new(data)
    .with_context(|| format!("Could not load {}", args.rom.display()))?;
  let mut gb = GameBoy::new(cart);
  if let Some(cart) = gb.bus.cartridge() {
    info!("Running {:?} for {} frames", cart.header.title, args.frames);
  }

  let mut serial = Vec::new();
  for _ in 0..args.frames {
    gb.run_frame();
    serial.extend(gb.take_serial());
  }
  info!(
    "Ran {} frames, {} machine cycles, PC={:#06x}",
    args.frames,
    gb.cpu.cycles(),
    gb.cpu.regs.pc
  );

  if args.serial {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(&serial)?;
    out.flush()?;
  }
  Ok(())
}
