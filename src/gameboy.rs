use crate::cpu::CPU;
use crate::mem::{Bus, Cartridge};

/// Machine cycles in one 1/60 s frame at 4194304 Hz.
pub const CYCLES_PER_FRAME: u32 = 4_194_304 / 4 / 60;

#[derive(Debug)]
pub struct GameBoy {
  pub cpu: CPU,
  pub bus: Bus,
}

impl GameBoy {
  pub fn new(cart: Cartridge) -> GameBoy {
    GameBoy {
      cpu: CPU::new(),
      bus: Bus::with_cartridge(cart),
    }
  }

  /// Run one instruction (or interrupt dispatch, or halted idle) and let
  /// the timer catch up. Returns the machine cycles taken.
  pub fn step(&mut self) -> u32 {
    let m = self.cpu.step(&mut self.bus);
    self.bus.step(m);
    m
  }

  /// Step until a frame's worth of cycles has run. The overshoot of the
  /// last instruction is returned.
  pub fn run_frame(&mut self) -> u32 {
    let mut t = 0;
    while t < CYCLES_PER_FRAME {
      t += self.step();
    }
    t - CYCLES_PER_FRAME
  }

  /// Everything the program wrote to the serial port since the last call.
  pub fn take_serial(&mut self) -> Vec<u8> {
    self.bus.io.take_serial()
  }
}
