pub mod cartridge;
mod io;
pub mod mbc;
mod timer;

pub use self::cartridge::{Cartridge, Header, Kind};
pub use self::io::Io;
pub use self::timer::Timer;

const VRAM_SIZE: usize = 0x2000;
const WRAM_SIZE: usize = 0x2000;
const HRAM_SIZE: usize = 0x7f;

/// Value seen on reads nothing drives.
pub const OPEN_BUS: u8 = 0xff;

/// Routes CPU addresses to the memory or device behind them.
#[derive(Debug)]
pub struct Bus {
  cart: Option<Cartridge>,
  vram: Vec<u8>,
  wram: Vec<u8>,
  hram: Vec<u8>,
  pub io: Io,

  pub interrupt_enable: u8,
}

impl Bus {
  pub fn new() -> Bus {
    Bus {
      cart: None,
      vram: vec![0; VRAM_SIZE],
      wram: vec![0; WRAM_SIZE],
      hram: vec![0; HRAM_SIZE],
      io: Io::new(),

      interrupt_enable: 0,
    }
  }

  pub fn with_cartridge(cart: Cartridge) -> Bus {
    let mut bus = Bus::new();
    bus.insert(cart);
    bus
  }

  /// Insert `cart`, returning whatever was in the slot before.
  pub fn insert(&mut self, cart: Cartridge) -> Option<Cartridge> {
    self.cart.replace(cart)
  }

  pub fn eject(&mut self) -> Option<Cartridge> {
    self.cart.take()
  }

  pub fn cartridge(&self) -> Option<&Cartridge> {
    self.cart.as_ref()
  }

  pub fn interrupt_flags(&self) -> u8 {
    self.io.interrupt_flags
  }

  pub fn set_interrupt_flags(&mut self, value: u8) {
    self.io.interrupt_flags = value;
  }

  /// Read a byte at address `addr`.
  pub fn rb(&self, addr: u16) -> u8 {
    match addr {
      // Cartridge ROM and RAM
      0x0000..=0x7fff | 0xa000..=0xbfff => match &self.cart {
        Some(cart) => cart.rb(addr),
        None => OPEN_BUS,
      },
      // VRAM
      0x8000..=0x9fff => self.vram[(addr & 0x1fff) as usize],
      // WRAM
      0xc000..=0xdfff => self.wram[(addr & 0x1fff) as usize],
      // I/O Control
      0xff00..=0xff7f => self.io.rb(addr),
      // Zero page.
      0xff80..=0xfffe => self.hram[(addr - 0xff80) as usize],
      0xffff => self.interrupt_enable,
      // Echo RAM, OAM and the unusable gap.
      _ => OPEN_BUS,
    }
  }

  /// Read a 2-byte little-endian word from `addr`.
  pub fn rw(&self, addr: u16) -> u16 {
    let a = u16::from(self.rb(addr));
    let b = u16::from(self.rb(addr.wrapping_add(1)));
    (b << 8) | a
  }

  /// Write `value` at address `addr`.
  pub fn wb(&mut self, addr: u16, value: u8) {
    match addr {
      0x0000..=0x7fff | 0xa000..=0xbfff => {
        if let Some(cart) = self.cart.as_mut() {
          cart.wb(addr, value);
        }
      }
      0x8000..=0x9fff => self.vram[(addr & 0x1fff) as usize] = value,
      0xc000..=0xdfff => self.wram[(addr & 0x1fff) as usize] = value,
      0xff00..=0xff7f => self.io.wb(addr, value),
      0xff80..=0xfffe => self.hram[(addr - 0xff80) as usize] = value,
      0xffff => self.interrupt_enable = value,
      _ => (),
    }
  }

  /// Write a 2-byte little-endian word to `addr`.
  pub fn ww(&mut self, addr: u16, value: u16) {
    self.wb(addr, (value & 0xff) as u8);
    self.wb(addr.wrapping_add(1), ((value >> 8) & 0xff) as u8);
  }

  /// Write an arbitrary number of bytes to memory.
  pub fn write(&mut self, addr: u16, values: &[u8]) {
    let mut cur = addr;
    for v in values {
      self.wb(cur, *v);
      cur = cur.wrapping_add(1);
    }
  }

  /// Advance the timer by `m` machine cycles.
  pub fn step(&mut self, m: u32) {
    self.io.step(m);
  }
}
