use std::fmt::Debug;

mod mbc0;
mod mbc1;

pub use self::mbc0::MBC0;
pub use self::mbc1::MBC1;

pub const ROM_BANK_SIZE: usize = 0x4000;
pub const RAM_BANK_SIZE: usize = 0x2000;

/// Backing storage of a cartridge, as seen by its bank controller.
///
/// Bank 0 lives apart from the switchable banks, so `rom[0]` holds
/// bank 1.
#[derive(Debug)]
pub struct Banks {
  pub rom0: Vec<u8>,
  pub rom: Vec<Vec<u8>>,
  pub ram: Vec<Vec<u8>>,

  /// Address bits needed to select any ROM bank.
  pub rom_bank_bits: u32,
  /// Address bits needed to select any RAM bank.
  pub ram_bank_bits: u32,
}

impl Banks {
  /// Read `offset` within ROM bank `bank`.
  pub fn rom_rb(&self, bank: usize, offset: usize) -> u8 {
    if bank == 0 {
      self.rom0[offset]
    } else {
      self.rom[bank - 1][offset]
    }
  }

  pub fn rom_bank_mask(&self) -> usize {
    (1 << self.rom_bank_bits) - 1
  }

  pub fn ram_bank_mask(&self) -> usize {
    (1 << self.ram_bank_bits) - 1
  }

  pub fn has_ram(&self) -> bool {
    !self.ram.is_empty()
  }
}

/// A cartridge bank controller.
///
/// Only 0x0000..=0x7fff and 0xa000..=0xbfff are ever routed here;
/// anything else is a routing bug and panics.
pub trait MBC: Debug {
  fn rb(&self, banks: &Banks, addr: u16) -> u8;
  fn wb(&mut self, banks: &mut Banks, addr: u16, value: u8);
}
