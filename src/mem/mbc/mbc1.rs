use crate::mem::mbc::{Banks, MBC};

#[derive(Debug)]
pub struct MBC1 {
  /// Low five bits of the ROM bank number. Never zero.
  bank1: u8,
  /// Two extra bits: upper ROM bank bits, or the RAM bank.
  bank2: u8,
  ram_on: bool,
  mode: Mode,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Mode {
  Simple,
  Advanced,
}

impl MBC1 {
  pub fn new() -> Self {
    Self {
      bank1: 1,
      bank2: 0,
      ram_on: false,
      mode: Mode::Simple,
    }
  }

  fn low_bank(&self, banks: &Banks) -> usize {
    match self.mode {
      Mode::Simple => 0,
      Mode::Advanced => (usize::from(self.bank2) << 5) & banks.rom_bank_mask(),
    }
  }

  fn high_bank(&self, banks: &Banks) -> usize {
    ((usize::from(self.bank2) << 5) | usize::from(self.bank1))
      & banks.rom_bank_mask()
  }

  fn ram_bank(&self, banks: &Banks) -> usize {
    match self.mode {
      Mode::Simple => 0,
      Mode::Advanced => usize::from(self.bank2) & banks.ram_bank_mask(),
    }
  }
}

impl MBC for MBC1 {
  fn rb(&self, banks: &Banks, addr: u16) -> u8 {
    match addr >> 12 {
      0x0..=0x3 => banks.rom_rb(self.low_bank(banks), addr as usize),
      0x4..=0x7 => {
        banks.rom_rb(self.high_bank(banks), (addr & 0x3fff) as usize)
      }
      0xa..=0xb => {
        if !self.ram_on || !banks.has_ram() {
          return 0xff;
        }
        banks.ram[self.ram_bank(banks)][(addr & 0x1fff) as usize]
      }
      _ => panic!("Invalid address to MBC: {:#06x}", addr),
    }
  }

  fn wb(&mut self, banks: &mut Banks, addr: u16, value: u8) {
    match addr >> 12 {
      0x0..=0x1 => {
        self.ram_on = (value & 0x0f) == 0x0a;
        debug!("mbc1: ram {}", if self.ram_on { "on" } else { "off" });
      }
      0x2..=0x3 => {
        self.bank1 = match value & 0x1f {
          0 => 1,
          v => v,
        };
        debug!("mbc1: bank1 = {:#04x}", self.bank1);
      }
      0x4..=0x5 => {
        self.bank2 = value & 0x03;
        debug!("mbc1: bank2 = {:#04x}", self.bank2);
      }
      0x6..=0x7 => {
        self.mode = if value & 0x1 == 0x0 {
          Mode::Simple
        } else {
          Mode::Advanced
        };
        debug!("mbc1: mode = {:?}", self.mode);
      }
      0xa..=0xb => {
        if !self.ram_on || !banks.has_ram() {
          return;
        }
        let bank = self.ram_bank(banks);
        banks.ram[bank][(addr & 0x1fff) as usize] = value
      }
      _ => panic!("Invalid address to MBC: {:#06x}", addr),
    }
  }
}
