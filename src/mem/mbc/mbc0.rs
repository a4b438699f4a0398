use crate::mem::mbc::{Banks, MBC};

/// No bank controller: 32 KiB of ROM mapped flat, plus at most one
/// RAM bank.
#[derive(Debug, Default)]
pub struct MBC0;

impl MBC0 {
  pub fn new() -> Self {
    MBC0
  }
}

impl MBC for MBC0 {
  fn rb(&self, banks: &Banks, addr: u16) -> u8 {
    match addr >> 12 {
      0x0..=0x3 => banks.rom_rb(0, addr as usize),
      0x4..=0x7 => banks.rom_rb(1, (addr & 0x3fff) as usize),
      0xa..=0xb => match banks.ram.first() {
        Some(ram) => ram[(addr & 0x1fff) as usize],
        None => 0xff,
      },
      _ => panic!("Invalid address to MBC: {:#06x}", addr),
    }
  }

  fn wb(&mut self, banks: &mut Banks, addr: u16, value: u8) {
    match addr >> 12 {
      0x0..=0x7 => (),
      0xa..=0xb => {
        if let Some(ram) = banks.ram.first_mut() {
          ram[(addr & 0x1fff) as usize] = value;
        }
      }
      _ => panic!("Invalid address to MBC: {:#06x}", addr),
    }
  }
}
