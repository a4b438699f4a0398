use anyhow::{bail, Result};

use crate::mem::mbc::{Banks, MBC, MBC0, MBC1, RAM_BANK_SIZE, ROM_BANK_SIZE};

const HEADER_END: usize = 0x150;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Kind {
  RomOnly,
  MBC1,
}

/// Fields decoded from the cartridge header at 0x0134..0x0150.
#[derive(Debug, Clone)]
pub struct Header {
  pub title: String,
  pub manufacturer: String,
  pub cgb_flag: u8,
  pub sgb_flag: u8,
  pub cart_type: u8,
  pub rom_size: u8,
  pub ram_size: u8,
  pub destination: u8,
  pub checksum: u8,

  pub kind: Kind,
  pub ram: bool,
  pub battery: bool,
}

impl Header {
  pub fn parse(data: &[u8]) -> Result<Header> {
    if data.len() < HEADER_END {
      bail!("ROM image too small for a header: {} bytes", data.len());
    }

    let cart_type = data[0x147];
    let (kind, ram, battery) = match cart_type {
      0x00 => (Kind::RomOnly, false, false),
      0x01 => (Kind::MBC1, false, false),
      0x02 => (Kind::MBC1, true, false),
      0x03 => (Kind::MBC1, true, true),
      0x08 => (Kind::RomOnly, true, false),
      0x09 => (Kind::RomOnly, true, true),
      t => bail!("Unknown cartridge type: {:#04x}", t),
    };

    Ok(Header {
      title: ascii(&data[0x134..0x144]),
      manufacturer: ascii(&data[0x13f..0x143]),
      cgb_flag: data[0x143],
      sgb_flag: data[0x146],
      cart_type,
      rom_size: data[0x148],
      ram_size: data[0x149],
      destination: data[0x14a],
      checksum: data[0x14d],

      kind,
      ram,
      battery,
    })
  }

  /// Number of 16 KiB ROM banks.
  pub fn rom_banks(&self) -> Result<usize> {
    match self.rom_size {
      0x00..=0x08 => Ok(2 << self.rom_size),
      s => bail!("Unknown ROM size code: {:#04x}", s),
    }
  }

  /// Size of cartridge RAM in bytes.
  pub fn ram_bytes(&self) -> Result<usize> {
    Ok(match self.ram_size {
      0x00 => 0,
      0x01 => {
        warn!("RAM size code 0x01 is unused, treating as no RAM");
        0
      }
      0x02 => 0x2000,
      0x03 => 0x8000,
      0x04 => 0x20000,
      0x05 => 0x10000,
      s => bail!("Unknown RAM size code: {:#04x}", s),
    })
  }
}

fn ascii(bytes: &[u8]) -> String {
  bytes
    .iter()
    .take_while(|&&b| b != 0)
    .map(|&b| b as char)
    .collect()
}

/// The header checksum covers 0x0134..=0x014c.
pub fn header_checksum(data: &[u8]) -> u8 {
  data[0x134..=0x14c]
    .iter()
    .fold(0u8, |x, &b| x.wrapping_sub(b).wrapping_sub(1))
}

/// Address bits needed to pick one of `count` banks.
fn bank_bits(count: usize) -> u32 {
  if count <= 1 {
    0
  } else {
    count.next_power_of_two().trailing_zeros()
  }
}

#[derive(Debug)]
pub struct Cartridge {
  pub header: Header,
  banks: Banks,
  mbc: Box<dyn MBC>,
}

impl Cartridge {
  pub fn new(data: Vec<u8>) -> Result<Cartridge> {
    let header = Header::parse(&data)?;

    if header_checksum(&data) != header.checksum {
      warn!(
        "Header checksum mismatch: computed {:#04x}, header says {:#04x}",
        header_checksum(&data),
        header.checksum
      );
    }

    let rom_count = header.rom_banks()?;
    if data.len() < rom_count * ROM_BANK_SIZE {
      warn!(
        "ROM image is {} bytes, header declares {}; padding with 0xff",
        data.len(),
        rom_count * ROM_BANK_SIZE
      );
    }
    let bank = |n: usize| -> Vec<u8> {
      let start = (n * ROM_BANK_SIZE).min(data.len());
      let end = ((n + 1) * ROM_BANK_SIZE).min(data.len());
      let mut bank = data[start..end].to_vec();
      bank.resize(ROM_BANK_SIZE, 0xff);
      bank
    };

    let ram_count = if header.ram {
      header.ram_bytes()? / RAM_BANK_SIZE
    } else {
      0
    };

    let banks = Banks {
      rom0: bank(0),
      rom: (1..rom_count).map(|n| bank(n)).collect(),
      ram: vec![vec![0xff; RAM_BANK_SIZE]; ram_count],
      rom_bank_bits: bank_bits(rom_count),
      ram_bank_bits: bank_bits(ram_count),
    };

    let mbc: Box<dyn MBC> = match header.kind {
      Kind::RomOnly => Box::new(MBC0::new()),
      Kind::MBC1 => Box::new(MBC1::new()),
    };

    info!(
      "Loaded {:?}: type {:#04x} ({:?}), {} ROM banks, {} RAM banks",
      header.title, header.cart_type, header.kind, rom_count, ram_count
    );

    Ok(Cartridge { header, banks, mbc })
  }

  pub fn rb(&self, addr: u16) -> u8 {
    self.mbc.rb(&self.banks, addr)
  }

  pub fn wb(&mut self, addr: u16, value: u8) {
    self.mbc.wb(&mut self.banks, addr, value)
  }

  pub fn rom_banks(&self) -> usize {
    self.banks.rom.len() + 1
  }

  pub fn ram_banks(&self) -> usize {
    self.banks.ram.len()
  }

  pub fn rom_bank_bits(&self) -> u32 {
    self.banks.rom_bank_bits
  }

  pub fn ram_bank_bits(&self) -> u32 {
    self.banks.ram_bank_bits
  }
}
