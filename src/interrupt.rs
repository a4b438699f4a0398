/// Interrupt sources, in priority order.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Interrupt {
  VBlank,
  Lcd,
  Timer,
  Serial,
  Joypad,
}

/// Only the low five bits of IE/IF name real sources.
pub const MASK: u8 = 0x1f;

impl Interrupt {
  pub const ALL: [Interrupt; 5] = [
    Interrupt::VBlank,
    Interrupt::Lcd,
    Interrupt::Timer,
    Interrupt::Serial,
    Interrupt::Joypad,
  ];

  pub fn bit(self) -> u8 {
    1 << (self as u8)
  }

  pub fn vector(self) -> u16 {
    match self {
      Interrupt::VBlank => 0x40,
      Interrupt::Lcd => 0x48,
      Interrupt::Timer => 0x50,
      Interrupt::Serial => 0x58,
      Interrupt::Joypad => 0x60,
    }
  }

  /// The highest-priority source set in `pending`, if any.
  pub fn highest(pending: u8) -> Option<Interrupt> {
    Interrupt::ALL
      .iter()
      .copied()
      .find(|i| pending & i.bit() != 0)
  }
}
