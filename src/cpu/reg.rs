pub const Z: u8 = 0x80;
pub const N: u8 = 0x40;
pub const H: u8 = 0x20;
pub const C: u8 = 0x10;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Registers {
  /// General-purpose registers.
  pub a: u8,
  pub b: u8,
  pub c: u8,
  pub d: u8,
  pub e: u8,
  pub h: u8,
  pub l: u8,

  /// Flag register. Only the top nibble is ever set.
  f: u8,

  /// Program counter.
  pub pc: u16,

  /// Stack pointer.
  pub sp: u16,
}

impl Registers {
  /// Register state left behind by the boot ROM.
  pub fn new() -> Registers {
    Registers {
      a: 0x01,
      f: 0xb0,
      b: 0x00,
      c: 0x13,
      d: 0x00,
      e: 0xd8,
      h: 0x01,
      l: 0x4d,

      sp: 0xfffe,
      pc: 0x100,
    }
  }

  pub fn f(&self) -> u8 {
    self.f
  }
  pub fn set_f(&mut self, value: u8) {
    self.f = value & 0xf0;
  }

  pub fn af(&self) -> u16 {
    (u16::from(self.a) << 8) | u16::from(self.f)
  }
  pub fn bc(&self) -> u16 {
    (u16::from(self.b) << 8) | u16::from(self.c)
  }
  pub fn de(&self) -> u16 {
    (u16::from(self.d) << 8) | u16::from(self.e)
  }
  pub fn hl(&self) -> u16 {
    (u16::from(self.h) << 8) | u16::from(self.l)
  }

  pub fn set_af(&mut self, value: u16) {
    self.a = (value >> 8) as u8;
    self.set_f(value as u8);
  }
  pub fn set_bc(&mut self, value: u16) {
    self.b = (value >> 8) as u8;
    self.c = value as u8;
  }
  pub fn set_de(&mut self, value: u16) {
    self.d = (value >> 8) as u8;
    self.e = value as u8;
  }
  pub fn set_hl(&mut self, value: u16) {
    self.h = (value >> 8) as u8;
    self.l = value as u8;
  }

  pub fn hl_inc(&mut self) {
    let hl = self.hl().wrapping_add(1);
    self.set_hl(hl);
  }
  pub fn hl_dec(&mut self) {
    let hl = self.hl().wrapping_sub(1);
    self.set_hl(hl);
  }

  /// 16-bit operand by pair code: BC, DE, HL, SP.
  pub fn r16(&self, code: u8) -> u16 {
    match code {
      0 => self.bc(),
      1 => self.de(),
      2 => self.hl(),
      3 => self.sp,
      _ => panic!("Invalid r16 code: {}", code),
    }
  }
  pub fn set_r16(&mut self, code: u8, value: u16) {
    match code {
      0 => self.set_bc(value),
      1 => self.set_de(value),
      2 => self.set_hl(value),
      3 => self.sp = value,
      _ => panic!("Invalid r16 code: {}", code),
    }
  }

  /// Stack operand by pair code: BC, DE, HL, AF.
  pub fn r16_stk(&self, code: u8) -> u16 {
    match code {
      0 => self.bc(),
      1 => self.de(),
      2 => self.hl(),
      3 => self.af(),
      _ => panic!("Invalid r16stk code: {}", code),
    }
  }
  pub fn set_r16_stk(&mut self, code: u8, value: u16) {
    match code {
      0 => self.set_bc(value),
      1 => self.set_de(value),
      2 => self.set_hl(value),
      3 => self.set_af(value),
      _ => panic!("Invalid r16stk code: {}", code),
    }
  }

  /// Memory operand address by pair code: BC, DE, HL+, HL-.
  /// The HL forms step HL after producing the address.
  pub fn r16_mem(&mut self, code: u8) -> u16 {
    match code {
      0 => self.bc(),
      1 => self.de(),
      2 => {
        let hl = self.hl();
        self.hl_inc();
        hl
      }
      3 => {
        let hl = self.hl();
        self.hl_dec();
        hl
      }
      _ => panic!("Invalid r16mem code: {}", code),
    }
  }

  /// Branch condition by code: NZ, Z, NC, C.
  pub fn cond(&self, code: u8) -> bool {
    match code {
      0 => !self.z(),
      1 => self.z(),
      2 => !self.c(),
      3 => self.c(),
      _ => panic!("Invalid condition code: {}", code),
    }
  }

  pub fn flag(&self, mask: u8) -> bool {
    self.f & mask != 0
  }
  pub fn set_flag(&mut self, mask: u8, on: bool) {
    if on {
      self.f |= mask;
    } else {
      self.f &= !mask;
    }
  }

  pub fn z(&self) -> bool {
    //! Zero flag
    self.flag(Z)
  }
  pub fn n(&self) -> bool {
    //! Subtract flag
    self.flag(N)
  }
  pub fn h(&self) -> bool {
    //! Half carry flag
    self.flag(H)
  }
  pub fn c(&self) -> bool {
    //! Carry flag
    self.flag(C)
  }
}
