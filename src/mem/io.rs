use crate::interrupt::Interrupt;
use crate::mem::timer::Timer;

const IO_SIZE: usize = 0x80;

/// The 0xff00..=0xff7f register block.
///
/// The timer, the interrupt request register and the serial port are
/// modeled; every other register is plain storage for the subsystems
/// that live outside the core.
#[derive(Debug)]
pub struct Io {
  regs: Vec<u8>,
  pub timer: Timer,

  pub interrupt_flags: u8,

  sb: u8,
  sc: u8,
  serial_out: Vec<u8>,
}

impl Io {
  pub fn new() -> Io {
    let mut result = Io {
      regs: vec![0; IO_SIZE],
      timer: Timer::new(),
      interrupt_flags: 0,
      sb: 0,
      sc: 0,
      serial_out: Vec::new(),
    };
    result.power_on();
    result
  }

  fn power_on(&mut self) {
    // See http://nocash.emubase.de/pandocs.htm#powerupsequence
    self.wb(0xff00, 0xcf); // P1
    self.wb(0xff02, 0x7e); // SC
    self.wb(0xff05, 0x00); // TIMA
    self.wb(0xff06, 0x00); // TMA
    self.wb(0xff07, 0xf8); // TAC
    self.wb(0xff0f, 0xe1); // IF
    self.wb(0xff10, 0x80); // NR10
    self.wb(0xff11, 0xbf); // NR11
    self.wb(0xff12, 0xf3); // NR12
    self.wb(0xff13, 0xff); // NR13
    self.wb(0xff14, 0xbf); // NR14
    self.wb(0xff16, 0x3f); // NR21
    self.wb(0xff17, 0x00); // NR22
    self.wb(0xff18, 0xff); // NR23
    self.wb(0xff19, 0xbf); // NR24
    self.wb(0xff1a, 0x7f); // NR30
    self.wb(0xff1b, 0xff); // NR31
    self.wb(0xff1c, 0x9f); // NR32
    self.wb(0xff1d, 0xff); // NR33
    self.wb(0xff1e, 0xbf); // NR34
    self.wb(0xff20, 0xff); // NR41
    self.wb(0xff21, 0x00); // NR42
    self.wb(0xff22, 0x00); // NR43
    self.wb(0xff23, 0xbf); // NR44
    self.wb(0xff24, 0x77); // NR50
    self.wb(0xff25, 0xf3); // NR51
    self.wb(0xff26, 0xf1); // NR52
    self.wb(0xff40, 0x91); // LCDC
    self.wb(0xff41, 0x85); // STAT
    self.wb(0xff42, 0x00); // SCY
    self.wb(0xff43, 0x00); // SCX
    self.wb(0xff45, 0x00); // LYC
    self.wb(0xff47, 0xfc); // BGP
    self.wb(0xff4a, 0x00); // WY
    self.wb(0xff4b, 0x00); // WX
  }

  pub fn rb(&self, addr: u16) -> u8 {
    match addr {
      0xff01 => self.sb,
      0xff02 => self.sc,
      0xff04..=0xff07 => self.timer.rb(addr),
      0xff0f => self.interrupt_flags,
      _ => self.regs[(addr & 0x7f) as usize],
    }
  }

  pub fn wb(&mut self, addr: u16, value: u8) {
    match addr {
      0xff01 => self.sb = value,
      0xff02 => {
        self.sc = value;
        if value & 0x81 == 0x81 {
          self.transfer();
        }
      }
      0xff04..=0xff07 => self.timer.wb(addr, value),
      0xff0f => self.interrupt_flags = value,
      _ => self.regs[(addr & 0x7f) as usize] = value,
    }
  }

  /// No link partner: the outgoing byte is captured and the transfer
  /// completes at once with nothing shifted in.
  fn transfer(&mut self) {
    debug!("serial: {:#04x} {:?}", self.sb, self.sb as char);
    self.serial_out.push(self.sb);
    self.sb = 0xff;
    self.sc = 0;
  }

  /// Drain everything written out over the serial port so far.
  pub fn take_serial(&mut self) -> Vec<u8> {
    std::mem::take(&mut self.serial_out)
  }

  pub fn request(&mut self, interrupt: Interrupt) {
    self.interrupt_flags |= interrupt.bit();
  }

  /// Advance the timer by `m` machine cycles, raising its request line
  /// on overflow.
  pub fn step(&mut self, m: u32) {
    if self.timer.step(m) {
      self.request(Interrupt::Timer);
    }
  }
}
