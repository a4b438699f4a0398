/// Clock cycles per divider increment.
const DIV_PERIOD: u32 = 256;

#[derive(Debug, Default)]
struct Clock {
  main: u32,
  div: u32,
}

#[derive(Debug, Default)]
pub struct Registers {
  /// Free-running divider; only the high byte shows at 0xff04.
  pub div: u16,
  pub tima: u8,
  pub tma: u8,
  pub tac: u8,
}

#[derive(Debug, Default)]
pub struct Timer {
  pub reg: Registers,
  clock: Clock,
}

impl Timer {
  pub fn new() -> Timer {
    Timer::default()
  }

  /// Read one of the four timer registers, 0xff04..=0xff07.
  pub fn rb(&self, addr: u16) -> u8 {
    match addr {
      0xff04 => (self.reg.div >> 8) as u8,
      0xff05 => self.reg.tima,
      0xff06 => self.reg.tma,
      0xff07 => self.reg.tac,
      _ => panic!("Invalid address to timer: {:#06x}", addr),
    }
  }

  pub fn wb(&mut self, addr: u16, value: u8) {
    match addr {
      0xff04 => self.reset_div(),
      0xff05 => self.reg.tima = value,
      0xff06 => self.reg.tma = value,
      0xff07 => self.reg.tac = value,
      _ => panic!("Invalid address to timer: {:#06x}", addr),
    }
  }

  pub fn reset_div(&mut self) {
    self.reg.div = 0;
    self.clock.div = 0;
  }

  /// Advance by `m` machine cycles.
  /// Returns true if the timer overflowed and wants an interrupt.
  pub fn step(&mut self, m: u32) -> bool {
    let t = m * 4;

    self.clock.div += t;
    while self.clock.div >= DIV_PERIOD {
      self.clock.div -= DIV_PERIOD;
      self.reg.div = self.reg.div.wrapping_add(1);
    }

    if self.reg.tac & 0x4 == 0 {
      return false;
    }

    let threshold = match self.reg.tac & 3 {
      0 => 1024,
      1 => 16,
      2 => 64,
      3 => 256,
      _ => panic!("Invalid & 3 result"),
    };

    let mut interrupt = false;
    self.clock.main += t;
    while self.clock.main >= threshold {
      self.clock.main -= threshold;
      interrupt |= self.tick();
    }
    interrupt
  }

  /// Count once; reload from TMA on overflow.
  fn tick(&mut self) -> bool {
    let (tima, overflow) = self.reg.tima.overflowing_add(1);
    if overflow {
      self.reg.tima = self.reg.tma;
      true
    } else {
      self.reg.tima = tima;
      false
    }
  }
}
