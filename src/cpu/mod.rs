mod instr;
mod ops;
pub mod reg;

pub use self::instr::{cb_table, read_code, table, Instruction, CB_PREFIX};
pub use self::reg::Registers;

use crate::interrupt::{self, Interrupt};
use crate::mem::Bus;

/// Machine cycles spent per step while halted or stopped.
pub const HALT_CYCLES: u32 = 2;
/// Machine cycles spent dispatching an interrupt.
pub const INTERRUPT_CYCLES: u32 = 5;

#[derive(Debug)]
pub struct CPU {
  pub regs: Registers,

  /// Interrupt master enable.
  pub ime: bool,
  pub halted: bool,
  pub stopped: bool,

  /// Decode state of the instruction in flight.
  opcode: u8,
  fetched: u16,
  branched: bool,

  /// Machine cycles since power on.
  m: u64,
}

impl CPU {
  pub fn new() -> CPU {
    CPU {
      regs: Registers::new(),
      ime: false,
      halted: false,
      stopped: false,
      opcode: 0,
      fetched: 0,
      branched: false,
      m: 0,
    }
  }

  /// Machine cycles run so far.
  pub fn cycles(&self) -> u64 {
    self.m
  }

  /// Dispatch one pending interrupt or run one instruction.
  /// Return the m-time taken.
  pub fn step(&mut self, bus: &mut Bus) -> u32 {
    let m = self.exec(bus);
    self.m += u64::from(m);
    m
  }

  fn exec(&mut self, bus: &mut Bus) -> u32 {
    let pending = bus.interrupt_enable & bus.interrupt_flags() & interrupt::MASK;

    // Any enabled request wakes the core, IME or not.
    if pending != 0 && (self.halted || self.stopped) {
      self.halted = false;
      self.stopped = false;
    }

    if self.ime {
      if let Some(int) = Interrupt::highest(pending) {
        return self.handle_interrupt(bus, int);
      }
    }

    if self.halted || self.stopped {
      return HALT_CYCLES;
    }

    let pc = self.regs.pc;
    let ins = self.decode(bus);
    trace!("{:#06x}: {}", pc, ins.name);

    self.branched = false;
    self.fetched = (ins.mode)(self, bus);
    (ins.op)(self, bus);

    if self.branched {
      ins.cycles_branch
    } else {
      ins.cycles
    }
  }

  /// Fetch the opcode at PC, following the CB prefix into its own table.
  fn decode(&mut self, bus: &Bus) -> &'static Instruction {
    let op = self.bump(bus);
    if op == CB_PREFIX {
      self.opcode = self.bump(bus);
      &cb_table()[usize::from(self.opcode)]
    } else {
      self.opcode = op;
      &table()[usize::from(op)]
    }
  }

  /// Name the instruction at PC without executing it.
  pub fn describe(&self, bus: &Bus) -> &'static str {
    let op = bus.rb(self.regs.pc);
    if op == CB_PREFIX {
      let op = bus.rb(self.regs.pc.wrapping_add(1));
      &*cb_table()[usize::from(op)].name
    } else {
      &*table()[usize::from(op)].name
    }
  }

  fn handle_interrupt(&mut self, bus: &mut Bus, int: Interrupt) -> u32 {
    debug!("interrupt {:?} from {:#06x}", int, self.regs.pc);
    let flags = bus.interrupt_flags();
    bus.set_interrupt_flags(flags & !int.bit());
    self.ime = false;
    let pc = self.regs.pc;
    self.push(bus, pc);
    self.regs.pc = int.vector();
    INTERRUPT_CYCLES
  }

  /// Return the next byte at the program counter,
  /// and increment the program counter.
  fn bump(&mut self, bus: &Bus) -> u8 {
    let result = bus.rb(self.regs.pc);
    self.regs.pc = self.regs.pc.wrapping_add(1);
    result
  }

  fn push(&mut self, bus: &mut Bus, value: u16) {
    self.regs.sp = self.regs.sp.wrapping_sub(2);
    bus.ww(self.regs.sp, value);
  }

  fn pop(&mut self, bus: &Bus) -> u16 {
    let lo = bus.rb(self.regs.sp);
    self.regs.sp = self.regs.sp.wrapping_add(1);
    let hi = bus.rb(self.regs.sp);
    self.regs.sp = self.regs.sp.wrapping_add(1);
    (u16::from(hi) << 8) | u16::from(lo)
  }

  /// 8-bit operand by register code; 6 is the byte at HL.
  fn r8(&self, bus: &Bus, code: u8) -> u8 {
    match code {
      0 => self.regs.b,
      1 => self.regs.c,
      2 => self.regs.d,
      3 => self.regs.e,
      4 => self.regs.h,
      5 => self.regs.l,
      6 => bus.rb(self.regs.hl()),
      7 => self.regs.a,
      _ => panic!("Invalid r8 code: {}", code),
    }
  }

  fn set_r8(&mut self, bus: &mut Bus, code: u8, value: u8) {
    match code {
      0 => self.regs.b = value,
      1 => self.regs.c = value,
      2 => self.regs.d = value,
      3 => self.regs.e = value,
      4 => self.regs.h = value,
      5 => self.regs.l = value,
      6 => bus.wb(self.regs.hl(), value),
      7 => self.regs.a = value,
      _ => panic!("Invalid r8 code: {}", code),
    }
  }

  /// Operand field of the current opcode selected by `mask`.
  fn code(&self, mask: u8) -> u8 {
    read_code(self.opcode, mask)
  }
}

#[cfg(test)]
mod optest;
