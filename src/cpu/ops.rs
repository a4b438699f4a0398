use crate::cpu::instr::{COND, R16, R8_MIDDLE, R8_RIGHT, U3};
use crate::cpu::reg::{C, H, N, Z};
use crate::cpu::CPU;
use crate::interrupt;
use crate::mem::Bus;

/// Addressing modes. Each leaves the operand in `fetched`.
impl CPU {
  pub(crate) fn imp(&mut self, _: &mut Bus) -> u16 {
    0
  }

  pub(crate) fn imm8(&mut self, bus: &mut Bus) -> u16 {
    u16::from(self.bump(bus))
  }

  pub(crate) fn imm16(&mut self, bus: &mut Bus) -> u16 {
    let lo = self.bump(bus);
    let hi = self.bump(bus);
    u16::from(lo) | (u16::from(hi) << 8)
  }

  pub(crate) fn r8_src(&mut self, bus: &mut Bus) -> u16 {
    u16::from(self.r8(bus, self.code(R8_RIGHT)))
  }

  pub(crate) fn r8_dst(&mut self, bus: &mut Bus) -> u16 {
    u16::from(self.r8(bus, self.code(R8_MIDDLE)))
  }

  pub(crate) fn r16(&mut self, _: &mut Bus) -> u16 {
    self.regs.r16(self.code(R16))
  }

  pub(crate) fn r16_mem(&mut self, _: &mut Bus) -> u16 {
    let code = self.code(R16);
    self.regs.r16_mem(code)
  }

  pub(crate) fn r16_stk(&mut self, _: &mut Bus) -> u16 {
    self.regs.r16_stk(self.code(R16))
  }
}

/// Signed 8-bit displacement added to a 16-bit base. Flags come from the
/// low byte of the base and the raw displacement byte.
fn add_signed(base: u16, e: u8) -> (u16, bool, bool) {
  let result = base.wrapping_add(e as i8 as u16);
  let h = (base & 0x0f) + (u16::from(e) & 0x0f) > 0x0f;
  let c = (base & 0xff) + u16::from(e) > 0xff;
  (result, h, c)
}

/// Loads, arithmetic and control flow.
impl CPU {
  pub(crate) fn nop(&mut self, _: &mut Bus) {}

  pub(crate) fn illegal(&mut self, _: &mut Bus) {
    debug!("illegal opcode {:#04x}, ignored", self.opcode);
  }

  pub(crate) fn ld_r8(&mut self, bus: &mut Bus) {
    let dst = self.code(R8_MIDDLE);
    self.set_r8(bus, dst, self.fetched as u8);
  }

  pub(crate) fn ld_r16(&mut self, _: &mut Bus) {
    let dst = self.code(R16);
    self.regs.set_r16(dst, self.fetched);
  }

  pub(crate) fn ld_r16mem_a(&mut self, bus: &mut Bus) {
    bus.wb(self.fetched, self.regs.a);
  }

  pub(crate) fn ld_a_r16mem(&mut self, bus: &mut Bus) {
    self.regs.a = bus.rb(self.fetched);
  }

  pub(crate) fn ld_imm16mem_sp(&mut self, bus: &mut Bus) {
    bus.ww(self.fetched, self.regs.sp);
  }

  pub(crate) fn ld_imm16mem_a(&mut self, bus: &mut Bus) {
    bus.wb(self.fetched, self.regs.a);
  }

  pub(crate) fn ld_a_imm16mem(&mut self, bus: &mut Bus) {
    self.regs.a = bus.rb(self.fetched);
  }

  pub(crate) fn ldh_imm8mem_a(&mut self, bus: &mut Bus) {
    bus.wb(0xff00 | self.fetched, self.regs.a);
  }

  pub(crate) fn ldh_a_imm8mem(&mut self, bus: &mut Bus) {
    self.regs.a = bus.rb(0xff00 | self.fetched);
  }

  pub(crate) fn ldh_cmem_a(&mut self, bus: &mut Bus) {
    bus.wb(0xff00 | u16::from(self.regs.c), self.regs.a);
  }

  pub(crate) fn ldh_a_cmem(&mut self, bus: &mut Bus) {
    self.regs.a = bus.rb(0xff00 | u16::from(self.regs.c));
  }

  pub(crate) fn ld_hl_sp_imm8(&mut self, _: &mut Bus) {
    let (result, h, c) = add_signed(self.regs.sp, self.fetched as u8);
    self.regs.set_hl(result);
    self.regs.set_f(if h { H } else { 0 } | if c { C } else { 0 });
  }

  pub(crate) fn ld_sp_hl(&mut self, _: &mut Bus) {
    self.regs.sp = self.regs.hl();
  }

  pub(crate) fn add_sp(&mut self, _: &mut Bus) {
    let (result, h, c) = add_signed(self.regs.sp, self.fetched as u8);
    self.regs.sp = result;
    self.regs.set_f(if h { H } else { 0 } | if c { C } else { 0 });
  }

  pub(crate) fn inc_r8(&mut self, bus: &mut Bus) {
    let n = self.fetched as u8;
    let result = n.wrapping_add(1);
    self.regs.set_flag(Z, result == 0);
    self.regs.set_flag(N, false);
    self.regs.set_flag(H, n & 0xf == 0xf);
    let dst = self.code(R8_MIDDLE);
    self.set_r8(bus, dst, result);
  }

  pub(crate) fn dec_r8(&mut self, bus: &mut Bus) {
    let n = self.fetched as u8;
    let result = n.wrapping_sub(1);
    self.regs.set_flag(Z, result == 0);
    self.regs.set_flag(N, true);
    self.regs.set_flag(H, n & 0xf == 0);
    let dst = self.code(R8_MIDDLE);
    self.set_r8(bus, dst, result);
  }

  pub(crate) fn inc_r16(&mut self, _: &mut Bus) {
    let dst = self.code(R16);
    self.regs.set_r16(dst, self.fetched.wrapping_add(1));
  }

  pub(crate) fn dec_r16(&mut self, _: &mut Bus) {
    let dst = self.code(R16);
    self.regs.set_r16(dst, self.fetched.wrapping_sub(1));
  }

  pub(crate) fn add_hl(&mut self, _: &mut Bus) {
    let hl = self.regs.hl();
    let n = self.fetched;
    let (result, carry) = hl.overflowing_add(n);
    self.regs.set_hl(result);
    self.regs.set_flag(N, false);
    self.regs.set_flag(H, (hl & 0x0fff) + (n & 0x0fff) > 0x0fff);
    self.regs.set_flag(C, carry);
  }

  pub(crate) fn add(&mut self, _: &mut Bus) {
    let a = self.regs.a;
    let n = self.fetched as u8;
    let (result, carry) = a.overflowing_add(n);
    self.regs.a = result;
    self.regs.set_f(
      if result == 0 { Z } else { 0 }
        | if (a & 0xf) + (n & 0xf) > 0xf { H } else { 0 }
        | if carry { C } else { 0 },
    );
  }

  pub(crate) fn adc(&mut self, _: &mut Bus) {
    let a = self.regs.a;
    let n = self.fetched as u8;
    let c = if self.regs.c() { 1 } else { 0 };
    let sum = u16::from(a) + u16::from(n) + u16::from(c);
    let result = sum as u8;
    self.regs.a = result;
    self.regs.set_f(
      if result == 0 { Z } else { 0 }
        | if (a & 0xf) + (n & 0xf) + c > 0xf { H } else { 0 }
        | if sum > 0xff { C } else { 0 },
    );
  }

  /// Flags of `a - n - carry`; returns the difference.
  fn subtract(&mut self, n: u8, carry: bool) -> u8 {
    let a = self.regs.a;
    let c = if carry { 1 } else { 0 };
    let result = a.wrapping_sub(n).wrapping_sub(c);
    self.regs.set_f(
      N | if result == 0 { Z } else { 0 }
        | if (a & 0xf) < (n & 0xf) + c { H } else { 0 }
        | if u16::from(a) < u16::from(n) + u16::from(c) { C } else { 0 },
    );
    result
  }

  pub(crate) fn sub(&mut self, _: &mut Bus) {
    self.regs.a = self.subtract(self.fetched as u8, false);
  }

  pub(crate) fn sbc(&mut self, _: &mut Bus) {
    let carry = self.regs.c();
    self.regs.a = self.subtract(self.fetched as u8, carry);
  }

  pub(crate) fn cp(&mut self, _: &mut Bus) {
    self.subtract(self.fetched as u8, false);
  }

  pub(crate) fn and(&mut self, _: &mut Bus) {
    self.regs.a &= self.fetched as u8;
    self.regs.set_f(if self.regs.a == 0 { Z } else { 0 } | H);
  }

  pub(crate) fn xor(&mut self, _: &mut Bus) {
    self.regs.a ^= self.fetched as u8;
    self.regs.set_f(if self.regs.a == 0 { Z } else { 0 });
  }

  pub(crate) fn or(&mut self, _: &mut Bus) {
    self.regs.a |= self.fetched as u8;
    self.regs.set_f(if self.regs.a == 0 { Z } else { 0 });
  }

  pub(crate) fn daa(&mut self, _: &mut Bus) {
    let mut a = self.regs.a;
    if self.regs.n() {
      if self.regs.h() {
        a = a.wrapping_sub(0x06);
      }
      if self.regs.c() {
        a = a.wrapping_sub(0x60);
      }
    } else {
      if self.regs.c() || a > 0x99 {
        a = a.wrapping_add(0x60);
        self.regs.set_flag(C, true);
      }
      if self.regs.h() || (a & 0xf) > 0x9 {
        a = a.wrapping_add(0x06);
      }
    }
    self.regs.a = a;
    self.regs.set_flag(Z, a == 0);
    self.regs.set_flag(H, false);
  }

  pub(crate) fn cpl(&mut self, _: &mut Bus) {
    self.regs.a = !self.regs.a;
    self.regs.set_flag(N, true);
    self.regs.set_flag(H, true);
  }

  pub(crate) fn scf(&mut self, _: &mut Bus) {
    self.regs.set_flag(N, false);
    self.regs.set_flag(H, false);
    self.regs.set_flag(C, true);
  }

  pub(crate) fn ccf(&mut self, _: &mut Bus) {
    let c = self.regs.c();
    self.regs.set_flag(N, false);
    self.regs.set_flag(H, false);
    self.regs.set_flag(C, !c);
  }

  pub(crate) fn jr(&mut self, _: &mut Bus) {
    let e = self.fetched as u8 as i8;
    self.regs.pc = self.regs.pc.wrapping_add(e as u16);
  }

  pub(crate) fn jr_cond(&mut self, bus: &mut Bus) {
    if self.regs.cond(self.code(COND)) {
      self.jr(bus);
      self.branched = true;
    }
  }

  pub(crate) fn jp(&mut self, _: &mut Bus) {
    self.regs.pc = self.fetched;
  }

  pub(crate) fn jp_cond(&mut self, _: &mut Bus) {
    if self.regs.cond(self.code(COND)) {
      self.regs.pc = self.fetched;
      self.branched = true;
    }
  }

  pub(crate) fn jp_hl(&mut self, _: &mut Bus) {
    self.regs.pc = self.regs.hl();
  }

  pub(crate) fn call(&mut self, bus: &mut Bus) {
    let pc = self.regs.pc;
    self.push(bus, pc);
    self.regs.pc = self.fetched;
  }

  pub(crate) fn call_cond(&mut self, bus: &mut Bus) {
    if self.regs.cond(self.code(COND)) {
      self.call(bus);
      self.branched = true;
    }
  }

  pub(crate) fn rst(&mut self, bus: &mut Bus) {
    let pc = self.regs.pc;
    self.push(bus, pc);
    self.regs.pc = u16::from(self.code(U3)) * 8;
  }

  pub(crate) fn ret(&mut self, bus: &mut Bus) {
    self.regs.pc = self.pop(bus);
  }

  pub(crate) fn ret_cond(&mut self, bus: &mut Bus) {
    if self.regs.cond(self.code(COND)) {
      self.ret(bus);
      self.branched = true;
    }
  }

  pub(crate) fn reti(&mut self, bus: &mut Bus) {
    self.ret(bus);
    self.ime = true;
  }

  pub(crate) fn push_r16(&mut self, bus: &mut Bus) {
    let value = self.fetched;
    self.push(bus, value);
  }

  pub(crate) fn pop_r16(&mut self, bus: &mut Bus) {
    let value = self.pop(bus);
    let dst = self.code(R16);
    self.regs.set_r16_stk(dst, value);
  }

  pub(crate) fn di(&mut self, _: &mut Bus) {
    self.ime = false;
  }

  pub(crate) fn ei(&mut self, _: &mut Bus) {
    self.ime = true;
  }

  pub(crate) fn halt(&mut self, bus: &mut Bus) {
    let pending =
      bus.interrupt_enable & bus.interrupt_flags() & interrupt::MASK;
    if !self.ime && pending != 0 {
      // HALT bug: no halt, and the byte at PC is fetched again.
      self.regs.pc = self.regs.pc.wrapping_sub(1);
      debug!("halt bug at {:#06x}", self.regs.pc);
    } else {
      self.halted = true;
    }
  }

  pub(crate) fn stop(&mut self, bus: &mut Bus) {
    self.stopped = true;
    bus.wb(0xff04, 0);
  }
}

/// Rotates. The bit shifted out goes to C; the vacated bit takes either
/// that same bit or the old carry. Other flags are cleared.
impl CPU {
  fn rotl(&mut self, value: u8, through_carry: bool) -> u8 {
    let out = value >> 7;
    let cin = if through_carry { self.regs.c() as u8 } else { out };
    self.regs.set_f(if out == 1 { C } else { 0 });
    (value << 1) | cin
  }

  fn rotr(&mut self, value: u8, through_carry: bool) -> u8 {
    let out = value & 1;
    let cin = if through_carry { self.regs.c() as u8 } else { out };
    self.regs.set_f(if out == 1 { C } else { 0 });
    (value >> 1) | (cin << 7)
  }

  pub(crate) fn rlca(&mut self, _: &mut Bus) {
    self.regs.a = self.rotl(self.regs.a, false);
  }

  pub(crate) fn rrca(&mut self, _: &mut Bus) {
    self.regs.a = self.rotr(self.regs.a, false);
  }

  pub(crate) fn rla(&mut self, _: &mut Bus) {
    self.regs.a = self.rotl(self.regs.a, true);
  }

  pub(crate) fn rra(&mut self, _: &mut Bus) {
    self.regs.a = self.rotr(self.regs.a, true);
  }
}

/// The 0xcb table. The operand is always the low three bits.
impl CPU {
  /// Write back a shifted value and set Z from it.
  fn cb_store(&mut self, bus: &mut Bus, result: u8) {
    self.regs.set_flag(Z, result == 0);
    let dst = self.code(R8_RIGHT);
    self.set_r8(bus, dst, result);
  }

  pub(crate) fn rlc(&mut self, bus: &mut Bus) {
    let result = self.rotl(self.fetched as u8, false);
    self.cb_store(bus, result);
  }

  pub(crate) fn rrc(&mut self, bus: &mut Bus) {
    let result = self.rotr(self.fetched as u8, false);
    self.cb_store(bus, result);
  }

  pub(crate) fn rl(&mut self, bus: &mut Bus) {
    let result = self.rotl(self.fetched as u8, true);
    self.cb_store(bus, result);
  }

  pub(crate) fn rr(&mut self, bus: &mut Bus) {
    let result = self.rotr(self.fetched as u8, true);
    self.cb_store(bus, result);
  }

  pub(crate) fn sla(&mut self, bus: &mut Bus) {
    let n = self.fetched as u8;
    self.regs.set_f(if n & 0x80 != 0 { C } else { 0 });
    self.cb_store(bus, n << 1);
  }

  pub(crate) fn sra(&mut self, bus: &mut Bus) {
    let n = self.fetched as u8;
    self.regs.set_f(if n & 0x01 != 0 { C } else { 0 });
    // Sign extend.
    self.cb_store(bus, ((n as i8) >> 1) as u8);
  }

  pub(crate) fn srl(&mut self, bus: &mut Bus) {
    let n = self.fetched as u8;
    self.regs.set_f(if n & 0x01 != 0 { C } else { 0 });
    self.cb_store(bus, n >> 1);
  }

  pub(crate) fn swap(&mut self, bus: &mut Bus) {
    let n = self.fetched as u8;
    self.regs.set_f(0);
    self.cb_store(bus, n.rotate_left(4));
  }

  pub(crate) fn bit(&mut self, _: &mut Bus) {
    let b = self.code(U3);
    self.regs.set_flag(Z, (self.fetched >> b) & 1 == 0);
    self.regs.set_flag(N, false);
    self.regs.set_flag(H, true);
  }

  pub(crate) fn res(&mut self, bus: &mut Bus) {
    let b = self.code(U3);
    let dst = self.code(R8_RIGHT);
    self.set_r8(bus, dst, self.fetched as u8 & !(1 << b));
  }

  pub(crate) fn set(&mut self, bus: &mut Bus) {
    let b = self.code(U3);
    let dst = self.code(R8_RIGHT);
    self.set_r8(bus, dst, self.fetched as u8 | (1 << b));
  }
}
