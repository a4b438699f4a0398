use crate::cpu::reg::{C, H, N, Z};
use crate::cpu::CPU;
use crate::mem::Bus;

fn init() -> (CPU, Bus) {
  let mut cpu = CPU::new();
  let bus = Bus::new();
  // Set the PC to start in WRAM.
  cpu.regs.pc = 0xc000;
  cpu.regs.sp = 0xdff0;
  cpu.regs.set_f(0);
  (cpu, bus)
}

/// Write `program` at PC, execute one step and check the PC advance and
/// the time taken.
fn run(cpu: &mut CPU, bus: &mut Bus, program: &[u8], len: u16, time: u32) {
  let start = cpu.regs.pc;
  bus.write(start, program);
  let m = cpu.step(bus);
  assert_eq!(m, time, "time for {:02x?}", program);
  assert_eq!(cpu.regs.pc, start.wrapping_add(len), "pc for {:02x?}", program);
}

#[test]
fn nop() {
  let (mut cpu, mut bus) = init();
  run(&mut cpu, &mut bus, &[0x00], 1, 1);
  assert_eq!(cpu.cycles(), 1);
}

#[test]
fn ld_rr_nn() {
  let (mut cpu, mut bus) = init();
  run(&mut cpu, &mut bus, &[0x01, 0x34, 0x12], 3, 3);
  assert_eq!(cpu.regs.bc(), 0x1234);
  run(&mut cpu, &mut bus, &[0x31, 0xfe, 0xff], 3, 3);
  assert_eq!(cpu.regs.sp, 0xfffe);
  assert_eq!(cpu.regs.f(), 0);
}

#[test]
fn ld_r_n() {
  macro_rules! run_test {
    ($reg:ident, $opcode:expr) => {{
      let (mut cpu, mut bus) = init();
      cpu.regs.set_f(Z | C);
      run(&mut cpu, &mut bus, &[$opcode, 0x42], 2, 2);
      assert_eq!(cpu.regs.f(), Z | C);
      assert_eq!(cpu.regs.$reg, 0x42);
    }};
  }
  run_test!(b, 0x06);
  run_test!(c, 0x0e);
  run_test!(d, 0x16);
  run_test!(e, 0x1e);
  run_test!(h, 0x26);
  run_test!(l, 0x2e);
  run_test!(a, 0x3e);
}

#[test]
fn ld_r1_r2() {
  macro_rules! reg_reg {
    ($r1:ident, $r2:ident, $opcode:expr) => {{
      let (mut cpu, mut bus) = init();
      cpu.regs.$r2 = 0x42;
      run(&mut cpu, &mut bus, &[$opcode], 1, 1);
      assert_eq!(cpu.regs.f(), 0);
      assert_eq!(cpu.regs.$r1, 0x42);
      assert_eq!(cpu.regs.$r2, 0x42);
    }};
  }

  reg_reg!(a, a, 0x7f);
  reg_reg!(a, b, 0x78);
  reg_reg!(a, l, 0x7d);
  reg_reg!(b, c, 0x41);
  reg_reg!(c, d, 0x4a);
  reg_reg!(d, e, 0x53);
  reg_reg!(e, h, 0x5c);
  reg_reg!(h, l, 0x65);
  reg_reg!(l, a, 0x6f);
}

#[test]
fn ld_hl_indirect() {
  let (mut cpu, mut bus) = init();
  cpu.regs.set_hl(0xc100);
  cpu.regs.d = 0x99;
  // LD (HL), D
  run(&mut cpu, &mut bus, &[0x72], 1, 2);
  assert_eq!(bus.rb(0xc100), 0x99);
  // LD E, (HL)
  run(&mut cpu, &mut bus, &[0x5e], 1, 2);
  assert_eq!(cpu.regs.e, 0x99);
  // LD (HL), u8
  run(&mut cpu, &mut bus, &[0x36, 0x17], 2, 3);
  assert_eq!(bus.rb(0xc100), 0x17);
}

#[test]
fn ld_hl_post_step() {
  let (mut cpu, mut bus) = init();
  cpu.regs.set_hl(0xc100);
  cpu.regs.a = 0x42;
  // LD (HL+), A
  run(&mut cpu, &mut bus, &[0x22], 1, 2);
  assert_eq!(bus.rb(0xc100), 0x42);
  assert_eq!(cpu.regs.hl(), 0xc101);

  bus.wb(0xc101, 0x24);
  // LD A, (HL-)
  run(&mut cpu, &mut bus, &[0x3a], 1, 2);
  assert_eq!(cpu.regs.a, 0x24);
  assert_eq!(cpu.regs.hl(), 0xc100);
}

#[test]
fn ld_high_page() {
  let (mut cpu, mut bus) = init();
  cpu.regs.a = 0x42;
  run(&mut cpu, &mut bus, &[0xe0, 0x80], 2, 3);
  assert_eq!(bus.rb(0xff80), 0x42);

  cpu.regs.c = 0x81;
  run(&mut cpu, &mut bus, &[0xe2], 1, 2);
  assert_eq!(bus.rb(0xff81), 0x42);

  bus.wb(0xff90, 0x7e);
  run(&mut cpu, &mut bus, &[0xf0, 0x90], 2, 3);
  assert_eq!(cpu.regs.a, 0x7e);

  bus.wb(0xff81, 0x11);
  run(&mut cpu, &mut bus, &[0xf2], 1, 2);
  assert_eq!(cpu.regs.a, 0x11);
}

#[test]
fn ld_absolute() {
  let (mut cpu, mut bus) = init();
  cpu.regs.sp = 0xbeef;
  run(&mut cpu, &mut bus, &[0x08, 0x00, 0xc2], 3, 5);
  assert_eq!(bus.rw(0xc200), 0xbeef);

  cpu.regs.a = 0x5a;
  run(&mut cpu, &mut bus, &[0xea, 0x10, 0xc2], 3, 4);
  assert_eq!(bus.rb(0xc210), 0x5a);

  cpu.regs.a = 0;
  run(&mut cpu, &mut bus, &[0xfa, 0x10, 0xc2], 3, 4);
  assert_eq!(cpu.regs.a, 0x5a);
}

#[test]
fn inc_dec_r8() {
  let (mut cpu, mut bus) = init();
  cpu.regs.b = 0x0f;
  cpu.regs.set_f(N | C);
  run(&mut cpu, &mut bus, &[0x04], 1, 1);
  assert_eq!(cpu.regs.b, 0x10);
  assert_eq!(cpu.regs.f(), H | C);

  cpu.regs.b = 0xff;
  cpu.regs.set_f(0);
  run(&mut cpu, &mut bus, &[0x04], 1, 1);
  assert_eq!(cpu.regs.b, 0x00);
  assert_eq!(cpu.regs.f(), Z | H);

  cpu.regs.e = 0x10;
  run(&mut cpu, &mut bus, &[0x1d], 1, 1);
  assert_eq!(cpu.regs.e, 0x0f);
  assert_eq!(cpu.regs.f(), N | H);

  cpu.regs.e = 0x01;
  run(&mut cpu, &mut bus, &[0x1d], 1, 1);
  assert_eq!(cpu.regs.e, 0x00);
  assert_eq!(cpu.regs.f(), Z | N);
}

#[test]
fn inc_dec_hl_indirect() {
  let (mut cpu, mut bus) = init();
  cpu.regs.set_hl(0xc100);
  bus.wb(0xc100, 0x41);
  run(&mut cpu, &mut bus, &[0x34], 1, 3);
  assert_eq!(bus.rb(0xc100), 0x42);
  run(&mut cpu, &mut bus, &[0x35], 1, 3);
  run(&mut cpu, &mut bus, &[0x35], 1, 3);
  assert_eq!(bus.rb(0xc100), 0x40);
}

#[test]
fn inc_dec_r16() {
  let (mut cpu, mut bus) = init();
  cpu.regs.set_de(0xffff);
  cpu.regs.set_f(Z);
  run(&mut cpu, &mut bus, &[0x13], 1, 2);
  assert_eq!(cpu.regs.de(), 0);
  assert_eq!(cpu.regs.f(), Z);
  run(&mut cpu, &mut bus, &[0x1b], 1, 2);
  assert_eq!(cpu.regs.de(), 0xffff);
}

#[test]
fn add_hl() {
  let (mut cpu, mut bus) = init();
  cpu.regs.set_hl(0x0fff);
  cpu.regs.set_bc(0x0001);
  cpu.regs.set_f(Z | N);
  run(&mut cpu, &mut bus, &[0x09], 1, 2);
  assert_eq!(cpu.regs.hl(), 0x1000);
  assert_eq!(cpu.regs.f(), Z | H);

  cpu.regs.set_hl(0x8000);
  run(&mut cpu, &mut bus, &[0x29], 1, 2);
  assert_eq!(cpu.regs.hl(), 0x0000);
  assert_eq!(cpu.regs.f(), Z | C);
}

#[test]
fn add_adc() {
  let (mut cpu, mut bus) = init();
  cpu.regs.a = 0x3a;
  cpu.regs.b = 0xc6;
  run(&mut cpu, &mut bus, &[0x80], 1, 1);
  assert_eq!(cpu.regs.a, 0);
  assert_eq!(cpu.regs.f(), Z | H | C);

  cpu.regs.a = 0xe1;
  run(&mut cpu, &mut bus, &[0xce, 0x0f], 2, 2);
  assert_eq!(cpu.regs.a, 0xf1);
  assert_eq!(cpu.regs.f(), H);
}

#[test]
fn sub_sbc_cp() {
  let (mut cpu, mut bus) = init();
  cpu.regs.a = 0x3e;
  cpu.regs.e = 0x3e;
  run(&mut cpu, &mut bus, &[0x93], 1, 1);
  assert_eq!(cpu.regs.a, 0);
  assert_eq!(cpu.regs.f(), Z | N);

  cpu.regs.a = 0x3b;
  cpu.regs.h = 0x2a;
  cpu.regs.set_f(C);
  run(&mut cpu, &mut bus, &[0x9c], 1, 1);
  assert_eq!(cpu.regs.a, 0x10);
  assert_eq!(cpu.regs.f(), N);

  cpu.regs.a = 0x3c;
  run(&mut cpu, &mut bus, &[0xfe, 0x40], 2, 2);
  assert_eq!(cpu.regs.a, 0x3c);
  assert_eq!(cpu.regs.f(), N | C);
}

#[test]
fn logic() {
  let (mut cpu, mut bus) = init();
  cpu.regs.a = 0x5a;
  cpu.regs.l = 0x3f;
  run(&mut cpu, &mut bus, &[0xa5], 1, 1);
  assert_eq!(cpu.regs.a, 0x1a);
  assert_eq!(cpu.regs.f(), H);

  run(&mut cpu, &mut bus, &[0xaf], 1, 1);
  assert_eq!(cpu.regs.a, 0);
  assert_eq!(cpu.regs.f(), Z);

  run(&mut cpu, &mut bus, &[0xf6, 0x03], 2, 2);
  assert_eq!(cpu.regs.a, 0x03);
  assert_eq!(cpu.regs.f(), 0);
}

#[test]
fn alu_hl_indirect() {
  let (mut cpu, mut bus) = init();
  cpu.regs.set_hl(0xc100);
  bus.wb(0xc100, 0x01);
  cpu.regs.a = 0xff;
  run(&mut cpu, &mut bus, &[0x86], 1, 2);
  assert_eq!(cpu.regs.a, 0);
  assert_eq!(cpu.regs.f(), Z | H | C);
}

#[test]
fn alu_zero_flag_all_operands() {
  // ALU A, B for every group, operand pair and carry-in.
  let alu: [fn(u8, u8, u8) -> u8; 8] = [
    |a, b, _| a.wrapping_add(b),
    |a, b, c| a.wrapping_add(b).wrapping_add(c),
    |a, b, _| a.wrapping_sub(b),
    |a, b, c| a.wrapping_sub(b).wrapping_sub(c),
    |a, b, _| a & b,
    |a, b, _| a ^ b,
    |a, b, _| a | b,
    |a, b, _| a.wrapping_sub(b),
  ];

  let (mut cpu, mut bus) = init();
  for (group, expected) in alu.iter().enumerate() {
    let opcode = 0x80 | ((group as u8) << 3);
    for a in 0..=0xffu8 {
      for b in 0..=0xffu8 {
        for &carry in &[0u8, 1] {
          cpu.regs.pc = 0xc000;
          cpu.regs.a = a;
          cpu.regs.b = b;
          cpu.regs.set_f(if carry == 1 { C } else { 0 });
          run(&mut cpu, &mut bus, &[opcode], 1, 1);

          let result = expected(a, b, carry);
          assert_eq!(
            cpu.regs.z(),
            result == 0,
            "op={:#04x} a={:#04x} b={:#04x} c={}",
            opcode,
            a,
            b,
            carry
          );
          // CP leaves A alone.
          let a_after = if group == 7 { a } else { result };
          assert_eq!(
            cpu.regs.a, a_after,
            "op={:#04x} a={:#04x} b={:#04x}",
            opcode, a, b
          );
        }
      }
    }
  }
}

#[test]
fn daa() {
  let (mut cpu, mut bus) = init();
  cpu.regs.a = 0x0a;
  run(&mut cpu, &mut bus, &[0x27], 1, 1);
  assert_eq!(cpu.regs.a, 0x10);
  assert_eq!(cpu.regs.f(), 0);

  cpu.regs.a = 0x9a;
  run(&mut cpu, &mut bus, &[0x27], 1, 1);
  assert_eq!(cpu.regs.a, 0x00);
  assert_eq!(cpu.regs.f(), Z | C);

  // 0x10 - 0x01 in BCD.
  cpu.regs.a = 0x0f;
  cpu.regs.set_f(N | H);
  run(&mut cpu, &mut bus, &[0x27], 1, 1);
  assert_eq!(cpu.regs.a, 0x09);
  assert_eq!(cpu.regs.f(), N);
}

#[test]
fn accumulator_flags() {
  let (mut cpu, mut bus) = init();
  cpu.regs.a = 0x35;
  run(&mut cpu, &mut bus, &[0x2f], 1, 1);
  assert_eq!(cpu.regs.a, 0xca);
  assert_eq!(cpu.regs.f(), N | H);

  run(&mut cpu, &mut bus, &[0x37], 1, 1);
  assert_eq!(cpu.regs.f(), C);
  run(&mut cpu, &mut bus, &[0x3f], 1, 1);
  assert_eq!(cpu.regs.f(), 0);
}

#[test]
fn rotate_a() {
  let (mut cpu, mut bus) = init();
  cpu.regs.a = 0x85;
  run(&mut cpu, &mut bus, &[0x07], 1, 1);
  assert_eq!(cpu.regs.a, 0x0b);
  assert_eq!(cpu.regs.f(), C);

  cpu.regs.a = 0x01;
  cpu.regs.set_f(0);
  run(&mut cpu, &mut bus, &[0x0f], 1, 1);
  assert_eq!(cpu.regs.a, 0x80);
  assert_eq!(cpu.regs.f(), C);

  // Z is cleared even for a zero result.
  cpu.regs.a = 0x80;
  cpu.regs.set_f(Z);
  run(&mut cpu, &mut bus, &[0x17], 1, 1);
  assert_eq!(cpu.regs.a, 0x00);
  assert_eq!(cpu.regs.f(), C);

  run(&mut cpu, &mut bus, &[0x1f], 1, 1);
  assert_eq!(cpu.regs.a, 0x80);
  assert_eq!(cpu.regs.f(), 0);
}

#[test]
fn cb_shifts() {
  let (mut cpu, mut bus) = init();
  cpu.regs.b = 0x80;
  run(&mut cpu, &mut bus, &[0xcb, 0x00], 2, 2);
  assert_eq!(cpu.regs.b, 0x01);
  assert_eq!(cpu.regs.f(), C);

  cpu.regs.b = 0x00;
  run(&mut cpu, &mut bus, &[0xcb, 0x00], 2, 2);
  assert_eq!(cpu.regs.f(), Z);

  cpu.regs.a = 0x81;
  run(&mut cpu, &mut bus, &[0xcb, 0x2f], 2, 2);
  assert_eq!(cpu.regs.a, 0xc0);
  assert_eq!(cpu.regs.f(), C);

  cpu.regs.a = 0x01;
  run(&mut cpu, &mut bus, &[0xcb, 0x3f], 2, 2);
  assert_eq!(cpu.regs.a, 0x00);
  assert_eq!(cpu.regs.f(), Z | C);

  cpu.regs.c = 0x80;
  run(&mut cpu, &mut bus, &[0xcb, 0x21], 2, 2);
  assert_eq!(cpu.regs.c, 0x00);
  assert_eq!(cpu.regs.f(), Z | C);

  cpu.regs.a = 0xf1;
  run(&mut cpu, &mut bus, &[0xcb, 0x37], 2, 2);
  assert_eq!(cpu.regs.a, 0x1f);
  assert_eq!(cpu.regs.f(), 0);
}

#[test]
fn cb_rotate_through_carry() {
  let (mut cpu, mut bus) = init();
  cpu.regs.d = 0x01;
  cpu.regs.set_f(C);
  run(&mut cpu, &mut bus, &[0xcb, 0x1a], 2, 2);
  assert_eq!(cpu.regs.d, 0x80);
  assert_eq!(cpu.regs.f(), C);

  run(&mut cpu, &mut bus, &[0xcb, 0x12], 2, 2);
  assert_eq!(cpu.regs.d, 0x01);
  assert_eq!(cpu.regs.f(), C);
}

#[test]
fn cb_bits() {
  let (mut cpu, mut bus) = init();
  cpu.regs.a = 0x80;
  cpu.regs.set_f(C | N);
  run(&mut cpu, &mut bus, &[0xcb, 0x7f], 2, 2);
  assert_eq!(cpu.regs.f(), H | C);
  run(&mut cpu, &mut bus, &[0xcb, 0x77], 2, 2);
  assert_eq!(cpu.regs.f(), Z | H | C);

  cpu.regs.l = 0x00;
  run(&mut cpu, &mut bus, &[0xcb, 0xfd], 2, 2);
  assert_eq!(cpu.regs.l, 0x80);
  run(&mut cpu, &mut bus, &[0xcb, 0xbd], 2, 2);
  assert_eq!(cpu.regs.l, 0x00);
  assert_eq!(cpu.regs.f(), Z | H | C);
}

#[test]
fn cb_hl_indirect() {
  let (mut cpu, mut bus) = init();
  cpu.regs.set_hl(0xc100);
  bus.wb(0xc100, 0xff);
  run(&mut cpu, &mut bus, &[0xcb, 0x46], 2, 3);
  assert!(!cpu.regs.z());
  run(&mut cpu, &mut bus, &[0xcb, 0x86], 2, 4);
  assert_eq!(bus.rb(0xc100), 0xfe);
  run(&mut cpu, &mut bus, &[0xcb, 0x36], 2, 4);
  assert_eq!(bus.rb(0xc100), 0xef);
}

#[test]
fn jumps() {
  let (mut cpu, mut bus) = init();
  bus.write(0xc000, &[0xc3, 0x00, 0xc1]);
  assert_eq!(cpu.step(&mut bus), 4);
  assert_eq!(cpu.regs.pc, 0xc100);

  // JR -2 loops onto itself.
  bus.write(0xc100, &[0x18, 0xfe]);
  assert_eq!(cpu.step(&mut bus), 3);
  assert_eq!(cpu.regs.pc, 0xc100);

  cpu.regs.set_hl(0xc234);
  bus.write(0xc100, &[0xe9]);
  assert_eq!(cpu.step(&mut bus), 1);
  assert_eq!(cpu.regs.pc, 0xc234);
}

#[test]
fn conditional_costs() {
  macro_rules! branch {
    ($program:expr, $flags:expr, $len:expr, $not_taken:expr, $taken:expr) => {{
      // Not taken.
      let (mut cpu, mut bus) = init();
      cpu.regs.set_f($flags);
      run(&mut cpu, &mut bus, &$program, $len, $not_taken);
      // Taken.
      let (mut cpu, mut bus) = init();
      cpu.regs.set_f($flags ^ (Z | C));
      bus.ww(cpu.regs.sp, 0xc300);
      bus.write(cpu.regs.pc, &$program);
      assert_eq!(cpu.step(&mut bus), $taken);
      assert_ne!(cpu.regs.pc, 0xc000 + $len);
    }};
  }

  // JR NZ / JR C
  branch!([0x20, 0x10], Z, 2, 2, 3);
  branch!([0x38, 0x10], 0, 2, 2, 3);
  // JP Z / JP NC
  branch!([0xca, 0x00, 0xc2], 0, 3, 3, 4);
  branch!([0xd2, 0x00, 0xc2], C, 3, 3, 4);
  // CALL NZ / CALL C
  branch!([0xc4, 0x00, 0xc2], Z, 3, 3, 6);
  branch!([0xdc, 0x00, 0xc2], 0, 3, 3, 6);
  // RET Z / RET NC
  branch!([0xc8], 0, 1, 2, 5);
  branch!([0xd0], C, 1, 2, 5);
}

#[test]
fn call_ret() {
  let (mut cpu, mut bus) = init();
  run(&mut cpu, &mut bus, &[0xcd, 0x00, 0xc1], 0x100, 6);
  assert_eq!(cpu.regs.sp, 0xdfee);
  assert_eq!(bus.rw(0xdfee), 0xc003);

  bus.wb(0xc100, 0xc9);
  assert_eq!(cpu.step(&mut bus), 4);
  assert_eq!(cpu.regs.pc, 0xc003);
  assert_eq!(cpu.regs.sp, 0xdff0);
}

#[test]
fn rst() {
  let (mut cpu, mut bus) = init();
  bus.wb(0xc000, 0xef);
  assert_eq!(cpu.step(&mut bus), 4);
  assert_eq!(cpu.regs.pc, 0x28);
  assert_eq!(bus.rw(cpu.regs.sp), 0xc001);
}

#[test]
fn reti_enables_interrupts() {
  let (mut cpu, mut bus) = init();
  cpu.regs.sp = 0xdfee;
  bus.ww(0xdfee, 0xc123);
  run(&mut cpu, &mut bus, &[0xd9], 0x123, 4);
  assert!(cpu.ime);
  assert_eq!(cpu.regs.sp, 0xdff0);
}

#[test]
fn push_pop() {
  let (mut cpu, mut bus) = init();
  cpu.regs.set_bc(0x1234);
  run(&mut cpu, &mut bus, &[0xc5], 1, 4);
  assert_eq!(cpu.regs.sp, 0xdfee);
  assert_eq!(bus.rb(0xdfef), 0x12);
  assert_eq!(bus.rb(0xdfee), 0x34);

  run(&mut cpu, &mut bus, &[0xd1], 1, 3);
  assert_eq!(cpu.regs.de(), 0x1234);
  assert_eq!(cpu.regs.sp, 0xdff0);

  // The low nibble of F does not exist.
  cpu.regs.sp = 0xdfee;
  bus.ww(0xdfee, 0x12ff);
  run(&mut cpu, &mut bus, &[0xf1], 1, 3);
  assert_eq!(cpu.regs.a, 0x12);
  assert_eq!(cpu.regs.f(), 0xf0);
}

#[test]
fn stack_pointer_arithmetic() {
  let (mut cpu, mut bus) = init();
  cpu.regs.sp = 0xfff8;
  cpu.regs.set_f(Z | N);
  run(&mut cpu, &mut bus, &[0xe8, 0x08], 2, 4);
  assert_eq!(cpu.regs.sp, 0x0000);
  assert_eq!(cpu.regs.f(), H | C);

  cpu.regs.sp = 0x0000;
  run(&mut cpu, &mut bus, &[0xf8, 0xff], 2, 3);
  assert_eq!(cpu.regs.hl(), 0xffff);
  assert_eq!(cpu.regs.f(), 0);

  run(&mut cpu, &mut bus, &[0xf9], 1, 2);
  assert_eq!(cpu.regs.sp, 0xffff);
}

#[test]
fn ei_di() {
  let (mut cpu, mut bus) = init();
  run(&mut cpu, &mut bus, &[0xfb], 1, 1);
  assert!(cpu.ime);
  run(&mut cpu, &mut bus, &[0xf3], 1, 1);
  assert!(!cpu.ime);
}

#[test]
fn illegal_opcode_is_ignored() {
  let (mut cpu, mut bus) = init();
  let mut expected = cpu.regs.clone();
  expected.pc += 1;
  run(&mut cpu, &mut bus, &[0xd3], 1, 1);
  assert_eq!(cpu.regs, expected);
}

#[test]
fn interrupt_dispatch() {
  let (mut cpu, mut bus) = init();
  cpu.ime = true;
  bus.interrupt_enable = 0x1f;
  bus.set_interrupt_flags(0x14);
  assert_eq!(cpu.step(&mut bus), 5);
  // Timer outranks joypad.
  assert_eq!(cpu.regs.pc, 0x50);
  assert_eq!(bus.interrupt_flags(), 0x10);
  assert!(!cpu.ime);
  assert_eq!(bus.rw(cpu.regs.sp), 0xc000);
}

#[test]
fn masked_interrupt_is_not_taken() {
  let (mut cpu, mut bus) = init();
  cpu.ime = true;
  bus.interrupt_enable = 0x01;
  bus.set_interrupt_flags(0x04);
  run(&mut cpu, &mut bus, &[0x00], 1, 1);
  assert_eq!(bus.interrupt_flags(), 0x04);
}

#[test]
fn halt_waits_for_interrupt() {
  let (mut cpu, mut bus) = init();
  bus.set_interrupt_flags(0);
  run(&mut cpu, &mut bus, &[0x76, 0x00], 1, 1);
  assert!(cpu.halted);

  assert_eq!(cpu.step(&mut bus), 2);
  assert_eq!(cpu.regs.pc, 0xc001);

  // Wakes without IME and carries on.
  bus.interrupt_enable = 0x04;
  bus.set_interrupt_flags(0x04);
  assert_eq!(cpu.step(&mut bus), 1);
  assert!(!cpu.halted);
  assert_eq!(cpu.regs.pc, 0xc002);
}

#[test]
fn halt_then_dispatch() {
  let (mut cpu, mut bus) = init();
  cpu.ime = true;
  bus.set_interrupt_flags(0);
  bus.interrupt_enable = 0x01;
  run(&mut cpu, &mut bus, &[0x76], 1, 1);
  assert!(cpu.halted);

  bus.set_interrupt_flags(0x01);
  assert_eq!(cpu.step(&mut bus), 5);
  assert!(!cpu.halted);
  assert_eq!(cpu.regs.pc, 0x40);
  assert_eq!(bus.rw(cpu.regs.sp), 0xc001);
}

#[test]
fn halt_bug() {
  let (mut cpu, mut bus) = init();
  bus.interrupt_enable = 0x01;
  bus.set_interrupt_flags(0x01);
  run(&mut cpu, &mut bus, &[0x76], 0, 1);
  assert!(!cpu.halted);
}

#[test]
fn stop() {
  let (mut cpu, mut bus) = init();
  bus.io.timer.reg.div = 0x1234;
  assert_eq!(bus.rb(0xff04), 0x12);
  bus.set_interrupt_flags(0);
  run(&mut cpu, &mut bus, &[0x10, 0x00], 2, 1);
  assert!(cpu.stopped);
  assert_eq!(bus.rb(0xff04), 0);
  assert_eq!(cpu.step(&mut bus), 2);

  bus.interrupt_enable = 0x10;
  bus.set_interrupt_flags(0x10);
  run(&mut cpu, &mut bus, &[0x00], 1, 1);
  assert!(!cpu.stopped);
}

#[test]
fn describe() {
  let (cpu, mut bus) = init();
  bus.write(0xc000, &[0xcb, 0x7c]);
  assert_eq!(cpu.describe(&bus), "BIT 7, H");
}
