use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;

use crate::cpu::CPU;
use crate::mem::Bus;

pub const CB_PREFIX: u8 = 0xcb;

// Operand fields inside an opcode byte.
pub const R8_RIGHT: u8 = 0b0000_0111;
pub const R8_MIDDLE: u8 = 0b0011_1000;
pub const R16: u8 = 0b0011_0000;
pub const COND: u8 = 0b0001_1000;
pub const U3: u8 = 0b0011_1000;

/// Extract the field of `opcode` selected by `mask`, right-aligned.
pub fn read_code(opcode: u8, mask: u8) -> u8 {
  (opcode & mask) >> mask.trailing_zeros()
}

/// Resolves the operand and returns it.
pub type Mode = fn(&mut CPU, &mut Bus) -> u16;
/// Consumes the fetched operand.
pub type Op = fn(&mut CPU, &mut Bus);

#[derive(Clone)]
pub struct Instruction {
  /// Fixed text, or formatted once from the operand fields.
  pub name: Cow<'static, str>,
  pub mode: Mode,
  pub op: Op,
  pub cycles: u32,
  /// Cost when a conditional branch is taken.
  pub cycles_branch: u32,
}

impl fmt::Debug for Instruction {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("Instruction")
      .field("name", &self.name)
      .field("cycles", &self.cycles)
      .field("cycles_branch", &self.cycles_branch)
      .finish()
  }
}

fn ins<S: Into<Cow<'static, str>>>(
  name: S,
  mode: Mode,
  op: Op,
  cycles: u32,
) -> Instruction {
  Instruction {
    name: name.into(),
    mode,
    op,
    cycles,
    cycles_branch: cycles,
  }
}

fn branch<S: Into<Cow<'static, str>>>(
  name: S,
  mode: Mode,
  op: Op,
  cycles: u32,
  taken: u32,
) -> Instruction {
  Instruction {
    cycles_branch: taken,
    ..ins(name, mode, op, cycles)
  }
}

const R8_NAMES: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];
const R16_NAMES: [&str; 4] = ["BC", "DE", "HL", "SP"];
const R16_STK_NAMES: [&str; 4] = ["BC", "DE", "HL", "AF"];
const R16_MEM_NAMES: [&str; 4] = ["BC", "DE", "HL+", "HL-"];
const COND_NAMES: [&str; 4] = ["NZ", "Z", "NC", "C"];
const ALU_NAMES: [&str; 8] =
  ["ADD A,", "ADC A,", "SUB A,", "SBC A,", "AND A,", "XOR A,", "OR A,", "CP A,"];
const ROT_NAMES: [&str; 8] =
  ["RLC", "RRC", "RL", "RR", "SLA", "SRA", "SWAP", "SRL"];

/// The unprefixed opcode table.
pub fn table() -> &'static [Instruction; 256] {
  static TABLE: OnceLock<[Instruction; 256]> = OnceLock::new();
  TABLE.get_or_init(|| std::array::from_fn(|op| base(op as u8)))
}

/// The 0xcb-prefixed opcode table.
pub fn cb_table() -> &'static [Instruction; 256] {
  static TABLE: OnceLock<[Instruction; 256]> = OnceLock::new();
  TABLE.get_or_init(|| std::array::from_fn(|op| cb(op as u8)))
}

fn base(op: u8) -> Instruction {
  let alu: [Op; 8] = [
    CPU::add,
    CPU::adc,
    CPU::sub,
    CPU::sbc,
    CPU::and,
    CPU::xor,
    CPU::or,
    CPU::cp,
  ];

  let dst = read_code(op, R8_MIDDLE);
  let src = read_code(op, R8_RIGHT);
  let r16 = read_code(op, R16) as usize;
  let cond = COND_NAMES[read_code(op, COND) as usize];

  match op {
    0x00 => ins("NOP", CPU::imp, CPU::nop, 1),
    0x01 | 0x11 | 0x21 | 0x31 => {
      ins(format!("LD {}, u16", R16_NAMES[r16]), CPU::imm16, CPU::ld_r16, 3)
    }
    0x02 | 0x12 | 0x22 | 0x32 => ins(
      format!("LD ({}), A", R16_MEM_NAMES[r16]),
      CPU::r16_mem,
      CPU::ld_r16mem_a,
      2,
    ),
    0x0a | 0x1a | 0x2a | 0x3a => ins(
      format!("LD A, ({})", R16_MEM_NAMES[r16]),
      CPU::r16_mem,
      CPU::ld_a_r16mem,
      2,
    ),
    0x03 | 0x13 | 0x23 | 0x33 => {
      ins(format!("INC {}", R16_NAMES[r16]), CPU::r16, CPU::inc_r16, 2)
    }
    0x0b | 0x1b | 0x2b | 0x3b => {
      ins(format!("DEC {}", R16_NAMES[r16]), CPU::r16, CPU::dec_r16, 2)
    }
    0x09 | 0x19 | 0x29 | 0x39 => {
      ins(format!("ADD HL, {}", R16_NAMES[r16]), CPU::r16, CPU::add_hl, 2)
    }
    0x04 | 0x0c | 0x14 | 0x1c | 0x24 | 0x2c | 0x34 | 0x3c => ins(
      format!("INC {}", R8_NAMES[dst as usize]),
      CPU::r8_dst,
      CPU::inc_r8,
      if dst == 6 { 3 } else { 1 },
    ),
    0x05 | 0x0d | 0x15 | 0x1d | 0x25 | 0x2d | 0x35 | 0x3d => ins(
      format!("DEC {}", R8_NAMES[dst as usize]),
      CPU::r8_dst,
      CPU::dec_r8,
      if dst == 6 { 3 } else { 1 },
    ),
    0x06 | 0x0e | 0x16 | 0x1e | 0x26 | 0x2e | 0x36 | 0x3e => ins(
      format!("LD {}, u8", R8_NAMES[dst as usize]),
      CPU::imm8,
      CPU::ld_r8,
      if dst == 6 { 3 } else { 2 },
    ),
    0x07 => ins("RLCA", CPU::imp, CPU::rlca, 1),
    0x0f => ins("RRCA", CPU::imp, CPU::rrca, 1),
    0x17 => ins("RLA", CPU::imp, CPU::rla, 1),
    0x1f => ins("RRA", CPU::imp, CPU::rra, 1),
    0x08 => ins("LD (u16), SP", CPU::imm16, CPU::ld_imm16mem_sp, 5),
    0x10 => ins("STOP", CPU::imm8, CPU::stop, 1),
    0x18 => ins("JR i8", CPU::imm8, CPU::jr, 3),
    0x20 | 0x28 | 0x30 | 0x38 => {
      branch(format!("JR {}, i8", cond), CPU::imm8, CPU::jr_cond, 2, 3)
    }
    0x27 => ins("DAA", CPU::imp, CPU::daa, 1),
    0x2f => ins("CPL", CPU::imp, CPU::cpl, 1),
    0x37 => ins("SCF", CPU::imp, CPU::scf, 1),
    0x3f => ins("CCF", CPU::imp, CPU::ccf, 1),

    0x76 => ins("HALT", CPU::imp, CPU::halt, 1),
    0x40..=0x7f => ins(
      format!("LD {}, {}", R8_NAMES[dst as usize], R8_NAMES[src as usize]),
      CPU::r8_src,
      CPU::ld_r8,
      if dst == 6 || src == 6 { 2 } else { 1 },
    ),
    0x80..=0xbf => ins(
      format!("{} {}", ALU_NAMES[dst as usize], R8_NAMES[src as usize]),
      CPU::r8_src,
      alu[dst as usize],
      if src == 6 { 2 } else { 1 },
    ),

    0xc0 | 0xc8 | 0xd0 | 0xd8 => {
      branch(format!("RET {}", cond), CPU::imp, CPU::ret_cond, 2, 5)
    }
    0xc1 | 0xd1 | 0xe1 | 0xf1 => {
      ins(format!("POP {}", R16_STK_NAMES[r16]), CPU::imp, CPU::pop_r16, 3)
    }
    0xc5 | 0xd5 | 0xe5 | 0xf5 => ins(
      format!("PUSH {}", R16_STK_NAMES[r16]),
      CPU::r16_stk,
      CPU::push_r16,
      4,
    ),
    0xc2 | 0xca | 0xd2 | 0xda => {
      branch(format!("JP {}, u16", cond), CPU::imm16, CPU::jp_cond, 3, 4)
    }
    0xc4 | 0xcc | 0xd4 | 0xdc => {
      branch(format!("CALL {}, u16", cond), CPU::imm16, CPU::call_cond, 3, 6)
    }
    0xc6 | 0xce | 0xd6 | 0xde | 0xe6 | 0xee | 0xf6 | 0xfe => ins(
      format!("{} u8", ALU_NAMES[dst as usize]),
      CPU::imm8,
      alu[dst as usize],
      2,
    ),
    0xc7 | 0xcf | 0xd7 | 0xdf | 0xe7 | 0xef | 0xf7 | 0xff => ins(
      format!("RST {:02X}h", read_code(op, U3) * 8),
      CPU::imp,
      CPU::rst,
      4,
    ),
    0xc3 => ins("JP u16", CPU::imm16, CPU::jp, 4),
    0xc9 => ins("RET", CPU::imp, CPU::ret, 4),
    0xcb => ins("PREFIX CB", CPU::imp, CPU::nop, 1),
    0xcd => ins("CALL u16", CPU::imm16, CPU::call, 6),
    0xd9 => ins("RETI", CPU::imp, CPU::reti, 4),
    0xe0 => ins("LD (FF00+u8), A", CPU::imm8, CPU::ldh_imm8mem_a, 3),
    0xe2 => ins("LD (FF00+C), A", CPU::imp, CPU::ldh_cmem_a, 2),
    0xe8 => ins("ADD SP, i8", CPU::imm8, CPU::add_sp, 4),
    0xe9 => ins("JP HL", CPU::imp, CPU::jp_hl, 1),
    0xea => ins("LD (u16), A", CPU::imm16, CPU::ld_imm16mem_a, 4),
    0xf0 => ins("LD A, (FF00+u8)", CPU::imm8, CPU::ldh_a_imm8mem, 3),
    0xf2 => ins("LD A, (FF00+C)", CPU::imp, CPU::ldh_a_cmem, 2),
    0xf3 => ins("DI", CPU::imp, CPU::di, 1),
    0xf8 => ins("LD HL, SP+i8", CPU::imm8, CPU::ld_hl_sp_imm8, 3),
    0xf9 => ins("LD SP, HL", CPU::imp, CPU::ld_sp_hl, 2),
    0xfa => ins("LD A, (u16)", CPU::imm16, CPU::ld_a_imm16mem, 4),
    0xfb => ins("EI", CPU::imp, CPU::ei, 1),

    // d3 db dd e3 e4 eb ec ed f4 fc fd
    _ => ins(format!("ILLEGAL_{:02X}", op), CPU::imp, CPU::illegal, 1),
  }
}

fn cb(op: u8) -> Instruction {
  let rot: [Op; 8] = [
    CPU::rlc,
    CPU::rrc,
    CPU::rl,
    CPU::rr,
    CPU::sla,
    CPU::sra,
    CPU::swap,
    CPU::srl,
  ];

  let y = read_code(op, U3);
  let z = read_code(op, R8_RIGHT);
  let r = R8_NAMES[z as usize];
  let hl = z == 6;

  match op >> 6 {
    0 => ins(
      format!("{} {}", ROT_NAMES[y as usize], r),
      CPU::r8_src,
      rot[y as usize],
      if hl { 4 } else { 2 },
    ),
    1 => ins(
      format!("BIT {}, {}", y, r),
      CPU::r8_src,
      CPU::bit,
      if hl { 3 } else { 2 },
    ),
    2 => ins(
      format!("RES {}, {}", y, r),
      CPU::r8_src,
      CPU::res,
      if hl { 4 } else { 2 },
    ),
    _ => ins(
      format!("SET {}, {}", y, r),
      CPU::r8_src,
      CPU::set,
      if hl { 4 } else { 2 },
    ),
  }
}
