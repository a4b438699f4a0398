#[macro_use]
extern crate log;

pub mod cpu;
pub mod gameboy;
pub mod interrupt;
pub mod mem;

pub use crate::gameboy::GameBoy;
pub use crate::mem::Cartridge;
