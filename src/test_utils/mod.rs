//! Shared test utilities.
//!
//! - `FlatMemory`: 64 KiB of plain RAM implementing `CpuBus`, so CPU tests
//!   can place code and data anywhere (including $2000-$401F) without the
//!   real bus mapping getting in the way.
//! - `flat_cpu`: a `CpuState` with PC at `TEST_ORIGIN` plus memory holding
//!   the program there.
//! - iNES builders (`build_ines`, `set_vectors_in_prg`) for ROM loader tests.
//! - `nes_with_program` / `nes_with_nmi_handler`: a powered-up `Nes` whose
//!   16 KiB PRG holds the given code, for scheduler tests.
//!
//! Notes on the iNES header fields written here:
//! - bytes[0..4] = b"NES\x1A"
//! - byte 4 = PRG ROM size in 16 KiB units
//! - byte 5 = CHR ROM size in 8 KiB units
//! - byte 6 = Flags 6 (mirroring, battery, trainer, mapper low nibble)
//! - byte 7 = Flags 7 (mapper high nibble)
//! - bytes 8..15 = zero

#![allow(dead_code)]

use crate::bus::{Bus, PRG_START};
use crate::config::PowerUpConfig;
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::CpuState;
use crate::cpu_bus::CpuBus;
use crate::scheduler::Nes;

/// Where `flat_cpu` places its program (outside zero page and stack).
pub const TEST_ORIGIN: u16 = 0x0600;

const PRG_BANK: usize = 16 * 1024;

/// Flat 64 KiB address space with no mirroring or side effects.
pub struct FlatMemory {
    bytes: Box<[u8; 0x10000]>,
}

impl FlatMemory {
    pub fn new() -> Self {
        Self {
            bytes: Box::new([0; 0x10000]),
        }
    }

    /// Zeroed memory with `data` copied to `origin` (wrapping at $FFFF).
    pub fn with_bytes(origin: u16, data: &[u8]) -> Self {
        let mut mem = Self::new();
        for (i, &b) in data.iter().enumerate() {
            mem.poke(origin.wrapping_add(i as u16), b);
        }
        mem
    }

    pub fn poke(&mut self, addr: u16, value: u8) {
        self.bytes[addr as usize] = value;
    }

    pub fn peek(&self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuBus for FlatMemory {
    fn read(&mut self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.bytes[addr as usize] = value;
    }

    fn peek(&self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }
}

/// Fresh CPU state at `TEST_ORIGIN` with `program` loaded there.
pub fn flat_cpu(program: &[u8]) -> (CpuState, FlatMemory) {
    let mut cpu = CpuState::new();
    cpu.set_pc(TEST_ORIGIN);
    (cpu, FlatMemory::with_bytes(TEST_ORIGIN, program))
}

/// Build a minimal iNES (v1) image.
///
/// - `prg_16k`: number of 16 KiB PRG units, filled with $AA
/// - `chr_8k`: number of 8 KiB CHR units, filled with $CC
/// - `flags6` / `flags7`: raw header flag bytes
/// - `trainer`: optional 512-byte trainer inserted after the header
pub fn build_ines(
    prg_16k: usize,
    chr_8k: usize,
    flags6: u8,
    flags7: u8,
    trainer: Option<&[u8; 512]>,
) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(
        16 + trainer.map(|_| 512).unwrap_or(0) + prg_16k * PRG_BANK + chr_8k * 8 * 1024,
    );

    bytes.extend_from_slice(b"NES\x1A");
    bytes.push(prg_16k as u8);
    bytes.push(chr_8k as u8);
    bytes.push(flags6);
    bytes.push(flags7);
    bytes.extend_from_slice(&[0u8; 8]);

    if let Some(t) = trainer {
        bytes.extend_from_slice(t);
    }
    bytes.extend(std::iter::repeat_n(0xAA, prg_16k * PRG_BANK));
    bytes.extend(std::iter::repeat_n(0xCC, chr_8k * 8 * 1024));
    bytes
}

/// Write CPU vectors (NMI, RESET, IRQ/BRK) into the last six bytes of a
/// 16 KiB or 32 KiB PRG image. Panics on any other length.
pub fn set_vectors_in_prg(prg: &mut [u8], reset: u16, nmi: u16, irq: u16) {
    let base = match prg.len() {
        16384 => 0x3FFA,
        32768 => 0x7FFA,
        other => panic!("unsupported PRG length for vectors: {other} bytes"),
    };
    write_le_u16(prg, base, nmi);
    write_le_u16(prg, base + 2, reset);
    write_le_u16(prg, base + 4, irq);
}

#[inline]
fn write_le_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset] = (value & 0x00FF) as u8;
    buf[offset + 1] = (value >> 8) as u8;
}

fn place(prg: &mut [u8], origin: u16, code: &[u8]) {
    assert!(origin >= PRG_START, "PRG code must live at $8000 or above");
    let offset = (origin - PRG_START) as usize % PRG_BANK;
    prg[offset..offset + code.len()].copy_from_slice(code);
}

/// 16 KiB PRG (NOP-filled) with `program` at `origin`; all vectors point at
/// `origin`.
pub fn prg_with_program(origin: u16, program: &[u8]) -> Vec<u8> {
    let mut prg = vec![0xEA; PRG_BANK];
    place(&mut prg, origin, program);
    set_vectors_in_prg(&mut prg, origin, origin, origin);
    prg
}

/// Bus with `program` mapped at `origin` and empty CHR.
pub fn bus_with_program(origin: u16, program: &[u8]) -> Bus {
    let mut bus = Bus::new();
    bus.load_prg(&prg_with_program(origin, program));
    bus
}

/// Powered-up `Nes` (nestest convention, reset vector entry) running
/// `program` from `origin`.
pub fn nes_with_program(origin: u16, program: &[u8]) -> Nes {
    let mut nes = Nes::new(PowerUpConfig::default());
    nes.load_rom(&prg_with_program(origin, program), &[]);
    nes.power_up();
    nes
}

/// Like `nes_with_program`, with an NMI handler at `handler_origin`.
pub fn nes_with_nmi_handler(
    origin: u16,
    program: &[u8],
    handler_origin: u16,
    handler: &[u8],
) -> Nes {
    let mut prg = prg_with_program(origin, program);
    place(&mut prg, handler_origin, handler);
    set_vectors_in_prg(&mut prg, origin, handler_origin, origin);

    let mut nes = Nes::new(PowerUpConfig::default());
    nes.load_rom(&prg, &[]);
    nes.power_up();
    nes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_basic_ines() {
        let rom = build_ines(2, 1, 0x01, 0x00, None);
        assert_eq!(&rom[0..4], b"NES\x1A");
        assert_eq!(rom[4], 2);
        assert_eq!(rom[5], 1);
        assert_eq!(rom[6], 0x01);
        assert_eq!(rom[7], 0x00);
        assert_eq!(rom.len(), 16 + 2 * 16 * 1024 + 8 * 1024);
    }

    #[test]
    fn writes_vectors_for_16k_and_32k_prg() {
        let mut prg = vec![0u8; 16 * 1024];
        set_vectors_in_prg(&mut prg, 0x8123, 0x8456, 0x8ABC);
        assert_eq!(&prg[0x3FFA..], &[0x56, 0x84, 0x23, 0x81, 0xBC, 0x8A]);

        let mut prg = vec![0u8; 32 * 1024];
        set_vectors_in_prg(&mut prg, 0x8123, 0x8456, 0x8ABC);
        assert_eq!(&prg[0x7FFA..], &[0x56, 0x84, 0x23, 0x81, 0xBC, 0x8A]);
    }

    #[test]
    fn program_is_visible_through_the_bus() {
        let mut bus = bus_with_program(0xC000, &[0xA9, 0x42]);
        assert_eq!(bus.read(0xC000), 0xA9);
        assert_eq!(bus.read(0x8001), 0x42);
        assert_eq!(bus.read_word(0xFFFC), 0xC000);
    }
}
