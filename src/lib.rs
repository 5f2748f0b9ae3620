#![doc = r#"
nescore library crate.

A cycle-counted NES core: 2A03 CPU (documented and undocumented opcodes),
2C02 PPU with a per-dot background/sprite pipeline, and the CPU bus that
joins them. Emulation is driven at instruction granularity by `Nes`.

Modules:
- register: fixed-width wrapping 8/16-bit registers
- error: `CoreError` for the fallible edges (ROM splitting, PNG export)
- config: power-up conventions (nestest vs. hardware)
- cpu_bus: `CpuBus` trait decoupling the CPU from the concrete bus
- bus: 64 KiB CPU address space, PPU register window, OAM DMA trigger
- ppu: PPU state machine, VRAM/OAM, register side effects, rendering
- framebuffer: 256x240 RGB output
- cpu: 6502 core (state + addressing + opcode table + dispatch + facade)
- scheduler: `Nes`, the CPU/PPU interleaver
- trace: nestest-format trace lines
- rom: minimal iNES splitter

In tests, shared helpers are available under `crate::test_utils`.
"#]

pub mod bus;
pub mod config;
pub mod cpu;
pub mod cpu_bus;
pub mod error;
pub mod framebuffer;
pub mod ppu;
pub mod register;
pub mod rom;
pub mod scheduler;
pub mod trace;

// Re-export commonly used types at the crate root for convenience.
pub use bus::Bus;
pub use config::{PowerUpConfig, PowerUpConvention};
pub use cpu::{Cpu, CpuRegisters, Interrupt};
pub use cpu_bus::CpuBus;
pub use error::{CoreError, CoreResult};
pub use framebuffer::FrameBuffer;
pub use ppu::{Ppu, PpuRegisters};
pub use rom::RomImage;
pub use scheduler::Nes;

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
