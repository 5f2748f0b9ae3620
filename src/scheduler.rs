/*!
scheduler.rs - Instruction-granular CPU/PPU interleaving.

Overview
========
`Nes` owns the CPU and the bus (which owns the PPU) and advances them in
lockstep at instruction granularity. The PPU always ends up exactly
`3 * (cpu cycles since power-up - 7) + 21` dots from its power-up position,
i.e. three dots per CPU cycle.

Order of operations for one `tick_instruction`
==============================================
1. If OAM DMA stall cycles are pending, burn all of them as one unit.
2. Otherwise:
   * move a latched PPU NMI request into the CPU's pending interrupt;
   * enter the pending interrupt (7 cycles) if it can be taken;
   * record a trace line for the instruction about to run;
   * execute one instruction;
   * if it wrote $4014, queue 513 stall cycles (+1 when the cycle counter
     is odd after the write).
3. Advance the PPU by three dots for every CPU cycle consumed above.

An NMI raised while the PPU catches up is therefore seen before the next
instruction fetch, never in the middle of one.
*/

use crate::bus::Bus;
use crate::config::PowerUpConfig;
use crate::cpu::{Cpu, CpuRegisters, Interrupt};
use crate::framebuffer::FrameBuffer;
use crate::ppu::PpuRegisters;
use crate::rom::RomImage;
use crate::trace::{PpuPosition, trace_line};

/// PPU dots per CPU cycle (NTSC).
pub const PPU_DOTS_PER_CPU_CYCLE: u32 = 3;
/// Base OAM DMA stall; one more cycle is added on odd CPU cycles.
pub const OAM_DMA_STALL_CYCLES: u32 = 513;

/// Log target for per-instruction trace lines.
pub const TRACE_TARGET: &str = "nescore::trace";

/// CPU + bus + PPU, stepped together.
pub struct Nes {
    cpu: Cpu,
    bus: Bus,
    config: PowerUpConfig,
    trace: Option<Vec<String>>,
    trace_ppu_columns: bool,
}

impl Nes {
    pub fn new(config: PowerUpConfig) -> Self {
        Self {
            cpu: Cpu::new(),
            bus: Bus::new(),
            config,
            trace: None,
            trace_ppu_columns: true,
        }
    }

    /// Copy PRG into $8000-$FFFF and CHR into PPU pattern memory.
    pub fn load_rom(&mut self, prg: &[u8], chr: &[u8]) {
        log::debug!("loading PRG {} bytes, CHR {} bytes", prg.len(), chr.len());
        self.bus.load_prg(prg);
        self.bus.load_chr(chr);
    }

    pub fn load_image(&mut self, image: &RomImage) {
        self.load_rom(&image.prg, &image.chr);
    }

    /// Apply the configured power-up convention and catch the PPU up with
    /// the 7 reset cycles (21 dots). Call once, after loading the ROM.
    pub fn power_up(&mut self) {
        self.cpu.power_up(&mut self.bus, self.config);
        self.advance_ppu(PowerUpConfig::RESET_CYCLES as u32 * PPU_DOTS_PER_CPU_CYCLE);
    }

    /// Run one scheduling unit and return the CPU cycles it consumed.
    pub fn tick_instruction(&mut self) -> u32 {
        let before = self.cpu.total_cycles();

        if self.cpu.stall_cycles() > 0 {
            self.cpu.burn_stall();
        } else {
            if self.bus.ppu.take_nmi_request() {
                log::debug!(
                    "NMI at scanline {} dot {} (cycle {})",
                    self.bus.ppu.scanline(),
                    self.bus.ppu.cycle(),
                    self.cpu.total_cycles()
                );
                self.cpu.request_interrupt(Interrupt::Nmi);
            }
            self.cpu.service_pending_interrupt(&mut self.bus);
            self.record_trace();
            self.cpu.execute_instruction(&mut self.bus);

            if self.bus.take_dma_request() {
                let stall = OAM_DMA_STALL_CYCLES + (self.cpu.total_cycles() & 1) as u32;
                log::debug!("OAM DMA: stalling CPU {stall} cycles");
                self.cpu.add_stall(stall);
            }
        }

        let consumed = (self.cpu.total_cycles() - before) as u32;
        self.advance_ppu(consumed * PPU_DOTS_PER_CPU_CYCLE);
        consumed
    }

    /// Step until the CPU cycle counter passes `target`.
    pub fn run_until(&mut self, target: u64) {
        while self.cpu.total_cycles() <= target {
            self.tick_instruction();
        }
    }

    pub fn run_instructions(&mut self, count: usize) {
        for _ in 0..count {
            self.tick_instruction();
        }
    }

    /// Step until the PPU frame counter changes.
    pub fn run_frame(&mut self) {
        let frame = self.bus.ppu.frame();
        while self.bus.ppu.frame() == frame {
            self.tick_instruction();
        }
        log::debug!(
            "frame {} complete at cycle {}",
            frame,
            self.cpu.total_cycles()
        );
    }

    fn advance_ppu(&mut self, dots: u32) {
        let mut budget = dots;
        while budget > 0 {
            budget = budget.saturating_sub(self.bus.ppu.run());
        }
    }

    // ---------------------------------------------------------------------
    // Tracing
    // ---------------------------------------------------------------------

    /// Start collecting one line per executed instruction.
    pub fn enable_trace(&mut self, ppu_columns: bool) {
        self.trace = Some(Vec::new());
        self.trace_ppu_columns = ppu_columns;
    }

    /// Drain the collected lines; tracing stays enabled.
    pub fn take_trace(&mut self) -> Vec<String> {
        self.trace.as_mut().map(std::mem::take).unwrap_or_default()
    }

    fn record_trace(&mut self) {
        let logging = log::log_enabled!(target: TRACE_TARGET, log::Level::Trace);
        if (self.trace.is_none() && !logging) || self.cpu.is_halted() {
            return;
        }
        let ppu = self.trace_ppu_columns.then(|| PpuPosition {
            scanline: self.bus.ppu.scanline(),
            dot: self.bus.ppu.cycle(),
        });
        let line = trace_line(&self.cpu, &self.bus, ppu);
        if logging {
            log::trace!(target: TRACE_TARGET, "{line}");
        }
        if let Some(lines) = self.trace.as_mut() {
            lines.push(line);
        }
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn config(&self) -> PowerUpConfig {
        self.config
    }

    pub fn cpu_registers(&self) -> CpuRegisters {
        self.cpu.registers()
    }

    pub fn ppu_registers(&self) -> PpuRegisters {
        self.bus.ppu.registers()
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        self.bus.ppu.frame_buffer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ppu::DOTS_PER_SCANLINE;
    use crate::test_utils::{nes_with_nmi_handler, nes_with_program};

    fn ppu_dot_index(nes: &Nes) -> u64 {
        nes.bus().ppu.scanline() as u64 * DOTS_PER_SCANLINE as u64 + nes.bus().ppu.cycle() as u64
    }

    #[test]
    fn power_up_positions_ppu_at_dot_21() {
        let nes = nes_with_program(0x8000, &[0xEA]);
        assert_eq!(nes.cpu().total_cycles(), 7);
        assert_eq!(nes.bus().ppu.scanline(), 0);
        assert_eq!(nes.bus().ppu.cycle(), 21);
        assert_eq!(nes.cpu_registers().pc, 0x8000);
    }

    #[test]
    fn ppu_runs_three_dots_per_cpu_cycle() {
        // LDA $0200,X / JMP $8000
        let mut nes = nes_with_program(0x8000, &[0xBD, 0x00, 0x02, 0x4C, 0x00, 0x80]);
        for _ in 0..200 {
            nes.tick_instruction();
            assert_eq!(ppu_dot_index(&nes), 3 * nes.cpu().total_cycles());
        }
    }

    #[test]
    fn oam_dma_on_odd_cycle_stalls_514() {
        // LDA #$02 ; STA $4014 ; NOP
        let mut nes = nes_with_program(0x8000, &[0xA9, 0x02, 0x8D, 0x14, 0x40, 0xEA]);
        nes.tick_instruction();
        nes.tick_instruction();
        assert_eq!(nes.cpu().total_cycles(), 13);
        assert_eq!(nes.cpu().stall_cycles(), 514);
        assert_eq!(nes.tick_instruction(), 514);
        assert_eq!(nes.cpu().total_cycles(), 13 + 514);
        assert_eq!(nes.cpu_registers().pc, 0x8005);
    }

    #[test]
    fn oam_dma_on_even_cycle_stalls_513() {
        // LDA #$02 ; LDX $00 ; STA $4014 ; NOP
        let mut nes = nes_with_program(0x8000, &[0xA9, 0x02, 0xA6, 0x00, 0x8D, 0x14, 0x40, 0xEA]);
        nes.run_instructions(3);
        assert_eq!(nes.cpu().total_cycles(), 16);
        assert_eq!(nes.tick_instruction(), 513);
        assert_eq!(ppu_dot_index(&nes), 3 * nes.cpu().total_cycles());
    }

    #[test]
    fn nmi_fires_once_per_frame() {
        // LDA #$80 ; STA $2000 ; loop: JMP loop
        let main = [0xA9, 0x80, 0x8D, 0x00, 0x20, 0x4C, 0x05, 0x80];
        // INC $10 ; RTI
        let handler = [0xE6, 0x10, 0x40];
        let mut nes = nes_with_nmi_handler(0x8000, &main, 0x9000, &handler);
        for _ in 0..3 {
            nes.run_frame();
        }
        assert_eq!(nes.bus().peek(0x0010), 3);
    }

    #[test]
    fn no_nmi_when_disabled() {
        let main = [0x4C, 0x00, 0x80];
        let handler = [0xE6, 0x10, 0x40];
        let mut nes = nes_with_nmi_handler(0x8000, &main, 0x9000, &handler);
        nes.run_frame();
        nes.run_frame();
        assert_eq!(nes.bus().peek(0x0010), 0);
    }

    #[test]
    fn run_until_passes_target() {
        let mut nes = nes_with_program(0x8000, &[0x4C, 0x00, 0x80]);
        nes.run_until(1000);
        let cycles = nes.cpu().total_cycles();
        assert!(cycles > 1000 && cycles <= 1003, "{cycles}");
    }

    #[test]
    fn trace_records_one_line_per_instruction() {
        let mut nes = nes_with_program(0x8000, &[0xA9, 0x01, 0xEA, 0xEA]);
        nes.enable_trace(true);
        nes.run_instructions(3);
        let lines = nes.take_trace();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("8000  A9 01     LDA #$01"), "{}", lines[0]);
        assert!(lines[0].ends_with("PPU:  0, 21 CYC:7"), "{}", lines[0]);
        assert!(lines[1].ends_with("PPU:  0, 27 CYC:9"), "{}", lines[1]);
        assert!(nes.take_trace().is_empty());
    }

    #[test]
    fn jammed_cpu_keeps_the_ppu_moving() {
        let mut nes = nes_with_program(0x8000, &[0x02]);
        nes.tick_instruction();
        assert!(nes.cpu().is_halted());
        nes.run_frame();
        assert!(nes.bus().ppu.frame() >= 1);
        assert_eq!(nes.cpu_registers().pc, 0x8000);
    }

    #[test]
    fn jammed_cpu_does_not_enter_nmi() {
        // LDA #$80 ; STA $2000 ; KIL
        let main = [0xA9, 0x80, 0x8D, 0x00, 0x20, 0x02];
        let handler = [0xE6, 0x10, 0x40];
        let mut nes = nes_with_nmi_handler(0x8000, &main, 0x9000, &handler);
        nes.run_frame();
        nes.run_frame();
        assert!(nes.cpu().is_halted());
        let regs = nes.cpu_registers();
        assert_eq!(regs.pc, 0x8005);
        assert_eq!(regs.sp, 0xFD);
        assert_eq!(nes.bus().peek(0x0010), 0);
    }

    #[test]
    fn trace_matches_reference_lines() {
        // 80F9 LDX #$02 ; DEX ; BNE $8102 (taken, crosses into $81xx)
        // 8102 JSR $8110 ; DEX ; BNE $8100 (not taken) ; BEQ $810C (taken)
        // 8110 RTS
        let mut program = vec![0xEA; 0x18];
        program[..5].copy_from_slice(&[0xA2, 0x02, 0xCA, 0xD0, 0x04]);
        program[0x09..0x11].copy_from_slice(&[0x20, 0x10, 0x81, 0xCA, 0xD0, 0xF8, 0xF0, 0x02]);
        program[0x17] = 0x60;
        let mut nes = nes_with_program(0x80F9, &program);
        nes.enable_trace(true);
        nes.run_instructions(9);

        let expected = [
            "80F9  A2 02     LDX #$02                        A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7",
            "80FB  CA        DEX                             A:00 X:02 Y:00 P:24 SP:FD PPU:  0, 27 CYC:9",
            "80FC  D0 04     BNE $8102                       A:00 X:01 Y:00 P:24 SP:FD PPU:  0, 33 CYC:11",
            "8102  20 10 81  JSR $8110                       A:00 X:01 Y:00 P:24 SP:FD PPU:  0, 45 CYC:15",
            "8110  60        RTS                             A:00 X:01 Y:00 P:24 SP:FB PPU:  0, 63 CYC:21",
            "8105  CA        DEX                             A:00 X:01 Y:00 P:24 SP:FD PPU:  0, 81 CYC:27",
            "8106  D0 F8     BNE $8100                       A:00 X:00 Y:00 P:26 SP:FD PPU:  0, 87 CYC:29",
            "8108  F0 02     BEQ $810C                       A:00 X:00 Y:00 P:26 SP:FD PPU:  0, 93 CYC:31",
            "810C  EA        NOP                             A:00 X:00 Y:00 P:26 SP:FD PPU:  0,102 CYC:34",
        ];
        let lines = nes.take_trace();
        assert_eq!(lines.len(), expected.len());
        for (i, (got, want)) in lines.iter().zip(expected).enumerate() {
            assert_eq!(got, want, "line {}", i + 1);
        }
        assert_eq!(nes.cpu().total_cycles(), 36);
    }

    /// Runs nestest.nes from $C000 and diffs every line against nestest.log.
    ///
    /// NESTEST_ROM=path/nestest.nes NESTEST_LOG=path/nestest.log \
    ///     cargo test nestest_log -- --ignored
    #[test]
    #[ignore]
    fn nestest_log_matches() {
        let (Ok(rom), Ok(log)) = (std::env::var("NESTEST_ROM"), std::env::var("NESTEST_LOG"))
        else {
            eprintln!("NESTEST_ROM / NESTEST_LOG not set; skipping");
            return;
        };
        let image = RomImage::load(&rom).unwrap();
        let reference = std::fs::read_to_string(&log).unwrap();

        let mut nes = Nes::new(PowerUpConfig::nestest(0xC000));
        nes.load_image(&image);
        nes.power_up();
        nes.enable_trace(true);

        for (i, want) in reference.lines().map(str::trim_end).enumerate() {
            if want.is_empty() {
                continue;
            }
            nes.tick_instruction();
            let got = nes.take_trace();
            assert_eq!(got.len(), 1, "no trace line at log line {}", i + 1);
            assert_eq!(got[0], want, "first divergence at log line {}", i + 1);
        }
    }
}
