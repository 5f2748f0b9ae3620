/*!
core::Cpu - Canonical 6502 CPU facade wrapping `CpuState`.

Design
======
- `Cpu` owns the register file (`CpuState`) plus run-state: the monotonic
  cycle counter, pending stall cycles (OAM DMA) and the pending interrupt.
- Instruction execution is delegated to the generic dispatcher operating on
  `CpuState`; this layer only adds interrupt entry, stalls and the halted
  (KIL) state, and keeps `total_cycles` in step with what was consumed.
- Every method taking a bus is generic over `CpuBus`, so the facade runs on
  the real `Bus` or on flat test memory.

Interrupts
==========
`request_interrupt` records the highest-priority request (Reset > NMI > IRQ).
`service_pending_interrupt` runs before the next opcode fetch:
- NMI / IRQ: push PC, push P with BREAK clear and UNUSED set, set
  IRQ_DISABLE, jump through $FFFA / $FFFE. 7 cycles.
- IRQ stays pending (level-style) while IRQ_DISABLE is set.
- Reset: SP -= 3 without writing, IRQ_DISABLE set, jump through $FFFC,
  halted state cleared. 7 cycles.
- A jammed (KIL) CPU ignores NMI and IRQ; they stay pending. Only Reset is
  taken.
*/

use serde::{Deserialize, Serialize};

use crate::config::{PowerUpConfig, PowerUpConvention};
use crate::cpu::execute::{push_status, push_word};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{CpuState, StatusFlags};
use crate::cpu_bus::CpuBus;

pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Cycles consumed by any interrupt entry sequence.
pub const INTERRUPT_CYCLES: u32 = 7;

const RAM_END: u16 = 0x07FF;
const APU_REGISTERS: std::ops::RangeInclusive<u16> = 0x4000..=0x400F;
const APU_STATUS: u16 = 0x4015;
const APU_FRAME_COUNTER: u16 = 0x4017;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interrupt {
    #[default]
    None,
    Nmi,
    Irq,
    Reset,
}

impl Interrupt {
    fn priority(self) -> u8 {
        match self {
            Interrupt::None => 0,
            Interrupt::Irq => 1,
            Interrupt::Nmi => 2,
            Interrupt::Reset => 3,
        }
    }
}

/// Register snapshot for display and golden-log comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuRegisters {
    pub pc: u16,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub p: u8,
}

#[derive(Debug, Clone, Default)]
pub struct Cpu {
    state: CpuState,
    total_cycles: u64,
    stall_cycles: u32,
    pending: Interrupt,
}

impl Cpu {
    /// Construct a new CPU with register defaults; call `power_up` before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return immutable reference to internal state (for inspection / testing).
    pub fn state(&self) -> &CpuState {
        &self.state
    }

    /// Return mutable reference to internal state.
    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    /// Apply a power-up convention: registers, I/O defaults, RAM contents,
    /// PC from `entry_point` or the reset vector, cycle counter at 7.
    pub fn power_up<B: CpuBus + ?Sized>(&mut self, bus: &mut B, config: PowerUpConfig) {
        let ram_fill = match config.convention {
            PowerUpConvention::Nestest => 0x00,
            PowerUpConvention::Hardware => {
                bus.write(APU_STATUS, 0x00);
                bus.write(APU_FRAME_COUNTER, 0x00);
                for addr in APU_REGISTERS {
                    bus.write(addr, 0x00);
                }
                0xFF
            }
        };
        for addr in 0..=RAM_END {
            bus.write(addr, ram_fill);
        }

        self.state = CpuState::new();
        self.state.set_status(config.convention.initial_status());
        self.state.set_sp(PowerUpConfig::INITIAL_SP);
        let pc = match config.entry_point {
            Some(pc) => pc,
            None => bus.read_word(RESET_VECTOR),
        };
        self.state.set_pc(pc);

        self.total_cycles = PowerUpConfig::RESET_CYCLES;
        self.stall_cycles = 0;
        self.pending = Interrupt::None;
        log::debug!(
            "power-up ({:?}): PC=${:04X} P=${:02X}",
            config.convention,
            pc,
            self.state.status()
        );
    }

    /// True once a KIL opcode has jammed the CPU.
    pub fn is_halted(&self) -> bool {
        self.state.halted
    }

    // ---------------------------------------------------------------------
    // Register accessors
    // ---------------------------------------------------------------------
    pub fn a(&self) -> u8 {
        self.state.a()
    }
    pub fn x(&self) -> u8 {
        self.state.x()
    }
    pub fn y(&self) -> u8 {
        self.state.y()
    }
    pub fn sp(&self) -> u8 {
        self.state.sp()
    }
    pub fn pc(&self) -> u16 {
        self.state.pc()
    }
    pub fn status(&self) -> u8 {
        self.state.status()
    }

    pub fn registers(&self) -> CpuRegisters {
        CpuRegisters {
            pc: self.pc(),
            a: self.a(),
            x: self.x(),
            y: self.y(),
            sp: self.sp(),
            p: self.status(),
        }
    }

    // ---------------------------------------------------------------------
    // Cycle accounting
    // ---------------------------------------------------------------------

    /// Monotonic cycle count since power-up (starts at 7).
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    pub fn stall_cycles(&self) -> u32 {
        self.stall_cycles
    }

    /// Queue cycles during which the CPU fetches nothing (OAM DMA).
    pub fn add_stall(&mut self, cycles: u32) {
        self.stall_cycles += cycles;
    }

    /// Consume every pending stall cycle at once and return how many.
    pub fn burn_stall(&mut self) -> u32 {
        let burned = std::mem::take(&mut self.stall_cycles);
        self.total_cycles += burned as u64;
        burned
    }

    // ---------------------------------------------------------------------
    // Interrupts
    // ---------------------------------------------------------------------

    pub fn pending_interrupt(&self) -> Interrupt {
        self.pending
    }

    /// Record an interrupt request; a lower-priority request never replaces
    /// a higher one.
    pub fn request_interrupt(&mut self, interrupt: Interrupt) {
        if interrupt.priority() > self.pending.priority() {
            self.pending = interrupt;
        }
    }

    /// Enter the pending interrupt, if it can be taken. Returns the cycles
    /// consumed (0 or 7).
    pub fn service_pending_interrupt<B: CpuBus + ?Sized>(&mut self, bus: &mut B) -> u32 {
        match self.pending {
            Interrupt::None => return 0,
            Interrupt::Nmi | Interrupt::Irq if self.state.halted => return 0,
            Interrupt::Irq if self.state.is_flag_set(StatusFlags::IRQ_DISABLE) => return 0,
            Interrupt::Nmi => self.enter_interrupt(bus, NMI_VECTOR),
            Interrupt::Irq => self.enter_interrupt(bus, IRQ_VECTOR),
            Interrupt::Reset => {
                let sp = self.state.sp().wrapping_sub(3);
                self.state.set_sp(sp);
                self.state.assign_flag(StatusFlags::IRQ_DISABLE, true);
                self.state.set_halted(false);
                let pc = bus.read_word(RESET_VECTOR);
                self.state.set_pc(pc);
            }
        }
        self.pending = Interrupt::None;
        self.total_cycles += INTERRUPT_CYCLES as u64;
        INTERRUPT_CYCLES
    }

    fn enter_interrupt<B: CpuBus + ?Sized>(&mut self, bus: &mut B, vector: u16) {
        let pc = self.state.pc();
        push_word(&mut self.state, bus, pc);
        push_status(&mut self.state, bus, false);
        self.state.assign_flag(StatusFlags::IRQ_DISABLE, true);
        let target = bus.read_word(vector);
        self.state.set_pc(target);
    }

    // ---------------------------------------------------------------------
    // Execution
    // ---------------------------------------------------------------------

    /// Execute exactly one instruction (or burn one cycle when jammed).
    pub fn execute_instruction<B: CpuBus + ?Sized>(&mut self, bus: &mut B) -> u32 {
        let cycles = if self.state.halted {
            1
        } else {
            crate::cpu::dispatch::step(&mut self.state, bus)
        };
        self.total_cycles += cycles as u64;
        cycles
    }

    /// One scheduling unit: a stall burn, or interrupt entry followed by one
    /// instruction. Returns the cycles consumed.
    ///
    /// This layer only burns stalls already queued with `add_stall`. It never
    /// looks at the bus DMA latch; `Nes::tick_instruction` turns a $4014 write
    /// into stall cycles and is the driver to use with the real `Bus`.
    pub fn step<B: CpuBus + ?Sized>(&mut self, bus: &mut B) -> u32 {
        if self.stall_cycles > 0 {
            return self.burn_stall();
        }
        let entry = self.service_pending_interrupt(bus);
        entry + self.execute_instruction(bus)
    }

    /// Run up to `max_instructions` steps, stopping early when jammed.
    pub fn run<B: CpuBus + ?Sized>(&mut self, bus: &mut B, max_instructions: usize) {
        for _ in 0..max_instructions {
            if self.is_halted() {
                break;
            }
            self.step(bus);
        }
    }
}

// -------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------
