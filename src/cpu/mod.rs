/*!
cpu - 6502 (2A03) CPU core.

```text
    state.rs        - Architectural registers and status flags.
    regs.rs         - `CpuRegs` trait: generic register / flag access.
    addressing.rs   - Addressing modes and effective-address helpers.
    opcodes.rs      - Static 256-entry opcode table (mnemonic, mode, timing).
    execute.rs      - Operand resolution and instruction semantic helpers.
    dispatch/       - Fetch / decode / execute for one instruction, split by
                      instruction family.
    core/           - `Cpu` facade: power-up, interrupts, stalls, cycle count.
```

Usage:
```rust,ignore
use nescore::cpu::Cpu;

let mut cpu = Cpu::new();
cpu.power_up(&mut bus, PowerUpConfig::default());
cpu.step(&mut bus);
```
*/

pub mod addressing;
pub mod core;
pub(crate) mod dispatch;
pub(crate) mod execute;
pub mod opcodes;
pub mod regs;
pub mod state;

pub use crate::cpu::core::{Cpu, CpuRegisters, Interrupt};
pub use crate::cpu::regs::CpuRegs;
pub use crate::cpu::state::{CpuState, StatusFlags};
