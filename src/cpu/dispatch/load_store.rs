/*!
load_store.rs - Load / Store opcode family handler

Loads set Z/N; indexed reads pay the page-cross penalty (applied by the
dispatcher from the opcode row). Stores never read their target and never
touch flags.

```text
    LDA LDX LDY
    STA STX STY
```
*/

use crate::cpu::execute::{Operand, lda, ldx, ldy, read_operand, write_back};
use crate::cpu::opcodes::{Mnemonic, Opcode};
use crate::cpu::regs::CpuRegs;
use crate::cpu_bus::CpuBus;

/// Returns false if the opcode is not a load/store.
pub(super) fn handle<C: CpuRegs, B: CpuBus + ?Sized>(
    op: &Opcode,
    cpu: &mut C,
    bus: &mut B,
    operand: &Operand,
    _cycles: &mut u32,
) -> bool {
    match op.mnemonic {
        Mnemonic::LDA => {
            let v = read_operand(cpu, bus, operand);
            lda(cpu, v);
        }
        Mnemonic::LDX => {
            let v = read_operand(cpu, bus, operand);
            ldx(cpu, v);
        }
        Mnemonic::LDY => {
            let v = read_operand(cpu, bus, operand);
            ldy(cpu, v);
        }
        Mnemonic::STA => {
            let v = cpu.a();
            write_back(cpu, bus, operand, v);
        }
        Mnemonic::STX => {
            let v = cpu.x();
            write_back(cpu, bus, operand, v);
        }
        Mnemonic::STY => {
            let v = cpu.y();
            write_back(cpu, bus, operand, v);
        }
        _ => return false,
    }
    true
}
