/*!
compare.rs - CMP / CPX / CPY opcode family handler.

C = register >= operand (unsigned); Z/N from the 8-bit difference.
*/

use crate::cpu::execute::{Operand, compare, read_operand};
use crate::cpu::opcodes::{Mnemonic, Opcode};
use crate::cpu::regs::CpuRegs;
use crate::cpu_bus::CpuBus;

pub(super) fn handle<C: CpuRegs, B: CpuBus + ?Sized>(
    op: &Opcode,
    cpu: &mut C,
    bus: &mut B,
    operand: &Operand,
    _cycles: &mut u32,
) -> bool {
    let reg = match op.mnemonic {
        Mnemonic::CMP => cpu.a(),
        Mnemonic::CPX => cpu.x(),
        Mnemonic::CPY => cpu.y(),
        _ => return false,
    };
    let v = read_operand(cpu, bus, operand);
    compare(cpu, reg, v);
    true
}
