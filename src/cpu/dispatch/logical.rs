/*!
logical.rs - AND / ORA / EOR / BIT opcode family handler.
*/

use crate::cpu::execute::{Operand, and, bit, eor, ora, read_operand};
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
    let apply: fn(&mut C, u8) = match op.mnemonic {
        Mnemonic::AND => and,
        Mnemonic::ORA => ora,
        Mnemonic::EOR => eor,
        Mnemonic::BIT => bit,
        _ => return false,
    };
    let v = read_operand(cpu, bus, operand);
    apply(cpu, v);
    true
}
