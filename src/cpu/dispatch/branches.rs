/*!
branches.rs - Relative branch opcode handler (BPL/BMI/BVC/BVS/BCC/BCS/BNE/BEQ)

Cycle Rules
===========
Base cost: 2 cycles.
If branch is taken: +1 cycle.
If taken and the target is on a different page than the instruction after
the branch: +1 more.
*/

use crate::cpu::execute::{Operand, branch};
use crate::cpu::opcodes::{Mnemonic, Opcode};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::StatusFlags;
use crate::cpu_bus::CpuBus;

pub(super) fn handle<C: CpuRegs, B: CpuBus + ?Sized>(
    op: &Opcode,
    cpu: &mut C,
    _bus: &mut B,
    operand: &Operand,
    cycles: &mut u32,
) -> bool {
    let take = match op.mnemonic {
        Mnemonic::BPL => !cpu.is_flag_set(StatusFlags::NEGATIVE),
        Mnemonic::BMI => cpu.is_flag_set(StatusFlags::NEGATIVE),
        Mnemonic::BVC => !cpu.is_flag_set(StatusFlags::OVERFLOW),
        Mnemonic::BVS => cpu.is_flag_set(StatusFlags::OVERFLOW),
        Mnemonic::BCC => !cpu.is_flag_set(StatusFlags::CARRY),
        Mnemonic::BCS => cpu.is_flag_set(StatusFlags::CARRY),
        Mnemonic::BNE => !cpu.is_flag_set(StatusFlags::ZERO),
        Mnemonic::BEQ => cpu.is_flag_set(StatusFlags::ZERO),
        _ => return false,
    };
    *cycles += branch(cpu, operand, take);
    true
}
