/*!
control_flow.rs - Control-flow / system opcode family handler

Overview
========
  JMP abs        (0x4C)
  JMP (ind)      (0x6C)  page-wrap quirk resolved by the addressing layer
  JSR abs        (0x20)
  RTS            (0x60)
  RTI            (0x40)
  BRK            (0x00)

Behavior Details
================
- JSR pushes (PC - 1): the address of its own last operand byte, high
  byte first.
- RTS pulls the return address and adds 1.
- RTI pulls P (BREAK dropped, UNUSED forced) then PC; no +1.
- BRK skips its padding byte, pushes PC and P with BREAK set, sets
  IRQ_DISABLE and jumps through $FFFE/$FFFF. It does not halt.
- JMP (ind) costs a flat 5 cycles.
*/

use crate::cpu::core::IRQ_VECTOR;
use crate::cpu::execute::{Operand, pop_word, pull_status, push_status, push_word};
use crate::cpu::opcodes::{Mnemonic, Opcode};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::StatusFlags;
use crate::cpu_bus::CpuBus;

pub(super) fn handle<C: CpuRegs, B: CpuBus + ?Sized>(
    op: &Opcode,
    cpu: &mut C,
    bus: &mut B,
    operand: &Operand,
    _cycles: &mut u32,
) -> bool {
    match op.mnemonic {
        Mnemonic::JMP => cpu.set_pc(operand.address()),
        Mnemonic::JSR => {
            let ret = cpu.pc().wrapping_sub(1);
            push_word(cpu, bus, ret);
            cpu.set_pc(operand.address());
        }
        Mnemonic::RTS => {
            let ret = pop_word(cpu, bus);
            cpu.set_pc(ret.wrapping_add(1));
        }
        Mnemonic::RTI => {
            pull_status(cpu, bus);
            let pc = pop_word(cpu, bus);
            cpu.set_pc(pc);
        }
        Mnemonic::BRK => {
            let ret = cpu.pc().wrapping_add(1);
            push_word(cpu, bus, ret);
            push_status(cpu, bus, true);
            cpu.assign_flag(StatusFlags::IRQ_DISABLE, true);
            let target = bus.read_word(IRQ_VECTOR);
            cpu.set_pc(target);
        }
        _ => return false,
    }
    true
}
