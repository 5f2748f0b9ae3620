/*!
dispatch - Fetch / decode / execute for a single 6502 instruction.

Overview
========
`step` performs one instruction:
1. Fetch the opcode byte at PC and advance PC.
2. Look up the static `OPCODES` row (mnemonic, addressing mode, timing).
3. Resolve the operand (effective address + page-cross flag), advancing PC
   past the operand bytes.
4. Start from the row's base cycles; add +1 when the row pays a page-cross
   penalty and the index carried.
5. Run the family handler chain. Each family matches on the mnemonic and
   returns `false` for mnemonics it does not own; branches add their own
   taken / page-change cycles.

Interrupt entry, stall cycles and the halted state are handled one layer up
in `cpu::core`; this module only ever executes an instruction.

Families
========
```text
    load_store    LDA LDX LDY STA STX STY
    arithmetic    ADC SBC
    logical       AND ORA EOR BIT
    compare       CMP CPX CPY
    rmw           ASL LSR ROL ROR INC DEC
    branches      BCC BCS BEQ BMI BNE BPL BVC BVS
    control_flow  JMP JSR RTS RTI BRK
    misc          transfers, stack, flag set/clear, INX/INY/DEX/DEY, NOP
    illegal       undocumented opcodes (LAX, SAX, DCP, ISB, SLO, ..., KIL)
```
*/

pub(crate) mod arithmetic;
pub(crate) mod branches;
pub(crate) mod compare;
pub(crate) mod control_flow;
pub(crate) mod illegal;
pub(crate) mod load_store;
pub(crate) mod logical;
pub(crate) mod misc;
pub(crate) mod rmw;

use crate::cpu::execute::resolve_operand;
use crate::cpu::opcodes::Opcode;
use crate::cpu::regs::CpuRegs;
use crate::cpu_bus::CpuBus;

/// Execute one instruction and return the cycles it consumed.
pub(crate) fn step<C: CpuRegs, B: CpuBus + ?Sized>(cpu: &mut C, bus: &mut B) -> u32 {
    let pc = cpu.pc();
    let code = bus.read(pc);
    cpu.advance_pc(1);

    let op = Opcode::lookup(code);
    let operand = resolve_operand(cpu, bus, op.mode);

    let mut cycles = op.cycles;
    add_page_cross_penalty(&mut cycles, op.page_penalty && operand.page_crossed);

    let handled = load_store::handle(op, cpu, bus, &operand, &mut cycles)
        || arithmetic::handle(op, cpu, bus, &operand, &mut cycles)
        || logical::handle(op, cpu, bus, &operand, &mut cycles)
        || compare::handle(op, cpu, bus, &operand, &mut cycles)
        || rmw::handle(op, cpu, bus, &operand, &mut cycles)
        || branches::handle(op, cpu, bus, &operand, &mut cycles)
        || control_flow::handle(op, cpu, bus, &operand, &mut cycles)
        || misc::handle(op, cpu, bus, &operand, &mut cycles)
        || illegal::handle(op, cpu, bus, &operand, &mut cycles);

    if !handled {
        unreachable!("opcode {:02X} ({}) has no handler", code, op.mnemonic);
    }
    cycles
}

#[inline]
pub(crate) fn add_page_cross_penalty(cycles: &mut u32, crossed: bool) {
    if crossed {
        *cycles += 1;
    }
}
