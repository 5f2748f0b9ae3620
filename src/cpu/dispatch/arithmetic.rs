/*!
arithmetic.rs - ADC / SBC opcode family handler.

Binary only: the DECIMAL flag is carried in P but never changes the result.
SBC is ADC of the one's complement. The undocumented $EB SBC shares this
path through its mnemonic.
*/

use crate::cpu::execute::{Operand, adc, read_operand, sbc};
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
    match op.mnemonic {
        Mnemonic::ADC => {
            let v = read_operand(cpu, bus, operand);
            adc(cpu, v);
        }
        Mnemonic::SBC => {
            let v = read_operand(cpu, bus, operand);
            sbc(cpu, v);
        }
        _ => return false,
    }
    true
}
