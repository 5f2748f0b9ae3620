/*!
rmw.rs - Read-Modify-Write opcode family handler (shifts, rotates, INC/DEC)

Overview
========
```text
    ASL LSR ROL ROR   accumulator or memory
    INC DEC           memory
```

The value is read once, transformed (carry and Z/N updated by the
transform), and written back once. Memory forms never pay a page-cross
penalty; their indexed timing is fixed in the opcode table.
*/

use crate::cpu::execute::{Operand, asl, dec, inc, lsr, modify, rol, ror};
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
    let transform: fn(&mut C, u8) -> u8 = match op.mnemonic {
        Mnemonic::ASL => asl,
        Mnemonic::LSR => lsr,
        Mnemonic::ROL => rol,
        Mnemonic::ROR => ror,
        Mnemonic::INC => inc,
        Mnemonic::DEC => dec,
        _ => return false,
    };
    modify(cpu, bus, operand, transform);
    true
}

#[cfg(test)]
mod tests {
    use crate::cpu::dispatch::step;
    use crate::cpu::regs::CpuRegs;
    use crate::cpu::state::StatusFlags;
    use crate::test_utils::flat_cpu;

    #[test]
    fn asl_accumulator() {
        let (mut cpu, mut bus) = flat_cpu(&[0x0A]);
        cpu.set_a(0x81);
        assert_eq!(step(&mut cpu, &mut bus), 2);
        assert_eq!(cpu.a(), 0x02);
        assert!(cpu.is_flag_set(StatusFlags::CARRY));
    }

    #[test]
    fn ror_memory_uses_carry_in() {
        let (mut cpu, mut bus) = flat_cpu(&[0x66, 0x10]);
        bus.poke(0x0010, 0x02);
        cpu.update_carry(true);
        assert_eq!(step(&mut cpu, &mut bus), 5);
        assert_eq!(bus.peek(0x0010), 0x81);
        assert!(!cpu.is_flag_set(StatusFlags::CARRY));
        assert!(cpu.is_flag_set(StatusFlags::NEGATIVE));
    }

    #[test]
    fn inc_dec_memory_wrap() {
        let (mut cpu, mut bus) = flat_cpu(&[0xEE, 0x00, 0x03, 0xCE, 0x00, 0x03, 0xDE, 0xFF, 0x02]);
        bus.poke(0x0300, 0xFF);
        assert_eq!(step(&mut cpu, &mut bus), 6);
        assert_eq!(bus.peek(0x0300), 0x00);
        assert!(cpu.is_flag_set(StatusFlags::ZERO));
        step(&mut cpu, &mut bus);
        assert_eq!(bus.peek(0x0300), 0xFF);
        assert!(cpu.is_flag_set(StatusFlags::NEGATIVE));
        cpu.set_x(0x01);
        assert_eq!(step(&mut cpu, &mut bus), 7);
        assert_eq!(bus.peek(0x0300), 0xFE);
    }
}
