/*!
misc.rs - Transfers / Stack / Flag / Register increment opcode family handler

Overview
========
Transfers:
  TAX TAY TXA TYA TSX (Z/N) and TXS (no flags)

Stack:
  PHA, PLA (Z/N), PHP (pushes BREAK|UNUSED), PLP (drops BREAK, forces UNUSED)

Flag operations:
  CLC SEC CLI SEI CLD SED CLV

Register increment / decrement:
  INX INY DEX DEY

NOP, including the undocumented SKB / IGN forms. Those with a memory
operand still perform the read.
*/

use crate::cpu::execute::{
    Operand, Target, lda, ldx, ldy, pop, pull_status, push, push_status, read_operand,
};
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
        // Transfers
        Mnemonic::TAX => {
            let a = cpu.a();
            ldx(cpu, a);
        }
        Mnemonic::TAY => {
            let a = cpu.a();
            ldy(cpu, a);
        }
        Mnemonic::TXA => {
            let x = cpu.x();
            lda(cpu, x);
        }
        Mnemonic::TYA => {
            let y = cpu.y();
            lda(cpu, y);
        }
        Mnemonic::TSX => {
            let sp = cpu.sp();
            ldx(cpu, sp);
        }
        Mnemonic::TXS => {
            let x = cpu.x();
            cpu.set_sp(x);
        }

        // Stack
        Mnemonic::PHA => {
            let a = cpu.a();
            push(cpu, bus, a);
        }
        Mnemonic::PLA => {
            let v = pop(cpu, bus);
            lda(cpu, v);
        }
        Mnemonic::PHP => push_status(cpu, bus, true),
        Mnemonic::PLP => pull_status(cpu, bus),

        // Flags
        Mnemonic::CLC => cpu.assign_flag(StatusFlags::CARRY, false),
        Mnemonic::SEC => cpu.assign_flag(StatusFlags::CARRY, true),
        Mnemonic::CLI => cpu.assign_flag(StatusFlags::IRQ_DISABLE, false),
        Mnemonic::SEI => cpu.assign_flag(StatusFlags::IRQ_DISABLE, true),
        Mnemonic::CLD => cpu.assign_flag(StatusFlags::DECIMAL, false),
        Mnemonic::SED => cpu.assign_flag(StatusFlags::DECIMAL, true),
        Mnemonic::CLV => cpu.assign_flag(StatusFlags::OVERFLOW, false),

        // Register increment / decrement
        Mnemonic::INX => {
            let x = cpu.x().wrapping_add(1);
            ldx(cpu, x);
        }
        Mnemonic::INY => {
            let y = cpu.y().wrapping_add(1);
            ldy(cpu, y);
        }
        Mnemonic::DEX => {
            let x = cpu.x().wrapping_sub(1);
            ldx(cpu, x);
        }
        Mnemonic::DEY => {
            let y = cpu.y().wrapping_sub(1);
            ldy(cpu, y);
        }

        Mnemonic::NOP => {
            if let Target::Memory(_) = operand.target {
                let _ = read_operand(cpu, bus, operand);
            }
        }
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use crate::cpu::dispatch::step;
    use crate::cpu::regs::CpuRegs;
    use crate::cpu::state::StatusFlags;
    use crate::test_utils::{TEST_ORIGIN, flat_cpu};

    #[test]
    fn transfers_update_flags_except_txs() {
        let (mut cpu, mut bus) = flat_cpu(&[0xAA, 0x9A, 0xBA]);
        cpu.set_a(0x00);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.x(), 0x00);
        assert!(cpu.is_flag_set(StatusFlags::ZERO));
        cpu.set_x(0x80);
        cpu.update_zn(0x01);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.sp(), 0x80);
        assert!(!cpu.is_flag_set(StatusFlags::NEGATIVE));
        cpu.set_x(0x00);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.x(), 0x80);
        assert!(cpu.is_flag_set(StatusFlags::NEGATIVE));
    }

    #[test]
    fn php_plp_break_semantics() {
        let (mut cpu, mut bus) = flat_cpu(&[0x08, 0x28]);
        cpu.set_status(0x24);
        assert_eq!(step(&mut cpu, &mut bus), 3);
        assert_eq!(bus.peek(0x01FD), 0x34);
        assert_eq!(step(&mut cpu, &mut bus), 4);
        assert_eq!(cpu.status(), 0x24);
    }

    #[test]
    fn pha_pla() {
        let (mut cpu, mut bus) = flat_cpu(&[0x48, 0xA9, 0x01, 0x68]);
        cpu.set_a(0x80);
        step(&mut cpu, &mut bus);
        step(&mut cpu, &mut bus);
        assert_eq!(step(&mut cpu, &mut bus), 4);
        assert_eq!(cpu.a(), 0x80);
        assert!(cpu.is_flag_set(StatusFlags::NEGATIVE));
    }

    #[test]
    fn register_increments_wrap() {
        let (mut cpu, mut bus) = flat_cpu(&[0xE8, 0x88]);
        cpu.set_x(0xFF);
        cpu.set_y(0x00);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.x(), 0x00);
        assert!(cpu.is_flag_set(StatusFlags::ZERO));
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.y(), 0xFF);
        assert!(cpu.is_flag_set(StatusFlags::NEGATIVE));
    }

    #[test]
    fn flag_set_and_clear() {
        let (mut cpu, mut bus) = flat_cpu(&[0x38, 0xF8, 0x58, 0xB8]);
        cpu.assign_flag(StatusFlags::OVERFLOW, true);
        for _ in 0..4 {
            step(&mut cpu, &mut bus);
        }
        assert!(cpu.is_flag_set(StatusFlags::CARRY));
        assert!(cpu.is_flag_set(StatusFlags::DECIMAL));
        assert!(!cpu.is_flag_set(StatusFlags::IRQ_DISABLE));
        assert!(!cpu.is_flag_set(StatusFlags::OVERFLOW));
    }

    #[test]
    fn undocumented_nops_consume_operands() {
        // SKB #imm, IGN abs,X (crosses), IGN zp
        let (mut cpu, mut bus) = flat_cpu(&[0x80, 0x00, 0x1C, 0xFF, 0x02, 0x04, 0x10]);
        cpu.set_x(0x01);
        assert_eq!(step(&mut cpu, &mut bus), 2);
        assert_eq!(step(&mut cpu, &mut bus), 5);
        assert_eq!(step(&mut cpu, &mut bus), 3);
        assert_eq!(cpu.pc(), TEST_ORIGIN + 7);
    }
}
