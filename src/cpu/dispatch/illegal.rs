/*!
illegal.rs - Undocumented opcode family handler

Overview
========
Stable combinations (behave like a documented RMW followed by an ALU op):
    SLO = ASL + ORA     RLA = ROL + AND     SRE = LSR + EOR
    RRA = ROR + ADC     DCP = DEC + CMP     ISB = INC + SBC
    LAX = LDA + LDX     SAX stores A & X

Immediate-only combinations:
    ANC  A &= imm, C = N
    ALR  A &= imm, then LSR A
    ARR  A &= imm, then ROR A; C = bit 6, V = bit 6 ^ bit 5
    AXS  X = (A & X) - imm, C as CMP, no borrow in

Unstable opcodes use the common approximations:
    XAA  A = (A | XAA_MAGIC) & X & imm
    LAS  A = X = SP = M & SP
    AHX  M = A & X & (H + 1)
    SHX  M = X & (H + 1)
    SHY  M = Y & (H + 1)
    TAS  SP = A & X, M = SP & (H + 1)
where H is the high byte of the unindexed base address. When indexing
crosses a page the stored value also replaces the target's high byte.

KIL jams the CPU: PC is left on the opcode and `halted` is set. Only a reset
clears it.
*/

use crate::cpu::execute::{
    Operand, Target, adc, and, asl, compare, dec, eor, inc, lda, ldx, lsr, modify, ora,
    read_operand, rol, ror, sbc, write_back,
};
use crate::cpu::opcodes::{Mnemonic, Opcode};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::StatusFlags;
use crate::cpu_bus::CpuBus;

/// Chip-dependent constant mixed into XAA; 0xFF reduces it to `X & imm`.
const XAA_MAGIC: u8 = 0xFF;

pub(super) fn handle<C: CpuRegs, B: CpuBus + ?Sized>(
    op: &Opcode,
    cpu: &mut C,
    bus: &mut B,
    operand: &Operand,
    _cycles: &mut u32,
) -> bool {
    match op.mnemonic {
        Mnemonic::SLO => {
            let r = modify(cpu, bus, operand, asl);
            ora(cpu, r);
        }
        Mnemonic::RLA => {
            let r = modify(cpu, bus, operand, rol);
            and(cpu, r);
        }
        Mnemonic::SRE => {
            let r = modify(cpu, bus, operand, lsr);
            eor(cpu, r);
        }
        Mnemonic::RRA => {
            let r = modify(cpu, bus, operand, ror);
            adc(cpu, r);
        }
        Mnemonic::DCP => {
            let r = modify(cpu, bus, operand, dec);
            let a = cpu.a();
            compare(cpu, a, r);
        }
        Mnemonic::ISB => {
            let r = modify(cpu, bus, operand, inc);
            sbc(cpu, r);
        }
        Mnemonic::LAX => {
            let v = read_operand(cpu, bus, operand);
            lda(cpu, v);
            ldx(cpu, v);
        }
        Mnemonic::SAX => {
            let v = cpu.a() & cpu.x();
            write_back(cpu, bus, operand, v);
        }
        Mnemonic::ANC => {
            let v = read_operand(cpu, bus, operand);
            and(cpu, v);
            let n = cpu.is_flag_set(StatusFlags::NEGATIVE);
            cpu.update_carry(n);
        }
        Mnemonic::ALR => {
            let v = read_operand(cpu, bus, operand);
            let masked = cpu.a() & v;
            let r = lsr(cpu, masked);
            cpu.set_a(r);
        }
        Mnemonic::ARR => {
            let v = read_operand(cpu, bus, operand);
            let carry_in = if cpu.is_flag_set(StatusFlags::CARRY) { 0x80 } else { 0 };
            let r = ((cpu.a() & v) >> 1) | carry_in;
            lda(cpu, r);
            let bit6 = r & 0x40 != 0;
            let bit5 = r & 0x20 != 0;
            cpu.update_carry(bit6);
            cpu.update_overflow(bit6 ^ bit5);
        }
        Mnemonic::AXS => {
            let v = read_operand(cpu, bus, operand);
            let masked = cpu.a() & cpu.x();
            compare(cpu, masked, v);
            cpu.set_x(masked.wrapping_sub(v));
        }
        Mnemonic::XAA => {
            let v = read_operand(cpu, bus, operand);
            let r = (cpu.a() | XAA_MAGIC) & cpu.x() & v;
            lda(cpu, r);
        }
        Mnemonic::LAS => {
            let v = read_operand(cpu, bus, operand) & cpu.sp();
            cpu.set_sp(v);
            lda(cpu, v);
            ldx(cpu, v);
        }
        Mnemonic::AHX => {
            let v = cpu.a() & cpu.x();
            let index = cpu.y();
            store_high_masked(bus, operand, v, index);
        }
        Mnemonic::SHX => {
            let v = cpu.x();
            let index = cpu.y();
            store_high_masked(bus, operand, v, index);
        }
        Mnemonic::SHY => {
            let v = cpu.y();
            let index = cpu.x();
            store_high_masked(bus, operand, v, index);
        }
        Mnemonic::TAS => {
            let sp = cpu.a() & cpu.x();
            cpu.set_sp(sp);
            let index = cpu.y();
            store_high_masked(bus, operand, sp, index);
        }
        Mnemonic::KIL => {
            cpu.advance_pc(-1);
            cpu.set_halted(true);
            log::warn!("CPU jammed by KIL ${:02X} at ${:04X}", op.code, cpu.pc());
        }
        _ => return false,
    }
    true
}

/// Store `value & (H + 1)` for the SH* family.
fn store_high_masked<B: CpuBus + ?Sized>(bus: &mut B, operand: &Operand, value: u8, index: u8) {
    let Target::Memory(addr) = operand.target else {
        return;
    };
    let base = addr.wrapping_sub(index as u16);
    let high = ((base >> 8) as u8).wrapping_add(1);
    let result = value & high;
    let target = if operand.page_crossed {
        ((result as u16) << 8) | (addr & 0x00FF)
    } else {
        addr
    };
    bus.write(target, result);
}

#[cfg(test)]
mod tests {
    use crate::cpu::dispatch::step;
    use crate::cpu::regs::CpuRegs;
    use crate::cpu::state::StatusFlags;
    use crate::test_utils::{TEST_ORIGIN, flat_cpu};

    #[test]
    fn lax_loads_a_and_x() {
        let (mut cpu, mut bus) = flat_cpu(&[0xA7, 0x10, 0xAB, 0x00]);
        bus.poke(0x0010, 0x8F);
        assert_eq!(step(&mut cpu, &mut bus), 3);
        assert_eq!((cpu.a(), cpu.x()), (0x8F, 0x8F));
        assert!(cpu.is_flag_set(StatusFlags::NEGATIVE));
        assert_eq!(step(&mut cpu, &mut bus), 2);
        assert_eq!((cpu.a(), cpu.x()), (0x00, 0x00));
        assert!(cpu.is_flag_set(StatusFlags::ZERO));
    }

    #[test]
    fn sax_stores_a_and_x_without_flags() {
        let (mut cpu, mut bus) = flat_cpu(&[0x87, 0x10]);
        cpu.set_a(0xF0);
        cpu.set_x(0x3C);
        let p = cpu.status();
        step(&mut cpu, &mut bus);
        assert_eq!(bus.peek(0x0010), 0x30);
        assert_eq!(cpu.status(), p);
    }

    #[test]
    fn dcp_decrements_then_compares() {
        let (mut cpu, mut bus) = flat_cpu(&[0xC7, 0x10]);
        bus.poke(0x0010, 0x41);
        cpu.set_a(0x40);
        assert_eq!(step(&mut cpu, &mut bus), 5);
        assert_eq!(bus.peek(0x0010), 0x40);
        assert!(cpu.is_flag_set(StatusFlags::ZERO));
        assert!(cpu.is_flag_set(StatusFlags::CARRY));
    }

    #[test]
    fn isb_increments_then_subtracts() {
        let (mut cpu, mut bus) = flat_cpu(&[0xE7, 0x10]);
        bus.poke(0x0010, 0x0F);
        cpu.set_a(0x20);
        cpu.update_carry(true);
        step(&mut cpu, &mut bus);
        assert_eq!(bus.peek(0x0010), 0x10);
        assert_eq!(cpu.a(), 0x10);
        assert!(cpu.is_flag_set(StatusFlags::CARRY));
    }

    #[test]
    fn slo_rla_sre_rra() {
        let (mut cpu, mut bus) = flat_cpu(&[0x07, 0x10, 0x27, 0x11, 0x47, 0x12, 0x67, 0x13]);
        bus.poke(0x0010, 0x81);
        bus.poke(0x0011, 0x01);
        bus.poke(0x0012, 0x03);
        bus.poke(0x0013, 0x02);
        cpu.set_a(0x10);

        step(&mut cpu, &mut bus); // SLO: M=02, C=1, A=12
        assert_eq!(bus.peek(0x0010), 0x02);
        assert_eq!(cpu.a(), 0x12);

        step(&mut cpu, &mut bus); // RLA: M=03 (carry in), A=02
        assert_eq!(bus.peek(0x0011), 0x03);
        assert_eq!(cpu.a(), 0x02);

        step(&mut cpu, &mut bus); // SRE: M=01, C=1, A=03
        assert_eq!(bus.peek(0x0012), 0x01);
        assert_eq!(cpu.a(), 0x03);

        step(&mut cpu, &mut bus); // RRA: M=81, C=0, A=03+81=84
        assert_eq!(bus.peek(0x0013), 0x81);
        assert_eq!(cpu.a(), 0x84);
    }

    #[test]
    fn immediate_combinations() {
        let (mut cpu, mut bus) = flat_cpu(&[0x0B, 0xFF, 0x4B, 0x03, 0xCB, 0x02]);
        cpu.set_a(0x80);
        step(&mut cpu, &mut bus); // ANC
        assert!(cpu.is_flag_set(StatusFlags::CARRY));

        cpu.set_a(0x07);
        step(&mut cpu, &mut bus); // ALR: (07 & 03) >> 1 = 01, C = 1
        assert_eq!(cpu.a(), 0x01);
        assert!(cpu.is_flag_set(StatusFlags::CARRY));

        cpu.set_a(0x0F);
        cpu.set_x(0x05);
        step(&mut cpu, &mut bus); // AXS: (0F & 05) - 02 = 03
        assert_eq!(cpu.x(), 0x03);
        assert!(cpu.is_flag_set(StatusFlags::CARRY));
    }

    #[test]
    fn arr_sets_carry_and_overflow_from_result() {
        let (mut cpu, mut bus) = flat_cpu(&[0x6B, 0xFF]);
        cpu.set_a(0xC0);
        cpu.update_carry(false);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a(), 0x60);
        assert!(cpu.is_flag_set(StatusFlags::CARRY));
        assert!(!cpu.is_flag_set(StatusFlags::OVERFLOW));
    }

    #[test]
    fn shx_masks_with_high_byte_plus_one() {
        // SHX $0210,Y with Y=1: H+1 = 3, X=0xFF -> stores 03 at $0211.
        let (mut cpu, mut bus) = flat_cpu(&[0x9E, 0x10, 0x02]);
        cpu.set_x(0xFF);
        cpu.set_y(0x01);
        assert_eq!(step(&mut cpu, &mut bus), 5);
        assert_eq!(bus.peek(0x0211), 0x03);
    }

    #[test]
    fn kil_halts_in_place() {
        let (mut cpu, mut bus) = flat_cpu(&[0x02]);
        step(&mut cpu, &mut bus);
        assert!(cpu.halted());
        assert_eq!(cpu.pc(), TEST_ORIGIN);
    }
}
