/*!
execute.rs - 6502 instruction semantic helpers (operands, ALU, flags, stack)

Purpose
=======
Centralize side-effect logic for instructions so every dispatch family
shares a single implementation. Helpers are generic over `CpuRegs` (register
file) and `CpuBus` (address space).

Scope (crate-visible)
---------------------
Operand resolution:
    resolve_operand, read_operand, write_back, modify

Stack helpers:
    push, pop, push_word, pop_word, push_status

Core ALU / register transfer:
    lda/ldx/ldy, transfers, and/ora/eor/bit, adc/sbc, compare
    asl/lsr/rol/ror/inc/dec as value transforms (carry + Z/N side effects)

Branch:
    branch

Design Notes
============
- `resolve_operand` is the only place PC moves past operand bytes. On entry
  PC points at the first operand byte (the opcode is already consumed).
- No dummy reads or writes are issued; a store never reads its target and a
  read-modify-write writes its target once.
- Decimal mode is stored in P but ADC/SBC are always binary.
*/

use crate::cpu::addressing::{
    AddressingMode, at_absolute, at_absolute_indirect, at_absolute_x, at_absolute_y,
    at_immediate, at_indexed_indirect_x, at_indirect_indexed_y, at_relative, at_zero_page,
    at_zero_page_x, at_zero_page_y, crosses_page_boundary, read_word_zero_page,
};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{STACK_PAGE, StatusFlags};
use crate::cpu_bus::CpuBus;

// ---------------------------------------------------------------------------
// Operands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Implied,
    Accumulator,
    /// Effective address. For Immediate this is the operand byte itself; for
    /// Relative and Indirect it is the jump target.
    Memory(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Operand {
    pub target: Target,
    /// Indexed modes: the index carried into the high byte.
    /// Relative: the branch target lies on a different page than the next
    /// instruction.
    pub page_crossed: bool,
}

impl Operand {
    /// Effective address; zero for non-memory operands.
    #[inline]
    pub fn address(&self) -> u16 {
        match self.target {
            Target::Memory(addr) => addr,
            Target::Implied | Target::Accumulator => 0,
        }
    }
}

/// Compute the effective operand for `mode` and advance PC past its bytes.
pub(crate) fn resolve_operand<C: CpuRegs, B: CpuBus + ?Sized>(
    cpu: &mut C,
    bus: &mut B,
    mode: AddressingMode,
) -> Operand {
    let pc = cpu.pc();
    let (target, page_crossed) = match mode {
        AddressingMode::Implied => (Target::Implied, false),
        AddressingMode::Accumulator => (Target::Accumulator, false),
        AddressingMode::Immediate => (Target::Memory(at_immediate(pc)), false),
        AddressingMode::ZeroPage => (Target::Memory(at_zero_page(bus, pc)), false),
        AddressingMode::ZeroPageX => (Target::Memory(at_zero_page_x(bus, pc, cpu.x())), false),
        AddressingMode::ZeroPageY => (Target::Memory(at_zero_page_y(bus, pc, cpu.y())), false),
        AddressingMode::Absolute => (Target::Memory(at_absolute(bus, pc)), false),
        AddressingMode::AbsoluteX => {
            let base = at_absolute(bus, pc);
            let addr = at_absolute_x(bus, pc, cpu.x());
            (Target::Memory(addr), crosses_page_boundary(base, addr))
        }
        AddressingMode::AbsoluteY => {
            let base = at_absolute(bus, pc);
            let addr = at_absolute_y(bus, pc, cpu.y());
            (Target::Memory(addr), crosses_page_boundary(base, addr))
        }
        AddressingMode::Indirect => (Target::Memory(at_absolute_indirect(bus, pc)), false),
        AddressingMode::IndexedIndirectX => {
            (Target::Memory(at_indexed_indirect_x(bus, pc, cpu.x())), false)
        }
        AddressingMode::IndirectIndexedY => {
            let zp = bus.read(pc);
            let base = read_word_zero_page(bus, zp);
            let addr = at_indirect_indexed_y(bus, pc, cpu.y());
            (Target::Memory(addr), crosses_page_boundary(base, addr))
        }
        AddressingMode::Relative => {
            let next = pc.wrapping_add(1);
            let addr = at_relative(bus, pc);
            (Target::Memory(addr), crosses_page_boundary(next, addr))
        }
    };
    cpu.advance_pc(mode.operand_len() as i32);
    Operand {
        target,
        page_crossed,
    }
}

/// Value the instruction consumes: A for accumulator mode, memory otherwise.
#[inline]
pub(crate) fn read_operand<C: CpuRegs, B: CpuBus + ?Sized>(
    cpu: &C,
    bus: &mut B,
    operand: &Operand,
) -> u8 {
    match operand.target {
        Target::Accumulator => cpu.a(),
        Target::Memory(addr) => bus.read(addr),
        Target::Implied => 0,
    }
}

#[inline]
pub(crate) fn write_back<C: CpuRegs, B: CpuBus + ?Sized>(
    cpu: &mut C,
    bus: &mut B,
    operand: &Operand,
    value: u8,
) {
    match operand.target {
        Target::Accumulator => cpu.set_a(value),
        Target::Memory(addr) => bus.write(addr, value),
        Target::Implied => {}
    }
}

/// Read-modify-write: read the operand, transform it, write the result back
/// and return it.
pub(crate) fn modify<C: CpuRegs, B: CpuBus + ?Sized, F>(
    cpu: &mut C,
    bus: &mut B,
    operand: &Operand,
    transform: F,
) -> u8
where
    F: FnOnce(&mut C, u8) -> u8,
{
    let old = read_operand(cpu, bus, operand);
    let new = transform(cpu, old);
    write_back(cpu, bus, operand, new);
    new
}

// ---------------------------------------------------------------------------
// Stack helpers
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn push<C: CpuRegs, B: CpuBus + ?Sized>(cpu: &mut C, bus: &mut B, v: u8) {
    let sp = cpu.sp();
    bus.write(STACK_PAGE | sp as u16, v);
    cpu.set_sp(sp.wrapping_sub(1));
}

#[inline]
pub(crate) fn pop<C: CpuRegs, B: CpuBus + ?Sized>(cpu: &mut C, bus: &mut B) -> u8 {
    let sp = cpu.sp().wrapping_add(1);
    cpu.set_sp(sp);
    bus.read(STACK_PAGE | sp as u16)
}

/// High byte first, so the low byte ends up at the lower stack address.
#[inline]
pub(crate) fn push_word<C: CpuRegs, B: CpuBus + ?Sized>(cpu: &mut C, bus: &mut B, v: u16) {
    push(cpu, bus, (v >> 8) as u8);
    push(cpu, bus, (v & 0xFF) as u8);
}

#[inline]
pub(crate) fn pop_word<C: CpuRegs, B: CpuBus + ?Sized>(cpu: &mut C, bus: &mut B) -> u16 {
    let lo = pop(cpu, bus) as u16;
    let hi = pop(cpu, bus) as u16;
    (hi << 8) | lo
}

/// Push P with UNUSED set; BREAK only for BRK/PHP.
#[inline]
pub(crate) fn push_status<C: CpuRegs, B: CpuBus + ?Sized>(
    cpu: &mut C,
    bus: &mut B,
    set_break: bool,
) {
    let v = cpu.compose_status_for_push(set_break);
    push(cpu, bus, v);
}

/// Restore P from the stack (PLP / RTI): BREAK dropped, UNUSED forced.
#[inline]
pub(crate) fn pull_status<C: CpuRegs, B: CpuBus + ?Sized>(cpu: &mut C, bus: &mut B) {
    let v = pop(cpu, bus);
    let flags = (StatusFlags::from_bits_retain(v) | StatusFlags::UNUSED) - StatusFlags::BREAK;
    cpu.set_status(flags.bits());
}

// ---------------------------------------------------------------------------
// Loads / Transfers
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn lda<C: CpuRegs>(cpu: &mut C, v: u8) {
    cpu.set_a(v);
    cpu.update_zn(v);
}

#[inline]
pub(crate) fn ldx<C: CpuRegs>(cpu: &mut C, v: u8) {
    cpu.set_x(v);
    cpu.update_zn(v);
}

#[inline]
pub(crate) fn ldy<C: CpuRegs>(cpu: &mut C, v: u8) {
    cpu.set_y(v);
    cpu.update_zn(v);
}

// ---------------------------------------------------------------------------
// Logical / Bit
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn and<C: CpuRegs>(cpu: &mut C, v: u8) {
    let r = cpu.a() & v;
    lda(cpu, r);
}

#[inline]
pub(crate) fn ora<C: CpuRegs>(cpu: &mut C, v: u8) {
    let r = cpu.a() | v;
    lda(cpu, r);
}

#[inline]
pub(crate) fn eor<C: CpuRegs>(cpu: &mut C, v: u8) {
    let r = cpu.a() ^ v;
    lda(cpu, r);
}

#[inline]
pub(crate) fn bit<C: CpuRegs>(cpu: &mut C, v: u8) {
    let a = cpu.a();
    cpu.assign_flag(StatusFlags::ZERO, (a & v) == 0);
    cpu.assign_flag(StatusFlags::NEGATIVE, (v & 0x80) != 0);
    cpu.assign_flag(StatusFlags::OVERFLOW, (v & 0x40) != 0);
}

// ---------------------------------------------------------------------------
// ADC / SBC / Compare
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn adc<C: CpuRegs>(cpu: &mut C, v: u8) {
    let a = cpu.a();
    let carry_in = cpu.is_flag_set(StatusFlags::CARRY) as u16;
    let sum16 = a as u16 + v as u16 + carry_in;
    let result = sum16 as u8;

    cpu.update_carry(sum16 > 0xFF);
    cpu.update_overflow(((!(a ^ v)) & (a ^ result) & 0x80) != 0);
    lda(cpu, result);
}

#[inline]
pub(crate) fn sbc<C: CpuRegs>(cpu: &mut C, v: u8) {
    adc(cpu, v ^ 0xFF);
}

#[inline]
pub(crate) fn compare<C: CpuRegs>(cpu: &mut C, reg: u8, v: u8) {
    cpu.update_carry(reg >= v);
    cpu.update_zn(reg.wrapping_sub(v));
}

// ---------------------------------------------------------------------------
// Shifts / Rotates / INC / DEC as value transforms
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn asl<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    cpu.update_carry((v & 0x80) != 0);
    let r = v << 1;
    cpu.update_zn(r);
    r
}

#[inline]
pub(crate) fn lsr<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    cpu.update_carry((v & 0x01) != 0);
    let r = v >> 1;
    cpu.update_zn(r);
    r
}

#[inline]
pub(crate) fn rol<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let carry_in = cpu.is_flag_set(StatusFlags::CARRY) as u8;
    cpu.update_carry((v & 0x80) != 0);
    let r = (v << 1) | carry_in;
    cpu.update_zn(r);
    r
}

#[inline]
pub(crate) fn ror<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let carry_in = if cpu.is_flag_set(StatusFlags::CARRY) { 0x80 } else { 0 };
    cpu.update_carry((v & 0x01) != 0);
    let r = (v >> 1) | carry_in;
    cpu.update_zn(r);
    r
}

#[inline]
pub(crate) fn inc<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let r = v.wrapping_add(1);
    cpu.update_zn(r);
    r
}

#[inline]
pub(crate) fn dec<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let r = v.wrapping_sub(1);
    cpu.update_zn(r);
    r
}

// ---------------------------------------------------------------------------
// Branch
// ---------------------------------------------------------------------------

/// Apply a resolved relative branch. Returns the extra cycles: 0 when not
/// taken, 1 when taken, 2 when taken onto another page.
pub(crate) fn branch<C: CpuRegs>(cpu: &mut C, operand: &Operand, take: bool) -> u32 {
    if !take {
        return 0;
    }
    cpu.set_pc(operand.address());
    1 + operand.page_crossed as u32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
