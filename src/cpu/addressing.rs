/*!
addressing.rs - 6502 addressing modes and effective-address helpers.

Overview
========
`AddressingMode` names the 13 operand encodings. The `at_*` helpers are pure
effective-address computations: given the address of the first operand byte
(`pc`, i.e. the byte after the opcode), the index registers and a `CpuBus`,
they return the address the instruction operates on. They never move PC and
never write.

Wraparound rules
================
- Zero page indexed: `(zp + index) & 0xFF`.
- (zp,X): pointer index and both pointer bytes wrap inside zero page.
- (zp),Y: the pointer bytes wrap inside zero page; adding Y carries into the
  high byte (16-bit add).
- Absolute indexed: 16-bit add.
- (abs) for JMP: when the pointer's low byte is $FF the high byte is read
  from the start of the same page.

Page crossing
=============
`crosses_page_boundary_*` compare `base & 0xFF00` against
`effective & 0xFF00`; dispatch adds the +1 cycle where the opcode table says
the instruction pays it.
*/

use crate::cpu_bus::CpuBus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndexedIndirectX,
    IndirectIndexedY,
    Relative,
}

impl AddressingMode {
    /// Number of operand bytes following the opcode.
    pub const fn operand_len(self) -> u16 {
        match self {
            AddressingMode::Implied | AddressingMode::Accumulator => 0,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::IndexedIndirectX
            | AddressingMode::IndirectIndexedY
            | AddressingMode::Relative => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
        }
    }
}

// -------------------------
// Effective address helpers
// -------------------------

/// Immediate operands live at the operand address itself.
#[inline]
pub fn at_immediate(pc: u16) -> u16 {
    pc
}

#[inline]
pub fn at_zero_page<B: CpuBus + ?Sized>(bus: &mut B, pc: u16) -> u16 {
    bus.read(pc) as u16
}

#[inline]
pub fn at_zero_page_x<B: CpuBus + ?Sized>(bus: &mut B, pc: u16, x: u8) -> u16 {
    bus.read(pc).wrapping_add(x) as u16
}

#[inline]
pub fn at_zero_page_y<B: CpuBus + ?Sized>(bus: &mut B, pc: u16, y: u8) -> u16 {
    bus.read(pc).wrapping_add(y) as u16
}

/// Little-endian 16-bit operand at `pc`, `pc + 1`.
#[inline]
pub fn at_absolute<B: CpuBus + ?Sized>(bus: &mut B, pc: u16) -> u16 {
    let lo = bus.read(pc) as u16;
    let hi = bus.read(pc.wrapping_add(1)) as u16;
    (hi << 8) | lo
}

#[inline]
pub fn at_absolute_x<B: CpuBus + ?Sized>(bus: &mut B, pc: u16, x: u8) -> u16 {
    at_absolute(bus, pc).wrapping_add(x as u16)
}

#[inline]
pub fn at_absolute_y<B: CpuBus + ?Sized>(bus: &mut B, pc: u16, y: u8) -> u16 {
    at_absolute(bus, pc).wrapping_add(y as u16)
}

/// JMP ($hhll) with the page-wrap bug.
#[inline]
pub fn at_absolute_indirect<B: CpuBus + ?Sized>(bus: &mut B, pc: u16) -> u16 {
    let ptr = at_absolute(bus, pc);
    read_word_page_wrapped(bus, ptr)
}

/// ($zz,X)
#[inline]
pub fn at_indexed_indirect_x<B: CpuBus + ?Sized>(bus: &mut B, pc: u16, x: u8) -> u16 {
    let zp = bus.read(pc).wrapping_add(x);
    read_word_zero_page(bus, zp)
}

/// ($zz),Y
#[inline]
pub fn at_indirect_indexed_y<B: CpuBus + ?Sized>(bus: &mut B, pc: u16, y: u8) -> u16 {
    let zp = bus.read(pc);
    read_word_zero_page(bus, zp).wrapping_add(y as u16)
}

/// Branch target: signed displacement relative to the byte after the operand.
#[inline]
pub fn at_relative<B: CpuBus + ?Sized>(bus: &mut B, pc: u16) -> u16 {
    let displacement = bus.read(pc) as i8;
    pc.wrapping_add(1).wrapping_add(displacement as u16)
}

// ------------------------------------------------------
// Page-cross predicates (for cycle penalties)
// ------------------------------------------------------

#[inline]
pub fn crosses_page_boundary(base: u16, effective: u16) -> bool {
    (base & 0xFF00) != (effective & 0xFF00)
}

#[inline]
pub fn crosses_page_boundary_absolute_x<B: CpuBus + ?Sized>(bus: &mut B, pc: u16, x: u8) -> bool {
    let base = at_absolute(bus, pc);
    crosses_page_boundary(base, base.wrapping_add(x as u16))
}

#[inline]
pub fn crosses_page_boundary_absolute_y<B: CpuBus + ?Sized>(bus: &mut B, pc: u16, y: u8) -> bool {
    let base = at_absolute(bus, pc);
    crosses_page_boundary(base, base.wrapping_add(y as u16))
}

#[inline]
pub fn crosses_page_boundary_indirect_indexed_y<B: CpuBus + ?Sized>(
    bus: &mut B,
    pc: u16,
    y: u8,
) -> bool {
    let zp = bus.read(pc);
    let base = read_word_zero_page(bus, zp);
    crosses_page_boundary(base, base.wrapping_add(y as u16))
}

// -------------------------
// Low-level word helpers
// -------------------------

/// 16-bit pointer from zero page; the high byte wraps to $00 after $FF.
#[inline]
pub(crate) fn read_word_zero_page<B: CpuBus + ?Sized>(bus: &mut B, base: u8) -> u16 {
    let lo = bus.read(base as u16) as u16;
    let hi = bus.read(base.wrapping_add(1) as u16) as u16;
    (hi << 8) | lo
}

/// 16-bit pointer whose high byte never leaves the page of `addr`.
#[inline]
pub(crate) fn read_word_page_wrapped<B: CpuBus + ?Sized>(bus: &mut B, addr: u16) -> u16 {
    let lo = bus.read(addr) as u16;
    let hi_addr = (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF);
    let hi = bus.read(hi_addr) as u16;
    (hi << 8) | lo
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FlatMemory;

    #[test]
    fn immediate_is_passthrough() {
        assert_eq!(at_immediate(0xC123), 0xC123);
    }

    #[test]
    fn absolute_is_little_endian() {
        let mut m = FlatMemory::with_bytes(0x0400, &[0x34, 0x12]);
        assert_eq!(at_absolute(&mut m, 0x0400), 0x1234);
    }

    #[test]
    fn absolute_indirect_reproduces_page_wrap_bug() {
        // JMP ($30FF): low byte from $30FF, high byte from $3000 (not $3100).
        let mut m = FlatMemory::with_bytes(0x0400, &[0xFF, 0x30]);
        m.poke(0x30FF, 0x80);
        m.poke(0x3000, 0x50);
        m.poke(0x3100, 0x40);
        assert_eq!(at_absolute_indirect(&mut m, 0x0400), 0x5080);
    }

    #[test]
    fn absolute_indirect_without_wrap() {
        let mut m = FlatMemory::with_bytes(0x0400, &[0x20, 0x30]);
        m.poke(0x3020, 0xCD);
        m.poke(0x3021, 0xAB);
        assert_eq!(at_absolute_indirect(&mut m, 0x0400), 0xABCD);
    }

    #[test]
    fn zero_page_indexed_wraps_at_eight_bits() {
        let mut m = FlatMemory::with_bytes(0x0400, &[0xF0]);
        assert_eq!(at_zero_page_x(&mut m, 0x0400, 0x20), 0x0010);
        assert_eq!(at_zero_page_y(&mut m, 0x0400, 0x0F), 0x00FF);
        assert_eq!(at_zero_page(&mut m, 0x0400), 0x00F0);
    }

    #[test]
    fn absolute_indexed_does_not_wrap_to_page() {
        let mut m = FlatMemory::with_bytes(0x0400, &[0xF5, 0x80]);
        assert_eq!(at_absolute_x(&mut m, 0x0400, 0x10), 0x8105);
        assert_eq!(at_absolute_y(&mut m, 0x0400, 0x01), 0x80F6);
        assert!(crosses_page_boundary_absolute_x(&mut m, 0x0400, 0x10));
        assert!(!crosses_page_boundary_absolute_y(&mut m, 0x0400, 0x01));
    }

    #[test]
    fn indexed_indirect_x_wraps_pointer_in_zero_page() {
        // ($FE,X) with X=1: pointer at $FF, high byte from $00.
        let mut m = FlatMemory::with_bytes(0x0400, &[0xFE]);
        m.poke(0x00FF, 0x34);
        m.poke(0x0000, 0x12);
        m.poke(0x0100, 0x99);
        assert_eq!(at_indexed_indirect_x(&mut m, 0x0400, 0x01), 0x1234);

        // Index itself wraps: $80 + $90 = $10.
        let mut m = FlatMemory::with_bytes(0x0400, &[0x80]);
        m.poke(0x0010, 0x00);
        m.poke(0x0011, 0x02);
        assert_eq!(at_indexed_indirect_x(&mut m, 0x0400, 0x90), 0x0200);
    }

    #[test]
    fn indirect_indexed_y_carries_into_high_byte() {
        let mut m = FlatMemory::with_bytes(0x0400, &[0xFF]);
        m.poke(0x00FF, 0xF0);
        m.poke(0x0000, 0x12);
        m.poke(0x0100, 0x99);
        assert_eq!(at_indirect_indexed_y(&mut m, 0x0400, 0x20), 0x1310);
        assert!(crosses_page_boundary_indirect_indexed_y(&mut m, 0x0400, 0x20));
        assert!(!crosses_page_boundary_indirect_indexed_y(&mut m, 0x0400, 0x0F));
    }

    #[test]
    fn relative_targets_follow_operand() {
        let mut m = FlatMemory::with_bytes(0x20FF, &[0xF0]);
        // Operand at $20FF, next instruction at $2100, -16 -> $20F0.
        assert_eq!(at_relative(&mut m, 0x20FF), 0x20F0);
        let mut m = FlatMemory::with_bytes(0x0401, &[0x05]);
        assert_eq!(at_relative(&mut m, 0x0401), 0x0407);
    }

    #[test]
    fn operand_lengths() {
        assert_eq!(AddressingMode::Implied.operand_len(), 0);
        assert_eq!(AddressingMode::Relative.operand_len(), 1);
        assert_eq!(AddressingMode::Indirect.operand_len(), 2);
    }
}
