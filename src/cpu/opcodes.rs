/*!
opcodes.rs - Static 256-entry opcode metadata table.

Purpose
=======
Every byte value decodes to an `Opcode`: mnemonic, addressing mode, base
cycle count, whether an indexed read pays +1 on a page cross, and whether
the opcode is undocumented. Dispatch, the cycle accounting and the trace
disassembler all read the same row, so there is a single source of truth
for timing.

Design
------
- Rows are written in opcode order; a compile-time check walks the table
  and fails the build if any row's `code` does not match its index.
- Branch penalties (+1 taken, +1 page change) are dynamic and applied by
  the branch handler, not encoded here.
- Undocumented opcodes are flagged `illegal` so the trace prints `*MNEMONIC`.
*/

use std::fmt;

use crate::cpu::addressing::AddressingMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    ADC, AND, ASL, BCC, BCS, BEQ, BIT, BMI, BNE, BPL, BRK, BVC, BVS, CLC,
    CLD, CLI, CLV, CMP, CPX, CPY, DEC, DEX, DEY, EOR, INC, INX, INY, JMP,
    JSR, LDA, LDX, LDY, LSR, NOP, ORA, PHA, PHP, PLA, PLP, ROL, ROR, RTI,
    RTS, SBC, SEC, SED, SEI, STA, STX, STY, TAX, TAY, TSX, TXA, TXS, TYA,
    // Undocumented
    AHX, ALR, ANC, ARR, AXS, DCP, ISB, KIL, LAS, LAX, RLA, RRA, SAX, SHX,
    SHY, SLO, SRE, TAS, XAA,
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Variant names are the assembler mnemonics.
        f.pad(&format!("{self:?}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub code: u8,
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    pub cycles: u32,
    pub page_penalty: bool,
    pub illegal: bool,
}

impl Opcode {
    const fn page_penalty(mut self) -> Self {
        self.page_penalty = true;
        self
    }

    const fn illegal(mut self) -> Self {
        self.illegal = true;
        self
    }

    /// Opcode byte plus operand bytes.
    #[inline]
    pub const fn len(&self) -> u16 {
        1 + self.mode.operand_len()
    }

    #[inline]
    pub fn lookup(code: u8) -> &'static Opcode {
        &OPCODES[code as usize]
    }
}

const fn op(code: u8, mnemonic: Mnemonic, mode: AddressingMode, cycles: u32) -> Opcode {
    Opcode {
        code,
        mnemonic,
        mode,
        cycles,
        page_penalty: false,
        illegal: false,
    }
}

use AddressingMode::*;
use Mnemonic::*;

#[rustfmt::skip]
const TABLE: [Opcode; 256] = [
    op(0x00, BRK, Implied, 7),
    op(0x01, ORA, IndexedIndirectX, 6),
    op(0x02, KIL, Implied, 2).illegal(),
    op(0x03, SLO, IndexedIndirectX, 8).illegal(),
    op(0x04, NOP, ZeroPage, 3).illegal(),
    op(0x05, ORA, ZeroPage, 3),
    op(0x06, ASL, ZeroPage, 5),
    op(0x07, SLO, ZeroPage, 5).illegal(),
    op(0x08, PHP, Implied, 3),
    op(0x09, ORA, Immediate, 2),
    op(0x0A, ASL, Accumulator, 2),
    op(0x0B, ANC, Immediate, 2).illegal(),
    op(0x0C, NOP, Absolute, 4).illegal(),
    op(0x0D, ORA, Absolute, 4),
    op(0x0E, ASL, Absolute, 6),
    op(0x0F, SLO, Absolute, 6).illegal(),
    op(0x10, BPL, Relative, 2),
    op(0x11, ORA, IndirectIndexedY, 5).page_penalty(),
    op(0x12, KIL, Implied, 2).illegal(),
    op(0x13, SLO, IndirectIndexedY, 8).illegal(),
    op(0x14, NOP, ZeroPageX, 4).illegal(),
    op(0x15, ORA, ZeroPageX, 4),
    op(0x16, ASL, ZeroPageX, 6),
    op(0x17, SLO, ZeroPageX, 6).illegal(),
    op(0x18, CLC, Implied, 2),
    op(0x19, ORA, AbsoluteY, 4).page_penalty(),
    op(0x1A, NOP, Implied, 2).illegal(),
    op(0x1B, SLO, AbsoluteY, 7).illegal(),
    op(0x1C, NOP, AbsoluteX, 4).page_penalty().illegal(),
    op(0x1D, ORA, AbsoluteX, 4).page_penalty(),
    op(0x1E, ASL, AbsoluteX, 7),
    op(0x1F, SLO, AbsoluteX, 7).illegal(),
    op(0x20, JSR, Absolute, 6),
    op(0x21, AND, IndexedIndirectX, 6),
    op(0x22, KIL, Implied, 2).illegal(),
    op(0x23, RLA, IndexedIndirectX, 8).illegal(),
    op(0x24, BIT, ZeroPage, 3),
    op(0x25, AND, ZeroPage, 3),
    op(0x26, ROL, ZeroPage, 5),
    op(0x27, RLA, ZeroPage, 5).illegal(),
    op(0x28, PLP, Implied, 4),
    op(0x29, AND, Immediate, 2),
    op(0x2A, ROL, Accumulator, 2),
    op(0x2B, ANC, Immediate, 2).illegal(),
    op(0x2C, BIT, Absolute, 4),
    op(0x2D, AND, Absolute, 4),
    op(0x2E, ROL, Absolute, 6),
    op(0x2F, RLA, Absolute, 6).illegal(),
    op(0x30, BMI, Relative, 2),
    op(0x31, AND, IndirectIndexedY, 5).page_penalty(),
    op(0x32, KIL, Implied, 2).illegal(),
    op(0x33, RLA, IndirectIndexedY, 8).illegal(),
    op(0x34, NOP, ZeroPageX, 4).illegal(),
    op(0x35, AND, ZeroPageX, 4),
    op(0x36, ROL, ZeroPageX, 6),
    op(0x37, RLA, ZeroPageX, 6).illegal(),
    op(0x38, SEC, Implied, 2),
    op(0x39, AND, AbsoluteY, 4).page_penalty(),
    op(0x3A, NOP, Implied, 2).illegal(),
    op(0x3B, RLA, AbsoluteY, 7).illegal(),
    op(0x3C, NOP, AbsoluteX, 4).page_penalty().illegal(),
    op(0x3D, AND, AbsoluteX, 4).page_penalty(),
    op(0x3E, ROL, AbsoluteX, 7),
    op(0x3F, RLA, AbsoluteX, 7).illegal(),
    op(0x40, RTI, Implied, 6),
    op(0x41, EOR, IndexedIndirectX, 6),
    op(0x42, KIL, Implied, 2).illegal(),
    op(0x43, SRE, IndexedIndirectX, 8).illegal(),
    op(0x44, NOP, ZeroPage, 3).illegal(),
    op(0x45, EOR, ZeroPage, 3),
    op(0x46, LSR, ZeroPage, 5),
    op(0x47, SRE, ZeroPage, 5).illegal(),
    op(0x48, PHA, Implied, 3),
    op(0x49, EOR, Immediate, 2),
    op(0x4A, LSR, Accumulator, 2),
    op(0x4B, ALR, Immediate, 2).illegal(),
    op(0x4C, JMP, Absolute, 3),
    op(0x4D, EOR, Absolute, 4),
    op(0x4E, LSR, Absolute, 6),
    op(0x4F, SRE, Absolute, 6).illegal(),
    op(0x50, BVC, Relative, 2),
    op(0x51, EOR, IndirectIndexedY, 5).page_penalty(),
    op(0x52, KIL, Implied, 2).illegal(),
    op(0x53, SRE, IndirectIndexedY, 8).illegal(),
    op(0x54, NOP, ZeroPageX, 4).illegal(),
    op(0x55, EOR, ZeroPageX, 4),
    op(0x56, LSR, ZeroPageX, 6),
    op(0x57, SRE, ZeroPageX, 6).illegal(),
    op(0x58, CLI, Implied, 2),
    op(0x59, EOR, AbsoluteY, 4).page_penalty(),
    op(0x5A, NOP, Implied, 2).illegal(),
    op(0x5B, SRE, AbsoluteY, 7).illegal(),
    op(0x5C, NOP, AbsoluteX, 4).page_penalty().illegal(),
    op(0x5D, EOR, AbsoluteX, 4).page_penalty(),
    op(0x5E, LSR, AbsoluteX, 7),
    op(0x5F, SRE, AbsoluteX, 7).illegal(),
    op(0x60, RTS, Implied, 6),
    op(0x61, ADC, IndexedIndirectX, 6),
    op(0x62, KIL, Implied, 2).illegal(),
    op(0x63, RRA, IndexedIndirectX, 8).illegal(),
    op(0x64, NOP, ZeroPage, 3).illegal(),
    op(0x65, ADC, ZeroPage, 3),
    op(0x66, ROR, ZeroPage, 5),
    op(0x67, RRA, ZeroPage, 5).illegal(),
    op(0x68, PLA, Implied, 4),
    op(0x69, ADC, Immediate, 2),
    op(0x6A, ROR, Accumulator, 2),
    op(0x6B, ARR, Immediate, 2).illegal(),
    op(0x6C, JMP, Indirect, 5),
    op(0x6D, ADC, Absolute, 4),
    op(0x6E, ROR, Absolute, 6),
    op(0x6F, RRA, Absolute, 6).illegal(),
    op(0x70, BVS, Relative, 2),
    op(0x71, ADC, IndirectIndexedY, 5).page_penalty(),
    op(0x72, KIL, Implied, 2).illegal(),
    op(0x73, RRA, IndirectIndexedY, 8).illegal(),
    op(0x74, NOP, ZeroPageX, 4).illegal(),
    op(0x75, ADC, ZeroPageX, 4),
    op(0x76, ROR, ZeroPageX, 6),
    op(0x77, RRA, ZeroPageX, 6).illegal(),
    op(0x78, SEI, Implied, 2),
    op(0x79, ADC, AbsoluteY, 4).page_penalty(),
    op(0x7A, NOP, Implied, 2).illegal(),
    op(0x7B, RRA, AbsoluteY, 7).illegal(),
    op(0x7C, NOP, AbsoluteX, 4).page_penalty().illegal(),
    op(0x7D, ADC, AbsoluteX, 4).page_penalty(),
    op(0x7E, ROR, AbsoluteX, 7),
    op(0x7F, RRA, AbsoluteX, 7).illegal(),
    op(0x80, NOP, Immediate, 2).illegal(),
    op(0x81, STA, IndexedIndirectX, 6),
    op(0x82, NOP, Immediate, 2).illegal(),
    op(0x83, SAX, IndexedIndirectX, 6).illegal(),
    op(0x84, STY, ZeroPage, 3),
    op(0x85, STA, ZeroPage, 3),
    op(0x86, STX, ZeroPage, 3),
    op(0x87, SAX, ZeroPage, 3).illegal(),
    op(0x88, DEY, Implied, 2),
    op(0x89, NOP, Immediate, 2).illegal(),
    op(0x8A, TXA, Implied, 2),
    op(0x8B, XAA, Immediate, 2).illegal(),
    op(0x8C, STY, Absolute, 4),
    op(0x8D, STA, Absolute, 4),
    op(0x8E, STX, Absolute, 4),
    op(0x8F, SAX, Absolute, 4).illegal(),
    op(0x90, BCC, Relative, 2),
    op(0x91, STA, IndirectIndexedY, 6),
    op(0x92, KIL, Implied, 2).illegal(),
    op(0x93, AHX, IndirectIndexedY, 6).illegal(),
    op(0x94, STY, ZeroPageX, 4),
    op(0x95, STA, ZeroPageX, 4),
    op(0x96, STX, ZeroPageY, 4),
    op(0x97, SAX, ZeroPageY, 4).illegal(),
    op(0x98, TYA, Implied, 2),
    op(0x99, STA, AbsoluteY, 5),
    op(0x9A, TXS, Implied, 2),
    op(0x9B, TAS, AbsoluteY, 5).illegal(),
    op(0x9C, SHY, AbsoluteX, 5).illegal(),
    op(0x9D, STA, AbsoluteX, 5),
    op(0x9E, SHX, AbsoluteY, 5).illegal(),
    op(0x9F, AHX, AbsoluteY, 5).illegal(),
    op(0xA0, LDY, Immediate, 2),
    op(0xA1, LDA, IndexedIndirectX, 6),
    op(0xA2, LDX, Immediate, 2),
    op(0xA3, LAX, IndexedIndirectX, 6).illegal(),
    op(0xA4, LDY, ZeroPage, 3),
    op(0xA5, LDA, ZeroPage, 3),
    op(0xA6, LDX, ZeroPage, 3),
    op(0xA7, LAX, ZeroPage, 3).illegal(),
    op(0xA8, TAY, Implied, 2),
    op(0xA9, LDA, Immediate, 2),
    op(0xAA, TAX, Implied, 2),
    op(0xAB, LAX, Immediate, 2).illegal(),
    op(0xAC, LDY, Absolute, 4),
    op(0xAD, LDA, Absolute, 4),
    op(0xAE, LDX, Absolute, 4),
    op(0xAF, LAX, Absolute, 4).illegal(),
    op(0xB0, BCS, Relative, 2),
    op(0xB1, LDA, IndirectIndexedY, 5).page_penalty(),
    op(0xB2, KIL, Implied, 2).illegal(),
    op(0xB3, LAX, IndirectIndexedY, 5).page_penalty().illegal(),
    op(0xB4, LDY, ZeroPageX, 4),
    op(0xB5, LDA, ZeroPageX, 4),
    op(0xB6, LDX, ZeroPageY, 4),
    op(0xB7, LAX, ZeroPageY, 4).illegal(),
    op(0xB8, CLV, Implied, 2),
    op(0xB9, LDA, AbsoluteY, 4).page_penalty(),
    op(0xBA, TSX, Implied, 2),
    op(0xBB, LAS, AbsoluteY, 4).page_penalty().illegal(),
    op(0xBC, LDY, AbsoluteX, 4).page_penalty(),
    op(0xBD, LDA, AbsoluteX, 4).page_penalty(),
    op(0xBE, LDX, AbsoluteY, 4).page_penalty(),
    op(0xBF, LAX, AbsoluteY, 4).page_penalty().illegal(),
    op(0xC0, CPY, Immediate, 2),
    op(0xC1, CMP, IndexedIndirectX, 6),
    op(0xC2, NOP, Immediate, 2).illegal(),
    op(0xC3, DCP, IndexedIndirectX, 8).illegal(),
    op(0xC4, CPY, ZeroPage, 3),
    op(0xC5, CMP, ZeroPage, 3),
    op(0xC6, DEC, ZeroPage, 5),
    op(0xC7, DCP, ZeroPage, 5).illegal(),
    op(0xC8, INY, Implied, 2),
    op(0xC9, CMP, Immediate, 2),
    op(0xCA, DEX, Implied, 2),
    op(0xCB, AXS, Immediate, 2).illegal(),
    op(0xCC, CPY, Absolute, 4),
    op(0xCD, CMP, Absolute, 4),
    op(0xCE, DEC, Absolute, 6),
    op(0xCF, DCP, Absolute, 6).illegal(),
    op(0xD0, BNE, Relative, 2),
    op(0xD1, CMP, IndirectIndexedY, 5).page_penalty(),
    op(0xD2, KIL, Implied, 2).illegal(),
    op(0xD3, DCP, IndirectIndexedY, 8).illegal(),
    op(0xD4, NOP, ZeroPageX, 4).illegal(),
    op(0xD5, CMP, ZeroPageX, 4),
    op(0xD6, DEC, ZeroPageX, 6),
    op(0xD7, DCP, ZeroPageX, 6).illegal(),
    op(0xD8, CLD, Implied, 2),
    op(0xD9, CMP, AbsoluteY, 4).page_penalty(),
    op(0xDA, NOP, Implied, 2).illegal(),
    op(0xDB, DCP, AbsoluteY, 7).illegal(),
    op(0xDC, NOP, AbsoluteX, 4).page_penalty().illegal(),
    op(0xDD, CMP, AbsoluteX, 4).page_penalty(),
    op(0xDE, DEC, AbsoluteX, 7),
    op(0xDF, DCP, AbsoluteX, 7).illegal(),
    op(0xE0, CPX, Immediate, 2),
    op(0xE1, SBC, IndexedIndirectX, 6),
    op(0xE2, NOP, Immediate, 2).illegal(),
    op(0xE3, ISB, IndexedIndirectX, 8).illegal(),
    op(0xE4, CPX, ZeroPage, 3),
    op(0xE5, SBC, ZeroPage, 3),
    op(0xE6, INC, ZeroPage, 5),
    op(0xE7, ISB, ZeroPage, 5).illegal(),
    op(0xE8, INX, Implied, 2),
    op(0xE9, SBC, Immediate, 2),
    op(0xEA, NOP, Implied, 2),
    op(0xEB, SBC, Immediate, 2).illegal(),
    op(0xEC, CPX, Absolute, 4),
    op(0xED, SBC, Absolute, 4),
    op(0xEE, INC, Absolute, 6),
    op(0xEF, ISB, Absolute, 6).illegal(),
    op(0xF0, BEQ, Relative, 2),
    op(0xF1, SBC, IndirectIndexedY, 5).page_penalty(),
    op(0xF2, KIL, Implied, 2).illegal(),
    op(0xF3, ISB, IndirectIndexedY, 8).illegal(),
    op(0xF4, NOP, ZeroPageX, 4).illegal(),
    op(0xF5, SBC, ZeroPageX, 4),
    op(0xF6, INC, ZeroPageX, 6),
    op(0xF7, ISB, ZeroPageX, 6).illegal(),
    op(0xF8, SED, Implied, 2),
    op(0xF9, SBC, AbsoluteY, 4).page_penalty(),
    op(0xFA, NOP, Implied, 2).illegal(),
    op(0xFB, ISB, AbsoluteY, 7).illegal(),
    op(0xFC, NOP, AbsoluteX, 4).page_penalty().illegal(),
    op(0xFD, SBC, AbsoluteX, 4).page_penalty(),
    op(0xFE, INC, AbsoluteX, 7),
    op(0xFF, ISB, AbsoluteX, 7).illegal(),
];

const _: () = {
    let mut i = 0;
    while i < 256 {
        assert!(TABLE[i].code as usize == i, "opcode table row out of order");
        i += 1;
    }
};

pub static OPCODES: [Opcode; 256] = TABLE;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_count_is_151() {
        let documented = OPCODES.iter().filter(|o| !o.illegal).count();
        assert_eq!(documented, 151);
    }

    #[test]
    fn spot_check_rows() {
        let lda_abs_x = Opcode::lookup(0xBD);
        assert_eq!(lda_abs_x.mnemonic, LDA);
        assert_eq!(lda_abs_x.mode, AbsoluteX);
        assert_eq!(lda_abs_x.cycles, 4);
        assert!(lda_abs_x.page_penalty);

        let sta_abs_x = Opcode::lookup(0x9D);
        assert_eq!(sta_abs_x.cycles, 5);
        assert!(!sta_abs_x.page_penalty);

        let jmp_ind = Opcode::lookup(0x6C);
        assert_eq!((jmp_ind.mode, jmp_ind.cycles), (Indirect, 5));
        assert_eq!(jmp_ind.len(), 3);

        let dcp = Opcode::lookup(0xC3);
        assert!(dcp.illegal);
        assert_eq!(dcp.cycles, 8);
    }

    #[test]
    fn read_modify_write_never_pays_page_penalty() {
        for o in OPCODES.iter() {
            if matches!(o.mnemonic, ASL | LSR | ROL | ROR | INC | DEC | DCP | ISB | SLO | RLA | SRE | RRA)
            {
                assert!(!o.page_penalty, "{:02X}", o.code);
            }
        }
    }

    #[test]
    fn mnemonic_display() {
        assert_eq!(ISB.to_string(), "ISB");
        assert_eq!(format!("{:<4}", NOP), "NOP ");
    }
}
