/*!
trace.rs - Nintendulator / nestest style instruction trace lines.

Layout (column positions are fixed so logs diff cleanly against the
reference):

```text
C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7
C6BD  04 A9    *NOP $A9 = 00                    A:AA X:97 Y:4E P:EF SP:F9 PPU:  0,253 CYC:...
```

- PC, then up to three raw instruction bytes.
- `*` in column 15 marks an undocumented opcode.
- Disassembly with operand annotations: the effective address (`@ xxxx`)
  for indexed/indirect modes and the current value at it (`= xx`), except
  for JMP/JSR absolute which print only the target.
- Register dump, optional `PPU:scanline,dot` (pre-render line printed as
  261), and the cycle count before the instruction executes.

Every memory access goes through `PeekView`, so formatting a line never
triggers PPU register side effects.
*/

use std::fmt::Write as _;

use crate::cpu::addressing::{
    AddressingMode, at_absolute, at_absolute_indirect, at_absolute_x, at_absolute_y,
    at_indexed_indirect_x, at_indirect_indexed_y, at_relative, at_zero_page, at_zero_page_x,
    at_zero_page_y,
};
use crate::cpu::opcodes::{Mnemonic, Opcode};
use crate::cpu::{Cpu, CpuRegisters};
use crate::cpu_bus::{CpuBus, PeekView};
use crate::ppu::SCANLINES_PER_FRAME;

/// PPU position printed in the `PPU:` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PpuPosition {
    pub scanline: i16,
    pub dot: u16,
}

/// Format the line for the instruction at the CPU's current PC.
pub fn trace_line<B: CpuBus + ?Sized>(cpu: &Cpu, bus: &B, ppu: Option<PpuPosition>) -> String {
    format_line(&cpu.registers(), cpu.total_cycles(), bus, ppu)
}

pub fn format_line<B: CpuBus + ?Sized>(
    regs: &CpuRegisters,
    cycles: u64,
    bus: &B,
    ppu: Option<PpuPosition>,
) -> String {
    let mut view = PeekView(bus);
    let op = Opcode::lookup(view.read(regs.pc));

    let mut raw = String::with_capacity(8);
    for i in 0..op.len() {
        if i > 0 {
            raw.push(' ');
        }
        let _ = write!(raw, "{:02X}", view.read(regs.pc.wrapping_add(i)));
    }

    let marker = if op.illegal { '*' } else { ' ' };
    let text = disassemble(op, regs, &mut view);

    let mut line = format!(
        "{:04X}  {:<8} {}{:<31} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X}",
        regs.pc, raw, marker, text, regs.a, regs.x, regs.y, regs.p, regs.sp
    );
    if let Some(pos) = ppu {
        let scanline = pos.scanline.rem_euclid(SCANLINES_PER_FRAME);
        let _ = write!(line, " PPU:{:>3},{:>3}", scanline, pos.dot);
    }
    let _ = write!(line, " CYC:{cycles}");
    line
}

/// Mnemonic plus annotated operand, e.g. `LDA ($80,X) @ 80 = 0200 = 5A`.
fn disassemble<B: CpuBus + ?Sized>(op: &Opcode, regs: &CpuRegisters, bus: &mut B) -> String {
    let pc = regs.pc.wrapping_add(1);
    let (x, y) = (regs.x, regs.y);
    let mnemonic = op.mnemonic;

    let operand = match op.mode {
        AddressingMode::Implied => String::new(),
        AddressingMode::Accumulator => "A".to_string(),
        AddressingMode::Immediate => format!("#${:02X}", bus.read(pc)),
        AddressingMode::ZeroPage => {
            let addr = at_zero_page(bus, pc);
            format!("${:02X} = {:02X}", addr, bus.read(addr))
        }
        AddressingMode::ZeroPageX => {
            let addr = at_zero_page_x(bus, pc, x);
            format!("${:02X},X @ {:02X} = {:02X}", bus.read(pc), addr, bus.read(addr))
        }
        AddressingMode::ZeroPageY => {
            let addr = at_zero_page_y(bus, pc, y);
            format!("${:02X},Y @ {:02X} = {:02X}", bus.read(pc), addr, bus.read(addr))
        }
        AddressingMode::Absolute => {
            let addr = at_absolute(bus, pc);
            if matches!(mnemonic, Mnemonic::JMP | Mnemonic::JSR) {
                format!("${addr:04X}")
            } else {
                format!("${:04X} = {:02X}", addr, bus.read(addr))
            }
        }
        AddressingMode::AbsoluteX => {
            let base = at_absolute(bus, pc);
            let addr = at_absolute_x(bus, pc, x);
            format!("${:04X},X @ {:04X} = {:02X}", base, addr, bus.read(addr))
        }
        AddressingMode::AbsoluteY => {
            let base = at_absolute(bus, pc);
            let addr = at_absolute_y(bus, pc, y);
            format!("${:04X},Y @ {:04X} = {:02X}", base, addr, bus.read(addr))
        }
        AddressingMode::Indirect => {
            let ptr = at_absolute(bus, pc);
            let target = at_absolute_indirect(bus, pc);
            format!("(${ptr:04X}) = {target:04X}")
        }
        AddressingMode::IndexedIndirectX => {
            let zp = bus.read(pc);
            let addr = at_indexed_indirect_x(bus, pc, x);
            format!(
                "(${:02X},X) @ {:02X} = {:04X} = {:02X}",
                zp,
                zp.wrapping_add(x),
                addr,
                bus.read(addr)
            )
        }
        AddressingMode::IndirectIndexedY => {
            let zp = bus.read(pc);
            let addr = at_indirect_indexed_y(bus, pc, y);
            let base = addr.wrapping_sub(y as u16);
            format!(
                "(${:02X}),Y = {:04X} @ {:04X} = {:02X}",
                zp,
                base,
                addr,
                bus.read(addr)
            )
        }
        AddressingMode::Relative => format!("${:04X}", at_relative(bus, pc)),
    };

    if operand.is_empty() {
        mnemonic.to_string()
    } else {
        format!("{mnemonic} {operand}")
    }
}
