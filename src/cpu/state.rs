/*!
state.rs - 6502 architectural state (registers + flags).

Overview
========
`CpuState` owns every architecturally visible register. Each register is a
`ByteRegister` / `DoubleByteRegister`, so width masking is enforced by the
type rather than by call sites. Bus access, decode and cycle accounting live
in higher layers (dispatch, execute, core).

6502 Status Register Bit Layout
===============================
Bit: 7 6 5 4 3 2 1 0
     N V 1 B D I Z C
Where:
  N = NEGATIVE
  V = OVERFLOW
  1 = UNUSED (always pushed as 1)
  B = BREAK (set in the pushed copy for BRK/PHP only)
  D = DECIMAL (stored and toggled, no BCD arithmetic on the 2A03)
  I = IRQ_DISABLE
  Z = ZERO
  C = CARRY
*/

use bitflags::bitflags;

use crate::register::{ByteRegister, DoubleByteRegister};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct StatusFlags: u8 {
        const CARRY       = 0b0000_0001;
        const ZERO        = 0b0000_0010;
        const IRQ_DISABLE = 0b0000_0100;
        const DECIMAL     = 0b0000_1000;
        const BREAK       = 0b0001_0000;
        const UNUSED      = 0b0010_0000;
        const OVERFLOW    = 0b0100_0000;
        const NEGATIVE    = 0b1000_0000;
    }
}

pub const STACK_PAGE: u16 = 0x0100;

/// Architectural register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuState {
    pub a: ByteRegister,
    pub x: ByteRegister,
    pub y: ByteRegister,
    pub sp: ByteRegister,
    pub pc: DoubleByteRegister,
    pub p: ByteRegister,
    /// Set by a KIL/JAM opcode; cleared by reset.
    pub halted: bool,
}

impl Default for CpuState {
    fn default() -> Self {
        Self {
            a: ByteRegister::new(0),
            x: ByteRegister::new(0),
            y: ByteRegister::new(0),
            sp: ByteRegister::new(0xFD),
            pc: DoubleByteRegister::new(0),
            p: ByteRegister::new((StatusFlags::IRQ_DISABLE | StatusFlags::UNUSED).bits()),
            halted: false,
        }
    }
}

impl CpuState {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn flags(&self) -> StatusFlags {
        StatusFlags::from_bits_retain(self.p.get())
    }

    #[inline]
    pub fn set_flags(&mut self, flags: StatusFlags) {
        self.p.set(flags.bits() as u32);
    }

    /// Stack slot addressed by the current SP.
    #[inline]
    pub fn stack_address(&self) -> u16 {
        STACK_PAGE | self.sp.get() as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::regs::CpuRegs;

    #[test]
    fn default_power_up() {
        let s = CpuState::new();
        assert_eq!(s.a(), 0);
        assert_eq!(s.x(), 0);
        assert_eq!(s.y(), 0);
        assert_eq!(s.sp(), 0xFD);
        assert!(s.is_flag_set(StatusFlags::IRQ_DISABLE));
        assert!(s.is_flag_set(StatusFlags::UNUSED));
        assert!(!s.halted());
        assert_eq!(s.stack_address(), 0x01FD);
    }

    #[test]
    fn flag_assignment() {
        let mut s = CpuState::new();
        s.assign_flag(StatusFlags::IRQ_DISABLE, false);
        assert!(!s.is_flag_set(StatusFlags::IRQ_DISABLE));
        s.assign_flag(StatusFlags::DECIMAL, true);
        assert!(s.is_flag_set(StatusFlags::DECIMAL));
        assert_eq!(s.flags(), StatusFlags::DECIMAL | StatusFlags::UNUSED);
    }

    #[test]
    fn update_zn_behavior() {
        let mut s = CpuState::new();
        s.update_zn(0x00);
        assert!(s.is_flag_set(StatusFlags::ZERO));
        assert!(!s.is_flag_set(StatusFlags::NEGATIVE));
        s.update_zn(0x80);
        assert!(!s.is_flag_set(StatusFlags::ZERO));
        assert!(s.is_flag_set(StatusFlags::NEGATIVE));
        s.update_zn(0x7F);
        assert!(!s.is_flag_set(StatusFlags::ZERO));
        assert!(!s.is_flag_set(StatusFlags::NEGATIVE));
    }

    #[test]
    fn pc_advance_wraps() {
        let mut s = CpuState::new();
        s.set_pc(0xFFFF);
        s.advance_pc(1);
        assert_eq!(s.pc(), 0x0000);
        s.advance_pc(-2);
        assert_eq!(s.pc(), 0xFFFE);
    }

    #[test]
    fn compose_status_break_flag_behavior() {
        let s = CpuState::new();
        let with_break = s.compose_status_for_push(true);
        let without_break = s.compose_status_for_push(false);
        assert_ne!(with_break & StatusFlags::BREAK.bits(), 0);
        assert_eq!(without_break & StatusFlags::BREAK.bits(), 0);
        assert_ne!(with_break & StatusFlags::UNUSED.bits(), 0);
        assert_ne!(without_break & StatusFlags::UNUSED.bits(), 0);
    }
}
