/*!
regs.rs - CpuRegs trait: generic register + flag manipulation interface for
6502 execution / dispatch.

Scope
=====
The trait does NOT include bus access, stack push/pop or instruction fetch.
Those stay explicit at call sites through a `CpuBus` so handlers borrow the
register file and the address space independently.

Implementations Provided:
=========================
- CpuRegs for `CpuState` (the canonical state owner)

Usage Pattern:
==============
```text
    fn lda<C: CpuRegs>(cpu: &mut C, v: u8) {
        cpu.set_a(v);
        cpu.update_zn(v);
    }
```
*/

use crate::cpu::state::{CpuState, StatusFlags};

/// Minimal 6502 register + flag API needed by instruction semantic and
/// dispatch code. Register setters mask to width through the underlying
/// register types.
pub trait CpuRegs {
    // ---------------------------------------------------------------------
    // Read accessors
    // ---------------------------------------------------------------------
    fn a(&self) -> u8;
    fn x(&self) -> u8;
    fn y(&self) -> u8;
    fn sp(&self) -> u8;
    fn pc(&self) -> u16;
    fn status(&self) -> u8;
    fn halted(&self) -> bool;

    // ---------------------------------------------------------------------
    // Mutators
    // ---------------------------------------------------------------------
    fn set_a(&mut self, v: u8);
    fn set_x(&mut self, v: u8);
    fn set_y(&mut self, v: u8);
    fn set_sp(&mut self, v: u8);
    fn set_pc(&mut self, v: u16);
    fn set_status(&mut self, v: u8);
    fn set_halted(&mut self, h: bool);

    /// Move PC by a signed delta (wrapping at 16 bits).
    fn advance_pc(&mut self, delta: i32);

    // ---------------------------------------------------------------------
    // Flag operations
    // ---------------------------------------------------------------------

    #[inline]
    fn is_flag_set(&self, flag: StatusFlags) -> bool {
        StatusFlags::from_bits_retain(self.status()).contains(flag)
    }

    #[inline]
    fn assign_flag(&mut self, flag: StatusFlags, value: bool) {
        let mut flags = StatusFlags::from_bits_retain(self.status());
        flags.set(flag, value);
        self.set_status(flags.bits());
    }

    /// Composite: update ZERO and NEGATIVE based on result.
    #[inline]
    fn update_zn(&mut self, result: u8) {
        self.assign_flag(StatusFlags::ZERO, result == 0);
        self.assign_flag(StatusFlags::NEGATIVE, (result & 0x80) != 0);
    }

    #[inline]
    fn update_carry(&mut self, carry: bool) {
        self.assign_flag(StatusFlags::CARRY, carry);
    }

    #[inline]
    fn update_overflow(&mut self, overflow: bool) {
        self.assign_flag(StatusFlags::OVERFLOW, overflow);
    }

    /// Status byte for a stack push: UNUSED forced set, BREAK only when
    /// `set_break` (BRK / PHP).
    #[inline]
    fn compose_status_for_push(&self, set_break: bool) -> u8 {
        let mut flags = StatusFlags::from_bits_retain(self.status()) | StatusFlags::UNUSED;
        flags.set(StatusFlags::BREAK, set_break);
        flags.bits()
    }
}

impl CpuRegs for CpuState {
    #[inline]
    fn a(&self) -> u8 {
        self.a.get()
    }
    #[inline]
    fn x(&self) -> u8 {
        self.x.get()
    }
    #[inline]
    fn y(&self) -> u8 {
        self.y.get()
    }
    #[inline]
    fn sp(&self) -> u8 {
        self.sp.get()
    }
    #[inline]
    fn pc(&self) -> u16 {
        self.pc.get()
    }
    #[inline]
    fn status(&self) -> u8 {
        self.p.get()
    }
    #[inline]
    fn halted(&self) -> bool {
        self.halted
    }

    #[inline]
    fn set_a(&mut self, v: u8) {
        self.a.set(v as u32);
    }
    #[inline]
    fn set_x(&mut self, v: u8) {
        self.x.set(v as u32);
    }
    #[inline]
    fn set_y(&mut self, v: u8) {
        self.y.set(v as u32);
    }
    #[inline]
    fn set_sp(&mut self, v: u8) {
        self.sp.set(v as u32);
    }
    #[inline]
    fn set_pc(&mut self, v: u16) {
        self.pc.set(v as u32);
    }
    #[inline]
    fn set_status(&mut self, v: u8) {
        self.p.set(v as u32);
    }
    #[inline]
    fn set_halted(&mut self, h: bool) {
        self.halted = h;
    }

    #[inline]
    fn advance_pc(&mut self, delta: i32) {
        self.pc.add(delta);
    }
}
