/*!
register.rs - Fixed-width wrapping registers used by the CPU core.

Overview
========
Two value types back every architectural register:

- `ByteRegister`: 8-bit (A, X, Y, SP, P).
- `DoubleByteRegister`: 16-bit (PC).

Every mutation is masked to the register width, so a stored value can never
exceed it. Both types are `Copy`; copying a register yields an independent
value.

Arithmetic
==========
`add` / `subtract` accept signed deltas and return the new masked value.
Adding a negative delta is the same as subtracting its magnitude, which is
how relative branch displacements are applied to PC.
*/

/// 8-bit register with mask-on-write semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ByteRegister(u8);

impl ByteRegister {
    const MASK: i64 = 0xFF;

    #[inline]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(&self) -> u8 {
        self.0
    }

    /// Store `value & 0xFF`.
    #[inline]
    pub fn set(&mut self, value: u32) {
        self.0 = (value as i64 & Self::MASK) as u8;
    }

    #[inline]
    pub fn add(&mut self, delta: i32) -> u8 {
        self.0 = ((self.0 as i64 + delta as i64) & Self::MASK) as u8;
        self.0
    }

    #[inline]
    pub fn subtract(&mut self, delta: i32) -> u8 {
        self.add(delta.wrapping_neg())
    }

    #[inline]
    pub fn is_bit_set(&self, bit: u8) -> bool {
        (self.0 >> (bit & 7)) & 1 != 0
    }
}

impl From<u8> for ByteRegister {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<ByteRegister> for u8 {
    fn from(reg: ByteRegister) -> Self {
        reg.0
    }
}

/// 16-bit register (program counter) with mask-on-write semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DoubleByteRegister(u16);

impl DoubleByteRegister {
    const MASK: i64 = 0xFFFF;

    #[inline]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(&self) -> u16 {
        self.0
    }

    /// Store `value & 0xFFFF`.
    #[inline]
    pub fn set(&mut self, value: u32) {
        self.0 = (value as i64 & Self::MASK) as u16;
    }

    #[inline]
    pub fn add(&mut self, delta: i32) -> u16 {
        self.0 = ((self.0 as i64 + delta as i64) & Self::MASK) as u16;
        self.0
    }

    #[inline]
    pub fn subtract(&mut self, delta: i32) -> u16 {
        self.add(delta.wrapping_neg())
    }

    #[inline]
    pub fn low(&self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    #[inline]
    pub fn high(&self) -> u8 {
        (self.0 >> 8) as u8
    }
}

impl From<u16> for DoubleByteRegister {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<DoubleByteRegister> for u16 {
    fn from(reg: DoubleByteRegister) -> Self {
        reg.0
    }
}
