/*!
cpu_bus: Trait abstraction decoupling the CPU core from the concrete `Bus`.

The CPU only needs byte reads and writes in its 16-bit address space. Taking
a trait instead of the full `Bus`:
  * lets instruction and addressing tests run against flat 64KB memory,
    including addresses that the real bus maps to PPU registers;
  * lets the trace formatter reuse the addressing helpers over a
    side-effect-free view (`PeekView`).

`read` may have side effects (PPU register reads); `peek` must not.
*/

/// CPU-visible address space.
pub trait CpuBus {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, value: u8);
    fn peek(&self, addr: u16) -> u8;

    /// Little-endian word at `addr`, `addr + 1` (vectors).
    #[inline]
    fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }
}

/// Read-only adapter: `read` forwards to `peek`, writes are dropped.
pub struct PeekView<'a, B: CpuBus + ?Sized>(pub &'a B);

impl<B: CpuBus + ?Sized> CpuBus for PeekView<'_, B> {
    #[inline]
    fn read(&mut self, addr: u16) -> u8 {
        self.0.peek(addr)
    }

    #[inline]
    fn write(&mut self, _addr: u16, _value: u8) {}

    #[inline]
    fn peek(&self, addr: u16) -> u8 {
        self.0.peek(addr)
    }
}
