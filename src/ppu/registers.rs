#![doc = r#"
PPU registers module

Purpose
- CPU-visible register semantics for $2000-$2007: control/mask/status bit
  layouts, the loopy `v`/`t`/`x`/`w` scroll registers, and the side effects of
  each read and write.

Notes
- Callers pass the canonical register address (`0x2000 | (addr & 7)`); any
  mirror is accepted and folded again here.
- PPUSCROLL and PPUADDR share the single `w` toggle. A PPUSTATUS read resets it
  but leaves VBLANK untouched; VBLANK only clears on the pre-render scanline.
- Write-only registers read back the I/O latch (the last value written to any
  PPU register) instead of failing.
- PPUDATA reads below $3F00 are buffered; palette reads return immediately and
  refill the buffer from the nametable byte underneath.
"#]

use bitflags::bitflags;

use super::Ppu;
use super::memory::canonical_address;

bitflags! {
    /// $2000 PPUCTRL.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PpuCtrl: u8 {
        const NAMETABLE_X       = 0b0000_0001;
        const NAMETABLE_Y       = 0b0000_0010;
        const VRAM_INCREMENT_32 = 0b0000_0100;
        const SPRITE_TABLE      = 0b0000_1000;
        const BACKGROUND_TABLE  = 0b0001_0000;
        const SPRITE_SIZE_16    = 0b0010_0000;
        const MASTER_SLAVE      = 0b0100_0000;
        const NMI_ENABLE        = 0b1000_0000;
    }

    /// $2001 PPUMASK.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PpuMask: u8 {
        const GREYSCALE            = 0b0000_0001;
        const SHOW_BACKGROUND_LEFT = 0b0000_0010;
        const SHOW_SPRITES_LEFT    = 0b0000_0100;
        const SHOW_BACKGROUND      = 0b0000_1000;
        const SHOW_SPRITES         = 0b0001_0000;
        const EMPHASIZE_RED        = 0b0010_0000;
        const EMPHASIZE_GREEN      = 0b0100_0000;
        const EMPHASIZE_BLUE       = 0b1000_0000;
    }

    /// $2002 PPUSTATUS (upper three bits; the rest is open bus).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PpuStatus: u8 {
        const SPRITE_OVERFLOW = 0b0010_0000;
        const SPRITE_ZERO_HIT = 0b0100_0000;
        const VBLANK          = 0b1000_0000;
    }
}

pub const PPUCTRL: u16 = 0x2000;
pub const PPUMASK: u16 = 0x2001;
pub const PPUSTATUS: u16 = 0x2002;
pub const OAMADDR: u16 = 0x2003;
pub const OAMDATA: u16 = 0x2004;
pub const PPUSCROLL: u16 = 0x2005;
pub const PPUADDR: u16 = 0x2006;
pub const PPUDATA: u16 = 0x2007;

impl Ppu {
    /// CPU read of a PPU register, with side effects.
    pub fn read_register(&mut self, addr: u16) -> u8 {
        match 0x2000 | (addr & 0x7) {
            PPUCTRL => self.ctrl.bits(),
            PPUSTATUS => {
                let v = self.status_byte();
                self.w = false;
                v
            }
            OAMDATA => self.oam.get(self.oam_addr),
            PPUDATA => self.read_data(),
            // PPUMASK, OAMADDR, PPUSCROLL, PPUADDR are write-only
            _ => self.io_latch,
        }
    }

    /// Side-effect free view of what `read_register` would return.
    pub fn peek_register(&self, addr: u16) -> u8 {
        match 0x2000 | (addr & 0x7) {
            PPUCTRL => self.ctrl.bits(),
            PPUSTATUS => self.status_byte(),
            OAMDATA => self.oam.get(self.oam_addr),
            PPUDATA => {
                let a = self.v & 0x3FFF;
                if a < 0x3F00 {
                    self.read_buffer
                } else {
                    self.read_vram(a)
                }
            }
            _ => self.io_latch,
        }
    }

    /// CPU write to a PPU register, with side effects.
    pub fn write_register(&mut self, addr: u16, value: u8) {
        self.io_latch = value;
        match 0x2000 | (addr & 0x7) {
            PPUCTRL => {
                self.ctrl = PpuCtrl::from_bits_retain(value);
                // t: ...GH.. ........ <- d: ......GH
                self.t = (self.t & 0xF3FF) | (((value as u16) & 0x03) << 10);
                self.nmi_change();
            }
            PPUMASK => self.mask = PpuMask::from_bits_retain(value),
            PPUSTATUS => {}
            OAMADDR => self.oam_addr = value,
            OAMDATA => {
                self.oam.set(self.oam_addr, value);
                self.oam_addr = self.oam_addr.wrapping_add(1);
            }
            PPUSCROLL => self.write_scroll(value),
            PPUADDR => self.write_address(value),
            PPUDATA => {
                self.write_vram(self.v, value);
                self.increment_vram_address();
            }
            _ => unreachable!(),
        }
    }

    fn status_byte(&self) -> u8 {
        (self.io_latch & 0x1F) | self.status.bits()
    }

    fn write_scroll(&mut self, value: u8) {
        let d = value as u16;
        if !self.w {
            // t: ....... ...ABCDE <- d: ABCDE...
            self.t = (self.t & 0xFFE0) | (d >> 3);
            self.fine_x = value & 0x07;
            self.w = true;
        } else {
            // t: FGH..AB CDE..... <- d: ABCDEFGH
            self.t = (self.t & 0x8FFF) | ((d & 0x07) << 12);
            self.t = (self.t & 0xFC1F) | ((d & 0xF8) << 2);
            self.w = false;
        }
    }

    fn write_address(&mut self, value: u8) {
        let d = value as u16;
        if !self.w {
            self.t = (self.t & 0x80FF) | ((d & 0x3F) << 8);
            self.w = true;
        } else {
            self.t = (self.t & 0xFF00) | d;
            self.v = self.t;
            self.w = false;
        }
    }

    fn read_data(&mut self) -> u8 {
        let addr = self.v & 0x3FFF;
        let value = self.read_vram(addr);
        let out = if addr < 0x3F00 {
            std::mem::replace(&mut self.read_buffer, value)
        } else {
            self.read_buffer = self.read_vram(addr - 0x1000);
            value
        };
        self.increment_vram_address();
        out
    }

    #[inline]
    pub(crate) fn vram_increment_step(&self) -> u16 {
        if self.ctrl.contains(PpuCtrl::VRAM_INCREMENT_32) {
            32
        } else {
            1
        }
    }

    fn increment_vram_address(&mut self) {
        self.v = self.v.wrapping_add(self.vram_increment_step()) & 0x7FFF;
    }

    /// PPU address space read with mirror folding.
    #[inline]
    pub(in crate::ppu) fn read_vram(&self, addr: u16) -> u8 {
        self.memory.get(canonical_address(addr))
    }

    #[inline]
    pub(in crate::ppu) fn write_vram(&mut self, addr: u16, value: u8) {
        self.memory.set(canonical_address(addr), value);
    }
}
