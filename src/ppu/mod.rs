/*!
PPU state machine.

Timing
======
One call to `Ppu::run` advances exactly one dot and returns 1. A frame is 262
scanlines of 341 dots:

- scanline -1: pre-render. Dot 1 clears VBLANK, sprite-0 hit and overflow;
  dots 257-320 reset OAMADDR.
- scanlines 0-239: visible. Pixels are produced at dots 1-256.
- scanline 240: post-render, idle.
- scanlines 241-260: VBLANK. Dot 1 of scanline 241 sets VBLANK.

After scanline 260 the counter wraps to -1 and the frame counter advances.
On odd frames with rendering enabled the last pre-render dot is skipped.

NMI
===
The NMI output is `VBLANK && PPUCTRL.7`. A rising edge of that line latches
one request, consumed by `take_nmi_request`. Leaving VBLANK set (PPUSTATUS
reads do not clear it) therefore yields exactly one NMI per frame.

STRUCTURE:
- `registers`: CPU-visible $2000-$2007 behavior and the loopy scroll registers.
- `render`: per-dot background/sprite pipeline writing the `FrameBuffer`.
- `memory`: `PpuMemory` / `OamMemory` storage.
- `palette`: master palette.
*/

pub mod memory;
pub mod palette;
pub mod registers;
pub(crate) mod render;

use serde::{Deserialize, Serialize};

use crate::framebuffer::FrameBuffer;
use memory::{OamMemory, PpuMemory};
use render::{BackgroundLatches, SpriteLine};

pub use registers::{PpuCtrl, PpuMask, PpuStatus};

pub const DOTS_PER_SCANLINE: u16 = 341;
pub const LAST_DOT: u16 = DOTS_PER_SCANLINE - 1;
pub const PRE_RENDER_SCANLINE: i16 = -1;
pub const VISIBLE_SCANLINES: i16 = 240;
pub const POST_RENDER_SCANLINE: i16 = 240;
pub const VBLANK_START_SCANLINE: i16 = 241;
pub const LAST_SCANLINE: i16 = 260;
pub const SCANLINES_PER_FRAME: i16 = 262;

/// Loopy scroll/address register snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PpuRegisters {
    pub v: u16,
    pub t: u16,
    pub w: bool,
}

pub struct Ppu {
    // CPU-visible registers
    ctrl: PpuCtrl,
    mask: PpuMask,
    status: PpuStatus,
    oam_addr: u8,
    io_latch: u8,
    read_buffer: u8,

    // Loopy registers
    v: u16,
    t: u16,
    fine_x: u8,
    w: bool,

    // Timing
    cycle: u16,
    scanline: i16,
    frame: u64,
    odd_frame: bool,

    // NMI edge detection
    nmi_previous: bool,
    nmi_requested: bool,

    bg: BackgroundLatches,
    sprites: SpriteLine,

    memory: PpuMemory,
    oam: OamMemory,
    frame_buffer: FrameBuffer,
}

impl Ppu {
    /// Power-up state: dot 0 of scanline 0, all registers clear.
    pub fn new() -> Self {
        Self {
            ctrl: PpuCtrl::empty(),
            mask: PpuMask::empty(),
            status: PpuStatus::empty(),
            oam_addr: 0,
            io_latch: 0,
            read_buffer: 0,
            v: 0,
            t: 0,
            fine_x: 0,
            w: false,
            cycle: 0,
            scanline: 0,
            frame: 0,
            odd_frame: false,
            nmi_previous: false,
            nmi_requested: false,
            bg: BackgroundLatches::default(),
            sprites: SpriteLine::default(),
            memory: PpuMemory::new(),
            oam: OamMemory::new(),
            frame_buffer: FrameBuffer::new(),
        }
    }

    /// Advance one dot and apply whatever happens at the new position.
    /// Returns the number of PPU cycles consumed (always 1).
    pub fn run(&mut self) -> u32 {
        self.advance_counters();

        if self.rendering_enabled() {
            self.render_step();
        }

        if self.cycle == 1 {
            if self.scanline == VBLANK_START_SCANLINE {
                self.status.insert(PpuStatus::VBLANK);
                self.nmi_change();
            } else if self.scanline == PRE_RENDER_SCANLINE {
                self.status.remove(
                    PpuStatus::VBLANK | PpuStatus::SPRITE_ZERO_HIT | PpuStatus::SPRITE_OVERFLOW,
                );
                self.nmi_change();
            }
        }

        let oam_reset_line = self.scanline == PRE_RENDER_SCANLINE
            || (self.scanline < VISIBLE_SCANLINES && self.rendering_enabled());
        if oam_reset_line && (257..=320).contains(&self.cycle) {
            self.oam_addr = 0;
        }
        1
    }

    fn advance_counters(&mut self) {
        if self.odd_frame
            && self.rendering_enabled()
            && self.scanline == PRE_RENDER_SCANLINE
            && self.cycle == LAST_DOT - 1
        {
            self.cycle = 0;
            self.scanline = 0;
            return;
        }

        self.cycle += 1;
        if self.cycle > LAST_DOT {
            self.cycle = 0;
            self.scanline += 1;
            if self.scanline > LAST_SCANLINE {
                self.scanline = PRE_RENDER_SCANLINE;
                self.frame += 1;
                self.odd_frame = !self.odd_frame;
                log::trace!("ppu frame {} begins", self.frame);
            }
        }
    }

    /// Recompute the NMI output line and latch a request on a rising edge.
    pub(in crate::ppu) fn nmi_change(&mut self) {
        let nmi = self.ctrl.contains(PpuCtrl::NMI_ENABLE) && self.status.contains(PpuStatus::VBLANK);
        if nmi && !self.nmi_previous {
            self.nmi_requested = true;
        }
        self.nmi_previous = nmi;
    }

    /// Consume a latched NMI request.
    pub fn take_nmi_request(&mut self) -> bool {
        std::mem::take(&mut self.nmi_requested)
    }

    /// Current level of the NMI output (`VBLANK && PPUCTRL.7`).
    pub fn nmi_line(&self) -> bool {
        self.nmi_previous
    }

    #[inline]
    pub fn rendering_enabled(&self) -> bool {
        self.mask
            .intersects(PpuMask::SHOW_BACKGROUND | PpuMask::SHOW_SPRITES)
    }

    /// OAM DMA ($4014): copy a 256-byte CPU page into OAM starting at OAMADDR.
    pub fn write_oam_dma(&mut self, page: &[u8]) {
        self.oam.dma_copy(self.oam_addr, page);
    }

    /// Load CHR data into the pattern tables and clear the nametables.
    pub fn load_chr(&mut self, chr: &[u8]) {
        self.memory.load(0x0000, &chr[..chr.len().min(0x2000)]);
        self.memory.fill(0x2000, 0x3EFF, 0x00);
    }

    // ---------------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------------

    pub fn registers(&self) -> PpuRegisters {
        PpuRegisters {
            v: self.v,
            t: self.t,
            w: self.w,
        }
    }

    #[inline]
    pub fn cycle(&self) -> u16 {
        self.cycle
    }

    #[inline]
    pub fn scanline(&self) -> i16 {
        self.scanline
    }

    /// Number of completed frames (increments when scanline 260 wraps).
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn vblank(&self) -> bool {
        self.status.contains(PpuStatus::VBLANK)
    }

    pub fn status(&self) -> PpuStatus {
        self.status
    }

    pub fn ctrl(&self) -> PpuCtrl {
        self.ctrl
    }

    pub fn mask(&self) -> PpuMask {
        self.mask
    }

    pub fn oam_addr(&self) -> u8 {
        self.oam_addr
    }

    pub fn memory(&self) -> &PpuMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut PpuMemory {
        &mut self.memory
    }

    pub fn oam(&self) -> &OamMemory {
        &self.oam
    }

    pub fn oam_mut(&mut self) -> &mut OamMemory {
        &mut self.oam
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Ppu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ppu")
            .field("scanline", &self.scanline)
            .field("cycle", &self.cycle)
            .field("frame", &self.frame)
            .field("ctrl", &self.ctrl)
            .field("mask", &self.mask)
            .field("status", &self.status)
            .field("registers", &self.registers())
            .finish()
    }
}
