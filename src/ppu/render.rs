#![doc = r#"
PPU render pipeline

Per-dot background and sprite work, executed by `Ppu::run` while rendering is
enabled (PPUMASK background or sprite bit set).

Background
- Dots 1-256 and 321-336 of the pre-render and visible scanlines fetch one
  tile every 8 dots: nametable byte (dot%8 == 1), attribute (3), pattern low
  (5), pattern high (7); dot%8 == 0 appends the decoded 8 pixels to the
  64-bit shift register and increments coarse X.
- Dot 256 increments Y, dot 257 copies horizontal bits t->v, pre-render dots
  280-304 copy vertical bits t->v.

Sprites
- Evaluated at dot 257 of each visible scanline: the first 8 in-range OAM
  entries are decoded (8x8 or 8x16, with flips); a 9th sets SPRITE_OVERFLOW.
- Pixel priority follows the attribute priority bit; sprite 0 over an opaque
  background pixel sets SPRITE_ZERO_HIT (never at x = 255).
"#]

use super::Ppu;
use super::memory::PALETTE_BASE;
use super::registers::{PpuCtrl, PpuMask, PpuStatus};
use super::{PRE_RENDER_SCANLINE, VISIBLE_SCANLINES};

/// Background fetch latches and the 8-pixel-per-tile shift register.
#[derive(Debug, Clone, Default)]
pub(in crate::ppu) struct BackgroundLatches {
    name_table_byte: u8,
    attribute_table_byte: u8,
    low_tile_byte: u8,
    high_tile_byte: u8,
    tile_data: u64,
}

/// Sprites selected for the current scanline.
#[derive(Debug, Clone, Default)]
pub(in crate::ppu) struct SpriteLine {
    count: usize,
    patterns: [u32; 8],
    positions: [u8; 8],
    priorities: [u8; 8],
    indexes: [u8; 8],
}

impl Ppu {
    pub(in crate::ppu) fn render_step(&mut self) {
        let pre_line = self.scanline == PRE_RENDER_SCANLINE;
        let visible_line = (0..VISIBLE_SCANLINES).contains(&self.scanline);
        let render_line = pre_line || visible_line;
        let prefetch_cycle = (321..=336).contains(&self.cycle);
        let visible_cycle = (1..=256).contains(&self.cycle);
        let fetch_cycle = prefetch_cycle || visible_cycle;

        if visible_line && visible_cycle {
            self.render_pixel();
        }

        if render_line && fetch_cycle {
            self.bg.tile_data <<= 4;
            match self.cycle % 8 {
                1 => self.fetch_name_table_byte(),
                3 => self.fetch_attribute_table_byte(),
                5 => self.fetch_low_tile_byte(),
                7 => self.fetch_high_tile_byte(),
                0 => self.store_tile_data(),
                _ => {}
            }
        }

        if pre_line && (280..=304).contains(&self.cycle) {
            self.copy_y();
        }

        if render_line {
            if fetch_cycle && self.cycle % 8 == 0 {
                self.increment_x();
            }
            if self.cycle == 256 {
                self.increment_y();
            }
            if self.cycle == 257 {
                self.copy_x();
            }
        }

        if self.cycle == 257 {
            if visible_line {
                self.evaluate_sprites();
            } else {
                self.sprites.count = 0;
            }
        }
    }

    // --- scroll register helpers -------------------------------------------

    fn increment_x(&mut self) {
        if self.v & 0x001F == 31 {
            self.v &= 0xFFE0;
            self.v ^= 0x0400;
        } else {
            self.v += 1;
        }
    }

    fn increment_y(&mut self) {
        if self.v & 0x7000 != 0x7000 {
            self.v += 0x1000;
            return;
        }
        self.v &= 0x8FFF;
        let mut y = (self.v & 0x03E0) >> 5;
        if y == 29 {
            y = 0;
            self.v ^= 0x0800;
        } else if y == 31 {
            y = 0;
        } else {
            y += 1;
        }
        self.v = (self.v & 0xFC1F) | (y << 5);
    }

    fn copy_x(&mut self) {
        self.v = (self.v & 0xFBE0) | (self.t & 0x041F);
    }

    fn copy_y(&mut self) {
        self.v = (self.v & 0x841F) | (self.t & 0x7BE0);
    }

    // --- background fetches ------------------------------------------------

    fn fetch_name_table_byte(&mut self) {
        let addr = 0x2000 | (self.v & 0x0FFF);
        self.bg.name_table_byte = self.read_vram(addr);
    }

    fn fetch_attribute_table_byte(&mut self) {
        let v = self.v;
        let addr = 0x23C0 | (v & 0x0C00) | ((v >> 4) & 0x38) | ((v >> 2) & 0x07);
        let shift = ((v >> 4) & 4) | (v & 2);
        self.bg.attribute_table_byte = ((self.read_vram(addr) >> shift) & 3) << 2;
    }

    fn background_pattern_address(&self) -> u16 {
        let fine_y = (self.v >> 12) & 7;
        let table = if self.ctrl.contains(PpuCtrl::BACKGROUND_TABLE) {
            0x1000
        } else {
            0
        };
        table + self.bg.name_table_byte as u16 * 16 + fine_y
    }

    fn fetch_low_tile_byte(&mut self) {
        let addr = self.background_pattern_address();
        self.bg.low_tile_byte = self.read_vram(addr);
    }

    fn fetch_high_tile_byte(&mut self) {
        let addr = self.background_pattern_address();
        self.bg.high_tile_byte = self.read_vram(addr + 8);
    }

    fn store_tile_data(&mut self) {
        let a = self.bg.attribute_table_byte;
        let mut low = self.bg.low_tile_byte;
        let mut high = self.bg.high_tile_byte;
        let mut data: u32 = 0;
        for _ in 0..8 {
            let p1 = (low & 0x80) >> 7;
            let p2 = (high & 0x80) >> 6;
            low <<= 1;
            high <<= 1;
            data <<= 4;
            data |= (a | p1 | p2) as u32;
        }
        self.bg.tile_data |= data as u64;
    }

    fn background_pixel(&self) -> u8 {
        if !self.mask.contains(PpuMask::SHOW_BACKGROUND) {
            return 0;
        }
        let data = (self.bg.tile_data >> 32) as u32 >> ((7 - self.fine_x as u32) * 4);
        (data & 0x0F) as u8
    }

    // --- sprites -------------------------------------------------------------

    fn sprite_pixel(&self) -> (usize, u8) {
        if !self.mask.contains(PpuMask::SHOW_SPRITES) {
            return (0, 0);
        }
        let x = self.cycle as i32 - 1;
        for i in 0..self.sprites.count {
            let offset = x - self.sprites.positions[i] as i32;
            if !(0..=7).contains(&offset) {
                continue;
            }
            let shift = (7 - offset) * 4;
            let color = ((self.sprites.patterns[i] >> shift) & 0x0F) as u8;
            if color % 4 == 0 {
                continue;
            }
            return (i, color);
        }
        (0, 0)
    }

    fn fetch_sprite_pattern(&self, sprite: usize, row: i32) -> u32 {
        let [_, tile, attributes, _] = self.oam.sprite(sprite);
        let mut row = row;
        let address = if !self.ctrl.contains(PpuCtrl::SPRITE_SIZE_16) {
            if attributes & 0x80 != 0 {
                row = 7 - row;
            }
            let table = if self.ctrl.contains(PpuCtrl::SPRITE_TABLE) {
                0x1000
            } else {
                0
            };
            table + tile as u16 * 16 + row as u16
        } else {
            if attributes & 0x80 != 0 {
                row = 15 - row;
            }
            let table = (tile & 1) as u16 * 0x1000;
            let mut tile = tile & 0xFE;
            if row > 7 {
                tile += 1;
                row -= 8;
            }
            table + tile as u16 * 16 + row as u16
        };

        let a = (attributes & 3) << 2;
        let mut low = self.read_vram(address);
        let mut high = self.read_vram(address + 8);
        let mut data: u32 = 0;
        for _ in 0..8 {
            let (p1, p2);
            if attributes & 0x40 != 0 {
                p1 = low & 1;
                p2 = (high & 1) << 1;
                low >>= 1;
                high >>= 1;
            } else {
                p1 = (low & 0x80) >> 7;
                p2 = (high & 0x80) >> 6;
                low <<= 1;
                high <<= 1;
            }
            data <<= 4;
            data |= (a | p1 | p2) as u32;
        }
        data
    }

    fn evaluate_sprites(&mut self) {
        let height = if self.ctrl.contains(PpuCtrl::SPRITE_SIZE_16) {
            16
        } else {
            8
        };
        let mut count = 0;
        for i in 0..64 {
            let [y, _, attributes, x] = self.oam.sprite(i);
            let row = self.scanline as i32 - y as i32;
            if row < 0 || row >= height {
                continue;
            }
            if count < 8 {
                let pattern = self.fetch_sprite_pattern(i, row);
                self.sprites.patterns[count] = pattern;
                self.sprites.positions[count] = x;
                self.sprites.priorities[count] = (attributes >> 5) & 1;
                self.sprites.indexes[count] = i as u8;
            }
            count += 1;
        }
        if count > 8 {
            count = 8;
            self.status.insert(PpuStatus::SPRITE_OVERFLOW);
        }
        self.sprites.count = count;
    }

    // --- composition ---------------------------------------------------------

    fn render_pixel(&mut self) {
        let x = (self.cycle - 1) as usize;
        let y = self.scanline as usize;

        let mut background = self.background_pixel();
        let (i, mut sprite) = self.sprite_pixel();
        if x < 8 && !self.mask.contains(PpuMask::SHOW_BACKGROUND_LEFT) {
            background = 0;
        }
        if x < 8 && !self.mask.contains(PpuMask::SHOW_SPRITES_LEFT) {
            sprite = 0;
        }

        let b = background % 4 != 0;
        let s = sprite % 4 != 0;
        let color = match (b, s) {
            (false, false) => 0,
            (false, true) => sprite | 0x10,
            (true, false) => background,
            (true, true) => {
                if self.sprites.indexes[i] == 0 && x < 255 {
                    self.status.insert(PpuStatus::SPRITE_ZERO_HIT);
                }
                if self.sprites.priorities[i] == 0 {
                    sprite | 0x10
                } else {
                    background
                }
            }
        };

        let index = self.read_vram(PALETTE_BASE | color as u16);
        self.frame_buffer.draw_palette_index(y, x, index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::ColorComponent;
    use crate::ppu::registers::{PPUADDR, PPUMASK, PPUSCROLL};

    fn run_until(p: &mut Ppu, scanline: i16, cycle: u16) {
        while !(p.scanline() == scanline && p.cycle() == cycle) {
            p.run();
        }
    }

    #[test]
    fn coarse_x_wraps_into_next_nametable() {
        let mut p = Ppu::new();
        p.v = 0x001F;
        p.increment_x();
        assert_eq!(p.v, 0x0400);
    }

    #[test]
    fn increment_y_wraps_at_row_29() {
        let mut p = Ppu::new();
        p.v = 0x7000 | (29 << 5);
        p.increment_y();
        assert_eq!(p.v, 0x0800);

        p.v = 0x7000 | (31 << 5);
        p.increment_y();
        assert_eq!(p.v, 0x0000);

        p.v = 0x0000;
        p.increment_y();
        assert_eq!(p.v, 0x1000);
    }

    #[test]
    fn copy_helpers_move_only_their_bits() {
        let mut p = Ppu::new();
        p.write_register(PPUADDR, 0x00);
        p.write_register(PPUADDR, 0x00);
        p.write_register(PPUSCROLL, 0xFF);
        p.write_register(PPUSCROLL, 0xFF);
        p.copy_x();
        assert_eq!(p.v, p.t & 0x041F);
        p.copy_y();
        assert_eq!(p.v, p.t & 0x7FFF);
    }

    #[test]
    fn opaque_sprite_zero_over_background_sets_hit_and_overflow() {
        // Fresh memory is 0xFF: every tile is opaque color 3, and all 64 OAM
        // entries sit at (0, 0).
        let mut p = Ppu::new();
        p.write_register(PPUMASK, 0x1E);
        run_until(&mut p, 2, 0);
        assert!(p.status().contains(PpuStatus::SPRITE_ZERO_HIT));
        assert!(p.status().contains(PpuStatus::SPRITE_OVERFLOW));

        // Both flags clear at pre-render dot 1.
        run_until(&mut p, PRE_RENDER_SCANLINE, 2);
        assert!(!p.status().contains(PpuStatus::SPRITE_ZERO_HIT));
        assert!(!p.status().contains(PpuStatus::SPRITE_OVERFLOW));
    }

    #[test]
    fn rendered_pixels_resolve_through_palette_ram() {
        let mut p = Ppu::new();
        // Sprite palette 0 color 3 lives at $3F13.
        p.memory.set(0x3F13, 0x16);
        p.write_register(PPUMASK, 0x1E);
        run_until(&mut p, 2, 0);
        let expected = crate::ppu::palette::lookup(0x16);
        assert_eq!(p.frame_buffer().get(1, 0), Some(expected));
        assert_ne!(expected, ColorComponent::SENTINEL);
    }

    #[test]
    fn disabled_rendering_leaves_frame_buffer_untouched() {
        let mut p = Ppu::new();
        run_until(&mut p, 10, 0);
        assert_eq!(p.frame_buffer().get(5, 5), Some(ColorComponent::SENTINEL));
        assert!(!p.status().contains(PpuStatus::SPRITE_ZERO_HIT));
    }
}
