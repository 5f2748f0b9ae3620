/*!
Bus mapping the CPU address space onto flat memory and the PPU.

Address map (CPU):
- $0000-$1FFF: 2KB internal RAM stored in four 0x0800 windows. A write lands
  in all four windows; a read uses `addr & 0x07FF`.
- $2000-$3FFF: PPU registers, decoded as `0x2000 | (addr & 7)` and delegated
  to `Ppu::read_register` / `Ppu::write_register`.
- $4014: OAM DMA. The written value selects a CPU page; its 256 bytes are
  copied into OAM immediately and a DMA request is raised for the scheduler,
  which owns the stall arithmetic.
- everything else: flat 64KB array (PRG at $8000-$FFFF, APU/IO registers as
  plain bytes).

Notes:
- Flat memory starts filled with 0xFF.
- `peek` never touches PPU side effects; it backs trace annotations.
*/

use crate::cpu_bus::CpuBus;
use crate::ppu::Ppu;

pub const RAM_SIZE: u16 = 0x0800;
pub const RAM_MIRROR_END: u16 = 0x1FFF;
pub const PPU_REGISTERS_END: u16 = 0x3FFF;
pub const OAM_DMA: u16 = 0x4014;
pub const PRG_START: u16 = 0x8000;

const PRG_BANK_SIZE: usize = 0x4000;

pub struct Bus {
    memory: Box<[u8; 0x10000]>,
    pub ppu: Ppu,
    dma_requested: bool,
}

impl Bus {
    pub fn new() -> Self {
        Self {
            memory: Box::new([0xFF; 0x10000]),
            ppu: Ppu::new(),
            dma_requested: false,
        }
    }

    pub fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=RAM_MIRROR_END => self.memory[(addr & (RAM_SIZE - 1)) as usize],
            0x2000..=PPU_REGISTERS_END => self.ppu.read_register(0x2000 | (addr & 0x0007)),
            _ => self.memory[addr as usize],
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=RAM_MIRROR_END => {
                let base = addr & (RAM_SIZE - 1);
                for window in 0..4u16 {
                    self.memory[(base | (window * RAM_SIZE)) as usize] = value;
                }
            }
            0x2000..=PPU_REGISTERS_END => {
                self.ppu.write_register(0x2000 | (addr & 0x0007), value)
            }
            OAM_DMA => self.oam_dma(value),
            _ => self.memory[addr as usize] = value,
        }
    }

    /// Side-effect free read.
    pub fn peek(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=RAM_MIRROR_END => self.memory[(addr & (RAM_SIZE - 1)) as usize],
            0x2000..=PPU_REGISTERS_END => self.ppu.peek_register(0x2000 | (addr & 0x0007)),
            _ => self.memory[addr as usize],
        }
    }

    /// `read` under its contract name.
    #[inline]
    pub fn get(&mut self, addr: u16) -> u8 {
        self.read(addr)
    }

    /// `write` under its contract name.
    #[inline]
    pub fn set(&mut self, addr: u16, value: u8) {
        self.write(addr, value)
    }

    pub fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    fn oam_dma(&mut self, page: u8) {
        let base = (page as u16) << 8;
        let data: [u8; 256] = std::array::from_fn(|i| self.read(base | i as u16));
        self.ppu.write_oam_dma(&data);
        self.dma_requested = true;
        log::debug!("OAM DMA from page ${page:02X}");
    }

    /// Consume a pending DMA request raised by a $4014 write.
    pub fn take_dma_request(&mut self) -> bool {
        std::mem::take(&mut self.dma_requested)
    }

    /// Copy PRG ROM to $8000. A single 16KB bank is mirrored at $C000.
    pub fn load_prg(&mut self, prg: &[u8]) {
        if prg.is_empty() {
            return;
        }
        if prg.len() != PRG_BANK_SIZE && prg.len() != 2 * PRG_BANK_SIZE {
            log::warn!(
                "PRG of {} bytes is neither 16KB nor 32KB; repeating it across $8000-$FFFF",
                prg.len()
            );
        }
        let window = &mut self.memory[PRG_START as usize..];
        for (i, byte) in window.iter_mut().enumerate() {
            *byte = prg[i % prg.len()];
        }
    }

    /// Copy CHR into PPU pattern memory and clear the nametables.
    pub fn load_chr(&mut self, chr: &[u8]) {
        self.ppu.load_chr(chr);
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuBus for Bus {
    #[inline]
    fn read(&mut self, addr: u16) -> u8 {
        Bus::read(self, addr)
    }

    #[inline]
    fn write(&mut self, addr: u16, value: u8) {
        Bus::write(self, addr, value)
    }

    #[inline]
    fn peek(&self, addr: u16) -> u8 {
        Bus::peek(self, addr)
    }
}
