#![doc = r#"
PPU memory submodule

Responsibilities
- `PpuMemory`: flat 16KB PPU address space (pattern tables, nametables, palette RAM).
- `OamMemory`: 256-byte Object Attribute Memory (64 sprites x 4 bytes).
- `canonical_address`: folds the PPU bus mirrors onto the storage that backs them.

Design
- Both stores are raw arrays: `get`/`set` mask the index and perform no mirroring.
  The `Ppu` applies `canonical_address` before touching `PpuMemory` so that
  palette and nametable aliases land on a single byte.
- No nametable arrangement (horizontal/vertical) is modeled; $2000-$2FFF is
  backed by 4KB of distinct storage.
"#]

/// Size of the PPU address space.
pub const PPU_MEMORY_SIZE: usize = 0x4000;
/// Size of primary OAM.
pub const OAM_SIZE: usize = 0x100;

/// First palette RAM address.
pub const PALETTE_BASE: u16 = 0x3F00;

/// Fold a 14-bit PPU address onto its backing storage.
///
/// - $3000-$3EFF mirrors $2000-$2EFF.
/// - $3F20-$3FFF repeats $3F00-$3F1F.
/// - $3F10/$3F14/$3F18/$3F1C alias $3F00/$3F04/$3F08/$3F0C.
#[inline]
pub fn canonical_address(addr: u16) -> u16 {
    let addr = addr & 0x3FFF;
    match addr {
        0x3000..=0x3EFF => addr - 0x1000,
        0x3F00..=0x3FFF => {
            let mut offset = addr & 0x1F;
            if offset >= 0x10 && offset % 4 == 0 {
                offset -= 0x10;
            }
            PALETTE_BASE | offset
        }
        _ => addr,
    }
}

/// Flat PPU VRAM.
#[derive(Clone)]
pub struct PpuMemory {
    bytes: Box<[u8; PPU_MEMORY_SIZE]>,
}

impl PpuMemory {
    pub fn new() -> Self {
        Self {
            bytes: Box::new([0xFF; PPU_MEMORY_SIZE]),
        }
    }

    #[inline]
    pub fn get(&self, addr: u16) -> u8 {
        self.bytes[addr as usize % PPU_MEMORY_SIZE]
    }

    #[inline]
    pub fn set(&mut self, addr: u16, value: u8) {
        self.bytes[addr as usize % PPU_MEMORY_SIZE] = value;
    }

    /// Copy `data` starting at `start`, truncating at the end of the address space.
    pub fn load(&mut self, start: u16, data: &[u8]) {
        let start = start as usize % PPU_MEMORY_SIZE;
        let len = data.len().min(PPU_MEMORY_SIZE - start);
        self.bytes[start..start + len].copy_from_slice(&data[..len]);
    }

    /// Fill an inclusive range with `value`.
    pub fn fill(&mut self, start: u16, end: u16, value: u8) {
        let start = start as usize % PPU_MEMORY_SIZE;
        let end = (end as usize % PPU_MEMORY_SIZE).max(start);
        self.bytes[start..=end].fill(value);
    }
}

impl Default for PpuMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PpuMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PpuMemory")
            .field("size", &PPU_MEMORY_SIZE)
            .finish()
    }
}

/// Primary OAM: 64 sprites, 4 bytes each (Y, tile, attributes, X).
#[derive(Debug, Clone)]
pub struct OamMemory {
    bytes: [u8; OAM_SIZE],
}

impl OamMemory {
    pub fn new() -> Self {
        Self {
            bytes: [0; OAM_SIZE],
        }
    }

    #[inline]
    pub fn get(&self, idx: u8) -> u8 {
        self.bytes[idx as usize]
    }

    #[inline]
    pub fn set(&mut self, idx: u8, value: u8) {
        self.bytes[idx as usize] = value;
    }

    /// Sprite `n` (0..64) as `[y, tile, attributes, x]`.
    #[inline]
    pub fn sprite(&self, n: usize) -> [u8; 4] {
        let base = (n & 0x3F) * 4;
        [
            self.bytes[base],
            self.bytes[base + 1],
            self.bytes[base + 2],
            self.bytes[base + 3],
        ]
    }

    /// DMA copy: 256 bytes starting at `start`, wrapping inside OAM.
    /// Missing source bytes are written as 0.
    pub fn dma_copy(&mut self, start: u8, data: &[u8]) {
        let mut ptr = start;
        for i in 0..OAM_SIZE {
            self.bytes[ptr as usize] = data.get(i).copied().unwrap_or(0);
            ptr = ptr.wrapping_add(1);
        }
    }
}

impl Default for OamMemory {
    fn default() -> Self {
        Self::new()
    }
}
