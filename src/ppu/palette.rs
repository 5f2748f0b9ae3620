//! NTSC master palette: 64 RGB entries indexed by the 6-bit values stored in
//! palette RAM.

use crate::framebuffer::ColorComponent;

pub const MASTER_PALETTE: [ColorComponent; 64] = [
    rgb(0x75, 0x75, 0x75), rgb(0x27, 0x1B, 0x8F), rgb(0x00, 0x00, 0xAB), rgb(0x47, 0x00, 0x9F),
    rgb(0x8F, 0x00, 0x77), rgb(0xAB, 0x00, 0x13), rgb(0xA7, 0x00, 0x00), rgb(0x7F, 0x0B, 0x00),
    rgb(0x43, 0x2F, 0x00), rgb(0x00, 0x47, 0x00), rgb(0x00, 0x51, 0x00), rgb(0x00, 0x3F, 0x17),
    rgb(0x1B, 0x3F, 0x5F), rgb(0x00, 0x00, 0x00), rgb(0x00, 0x00, 0x00), rgb(0x00, 0x00, 0x00),
    rgb(0xBC, 0xBC, 0xBC), rgb(0x00, 0x73, 0xEF), rgb(0x23, 0x3B, 0xEF), rgb(0x83, 0x00, 0xF3),
    rgb(0xBF, 0x00, 0xBF), rgb(0xE7, 0x00, 0x5B), rgb(0xDB, 0x2B, 0x00), rgb(0xCB, 0x4F, 0x0F),
    rgb(0x8B, 0x73, 0x00), rgb(0x00, 0x97, 0x00), rgb(0x00, 0xAB, 0x00), rgb(0x00, 0x93, 0x3B),
    rgb(0x00, 0x83, 0x8B), rgb(0x00, 0x00, 0x00), rgb(0x00, 0x00, 0x00), rgb(0x00, 0x00, 0x00),
    rgb(0xFF, 0xFF, 0xFF), rgb(0x3F, 0xBF, 0xFF), rgb(0x5F, 0x97, 0xFF), rgb(0xA7, 0x8B, 0xFD),
    rgb(0xF7, 0x7B, 0xFF), rgb(0xFF, 0x77, 0xB7), rgb(0xFF, 0x77, 0x63), rgb(0xFF, 0x9B, 0x3B),
    rgb(0xF3, 0xBF, 0x3F), rgb(0x83, 0xD3, 0x13), rgb(0x4F, 0xDF, 0x4B), rgb(0x58, 0xF8, 0x98),
    rgb(0x00, 0xEB, 0xDB), rgb(0x00, 0x00, 0x00), rgb(0x00, 0x00, 0x00), rgb(0x00, 0x00, 0x00),
    rgb(0xFF, 0xFF, 0xFF), rgb(0xAB, 0xE7, 0xFF), rgb(0xC7, 0xD7, 0xFF), rgb(0xD7, 0xCB, 0xFF),
    rgb(0xFF, 0xC7, 0xFF), rgb(0xFF, 0xC7, 0xDB), rgb(0xFF, 0xBF, 0xB3), rgb(0xFF, 0xDB, 0xAB),
    rgb(0xFF, 0xE7, 0xA3), rgb(0xE3, 0xFF, 0xA3), rgb(0xAB, 0xF3, 0xBF), rgb(0xB3, 0xFF, 0xCF),
    rgb(0x9F, 0xFF, 0xF3), rgb(0x00, 0x00, 0x00), rgb(0x00, 0x00, 0x00), rgb(0x00, 0x00, 0x00),
];

const fn rgb(r: u8, g: u8, b: u8) -> ColorComponent {
    ColorComponent { r, g, b }
}

/// Resolve a palette RAM value (only the low 6 bits are significant).
#[inline]
pub fn lookup(index: u8) -> ColorComponent {
    MASTER_PALETTE[(index & 0x3F) as usize]
}
