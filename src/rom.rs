//! Minimal iNES (v1) splitter.
//!
//! Only separates the header, the optional 512-byte trainer, PRG ROM and
//! CHR ROM so their bytes can be fed to `Bus::load_prg` / `Bus::load_chr`.
//! There is no mapper support: the core maps PRG flat at $8000-$FFFF, so a
//! header naming any mapper other than 0 is accepted with a warning.

use std::path::Path;

use crate::error::{CoreError, CoreResult};

const HEADER_SIZE: usize = 16;
const TRAINER_SIZE: usize = 512;
const PRG_UNIT: usize = 16 * 1024;
const CHR_UNIT: usize = 8 * 1024;
const MAGIC: &[u8; 4] = b"NES\x1A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomImage {
    pub prg: Vec<u8>,
    pub chr: Vec<u8>,
    pub mapper: u8,
    pub has_trainer: bool,
}

impl RomImage {
    pub fn from_bytes(bytes: &[u8]) -> CoreResult<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(CoreError::Truncated {
                expected: HEADER_SIZE,
                actual: bytes.len(),
            });
        }
        if &bytes[0..4] != MAGIC {
            return Err(CoreError::InvalidHeader("missing NES<EOF> magic".into()));
        }

        let prg_size = bytes[4] as usize * PRG_UNIT;
        let chr_size = bytes[5] as usize * CHR_UNIT;
        let flags6 = bytes[6];
        let flags7 = bytes[7];
        let has_trainer = flags6 & 0x04 != 0;
        let mapper = (flags7 & 0xF0) | (flags6 >> 4);

        if prg_size == 0 {
            return Err(CoreError::InvalidHeader("PRG ROM size is zero".into()));
        }

        let prg_start = HEADER_SIZE + if has_trainer { TRAINER_SIZE } else { 0 };
        let chr_start = prg_start + prg_size;
        let expected = chr_start + chr_size;
        if bytes.len() < expected {
            return Err(CoreError::Truncated {
                expected,
                actual: bytes.len(),
            });
        }

        if mapper != 0 {
            log::warn!("iNES header names mapper {mapper}; loading PRG/CHR flat as NROM");
        }
        log::debug!(
            "iNES image: PRG {} KiB, CHR {} KiB, mapper {}, trainer {}",
            prg_size / 1024,
            chr_size / 1024,
            mapper,
            has_trainer
        );

        Ok(Self {
            prg: bytes[prg_start..chr_start].to_vec(),
            chr: bytes[chr_start..expected].to_vec(),
            mapper,
            has_trainer,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}
