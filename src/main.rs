//! nestrace: run an iNES ROM on the core and print one nestest-format line
//! per executed instruction.
//!
//! ```text
//! nestrace nestest.nes --entry C000 --instructions 8991 > mine.log
//! diff mine.log nestest.log
//! ```

use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nescore::{Nes, PowerUpConfig, PowerUpConvention, RomImage};

#[derive(Debug, Parser)]
#[command(name = "nestrace", about = "Trace NES CPU execution in nestest log format")]
struct Args {
    /// iNES ROM image.
    #[arg(value_name = "FILE")]
    rom: PathBuf,

    /// Start address (hex, e.g. C000) instead of the reset vector.
    #[arg(short, long, value_parser = parse_hex_u16)]
    entry: Option<u16>,

    /// Number of instructions to execute.
    #[arg(short = 'n', long, default_value_t = 8991)]
    instructions: usize,

    /// Use the hardware power-up state (P=$34, RAM filled with $FF).
    #[arg(long)]
    hardware: bool,

    /// Omit the PPU:scanline,dot column.
    #[arg(long)]
    no_ppu_columns: bool,

    /// Save the final frame buffer as PNG.
    #[cfg(feature = "screenshot")]
    #[arg(long, value_name = "PNG")]
    screenshot: Option<PathBuf>,
}

fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let digits = s
        .trim_start_matches('$')
        .trim_start_matches("0x")
        .trim_start_matches("0X");
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid hex address {s:?}: {e}"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let image = RomImage::load(&args.rom)
        .with_context(|| format!("failed to load ROM {}", args.rom.display()))?;

    let config = PowerUpConfig {
        convention: if args.hardware {
            PowerUpConvention::Hardware
        } else {
            PowerUpConvention::Nestest
        },
        entry_point: args.entry,
    };

    let mut nes = Nes::new(config);
    nes.load_image(&image);
    nes.power_up();
    nes.enable_trace(!args.no_ppu_columns);

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for _ in 0..args.instructions {
        nes.tick_instruction();
        for line in nes.take_trace() {
            writeln!(out, "{line}").context("failed to write trace")?;
        }
        if nes.cpu().is_halted() {
            eprintln!(
                "CPU jammed at ${:04X} after {} cycles",
                nes.cpu_registers().pc,
                nes.cpu().total_cycles()
            );
            break;
        }
    }
    out.flush().context("failed to flush trace")?;

    #[cfg(feature = "screenshot")]
    if let Some(path) = &args.screenshot {
        nes.frame_buffer()
            .save_png(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(())
}
