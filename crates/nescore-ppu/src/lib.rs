//! NES 2C02 PPU (Picture Processing Unit) emulation.
//!
//! This crate provides a cycle-accurate implementation of the NES PPU,
//! responsible for all graphics rendering.
//!
//! # Overview
//!
//! The PPU operates at 3x the CPU clock rate and generates a 256x240 pixel
//! image. It consists of several subsystems:
//!
//! - **Registers**: Control, Mask, Status, OAM Address, Scroll, Address, Data
//! - **Background rendering**: Nametables, pattern tables, attribute tables
//! - **Sprite rendering**: OAM, sprite evaluation, sprite 0 hit detection
//! - **Palette**: 32-byte palette RAM with mirroring
//!
//! # Timing
//!
//! NTSC timing (the primary target):
//! - Master clock: 21.477272 MHz
//! - PPU clock: 5.369318 MHz (master / 4)
//! - 341 dots per scanline
//! - 262 scanlines per frame
//! - 89,341-89,342 dots per frame (odd frame skip)
//!
//! # Usage
//!
//! The PPU owns its own nametable VRAM and OAM; callers only need to supply
//! CHR ROM/RAM access through a closure backed by the cartridge mapper.
//!
//! ```no_run
//! use nescore_ppu::{Ppu, Mirroring};
//!
//! let mut ppu = Ppu::new(Mirroring::Vertical);
//!
//! // Step the PPU one dot at a time (3 dots per CPU cycle on NTSC). The
//! // second return value is the raw VBlank-set event (scanline 241, dot 1);
//! // an orchestrator combines it with PPUCTRL's NMI-enable bit and its own
//! // VBlank/NMI ledger to decide whether to assert the CPU's NMI line.
//! let (_frame_complete, _vblank_set) = ppu.step_with_chr(|_addr| 0);
//!
//! // Access registers from the CPU's memory map.
//! ppu.write_register(0x2000, 0x80, |_, _| {}); // Enable NMI
//! // $2002 is special: the PPU does not store the VBlank flag, so the
//! // caller supplies it (from the same ledger) through `read_status`.
//! let _status = ppu.read_status(false);
//! ```
//!
//! # Features
//!
//! - `serde`: Enable serialization support for save states

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod background;
mod oam;
mod ppu;
mod registers;
mod scroll;
mod sprites;
mod timing;
mod vram;

pub use background::Background;
pub use oam::{Oam, SecondaryOam, Sprite, SpriteAttributes};
pub use ppu::{FRAME_HEIGHT, FRAME_SIZE, FRAME_WIDTH, Ppu};
pub use registers::{PpuCtrl, PpuMask, PpuStatus};
pub use scroll::{Scroll, ScrollRegisters};
pub use sprites::{SpriteEvaluator, SpriteRenderer};
pub use timing::Timing;
pub use vram::{Mirroring, Vram};
