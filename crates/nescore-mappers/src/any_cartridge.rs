//! Zero-cost cartridge dispatch.
//!
//! [`create_mapper`](crate::create_mapper) returns `Box<dyn Mapper>`, which is
//! the right shape for a host that only ever holds one boxed trait object at
//! a time. [`EmulationState`](../../nescore/struct.EmulationState.html) ticks
//! through every subsystem once per PPU cycle, millions of times a second, so
//! the vtable indirection on every `read_prg`/`read_chr` call is avoided here
//! with a tagged union instead: match once per call, no allocation, no
//! indirect call.
//!
//! `AnyCartridge` carries every mapper this crate implements so the dispatch
//! shape is already proven out for more than one variant, but only mapper 0
//! (NROM) is reachable through [`AnyCartridge::from_rom`] — wiring up the
//! rest to ROM loading is future work once bank-switching mappers are in
//! scope.

use crate::mapper::{Mapper, Mirroring};
use crate::rom::{Rom, RomError};
use crate::{Cnrom, Mmc1, Mmc3, Nrom, Uxrom};

/// A cartridge mapper, dispatched by value instead of through a vtable.
pub enum AnyCartridge {
    Nrom(Nrom),
    Mmc1(Mmc1),
    Uxrom(Uxrom),
    Cnrom(Cnrom),
    Mmc3(Mmc3),
}

impl AnyCartridge {
    /// Build the cartridge variant matching `rom`'s iNES mapper number.
    ///
    /// # Errors
    ///
    /// Returns [`RomError::UnsupportedMapper`] for any mapper number other
    /// than 0 (NROM).
    pub fn from_rom(rom: &Rom) -> Result<Self, RomError> {
        match rom.header.mapper {
            0 => Ok(Self::Nrom(Nrom::new(rom))),
            n => Err(RomError::UnsupportedMapper(n)),
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        match $self {
            Self::Nrom(m) => m.$method($($arg),*),
            Self::Mmc1(m) => m.$method($($arg),*),
            Self::Uxrom(m) => m.$method($($arg),*),
            Self::Cnrom(m) => m.$method($($arg),*),
            Self::Mmc3(m) => m.$method($($arg),*),
        }
    };
}

impl Mapper for AnyCartridge {
    fn read_prg(&self, addr: u16) -> u8 {
        dispatch!(self, read_prg, addr)
    }

    fn write_prg(&mut self, addr: u16, val: u8) {
        dispatch!(self, write_prg, addr, val)
    }

    fn read_chr(&self, addr: u16) -> u8 {
        dispatch!(self, read_chr, addr)
    }

    fn write_chr(&mut self, addr: u16, val: u8) {
        dispatch!(self, write_chr, addr, val)
    }

    fn mirroring(&self) -> Mirroring {
        dispatch!(self, mirroring)
    }

    fn irq_pending(&self) -> bool {
        dispatch!(self, irq_pending)
    }

    fn irq_acknowledge(&mut self) {
        dispatch!(self, irq_acknowledge)
    }

    fn clock(&mut self, cycles: u8) {
        dispatch!(self, clock, cycles)
    }

    fn scanline(&mut self) {
        dispatch!(self, scanline)
    }

    fn ppu_a12_rising(&mut self) {
        dispatch!(self, ppu_a12_rising)
    }

    fn mapper_number(&self) -> u16 {
        dispatch!(self, mapper_number)
    }

    fn mapper_name(&self) -> &'static str {
        dispatch!(self, mapper_name)
    }

    fn has_battery(&self) -> bool {
        dispatch!(self, has_battery)
    }

    fn battery_ram(&self) -> Option<&[u8]> {
        dispatch!(self, battery_ram)
    }

    fn set_battery_ram(&mut self, data: &[u8]) {
        dispatch!(self, set_battery_ram, data)
    }

    fn reset(&mut self) {
        dispatch!(self, reset)
    }
}
