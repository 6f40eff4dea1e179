//! `EmulationState`: the single owning container that drives the whole
//! core one PPU cycle at a time.
//!
//! Every subsystem is owned by value here — there are no cross-component
//! pointers. A [`CycleBus`] borrowing the relevant fields is constructed
//! fresh for the duration of each [`Cpu`] call (`reset`/`tick`); it never
//! outlives that call.

use crate::bus_state::BusState;
use crate::clock::MasterClock;
use crate::dma::{DmcDma, OamDma};
use crate::ledger::VBlankLedger;
use nescore_apu::Apu;
use nescore_cpu::{Bus, Cpu};
use nescore_mappers::{AnyCartridge, Mapper, Rom, RomError};
use nescore_ppu::Ppu;

/// Which timing table the core advances on.
///
/// Only NTSC's frame-length constants are implemented; PAL is a
/// recognized-but-unsupported variant so the dispatch shape can grow into it
/// later without a breaking enum change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimingStandard {
    #[default]
    Ntsc,
    Pal,
}

/// Configuration passed to [`EmulationState::new`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EmulationConfig {
    pub timing: TimingStandard,
}

/// Errors surfaced at the embedding-API boundary. `tick()` itself is
/// infallible once a cartridge is loaded; see module docs.
#[derive(Debug, Clone, Copy, thiserror::Error)]
pub enum EmulationError {
    #[error("no cartridge is loaded")]
    NoCartridgeLoaded,
    #[error("unsupported timing standard")]
    UnsupportedTiming,
    #[error("unsupported mapper number: {0}")]
    UnsupportedMapper(u16),
}

/// Error returned when a host-provided snapshot fails structural validation.
///
/// The core does not implement snapshot serialization itself (cross-emulator
/// save-state compatibility is explicitly out of scope); this type exists so
/// a host that builds its own snapshot format on top of the core's public
/// accessors has a standard error shape to report malformed input with.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SnapshotError {
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(alloc::string::String),
}

#[cfg(not(feature = "std"))]
extern crate alloc;

/// The complete emulation core: every subsystem owned by value, advanced one
/// PPU cycle at a time by [`tick`](Self::tick).
pub struct EmulationState {
    pub cpu: Cpu,
    pub ppu: Ppu,
    pub apu: Apu,
    pub bus_state: BusState,
    mapper: Option<AnyCartridge>,
    clock: MasterClock,
    ledger: VBlankLedger,
    oam_dma: OamDma,
    dmc_dma: DmcDma,
    /// Mirroring last applied to `ppu`'s VRAM, cached so dynamic-mirroring
    /// mappers don't force a VRAM resync on every single access.
    mirroring: nescore_mappers::Mirroring,
}

/// Bridge between the cartridge mapper's `Mirroring` and the PPU crate's own
/// type; the two crates don't share a dependency edge so this is the seam.
#[must_use]
fn to_ppu_mirroring(mirroring: nescore_mappers::Mirroring) -> nescore_ppu::Mirroring {
    match mirroring {
        nescore_mappers::Mirroring::Horizontal => nescore_ppu::Mirroring::Horizontal,
        nescore_mappers::Mirroring::Vertical => nescore_ppu::Mirroring::Vertical,
        nescore_mappers::Mirroring::SingleScreenLower => nescore_ppu::Mirroring::SingleScreenLower,
        nescore_mappers::Mirroring::SingleScreenUpper => nescore_ppu::Mirroring::SingleScreenUpper,
        nescore_mappers::Mirroring::FourScreen => nescore_ppu::Mirroring::FourScreen,
    }
}

impl EmulationState {
    /// Create a power-on core with no cartridge loaded.
    ///
    /// # Errors
    ///
    /// Returns [`EmulationError::UnsupportedTiming`] for any timing standard
    /// other than NTSC.
    pub fn new(config: EmulationConfig) -> Result<Self, EmulationError> {
        if config.timing != TimingStandard::Ntsc {
            return Err(EmulationError::UnsupportedTiming);
        }

        let mirroring = nescore_mappers::Mirroring::Horizontal;
        Ok(Self {
            cpu: Cpu::new(),
            ppu: Ppu::new(to_ppu_mirroring(mirroring)),
            apu: Apu::new(),
            bus_state: BusState::new(),
            mapper: None,
            clock: MasterClock::new(),
            ledger: VBlankLedger::new(),
            oam_dma: OamDma::new(),
            dmc_dma: DmcDma::new(),
            mirroring,
        })
    }

    /// Install a cartridge, replacing any previously loaded one.
    pub fn load_cartridge(&mut self, cartridge: AnyCartridge) {
        self.mirroring = cartridge.mirroring();
        self.ppu.set_mirroring(to_ppu_mirroring(self.mirroring));
        self.mapper = Some(cartridge);
    }

    /// Parse `rom` and install the matching cartridge variant.
    ///
    /// # Errors
    ///
    /// Returns [`EmulationError::UnsupportedMapper`] if `rom`'s mapper number
    /// has no [`AnyCartridge`] variant (only mapper 0/NROM is currently
    /// reachable this way).
    pub fn load_rom(&mut self, rom: &Rom) -> Result<(), EmulationError> {
        let cartridge = AnyCartridge::from_rom(rom).map_err(|err| match err {
            RomError::UnsupportedMapper(n) => EmulationError::UnsupportedMapper(n),
            _ => EmulationError::UnsupportedMapper(rom.header.mapper),
        })?;
        self.load_cartridge(cartridge);
        Ok(())
    }

    /// Remove the currently loaded cartridge, if any.
    pub fn unload_cartridge(&mut self) -> Option<AnyCartridge> {
        self.mapper.take()
    }

    #[must_use]
    pub fn has_cartridge(&self) -> bool {
        self.mapper.is_some()
    }

    /// RESET button semantics: PC from the reset vector, S -= 3, I set;
    /// mapper/PPU/APU partial reset; clocks zeroed.
    ///
    /// # Errors
    ///
    /// Returns [`EmulationError::NoCartridgeLoaded`] if no cartridge is
    /// installed (the reset vector has nowhere to come from).
    pub fn reset(&mut self) -> Result<(), EmulationError> {
        if self.mapper.is_none() {
            return Err(EmulationError::NoCartridgeLoaded);
        }

        self.bus_state.reset();
        self.ppu.reset();
        self.apu.reset();
        self.clock.reset();
        self.ledger.reset();
        self.oam_dma.reset();
        self.dmc_dma.reset();
        if let Some(mapper) = &mut self.mapper {
            mapper.reset();
        }
        self.mirroring = self
            .mapper
            .as_ref()
            .map_or(nescore_mappers::Mirroring::Horizontal, |m| m.mirroring());
        self.ppu.set_mirroring(to_ppu_mirroring(self.mirroring));

        let mut bus = self.cycle_bus(false);
        self.cpu.reset(&mut bus);
        Ok(())
    }

    /// Re-apply VRAM mirroring if the mapper has switched it since last
    /// checked (relevant to mappers beyond NROM that bank-switch mirroring).
    fn sync_mirroring(&mut self) {
        let Some(mapper) = &self.mapper else { return };
        let current = mapper.mirroring();
        if current != self.mirroring {
            self.mirroring = current;
            self.ppu.set_mirroring(to_ppu_mirroring(current));
        }
    }

    fn cycle_bus(&mut self, cpu_cycle_is_odd: bool) -> CycleBus<'_> {
        CycleBus {
            bus_state: &mut self.bus_state,
            ppu: &mut self.ppu,
            apu: &mut self.apu,
            mapper: self
                .mapper
                .as_mut()
                .expect("cycle_bus requires a loaded cartridge"),
            oam_dma: &mut self.oam_dma,
            ledger: &mut self.ledger,
            cycle: self.clock.ppu_cycles(),
            cpu_cycle_is_odd,
        }
    }

    /// Advance the core by exactly one PPU cycle. Returns `true` on the
    /// cycle a frame completes.
    ///
    /// # Errors
    ///
    /// Returns [`EmulationError::NoCartridgeLoaded`] if no cartridge is
    /// installed.
    pub fn tick(&mut self) -> Result<bool, EmulationError> {
        if self.mapper.is_none() {
            return Err(EmulationError::NoCartridgeLoaded);
        }

        let is_cpu_tick = self.clock.advance();
        let cycle = self.clock.ppu_cycles();

        self.sync_mirroring();
        let mapper = self.mapper.as_ref().expect("checked above");
        // `vblank_set` is the PPU's raw, unconditional timing event (scanline
        // 241, dot 1); it carries no opinion about PPUCTRL's NMI-enable bit
        // or about the ledger's own race bookkeeping. The ledger is the only
        // thing allowed to turn it into an actual NMI assertion.
        let (frame_complete, vblank_set) = self.ppu.step_with_chr(|addr| mapper.read_chr(addr));

        if vblank_set {
            self.ledger.record_vblank_set(cycle);
        }
        if self.ppu.scanline() == 261 && self.ppu.dot() == 1 {
            self.ledger.record_vblank_clear(cycle);
        }

        if is_cpu_tick {
            self.mapper
                .as_mut()
                .expect("checked above")
                .clock(1);

            let cpu_cycle_is_odd = self.clock.cpu_cycles() % 2 == 1;

            // `trigger_nmi` only latches `nmi_pending` when the CPU isn't
            // already mid-hijack, so re-asserting every cycle the ledger
            // says NMI is live is safe; the ledger itself only learns the
            // acknowledgement happened once the CPU reports the interrupt
            // sequence actually vectored (cycle 6), below.
            if self.ledger.should_assert_nmi(self.ppu.nmi_enabled(), cycle) {
                self.cpu.trigger_nmi();
            }

            let apu_irq = self.apu.irq_pending();
            let mapper_irq = self.mapper.as_ref().expect("checked above").irq_pending();
            self.cpu.set_irq(apu_irq || mapper_irq);

            self.step_dma_or_cpu(cpu_cycle_is_odd);

            if self.cpu.take_nmi_acknowledged() {
                self.ledger.record_nmi_ack(cycle);
            }

            self.step_apu();
        }

        Ok(frame_complete)
    }

    fn step_dma_or_cpu(&mut self, cpu_cycle_is_odd: bool) {
        if self.dmc_dma.is_active() {
            if let Some(addr) = self.dmc_dma.step() {
                let sample = self.raw_prg_read(addr);
                self.apu.dmc_fill_sample(sample);
            }
            self.cpu.stall = self.cpu.stall.saturating_add(1);
            return;
        }

        if self.oam_dma.is_active() {
            if let Some(addr) = self.oam_dma.pending_read_addr() {
                let value = self.raw_cpu_read(addr);
                self.oam_dma.supply_read(value);
            }
            if let Some(buffer) = self.oam_dma.step() {
                self.ppu.oam_dma(&buffer);
            }
            return;
        }

        let mut bus = self.cycle_bus(cpu_cycle_is_odd);
        let completed_instruction = self.cpu.tick(&mut bus);
        let _ = completed_instruction;

        if self.apu.dmc_needs_sample() {
            self.dmc_dma.request(self.apu.dmc_sample_addr());
        }
    }

    fn step_apu(&mut self) {
        self.apu.clock();
    }

    /// Read a CPU-bus address with full side effects, as the real bus would
    /// during an OAM DMA source read.
    fn raw_cpu_read(&mut self, addr: u16) -> u8 {
        let mut bus = self.cycle_bus(false);
        bus.read(addr)
    }

    fn raw_prg_read(&self, addr: u16) -> u8 {
        self.mapper
            .as_ref()
            .map_or(0, |mapper| mapper.read_prg(addr))
    }

    /// Run `tick()` until a frame completes. Returns PPU cycles elapsed.
    ///
    /// # Errors
    ///
    /// Returns [`EmulationError::NoCartridgeLoaded`] if no cartridge is
    /// installed.
    pub fn emulate_frame(&mut self) -> Result<u64, EmulationError> {
        let start = self.clock.ppu_cycles();
        loop {
            if self.tick()? {
                break;
            }
        }
        Ok(self.clock.ppu_cycles() - start)
    }

    /// Run `tick()` until `n` CPU cycles have elapsed.
    ///
    /// # Errors
    ///
    /// Returns [`EmulationError::NoCartridgeLoaded`] if no cartridge is
    /// installed.
    pub fn emulate_cpu_cycles(&mut self, n: u64) -> Result<(), EmulationError> {
        let target = self.clock.cpu_cycles() + n;
        while self.clock.cpu_cycles() < target {
            self.tick()?;
        }
        Ok(())
    }

    /// Perform a CPU-visible bus read, with side effects.
    ///
    /// # Errors
    ///
    /// Returns [`EmulationError::NoCartridgeLoaded`] if no cartridge is
    /// installed.
    pub fn bus_read(&mut self, addr: u16) -> Result<u8, EmulationError> {
        if self.mapper.is_none() {
            return Err(EmulationError::NoCartridgeLoaded);
        }
        Ok(self.raw_cpu_read(addr))
    }

    /// Perform a CPU-visible bus write, with side effects.
    ///
    /// # Errors
    ///
    /// Returns [`EmulationError::NoCartridgeLoaded`] if no cartridge is
    /// installed.
    pub fn bus_write(&mut self, addr: u16, value: u8) -> Result<(), EmulationError> {
        if self.mapper.is_none() {
            return Err(EmulationError::NoCartridgeLoaded);
        }
        let mut bus = self.cycle_bus(false);
        bus.write(addr, value);
        Ok(())
    }

    /// Read memory without any side effects (debugger path).
    #[must_use]
    pub fn peek_memory(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.bus_state.ram_read(addr),
            0x2000..=0x3FFF => self.bus_state.last_bus_value,
            0x4015 => self.apu.peek_status(),
            0x4000..=0x401F => self.bus_state.last_bus_value,
            0x4020..=0xFFFF => self.raw_prg_read(addr),
        }
    }

    #[must_use]
    pub const fn ppu_cycles(&self) -> u64 {
        self.clock.ppu_cycles()
    }

    #[must_use]
    pub const fn cpu_cycles(&self) -> u64 {
        self.clock.cpu_cycles()
    }

    #[must_use]
    pub const fn ledger(&self) -> &VBlankLedger {
        &self.ledger
    }
}

/// A short-lived [`Bus`] view over the subsystems `EmulationState` owns,
/// constructed fresh for each CPU call. Does not own anything; every field
/// is a borrow.
struct CycleBus<'a> {
    bus_state: &'a mut BusState,
    ppu: &'a mut Ppu,
    apu: &'a mut Apu,
    mapper: &'a mut AnyCartridge,
    oam_dma: &'a mut OamDma,
    ledger: &'a mut VBlankLedger,
    cycle: u64,
    cpu_cycle_is_odd: bool,
}

impl Bus for CycleBus<'_> {
    fn read(&mut self, addr: u16) -> u8 {
        let value = match addr {
            0x0000..=0x1FFF => self.bus_state.ram_read(addr),
            // $2002 (PPUSTATUS) is the one register whose value depends on
            // state outside the PPU: the ledger decides what the VBlank bit
            // reads as at this exact cycle, including the set-cycle race.
            0x2000..=0x3FFF if addr % 8 == 2 => {
                let vblank = self.ledger.record_status_read(self.cycle);
                self.ppu.read_status(vblank)
            }
            0x2000..=0x3FFF => {
                let mapper: &AnyCartridge = &*self.mapper;
                self.ppu.read_register(addr, |chr_addr| mapper.read_chr(chr_addr))
            }
            0x4000..=0x4017 => match addr {
                0x4015 => self.apu.read_status(),
                0x4016 => self.bus_state.read_controller(0),
                0x4017 => self.bus_state.read_controller(1),
                _ => self.bus_state.last_bus_value,
            },
            0x4018..=0x401F => self.bus_state.last_bus_value,
            0x4020..=0xFFFF => self.mapper.read_prg(addr),
        };
        self.bus_state.last_bus_value = value;
        value
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.bus_state.last_bus_value = value;
        match addr {
            0x0000..=0x1FFF => self.bus_state.ram_write(addr, value),
            0x2000..=0x3FFF => {
                let mapper: &mut AnyCartridge = self.mapper;
                self.ppu
                    .write_register(addr, value, |chr_addr, chr_val| mapper.write_chr(chr_addr, chr_val));
            }
            0x4000..=0x4017 => match addr {
                0x4000..=0x4013 | 0x4015 | 0x4017 => self.apu.write(addr, value),
                0x4014 => self.oam_dma.request(value, self.cpu_cycle_is_odd),
                0x4016 => self.bus_state.write_controller_strobe(value),
                _ => {}
            },
            0x4018..=0x401F => {}
            0x4020..=0xFFFF => self.mapper.write_prg(addr, value),
        }
    }

    fn peek(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.bus_state.ram_read(addr),
            0x2000..=0x3FFF => self.bus_state.last_bus_value,
            0x4015 => self.apu.peek_status(),
            0x4000..=0x401F => self.bus_state.last_bus_value,
            0x4020..=0xFFFF => self.mapper.read_prg(addr),
        }
    }
}
