//! Master clock: the single PPU-cycle counter the whole emulation core is
//! driven from.
//!
//! The real NES divides one master clock by 4 to get the PPU clock and by 12
//! to get the CPU/APU clock — a ratio of 3 PPU cycles per CPU/APU cycle.
//! `MasterClock` counts PPU cycles directly (`EmulationState::tick` always
//! advances exactly one) and exposes the derived "is this a CPU cycle"
//! query the divide-by-3 ratio implies.

/// NTSC dots per scanline.
pub const DOTS_PER_SCANLINE: u64 = 341;
/// NTSC scanlines per frame.
pub const SCANLINES_PER_FRAME: u64 = 262;
/// NTSC dots per frame on an even frame (no skipped dot).
pub const DOTS_PER_FRAME: u64 = DOTS_PER_SCANLINE * SCANLINES_PER_FRAME;
/// PPU cycles per CPU/APU cycle (divide-by-3).
pub const PPU_CYCLES_PER_CPU_CYCLE: u64 = 3;

/// Counts elapsed PPU cycles since power-on and derives CPU-cycle cadence
/// from them.
///
/// This is deliberately a thin counter: scanline/dot/frame position is owned
/// by the PPU's own timing model (it already accounts for the odd-frame
/// skipped dot), so `MasterClock` does not attempt to duplicate that — it
/// only tracks the raw cycle count and the divide-by-3 CPU/APU cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MasterClock {
    /// Total PPU cycles elapsed since the clock was last reset.
    ppu_cycles: u64,
}

impl MasterClock {
    /// Create a clock at cycle 0.
    #[must_use]
    pub const fn new() -> Self {
        Self { ppu_cycles: 0 }
    }

    /// Reset the clock to cycle 0.
    pub fn reset(&mut self) {
        self.ppu_cycles = 0;
    }

    /// Total PPU cycles elapsed.
    #[must_use]
    pub const fn ppu_cycles(self) -> u64 {
        self.ppu_cycles
    }

    /// Total CPU/APU cycles elapsed (PPU cycles divided by 3).
    #[must_use]
    pub const fn cpu_cycles(self) -> u64 {
        self.ppu_cycles / PPU_CYCLES_PER_CPU_CYCLE
    }

    /// Advance the clock by one PPU cycle.
    ///
    /// Returns `true` if this cycle is also a CPU/APU cycle (every third PPU
    /// cycle, starting with the first).
    pub fn advance(&mut self) -> bool {
        self.ppu_cycles += 1;
        self.is_cpu_tick()
    }

    /// Whether the *current* cycle count lands on a CPU/APU tick.
    #[must_use]
    pub const fn is_cpu_tick(self) -> bool {
        self.ppu_cycles % PPU_CYCLES_PER_CPU_CYCLE == 0
    }
}
