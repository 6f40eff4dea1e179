//! PPU register definitions (PPUCTRL, PPUMASK, PPUSTATUS)
//!
//! The NES PPU exposes 8 memory-mapped registers at CPU addresses $2000-$2007.
//! This module defines the bit flags and behavior for the control/status registers.

use bitflags::bitflags;

bitflags! {
    /// PPUCTRL ($2000) - Write Only
    ///
    /// Controls PPU operation and rendering behavior.
    ///
    /// # Bit Layout
    ///
    /// ```text
    /// 7  bit  0
    /// ---- ----
    /// VPHB SINN
    /// |||| ||||
    /// |||| ||++- Base nametable address
    /// |||| ||    (0 = $2000; 1 = $2400; 2 = $2800; 3 = $2C00)
    /// |||| |+--- VRAM address increment per CPU read/write of PPUDATA
    /// |||| |     (0: add 1, going across; 1: add 32, going down)
    /// |||| +---- Sprite pattern table address for 8×8 sprites
    /// ||||       (0: $0000; 1: $1000; ignored in 8×16 mode)
    /// |||+------ Background pattern table address (0: $0000; 1: $1000)
    /// ||+------- Sprite size (0: 8×8 pixels; 1: 8×16 pixels)
    /// |+-------- PPU master/slave select (not used on NES)
    /// +--------- Generate an NMI at the start of vblank (0: off; 1: on)
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PpuCtrl: u8 {
        /// Nametable X bit (bit 0)
        const NAMETABLE_X = 0b0000_0001;
        /// Nametable Y bit (bit 1)
        const NAMETABLE_Y = 0b0000_0010;
        /// VRAM address increment (0: +1 across, 1: +32 down)
        const VRAM_INCREMENT = 0b0000_0100;
        /// Sprite pattern table address (8×8 mode only)
        const SPRITE_TABLE = 0b0000_1000;
        /// Background pattern table address
        const BG_TABLE = 0b0001_0000;
        /// Sprite size (0: 8×8, 1: 8×16)
        const SPRITE_SIZE = 0b0010_0000;
        /// Master/slave select (unused on NES)
        const MASTER_SLAVE = 0b0100_0000;
        /// Generate NMI at VBlank
        const NMI_ENABLE = 0b1000_0000;
    }
}

impl PpuCtrl {
    /// Get nametable base address ($2000, $2400, $2800, $2C00)
    #[inline]
    pub fn nametable_addr(self) -> u16 {
        0x2000 | ((self.bits() & 0x03) as u16) << 10
    }

    /// Get VRAM address increment (1 or 32)
    #[inline]
    pub fn vram_increment(self) -> u16 {
        if self.contains(Self::VRAM_INCREMENT) {
            32
        } else {
            1
        }
    }

    /// Get sprite pattern table base address ($0000 or $1000)
    #[inline]
    pub fn sprite_table_addr(self) -> u16 {
        if self.contains(Self::SPRITE_TABLE) {
            0x1000
        } else {
            0x0000
        }
    }

    /// Get background pattern table base address ($0000 or $1000)
    #[inline]
    pub fn bg_table_addr(self) -> u16 {
        if self.contains(Self::BG_TABLE) {
            0x1000
        } else {
            0x0000
        }
    }

    /// Get sprite height (8 or 16)
    #[inline]
    pub fn sprite_height(self) -> u8 {
        if self.contains(Self::SPRITE_SIZE) {
            16
        } else {
            8
        }
    }

    /// Check if NMI should be generated at VBlank
    #[inline]
    pub fn nmi_enabled(self) -> bool {
        self.contains(Self::NMI_ENABLE)
    }
}

bitflags! {
    /// PPUMASK ($2001) - Write Only
    ///
    /// Controls rendering enable/disable and color effects.
    ///
    /// # Bit Layout
    ///
    /// ```text
    /// 7  bit  0
    /// ---- ----
    /// BGRs bMmG
    /// |||| ||||
    /// |||| |||+- Greyscale (0: normal color, 1: greyscale)
    /// |||| ||+-- Show background in leftmost 8 pixels (0: hide, 1: show)
    /// |||| |+--- Show sprites in leftmost 8 pixels (0: hide, 1: show)
    /// |||| +---- Show background
    /// |||+------ Show sprites
    /// ||+------- Emphasize red (green on PAL)
    /// |+-------- Emphasize green (red on PAL)
    /// +--------- Emphasize blue
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PpuMask: u8 {
        /// Greyscale mode
        const GREYSCALE = 0b0000_0001;
        /// Show background in leftmost 8 pixels
        const SHOW_BG_LEFT = 0b0000_0010;
        /// Show sprites in leftmost 8 pixels
        const SHOW_SPRITES_LEFT = 0b0000_0100;
        /// Show background
        const SHOW_BG = 0b0000_1000;
        /// Show sprites
        const SHOW_SPRITES = 0b0001_0000;
        /// Emphasize red (NTSC) / green (PAL)
        const EMPHASIZE_RED = 0b0010_0000;
        /// Emphasize green (NTSC) / red (PAL)
        const EMPHASIZE_GREEN = 0b0100_0000;
        /// Emphasize blue
        const EMPHASIZE_BLUE = 0b1000_0000;
    }
}

impl PpuMask {
    /// Check if rendering is enabled (background or sprites)
    #[inline]
    pub fn rendering_enabled(self) -> bool {
        self.intersects(Self::SHOW_BG | Self::SHOW_SPRITES)
    }

    /// Check if background rendering is enabled
    #[inline]
    pub fn show_background(self) -> bool {
        self.contains(Self::SHOW_BG)
    }

    /// Check if sprite rendering is enabled
    #[inline]
    pub fn show_sprites(self) -> bool {
        self.contains(Self::SHOW_SPRITES)
    }

    /// Check if leftmost 8 pixels should show background
    #[inline]
    pub fn show_bg_left(self) -> bool {
        self.contains(Self::SHOW_BG_LEFT)
    }

    /// Check if leftmost 8 pixels should show sprites
    #[inline]
    pub fn show_sprites_left(self) -> bool {
        self.contains(Self::SHOW_SPRITES_LEFT)
    }
}

bitflags! {
    /// PPUSTATUS ($2002) - Read Only
    ///
    /// Sprite-overflow and sprite-0-hit, the two status bits the PPU stores
    /// directly. The VBlank bit is deliberately absent: it is not PPU state
    /// at all but a pure function of event timestamps recomputed by the
    /// orchestrator on every $2002 read (see `EmulationState`'s ledger).
    /// Storing a mutable VBlank bit here was the bug class this type used to
    /// have to route every read/NMI-enable check through a special case.
    ///
    /// # Bit Layout
    ///
    /// ```text
    /// 7  bit  0
    /// ---- ----
    /// -SO- ----
    /// |||| ||||
    /// |||+-++++- Open bus (returns last value written to any PPU register)
    /// ||+------- Sprite overflow (more than 8 sprites on a scanline)
    /// |+-------- Sprite 0 hit (sprite 0 overlaps background)
    /// +--------- Vertical blank flag (supplied externally, not stored)
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PpuStatus: u8 {
        /// Sprite overflow flag (hardware bug)
        const SPRITE_OVERFLOW = 0b0010_0000;
        /// Sprite 0 hit flag
        const SPRITE_ZERO_HIT = 0b0100_0000;
    }
}

impl PpuStatus {
    /// Check if sprite 0 hit occurred
    #[inline]
    pub fn sprite_zero_hit(self) -> bool {
        self.contains(Self::SPRITE_ZERO_HIT)
    }

    /// Check if sprite overflow occurred
    #[inline]
    pub fn sprite_overflow(self) -> bool {
        self.contains(Self::SPRITE_OVERFLOW)
    }

    /// Set sprite 0 hit flag
    #[inline]
    pub fn set_sprite_zero_hit(&mut self) {
        self.insert(Self::SPRITE_ZERO_HIT);
    }

    /// Set sprite overflow flag
    #[inline]
    pub fn set_sprite_overflow(&mut self) {
        self.insert(Self::SPRITE_OVERFLOW);
    }

    /// Clear sprite flags (sprite 0 hit and overflow)
    #[inline]
    pub fn clear_sprite_flags(&mut self) {
        self.remove(Self::SPRITE_ZERO_HIT | Self::SPRITE_OVERFLOW);
    }
}
