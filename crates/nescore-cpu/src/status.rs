//! CPU status register (P) flags.
//!
//! ```text
//! 7  6  5  4  3  2  1  0
//! N  V  U  B  D  I  Z  C
//! ```
//!
//! Bit 5 (U, "unused") has no hardware function but always reads back as 1;
//! bit 4 (B) is not a real latch in the processor, only a value that PHP and
//! the interrupt sequence choose when pushing P to the stack.

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct Status: u8 {
        /// Carry.
        const C = 1 << 0;
        /// Zero.
        const Z = 1 << 1;
        /// Interrupt disable (masks IRQ, not NMI).
        const I = 1 << 2;
        /// Decimal mode. Writable, no effect on arithmetic on the 2A03.
        const D = 1 << 3;
        /// Break marker, pushed as 1 by PHP/BRK and 0 by IRQ/NMI.
        const B = 1 << 4;
        /// Always reads as 1.
        const U = 1 << 5;
        /// Overflow.
        const V = 1 << 6;
        /// Negative.
        const N = 1 << 7;
    }
}

impl Status {
    /// Power-on value: `0x34` (I and U set, B set per spec.md §6 power-on state).
    pub const POWER_ON: Self = Self::I.union(Self::U).union(Self::B);

    /// Flags PLP/RTI actually load; B and U are not real registers and are
    /// never affected by a pull.
    pub const PULL_MASK: Self = Self::C
        .union(Self::Z)
        .union(Self::I)
        .union(Self::D)
        .union(Self::V)
        .union(Self::N);

    #[must_use]
    pub const fn new() -> Self {
        Self::POWER_ON
    }

    #[inline]
    pub fn set_zn(&mut self, value: u8) {
        self.set_flag(Self::Z, value == 0);
        self.set_flag(Self::N, value & 0x80 != 0);
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Self, value: bool) {
        if value {
            *self |= flag;
        } else {
            *self &= !flag;
        }
    }

    /// Byte pushed to the stack for PHP/BRK/IRQ/NMI. `brk` selects the B bit;
    /// U is always forced to 1 regardless of what software last wrote there.
    #[inline]
    #[must_use]
    pub const fn to_stack_byte(self, brk: bool) -> u8 {
        let mut value = (self.bits() | Self::U.bits()) & !Self::B.bits();
        if brk {
            value |= Self::B.bits();
        }
        value
    }

    /// Status register loaded by PLP/RTI. B and U are discarded from the
    /// pulled byte; U always reads 1, B has no storage at all.
    #[inline]
    #[must_use]
    pub fn from_stack_byte(value: u8) -> Self {
        (Self::from_bits_truncate(value) & Self::PULL_MASK) | Self::U
    }
}
