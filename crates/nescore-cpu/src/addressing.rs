//! 6502 addressing modes and the opcode -> mode lookup table.

/// Addressing mode tag for one opcode.
///
/// `*W` variants distinguish store/RMW instructions that take an
/// *unconditional* dummy read on indexed addresses from load instructions,
/// which only take the extra cycle when a page is actually crossed. The
/// effective-address computation is identical between `Abx`/`AbxW` and
/// friends; only the microstep machine's cycle count differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// Implicit - no operand, the operation itself implies everything.
    Imp,
    /// Accumulator - operates on A directly (ASL A, ROL A, ...).
    Acc,
    /// Immediate - 8-bit constant operand.
    Imm,
    /// Zero Page - 8-bit address in $0000-$00FF.
    Zp0,
    /// Zero Page,X - zero-page address plus X, wraps within the page.
    Zpx,
    /// Zero Page,Y - zero-page address plus Y, wraps within the page.
    Zpy,
    /// Relative - signed 8-bit branch offset.
    Rel,
    /// Absolute - full 16-bit address.
    Abs,
    /// Absolute,X - 16-bit address plus X.
    Abx,
    /// Absolute,Y - 16-bit address plus Y.
    Aby,
    /// Absolute,X, always takes the dummy read (store/RMW).
    AbxW,
    /// Absolute,Y, always takes the dummy read (store/RMW).
    AbyW,
    /// Indirect - only JMP; page-wrap fetch bug applies.
    Ind,
    /// (Zero Page,X) - pointer in zero page indexed by X before the fetch.
    Idx,
    /// (Zero Page),Y - pointer in zero page indexed by Y after the fetch.
    Idy,
    /// (Zero Page),Y, always takes the dummy read (store/RMW).
    IdyW,
}

impl AddressingMode {
    /// Operand size in bytes, not counting the opcode byte.
    #[must_use]
    pub const fn operand_bytes(self) -> u8 {
        match self {
            Self::Imp | Self::Acc => 0,
            Self::Imm | Self::Zp0 | Self::Zpx | Self::Zpy | Self::Rel | Self::Idx | Self::Idy
            | Self::IdyW => 1,
            Self::Abs | Self::Abx | Self::Aby | Self::Ind | Self::AbxW | Self::AbyW => 2,
        }
    }

    /// Base cycle count for this mode alone, excluding the opcode fetch and
    /// any conditional page-cross/branch-taken penalty.
    #[must_use]
    pub const fn base_cycles(self) -> u8 {
        match self {
            Self::Imp | Self::Acc => 0,
            Self::Imm => 1,
            Self::Zp0 => 2,
            Self::Zpx | Self::Zpy => 3,
            Self::Rel => 1,
            Self::Abs => 3,
            Self::Abx | Self::Aby => 3,
            Self::AbxW | Self::AbyW => 4,
            Self::Ind => 4,
            Self::Idx => 5,
            Self::Idy => 4,
            Self::IdyW => 5,
        }
    }

    /// True for the indexed modes where a load instruction pays an extra
    /// cycle only when the index addition crosses a page boundary.
    #[must_use]
    pub const fn has_conditional_page_penalty(self) -> bool {
        matches!(self, Self::Abx | Self::Aby | Self::Idy)
    }
}

/// Opcode addressing-mode lookup table, indexed by opcode byte.
#[rustfmt::skip]
pub static ADDR_MODE_TABLE: [AddressingMode; 256] = {
    use AddressingMode::{
        Abs, Abx, AbxW, Aby, AbyW, Acc, Idx, Idy, IdyW, Imm, Imp, Ind, Rel, Zp0, Zpx, Zpy,
    };
    [
        //  0    1    2    3    4    5    6    7    8    9    A    B    C    D    E    F
        Imp, Idx, Imp, Idx, Zp0, Zp0, Zp0, Zp0, Imp, Imm, Acc, Imm, Abs, Abs, Abs, Abs, // 0
        Rel, Idy, Imp, IdyW,Zpx, Zpx, Zpx, Zpx, Imp, Aby, Imp, AbyW,Abx, Abx, AbxW,AbxW,// 1
        Abs, Idx, Imp, Idx, Zp0, Zp0, Zp0, Zp0, Imp, Imm, Acc, Imm, Abs, Abs, Abs, Abs, // 2
        Rel, Idy, Imp, IdyW,Zpx, Zpx, Zpx, Zpx, Imp, Aby, Imp, AbyW,Abx, Abx, AbxW,AbxW,// 3
        Imp, Idx, Imp, Idx, Zp0, Zp0, Zp0, Zp0, Imp, Imm, Acc, Imm, Abs, Abs, Abs, Abs, // 4
        Rel, Idy, Imp, IdyW,Zpx, Zpx, Zpx, Zpx, Imp, Aby, Imp, AbyW,Abx, Abx, AbxW,AbxW,// 5
        Imp, Idx, Imp, Idx, Zp0, Zp0, Zp0, Zp0, Imp, Imm, Acc, Imm, Ind, Abs, Abs, Abs, // 6
        Rel, Idy, Imp, IdyW,Zpx, Zpx, Zpx, Zpx, Imp, Aby, Imp, AbyW,Abx, Abx, AbxW,AbxW,// 7
        Imm, Idx, Imm, Idx, Zp0, Zp0, Zp0, Zp0, Imp, Imm, Imp, Imm, Abs, Abs, Abs, Abs, // 8
        Rel, IdyW,Imp, IdyW,Zpx, Zpx, Zpy, Zpy, Imp, AbyW,Imp, AbyW,AbxW,AbxW,AbyW,AbyW,// 9
        Imm, Idx, Imm, Idx, Zp0, Zp0, Zp0, Zp0, Imp, Imm, Imp, Imm, Abs, Abs, Abs, Abs, // A
        Rel, Idy, Imp, Idy, Zpx, Zpx, Zpy, Zpy, Imp, Aby, Imp, Aby, Abx, Abx, Aby, Aby, // B
        Imm, Idx, Imm, Idx, Zp0, Zp0, Zp0, Zp0, Imp, Imm, Imp, Imm, Abs, Abs, Abs, Abs, // C
        Rel, Idy, Imp, IdyW,Zpx, Zpx, Zpx, Zpx, Imp, Aby, Imp, AbyW,Abx, Abx, AbxW,AbxW,// D
        Imm, Idx, Imm, Idx, Zp0, Zp0, Zp0, Zp0, Imp, Imm, Imp, Imm, Abs, Abs, Abs, Abs, // E
        Rel, Idy, Imp, IdyW,Zpx, Zpx, Zpx, Zpx, Imp, Aby, Imp, AbyW,Abx, Abx, AbxW,AbxW,// F
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operand_sizes() {
        assert_eq!(AddressingMode::Imp.operand_bytes(), 0);
        assert_eq!(AddressingMode::Acc.operand_bytes(), 0);
        assert_eq!(AddressingMode::Imm.operand_bytes(), 1);
        assert_eq!(AddressingMode::Zp0.operand_bytes(), 1);
        assert_eq!(AddressingMode::Abs.operand_bytes(), 2);
        assert_eq!(AddressingMode::Ind.operand_bytes(), 2);
    }

    #[test]
    fn lda_modes() {
        assert_eq!(ADDR_MODE_TABLE[0xA9], AddressingMode::Imm);
        assert_eq!(ADDR_MODE_TABLE[0xA5], AddressingMode::Zp0);
        assert_eq!(ADDR_MODE_TABLE[0xAD], AddressingMode::Abs);
        assert_eq!(ADDR_MODE_TABLE[0xB1], AddressingMode::Idy);
    }

    #[test]
    fn jmp_modes() {
        assert_eq!(ADDR_MODE_TABLE[0x4C], AddressingMode::Abs);
        assert_eq!(ADDR_MODE_TABLE[0x6C], AddressingMode::Ind);
    }

    #[test]
    fn store_instructions_use_unconditional_penalty_modes() {
        // STA abs,X
        assert_eq!(ADDR_MODE_TABLE[0x9D], AddressingMode::AbxW);
        // STA (zp),Y
        assert_eq!(ADDR_MODE_TABLE[0x91], AddressingMode::IdyW);
    }
}
