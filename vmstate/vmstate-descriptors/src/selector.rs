//! # Segment selectors
//!
//! ```text
//!  15            3 2  1  0
//! +----------------+--+----+
//! |   Index[12:0]  |TI| RPL|
//! +----------------+--+----+  (TI=0 → GDT, TI=1 → LDT; RPL=0..3)
//! ```

use crate::privilege::Rpl;
use bitfield_struct::bitfield;

/// Which descriptor table a selector addresses.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u8)]
pub enum Table {
    /// Global Descriptor Table
    Gdt = 0,
    /// Local Descriptor Table
    Ldt = 1,
}

impl Table {
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        if bits == 0 { Self::Gdt } else { Self::Ldt }
    }

    #[inline]
    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self as u8
    }
}

/// 16-bit selector encoding (index/TI/RPL).
#[bitfield(u16)]
#[derive(Eq, PartialEq)]
pub struct SegmentSelector {
    /// Requested Privilege Level (bits 0..1).
    #[bits(2)]
    pub rpl: Rpl,
    /// Table Indicator (bit 2): 0 = GDT, 1 = LDT.
    #[bits(1)]
    pub ti: Table,
    /// Descriptor index (bits 3..15).
    #[bits(13)]
    pub index: u16,
}

impl SegmentSelector {
    /// A GDT selector for entry `index`.
    #[inline]
    #[must_use]
    pub const fn gdt(index: u16, rpl: Rpl) -> Self {
        Self::new()
            .with_index(index & 0x1fff)
            .with_ti(Table::Gdt)
            .with_rpl(rpl)
    }

    /// Byte offset of the referenced entry within its table.
    #[inline]
    #[must_use]
    pub const fn table_offset(self) -> u16 {
        self.into_bits() & !0b111
    }

    #[inline]
    #[must_use]
    pub const fn is_local(self) -> bool {
        matches!(self.ti(), Table::Ldt)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn user_code_selector() {
        let sel = SegmentSelector::gdt(3, Rpl::Ring3);
        assert_eq!(sel.into_bits(), 0x1b);
        assert_eq!(sel.table_offset(), 0x18);
        assert!(!sel.is_local());
        assert!(SegmentSelector::from_bits(0x0c).is_local());
    }
}
