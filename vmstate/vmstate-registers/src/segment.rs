//! Hidden (cached) part of a segment register.
//!
//! When a selector is loaded, the CPU copies base, limit and access rights from
//! the referenced descriptor into an invisible cache. The register image stores
//! that cache directly, in the layout a hardware-assisted monitor expects:
//!
//! ```text
//! base:u64  limit:u32  selector:u16  attributes:u16
//! ```

use crate::RegisterFields;
use alloc::vec::Vec;
use bitfield_struct::bitfield;
use vmstate_memory::{Wire, WireReader, WireWriter};

/// Access rights of a cached segment (16 bits).
///
/// Same bit order as descriptor bytes 5–6 with the limit nibble replaced by
/// reserved bits.
#[bitfield(u16, order = Lsb)]
#[derive(Eq, PartialEq)]
pub struct SegmentAttributes {
    /// Bits 0–3: segment type.
    #[bits(4)]
    pub typ: u8,

    /// Bit 4: descriptor type: 1 = code/data, 0 = system.
    pub s: bool,

    /// Bits 5–6: descriptor privilege level.
    #[bits(2)]
    pub dpl: u8,

    /// Bit 7: present.
    pub p: bool,

    #[bits(4, default = 0)]
    _reserved_8_11: u8,

    /// Bit 12: available for system software.
    pub avl: bool,

    /// Bit 13: 64-bit code segment.
    pub l: bool,

    /// Bit 14: default operation size (0 = 16-bit, 1 = 32-bit).
    pub db: bool,

    /// Bit 15: granularity (limit scaled by 4 KiB).
    pub g: bool,
}

vmstate_memory::wire_bits!(SegmentAttributes => u16);

/// One segment register's cached state (16 bytes on the wire).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SegmentCache {
    pub base: u64,
    /// Effective limit in bytes, already scaled by granularity.
    pub limit: u32,
    pub selector: u16,
    pub attributes: SegmentAttributes,
}

impl Wire for SegmentCache {
    const SIZE: usize = 16;

    fn encode(&self, out: &mut [u8]) {
        WireWriter::new(out)
            .put(&self.base)
            .put(&self.limit)
            .put(&self.selector)
            .put(&self.attributes);
    }

    fn decode(bytes: &[u8]) -> Self {
        let mut r = WireReader::new(bytes);
        Self {
            base: r.get(),
            limit: r.get(),
            selector: r.get(),
            attributes: r.get(),
        }
    }
}

impl RegisterFields for SegmentCache {
    fn fields(&self) -> Vec<(&'static str, u64)> {
        let a = self.attributes;
        [
            ("base", self.base),
            ("limit", u64::from(self.limit)),
            ("selector", u64::from(self.selector)),
            ("type", u64::from(a.typ())),
            ("s", u64::from(a.s())),
            ("dpl", u64::from(a.dpl())),
            ("p", u64::from(a.p())),
            ("avl", u64::from(a.avl())),
            ("l", u64::from(a.l())),
            ("db", u64::from(a.db())),
            ("g", u64::from(a.g())),
        ]
        .into()
    }
}
