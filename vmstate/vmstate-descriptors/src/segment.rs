//! # Code, data and system segment descriptors
//!
//! ```text
//! 63      56 55 54 53 52 51    48 47 46 45 44 43   40 39      32
//! +---------+--+--+--+---+--------+--+-----+--+-------+---------+
//! | base_hi |G |DB|L |AVL|limit_hi|P | DPL |S | type  | base_mid|
//! +---------+--+--+--+---+--------+--+-----+--+-------+---------+
//! 31                    16 15                                  0
//! +-----------------------+------------------------------------+
//! |        base_lo        |              limit_lo              |
//! +-----------------------+------------------------------------+
//! ```
//!
//! A TSS (or LDT) descriptor is a segment descriptor with `S = 0`. In long mode
//! it uses the 16-byte [`Extended`] form to carry a 64-bit base.

use crate::composite::{
    BaseParts, LimitParts, Width, join_base, join_limit, scale_limit, split_base, split_limit,
};
use crate::extension::Extended;
use crate::kind;
use crate::privilege::Dpl;
use bitfield_struct::bitfield;

/// Raw 8-byte segment descriptor.
#[bitfield(u64)]
#[derive(Eq, PartialEq)]
pub struct SegmentDescriptor {
    pub limit_lo: u16, // [15:0]
    pub base_lo: u16,  // [31:16]
    pub base_mid: u8,  // [39:32]
    #[bits(4)]
    pub typ: u8, // [43:40]
    pub s: bool,       // [44] 1 = code/data, 0 = system
    #[bits(2)]
    pub dpl: Dpl, // [46:45]
    pub p: bool,       // [47]
    #[bits(4)]
    pub limit_hi: u8, // [51:48]
    pub avl: bool,     // [52]
    pub l: bool,       // [53] 64-bit code
    pub db: bool,      // [54] default operation size
    pub g: bool,       // [55] granularity
    pub base_hi: u8,   // [63:56]
}

vmstate_memory::wire_bits!(SegmentDescriptor => u64);

/// Semantic description of a segment descriptor.
///
/// `limit` is the raw 20-bit limit; see [`SegmentDescriptor::effective_limit`]
/// for the scaled byte limit.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SegmentParams {
    pub base: u64,
    pub limit: u32,
    pub typ: u8,
    /// `S`: code/data (`true`) or system (`false`).
    pub s: bool,
    pub dpl: Dpl,
    pub present: bool,
    pub avl: bool,
    pub long_mode: bool,
    pub default_size: bool,
    pub granularity: bool,
}

impl SegmentDescriptor {
    /// Pack `params`. The 8-byte form keeps the low 32 bits of the base.
    #[must_use]
    pub const fn from_params(params: &SegmentParams) -> Self {
        let base = split_base(params.base, Width::Legacy);
        let limit = split_limit(params.limit);
        Self::new()
            .with_limit_lo(limit.low)
            .with_base_lo(base.low)
            .with_base_mid(base.mid)
            .with_typ(params.typ & 0xf)
            .with_s(params.s)
            .with_dpl(params.dpl)
            .with_p(params.present)
            .with_limit_hi(limit.high)
            .with_avl(params.avl)
            .with_l(params.long_mode)
            .with_db(params.default_size)
            .with_g(params.granularity)
            .with_base_hi(base.high)
    }

    #[must_use]
    pub const fn params(self) -> SegmentParams {
        SegmentParams {
            base: self.base(),
            limit: self.limit(),
            typ: self.typ(),
            s: self.s(),
            dpl: self.dpl(),
            present: self.p(),
            avl: self.avl(),
            long_mode: self.l(),
            default_size: self.db(),
            granularity: self.g(),
        }
    }

    /// The all-zero descriptor required in GDT slot 0.
    #[must_use]
    pub const fn null() -> Self {
        Self::new()
    }

    /// Flat 4 GiB execute/read code segment.
    ///
    /// In long mode the segment is 64-bit (`L = 1, DB = 0`), otherwise 32-bit
    /// (`L = 0, DB = 1`).
    #[must_use]
    pub const fn flat_code(dpl: Dpl, long_mode: bool) -> Self {
        Self::from_params(&SegmentParams {
            base: 0,
            limit: 0xf_ffff,
            typ: kind::CODE,
            s: true,
            dpl,
            present: true,
            avl: false,
            long_mode,
            default_size: !long_mode,
            granularity: true,
        })
    }

    /// Flat 4 GiB read/write data segment.
    #[must_use]
    pub const fn flat_data(dpl: Dpl) -> Self {
        Self::from_params(&SegmentParams {
            base: 0,
            limit: 0xf_ffff,
            typ: kind::DATA,
            s: true,
            dpl,
            present: true,
            avl: false,
            long_mode: false,
            default_size: true,
            granularity: true,
        })
    }

    /// 8-byte TSS descriptor (`S = 0`, type `0b1001 | busy << 1`, byte granular).
    #[must_use]
    pub const fn tss(base: u64, limit: u32, busy: bool, dpl: Dpl) -> Self {
        Self::from_params(&SegmentParams {
            base,
            limit,
            typ: kind::tss(busy),
            s: false,
            dpl,
            present: true,
            avl: false,
            long_mode: false,
            default_size: false,
            granularity: false,
        })
    }

    #[must_use]
    pub const fn base(self) -> u64 {
        join_base(self.base_parts(0), Width::Legacy)
    }

    /// Raw 20-bit limit.
    #[must_use]
    pub const fn limit(self) -> u32 {
        join_limit(LimitParts {
            low: self.limit_lo(),
            high: self.limit_hi(),
        })
    }

    /// Limit in bytes, scaled by 4 KiB when `G` is set.
    #[must_use]
    pub const fn effective_limit(self) -> u32 {
        scale_limit(self.limit(), self.g())
    }

    #[must_use]
    pub const fn is_system(self) -> bool {
        !self.s()
    }

    const fn base_parts(self, upper: u32) -> BaseParts {
        BaseParts {
            low: self.base_lo(),
            mid: self.base_mid(),
            high: self.base_hi(),
            upper,
        }
    }
}

impl Extended<SegmentDescriptor> {
    /// Pack `params` into the 16-byte form, keeping the full 64-bit base.
    #[must_use]
    pub const fn segment(params: &SegmentParams) -> Self {
        Self::new(
            SegmentDescriptor::from_params(params),
            split_base(params.base, Width::Long).upper,
        )
    }

    /// 16-byte TSS descriptor.
    #[must_use]
    pub const fn tss64(base: u64, limit: u32, busy: bool, dpl: Dpl) -> Self {
        Self::new(
            SegmentDescriptor::tss(base, limit, busy, dpl),
            split_base(base, Width::Long).upper,
        )
    }

    #[must_use]
    pub const fn params(&self) -> SegmentParams {
        let mut params = self.payload.params();
        params.base = self.base();
        params
    }

    #[must_use]
    pub const fn base(&self) -> u64 {
        join_base(self.payload.base_parts(self.tail.upper()), Width::Long)
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.payload.limit()
    }

    #[must_use]
    pub const fn effective_limit(&self) -> u32 {
        self.payload.effective_limit()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;
    use vmstate_memory::Wire;

    #[test]
    fn flat_segments_match_known_encodings() {
        assert_eq!(SegmentDescriptor::null().into_bits(), 0);
        assert_eq!(
            SegmentDescriptor::flat_code(Dpl::Ring0, true).into_bits(),
            0x00af_9b00_0000_ffff
        );
        assert_eq!(
            SegmentDescriptor::flat_code(Dpl::Ring3, false).into_bits(),
            0x00cf_fb00_0000_ffff
        );
        assert_eq!(
            SegmentDescriptor::flat_data(Dpl::Ring0).into_bits(),
            0x00cf_9300_0000_ffff
        );
    }

    #[test]
    fn busy_tss_descriptor() {
        let desc = SegmentDescriptor::tss(0x0012_3456, 103, true, Dpl::Ring0);
        assert_eq!(desc.into_bits(), 0x0000_8b12_3456_0067);
        assert!(desc.is_system());
        assert_eq!(desc.base(), 0x0012_3456);
        assert_eq!(desc.effective_limit(), 103);
    }

    #[test]
    fn tss64_places_upper_base_in_tail() {
        let desc = Extended::tss64(0xffff_8000_1234_5678, 103, false, Dpl::Ring0);
        let bytes = desc.to_bytes();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[8..12], &[0x00, 0x80, 0xff, 0xff]);
        assert_eq!(&bytes[12..], &[0; 4]);
        assert_eq!(desc.payload.typ(), kind::TSS_AVAILABLE);
        assert_eq!(desc.base(), 0xffff_8000_1234_5678);
        assert_eq!(Extended::<SegmentDescriptor>::decode(&bytes), desc);
    }

    proptest! {
        #[test]
        fn legacy_params_round_trip(
            base in any::<u32>(),
            limit in 0u32..=0xf_ffff,
            typ in 0u8..16,
            dpl in 0u8..4,
            flags in any::<[bool; 6]>(),
        ) {
            let params = SegmentParams {
                base: u64::from(base),
                limit,
                typ,
                s: flags[0],
                dpl: Dpl::from_bits(dpl),
                present: flags[1],
                avl: flags[2],
                long_mode: flags[3],
                default_size: flags[4],
                granularity: flags[5],
            };
            let desc = SegmentDescriptor::from_params(&params);
            prop_assert_eq!(desc.params(), params);
            prop_assert_eq!(SegmentDescriptor::decode(&desc.to_bytes()), desc);
        }

        #[test]
        fn long_base_round_trips(base in any::<u64>(), limit in 0u32..=0xf_ffff) {
            let desc = Extended::tss64(base, limit, true, Dpl::Ring0);
            prop_assert_eq!(desc.base(), base);
            prop_assert_eq!(desc.limit(), limit);
        }
    }
}
