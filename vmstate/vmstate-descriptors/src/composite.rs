//! # Composite fields
//!
//! Descriptor bases, limits and gate offsets are scattered across several
//! non-adjacent bit ranges. The helpers here split a value into its pieces and
//! join them back; `join(split(x)) == x` for every value representable at the
//! given [`Width`].
//!
//! ```text
//! base   = base_lo[15:0] | base_mid[23:16] | base_hi[31:24] | upper[63:32]
//! limit  = limit_lo[15:0] | limit_hi[19:16]
//! offset = offset_lo[15:0] | offset_hi[31:16] | upper[63:32]
//! ```
//!
//! The `upper` parts only exist in the 16-byte ([`Width::Long`]) form, where
//! they live in the extension tail.

/// Descriptor width: 8-byte legacy form or 16-byte long-mode form.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Width {
    Legacy,
    Long,
}

impl Width {
    /// Encoded size of a system descriptor of this width.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Legacy => 8,
            Self::Long => 16,
        }
    }

    /// Largest base or offset representable at this width.
    #[must_use]
    pub const fn max_address(self) -> u64 {
        match self {
            Self::Legacy => 0xffff_ffff,
            Self::Long => u64::MAX,
        }
    }
}

/// Maximum raw (unscaled) segment limit.
pub const LIMIT_MAX: u32 = 0xf_ffff;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BaseParts {
    pub low: u16,
    pub mid: u8,
    pub high: u8,
    pub upper: u32,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct LimitParts {
    pub low: u16,
    /// Bits 19:16, kept in the low nibble.
    pub high: u8,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct OffsetParts {
    pub low: u16,
    pub high: u16,
    pub upper: u32,
}

/// Split a segment base. Bits above the width are dropped.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn split_base(base: u64, width: Width) -> BaseParts {
    let base = base & width.max_address();
    BaseParts {
        low: base as u16,
        mid: (base >> 16) as u8,
        high: (base >> 24) as u8,
        upper: (base >> 32) as u32,
    }
}

#[must_use]
pub const fn join_base(parts: BaseParts, width: Width) -> u64 {
    let lower = parts.low as u64 | (parts.mid as u64) << 16 | (parts.high as u64) << 24;
    match width {
        Width::Legacy => lower,
        Width::Long => lower | (parts.upper as u64) << 32,
    }
}

/// Split a raw 20-bit limit. Bits above 19 are dropped.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn split_limit(limit: u32) -> LimitParts {
    LimitParts {
        low: limit as u16,
        high: ((limit >> 16) & 0xf) as u8,
    }
}

#[must_use]
pub const fn join_limit(parts: LimitParts) -> u32 {
    parts.low as u32 | ((parts.high & 0xf) as u32) << 16
}

/// Effective byte limit: granular limits count 4 KiB pages.
#[must_use]
pub const fn scale_limit(raw: u32, granular: bool) -> u32 {
    let raw = raw & LIMIT_MAX;
    if granular { raw << 12 | 0xfff } else { raw }
}

/// Split a gate entry-point offset. Bits above the width are dropped.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn split_offset(offset: u64, width: Width) -> OffsetParts {
    let offset = offset & width.max_address();
    OffsetParts {
        low: offset as u16,
        high: (offset >> 16) as u16,
        upper: (offset >> 32) as u32,
    }
}

#[must_use]
pub const fn join_offset(parts: OffsetParts, width: Width) -> u64 {
    let lower = parts.low as u64 | (parts.high as u64) << 16;
    match width {
        Width::Legacy => lower,
        Width::Long => lower | (parts.upper as u64) << 32,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn granular_limit_covers_whole_pages() {
        assert_eq!(scale_limit(0xfffff, true), 0xffff_ffff);
        assert_eq!(scale_limit(0, true), 0xfff);
        assert_eq!(scale_limit(103, false), 103);
    }

    #[test]
    fn legacy_width_drops_upper_half() {
        let parts = split_base(0x1_2345_6789, Width::Legacy);
        assert_eq!(parts.upper, 0);
        assert_eq!(join_base(parts, Width::Legacy), 0x2345_6789);
    }

    proptest! {
        #[test]
        fn base_round_trips_legacy(base in any::<u32>()) {
            let base = u64::from(base);
            prop_assert_eq!(join_base(split_base(base, Width::Legacy), Width::Legacy), base);
        }

        #[test]
        fn base_round_trips_long(base in any::<u64>()) {
            prop_assert_eq!(join_base(split_base(base, Width::Long), Width::Long), base);
        }

        #[test]
        fn limit_round_trips(limit in 0..=LIMIT_MAX) {
            prop_assert_eq!(join_limit(split_limit(limit)), limit);
        }

        #[test]
        fn offset_round_trips(offset in any::<u64>(), legacy in any::<bool>()) {
            let (width, offset) = if legacy {
                (Width::Legacy, offset & 0xffff_ffff)
            } else {
                (Width::Long, offset)
            };
            prop_assert_eq!(join_offset(split_offset(offset, width), width), offset);
        }
    }
}
