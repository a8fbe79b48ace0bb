//! # Interrupt, trap and call gates
//!
//! ```text
//! 63            48 47 46 45 44 43   40 39 37 36     32 31       16 15         0
//! +---------------+--+-----+--+-------+-----+---------+-----------+-----------+
//! |  offset_hi    |P | DPL |0 | type  | 000 | params  | selector  | offset_lo |
//! +---------------+--+-----+--+-------+-----+---------+-----------+-----------+
//! ```
//!
//! `params` is only meaningful for call gates; interrupt and trap gates keep
//! it zero. Long-mode gates use the 16-byte [`Extended`] form for bits 63:32
//! of the offset and are always 32/64-bit (`D = 1`).

use crate::composite::{OffsetParts, Width, join_offset, split_offset};
use crate::extension::Extended;
use crate::kind;
use crate::privilege::Dpl;
use crate::selector::SegmentSelector;
use bitfield_struct::bitfield;

#[bitfield(u64)]
#[derive(Eq, PartialEq)]
pub struct GateDescriptor {
    pub offset_lo: u16, // [15:0]
    #[bits(16)]
    pub selector: SegmentSelector, // [31:16]
    #[bits(5)]
    pub param_count: u8, // [36:32]
    #[bits(3, default = 0)]
    _reserved: u8, // [39:37]
    #[bits(4)]
    pub typ: u8, // [43:40]
    pub s: bool, // [44] always 0
    #[bits(2)]
    pub dpl: Dpl, // [46:45]
    pub p: bool, // [47]
    pub offset_hi: u16, // [63:48]
}

vmstate_memory::wire_bits!(GateDescriptor => u64);

impl GateDescriptor {
    const fn gate(
        offset: u64,
        selector: SegmentSelector,
        typ: u8,
        param_count: u8,
        dpl: Dpl,
        present: bool,
    ) -> Self {
        let offset = split_offset(offset, Width::Legacy);
        Self::new()
            .with_offset_lo(offset.low)
            .with_selector(selector)
            .with_param_count(param_count & 0x1f)
            .with_typ(typ & 0xf)
            .with_s(false)
            .with_dpl(dpl)
            .with_p(present)
            .with_offset_hi(offset.high)
    }

    /// Interrupt gate; `size32` selects a 32-bit (`D = 1`) or 16-bit handler.
    #[must_use]
    pub const fn interrupt(
        offset: u32,
        selector: SegmentSelector,
        size32: bool,
        dpl: Dpl,
        present: bool,
    ) -> Self {
        Self::gate(
            offset as u64,
            selector,
            kind::interrupt_gate(size32),
            0,
            dpl,
            present,
        )
    }

    /// Trap gate; like an interrupt gate but `IF` is left untouched on entry.
    #[must_use]
    pub const fn trap(
        offset: u32,
        selector: SegmentSelector,
        size32: bool,
        dpl: Dpl,
        present: bool,
    ) -> Self {
        Self::gate(
            offset as u64,
            selector,
            kind::trap_gate(size32),
            0,
            dpl,
            present,
        )
    }

    /// Call gate copying `param_count` (0..=31) stack parameters.
    #[must_use]
    pub const fn call(
        offset: u32,
        selector: SegmentSelector,
        param_count: u8,
        dpl: Dpl,
        present: bool,
    ) -> Self {
        Self::gate(
            offset as u64,
            selector,
            kind::CALL_GATE,
            param_count,
            dpl,
            present,
        )
    }

    #[must_use]
    pub const fn offset(self) -> u64 {
        join_offset(self.offset_parts(0), Width::Legacy)
    }

    const fn offset_parts(self, upper: u32) -> OffsetParts {
        OffsetParts {
            low: self.offset_lo(),
            high: self.offset_hi(),
            upper,
        }
    }
}

impl Extended<GateDescriptor> {
    const fn gate64(offset: u64, payload: GateDescriptor) -> Self {
        Self::new(payload, split_offset(offset, Width::Long).upper)
    }

    #[must_use]
    pub const fn interrupt64(
        offset: u64,
        selector: SegmentSelector,
        dpl: Dpl,
        present: bool,
    ) -> Self {
        let payload = GateDescriptor::gate(
            offset,
            selector,
            kind::INTERRUPT_GATE,
            0,
            dpl,
            present,
        );
        Self::gate64(offset, payload)
    }

    #[must_use]
    pub const fn trap64(offset: u64, selector: SegmentSelector, dpl: Dpl, present: bool) -> Self {
        let payload = GateDescriptor::gate(offset, selector, kind::TRAP_GATE, 0, dpl, present);
        Self::gate64(offset, payload)
    }

    /// Long-mode call gate. There is no parameter copying in IA-32e mode.
    #[must_use]
    pub const fn call64(offset: u64, selector: SegmentSelector, dpl: Dpl, present: bool) -> Self {
        let payload = GateDescriptor::gate(offset, selector, kind::CALL_GATE, 0, dpl, present);
        Self::gate64(offset, payload)
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        join_offset(self.payload.offset_parts(self.tail.upper()), Width::Long)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::privilege::Rpl;
    use proptest::prelude::*;
    use vmstate_memory::Wire;

    const KERNEL_CS: SegmentSelector = SegmentSelector::gdt(1, Rpl::Ring0);

    #[test]
    fn interrupt_gate_layout() {
        let gate = GateDescriptor::interrupt(0x1234_5678, KERNEL_CS, true, Dpl::Ring3, true);
        assert_eq!(gate.into_bits(), 0x1234_ee00_0008_5678);
        assert_eq!(GateDescriptor::trap(0, KERNEL_CS, false, Dpl::Ring0, true).typ(), 0b0111);
    }

    #[test]
    fn call_gate_carries_parameter_count() {
        let gate = GateDescriptor::call(0x1000, KERNEL_CS, 2, Dpl::Ring3, true);
        assert_eq!(gate.typ(), kind::CALL_GATE);
        assert_eq!(gate.param_count(), 2);
        assert_eq!(gate.selector().into_bits(), 0x8);
        assert_eq!(gate.offset(), 0x1000);
        assert!(!gate.s());
    }

    #[test]
    fn long_mode_gate_is_sixteen_bytes() {
        let gate = Extended::interrupt64(0xffff_ffff_8000_1000, KERNEL_CS, Dpl::Ring0, true);
        let bytes = gate.to_bytes();
        assert_eq!(bytes.len(), 16);
        assert_eq!(gate.payload.typ(), 0b1110);
        assert_eq!(u32::decode(&bytes[8..]), 0xffff_ffff);
        assert_eq!(gate.offset(), 0xffff_ffff_8000_1000);
    }

    proptest! {
        #[test]
        fn offsets_round_trip(offset in any::<u64>()) {
            let legacy = offset & 0xffff_ffff;
            #[allow(clippy::cast_possible_truncation)]
            let gate = GateDescriptor::call(legacy as u32, KERNEL_CS, 0, Dpl::Ring0, true);
            prop_assert_eq!(gate.offset(), legacy);
            prop_assert_eq!(Extended::call64(offset, KERNEL_CS, Dpl::Ring0, true).offset(), offset);
            prop_assert_eq!(Extended::trap64(offset, KERNEL_CS, Dpl::Ring0, true).offset(), offset);
        }
    }
}
