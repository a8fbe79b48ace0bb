use crate::kind;
use crate::privilege::Dpl;
use crate::selector::SegmentSelector;
use bitfield_struct::bitfield;

/// Task gate: refers to a TSS descriptor by selector (8 bytes, legacy only).
#[bitfield(u64)]
#[derive(Eq, PartialEq)]
pub struct TaskGateDescriptor {
    #[bits(16, default = 0)]
    _reserved_lo: u16, // [15:0]
    /// Selector of the TSS descriptor.
    #[bits(16)]
    pub selector: SegmentSelector, // [31:16]
    #[bits(8, default = 0)]
    _reserved_mid: u8, // [39:32]
    #[bits(4, default = kind::TASK_GATE)]
    pub typ: u8, // [43:40]
    pub s: bool, // [44]
    #[bits(2)]
    pub dpl: Dpl, // [46:45]
    pub p: bool, // [47]
    #[bits(16, default = 0)]
    _reserved_hi: u16, // [63:48]
}

vmstate_memory::wire_bits!(TaskGateDescriptor => u64);

impl TaskGateDescriptor {
    #[must_use]
    pub const fn task(tss_selector: SegmentSelector, dpl: Dpl, present: bool) -> Self {
        Self::new()
            .with_selector(tss_selector)
            .with_typ(kind::TASK_GATE)
            .with_s(false)
            .with_dpl(dpl)
            .with_p(present)
    }
}
