use alloc::vec;
use alloc::vec::Vec;

/// Named sub-fields of a register, in display order.
///
/// Plain integer registers report a single `value` field; bitfield registers
/// report each architecturally defined bit or bit group.
pub trait RegisterFields {
    fn fields(&self) -> Vec<(&'static str, u64)>;
}

impl RegisterFields for u64 {
    fn fields(&self) -> Vec<(&'static str, u64)> {
        vec![("value", *self)]
    }
}

impl RegisterFields for u32 {
    fn fields(&self) -> Vec<(&'static str, u64)> {
        vec![("value", u64::from(*self))]
    }
}
