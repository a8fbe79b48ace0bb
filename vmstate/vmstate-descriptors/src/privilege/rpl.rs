//! Requested Privilege Level (RPL).
//!
//! RPL lives in the **low 2 bits of a segment selector** supplied by the
//! requester. For data segment loads the CPU checks `max(CPL, RPL) ≤ DPL`.

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
#[repr(u8)]
pub enum Rpl {
    #[default]
    Ring0 = 0,
    Ring1 = 1,
    Ring2 = 2,
    Ring3 = 3,
}

impl Rpl {
    #[inline]
    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self as u8
    }

    #[inline]
    #[must_use]
    pub const fn from_bits(v: u8) -> Self {
        match v & 0b11 {
            0 => Self::Ring0,
            1 => Self::Ring1,
            2 => Self::Ring2,
            _ => Self::Ring3,
        }
    }
}
