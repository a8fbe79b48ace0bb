/// Descriptor Privilege Level (lives *in the descriptor*).
///
/// Typical checks the CPU enforces against it:
/// - Data segments: `max(CPL, RPL) ≤ DPL`
/// - Non-conforming code: `CPL == DPL`
/// - Gates invoked by software `int n`: `CPL ≤ DPL`
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
#[repr(u8)]
pub enum Dpl {
    #[default]
    Ring0 = 0,
    Ring1 = 1,
    Ring2 = 2,
    Ring3 = 3,
}

impl Dpl {
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
