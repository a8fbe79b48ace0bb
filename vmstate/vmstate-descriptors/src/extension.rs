//! # 16-byte long-mode descriptors
//!
//! In IA-32e mode, system segments (TSS, LDT) and gates grow to 16 bytes: the
//! familiar 8-byte payload followed by an extension tail carrying bits 63:32
//! of the base or offset and a reserved dword that must be zero.
//!
//! ```text
//! bytes 0..8   payload (same layout as the 8-byte form)
//! bytes 8..12  upper[31:0]  → base/offset bits 63:32
//! bytes 12..16 reserved (0)
//! ```

use bitfield_struct::bitfield;
use vmstate_memory::Wire;

/// High 8 bytes of a 16-byte descriptor.
#[bitfield(u64)]
#[derive(Eq, PartialEq)]
pub struct ExtensionTail {
    /// Bits 63:32 of the base or offset.
    pub upper: u32,
    #[bits(32, default = 0)]
    _reserved: u32,
}

vmstate_memory::wire_bits!(ExtensionTail => u64);

/// An 8-byte descriptor extended to its 16-byte long-mode form.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Extended<T> {
    pub payload: T,
    pub tail: ExtensionTail,
}

impl<T> Extended<T> {
    #[must_use]
    pub const fn new(payload: T, upper: u32) -> Self {
        Self {
            payload,
            tail: ExtensionTail::new().with_upper(upper),
        }
    }
}

impl<T: Wire> Wire for Extended<T> {
    const SIZE: usize = T::SIZE + <ExtensionTail as Wire>::SIZE;

    fn encode(&self, out: &mut [u8]) {
        self.payload.encode(&mut out[..T::SIZE]);
        self.tail.encode(&mut out[T::SIZE..Self::SIZE]);
    }

    fn decode(bytes: &[u8]) -> Self {
        Self {
            payload: T::decode(&bytes[..T::SIZE]),
            tail: ExtensionTail::decode(&bytes[T::SIZE..Self::SIZE]),
        }
    }
}

const _: () = {
    assert!(<Extended<u64> as Wire>::SIZE == 16);
};
