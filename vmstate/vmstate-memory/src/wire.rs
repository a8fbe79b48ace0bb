//! # Little-endian wire codec
//!
//! Every structure that ends up in guest memory or in the register image is
//! written through an explicit [`Wire::encode`]/[`Wire::decode`] pair instead of
//! being viewed in place. Encodings are packed (no padding) and little-endian.

use alloc::vec;
use alloc::vec::Vec;

/// A type with a fixed-size, packed little-endian encoding.
pub trait Wire: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Write the encoding into the first [`Self::SIZE`] bytes of `out`.
    ///
    /// # Panics
    /// If `out` is shorter than [`Self::SIZE`].
    fn encode(&self, out: &mut [u8]);

    /// Read a value from the first [`Self::SIZE`] bytes of `bytes`.
    ///
    /// # Panics
    /// If `bytes` is shorter than [`Self::SIZE`].
    fn decode(bytes: &[u8]) -> Self;

    /// Encode into a freshly allocated buffer.
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0; Self::SIZE];
        self.encode(&mut out);
        out
    }
}

macro_rules! wire_int {
    ($($ty:ty),+) => {$(
        impl Wire for $ty {
            const SIZE: usize = size_of::<$ty>();

            #[inline]
            fn encode(&self, out: &mut [u8]) {
                out[..Self::SIZE].copy_from_slice(&self.to_le_bytes());
            }

            #[inline]
            fn decode(bytes: &[u8]) -> Self {
                let mut raw = [0; size_of::<$ty>()];
                raw.copy_from_slice(&bytes[..Self::SIZE]);
                <$ty>::from_le_bytes(raw)
            }
        }
    )+};
}

wire_int!(u8, u16, u32, u64);

/// Implement [`Wire`] for `bitfield-struct` types via their backing integer.
///
/// ```ignore
/// #[bitfield(u32)]
/// pub struct Cr0 { /* ... */ }
///
/// vmstate_memory::wire_bits!(Cr0 => u32);
/// ```
#[macro_export]
macro_rules! wire_bits {
    ($($ty:ty => $int:ty),+ $(,)?) => {$(
        impl $crate::Wire for $ty {
            const SIZE: usize = ::core::mem::size_of::<$int>();

            #[inline]
            fn encode(&self, out: &mut [u8]) {
                <$int as $crate::Wire>::encode(&self.into_bits(), out);
            }

            #[inline]
            fn decode(bytes: &[u8]) -> Self {
                Self::from_bits(<$int as $crate::Wire>::decode(bytes))
            }
        }
    )+};
}

/// Sequential writer over a byte slice.
pub struct WireWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> WireWriter<'a> {
    pub const fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Append the encoding of `value`.
    pub fn put<T: Wire>(&mut self, value: &T) -> &mut Self {
        value.encode(&mut self.buf[self.pos..self.pos + T::SIZE]);
        self.pos += T::SIZE;
        self
    }
}

/// Sequential reader over a byte slice.
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes consumed so far.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Decode the next `T`.
    pub fn get<T: Wire>(&mut self) -> T {
        let value = T::decode(&self.buf[self.pos..self.pos + T::SIZE]);
        self.pos += T::SIZE;
        value
    }
}
