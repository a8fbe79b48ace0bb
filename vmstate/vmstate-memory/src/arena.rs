//! # Bump-allocated guest memory
//!
//! Guest memory only ever grows. [`Memory::allocate_aligned`] rounds the
//! current end up to the requested alignment, zero-extends the buffer and hands
//! out the start of the new range. Nothing is ever freed, so every address
//! handed out stays valid for the lifetime of the arena.

use crate::error::MemoryError;
use crate::wire::Wire;
use alloc::vec::Vec;
use core::ops::Range;
use log::trace;

/// Linear, append-only guest memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Memory {
    bytes: Vec<u8>,
}

impl Memory {
    /// Create an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Wrap an existing byte buffer, e.g. the memory part of a decoded image.
    #[must_use]
    pub const fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Current length in bytes.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The address the next byte-aligned allocation will return.
    #[must_use]
    pub fn end(&self) -> u64 {
        self.len()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Allocate `size` bytes directly after the current end.
    ///
    /// # Errors
    /// [`MemoryError::AddressOverflow`] if the arena cannot grow that far.
    pub fn allocate(&mut self, size: u64) -> Result<u64, MemoryError> {
        self.allocate_aligned(size, 1)
    }

    /// Allocate `size` zeroed bytes at the next multiple of `alignment`.
    ///
    /// The returned address satisfies `addr % alignment == 0` and the arena is
    /// at least `addr + size` bytes long afterwards. Bytes in the padding gap
    /// are zero. Previously written bytes are never touched.
    ///
    /// # Errors
    /// - [`MemoryError::ZeroAlignment`] if `alignment` is zero.
    /// - [`MemoryError::AddressOverflow`] if the arena cannot grow that far.
    pub fn allocate_aligned(&mut self, size: u64, alignment: u64) -> Result<u64, MemoryError> {
        if alignment == 0 {
            return Err(MemoryError::ZeroAlignment);
        }

        let overflow = MemoryError::AddressOverflow { size };
        let addr = self
            .len()
            .div_ceil(alignment)
            .checked_mul(alignment)
            .ok_or(overflow)?;
        let end = addr.checked_add(size).ok_or(overflow)?;
        let end = usize::try_from(end).map_err(|_| overflow)?;

        self.bytes
            .try_reserve(end - self.bytes.len())
            .map_err(|_| overflow)?;
        self.bytes.resize(end, 0);
        trace!("allocated {size:#x} bytes at {addr:#x} (alignment {alignment:#x})");
        Ok(addr)
    }

    /// Overwrite `bytes.len()` bytes starting at `addr`.
    ///
    /// # Errors
    /// [`MemoryError::OutOfBounds`] if the range is not fully allocated.
    pub fn write(&mut self, addr: u64, bytes: &[u8]) -> Result<(), MemoryError> {
        let range = self.range(addr, bytes.len() as u64)?;
        self.bytes[range].copy_from_slice(bytes);
        Ok(())
    }

    /// Borrow `size` bytes starting at `addr`.
    ///
    /// # Errors
    /// [`MemoryError::OutOfBounds`] if the range is not fully allocated.
    pub fn read(&self, addr: u64, size: u64) -> Result<&[u8], MemoryError> {
        let range = self.range(addr, size)?;
        Ok(&self.bytes[range])
    }

    /// Decode a `T` from its wire encoding at `addr`.
    ///
    /// # Errors
    /// [`MemoryError::OutOfBounds`] if `T::SIZE` bytes at `addr` are not allocated.
    pub fn read_value<T: Wire>(&self, addr: u64) -> Result<T, MemoryError> {
        let bytes = self.read(addr, T::SIZE as u64)?;
        Ok(T::decode(bytes))
    }

    /// Encode `value` into memory at `addr`.
    ///
    /// # Errors
    /// [`MemoryError::OutOfBounds`] if `T::SIZE` bytes at `addr` are not allocated.
    pub fn write_value<T: Wire>(&mut self, addr: u64, value: &T) -> Result<(), MemoryError> {
        let range = self.range(addr, T::SIZE as u64)?;
        value.encode(&mut self.bytes[range]);
        Ok(())
    }

    fn range(&self, addr: u64, size: u64) -> Result<Range<usize>, MemoryError> {
        let out_of_bounds = MemoryError::OutOfBounds {
            addr,
            size,
            len: self.len(),
        };

        let end = addr.checked_add(size).ok_or(out_of_bounds)?;
        if end > self.len() {
            return Err(out_of_bounds);
        }

        // Both bounds are ≤ len, which already fits in usize.
        #[allow(clippy::cast_possible_truncation)]
        Ok(addr as usize..end as usize)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn allocate_rounds_up_and_zero_fills() {
        let mut memory = Memory::new();
        assert_eq!(memory.allocate(3).unwrap(), 0);
        assert_eq!(memory.allocate_aligned(8, 8).unwrap(), 8);
        assert_eq!(memory.len(), 16);
        assert!(memory.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn allocate_zero_bytes_reports_end() {
        let mut memory = Memory::new();
        memory.allocate(5).unwrap();
        assert_eq!(memory.allocate(0).unwrap(), 5);
        assert_eq!(memory.end(), 5);
    }

    #[test]
    fn zero_alignment_is_rejected() {
        let mut memory = Memory::new();
        assert_eq!(
            memory.allocate_aligned(1, 0),
            Err(MemoryError::ZeroAlignment)
        );
    }

    #[test]
    fn oversized_allocation_fails_without_growing() {
        let mut memory = Memory::new();
        memory.allocate(16).unwrap();
        let size = 1 << 63;
        assert_eq!(
            memory.allocate(size),
            Err(MemoryError::AddressOverflow { size })
        );
        assert_eq!(
            memory.allocate(u64::MAX),
            Err(MemoryError::AddressOverflow { size: u64::MAX })
        );
        assert_eq!(memory.len(), 16);
    }

    #[test]
    fn access_past_end_is_out_of_bounds() {
        let mut memory = Memory::new();
        memory.allocate(4).unwrap();

        assert!(memory.write(0, &[1, 2, 3, 4]).is_ok());
        assert_eq!(
            memory.write(2, &[0; 3]),
            Err(MemoryError::OutOfBounds {
                addr: 2,
                size: 3,
                len: 4
            })
        );
        assert!(matches!(
            memory.read(u64::MAX, 2),
            Err(MemoryError::OutOfBounds { .. })
        ));
        assert_eq!(memory.read(4, 0).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn typed_values_round_trip() {
        let mut memory = Memory::new();
        let addr = memory.allocate(12).unwrap();
        memory.write_value(addr + 4, &0x1122_3344_5566_7788_u64).unwrap();
        assert_eq!(memory.read_value::<u64>(addr + 4).unwrap(), 0x1122_3344_5566_7788);
        assert_eq!(memory.read(addr + 4, 1).unwrap(), &[0x88]);
        assert!(memory.read_value::<u64>(addr + 5).is_err());
    }

    proptest! {
        #[test]
        fn allocation_is_aligned_and_preserves_contents(
            prefix in proptest::collection::vec(any::<u8>(), 0..64),
            size in 0u64..0x2000,
            alignment in 1u64..0x2000,
        ) {
            let mut memory = Memory::new();
            let start = memory.allocate(prefix.len() as u64).unwrap();
            memory.write(start, &prefix).unwrap();

            let addr = memory.allocate_aligned(size, alignment).unwrap();
            prop_assert_eq!(addr % alignment, 0);
            prop_assert!(addr >= prefix.len() as u64);
            prop_assert!(addr + size <= memory.len());
            prop_assert_eq!(memory.read(start, prefix.len() as u64).unwrap(), &prefix[..]);
        }
    }
}
