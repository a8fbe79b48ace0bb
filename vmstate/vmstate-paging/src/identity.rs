//! Flat identity maps built from large pages.

use crate::{LEGACY_ENTRIES, LONG_ENTRIES, Pde32, Pdpte};
use alloc::vec::Vec;
use vmstate_memory::Wire;

/// Page directory mapping `[0, 4 GiB)` with 1024 4 MiB pages.
#[must_use]
pub fn identity_directory_4m() -> Vec<Pde32> {
    (0u32..)
        .take(LEGACY_ENTRIES)
        .map(|i| Pde32::large_page(i << 10))
        .collect()
}

/// PDPT mapping `[0, 512 GiB)` with 512 1 GiB pages.
#[must_use]
pub fn identity_pdpt_1g() -> Vec<Pdpte> {
    (0u64..)
        .take(LONG_ENTRIES)
        .map(|i| Pdpte::large_page(i << 18))
        .collect()
}

/// Encode a table's entries back to back.
#[must_use]
pub fn table_bytes<T: Wire>(entries: &[T]) -> Vec<u8> {
    let mut out = alloc::vec![0; entries.len() * T::SIZE];
    for (entry, slot) in entries.iter().zip(out.chunks_exact_mut(T::SIZE)) {
        entry.encode(slot);
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::TABLE_SIZE;

    #[test]
    fn directory_covers_four_gib() {
        let dir = identity_directory_4m();
        assert_eq!(dir.len(), 1024);
        assert!(dir.iter().all(|e| e.present() && e.writable() && e.user() && e.page_size()));
        assert_eq!(dir[1023].address(), 0xffc0_0000);
        assert_eq!(table_bytes(&dir).len() as u64, TABLE_SIZE);
    }

    #[test]
    fn pdpt_covers_512_gib() {
        let pdpt = identity_pdpt_1g();
        assert_eq!(pdpt.len(), 512);
        for (i, e) in pdpt.iter().enumerate() {
            assert_eq!(e.pfn(), (i as u64) << 18);
        }
        let bytes = table_bytes(&pdpt);
        assert_eq!(bytes.len() as u64, TABLE_SIZE);
        assert_eq!(Pdpte::decode(&bytes[8..]), pdpt[1]);
    }
}
