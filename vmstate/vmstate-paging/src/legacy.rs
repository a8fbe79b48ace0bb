//! 32-bit (non-PAE) paging entries, 4 bytes each.

use bitfield_struct::bitfield;

/// Page Directory Entry.
///
/// With `PS = 1` the entry maps a 4 MiB page and `pfn` must be a multiple of
/// 1024; otherwise it points to a page table.
#[bitfield(u32)]
#[derive(Eq, PartialEq)]
pub struct Pde32 {
    /// Present (bit 0).
    pub present: bool,
    /// Writable (bit 1).
    pub writable: bool,
    /// User (bit 2).
    pub user: bool,
    /// Write-Through (bit 3).
    pub write_through: bool,
    /// Cache Disable (bit 4).
    pub cache_disable: bool,
    /// Accessed (bit 5).
    pub accessed: bool,
    /// Dirty (bit 6), 4 MiB leaves only.
    pub dirty: bool,
    /// Page Size (bit 7).
    pub page_size: bool,
    /// Global (bit 8), 4 MiB leaves only.
    pub global: bool,
    /// OS-available (bits 9..11).
    #[bits(3)]
    pub os_available: u8,
    /// Frame number (bits 12..31).
    #[bits(20)]
    pub pfn: u32,
}

vmstate_memory::wire_bits!(Pde32 => u32);

impl Pde32 {
    /// Present, writable, user-accessible 4 MiB page at frame `pfn`.
    #[must_use]
    pub const fn large_page(pfn: u32) -> Self {
        Self::new()
            .with_present(true)
            .with_writable(true)
            .with_user(true)
            .with_page_size(true)
            .with_pfn(pfn & 0xf_ffff)
    }

    /// Present, writable, user-accessible pointer to a page table.
    #[must_use]
    pub const fn table(pfn: u32) -> Self {
        Self::new()
            .with_present(true)
            .with_writable(true)
            .with_user(true)
            .with_pfn(pfn & 0xf_ffff)
    }

    #[must_use]
    pub const fn address(self) -> u64 {
        (self.pfn() as u64) << 12
    }
}

/// Page Table Entry mapping one 4 KiB page.
#[bitfield(u32)]
#[derive(Eq, PartialEq)]
pub struct Pte32 {
    pub present: bool,
    pub writable: bool,
    pub user: bool,
    pub write_through: bool,
    pub cache_disable: bool,
    pub accessed: bool,
    pub dirty: bool,
    /// Page Attribute Table selector (bit 7).
    pub pat: bool,
    pub global: bool,
    #[bits(3)]
    pub os_available: u8,
    #[bits(20)]
    pub pfn: u32,
}

vmstate_memory::wire_bits!(Pte32 => u32);

impl Pte32 {
    #[must_use]
    pub const fn page(pfn: u32) -> Self {
        Self::new()
            .with_present(true)
            .with_writable(true)
            .with_user(true)
            .with_pfn(pfn & 0xf_ffff)
    }

    #[must_use]
    pub const fn address(self) -> u64 {
        (self.pfn() as u64) << 12
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn large_page_bits() {
        let pde = Pde32::large_page(1 << 10);
        assert_eq!(pde.into_bits(), 0x0040_0087);
        assert_eq!(pde.address(), 0x40_0000);
    }

    #[test]
    fn pte_bits() {
        let pte = Pte32::page(0xb8).with_pat(true);
        assert_eq!(pte.into_bits(), 0x000b_8087);
        assert_eq!(pte.address(), 0xb_8000);
    }
}
