//! 4-level (IA-32e) paging entries, 8 bytes each.
//!
//! | Level | Entry     | `PS = 1` maps |
//! |-------|-----------|---------------|
//! | L4    | [`Pml4e`] | (not allowed) |
//! | L3    | [`Pdpte`] | 1 GiB         |
//! | L2    | [`Pde64`] | 2 MiB         |
//! | L1    | [`Pte64`] | (4 KiB leaf)  |

use bitfield_struct::bitfield;

const PFN_MASK: u64 = (1 << 40) - 1;

/// L4 **PML4E**: pointer to a PDPT.
#[bitfield(u64)]
#[derive(Eq, PartialEq)]
pub struct Pml4e {
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
    /// Bits 6..11, kept zero.
    #[bits(6, default = 0)]
    _reserved_6_11: u8,
    /// Frame number of the PDPT (bits 12..51).
    #[bits(40)]
    pub pfn: u64,
    #[bits(11, default = 0)]
    _reserved_52_62: u16,
    /// Execute Disable (bit 63).
    pub xd: bool,
}

vmstate_memory::wire_bits!(Pml4e => u64);

impl Pml4e {
    /// Present, writable, user-accessible pointer to the PDPT at frame `pfn`.
    #[must_use]
    pub const fn table(pfn: u64) -> Self {
        Self::new()
            .with_present(true)
            .with_writable(true)
            .with_user(true)
            .with_pfn(pfn & PFN_MASK)
    }

    #[must_use]
    pub const fn address(self) -> u64 {
        self.pfn() << 12
    }
}

/// L3 **PDPTE**: pointer to a page directory, or a 1 GiB leaf (`PS = 1`).
#[bitfield(u64)]
#[derive(Eq, PartialEq)]
pub struct Pdpte {
    pub present: bool,
    pub writable: bool,
    pub user: bool,
    pub write_through: bool,
    pub cache_disable: bool,
    pub accessed: bool,
    /// Dirty (bit 6), 1 GiB leaves only.
    pub dirty: bool,
    /// Page Size (bit 7).
    pub page_size: bool,
    /// Global (bit 8), 1 GiB leaves only.
    pub global: bool,
    #[bits(3, default = 0)]
    _reserved_9_11: u8,
    #[bits(40)]
    pub pfn: u64,
    #[bits(11, default = 0)]
    _reserved_52_62: u16,
    pub xd: bool,
}

vmstate_memory::wire_bits!(Pdpte => u64);

impl Pdpte {
    /// Present, writable, user-accessible 1 GiB page; `pfn` is a multiple of `1 << 18`.
    #[must_use]
    pub const fn large_page(pfn: u64) -> Self {
        Self::table(pfn).with_page_size(true)
    }

    /// Present, writable, user-accessible pointer to a page directory.
    #[must_use]
    pub const fn table(pfn: u64) -> Self {
        Self::new()
            .with_present(true)
            .with_writable(true)
            .with_user(true)
            .with_pfn(pfn & PFN_MASK)
    }

    #[must_use]
    pub const fn address(self) -> u64 {
        self.pfn() << 12
    }
}

/// L2 **PDE**: pointer to a page table, or a 2 MiB leaf (`PS = 1`).
#[bitfield(u64)]
#[derive(Eq, PartialEq)]
pub struct Pde64 {
    pub present: bool,
    pub writable: bool,
    pub user: bool,
    pub write_through: bool,
    pub cache_disable: bool,
    pub accessed: bool,
    #[bits(1, default = false)]
    _reserved_6: bool,
    /// Page Size (bit 7).
    pub page_size: bool,
    #[bits(4, default = 0)]
    _reserved_8_11: u8,
    #[bits(40)]
    pub pfn: u64,
    #[bits(11, default = 0)]
    _reserved_52_62: u16,
    pub xd: bool,
}

vmstate_memory::wire_bits!(Pde64 => u64);

impl Pde64 {
    /// Present, writable, user-accessible 2 MiB page; `pfn` is a multiple of 512.
    #[must_use]
    pub const fn large_page(pfn: u64) -> Self {
        Self::table(pfn).with_page_size(true)
    }

    #[must_use]
    pub const fn table(pfn: u64) -> Self {
        Self::new()
            .with_present(true)
            .with_writable(true)
            .with_user(true)
            .with_pfn(pfn & PFN_MASK)
    }

    #[must_use]
    pub const fn address(self) -> u64 {
        self.pfn() << 12
    }
}

/// L1 **PTE**: maps one 4 KiB page.
#[bitfield(u64)]
#[derive(Eq, PartialEq)]
pub struct Pte64 {
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
    #[bits(3, default = 0)]
    _reserved_9_11: u8,
    #[bits(40)]
    pub pfn: u64,
    #[bits(7, default = 0)]
    _reserved_52_58: u8,
    /// Protection key (bits 59..62).
    #[bits(4)]
    pub protection_key: u8,
    pub xd: bool,
}

vmstate_memory::wire_bits!(Pte64 => u64);

impl Pte64 {
    #[must_use]
    pub const fn page(pfn: u64) -> Self {
        Self::new()
            .with_present(true)
            .with_writable(true)
            .with_user(true)
            .with_pfn(pfn & PFN_MASK)
    }

    #[must_use]
    pub const fn address(self) -> u64 {
        self.pfn() << 12
    }
}
