//! # Page-table entry encoders
//!
//! Two paging formats are modelled:
//!
//! - **32-bit legacy paging** ([`legacy`]): a page directory of 1024 [`Pde32`]
//!   entries, each either a 4 MiB leaf (`PS = 1`, needs `CR4.PSE`) or a
//!   pointer to a page table of 1024 [`Pte32`] entries.
//! - **4-level paging** ([`long`]): [`Pml4e`] → [`Pdpte`] → [`Pde64`] →
//!   [`Pte64`], 512 entries per table, with 1 GiB leaves at the PDPT level and
//!   2 MiB leaves at the PD level.
//!
//! Every format stores the physical frame number (`pfn`, address `>> 12`)
//! from bit 12 upward. Large-page entries use the same field; the low bits of
//! the frame number must then be zero.
//!
//! [`identity`] builds the flat identity maps used when enabling paging on a
//! fresh state.

#![cfg_attr(not(any(test, doctest)), no_std)]

extern crate alloc;

pub mod identity;
pub mod legacy;
pub mod long;

pub use legacy::{Pde32, Pte32};
pub use long::{Pde64, Pdpte, Pml4e, Pte64};

/// Size of every page table, directory and PML4 in bytes.
pub const TABLE_SIZE: u64 = 0x1000;

/// Entries per table with 32-bit paging.
pub const LEGACY_ENTRIES: usize = 1024;

/// Entries per table with 4-level paging.
pub const LONG_ENTRIES: usize = 512;
