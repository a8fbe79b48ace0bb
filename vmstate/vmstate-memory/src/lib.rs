//! # Guest Memory Arena
//!
//! The flat, append-only byte buffer that backs a virtual machine state, plus
//! the little-endian wire codec used to place typed structures into it.
//!
//! ## What you get
//! - [`Memory`]: a bump allocator over a growable `Vec<u8>`. Addresses are byte
//!   offsets from zero; allocations are never freed or reused.
//! - [`Wire`]: a fixed-size `encode`/`decode` pair for everything that lives
//!   in guest memory or in the register image (descriptors, page-table entries,
//!   task-state segments, registers).
//! - [`WireWriter`]/[`WireReader`]: sequential cursors for composing packed
//!   aggregates field by field.
//!
//! ## Example
//! ```
//! use vmstate_memory::Memory;
//!
//! let mut memory = Memory::new();
//! let stack = memory.allocate(8).unwrap();
//! let page = memory.allocate_aligned(0x1000, 0x1000).unwrap();
//! assert_eq!(stack, 0);
//! assert_eq!(page, 0x1000);
//!
//! memory.write(page, &[0x9d, 0xcc]).unwrap();
//! assert_eq!(memory.read(page, 2).unwrap(), &[0x9d, 0xcc]);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]

extern crate alloc;

mod arena;
mod error;
mod wire;

pub use arena::Memory;
pub use error::MemoryError;
pub use wire::{Wire, WireReader, WireWriter};

/// Size of a 4 KiB page, the alignment used for page-table allocations.
pub const PAGE_SIZE: u64 = 0x1000;
