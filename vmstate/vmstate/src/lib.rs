//! # x86 virtual CPU state images
//!
//! A [`VmState`] couples a [`RegisterFile`] with a linear guest [`Memory`] and
//! knows how to bring both into a consistent architectural configuration:
//!
//! ```text
//!  new(arch) ──► setup_real()                     (real mode)
//!      │
//!      └──────► setup_gdt() ──► setup_paging()    (flat protected / paging)
//!                    │
//!                    └──► setup_idt(gates)
//! ```
//!
//! Segment registers are loaded the way the CPU loads them: the selector is
//! resolved against the GDT in guest memory and the descriptor is copied into
//! the segment cache ([`VmState::load_seg`]). The finished state serialises to
//! a flat image of the register file followed by guest memory ([`VmState::raw`]).
//!
//! ## Example
//!
//! ```rust
//! use vmstate::{Architecture, VmState};
//!
//! let mut state = VmState::new(Architecture::X86);
//! state.setup_gdt().unwrap();
//! state.setup_paging().unwrap();
//! state.inject_code(&[0x0f, 0xa2]).unwrap(); // cpuid
//!
//! let image = state.raw();
//! assert_eq!(VmState::from_raw(&image).unwrap(), state);
//! ```
//!
//! ## Features
//! - `dump` (default): the textual register/memory renderer [`VmState::dump`].

#![cfg_attr(not(any(test, doctest)), no_std)]

extern crate alloc;

mod arch;
#[cfg(feature = "dump")]
mod dump;
mod error;
mod gdt;
mod image;
mod loader;
mod setup;
mod state;

pub use arch::{Architecture, Mode, PagingMode};
#[cfg(feature = "dump")]
pub use dump::Dump;
pub use error::{ErrorKind, VmStateError};
pub use setup::{KERNEL_CS, KERNEL_DS, TSS_SEL, USER_CS, USER_DS};
pub use state::VmState;

pub use vmstate_descriptors as descriptors;
pub use vmstate_memory::{Memory, MemoryError, PAGE_SIZE, Wire};
pub use vmstate_paging as paging;
pub use vmstate_registers as registers;
pub use vmstate_registers::{REGISTER_FILE_SIZE, RegisterFile, SegmentRegister};
