//! # Typed x86 Register File
//!
//! Architectural register models (`CR0`, `CR4`, `EFLAGS`, `EFER`, segment
//! caches, descriptor-table pointers) and the [`RegisterFile`] aggregate whose
//! field order is the on-wire layout of a state image.
//!
//! Control and flag registers are `bitfield-struct` models: every defined bit
//! is a named field, reserved bits are private padding forced to zero, and
//! architecturally fixed bits (e.g. `EFLAGS` bit 1) carry their fixed value as
//! the default.

#![cfg_attr(not(any(test, doctest)), no_std)]

extern crate alloc;

pub mod cr0;
pub mod cr4;
pub mod efer;
pub mod eflags;
mod fields;
mod file;
pub mod segment;
pub mod table;

pub use cr0::Cr0;
pub use cr4::Cr4;
pub use efer::Efer;
pub use eflags::Eflags;
pub use fields::RegisterFields;
pub use file::{REGISTER_FILE_SIZE, RegisterFile, SegmentRegister};
pub use segment::{SegmentAttributes, SegmentCache};
pub use table::TableRegister;
