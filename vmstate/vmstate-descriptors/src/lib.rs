//! # Segment, gate and task-state encoders
//!
//! Bit-exact models of everything that lives in a GDT or IDT:
//!
//! - [`SegmentDescriptor`]: code/data and system segments (8 bytes),
//! - [`GateDescriptor`]: interrupt, trap and call gates (8 bytes),
//! - [`TaskGateDescriptor`]: task gates (8 bytes),
//! - [`Extended<T>`]: the 16-byte long-mode form of a system segment or gate,
//! - [`Tss32`] / [`Tss64`]: the 104-byte task-state segments.
//!
//! Constructors take semantic parameters (base, limit, type, DPL, ...) and
//! the accessors `base()`, `limit()` and `offset()` reverse them exactly. The
//! composite-field helpers in [`composite`] do the splitting and are shared by
//! every descriptor width.
//!
//! ## Example
//!
//! ```rust
//! use vmstate_descriptors::{Dpl, SegmentDescriptor};
//!
//! let code = SegmentDescriptor::flat_code(Dpl::Ring0, false);
//! assert_eq!(code.into_bits(), 0x00cf_9b00_0000_ffff);
//! assert_eq!(code.base(), 0);
//! assert_eq!(code.effective_limit(), 0xffff_ffff);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]

extern crate alloc;

pub mod composite;
mod entry;
mod extension;
mod gate;
pub mod kind;
mod privilege;
mod segment;
mod selector;
mod task_gate;
mod tss;

pub use composite::Width;
pub use entry::{TableEntry, encode_table};
pub use extension::{ExtensionTail, Extended};
pub use gate::GateDescriptor;
pub use privilege::{Dpl, Rpl};
pub use segment::{SegmentDescriptor, SegmentParams};
pub use selector::{SegmentSelector, Table};
pub use task_gate::TaskGateDescriptor;
pub use tss::{TSS_LIMIT, TSS_SIZE, Tss32, Tss64};
