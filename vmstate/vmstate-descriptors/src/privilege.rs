//! # Privilege levels
//!
//! | Concept | Stored in | Purpose |
//! |----------|------------|----------|
//! | [`Rpl`]  | the low 2 bits of a selector | the **requested privilege level** |
//! | [`Dpl`]  | bits 45–46 of a descriptor | the **descriptor privilege level** of the target |
//!
//! Both are usable directly as `bitfield-struct` fields.

mod dpl;
mod rpl;

pub use dpl::Dpl;
pub use rpl::Rpl;
