//! `GDTR` / `IDTR` descriptor-table pointers.

use crate::RegisterFields;
use alloc::vec;
use alloc::vec::Vec;
use vmstate_memory::{Wire, WireReader, WireWriter};

/// Base and limit of a descriptor table (10 bytes on the wire).
///
/// `limit` is the offset of the table's last valid byte, i.e. `size - 1`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct TableRegister {
    pub base: u64,
    pub limit: u16,
}

impl TableRegister {
    #[must_use]
    pub const fn new(base: u64, limit: u16) -> Self {
        Self { base, limit }
    }

    /// `true` if neither base nor limit has been set.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.base == 0 && self.limit == 0
    }

    /// Address one past the last byte covered by the table.
    #[must_use]
    pub fn end(&self) -> u64 {
        self.base.saturating_add(u64::from(self.limit) + 1)
    }
}

impl Wire for TableRegister {
    const SIZE: usize = 10;

    fn encode(&self, out: &mut [u8]) {
        WireWriter::new(out).put(&self.base).put(&self.limit);
    }

    fn decode(bytes: &[u8]) -> Self {
        let mut r = WireReader::new(bytes);
        Self {
            base: r.get(),
            limit: r.get(),
        }
    }
}

impl RegisterFields for TableRegister {
    fn fields(&self) -> Vec<(&'static str, u64)> {
        vec![("base", self.base), ("limit", u64::from(self.limit))]
    }
}
