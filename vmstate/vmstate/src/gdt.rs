//! Editing the GDT after [`VmState::setup_gdt`].
//!
//! Appending only works while the GDT is the most recent allocation: the arena
//! never moves data, so the table can only grow into the bytes right after it.

use crate::error::VmStateError;
use crate::setup::table_limit;
use crate::state::VmState;
use log::debug;
use vmstate_descriptors::{SegmentSelector, TableEntry};

impl VmState {
    /// `true` if the GDT ends exactly where memory ends.
    #[must_use]
    pub fn gdt_is_last_allocation(&self) -> bool {
        let gdtr = self.regs.gdtr;
        !gdtr.is_unset() && gdtr.end() == self.memory.end()
    }

    /// Append `entry` to the GDT and return its selector (RPL 0).
    ///
    /// # Errors
    /// [`VmStateError::PreconditionViolation`] if the GDT is not the last
    /// allocation or would outgrow a 16-bit limit.
    pub fn append_gdt_entry(&mut self, entry: impl Into<TableEntry>) -> Result<u16, VmStateError> {
        if !self.gdt_is_last_allocation() {
            return Err(VmStateError::PreconditionViolation(
                "GDT must be the last allocation to grow",
            ));
        }

        let entry = entry.into();
        let old_size = usize::from(self.regs.gdtr.limit) + 1;
        let limit = table_limit(old_size + entry.size())?;
        let selector = u16::try_from(old_size)
            .map_err(|_| VmStateError::PreconditionViolation("GDT is full"))?;

        let addr = self.memory.allocate(entry.size() as u64)?;
        self.memory.write(addr, &entry.to_bytes())?;
        self.regs.gdtr.limit = limit;
        debug!("appended GDT entry {selector:#06x} ({} bytes)", entry.size());
        Ok(selector)
    }

    /// Decode the GDT entry at `selector`.
    ///
    /// In long mode system segments and gates are read in their 16-byte form.
    ///
    /// # Errors
    /// - [`VmStateError::LocalTableSelector`] if the TI bit is set.
    /// - [`VmStateError::SelectorOutOfBounds`] if the entry extends past
    ///   `GDTR.limit` or its address overflows.
    pub fn read_gdt_entry(&self, selector: u16) -> Result<TableEntry, VmStateError> {
        let addr = self.gdt_slot(selector, 8)?;
        let low: u64 = self.memory.read_value(addr)?;
        let size = TableEntry::size_of_raw(low, self.width());
        let addr = self.gdt_slot(selector, size)?;
        let bytes = self.memory.read(addr, size as u64)?;
        Ok(TableEntry::decode(bytes, self.width()))
    }

    /// Overwrite the GDT entry at `selector`.
    ///
    /// Segment registers keep their cached copy; reload them with
    /// [`VmState::load_seg`] to pick up the change.
    ///
    /// # Errors
    /// As [`VmState::read_gdt_entry`].
    pub fn write_gdt_entry(
        &mut self,
        selector: u16,
        entry: impl Into<TableEntry>,
    ) -> Result<(), VmStateError> {
        let entry = entry.into();
        let addr = self.gdt_slot(selector, entry.size())?;
        self.memory.write(addr, &entry.to_bytes())?;
        Ok(())
    }

    fn gdt_slot(&self, selector: u16, size: usize) -> Result<u64, VmStateError> {
        let sel = SegmentSelector::from_bits(selector);
        if sel.is_local() {
            return Err(VmStateError::LocalTableSelector(selector));
        }

        let gdtr = self.regs.gdtr;
        let out_of_bounds = VmStateError::SelectorOutOfBounds {
            selector,
            limit: gdtr.limit,
        };
        let offset = u64::from(sel.table_offset());
        if offset + size as u64 > u64::from(gdtr.limit) + 1 {
            return Err(out_of_bounds);
        }
        gdtr.base.checked_add(offset).ok_or(out_of_bounds)
    }
}
