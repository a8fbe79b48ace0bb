//! # Mode setup
//!
//! Composite procedures that move a state between real mode, flat protected
//! mode and paging. None of them roll back on failure.
//!
//! ## Flat GDT
//!
//! Index | Selector | Descriptor
//! ------|----------|-----------------------------------------------
//! 0     | 0x00     | Null
//! 1     | 0x08     | Kernel code ([`KERNEL_CS`], DPL 0)
//! 2     | 0x10     | User code ([`USER_CS`], DPL 3)
//! 3     | 0x18     | Kernel data ([`KERNEL_DS`], DPL 0)
//! 4     | 0x20     | User data ([`USER_DS`], DPL 3)
//! 5     | 0x28     | Busy TSS ([`TSS_SEL`]), 16 bytes in long mode
//!
//! Code and data segments span 4 GiB with 4 KiB granularity. The selectors
//! carry RPL 0; OR in 3 to load the user segments from ring 3.

use crate::error::VmStateError;
use crate::state::VmState;
use log::debug;
use vmstate_descriptors::{
    Dpl, Extended, Rpl, SegmentDescriptor, SegmentSelector, TSS_LIMIT, TSS_SIZE, TableEntry,
    encode_table,
};
use vmstate_memory::PAGE_SIZE;
use vmstate_paging::identity::{identity_directory_4m, identity_pdpt_1g, table_bytes};
use vmstate_paging::{Pml4e, TABLE_SIZE};
use vmstate_registers::{SegmentRegister, TableRegister};

pub const KERNEL_CS: u16 = SegmentSelector::gdt(1, Rpl::Ring0).into_bits();
pub const USER_CS: u16 = SegmentSelector::gdt(2, Rpl::Ring0).into_bits();
pub const KERNEL_DS: u16 = SegmentSelector::gdt(3, Rpl::Ring0).into_bits();
pub const USER_DS: u16 = SegmentSelector::gdt(4, Rpl::Ring0).into_bits();
pub const TSS_SEL: u16 = SegmentSelector::gdt(5, Rpl::Ring0).into_bits();

const _: () = {
    assert!(KERNEL_CS == 0x08);
    assert!(USER_CS == 0x10);
    assert!(KERNEL_DS == 0x18);
    assert!(USER_DS == 0x20);
    assert!(TSS_SEL == 0x28);
};

/// Largest table a 16-bit limit can describe.
const MAX_TABLE_SIZE: usize = 0x1_0000;

impl VmState {
    /// Configure segment and table registers for real-mode execution.
    ///
    /// Every segment gets a 64 KiB limit, `IDTR`/`GDTR` get limit `0xffff`,
    /// and `CR0.PE` is cleared.
    ///
    /// # Errors
    /// [`VmStateError::PreconditionViolation`] if long mode is active.
    pub fn setup_real(&mut self) -> Result<(), VmStateError> {
        if self.long_mode_active() {
            return Err(VmStateError::PreconditionViolation(
                "real mode requires EFER.LMA = 0",
            ));
        }

        let segments = [
            (SegmentRegister::Cs, true, 0b1011),
            (SegmentRegister::Ds, true, 0b0011),
            (SegmentRegister::Es, true, 0b0011),
            (SegmentRegister::Fs, true, 0b0011),
            (SegmentRegister::Gs, true, 0b0011),
            (SegmentRegister::Ss, true, 0b0011),
            (SegmentRegister::Tr, false, 0b1011),
        ];
        for (register, s, typ) in segments {
            let cache = self.regs.segment_mut(register);
            cache.limit = 0xffff;
            cache.attributes = cache.attributes.with_typ(typ).with_s(s).with_p(true);
        }

        self.regs.idtr.limit = 0xffff;
        self.regs.gdtr.limit = 0xffff;
        self.regs.cr0.set_pe_protection_enable(false);
        debug!("switched to real mode");
        Ok(())
    }

    /// Build the flat GDT described in the module docs, install it in `GDTR`
    /// and load `CS`, `DS`, `ES`, `SS` and `TR` from it.
    ///
    /// The TSS (104 zero bytes) is allocated first, the GDT directly after it.
    /// Code segments are 64-bit in long mode, 32-bit otherwise.
    ///
    /// # Errors
    /// [`VmStateError::PreconditionViolation`] if `GDTR` is already set; any
    /// allocation or segment-load failure.
    pub fn setup_gdt(&mut self) -> Result<(), VmStateError> {
        if !self.regs.gdtr.is_unset() {
            return Err(VmStateError::PreconditionViolation(
                "GDTR base and limit must be zero",
            ));
        }

        let long = self.long_mode_active();
        let tss_addr = self.memory.allocate(TSS_SIZE as u64)?;
        let gdt: [TableEntry; 6] = [
            SegmentDescriptor::null().into(),
            SegmentDescriptor::flat_code(Dpl::Ring0, long).into(),
            SegmentDescriptor::flat_code(Dpl::Ring3, long).into(),
            SegmentDescriptor::flat_data(Dpl::Ring0).into(),
            SegmentDescriptor::flat_data(Dpl::Ring3).into(),
            if long {
                Extended::tss64(tss_addr, TSS_LIMIT, true, Dpl::Ring0).into()
            } else {
                SegmentDescriptor::tss(tss_addr, TSS_LIMIT, true, Dpl::Ring0).into()
            },
        ];

        let table = encode_table(&gdt);
        let gdt_addr = self.memory.allocate(table.len() as u64)?;
        self.memory.write(gdt_addr, &table)?;
        self.regs.gdtr = TableRegister::new(gdt_addr, table_limit(table.len())?);
        debug!(
            "GDT at {gdt_addr:#x} ({} bytes), TSS at {tss_addr:#x}",
            table.len()
        );

        self.load_seg(SegmentRegister::Cs, KERNEL_CS)?;
        self.load_seg(SegmentRegister::Ds, KERNEL_DS)?;
        self.load_seg(SegmentRegister::Es, KERNEL_DS)?;
        self.load_seg(SegmentRegister::Ss, KERNEL_DS)?;
        self.load_seg(SegmentRegister::Tr, TSS_SEL)?;
        Ok(())
    }

    /// Write `descriptors` contiguously into an 8-byte aligned IDT and install
    /// it in `IDTR`.
    ///
    /// # Errors
    /// [`VmStateError::PreconditionViolation`] if `descriptors` is empty or the
    /// table exceeds 64 KiB; any allocation failure.
    pub fn setup_idt(&mut self, descriptors: &[TableEntry]) -> Result<(), VmStateError> {
        if descriptors.is_empty() {
            return Err(VmStateError::PreconditionViolation(
                "IDT needs at least one descriptor",
            ));
        }

        let table = encode_table(descriptors);
        let limit = table_limit(table.len())?;
        let idt_addr = self.memory.allocate_aligned(table.len() as u64, 8)?;
        self.memory.write(idt_addr, &table)?;
        self.regs.idtr = TableRegister::new(idt_addr, limit);
        debug!(
            "IDT at {idt_addr:#x} with {} descriptors",
            descriptors.len()
        );
        Ok(())
    }

    /// Identity-map physical memory with large pages and enable paging.
    ///
    /// - Legacy: one page directory of 1024 4 MiB pages covering 4 GiB.
    /// - Long: one PML4 whose first entry points at a PDPT of 512 1 GiB pages
    ///   covering 512 GiB; sets `CR4.PAE`.
    ///
    /// Both set `CR4.PSE`, `CR0.PG` and point `CR3` at the top-level table.
    ///
    /// # Errors
    /// [`VmStateError::PreconditionViolation`] if paging is already enabled;
    /// any allocation failure.
    pub fn setup_paging(&mut self) -> Result<(), VmStateError> {
        if self.regs.cr0.pg_paging() {
            return Err(VmStateError::PreconditionViolation(
                "paging is already enabled",
            ));
        }

        if self.long_mode_active() {
            let pml4 = self.memory.allocate_aligned(TABLE_SIZE, PAGE_SIZE)?;
            let pdpt = self.memory.allocate_aligned(TABLE_SIZE, PAGE_SIZE)?;
            self.memory.write_value(pml4, &Pml4e::table(pdpt >> 12))?;
            self.memory.write(pdpt, &table_bytes(&identity_pdpt_1g()))?;
            self.regs.cr4.set_pae(true);
            self.regs.cr3 = pml4;
            debug!("4-level paging: PML4 at {pml4:#x}, PDPT at {pdpt:#x}");
        } else {
            let directory = self.memory.allocate_aligned(TABLE_SIZE, PAGE_SIZE)?;
            self.memory
                .write(directory, &table_bytes(&identity_directory_4m()))?;
            self.regs.cr3 = directory;
            debug!("32-bit paging: page directory at {directory:#x}");
        }

        self.regs.cr4.set_pse(true);
        self.regs.cr0.set_pg_paging(true);
        Ok(())
    }
}

/// `size - 1` as a 16-bit table limit.
pub(crate) fn table_limit(size: usize) -> Result<u16, VmStateError> {
    if size == 0 || size > MAX_TABLE_SIZE {
        return Err(VmStateError::PreconditionViolation(
            "descriptor table must be 1..=65536 bytes",
        ));
    }
    u16::try_from(size - 1)
        .map_err(|_| VmStateError::PreconditionViolation("descriptor table too large"))
}
