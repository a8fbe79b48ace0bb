//! Loading a selector into a segment register.
//!
//! Mirrors what `mov sreg, r16` / `ltr` do on hardware: bounds-check the
//! selector against `GDTR.limit`, fetch the descriptor from guest memory and
//! copy it into the hidden part of the register.

use crate::error::VmStateError;
use crate::state::VmState;
use log::trace;
use vmstate_descriptors::composite::scale_limit;
use vmstate_descriptors::{
    Extended, GateDescriptor, SegmentDescriptor, SegmentParams, SegmentSelector, kind,
};
use vmstate_registers::{SegmentAttributes, SegmentCache, SegmentRegister};

impl VmState {
    /// Resolve `selector` through the GDT and load it into `register`.
    ///
    /// Code/data descriptors and, among system descriptors, call gates and
    /// TSS descriptors are understood. In long mode the latter two are read in
    /// their 16-byte form. A call gate caches its entry offset as the base and
    /// a zero limit.
    ///
    /// # Errors
    /// - [`VmStateError::LocalTableSelector`] if the selector's TI bit is set.
    /// - [`VmStateError::SelectorOutOfBounds`] if `selector + 7 > GDTR.limit`
    ///   or the descriptor address overflows.
    /// - [`VmStateError::UnsupportedSystemDescriptor`] for other system types.
    /// - [`VmStateError::Memory`] if the table is not backed by guest memory.
    pub fn load_seg(&mut self, register: SegmentRegister, selector: u16) -> Result<(), VmStateError> {
        let sel = SegmentSelector::from_bits(selector);
        if sel.is_local() {
            return Err(VmStateError::LocalTableSelector(selector));
        }

        let gdtr = self.regs.gdtr;
        let out_of_bounds = VmStateError::SelectorOutOfBounds {
            selector,
            limit: gdtr.limit,
        };
        if u32::from(selector) + 7 > u32::from(gdtr.limit) {
            return Err(out_of_bounds);
        }

        let addr = gdtr
            .base
            .checked_add(u64::from(sel.table_offset()))
            .ok_or(out_of_bounds)?;
        let descriptor: SegmentDescriptor = self.memory.read_value(addr)?;
        let long = self.long_mode_active();

        let params = if descriptor.s() {
            descriptor.params()
        } else {
            match descriptor.typ() {
                kind::CALL_GATE => {
                    let offset = if long {
                        self.memory.read_value::<Extended<GateDescriptor>>(addr)?.offset()
                    } else {
                        descriptor_as_gate(descriptor).offset()
                    };
                    SegmentParams {
                        base: offset,
                        limit: 0,
                        ..descriptor.params()
                    }
                }
                kind::TSS_AVAILABLE | kind::TSS_BUSY if long => self
                    .memory
                    .read_value::<Extended<SegmentDescriptor>>(addr)?
                    .params(),
                kind::TSS_AVAILABLE | kind::TSS_BUSY => descriptor.params(),
                typ => {
                    return Err(VmStateError::UnsupportedSystemDescriptor { selector, typ });
                }
            }
        };

        let cache = segment_cache(selector, &params);
        trace!(
            "{}: selector {selector:#06x} -> base {:#x} limit {:#x} type {:#06b}",
            register.name(),
            cache.base,
            cache.limit,
            params.typ
        );
        *self.regs.segment_mut(register) = cache;
        Ok(())
    }
}

const fn descriptor_as_gate(descriptor: SegmentDescriptor) -> GateDescriptor {
    GateDescriptor::from_bits(descriptor.into_bits())
}

fn segment_cache(selector: u16, params: &SegmentParams) -> SegmentCache {
    // A call gate has no avl/l/db/g bits; those positions hold offset bits.
    let gate = !params.s && params.typ == kind::CALL_GATE;
    SegmentCache {
        base: params.base,
        limit: scale_limit(params.limit, params.granularity && !gate),
        selector,
        attributes: SegmentAttributes::new()
            .with_typ(params.typ)
            .with_s(params.s)
            .with_dpl(params.dpl.into_bits())
            .with_p(params.present)
            .with_avl(params.avl && !gate)
            .with_l(params.long_mode && !gate)
            .with_db(params.default_size && !gate)
            .with_g(params.granularity && !gate),
    }
}
