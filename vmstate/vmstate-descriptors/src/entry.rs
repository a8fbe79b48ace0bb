use crate::composite::Width;
use crate::extension::Extended;
use crate::gate::GateDescriptor;
use crate::kind;
use crate::segment::SegmentDescriptor;
use crate::task_gate::TaskGateDescriptor;
use alloc::vec;
use alloc::vec::Vec;
use vmstate_memory::Wire;

/// Any descriptor that can occupy a GDT or IDT slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TableEntry {
    Segment(SegmentDescriptor),
    SystemSegment64(Extended<SegmentDescriptor>),
    Gate(GateDescriptor),
    Gate64(Extended<GateDescriptor>),
    TaskGate(TaskGateDescriptor),
}

impl TableEntry {
    /// Encoded size in bytes (8 or 16).
    #[must_use]
    pub const fn size(&self) -> usize {
        match self {
            Self::Segment(_) | Self::Gate(_) | Self::TaskGate(_) => 8,
            Self::SystemSegment64(_) | Self::Gate64(_) => 16,
        }
    }

    /// # Panics
    /// If `out` is shorter than [`Self::size`].
    pub fn encode(&self, out: &mut [u8]) {
        match self {
            Self::Segment(d) => d.encode(out),
            Self::SystemSegment64(d) => d.encode(out),
            Self::Gate(d) => d.encode(out),
            Self::Gate64(d) => d.encode(out),
            Self::TaskGate(d) => d.encode(out),
        }
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0; self.size()];
        self.encode(&mut out);
        out
    }

    /// Size of the entry whose first 8 bytes are `low`, as a table of the given
    /// width would interpret it.
    ///
    /// Only system segments and interrupt/trap/call gates grow in long mode.
    #[must_use]
    pub const fn size_of_raw(low: u64, width: Width) -> usize {
        let descriptor = SegmentDescriptor::from_bits(low);
        let typ = descriptor.typ();
        let extended = !descriptor.s()
            && typ != kind::TASK_GATE
            && (kind::is_tss(typ) || typ == kind::LDT || kind::is_gate(typ));
        if extended {
            width.size()
        } else {
            Width::Legacy.size()
        }
    }

    /// Decode an entry, classifying it by its `S` bit and type nibble.
    ///
    /// # Panics
    /// If `bytes` is shorter than [`Self::size_of_raw`] reports.
    #[must_use]
    pub fn decode(bytes: &[u8], width: Width) -> Self {
        let low = u64::decode(bytes);
        let descriptor = SegmentDescriptor::from_bits(low);
        let typ = descriptor.typ();
        let long = Self::size_of_raw(low, width) == 16;

        if descriptor.s() {
            Self::Segment(descriptor)
        } else if typ == kind::TASK_GATE {
            Self::TaskGate(TaskGateDescriptor::from_bits(low))
        } else if kind::is_gate(typ) {
            if long {
                Self::Gate64(Extended::decode(bytes))
            } else {
                Self::Gate(GateDescriptor::from_bits(low))
            }
        } else if long {
            Self::SystemSegment64(Extended::decode(bytes))
        } else {
            Self::Segment(descriptor)
        }
    }
}

/// Encode `entries` back to back.
#[must_use]
pub fn encode_table(entries: &[TableEntry]) -> Vec<u8> {
    let mut table = Vec::with_capacity(entries.iter().map(TableEntry::size).sum());
    for entry in entries {
        table.extend_from_slice(&entry.to_bytes());
    }
    table
}

impl From<SegmentDescriptor> for TableEntry {
    fn from(value: SegmentDescriptor) -> Self {
        Self::Segment(value)
    }
}

impl From<Extended<SegmentDescriptor>> for TableEntry {
    fn from(value: Extended<SegmentDescriptor>) -> Self {
        Self::SystemSegment64(value)
    }
}

impl From<GateDescriptor> for TableEntry {
    fn from(value: GateDescriptor) -> Self {
        Self::Gate(value)
    }
}

impl From<Extended<GateDescriptor>> for TableEntry {
    fn from(value: Extended<GateDescriptor>) -> Self {
        Self::Gate64(value)
    }
}

impl From<TaskGateDescriptor> for TableEntry {
    fn from(value: TaskGateDescriptor) -> Self {
        Self::TaskGate(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Dpl, Rpl, SegmentSelector};

    #[test]
    fn mixed_table_is_packed() {
        let cs = SegmentSelector::gdt(1, Rpl::Ring0);
        let table = encode_table(&[
            SegmentDescriptor::null().into(),
            SegmentDescriptor::flat_code(Dpl::Ring0, true).into(),
            Extended::tss64(0x1000, 103, true, Dpl::Ring0).into(),
            Extended::call64(0x2000, cs, Dpl::Ring3, true).into(),
        ]);
        assert_eq!(table.len(), 8 + 8 + 16 + 16);
    }

    #[test]
    fn decode_classifies_by_type() {
        let cs = SegmentSelector::gdt(1, Rpl::Ring0);
        let entries: [TableEntry; 5] = [
            SegmentDescriptor::flat_data(Dpl::Ring3).into(),
            Extended::tss64(0x1_0000_1000, 103, false, Dpl::Ring0).into(),
            Extended::interrupt64(0x4000, cs, Dpl::Ring0, true).into(),
            TaskGateDescriptor::task(SegmentSelector::gdt(5, Rpl::Ring0), Dpl::Ring0, true).into(),
            SegmentDescriptor::tss(0x1000, 103, false, Dpl::Ring0).into(),
        ];
        let widths = [Width::Long, Width::Long, Width::Long, Width::Long, Width::Legacy];

        for (entry, width) in entries.into_iter().zip(widths) {
            let bytes = entry.to_bytes();
            assert_eq!(TableEntry::size_of_raw(u64::decode(&bytes), width), entry.size());
            assert_eq!(TableEntry::decode(&bytes, width), entry);
        }
    }
}
