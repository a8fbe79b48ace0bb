//! The register file aggregate.
//!
//! Field declaration order is the wire order. The `register_file!` macro keeps
//! the struct, the name table, the inspection view and the codec in lockstep so
//! a register can only be added in one place.

use crate::{Cr0, Cr4, Efer, Eflags, RegisterFields, SegmentCache, TableRegister};
use alloc::vec;
use alloc::vec::Vec;
use vmstate_memory::{Wire, WireReader, WireWriter};

/// Size of an encoded [`RegisterFile`] in bytes.
pub const REGISTER_FILE_SIZE: usize = 396;

macro_rules! register_file {
    ($( $(#[$meta:meta])* $name:ident : $ty:ty ),+ $(,)?) => {
        /// All architectural registers of one virtual CPU.
        ///
        /// A default-constructed file is all zeros apart from `EFLAGS` bit 1.
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct RegisterFile {
            $( $(#[$meta])* pub $name: $ty, )+
        }

        impl RegisterFile {
            /// Register names in wire order.
            pub const NAMES: &'static [&'static str] = &[$( stringify!($name) ),+];

            /// Every register with its named sub-fields, in wire order.
            #[must_use]
            pub fn fields(&self) -> Vec<(&'static str, Vec<(&'static str, u64)>)> {
                vec![$( (stringify!($name), self.$name.fields()) ),+]
            }
        }

        impl Wire for RegisterFile {
            const SIZE: usize = 0 $( + <$ty as Wire>::SIZE )+;

            fn encode(&self, out: &mut [u8]) {
                let mut w = WireWriter::new(out);
                $( w.put(&self.$name); )+
            }

            fn decode(bytes: &[u8]) -> Self {
                let mut r = WireReader::new(bytes);
                Self { $( $name: r.get(), )+ }
            }
        }
    };
}

register_file! {
    rax: u64,
    rcx: u64,
    rdx: u64,
    rbx: u64,
    rsp: u64,
    rbp: u64,
    rsi: u64,
    rdi: u64,
    r8: u64,
    r9: u64,
    r10: u64,
    r11: u64,
    r12: u64,
    r13: u64,
    r14: u64,
    r15: u64,
    rip: u64,
    eflags: Eflags,
    es: SegmentCache,
    cs: SegmentCache,
    ss: SegmentCache,
    ds: SegmentCache,
    fs: SegmentCache,
    gs: SegmentCache,
    /// Task register; cached like a segment but always a system segment.
    tr: SegmentCache,
    idtr: TableRegister,
    gdtr: TableRegister,
    cr0: Cr0,
    /// Page-fault linear address.
    cr2: u64,
    /// Physical address of the top-level page table.
    cr3: u64,
    cr4: Cr4,
    dr0: u64,
    dr1: u64,
    dr2: u64,
    dr3: u64,
    dr6: u32,
    dr7: u32,
    sysenter_cs: u32,
    sysenter_eip: u64,
    sysenter_esp: u64,
    efer: Efer,
    kernel_gs_base: u64,
    star: u64,
    lstar: u64,
    cstar: u64,
    sfmask: u32,
}

const _: () = {
    assert!(<RegisterFile as Wire>::SIZE == REGISTER_FILE_SIZE);
};

impl RegisterFile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn segment(&self, register: SegmentRegister) -> &SegmentCache {
        match register {
            SegmentRegister::Es => &self.es,
            SegmentRegister::Cs => &self.cs,
            SegmentRegister::Ss => &self.ss,
            SegmentRegister::Ds => &self.ds,
            SegmentRegister::Fs => &self.fs,
            SegmentRegister::Gs => &self.gs,
            SegmentRegister::Tr => &self.tr,
        }
    }

    pub const fn segment_mut(&mut self, register: SegmentRegister) -> &mut SegmentCache {
        match register {
            SegmentRegister::Es => &mut self.es,
            SegmentRegister::Cs => &mut self.cs,
            SegmentRegister::Ss => &mut self.ss,
            SegmentRegister::Ds => &mut self.ds,
            SegmentRegister::Fs => &mut self.fs,
            SegmentRegister::Gs => &mut self.gs,
            SegmentRegister::Tr => &mut self.tr,
        }
    }
}

/// Registers that hold a selector and a descriptor cache.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SegmentRegister {
    Es,
    Cs,
    Ss,
    Ds,
    Fs,
    Gs,
    Tr,
}

impl SegmentRegister {
    pub const ALL: [Self; 7] = [
        Self::Es,
        Self::Cs,
        Self::Ss,
        Self::Ds,
        Self::Fs,
        Self::Gs,
        Self::Tr,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::Cs => "cs",
            Self::Ss => "ss",
            Self::Ds => "ds",
            Self::Fs => "fs",
            Self::Gs => "gs",
            Self::Tr => "tr",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fresh_file_has_only_fixed_flag() {
        let regs = RegisterFile::new();
        let bytes = regs.to_bytes();
        assert_eq!(bytes.len(), REGISTER_FILE_SIZE);

        // eflags sits right after rip.
        assert_eq!(&bytes[136..140], &[0x02, 0, 0, 0]);
        assert!(bytes[..136].iter().all(|&b| b == 0));
        assert!(bytes[140..].iter().all(|&b| b == 0));
    }

    #[test]
    fn fields_follow_wire_order() {
        let regs = RegisterFile::new();
        let names: Vec<_> = regs.fields().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, RegisterFile::NAMES);
        assert_eq!(names.len(), 46);
        assert_eq!(names[17], "eflags");
        assert_eq!(names[45], "sfmask");
    }

    #[test]
    fn offsets_of_selected_registers() {
        let mut regs = RegisterFile::new();
        regs.rip = 0x1122_3344_5566_7788;
        regs.cs.selector = 0x0008;
        regs.gdtr.limit = 0x2f;
        regs.sfmask = 0xdead_beef;

        let bytes = regs.to_bytes();
        assert_eq!(u64::decode(&bytes[128..]), 0x1122_3344_5566_7788);
        // cs is the second segment cache: 140 + 16, selector at +12.
        assert_eq!(u16::decode(&bytes[168..]), 0x0008);
        // gdtr follows idtr at 140 + 7 * 16 + 10, limit at +8.
        assert_eq!(u16::decode(&bytes[270..]), 0x2f);
        assert_eq!(u32::decode(&bytes[392..]), 0xdead_beef);
        assert_eq!(RegisterFile::decode(&bytes), regs);
    }

    #[test]
    fn segment_accessors_cover_all_caches() {
        let mut regs = RegisterFile::new();
        for (i, reg) in SegmentRegister::ALL.into_iter().enumerate() {
            regs.segment_mut(reg).selector = u16::try_from(i).unwrap() * 8;
        }
        assert_eq!(regs.es.selector, 0);
        assert_eq!(regs.tr.selector, 0x30);
        assert_eq!(regs.segment(SegmentRegister::Ss).selector, 0x10);
    }
}
