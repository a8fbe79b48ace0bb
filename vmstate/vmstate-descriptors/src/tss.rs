//! # Task-state segments
//!
//! Both layouts are 104 bytes. The 32-bit TSS is used for hardware task
//! switching and stores the full register state of a task; 16-bit selector
//! slots are padded to 32 bits. The 64-bit TSS only carries the privilege
//! stack table (`rsp0..rsp2`), the interrupt stack table (`ist1..ist7`) and
//! the I/O map base.

use vmstate_memory::{Wire, WireReader, WireWriter};

/// Encoded size of either TSS layout.
pub const TSS_SIZE: usize = 104;

/// Byte-granular descriptor limit covering a whole TSS.
pub const TSS_LIMIT: u32 = 103;

const _: () = {
    assert!(TSS_LIMIT as usize + 1 == TSS_SIZE);
};

/// 32-bit Task State Segment.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Tss32 {
    pub prev_task_link: u16,
    pub esp0: u32,
    pub ss0: u16,
    pub esp1: u32,
    pub ss1: u16,
    pub esp2: u32,
    pub ss2: u16,
    pub cr3: u32,
    pub eip: u32,
    pub eflags: u32,
    pub eax: u32,
    pub ecx: u32,
    pub edx: u32,
    pub ebx: u32,
    pub esp: u32,
    pub ebp: u32,
    pub esi: u32,
    pub edi: u32,
    pub es: u16,
    pub cs: u16,
    pub ss: u16,
    pub ds: u16,
    pub fs: u16,
    pub gs: u16,
    pub ldt_selector: u16,
    /// `T`: raise a debug exception on a task switch into this task.
    pub trap: bool,
    pub io_map_base: u16,
}

trait PutSelector {
    fn put_selector(&mut self, selector: u16) -> &mut Self;
}

impl PutSelector for WireWriter<'_> {
    fn put_selector(&mut self, selector: u16) -> &mut Self {
        self.put(&selector).put(&0u16)
    }
}

fn get_selector(r: &mut WireReader<'_>) -> u16 {
    let selector = r.get();
    let _padding: u16 = r.get();
    selector
}

impl Wire for Tss32 {
    const SIZE: usize = TSS_SIZE;

    fn encode(&self, out: &mut [u8]) {
        let mut w = WireWriter::new(out);
        w.put_selector(self.prev_task_link)
            .put(&self.esp0)
            .put_selector(self.ss0)
            .put(&self.esp1)
            .put_selector(self.ss1)
            .put(&self.esp2)
            .put_selector(self.ss2);
        for reg in [
            self.cr3,
            self.eip,
            self.eflags,
            self.eax,
            self.ecx,
            self.edx,
            self.ebx,
            self.esp,
            self.ebp,
            self.esi,
            self.edi,
        ] {
            w.put(&reg);
        }
        for sel in [
            self.es,
            self.cs,
            self.ss,
            self.ds,
            self.fs,
            self.gs,
            self.ldt_selector,
        ] {
            w.put_selector(sel);
        }
        w.put(&u16::from(self.trap)).put(&self.io_map_base);
    }

    fn decode(bytes: &[u8]) -> Self {
        let mut r = WireReader::new(bytes);
        Self {
            prev_task_link: get_selector(&mut r),
            esp0: r.get(),
            ss0: get_selector(&mut r),
            esp1: r.get(),
            ss1: get_selector(&mut r),
            esp2: r.get(),
            ss2: get_selector(&mut r),
            cr3: r.get(),
            eip: r.get(),
            eflags: r.get(),
            eax: r.get(),
            ecx: r.get(),
            edx: r.get(),
            ebx: r.get(),
            esp: r.get(),
            ebp: r.get(),
            esi: r.get(),
            edi: r.get(),
            es: get_selector(&mut r),
            cs: get_selector(&mut r),
            ss: get_selector(&mut r),
            ds: get_selector(&mut r),
            fs: get_selector(&mut r),
            gs: get_selector(&mut r),
            ldt_selector: get_selector(&mut r),
            trap: r.get::<u16>() & 1 != 0,
            io_map_base: r.get(),
        }
    }
}

/// 64-bit Task State Segment.
///
/// `rsp[n]` is the stack loaded on a privilege change to ring `n`; `ist[n]`
/// is IST slot `n + 1` as referenced from an IDT gate.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Tss64 {
    pub rsp: [u64; 3],
    pub ist: [u64; 7],
    pub io_map_base: u16,
}

impl Wire for Tss64 {
    const SIZE: usize = TSS_SIZE;

    fn encode(&self, out: &mut [u8]) {
        let mut w = WireWriter::new(out);
        w.put(&0u32);
        for rsp in &self.rsp {
            w.put(rsp);
        }
        w.put(&0u64);
        for ist in &self.ist {
            w.put(ist);
        }
        w.put(&0u64).put(&0u16).put(&self.io_map_base);
    }

    fn decode(bytes: &[u8]) -> Self {
        let mut r = WireReader::new(bytes);
        let _reserved: u32 = r.get();
        let rsp = [r.get(), r.get(), r.get()];
        let _reserved: u64 = r.get();
        let ist = [
            r.get(),
            r.get(),
            r.get(),
            r.get(),
            r.get(),
            r.get(),
            r.get(),
        ];
        let _reserved: u64 = r.get();
        let _reserved: u16 = r.get();
        Self {
            rsp,
            ist,
            io_map_base: r.get(),
        }
    }
}
