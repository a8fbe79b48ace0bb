use crate::RegisterFields;
use alloc::vec::Vec;
use bitfield_struct::bitfield;

/// CR4: Control Register 4, as stored in the register image (32 bits).
///
/// Controls paging extensions, extended instruction state management, and
/// various protection features (`UMIP`, `SMEP`/`SMAP`, `PKE`, ...).
#[bitfield(u32, order = Lsb)]
#[derive(Eq, PartialEq)]
pub struct Cr4 {
    /// Bit 0 (VME): Virtual-8086 Mode Extensions.
    pub vme: bool,

    /// Bit 1 (PVI): Protected-Mode Virtual Interrupts.
    pub pvi: bool,

    /// Bit 2 (TSD): Time Stamp Disable.
    ///
    /// When set, RDTSC/RDTSCP are privileged (CPL 0 only).
    pub tsd: bool,

    /// Bit 3 (DE): Debugging Extensions.
    pub de: bool,

    /// Bit 4 (PSE): Page Size Extensions.
    ///
    /// Enables 4 MiB pages with 32-bit paging.
    pub pse: bool,

    /// Bit 5 (PAE): Physical Address Extension.
    ///
    /// Required for 4-level paging.
    pub pae: bool,

    /// Bit 6 (MCE): Machine-Check Enable.
    pub mce: bool,

    /// Bit 7 (PGE): Page Global Enable.
    pub pge: bool,

    /// Bit 8 (PCE): Performance-Monitoring Counter Enable.
    pub pce: bool,

    /// Bit 9 (OSFXSR): OS supports FXSAVE/FXRSTOR.
    pub osfxsr: bool,

    /// Bit 10 (OSXMMEXCPT): OS supports unmasked SIMD FP exceptions.
    pub osxmmexcpt: bool,

    /// Bit 11 (UMIP): User-Mode Instruction Prevention.
    pub umip: bool,

    /// Bit 12 (LA57): 57-bit linear addresses (5-level paging).
    pub la57: bool,

    /// Bit 13 (VMXE): VMX Enable (Intel VT-x).
    pub vmxe: bool,

    /// Bit 14 (SMXE): SMX Enable.
    pub smxe: bool,

    /// Bit 15: Reserved (must be 0).
    #[bits(default = false)]
    _reserved_15: bool,

    /// Bit 16 (FSGSBASE): Enable {R,W}{D,}FSBASE/GSBASE in CPL > 0.
    pub fsgsbase: bool,

    /// Bit 17 (PCIDE): Process-Context Identifiers.
    pub pcide: bool,

    /// Bit 18 (OSXSAVE): OS uses XSAVE/XRSTOR and XCR0.
    pub osxsave: bool,

    /// Bit 19: Reserved (must be 0).
    #[bits(default = false)]
    _reserved_19: bool,

    /// Bit 20 (SMEP): Supervisor Mode Execution Prevention.
    pub smep: bool,

    /// Bit 21 (SMAP): Supervisor Mode Access Prevention.
    pub smap: bool,

    /// Bit 22 (PKE): Protection Keys Enable.
    pub pke: bool,

    /// Bits 23–31: Reserved.
    #[bits(9, default = 0)]
    _reserved_23_31: u16,
}

vmstate_memory::wire_bits!(Cr4 => u32);

impl RegisterFields for Cr4 {
    fn fields(&self) -> Vec<(&'static str, u64)> {
        [
            ("vme", self.vme()),
            ("pvi", self.pvi()),
            ("tsd", self.tsd()),
            ("de", self.de()),
            ("pse", self.pse()),
            ("pae", self.pae()),
            ("mce", self.mce()),
            ("pge", self.pge()),
            ("pce", self.pce()),
            ("osfxsr", self.osfxsr()),
            ("osxmmexcpt", self.osxmmexcpt()),
            ("umip", self.umip()),
            ("la57", self.la57()),
            ("vmxe", self.vmxe()),
            ("smxe", self.smxe()),
            ("fsgsbase", self.fsgsbase()),
            ("pcide", self.pcide()),
            ("osxsave", self.osxsave()),
            ("smep", self.smep()),
            ("smap", self.smap()),
            ("pke", self.pke()),
        ]
        .into_iter()
        .map(|(name, bit)| (name, u64::from(bit)))
        .collect()
    }
}
