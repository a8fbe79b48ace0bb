use crate::RegisterFields;
use alloc::vec::Vec;
use bitfield_struct::bitfield;

/// `IA32_EFER` (MSR `0xC000_0080`) as stored in the register image (32 bits).
///
/// Extended Feature Enable Register used for `SYSCALL`/`SYSRET`, long mode,
/// `NX`, and various AMD extensions. Only the low half of the MSR is kept.
#[bitfield(u32, order = Lsb)]
#[derive(Eq, PartialEq)]
pub struct Efer {
    /// Bit 0 (SCE): System Call Extensions.
    ///
    /// Enables SYSCALL/SYSRET when set.
    pub sce: bool,

    /// Bits 1–7: Reserved.
    #[bits(7, default = 0)]
    _reserved_1_7: u8,

    /// Bit 8 (LME): Long Mode Enable.
    ///
    /// Enables IA-32e (long) mode when paging is enabled.
    pub lme: bool,

    /// Bit 9: Reserved.
    #[bits(default = false)]
    _reserved_9: bool,

    /// Bit 10 (LMA): Long Mode Active.
    ///
    /// The image builder treats this as the authoritative "64-bit" switch.
    pub lma: bool,

    /// Bit 11 (NXE): No-Execute Enable.
    pub nxe: bool,

    /// Bit 12 (SVME): Secure Virtual Machine Enable (AMD SVM).
    pub svme: bool,

    /// Bit 13 (LMSLE): Long Mode Segment Limit Enable.
    pub lmsle: bool,

    /// Bit 14 (FFXSR): Fast FXSAVE/FXRSTOR.
    pub ffxsr: bool,

    /// Bit 15 (TCE): Translation Cache Extension.
    pub tce: bool,

    /// Bits 16–31: Reserved.
    #[bits(16, default = 0)]
    _reserved_16_31: u16,
}

vmstate_memory::wire_bits!(Efer => u32);

impl RegisterFields for Efer {
    fn fields(&self) -> Vec<(&'static str, u64)> {
        [
            ("sce", self.sce()),
            ("lme", self.lme()),
            ("lma", self.lma()),
            ("nxe", self.nxe()),
            ("svme", self.svme()),
            ("lmsle", self.lmsle()),
            ("ffxsr", self.ffxsr()),
            ("tce", self.tce()),
        ]
        .into_iter()
        .map(|(name, bit)| (name, u64::from(bit)))
        .collect()
    }
}
