use crate::RegisterFields;
use alloc::vec::Vec;
use bitfield_struct::bitfield;

/// Architectural model of CR0 as stored in the register image (32 bits).
///
/// Exposes all architecturally defined control bits as booleans
/// and keeps all reserved bits forced to 0.
#[bitfield(u32)]
#[derive(Eq, PartialEq)]
pub struct Cr0 {
    /// Bit 0: Protection Enable (PE).
    ///
    /// - 0: Real mode (no paging, no protection).
    /// - 1: Protected mode (required for paging / long mode).
    pub pe_protection_enable: bool,

    /// Bit 1: Monitor Coprocessor (MP).
    ///
    /// Controls interaction of WAIT/FWAIT with TS in CR0 for x87.
    pub mp_monitor_coprocessor: bool,

    /// Bit 2: Emulation (EM).
    ///
    /// - 1: No x87 present; all x87 instructions fault.
    /// - 0: x87 instructions executed normally.
    pub em_emulation: bool,

    /// Bit 3: Task Switched (TS).
    ///
    /// Set on task switch; used to manage x87/SSE lazy state.
    pub ts_task_switched: bool,

    /// Bit 4: Extension Type (ET).
    pub et_extension_type: bool,

    /// Bit 5: Numeric Error (NE).
    ///
    /// - 1: x87 errors reported via exceptions (#MF).
    /// - 0: x87 errors signaled via external IRQ 13 (legacy).
    ///
    /// Required for `VMXON`.
    pub ne_numeric_error: bool,

    /// Bits 6–15: Reserved (must be 0).
    #[bits(10, default = 0)]
    _reserved_6_15: u16,

    /// Bit 16: Write Protect (WP).
    ///
    /// When set, supervisor code must respect user/supervisor
    /// read-only pages; when clear, supervisor may write them.
    pub wp_write_protect: bool,

    /// Bit 17: Reserved (must be 0).
    #[bits(default = false)]
    _reserved_17: bool,

    /// Bit 18: Alignment Mask (AM).
    ///
    /// With CR0.AM=1 and EFLAGS.AC=1, unaligned accesses in
    /// ring 3 may raise #AC.
    pub am_alignment_mask: bool,

    /// Bits 19–28: Reserved (must be 0).
    #[bits(10, default = 0)]
    _reserved_19_28: u16,

    /// Bit 29: Not-Write-Through (NW).
    pub nw_not_write_through: bool,

    /// Bit 30: Cache Disable (CD).
    pub cd_cache_disable: bool,

    /// Bit 31: Paging (PG).
    ///
    /// - 0: Paging disabled.
    /// - 1: Paging enabled (requires PE=1).
    pub pg_paging: bool,
}

vmstate_memory::wire_bits!(Cr0 => u32);

impl RegisterFields for Cr0 {
    fn fields(&self) -> Vec<(&'static str, u64)> {
        [
            ("pe", self.pe_protection_enable()),
            ("mp", self.mp_monitor_coprocessor()),
            ("em", self.em_emulation()),
            ("ts", self.ts_task_switched()),
            ("et", self.et_extension_type()),
            ("ne", self.ne_numeric_error()),
            ("wp", self.wp_write_protect()),
            ("am", self.am_alignment_mask()),
            ("nw", self.nw_not_write_through()),
            ("cd", self.cd_cache_disable()),
            ("pg", self.pg_paging()),
        ]
        .into_iter()
        .map(|(name, bit)| (name, u64::from(bit)))
        .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn control_bits_land_on_architectural_positions() {
        let cr0 = Cr0::new()
            .with_pe_protection_enable(true)
            .with_ne_numeric_error(true)
            .with_wp_write_protect(true)
            .with_pg_paging(true);
        assert_eq!(cr0.into_bits(), 0x8001_0021);
    }
}
