//! Type-nibble values (descriptor bits 43:40).
//!
//! Code/data values apply with `S = 1`, everything else with `S = 0`.

/// Execute/read code, accessed.
pub const CODE: u8 = 0b1011;
/// Read/write data, accessed.
pub const DATA: u8 = 0b0011;

pub const LDT: u8 = 0b0010;
pub const TSS_AVAILABLE: u8 = 0b1001;
pub const TSS_BUSY: u8 = 0b1011;
pub const CALL_GATE: u8 = 0b1100;
pub const TASK_GATE: u8 = 0b0101;
pub const INTERRUPT_GATE: u8 = 0b1110;
pub const TRAP_GATE: u8 = 0b1111;

/// TSS descriptor type, `0b1001 | busy << 1`.
#[must_use]
pub const fn tss(busy: bool) -> u8 {
    TSS_AVAILABLE | (busy as u8) << 1
}

/// Interrupt gate type, `d << 3 | 0b110` with `d` set for 32-bit gates.
#[must_use]
pub const fn interrupt_gate(size32: bool) -> u8 {
    (size32 as u8) << 3 | 0b110
}

/// Trap gate type, `d << 3 | 0b111` with `d` set for 32-bit gates.
#[must_use]
pub const fn trap_gate(size32: bool) -> u8 {
    (size32 as u8) << 3 | 0b111
}

/// `true` for any TSS type, 16- or 32/64-bit, available or busy.
#[must_use]
pub const fn is_tss(typ: u8) -> bool {
    matches!(typ & 0xf, 0b0001 | 0b0011 | TSS_AVAILABLE | TSS_BUSY)
}

/// `true` for interrupt, trap and call gates of either size.
#[must_use]
pub const fn is_gate(typ: u8) -> bool {
    matches!(typ & 0xf, 0b0100 | 0b0110 | 0b0111 | CALL_GATE | INTERRUPT_GATE | TRAP_GATE)
}
