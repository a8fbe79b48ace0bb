use crate::RegisterFields;
use alloc::vec::Vec;
use bitfield_struct::bitfield;

/// Architectural EFLAGS model as stored in the register image (32 bits).
///
/// Bit 1 is architecturally fixed to 1 and is the only bit set in a freshly
/// created register file. Unlike the 64-bit `RFLAGS` view, `VM` is writable
/// here so virtual-8086 images can be described.
#[bitfield(u32, order = Lsb)]
#[derive(Eq, PartialEq)]
pub struct Eflags {
    /// Carry Flag
    pub cf_carry: bool, // 0

    /// Always 1.
    #[bits(default = true)]
    _always1: bool, // 1

    /// Parity Flag
    pub pf_parity: bool, // 2

    #[bits(default = false)]
    _rsvd3: bool, // 3

    /// Adjust Flag
    pub af_adjust: bool, // 4

    #[bits(default = false)]
    _rsvd5: bool, // 5

    /// Zero Flag
    pub zf_zero: bool, // 6

    /// Sign Flag
    pub sf_sign: bool, // 7

    /// Trap Flag
    pub tf_trap: bool, // 8

    /// Interrupt Enable Flag
    pub if_interrupt_enable: bool, // 9

    /// Direction Flag
    pub df_direction: bool, // 10

    /// Overflow Flag
    pub of_overflow: bool, // 11

    /// I/O Privilege Level (2 bits)
    #[bits(2)]
    pub iopl: u8, // 12–13

    /// Nested Task
    pub nt_nested: bool, // 14

    #[bits(default = false)]
    _rsvd15: bool, // 15

    /// Resume Flag
    pub rf_resume: bool, // 16

    /// Virtual-8086 Mode
    pub vm_virtual_8086: bool, // 17

    /// Alignment Check
    pub ac_alignment_check: bool, // 18

    /// Virtual Interrupt Flag
    pub vif_virtual_interrupt: bool, // 19

    /// Virtual Interrupt Pending
    pub vip_virtual_interrupt_pending: bool, // 20

    /// ID Flag: allows toggling CPUID.
    pub id_cpuid: bool, // 21

    /// Reserved 22–31 (all zero)
    #[bits(10, default = 0)]
    _reserved_rest: u16,
}

vmstate_memory::wire_bits!(Eflags => u32);

impl RegisterFields for Eflags {
    fn fields(&self) -> Vec<(&'static str, u64)> {
        let mut fields: Vec<(&'static str, u64)> = [
            ("cf", self.cf_carry()),
            ("pf", self.pf_parity()),
            ("af", self.af_adjust()),
            ("zf", self.zf_zero()),
            ("sf", self.sf_sign()),
            ("tf", self.tf_trap()),
            ("if", self.if_interrupt_enable()),
            ("df", self.df_direction()),
            ("of", self.of_overflow()),
        ]
        .into_iter()
        .map(|(name, bit)| (name, u64::from(bit)))
        .collect();

        fields.push(("iopl", u64::from(self.iopl())));
        fields.extend(
            [
                ("nt", self.nt_nested()),
                ("rf", self.rf_resume()),
                ("vm", self.vm_virtual_8086()),
                ("ac", self.ac_alignment_check()),
                ("vif", self.vif_virtual_interrupt()),
                ("vip", self.vip_virtual_interrupt_pending()),
                ("id", self.id_cpuid()),
            ]
            .into_iter()
            .map(|(name, bit)| (name, u64::from(bit))),
        );
        fields
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fixed_bit_is_set_by_default() {
        assert_eq!(Eflags::new().into_bits(), 0x2);
    }

    #[test]
    fn iopl_and_vm() {
        let flags = Eflags::new().with_iopl(3).with_vm_virtual_8086(true);
        assert_eq!(flags.into_bits(), 0x0002_3002);
        let iopl = flags.fields().into_iter().find(|(n, _)| *n == "iopl");
        assert_eq!(iopl, Some(("iopl", 3)));
    }
}
