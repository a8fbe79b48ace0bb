use vmstate::paging::{Pde32, Pdpte, Pml4e};
use vmstate::{Architecture, ErrorKind, Mode, PagingMode, VmState};

#[test]
fn legacy_identity_map() {
    let mut state = VmState::new(Architecture::X86);
    state.memory.allocate(3).unwrap();
    state.setup_paging().unwrap();

    let directory = state.regs.cr3;
    assert_eq!(directory, 0x1000);
    assert_eq!(state.memory.len(), 0x2000);

    for i in 0..1024u32 {
        let pde: Pde32 = state.memory.read_value(directory + u64::from(i) * 4).unwrap();
        assert!(pde.present() && pde.writable() && pde.user() && pde.page_size());
        assert_eq!(pde.pfn(), i << 10);
    }

    assert!(state.regs.cr4.pse());
    assert!(!state.regs.cr4.pae());
    assert!(state.regs.cr0.pg_paging());
    assert_eq!(state.mode(), Mode::Paging(PagingMode::Legacy));
}

#[test]
fn long_mode_identity_map() {
    let mut state = VmState::new(Architecture::X64);
    state.setup_paging().unwrap();

    let pml4 = state.regs.cr3;
    assert_eq!(pml4 % 0x1000, 0);

    let first: Pml4e = state.memory.read_value(pml4).unwrap();
    assert!(first.present() && first.writable() && first.user());
    let pdpt = first.address();
    assert_eq!(pdpt % 0x1000, 0);
    assert_ne!(pdpt, pml4);

    for i in 1..512u64 {
        assert_eq!(state.memory.read_value::<u64>(pml4 + i * 8).unwrap(), 0);
    }
    for i in 0..512u64 {
        let pdpte: Pdpte = state.memory.read_value(pdpt + i * 8).unwrap();
        assert!(pdpte.present() && pdpte.writable() && pdpte.user() && pdpte.page_size());
        assert_eq!(pdpte.pfn(), i << 18);
    }

    assert!(state.regs.cr4.pae());
    assert!(state.regs.cr4.pse());
    assert_eq!(state.mode(), Mode::Paging(PagingMode::Long));
}

#[test]
fn paging_can_only_be_enabled_once() {
    let mut state = VmState::new(Architecture::X86);
    state.setup_paging().unwrap();
    let len = state.memory.len();

    let err = state.setup_paging().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PreconditionViolation);
    assert_eq!(state.memory.len(), len);
}
