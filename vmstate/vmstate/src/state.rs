use crate::arch::{Architecture, Mode, PagingMode};
use crate::error::VmStateError;
use log::debug;
use vmstate_descriptors::Width;
use vmstate_memory::Memory;
use vmstate_registers::RegisterFile;

/// One virtual CPU: its register file and its guest memory.
///
/// Both halves are public; the setup methods are conveniences that keep them
/// consistent with each other (e.g. `GDTR` pointing at a GDT in [`Memory`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VmState {
    pub memory: Memory,
    pub regs: RegisterFile,
}

impl VmState {
    /// A fresh state with protection enabled.
    ///
    /// For [`Architecture::X64`] long mode is already active
    /// (`EFER.SCE | LME | LMA | NXE`); paging still has to be set up.
    #[must_use]
    pub fn new(architecture: Architecture) -> Self {
        let mut regs = RegisterFile::new();
        regs.cr0.set_pe_protection_enable(true);
        if architecture == Architecture::X64 {
            regs.efer = regs
                .efer
                .with_sce(true)
                .with_lme(true)
                .with_lma(true)
                .with_nxe(true);
        }

        debug!("new {architecture:?} state");
        Self {
            memory: Memory::new(),
            regs,
        }
    }

    #[must_use]
    pub const fn long_mode_active(&self) -> bool {
        self.regs.efer.lma()
    }

    /// Width of system descriptors in the current mode.
    #[must_use]
    pub const fn width(&self) -> Width {
        if self.long_mode_active() {
            Width::Long
        } else {
            Width::Legacy
        }
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        let cr0 = self.regs.cr0;
        if !cr0.pe_protection_enable() {
            Mode::Real
        } else if !cr0.pg_paging() {
            Mode::Protected
        } else if self.long_mode_active() {
            Mode::Paging(PagingMode::Long)
        } else {
            Mode::Paging(PagingMode::Legacy)
        }
    }

    /// Place `code` at the end of memory and point `RIP` at it.
    ///
    /// # Errors
    /// Propagates allocation failures.
    pub fn inject_code(&mut self, code: &[u8]) -> Result<u64, VmStateError> {
        let addr = self.memory.allocate(code.len() as u64)?;
        self.memory.write(addr, code)?;
        self.regs.rip = addr;
        debug!("injected {:#x} bytes of code at {addr:#x}", code.len());
        Ok(addr)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fresh_states() {
        let x86 = VmState::new(Architecture::X86);
        assert_eq!(x86.mode(), Mode::Protected);
        assert_eq!(x86.regs.cr0.into_bits(), 1);
        assert_eq!(x86.regs.efer.into_bits(), 0);

        let x64 = VmState::new(Architecture::X64);
        assert!(x64.long_mode_active());
        assert_eq!(x64.regs.efer.into_bits(), 0x0d01);
        assert_eq!(x64.width(), Width::Long);
        assert!(x64.memory.is_empty());
    }

    #[test]
    fn inject_code_sets_rip() {
        let mut state = VmState::new(Architecture::X86);
        state.memory.allocate(3).unwrap();
        let addr = state.inject_code(&[0xf4]).unwrap();
        assert_eq!(addr, 3);
        assert_eq!(state.regs.rip, 3);
        assert_eq!(state.memory.read(3, 1).unwrap(), &[0xf4]);
    }

    #[test]
    fn architecture_codes() {
        assert_eq!(Architecture::try_from(0x64), Ok(Architecture::X64));
        assert_eq!(Architecture::X86.code(), 0x86);
        assert_eq!(
            Architecture::try_from(0x32).unwrap_err().kind(),
            crate::ErrorKind::UnsupportedFeature
        );
    }
}
