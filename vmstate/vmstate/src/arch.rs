use crate::error::VmStateError;
use vmstate_descriptors::Width;

/// Target architecture of a state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Architecture {
    /// 32-bit protected mode.
    #[default]
    X86,
    /// IA-32e (long) mode.
    X64,
}

impl Architecture {
    /// Legacy numeric code: `0x86` or `0x64`.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::X86 => 0x86,
            Self::X64 => 0x64,
        }
    }

    /// Width of system descriptors and gates.
    #[must_use]
    pub const fn width(self) -> Width {
        match self {
            Self::X86 => Width::Legacy,
            Self::X64 => Width::Long,
        }
    }
}

impl TryFrom<u32> for Architecture {
    type Error = VmStateError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0x86 => Ok(Self::X86),
            0x64 => Ok(Self::X64),
            other => Err(VmStateError::UnsupportedArchitecture(other)),
        }
    }
}

/// Operating mode derived from `CR0.PE`, `CR0.PG` and `EFER.LMA`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Mode {
    Real,
    Protected,
    Paging(PagingMode),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PagingMode {
    /// 32-bit paging.
    Legacy,
    /// 4-level paging.
    Long,
}
