use vmstate_memory::MemoryError;

/// Coarse classification of every [`VmStateError`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A setup step was invoked from the wrong starting state, or an argument
    /// is unusable.
    PreconditionViolation,
    /// A memory access, selector or image extends past its bounds.
    OutOfBounds,
    /// Valid input that this model does not handle.
    UnsupportedFeature,
}

/// Errors raised while building or decoding a state.
///
/// Setup steps do not roll back: after an error the state is unspecified and
/// should be discarded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VmStateError {
    #[error("precondition violated: {0}")]
    PreconditionViolation(&'static str),
    #[error("selector {selector:#06x} exceeds descriptor table limit {limit:#x}")]
    SelectorOutOfBounds { selector: u16, limit: u16 },
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error("selector {0:#06x} refers to the local descriptor table")]
    LocalTableSelector(u16),
    #[error("selector {selector:#06x} refers to unsupported system descriptor type {typ:#06b}")]
    UnsupportedSystemDescriptor { selector: u16, typ: u8 },
    #[error("unsupported architecture {0:#x}")]
    UnsupportedArchitecture(u32),
    #[error("image of {len} bytes is shorter than the register file")]
    TruncatedImage { len: usize },
}

impl VmStateError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::PreconditionViolation(_)
            | Self::Memory(MemoryError::ZeroAlignment | MemoryError::AddressOverflow { .. }) => {
                ErrorKind::PreconditionViolation
            }
            Self::SelectorOutOfBounds { .. }
            | Self::Memory(MemoryError::OutOfBounds { .. })
            | Self::TruncatedImage { .. } => ErrorKind::OutOfBounds,
            Self::LocalTableSelector(_)
            | Self::UnsupportedSystemDescriptor { .. }
            | Self::UnsupportedArchitecture(_) => ErrorKind::UnsupportedFeature,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn memory_errors_are_classified() {
        let oob = VmStateError::from(MemoryError::OutOfBounds {
            addr: 0,
            size: 1,
            len: 0,
        });
        assert_eq!(oob.kind(), ErrorKind::OutOfBounds);
        assert_eq!(
            VmStateError::from(MemoryError::ZeroAlignment).kind(),
            ErrorKind::PreconditionViolation
        );
    }

    #[test]
    fn messages_name_the_selector() {
        let err = VmStateError::SelectorOutOfBounds {
            selector: 0x30,
            limit: 0x2f,
        };
        assert_eq!(
            err.to_string(),
            "selector 0x0030 exceeds descriptor table limit 0x2f"
        );
    }
}
