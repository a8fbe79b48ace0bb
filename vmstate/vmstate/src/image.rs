//! Flat state images: `[RegisterFile: 396 bytes][Memory: rest]`, no header.

use crate::error::VmStateError;
use crate::state::VmState;
use alloc::vec::Vec;
use log::debug;
use vmstate_memory::{Memory, Wire};
use vmstate_registers::{REGISTER_FILE_SIZE, RegisterFile};

impl VmState {
    /// Serialise registers followed by all of guest memory.
    #[must_use]
    pub fn raw(&self) -> Vec<u8> {
        let mut image = Vec::with_capacity(REGISTER_FILE_SIZE + self.memory.as_bytes().len());
        image.extend_from_slice(&self.regs.to_bytes());
        image.extend_from_slice(self.memory.as_bytes());
        image
    }

    /// Parse an image produced by [`VmState::raw`].
    ///
    /// # Errors
    /// [`VmStateError::TruncatedImage`] if `image` is shorter than the
    /// register file.
    pub fn from_raw(image: &[u8]) -> Result<Self, VmStateError> {
        if image.len() < REGISTER_FILE_SIZE {
            return Err(VmStateError::TruncatedImage { len: image.len() });
        }

        let (regs, memory) = image.split_at(REGISTER_FILE_SIZE);
        debug!("decoded image with {:#x} bytes of memory", memory.len());
        Ok(Self {
            regs: RegisterFile::decode(regs),
            memory: Memory::from_bytes(memory.to_vec()),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Architecture, ErrorKind};

    #[test]
    fn image_is_registers_then_memory() {
        let mut state = VmState::new(Architecture::X86);
        state.inject_code(&[0x90, 0xf4]).unwrap();

        let image = state.raw();
        assert_eq!(image.len(), REGISTER_FILE_SIZE + 2);
        assert_eq!(&image[REGISTER_FILE_SIZE..], &[0x90, 0xf4]);
    }

    #[test]
    fn register_only_image() {
        let state = VmState::new(Architecture::X64);
        let decoded = VmState::from_raw(&state.raw()).unwrap();
        assert!(decoded.memory.is_empty());
        assert_eq!(decoded, state);
    }

    #[test]
    fn truncated_image() {
        let err = VmState::from_raw(&[0; REGISTER_FILE_SIZE - 1]).unwrap_err();
        assert_eq!(err, VmStateError::TruncatedImage { len: 395 });
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);
    }
}
