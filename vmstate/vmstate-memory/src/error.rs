#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryError {
    #[error("access of {size:#x} bytes at {addr:#x} exceeds memory length {len:#x}")]
    OutOfBounds { addr: u64, size: u64, len: u64 },
    #[error("alignment must be non-zero")]
    ZeroAlignment,
    #[error("allocation of {size:#x} bytes overflows the address space")]
    AddressOverflow { size: u64 },
}
