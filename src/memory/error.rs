// Mon Oct 19 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Out of bounds: {len} bytes at 0x{address:x} not mapped")]
    OutOfBounds { address: u64, len: usize },
    #[error("Overlapping region at 0x{0:x}")]
    OverlappingRegion(u64),
    #[error("Unsupported read width: {0}")]
    UnsupportedWidth(usize),
}
