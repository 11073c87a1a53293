// Mon Oct 19 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryRange, MemoryReader};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// A memory image file mapped read-only and exposed at `base_address`.
pub struct MmapMemory {
    mmap: Arc<Mmap>,
    base_address: Address,
}

impl MmapMemory {
    pub fn from_file<P: AsRef<Path>>(path: P, base_address: Address) -> Result<Self, MemoryError> {
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and the image is treated as a snapshot.
        let mmap = unsafe { Mmap::map(&file) }?;
        log::debug!("mapped {} bytes at {}", mmap.len(), base_address);
        Ok(Self {
            mmap: Arc::new(mmap),
            base_address,
        })
    }

    pub fn base_address(&self) -> Address {
        self.base_address
    }

    pub fn size(&self) -> usize {
        self.mmap.len()
    }

    pub fn range(&self) -> MemoryRange {
        MemoryRange::from_start_size(self.base_address, self.mmap.len() as u64)
    }
}

impl MemoryReader for MmapMemory {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        if !self.range().contains_span(addr, len) {
            return Err(MemoryError::OutOfBounds { address: addr.as_u64(), len });
        }
        let offset = (addr.as_u64() - self.base_address.as_u64()) as usize;
        Ok(self.mmap[offset..offset + len].to_vec())
    }
}
