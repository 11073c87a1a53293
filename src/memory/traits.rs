// Mon Oct 19 2026 - Alex

use crate::memory::{Address, MemoryError};

/// Read-only view of an inspected address space.
///
/// Only `read_bytes` is required; the typed reads decode little-endian
/// values out of it.
pub trait MemoryReader {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError>;

    fn read_u8(&self, addr: Address) -> Result<u8, MemoryError> {
        Ok(self.read_bytes(addr, 1)?[0])
    }

    fn read_u16(&self, addr: Address) -> Result<u16, MemoryError> {
        Ok(self.read_uint(addr, 2)? as u16)
    }

    fn read_u32(&self, addr: Address) -> Result<u32, MemoryError> {
        Ok(self.read_uint(addr, 4)? as u32)
    }

    fn read_u64(&self, addr: Address) -> Result<u64, MemoryError> {
        self.read_uint(addr, 8)
    }

    fn read_ptr(&self, addr: Address) -> Result<Address, MemoryError> {
        Ok(Address::new(self.read_u64(addr)?))
    }

    /// Unsigned little-endian integer of `width` bytes (1, 2, 4 or 8).
    fn read_uint(&self, addr: Address, width: usize) -> Result<u64, MemoryError> {
        if !matches!(width, 1 | 2 | 4 | 8) {
            return Err(MemoryError::UnsupportedWidth(width));
        }
        let bytes = self.read_bytes(addr, width)?;
        let mut buf = [0u8; 8];
        buf[..width].copy_from_slice(&bytes);
        Ok(u64::from_le_bytes(buf))
    }

    /// Signed little-endian integer of `width` bytes, sign-extended to 64 bits.
    fn read_int(&self, addr: Address, width: usize) -> Result<i64, MemoryError> {
        let raw = self.read_uint(addr, width)?;
        let shift = 64 - (width as u32) * 8;
        Ok(((raw << shift) as i64) >> shift)
    }
}

/// Used to build snapshots; the decoders never write.
pub trait MemoryWriter {
    fn write_bytes(&mut self, addr: Address, data: &[u8]) -> Result<(), MemoryError>;

    fn write_u8(&mut self, addr: Address, value: u8) -> Result<(), MemoryError> {
        self.write_bytes(addr, &[value])
    }

    fn write_u16(&mut self, addr: Address, value: u16) -> Result<(), MemoryError> {
        self.write_bytes(addr, &value.to_le_bytes())
    }

    fn write_u32(&mut self, addr: Address, value: u32) -> Result<(), MemoryError> {
        self.write_bytes(addr, &value.to_le_bytes())
    }

    fn write_u64(&mut self, addr: Address, value: u64) -> Result<(), MemoryError> {
        self.write_bytes(addr, &value.to_le_bytes())
    }

    fn write_i64(&mut self, addr: Address, value: i64) -> Result<(), MemoryError> {
        self.write_bytes(addr, &value.to_le_bytes())
    }

    fn write_ptr(&mut self, addr: Address, value: Address) -> Result<(), MemoryError> {
        self.write_u64(addr, value.as_u64())
    }
}
