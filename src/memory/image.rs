// Mon Oct 19 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryRange, MemoryReader, MemoryWriter};

struct ImageRegion {
    range: MemoryRange,
    data: Vec<u8>,
}

/// An owned memory snapshot made of one or more disjoint regions.
///
/// Reads that straddle a region boundary fail, the same way a read
/// across an unmapped page does in a live process.
#[derive(Default)]
pub struct ImageMemory {
    regions: Vec<ImageRegion>,
}

impl ImageMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(base: Address, data: Vec<u8>) -> Self {
        let mut image = Self::new();
        image.regions.push(ImageRegion {
            range: MemoryRange::from_start_size(base, data.len() as u64),
            data,
        });
        image
    }

    /// Maps `size` zeroed bytes at `base`.
    pub fn map_zeroed(&mut self, base: Address, size: usize) -> Result<(), MemoryError> {
        self.map(base, vec![0u8; size])
    }

    pub fn map(&mut self, base: Address, data: Vec<u8>) -> Result<(), MemoryError> {
        let range = MemoryRange::from_start_size(base, data.len() as u64);
        if self.regions.iter().any(|r| r.range.overlaps(&range)) {
            return Err(MemoryError::OverlappingRegion(base.as_u64()));
        }
        self.regions.push(ImageRegion { range, data });
        Ok(())
    }

    pub fn ranges(&self) -> Vec<MemoryRange> {
        self.regions.iter().map(|r| r.range).collect()
    }

    fn region_for(&self, addr: Address, len: usize) -> Result<(&ImageRegion, usize), MemoryError> {
        self.regions
            .iter()
            .find(|r| r.range.contains_span(addr, len) && (len > 0 || r.range.contains(addr)))
            .map(|r| (r, (addr.as_u64() - r.range.start().as_u64()) as usize))
            .ok_or(MemoryError::OutOfBounds { address: addr.as_u64(), len })
    }
}

impl MemoryReader for ImageMemory {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        let (region, offset) = self.region_for(addr, len)?;
        Ok(region.data[offset..offset + len].to_vec())
    }
}

impl MemoryWriter for ImageMemory {
    fn write_bytes(&mut self, addr: Address, data: &[u8]) -> Result<(), MemoryError> {
        let len = data.len();
        let region = self
            .regions
            .iter_mut()
            .find(|r| r.range.contains_span(addr, len))
            .ok_or(MemoryError::OutOfBounds { address: addr.as_u64(), len })?;
        let offset = (addr.as_u64() - region.range.start().as_u64()) as usize;
        region.data[offset..offset + len].copy_from_slice(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write_roundtrip() {
        let mut image = ImageMemory::new();
        image.map_zeroed(Address::new(0x1000), 64).unwrap();
        image.write_u32(Address::new(0x1008), 0xdeadbeef).unwrap();
        assert_eq!(image.read_u32(Address::new(0x1008)).unwrap(), 0xdeadbeef);
        assert_eq!(image.read_u8(Address::new(0x1008)).unwrap(), 0xef);
    }

    #[test]
    fn test_signed_reads() {
        let mut image = ImageMemory::new();
        image.map_zeroed(Address::new(0), 16).unwrap();
        image.write_i64(Address::new(0), -40).unwrap();
        assert_eq!(image.read_int(Address::new(0), 8).unwrap(), -40);
        image.write_u32(Address::new(8), (-7i32) as u32).unwrap();
        assert_eq!(image.read_int(Address::new(8), 4).unwrap(), -7);
    }

    #[test]
    fn test_unmapped_read_fails() {
        let image = ImageMemory::from_bytes(Address::new(0x100), vec![1, 2, 3, 4]);
        assert!(image.read_bytes(Address::new(0x102), 2).is_ok());
        assert!(matches!(
            image.read_bytes(Address::new(0x102), 4),
            Err(MemoryError::OutOfBounds { .. })
        ));
        assert!(image.read_u8(Address::new(0x50)).is_err());
    }

    #[test]
    fn test_overlapping_map_rejected() {
        let mut image = ImageMemory::new();
        image.map_zeroed(Address::new(0x100), 0x100).unwrap();
        assert!(image.map_zeroed(Address::new(0x180), 0x10).is_err());
        assert!(image.map_zeroed(Address::new(0x200), 0x10).is_ok());
    }
}
