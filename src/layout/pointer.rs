// Mon Oct 19 2026 - Alex

use crate::layout::{DecodeError, DecodeResult};
use crate::memory::{Address, MemoryReader};
use crate::types::TypeDescriptor;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static OFFSET_PTR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^cista::offset_ptr\b").expect("valid regex"));

/// Whether a type name denotes a self-relative pointer.
pub fn is_offset_ptr(type_name: &str) -> bool {
    OFFSET_PTR.is_match(crate::types::descriptor::strip_qualifiers(type_name))
}

/// The reserved "null" offset for a pointer of `width` bytes: the minimum
/// value of the signed integer of that width.
pub fn null_sentinel(width: usize) -> i64 {
    match width {
        1 => i8::MIN as i64,
        2 => i16::MIN as i64,
        4 => i32::MIN as i64,
        _ => i64::MIN,
    }
}

/// `storage + offset` in pointer-width signed arithmetic.
pub fn resolve(storage: Address, offset: i64) -> Address {
    storage.offset(offset)
}

/// A self-relative pointer: the target lives at the address of the
/// offset field itself plus the stored offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetPointer {
    storage: Address,
    offset: i64,
    width: usize,
}

impl OffsetPointer {
    pub fn new(storage: Address, offset: i64, width: usize) -> Self {
        Self { storage, offset, width }
    }

    pub fn read<M: MemoryReader + ?Sized>(mem: &M, storage: Address, width: usize) -> DecodeResult<Self> {
        let offset = mem.read_int(storage, width)?;
        log::trace!("offset_ptr at {} holds {}", storage, offset);
        Ok(Self::new(storage, offset, width))
    }

    pub fn storage(&self) -> Address {
        self.storage
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn is_null(&self) -> bool {
        self.offset == null_sentinel(self.width)
    }

    /// The absolute target, or `InvalidPointer` for the null sentinel.
    pub fn resolve(&self) -> DecodeResult<Address> {
        self.get().ok_or(DecodeError::InvalidPointer { storage: self.storage })
    }

    pub fn get(&self) -> Option<Address> {
        if self.is_null() {
            None
        } else {
            Some(resolve(self.storage, self.offset))
        }
    }
}

impl fmt::Display for OffsetPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(target) => write!(f, "{}", target),
            None => write!(f, "nullptr"),
        }
    }
}

/// How a container stores its pointer-like fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Relative { width: usize },
    Raw { width: usize },
}

impl PointerKind {
    pub fn of(ty: &TypeDescriptor) -> Self {
        let width = if ty.size == 0 { 8 } else { ty.size };
        if is_offset_ptr(&ty.name) {
            Self::Relative { width }
        } else {
            Self::Raw { width }
        }
    }

    pub fn width(&self) -> usize {
        match *self {
            Self::Relative { width } | Self::Raw { width } => width,
        }
    }

    pub fn is_relocatable(&self) -> bool {
        matches!(self, Self::Relative { .. })
    }
}

/// A pointer field read out of a container header, in either encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredPointer {
    Relative(OffsetPointer),
    Raw { storage: Address, target: Address },
}

impl StoredPointer {
    pub fn read<M: MemoryReader + ?Sized>(mem: &M, storage: Address, kind: PointerKind) -> DecodeResult<Self> {
        match kind {
            PointerKind::Relative { width } => Ok(Self::Relative(OffsetPointer::read(mem, storage, width)?)),
            PointerKind::Raw { width } => {
                let target = Address::new(mem.read_uint(storage, width)?);
                Ok(Self::Raw { storage, target })
            }
        }
    }

    pub fn storage(&self) -> Address {
        match self {
            Self::Relative(ptr) => ptr.storage(),
            Self::Raw { storage, .. } => *storage,
        }
    }

    pub fn get(&self) -> Option<Address> {
        match self {
            Self::Relative(ptr) => ptr.get(),
            Self::Raw { target, .. } if target.is_null() => None,
            Self::Raw { target, .. } => Some(*target),
        }
    }

    pub fn resolve(&self) -> DecodeResult<Address> {
        self.get().ok_or(DecodeError::InvalidPointer { storage: self.storage() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{ImageMemory, MemoryWriter};

    #[test]
    fn test_resolve_negative_offset() {
        assert_eq!(resolve(Address::new(1000), -40), Address::new(960));
        let ptr = OffsetPointer::new(Address::new(1000), -40, 8);
        assert_eq!(ptr.resolve().unwrap(), Address::new(960));
    }

    #[test]
    fn test_resolve_matches_addition() {
        for storage in [0u64, 8, 1000, 0x7fff_0000] {
            for offset in [-512i64, -8, 0, 8, 4096] {
                let expected = (storage as i64 + offset) as u64;
                if (storage as i64 + offset) >= 0 {
                    assert_eq!(resolve(Address::new(storage), offset).as_u64(), expected);
                }
            }
        }
    }

    #[test]
    fn test_null_sentinel() {
        let ptr = OffsetPointer::new(Address::new(64), i64::MIN, 8);
        assert!(ptr.is_null());
        assert!(matches!(ptr.resolve(), Err(DecodeError::InvalidPointer { .. })));
        assert_eq!(ptr.to_string(), "nullptr");

        let narrow = OffsetPointer::new(Address::new(64), i32::MIN as i64, 4);
        assert!(narrow.is_null());
    }

    #[test]
    fn test_read_from_memory() {
        let mut image = ImageMemory::new();
        image.map_zeroed(Address::new(0x100), 32).unwrap();
        image.write_i64(Address::new(0x110), -0x10).unwrap();
        let ptr = OffsetPointer::read(&image, Address::new(0x110), 8).unwrap();
        assert_eq!(ptr.get(), Some(Address::new(0x100)));

        image.write_u32(Address::new(0x108), 12).unwrap();
        let ptr = OffsetPointer::read(&image, Address::new(0x108), 4).unwrap();
        assert_eq!(ptr.get(), Some(Address::new(0x114)));
    }

    #[test]
    fn test_pointer_kind() {
        let rel = TypeDescriptor::record("cista::offset_ptr<int>", 8, 8);
        let raw = TypeDescriptor::pointer("int*", "int");
        assert!(PointerKind::of(&rel).is_relocatable());
        assert!(!PointerKind::of(&raw).is_relocatable());
        assert!(is_offset_ptr("const cista::offset_ptr<char const>"));
        assert!(!is_offset_ptr("cista::offset_ptrish"));
    }

    #[test]
    fn test_raw_null_pointer() {
        let ptr = StoredPointer::Raw { storage: Address::new(8), target: Address::zero() };
        assert!(ptr.get().is_none());
        assert!(ptr.resolve().is_err());
    }
}
