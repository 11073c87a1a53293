// Mon Oct 19 2026 - Alex

use crate::types::TypeDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Alignment {
    value: usize,
}

impl Alignment {
    /// Zero is treated as byte alignment.
    pub fn new(value: usize) -> Self {
        Self { value: value.max(1) }
    }

    pub fn of(ty: &TypeDescriptor) -> Self {
        Self::new(ty.alignment)
    }

    pub fn as_usize(&self) -> usize {
        self.value
    }

    /// Smallest offset >= `offset` that is a multiple of this alignment.
    pub fn align(&self, offset: usize) -> usize {
        let misalign = offset % self.value;
        if misalign == 0 {
            offset
        } else {
            offset + (self.value - misalign)
        }
    }

    pub fn padding(&self, offset: usize) -> usize {
        self.align(offset) - offset
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::new(1)
    }
}
