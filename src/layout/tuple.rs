// Mon Oct 19 2026 - Alex

use crate::layout::{Alignment, DecodeError, DecodeResult};
use crate::types::TypeDescriptor;
use std::borrow::Borrow;

/// Field offsets of a heterogeneous tuple under standard sequential layout:
/// declaration order, each field padded up to its own alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleLayout {
    offsets: Vec<usize>,
    size: usize,
    alignment: usize,
}

impl TupleLayout {
    pub fn compute<T: Borrow<TypeDescriptor>>(fields: &[T]) -> Self {
        let mut offsets = Vec::with_capacity(fields.len());
        let mut current = 0usize;
        let mut max_align = 1usize;

        for field in fields {
            let ty = field.borrow();
            let align = Alignment::of(ty);
            current = align.align(current);
            offsets.push(current);
            current += ty.size;
            max_align = max_align.max(align.as_usize());
        }

        Self {
            offsets,
            size: Alignment::new(max_align).align(current),
            alignment: max_align,
        }
    }

    pub fn arity(&self) -> usize {
        self.offsets.len()
    }

    pub fn offset_of(&self, index: usize) -> DecodeResult<usize> {
        self.offsets.get(index).copied().ok_or(DecodeError::OutOfRange {
            index,
            arity: self.offsets.len(),
        })
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Total size including tail padding.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn alignment(&self) -> usize {
        self.alignment
    }
}

/// Byte offset of field `index` within a tuple of `fields`.
pub fn offset_of<T: Borrow<TypeDescriptor>>(fields: &[T], index: usize) -> DecodeResult<usize> {
    if index >= fields.len() {
        return Err(DecodeError::OutOfRange { index, arity: fields.len() });
    }
    TupleLayout::compute(&fields[..=index]).offset_of(index)
}
