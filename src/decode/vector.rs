// Mon Oct 19 2026 - Alex

use crate::decode::{pointer_kind_from_arg, DecodeContext};
use crate::layout::{DecodeError, DecodeResult, PointerKind, StoredPointer};
use crate::memory::{Address, MemoryReader};
use crate::types::TypeDescriptor;
use std::sync::Arc;

/// Header positions of a `basic_vector`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorLayout {
    pub el_offset: usize,
    pub pointer: PointerKind,
    pub size_offset: usize,
    pub size_width: usize,
}

impl VectorLayout {
    pub fn new(pointer: PointerKind) -> Self {
        Self {
            el_offset: 0,
            pointer,
            size_offset: 8,
            size_width: 4,
        }
    }

    pub fn from_descriptor(ctx: &DecodeContext<'_>, ty: &TypeDescriptor) -> DecodeResult<Self> {
        let mut layout = Self::new(pointer_kind_from_arg(ty, 1));
        if let Some((offset, kind)) = ctx.pointer_field(ty, &["el_"])? {
            layout.el_offset = offset;
            layout.pointer = kind;
        }
        if let Some((offset, width)) = ctx.int_field(ty, &["used_size_"])? {
            layout.size_offset = offset;
            layout.size_width = width;
        }
        Ok(layout)
    }
}

#[derive(Debug, Clone)]
pub struct DecodedVector {
    base: Address,
    elements: StoredPointer,
    length: u64,
    element_type: Arc<TypeDescriptor>,
}

impl DecodedVector {
    pub fn read(
        mem: &dyn MemoryReader,
        base: Address,
        element_type: Arc<TypeDescriptor>,
        layout: VectorLayout,
    ) -> DecodeResult<Self> {
        let elements = StoredPointer::read(mem, base + layout.el_offset, layout.pointer)?;
        let length = mem.read_uint(base + layout.size_offset, layout.size_width)?;
        log::trace!("vector at {}: {} x {}", base, length, element_type.name);
        Ok(Self {
            base,
            elements,
            length,
            element_type,
        })
    }

    pub fn base(&self) -> Address {
        self.base
    }

    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn element_type(&self) -> &Arc<TypeDescriptor> {
        &self.element_type
    }

    pub fn is_relocatable(&self) -> bool {
        matches!(self.elements, StoredPointer::Relative(_))
    }

    /// Address of the first element. Fails on a null element pointer.
    pub fn data(&self) -> DecodeResult<Address> {
        self.elements.resolve()
    }

    /// `operator[]`: no bounds check.
    pub fn element_unchecked(&self, index: u64) -> DecodeResult<Address> {
        Ok(self.data()?.element(index, self.element_type.size))
    }

    /// `at()`: fails with `IndexOutOfRange` when `index >= len()`.
    pub fn at(&self, index: u64) -> DecodeResult<Address> {
        if index >= self.length {
            return Err(DecodeError::IndexOutOfRange {
                index,
                length: self.length,
            });
        }
        self.element_unchecked(index)
    }

    /// Element addresses in index order, produced on demand.
    pub fn iter(&self) -> impl Iterator<Item = DecodeResult<(u64, Address)>> + '_ {
        (0..self.length).map(move |i| self.element_unchecked(i).map(|addr| (i, addr)))
    }
}

pub fn decode_vector(ctx: &DecodeContext<'_>, base: Address, ty: &TypeDescriptor) -> DecodeResult<DecodedVector> {
    let element_type = ctx.types.template_argument(ty, 0)?;
    let layout = VectorLayout::from_descriptor(ctx, ty)?;
    DecodedVector::read(ctx.mem, base, element_type, layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::fixtures::*;
    use crate::layout::DecodeError;
    use crate::types::TypeProvider;

    #[test]
    fn test_offset_vector_at() {
        let mut image = image();
        put_int_vector(&mut image, 0x1000, 0x1100, &[10, 20, 30]);
        let types = registry();
        let ctx = DecodeContext::new(&image, &types);
        let ty = types.resolve(OFFSET_VEC_INT).unwrap();

        let vec = decode_vector(&ctx, addr(0x1000), &ty).unwrap();
        assert!(vec.is_relocatable());
        assert_eq!(vec.len(), 3);
        let second = vec.at(1).unwrap();
        assert_eq!(second, addr(0x1104));
        assert_eq!(image.read_u32(second).unwrap(), 20);
        assert!(matches!(
            vec.at(5),
            Err(DecodeError::IndexOutOfRange { index: 5, length: 3 })
        ));
        // Unchecked access does no bounds check.
        assert_eq!(vec.element_unchecked(5).unwrap(), addr(0x1114));
    }

    #[test]
    fn test_raw_vector() {
        let mut image = image();
        put_u64(&mut image, 0x1000, 0x1200);
        put_u32(&mut image, 0x1008, 2);
        put_u32(&mut image, 0x1200, 7);
        put_u32(&mut image, 0x1204, 9);
        let types = registry();
        let ctx = DecodeContext::new(&image, &types);
        let ty = types.resolve(RAW_VEC_INT).unwrap();

        let vec = decode_vector(&ctx, addr(0x1000), &ty).unwrap();
        assert!(!vec.is_relocatable());
        let values: Vec<u32> = vec
            .iter()
            .map(|e| image.read_u32(e.unwrap().1).unwrap())
            .collect();
        assert_eq!(values, vec![7, 9]);
    }

    #[test]
    fn test_vector_relocation_independent() {
        // The same bytes copied to another base decode to the same values.
        let mut image = image();
        put_int_vector(&mut image, 0x1000, 0x1040, &[1, 2]);
        let bytes = image.read_bytes(addr(0x1000), 0x48).unwrap();
        put_bytes(&mut image, 0x1800, &bytes);

        let types = registry();
        let ctx = DecodeContext::new(&image, &types);
        let ty = types.resolve(OFFSET_VEC_INT).unwrap();
        let moved = decode_vector(&ctx, addr(0x1800), &ty).unwrap();
        assert_eq!(moved.data().unwrap(), addr(0x1840));
        assert_eq!(image.read_u32(moved.at(1).unwrap()).unwrap(), 2);
    }

    #[test]
    fn test_empty_vector_with_null_pointer() {
        let mut image = image();
        put_null_offset_ptr(&mut image, 0x1000);
        let types = registry();
        let ctx = DecodeContext::new(&image, &types);
        let ty = types.resolve(OFFSET_VEC_INT).unwrap();
        let vec = decode_vector(&ctx, addr(0x1000), &ty).unwrap();
        assert!(vec.is_empty());
        assert_eq!(vec.iter().count(), 0);
        assert!(matches!(vec.data(), Err(DecodeError::InvalidPointer { .. })));
    }
}
