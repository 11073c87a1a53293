// Mon Oct 19 2026 - Alex

use crate::decode::DecodeContext;
use crate::layout::{DecodeError, DecodeResult, TupleLayout};
use crate::memory::Address;
use crate::types::TypeDescriptor;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct DecodedTuple {
    base: Address,
    fields: Vec<(Arc<TypeDescriptor>, Address)>,
}

impl DecodedTuple {
    pub fn from_types(base: Address, types: Vec<Arc<TypeDescriptor>>) -> Self {
        let layout = TupleLayout::compute(&types);
        let fields = types
            .into_iter()
            .zip(layout.offsets().iter())
            .map(|(ty, offset)| (ty, base + *offset))
            .collect();
        Self { base, fields }
    }

    pub fn base(&self) -> Address {
        self.base
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> &[(Arc<TypeDescriptor>, Address)] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> DecodeResult<&(Arc<TypeDescriptor>, Address)> {
        self.fields.get(index).ok_or(DecodeError::OutOfRange {
            index,
            arity: self.fields.len(),
        })
    }
}

pub fn decode_tuple(ctx: &DecodeContext<'_>, base: Address, ty: &TypeDescriptor) -> DecodeResult<DecodedTuple> {
    let types = ctx.types.type_arguments(ty)?;
    log::trace!("tuple at {} with {} fields", base, types.len());
    Ok(DecodedTuple::from_types(base, types))
}
