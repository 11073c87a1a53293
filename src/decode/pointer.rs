// Mon Oct 19 2026 - Alex

use crate::decode::DecodeContext;
use crate::layout::{DecodeResult, OffsetPointer};
use crate::memory::Address;
use crate::types::TypeDescriptor;
use std::sync::Arc;

/// A standalone `offset_ptr<T>` together with its pointee type.
#[derive(Debug, Clone)]
pub struct DecodedPointer {
    pointer: OffsetPointer,
    pointee: Option<Arc<TypeDescriptor>>,
}

impl DecodedPointer {
    pub fn pointer(&self) -> &OffsetPointer {
        &self.pointer
    }

    /// `None` for pointers to types the host did not describe.
    pub fn pointee(&self) -> Option<&Arc<TypeDescriptor>> {
        self.pointee.as_ref()
    }

    pub fn target(&self) -> Option<Address> {
        self.pointer.get()
    }

    pub fn resolve(&self) -> DecodeResult<Address> {
        self.pointer.resolve()
    }

    /// Address of the `index`-th pointee past the target, like `ptr + index`.
    pub fn add(&self, index: u64) -> DecodeResult<Address> {
        let stride = self.pointee.as_ref().map(|t| t.size).unwrap_or(1);
        Ok(self.resolve()?.element(index, stride))
    }
}

pub fn decode_offset_ptr(ctx: &DecodeContext<'_>, base: Address, ty: &TypeDescriptor) -> DecodeResult<DecodedPointer> {
    let (offset, width) = ctx.int_field(ty, &["offset_"])?.unwrap_or((0, ty.size.max(1)));
    let pointer = OffsetPointer::read(ctx.mem, base + offset, width)?;
    let pointee = ctx.types.template_argument(ty, 0).ok();
    Ok(DecodedPointer { pointer, pointee })
}
