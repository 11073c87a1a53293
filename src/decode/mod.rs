// Mon Oct 19 2026 - Alex

pub mod bitset;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod hash_map;
pub mod kind;
pub mod pointer;
pub mod string;
pub mod tuple;
pub mod variant;
pub mod vector;

pub use bitset::{decode_bitset, DecodedBitset, SetBits};
pub use hash_map::{decode_hash_map, DecodedHashMap, HashMapEntry, HashMapIter, KeyQuery};
pub use kind::ContainerKind;
pub use pointer::{decode_offset_ptr, DecodedPointer};
pub use string::{decode_string, DecodedString, StringLayout};
pub use tuple::{decode_tuple, DecodedTuple};
pub use variant::{decode_variant, DecodedVariant};
pub use vector::{decode_vector, DecodedVector, VectorLayout};

use crate::layout::{DecodeResult, PointerKind};
use crate::memory::{Address, MemoryReader};
use crate::types::{TypeDescriptor, TypeProvider};
use std::sync::Arc;

/// The host collaborators a decode query reads through.
#[derive(Clone, Copy)]
pub struct DecodeContext<'a> {
    pub mem: &'a dyn MemoryReader,
    pub types: &'a dyn TypeProvider,
}

impl<'a> DecodeContext<'a> {
    pub fn new(mem: &'a dyn MemoryReader, types: &'a dyn TypeProvider) -> Self {
        Self { mem, types }
    }

    /// Offset and type of a field reached through a path of nested members,
    /// e.g. `["h_", "size_"]` inside a string's union.
    pub fn field_path(&self, ty: &TypeDescriptor, path: &[&str]) -> DecodeResult<Option<(usize, Arc<TypeDescriptor>)>> {
        let mut offset = 0usize;
        let mut current: Option<Arc<TypeDescriptor>> = None;
        for name in path {
            let owner: &TypeDescriptor = match &current {
                Some(t) => t,
                None => ty,
            };
            match self.types.field(owner, name)? {
                Some(field) => {
                    offset += field.offset;
                    current = Some(field.ty);
                }
                None => return Ok(None),
            }
        }
        Ok(current.map(|t| (offset, t)))
    }

    /// Offset and encoding of a pointer-like header field.
    pub fn pointer_field(&self, ty: &TypeDescriptor, path: &[&str]) -> DecodeResult<Option<(usize, PointerKind)>> {
        Ok(self
            .field_path(ty, path)?
            .map(|(offset, field_ty)| (offset, PointerKind::of(&field_ty))))
    }

    /// Offset and byte width of an integer header field.
    pub fn int_field(&self, ty: &TypeDescriptor, path: &[&str]) -> DecodeResult<Option<(usize, usize)>> {
        Ok(self
            .field_path(ty, path)?
            .map(|(offset, field_ty)| (offset, field_ty.size)))
    }
}

/// A container projection, produced fresh for one query.
#[derive(Debug, Clone)]
pub enum DecodedValue {
    OffsetPointer(DecodedPointer),
    Vector(DecodedVector),
    String(DecodedString),
    Tuple(DecodedTuple),
    Variant(DecodedVariant),
    Bitset(DecodedBitset),
    HashMap(DecodedHashMap),
}

impl DecodedValue {
    pub fn kind(&self) -> ContainerKind {
        match self {
            Self::OffsetPointer(_) => ContainerKind::OffsetPointer,
            Self::Vector(_) => ContainerKind::Vector,
            Self::String(_) => ContainerKind::String,
            Self::Tuple(_) => ContainerKind::Tuple,
            Self::Variant(_) => ContainerKind::Variant,
            Self::Bitset(_) => ContainerKind::Bitset,
            Self::HashMap(_) => ContainerKind::HashMap,
        }
    }
}

/// Runs the decoder selected by `ty`'s qualified name. `None` when the type
/// is not one of the relocatable container encodings.
pub fn decode(ctx: &DecodeContext<'_>, base: Address, ty: &TypeDescriptor) -> DecodeResult<Option<DecodedValue>> {
    match ContainerKind::classify(ty) {
        Some(kind) => decode_as(ctx, base, ty, kind).map(Some),
        None => Ok(None),
    }
}

/// Decodes `ty` as a container of the given kind.
pub fn decode_as(ctx: &DecodeContext<'_>, base: Address, ty: &TypeDescriptor, kind: ContainerKind) -> DecodeResult<DecodedValue> {
    log::debug!("decoding {} at {} as {}", ty.name, base, kind);
    Ok(match kind {
        ContainerKind::OffsetPointer => DecodedValue::OffsetPointer(decode_offset_ptr(ctx, base, ty)?),
        ContainerKind::Vector => DecodedValue::Vector(decode_vector(ctx, base, ty)?),
        ContainerKind::String => DecodedValue::String(decode_string(ctx, base, ty)?),
        ContainerKind::Tuple => DecodedValue::Tuple(decode_tuple(ctx, base, ty)?),
        ContainerKind::Variant => DecodedValue::Variant(decode_variant(ctx, base, ty)?),
        ContainerKind::Bitset => DecodedValue::Bitset(decode_bitset(ctx, base, ty)?),
        ContainerKind::HashMap => DecodedValue::HashMap(decode_hash_map(ctx, base, ty)?),
    })
}

/// Pointer encoding implied by a `Ptr` template argument when the host gave
/// no field metadata: relocatable iff the argument names an offset_ptr.
pub(crate) fn pointer_kind_from_arg(ty: &TypeDescriptor, index: usize) -> PointerKind {
    let relocatable = matches!(
        ty.template_arg(index),
        Some(crate::types::TemplateArg::Type(name)) if crate::layout::is_offset_ptr(name)
    );
    if relocatable {
        PointerKind::Relative { width: 8 }
    } else {
        PointerKind::Raw { width: 8 }
    }
}
