// Mon Oct 19 2026 - Alex

use crate::decode::DecodeContext;
use crate::layout::{Alignment, DecodeError, DecodeResult};
use crate::memory::{Address, MemoryReader};
use crate::types::TypeDescriptor;
use std::sync::Arc;

/// A tagged union with its active alternative resolved.
#[derive(Debug, Clone)]
pub struct DecodedVariant {
    base: Address,
    active_index: usize,
    storage: Address,
    active_type: Arc<TypeDescriptor>,
    alternatives: usize,
}

impl DecodedVariant {
    /// Reads the discriminant at `base + index_offset` and selects the
    /// matching entry of `alternatives`.
    pub fn read(
        mem: &dyn MemoryReader,
        base: Address,
        alternatives: &[Arc<TypeDescriptor>],
        index_offset: usize,
        index_width: usize,
        storage_offset: usize,
    ) -> DecodeResult<Self> {
        let raw = mem.read_uint(base + index_offset, index_width)?;
        let active_type = usize::try_from(raw)
            .ok()
            .and_then(|i| alternatives.get(i))
            .ok_or_else(|| {
                log::warn!("variant at {} has discriminant {} of {} alternatives", base, raw, alternatives.len());
                DecodeError::CorruptDiscriminant {
                    address: base + index_offset,
                    index: raw,
                    alternatives: alternatives.len(),
                }
            })?;
        Ok(Self {
            base,
            active_index: raw as usize,
            storage: base + storage_offset,
            active_type: active_type.clone(),
            alternatives: alternatives.len(),
        })
    }

    pub fn base(&self) -> Address {
        self.base
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// Address of the storage, to be read strictly as `active_type()`.
    pub fn storage(&self) -> Address {
        self.storage
    }

    pub fn active_type(&self) -> &Arc<TypeDescriptor> {
        &self.active_type
    }

    pub fn alternatives(&self) -> usize {
        self.alternatives
    }
}

/// Width of the discriminant for a variant of `arity` alternatives.
pub fn index_width(arity: usize) -> usize {
    if arity > u8::MAX as usize {
        2
    } else {
        1
    }
}

pub fn decode_variant(ctx: &DecodeContext<'_>, base: Address, ty: &TypeDescriptor) -> DecodeResult<DecodedVariant> {
    let alternatives = ctx.types.type_arguments(ty)?;

    let (index_offset, width) = ctx
        .int_field(ty, &["idx_"])?
        .unwrap_or((0, index_width(alternatives.len())));
    let storage_offset = match ctx.field_path(ty, &["storage_"])? {
        Some((offset, _)) => offset,
        None => {
            let max_align = alternatives.iter().map(|t| t.alignment).max().unwrap_or(1);
            Alignment::new(max_align).align(index_offset + width)
        }
    };

    DecodedVariant::read(ctx.mem, base, &alternatives, index_offset, width, storage_offset)
}
