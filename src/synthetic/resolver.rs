// Mon Oct 19 2026 - Alex

use crate::decode::{self, ContainerKind, DecodeContext, DecodedHashMap, DecodedValue};
use crate::layout::{DecodeError, DecodeResult};
use crate::memory::Address;
use crate::synthetic::{MethodArg, MethodKind, SyntheticValue};
use crate::types::TypeDescriptor;

/// Replays accessor arithmetic over decoded containers. Nothing in the
/// inspected process is ever called.
#[derive(Clone, Copy)]
pub struct SyntheticMethodResolver<'a> {
    ctx: DecodeContext<'a>,
}

impl<'a> SyntheticMethodResolver<'a> {
    pub fn new(ctx: DecodeContext<'a>) -> Self {
        Self { ctx }
    }

    /// Methods available on a container kind.
    pub fn methods(kind: ContainerKind) -> &'static [MethodKind] {
        use MethodKind::*;
        match kind {
            ContainerKind::OffsetPointer => &[Get],
            ContainerKind::Vector | ContainerKind::String | ContainerKind::Bitset | ContainerKind::Tuple => {
                &[Size, At, Subscript]
            }
            ContainerKind::HashMap => &[Size, At, Subscript, Find],
            ContainerKind::Variant => &[Index],
        }
    }

    pub fn supports(ty: &TypeDescriptor, method: MethodKind) -> bool {
        ContainerKind::classify(ty).is_some_and(|kind| Self::methods(kind).contains(&method))
    }

    pub fn call(
        &self,
        base: Address,
        ty: &TypeDescriptor,
        method: MethodKind,
        arg: Option<&MethodArg>,
    ) -> DecodeResult<SyntheticValue> {
        if !Self::supports(ty, method) {
            return Err(DecodeError::UnsupportedMethod {
                type_name: ty.name.clone(),
                method: method.name().to_string(),
            });
        }
        let value = decode::decode(&self.ctx, base, ty)?
            .ok_or_else(|| DecodeError::unsupported(&ty.name, "container"))?;
        log::debug!("{}::{} at {}", value.kind(), method, base);
        self.apply(&value, method, arg)
    }

    /// Runs `method` on an already decoded value.
    pub fn apply(&self, value: &DecodedValue, method: MethodKind, arg: Option<&MethodArg>) -> DecodeResult<SyntheticValue> {
        match method {
            MethodKind::Size => self.size(value),
            MethodKind::At => self.at(value, required_index(method, arg)?),
            MethodKind::Subscript => self.subscript(value, required(method, arg)?),
            MethodKind::Find => match value {
                DecodedValue::HashMap(map) => self.find(map, required(method, arg)?),
                other => Err(unsupported(other, method)),
            },
            MethodKind::Index => match value {
                DecodedValue::Variant(v) => Ok(SyntheticValue::Index(v.active_index())),
                other => Err(unsupported(other, method)),
            },
            MethodKind::Get => match value {
                DecodedValue::OffsetPointer(p) => Ok(p.target().map_or(SyntheticValue::Null, SyntheticValue::Address)),
                other => Err(unsupported(other, method)),
            },
        }
    }

    pub fn size(&self, value: &DecodedValue) -> DecodeResult<SyntheticValue> {
        let count = match value {
            DecodedValue::Vector(v) => v.len(),
            DecodedValue::String(s) => s.len(),
            DecodedValue::Bitset(b) => b.len(),
            DecodedValue::Tuple(t) => t.arity() as u64,
            DecodedValue::HashMap(m) => m.len(),
            other => return Err(unsupported(other, MethodKind::Size)),
        };
        Ok(SyntheticValue::Count(count))
    }

    /// Bounds-checked element access.
    pub fn at(&self, value: &DecodedValue, index: u64) -> DecodeResult<SyntheticValue> {
        match value {
            DecodedValue::Vector(v) => Ok(SyntheticValue::element(v.element_type(), v.at(index)?)),
            DecodedValue::String(s) => {
                if index >= s.len() {
                    return Err(DecodeError::IndexOutOfRange { index, length: s.len() });
                }
                Ok(SyntheticValue::Byte(s.byte_at(self.ctx.mem, index)?))
            }
            DecodedValue::Bitset(b) => Ok(SyntheticValue::Bit(b.at(index)?)),
            DecodedValue::Tuple(t) => {
                let (ty, address) = t.field(index as usize)?;
                Ok(SyntheticValue::element(ty, *address))
            }
            DecodedValue::HashMap(m) => self.nth_entry(m, index),
            other => Err(unsupported(other, MethodKind::At)),
        }
    }

    /// Unchecked element access; hash maps take a key.
    pub fn subscript(&self, value: &DecodedValue, arg: &MethodArg) -> DecodeResult<SyntheticValue> {
        if let DecodedValue::HashMap(map) = value {
            let Some(entry) = map.lookup(&self.ctx, &arg.as_key())? else {
                return Ok(SyntheticValue::NotFound);
            };
            return Ok(match (map.value(), entry.value_address) {
                (Some(part), Some(address)) => SyntheticValue::element(&part.ty, address),
                _ => SyntheticValue::element(&map.key().ty, entry.key_address),
            });
        }
        let index = arg.as_index().ok_or_else(|| DecodeError::InvalidArgument {
            method: MethodKind::Subscript.name(),
            reason: "expected an index".to_string(),
        })?;
        match value {
            DecodedValue::Vector(v) => Ok(SyntheticValue::element(v.element_type(), v.element_unchecked(index)?)),
            DecodedValue::String(s) => Ok(SyntheticValue::Byte(s.byte_at(self.ctx.mem, index)?)),
            DecodedValue::Bitset(b) => Ok(SyntheticValue::Bit(b.test(index))),
            DecodedValue::Tuple(_) => self.at(value, index),
            other => Err(unsupported(other, MethodKind::Subscript)),
        }
    }

    /// String-aware key lookup returning the whole entry.
    pub fn find(&self, map: &DecodedHashMap, arg: &MethodArg) -> DecodeResult<SyntheticValue> {
        Ok(match map.lookup(&self.ctx, &arg.as_key())? {
            Some(entry) => SyntheticValue::element(map.entry_type(), entry.address),
            None => SyntheticValue::NotFound,
        })
    }

    fn nth_entry(&self, map: &DecodedHashMap, index: u64) -> DecodeResult<SyntheticValue> {
        if index >= map.len() {
            return Err(DecodeError::IndexOutOfRange {
                index,
                length: map.len(),
            });
        }
        match map.iter(self.ctx.mem).nth(index as usize) {
            Some(entry) => Ok(SyntheticValue::element(map.entry_type(), entry?.address)),
            None => Err(DecodeError::IndexOutOfRange {
                index,
                length: map.len(),
            }),
        }
    }
}

fn unsupported(value: &DecodedValue, method: MethodKind) -> DecodeError {
    DecodeError::UnsupportedMethod {
        type_name: value.kind().to_string(),
        method: method.name().to_string(),
    }
}

fn required(method: MethodKind, arg: Option<&MethodArg>) -> DecodeResult<&MethodArg> {
    arg.ok_or_else(|| DecodeError::InvalidArgument {
        method: method.name(),
        reason: "missing argument".to_string(),
    })
}

fn required_index(method: MethodKind, arg: Option<&MethodArg>) -> DecodeResult<u64> {
    required(method, arg)?
        .as_index()
        .ok_or_else(|| DecodeError::InvalidArgument {
            method: method.name(),
            reason: "expected an index".to_string(),
        })
}
