// Mon Oct 19 2026 - Alex

use crate::decode::{decode_string, pointer_kind_from_arg, ContainerKind, DecodeContext};
use crate::layout::{DecodeError, DecodeResult, PointerKind, StoredPointer};
use crate::memory::{Address, MemoryReader};
use crate::types::{PrimitiveType, TypeDescriptor};
use std::sync::Arc;

pub const CTRL_EMPTY: u8 = 0x80;
pub const CTRL_DELETED: u8 = 0xFE;
pub const CTRL_END: u8 = 0xFF;

/// Control bytes are read in chunks of this many slots.
const CTRL_CHUNK: u64 = 64;

/// A slot is live when the top bit of its control byte is clear.
pub fn is_full(ctrl: u8) -> bool {
    ctrl & 0x80 == 0
}

pub fn is_empty(ctrl: u8) -> bool {
    ctrl == CTRL_EMPTY
}

pub fn is_deleted(ctrl: u8) -> bool {
    ctrl == CTRL_DELETED
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashMapLayout {
    pub entries_offset: usize,
    pub entries_pointer: PointerKind,
    pub ctrl_offset: usize,
    pub ctrl_pointer: PointerKind,
    pub size_offset: usize,
    pub size_width: usize,
    pub capacity_offset: usize,
    pub capacity_width: usize,
}

impl HashMapLayout {
    pub fn new(pointer: PointerKind) -> Self {
        Self {
            entries_offset: 0,
            entries_pointer: pointer,
            ctrl_offset: 8,
            ctrl_pointer: pointer,
            size_offset: 16,
            size_width: 8,
            capacity_offset: 24,
            capacity_width: 8,
        }
    }

    pub fn from_descriptor(ctx: &DecodeContext<'_>, ty: &TypeDescriptor) -> DecodeResult<Self> {
        let mut layout = Self::new(pointer_kind_from_arg(ty, 1));
        if let Some((offset, kind)) = ctx.pointer_field(ty, &["entries_"])? {
            layout.entries_offset = offset;
            layout.entries_pointer = kind;
        }
        if let Some((offset, kind)) = ctx.pointer_field(ty, &["ctrl_"])? {
            layout.ctrl_offset = offset;
            layout.ctrl_pointer = kind;
        }
        if let Some((offset, width)) = ctx.int_field(ty, &["size_"])? {
            layout.size_offset = offset;
            layout.size_width = width;
        }
        if let Some((offset, width)) = ctx.int_field(ty, &["capacity_"])? {
            layout.capacity_offset = offset;
            layout.capacity_width = width;
        }
        Ok(layout)
    }
}

/// A part of an entry: offset inside the entry and its type.
#[derive(Debug, Clone)]
pub struct EntryPart {
    pub offset: usize,
    pub ty: Arc<TypeDescriptor>,
}

/// One live slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashMapEntry {
    /// Ordinal among live entries, in slot order.
    pub index: u64,
    pub slot: u64,
    pub address: Address,
    pub key_address: Address,
    /// `None` for sets, whose entry is the key itself.
    pub value_address: Option<Address>,
}

/// A key to search for. Text is compared against string keys by content
/// and against primitive keys by their formatted value; a `char` key also
/// matches its single literal character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyQuery {
    Text(String),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct DecodedHashMap {
    base: Address,
    entries: StoredPointer,
    control: StoredPointer,
    size: u64,
    capacity: u64,
    entry_type: Arc<TypeDescriptor>,
    key: EntryPart,
    value: Option<EntryPart>,
}

impl DecodedHashMap {
    pub fn base(&self) -> Address {
        self.base
    }

    /// The stored `size_`.
    pub fn len(&self) -> u64 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn entry_type(&self) -> &Arc<TypeDescriptor> {
        &self.entry_type
    }

    pub fn key(&self) -> &EntryPart {
        &self.key
    }

    pub fn value(&self) -> Option<&EntryPart> {
        self.value.as_ref()
    }

    pub fn is_map(&self) -> bool {
        self.value.is_some()
    }

    pub fn entries_pointer(&self) -> &StoredPointer {
        &self.entries
    }

    pub fn control_pointer(&self) -> &StoredPointer {
        &self.control
    }

    pub fn entry_at(&self, index: u64, slot: u64) -> DecodeResult<HashMapEntry> {
        let address = self.entries.resolve()?.element(slot, self.entry_type.size);
        Ok(HashMapEntry {
            index,
            slot,
            address,
            key_address: address + self.key.offset,
            value_address: self.value.as_ref().map(|v| address + v.offset),
        })
    }

    /// Live entries in slot order. A final `CorruptHashTable` item is
    /// produced when the live count disagrees with `size_`.
    pub fn iter<'a>(&'a self, mem: &'a dyn MemoryReader) -> HashMapIter<'a> {
        HashMapIter {
            map: self,
            mem,
            slot: 0,
            index: 0,
            chunk: Vec::new(),
            chunk_start: 0,
            done: false,
        }
    }

    /// Counts live control bytes and checks them against `size_`.
    pub fn verify(&self, mem: &dyn MemoryReader) -> DecodeResult<u64> {
        if self.capacity == 0 {
            return self.check_count(0);
        }
        let ctrl = mem.read_bytes(self.control.resolve()?, self.capacity as usize)?;
        let live = ctrl.iter().filter(|&&c| is_full(c)).count() as u64;
        self.check_count(live)
    }

    fn check_count(&self, observed: u64) -> DecodeResult<u64> {
        if observed == self.size {
            Ok(observed)
        } else {
            log::warn!(
                "hash table at {}: size_ {} but {} live slots",
                self.base,
                self.size,
                observed
            );
            Err(DecodeError::CorruptHashTable {
                address: self.base,
                expected: self.size,
                observed,
            })
        }
    }

    /// First live entry whose key equals `query`, by linear scan.
    pub fn lookup(&self, ctx: &DecodeContext<'_>, query: &KeyQuery) -> DecodeResult<Option<HashMapEntry>> {
        for entry in self.iter(ctx.mem) {
            let entry = entry?;
            if self.key_matches(ctx, entry.key_address, query)? {
                log::debug!("key found in slot {} of {}", entry.slot, self.base);
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    fn key_matches(&self, ctx: &DecodeContext<'_>, at: Address, query: &KeyQuery) -> DecodeResult<bool> {
        let key_ty = &self.key.ty;
        if ContainerKind::classify(key_ty) == Some(ContainerKind::String) {
            let key = decode_string(ctx, at, key_ty)?;
            let bytes = key.bytes(ctx.mem)?;
            return Ok(match query {
                KeyQuery::Text(text) => bytes.as_ref() == text.as_bytes(),
                KeyQuery::Bytes(raw) => bytes.as_ref() == raw.as_slice(),
            });
        }
        let raw = ctx.mem.read_bytes(at, key_ty.size)?;
        Ok(match (query, key_ty.as_primitive()) {
            (KeyQuery::Bytes(q), _) => raw == *q,
            (KeyQuery::Text(q), Some(PrimitiveType::Char)) => PrimitiveType::Char.format(&raw) == *q || raw == q.as_bytes(),
            (KeyQuery::Text(q), Some(p)) => p.format(&raw) == *q,
            (KeyQuery::Text(_), None) => false,
        })
    }
}

/// Lazy walk over the live slots of a hash table.
pub struct HashMapIter<'a> {
    map: &'a DecodedHashMap,
    mem: &'a dyn MemoryReader,
    slot: u64,
    index: u64,
    chunk: Vec<u8>,
    chunk_start: u64,
    done: bool,
}

impl HashMapIter<'_> {
    fn control_byte(&mut self, slot: u64) -> DecodeResult<u8> {
        let cached = slot >= self.chunk_start && slot < self.chunk_start + self.chunk.len() as u64;
        if !cached {
            let len = CTRL_CHUNK.min(self.map.capacity - slot);
            let start = self.map.control.resolve()?.element(slot, 1);
            self.chunk = self.mem.read_bytes(start, len as usize)?;
            self.chunk_start = slot;
        }
        Ok(self.chunk[(slot - self.chunk_start) as usize])
    }
}

impl Iterator for HashMapIter<'_> {
    type Item = DecodeResult<HashMapEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            if self.slot >= self.map.capacity {
                self.done = true;
                return self.map.check_count(self.index).err().map(Err);
            }
            let slot = self.slot;
            self.slot += 1;
            let ctrl = match self.control_byte(slot) {
                Ok(c) => c,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };
            if !is_full(ctrl) {
                continue;
            }
            let index = self.index;
            self.index += 1;
            let entry = self.map.entry_at(index, slot);
            if entry.is_err() {
                self.done = true;
            }
            return Some(entry);
        }
        None
    }
}

/// Key and value parts of an entry type: `first`/`second` of a pair, or the
/// whole entry for sets.
fn entry_parts(ctx: &DecodeContext<'_>, entry: &Arc<TypeDescriptor>) -> DecodeResult<(EntryPart, Option<EntryPart>)> {
    let first = ctx.types.field(entry, "first")?;
    let second = ctx.types.field(entry, "second")?;
    Ok(match (first, second) {
        (Some(k), Some(v)) => (
            EntryPart {
                offset: k.offset,
                ty: k.ty,
            },
            Some(EntryPart {
                offset: v.offset,
                ty: v.ty,
            }),
        ),
        _ => (
            EntryPart {
                offset: 0,
                ty: entry.clone(),
            },
            None,
        ),
    })
}

pub fn decode_hash_map(ctx: &DecodeContext<'_>, base: Address, ty: &TypeDescriptor) -> DecodeResult<DecodedHashMap> {
    let entry_type = ctx.types.template_argument(ty, 0)?;
    let (key, value) = entry_parts(ctx, &entry_type)?;
    let layout = HashMapLayout::from_descriptor(ctx, ty)?;

    let entries = StoredPointer::read(ctx.mem, base + layout.entries_offset, layout.entries_pointer)?;
    let control = StoredPointer::read(ctx.mem, base + layout.ctrl_offset, layout.ctrl_pointer)?;
    let size = ctx.mem.read_uint(base + layout.size_offset, layout.size_width)?;
    let capacity = ctx.mem.read_uint(base + layout.capacity_offset, layout.capacity_width)?;
    log::trace!("hash table at {}: size {} capacity {}", base, size, capacity);

    Ok(DecodedHashMap {
        base,
        entries,
        control,
        size,
        capacity,
        entry_type,
        key,
        value,
    })
}
