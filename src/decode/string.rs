// Mon Oct 19 2026 - Alex

use crate::decode::{pointer_kind_from_arg, DecodeContext};
use crate::layout::{DecodeResult, PointerKind, StoredPointer};
use crate::memory::{Address, MemoryReader};
use crate::types::{TypeDescriptor, TypeKind};
use std::borrow::Cow;

/// Positions inside the 16-byte short/long string union.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLayout {
    pub flag_offset: usize,
    pub inline_offset: usize,
    pub inline_capacity: usize,
    pub size_offset: usize,
    pub size_width: usize,
    pub ptr_offset: usize,
    pub pointer: PointerKind,
}

impl StringLayout {
    pub fn new(pointer: PointerKind) -> Self {
        Self {
            flag_offset: 0,
            inline_offset: 1,
            inline_capacity: 15,
            size_offset: 4,
            size_width: 4,
            ptr_offset: 8,
            pointer,
        }
    }

    pub fn from_descriptor(ctx: &DecodeContext<'_>, ty: &TypeDescriptor) -> DecodeResult<Self> {
        let mut layout = Self::new(pointer_kind_from_arg(ty, 0));
        if let Some((offset, _)) = ctx.field_path(ty, &["s_", "is_short_"])? {
            layout.flag_offset = offset;
        }
        if let Some((offset, buffer)) = ctx.field_path(ty, &["s_", "s_"])? {
            layout.inline_offset = offset;
            if let TypeKind::Array { count, .. } = buffer.kind {
                layout.inline_capacity = count;
            }
        }
        if let Some((offset, width)) = ctx.int_field(ty, &["h_", "size_"])? {
            layout.size_offset = offset;
            layout.size_width = width;
        }
        if let Some((offset, kind)) = ctx.pointer_field(ty, &["h_", "ptr_"])? {
            layout.ptr_offset = offset;
            layout.pointer = kind;
        }
        Ok(layout)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedString {
    /// Characters stored in place inside the string object.
    Short { inline: Address, bytes: Vec<u8> },
    /// Characters stored out of line behind a pointer.
    Long { data: StoredPointer, length: u64 },
}

impl DecodedString {
    pub fn read(mem: &dyn MemoryReader, base: Address, layout: StringLayout) -> DecodeResult<Self> {
        let is_short = mem.read_u8(base + layout.flag_offset)? != 0;
        if is_short {
            let inline = base + layout.inline_offset;
            let raw = mem.read_bytes(inline, layout.inline_capacity)?;
            let len = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
            log::trace!("short string at {} ({} bytes)", base, len);
            Ok(Self::Short {
                inline,
                bytes: raw[..len].to_vec(),
            })
        } else {
            let length = mem.read_uint(base + layout.size_offset, layout.size_width)?;
            let data = StoredPointer::read(mem, base + layout.ptr_offset, layout.pointer)?;
            log::trace!("long string at {} ({} bytes)", base, length);
            Ok(Self::Long { data, length })
        }
    }

    pub fn is_short(&self) -> bool {
        matches!(self, Self::Short { .. })
    }

    pub fn len(&self) -> u64 {
        match self {
            Self::Short { bytes, .. } => bytes.len() as u64,
            Self::Long { length, .. } => *length,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Address of the first character.
    pub fn data(&self) -> DecodeResult<Address> {
        match self {
            Self::Short { inline, .. } => Ok(*inline),
            Self::Long { data, .. } => data.resolve(),
        }
    }

    /// The exact content, bounded by the stored length.
    pub fn bytes<'s>(&'s self, mem: &dyn MemoryReader) -> DecodeResult<Cow<'s, [u8]>> {
        match self {
            Self::Short { bytes, .. } => Ok(Cow::Borrowed(bytes)),
            Self::Long { length: 0, .. } => Ok(Cow::Borrowed(&[])),
            Self::Long { data, length } => Ok(Cow::Owned(mem.read_bytes(data.resolve()?, *length as usize)?)),
        }
    }

    pub fn text(&self, mem: &dyn MemoryReader) -> DecodeResult<String> {
        Ok(String::from_utf8_lossy(&self.bytes(mem)?).into_owned())
    }

    /// Text for plain-text display: cut at the first NUL when `truncate_at_nul`.
    pub fn display_text(&self, mem: &dyn MemoryReader, truncate_at_nul: bool) -> DecodeResult<String> {
        let bytes = self.bytes(mem)?;
        let end = if truncate_at_nul {
            bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len())
        } else {
            bytes.len()
        };
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    pub fn byte_at(&self, mem: &dyn MemoryReader, index: u64) -> DecodeResult<u8> {
        Ok(mem.read_u8(self.data()?.element(index, 1))?)
    }
}

pub fn decode_string(ctx: &DecodeContext<'_>, base: Address, ty: &TypeDescriptor) -> DecodeResult<DecodedString> {
    let layout = StringLayout::from_descriptor(ctx, ty)?;
    DecodedString::read(ctx.mem, base, layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::fixtures::*;
    use crate::types::TypeProvider;

    #[test]
    fn test_short_string_roundtrip() {
        let mut image = image();
        put_string(&mut image, 0x1000, 0, "hello");
        let types = registry();
        let ctx = DecodeContext::new(&image, &types);
        let ty = types.resolve(OFFSET_STRING).unwrap();

        let s = decode_string(&ctx, addr(0x1000), &ty).unwrap();
        assert!(s.is_short());
        assert_eq!(s.len(), 5);
        assert_eq!(s.data().unwrap(), addr(0x1001));
        assert_eq!(s.bytes(&image).unwrap().as_ref(), b"hello");
    }

    #[test]
    fn test_full_inline_capacity() {
        let mut image = image();
        put_string(&mut image, 0x1000, 0, "exactly15chars!");
        let types = registry();
        let ctx = DecodeContext::new(&image, &types);
        let ty = types.resolve(OFFSET_STRING).unwrap();
        let s = decode_string(&ctx, addr(0x1000), &ty).unwrap();
        assert!(s.is_short());
        assert_eq!(s.text(&image).unwrap(), "exactly15chars!");
    }

    #[test]
    fn test_long_string_roundtrip() {
        let text = "a considerably longer string stored out of line";
        let mut image = image();
        put_string(&mut image, 0x1000, 0x1400, text);
        let types = registry();
        let ctx = DecodeContext::new(&image, &types);
        let ty = types.resolve(OFFSET_STRING).unwrap();

        let s = decode_string(&ctx, addr(0x1000), &ty).unwrap();
        assert!(!s.is_short());
        assert_eq!(s.len(), text.len() as u64);
        assert_eq!(s.data().unwrap(), addr(0x1400));
        assert_eq!(s.bytes(&image).unwrap().as_ref(), text.as_bytes());
        assert_eq!(s.byte_at(&image, 2).unwrap(), b'c');
    }

    #[test]
    fn test_long_string_with_embedded_nul() {
        let mut image = image();
        put_bytes(&mut image, 0x1000, &[0, 0, 0, 0]);
        put_u32(&mut image, 0x1004, 20);
        put_offset_ptr(&mut image, 0x1008, 0x1300);
        put_bytes(&mut image, 0x1300, b"first part\0second pt");
        let types = registry();
        let ctx = DecodeContext::new(&image, &types);
        let ty = types.resolve(OFFSET_STRING).unwrap();

        let s = decode_string(&ctx, addr(0x1000), &ty).unwrap();
        assert_eq!(s.bytes(&image).unwrap().len(), 20);
        assert_eq!(s.display_text(&image, true).unwrap(), "first part");
        assert_eq!(s.display_text(&image, false).unwrap().len(), 20);
    }

    #[test]
    fn test_raw_long_string_without_field_metadata() {
        let mut image = image();
        put_bytes(&mut image, 0x1000, &[0]);
        put_u32(&mut image, 0x1004, 3);
        put_u64(&mut image, 0x1008, 0x1500);
        put_bytes(&mut image, 0x1500, b"raw");
        let types = registry();
        let ctx = DecodeContext::new(&image, &types);
        let bare = TypeDescriptor::record("cista::basic_string<char const*>", 16, 8).with_type_arg("char const*");

        let s = decode_string(&ctx, addr(0x1000), &bare).unwrap();
        assert!(matches!(s, DecodedString::Long { data: StoredPointer::Raw { .. }, .. }));
        assert_eq!(s.text(&image).unwrap(), "raw");
    }
}
