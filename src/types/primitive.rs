// Mon Oct 19 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Bool,
    Char,
}

impl PrimitiveType {
    pub fn size(self) -> usize {
        match self {
            Self::U8 | Self::I8 | Self::Bool | Self::Char => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
        }
    }

    pub fn alignment(self) -> usize {
        self.size()
    }

    pub fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    pub fn is_integer(self) -> bool {
        !self.is_float() && self != Self::Bool
    }

    /// Renders little-endian `bytes` as this primitive. `bytes` must hold
    /// at least `size()` bytes.
    pub fn format(self, bytes: &[u8]) -> String {
        let mut buf = [0u8; 8];
        let width = self.size().min(bytes.len());
        buf[..width].copy_from_slice(&bytes[..width]);
        let raw = u64::from_le_bytes(buf);
        match self {
            Self::Bool => (raw != 0).to_string(),
            Self::Char => format_char(raw as u8),
            Self::F32 => f32::from_bits(raw as u32).to_string(),
            Self::F64 => f64::from_bits(raw).to_string(),
            Self::I8 => (raw as u8 as i8).to_string(),
            Self::I16 => (raw as u16 as i16).to_string(),
            Self::I32 => (raw as u32 as i32).to_string(),
            Self::I64 => (raw as i64).to_string(),
            Self::U8 | Self::U16 | Self::U32 | Self::U64 => raw.to_string(),
        }
    }
}

fn format_char(byte: u8) -> String {
    if byte.is_ascii_graphic() || byte == b' ' {
        format!("{} '{}'", byte as i8, byte as char)
    } else {
        format!("{} '\\x{:02x}'", byte as i8, byte)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::Char => "char",
        };
        f.write_str(name)
    }
}
