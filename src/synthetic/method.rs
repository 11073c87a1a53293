// Mon Oct 19 2026 - Alex

use crate::decode::KeyQuery;
use crate::memory::Address;
use crate::types::TypeDescriptor;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Accessors emulated against decoded containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MethodKind {
    Size,
    At,
    Subscript,
    Find,
    Index,
    Get,
}

impl MethodKind {
    pub const ALL: [MethodKind; 6] = [
        Self::Size,
        Self::At,
        Self::Subscript,
        Self::Find,
        Self::Index,
        Self::Get,
    ];

    /// The accessor's name as the container type spells it.
    pub fn name(self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::At => "at",
            Self::Subscript => "operator[]",
            Self::Find => "find",
            Self::Index => "index",
            Self::Get => "get",
        }
    }

    pub fn takes_argument(self) -> bool {
        matches!(self, Self::At | Self::Subscript | Self::Find)
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MethodKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name() == s || (*m == Self::Subscript && s == "[]"))
            .ok_or_else(|| format!("Unknown method: {}", s))
    }
}

/// Argument to an accessor: a position or a hash map key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodArg {
    Index(u64),
    Key(KeyQuery),
}

impl MethodArg {
    pub fn key(text: &str) -> Self {
        Self::Key(KeyQuery::Text(text.to_string()))
    }

    /// Reads `text` the way `method` expects it: keys stay text, positions
    /// must parse as `0x` hex or decimal.
    pub fn parse_for(method: MethodKind, text: &str) -> Result<Self, String> {
        if method == MethodKind::Find {
            return Ok(Self::key(text));
        }
        let parsed = match text.strip_prefix("0x") {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => text.parse(),
        };
        match parsed {
            Ok(index) => Ok(Self::Index(index)),
            Err(_) if method == MethodKind::Subscript => Ok(Self::key(text)),
            Err(_) => Err(format!("Expected an index, got '{}'", text)),
        }
    }

    pub fn as_index(&self) -> Option<u64> {
        match self {
            Self::Index(i) => Some(*i),
            Self::Key(_) => None,
        }
    }

    /// Key view of the argument; an index is matched as its decimal text.
    pub fn as_key(&self) -> KeyQuery {
        match self {
            Self::Index(i) => KeyQuery::Text(i.to_string()),
            Self::Key(k) => k.clone(),
        }
    }
}

/// Result of an emulated accessor.
#[derive(Debug, Clone)]
pub enum SyntheticValue {
    Count(u64),
    /// A typed object living in inspected memory.
    Element { ty: Arc<TypeDescriptor>, address: Address },
    Byte(u8),
    Bit(bool),
    Index(usize),
    Address(Address),
    Null,
    NotFound,
}

impl SyntheticValue {
    pub fn element(ty: &Arc<TypeDescriptor>, address: Address) -> Self {
        Self::Element {
            ty: ty.clone(),
            address,
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

impl fmt::Display for SyntheticValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{}", n),
            Self::Element { ty, address } => write!(f, "({}) @ {}", ty.name, address),
            Self::Byte(b) if b.is_ascii_graphic() || *b == b' ' => write!(f, "{} '{}'", b, *b as char),
            Self::Byte(b) => write!(f, "{} '\\x{:02x}'", b, b),
            Self::Bit(bit) => write!(f, "{}", bit),
            Self::Index(i) => write!(f, "{}", i),
            Self::Address(a) => write!(f, "{}", a),
            Self::Null => f.write_str("nullptr"),
            Self::NotFound => f.write_str("<not found>"),
        }
    }
}
