// Mon Oct 19 2026 - Alex

use crate::host::TypeMatcher;
use crate::types::TypeDescriptor;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    OffsetPointer,
    Vector,
    String,
    Tuple,
    Variant,
    Bitset,
    HashMap,
}

static MATCHERS: Lazy<Vec<(ContainerKind, TypeMatcher)>> = Lazy::new(|| {
    vec![
        (ContainerKind::OffsetPointer, TypeMatcher::prefix("cista::offset_ptr")),
        (ContainerKind::Vector, TypeMatcher::prefix("cista::basic_vector")),
        (
            ContainerKind::String,
            TypeMatcher::new(r"^cista::(basic|generic)_string\b").expect("valid pattern"),
        ),
        (ContainerKind::Tuple, TypeMatcher::prefix("cista::tuple")),
        (ContainerKind::Variant, TypeMatcher::prefix("cista::variant")),
        (ContainerKind::Bitset, TypeMatcher::prefix("cista::bitset")),
        (
            ContainerKind::HashMap,
            TypeMatcher::prefix("cista::hash_storage").excluding_suffix("::ctrl_t"),
        ),
    ]
});

impl ContainerKind {
    pub const ALL: [ContainerKind; 7] = [
        Self::OffsetPointer,
        Self::Vector,
        Self::String,
        Self::Tuple,
        Self::Variant,
        Self::Bitset,
        Self::HashMap,
    ];

    pub fn classify(ty: &TypeDescriptor) -> Option<Self> {
        MATCHERS.iter().find(|(_, m)| m.matches(ty)).map(|(kind, _)| *kind)
    }

    pub fn matcher(self) -> TypeMatcher {
        MATCHERS
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, m)| m.clone())
            .unwrap_or_else(|| TypeMatcher::prefix(self.name()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::OffsetPointer => "offset_ptr",
            Self::Vector => "vector",
            Self::String => "string",
            Self::Tuple => "tuple",
            Self::Variant => "variant",
            Self::Bitset => "bitset",
            Self::HashMap => "hash_map",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
