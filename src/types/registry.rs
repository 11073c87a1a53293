// Mon Oct 19 2026 - Alex

use crate::types::descriptor::strip_qualifiers;
use crate::types::{PrimitiveType, TypeDescriptor, TypeError, TypeKind, TypeProvider};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

const BUILTINS: &[(&str, PrimitiveType)] = &[
    ("bool", PrimitiveType::Bool),
    ("char", PrimitiveType::Char),
    ("signed char", PrimitiveType::I8),
    ("unsigned char", PrimitiveType::U8),
    ("short", PrimitiveType::I16),
    ("unsigned short", PrimitiveType::U16),
    ("int", PrimitiveType::I32),
    ("unsigned int", PrimitiveType::U32),
    ("long", PrimitiveType::I64),
    ("unsigned long", PrimitiveType::U64),
    ("long long", PrimitiveType::I64),
    ("unsigned long long", PrimitiveType::U64),
    ("float", PrimitiveType::F32),
    ("double", PrimitiveType::F64),
    ("int8_t", PrimitiveType::I8),
    ("uint8_t", PrimitiveType::U8),
    ("int16_t", PrimitiveType::I16),
    ("uint16_t", PrimitiveType::U16),
    ("int32_t", PrimitiveType::I32),
    ("uint32_t", PrimitiveType::U32),
    ("int64_t", PrimitiveType::I64),
    ("uint64_t", PrimitiveType::U64),
    ("intptr_t", PrimitiveType::I64),
    ("size_t", PrimitiveType::U64),
];

/// On-disk form of a type catalog.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TypeCatalog {
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
    /// Typedef name to target name.
    #[serde(default)]
    pub aliases: IndexMap<String, String>,
}

/// Ordered catalog of type descriptors keyed by qualified name.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    types: IndexMap<String, Arc<TypeDescriptor>>,
    aliases: IndexMap<String, String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the C/C++ fundamental types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, primitive) in BUILTINS {
            registry.register(TypeDescriptor::primitive(name, *primitive));
        }
        registry
    }

    pub fn from_catalog(catalog: TypeCatalog) -> Result<Self, TypeError> {
        let mut registry = Self::with_builtins();
        for ty in catalog.types {
            validate(&ty)?;
            registry.register(ty);
        }
        for (alias, target) in catalog.aliases {
            registry.add_alias(&alias, &target);
        }
        Ok(registry)
    }

    pub fn from_json_str(json: &str) -> Result<Self, TypeError> {
        let catalog: TypeCatalog = serde_json::from_str(json)?;
        Self::from_catalog(catalog)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TypeError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let registry = Self::from_json_str(&contents)?;
        log::debug!("loaded {} types from {}", registry.len(), path.as_ref().display());
        Ok(registry)
    }

    pub fn register(&mut self, ty: TypeDescriptor) -> Arc<TypeDescriptor> {
        let ty = Arc::new(ty);
        self.types.insert(ty.name.clone(), ty.clone());
        ty
    }

    pub fn add_alias(&mut self, alias: &str, target: &str) {
        self.aliases.insert(alias.to_string(), target.to_string());
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(|k| k.as_str())
    }

    fn strip_typedefs<'a>(&'a self, mut name: &'a str) -> &'a str {
        // Bounded so a cyclic alias table cannot spin forever.
        for _ in 0..32 {
            match self.aliases.get(name) {
                Some(target) => name = target.as_str(),
                None => break,
            }
        }
        name
    }
}

impl TypeProvider for TypeRegistry {
    fn resolve(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        let name = self.strip_typedefs(strip_qualifiers(name));
        self.types.get(name).cloned()
    }
}

fn validate(ty: &TypeDescriptor) -> Result<(), TypeError> {
    let invalid = |reason: &str| TypeError::InvalidDescriptor {
        type_name: ty.name.clone(),
        reason: reason.to_string(),
    };
    if ty.alignment == 0 || !ty.alignment.is_power_of_two() {
        return Err(invalid("alignment must be a power of two"));
    }
    if ty.size % ty.alignment != 0 {
        return Err(invalid("size must be a multiple of alignment"));
    }
    if let TypeKind::Primitive(p) = ty.kind {
        if p.size() != ty.size {
            return Err(invalid("primitive size mismatch"));
        }
    }
    if let Some(f) = ty.fields.iter().find(|f| f.offset > ty.size) {
        return Err(invalid(&format!("field {} lies outside the type", f.name)));
    }
    if let Some((name, value)) = ty.constants.iter().find(|(_, v)| **v < 0) {
        return Err(invalid(&format!("constant {} is negative ({})", name, value)));
    }
    Ok(())
}
