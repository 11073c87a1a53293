// Mon Oct 19 2026 - Alex

use crate::types::PrimitiveType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Static layout metadata for one type, as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    pub size: usize,
    #[serde(default = "default_alignment")]
    pub alignment: usize,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub template_args: Vec<TemplateArg>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDescriptor>,
    /// Static `constexpr` members, e.g. a bitset's `num_blocks`.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub constants: IndexMap<String, i64>,
}

fn default_alignment() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Primitive(PrimitiveType),
    Pointer { pointee: String },
    Array { element: String, count: usize },
    #[default]
    Record,
    Opaque,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateArg {
    Value(i64),
    Type(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub offset: usize,
}

impl TypeDescriptor {
    pub fn new(name: &str, size: usize, alignment: usize, kind: TypeKind) -> Self {
        Self {
            name: name.to_string(),
            size,
            alignment,
            kind,
            template_args: Vec::new(),
            fields: Vec::new(),
            constants: IndexMap::new(),
        }
    }

    pub fn primitive(name: &str, primitive: PrimitiveType) -> Self {
        Self::new(name, primitive.size(), primitive.alignment(), TypeKind::Primitive(primitive))
    }

    pub fn record(name: &str, size: usize, alignment: usize) -> Self {
        Self::new(name, size, alignment, TypeKind::Record)
    }

    pub fn pointer(name: &str, pointee: &str) -> Self {
        Self::new(name, 8, 8, TypeKind::Pointer { pointee: pointee.to_string() })
    }

    pub fn array(name: &str, element: &str, count: usize, element_size: usize, element_alignment: usize) -> Self {
        Self::new(
            name,
            element_size * count,
            element_alignment,
            TypeKind::Array { element: element.to_string(), count },
        )
    }

    pub fn with_type_arg(mut self, type_name: &str) -> Self {
        self.template_args.push(TemplateArg::Type(type_name.to_string()));
        self
    }

    pub fn with_value_arg(mut self, value: i64) -> Self {
        self.template_args.push(TemplateArg::Value(value));
        self
    }

    pub fn with_field(mut self, name: &str, type_name: &str, offset: usize) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.to_string(),
            type_name: type_name.to_string(),
            offset,
        });
        self
    }

    pub fn with_constant(mut self, name: &str, value: i64) -> Self {
        self.constants.insert(name.to_string(), value);
        self
    }

    /// The name with leading cv-qualifiers removed, used for printer matching.
    pub fn stripped_name(&self) -> &str {
        strip_qualifiers(&self.name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_offset(&self, name: &str) -> Option<usize> {
        self.field(name).map(|f| f.offset)
    }

    pub fn template_arg(&self, index: usize) -> Option<&TemplateArg> {
        self.template_args.get(index)
    }

    pub fn type_args(&self) -> impl Iterator<Item = &str> {
        self.template_args.iter().filter_map(|arg| match arg {
            TemplateArg::Type(name) => Some(name.as_str()),
            TemplateArg::Value(_) => None,
        })
    }

    pub fn constant(&self, name: &str) -> Option<i64> {
        self.constants.get(name).copied()
    }

    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self.kind {
            TypeKind::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self.kind, TypeKind::Record)
    }
}

pub fn strip_qualifiers(name: &str) -> &str {
    let mut name = name.trim();
    loop {
        if let Some(rest) = name.strip_prefix("const ") {
            name = rest.trim_start();
        } else if let Some(rest) = name.strip_prefix("volatile ") {
            name = rest.trim_start();
        } else {
            return name;
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (size {}, align {})", self.name, self.size, self.alignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stripped_name() {
        let ty = TypeDescriptor::record("const volatile cista::offset::string", 16, 8);
        assert_eq!(ty.stripped_name(), "cista::offset::string");
    }

    #[test]
    fn test_catalog_entry_deserialize() {
        let json = r#"{
            "name": "cista::bitset<70>",
            "size": 16,
            "alignment": 8,
            "template_args": [70],
            "fields": [{"name": "blocks_", "type": "std::array<unsigned long, 2>", "offset": 0}],
            "constants": {"num_blocks": 2, "bits_per_block": 64}
        }"#;
        let ty: TypeDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(ty.kind, TypeKind::Record);
        assert_eq!(ty.template_arg(0), Some(&TemplateArg::Value(70)));
        assert_eq!(ty.field_offset("blocks_"), Some(0));
        assert_eq!(ty.constant("num_blocks"), Some(2));
    }

    #[test]
    fn test_kind_deserialize() {
        let ty: TypeDescriptor =
            serde_json::from_str(r#"{"name": "int", "size": 4, "alignment": 4, "kind": {"primitive": "i32"}}"#)
                .unwrap();
        assert_eq!(ty.as_primitive(), Some(PrimitiveType::I32));
        let ty: TypeDescriptor = serde_json::from_str(
            r#"{"name": "int*", "size": 8, "alignment": 8, "kind": {"pointer": {"pointee": "int"}}}"#,
        )
        .unwrap();
        assert_eq!(ty.kind, TypeKind::Pointer { pointee: "int".to_string() });
    }
}
