// Mon Oct 19 2026 - Alex

use crate::decode::{
    DecodeContext, DecodedBitset, DecodedHashMap, DecodedPointer, DecodedString, DecodedTuple, DecodedValue,
    DecodedVariant, DecodedVector,
};
use crate::host::PrinterRegistry;
use crate::layout::{DecodeError, DecodeResult};
use crate::memory::Address;
use crate::output::ValueNode;
use crate::types::{TypeDescriptor, TypeKind};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BitsetStyle {
    /// One digit per bit, words in index order.
    #[default]
    Binary,
    /// Only the indices of set bits.
    Sparse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenterOptions {
    pub max_depth: usize,
    pub max_children: usize,
    pub bitset_style: BitsetStyle,
    pub truncate_at_nul: bool,
}

impl Default for PresenterOptions {
    fn default() -> Self {
        Self {
            max_depth: 8,
            max_children: 256,
            bitset_style: BitsetStyle::Binary,
            truncate_at_nul: true,
        }
    }
}

/// Turns inspected memory into a labeled value tree.
pub struct Presenter<'a> {
    ctx: DecodeContext<'a>,
    printers: &'a PrinterRegistry,
    options: PresenterOptions,
}

impl<'a> Presenter<'a> {
    pub fn new(ctx: DecodeContext<'a>, printers: &'a PrinterRegistry) -> Self {
        Self {
            ctx,
            printers,
            options: PresenterOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PresenterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &PresenterOptions {
        &self.options
    }

    /// Renders the value of type `ty` at `base`. Structural corruption is
    /// reported inside the tree; any other failure at the root is returned.
    pub fn present(&self, label: &str, base: Address, ty: &TypeDescriptor) -> DecodeResult<ValueNode> {
        match self.render(label, base, ty, 0) {
            Ok(node) => Ok(node),
            Err(e) if e.is_structural() => Ok(error_node(label, base, ty, &e)),
            Err(e) => Err(e),
        }
    }

    fn child(&self, label: &str, base: Address, ty: &TypeDescriptor, depth: usize) -> ValueNode {
        self.render(label, base, ty, depth)
            .unwrap_or_else(|e| error_node(label, base, ty, &e))
    }

    fn render(&self, label: &str, base: Address, ty: &TypeDescriptor, depth: usize) -> DecodeResult<ValueNode> {
        let node = ValueNode::new(label, &ty.name).with_address(base);
        match self.printers.lookup(ty) {
            Some(printer) => {
                let value = printer.print(&self.ctx, base, ty)?;
                self.render_container(node, value, depth)
            }
            None => self.render_plain(node, base, ty, depth),
        }
    }

    fn expand(&self, depth: usize) -> bool {
        depth < self.options.max_depth
    }

    fn render_container(&self, node: ValueNode, value: DecodedValue, depth: usize) -> DecodeResult<ValueNode> {
        match value {
            DecodedValue::Vector(v) => self.render_vector(node, &v, depth),
            DecodedValue::String(s) => self.render_string(node, &s),
            DecodedValue::Tuple(t) => Ok(self.render_tuple(node, &t, depth)),
            DecodedValue::Variant(v) => Ok(self.render_variant(node, &v, depth)),
            DecodedValue::Bitset(b) => Ok(self.render_bitset(node, &b)),
            DecodedValue::HashMap(m) => Ok(self.render_hash_map(node, &m, depth)),
            DecodedValue::OffsetPointer(p) => Ok(self.render_pointer(node, &p, depth)),
        }
    }

    fn render_vector(&self, mut node: ValueNode, vec: &DecodedVector, depth: usize) -> DecodeResult<ValueNode> {
        node.summary = Some(format!("size={}", vec.len()));
        if !self.expand(depth) || vec.is_empty() {
            return Ok(node);
        }
        let shown = vec.len().min(self.options.max_children as u64);
        for (index, address) in vec.iter().take(shown as usize).collect::<DecodeResult<Vec<_>>>()? {
            node.children
                .push(self.child(&format!("[{}]", index), address, vec.element_type(), depth + 1));
        }
        if shown < vec.len() {
            node.children.push(ValueNode::elided(vec.len() - shown));
        }
        Ok(node)
    }

    fn render_string(&self, mut node: ValueNode, string: &DecodedString) -> DecodeResult<ValueNode> {
        let text = string.display_text(self.ctx.mem, self.options.truncate_at_nul)?;
        node.summary = Some(format!("\"{}\"", text.escape_debug()));
        Ok(node)
    }

    fn render_tuple(&self, mut node: ValueNode, tuple: &DecodedTuple, depth: usize) -> ValueNode {
        node.summary = Some(format!("size={}", tuple.arity()));
        if self.expand(depth) {
            for (i, (ty, address)) in tuple.fields().iter().enumerate() {
                node.children.push(self.child(&format!("[{}]", i), *address, ty, depth + 1));
            }
        }
        node
    }

    fn render_variant(&self, mut node: ValueNode, variant: &DecodedVariant, depth: usize) -> ValueNode {
        node.summary = Some(format!("index={}", variant.active_index()));
        if self.expand(depth) {
            node.children.push(
                ValueNode::new("idx_", "index")
                    .with_address(variant.base())
                    .with_summary(variant.active_index().to_string()),
            );
            node.children
                .push(self.child("storage_", variant.storage(), variant.active_type(), depth + 1));
        }
        node
    }

    fn render_bitset(&self, mut node: ValueNode, bits: &DecodedBitset) -> ValueNode {
        match self.options.bitset_style {
            BitsetStyle::Binary => node.summary = Some(bits.to_bit_string()),
            BitsetStyle::Sparse => {
                node.summary = Some(format!("count={}", bits.count()));
                let limit = self.options.max_children;
                let mut set = bits.iter_set_bits();
                for index in set.by_ref().take(limit) {
                    node.children
                        .push(ValueNode::new(&format!("[{}]", index), "bool").with_summary("1"));
                }
                let remaining = set.count() as u64;
                if remaining > 0 {
                    node.children.push(ValueNode::elided(remaining));
                }
            }
        }
        node
    }

    fn render_hash_map(&self, mut node: ValueNode, map: &DecodedHashMap, depth: usize) -> ValueNode {
        node.summary = Some(format!("size={}", map.len()));
        if !self.expand(depth) {
            return node;
        }
        let limit = self.options.max_children as u64;
        for entry in map.iter(self.ctx.mem) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    node.error = Some(e.to_string());
                    break;
                }
            };
            if entry.index >= limit {
                node.children.push(ValueNode::elided(map.len().saturating_sub(limit)));
                break;
            }
            let label = format!("[{}]", entry.index);
            let child = match (map.value(), entry.value_address) {
                (Some(value), Some(value_address)) => ValueNode::new(&label, &map.entry_type().name)
                    .with_address(entry.address)
                    .with_child(self.child("key", entry.key_address, &map.key().ty, depth + 2))
                    .with_child(self.child("value", value_address, &value.ty, depth + 2)),
                _ => self.child(&label, entry.key_address, &map.key().ty, depth + 1),
            };
            node.children.push(child);
        }
        node
    }

    fn render_pointer(&self, mut node: ValueNode, ptr: &DecodedPointer, depth: usize) -> ValueNode {
        node.summary = Some(ptr.pointer().to_string());
        if let (Some(target), Some(pointee)) = (ptr.target(), ptr.pointee()) {
            if self.expand(depth) {
                node.children.push(self.child("*", target, pointee, depth + 1));
            }
        }
        node
    }

    fn render_plain(&self, mut node: ValueNode, base: Address, ty: &TypeDescriptor, depth: usize) -> DecodeResult<ValueNode> {
        match &ty.kind {
            TypeKind::Primitive(p) => {
                let bytes = self.ctx.mem.read_bytes(base, p.size())?;
                node.summary = Some(p.format(&bytes));
            }
            TypeKind::Pointer { .. } => {
                let target = Address::new(self.ctx.mem.read_uint(base, ty.size)?);
                node.summary = Some(if target.is_null() {
                    "nullptr".to_string()
                } else {
                    target.to_string()
                });
            }
            TypeKind::Array { element, count } => {
                let element = self.ctx.types.require(element)?;
                node.summary = Some(format!("size={}", count));
                if self.expand(depth) {
                    let shown = (*count).min(self.options.max_children);
                    for i in 0..shown {
                        let address = base.element(i as u64, element.size);
                        node.children.push(self.child(&format!("[{}]", i), address, &element, depth + 1));
                    }
                    if shown < *count {
                        node.children.push(ValueNode::elided((*count - shown) as u64));
                    }
                }
            }
            TypeKind::Record => {
                if self.expand(depth) {
                    for field in self.ctx.types.fields_of(ty)? {
                        node.children
                            .push(self.child(&field.name, base + field.offset, &field.ty, depth + 1));
                    }
                }
            }
            TypeKind::Opaque => {
                let bytes = self.ctx.mem.read_bytes(base, ty.size.min(16))?;
                node.summary = Some(bytes.iter().map(|b| format!("{:02x}", b)).join(" "));
            }
        }
        Ok(node)
    }
}

fn error_node(label: &str, base: Address, ty: &TypeDescriptor, error: &DecodeError) -> ValueNode {
    log::debug!("{} at {}: {}", ty.name, base, error);
    ValueNode::new(label, &ty.name)
        .with_address(base)
        .with_error(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::fixtures::{self, *};
    use crate::decode::hash_map::{CTRL_DELETED, CTRL_EMPTY};
    use crate::types::TypeProvider;

    fn present(image: &crate::memory::ImageMemory, name: &str, at: u64, options: PresenterOptions) -> DecodeResult<ValueNode> {
        let types = fixtures::registry();
        let printers = PrinterRegistry::with_defaults();
        let ty = types.resolve(name).unwrap();
        Presenter::new(DecodeContext::new(image, &types), &printers)
            .with_options(options)
            .present("value", addr(at), &ty)
    }

    fn summary<'n>(node: &'n ValueNode, path: &[&str]) -> &'n str {
        node.find(path).and_then(|n| n.summary.as_deref()).unwrap_or("")
    }

    #[test]
    fn test_vector_children() {
        let mut image = image();
        put_int_vector(&mut image, 0x1000, 0x1100, &[10, 20, 30]);
        let node = present(&image, OFFSET_VEC_INT, 0x1000, PresenterOptions::default()).unwrap();
        assert_eq!(node.summary.as_deref(), Some("size=3"));
        let labels: Vec<&str> = node.children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["[0]", "[1]", "[2]"]);
        assert_eq!(summary(&node, &["[1]"]), "20");
    }

    #[test]
    fn test_max_children_elides() {
        let mut image = image();
        put_int_vector(&mut image, 0x1000, 0x1100, &[1, 2, 3, 4, 5]);
        let options = PresenterOptions {
            max_children: 2,
            ..PresenterOptions::default()
        };
        let node = present(&image, OFFSET_VEC_INT, 0x1000, options).unwrap();
        assert_eq!(node.children.len(), 3);
        assert_eq!(summary(&node, &["..."]), "3 more");
    }

    #[test]
    fn test_string_summary() {
        let mut image = image();
        put_string(&mut image, 0x1000, 0, "hi \"there\"");
        let node = present(&image, OFFSET_STRING, 0x1000, PresenterOptions::default()).unwrap();
        assert_eq!(node.summary.as_deref(), Some("\"hi \\\"there\\\"\""));
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_hash_map_entries() {
        let mut image = image();
        put_hash_map(&mut image, 0x1000, 0x1100, 0x1200, 2, &[0x01, CTRL_DELETED, 0x02, CTRL_EMPTY]);
        put_u32(&mut image, 0x1100, 1);
        put_u32(&mut image, 0x1104, 10);
        put_u32(&mut image, 0x1110, 3);
        put_u32(&mut image, 0x1114, 30);
        let node = present(&image, INT_MAP, 0x1000, PresenterOptions::default()).unwrap();
        assert!(!node.is_error());
        assert_eq!(summary(&node, &["[0]", "key"]), "1");
        assert_eq!(summary(&node, &["[1]", "key"]), "3");
        assert_eq!(summary(&node, &["[1]", "value"]), "30");
    }

    #[test]
    fn test_corrupt_map_reported_in_tree() {
        let mut image = image();
        put_hash_map(&mut image, 0x1000, 0x1100, 0x1200, 5, &[0x01, CTRL_EMPTY]);
        let node = present(&image, INT_MAP, 0x1000, PresenterOptions::default()).unwrap();
        assert_eq!(node.children.len(), 1);
        assert!(node.error.as_deref().unwrap().contains("Corrupt hash table"));
    }

    #[test]
    fn test_corrupt_variant_at_root_is_error_node() {
        let mut image = image();
        put_bytes(&mut image, 0x1000, &[9]);
        let node = present(&image, VARIANT_3, 0x1000, PresenterOptions::default()).unwrap();
        assert!(node.is_error());
    }

    #[test]
    fn test_unreadable_root_aborts() {
        let image = image();
        let result = present(&image, OFFSET_VEC_INT, 0x9000, PresenterOptions::default());
        assert!(matches!(result, Err(DecodeError::UnreadableMemory(_))));
    }

    #[test]
    fn test_unreadable_child_is_scoped() {
        let mut image = image();
        put_int_vector(&mut image, 0x1000, 0x1100, &[]);
        put_u32(&mut image, 0x1008, 2);
        put_offset_ptr(&mut image, 0x1000, 0x2ffc);
        let node = present(&image, OFFSET_VEC_INT, 0x1000, PresenterOptions::default()).unwrap();
        assert!(!node.is_error());
        assert!(!node.children[0].is_error());
        assert!(node.children[1].is_error());
    }

    #[test]
    fn test_variant_renders_active_alternative() {
        let mut image = image();
        put_bytes(&mut image, 0x1000, &[2]);
        put_bytes(&mut image, 0x1008, &1.5f64.to_le_bytes());
        let node = present(&image, VARIANT_3, 0x1000, PresenterOptions::default()).unwrap();
        assert_eq!(summary(&node, &["idx_"]), "2");
        let storage = node.child("storage_").unwrap();
        assert_eq!(storage.type_name, "double");
        assert_eq!(storage.summary.as_deref(), Some("1.5"));
    }

    #[test]
    fn test_bitset_styles() {
        let mut image = image();
        put_u64(&mut image, 0x1000, 0b101);
        let binary = present(&image, BITSET_70, 0x1000, PresenterOptions::default()).unwrap();
        let bits = binary.summary.unwrap();
        assert_eq!(bits.len(), 128);
        assert!(bits[..64].ends_with("101"));

        let sparse = present(
            &image,
            BITSET_70,
            0x1000,
            PresenterOptions {
                bitset_style: BitsetStyle::Sparse,
                ..PresenterOptions::default()
            },
        )
        .unwrap();
        assert_eq!(sparse.summary.as_deref(), Some("count=2"));
        let labels: Vec<&str> = sparse.children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["[0]", "[2]"]);
    }

    #[test]
    fn test_offset_pointer_child() {
        let mut image = image();
        put_offset_ptr(&mut image, 0x1000, 0x1080);
        put_u32(&mut image, 0x1080, 5);
        put_null_offset_ptr(&mut image, 0x1008);
        let node = present(&image, OFFSET_PTR_INT, 0x1000, PresenterOptions::default()).unwrap();
        assert_eq!(node.summary.as_deref(), Some("0x0000000000001080"));
        assert_eq!(summary(&node, &["*"]), "5");

        let null = present(&image, OFFSET_PTR_INT, 0x1008, PresenterOptions::default()).unwrap();
        assert_eq!(null.summary.as_deref(), Some("nullptr"));
        assert!(null.children.is_empty());
    }

    #[test]
    fn test_depth_limit() {
        let mut image = image();
        put_int_vector(&mut image, 0x1000, 0x1100, &[1]);
        let options = PresenterOptions {
            max_depth: 0,
            ..PresenterOptions::default()
        };
        let node = present(&image, OFFSET_VEC_INT, 0x1000, options).unwrap();
        assert_eq!(node.summary.as_deref(), Some("size=1"));
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_raw_pointer_uses_declared_width() {
        let mut image = image();
        put_u64(&mut image, 0x1000, 0xdead_beef_0000_1040);
        let mut types = fixtures::registry();
        let narrow = types.register(TypeDescriptor::new("int* __ptr32", 4, 4, TypeKind::Pointer { pointee: "int".into() }));
        let wide = types.resolve("int*").unwrap();
        let printers = PrinterRegistry::with_defaults();
        let presenter = Presenter::new(DecodeContext::new(&image, &types), &printers);

        let node = presenter.present("p", addr(0x1000), &narrow).unwrap();
        assert_eq!(node.summary.as_deref(), Some("0x0000000000001040"));
        let node = presenter.present("p", addr(0x1000), &wide).unwrap();
        assert_eq!(node.summary.as_deref(), Some("0xdeadbeef00001040"));
    }
}
