// Mon Oct 19 2026 - Alex

use crate::decode::{self, ContainerKind, DecodeContext, DecodedValue};
use crate::host::TypeMatcher;
use crate::layout::DecodeResult;
use crate::memory::Address;
use crate::types::TypeDescriptor;
use std::fmt;

type PrintFn = dyn Fn(&DecodeContext<'_>, Address, &TypeDescriptor) -> DecodeResult<DecodedValue> + Send + Sync;

/// A formatter plugged into the display pipeline for one type family.
pub struct PrinterEntry {
    pub name: String,
    pub matcher: TypeMatcher,
    pub description: String,
    printer: Box<PrintFn>,
}

impl PrinterEntry {
    pub fn new<F>(name: &str, matcher: TypeMatcher, printer: F) -> Self
    where
        F: Fn(&DecodeContext<'_>, Address, &TypeDescriptor) -> DecodeResult<DecodedValue> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            matcher,
            description: String::new(),
            printer: Box::new(printer),
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    pub fn print(&self, ctx: &DecodeContext<'_>, base: Address, ty: &TypeDescriptor) -> DecodeResult<DecodedValue> {
        (self.printer)(ctx, base, ty)
    }
}

impl fmt::Debug for PrinterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrinterEntry")
            .field("name", &self.name)
            .field("matcher", &self.matcher)
            .finish()
    }
}

/// Ordered printer list. The first matching entry wins.
#[derive(Debug, Default)]
pub struct PrinterRegistry {
    entries: Vec<PrinterEntry>,
}

impl PrinterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with one printer per container kind.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_defaults();
        registry
    }

    pub fn register(&mut self, entry: PrinterEntry) {
        log::debug!("registered printer {} for {}", entry.name, entry.matcher);
        self.entries.push(entry);
    }

    pub fn register_defaults(&mut self) {
        for kind in ContainerKind::ALL {
            let entry = PrinterEntry::new(&format!("cista::{}", kind.name()), kind.matcher(), move |ctx, base, ty| {
                decode::decode_as(ctx, base, ty, kind)
            })
            .with_description(describe(kind));
            self.register(entry);
        }
    }

    pub fn lookup(&self, ty: &TypeDescriptor) -> Option<&PrinterEntry> {
        self.entries.iter().find(|e| e.matcher.matches(ty))
    }

    pub fn entries(&self) -> &[PrinterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn describe(kind: ContainerKind) -> &'static str {
    match kind {
        ContainerKind::OffsetPointer => "self-relative pointer, shown with its dereferenced pointee",
        ContainerKind::Vector => "elements in index order",
        ContainerKind::String => "short or long string content",
        ContainerKind::Tuple => "fields in declaration order",
        ContainerKind::Variant => "active alternative",
        ContainerKind::Bitset => "set bits, binary or sparse",
        ContainerKind::HashMap => "live entries in slot order",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::fixtures::{self, *};
    use crate::types::TypeProvider;

    #[test]
    fn test_defaults_cover_every_kind() {
        let registry = PrinterRegistry::with_defaults();
        assert_eq!(registry.len(), ContainerKind::ALL.len());
        let types = fixtures::registry();
        for name in [OFFSET_VEC_INT, OFFSET_STRING, TUPLE_3, VARIANT_3, BITSET_70, INT_MAP, OFFSET_PTR_INT] {
            let ty = types.resolve(name).unwrap();
            assert!(registry.lookup(&ty).is_some(), "no printer for {}", name);
        }
        let ctrl = TypeDescriptor::record("cista::hash_storage<int, cista::offset_ptr>::ctrl_t", 1, 1);
        assert!(registry.lookup(&ctrl).is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let mut registry = PrinterRegistry::new();
        registry.register(PrinterEntry::new(
            "custom",
            TypeMatcher::prefix("cista::basic_vector"),
            |_, base, _| Err(crate::layout::DecodeError::InvalidPointer { storage: base }),
        ));
        registry.register_defaults();
        let types = fixtures::registry();
        let ty = types.resolve(OFFSET_VEC_INT).unwrap();
        assert_eq!(registry.lookup(&ty).unwrap().name, "custom");
    }

    #[test]
    fn test_printer_decodes() {
        let mut image = image();
        put_int_vector(&mut image, 0x1000, 0x1100, &[4, 5]);
        let types = fixtures::registry();
        let ctx = DecodeContext::new(&image, &types);
        let ty = types.resolve(OFFSET_VEC_INT).unwrap();
        let printers = PrinterRegistry::with_defaults();
        let value = printers.lookup(&ty).unwrap().print(&ctx, addr(0x1000), &ty).unwrap();
        assert_eq!(value.kind(), ContainerKind::Vector);
    }
}
