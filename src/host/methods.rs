// Mon Oct 19 2026 - Alex

use crate::decode::{ContainerKind, DecodeContext};
use crate::host::TypeMatcher;
use crate::layout::{DecodeError, DecodeResult};
use crate::memory::Address;
use crate::synthetic::{MethodArg, MethodKind, SyntheticMethodResolver, SyntheticValue};
use crate::types::TypeDescriptor;
use std::fmt;

type MethodFn =
    dyn Fn(&DecodeContext<'_>, Address, &TypeDescriptor, Option<&MethodArg>) -> DecodeResult<SyntheticValue> + Send + Sync;

/// Argument and result types a host declares for a synthetic method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub args: Vec<(String, String)>,
    pub result: String,
}

impl MethodSignature {
    pub fn new(result: &str) -> Self {
        Self {
            args: Vec::new(),
            result: result.to_string(),
        }
    }

    pub fn with_arg(mut self, name: &str, type_name: &str) -> Self {
        self.args.push((name.to_string(), type_name.to_string()));
        self
    }

    /// Signature of a built-in accessor on a container kind.
    pub fn of(kind: ContainerKind, method: MethodKind) -> Self {
        match (kind, method) {
            (_, MethodKind::Size) => Self::new("size_type"),
            (_, MethodKind::Index) => Self::new("size_type"),
            (_, MethodKind::Get) => Self::new("pointer"),
            (ContainerKind::Bitset, _) => Self::new("bool").with_arg("pos", "size_type"),
            (ContainerKind::String, _) => Self::new("char").with_arg("pos", "size_type"),
            (ContainerKind::HashMap, MethodKind::Find) => Self::new("iterator").with_arg("key", "key_type"),
            (ContainerKind::HashMap, MethodKind::Subscript) => Self::new("mapped_type&").with_arg("key", "key_type"),
            (_, _) => Self::new("reference").with_arg("pos", "size_type"),
        }
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self
            .args
            .iter()
            .map(|(name, ty)| format!("{} {}", ty, name))
            .collect();
        write!(f, "({}) -> {}", args.join(", "), self.result)
    }
}

/// A synthetic accessor exposed as if it were a native member function.
pub struct MethodEntry {
    pub name: String,
    pub matcher: TypeMatcher,
    pub signature: MethodSignature,
    implementation: Box<MethodFn>,
}

impl MethodEntry {
    pub fn new<F>(name: &str, matcher: TypeMatcher, signature: MethodSignature, implementation: F) -> Self
    where
        F: Fn(&DecodeContext<'_>, Address, &TypeDescriptor, Option<&MethodArg>) -> DecodeResult<SyntheticValue>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.to_string(),
            matcher,
            signature,
            implementation: Box::new(implementation),
        }
    }

    pub fn invoke(
        &self,
        ctx: &DecodeContext<'_>,
        base: Address,
        ty: &TypeDescriptor,
        arg: Option<&MethodArg>,
    ) -> DecodeResult<SyntheticValue> {
        (self.implementation)(ctx, base, ty, arg)
    }

    pub fn help_text(&self) -> String {
        format!("{}{}", self.name, self.signature)
    }
}

impl fmt::Debug for MethodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodEntry")
            .field("name", &self.name)
            .field("matcher", &self.matcher)
            .field("signature", &self.signature)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct MethodRegistry {
    entries: Vec<MethodEntry>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_defaults();
        registry
    }

    pub fn register(&mut self, entry: MethodEntry) {
        log::debug!("registered method {} for {}", entry.name, entry.matcher);
        self.entries.push(entry);
    }

    /// Installs every accessor the synthetic resolver emulates.
    pub fn register_defaults(&mut self) {
        for kind in ContainerKind::ALL {
            for &method in SyntheticMethodResolver::methods(kind) {
                let entry = MethodEntry::new(
                    method.name(),
                    kind.matcher(),
                    MethodSignature::of(kind, method),
                    move |ctx, base, ty, arg| SyntheticMethodResolver::new(*ctx).call(base, ty, method, arg),
                );
                self.register(entry);
            }
        }
    }

    pub fn lookup(&self, ty: &TypeDescriptor, name: &str) -> Option<&MethodEntry> {
        self.entries
            .iter()
            .find(|e| e.name == name && e.matcher.matches(ty))
    }

    /// Methods callable on `ty`, in registration order.
    pub fn methods_for<'s>(&'s self, ty: &'s TypeDescriptor) -> impl Iterator<Item = &'s MethodEntry> + 's {
        self.entries.iter().filter(move |e| e.matcher.matches(ty))
    }

    pub fn call(
        &self,
        ctx: &DecodeContext<'_>,
        base: Address,
        ty: &TypeDescriptor,
        name: &str,
        arg: Option<&MethodArg>,
    ) -> DecodeResult<SyntheticValue> {
        let entry = self.lookup(ty, name).ok_or_else(|| DecodeError::UnsupportedMethod {
            type_name: ty.name.clone(),
            method: name.to_string(),
        })?;
        entry.invoke(ctx, base, ty, arg)
    }

    pub fn entries(&self) -> &[MethodEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
