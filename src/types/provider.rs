// Mon Oct 19 2026 - Alex

use crate::types::{TemplateArg, TypeDescriptor, TypeError};
use std::sync::Arc;

/// A field of a record with its type already resolved.
#[derive(Debug, Clone)]
pub struct ResolvedField {
    pub name: String,
    pub offset: usize,
    pub ty: Arc<TypeDescriptor>,
}

/// Host-side source of static type metadata.
pub trait TypeProvider {
    fn resolve(&self, name: &str) -> Option<Arc<TypeDescriptor>>;

    fn require(&self, name: &str) -> Result<Arc<TypeDescriptor>, TypeError> {
        self.resolve(name)
            .ok_or_else(|| TypeError::UnknownType(name.to_string()))
    }

    fn template_argument(&self, ty: &TypeDescriptor, index: usize) -> Result<Arc<TypeDescriptor>, TypeError> {
        match ty.template_arg(index) {
            Some(TemplateArg::Type(name)) => self.require(name),
            Some(TemplateArg::Value(_)) => Err(TypeError::NotATypeArgument {
                type_name: ty.name.clone(),
                index,
            }),
            None => Err(TypeError::MissingTemplateArgument {
                type_name: ty.name.clone(),
                index,
            }),
        }
    }

    fn template_value(&self, ty: &TypeDescriptor, index: usize) -> Result<i64, TypeError> {
        match ty.template_arg(index) {
            Some(TemplateArg::Value(value)) => Ok(*value),
            Some(TemplateArg::Type(_)) => Err(TypeError::NotAValueArgument {
                type_name: ty.name.clone(),
                index,
            }),
            None => Err(TypeError::MissingTemplateArgument {
                type_name: ty.name.clone(),
                index,
            }),
        }
    }

    /// All type arguments in declaration order; value arguments are skipped.
    fn type_arguments(&self, ty: &TypeDescriptor) -> Result<Vec<Arc<TypeDescriptor>>, TypeError> {
        ty.type_args().map(|name| self.require(name)).collect()
    }

    fn fields_of(&self, ty: &TypeDescriptor) -> Result<Vec<ResolvedField>, TypeError> {
        ty.fields
            .iter()
            .map(|f| {
                Ok(ResolvedField {
                    name: f.name.clone(),
                    offset: f.offset,
                    ty: self.require(&f.type_name)?,
                })
            })
            .collect()
    }

    fn field(&self, ty: &TypeDescriptor, name: &str) -> Result<Option<ResolvedField>, TypeError> {
        match ty.field(name) {
            Some(f) => Ok(Some(ResolvedField {
                name: f.name.clone(),
                offset: f.offset,
                ty: self.require(&f.type_name)?,
            })),
            None => Ok(None),
        }
    }
}
