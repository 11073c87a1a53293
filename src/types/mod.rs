// Mon Oct 19 2026 - Alex

pub mod descriptor;
pub mod error;
pub mod primitive;
pub mod provider;
pub mod registry;

pub use descriptor::{FieldDescriptor, TemplateArg, TypeDescriptor, TypeKind};
pub use error::TypeError;
pub use primitive::PrimitiveType;
pub use provider::{ResolvedField, TypeProvider};
pub use registry::{TypeCatalog, TypeRegistry};
