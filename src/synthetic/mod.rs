// Mon Oct 19 2026 - Alex

pub mod method;
pub mod resolver;

pub use method::{MethodArg, MethodKind, SyntheticValue};
pub use resolver::SyntheticMethodResolver;
