// Mon Oct 19 2026 - Alex

pub mod matcher;
pub mod methods;
pub mod printers;

pub use matcher::TypeMatcher;
pub use methods::{MethodEntry, MethodRegistry, MethodSignature};
pub use printers::{PrinterEntry, PrinterRegistry};
