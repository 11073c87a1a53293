// Mon Oct 19 2026 - Alex

pub mod cli;
pub mod config;
pub mod decode;
pub mod host;
pub mod layout;
pub mod memory;
pub mod output;
pub mod synthetic;
pub mod types;
pub mod utils;

pub use config::Config;
pub use decode::{decode, ContainerKind, DecodeContext, DecodedValue};
pub use host::{MethodRegistry, PrinterRegistry, TypeMatcher};
pub use layout::{DecodeError, DecodeResult};
pub use memory::{Address, ImageMemory, MemoryReader, MmapMemory};
pub use output::{Presenter, PresenterOptions, TreeFormatter, ValueNode};
pub use synthetic::{MethodArg, MethodKind, SyntheticMethodResolver, SyntheticValue};
pub use types::{TypeDescriptor, TypeProvider, TypeRegistry};
