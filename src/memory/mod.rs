// Mon Oct 19 2026 - Alex

pub mod address;
pub mod error;
pub mod image;
pub mod mmap;
pub mod range;
pub mod traits;

pub use address::Address;
pub use error::MemoryError;
pub use image::ImageMemory;
pub use mmap::MmapMemory;
pub use range::MemoryRange;
pub use traits::{MemoryReader, MemoryWriter};
