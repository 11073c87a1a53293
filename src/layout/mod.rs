// Mon Oct 19 2026 - Alex

pub mod alignment;
pub mod error;
pub mod pointer;
pub mod tuple;

pub use alignment::Alignment;
pub use error::{DecodeError, DecodeResult};
pub use pointer::{is_offset_ptr, null_sentinel, OffsetPointer, PointerKind, StoredPointer};
pub use tuple::{offset_of, TupleLayout};
