// Mon Oct 19 2026 - Alex

use crate::memory::{Address, MemoryError};
use crate::types::TypeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Unreadable memory: {0}")]
    UnreadableMemory(#[from] MemoryError),
    #[error("Type metadata error: {0}")]
    Type(#[from] TypeError),
    #[error("Invalid pointer: null offset stored at {storage}")]
    InvalidPointer { storage: Address },
    #[error("Corrupt discriminant at {address}: index {index}, expected < {alternatives}")]
    CorruptDiscriminant {
        address: Address,
        index: u64,
        alternatives: usize,
    },
    #[error("Corrupt hash table at {address}: size_ is {expected}, control bytes mark {observed} live slots")]
    CorruptHashTable {
        address: Address,
        expected: u64,
        observed: u64,
    },
    #[error("Index {index} out of range (length {length})")]
    IndexOutOfRange { index: u64, length: u64 },
    #[error("Field {index} out of range (arity {arity})")]
    OutOfRange { index: usize, arity: usize },
    #[error("{type_name} has no method {method}")]
    UnsupportedMethod { type_name: String, method: String },
    #[error("Invalid argument to {method}: {reason}")]
    InvalidArgument { method: &'static str, reason: String },
    #[error("{type_name} cannot be decoded as {expected}")]
    UnsupportedType {
        type_name: String,
        expected: &'static str,
    },
}

impl DecodeError {
    /// Errors caused by inconsistent bytes rather than by the caller or the host.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::CorruptDiscriminant { .. } | Self::CorruptHashTable { .. } | Self::InvalidPointer { .. }
        )
    }

    pub fn unsupported(type_name: &str, expected: &'static str) -> Self {
        Self::UnsupportedType {
            type_name: type_name.to_string(),
            expected,
        }
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;
