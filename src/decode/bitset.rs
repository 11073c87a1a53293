// Mon Oct 19 2026 - Alex

use crate::decode::DecodeContext;
use crate::layout::{DecodeError, DecodeResult};
use crate::memory::{Address, MemoryReader};
use crate::types::{TypeDescriptor, TypeKind};

/// Fixed-width words of a bitset, read contiguously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBitset {
    base: Address,
    blocks: Vec<u64>,
    bits_per_word: usize,
}

impl DecodedBitset {
    /// Reads `num_words` words of `bits_per_word` bits starting at `base`.
    /// When `declared_bits` is known, bits past it in the last word are masked off.
    pub fn read(
        mem: &dyn MemoryReader,
        base: Address,
        num_words: usize,
        bits_per_word: usize,
        declared_bits: Option<u64>,
    ) -> DecodeResult<Self> {
        if bits_per_word == 0 || bits_per_word > 64 || bits_per_word % 8 != 0 {
            return Err(DecodeError::unsupported(&format!("{}-bit word", bits_per_word), "bitset block"));
        }
        let word_bytes = bits_per_word / 8;
        let total_bits = num_words
            .checked_mul(bits_per_word)
            .ok_or_else(|| DecodeError::unsupported(&format!("bitset of {} words", num_words), "bitset block count"))?;
        let raw = mem.read_bytes(base, total_bits / 8)?;
        let mut blocks: Vec<u64> = raw
            .chunks_exact(word_bytes)
            .map(|chunk| {
                let mut buf = [0u8; 8];
                buf[..word_bytes].copy_from_slice(chunk);
                u64::from_le_bytes(buf)
            })
            .collect();

        if let (Some(bits), Some(last)) = (declared_bits, blocks.last_mut()) {
            let tail = (bits % bits_per_word as u64) as u32;
            if tail != 0 && bits <= total_bits as u64 {
                *last &= !(u64::MAX << tail);
            }
        }

        log::trace!("bitset at {}: {} x {} bits", base, num_words, bits_per_word);
        Ok(Self {
            base,
            blocks,
            bits_per_word,
        })
    }

    pub fn base(&self) -> Address {
        self.base
    }

    pub fn blocks(&self) -> &[u64] {
        &self.blocks
    }

    pub fn num_words(&self) -> usize {
        self.blocks.len()
    }

    pub fn bits_per_word(&self) -> usize {
        self.bits_per_word
    }

    /// Size of the global bit index space.
    pub fn len(&self) -> u64 {
        (self.blocks.len() * self.bits_per_word) as u64
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn test(&self, index: u64) -> bool {
        if index >= self.len() {
            return false;
        }
        let word = self.blocks[(index / self.bits_per_word as u64) as usize];
        (word >> (index % self.bits_per_word as u64)) & 1 == 1
    }

    pub fn at(&self, index: u64) -> DecodeResult<bool> {
        if index >= self.len() {
            return Err(DecodeError::IndexOutOfRange {
                index,
                length: self.len(),
            });
        }
        Ok(self.test(index))
    }

    pub fn count(&self) -> u64 {
        self.blocks.iter().map(|b| b.count_ones() as u64).sum()
    }

    /// Words in index order, each rendered most significant bit first.
    pub fn to_bit_string(&self) -> String {
        let width = self.bits_per_word;
        self.blocks
            .iter()
            .map(|word| format!("{:0width$b}", word, width = width))
            .collect()
    }

    /// Position in `to_bit_string()` of global bit `index`.
    pub fn char_position(&self, index: u64) -> usize {
        let bpw = self.bits_per_word;
        let word = index as usize / bpw;
        let bit = index as usize % bpw;
        word * bpw + (bpw - 1 - bit)
    }

    /// Set bit indices in ascending order. Each call starts a fresh pass.
    pub fn iter_set_bits(&self) -> SetBits<'_> {
        SetBits {
            blocks: &self.blocks,
            bits_per_word: self.bits_per_word as u64,
            word: 0,
            current: self.blocks.first().copied().unwrap_or(0),
        }
    }
}

/// Lazy ascending walk over the set bits of a bitset.
#[derive(Debug, Clone)]
pub struct SetBits<'a> {
    blocks: &'a [u64],
    bits_per_word: u64,
    word: usize,
    current: u64,
}

impl Iterator for SetBits<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        while self.current == 0 {
            self.word += 1;
            self.current = *self.blocks.get(self.word)?;
        }
        let bit = self.current.trailing_zeros() as u64;
        self.current &= self.current - 1;
        Some(self.word as u64 * self.bits_per_word + bit)
    }
}

pub fn decode_bitset(ctx: &DecodeContext<'_>, base: Address, ty: &TypeDescriptor) -> DecodeResult<DecodedBitset> {
    let declared_bits = match ctx.types.template_value(ty, 0) {
        Ok(n) => Some(u64::try_from(n).map_err(|_| DecodeError::unsupported(&ty.name, "bitset with a non-negative size"))?),
        Err(_) => None,
    };

    let mut offset = 0usize;
    let mut bits_per_word = 64usize;
    let mut num_words: Option<usize> = None;
    if let Some((field_offset, blocks)) = ctx.field_path(ty, &["blocks_"])? {
        offset = field_offset;
        match &blocks.kind {
            TypeKind::Array { element, count } => {
                bits_per_word = ctx.types.require(element)?.size * 8;
                num_words = Some(*count);
            }
            _ => {
                // A single-word bitset stores the block directly.
                bits_per_word = blocks.size * 8;
                num_words = Some(1);
            }
        }
    }
    if let Some(bpb) = ty.constant("bits_per_block") {
        bits_per_word = count_constant(ty, bpb)?;
    }
    if let Some(n) = ty.constant("num_blocks") {
        num_words = Some(count_constant(ty, n)?);
    }
    let num_words = match (num_words, declared_bits) {
        (Some(n), _) => n,
        (None, Some(_)) if bits_per_word == 0 => {
            return Err(DecodeError::unsupported("0-bit word", "bitset block"));
        }
        (None, Some(bits)) => usize::try_from(bits.div_ceil(bits_per_word as u64))
            .map_err(|_| DecodeError::unsupported(&ty.name, "bitset with addressable block count"))?,
        (None, None) => return Err(DecodeError::unsupported(&ty.name, "bitset with known block count")),
    };

    DecodedBitset::read(ctx.mem, base + offset, num_words, bits_per_word, declared_bits)
}

fn count_constant(ty: &TypeDescriptor, value: i64) -> DecodeResult<usize> {
    usize::try_from(value).map_err(|_| DecodeError::unsupported(&ty.name, "bitset with non-negative block constants"))
}
