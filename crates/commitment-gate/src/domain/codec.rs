//! # Commitment Codec
//!
//! Pure functions for the commitment wire format and the canonical call
//! encoding both sides of the bridge hash.
//!
//! - NO I/O operations
//! - NO async code
//! - Pure functions only

use super::entities::ProposalCall;
use super::value_objects::{Commitment, Hash, U256};
use sha3::{Digest, Keccak256};

/// Width of one commitment in bytes.
pub const COMMITMENT_WIDTH: usize = 32;

/// ABI word size.
const WORD: usize = 32;

/// Offset of the dynamic `data` field: four head words.
const DATA_OFFSET: usize = 4 * WORD;

// =============================================================================
// COMMITMENT PAYLOAD
// =============================================================================

/// Splits `bytes` into consecutive 32-byte commitments, preserving order.
///
/// A trailing partial chunk is dropped, not rejected. Empty input yields an
/// empty list.
#[must_use]
pub fn decode_commitments(bytes: &[u8]) -> Vec<Commitment> {
    bytes
        .chunks_exact(COMMITMENT_WIDTH)
        .map(|chunk| {
            let mut word = [0u8; COMMITMENT_WIDTH];
            word.copy_from_slice(chunk);
            Hash::new(word)
        })
        .collect()
}

/// Number of bytes `decode_commitments` discards from `bytes`.
#[must_use]
pub fn truncated_len(bytes: &[u8]) -> usize {
    bytes.len() % COMMITMENT_WIDTH
}

/// Concatenates commitments into a payload `decode_commitments` reads back.
#[must_use]
pub fn encode_commitments(commitments: &[Commitment]) -> Vec<u8> {
    commitments
        .iter()
        .flat_map(|c| c.as_bytes().iter().copied())
        .collect()
}

// =============================================================================
// CANONICAL CALL ENCODING
// =============================================================================

/// ABI-encodes `(address to, uint256 value, bytes data, uint8 operation)`.
///
/// Head: `to`, `value`, offset of `data`, `operation`. Tail: length of
/// `data`, then `data` zero-padded to a word boundary.
#[must_use]
pub fn encode_call(call: &ProposalCall) -> Vec<u8> {
    let padded = call.data.len().div_ceil(WORD) * WORD;
    let mut out = Vec::with_capacity(5 * WORD + padded);

    out.extend_from_slice(&left_pad(call.to.as_bytes()));
    out.extend_from_slice(&u256_word(call.value));
    out.extend_from_slice(&u256_word(U256::from(DATA_OFFSET)));
    out.extend_from_slice(&left_pad(&[call.operation.as_u8()]));

    out.extend_from_slice(&u256_word(U256::from(call.data.len())));
    out.extend_from_slice(&call.data);
    out.resize(out.len() + (padded - call.data.len()), 0);
    out
}

/// Commitment for a call: `keccak256(encode_call(call))`.
#[must_use]
pub fn call_hash(call: &ProposalCall) -> Commitment {
    keccak256(&encode_call(call))
}

/// Keccak-256 of arbitrary bytes.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    let digest = Keccak256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    Hash::new(out)
}

fn left_pad(bytes: &[u8]) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - bytes.len()..].copy_from_slice(bytes);
    word
}

fn u256_word(value: U256) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    word
}
