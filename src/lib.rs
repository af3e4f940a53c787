//! ChaCha stream cipher with a four-block wide keystream engine.
//!
//! This implementation is compatible with the `cipher` crate traits.
//! Its structure separates the cipher state from the keystream backends:
//! a portable single-block backend and a wide backend that mixes four
//! blocks at once across interleaved word lanes and applies keystream to
//! byte ranges of any length without a scalar fallback pass.
//!
//! The trait-based API is exposed through the [`ChaCha8`], [`ChaCha12`]
//! and [`ChaCha20`] aliases. The raw slice-level entry points
//! [`init_state`] and [`xor_keystream`] operate on a bare 16-word state
//! for callers that manage the block counter themselves.

#![no_std]

pub use cipher; // Re-export cipher crate for downstream users

use cipher::StreamCipherCoreWrapper;
use cipher::consts::{U12, U32};
use cipher::generic_array::GenericArray;

pub use crate::core::ChaChaCore;
pub use crate::stream::{init_state, xor_keystream};

// --- Round Count Abstraction ---

/// A trait to define the round count for a ChaCha variant.
pub trait Rounds: Copy {
    /// Total number of rounds. Always even; two consecutive rounds form
    /// one column round followed by one diagonal round.
    const COUNT: usize;
}

/// 8 rounds.
#[derive(Copy, Clone)]
pub struct R8;
impl Rounds for R8 {
    const COUNT: usize = 8;
}

/// 12 rounds.
#[derive(Copy, Clone)]
pub struct R12;
impl Rounds for R12 {
    const COUNT: usize = 12;
}

/// 20 rounds.
#[derive(Copy, Clone)]
pub struct R20;
impl Rounds for R20 {
    const COUNT: usize = 20;
}

// --- Core Cipher Logic ---

pub(crate) mod core;

pub(crate) mod rounds;

pub(crate) mod backends;

pub mod stream;

// --- Constants ---

/// Number of 32-bit words in the cipher state.
pub const STATE_WORDS: usize = 16;

/// Size of one keystream block in bytes.
pub const BLOCK_SIZE: usize = 64;

/// Number of blocks the wide backend computes per invocation.
pub const PAR_BLOCKS: usize = 4;

/// Index of the block counter word within the state.
pub(crate) const COUNTER_WORD: usize = 12;

/// State initialization constant ("expand 32-byte k").
pub(crate) const CONSTANTS: [u32; 4] = [0x6170_7865, 0x3320_646e, 0x7962_2d32, 0x6b20_6574];

// --- Convenience Type Aliases for Users ---

/// Key type used by all variants.
pub type Key = GenericArray<u8, U32>;

/// Nonce type used by all variants.
pub type Nonce = GenericArray<u8, U12>;

/// ChaCha8 stream cipher (reduced-round variant with 8 rounds).
pub type ChaCha8 = StreamCipherCoreWrapper<ChaChaCore<R8>>;

/// ChaCha12 stream cipher (reduced-round variant with 12 rounds).
pub type ChaCha12 = StreamCipherCoreWrapper<ChaChaCore<R12>>;

/// ChaCha20 stream cipher (IETF version with 96-bit nonce and 32-bit
/// block counter).
pub type ChaCha20 = StreamCipherCoreWrapper<ChaChaCore<R20>>;
