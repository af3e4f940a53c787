//! Portable single-block backend.

use crate::core::ChaChaCore;
use crate::rounds::run_rounds;
use crate::{BLOCK_SIZE, COUNTER_WORD, Rounds, STATE_WORDS};
use cipher::{
    Block, BlockSizeUser, ParBlocksSizeUser, StreamBackend,
    consts::{U1, U64},
};

/// The single-block software backend.
pub(crate) struct Backend<'a, R: Rounds>(pub(crate) &'a mut ChaChaCore<R>);

impl<'a, R: Rounds> BlockSizeUser for Backend<'a, R> {
    type BlockSize = U64;
}

impl<'a, R: Rounds> ParBlocksSizeUser for Backend<'a, R> {
    type ParBlocksSize = U1;
}

impl<'a, R: Rounds> StreamBackend for Backend<'a, R> {
    #[inline(always)]
    fn gen_ks_block(&mut self, block: &mut Block<Self>) {
        let res = run_rounds(&self.0.state, R::COUNT);
        self.0.state[COUNTER_WORD] = self.0.state[COUNTER_WORD].wrapping_add(1);

        for (chunk, val) in block.chunks_exact_mut(4).zip(res.iter()) {
            chunk.copy_from_slice(&val.to_le_bytes());
        }
    }
}

/// Serialize one keystream block for the given state, little endian.
#[inline(always)]
pub(crate) fn keystream_block(state: &[u32; STATE_WORDS], rounds: usize) -> [u8; BLOCK_SIZE] {
    let res = run_rounds(state, rounds);
    let mut out = [0u8; BLOCK_SIZE];
    for (chunk, val) in out.chunks_exact_mut(4).zip(res.iter()) {
        chunk.copy_from_slice(&val.to_le_bytes());
    }
    out
}

/// XOR at most one block of keystream from `src` into `dst`.
///
/// The counter word is left untouched; the caller advances it by the one
/// whole or partial block consumed. A range shorter than a block takes
/// only the leading bytes of the serialized block, so neither `src` nor
/// `dst` is touched past `dst.len()`.
pub(crate) fn xor_block(state: &[u32; STATE_WORDS], dst: &mut [u8], src: &[u8], rounds: usize) {
    debug_assert_eq!(dst.len(), src.len());
    debug_assert!(!dst.is_empty() && dst.len() <= BLOCK_SIZE);

    let ks = keystream_block(state, rounds);
    for ((d, s), k) in dst.iter_mut().zip(src.iter()).zip(ks.iter()) {
        *d = s ^ k;
    }
}
