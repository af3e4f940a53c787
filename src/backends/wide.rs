//! Four-block wide backend.
//!
//! Computes four keystream blocks per invocation. The four block states
//! are interleaved into 16 lanes of four same-position words so the
//! quarter rounds run across all blocks at once, then de-interleaved
//! back into the flat little-endian block layout. On top of that sits
//! [`xor_up_to_four_blocks`], which applies keystream to a byte range of
//! any length in `(64, 256]` without a scalar fallback pass.

use crate::core::ChaChaCore;
use crate::rounds::{Lane, run_rounds, run_rounds_wide};
use crate::{BLOCK_SIZE, COUNTER_WORD, PAR_BLOCKS, Rounds, STATE_WORDS};
use cipher::{
    Block, BlockSizeUser, ParBlocks, ParBlocksSizeUser, StreamBackend,
    consts::{U4, U64},
};

/// Bytes produced by one wide invocation.
pub(crate) const WIDE_BYTES: usize = PAR_BLOCKS * BLOCK_SIZE;

/// Width of the store unit used when applying keystream to a byte range.
const CHUNK: usize = 32;

/// The four-block wide backend.
pub(crate) struct Backend<'a, R: Rounds>(pub(crate) &'a mut ChaChaCore<R>);

impl<'a, R: Rounds> BlockSizeUser for Backend<'a, R> {
    type BlockSize = U64;
}

impl<'a, R: Rounds> ParBlocksSizeUser for Backend<'a, R> {
    type ParBlocksSize = U4;
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

    #[inline(always)]
    fn gen_par_ks_blocks(&mut self, blocks: &mut ParBlocks<Self>) {
        let ks = four_block_keystream(&self.0.state, R::COUNT);
        self.0.state[COUNTER_WORD] = self.0.state[COUNTER_WORD].wrapping_add(PAR_BLOCKS as u32);

        for (block, chunk) in blocks.iter_mut().zip(ks.chunks_exact(BLOCK_SIZE)) {
            block.copy_from_slice(chunk);
        }
    }
}

/// Spread four block states across 16 lanes of four same-position words.
#[inline(always)]
pub(crate) fn interleave(blocks: &[[u32; STATE_WORDS]; PAR_BLOCKS]) -> [Lane; STATE_WORDS] {
    core::array::from_fn(|w| core::array::from_fn(|b| blocks[b][w]))
}

/// Invert [`interleave`], recovering the four block states.
#[inline(always)]
pub(crate) fn deinterleave(lanes: &[Lane; STATE_WORDS]) -> [[u32; STATE_WORDS]; PAR_BLOCKS] {
    core::array::from_fn(|b| core::array::from_fn(|w| lanes[w][b]))
}

/// Produce four sequential keystream blocks for the counters
/// `state[12] + 0..4`, serialized little endian into one flat buffer.
#[inline(always)]
pub(crate) fn four_block_keystream(
    state: &[u32; STATE_WORDS],
    rounds: usize,
) -> [u8; WIDE_BYTES] {
    let blocks: [[u32; STATE_WORDS]; PAR_BLOCKS] = core::array::from_fn(|b| {
        let mut s = *state;
        s[COUNTER_WORD] = s[COUNTER_WORD].wrapping_add(b as u32);
        s
    });

    let mixed = deinterleave(&run_rounds_wide(&interleave(&blocks), rounds));

    let mut out = [0u8; WIDE_BYTES];
    for (b, block) in mixed.iter().enumerate() {
        for (chunk, val) in out[b * BLOCK_SIZE..(b + 1) * BLOCK_SIZE]
            .chunks_exact_mut(4)
            .zip(block.iter())
        {
            chunk.copy_from_slice(&val.to_le_bytes());
        }
    }
    out
}

/// XOR keystream from `src` into `dst` for a range longer than one block
/// and at most four blocks long.
///
/// The range is walked in fixed 32-byte chunks. A trailing partial chunk
/// is finished with one full-width store over the window ending at
/// `dst.len()`; that window overlaps the tail of the preceding chunk,
/// whose bytes are recomputed to the same values, so no staging copy and
/// no per-byte loop is needed and nothing past `dst.len()` is touched.
///
/// The counter word is left untouched; the caller advances it by the
/// number of whole or partial blocks consumed.
pub(crate) fn xor_up_to_four_blocks(
    state: &[u32; STATE_WORDS],
    dst: &mut [u8],
    src: &[u8],
    rounds: usize,
) {
    let nbytes = dst.len();
    debug_assert_eq!(nbytes, src.len());
    debug_assert!(nbytes > BLOCK_SIZE && nbytes <= WIDE_BYTES);

    let ks = four_block_keystream(state, rounds);

    let mut offset = 0;
    while nbytes - offset >= CHUNK {
        xor_chunk(
            &mut dst[offset..offset + CHUNK],
            &src[offset..offset + CHUNK],
            &ks[offset..offset + CHUNK],
        );
        offset += CHUNK;
    }
    if offset < nbytes {
        // Overlapping store: the window's leading bytes repeat the tail
        // of the chunk just written, byte for byte.
        let start = nbytes - CHUNK;
        xor_chunk(&mut dst[start..], &src[start..], &ks[start..nbytes]);
    }
}

#[inline(always)]
fn xor_chunk(dst: &mut [u8], src: &[u8], ks: &[u8]) {
    let dst: &mut [u8; CHUNK] = dst.try_into().unwrap();
    let src: &[u8; CHUNK] = src.try_into().unwrap();
    let ks: &[u8; CHUNK] = ks.try_into().unwrap();
    for i in 0..CHUNK {
        dst[i] = src[i] ^ ks[i];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::soft::keystream_block;
    use crate::stream::init_state;

    #[test]
    fn interleave_round_trip() {
        let blocks: [[u32; STATE_WORDS]; PAR_BLOCKS] = core::array::from_fn(|b| {
            core::array::from_fn(|w| {
                ((b * STATE_WORDS + w) as u32)
                    .wrapping_mul(0x9e37_79b9)
                    .wrapping_add(0x7f4a_7c15)
            })
        });
        assert_eq!(deinterleave(&interleave(&blocks)), blocks);
    }

    #[test]
    fn four_blocks_match_serial_generation() {
        let key: [u8; 32] = core::array::from_fn(|i| (i * 17 + 2) as u8);
        let nonce: [u8; 12] = core::array::from_fn(|i| (i * 23 + 9) as u8);
        let state = init_state(&key, &nonce, 7);

        let ks = four_block_keystream(&state, 20);
        let mut s = state;
        for b in 0..PAR_BLOCKS {
            assert_eq!(
                &ks[b * BLOCK_SIZE..(b + 1) * BLOCK_SIZE],
                &keystream_block(&s, 20)[..],
                "block {b}"
            );
            s[COUNTER_WORD] = s[COUNTER_WORD].wrapping_add(1);
        }
    }

    #[test]
    fn counter_wraps_across_batch() {
        let state = init_state(&[0u8; 32], &[0u8; 12], u32::MAX);
        let ks = four_block_keystream(&state, 8);

        let mut s = state;
        for b in 0..PAR_BLOCKS {
            assert_eq!(
                &ks[b * BLOCK_SIZE..(b + 1) * BLOCK_SIZE],
                &keystream_block(&s, 8)[..],
                "block {b}"
            );
            s[COUNTER_WORD] = s[COUNTER_WORD].wrapping_add(1);
        }
    }

    #[test]
    fn partial_tail_140_bytes() {
        let key: [u8; 32] = core::array::from_fn(|i| (i * 5 + 1) as u8);
        let nonce: [u8; 12] = core::array::from_fn(|i| (i * 11 + 4) as u8);
        let state = init_state(&key, &nonce, 1);

        let mut src = [0u8; 140];
        for (i, b) in src.iter_mut().enumerate() {
            *b = (i * 13 + 7) as u8;
        }
        let mut dst = [0u8; 140];
        xor_up_to_four_blocks(&state, &mut dst, &src, 20);

        let ks = four_block_keystream(&state, 20);
        for i in 0..140 {
            assert_eq!(dst[i], src[i] ^ ks[i], "byte {i}");
        }
    }

    #[test]
    fn chunk_boundary_and_extreme_lengths() {
        let key = [0x42u8; 32];
        let nonce = [0x24u8; 12];
        let state = init_state(&key, &nonce, 0);
        let ks = four_block_keystream(&state, 20);

        let mut src = [0u8; WIDE_BYTES];
        for (i, b) in src.iter_mut().enumerate() {
            *b = (i * 37 + 3) as u8;
        }

        for nbytes in [65, 96, 127, 128, 129, 160, 192, 224, 255, 256] {
            let mut dst = [0u8; WIDE_BYTES];
            xor_up_to_four_blocks(&state, &mut dst[..nbytes], &src[..nbytes], 20);
            for i in 0..nbytes {
                assert_eq!(dst[i], src[i] ^ ks[i], "nbytes={nbytes} byte {i}");
            }
            // nothing past the requested range is written
            assert!(dst[nbytes..].iter().all(|&b| b == 0), "nbytes={nbytes}");
        }
    }
}
