//! Raw slice-level keystream application.
//!
//! These functions operate on a bare 16-word state and borrowed byte
//! ranges, with counter management made explicit: [`xor_keystream`]
//! advances the counter word by one per block consumed, a trailing
//! partial block counting as one. The trait-based API in the crate root
//! drives the same backends through the `cipher` machinery.

use crate::backends::soft;
#[cfg(not(chacha_wide_force_soft))]
use crate::backends::wide;
use crate::{BLOCK_SIZE, CONSTANTS, COUNTER_WORD, STATE_WORDS};
use cfg_if::cfg_if;

/// Build a cipher state from key, nonce and starting block counter.
///
/// Words are loaded little endian: four constants, eight key words, the
/// counter word and three nonce words.
pub fn init_state(key: &[u8; 32], nonce: &[u8; 12], counter: u32) -> [u32; STATE_WORDS] {
    let mut state = [0u32; STATE_WORDS];
    state[..4].copy_from_slice(&CONSTANTS);
    for (val, chunk) in state[4..12].iter_mut().zip(key.chunks_exact(4)) {
        *val = u32::from_le_bytes(chunk.try_into().unwrap());
    }
    state[COUNTER_WORD] = counter;
    for (val, chunk) in state[13..].iter_mut().zip(nonce.chunks_exact(4)) {
        *val = u32::from_le_bytes(chunk.try_into().unwrap());
    }
    state
}

/// XOR the keystream for `state` with `src`, writing the result to
/// `dst`, and advance the counter word by one per block consumed.
///
/// While more than one block remains, batches of up to four blocks go
/// through the wide backend; the final block or partial block goes
/// through the single-block path. A trailing partial block advances the
/// counter by one, so after `n` bytes the counter has moved by
/// `n.div_ceil(64)`.
///
/// `rounds` must be even and nonzero (8, 12 and 20 are the usual
/// choices).
///
/// # Panics
///
/// Panics if `dst` and `src` differ in length.
pub fn xor_keystream(state: &mut [u32; STATE_WORDS], dst: &mut [u8], src: &[u8], rounds: usize) {
    assert_eq!(dst.len(), src.len());
    debug_assert!(rounds != 0 && rounds % 2 == 0);

    let nbytes = dst.len();
    let mut offset = 0;
    cfg_if! {
        if #[cfg(not(chacha_wide_force_soft))] {
            while nbytes - offset > BLOCK_SIZE {
                let take = (nbytes - offset).min(wide::WIDE_BYTES);
                wide::xor_up_to_four_blocks(
                    state,
                    &mut dst[offset..offset + take],
                    &src[offset..offset + take],
                    rounds,
                );
                state[COUNTER_WORD] =
                    state[COUNTER_WORD].wrapping_add(take.div_ceil(BLOCK_SIZE) as u32);
                offset += take;
            }
        } else {
            while nbytes - offset > BLOCK_SIZE {
                soft::xor_block(
                    state,
                    &mut dst[offset..offset + BLOCK_SIZE],
                    &src[offset..offset + BLOCK_SIZE],
                    rounds,
                );
                state[COUNTER_WORD] = state[COUNTER_WORD].wrapping_add(1);
                offset += BLOCK_SIZE;
            }
        }
    }
    if offset < nbytes {
        soft::xor_block(state, &mut dst[offset..], &src[offset..], rounds);
        state[COUNTER_WORD] = state[COUNTER_WORD].wrapping_add(1);
    }
}
