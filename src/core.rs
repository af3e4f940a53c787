use crate::{CONSTANTS, COUNTER_WORD, Rounds, STATE_WORDS, backends};
use cfg_if::cfg_if;
use cipher::{
    BlockSizeUser, Iv, IvSizeUser, Key, KeyIvInit, KeySizeUser, StreamCipherCore,
    StreamCipherSeekCore, StreamClosure,
};
use core::marker::PhantomData;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The core state for the ChaCha cipher.
pub struct ChaChaCore<R: Rounds> {
    /// Internal state of the block function
    pub(crate) state: [u32; STATE_WORDS],
    /// PhantomData to tie the struct to its round count
    pub(crate) _rounds: PhantomData<R>,
}

impl<R: Rounds> KeySizeUser for ChaChaCore<R> {
    type KeySize = cipher::consts::U32;
}

impl<R: Rounds> IvSizeUser for ChaChaCore<R> {
    type IvSize = cipher::consts::U12;
}

impl<R: Rounds> BlockSizeUser for ChaChaCore<R> {
    type BlockSize = cipher::consts::U64; // 512-bit blocks
}

impl<R: Rounds> KeyIvInit for ChaChaCore<R> {
    fn new(key: &Key<Self>, iv: &Iv<Self>) -> Self {
        let mut state = [0u32; STATE_WORDS];
        state[..4].copy_from_slice(&CONSTANTS);
        for (val, chunk) in state[4..12].iter_mut().zip(key.chunks_exact(4)) {
            *val = u32::from_le_bytes(chunk.try_into().unwrap());
        }
        for (val, chunk) in state[13..].iter_mut().zip(iv.chunks_exact(4)) {
            *val = u32::from_le_bytes(chunk.try_into().unwrap());
        }

        Self {
            state,
            _rounds: PhantomData,
        }
    }
}

impl<R: Rounds> StreamCipherCore for ChaChaCore<R> {
    #[inline(always)]
    fn remaining_blocks(&self) -> Option<usize> {
        let rem = u32::MAX - self.state[COUNTER_WORD];
        rem.try_into().ok()
    }

    fn process_with_backend(&mut self, f: impl StreamClosure<BlockSize = Self::BlockSize>) {
        cfg_if! {
            if #[cfg(chacha_wide_force_soft)] {
                f.call(&mut backends::soft::Backend(self));
            } else {
                f.call(&mut backends::wide::Backend(self));
            }
        }
    }
}

impl<R: Rounds> StreamCipherSeekCore for ChaChaCore<R> {
    type Counter = u32;

    #[inline(always)]
    fn get_block_pos(&self) -> Self::Counter {
        self.state[COUNTER_WORD]
    }

    #[inline(always)]
    fn set_block_pos(&mut self, pos: Self::Counter) {
        self.state[COUNTER_WORD] = pos;
    }
}

impl<R: Rounds> Drop for ChaChaCore<R> {
    fn drop(&mut self) {
        self.state.zeroize();
    }
}

impl<R: Rounds> ZeroizeOnDrop for ChaChaCore<R> {}
