//! The quarter-round mixing primitive, in scalar and four-lane forms.

use crate::STATE_WORDS;
#[cfg(not(chacha_wide_force_soft))]
use crate::PAR_BLOCKS;

/// The scalar quarter round function (add / rotate / XOR).
#[inline(always)]
fn quarter_round(a: usize, b: usize, c: usize, d: usize, state: &mut [u32; STATE_WORDS]) {
    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = state[d].rotate_left(16);

    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = state[b].rotate_left(12);

    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = state[d].rotate_left(8);

    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = state[b].rotate_left(7);
}

/// Run `rounds` rounds over `state` and add the original state back in.
///
/// `rounds` must be even and nonzero; each pair is one column round
/// followed by one diagonal round.
#[inline(always)]
pub(crate) fn run_rounds(state: &[u32; STATE_WORDS], rounds: usize) -> [u32; STATE_WORDS] {
    debug_assert!(rounds != 0 && rounds % 2 == 0);
    let mut res = *state;

    for _ in 0..rounds / 2 {
        // column rounds
        quarter_round(0, 4, 8, 12, &mut res);
        quarter_round(1, 5, 9, 13, &mut res);
        quarter_round(2, 6, 10, 14, &mut res);
        quarter_round(3, 7, 11, 15, &mut res);

        // diagonal rounds
        quarter_round(0, 5, 10, 15, &mut res);
        quarter_round(1, 6, 11, 12, &mut res);
        quarter_round(2, 7, 8, 13, &mut res);
        quarter_round(3, 4, 9, 14, &mut res);
    }

    for (s1, s0) in res.iter_mut().zip(state.iter()) {
        *s1 = s1.wrapping_add(*s0);
    }
    res
}

/// One word position replicated across the parallel block states.
#[cfg(not(chacha_wide_force_soft))]
pub(crate) type Lane = [u32; PAR_BLOCKS];

#[cfg(not(chacha_wide_force_soft))]
#[inline(always)]
fn lane_add(a: Lane, b: Lane) -> Lane {
    core::array::from_fn(|i| a[i].wrapping_add(b[i]))
}

#[cfg(not(chacha_wide_force_soft))]
#[inline(always)]
fn lane_xor(a: Lane, b: Lane) -> Lane {
    core::array::from_fn(|i| a[i] ^ b[i])
}

#[cfg(not(chacha_wide_force_soft))]
#[inline(always)]
fn lane_rol<const N: u32>(a: Lane) -> Lane {
    core::array::from_fn(|i| a[i].rotate_left(N))
}

/// The quarter round applied to every lane of four parallel states.
#[cfg(not(chacha_wide_force_soft))]
#[inline(always)]
fn quarter_round_wide(a: usize, b: usize, c: usize, d: usize, x: &mut [Lane; STATE_WORDS]) {
    x[a] = lane_add(x[a], x[b]);
    x[d] = lane_rol::<16>(lane_xor(x[d], x[a]));

    x[c] = lane_add(x[c], x[d]);
    x[b] = lane_rol::<12>(lane_xor(x[b], x[c]));

    x[a] = lane_add(x[a], x[b]);
    x[d] = lane_rol::<8>(lane_xor(x[d], x[a]));

    x[c] = lane_add(x[c], x[d]);
    x[b] = lane_rol::<7>(lane_xor(x[b], x[c]));
}

/// Run `rounds` rounds over four interleaved states and add the original
/// lanes back in.
#[cfg(not(chacha_wide_force_soft))]
#[inline(always)]
pub(crate) fn run_rounds_wide(lanes: &[Lane; STATE_WORDS], rounds: usize) -> [Lane; STATE_WORDS] {
    debug_assert!(rounds != 0 && rounds % 2 == 0);
    let mut res = *lanes;

    for _ in 0..rounds / 2 {
        // column rounds
        quarter_round_wide(0, 4, 8, 12, &mut res);
        quarter_round_wide(1, 5, 9, 13, &mut res);
        quarter_round_wide(2, 6, 10, 14, &mut res);
        quarter_round_wide(3, 7, 11, 15, &mut res);

        // diagonal rounds
        quarter_round_wide(0, 5, 10, 15, &mut res);
        quarter_round_wide(1, 6, 11, 12, &mut res);
        quarter_round_wide(2, 7, 8, 13, &mut res);
        quarter_round_wide(3, 4, 9, 14, &mut res);
    }

    for (r, l) in res.iter_mut().zip(lanes.iter()) {
        *r = lane_add(*r, *l);
    }
    res
}
