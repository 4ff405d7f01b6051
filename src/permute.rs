//! Bijection between `[0, n!)` and permutations of an `n`-element reference.
//!
//! Implements the swap-based Myrvold-Ruskey rank/unrank scheme
//! (www.cs.uvic.ca/~ruskey/Publications/RankPerm/RankPerm.html), generic
//! over element type via a plain index permutation underneath.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

/// Applies the swap-based unrank to the identity permutation `[0, n)`, then
/// reorders `reference` by the resulting index permutation.
pub fn unrank<T: Clone>(reference: &[T], rank: &BigUint) -> Vec<T> {
    let mut idx: Vec<usize> = (0..reference.len()).collect();
    unrank_indices(&mut idx, rank);
    idx.into_iter().map(|i| reference[i].clone()).collect()
}

/// In place, swaps index `n-1` with index `r mod n`, then divides `r` by
/// `n`, for `n` from `v.len()` down to `1`.
fn unrank_indices(v: &mut [usize], rank: &BigUint) {
    let mut r = rank.clone();
    let mut n = v.len();
    while n > 0 {
        let n_big = BigUint::from(n as u64);
        let j = (&r % &n_big).to_usize().expect("n fits in usize");
        v.swap(n - 1, j);
        r /= n_big;
        n -= 1;
    }
}

/// Ranks `permuted` (a reordering of `reference`) against `reference`,
/// returning the integer that `unrank(reference, rank)` would reproduce it.
pub fn rank<T: PartialEq>(reference: &[T], permuted: &[T]) -> BigUint {
    let idx: Vec<usize> = permuted
        .iter()
        .map(|item| {
            reference
                .iter()
                .position(|r| r == item)
                .expect("permuted must contain only items drawn from reference")
        })
        .collect();
    rank_indices(idx)
}

/// Builds the inverse permutation `v_i` (`v_i[v[i]] = i`) and calls the
/// recursive worker.
fn rank_indices(mut v: Vec<usize>) -> BigUint {
    let n = v.len();
    let mut v_i = vec![0usize; n];
    for (i, &value) in v.iter().enumerate() {
        v_i[value] = i;
    }
    rank_indices_rec(n, &mut v, &mut v_i)
}

fn rank_indices_rec(n: usize, v: &mut [usize], v_i: &mut [usize]) -> BigUint {
    if n == 1 {
        return BigUint::zero();
    }
    let s = v[n - 1];
    v.swap(n - 1, v_i[n - 1]);
    v_i.swap(s, n - 1);
    BigUint::from(s as u64) + BigUint::from(n as u64) * rank_indices_rec(n - 1, v, v_i)
}
