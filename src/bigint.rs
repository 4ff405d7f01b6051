//! Arbitrary-precision non-negative integer helpers built on [`num_bigint`].
//!
//! Factorials grow past 64 bits once a dictionary has more than about 20
//! entries, so ranks and capacities are carried as exact big integers
//! throughout rather than machine words. Used directly rather than wrapped
//! behind a trait — nothing in this crate needs more than one backend.

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Dictionaries larger than this are vanishingly rare in practice and would
/// make `fact(n)` expensive for no benefit; `available_bits` treats anything
/// past this as carrying zero capacity rather than computing an enormous
/// factorial. Comfortably above any dictionary found in real PDFs.
pub const MAX_DICT_LEN: usize = 1024;

/// `n!` as an exact [`BigUint`].
pub fn factorial(n: usize) -> BigUint {
    let mut acc = BigUint::one();
    for i in 2..=n {
        acc *= i as u64;
    }
    acc
}

/// Number of bits needed to represent `value` in base 2 (`0` for `value == 0`).
pub fn bit_length(value: &BigUint) -> usize {
    value.bits() as usize
}

/// Returns the value of bit `i` (0 = least significant) of `value`.
pub fn test_bit(value: &BigUint, i: usize) -> bool {
    value.bit(i as u64)
}

/// Sets bit `i` of `value` to 1 in place.
pub fn set_bit(value: &mut BigUint, i: usize) {
    value.set_bit(i as u64, true);
}

/// `value` is zero.
pub fn is_zero(value: &BigUint) -> bool {
    value.is_zero()
}
